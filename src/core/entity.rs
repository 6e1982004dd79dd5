//! Card identification.
//!
//! Every card that enters a game receives a `CardUid`. Ids are allocated by
//! the environment's `UidAllocator` and stay with the card for its whole
//! lifetime, across every pile it moves through.
//!
//! ## Text form
//!
//! Decision sources answer with ids in text form. `CardUid` displays as
//! `card_<n>` and parses either that form or the bare number:
//!
//! ```
//! use flow_ccg::core::CardUid;
//!
//! let uid: CardUid = "card_7".parse().unwrap();
//! assert_eq!(uid, CardUid::new(7));
//! assert_eq!("7".parse::<CardUid>().unwrap(), uid);
//! assert_eq!(uid.to_string(), "card_7");
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique identifier for a card within one game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardUid(pub u32);

impl CardUid {
    /// Create a card id from its raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for CardUid {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CardUid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "card_{}", self.0)
    }
}

/// Text that is neither `card_<n>` nor `<n>`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("`{0}` is not a card id")]
pub struct ParseCardUidError(pub String);

impl FromStr for CardUid {
    type Err = ParseCardUidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix("card_").unwrap_or(trimmed);
        digits
            .parse::<u32>()
            .map(CardUid)
            .map_err(|_| ParseCardUidError(s.to_string()))
    }
}

/// Monotonic id counter owned by a game environment.
///
/// Ids are never reused, so a card that leaves and re-enters play keeps a
/// unique identity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UidAllocator {
    next: u32,
}

impl UidAllocator {
    /// Create an allocator starting at `card_0`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id.
    pub fn alloc(&mut self) -> CardUid {
        let uid = CardUid(self.next);
        self.next += 1;
        uid
    }

    /// The id the next call to `alloc` will return.
    #[must_use]
    pub fn peek_next(&self) -> CardUid {
        CardUid(self.next)
    }

    /// Number of ids handed out so far.
    #[must_use]
    pub fn allocated(&self) -> u32 {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", CardUid(42)), "card_42");
    }

    #[test]
    fn test_parse_forms() {
        assert_eq!("card_3".parse::<CardUid>(), Ok(CardUid(3)));
        assert_eq!("3".parse::<CardUid>(), Ok(CardUid(3)));
        assert_eq!(" card_12 ".parse::<CardUid>(), Ok(CardUid(12)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("card_".parse::<CardUid>().is_err());
        assert!("deck".parse::<CardUid>().is_err());
        assert!("card_-1".parse::<CardUid>().is_err());
        assert_eq!(
            "joe".parse::<CardUid>().unwrap_err().to_string(),
            "`joe` is not a card id"
        );
    }

    #[test]
    fn test_allocator_is_monotonic() {
        let mut alloc = UidAllocator::new();
        assert_eq!(alloc.peek_next(), CardUid(0));
        assert_eq!(alloc.alloc(), CardUid(0));
        assert_eq!(alloc.alloc(), CardUid(1));
        assert_eq!(alloc.peek_next(), CardUid(2));
        assert_eq!(alloc.allocated(), 2);
    }

    #[test]
    fn test_serialization() {
        let id = CardUid(123);
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: CardUid = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
