//! Seat ids.
//!
//! Every participant seated in a `GameEnvironment` has a `PlayerId`, turn
//! takers and NPC holders (the UNO deck is `PlayerId(255)`) alike.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Ids `0..count`, capped at the 256 representable seats.
    ///
    /// ```
    /// use flow_ccg::core::PlayerId;
    ///
    /// let seats: Vec<_> = PlayerId::all(3).collect();
    /// assert_eq!(seats, [PlayerId(0), PlayerId(1), PlayerId(2)]);
    /// ```
    pub fn all(count: usize) -> impl Iterator<Item = PlayerId> {
        (0..=u8::MAX).take(count).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}
