//! UNO cards and their effects.

use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};
use tracing::debug;

use super::{UnoSeat, DECK_SEAT};
use crate::cards::{Card, Placement, Playable};
use crate::core::error::Result;
use crate::core::player::PlayerId;
use crate::rules::GameEnvironment;
use crate::zones::{transfer, PilePosition};

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Color {
    Red,
    Yellow,
    Blue,
    Green,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnoFace {
    /// Values 1 to 9.
    Number { color: Color, value: u8 },
    Skip(Color),
    Reverse(Color),
    PlusTwo(Color),
    PlusFour,
    Wild,
}

#[derive(Clone, Debug)]
pub struct UnoCard {
    placement: Placement,
    face: UnoFace,
    /// Color named when a wild card was played.
    chosen: Option<Color>,
}

impl UnoCard {
    #[must_use]
    pub fn new(face: UnoFace) -> Self {
        Self { placement: Placement::unplaced(), face, chosen: None }
    }

    #[must_use]
    pub fn face(&self) -> UnoFace {
        self.face
    }

    #[must_use]
    pub fn is_wild(&self) -> bool {
        matches!(self.face, UnoFace::PlusFour | UnoFace::Wild)
    }

    /// The printed color, or the named one for a played wild.
    #[must_use]
    pub fn color(&self) -> Option<Color> {
        match self.face {
            UnoFace::Number { color, .. } | UnoFace::Skip(color) | UnoFace::Reverse(color) | UnoFace::PlusTwo(color) => {
                Some(color)
            }
            UnoFace::PlusFour | UnoFace::Wild => self.chosen,
        }
    }

    /// Whether this card may be played onto `top`.
    ///
    /// Wilds always may. Otherwise the colors match, or both cards are the
    /// same number or the same action. A wild on top that never had a color
    /// named accepts anything.
    #[must_use]
    pub fn matches(&self, top: &UnoCard) -> bool {
        if self.is_wild() {
            return true;
        }
        let Some(top_color) = top.color() else {
            return true;
        };
        if self.color() == Some(top_color) {
            return true;
        }
        match (self.face, top.face) {
            (UnoFace::Number { value: a, .. }, UnoFace::Number { value: b, .. }) => a == b,
            (UnoFace::Skip(_), UnoFace::Skip(_))
            | (UnoFace::Reverse(_), UnoFace::Reverse(_))
            | (UnoFace::PlusTwo(_), UnoFace::PlusTwo(_)) => true,
            _ => false,
        }
    }

    /// Forget the named color once the card leaves the top of the pile.
    pub fn clear_choice(&mut self) {
        self.chosen = None;
    }
}

impl Card for UnoCard {
    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    fn label(&self) -> String {
        let base = match self.face {
            UnoFace::Number { color, value } => format!("{color} {value}"),
            UnoFace::Skip(color) => format!("{color} skip"),
            UnoFace::Reverse(color) => format!("{color} reverse"),
            UnoFace::PlusTwo(color) => format!("{color} plus2"),
            UnoFace::PlusFour => "plus4".to_string(),
            UnoFace::Wild => "wild".to_string(),
        };
        match self.chosen {
            Some(color) => format!("{base} ({color})"),
            None => base,
        }
    }
}

/// The table a card's effect resolves against.
pub struct UnoTable<'a> {
    pub env: &'a mut GameEnvironment<UnoSeat>,
    /// Who played the card.
    pub player: PlayerId,
}

impl UnoTable<'_> {
    /// The next player draws up to `count` cards from the deck.
    fn penalize_next(&mut self, count: usize) -> Result<usize> {
        let next = self.env.next_player(self.player)?;
        let (deck, victim) = self.env.pair_mut(DECK_SEAT, next)?;
        let mut drawn = 0;
        while drawn < count {
            let Some(uid) = deck.pile.front() else {
                break;
            };
            transfer(uid, &mut deck.pile, &mut victim.pile, PilePosition::Back)?;
            drawn += 1;
        }
        debug!(target: "engine::uno", player = %next, drawn, "penalty cards drawn");
        Ok(drawn)
    }
}

impl<'a> Playable<UnoTable<'a>> for UnoCard {
    /// Color named for a wild card.
    type Action = Option<Color>;

    fn play_card(&mut self, color: Option<Color>, table: &mut UnoTable<'a>) -> Result<bool> {
        if self.is_wild() {
            let Some(color) = color else {
                return Ok(false);
            };
            self.chosen = Some(color);
        }
        match self.face {
            UnoFace::Skip(_) => {
                let skipped = table.env.next_player(table.player)?;
                table.env.set_current(skipped)?;
            }
            UnoFace::Reverse(_) => {
                table.env.reverse_order();
                table.env.set_current(table.player)?;
            }
            UnoFace::PlusTwo(_) => {
                table.penalize_next(2)?;
            }
            UnoFace::PlusFour => {
                table.penalize_next(4)?;
            }
            UnoFace::Number { .. } | UnoFace::Wild => {}
        }
        Ok(true)
    }
}

/// Per color: numbers 1 to 9 twice, two reverses, a skip and a plus two.
/// Plus four wild and plain wild cards four times each.
#[must_use]
pub fn standard_deck() -> Vec<UnoCard> {
    let mut deck = Vec::new();
    for color in Color::iter() {
        deck.push(UnoCard::new(UnoFace::Reverse(color)));
        deck.push(UnoCard::new(UnoFace::Reverse(color)));
        deck.push(UnoCard::new(UnoFace::PlusTwo(color)));
        deck.push(UnoCard::new(UnoFace::Skip(color)));
        for value in 1..=9 {
            deck.push(UnoCard::new(UnoFace::Number { color, value }));
            deck.push(UnoCard::new(UnoFace::Number { color, value }));
        }
    }
    for _ in 0..4 {
        deck.push(UnoCard::new(UnoFace::Wild));
        deck.push(UnoCard::new(UnoFace::PlusFour));
    }
    deck
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(color: Color, value: u8) -> UnoCard {
        UnoCard::new(UnoFace::Number { color, value })
    }

    #[test]
    fn test_matching() {
        let top = number(Color::Red, 5);
        assert!(number(Color::Red, 2).matches(&top));
        assert!(number(Color::Blue, 5).matches(&top));
        assert!(!number(Color::Blue, 2).matches(&top));
        assert!(UnoCard::new(UnoFace::Wild).matches(&top));
        assert!(UnoCard::new(UnoFace::Skip(Color::Red)).matches(&top));
        assert!(!UnoCard::new(UnoFace::Skip(Color::Green)).matches(&top));

        let skip = UnoCard::new(UnoFace::Skip(Color::Yellow));
        assert!(UnoCard::new(UnoFace::Skip(Color::Green)).matches(&skip));
        assert!(!UnoCard::new(UnoFace::Reverse(Color::Green)).matches(&skip));
    }

    #[test]
    fn test_wild_on_top_uses_named_color() {
        let mut wild = UnoCard::new(UnoFace::Wild);
        assert!(number(Color::Green, 1).matches(&wild));

        wild.chosen = Some(Color::Blue);
        assert!(number(Color::Blue, 1).matches(&wild));
        assert!(!number(Color::Green, 1).matches(&wild));
        assert_eq!(wild.label(), "wild (blue)");

        wild.clear_choice();
        assert_eq!(wild.color(), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(number(Color::Red, 7).label(), "red 7");
        assert_eq!(UnoCard::new(UnoFace::PlusTwo(Color::Blue)).label(), "blue plus2");
        assert_eq!(UnoCard::new(UnoFace::PlusFour).label(), "plus4");
    }

    #[test]
    fn test_standard_deck_size() {
        let deck = standard_deck();
        assert_eq!(deck.len(), 4 * 22 + 8);
        assert_eq!(deck.iter().filter(|c| c.is_wild()).count(), 8);
    }
}
