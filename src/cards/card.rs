#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }
    pub fn rank(&self) -> Rank {
        self.rank
    }
    pub fn suit(&self) -> Suit {
        self.suit
    }

    /// unique within the standard deck, e.g. "Q-hearts"
    pub fn id(&self) -> String {
        format!("{}-{}", self.rank, self.suit.word())
    }

    /// display symbol, e.g. "Q♥"
    pub fn symbol(&self) -> String {
        format!("{}{}", self.rank, self.suit.glyph())
    }
}

impl From<(Rank, Suit)> for Card {
    fn from((rank, suit): (Rank, Suit)) -> Self {
        Self { rank, suit }
    }
}

/// u8 isomorphism
/// each card is mapped to its location in a sorted deck 0-51
impl From<Card> for u8 {
    fn from(c: Card) -> u8 {
        u8::from(c.suit) + (u8::from(c.rank) - 2) * 4
    }
}
impl From<u8> for Card {
    fn from(n: u8) -> Self {
        Self {
            rank: Rank::from(n / 4 + 2),
            suit: Suit::from(n % 4),
        }
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

use super::{rank::Rank, suit::Suit};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result};
