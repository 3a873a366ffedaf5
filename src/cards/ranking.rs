use serde::{Deserialize, Serialize};

/// A poker hand's category, weakest to strongest.
///
/// Ordering is by category only; ties are broken downstream by the
/// highest card in the evaluated hand.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Ranking {
    HighCard,
    OnePair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
    RoyalFlush,
}

impl Ranking {
    /// 1 for high card through 10 for a royal flush
    pub fn score(&self) -> u8 {
        match self {
            Ranking::HighCard => 1,
            Ranking::OnePair => 2,
            Ranking::TwoPair => 3,
            Ranking::ThreeOfAKind => 4,
            Ranking::Straight => 5,
            Ranking::Flush => 6,
            Ranking::FullHouse => 7,
            Ranking::FourOfAKind => 8,
            Ranking::StraightFlush => 9,
            Ranking::RoyalFlush => 10,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Ranking::HighCard => "High Card",
            Ranking::OnePair => "One Pair",
            Ranking::TwoPair => "Two Pair",
            Ranking::ThreeOfAKind => "Three of a Kind",
            Ranking::Straight => "Straight",
            Ranking::Flush => "Flush",
            Ranking::FullHouse => "Full House",
            Ranking::FourOfAKind => "Four of a Kind",
            Ranking::StraightFlush => "Straight Flush",
            Ranking::RoyalFlush => "Royal Flush",
        }
    }
}

impl std::fmt::Display for Ranking {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
