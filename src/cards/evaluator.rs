use super::card::Card;
use super::ranking::Ranking;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub ranking: Ranking,
    pub cards: Vec<Card>,
}

/// Evaluates a collected hand of 1-5 cards into its best category.
///
/// Only the first five supplied cards are considered. Hands shorter than
/// five are evaluated exactly as given: flush and straight categories are
/// unreachable below five cards, and short hands are never padded with
/// synthetic fillers. Duplicate cards are tolerated since reward draws
/// sample with replacement.
pub struct Evaluator(Vec<Card>);

impl From<&[Card]> for Evaluator {
    fn from(cards: &[Card]) -> Self {
        Self(cards.iter().take(5).copied().collect())
    }
}

impl Evaluator {
    pub fn evaluate(&self) -> Evaluation {
        let ranking = None
            .or_else(|| self.find_royal_flush())
            .or_else(|| self.find_straight_flush())
            .or_else(|| self.find_4_oak())
            .or_else(|| self.find_full_house())
            .or_else(|| self.find_flush())
            .or_else(|| self.find_straight())
            .or_else(|| self.find_3_oak())
            .or_else(|| self.find_2_oak_2_oak())
            .or_else(|| self.find_2_oak())
            .unwrap_or(Ranking::HighCard);
        Evaluation {
            ranking,
            cards: self.0.clone(),
        }
    }

    fn find_royal_flush(&self) -> Option<Ranking> {
        if !(self.is_flush() && self.is_straight()) {
            return None;
        }
        let values = self.values().into_iter().sorted().rev().collect::<Vec<_>>();
        (values[0] == 14 && values[1] == 13).then_some(Ranking::RoyalFlush)
    }
    fn find_straight_flush(&self) -> Option<Ranking> {
        (self.is_flush() && self.is_straight()).then_some(Ranking::StraightFlush)
    }
    fn find_4_oak(&self) -> Option<Ranking> {
        (self.0.len() >= 4 && self.counts().first() == Some(&4)).then_some(Ranking::FourOfAKind)
    }
    fn find_full_house(&self) -> Option<Ranking> {
        (self.0.len() == 5 && self.counts() == vec![3, 2]).then_some(Ranking::FullHouse)
    }
    fn find_flush(&self) -> Option<Ranking> {
        self.is_flush().then_some(Ranking::Flush)
    }
    fn find_straight(&self) -> Option<Ranking> {
        self.is_straight().then_some(Ranking::Straight)
    }
    fn find_3_oak(&self) -> Option<Ranking> {
        (self.0.len() >= 3 && self.counts().first() == Some(&3)).then_some(Ranking::ThreeOfAKind)
    }
    fn find_2_oak_2_oak(&self) -> Option<Ranking> {
        (self.0.len() >= 4 && self.counts().starts_with(&[2, 2])).then_some(Ranking::TwoPair)
    }
    fn find_2_oak(&self) -> Option<Ranking> {
        (self.0.len() >= 2 && self.counts().first() == Some(&2)).then_some(Ranking::OnePair)
    }

    /// rank multiplicities, highest first
    fn counts(&self) -> Vec<usize> {
        self.0
            .iter()
            .map(|c| c.rank())
            .counts()
            .into_values()
            .sorted()
            .rev()
            .collect()
    }
    fn values(&self) -> Vec<u8> {
        self.0.iter().map(|c| c.rank().value()).collect()
    }
    fn is_flush(&self) -> bool {
        self.0.len() == 5 && self.0.iter().map(|c| c.suit()).all_equal()
    }
    fn is_straight(&self) -> bool {
        if self.0.len() != 5 {
            return false;
        }
        let values = self.values().into_iter().sorted().collect::<Vec<_>>();
        values.windows(2).all(|w| w[1] == w[0] + 1) || values == vec![2, 3, 4, 5, 14]
    }
}

impl Evaluation {
    /// highest rank value among the evaluated cards, for tie breaks
    pub fn high_value(&self) -> u8 {
        self.cards
            .iter()
            .map(|c| c.rank().value())
            .max()
            .unwrap_or(0)
    }
}
