use super::consensus::{distance, Consensus};
use crate::cards::Rank;
use crate::voting::{Estimate, VoteResult};
use serde::{Deserialize, Serialize};

/// Reward rank bands. High draws court cards, low draws the small spot cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    High,
    Medium,
    Low,
}

impl Tier {
    pub fn ranks(&self) -> &'static [Rank] {
        match self {
            Tier::High => &[Rank::Jack, Rank::Queen, Rank::King, Rank::Ace],
            Tier::Medium => &[Rank::Seven, Rank::Eight, Rank::Nine, Rank::Ten],
            Tier::Low => &[Rank::Two, Rank::Three, Rank::Four, Rank::Five, Rank::Six],
        }
    }
}

/// How a voter's estimate relates to the round's consensus.
///
/// Classification precedence: a joker majority penalizes the whole round
/// before anything else is considered, so a lone joker vote is a penalty,
/// not a perfect consensus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    PerfectConsensus,
    MajorityVoter,
    CloseToMajority,
    FarFromMajority,
    SpecialCardVoter,
    SpecialCardPenalty,
    NoMajority,
}

impl Category {
    /// {high, medium, low} percentage split over the reward tiers
    pub fn odds(&self) -> [u8; 3] {
        match self {
            Category::PerfectConsensus => [35, 50, 15],
            Category::MajorityVoter => [40, 45, 15],
            Category::CloseToMajority => [25, 50, 25],
            Category::FarFromMajority => [15, 35, 50],
            Category::SpecialCardVoter => [20, 40, 40],
            Category::SpecialCardPenalty => [0, 40, 60],
            Category::NoMajority => [25, 45, 30],
        }
    }

    /// user-facing toast describing the round's outcome for this voter
    pub fn reason(&self) -> &'static str {
        match self {
            Category::PerfectConsensus => "Perfect consensus! Everyone agreed - bonus card odds!",
            Category::MajorityVoter => "Great estimation! You voted with the majority.",
            Category::CloseToMajority => "Close call! You were within one point of the majority.",
            Category::FarFromMajority => "Off the mark - your estimate was far from the majority.",
            Category::SpecialCardVoter => {
                "You played a special card while the team settled on a number."
            }
            Category::SpecialCardPenalty => {
                "Special cards won majority - one of your cards is forfeit!"
            }
            Category::NoMajority => "No clear majority this round - the team is split.",
        }
    }

    pub fn classify(voter: &Estimate, results: &[VoteResult]) -> Self {
        let consensus = Consensus::analyze(results);
        if consensus.special_majority {
            return Category::SpecialCardPenalty;
        }
        if consensus.perfect {
            return Category::PerfectConsensus;
        }
        if voter.is_special() {
            return Category::SpecialCardVoter;
        }
        let Some(majority) = consensus.majority else {
            return Category::NoMajority;
        };
        if *voter == majority.value {
            return Category::MajorityVoter;
        }
        if distance(voter, &majority.value) <= 1.0 {
            Category::CloseToMajority
        } else {
            Category::FarFromMajority
        }
    }
}
