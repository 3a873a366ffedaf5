use super::category::{Category, Tier};
use crate::cards::{Card, Deck, Suit};
use crate::voting::{Estimate, VoteResult};
use rand::seq::SliceRandom;
use rand::Rng;

/// hands never grow past five cards
pub const MAX_HAND_SIZE: usize = 5;

/// Outcome of one reveal-time reward draw for a single voter.
#[derive(Debug, Clone, PartialEq)]
pub struct Reward {
    pub cards: Vec<Card>,
    pub reason: String,
    pub is_special_penalty: bool,
}

/// Draws one reward card weighted by estimation quality and appends it to
/// the voter's hand.
///
/// A joker-majority penalty first forfeits one random existing card, so the
/// penalized hand stays the same size with a degraded draw replacing a kept
/// card. Independent of category, a full hand evicts one random card before
/// the append to hold the five-card cap.
pub fn reward(existing: &[Card], voter: &Estimate, results: &[VoteResult]) -> Reward {
    reward_with(&mut rand::thread_rng(), existing, voter, results)
}

pub fn reward_with<R: Rng>(
    rng: &mut R,
    existing: &[Card],
    voter: &Estimate,
    results: &[VoteResult],
) -> Reward {
    let category = Category::classify(voter, results);
    let tier = pick_tier_with(rng, category.odds());
    let card = draw_tier_with(rng, tier);
    let is_special_penalty = category == Category::SpecialCardPenalty;
    let mut cards = existing.to_vec();
    if is_special_penalty && !cards.is_empty() {
        cards.remove(rng.gen_range(0..cards.len()));
    }
    if cards.len() >= MAX_HAND_SIZE {
        cards.remove(rng.gen_range(0..cards.len()));
    }
    cards.push(card);
    Reward {
        cards,
        reason: category.reason().to_string(),
        is_special_penalty,
    }
}

/// weighted pick over {high, medium, low} percentages
fn pick_tier_with<R: Rng>(rng: &mut R, [high, medium, low]: [u8; 3]) -> Tier {
    debug_assert_eq!(high as u32 + medium as u32 + low as u32, 100);
    let roll = rng.gen_range(0..100u8);
    if roll < high {
        Tier::High
    } else if roll < high + medium {
        Tier::Medium
    } else {
        Tier::Low
    }
}

/// uniform rank within the tier's band, uniform suit
pub fn draw_tier_with<R: Rng>(rng: &mut R, tier: Tier) -> Card {
    let rank = *tier.ranks().choose(rng).expect("tier bands are non-empty");
    let suit = *Suit::all().choose(rng).expect("four suits");
    Card::new(rank, suit)
}

/// Replaces one random card with a fresh draw, keeping the hand size.
///
/// The new card is not guaranteed to differ in rank or suit. The
/// one-replacement-per-round quota is the session controller's concern.
pub fn replace_random(cards: &[Card]) -> Vec<Card> {
    replace_random_with(&mut rand::thread_rng(), cards)
}

pub fn replace_random_with<R: Rng>(rng: &mut R, cards: &[Card]) -> Vec<Card> {
    if cards.is_empty() {
        return Vec::new();
    }
    let mut cards = cards.to_vec();
    let index = rng.gen_range(0..cards.len());
    cards[index] = Deck::draw_with(rng);
    cards
}
