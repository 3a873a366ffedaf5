use super::card::Card;
use super::rank::Rank;
use super::suit::Suit;
use rand::seq::SliceRandom;
use rand::Rng;

/// The standard 52-card deck in deterministic suit-major order.
///
/// Collected reward hands are duplicate-tolerant: draws are independent
/// samples from a fresh deck rather than dealing without replacement,
/// so ::draw() never depletes anything.
#[derive(Debug, Clone)]
pub struct Deck(Vec<Card>);

impl Deck {
    pub fn standard() -> Self {
        Self(
            Suit::all()
                .iter()
                .flat_map(|suit| Rank::all().map(|rank| Card::new(rank, *suit)))
                .collect(),
        )
    }

    pub fn cards(&self) -> &[Card] {
        &self.0
    }

    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// uniform Fisher-Yates permutation; the deck itself is unchanged
    pub fn shuffled(&self) -> Vec<Card> {
        self.shuffled_with(&mut rand::thread_rng())
    }
    pub fn shuffled_with<R: Rng>(&self, rng: &mut R) -> Vec<Card> {
        let mut cards = self.0.clone();
        cards.shuffle(rng);
        cards
    }

    /// one uniformly random card from a fresh deck
    pub fn draw() -> Card {
        Self::draw_with(&mut rand::thread_rng())
    }
    pub fn draw_with<R: Rng>(rng: &mut R) -> Card {
        let deck = Self::standard();
        deck.0[rng.gen_range(0..deck.0.len())]
    }
}

impl IntoIterator for Deck {
    type Item = Card;
    type IntoIter = std::vec::IntoIter<Card>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// ascending display order: by rank value, ties broken clubs < diamonds < hearts < spades;
/// the input is left untouched
pub fn sorted(cards: &[Card]) -> Vec<Card> {
    let mut cards = cards.to_vec();
    cards.sort_by_key(|c| (c.rank(), c.suit()));
    cards
}
