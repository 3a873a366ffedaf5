/// winner determination across variable-length collected hands
///
/// Every contender's hand is evaluated, then sorted by category score with
/// the single highest card breaking ties. The sort is stable, so equal
/// hands resolve to whichever contender was supplied first.
#[derive(Debug, Clone)]
pub struct Contender {
    pub user_id: String,
    pub user_name: String,
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Winner {
    pub user_id: String,
    pub user_name: String,
    pub evaluation: Evaluation,
    pub cards: Vec<Card>,
}

pub fn showdown(contenders: &[Contender]) -> Option<Winner> {
    let mut entries = contenders
        .iter()
        .map(|c| (c, Evaluator::from(c.cards.as_slice()).evaluate()))
        .collect::<Vec<_>>();
    entries.sort_by(|(_, a), (_, b)| {
        b.ranking
            .score()
            .cmp(&a.ranking.score())
            .then_with(|| b.high_value().cmp(&a.high_value()))
    });
    entries.into_iter().next().map(|(c, evaluation)| Winner {
        user_id: c.user_id.clone(),
        user_name: c.user_name.clone(),
        cards: c.cards.clone(),
        evaluation,
    })
}

use super::card::Card;
use super::evaluator::{Evaluation, Evaluator};
use serde::{Deserialize, Serialize};
