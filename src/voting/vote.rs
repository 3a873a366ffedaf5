use super::estimate::Estimate;
use serde::{Deserialize, Serialize};

/// One participant's cast vote for the current round.
///
/// Keyed by user id in the shared vote map; overwritten on re-vote and
/// deleted on deselect or session reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub user_id: String,
    pub user_name: String,
    pub value: Estimate,
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voter {
    pub name: String,
    pub user_id: String,
}

/// A group of identical votes, derived on demand and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteResult {
    pub value: Estimate,
    pub voters: Vec<Voter>,
    pub count: usize,
}
