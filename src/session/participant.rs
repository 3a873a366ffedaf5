use crate::cards::Card;
use crate::host::User;
use serde::{Deserialize, Serialize};

/// A session member's replicated record, keyed by user id.
///
/// The collected hand and the per-round replacement counter outlive rounds
/// and transient disconnects: nothing about starting, joining, or rejoining
/// a session may discard an existing hand. Only the presence sweeper
/// deletes a participant, and never one with a vote in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub user_id: String,
    pub user_name: String,
    pub joined_at: u64,
    #[serde(default)]
    pub last_active_time: Option<u64>,
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(default)]
    pub card_replacements_used: u32,
}

impl Participant {
    pub fn new(user: &User, now: u64) -> Self {
        Self {
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            joined_at: now,
            last_active_time: Some(now),
            cards: Vec::new(),
            card_replacements_used: 0,
        }
    }
}
