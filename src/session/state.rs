use super::participant::Participant;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Waiting,
    Voting,
    Revealed,
}

/// The replicated session singleton.
///
/// `participants_snapshot` is captured once at reveal time, after reward
/// distribution, so the reveal view stays stable while people churn; it is
/// cleared on reset. `facilitator_id` records who started the session and
/// only matters when facilitator-only controls are configured.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub status: Status,
    pub facilitator_id: Option<String>,
    pub participants: Vec<String>,
    pub participants_snapshot: Option<Vec<Participant>>,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Status::Waiting => "waiting",
                Status::Voting => "voting",
                Status::Revealed => "revealed",
            }
        )
    }
}
