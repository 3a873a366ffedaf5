use super::participant::Participant;
use super::state::{SessionState, Status};
use crate::host::{Clock, Identity, SyncedCell, SyncedMap, User};
use crate::voting::Vote;
use std::time::Duration;

/// cadence of the reconciliation poll
pub const POLL_INTERVAL: Duration = Duration::from_millis(2_000);
/// how long a departed participant's record survives before the sweep
pub const GRACE_PERIOD_MS: u64 = 10 * 60 * 1_000;

/// Explicit poll bookkeeping, owned by whoever drives the loop.
///
/// The reconciler itself is stateless across ticks; callers hold a
/// `PollState` per session so independent sessions in one process cannot
/// cross-contaminate each other's cadence or rosters.
#[derive(Debug, Default)]
pub struct PollState {
    last_poll_at: Option<u64>,
    last_active_ids: Vec<String>,
}

impl PollState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn due(&self, now: u64) -> bool {
        match self.last_poll_at {
            None => true,
            Some(last) => now.saturating_sub(last) >= POLL_INTERVAL.as_millis() as u64,
        }
    }

    fn mark(&mut self, now: u64) {
        self.last_poll_at = Some(now);
    }
}

/// What one reconciliation pass did, for logging and tests.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PollOutcome {
    pub joined: Vec<String>,
    pub left: Vec<String>,
    pub refreshed: Vec<String>,
    pub removed: Vec<String>,
    pub retained_voters: Vec<String>,
}

/// Reconciles the replicated participant map against host presence.
///
/// Runs only while the session is voting. Active users the map does not
/// know yet get a fresh record; known active users get their activity stamp
/// refreshed. Users who dropped off the host's list are NOT deleted on
/// departure, so a refresh or a flaky connection never costs anyone their
/// hand; instead a separate sweep removes records whose stamp is more than
/// ten minutes old, unless that user still has a vote in the current round,
/// in which case the vote wins and the record stays. Records with no stamp
/// at all are never swept.
pub struct Presence<'a> {
    identity: &'a dyn Identity,
    clock: &'a dyn Clock,
    participants: &'a dyn SyncedMap<Participant>,
    votes: &'a dyn SyncedMap<Vote>,
    session: &'a dyn SyncedCell<SessionState>,
}

impl<'a> Presence<'a> {
    pub fn new(
        identity: &'a dyn Identity,
        clock: &'a dyn Clock,
        participants: &'a dyn SyncedMap<Participant>,
        votes: &'a dyn SyncedMap<Vote>,
        session: &'a dyn SyncedCell<SessionState>,
    ) -> Self {
        Self {
            identity,
            clock,
            participants,
            votes,
            session,
        }
    }

    /// Runs a reconciliation pass if one is due. None outside the voting
    /// phase, before the interval elapses, or when the host cannot report
    /// presence this tick.
    pub fn poll(&self, state: &mut PollState) -> Option<PollOutcome> {
        if self.session.get().status != Status::Voting {
            return None;
        }
        let now = self.clock.now_millis();
        if !state.due(now) {
            return None;
        }
        state.mark(now);
        match self.identity.active_users() {
            Ok(active) => {
                let mut outcome = self.reconcile(&active, now);
                self.sweep(&active, now, &mut outcome);
                let active_ids = active.iter().map(|u| u.id.clone()).collect::<Vec<_>>();
                outcome.joined = active_ids
                    .iter()
                    .filter(|id| !state.last_active_ids.contains(id))
                    .cloned()
                    .collect();
                outcome.left = state
                    .last_active_ids
                    .iter()
                    .filter(|id| !active_ids.contains(id))
                    .cloned()
                    .collect();
                state.last_active_ids = active_ids;
                Some(outcome)
            }
            Err(e) => {
                log::warn!("presence poll skipped, host unavailable: {}", e);
                None
            }
        }
    }

    fn reconcile(&self, active: &[User], now: u64) -> PollOutcome {
        let mut outcome = PollOutcome::default();
        for user in active {
            match self.participants.get(&user.id) {
                Some(participant) => {
                    self.participants.set(
                        &user.id,
                        Participant {
                            last_active_time: Some(now),
                            ..participant
                        },
                    );
                    outcome.refreshed.push(user.id.clone());
                }
                None => {
                    log::debug!("presence discovered {} ({})", user.name, user.id);
                    self.participants.set(&user.id, Participant::new(user, now));
                    outcome.refreshed.push(user.id.clone());
                }
            }
        }
        outcome
    }

    fn sweep(&self, active: &[User], now: u64, outcome: &mut PollOutcome) {
        for id in self.participants.keys() {
            if active.iter().any(|u| u.id == id) {
                continue;
            }
            let Some(participant) = self.participants.get(&id) else {
                continue;
            };
            // unstamped legacy records are never swept
            let Some(last) = participant.last_active_time else {
                continue;
            };
            if now.saturating_sub(last) <= GRACE_PERIOD_MS {
                continue;
            }
            if self.votes.get(&id).is_some() {
                log::debug!("{} is stale but still has a vote, keeping", id);
                outcome.retained_voters.push(id);
            } else {
                log::debug!("sweeping stale participant {}", id);
                self.participants.delete(&id);
                self.drop_from_roster(&id);
                outcome.removed.push(id);
            }
        }
    }

    fn drop_from_roster(&self, id: &str) {
        let mut state = self.session.get();
        if let Some(position) = state.participants.iter().position(|p| p == id) {
            state.participants.remove(position);
            self.session.set(state);
        }
    }
}
