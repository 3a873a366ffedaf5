use super::participant::Participant;
use super::state::{SessionState, Status};
use crate::cards::{showdown, Contender, Winner};
use crate::host::{Clock, Identity, Notifier, SyncedCell, SyncedMap, User};
use crate::quality::{replace_random, reward};
use crate::voting::{tally, Estimate, Vote, VoteResult};
use std::time::Duration;

const NOTIFY_SHORT: Duration = Duration::from_millis(3000);
const NOTIFY_LONG: Duration = Duration::from_millis(5000);

/// Session policy knobs.
///
/// `poker_enabled` gates the whole reward meta-game; `restrict_controls`
/// makes reveal/reset facilitator-only instead of open to any participant.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    pub poker_enabled: bool,
    pub restrict_controls_to_facilitator: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poker_enabled: true,
            restrict_controls_to_facilitator: false,
        }
    }
}

/// Orchestrates the session lifecycle over host-replicated state.
///
/// One controller per connected client; all controllers share the same
/// replicated maps and session singleton. Every public operation degrades
/// to a no-op plus a log line rather than panicking or propagating: a
/// failure here would take the host's whole render cycle down with it.
pub struct SessionController<'a> {
    identity: &'a dyn Identity,
    clock: &'a dyn Clock,
    notifier: &'a dyn Notifier,
    participants: &'a dyn SyncedMap<Participant>,
    votes: &'a dyn SyncedMap<Vote>,
    session: &'a dyn SyncedCell<SessionState>,
    poker_revealed: &'a dyn SyncedCell<bool>,
    config: SessionConfig,
}

impl<'a> SessionController<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        identity: &'a dyn Identity,
        clock: &'a dyn Clock,
        notifier: &'a dyn Notifier,
        participants: &'a dyn SyncedMap<Participant>,
        votes: &'a dyn SyncedMap<Vote>,
        session: &'a dyn SyncedCell<SessionState>,
        poker_revealed: &'a dyn SyncedCell<bool>,
        config: SessionConfig,
    ) -> Self {
        Self {
            identity,
            clock,
            notifier,
            participants,
            votes,
            session,
            poker_revealed,
            config,
        }
    }

    /// Moves the session into voting with the caller as first participant.
    ///
    /// Rejoin-safe: an existing record for this user keeps its hand, its
    /// replacement counter, and its original join time.
    pub fn start(&self) {
        let user = self.resolve_user();
        log::debug!("starting session as {} ({})", user.name, user.id);
        self.upsert_participant(&user);
        self.session.set(SessionState {
            status: Status::Voting,
            facilitator_id: Some(user.id.clone()),
            participants: vec![user.id],
            participants_snapshot: None,
        });
    }

    /// Registers the caller without touching session status.
    pub fn join(&self) {
        let user = self.resolve_user();
        self.upsert_participant(&user);
        let mut state = self.session.get();
        if !state.participants.contains(&user.id) {
            state.participants.push(user.id);
            self.session.set(state);
        }
    }

    /// Casts or re-casts the caller's vote for this round.
    pub fn cast(&self, value: Estimate) {
        let Some(user) = self.identity.current_user() else {
            log::warn!("vote abandoned: current user unavailable");
            return;
        };
        self.votes.set(
            &user.id,
            Vote {
                user_id: user.id.clone(),
                user_name: user.name,
                value,
                timestamp: self.clock.now_millis(),
            },
        );
    }

    /// Deselects the caller's vote.
    pub fn retract(&self) {
        let Some(user) = self.identity.current_user() else {
            log::warn!("retract abandoned: current user unavailable");
            return;
        };
        self.votes.delete(&user.id);
    }

    /// Current grouped results, recomputed from the shared vote map.
    pub fn results(&self) -> Vec<VoteResult> {
        tally(self.votes)
    }

    /// Reveals the round: distributes reward cards to every voter, then
    /// snapshots the participant roster and flips status to revealed.
    ///
    /// Refused with a toast when nothing has been voted yet.
    pub fn reveal(&self, results: &[VoteResult]) {
        let Some(user) = self.identity.current_user() else {
            log::warn!("reveal abandoned: current user unavailable");
            return;
        };
        if self.votes.is_empty() {
            log::debug!("cannot reveal results: no votes cast");
            self.notifier.notify(
                "Cannot reveal results - no votes have been cast yet!",
                NOTIFY_SHORT,
            );
            return;
        }
        if !self.may_control(&user) {
            self.notifier
                .notify("Only the facilitator can reveal results.", NOTIFY_SHORT);
            return;
        }
        if self.config.poker_enabled {
            self.distribute_rewards(results);
        } else {
            log::debug!("poker disabled, skipping card distribution");
        }
        let state = self.session.get();
        let snapshot = self.snapshot(&state);
        self.session.set(SessionState {
            status: Status::Revealed,
            participants_snapshot: Some(snapshot),
            ..state
        });
    }

    /// Starts the next round: clears votes and replacement counters (hands
    /// are kept), drops the snapshot, and returns to voting.
    pub fn reset(&self) {
        let Some(user) = self.identity.current_user() else {
            log::warn!("reset abandoned: current user unavailable");
            return;
        };
        if !self.may_control(&user) {
            self.notifier
                .notify("Only the facilitator can start a new round.", NOTIFY_SHORT);
            return;
        }
        log::debug!("resetting session");
        for key in self.votes.keys() {
            self.votes.delete(&key);
        }
        for id in self.participants.keys() {
            if let Some(participant) = self.participants.get(&id) {
                self.participants.set(
                    &id,
                    Participant {
                        card_replacements_used: 0,
                        ..participant
                    },
                );
            }
        }
        let state = self.session.get();
        self.session.set(SessionState {
            status: Status::Voting,
            participants_snapshot: None,
            ..state
        });
        self.poker_revealed.set(false);
    }

    /// Swaps one random card in the caller's hand, at most once per round.
    pub fn replace_card(&self) {
        let Some(user) = self.identity.current_user() else {
            log::warn!("card replacement abandoned: current user unavailable");
            return;
        };
        let participant = self.participants.get(&user.id);
        let Some(participant) = participant.filter(|p| !p.cards.is_empty()) else {
            log::debug!("no cards to replace for {}", user.id);
            self.notifier
                .notify("You don't have any cards to replace.", NOTIFY_LONG);
            return;
        };
        if participant.card_replacements_used >= 1 {
            self.notifier.notify(
                "You can only replace one card per turn. Wait for the next round!",
                NOTIFY_LONG,
            );
            return;
        }
        let cards = replace_random(&participant.cards);
        self.notifier.notify(
            &format!("Replaced one card! You now have {} cards.", cards.len()),
            NOTIFY_LONG,
        );
        self.participants.set(
            &user.id,
            Participant {
                cards,
                card_replacements_used: participant.card_replacements_used + 1,
                ..participant
            },
        );
    }

    /// Runs the poker showdown over the reveal snapshot and marks the
    /// results as shown. None before reveal or when nobody holds cards.
    pub fn poker_showdown(&self) -> Option<Winner> {
        let snapshot = self.session.get().participants_snapshot?;
        let contenders = snapshot
            .iter()
            .filter(|p| !p.cards.is_empty())
            .map(|p| Contender {
                user_id: p.user_id.clone(),
                user_name: p.user_name.clone(),
                cards: p.cards.clone(),
            })
            .collect::<Vec<_>>();
        let winner = showdown(&contenders);
        if winner.is_some() {
            self.poker_revealed.set(true);
        }
        winner
    }

    fn distribute_rewards(&self, results: &[VoteResult]) {
        let current = self.identity.current_user();
        for voter_id in self.votes.keys() {
            let (Some(participant), Some(vote)) =
                (self.participants.get(&voter_id), self.votes.get(&voter_id))
            else {
                continue;
            };
            let outcome = reward(&participant.cards, &vote.value, results);
            log::debug!(
                "awarded card to {} (voted {}), hand now {} - {}",
                participant.user_name,
                vote.value,
                outcome.cards.len(),
                outcome.reason,
            );
            if current.as_ref().map(|u| u.id == voter_id).unwrap_or(false) {
                self.notifier.notify(&outcome.reason, NOTIFY_LONG);
            }
            self.participants.set(
                &voter_id,
                Participant {
                    cards: outcome.cards,
                    ..participant
                },
            );
        }
    }

    /// Roster captured at reveal time: the host's live active-user list
    /// mapped through stored records, or the tracked participant list when
    /// the host cannot answer.
    fn snapshot(&self, state: &SessionState) -> Vec<Participant> {
        match self.identity.active_users() {
            Ok(users) if !users.is_empty() => users
                .into_iter()
                .map(|user| {
                    let stored = self.participants.get(&user.id);
                    Participant {
                        user_id: user.id.clone(),
                        user_name: if user.name.is_empty() {
                            "Anonymous".to_string()
                        } else {
                            user.name
                        },
                        joined_at: stored
                            .as_ref()
                            .map(|p| p.joined_at)
                            .unwrap_or_else(|| self.clock.now_millis()),
                        last_active_time: stored.as_ref().and_then(|p| p.last_active_time),
                        cards: stored.as_ref().map(|p| p.cards.clone()).unwrap_or_default(),
                        card_replacements_used: stored
                            .map(|p| p.card_replacements_used)
                            .unwrap_or(0),
                    }
                })
                .collect(),
            Ok(_) => self.tracked(state),
            Err(e) => {
                log::warn!("active users unavailable, snapshotting tracked roster: {}", e);
                self.tracked(state)
            }
        }
    }

    fn tracked(&self, state: &SessionState) -> Vec<Participant> {
        state
            .participants
            .iter()
            .filter_map(|id| self.participants.get(id))
            .collect()
    }

    fn may_control(&self, user: &User) -> bool {
        !self.config.restrict_controls_to_facilitator
            || self.session.get().facilitator_id.as_deref() == Some(user.id.as_str())
    }

    fn resolve_user(&self) -> User {
        self.identity.current_user().unwrap_or_else(|| {
            let id = format!("user-{}", self.clock.now_millis());
            log::warn!("current user unavailable, generated fallback id {}", id);
            User {
                id,
                name: "Anonymous".to_string(),
            }
        })
    }

    fn upsert_participant(&self, user: &User) {
        let now = self.clock.now_millis();
        let prior = self.participants.get(&user.id);
        if let Some(prior) = &prior {
            log::debug!(
                "{} rejoined with {} existing cards",
                user.id,
                prior.cards.len()
            );
        }
        self.participants.set(
            &user.id,
            Participant {
                user_id: user.id.clone(),
                user_name: user.name.clone(),
                joined_at: prior.as_ref().map(|p| p.joined_at).unwrap_or(now),
                last_active_time: Some(now),
                cards: prior.as_ref().map(|p| p.cards.clone()).unwrap_or_default(),
                card_replacements_used: prior.map(|p| p.card_replacements_used).unwrap_or(0),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, Rank, Suit};
    use crate::host::{ManualClock, MemoryCell, MemoryMap, RecordingNotifier, StaticIdentity};
    use crate::voting::Joker;

    struct Host {
        clock: ManualClock,
        notifier: RecordingNotifier,
        participants: MemoryMap<Participant>,
        votes: MemoryMap<Vote>,
        session: MemoryCell<SessionState>,
        poker_revealed: MemoryCell<bool>,
    }

    impl Host {
        fn new() -> Self {
            Self {
                clock: ManualClock::at(1_000),
                notifier: RecordingNotifier::new(),
                participants: MemoryMap::new(),
                votes: MemoryMap::new(),
                session: MemoryCell::new(SessionState::default()),
                poker_revealed: MemoryCell::new(false),
            }
        }

        fn controller<'a>(
            &'a self,
            identity: &'a StaticIdentity,
            config: SessionConfig,
        ) -> SessionController<'a> {
            SessionController::new(
                identity,
                &self.clock,
                &self.notifier,
                &self.participants,
                &self.votes,
                &self.session,
                &self.poker_revealed,
                config,
            )
        }
    }

    fn user(id: &str, name: &str) -> User {
        User {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn hearts(n: usize) -> Vec<Card> {
        Rank::all()
            .iter()
            .take(n)
            .map(|&r| Card::new(r, Suit::Hearts))
            .collect()
    }

    #[test]
    fn reveal_with_no_votes_is_refused() {
        let host = Host::new();
        let alice = StaticIdentity::new(Some(user("u1", "Alice")));
        let ctl = host.controller(&alice, SessionConfig::default());
        ctl.start();
        ctl.reveal(&[]);
        assert_eq!(host.session.get().status, Status::Voting);
        assert_eq!(host.session.get().participants_snapshot, None);
        assert_eq!(
            host.notifier.last().unwrap(),
            "Cannot reveal results - no votes have been cast yet!"
        );
    }

    #[test]
    fn rejoin_keeps_hand_and_join_time() {
        let host = Host::new();
        let alice = StaticIdentity::new(Some(user("u1", "Alice")));
        let ctl = host.controller(&alice, SessionConfig::default());
        ctl.start();
        let mut stored = host.participants.get("u1").unwrap();
        stored.cards = hearts(3);
        stored.card_replacements_used = 1;
        host.participants.set("u1", stored);
        host.clock.advance(5_000);
        ctl.join();
        let rejoined = host.participants.get("u1").unwrap();
        assert_eq!(rejoined.cards.len(), 3);
        assert_eq!(rejoined.card_replacements_used, 1);
        assert_eq!(rejoined.joined_at, 1_000);
        assert_eq!(rejoined.last_active_time, Some(6_000));
    }

    #[test]
    fn reveal_distributes_cards_and_snapshots() {
        let host = Host::new();
        let alice = StaticIdentity::new(Some(user("u1", "Alice")));
        let ctl = host.controller(&alice, SessionConfig::default());
        ctl.start();
        ctl.cast(Estimate::Points(5.0));
        let results = ctl.results();
        ctl.reveal(&results);
        let state = host.session.get();
        assert_eq!(state.status, Status::Revealed);
        let snapshot = state.participants_snapshot.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].cards.len(), 1);
        assert_eq!(host.participants.get("u1").unwrap().cards.len(), 1);
        assert!(host.notifier.last().is_some());
    }

    #[test]
    fn reveal_with_poker_disabled_still_snapshots() {
        let host = Host::new();
        let alice = StaticIdentity::new(Some(user("u1", "Alice")));
        let config = SessionConfig {
            poker_enabled: false,
            ..SessionConfig::default()
        };
        let ctl = host.controller(&alice, config);
        ctl.start();
        ctl.cast(Estimate::Points(8.0));
        let results = ctl.results();
        ctl.reveal(&results);
        let state = host.session.get();
        assert_eq!(state.status, Status::Revealed);
        assert!(state.participants_snapshot.is_some());
        assert!(host.participants.get("u1").unwrap().cards.is_empty());
    }

    #[test]
    fn facilitator_restriction_blocks_other_participants() {
        let host = Host::new();
        let alice = StaticIdentity::new(Some(user("u1", "Alice")));
        let bob = StaticIdentity::new(Some(user("u2", "Bob")));
        let config = SessionConfig {
            restrict_controls_to_facilitator: true,
            ..SessionConfig::default()
        };
        let facilitator = host.controller(&alice, config);
        let member = host.controller(&bob, config);
        facilitator.start();
        member.join();
        member.cast(Estimate::Points(3.0));
        let results = member.results();
        member.reveal(&results);
        assert_eq!(host.session.get().status, Status::Voting);
        assert_eq!(
            host.notifier.last().unwrap(),
            "Only the facilitator can reveal results."
        );
        facilitator.reveal(&results);
        assert_eq!(host.session.get().status, Status::Revealed);
    }

    #[test]
    fn one_replacement_per_round() {
        let host = Host::new();
        let alice = StaticIdentity::new(Some(user("u1", "Alice")));
        let ctl = host.controller(&alice, SessionConfig::default());
        ctl.start();
        let mut stored = host.participants.get("u1").unwrap();
        stored.cards = hearts(3);
        host.participants.set("u1", stored);
        ctl.replace_card();
        assert_eq!(
            host.participants.get("u1").unwrap().card_replacements_used,
            1
        );
        assert_eq!(
            host.notifier.last().unwrap(),
            "Replaced one card! You now have 3 cards."
        );
        ctl.replace_card();
        assert_eq!(
            host.participants.get("u1").unwrap().card_replacements_used,
            1
        );
        assert_eq!(
            host.notifier.last().unwrap(),
            "You can only replace one card per turn. Wait for the next round!"
        );
    }

    #[test]
    fn replacement_without_cards_is_refused() {
        let host = Host::new();
        let alice = StaticIdentity::new(Some(user("u1", "Alice")));
        let ctl = host.controller(&alice, SessionConfig::default());
        ctl.start();
        ctl.replace_card();
        assert_eq!(
            host.notifier.last().unwrap(),
            "You don't have any cards to replace."
        );
        assert_eq!(
            host.participants.get("u1").unwrap().card_replacements_used,
            0
        );
    }

    #[test]
    fn reset_clears_votes_and_counters_but_not_hands() {
        let host = Host::new();
        let alice = StaticIdentity::new(Some(user("u1", "Alice")));
        let ctl = host.controller(&alice, SessionConfig::default());
        ctl.start();
        ctl.cast(Estimate::Special(Joker::Coffee));
        let mut stored = host.participants.get("u1").unwrap();
        stored.cards = hearts(2);
        stored.card_replacements_used = 1;
        host.participants.set("u1", stored);
        let results = ctl.results();
        ctl.reveal(&results);
        ctl.reset();
        let state = host.session.get();
        assert_eq!(state.status, Status::Voting);
        assert_eq!(state.participants_snapshot, None);
        assert!(host.votes.is_empty());
        assert!(!host.poker_revealed.get());
        let participant = host.participants.get("u1").unwrap();
        assert_eq!(participant.card_replacements_used, 0);
        assert!(!participant.cards.is_empty());
    }

    #[test]
    fn snapshot_falls_back_to_tracked_roster_on_host_error() {
        let host = Host::new();
        let alice = StaticIdentity::new(Some(user("u1", "Alice")));
        let ctl = host.controller(&alice, SessionConfig::default());
        ctl.start();
        ctl.cast(Estimate::Points(5.0));
        alice.fail_active_users(true);
        let results = ctl.results();
        ctl.reveal(&results);
        let snapshot = host.session.get().participants_snapshot.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].user_id, "u1");
    }

    #[test]
    fn snapshot_prefers_live_active_users() {
        let host = Host::new();
        let alice = StaticIdentity::new(Some(user("u1", "Alice")));
        let bob = StaticIdentity::new(Some(user("u2", "Bob")));
        let ctl = host.controller(&alice, SessionConfig::default());
        let member = host.controller(&bob, SessionConfig::default());
        ctl.start();
        member.join();
        ctl.cast(Estimate::Points(5.0));
        alice.set_active_users(vec![user("u1", "Alice"), user("u2", "Bob")]);
        let results = ctl.results();
        ctl.reveal(&results);
        let snapshot = host.session.get().participants_snapshot.unwrap();
        assert_eq!(snapshot.len(), 2);
        let names = snapshot.iter().map(|p| p.user_name.clone()).collect::<Vec<_>>();
        assert!(names.contains(&"Alice".to_string()));
        assert!(names.contains(&"Bob".to_string()));
    }

    #[test]
    fn retract_removes_the_vote() {
        let host = Host::new();
        let alice = StaticIdentity::new(Some(user("u1", "Alice")));
        let ctl = host.controller(&alice, SessionConfig::default());
        ctl.start();
        ctl.cast(Estimate::Points(13.0));
        assert_eq!(host.votes.len(), 1);
        ctl.retract();
        assert!(host.votes.is_empty());
    }

    #[test]
    fn showdown_needs_a_snapshot() {
        let host = Host::new();
        let alice = StaticIdentity::new(Some(user("u1", "Alice")));
        let ctl = host.controller(&alice, SessionConfig::default());
        ctl.start();
        assert!(ctl.poker_showdown().is_none());
        assert!(!host.poker_revealed.get());
        ctl.cast(Estimate::Points(5.0));
        let results = ctl.results();
        ctl.reveal(&results);
        let winner = ctl.poker_showdown().unwrap();
        assert_eq!(winner.user_id, "u1");
        assert!(host.poker_revealed.get());
    }

    #[test]
    fn anonymous_start_generates_a_user() {
        let host = Host::new();
        let nobody = StaticIdentity::new(None);
        let ctl = host.controller(&nobody, SessionConfig::default());
        ctl.start();
        let state = host.session.get();
        assert_eq!(state.status, Status::Voting);
        assert_eq!(state.participants, vec!["user-1000".to_string()]);
        let stored = host.participants.get("user-1000").unwrap();
        assert_eq!(stored.user_name, "Anonymous");
    }
}
