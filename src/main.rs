use planpoker::host::{
    ManualClock, MemoryCell, MemoryMap, RecordingNotifier, StaticIdentity, SyncedMap, User,
};
use planpoker::session::{
    Participant, PollState, Presence, SessionConfig, SessionController, SessionState,
};
use planpoker::voting::{Estimate, Joker, Vote};

/// Scripted walkthrough of a session: three estimators, two rounds, a card
/// replacement, and a closing poker showdown over the collected hands.
fn main() {
    env_logger::init();

    let clock = ManualClock::at(1_000);
    let notifier = RecordingNotifier::new();
    let participants = MemoryMap::<Participant>::new();
    let votes = MemoryMap::<Vote>::new();
    let session = MemoryCell::new(SessionState::default());
    let poker_revealed = MemoryCell::new(false);

    let roster = [
        User { id: "u1".to_string(), name: "Alice".to_string() },
        User { id: "u2".to_string(), name: "Bob".to_string() },
        User { id: "u3".to_string(), name: "Carol".to_string() },
    ];
    let identities = roster
        .iter()
        .map(|u| StaticIdentity::new(Some(u.clone())))
        .collect::<Vec<_>>();
    identities[0].set_active_users(roster.to_vec());

    let clients = identities
        .iter()
        .map(|identity| {
            SessionController::new(
                identity,
                &clock,
                &notifier,
                &participants,
                &votes,
                &session,
                &poker_revealed,
                SessionConfig::default(),
            )
        })
        .collect::<Vec<_>>();

    clients[0].start();
    clients[1].join();
    clients[2].join();

    for round in 1..=2 {
        if round == 1 {
            clients[0].cast(Estimate::Points(5.0));
            clients[1].cast(Estimate::Points(5.0));
            clients[2].cast(Estimate::Points(8.0));
        } else {
            clients[0].cast(Estimate::Points(3.0));
            clients[1].cast(Estimate::Special(Joker::Coffee));
            clients[2].cast(Estimate::Points(3.0));
        }
        let results = clients[0].results();
        println!(
            "round {} results: {}",
            round,
            serde_json::to_string_pretty(&results).unwrap()
        );
        clients[0].reveal(&results);
        if round == 1 {
            clients[1].replace_card();
        }
        clients[0].reset();
        clock.advance(60_000);
    }

    let mut poll = PollState::new();
    let presence = Presence::new(&identities[0], &clock, &participants, &votes, &session);
    if let Some(outcome) = presence.poll(&mut poll) {
        println!("presence sweep refreshed {} participants", outcome.refreshed.len());
    }

    for id in participants.keys() {
        if let Some(p) = participants.get(&id) {
            let hand = p
                .cards
                .iter()
                .map(|c| c.symbol())
                .collect::<Vec<_>>()
                .join(" ");
            println!("{} holds: {}", p.user_name, hand);
        }
    }

    clients[0].cast(Estimate::Points(1.0));
    let results = clients[0].results();
    clients[0].reveal(&results);
    match clients[0].poker_showdown() {
        Some(winner) => println!(
            "showdown winner: {} with {}",
            winner.user_name, winner.evaluation.ranking
        ),
        None => println!("no hands to show down"),
    }

    for toast in notifier.messages() {
        println!("toast: {}", toast);
    }
}
