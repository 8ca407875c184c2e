//! Integration tests for the full event-sourced pipeline.
//!
//! Command → repository → event store → bus → directory read model,
//! plus the optimistic concurrency and tombstone behavior of the
//! repository itself.

use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

use chrono::Utc;
use serde_json::json;

use draftleague_core::{AggregateRoot, PlayerId, TournamentId, TrackerId};
use draftleague_events::{Command, EventBus, EventSourced, InMemoryEventBus, Projection};
use draftleague_players::Role;
use draftleague_tournaments::{Phase, Tournament};
use draftleague_trackers::Tracker;

use crate::event_store::{EventStore, InMemoryEventStore, PublishingStore};
use crate::projections::Directory;
use crate::repository::{self, RepositoryError};
use crate::services::{
    CommandService, ServiceError, ACTION_CHANGE_FORMAT, ACTION_CHANGE_GAMES_TO_WIN,
    ACTION_CHANGE_NAME, ACTION_END_GAME, ACTION_END_PHASE, ACTION_REGISTER_PLAYER, ARG_FORMAT,
    ARG_GAME, ARG_GAMES_TO_WIN, ARG_MATCH, ARG_NAME, ARG_PLAYER_ID,
};

type FeedStore = Arc<PublishingStore<InMemoryEventStore, Arc<InMemoryEventBus>>>;

fn setup() -> (CommandService<FeedStore>, Arc<Directory>) {
    let bus: Arc<InMemoryEventBus> = Arc::new(InMemoryEventBus::new());
    let store: FeedStore = Arc::new(PublishingStore::new(InMemoryEventStore::new(), bus.clone()));
    let directory = Arc::new(Directory::new());

    // Subscribe the directory to the feed BEFORE any events are published.
    let dir = directory.clone();
    let (ready_tx, ready_rx) = mpsc::channel::<()>();
    thread::spawn(move || {
        let sub = bus.subscribe();
        let _ = ready_tx.send(());
        while let Ok(record) = sub.recv() {
            dir.on(&record);
        }
    });
    let _ = ready_rx.recv_timeout(Duration::from_secs(1));

    (CommandService::new(store, directory.clone()), directory)
}

/// The directory is an eventually consistent reader; give the subscriber
/// thread a moment to drain the feed.
fn wait_for_feed() {
    thread::sleep(Duration::from_millis(50));
}

#[test]
fn save_and_load_round_trip_an_aggregate() {
    let store = InMemoryEventStore::new();

    let mut trn = Tournament::default();
    trn.create(TournamentId::from("trn-1"), Utc::now()).unwrap();
    trn.change_name("Cube Night", Utc::now()).unwrap();
    repository::save(&store, &mut trn, None).unwrap();
    assert!(trn.changes().is_empty());

    let loaded: Tournament = repository::load(&store, "trn-1").unwrap();
    assert_eq!(loaded.name(), "Cube Night");
    assert_eq!(loaded.version(), 2);
    assert_eq!(loaded.version(), trn.version());
}

#[test]
fn save_without_pending_events_is_a_no_op() {
    let store = InMemoryEventStore::new();
    let mut trn = Tournament::default();
    trn.create(TournamentId::from("trn-1"), Utc::now()).unwrap();
    repository::save(&store, &mut trn, None).unwrap();

    repository::save(&store, &mut trn, None).unwrap();
    assert_eq!(store.load("trn-1").unwrap().len(), 1);
}

#[test]
fn loading_an_unknown_stream_is_not_found() {
    let store = InMemoryEventStore::new();
    let err = repository::load::<Tournament, _>(&store, "nope").unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound(_)));
}

#[test]
fn loading_a_tombstoned_aggregate_surfaces_deleted() {
    let store = InMemoryEventStore::new();
    let mut trn = Tournament::default();
    trn.create(TournamentId::from("trn-1"), Utc::now()).unwrap();
    trn.delete(Utc::now()).unwrap();
    repository::save(&store, &mut trn, None).unwrap();

    let err = repository::load::<Tournament, _>(&store, "trn-1").unwrap_err();
    assert!(matches!(err, RepositoryError::Deleted(_)));
}

#[test]
fn a_stale_save_conflicts_and_leaves_pending_events_intact() {
    let store = InMemoryEventStore::new();
    let mut trn = Tournament::default();
    trn.create(TournamentId::from("trn-1"), Utc::now()).unwrap();
    repository::save(&store, &mut trn, None).unwrap();

    let mut first: Tournament = repository::load(&store, "trn-1").unwrap();
    let mut second: Tournament = repository::load(&store, "trn-1").unwrap();

    first.change_name("First", Utc::now()).unwrap();
    repository::save(&store, &mut first, None).unwrap();

    second.change_name("Second", Utc::now()).unwrap();
    let err = repository::save(&store, &mut second, None).unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict(_)));
    assert_eq!(second.changes().len(), 1);

    // The caller's contract: reload, re-apply, re-save.
    let mut retried: Tournament = repository::load(&store, "trn-1").unwrap();
    retried.change_name("Second", Utc::now()).unwrap();
    repository::save(&store, &mut retried, None).unwrap();

    let latest: Tournament = repository::load(&store, "trn-1").unwrap();
    assert_eq!(latest.name(), "Second");
}

#[test]
fn writers_to_different_streams_never_contend() {
    let store = InMemoryEventStore::new();

    let mut a = Tournament::default();
    a.create(TournamentId::from("trn-a"), Utc::now()).unwrap();
    let mut b = Tournament::default();
    b.create(TournamentId::from("trn-b"), Utc::now()).unwrap();

    repository::save(&store, &mut a, None).unwrap();
    repository::save(&store, &mut b, None).unwrap();

    assert_eq!(store.load("trn-a").unwrap().len(), 1);
    assert_eq!(store.load("trn-b").unwrap().len(), 1);
}

#[test]
fn metadata_rides_along_with_every_appended_record() {
    let store = InMemoryEventStore::new();
    let mut trn = Tournament::default();
    trn.create(TournamentId::from("trn-1"), Utc::now()).unwrap();
    repository::save(&store, &mut trn, Some(&json!({"actor": "tests"}))).unwrap();

    let records = store.load("trn-1").unwrap();
    assert_eq!(records[0].metadata, Some(json!({"actor": "tests"})));
}

#[test]
fn the_directory_follows_the_published_feed() {
    let (service, directory) = setup();

    service
        .create_tournament(&TournamentId::from("trn-1"))
        .unwrap();
    service
        .tournament_command(
            &TournamentId::from("trn-1"),
            &Command::new(ACTION_CHANGE_NAME).with(ARG_NAME, "Cube Night"),
        )
        .unwrap();
    wait_for_feed();

    assert!(!directory.is_tournament_name_available("Cube Night"));
    let summary = directory
        .find_tournament(&TournamentId::from("trn-1"))
        .unwrap();
    assert_eq!(summary.name, "Cube Night");
    assert_eq!(summary.phase, "initialization");
}

#[test]
fn unknown_actions_fail_with_unrecognized_action() {
    let (service, _) = setup();
    service
        .create_tournament(&TournamentId::from("trn-1"))
        .unwrap();

    let err = service
        .tournament_command(&TournamentId::from("trn-1"), &Command::new("promote"))
        .unwrap_err();
    match err {
        ServiceError::Domain(e) => assert_eq!(e.kind(), "unrecognized-action"),
        other => panic!("expected a domain error, got {other:?}"),
    }
}

#[test]
fn a_full_tournament_feeds_both_players_trackers() {
    let (service, directory) = setup();
    let tid = TournamentId::from("trn-1");
    let alice = PlayerId::from("alice");
    let bob = PlayerId::from("bob");

    let alice_tracker = service
        .create_player(&alice, Role::Participant, "alice@example.com", "hash")
        .unwrap();
    let bob_tracker = service
        .create_player(&bob, Role::Participant, "bob@example.com", "hash")
        .unwrap();
    wait_for_feed();
    assert_eq!(directory.tracker_of(&alice), Some(alice_tracker.clone()));

    service.create_tournament(&tid).unwrap();
    let commands = [
        Command::new(ACTION_CHANGE_NAME).with(ARG_NAME, "Cube Night"),
        Command::new(ACTION_CHANGE_FORMAT).with(ARG_FORMAT, "cube"),
        Command::new(ACTION_CHANGE_GAMES_TO_WIN).with(ARG_GAMES_TO_WIN, 2),
        Command::new(ACTION_END_PHASE),
        Command::new(ACTION_REGISTER_PLAYER).with(ARG_PLAYER_ID, "alice"),
        Command::new(ACTION_REGISTER_PLAYER).with(ARG_PLAYER_ID, "bob"),
        Command::new(ACTION_END_PHASE),
        Command::new(ACTION_END_PHASE),
    ];
    for command in &commands {
        service.tournament_command(&tid, command).unwrap();
    }

    // Game one through the command surface, game two through the service.
    service
        .tournament_command(
            &tid,
            &Command::new(ACTION_END_GAME)
                .with(ARG_MATCH, 0)
                .with(ARG_GAME, 0)
                .with(ARG_PLAYER_ID, "alice"),
        )
        .unwrap();
    service.end_game(&tid, 0, 1, alice.clone(), false).unwrap();
    service
        .tournament_command(&tid, &Command::new(ACTION_END_PHASE))
        .unwrap();

    let trn: Tournament = repository::load(service.store(), "trn-1").unwrap();
    assert_eq!(trn.phase(), Phase::Ended);
    assert!(trn.end().is_some());
    assert_eq!(trn.standings()[0].player, alice);

    let trk: Tracker = repository::load(service.store(), alice_tracker.as_str()).unwrap();
    assert_eq!(
        (trk.games(), trk.game_wins(), trk.matches(), trk.match_wins()),
        (2, 2, 1, 1)
    );
    let trk: Tracker = repository::load(service.store(), bob_tracker.as_str()).unwrap();
    assert_eq!(
        (trk.games(), trk.game_wins(), trk.matches(), trk.match_wins()),
        (2, 0, 1, 0)
    );
}

#[test]
fn registering_an_unknown_player_is_rejected_by_the_directory() {
    let (service, _) = setup();
    let tid = TournamentId::from("trn-1");
    service.create_tournament(&tid).unwrap();
    for command in [
        Command::new(ACTION_CHANGE_FORMAT).with(ARG_FORMAT, "cube"),
        Command::new(ACTION_CHANGE_GAMES_TO_WIN).with(ARG_GAMES_TO_WIN, 2),
        Command::new(ACTION_END_PHASE),
    ] {
        service.tournament_command(&tid, &command).unwrap();
    }

    let err = service
        .tournament_command(
            &tid,
            &Command::new(ACTION_REGISTER_PLAYER).with(ARG_PLAYER_ID, "ghost"),
        )
        .unwrap_err();
    match err {
        ServiceError::Domain(e) => assert_eq!(e.kind(), "not-found"),
        other => panic!("expected a domain error, got {other:?}"),
    }
}

#[test]
fn a_tracker_append_failure_does_not_undo_the_tournament_event() {
    // Build a tournament whose players never got Player aggregates, so the
    // tracker leg of end_game must fail while the tournament append stands.
    let (service, _) = setup();
    let tid = TournamentId::from("trn-1");

    let mut trn = Tournament::default();
    trn.create(tid.clone(), Utc::now()).unwrap();
    trn.change_format(draftleague_tournaments::Format::Cube, Utc::now())
        .unwrap();
    trn.change_games_to_win(1, Utc::now()).unwrap();
    trn.end_phase(Utc::now()).unwrap();
    trn.register_player(PlayerId::from("ghost-1"), Utc::now())
        .unwrap();
    trn.register_player(PlayerId::from("ghost-2"), Utc::now())
        .unwrap();
    trn.end_phase(Utc::now()).unwrap();
    trn.end_phase(Utc::now()).unwrap();
    repository::save(service.store(), &mut trn, None).unwrap();

    let err = service
        .end_game(&tid, 0, 0, PlayerId::from("ghost-1"), false)
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Repository(RepositoryError::NotFound(_))
    ));

    // The tournament stream kept the game result; only the tracker leg is
    // missing and can be retried.
    let trn: Tournament = repository::load(service.store(), "trn-1").unwrap();
    assert!(trn.matches()[0].ended);
}

#[test]
fn tracker_ids_are_fresh_per_player() {
    let (service, _) = setup();
    let a = service
        .create_player(&PlayerId::from("a"), Role::Organizer, "a@x", "h")
        .unwrap();
    let b = service
        .create_player(&PlayerId::from("b"), Role::Participant, "b@x", "h")
        .unwrap();
    assert_ne!(a, b);
    assert_ne!(a, TrackerId::default());
}
