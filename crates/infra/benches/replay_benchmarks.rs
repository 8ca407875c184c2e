use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chrono::Utc;

use draftleague_core::{PlayerId, TournamentId};
use draftleague_infra::event_store::InMemoryEventStore;
use draftleague_infra::repository;
use draftleague_tournaments::{schedule, Format, Tournament};

/// Build a finished two-player tournament with `games` decided games spread
/// over repeated best-of-one matches, persisted to a fresh store.
fn seeded_store(games: u32) -> InMemoryEventStore {
    let store = InMemoryEventStore::new();
    let mut trn = Tournament::default();
    trn.create(TournamentId::from("bench"), Utc::now()).unwrap();
    trn.change_format(Format::Cube, Utc::now()).unwrap();
    trn.change_games_to_win(games, Utc::now()).unwrap();
    trn.end_phase(Utc::now()).unwrap();
    trn.register_player(PlayerId::from("a"), Utc::now()).unwrap();
    trn.register_player(PlayerId::from("b"), Utc::now()).unwrap();
    trn.end_phase(Utc::now()).unwrap();
    trn.end_phase(Utc::now()).unwrap();

    for game in 0..games as usize {
        trn.end_game(0, game, PlayerId::from("a"), false, Utc::now())
            .unwrap();
    }

    repository::save(&store, &mut trn, None).unwrap();
    store
}

fn bench_stream_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream_replay");
    for games in [16u32, 64, 256] {
        let store = seeded_store(games);
        group.throughput(Throughput::Elements(u64::from(games)));
        group.bench_with_input(BenchmarkId::from_parameter(games), &store, |b, store| {
            b.iter(|| {
                let trn: Tournament = repository::load(store, "bench").unwrap();
                black_box(trn.version())
            });
        });
    }
    group.finish();
}

fn bench_round_robin_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("round_robin");
    for n in [8usize, 32, 128] {
        group.throughput(Throughput::Elements((n * (n - 1) / 2) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| black_box(schedule::round_robin_pairings(n).len()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_stream_replay, bench_round_robin_generation);
criterion_main!(benches);
