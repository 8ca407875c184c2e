//! The directory read model.
//!
//! Folds the global feed into queryable summaries of tournaments, players
//! and seasons. The command side uses it exclusively for validation-time
//! lookups (name availability, existence); it is eventually consistent and
//! never provides read-your-writes guarantees.

use std::collections::HashMap;
use std::sync::RwLock;

use draftleague_core::{PlayerId, SeasonId, TournamentId, TrackerId};
use draftleague_events::{Projection, Record};

/// Queryable tournament summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TournamentSummary {
    pub id: TournamentId,
    pub name: String,
    pub phase: String,
    pub deleted: bool,
}

/// Queryable player summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub name: String,
    pub role: String,
    pub tracker: TrackerId,
}

/// Queryable season summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonSummary {
    pub id: SeasonId,
    pub name: String,
    pub ongoing: bool,
    pub finished: bool,
}

#[derive(Debug, Default)]
struct State {
    version: u64,
    tournaments: HashMap<String, TournamentSummary>,
    players: HashMap<String, PlayerSummary>,
    seasons: HashMap<String, SeasonSummary>,
}

/// In-memory directory of everything the feed has announced so far.
#[derive(Debug, Default)]
pub struct Directory {
    inner: RwLock<State>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_all_tournaments(&self) -> Vec<TournamentSummary> {
        self.read(|s| {
            let mut all: Vec<_> = s
                .tournaments
                .values()
                .filter(|t| !t.deleted)
                .cloned()
                .collect();
            all.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
            all
        })
        .unwrap_or_default()
    }

    pub fn find_tournament(&self, id: &TournamentId) -> Option<TournamentSummary> {
        self.read(|s| s.tournaments.get(id.as_str()).cloned())
            .flatten()
    }

    pub fn is_tournament_name_available(&self, name: &str) -> bool {
        self.read(|s| {
            !s.tournaments
                .values()
                .any(|t| !t.deleted && t.name == name)
        })
        .unwrap_or(false)
    }

    pub fn find_player(&self, id: &PlayerId) -> Option<PlayerSummary> {
        self.read(|s| s.players.get(id.as_str()).cloned()).flatten()
    }

    pub fn player_exists(&self, id: &PlayerId) -> bool {
        self.read(|s| s.players.contains_key(id.as_str()))
            .unwrap_or(false)
    }

    pub fn is_player_name_available(&self, name: &str) -> bool {
        self.read(|s| !s.players.values().any(|p| p.name == name))
            .unwrap_or(false)
    }

    pub fn tracker_of(&self, player: &PlayerId) -> Option<TrackerId> {
        self.read(|s| s.players.get(player.as_str()).map(|p| p.tracker.clone()))
            .flatten()
    }

    pub fn find_season(&self, id: &SeasonId) -> Option<SeasonSummary> {
        self.read(|s| s.seasons.get(id.as_str()).cloned()).flatten()
    }

    fn read<T>(&self, f: impl FnOnce(&State) -> T) -> Option<T> {
        self.inner.read().ok().map(|s| f(&s))
    }

    fn fold(state: &mut State, record: &Record) {
        let stream = record.stream_id.as_str();
        let str_field = |name: &str| -> String {
            record
                .data
                .get(name)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };

        match record.event_type.as_str() {
            "tournament:created" => {
                state.tournaments.insert(
                    stream.to_string(),
                    TournamentSummary {
                        id: TournamentId::from(stream),
                        name: stream.to_string(),
                        phase: "initialization".to_string(),
                        deleted: false,
                    },
                );
            }
            "tournament:name-changed" => {
                if let Some(t) = state.tournaments.get_mut(stream) {
                    t.name = str_field("name");
                }
            }
            "tournament:phase-changed" => {
                if let Some(t) = state.tournaments.get_mut(stream) {
                    t.phase = str_field("phase");
                }
            }
            "tournament:deleted" => {
                if let Some(t) = state.tournaments.get_mut(stream) {
                    t.deleted = true;
                }
            }
            "player:created" => {
                state.players.insert(
                    stream.to_string(),
                    PlayerSummary {
                        id: PlayerId::from(stream),
                        name: stream.to_string(),
                        role: str_field("role"),
                        tracker: TrackerId::from(str_field("tracker").as_str()),
                    },
                );
            }
            "player:name-changed" => {
                if let Some(p) = state.players.get_mut(stream) {
                    p.name = str_field("name");
                }
            }
            "season:created" => {
                state.seasons.insert(
                    stream.to_string(),
                    SeasonSummary {
                        id: SeasonId::from(stream),
                        name: stream.to_string(),
                        ongoing: false,
                        finished: false,
                    },
                );
            }
            "season:name-changed" => {
                if let Some(s) = state.seasons.get_mut(stream) {
                    s.name = str_field("name");
                }
            }
            "season:started" => {
                if let Some(s) = state.seasons.get_mut(stream) {
                    s.ongoing = true;
                }
            }
            "season:ended" => {
                if let Some(s) = state.seasons.get_mut(stream) {
                    s.ongoing = false;
                    s.finished = true;
                }
            }
            // Everything else is aggregate detail the directory doesn't track.
            _ => {}
        }
    }
}

impl Projection for Directory {
    fn on(&self, record: &Record) {
        let Ok(mut state) = self.inner.write() else {
            return;
        };
        Self::fold(&mut state, record);
        state.version += 1;
    }

    fn version(&self) -> u64 {
        self.read(|s| s.version).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(event_type: &str, stream: &str, data: serde_json::Value) -> Record {
        Record {
            event_type: event_type.to_string(),
            stream_id: stream.to_string(),
            sequence_number: 0,
            data,
            metadata: None,
        }
    }

    #[test]
    fn tournament_names_come_and_go_with_the_feed() {
        let dir = Directory::new();
        assert!(dir.is_tournament_name_available("Thursday Cube"));

        dir.on(&record("tournament:created", "trn-1", json!({})));
        dir.on(&record(
            "tournament:name-changed",
            "trn-1",
            json!({"name": "Thursday Cube"}),
        ));
        assert!(!dir.is_tournament_name_available("Thursday Cube"));
        assert_eq!(dir.find_all_tournaments().len(), 1);

        dir.on(&record("tournament:deleted", "trn-1", json!({})));
        assert!(dir.is_tournament_name_available("Thursday Cube"));
        assert!(dir.find_all_tournaments().is_empty());
        assert_eq!(dir.version(), 3);
    }

    #[test]
    fn players_expose_their_tracker() {
        let dir = Directory::new();
        dir.on(&record(
            "player:created",
            "plr-1",
            json!({"role": "participant", "tracker": "trk-1"}),
        ));
        assert!(dir.player_exists(&PlayerId::from("plr-1")));
        assert_eq!(
            dir.tracker_of(&PlayerId::from("plr-1")),
            Some(TrackerId::from("trk-1"))
        );
        assert!(!dir.player_exists(&PlayerId::from("plr-2")));
    }

    #[test]
    fn unknown_event_types_are_skipped() {
        let dir = Directory::new();
        dir.on(&record("tracker:game-played", "trk-1", json!({})));
        assert_eq!(dir.version(), 1);
        assert!(dir.find_all_tournaments().is_empty());
    }

    #[test]
    fn seasons_track_their_lifecycle_flags() {
        let dir = Directory::new();
        dir.on(&record("season:created", "seas-1", json!({})));
        dir.on(&record("season:started", "seas-1", json!({})));
        let summary = dir.find_season(&SeasonId::from("seas-1")).unwrap();
        assert!(summary.ongoing);
        assert!(!summary.finished);

        dir.on(&record("season:ended", "seas-1", json!({})));
        let summary = dir.find_season(&SeasonId::from("seas-1")).unwrap();
        assert!(!summary.ongoing);
        assert!(summary.finished);
    }
}
