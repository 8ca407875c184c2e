//! The Tracker aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use draftleague_core::{AggregateRoot, DomainError, DomainResult, PlayerId, TrackerId};
use draftleague_events::{ChangeRecorder, Codec, CodecError, Event, EventSourced};

/// Aggregate root: Tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tracker {
    id: TrackerId,
    player: PlayerId,
    version: u64,
    matches: u32,
    match_wins: u32,
    games: u32,
    game_wins: u32,
    recorder: ChangeRecorder<TrackerEvent>,
}

/// Event: TrackerCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TrackerCreated {
    pub id: Uuid,
    pub occurred_on: DateTime<Utc>,
    pub tracker: TrackerId,
    pub player: PlayerId,
}

/// Event: TrackerMatchPlayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TrackerMatchPlayed {
    pub id: Uuid,
    pub occurred_on: DateTime<Utc>,
    pub tracker: TrackerId,
}

/// Event: TrackerMatchWon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TrackerMatchWon {
    pub id: Uuid,
    pub occurred_on: DateTime<Utc>,
    pub tracker: TrackerId,
}

/// Event: TrackerGamePlayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TrackerGamePlayed {
    pub id: Uuid,
    pub occurred_on: DateTime<Utc>,
    pub tracker: TrackerId,
}

/// Event: TrackerGameWon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TrackerGameWon {
    pub id: Uuid,
    pub occurred_on: DateTime<Utc>,
    pub tracker: TrackerId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TrackerEvent {
    Created(TrackerCreated),
    MatchPlayed(TrackerMatchPlayed),
    MatchWon(TrackerMatchWon),
    GamePlayed(TrackerGamePlayed),
    GameWon(TrackerGameWon),
}

impl Event for TrackerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            TrackerEvent::Created(_) => "tracker:created",
            TrackerEvent::MatchPlayed(_) => "tracker:match-played",
            TrackerEvent::MatchWon(_) => "tracker:match-won",
            TrackerEvent::GamePlayed(_) => "tracker:game-played",
            TrackerEvent::GameWon(_) => "tracker:game-won",
        }
    }

    fn occurred_on(&self) -> DateTime<Utc> {
        match self {
            TrackerEvent::Created(e) => e.occurred_on,
            TrackerEvent::MatchPlayed(e) => e.occurred_on,
            TrackerEvent::MatchWon(e) => e.occurred_on,
            TrackerEvent::GamePlayed(e) => e.occurred_on,
            TrackerEvent::GameWon(e) => e.occurred_on,
        }
    }
}

/// The codec covering every tracker event type.
pub fn codec() -> Result<Codec<TrackerEvent>, CodecError> {
    let mut c = Codec::new();
    c.register("tracker:created", |data| {
        Ok(TrackerEvent::Created(serde_json::from_value(data.clone())?))
    })?;
    c.register("tracker:match-played", |data| {
        Ok(TrackerEvent::MatchPlayed(serde_json::from_value(
            data.clone(),
        )?))
    })?;
    c.register("tracker:match-won", |data| {
        Ok(TrackerEvent::MatchWon(serde_json::from_value(
            data.clone(),
        )?))
    })?;
    c.register("tracker:game-played", |data| {
        Ok(TrackerEvent::GamePlayed(serde_json::from_value(
            data.clone(),
        )?))
    })?;
    c.register("tracker:game-won", |data| {
        Ok(TrackerEvent::GameWon(serde_json::from_value(data.clone())?))
    })?;
    Ok(c)
}

impl Tracker {
    pub fn player(&self) -> &PlayerId {
        &self.player
    }

    pub fn matches(&self) -> u32 {
        self.matches
    }

    pub fn match_wins(&self) -> u32 {
        self.match_wins
    }

    pub fn games(&self) -> u32 {
        self.games
    }

    pub fn game_wins(&self) -> u32 {
        self.game_wins
    }

    pub fn create(
        &mut self,
        id: TrackerId,
        player: PlayerId,
        occurred_on: DateTime<Utc>,
    ) -> DomainResult<()> {
        if !self.id.is_empty() {
            return Err(DomainError::already_exists("tracker already exists"));
        }
        if id.is_empty() {
            return Err(DomainError::invalid_argument(
                "a tracker's id may not be empty",
            ));
        }
        if player.is_empty() {
            return Err(DomainError::invalid_argument("no player specified"));
        }
        self.apply(TrackerEvent::Created(TrackerCreated {
            id: Uuid::now_v7(),
            occurred_on,
            tracker: id,
            player,
        }));
        Ok(())
    }

    pub fn increment_matches(&mut self, occurred_on: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_exists()?;
        self.apply(TrackerEvent::MatchPlayed(TrackerMatchPlayed {
            id: Uuid::now_v7(),
            occurred_on,
            tracker: self.id.clone(),
        }));
        Ok(())
    }

    pub fn increment_matches_won(&mut self, occurred_on: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_exists()?;
        self.apply(TrackerEvent::MatchWon(TrackerMatchWon {
            id: Uuid::now_v7(),
            occurred_on,
            tracker: self.id.clone(),
        }));
        Ok(())
    }

    pub fn increment_games(&mut self, occurred_on: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_exists()?;
        self.apply(TrackerEvent::GamePlayed(TrackerGamePlayed {
            id: Uuid::now_v7(),
            occurred_on,
            tracker: self.id.clone(),
        }));
        Ok(())
    }

    pub fn increment_games_won(&mut self, occurred_on: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_exists()?;
        self.apply(TrackerEvent::GameWon(TrackerGameWon {
            id: Uuid::now_v7(),
            occurred_on,
            tracker: self.id.clone(),
        }));
        Ok(())
    }

    fn ensure_exists(&self) -> DomainResult<()> {
        if self.id.is_empty() {
            return Err(DomainError::not_found("tracker does not exist"));
        }
        Ok(())
    }
}

impl AggregateRoot for Tracker {
    type Id = TrackerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl EventSourced for Tracker {
    type Event = TrackerEvent;

    fn stream_id(&self) -> &str {
        self.id.as_str()
    }

    fn mutate(&mut self, event: &TrackerEvent) {
        match event {
            TrackerEvent::Created(e) => {
                self.id = e.tracker.clone();
                self.player = e.player.clone();
            }
            TrackerEvent::MatchPlayed(_) => {
                self.matches += 1;
            }
            TrackerEvent::MatchWon(_) => {
                self.match_wins += 1;
            }
            TrackerEvent::GamePlayed(_) => {
                self.games += 1;
            }
            TrackerEvent::GameWon(_) => {
                self.game_wins += 1;
            }
        }
        self.version += 1;
    }

    fn changes(&self) -> &[TrackerEvent] {
        self.recorder.changes()
    }

    fn recorder(&mut self) -> &mut ChangeRecorder<TrackerEvent> {
        &mut self.recorder
    }

    fn codec() -> Result<Codec<TrackerEvent>, CodecError> {
        codec()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn t() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 4, 18, 30, 0).unwrap()
    }

    fn created() -> Tracker {
        let mut trk = Tracker::default();
        trk.create(TrackerId::from("trk-1"), PlayerId::from("plr-1"), t())
            .unwrap();
        trk
    }

    #[test]
    fn create_requires_an_id_and_a_player() {
        let mut trk = Tracker::default();
        let err = trk
            .create(TrackerId::default(), PlayerId::from("plr-1"), t())
            .unwrap_err();
        assert_eq!(err.kind(), "invalid-argument");

        let err = trk
            .create(TrackerId::from("trk-1"), PlayerId::default(), t())
            .unwrap_err();
        assert_eq!(err.kind(), "invalid-argument");

        let mut trk = created();
        let err = trk
            .create(TrackerId::from("trk-2"), PlayerId::from("plr-2"), t())
            .unwrap_err();
        assert_eq!(err.kind(), "already-exists");
    }

    #[test]
    fn counters_accumulate_one_event_per_increment() {
        let mut trk = created();
        trk.increment_games(t()).unwrap();
        trk.increment_games(t()).unwrap();
        trk.increment_games_won(t()).unwrap();
        trk.increment_matches(t()).unwrap();
        trk.increment_matches_won(t()).unwrap();

        assert_eq!(trk.games(), 2);
        assert_eq!(trk.game_wins(), 1);
        assert_eq!(trk.matches(), 1);
        assert_eq!(trk.match_wins(), 1);
        assert_eq!(trk.version(), 6);
        assert_eq!(trk.changes().len(), 6);
    }

    #[test]
    fn increments_require_an_existing_tracker() {
        let mut trk = Tracker::default();
        let err = trk.increment_games(t()).unwrap_err();
        assert_eq!(err.kind(), "not-found");
    }

    #[test]
    fn replay_rebuilds_identical_state() {
        let mut trk = created();
        trk.increment_games(t()).unwrap();
        trk.increment_games_won(t()).unwrap();

        let mut replayed = Tracker::default();
        for event in trk.changes() {
            replayed.mutate(event);
        }
        assert_eq!(replayed.games(), trk.games());
        assert_eq!(replayed.game_wins(), trk.game_wins());
        assert_eq!(replayed.version(), trk.version());
    }
}
