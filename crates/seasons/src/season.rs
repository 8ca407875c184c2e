//! The Season aggregate.
//!
//! A season groups tournaments of one format over a period of time. It
//! begins at most once, and finishes at most once after it began.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use draftleague_core::{AggregateRoot, DomainError, DomainResult, PlayerId, SeasonId};
use draftleague_events::{ChangeRecorder, Codec, CodecError, Event, EventSourced};
use draftleague_tournaments::Format;

/// Aggregate root: Season.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Season {
    id: SeasonId,
    version: u64,
    name: String,
    format: Option<Format>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    ongoing: bool,
    finished: bool,
    players: Vec<PlayerId>,
    recorder: ChangeRecorder<SeasonEvent>,
}

/// Event: SeasonCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SeasonCreated {
    pub id: Uuid,
    pub occurred_on: DateTime<Utc>,
    pub season: SeasonId,
}

/// Event: SeasonNameChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SeasonNameChanged {
    pub id: Uuid,
    pub occurred_on: DateTime<Utc>,
    pub season: SeasonId,
    pub name: String,
}

/// Event: SeasonFormatChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SeasonFormatChanged {
    pub id: Uuid,
    pub occurred_on: DateTime<Utc>,
    pub season: SeasonId,
    pub format: Format,
}

/// Event: SeasonStarted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SeasonStarted {
    pub id: Uuid,
    pub occurred_on: DateTime<Utc>,
    pub season: SeasonId,
    pub start: DateTime<Utc>,
}

/// Event: SeasonEnded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SeasonEnded {
    pub id: Uuid,
    pub occurred_on: DateTime<Utc>,
    pub season: SeasonId,
    pub end: DateTime<Utc>,
}

/// Event: SeasonPlayerAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SeasonPlayerAdded {
    pub id: Uuid,
    pub occurred_on: DateTime<Utc>,
    pub season: SeasonId,
    pub player: PlayerId,
}

/// Event: SeasonPlayerRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SeasonPlayerRemoved {
    pub id: Uuid,
    pub occurred_on: DateTime<Utc>,
    pub season: SeasonId,
    pub player: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SeasonEvent {
    Created(SeasonCreated),
    NameChanged(SeasonNameChanged),
    FormatChanged(SeasonFormatChanged),
    Started(SeasonStarted),
    Ended(SeasonEnded),
    PlayerAdded(SeasonPlayerAdded),
    PlayerRemoved(SeasonPlayerRemoved),
}

impl Event for SeasonEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SeasonEvent::Created(_) => "season:created",
            SeasonEvent::NameChanged(_) => "season:name-changed",
            SeasonEvent::FormatChanged(_) => "season:format-changed",
            SeasonEvent::Started(_) => "season:started",
            SeasonEvent::Ended(_) => "season:ended",
            SeasonEvent::PlayerAdded(_) => "season:player-added",
            SeasonEvent::PlayerRemoved(_) => "season:player-removed",
        }
    }

    fn occurred_on(&self) -> DateTime<Utc> {
        match self {
            SeasonEvent::Created(e) => e.occurred_on,
            SeasonEvent::NameChanged(e) => e.occurred_on,
            SeasonEvent::FormatChanged(e) => e.occurred_on,
            SeasonEvent::Started(e) => e.occurred_on,
            SeasonEvent::Ended(e) => e.occurred_on,
            SeasonEvent::PlayerAdded(e) => e.occurred_on,
            SeasonEvent::PlayerRemoved(e) => e.occurred_on,
        }
    }
}

/// The codec covering every season event type.
pub fn codec() -> Result<Codec<SeasonEvent>, CodecError> {
    let mut c = Codec::new();
    c.register("season:created", |data| {
        Ok(SeasonEvent::Created(serde_json::from_value(data.clone())?))
    })?;
    c.register("season:name-changed", |data| {
        Ok(SeasonEvent::NameChanged(serde_json::from_value(
            data.clone(),
        )?))
    })?;
    c.register("season:format-changed", |data| {
        Ok(SeasonEvent::FormatChanged(serde_json::from_value(
            data.clone(),
        )?))
    })?;
    c.register("season:started", |data| {
        Ok(SeasonEvent::Started(serde_json::from_value(data.clone())?))
    })?;
    c.register("season:ended", |data| {
        Ok(SeasonEvent::Ended(serde_json::from_value(data.clone())?))
    })?;
    c.register("season:player-added", |data| {
        Ok(SeasonEvent::PlayerAdded(serde_json::from_value(
            data.clone(),
        )?))
    })?;
    c.register("season:player-removed", |data| {
        Ok(SeasonEvent::PlayerRemoved(serde_json::from_value(
            data.clone(),
        )?))
    })?;
    Ok(c)
}

impl Season {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self) -> Option<Format> {
        self.format
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    pub fn is_ongoing(&self) -> bool {
        self.ongoing
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    pub fn create(&mut self, id: SeasonId, occurred_on: DateTime<Utc>) -> DomainResult<()> {
        if !self.id.is_empty() {
            return Err(DomainError::already_exists("season already exists"));
        }
        if id.is_empty() {
            return Err(DomainError::invalid_argument(
                "a season's id may not be empty",
            ));
        }
        self.apply(SeasonEvent::Created(SeasonCreated {
            id: Uuid::now_v7(),
            occurred_on,
            season: id,
        }));
        Ok(())
    }

    pub fn change_name(&mut self, name: &str, occurred_on: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_exists()?;
        if name.is_empty() {
            return Err(DomainError::invalid_argument(
                "a season's name may not be empty",
            ));
        }
        if self.name == name {
            return Ok(());
        }
        self.apply(SeasonEvent::NameChanged(SeasonNameChanged {
            id: Uuid::now_v7(),
            occurred_on,
            season: self.id.clone(),
            name: name.to_string(),
        }));
        Ok(())
    }

    /// The format is frozen once the season has begun.
    pub fn change_format(&mut self, format: Format, occurred_on: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_exists()?;
        if self.start.is_some() {
            return Err(DomainError::invalid_phase("season has already started"));
        }
        if self.format == Some(format) {
            return Ok(());
        }
        self.apply(SeasonEvent::FormatChanged(SeasonFormatChanged {
            id: Uuid::now_v7(),
            occurred_on,
            season: self.id.clone(),
            format,
        }));
        Ok(())
    }

    pub fn begin(&mut self, occurred_on: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_exists()?;
        if self.start.is_some() {
            return Err(DomainError::already_scheduled("season already started"));
        }
        self.apply(SeasonEvent::Started(SeasonStarted {
            id: Uuid::now_v7(),
            occurred_on,
            season: self.id.clone(),
            start: occurred_on,
        }));
        Ok(())
    }

    pub fn finish(&mut self, occurred_on: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_exists()?;
        if self.start.is_none() {
            return Err(DomainError::invalid_phase("season has not started yet"));
        }
        if self.end.is_some() {
            return Err(DomainError::already_ended("season has already ended"));
        }
        self.apply(SeasonEvent::Ended(SeasonEnded {
            id: Uuid::now_v7(),
            occurred_on,
            season: self.id.clone(),
            end: occurred_on,
        }));
        Ok(())
    }

    pub fn add_player(&mut self, player: PlayerId, occurred_on: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_exists()?;
        if player.is_empty() {
            return Err(DomainError::invalid_argument("no player specified"));
        }
        if self.players.contains(&player) {
            return Err(DomainError::already_registered(
                "player already part of this season",
            ));
        }
        self.apply(SeasonEvent::PlayerAdded(SeasonPlayerAdded {
            id: Uuid::now_v7(),
            occurred_on,
            season: self.id.clone(),
            player,
        }));
        Ok(())
    }

    pub fn remove_player(
        &mut self,
        player: PlayerId,
        occurred_on: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.ensure_exists()?;
        if player.is_empty() {
            return Err(DomainError::invalid_argument("no player specified"));
        }
        if !self.players.contains(&player) {
            return Err(DomainError::not_registered(
                "player is not part of this season",
            ));
        }
        self.apply(SeasonEvent::PlayerRemoved(SeasonPlayerRemoved {
            id: Uuid::now_v7(),
            occurred_on,
            season: self.id.clone(),
            player,
        }));
        Ok(())
    }

    fn ensure_exists(&self) -> DomainResult<()> {
        if self.id.is_empty() {
            return Err(DomainError::not_found("season does not exist"));
        }
        Ok(())
    }
}

impl AggregateRoot for Season {
    type Id = SeasonId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl EventSourced for Season {
    type Event = SeasonEvent;

    fn stream_id(&self) -> &str {
        self.id.as_str()
    }

    fn mutate(&mut self, event: &SeasonEvent) {
        match event {
            SeasonEvent::Created(e) => {
                self.id = e.season.clone();
            }
            SeasonEvent::NameChanged(e) => {
                self.name = e.name.clone();
            }
            SeasonEvent::FormatChanged(e) => {
                self.format = Some(e.format);
            }
            SeasonEvent::Started(e) => {
                self.start = Some(e.start);
                self.ongoing = true;
            }
            SeasonEvent::Ended(e) => {
                self.end = Some(e.end);
                self.ongoing = false;
                self.finished = true;
            }
            SeasonEvent::PlayerAdded(e) => {
                self.players.push(e.player.clone());
            }
            SeasonEvent::PlayerRemoved(e) => {
                self.players.retain(|p| p != &e.player);
            }
        }
        self.version += 1;
    }

    fn changes(&self) -> &[SeasonEvent] {
        self.recorder.changes()
    }

    fn recorder(&mut self) -> &mut ChangeRecorder<SeasonEvent> {
        &mut self.recorder
    }

    fn codec() -> Result<Codec<SeasonEvent>, CodecError> {
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

    fn created() -> Season {
        let mut seas = Season::default();
        seas.create(SeasonId::from("seas-1"), t()).unwrap();
        seas
    }

    #[test]
    fn create_rejects_empty_id_and_duplicates() {
        let mut seas = Season::default();
        let err = seas.create(SeasonId::default(), t()).unwrap_err();
        assert_eq!(err.kind(), "invalid-argument");

        let mut seas = created();
        let err = seas.create(SeasonId::from("seas-2"), t()).unwrap_err();
        assert_eq!(err.kind(), "already-exists");
    }

    #[test]
    fn begin_happens_at_most_once() {
        let mut seas = created();
        seas.begin(t()).unwrap();
        assert!(seas.is_ongoing());
        assert!(seas.start().is_some());

        let err = seas.begin(t()).unwrap_err();
        assert_eq!(err.kind(), "already-scheduled");
    }

    #[test]
    fn finish_requires_a_begun_season() {
        let mut seas = created();
        let err = seas.finish(t()).unwrap_err();
        assert_eq!(err.kind(), "invalid-phase");

        seas.begin(t()).unwrap();
        seas.finish(t()).unwrap();
        assert!(seas.is_finished());
        assert!(!seas.is_ongoing());

        let err = seas.finish(t()).unwrap_err();
        assert_eq!(err.kind(), "already-ended");
    }

    #[test]
    fn format_is_frozen_once_started() {
        let mut seas = created();
        seas.change_format(Format::Cube, t()).unwrap();
        assert_eq!(seas.format(), Some(Format::Cube));

        seas.begin(t()).unwrap();
        let err = seas.change_format(Format::Cube, t()).unwrap_err();
        assert_eq!(err.kind(), "invalid-phase");
    }

    #[test]
    fn change_name_with_current_value_is_a_no_op() {
        let mut seas = created();
        seas.change_name("Summer 2024", t()).unwrap();
        let version = seas.version();
        seas.change_name("Summer 2024", t()).unwrap();
        assert_eq!(seas.version(), version);
    }

    #[test]
    fn players_are_added_and_removed_with_guards() {
        let mut seas = created();
        seas.add_player(PlayerId::from("a"), t()).unwrap();
        let err = seas.add_player(PlayerId::from("a"), t()).unwrap_err();
        assert_eq!(err.kind(), "already-registered");

        let err = seas.remove_player(PlayerId::from("b"), t()).unwrap_err();
        assert_eq!(err.kind(), "not-registered");

        seas.remove_player(PlayerId::from("a"), t()).unwrap();
        assert!(seas.players().is_empty());
    }

    #[test]
    fn replay_rebuilds_identical_state() {
        let mut seas = created();
        seas.change_name("Summer 2024", t()).unwrap();
        seas.change_format(Format::Cube, t()).unwrap();
        seas.add_player(PlayerId::from("a"), t()).unwrap();
        seas.begin(t()).unwrap();
        seas.finish(t()).unwrap();

        let mut replayed = Season::default();
        for event in seas.changes() {
            replayed.mutate(event);
        }
        assert_eq!(replayed.name(), seas.name());
        assert_eq!(replayed.format(), seas.format());
        assert_eq!(replayed.is_finished(), seas.is_finished());
        assert_eq!(replayed.players(), seas.players());
        assert_eq!(replayed.version(), seas.version());
    }
}
