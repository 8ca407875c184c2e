//! The Player aggregate.

use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use draftleague_core::{
    AggregateRoot, DomainError, DomainResult, PlayerId, TournamentId, TrackerId,
};
use draftleague_events::{ChangeRecorder, Codec, CodecError, Event, EventSourced};

/// What a player is allowed to do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Participant,
    Organizer,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Participant => "participant",
            Role::Organizer => "organizer",
            Role::Admin => "admin",
        }
    }

    /// Organizers and admins may run tournaments.
    pub fn can_organize(self) -> bool {
        matches!(self, Role::Organizer | Role::Admin)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "participant" => Ok(Role::Participant),
            "organizer" => Ok(Role::Organizer),
            "admin" => Ok(Role::Admin),
            other => Err(DomainError::invalid_argument(format!(
                "role not recognized: {other}"
            ))),
        }
    }
}

/// Aggregate root: Player.
///
/// `mail` and `password` are opaque credential fields owned by the
/// authentication collaborator; the domain only stores what it was given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Player {
    id: PlayerId,
    version: u64,
    name: String,
    role: Role,
    mail: String,
    password: String,
    tournaments: Vec<TournamentId>,
    tracker: TrackerId,
    recorder: ChangeRecorder<PlayerEvent>,
}

/// Event: PlayerCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlayerCreated {
    pub id: Uuid,
    pub occurred_on: DateTime<Utc>,
    pub player: PlayerId,
    pub mail: String,
    pub password: String,
    pub role: Role,
    pub tracker: TrackerId,
}

/// Event: PlayerNameChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlayerNameChanged {
    pub id: Uuid,
    pub occurred_on: DateTime<Utc>,
    pub player: PlayerId,
    pub name: String,
}

/// Event: PlayerTournamentRegistered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlayerTournamentRegistered {
    pub id: Uuid,
    pub occurred_on: DateTime<Utc>,
    pub player: PlayerId,
    pub tournament: TournamentId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PlayerEvent {
    Created(PlayerCreated),
    NameChanged(PlayerNameChanged),
    TournamentRegistered(PlayerTournamentRegistered),
}

impl Event for PlayerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            PlayerEvent::Created(_) => "player:created",
            PlayerEvent::NameChanged(_) => "player:name-changed",
            PlayerEvent::TournamentRegistered(_) => "player:tournament-registered",
        }
    }

    fn occurred_on(&self) -> DateTime<Utc> {
        match self {
            PlayerEvent::Created(e) => e.occurred_on,
            PlayerEvent::NameChanged(e) => e.occurred_on,
            PlayerEvent::TournamentRegistered(e) => e.occurred_on,
        }
    }
}

/// The codec covering every player event type.
pub fn codec() -> Result<Codec<PlayerEvent>, CodecError> {
    let mut c = Codec::new();
    c.register("player:created", |data| {
        Ok(PlayerEvent::Created(serde_json::from_value(data.clone())?))
    })?;
    c.register("player:name-changed", |data| {
        Ok(PlayerEvent::NameChanged(serde_json::from_value(
            data.clone(),
        )?))
    })?;
    c.register("player:tournament-registered", |data| {
        Ok(PlayerEvent::TournamentRegistered(serde_json::from_value(
            data.clone(),
        )?))
    })?;
    Ok(c)
}

impl Player {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn mail(&self) -> &str {
        &self.mail
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn tournaments(&self) -> &[TournamentId] {
        &self.tournaments
    }

    pub fn tracker(&self) -> &TrackerId {
        &self.tracker
    }

    pub fn create(
        &mut self,
        id: PlayerId,
        tracker: TrackerId,
        role: Role,
        mail: String,
        password: String,
        occurred_on: DateTime<Utc>,
    ) -> DomainResult<()> {
        if !self.id.is_empty() {
            return Err(DomainError::already_exists("player already exists"));
        }
        if id.is_empty() {
            return Err(DomainError::invalid_argument(
                "a player's id may not be empty",
            ));
        }
        if tracker.is_empty() {
            return Err(DomainError::invalid_argument("no tracker specified"));
        }
        self.apply(PlayerEvent::Created(PlayerCreated {
            id: Uuid::now_v7(),
            occurred_on,
            player: id,
            mail,
            password,
            role,
            tracker,
        }));
        Ok(())
    }

    pub fn change_name(&mut self, name: &str, occurred_on: DateTime<Utc>) -> DomainResult<()> {
        if self.id.is_empty() {
            return Err(DomainError::not_found("player does not exist"));
        }
        if name.is_empty() {
            return Err(DomainError::invalid_argument(
                "a player's name may not be empty",
            ));
        }
        if self.name == name {
            return Ok(());
        }
        self.apply(PlayerEvent::NameChanged(PlayerNameChanged {
            id: Uuid::now_v7(),
            occurred_on,
            player: self.id.clone(),
            name: name.to_string(),
        }));
        Ok(())
    }

    /// Note that this player signed up for a tournament.
    pub fn register_tournament(
        &mut self,
        tournament: TournamentId,
        occurred_on: DateTime<Utc>,
    ) -> DomainResult<()> {
        if self.id.is_empty() {
            return Err(DomainError::not_found("player does not exist"));
        }
        if tournament.is_empty() {
            return Err(DomainError::invalid_argument("no tournament specified"));
        }
        self.apply(PlayerEvent::TournamentRegistered(
            PlayerTournamentRegistered {
                id: Uuid::now_v7(),
                occurred_on,
                player: self.id.clone(),
                tournament,
            },
        ));
        Ok(())
    }
}

impl AggregateRoot for Player {
    type Id = PlayerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl EventSourced for Player {
    type Event = PlayerEvent;

    fn stream_id(&self) -> &str {
        self.id.as_str()
    }

    fn mutate(&mut self, event: &PlayerEvent) {
        match event {
            PlayerEvent::Created(e) => {
                self.id = e.player.clone();
                // The display name defaults to the id until changed.
                self.name = e.player.to_string();
                self.role = e.role;
                self.mail = e.mail.clone();
                self.password = e.password.clone();
                self.tracker = e.tracker.clone();
            }
            PlayerEvent::NameChanged(e) => {
                self.name = e.name.clone();
            }
            PlayerEvent::TournamentRegistered(e) => {
                self.tournaments.push(e.tournament.clone());
            }
        }
        self.version += 1;
    }

    fn changes(&self) -> &[PlayerEvent] {
        self.recorder.changes()
    }

    fn recorder(&mut self) -> &mut ChangeRecorder<PlayerEvent> {
        &mut self.recorder
    }

    fn codec() -> Result<Codec<PlayerEvent>, CodecError> {
        codec()
    }
}
