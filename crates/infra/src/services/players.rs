//! Player command execution, including the paired tracker stream.

use chrono::Utc;
use uuid::Uuid;

use draftleague_core::{DomainError, PlayerId, TournamentId, TrackerId};
use draftleague_events::Command;
use draftleague_players::{Player, Role};
use draftleague_trackers::Tracker;

use crate::event_store::EventStore;
use crate::repository;
use crate::services::{
    with_conflict_retry, CommandService, ServiceError, ACTION_CHANGE_NAME,
    ACTION_REGISTER_TOURNAMENT, ARG_NAME, ARG_TOURNAMENT_ID,
};

impl<S> CommandService<S>
where
    S: EventStore,
{
    /// Create a player and its 1:1 statistics tracker.
    ///
    /// Two streams, two appends, no cross-stream atomicity. If the tracker
    /// append fails the player stream still exists; recovery is retrying
    /// the tracker append, not compensating the player.
    pub fn create_player(
        &self,
        id: &PlayerId,
        role: Role,
        mail: &str,
        password: &str,
    ) -> Result<TrackerId, ServiceError> {
        let now = Utc::now();
        let tracker = TrackerId::new(Uuid::now_v7().to_string());

        let mut plr = Player::default();
        plr.create(
            id.clone(),
            tracker.clone(),
            role,
            mail.to_string(),
            password.to_string(),
            now,
        )?;
        repository::save(self.store(), &mut plr, None)?;
        tracing::info!(player = %id, tracker = %tracker, "player created");

        let mut trk = Tracker::default();
        trk.create(tracker.clone(), id.clone(), now)?;
        repository::save(self.store(), &mut trk, None)?;

        Ok(tracker)
    }

    /// Execute one named action against a player.
    pub fn player_command(&self, id: &PlayerId, command: &Command) -> Result<(), ServiceError> {
        with_conflict_retry(|| {
            let now = Utc::now();
            let mut plr: Player = repository::load(self.store(), id.as_str())?;

            match command.action.as_str() {
                ACTION_CHANGE_NAME => {
                    let name = command.arguments.string(ARG_NAME);
                    if !name.is_empty()
                        && plr.name() != name
                        && !self.directory().is_player_name_available(&name)
                    {
                        return Err(DomainError::already_exists("player name is taken").into());
                    }
                    plr.change_name(&name, now)?;
                }
                ACTION_REGISTER_TOURNAMENT => {
                    let tournament =
                        TournamentId::from(command.arguments.string(ARG_TOURNAMENT_ID).as_str());
                    plr.register_tournament(tournament, now)?;
                }
                other => {
                    return Err(DomainError::unrecognized_action(other).into());
                }
            }

            repository::save(self.store(), &mut plr, None)?;
            tracing::info!(player = %id, action = %command.action, "command accepted");
            Ok(())
        })
    }
}
