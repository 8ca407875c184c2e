//! Season command execution.

use chrono::Utc;

use draftleague_core::{DomainError, PlayerId, SeasonId};
use draftleague_events::Command;
use draftleague_seasons::Season;
use draftleague_tournaments::Format;

use crate::event_store::EventStore;
use crate::repository;
use crate::services::{
    with_conflict_retry, CommandService, ServiceError, ACTION_ADD_PLAYER, ACTION_BEGIN,
    ACTION_CHANGE_FORMAT, ACTION_CHANGE_NAME, ACTION_FINISH, ACTION_REMOVE_PLAYER, ARG_FORMAT,
    ARG_NAME, ARG_PLAYER_ID,
};

impl<S> CommandService<S>
where
    S: EventStore,
{
    pub fn create_season(&self, id: &SeasonId) -> Result<(), ServiceError> {
        let mut seas = Season::default();
        seas.create(id.clone(), Utc::now())?;
        repository::save(self.store(), &mut seas, None)?;
        tracing::info!(season = %id, "season created");
        Ok(())
    }

    /// Execute one named action against a season.
    pub fn season_command(&self, id: &SeasonId, command: &Command) -> Result<(), ServiceError> {
        with_conflict_retry(|| {
            let now = Utc::now();
            let mut seas: Season = repository::load(self.store(), id.as_str())?;

            match command.action.as_str() {
                ACTION_CHANGE_NAME => {
                    let name = command.arguments.string(ARG_NAME);
                    seas.change_name(&name, now)?;
                }
                ACTION_CHANGE_FORMAT => {
                    let format: Format = command.arguments.string(ARG_FORMAT).parse()?;
                    seas.change_format(format, now)?;
                }
                ACTION_BEGIN => {
                    seas.begin(now)?;
                }
                ACTION_FINISH => {
                    seas.finish(now)?;
                }
                ACTION_ADD_PLAYER => {
                    let player = PlayerId::from(command.arguments.string(ARG_PLAYER_ID).as_str());
                    if !player.is_empty() && !self.directory().player_exists(&player) {
                        return Err(DomainError::not_found("player does not exist").into());
                    }
                    seas.add_player(player, now)?;
                }
                ACTION_REMOVE_PLAYER => {
                    let player = PlayerId::from(command.arguments.string(ARG_PLAYER_ID).as_str());
                    seas.remove_player(player, now)?;
                }
                other => {
                    return Err(DomainError::unrecognized_action(other).into());
                }
            }

            repository::save(self.store(), &mut seas, None)?;
            tracing::info!(season = %id, action = %command.action, "command accepted");
            Ok(())
        })
    }
}
