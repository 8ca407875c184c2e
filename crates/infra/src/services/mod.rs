//! Application services: command execution over event-sourced aggregates.
//!
//! A service call is the full pipeline: load the stream, rehydrate the
//! aggregate, run one intention-revealing operation, save the pending
//! events with one conditional append. `ConcurrencyConflict` is the only
//! retryable failure and the retry is always reload-reapply-resave; every
//! other error is terminal for that command and surfaced unchanged.

pub mod players;
pub mod seasons;
pub mod tournaments;

use std::sync::Arc;

use thiserror::Error;

use draftleague_core::DomainError;

use crate::event_store::EventStore;
use crate::projections::Directory;
use crate::repository::RepositoryError;

// The command surface: one named action per aggregate operation.
pub const ACTION_CREATE: &str = "create";
pub const ACTION_DELETE: &str = "delete";
pub const ACTION_REGISTER_PLAYER: &str = "register-player";
pub const ACTION_DROP_PLAYER: &str = "drop-player";
pub const ACTION_CHANGE_NAME: &str = "change-name";
pub const ACTION_CHANGE_FORMAT: &str = "change-format";
pub const ACTION_CHANGE_GAMES_TO_WIN: &str = "change-gamestowin";
pub const ACTION_CHOOSE_DECK: &str = "choose-deck";
pub const ACTION_END_PHASE: &str = "end-phase";
pub const ACTION_END_GAME: &str = "end-game";
pub const ACTION_REGISTER_TOURNAMENT: &str = "register-tournament";
pub const ACTION_BEGIN: &str = "begin";
pub const ACTION_FINISH: &str = "finish";
pub const ACTION_ADD_PLAYER: &str = "add-player";
pub const ACTION_REMOVE_PLAYER: &str = "remove-player";

pub const ARG_TOURNAMENT_ID: &str = "tid";
pub const ARG_PLAYER_ID: &str = "pid";
pub const ARG_NAME: &str = "name";
pub const ARG_ROLE: &str = "role";
pub const ARG_FORMAT: &str = "format";
pub const ARG_DECK: &str = "deck";
pub const ARG_MATCH: &str = "match";
pub const ARG_GAME: &str = "game";
pub const ARG_GAMES_TO_WIN: &str = "gamestowin";
pub const ARG_DRAW: &str = "draw";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Command execution engine shared by all aggregates.
///
/// The directory is consulted for validation-time lookups only; it is an
/// eventually consistent reader of the feed, so it never vouches for
/// freshly appended events.
pub struct CommandService<S> {
    store: S,
    directory: Arc<Directory>,
}

impl<S> CommandService<S>
where
    S: EventStore,
{
    pub fn new(store: S, directory: Arc<Directory>) -> Self {
        Self { store, directory }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }
}

pub(crate) const CONFLICT_RETRIES: usize = 3;

/// Retry a reload-reapply-resave pipeline while the append keeps losing
/// optimistic races. All other errors pass through untouched.
pub(crate) fn with_conflict_retry<T>(
    mut op: impl FnMut() -> Result<T, ServiceError>,
) -> Result<T, ServiceError> {
    let mut attempt = 0;
    loop {
        match op() {
            Err(ServiceError::Repository(RepositoryError::Conflict(msg)))
                if attempt + 1 < CONFLICT_RETRIES =>
            {
                attempt += 1;
                tracing::debug!(attempt, conflict = %msg, "append lost the race, retrying");
            }
            other => return other,
        }
    }
}
