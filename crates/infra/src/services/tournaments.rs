//! Tournament command execution, including the cross-aggregate end-game
//! flow that feeds the players' trackers.

use chrono::Utc;

use draftleague_core::{AggregateRoot, DomainError, PlayerId, TournamentId};
use draftleague_events::Command;
use draftleague_players::Player;
use draftleague_tournaments::{Format, Match, Tournament};
use draftleague_trackers::Tracker;

use crate::event_store::EventStore;
use crate::repository;
use crate::services::{
    with_conflict_retry, CommandService, ServiceError, ACTION_CHANGE_FORMAT,
    ACTION_CHANGE_GAMES_TO_WIN, ACTION_CHANGE_NAME, ACTION_CHOOSE_DECK, ACTION_DELETE,
    ACTION_DROP_PLAYER, ACTION_END_GAME, ACTION_END_PHASE, ACTION_REGISTER_PLAYER, ARG_DECK,
    ARG_DRAW, ARG_FORMAT, ARG_GAME, ARG_GAMES_TO_WIN, ARG_MATCH, ARG_NAME, ARG_PLAYER_ID,
};

impl<S> CommandService<S>
where
    S: EventStore,
{
    pub fn create_tournament(&self, id: &TournamentId) -> Result<(), ServiceError> {
        let mut trn = Tournament::default();
        trn.create(id.clone(), Utc::now())?;
        repository::save(self.store(), &mut trn, None)?;
        tracing::info!(tournament = %id, "tournament created");
        Ok(())
    }

    /// Execute one named action against a tournament.
    pub fn tournament_command(
        &self,
        id: &TournamentId,
        command: &Command,
    ) -> Result<(), ServiceError> {
        if command.action == ACTION_END_GAME {
            let match_index = index_argument(command, ARG_MATCH)?;
            let game_index = index_argument(command, ARG_GAME)?;
            let winner = PlayerId::from(command.arguments.string(ARG_PLAYER_ID).as_str());
            let draw = command.arguments.bool(ARG_DRAW);
            return self.end_game(id, match_index, game_index, winner, draw);
        }

        with_conflict_retry(|| {
            let now = Utc::now();
            let mut trn: Tournament = repository::load(self.store(), id.as_str())?;

            match command.action.as_str() {
                ACTION_REGISTER_PLAYER => {
                    let player = PlayerId::from(command.arguments.string(ARG_PLAYER_ID).as_str());
                    if !player.is_empty() && !self.directory().player_exists(&player) {
                        return Err(DomainError::not_found("player does not exist").into());
                    }
                    trn.register_player(player, now)?;
                }
                ACTION_DROP_PLAYER => {
                    let player = PlayerId::from(command.arguments.string(ARG_PLAYER_ID).as_str());
                    trn.drop_player(player, now)?;
                }
                ACTION_CHANGE_NAME => {
                    let name = command.arguments.string(ARG_NAME);
                    if !name.is_empty()
                        && trn.name() != name
                        && !self.directory().is_tournament_name_available(&name)
                    {
                        return Err(
                            DomainError::already_exists("tournament name is taken").into()
                        );
                    }
                    trn.change_name(&name, now)?;
                }
                ACTION_CHANGE_FORMAT => {
                    let format: Format = command.arguments.string(ARG_FORMAT).parse()?;
                    trn.change_format(format, now)?;
                }
                ACTION_CHANGE_GAMES_TO_WIN => {
                    let games_to_win = u32::try_from(command.arguments.int(ARG_GAMES_TO_WIN))
                        .map_err(|_| {
                            DomainError::invalid_argument("games to win must be positive")
                        })?;
                    trn.change_games_to_win(games_to_win, now)?;
                }
                ACTION_CHOOSE_DECK => {
                    let player = PlayerId::from(command.arguments.string(ARG_PLAYER_ID).as_str());
                    let deck = command.arguments.string(ARG_DECK);
                    trn.choose_deck(player, deck.as_str().into(), now)?;
                }
                ACTION_END_PHASE => {
                    trn.end_phase(now)?;
                }
                ACTION_DELETE => {
                    trn.delete(now)?;
                }
                other => {
                    return Err(DomainError::unrecognized_action(other).into());
                }
            }

            repository::save(self.store(), &mut trn, None)?;
            tracing::info!(tournament = %id, action = %command.action, "command accepted");
            Ok(())
        })
    }

    /// Close one game and feed both players' trackers.
    ///
    /// The tournament append and the tracker appends are separate streams
    /// with no cross-stream atomicity: a failure after the first append is
    /// possible and recovery is an idempotent retry of the increments, not
    /// compensation.
    pub fn end_game(
        &self,
        id: &TournamentId,
        match_index: usize,
        game_index: usize,
        winner: PlayerId,
        draw: bool,
    ) -> Result<(), ServiceError> {
        let decided: Option<Match> = with_conflict_retry(|| {
            let now = Utc::now();
            let mut trn: Tournament = repository::load(self.store(), id.as_str())?;
            let version_before = trn.version();
            trn.end_game(match_index, game_index, winner.clone(), draw, now)?;
            if trn.version() == version_before {
                // The documented silent no-op: empty winner, no draw.
                return Ok(None);
            }
            let decided = trn.matches().get(match_index).cloned();
            repository::save(self.store(), &mut trn, None)?;
            Ok(decided)
        })?;

        let Some(m) = decided else {
            return Ok(());
        };
        tracing::info!(tournament = %id, match_index, game_index, "game ended");

        let game_winner = m
            .games
            .get(game_index)
            .map(|g| g.winner.clone())
            .unwrap_or_default();
        for player in [m.player1.clone(), m.player2.clone()] {
            self.track_game_for(&player, &game_winner, m.ended, &m.winner)?;
        }
        Ok(())
    }

    fn track_game_for(
        &self,
        player: &PlayerId,
        game_winner: &PlayerId,
        match_ended: bool,
        match_winner: &PlayerId,
    ) -> Result<(), ServiceError> {
        with_conflict_retry(|| {
            let now = Utc::now();
            let plr: Player = repository::load(self.store(), player.as_str())?;
            let mut trk: Tracker = repository::load(self.store(), plr.tracker().as_str())?;

            trk.increment_games(now)?;
            if game_winner == player {
                trk.increment_games_won(now)?;
            }
            if match_ended {
                trk.increment_matches(now)?;
                if !match_winner.is_empty() && match_winner == player {
                    trk.increment_matches_won(now)?;
                }
            }

            repository::save(self.store(), &mut trk, None)?;
            tracing::info!(player = %player, tracker = %plr.tracker(), "tracker updated");
            Ok(())
        })
    }
}

fn index_argument(command: &Command, name: &str) -> Result<usize, ServiceError> {
    usize::try_from(command.arguments.int(name))
        .map_err(|_| DomainError::not_found(format!("{name} index out of range")).into())
}
