//! Tournaments domain module (event-sourced).
//!
//! The Tournament aggregate owns the phase state machine, round-robin
//! fixture generation and the match/game outcome tracking. Everything in
//! this crate is deterministic domain logic (no IO, no HTTP, no storage).

pub mod format;
pub mod matches;
pub mod schedule;
pub mod tournament;

pub use format::{Format, Phase};
pub use matches::{Game, Match};
pub use tournament::{
    Participant, Tournament, TournamentCreated, TournamentDeckChosen, TournamentDeleted,
    TournamentEnded, TournamentEvent, TournamentFormatChanged, TournamentGameEnded,
    TournamentGamesToWinChanged, TournamentNameChanged, TournamentPhaseChanged,
    TournamentPlayerDropped, TournamentPlayerRegistered, TournamentStarted,
};
