//! Read-model projections over the global event feed.
//!
//! Read models are disposable; events are the source of truth.

pub mod directory;

pub use directory::{Directory, PlayerSummary, SeasonSummary, TournamentSummary};
