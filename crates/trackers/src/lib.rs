//! Trackers domain module (event-sourced).
//!
//! A tracker is an append-only counter aggregate carrying one player's
//! cumulative match/game totals across all tournaments. It is created
//! alongside its player and updated as an independent stream.

pub mod tracker;

pub use tracker::{
    Tracker, TrackerCreated, TrackerEvent, TrackerGamePlayed, TrackerGameWon, TrackerMatchPlayed,
    TrackerMatchWon,
};
