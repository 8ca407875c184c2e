//! Seasons domain module (event-sourced).

pub mod season;

pub use season::{
    Season, SeasonCreated, SeasonEnded, SeasonEvent, SeasonFormatChanged, SeasonNameChanged,
    SeasonPlayerAdded, SeasonPlayerRemoved, SeasonStarted,
};
