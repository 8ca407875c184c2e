//! Players domain module (event-sourced).

pub mod player;

pub use player::{
    Player, PlayerCreated, PlayerEvent, PlayerNameChanged, PlayerTournamentRegistered, Role,
};
