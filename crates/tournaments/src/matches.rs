//! Matches and games.
//!
//! A match is a best-of-N series between two participants. It holds exactly
//! one open game at a time; a new game is appended only while neither side
//! has reached the tournament's games-to-win threshold.

use serde::{Deserialize, Serialize};

use draftleague_core::PlayerId;

/// A single game inside a match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    /// Empty while undecided, and for drawn games.
    pub winner: PlayerId,
    pub draw: bool,
    pub ended: bool,
}

/// A best-of-N series between two participants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub player1: PlayerId,
    pub player2: PlayerId,
    /// Empty until decided, and for drawn matches.
    pub winner: PlayerId,
    pub p1_count: u32,
    pub p2_count: u32,
    pub games: Vec<Game>,
    pub draw: bool,
    pub ended: bool,
}

impl Match {
    /// A fresh fixture with one open game and zero counters.
    pub fn between(player1: PlayerId, player2: PlayerId) -> Self {
        Self {
            player1,
            player2,
            games: vec![Game::default()],
            ..Self::default()
        }
    }

    /// Recompute both sides' game-win tallies by rescanning every game.
    ///
    /// The incremental counters are authoritative; this full rescan exists
    /// so tests can assert both bookkeeping strategies agree bit-for-bit
    /// after any game-ended fold.
    pub fn recount(&self) -> (u32, u32) {
        let mut p1 = 0;
        let mut p2 = 0;
        for game in &self.games {
            if !game.ended || game.draw {
                continue;
            }
            if game.winner == self.player1 {
                p1 += 1;
            } else if game.winner == self.player2 {
                p2 += 1;
            }
        }
        (p1, p2)
    }

    /// The currently open game's index, if the match is still running.
    pub fn open_game(&self) -> Option<usize> {
        self.games.iter().position(|g| !g.ended)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_fresh_match_has_one_open_game() {
        let m = Match::between(PlayerId::from("a"), PlayerId::from("b"));
        assert_eq!(m.games.len(), 1);
        assert_eq!(m.open_game(), Some(0));
        assert!(!m.ended);
        assert!(!m.draw);
        assert_eq!((m.p1_count, m.p2_count), (0, 0));
    }

    #[test]
    fn recount_skips_draws_and_open_games() {
        let mut m = Match::between(PlayerId::from("a"), PlayerId::from("b"));
        m.games = vec![
            Game {
                winner: PlayerId::from("a"),
                draw: false,
                ended: true,
            },
            Game {
                winner: PlayerId::default(),
                draw: true,
                ended: true,
            },
            Game::default(),
        ];
        assert_eq!(m.recount(), (1, 0));
    }
}
