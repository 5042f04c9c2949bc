#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![doc = include_str!("../README.md")]

/// Tile grid, legality, reversible mutation, win detection and the
/// per-cell heuristic scores consumed by move ordering.
pub mod board;

/// Turn alternation, outcomes, interactive undo and win tallies.
pub mod game;

/// The search-facing contract: the `Board` trait, evaluation scalars and
/// the result/counter types shared by every search engine.
pub mod game_tree_search;

/// A participant in a game session: a mark, a move history and a win
/// counter.
pub mod player;

pub mod types;

/// Re-exports the `smallvec` crate
pub use smallvec;

pub mod prelude {
    pub use crate::board::{BoardError, GridBoard};
    pub use crate::game::{Game, GameError, Outcome};
    pub use crate::game_tree_search::{
        Board, Eval, SearchCounter, SearchEngine, SearchError, SearchResult,
    };
    pub use crate::player::Player;
    pub use crate::types::{
        by_mark::ByMark, Cell, CellChange, CellScore, Changes, Mark, Move, Position, Positions,
        Tile, WinLine, HV,
    };
}
