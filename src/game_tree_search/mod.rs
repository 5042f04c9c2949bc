use std::ops::Add;

use crate::board::BoardError;
use crate::types::{CellScore, Changes, Mark, Move, Position, Positions, WinLine, HV};

/// A game state evaluation. `MIN`/`MAX` are the terminal win scores and
/// double as the open search bounds; every static evaluation lies strictly
/// between them.
#[derive(Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Eval {
    _repr: HV,
}

/// Forced win for the maximizer. Strictly dominates any heuristic sum the
/// board can produce.
pub const WINNER: HV = 1 << 60;

impl Eval {
    pub const MIN: Eval = Eval::from_repr(-WINNER);
    pub const MAX: Eval = Eval::from_repr(WINNER);

    #[inline]
    pub const fn from_repr(eval: HV) -> Self {
        Self { _repr: eval }
    }

    #[inline]
    pub fn repr(self) -> HV {
        self._repr
    }

    /// The terminal score for a winning move by `mark`.
    #[inline]
    pub fn win(mark: Mark) -> Self {
        if mark.is_maximizer() {
            Self::MAX
        } else {
            Self::MIN
        }
    }
}

impl std::fmt::Debug for Eval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if *self == Self::MAX {
            f.write_str("Ev(+win)")
        } else if *self == Self::MIN {
            f.write_str("Ev(-win)")
        } else {
            write!(f, "Ev({:+})", self._repr)
        }
    }
}

/// The board contract required by the search engines.
///
/// `apply` mutates in place and returns an undo token that doubles as the
/// report of which cells the move touched; `undo` consumes that token and
/// must restore the board exactly. An `apply`/`undo` mismatch is a broken
/// invariant and aborts the search.
pub trait Board {
    fn columns(&self) -> u8;

    fn rows(&self) -> u8;

    /// Row-major traversal of every cell.
    fn positions(&self) -> Positions {
        Positions::new(self.columns(), self.rows())
    }

    /// Is the candidate currently placeable.
    fn legal(&self, mov: Move) -> bool;

    /// Current per-cell favorability pair.
    fn cell_score(&self, pos: Position) -> CellScore;

    fn apply(&mut self, mov: Move) -> Result<Changes, BoardError>;

    fn undo(&mut self, changes: Changes, mov: Move) -> Result<(), BoardError>;

    /// Did the just-applied move complete a winning run.
    fn check_win(&self, mov: Move) -> Option<WinLine>;

    /// Full-position heuristic, used when the depth budget is exhausted.
    fn static_evaluate(&self) -> HV;
}

#[derive(Debug, Default, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchCounter {
    /// Number of candidate moves applied to the board.
    pub states_visited: u64,
    /// Number of static position evaluations.
    pub evals: u64,
    /// Number of times the worst-case cutoff fired.
    pub prunes: u64,
}

impl SearchCounter {
    #[inline]
    pub fn add_in_place(&mut self, c: &SearchCounter) {
        self.states_visited += c.states_visited;
        self.evals += c.evals;
        self.prunes += c.prunes;
    }

    pub fn summary(&self, dt_ns: u128) -> String {
        let dt_ms: f64 = 1e-6 * (dt_ns as f64);
        let rate: f64 = (1e-6_f64 * 1e9_f64) * (self.states_visited as f64) / (dt_ns as f64);
        format!(
            "dt={dt_ms:.2}ms states={} evals={} prunes={} rate={rate:.4} Mstates/s",
            self.states_visited, self.evals, self.prunes
        )
    }
}

impl Add for SearchCounter {
    type Output = SearchCounter;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        let mut a = self;
        a.add_in_place(&rhs);
        a
    }
}

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchResult {
    /// The chosen move. `None` only when the board has no legal cell left.
    pub best: Option<Move>,
    pub eval: Eval,
    pub counter: SearchCounter,
    /// Wall-clock duration of the selection, for observability only.
    pub elapsed: std::time::Duration,
}

impl Default for SearchResult {
    fn default() -> Self {
        SearchResult {
            best: None,
            eval: Eval::MIN,
            counter: SearchCounter::default(),
            elapsed: std::time::Duration::ZERO,
        }
    }
}

/// Configuration problems are reported before a search begins; board
/// failures mid-search indicate a broken mutation invariant and are
/// propagated without repair.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("search depth must be at least 1, got {0}")]
    InvalidDepth(u8),
    #[error("branch factor must be at least 1, got {0}")]
    InvalidBranchFactor(usize),
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Anything that can pick a move for a side on a board.
pub trait SearchEngine {
    fn select_move<B: Board>(&mut self, board: &mut B, mark: Mark)
        -> Result<SearchResult, SearchError>;
}
