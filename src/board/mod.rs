use crate::game_tree_search::Board;
use crate::types::{
    Cell, CellChange, CellScore, Changes, Mark, Move, Position, Positions, Tile, WinLine, HV,
};

mod heuristic;
mod lines;

use lines::{Geometry, AXES};

/// Run lengths above this would push the exponential window weights out of
/// the headroom reserved below the win sentinels.
pub const MAX_WIN_LENGTH: u8 = 12;

#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    #[error("invalid board geometry: {cols}x{rows} tiles with run length {win_len}")]
    InvalidDimensions { cols: u8, rows: u8, win_len: u8 },
    #[error("illegal move {0}")]
    IllegalMove(Move),
    #[error("undo record does not match the applied move {0}")]
    UndoMismatch(Move),
}

/// A rectangular grid of tiles. Mutated destructively move by move; every
/// `apply` hands back the exact record needed to reverse it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridBoard {
    geo: Geometry,
    tiles: Vec<Tile>,
}

impl GridBoard {
    pub fn new(cols: u8, rows: u8, win_len: u8) -> Result<Self, BoardError> {
        let valid = cols > 0
            && rows > 0
            && (2..=MAX_WIN_LENGTH).contains(&win_len)
            && win_len <= cols.max(rows);
        if !valid {
            return Err(BoardError::InvalidDimensions {
                cols,
                rows,
                win_len,
            });
        }
        let geo = Geometry {
            cols,
            rows,
            win_len,
        };
        let mut board = Self {
            geo,
            tiles: vec![Tile::default(); cols as usize * rows as usize],
        };
        for pos in board.positions() {
            let score = board.compute_cell_score(pos);
            let i = board.index(pos);
            board.tiles[i].score = score;
        }
        Ok(board)
    }

    /// Classical 3x3 tic-tac-toe.
    pub fn standard() -> Self {
        Self::new(3, 3, 3).expect("3x3 with run length 3 is a valid geometry")
    }

    #[inline]
    pub(crate) fn geo(&self) -> Geometry {
        self.geo
    }

    #[inline]
    pub fn columns(&self) -> u8 {
        self.geo.cols
    }

    #[inline]
    pub fn rows(&self) -> u8 {
        self.geo.rows
    }

    #[inline]
    pub fn win_length(&self) -> u8 {
        self.geo.win_len
    }

    #[inline]
    pub fn positions(&self) -> Positions {
        Positions::new(self.geo.cols, self.geo.rows)
    }

    #[inline]
    fn index(&self, pos: Position) -> usize {
        pos.y as usize * self.geo.cols as usize + pos.x as usize
    }

    #[inline]
    pub fn tile(&self, pos: Position) -> Tile {
        self.tiles[self.index(pos)]
    }

    #[inline]
    fn contains(&self, pos: Position) -> bool {
        self.geo.in_bounds(pos.x as i16, pos.y as i16)
    }

    pub fn legal(&self, mov: Move) -> bool {
        self.contains(mov.pos) && self.tile(mov.pos).cell.is_empty()
    }

    pub fn cell_score(&self, pos: Position) -> CellScore {
        self.tile(pos).score
    }

    pub fn is_full(&self) -> bool {
        self.tiles.iter().all(|t| !t.cell.is_empty())
    }

    /// Places the mark and refreshes the scores of every cell sharing a
    /// window with it. The returned record lists those cells with their
    /// pre-move state, in row-major order.
    pub fn apply(&mut self, mov: Move) -> Result<Changes, BoardError> {
        if !self.legal(mov) {
            return Err(BoardError::IllegalMove(mov));
        }
        let affected = self.geo.affected(mov.pos);
        let mut changes = Changes::new();
        for &pos in &affected {
            changes.push(CellChange {
                pos,
                prev: self.tile(pos),
            });
        }
        let placed = self.index(mov.pos);
        self.tiles[placed].cell = Cell::Taken(mov.mark);
        for &pos in &affected {
            let score = self.compute_cell_score(pos);
            let i = self.index(pos);
            self.tiles[i].score = score;
        }
        Ok(changes)
    }

    /// Reverses a prior `apply` exactly. A record that does not correspond
    /// to `mov` as the most recent mutation of these cells indicates a
    /// broken search invariant and is refused.
    pub fn undo(&mut self, changes: Changes, mov: Move) -> Result<(), BoardError> {
        let placed_now = self.contains(mov.pos) && self.tile(mov.pos).cell == Cell::Taken(mov.mark);
        let record_ok = changes
            .iter()
            .find(|c| c.pos == mov.pos)
            .is_some_and(|c| c.prev.cell.is_empty())
            && changes.iter().all(|c| self.contains(c.pos));
        if !placed_now || !record_ok {
            return Err(BoardError::UndoMismatch(mov));
        }
        for change in changes {
            let i = self.index(change.pos);
            self.tiles[i] = change.prev;
        }
        Ok(())
    }

    fn run_length(&self, pos: Position, mov_mark: Mark, dx: i16, dy: i16) -> i16 {
        let mut n = 0;
        let mut x = pos.x as i16 + dx;
        let mut y = pos.y as i16 + dy;
        while self.geo.in_bounds(x, y)
            && self.tile(Position::new(x as u8, y as u8)).cell == Cell::Taken(mov_mark)
        {
            n += 1;
            x += dx;
            y += dy;
        }
        n
    }

    /// Reports whether the just-applied move completed a run of at least
    /// `win_length` marks, and the full run it completed.
    pub fn check_win(&self, mov: Move) -> Option<WinLine> {
        if !self.contains(mov.pos) || self.tile(mov.pos).cell != Cell::Taken(mov.mark) {
            return None;
        }
        for (dx, dy) in AXES {
            let fwd = self.run_length(mov.pos, mov.mark, dx, dy);
            let back = self.run_length(mov.pos, mov.mark, -dx, -dy);
            if 1 + fwd + back >= self.geo.win_len as i16 {
                let start = Position::new(
                    (mov.pos.x as i16 - back * dx) as u8,
                    (mov.pos.y as i16 - back * dy) as u8,
                );
                let end = Position::new(
                    (mov.pos.x as i16 + fwd * dx) as u8,
                    (mov.pos.y as i16 + fwd * dy) as u8,
                );
                return Some(WinLine {
                    start,
                    end,
                    mark: mov.mark,
                });
            }
        }
        None
    }

    pub fn static_evaluate(&self) -> HV {
        self.evaluate_windows()
    }
}

impl Board for GridBoard {
    fn columns(&self) -> u8 {
        GridBoard::columns(self)
    }

    fn rows(&self) -> u8 {
        GridBoard::rows(self)
    }

    fn legal(&self, mov: Move) -> bool {
        GridBoard::legal(self, mov)
    }

    fn cell_score(&self, pos: Position) -> CellScore {
        GridBoard::cell_score(self, pos)
    }

    fn apply(&mut self, mov: Move) -> Result<Changes, BoardError> {
        GridBoard::apply(self, mov)
    }

    fn undo(&mut self, changes: Changes, mov: Move) -> Result<(), BoardError> {
        GridBoard::undo(self, changes, mov)
    }

    fn check_win(&self, mov: Move) -> Option<WinLine> {
        GridBoard::check_win(self, mov)
    }

    fn static_evaluate(&self) -> HV {
        GridBoard::static_evaluate(self)
    }
}
