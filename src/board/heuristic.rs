use super::GridBoard;
use crate::types::{Cell, CellScore, Mark, Position, HV};

/// Weight of a live window holding `k` own marks. Exponential so that a
/// window one mark short of a win dominates any number of colder windows.
#[inline]
pub(crate) fn weight(k: u8) -> HV {
    1 << (3 * k as u32)
}

impl GridBoard {
    pub(crate) fn count_marks(&self, window: &[Position]) -> (u8, u8) {
        let mut xs = 0;
        let mut os = 0;
        for &p in window {
            match self.tile(p).cell {
                Cell::Taken(Mark::X) => xs += 1,
                Cell::Taken(Mark::O) => os += 1,
                Cell::Empty => {}
            }
        }
        (xs, os)
    }

    /// Favorability pair for one cell, from scratch. A window is live for a
    /// side when it holds no opposing mark; each live window contributes
    /// its weight to that side's component. Occupied cells score zero.
    pub(crate) fn compute_cell_score(&self, pos: Position) -> CellScore {
        if !self.tile(pos).cell.is_empty() {
            return CellScore::ZERO;
        }
        let mut x_sum: HV = 0;
        let mut o_sum: HV = 0;
        self.geo().windows_through(pos, |w| {
            let (xs, os) = self.count_marks(w);
            if xs == 0 {
                o_sum += weight(os);
            }
            if os == 0 {
                x_sum += weight(xs);
            }
        });
        CellScore::new(-x_sum, o_sum)
    }

    /// Whole-position heuristic: the sum over every window of its live
    /// weight, positive for `O`, negative for `X`. All-empty windows are
    /// live for both sides and cancel out.
    pub(crate) fn evaluate_windows(&self) -> HV {
        let mut sum: HV = 0;
        self.geo().each_window(|w| {
            let (xs, os) = self.count_marks(w);
            if xs == 0 {
                sum += weight(os);
            }
            if os == 0 {
                sum -= weight(xs);
            }
        });
        sum
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::Move;

    fn board3() -> GridBoard {
        GridBoard::new(3, 3, 3).expect("3x3 is valid")
    }

    #[test]
    fn empty_board_scores_are_symmetric() {
        let board = board3();
        let center = board.cell_score(Position::new(1, 1));
        let corner = board.cell_score(Position::new(0, 0));
        let edge = board.cell_score(Position::new(1, 0));
        // four, three and two all-empty windows respectively
        assert_eq!(CellScore::new(-4, 4), center);
        assert_eq!(CellScore::new(-3, 3), corner);
        assert_eq!(CellScore::new(-2, 2), edge);
    }

    #[test]
    fn empty_board_evaluates_to_zero() {
        assert_eq!(0, board3().static_evaluate());
    }

    #[test]
    fn placed_mark_skews_neighbors_and_zeroes_itself() {
        let mut board = board3();
        let center = Position::new(1, 1);
        board
            .apply(Move::new(center, Mark::O))
            .expect("center is legal");

        assert_eq!(CellScore::ZERO, board.cell_score(center));

        // corner shares one diagonal with the O: two cold windows plus one
        // window carrying a single O
        let corner = board.cell_score(Position::new(0, 0));
        assert_eq!(CellScore::new(-2, 2 + weight(1)), corner);

        // four windows through the center, each now live for O alone
        assert_eq!(4 * weight(1), board.static_evaluate());
    }

    #[test]
    fn near_win_window_dominates() {
        let mut board = board3();
        board
            .apply(Move::new(Position::new(0, 0), Mark::O))
            .expect("legal");
        board
            .apply(Move::new(Position::new(1, 0), Mark::O))
            .expect("legal");
        let target = board.cell_score(Position::new(2, 0));
        assert!(target.o >= weight(2));
        assert!(board.static_evaluate() > 0);
    }

    #[test]
    fn blocked_window_is_dead_for_both() {
        let mut board = board3();
        board
            .apply(Move::new(Position::new(0, 0), Mark::O))
            .expect("legal");
        board
            .apply(Move::new(Position::new(2, 0), Mark::X))
            .expect("legal");
        // the top row holds both marks and is dead; only the still-empty
        // vertical window through (1, 0) contributes
        let mid = board.cell_score(Position::new(1, 0));
        assert_eq!(CellScore::new(-1, 1), mid);
    }
}
