use gridtac::prelude::{Board, CellScore, Changes, Mark, Move};
use gridtac::smallvec::SmallVec;
use itertools::Itertools;

pub type CandidateList = SmallVec<[ScoredMove; 16]>;

/// A legal move together with the heuristic pair of its target cell at
/// enumeration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredMove {
    pub score: CellScore,
    pub mov: Move,
}

/// The two ordering lists for one ply: cells favoring the minimizer
/// (negative x-component, ascending) and cells favoring the maximizer
/// (positive o-component, ascending, consumed from the tail). A cell
/// favorable to both sides appears in both lists.
#[derive(Debug, Clone, Default)]
pub struct CandidateLists {
    pub x_fav: CandidateList,
    pub o_fav: CandidateList,
}

impl CandidateLists {
    /// Scans every cell in row-major order and keeps the legal,
    /// informative ones. Cells scoring `(0, 0)` sit in no live window and
    /// are dropped entirely.
    pub fn collect<B: Board>(board: &B, mark: Mark) -> Self {
        let mut lists = Self::default();
        for pos in board.positions() {
            let mov = Move::new(pos, mark);
            if !board.legal(mov) {
                continue;
            }
            let score = board.cell_score(pos);
            if score.is_neutral() {
                continue;
            }
            if score.x < 0 {
                lists.x_fav.push(ScoredMove { score, mov });
            }
            if score.o > 0 {
                lists.o_fav.push(ScoredMove { score, mov });
            }
        }
        lists.x_fav.sort_by_key(|m| m.score.x);
        lists.o_fav.sort_by_key(|m| m.score.o);
        lists
    }

    /// Bounds the branching: the minimizer list keeps its most negative
    /// head, the maximizer list its most positive tail, each at most half
    /// the cap.
    pub fn cap(&mut self, branch_factor: usize) {
        let half = branch_factor / 2;
        self.x_fav.truncate(half);
        if self.o_fav.len() > half {
            let cut = self.o_fav.len() - half;
            self.o_fav.drain(..cut);
        }
    }

    /// One exploration order out of the two lists. The mover's strongest
    /// chunk leads, the chunk strongest for the opponent follows
    /// immediately, so the worst-case cutoff fires early.
    pub(crate) fn interleave(&self, maximizing: bool) -> Vec<ScoredMove> {
        let x = &self.x_fav;
        let o = &self.o_fav;
        let hx = x.len() / 2;
        let ho = o.len() / 2;
        let mut out = Vec::with_capacity(x.len() + o.len());
        if maximizing {
            out.extend_from_slice(&o[ho..]);
            out.extend_from_slice(&x[..hx]);
            out.extend_from_slice(&o[..ho]);
            out.extend_from_slice(&x[hx..]);
        } else {
            out.extend_from_slice(&x[..hx]);
            out.extend_from_slice(&o[ho..]);
            out.extend_from_slice(&x[hx..]);
            out.extend_from_slice(&o[..ho]);
        }
        out
    }

    /// Lists for the next ply after `played`: fresh entries for the cells
    /// the move touched (their scores changed), surviving inherited
    /// entries for the rest, re-marked for the next mover. The played cell
    /// is always part of the affected set, so no inherited entry for it
    /// survives, and it is no longer legal for a fresh one.
    pub(crate) fn child_after<B: Board>(
        &self,
        board: &B,
        played: Move,
        changes: &Changes,
    ) -> CandidateLists {
        let next = played.mark.opposite();
        let affected = |mov: Move| changes.iter().any(|c| c.pos == mov.pos);

        let mut fresh_x = CandidateList::new();
        let mut fresh_o = CandidateList::new();
        for change in changes {
            let mov = Move::new(change.pos, next);
            if !board.legal(mov) {
                continue;
            }
            let score = board.cell_score(change.pos);
            if score.is_neutral() {
                continue;
            }
            if score.x < 0 {
                fresh_x.push(ScoredMove { score, mov });
            }
            if score.o > 0 {
                fresh_o.push(ScoredMove { score, mov });
            }
        }
        fresh_x.sort_by_key(|m| m.score.x);
        fresh_o.sort_by_key(|m| m.score.o);

        let x_fav = self
            .x_fav
            .iter()
            .filter(|m| !affected(m.mov))
            .map(|m| ScoredMove {
                score: m.score,
                mov: Move::new(m.mov.pos, next),
            })
            .merge_by(fresh_x, |a, b| a.score.x <= b.score.x)
            .collect();
        let o_fav = self
            .o_fav
            .iter()
            .filter(|m| !affected(m.mov))
            .map(|m| ScoredMove {
                score: m.score,
                mov: Move::new(m.mov.pos, next),
            })
            .merge_by(fresh_o, |a, b| a.score.o <= b.score.o)
            .collect();

        CandidateLists { x_fav, o_fav }
    }
}
