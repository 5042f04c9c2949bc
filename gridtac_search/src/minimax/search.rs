use instant::Instant;

use gridtac::prelude::{
    Board, Eval, Mark, Move, SearchCounter, SearchEngine, SearchError, SearchResult,
};

use crate::minimax::ordering::{CandidateLists, ScoredMove};
use crate::minimax::types::{Bounds, MinimaxConfig};

pub(crate) struct SearchContext {
    pub branch_factor: usize,
    /// Worst-case cutoffs fire only when set. Exists so exhaustive and
    /// pruned searches of the same position can be compared.
    pub prune: bool,
    pub counter: SearchCounter,
}

/// One ply of the recursion. Applies each candidate in interleaved order,
/// undoes it on every exit path, and returns the extremal (move, score)
/// pair, first occurrence on ties.
pub(crate) fn minimax<B: Board>(
    board: &mut B,
    maximizing: bool,
    depth: u8,
    mut candidates: CandidateLists,
    bounds: Bounds,
    ctx: &mut SearchContext,
) -> Result<(Option<Move>, Eval), SearchError> {
    candidates.cap(ctx.branch_factor);
    let ordered = candidates.interleave(maximizing);
    if ordered.is_empty() {
        // every remaining legal cell is heuristically dead: score the
        // position as it stands
        ctx.counter.evals += 1;
        return Ok((None, Eval::from_repr(board.static_evaluate())));
    }

    let Bounds {
        mut max_worst,
        mut min_worst,
    } = bounds;
    let mut best: Option<(Move, Eval)> = None;

    for ScoredMove { mov, .. } in ordered {
        ctx.counter.states_visited += 1;
        let changes = board.apply(mov)?;

        if board.check_win(mov).is_some() {
            board.undo(changes, mov)?;
            // a completed win is decisive; nothing else at this node matters
            return Ok((Some(mov), Eval::win(mov.mark)));
        }

        let score = if depth == 1 {
            ctx.counter.evals += 1;
            let eval = Eval::from_repr(board.static_evaluate());
            board.undo(changes, mov)?;
            eval
        } else {
            let child = candidates.child_after(board, mov, &changes);
            let outcome = minimax(
                board,
                !maximizing,
                depth - 1,
                child,
                Bounds {
                    max_worst,
                    min_worst,
                },
                ctx,
            );
            let undone = board.undo(changes, mov);
            let (_, eval) = outcome?;
            undone?;
            eval
        };

        match best {
            None => best = Some((mov, score)),
            Some((_, incumbent)) => {
                if (maximizing && score > incumbent) || (!maximizing && score < incumbent) {
                    best = Some((mov, score));
                }
            }
        }

        if maximizing {
            if ctx.prune && score > min_worst {
                ctx.counter.prunes += 1;
                break;
            }
            if score > max_worst {
                max_worst = score;
            }
        } else {
            if ctx.prune && score < max_worst {
                ctx.counter.prunes += 1;
                break;
            }
            if score < min_worst {
                min_worst = score;
            }
        }
    }

    let Some((mov, eval)) = best else {
        // the loop recorded a choice before any break or return
        return Ok((None, Eval::from_repr(board.static_evaluate())));
    };
    Ok((Some(mov), eval))
}

fn first_legal<B: Board>(board: &B, mark: Mark) -> Option<Move> {
    board
        .positions()
        .map(|pos| Move::new(pos, mark))
        .find(|&mov| board.legal(mov))
}

/// Top-level move selection: collects and caps the root candidates, runs
/// the recursion with open bounds and reports the chosen move together
/// with fresh node counters and the elapsed wall clock.
pub struct MinimaxSearch {
    config: MinimaxConfig,
}

impl MinimaxSearch {
    pub fn new(config: MinimaxConfig) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[inline]
    pub fn config(&self) -> &MinimaxConfig {
        &self.config
    }

    pub fn search<B: Board>(
        &mut self,
        board: &mut B,
        mark: Mark,
    ) -> Result<SearchResult, SearchError> {
        let start = Instant::now();
        let mut ctx = SearchContext {
            branch_factor: self.config.branch_factor,
            prune: true,
            counter: SearchCounter::default(),
        };
        let mut candidates = CandidateLists::collect(board, mark);
        candidates.cap(self.config.branch_factor);
        let (mut best, eval) = minimax(
            board,
            mark.is_maximizer(),
            self.config.depth,
            candidates,
            Bounds::OPEN,
            &mut ctx,
        )?;
        if best.is_none() {
            // all remaining cells are dead for both sides; any legal one
            // is value-equivalent
            best = first_legal(board, mark);
        }
        let elapsed = start.elapsed();
        if self.config.debug {
            println!(
                "minimax {mark}: {eval:?} {}",
                ctx.counter.summary(elapsed.as_nanos())
            );
        }
        Ok(SearchResult {
            best,
            eval,
            counter: ctx.counter,
            elapsed,
        })
    }
}

impl SearchEngine for MinimaxSearch {
    fn select_move<B: Board>(
        &mut self,
        board: &mut B,
        mark: Mark,
    ) -> Result<SearchResult, SearchError> {
        self.search(board, mark)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use gridtac::prelude::{GridBoard, Position};
    use proptest::prelude::*;

    fn engine(depth: u8, branch_factor: usize) -> MinimaxSearch {
        MinimaxSearch::new(MinimaxConfig {
            depth,
            branch_factor,
            debug: false,
        })
        .expect("valid config")
    }

    fn place(board: &mut GridBoard, x: u8, y: u8, mark: Mark) {
        board
            .apply(Move::new(Position::new(x, y), mark))
            .expect("scripted move is legal");
    }

    /// Exhaustive game-theoretic value of a position: +1 when O forces a
    /// win, -1 when X does, 0 for a draw.
    fn solve(board: &mut GridBoard, to_move: Mark) -> i32 {
        let moves: Vec<Move> = board
            .positions()
            .map(|pos| Move::new(pos, to_move))
            .filter(|&mov| board.legal(mov))
            .collect();
        if moves.is_empty() {
            return 0;
        }
        let mut best = if to_move.is_maximizer() { -2 } else { 2 };
        for mov in moves {
            let changes = board.apply(mov).expect("legal");
            let value = if board.check_win(mov).is_some() {
                to_move.select((-1, 1))
            } else {
                solve(board, to_move.opposite())
            };
            board.undo(changes, mov).expect("round trip");
            best = if to_move.is_maximizer() {
                best.max(value)
            } else {
                best.min(value)
            };
        }
        best
    }

    /// A perfect-play reply: the first legal move achieving the position's
    /// game-theoretic value.
    fn oracle_move(board: &mut GridBoard, to_move: Mark) -> Move {
        let moves: Vec<Move> = board
            .positions()
            .map(|pos| Move::new(pos, to_move))
            .filter(|&mov| board.legal(mov))
            .collect();
        let mut best: Option<(Move, i32)> = None;
        for mov in moves {
            let changes = board.apply(mov).expect("legal");
            let value = if board.check_win(mov).is_some() {
                to_move.select((-1, 1))
            } else {
                solve(board, to_move.opposite())
            };
            board.undo(changes, mov).expect("round trip");
            let better = match best {
                None => true,
                Some((_, incumbent)) => {
                    if to_move.is_maximizer() {
                        value > incumbent
                    } else {
                        value < incumbent
                    }
                }
            };
            if better {
                best = Some((mov, value));
            }
        }
        best.expect("caller guarantees a legal move exists").0
    }

    #[test]
    fn immediate_win_is_taken_at_any_depth() {
        for depth in [1, 2, 5] {
            let mut board = GridBoard::standard();
            place(&mut board, 0, 0, Mark::O);
            place(&mut board, 0, 1, Mark::X);
            place(&mut board, 1, 0, Mark::O);
            place(&mut board, 1, 1, Mark::X);

            let result = engine(depth, 20)
                .search(&mut board, Mark::O)
                .expect("search succeeds");
            assert_eq!(Some(Position::new(2, 0)), result.best.map(|m| m.pos));
            assert_eq!(Eval::MAX, result.eval);
        }
    }

    #[test]
    fn minimizer_win_scores_to_the_other_extreme() {
        let mut board = GridBoard::standard();
        place(&mut board, 0, 0, Mark::X);
        place(&mut board, 0, 2, Mark::O);
        place(&mut board, 1, 1, Mark::X);
        place(&mut board, 1, 2, Mark::O);

        let result = engine(3, 20)
            .search(&mut board, Mark::X)
            .expect("search succeeds");
        assert_eq!(Some(Position::new(2, 2)), result.best.map(|m| m.pos));
        assert_eq!(Eval::MIN, result.eval);
    }

    #[test]
    fn opponent_threat_is_blocked_at_depth_two() {
        // X threatens the top row; O has no win of its own yet
        let mut board = GridBoard::standard();
        place(&mut board, 0, 0, Mark::X);
        place(&mut board, 1, 1, Mark::O);
        place(&mut board, 1, 0, Mark::X);

        for depth in [2, 3, 5] {
            let result = engine(depth, 20)
                .search(&mut board, Mark::O)
                .expect("search succeeds");
            assert_eq!(
                Some(Position::new(2, 0)),
                result.best.map(|m| m.pos),
                "depth {depth} must block the open row"
            );
        }
    }

    #[test]
    fn depth_one_matches_per_move_static_evaluation() {
        let mut board = GridBoard::standard();
        place(&mut board, 1, 1, Mark::O);
        place(&mut board, 0, 0, Mark::X);

        let mut best_static = None;
        for pos in board.positions() {
            let mov = Move::new(pos, Mark::O);
            if !board.legal(mov) {
                continue;
            }
            let changes = board.apply(mov).expect("legal");
            let eval = board.static_evaluate();
            board.undo(changes, mov).expect("round trip");
            best_static = Some(best_static.map_or(eval, |b: i64| b.max(eval)));
        }

        let result = engine(1, 20)
            .search(&mut board, Mark::O)
            .expect("search succeeds");
        assert_eq!(best_static, Some(result.eval.repr()));
    }

    #[test]
    fn board_is_bit_identical_after_search() {
        let mut board = GridBoard::new(4, 4, 3).expect("valid");
        place(&mut board, 1, 1, Mark::O);
        place(&mut board, 2, 2, Mark::X);
        let snapshot = board.clone();

        engine(4, 10).search(&mut board, Mark::O).expect("search");
        assert_eq!(snapshot, board);
        engine(4, 10).search(&mut board, Mark::X).expect("search");
        assert_eq!(snapshot, board);
    }

    #[test]
    fn full_board_yields_no_move() {
        let mut board = GridBoard::new(2, 2, 2).expect("valid");
        place(&mut board, 0, 0, Mark::O);
        place(&mut board, 1, 0, Mark::X);
        place(&mut board, 1, 1, Mark::X);
        place(&mut board, 0, 1, Mark::O);
        let done = engine(3, 20)
            .search(&mut board, Mark::X)
            .expect("search succeeds");
        assert_eq!(None, done.best);
    }

    #[test]
    fn empty_board_search_terminates_and_never_loses() {
        let mut board = GridBoard::standard();
        let mut engine = engine(5, 20);
        let mut to_move = Mark::O;
        loop {
            let mov = if to_move == Mark::O {
                engine
                    .search(&mut board, Mark::O)
                    .expect("search succeeds")
                    .best
                    .expect("cells remain")
            } else {
                oracle_move(&mut board, Mark::X)
            };
            assert!(board.legal(mov));
            board.apply(mov).expect("legal");
            if board.check_win(mov).is_some() {
                assert_eq!(
                    Mark::O,
                    mov.mark,
                    "the engine must never lose to perfect play from the empty board"
                );
                return;
            }
            if board.is_full() {
                return; // drawn, as classical tic-tac-toe should be
            }
            to_move = to_move.opposite();
        }
    }

    #[test]
    fn rejects_misconfiguration_before_searching() {
        assert!(MinimaxSearch::new(MinimaxConfig {
            depth: 0,
            branch_factor: 20,
            debug: false,
        })
        .is_err());
        assert!(MinimaxSearch::new(MinimaxConfig {
            depth: 5,
            branch_factor: 0,
            debug: false,
        })
        .is_err());
    }

    fn random_position(seq: &[(u8, u8)]) -> GridBoard {
        let mut board = GridBoard::new(4, 4, 3).expect("valid");
        let mut mark = Mark::O;
        for &(x, y) in seq {
            let mov = Move::new(Position::new(x, y), mark);
            if !board.legal(mov) {
                continue;
            }
            let changes = board.apply(mov).expect("checked legal");
            if board.check_win(mov).is_some() {
                // keep the position undecided
                board.undo(changes, mov).expect("round trip");
                break;
            }
            mark = mark.opposite();
        }
        board
    }

    proptest! {
        #[test]
        fn pruning_never_changes_the_root_value(
            seq in proptest::collection::vec((0u8..4, 0u8..4), 0..10)
        ) {
            let mut board = random_position(&seq);
            for mark in [Mark::O, Mark::X] {
                let mut evals = Vec::new();
                for prune in [true, false] {
                    let mut ctx = SearchContext {
                        branch_factor: 8,
                        prune,
                        counter: SearchCounter::default(),
                    };
                    let candidates = CandidateLists::collect(&board, mark);
                    let (_, eval) = minimax(
                        &mut board,
                        mark.is_maximizer(),
                        3,
                        candidates,
                        Bounds::OPEN,
                        &mut ctx,
                    )
                    .expect("search succeeds");
                    evals.push(eval);
                }
                prop_assert_eq!(evals[0], evals[1]);
            }
        }

        #[test]
        fn search_restores_arbitrary_positions(
            seq in proptest::collection::vec((0u8..4, 0u8..4), 0..10)
        ) {
            let mut board = random_position(&seq);
            let snapshot = board.clone();
            engine(3, 8).search(&mut board, Mark::O).expect("search succeeds");
            engine(3, 8).search(&mut board, Mark::X).expect("search succeeds");
            prop_assert_eq!(snapshot, board);
        }
    }
}
