use crate::board::{BoardError, GridBoard};
use crate::player::Player;
use crate::types::{by_mark::ByMark, Changes, Mark, Move, WinLine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    Won(WinLine),
    Draw,
}

#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    #[error("it is not {0}'s turn")]
    NotYourTurn(Mark),
    #[error("the round is already over")]
    GameOver,
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// One session of play: a board, two players, turn alternation and
/// round-by-round win tallies. Search-time board mutation happens outside
/// of this type; `Game` only ever sees committed moves.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Game {
    board: GridBoard,
    players: ByMark<Player>,
    to_move: Mark,
    history: Vec<(Move, Changes)>,
    outcome: Option<Outcome>,
}

impl Game {
    /// `first` moves first. Marks are assigned here, explicitly; nothing
    /// depends on the order the `Player` values were created in.
    pub fn new(board: GridBoard, first: Mark) -> Self {
        Self {
            board,
            players: ByMark::new(Player::new(Mark::X), Player::new(Mark::O)),
            to_move: first,
            history: Vec::new(),
            outcome: None,
        }
    }

    #[inline]
    pub fn board(&self) -> &GridBoard {
        &self.board
    }

    /// The board as a mutable search workspace. The caller must leave it
    /// exactly as found; committed moves go through [`Game::play`].
    #[inline]
    pub fn board_mut(&mut self) -> &mut GridBoard {
        &mut self.board
    }

    #[inline]
    pub fn to_move(&self) -> Mark {
        self.to_move
    }

    #[inline]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    #[inline]
    pub fn player(&self, mark: Mark) -> &Player {
        self.players.get(mark)
    }

    #[inline]
    pub fn moves_played(&self) -> usize {
        self.history.len()
    }

    /// Commits a move for the side to move. Returns the outcome if the
    /// move ended the round.
    pub fn play(&mut self, mov: Move) -> Result<Option<Outcome>, GameError> {
        if self.outcome.is_some() {
            return Err(GameError::GameOver);
        }
        if mov.mark != self.to_move {
            return Err(GameError::NotYourTurn(mov.mark));
        }
        let changes = self.board.apply(mov)?;
        self.players.get_mut(mov.mark).record(mov);
        self.history.push((mov, changes));

        if let Some(line) = self.board.check_win(mov) {
            self.players.get_mut(mov.mark).credit_win();
            self.outcome = Some(Outcome::Won(line));
        } else if self.board.is_full() {
            self.outcome = Some(Outcome::Draw);
        } else {
            self.to_move = self.to_move.opposite();
        }
        Ok(self.outcome)
    }

    /// Takes back the most recent committed move. A finished round is
    /// reopened (and a credited win revoked).
    pub fn undo_last(&mut self) -> Result<Option<Move>, GameError> {
        let Some((mov, changes)) = self.history.pop() else {
            return Ok(None);
        };
        self.board.undo(changes, mov)?;
        self.players.get_mut(mov.mark).forget_last();
        if let Some(Outcome::Won(line)) = self.outcome {
            if line.mark == mov.mark {
                self.players.get_mut(mov.mark).revoke_win();
            }
        }
        self.outcome = None;
        self.to_move = mov.mark;
        Ok(Some(mov))
    }

    /// Clears the board for a rematch, alternating who starts and keeping
    /// the win tallies.
    pub fn reset_round(&mut self, first: Mark) -> Result<(), GameError> {
        let board = GridBoard::new(
            self.board.columns(),
            self.board.rows(),
            self.board.win_length(),
        )?;
        self.board = board;
        self.history.clear();
        self.outcome = None;
        self.to_move = first;
        self.players.get_mut(Mark::X).clear_history();
        self.players.get_mut(Mark::O).clear_history();
        Ok(())
    }
}
