use std::str::FromStr;

use structopt::StructOpt;

use gridtac::prelude::{
    Board, BoardError, Eval, GridBoard, Mark, Move, SearchEngine, SearchError, SearchResult,
};
use gridtac_search::{MinimaxConfig, MinimaxSearch};
use rand::{rngs::SmallRng, Rng, SeedableRng};

#[derive(Debug, Copy, Clone)]
pub enum SearchAlgorithm {
    Minimax,
    Random,
}

impl FromStr for SearchAlgorithm {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "minimax" => Ok(Self::Minimax),
            "random" => Ok(Self::Random),
            _ => Err("expected minimax|random"),
        }
    }
}

/// Startup parameters of the board: a window is divided into square tiles.
#[derive(Debug, StructOpt, Clone)]
pub struct BoardOpts {
    #[structopt(
        short = "W",
        long = "--window-width",
        default_value = "600",
        help = "Window width in pixels"
    )]
    pub window_width: u16,

    #[structopt(
        short = "H",
        long = "--window-height",
        default_value = "600",
        help = "Window height in pixels"
    )]
    pub window_height: u16,

    #[structopt(
        short = "t",
        long = "--tile-size",
        default_value = "200",
        help = "Tile size in pixels; columns and rows are the window dimensions divided by this"
    )]
    pub tile_size: u16,

    #[structopt(
        short = "w",
        long = "--win-length",
        default_value = "3",
        help = "Number of marks in a row that completes a win"
    )]
    pub win_length: u8,
}

impl BoardOpts {
    pub fn build_board(&self) -> Result<GridBoard, BoardError> {
        let (cols, rows) = self.grid_dimensions();
        GridBoard::new(cols, rows, self.win_length)
    }

    pub fn grid_dimensions(&self) -> (u8, u8) {
        let tiles = |span: u16| -> u8 {
            if self.tile_size == 0 {
                return 0;
            }
            (span / self.tile_size).min(u8::MAX as u16) as u8
        };
        (tiles(self.window_width), tiles(self.window_height))
    }
}

#[derive(Debug, StructOpt, Clone, Default)]
pub struct SearchOpts {
    #[structopt(
        short = "A",
        long = "--algorithm",
        help = "minimax|random: how the computer side picks its moves"
    )]
    pub algorithm: Option<SearchAlgorithm>,

    #[structopt(short = "d", long = "--depth", help = "Minimax: search depth in plies")]
    pub depth: Option<u8>,

    #[structopt(
        short = "b",
        long = "--branch-factor",
        help = "Minimax: max candidate moves examined per node"
    )]
    pub branch_factor: Option<usize>,

    #[structopt(short = "S", long = "--seed", help = "Random seed for the random engine")]
    pub seed: Option<u64>,

    #[structopt(short = "D", long = "--debug", help = "Print per-move search summaries")]
    pub debug: bool,
}

impl SearchOpts {
    pub fn minimax_config(&self) -> MinimaxConfig {
        let defaults = MinimaxConfig::default();
        MinimaxConfig {
            depth: self.depth.unwrap_or(defaults.depth),
            branch_factor: self.branch_factor.unwrap_or(defaults.branch_factor),
            debug: self.debug,
        }
    }

    pub fn make_search(&self) -> Result<GenericSearch, SearchError> {
        Ok(match self.algorithm.unwrap_or(SearchAlgorithm::Minimax) {
            SearchAlgorithm::Minimax => {
                GenericSearch::Minimax(MinimaxSearch::new(self.minimax_config())?)
            }
            SearchAlgorithm::Random => GenericSearch::Random(RandomSearch::new(self.seed)),
        })
    }
}

/// Uniformly random legal move; the baseline opponent for matches.
pub struct RandomSearch {
    rng: SmallRng,
}

impl RandomSearch {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self { rng }
    }
}

impl SearchEngine for RandomSearch {
    fn select_move<B: Board>(
        &mut self,
        board: &mut B,
        mark: Mark,
    ) -> Result<SearchResult, SearchError> {
        let legal: Vec<Move> = board
            .positions()
            .map(|pos| Move::new(pos, mark))
            .filter(|&mov| board.legal(mov))
            .collect();
        let best = if legal.is_empty() {
            None
        } else {
            Some(legal[self.rng.gen_range(0..legal.len())])
        };
        Ok(SearchResult {
            best,
            eval: Eval::from_repr(0),
            ..Default::default()
        })
    }
}

pub enum GenericSearch {
    Minimax(MinimaxSearch),
    Random(RandomSearch),
}

impl SearchEngine for GenericSearch {
    fn select_move<B: Board>(
        &mut self,
        board: &mut B,
        mark: Mark,
    ) -> Result<SearchResult, SearchError> {
        match self {
            Self::Minimax(s) => s.select_move(board, mark),
            Self::Random(s) => s.select_move(board, mark),
        }
    }
}
