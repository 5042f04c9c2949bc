use instant::Instant;
use structopt::StructOpt;

use gridtac::prelude::*;
use gridtac_cli_utils::cli_args::{BoardOpts, GenericSearch, SearchAlgorithm, SearchOpts};

#[derive(Debug, StructOpt)]
#[structopt(about = "Scripted matches and search benchmarks for gridtac")]
enum BenchmarkOpts {
    /// Evaluate one move selection on a fresh board and report counters.
    Evaluate {
        #[structopt(flatten)]
        board: BoardOpts,

        #[structopt(flatten)]
        search: SearchOpts,
    },
    /// Play a series of rounds and report the win/draw tally.
    Match {
        #[structopt(flatten)]
        board: BoardOpts,

        #[structopt(flatten)]
        search: SearchOpts,

        #[structopt(long = "--rounds", default_value = "10")]
        rounds: u32,

        #[structopt(
            long = "--opponent",
            help = "minimax|random: engine playing X (defaults to the same configuration)"
        )]
        opponent: Option<SearchAlgorithm>,
    },
}

fn evaluate(board_opts: &BoardOpts, search_opts: &SearchOpts) -> Result<(), Box<dyn std::error::Error>> {
    let mut board = board_opts.build_board()?;
    let mut engine = search_opts.make_search()?;
    let result = engine.select_move(&mut board, Mark::O)?;
    match result.best {
        Some(mov) => println!("best move: {mov}  eval: {:?}", result.eval),
        None => println!("no move available  eval: {:?}", result.eval),
    }
    println!("{}", result.counter.summary(result.elapsed.as_nanos()));
    Ok(())
}

/// One full round; returns the outcome and accumulates both sides'
/// counters and search time.
fn play_round(
    board: GridBoard,
    engines: &mut ByMark<GenericSearch>,
    first: Mark,
    totals: &mut ByMark<(SearchCounter, u128)>,
) -> Result<Outcome, Box<dyn std::error::Error>> {
    let mut game = Game::new(board, first);
    loop {
        let mark = game.to_move();
        let result = engines
            .get_mut(mark)
            .select_move(game.board_mut(), mark)?;
        let Some(mov) = result.best else {
            return Err("engine returned no move on a playable board".into());
        };
        let tally = totals.get_mut(mark);
        tally.0.add_in_place(&result.counter);
        tally.1 += result.elapsed.as_nanos();
        if let Some(outcome) = game.play(mov)? {
            return Ok(outcome);
        }
    }
}

fn run_match(
    board_opts: &BoardOpts,
    search_opts: &SearchOpts,
    rounds: u32,
    opponent: Option<SearchAlgorithm>,
) -> Result<(), Box<dyn std::error::Error>> {
    let opponent_opts = SearchOpts {
        algorithm: opponent.or(search_opts.algorithm),
        ..search_opts.clone()
    };
    let mut engines = ByMark::new(opponent_opts.make_search()?, search_opts.make_search()?);
    let mut wins = ByMark::new(0u32, 0u32);
    let mut draws = 0u32;
    let mut totals = ByMark::new(
        (SearchCounter::default(), 0u128),
        (SearchCounter::default(), 0u128),
    );

    let start = Instant::now();
    let mut first = Mark::O;
    for round in 0..rounds {
        let outcome = play_round(board_opts.build_board()?, &mut engines, first, &mut totals)?;
        match outcome {
            Outcome::Won(line) => {
                *wins.get_mut(line.mark) += 1;
                println!("round {}: {} wins ({} started)", round + 1, line.mark, first);
            }
            Outcome::Draw => {
                draws += 1;
                println!("round {}: draw ({} started)", round + 1, first);
            }
        }
        first = first.opposite();
    }

    println!();
    println!(
        "O {} - X {} with {} draws in {:.2}s",
        wins[Mark::O],
        wins[Mark::X],
        draws,
        start.elapsed().as_secs_f64()
    );
    for mark in [Mark::O, Mark::X] {
        let (counter, nanos) = totals[mark];
        if nanos > 0 {
            println!("{mark}: {}", counter.summary(nanos));
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    match BenchmarkOpts::from_args() {
        BenchmarkOpts::Evaluate { board, search } => evaluate(&board, &search),
        BenchmarkOpts::Match {
            board,
            search,
            rounds,
            opponent,
        } => run_match(&board, &search, rounds, opponent),
    }
}
