use std::{io, time::Duration};

use crossterm::{
    event::{poll, read, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use structopt::StructOpt;
use tui::{backend::CrosstermBackend, Terminal};

use gridtac::prelude::*;
use gridtac_cli_utils::cli_args::{BoardOpts, GenericSearch, SearchOpts};

mod view;

#[derive(Debug, StructOpt)]
#[structopt(about = "Generalized tic-tac-toe with a minimax opponent")]
struct AppOpts {
    #[structopt(flatten)]
    board: BoardOpts,

    #[structopt(flatten)]
    search: SearchOpts,

    #[structopt(long = "--two-player", help = "Two humans at one keyboard, no AI")]
    two_player: bool,
}

pub(crate) struct App {
    pub game: Game,
    pub cursor: Position,
    pub human: Mark,
    pub ai: Option<GenericSearch>,
    pub status: String,
    pub starter: Mark,
}

impl App {
    pub(crate) fn human_to_move(&self) -> bool {
        self.ai.is_none() || self.game.to_move() == self.human
    }

    fn move_cursor(&mut self, dx: i16, dy: i16) {
        let cols = self.game.board().columns() as i16;
        let rows = self.game.board().rows() as i16;
        let x = (self.cursor.x as i16 + dx).rem_euclid(cols);
        let y = (self.cursor.y as i16 + dy).rem_euclid(rows);
        self.cursor = Position::new(x as u8, y as u8);
    }

    fn place_at_cursor(&mut self) {
        if self.game.outcome().is_some() || !self.human_to_move() {
            return;
        }
        let mov = Move::new(self.cursor, self.game.to_move());
        if !self.game.board().legal(mov) {
            // ignored: the player just clicks elsewhere
            self.status = format!("{} is not open", self.cursor);
            return;
        }
        match self.game.play(mov) {
            Ok(outcome) => self.announce(mov, outcome),
            Err(err) => self.status = err.to_string(),
        }
    }

    fn ai_turn(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if self.game.outcome().is_some() || self.human_to_move() {
            return Ok(());
        }
        let mark = self.game.to_move();
        let Some(engine) = self.ai.as_mut() else {
            return Ok(());
        };
        let result = engine.select_move(self.game.board_mut(), mark)?;
        let Some(mov) = result.best else {
            return Ok(());
        };
        let outcome = self.game.play(mov)?;
        if outcome.is_some() {
            self.announce(mov, outcome);
        } else {
            self.status = format!(
                "{mov} · {}",
                result.counter.summary(result.elapsed.as_nanos())
            );
        }
        Ok(())
    }

    fn announce(&mut self, mov: Move, outcome: Option<Outcome>) {
        self.status = match outcome {
            Some(Outcome::Won(line)) => format!("{} wins!", line.mark),
            Some(Outcome::Draw) => "draw".into(),
            None => format!("{mov}"),
        };
    }

    fn undo(&mut self) {
        // against the AI, take back its reply along with the human move
        let steps = if self.ai.is_some() { 2 } else { 1 };
        for _ in 0..steps {
            match self.game.undo_last() {
                Ok(Some(mov)) => self.status = format!("took back {mov}"),
                Ok(None) => break,
                Err(err) => {
                    self.status = err.to_string();
                    break;
                }
            }
        }
    }

    fn next_round(&mut self) {
        self.starter = self.starter.opposite();
        if let Err(err) = self.game.reset_round(self.starter) {
            self.status = err.to_string();
            return;
        }
        self.status = format!("new round, {} starts", self.starter);
    }
}

fn run(mut app: App) -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result?;

    println!(
        "final tally: O {} - X {}",
        app.game.player(Mark::O).wins(),
        app.game.player(Mark::X).wins()
    );
    Ok(())
}

fn event_loop<B: tui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|f| view::render(f, app))?;
        app.ai_turn()?;

        if !poll(Duration::from_millis(150))? {
            continue;
        }
        let Event::Key(key) = read()? else {
            continue;
        };
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
            KeyCode::Left => app.move_cursor(-1, 0),
            KeyCode::Right => app.move_cursor(1, 0),
            KeyCode::Up => app.move_cursor(0, -1),
            KeyCode::Down => app.move_cursor(0, 1),
            KeyCode::Enter | KeyCode::Char(' ') => app.place_at_cursor(),
            KeyCode::Char('u') => app.undo(),
            KeyCode::Char('n') => app.next_round(),
            _ => {}
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opts = AppOpts::from_args();
    let board = opts.board.build_board()?;
    let ai = if opts.two_player {
        None
    } else {
        Some(opts.search.make_search()?)
    };

    // the human owns O and opens the first round
    let starter = Mark::O;
    let app = App {
        game: Game::new(board, starter),
        cursor: Position::new(0, 0),
        human: Mark::O,
        ai,
        status: "arrows move, enter places, u undoes, n next round, q quits".into(),
        starter,
    };
    run(app)
}
