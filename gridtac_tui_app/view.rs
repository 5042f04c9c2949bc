use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use gridtac::prelude::*;

use crate::App;

pub(crate) fn render<B: Backend>(f: &mut Frame<B>, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)].as_ref())
        .split(f.size());

    let board = Paragraph::new(board_lines(app))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" gridtac "));
    f.render_widget(board, chunks[0]);

    let status = Paragraph::new(status_line(app))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, chunks[1]);
}

fn winning_cells(app: &App) -> Vec<Position> {
    let Some(Outcome::Won(line)) = app.game.outcome() else {
        return Vec::new();
    };
    let dx = (line.end.x as i16 - line.start.x as i16).signum();
    let dy = (line.end.y as i16 - line.start.y as i16).signum();
    let mut cells = vec![line.start];
    let mut at = line.start;
    while at != line.end {
        at = Position::new((at.x as i16 + dx) as u8, (at.y as i16 + dy) as u8);
        cells.push(at);
    }
    cells
}

fn board_lines(app: &App) -> Vec<Spans<'static>> {
    let board = app.game.board();
    let winners = winning_cells(app);
    let show_cursor = app.game.outcome().is_none() && app.human_to_move();

    let mut lines = vec![Spans::from("")];
    for y in 0..board.rows() {
        let mut spans = Vec::new();
        for x in 0..board.columns() {
            let pos = Position::new(x, y);
            let (text, mut style) = match board.tile(pos).cell {
                Cell::Empty => (" . ", Style::default().fg(Color::DarkGray)),
                Cell::Taken(Mark::X) => (" X ", Style::default().fg(Color::Red)),
                Cell::Taken(Mark::O) => (" O ", Style::default().fg(Color::Cyan)),
            };
            if winners.contains(&pos) {
                style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
            }
            if show_cursor && pos == app.cursor {
                style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
            }
            spans.push(Span::styled(text.to_string(), style));
        }
        lines.push(Spans::from(spans));
    }
    lines
}

fn status_line(app: &App) -> Spans<'static> {
    let game = &app.game;
    let turn = match game.outcome() {
        Some(_) => "round over, n for a rematch".to_string(),
        None => format!("{} to move", game.to_move()),
    };
    Spans::from(vec![
        Span::styled(
            format!(
                " O {} - {} X ",
                game.player(Mark::O).wins(),
                game.player(Mark::X).wins()
            ),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("| {turn} | {}", app.status)),
    ])
}
