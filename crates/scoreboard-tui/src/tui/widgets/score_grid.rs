// Score grid widget: totals row plus one row per round, newest round first.
//
// Scrolls vertically to keep the cursor row visible and windows the player
// columns when they don't all fit.

use chrono::Local;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;
use scoreboard_core::{CellRef, GameSession};

use crate::protocol::FeedbackKind;
use crate::tui::ViewState;

const LABEL_WIDTH: u16 = 10;
const COLUMN_WIDTH: u16 = 9;
/// Header and totals rows above the rounds.
const FIXED_ROWS: u16 = 2;

/// Render the score grid into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &mut ViewState) {
    let Some(session) = state.session.clone() else {
        frame.render_widget(
            Paragraph::new("No game in progress").block(Block::default().borders(Borders::ALL)),
            area,
        );
        return;
    };

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(3)])
        .split(area);

    render_status(frame, sections[0], state, &session);

    let table_area = sections[1];
    let visible_rows = table_area.height.saturating_sub(2 + FIXED_ROWS).max(1) as usize;
    state.grid_scroll = scroll_for(state.grid_cursor.row, state.grid_scroll, visible_rows);

    let visible_cols =
        (table_area.width.saturating_sub(2 + LABEL_WIDTH) / COLUMN_WIDTH).max(1) as usize;
    let first_col = state
        .grid_cursor
        .col
        .saturating_sub(visible_cols.saturating_sub(1));
    let last_col = (first_col + visible_cols).min(session.player_count());

    render_table(
        frame,
        table_area,
        state,
        &session,
        first_col..last_col,
        visible_rows,
    );
}

/// New scroll offset that keeps `cursor_row` inside a window of `visible`.
pub fn scroll_for(cursor_row: usize, scroll: usize, visible: usize) -> usize {
    if cursor_row < scroll {
        cursor_row
    } else if cursor_row >= scroll + visible {
        cursor_row + 1 - visible
    } else {
        scroll
    }
}

fn render_status(frame: &mut Frame, area: Rect, state: &ViewState, session: &GameSession) {
    let rule = if session.high_score_wins() {
        "High score wins"
    } else {
        "Low score wins"
    };
    let started = session
        .started_at()
        .map(|t| format!(" | Started {}", t.with_timezone(&Local).format("%H:%M")))
        .unwrap_or_default();
    let info = Line::from(format!(
        "{} | {} rounds{}",
        rule,
        session.round_count(),
        started
    ));

    let entry = match (session.selection(), state.editing_score) {
        (Some(cell), true) => Line::from(vec![
            Span::styled(
                format!("{} | Round {}: ", session.players()[cell.player], cell.round + 1),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(state.score_input.clone()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]),
        _ => match &state.feedback.grid {
            Some(fb) => {
                let color = match fb.kind {
                    FeedbackKind::Error => Color::Red,
                    FeedbackKind::Success => Color::Green,
                };
                Line::from(Span::styled(fb.text.clone(), Style::default().fg(color)))
            }
            None => Line::from(""),
        },
    };

    frame.render_widget(Paragraph::new(vec![info, entry]), area);
}

fn render_table(
    frame: &mut Frame,
    area: Rect,
    state: &ViewState,
    session: &GameSession,
    cols: std::ops::Range<usize>,
    visible_rows: usize,
) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let selection = session.selection();

    let mut header_cells = vec![Cell::from("")];
    header_cells.extend(
        session.players()[cols.clone()]
            .iter()
            .map(|name| Cell::from(name.clone())),
    );
    let header = Row::new(header_cells).style(bold.fg(Color::White));

    let mut total_cells = vec![Cell::from("Total")];
    total_cells.extend(
        session.totals()[cols.clone()]
            .iter()
            .map(|t| Cell::from(t.to_string())),
    );
    let mut rows = vec![Row::new(total_cells).style(bold.fg(Color::Yellow))];

    let rounds = session.round_count();
    for display_row in state.grid_scroll..(state.grid_scroll + visible_rows).min(rounds) {
        let round = rounds - 1 - display_row;
        let mut cells = vec![Cell::from(format!("Round {}", round + 1))];
        for player in cols.clone() {
            let style = cell_style(state, selection, display_row, round, player);
            cells.push(Cell::from(session.scores()[round][player].to_string()).style(style));
        }
        rows.push(Row::new(cells));
    }

    let mut widths = vec![Constraint::Length(LABEL_WIDTH)];
    widths.extend(cols.map(|_| Constraint::Length(COLUMN_WIDTH)));

    let title = if session.name().is_empty() {
        "Scores".to_string()
    } else {
        session.name().to_string()
    };
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(table, area);
}

fn cell_style(
    state: &ViewState,
    selection: Option<CellRef>,
    display_row: usize,
    round: usize,
    player: usize,
) -> Style {
    if selection == Some(CellRef { round, player }) {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else if state.grid_cursor.row == display_row && state.grid_cursor.col == player {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
