// Congratulations widget: the winner set, one name per line.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::ViewState;

/// Render the congratulations screen into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut lines = vec![
        Line::from(""),
        Line::from("CONGRATS!!").style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
    ];

    if state.winners.len() > 1 {
        lines.push(Line::from(format!("{}-way tie", state.winners.len())));
    }
    lines.extend(
        state
            .winners
            .iter()
            .map(|name| Line::from(name.clone()).style(Style::default().fg(Color::Green))),
    );

    if let Some(session) = &state.session {
        if let Some(best) = winning_total(session.players(), session.totals(), &state.winners) {
            lines.push(Line::from(""));
            lines.push(Line::from(format!("with {best} points")));
        }
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Game Over"));
    frame.render_widget(paragraph, area);
}

/// Total of the first winner, looked up by name.
pub fn winning_total(players: &[String], totals: &[i64], winners: &[String]) -> Option<i64> {
    let first = winners.first()?;
    let idx = players.iter().position(|p| p == first)?;
    totals.get(idx).copied()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
