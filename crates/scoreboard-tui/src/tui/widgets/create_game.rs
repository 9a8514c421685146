// Create-game widget: name field, win rule, player entry, roster, start button.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;
use scoreboard_core::{MAX_PLAYERS, MAX_PLAYER_NAME_LEN};

use crate::protocol::{Feedback, FeedbackKind};
use crate::tui::layout::build_setup_layout;
use crate::tui::{SetupField, ViewState};

/// Render the create-game screen into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let setup = build_setup_layout(area);

    render_game_name(frame, setup.game_name, state);
    render_win_rule(frame, setup.win_rule, state);
    render_player_entry(frame, setup.player_entry, state);
    render_player_list(frame, setup.player_list, state);
    render_start_button(frame, setup.start_button, state);
}

fn focus_block(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title)
}

fn feedback_line(feedback: Option<&Feedback>) -> Line<'static> {
    match feedback {
        Some(fb) => {
            let color = match fb.kind {
                FeedbackKind::Error => Color::Red,
                FeedbackKind::Success => Color::Green,
            };
            Line::from(Span::styled(fb.text.clone(), Style::default().fg(color)))
        }
        None => Line::from(""),
    }
}

fn render_game_name(frame: &mut Frame, area: Rect, state: &ViewState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1)])
        .split(area);

    let focused = state.setup_focus == SetupField::GameName;
    let field = Paragraph::new(input_text(&state.name_input, focused))
        .block(focus_block("Game name", focused));
    frame.render_widget(field, rows[0]);

    let error = Paragraph::new(feedback_line(state.feedback.game_name.as_ref()));
    frame.render_widget(error, rows[1]);
}

fn render_win_rule(frame: &mut Frame, area: Rect, state: &ViewState) {
    let high = state
        .session
        .as_ref()
        .map(|s| s.high_score_wins())
        .unwrap_or(true);
    let focused = state.setup_focus == SetupField::WinRule;

    let selected = Style::default().add_modifier(Modifier::BOLD);
    let (high_style, low_style) = if high {
        (selected, Style::default())
    } else {
        (Style::default(), selected)
    };
    let line = Line::from(vec![
        Span::styled(format!("{} High Score Wins", radio(high)), high_style),
        Span::raw("    "),
        Span::styled(format!("{} Low Score Wins", radio(!high)), low_style),
    ]);

    let paragraph = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(focus_block("Win rule", focused));
    frame.render_widget(paragraph, area);
}

fn radio(on: bool) -> &'static str {
    if on {
        "(*)"
    } else {
        "( )"
    }
}

fn render_player_entry(frame: &mut Frame, area: Rect, state: &ViewState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(3)])
        .split(area);

    frame.render_widget(
        Paragraph::new(feedback_line(state.feedback.player.as_ref())),
        rows[0],
    );

    let focused = state.setup_focus == SetupField::PlayerEntry;
    let content = if state.player_input.is_empty() && !focused {
        Line::from(Span::styled(
            format!("Enter up to {MAX_PLAYER_NAME_LEN} characters"),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        input_text(&state.player_input, focused)
    };
    let field = Paragraph::new(content).block(focus_block("Add player (Enter)", focused));
    frame.render_widget(field, rows[1]);
}

fn render_player_list(frame: &mut Frame, area: Rect, state: &ViewState) {
    let players: &[String] = state
        .session
        .as_ref()
        .map(|s| s.players())
        .unwrap_or(&[]);
    let focused = state.setup_focus == SetupField::PlayerList;

    let items: Vec<ListItem> = if players.is_empty() {
        vec![ListItem::new("  No players yet")]
    } else {
        players
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let style = if focused && i == state.selected_player {
                    Style::default().fg(Color::Black).bg(Color::Cyan)
                } else {
                    Style::default()
                };
                ListItem::new(format!("  {name}")).style(style)
            })
            .collect()
    };

    let title = format!("Players: {}/{}", players.len(), MAX_PLAYERS);
    let list = List::new(items).block(focus_block(&title, focused));
    frame.render_widget(list, area);
}

fn render_start_button(frame: &mut Frame, area: Rect, state: &ViewState) {
    let focused = state.setup_focus == SetupField::StartButton;
    let style = if focused {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Blue)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)
    };

    let button = Paragraph::new(Line::from(Span::styled(start_label(state), style)))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(button, area);
}

/// "Continue Game" once the game has been started, "Start Game" before.
pub fn start_label(state: &ViewState) -> &'static str {
    let in_progress = state
        .session
        .as_ref()
        .map(|s| s.in_progress())
        .unwrap_or(false);
    if in_progress {
        " Continue Game "
    } else {
        " Start Game "
    }
}

/// Text field contents with a cursor block when focused.
fn input_text(text: &str, focused: bool) -> Line<'static> {
    if focused {
        Line::from(vec![
            Span::raw(text.to_string()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ])
    } else {
        Line::from(text.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{AppSnapshot, FeedbackLines, Screen};
    use crate::tui::widgets::buffer_lines;
    use scoreboard_core::GameSession;

    fn setup_state(session: GameSession, feedback: FeedbackLines) -> ViewState {
        let mut state = ViewState::default();
        state.apply_snapshot(AppSnapshot {
            screen: Screen::CreateGame,
            session: Some(session),
            feedback,
            winners: Vec::new(),
        });
        state
    }

    fn draw(state: &ViewState) -> String {
        let backend = ratatui::backend::TestBackend::new(70, 28);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), state))
            .unwrap();
        buffer_lines(terminal.backend().buffer()).join("\n")
    }

    #[test]
    fn empty_setup_screen() {
        let state = setup_state(GameSession::new(), FeedbackLines::default());
        let text = draw(&state);
        assert!(text.contains("Game name"));
        assert!(text.contains("(*) High Score Wins"));
        assert!(text.contains("( ) Low Score Wins"));
        assert!(text.contains("Enter up to 8 characters"));
        assert!(text.contains("No players yet"));
        assert!(text.contains("Players: 0/25"));
        assert!(text.contains("Start Game"));
    }

    #[test]
    fn shows_players_feedback_and_continue_label() {
        let mut session = GameSession::with_win_rule(false);
        session.set_name("Hearts");
        session.add_player("Ann").unwrap();
        session.add_player("Ben").unwrap();
        session.start_game().unwrap();

        let feedback = FeedbackLines {
            player: Some(Feedback::success("* Ben added to game")),
            ..FeedbackLines::default()
        };
        let state = setup_state(session, feedback);
        assert_eq!(start_label(&state), " Continue Game ");

        let text = draw(&state);
        assert!(text.contains("Hearts"));
        assert!(text.contains("(*) Low Score Wins"));
        assert!(text.contains("* Ben added to game"));
        assert!(text.contains("Ann"));
        assert!(text.contains("Players: 2/25"));
        assert!(text.contains("Continue Game"));
    }

    #[test]
    fn shows_game_name_error() {
        let feedback = FeedbackLines {
            game_name: Some(Feedback::error("* name the game first!")),
            ..FeedbackLines::default()
        };
        let state = setup_state(GameSession::new(), feedback);
        assert!(draw(&state).contains("* name the game first!"));
    }
}
