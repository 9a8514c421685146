// TUI: view state, input handling, and screen rendering.
//
// The TUI owns a `ViewState` that mirrors the last `AppSnapshot` from the app
// orchestrator plus UI-local state (focus, text buffers, grid cursor). Key
// presses become `UserCommand`s; the orchestrator answers with `UiUpdate`s.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use scoreboard_core::{GamePhase, GameSession};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::protocol::{AppSnapshot, FeedbackLines, Screen, UiUpdate, UserCommand};

use layout::{build_layout, AppLayout};

// ---------------------------------------------------------------------------
// UI-local state
// ---------------------------------------------------------------------------

/// Focusable fields on the create-game screen, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetupField {
    #[default]
    GameName,
    WinRule,
    PlayerEntry,
    PlayerList,
    StartButton,
}

impl SetupField {
    const ORDER: [SetupField; 5] = [
        SetupField::GameName,
        SetupField::WinRule,
        SetupField::PlayerEntry,
        SetupField::PlayerList,
        SetupField::StartButton,
    ];

    pub fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    /// Whether the field takes free text (so `q` types instead of quitting).
    pub fn is_text(self) -> bool {
        matches!(self, SetupField::GameName | SetupField::PlayerEntry)
    }
}

/// Cursor over the score grid.
///
/// `row` is a display row: row 0 is the most recent round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridCursor {
    pub row: usize,
    pub col: usize,
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state that mirrors the application state for rendering.
#[derive(Debug, Default)]
pub struct ViewState {
    pub screen: Screen,
    /// Copy of the orchestrator's session, if a game exists.
    pub session: Option<GameSession>,
    pub feedback: FeedbackLines,
    pub winners: Vec<String>,
    /// Focused field on the create-game screen.
    pub setup_focus: SetupField,
    /// Game name as typed, capped to the core's length limit.
    pub name_input: String,
    /// Player name being typed, capped to the core's length limit.
    pub player_input: String,
    /// Highlighted row in the player list.
    pub selected_player: usize,
    pub grid_cursor: GridCursor,
    /// First display row drawn in the grid.
    pub grid_scroll: usize,
    /// Whether keystrokes go to `score_input`.
    pub editing_score: bool,
    pub score_input: String,
    /// Whether the quit confirmation dialog is showing.
    pub confirm_quit: bool,
}

impl ViewState {
    /// Apply a full state snapshot from the app orchestrator.
    ///
    /// Entering the create-game screen reloads the name field from the
    /// session and resets focus. Cursors are clamped to the new shape.
    pub fn apply_snapshot(&mut self, snapshot: AppSnapshot) {
        let entering_setup =
            snapshot.screen == Screen::CreateGame && self.screen != Screen::CreateGame;

        self.screen = snapshot.screen;
        self.session = snapshot.session;
        self.feedback = snapshot.feedback;
        self.winners = snapshot.winners;

        if entering_setup {
            self.name_input = self
                .session
                .as_ref()
                .map(|s| s.name().to_string())
                .unwrap_or_default();
            self.player_input.clear();
            self.setup_focus = SetupField::GameName;
            self.selected_player = 0;
        }
        if self.screen != Screen::Grid {
            self.editing_score = false;
            self.score_input.clear();
        }

        self.clamp_cursors();
    }

    /// Number of players and rounds in the mirrored session.
    pub fn grid_shape(&self) -> (usize, usize) {
        self.session
            .as_ref()
            .map(|s| (s.player_count(), s.round_count()))
            .unwrap_or((0, 0))
    }

    fn clamp_cursors(&mut self) {
        let (players, rounds) = self.grid_shape();
        self.selected_player = self.selected_player.min(players.saturating_sub(1));
        self.grid_cursor.col = self.grid_cursor.col.min(players.saturating_sub(1));
        self.grid_cursor.row = self.grid_cursor.row.min(rounds.saturating_sub(1));
        self.grid_scroll = self.grid_scroll.min(self.grid_cursor.row);
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Snapshot(snapshot) => {
            state.apply_snapshot(*snapshot);
        }
        UiUpdate::ClearPlayerEntry => {
            state.player_input.clear();
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the current screen.
fn render_frame(frame: &mut Frame, state: &mut ViewState) {
    let layout = build_layout(frame.area());

    render_title_bar(frame, &layout, state);
    match state.screen {
        Screen::Home => widgets::home::render(frame, layout.body),
        Screen::CreateGame => widgets::create_game::render(frame, layout.body, state),
        Screen::Grid => widgets::score_grid::render(frame, layout.body, state),
        Screen::Congratulations => widgets::congratulations::render(frame, layout.body, state),
    }
    render_help_bar(frame, &layout, state);

    if state.confirm_quit {
        widgets::quit_confirm::render(frame, frame.area());
    }
}

fn render_title_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let mut text = " Scoreboard".to_string();
    if let Some(session) = &state.session {
        if !session.name().is_empty() {
            text.push_str(&format!(" | {}", session.name()));
        }
        let phase = match session.phase() {
            GamePhase::NotStarted => "Setting up",
            GamePhase::InProgress => "In progress",
            GamePhase::Ended => "Game over",
        };
        text.push_str(&format!(" | {phase}"));
    }
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        text,
        Style::default().fg(Color::White),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.title_bar);
}

/// Shortcut hints for the current screen and mode.
pub fn help_text(state: &ViewState) -> &'static str {
    if state.confirm_quit {
        return " y:Quit and discard game | n:Keep playing";
    }
    match state.screen {
        Screen::Home => " n:New Game | q:Quit",
        Screen::CreateGame => match state.setup_focus {
            SetupField::GameName => " Tab:Next field | Esc:Cancel game",
            SetupField::PlayerEntry => " Enter:Add player | Tab:Next field | Esc:Cancel game",
            SetupField::WinRule => " Space:Toggle | Tab:Next field | Esc:Cancel game | q:Quit",
            SetupField::PlayerList => " Up/Down:Select | d:Remove | Tab:Next field | Esc:Cancel",
            SetupField::StartButton => " Enter:Start | Tab:Next field | Esc:Cancel game | q:Quit",
        },
        Screen::Grid if state.editing_score => " Enter:Save score | Esc:Cancel",
        Screen::Grid => {
            " Arrows:Move | Enter:Edit | r:New round | x:Delete round | e:End | Esc:Setup | q:Quit"
        }
        Screen::Congratulations => " b:Back to game | h:Home | q:Quit",
    }
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        help_text(state),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// This is the main entry point for the terminal UI. It:
/// 1. Initializes the terminal (enters raw mode, enables alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on clean exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    render_interval: Duration,
) -> anyhow::Result<()> {
    // 1. Initialize terminal
    let mut terminal = ratatui::init();

    // 2. Restore the terminal before the default panic output.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(render_interval);
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    // 3. Main loop
    let result = loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    None => {
                        debug!("UI channel closed");
                        break Ok(());
                    }
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            if cmd_tx.send(cmd).await.is_err() {
                                warn!("App task is gone, leaving TUI");
                                break Ok(());
                            }
                            if quit {
                                break Ok(());
                            }
                        }
                    }
                    Some(Ok(_)) => {
                        // Mouse and resize events: the next tick redraws.
                    }
                    Some(Err(e)) => {
                        break Err(anyhow::Error::new(e).context("terminal input error"));
                    }
                    None => break Ok(()),
                }
            }

            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &mut view_state)) {
                    break Err(anyhow::Error::new(e).context("failed to draw frame"));
                }
            }
        }
    };

    // 4. Restore terminal
    ratatui::restore();

    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
