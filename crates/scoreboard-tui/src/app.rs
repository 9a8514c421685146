// Application state and orchestration logic.
//
// The app task is the only owner of the live `GameSession`. It applies
// `UserCommand`s from the TUI one at a time, so no two mutations ever
// interleave, and pushes a fresh `AppSnapshot` back after each one.

use chrono::{DateTime, Utc};
use scoreboard_core::{GameSession, PlayerError, RoundError, StartError};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::protocol::{AppSnapshot, Feedback, FeedbackLines, Screen, UiUpdate, UserCommand};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub config: Config,
    pub screen: Screen,
    /// The game being set up or played. `None` on the home screen.
    pub session: Option<GameSession>,
    pub feedback: FeedbackLines,
    /// Result of the last `EndGame`.
    pub winners: Vec<String>,
}

/// Final standings, written to the log as JSON when a game ends.
#[derive(Debug, Serialize)]
struct GameResult<'a> {
    name: &'a str,
    high_score_wins: bool,
    rounds: usize,
    players: &'a [String],
    totals: &'a [i64],
    winners: &'a [String],
    started_at: Option<DateTime<Utc>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        AppState {
            config,
            screen: Screen::Home,
            session: None,
            feedback: FeedbackLines::default(),
            winners: Vec::new(),
        }
    }

    pub fn snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            screen: self.screen,
            session: self.session.clone(),
            feedback: self.feedback.clone(),
            winners: self.winners.clone(),
        }
    }

    /// Apply one command.
    ///
    /// Returns an extra update for the TUI when the command affects UI-local
    /// state (the player entry field). `Quit` is handled by `run`.
    pub fn apply(&mut self, cmd: UserCommand) -> Option<UiUpdate> {
        match cmd {
            UserCommand::NewGame => {
                info!("New game");
                self.session = Some(GameSession::with_win_rule(
                    self.config.game.high_score_wins,
                ));
                self.feedback = FeedbackLines::default();
                self.winners.clear();
                self.screen = Screen::CreateGame;
                None
            }
            UserCommand::GoHome => {
                info!("Back to home screen, discarding game");
                self.session = None;
                self.feedback = FeedbackLines::default();
                self.winners.clear();
                self.screen = Screen::Home;
                None
            }
            UserCommand::Quit => None,
            cmd => {
                let Some(session) = self.session.as_mut() else {
                    warn!("Ignoring {:?}: no game in progress", cmd);
                    return None;
                };
                apply_to_session(
                    session,
                    &mut self.screen,
                    &mut self.feedback,
                    &mut self.winners,
                    cmd,
                )
            }
        }
    }
}

fn apply_to_session(
    session: &mut GameSession,
    screen: &mut Screen,
    feedback: &mut FeedbackLines,
    winners: &mut Vec<String>,
    cmd: UserCommand,
) -> Option<UiUpdate> {
    match cmd {
        UserCommand::SetGameName(name) => {
            session.set_name(&name);
            None
        }
        UserCommand::SetHighScoreWins(high) => {
            session.set_high_score_wins(high);
            debug!("Win rule: {}", if high { "high score" } else { "low score" });
            None
        }
        UserCommand::AddPlayer(raw) => match session.add_player(&raw) {
            Ok(name) => {
                feedback.player = Some(Feedback::success(format!("* {name} added to game")));
                Some(UiUpdate::ClearPlayerEntry)
            }
            Err(e) => {
                feedback.player = Some(player_error(e));
                None
            }
        },
        UserCommand::RemovePlayer(index) => {
            if let Err(e) = session.remove_player(index) {
                warn!("Remove player failed: {}", e);
            }
            None
        }
        UserCommand::StartGame => match session.start_game() {
            Ok(()) => {
                feedback.game_name = None;
                feedback.player = None;
                feedback.grid = None;
                *screen = Screen::Grid;
                Some(UiUpdate::ClearPlayerEntry)
            }
            Err(e) => {
                warn!("Cannot start game: {}", e);
                feedback.game_name = e
                    .missing_name()
                    .then(|| Feedback::error(format!("* {}", StartError::MissingName)));
                if e.missing_players() {
                    feedback.player =
                        Some(Feedback::error(format!("* {}", StartError::NoPlayers)));
                    None
                } else {
                    feedback.player = None;
                    Some(UiUpdate::ClearPlayerEntry)
                }
            }
        },
        UserCommand::AddRound => {
            session.add_round();
            feedback.grid = None;
            None
        }
        UserCommand::DeleteRound { row } => {
            let Some(round) = round_for_row(session, row) else {
                warn!("Delete round ignored: no grid row {}", row);
                return None;
            };
            match session.delete_round(round) {
                Ok(()) => feedback.grid = None,
                Err(RoundError::LastRoundProtected) => {
                    feedback.grid = Some(Feedback::error("Can't delete the only round!"));
                }
                Err(e) => warn!("Delete round failed: {}", e),
            }
            None
        }
        UserCommand::SelectCell { row, player } => {
            let Some(round) = round_for_row(session, row) else {
                warn!("Select cell ignored: no grid row {}", row);
                return None;
            };
            if let Err(e) = session.select_cell(round, player) {
                warn!("Select cell failed: {}", e);
            }
            None
        }
        UserCommand::CommitScore(raw) => {
            match session.commit_score(&raw) {
                Ok(()) => feedback.grid = None,
                Err(e) => {
                    warn!("Score edit rejected: {}", e);
                    feedback.grid = Some(Feedback::error(format!("* {e}")));
                }
            }
            None
        }
        UserCommand::CancelEdit => {
            session.cancel_selection();
            None
        }
        UserCommand::EndGame => {
            match session.end_game() {
                Ok(result) => {
                    log_result(session, &result);
                    *winners = result;
                    feedback.grid = None;
                    *screen = Screen::Congratulations;
                }
                Err(e) => {
                    warn!("Cannot end game: {}", e);
                    feedback.grid = Some(Feedback::error(format!("* {e}")));
                }
            }
            None
        }
        UserCommand::ResumeGame => {
            session.resume();
            *screen = Screen::Grid;
            None
        }
        UserCommand::BackToSetup => {
            session.cancel_selection();
            feedback.grid = None;
            *screen = Screen::CreateGame;
            None
        }
        UserCommand::NewGame | UserCommand::GoHome | UserCommand::Quit => None,
    }
}

/// Chronological round index for a grid row, where row 0 is the newest round.
fn round_for_row(session: &GameSession, row: usize) -> Option<usize> {
    session.round_count().checked_sub(row + 1)
}

fn player_error(e: PlayerError) -> Feedback {
    Feedback::error(format!("* {e}"))
}

fn log_result(session: &GameSession, winners: &[String]) {
    let result = GameResult {
        name: session.name(),
        high_score_wins: session.high_score_wins(),
        rounds: session.round_count(),
        players: session.players(),
        totals: session.totals(),
        winners,
        started_at: session.started_at(),
    };
    match serde_json::to_string(&result) {
        Ok(json) => info!(result = %json, "Game over"),
        Err(e) => warn!("Failed to serialize game result: {}", e),
    }
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Run the app orchestrator until `Quit` or until the TUI hangs up.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    let _ = ui_tx
        .send(UiUpdate::Snapshot(Box::new(state.snapshot())))
        .await;

    while let Some(cmd) = cmd_rx.recv().await {
        if cmd == UserCommand::Quit {
            info!("Quit requested");
            break;
        }
        handle_user_command(&mut state, cmd, &ui_tx).await;
    }

    info!("Application event loop finished");
    Ok(())
}

async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    debug!("Command: {:?}", cmd);
    if let Some(extra) = state.apply(cmd) {
        let _ = ui_tx.send(extra).await;
    }
    let _ = ui_tx
        .send(UiUpdate::Snapshot(Box::new(state.snapshot())))
        .await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
