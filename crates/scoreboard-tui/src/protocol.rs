// Messages exchanged between the TUI and the app orchestrator.
//
// The TUI sends `UserCommand`s; the orchestrator owns the `GameSession`,
// applies each command in order, and answers with `UiUpdate`s.

use scoreboard_core::GameSession;

/// Which screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Home,
    CreateGame,
    Grid,
    Congratulations,
}

/// Commands sent from the TUI to the app orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    NewGame,
    SetGameName(String),
    SetHighScoreWins(bool),
    AddPlayer(String),
    RemovePlayer(usize),
    StartGame,
    AddRound,
    /// Grid rows count back from the newest round (row 0). The orchestrator
    /// maps them to rounds against its own state, so a row sent before the
    /// TUI has seen a new round still lands on the round shown at that row.
    DeleteRound { row: usize },
    SelectCell { row: usize, player: usize },
    CommitScore(String),
    CancelEdit,
    EndGame,
    ResumeGame,
    BackToSetup,
    GoHome,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Error,
    Success,
}

/// One line of inline feedback shown under a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub text: String,
}

impl Feedback {
    pub fn error(text: impl Into<String>) -> Self {
        Feedback {
            kind: FeedbackKind::Error,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Feedback {
            kind: FeedbackKind::Success,
            text: text.into(),
        }
    }
}

/// Inline feedback for each screen area that shows any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackLines {
    /// Under the game name field.
    pub game_name: Option<Feedback>,
    /// Above the player entry field.
    pub player: Option<Feedback>,
    /// Above the score grid.
    pub grid: Option<Feedback>,
}

/// Everything the TUI needs to draw after a command has been applied.
#[derive(Debug, Clone, Default)]
pub struct AppSnapshot {
    pub screen: Screen,
    pub session: Option<GameSession>,
    pub feedback: FeedbackLines,
    pub winners: Vec<String>,
}

/// Updates sent from the app orchestrator to the TUI.
#[derive(Debug, Clone)]
pub enum UiUpdate {
    /// Full state after a command.
    Snapshot(Box<AppSnapshot>),
    /// The player entry field should be emptied.
    ClearPlayerEntry,
}
