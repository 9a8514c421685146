// Validation errors returned by `GameSession` operations.
//
// All of these are recoverable. Callers show them as inline feedback.

use thiserror::Error;

use crate::session::MAX_PLAYERS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlayerError {
    #[error("player name invalid")]
    EmptyName,

    #[error("player name already added")]
    DuplicateName,

    #[error("only {} players allowed", MAX_PLAYERS)]
    RosterFull,

    #[error("no player at index {index} (roster has {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RoundError {
    #[error("can't delete the only round")]
    LastRoundProtected,

    #[error("no round at index {index} ({len} rounds recorded)")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("no score cell at round {round}, player {player}")]
    IndexOutOfRange { round: usize, player: usize },

    #[error("no score cell selected")]
    NoCellSelected,

    #[error("total for player {player} would overflow")]
    TotalOverflow { player: usize },
}

/// Reasons a game cannot be started yet.
///
/// The create screen reports the missing name and the missing players on
/// separate lines, so the combined case is its own variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StartError {
    #[error("name the game first!")]
    MissingName,

    #[error("please add players to the game")]
    NoPlayers,

    #[error("name the game first and add players")]
    MissingNameAndPlayers,
}

impl StartError {
    pub fn missing_name(&self) -> bool {
        matches!(self, StartError::MissingName | StartError::MissingNameAndPlayers)
    }

    pub fn missing_players(&self) -> bool {
        matches!(self, StartError::NoPlayers | StartError::MissingNameAndPlayers)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WinnerError {
    #[error("no players in the game")]
    NoPlayers,
}
