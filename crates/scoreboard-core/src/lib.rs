// Library root: score bookkeeping for a multi-round tabletop game.
//
// The crate has no I/O. Front ends hold a `GameSession`, call its mutators,
// and render from its read accessors.

pub mod error;
pub mod session;

pub use error::{PlayerError, RoundError, ScoreError, StartError, WinnerError};
pub use session::{
    CellRef, GamePhase, GameSession, MAX_GAME_NAME_LEN, MAX_PLAYERS, MAX_PLAYER_NAME_LEN,
};
