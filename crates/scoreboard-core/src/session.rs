// Game session: players, per-round scores, running totals and winners.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{PlayerError, RoundError, ScoreError, StartError, WinnerError};

/// Longest game name kept, in characters.
pub const MAX_GAME_NAME_LEN: usize = 20;
/// Longest player name kept, in characters.
pub const MAX_PLAYER_NAME_LEN: usize = 8;
/// Roster size limit.
pub const MAX_PLAYERS: usize = 25;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum GamePhase {
    #[default]
    NotStarted,
    InProgress,
    Ended,
}

/// A single score cell: round index (chronological) and player index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellRef {
    pub round: usize,
    pub player: usize,
}

/// All state for one game.
///
/// Every round in `scores` has one entry per player, and `totals[p]` is the
/// sum of column `p`. Totals are adjusted by deltas on each edit instead of
/// being recomputed.
#[derive(Debug, Clone, Serialize)]
pub struct GameSession {
    name: String,
    high_score_wins: bool,
    players: Vec<String>,
    scores: Vec<Vec<i64>>,
    totals: Vec<i64>,
    in_progress: bool,
    phase: GamePhase,
    selection: Option<CellRef>,
    started_at: Option<DateTime<Utc>>,
}

impl Default for GameSession {
    fn default() -> Self {
        GameSession::new()
    }
}

impl GameSession {
    /// Create an empty session where the high score wins.
    ///
    /// The session starts with one empty round, so players added later
    /// always have a row to score in.
    pub fn new() -> Self {
        GameSession::with_win_rule(true)
    }

    /// Create an empty session with the given win rule.
    pub fn with_win_rule(high_score_wins: bool) -> Self {
        GameSession {
            name: String::new(),
            high_score_wins,
            players: Vec::new(),
            scores: vec![Vec::new()],
            totals: Vec::new(),
            in_progress: false,
            phase: GamePhase::NotStarted,
            selection: None,
            started_at: None,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn high_score_wins(&self) -> bool {
        self.high_score_wins
    }

    pub fn players(&self) -> &[String] {
        &self.players
    }

    /// Scores indexed `[round][player]`, oldest round first.
    pub fn scores(&self) -> &[Vec<i64>] {
        &self.scores
    }

    pub fn totals(&self) -> &[i64] {
        &self.totals
    }

    /// Whether the game has been started at least once.
    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn selection(&self) -> Option<CellRef> {
        self.selection
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn round_count(&self) -> usize {
        self.scores.len()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    // -----------------------------------------------------------------------
    // Setup
    // -----------------------------------------------------------------------

    /// Set the game name, keeping at most `MAX_GAME_NAME_LEN` characters.
    ///
    /// Whitespace is kept while editing and trimmed by `start_game`.
    pub fn set_name(&mut self, raw: &str) {
        self.name = truncate_chars(raw, MAX_GAME_NAME_LEN);
    }

    pub fn set_high_score_wins(&mut self, high_score_wins: bool) {
        self.high_score_wins = high_score_wins;
    }

    /// Add a player and give them a zero in every existing round.
    ///
    /// The name is cut to `MAX_PLAYER_NAME_LEN` characters (as the entry
    /// field does while typing) and then trimmed. Returns the stored name.
    pub fn add_player(&mut self, raw: &str) -> Result<String, PlayerError> {
        let name = normalize_player_name(raw);

        if name.is_empty() {
            warn!("Rejected empty player name");
            return Err(PlayerError::EmptyName);
        }
        if self.players.contains(&name) {
            warn!("Rejected duplicate player name {:?}", name);
            return Err(PlayerError::DuplicateName);
        }
        if self.players.len() == MAX_PLAYERS {
            warn!("Rejected player {:?}: roster full", name);
            return Err(PlayerError::RosterFull);
        }

        self.players.push(name.clone());
        self.totals.push(0);
        for round in &mut self.scores {
            round.push(0);
        }

        info!("Added player {:?} ({} in game)", name, self.players.len());
        Ok(name)
    }

    /// Remove a player's name, total, and column from every round.
    pub fn remove_player(&mut self, index: usize) -> Result<(), PlayerError> {
        if index >= self.players.len() {
            return Err(PlayerError::IndexOutOfRange {
                index,
                len: self.players.len(),
            });
        }

        let name = self.players.remove(index);
        self.totals.remove(index);
        for round in &mut self.scores {
            round.remove(index);
        }

        self.selection = match self.selection {
            Some(cell) if cell.player == index => None,
            Some(cell) if cell.player > index => Some(CellRef {
                round: cell.round,
                player: cell.player - 1,
            }),
            other => other,
        };

        info!("Removed player {:?} ({} in game)", name, self.players.len());
        Ok(())
    }

    /// Trim the name and enter play if the game has a name and players.
    pub fn start_game(&mut self) -> Result<(), StartError> {
        self.name = self.name.trim().to_string();

        let missing_name = self.name.is_empty();
        let missing_players = self.players.is_empty();
        match (missing_name, missing_players) {
            (true, true) => return Err(StartError::MissingNameAndPlayers),
            (true, false) => return Err(StartError::MissingName),
            (false, true) => return Err(StartError::NoPlayers),
            (false, false) => {}
        }

        if self.started_at.is_none() {
            self.started_at = Some(Utc::now());
        }
        let resumed = self.in_progress;
        self.in_progress = true;
        self.phase = GamePhase::InProgress;
        self.selection = None;

        info!(
            "{} game {:?} with {} players, {} rounds",
            if resumed { "Continuing" } else { "Starting" },
            self.name,
            self.players.len(),
            self.scores.len()
        );
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Rounds
    // -----------------------------------------------------------------------

    /// Append a round of zeros. Does nothing while the roster is empty.
    pub fn add_round(&mut self) {
        if self.players.is_empty() {
            return;
        }
        self.scores.push(vec![0; self.players.len()]);
        debug!("Added round {}", self.scores.len());
    }

    /// Delete a round, taking its scores back out of the totals.
    ///
    /// The last remaining round can never be deleted.
    pub fn delete_round(&mut self, round: usize) -> Result<(), RoundError> {
        if self.scores.len() == 1 {
            return Err(RoundError::LastRoundProtected);
        }
        if round >= self.scores.len() {
            return Err(RoundError::IndexOutOfRange {
                index: round,
                len: self.scores.len(),
            });
        }

        for (total, score) in self.totals.iter_mut().zip(&self.scores[round]) {
            *total -= score;
        }
        self.scores.remove(round);

        self.selection = match self.selection {
            Some(cell) if cell.round == round => None,
            Some(cell) if cell.round > round => Some(CellRef {
                round: cell.round - 1,
                player: cell.player,
            }),
            other => other,
        };

        debug!("Deleted round {} ({} remain)", round + 1, self.scores.len());
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Score entry
    // -----------------------------------------------------------------------

    /// Mark a cell as the target of the next `commit_score`.
    pub fn select_cell(&mut self, round: usize, player: usize) -> Result<(), ScoreError> {
        if !self.has_cell(round, player) {
            return Err(ScoreError::IndexOutOfRange { round, player });
        }
        self.selection = Some(CellRef { round, player });
        Ok(())
    }

    pub fn cancel_selection(&mut self) {
        self.selection = None;
    }

    /// Write `raw` into the selected cell. See `set_score`.
    pub fn commit_score(&mut self, raw: &str) -> Result<(), ScoreError> {
        let Some(cell) = self.selection else {
            return Err(ScoreError::NoCellSelected);
        };
        self.set_score(cell.round, cell.player, raw)
    }

    /// Set one score and adjust that player's total by the difference.
    ///
    /// An empty `raw` leaves everything unchanged. Anything else that does
    /// not parse as an integer is recorded as 0. The selection is cleared
    /// whatever the outcome.
    pub fn set_score(&mut self, round: usize, player: usize, raw: &str) -> Result<(), ScoreError> {
        self.selection = None;

        if !self.has_cell(round, player) {
            return Err(ScoreError::IndexOutOfRange { round, player });
        }
        if raw.is_empty() {
            return Ok(());
        }

        let new_score = parse_score(raw);
        let old_score = self.scores[round][player];
        let new_total = self.totals[player]
            .checked_sub(old_score)
            .and_then(|t| t.checked_add(new_score))
            .ok_or(ScoreError::TotalOverflow { player })?;

        self.totals[player] = new_total;
        self.scores[round][player] = new_score;

        debug!(
            "Round {} {}: {} -> {} (total {})",
            round + 1,
            self.players[player],
            old_score,
            new_score,
            new_total
        );
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Results
    // -----------------------------------------------------------------------

    /// Every player tied at the best total, in roster order.
    pub fn find_winners(&self) -> Result<Vec<String>, WinnerError> {
        let Some(&first) = self.totals.first() else {
            return Err(WinnerError::NoPlayers);
        };

        let best = self.totals.iter().copied().fold(first, |best, total| {
            if self.high_score_wins {
                best.max(total)
            } else {
                best.min(total)
            }
        });

        Ok(self
            .players
            .iter()
            .zip(&self.totals)
            .filter(|(_, total)| **total == best)
            .map(|(name, _)| name.clone())
            .collect())
    }

    /// Compute the winners and move to `Ended`.
    pub fn end_game(&mut self) -> Result<Vec<String>, WinnerError> {
        let winners = self.find_winners()?;
        self.phase = GamePhase::Ended;
        self.selection = None;
        info!("Game {:?} ended, winners: {:?}", self.name, winners);
        Ok(winners)
    }

    /// Return from `Ended` to `InProgress`.
    pub fn resume(&mut self) {
        if self.phase == GamePhase::Ended {
            self.phase = GamePhase::InProgress;
            info!("Game {:?} resumed", self.name);
        }
    }

    fn has_cell(&self, round: usize, player: usize) -> bool {
        round < self.scores.len() && player < self.players.len()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Keep the first `max` characters of `s`.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Player names are cut to length first, then trimmed.
pub fn normalize_player_name(raw: &str) -> String {
    truncate_chars(raw, MAX_PLAYER_NAME_LEN).trim().to_string()
}

/// Parse a score, falling back to 0 for anything that isn't an `i64`.
pub fn parse_score(raw: &str) -> i64 {
    raw.parse::<i64>().unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
