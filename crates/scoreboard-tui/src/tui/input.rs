// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// app orchestrator, or into local ViewState mutations (focus changes,
// text buffers, grid cursor movement).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use scoreboard_core::{MAX_GAME_NAME_LEN, MAX_PLAYER_NAME_LEN};

use super::{SetupField, ViewState};
use crate::protocol::{Screen, UserCommand};

/// Longest score entry accepted from the keyboard.
const MAX_SCORE_INPUT_LEN: usize = 20;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app orchestrator. Returns `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode
    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    match view_state.screen {
        Screen::Home => handle_home(key_event),
        Screen::CreateGame => handle_setup(key_event, view_state),
        Screen::Grid => {
            if view_state.editing_score {
                handle_score_entry(key_event, view_state)
            } else {
                handle_grid(key_event, view_state)
            }
        }
        Screen::Congratulations => handle_congratulations(key_event, view_state),
    }
}

/// Quit right away when there is no game to lose, otherwise ask first.
fn request_quit(view_state: &mut ViewState) -> Option<UserCommand> {
    if view_state.session.is_some() {
        view_state.confirm_quit = true;
        None
    } else {
        Some(UserCommand::Quit)
    }
}

/// `y`/`q` confirm, `n`/`Esc` go back. Every other key is swallowed.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Home
// ---------------------------------------------------------------------------

fn handle_home(key_event: KeyEvent) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('n') | KeyCode::Enter => Some(UserCommand::NewGame),
        KeyCode::Char('q') | KeyCode::Esc => Some(UserCommand::Quit),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Create game
// ---------------------------------------------------------------------------

fn handle_setup(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => return Some(UserCommand::GoHome),
        KeyCode::Tab => {
            view_state.setup_focus = view_state.setup_focus.next();
            return None;
        }
        KeyCode::BackTab => {
            view_state.setup_focus = view_state.setup_focus.prev();
            return None;
        }
        KeyCode::Char('q') if !view_state.setup_focus.is_text() => {
            return request_quit(view_state);
        }
        _ => {}
    }

    match view_state.setup_focus {
        SetupField::GameName => match key_event.code {
            KeyCode::Char(c) => {
                if push_capped(&mut view_state.name_input, c, MAX_GAME_NAME_LEN) {
                    Some(UserCommand::SetGameName(view_state.name_input.clone()))
                } else {
                    None
                }
            }
            KeyCode::Backspace => {
                view_state.name_input.pop();
                Some(UserCommand::SetGameName(view_state.name_input.clone()))
            }
            KeyCode::Enter | KeyCode::Down => {
                view_state.setup_focus = view_state.setup_focus.next();
                None
            }
            _ => None,
        },
        SetupField::WinRule => {
            let high = view_state
                .session
                .as_ref()
                .map(|s| s.high_score_wins())
                .unwrap_or(true);
            match key_event.code {
                KeyCode::Left | KeyCode::Char('h') => Some(UserCommand::SetHighScoreWins(true)),
                KeyCode::Right | KeyCode::Char('l') => Some(UserCommand::SetHighScoreWins(false)),
                KeyCode::Char(' ') => Some(UserCommand::SetHighScoreWins(!high)),
                KeyCode::Up => {
                    view_state.setup_focus = view_state.setup_focus.prev();
                    None
                }
                KeyCode::Down | KeyCode::Enter => {
                    view_state.setup_focus = view_state.setup_focus.next();
                    None
                }
                _ => None,
            }
        }
        SetupField::PlayerEntry => match key_event.code {
            KeyCode::Char(c) => {
                push_capped(&mut view_state.player_input, c, MAX_PLAYER_NAME_LEN);
                None
            }
            KeyCode::Backspace => {
                view_state.player_input.pop();
                None
            }
            KeyCode::Enter => Some(UserCommand::AddPlayer(view_state.player_input.clone())),
            KeyCode::Up => {
                view_state.setup_focus = view_state.setup_focus.prev();
                None
            }
            KeyCode::Down => {
                view_state.setup_focus = view_state.setup_focus.next();
                None
            }
            _ => None,
        },
        SetupField::PlayerList => {
            let (players, _) = view_state.grid_shape();
            match key_event.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    view_state.selected_player = view_state.selected_player.saturating_sub(1);
                    None
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if view_state.selected_player + 1 < players {
                        view_state.selected_player += 1;
                    }
                    None
                }
                KeyCode::Char('d') | KeyCode::Delete | KeyCode::Backspace => {
                    if view_state.selected_player < players {
                        Some(UserCommand::RemovePlayer(view_state.selected_player))
                    } else {
                        None
                    }
                }
                _ => None,
            }
        }
        SetupField::StartButton => match key_event.code {
            KeyCode::Enter | KeyCode::Char(' ') => Some(UserCommand::StartGame),
            KeyCode::Up => {
                view_state.setup_focus = view_state.setup_focus.prev();
                None
            }
            _ => None,
        },
    }
}

/// Append `c` unless `buf` already holds `max` characters.
fn push_capped(buf: &mut String, c: char, max: usize) -> bool {
    if buf.chars().count() >= max {
        return false;
    }
    buf.push(c);
    true
}

// ---------------------------------------------------------------------------
// Score grid
// ---------------------------------------------------------------------------

fn handle_grid(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let (players, rounds) = view_state.grid_shape();

    match key_event.code {
        KeyCode::Up | KeyCode::Char('k') => {
            view_state.grid_cursor.row = view_state.grid_cursor.row.saturating_sub(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if view_state.grid_cursor.row + 1 < rounds {
                view_state.grid_cursor.row += 1;
            }
            None
        }
        KeyCode::Left | KeyCode::Char('h') => {
            view_state.grid_cursor.col = view_state.grid_cursor.col.saturating_sub(1);
            None
        }
        KeyCode::Right | KeyCode::Char('l') => {
            if view_state.grid_cursor.col + 1 < players {
                view_state.grid_cursor.col += 1;
            }
            None
        }
        KeyCode::Enter => {
            if players == 0 || rounds == 0 {
                return None;
            }
            view_state.editing_score = true;
            view_state.score_input.clear();
            Some(UserCommand::SelectCell {
                row: view_state.grid_cursor.row,
                player: view_state.grid_cursor.col,
            })
        }
        KeyCode::Char('r') | KeyCode::Char('+') => {
            // The new round shows at the top.
            view_state.grid_cursor.row = 0;
            Some(UserCommand::AddRound)
        }
        KeyCode::Char('x') | KeyCode::Delete if rounds > 0 => Some(UserCommand::DeleteRound {
            row: view_state.grid_cursor.row,
        }),
        KeyCode::Char('e') => Some(UserCommand::EndGame),
        KeyCode::Esc | KeyCode::Char('b') => Some(UserCommand::BackToSetup),
        KeyCode::Char('q') => request_quit(view_state),
        _ => None,
    }
}

fn handle_score_entry(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char(c) => {
            push_capped(&mut view_state.score_input, c, MAX_SCORE_INPUT_LEN);
            None
        }
        KeyCode::Backspace => {
            view_state.score_input.pop();
            None
        }
        KeyCode::Enter => {
            view_state.editing_score = false;
            Some(UserCommand::CommitScore(std::mem::take(
                &mut view_state.score_input,
            )))
        }
        KeyCode::Esc => {
            view_state.editing_score = false;
            view_state.score_input.clear();
            Some(UserCommand::CancelEdit)
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Congratulations
// ---------------------------------------------------------------------------

fn handle_congratulations(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc | KeyCode::Char('b') => Some(UserCommand::ResumeGame),
        KeyCode::Enter | KeyCode::Char('h') => Some(UserCommand::GoHome),
        KeyCode::Char('q') => request_quit(view_state),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{AppSnapshot, FeedbackLines};
    use crossterm::event::KeyEventState;
    use scoreboard_core::GameSession;

    /// Helper to create a KeyEvent with no modifiers.
    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    /// Helper to create a KeyEvent with Ctrl modifier.
    fn ctrl_key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn state_on(screen: Screen, players: &[&str], rounds: usize) -> ViewState {
        let mut session = GameSession::new();
        for p in players {
            session.add_player(p).unwrap();
        }
        for _ in 1..rounds {
            session.add_round();
        }
        let mut state = ViewState::default();
        state.apply_snapshot(AppSnapshot {
            screen,
            session: Some(session),
            feedback: FeedbackLines::default(),
            winners: Vec::new(),
        });
        state
    }

    fn type_text(state: &mut ViewState, text: &str) -> Option<UserCommand> {
        let mut last = None;
        for c in text.chars() {
            last = handle_key(key(KeyCode::Char(c)), state);
        }
        last
    }

    // -- Global --

    #[test]
    fn ctrl_c_quits_everywhere() {
        for screen in [
            Screen::Home,
            Screen::CreateGame,
            Screen::Grid,
            Screen::Congratulations,
        ] {
            let mut state = state_on(screen, &["A"], 1);
            assert_eq!(
                handle_key(ctrl_key(KeyCode::Char('c')), &mut state),
                Some(UserCommand::Quit)
            );
        }
    }

    #[test]
    fn release_events_are_ignored() {
        let mut state = ViewState::default();
        let mut ev = key(KeyCode::Char('n'));
        ev.kind = KeyEventKind::Release;
        assert!(handle_key(ev, &mut state).is_none());
    }

    // -- Home --

    #[test]
    fn home_keys() {
        let mut state = ViewState::default();
        assert_eq!(
            handle_key(key(KeyCode::Char('n')), &mut state),
            Some(UserCommand::NewGame)
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('q')), &mut state),
            Some(UserCommand::Quit)
        );
        assert!(handle_key(key(KeyCode::Char('x')), &mut state).is_none());
    }

    // -- Create game --

    #[test]
    fn game_name_typing_sends_name_and_caps_length() {
        let mut state = state_on(Screen::CreateGame, &[], 1);
        assert_eq!(
            type_text(&mut state, "Hi"),
            Some(UserCommand::SetGameName("Hi".into()))
        );

        let last = type_text(&mut state, "qqqqqqqqqqqqqqqqqqqqqqqq");
        assert_eq!(state.name_input.chars().count(), MAX_GAME_NAME_LEN);
        assert!(last.is_none(), "keys past the cap are dropped");

        assert_eq!(
            handle_key(key(KeyCode::Backspace), &mut state),
            Some(UserCommand::SetGameName(state.name_input.clone()))
        );
        assert_eq!(state.name_input.chars().count(), MAX_GAME_NAME_LEN - 1);
    }

    #[test]
    fn q_types_in_text_fields() {
        let mut state = state_on(Screen::CreateGame, &[], 1);
        state.setup_focus = SetupField::PlayerEntry;
        assert!(handle_key(key(KeyCode::Char('q')), &mut state).is_none());
        assert_eq!(state.player_input, "q");

        state.setup_focus = SetupField::StartButton;
        assert!(handle_key(key(KeyCode::Char('q')), &mut state).is_none());
        assert!(state.confirm_quit);
    }

    #[test]
    fn player_entry_truncates_while_typing_and_adds_on_enter() {
        let mut state = state_on(Screen::CreateGame, &[], 1);
        state.setup_focus = SetupField::PlayerEntry;
        assert!(type_text(&mut state, "Alexandria").is_none());
        assert_eq!(state.player_input, "Alexandr");

        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut state),
            Some(UserCommand::AddPlayer("Alexandr".into()))
        );
        // Buffer is cleared only when the orchestrator confirms.
        assert_eq!(state.player_input, "Alexandr");
    }

    #[test]
    fn tab_cycles_focus() {
        let mut state = state_on(Screen::CreateGame, &[], 1);
        handle_key(key(KeyCode::Tab), &mut state);
        assert_eq!(state.setup_focus, SetupField::WinRule);
        handle_key(key(KeyCode::BackTab), &mut state);
        handle_key(key(KeyCode::BackTab), &mut state);
        assert_eq!(state.setup_focus, SetupField::StartButton);
    }

    #[test]
    fn win_rule_toggles() {
        let mut state = state_on(Screen::CreateGame, &[], 1);
        state.setup_focus = SetupField::WinRule;
        assert_eq!(
            handle_key(key(KeyCode::Char(' ')), &mut state),
            Some(UserCommand::SetHighScoreWins(false))
        );
        assert_eq!(
            handle_key(key(KeyCode::Left), &mut state),
            Some(UserCommand::SetHighScoreWins(true))
        );
        assert_eq!(
            handle_key(key(KeyCode::Right), &mut state),
            Some(UserCommand::SetHighScoreWins(false))
        );
    }

    #[test]
    fn player_list_select_and_remove() {
        let mut state = state_on(Screen::CreateGame, &["A", "B", "C"], 1);
        state.setup_focus = SetupField::PlayerList;
        handle_key(key(KeyCode::Down), &mut state);
        handle_key(key(KeyCode::Down), &mut state);
        handle_key(key(KeyCode::Down), &mut state);
        assert_eq!(state.selected_player, 2);
        assert_eq!(
            handle_key(key(KeyCode::Char('d')), &mut state),
            Some(UserCommand::RemovePlayer(2))
        );
    }

    #[test]
    fn remove_with_empty_roster_does_nothing() {
        let mut state = state_on(Screen::CreateGame, &[], 1);
        state.setup_focus = SetupField::PlayerList;
        assert!(handle_key(key(KeyCode::Char('d')), &mut state).is_none());
    }

    #[test]
    fn start_button_and_escape() {
        let mut state = state_on(Screen::CreateGame, &["A"], 1);
        state.setup_focus = SetupField::StartButton;
        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut state),
            Some(UserCommand::StartGame)
        );
        assert_eq!(
            handle_key(key(KeyCode::Esc), &mut state),
            Some(UserCommand::GoHome)
        );
    }

    // -- Grid --

    #[test]
    fn grid_cursor_moves_within_bounds() {
        let mut state = state_on(Screen::Grid, &["A", "B"], 2);
        handle_key(key(KeyCode::Right), &mut state);
        handle_key(key(KeyCode::Right), &mut state);
        handle_key(key(KeyCode::Down), &mut state);
        handle_key(key(KeyCode::Down), &mut state);
        assert_eq!(state.grid_cursor.col, 1);
        assert_eq!(state.grid_cursor.row, 1);
        handle_key(key(KeyCode::Up), &mut state);
        handle_key(key(KeyCode::Up), &mut state);
        assert_eq!(state.grid_cursor.row, 0);
    }

    #[test]
    fn enter_selects_cursor_row() {
        let mut state = state_on(Screen::Grid, &["A", "B"], 3);
        state.grid_cursor.row = 2;
        state.grid_cursor.col = 1;
        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut state),
            Some(UserCommand::SelectCell { row: 2, player: 1 })
        );
        assert!(state.editing_score);
    }

    #[test]
    fn score_entry_commits_and_cancels() {
        let mut state = state_on(Screen::Grid, &["A"], 1);
        handle_key(key(KeyCode::Enter), &mut state);
        type_text(&mut state, "-12");
        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut state),
            Some(UserCommand::CommitScore("-12".into()))
        );
        assert!(!state.editing_score);
        assert!(state.score_input.is_empty());

        handle_key(key(KeyCode::Enter), &mut state);
        type_text(&mut state, "7");
        assert_eq!(
            handle_key(key(KeyCode::Esc), &mut state),
            Some(UserCommand::CancelEdit)
        );
        assert!(state.score_input.is_empty());
    }

    #[test]
    fn q_while_editing_is_text() {
        let mut state = state_on(Screen::Grid, &["A"], 1);
        handle_key(key(KeyCode::Enter), &mut state);
        assert!(handle_key(key(KeyCode::Char('q')), &mut state).is_none());
        assert_eq!(state.score_input, "q");
    }

    #[test]
    fn grid_round_commands() {
        let mut state = state_on(Screen::Grid, &["A"], 3);
        state.grid_cursor.row = 1;
        assert_eq!(
            handle_key(key(KeyCode::Char('x')), &mut state),
            Some(UserCommand::DeleteRound { row: 1 })
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('r')), &mut state),
            Some(UserCommand::AddRound)
        );
        assert_eq!(state.grid_cursor.row, 0);
        assert_eq!(
            handle_key(key(KeyCode::Char('e')), &mut state),
            Some(UserCommand::EndGame)
        );
        assert_eq!(
            handle_key(key(KeyCode::Esc), &mut state),
            Some(UserCommand::BackToSetup)
        );
    }

    #[test]
    fn new_round_then_enter_targets_top_row() {
        let mut state = state_on(Screen::Grid, &["A", "B"], 1);
        state.grid_cursor.col = 1;
        assert_eq!(
            handle_key(key(KeyCode::Char('r')), &mut state),
            Some(UserCommand::AddRound)
        );
        // No snapshot in between: the row still means the newest round.
        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut state),
            Some(UserCommand::SelectCell { row: 0, player: 1 })
        );
    }

    #[test]
    fn grid_without_players_ignores_enter() {
        let mut state = state_on(Screen::Grid, &[], 1);
        assert!(handle_key(key(KeyCode::Enter), &mut state).is_none());
        assert!(!state.editing_score);
    }

    // -- Quit confirmation --

    #[test]
    fn q_with_a_game_asks_first() {
        let mut state = state_on(Screen::Grid, &["A"], 1);
        assert!(handle_key(key(KeyCode::Char('q')), &mut state).is_none());
        assert!(state.confirm_quit);
        assert_eq!(
            handle_key(key(KeyCode::Char('y')), &mut state),
            Some(UserCommand::Quit)
        );
    }

    #[test]
    fn confirm_quit_q_sends_quit() {
        let mut state = state_on(Screen::Congratulations, &["A"], 1);
        handle_key(key(KeyCode::Char('q')), &mut state);
        assert!(state.confirm_quit);
        assert_eq!(
            handle_key(key(KeyCode::Char('q')), &mut state),
            Some(UserCommand::Quit)
        );
    }

    #[test]
    fn confirm_quit_n_and_esc_cancel() {
        let mut state = state_on(Screen::Grid, &["A"], 1);
        for cancel in [KeyCode::Char('n'), KeyCode::Esc] {
            state.confirm_quit = true;
            assert!(handle_key(key(cancel), &mut state).is_none());
            assert!(!state.confirm_quit);
            assert_eq!(state.screen, Screen::Grid);
        }
    }

    #[test]
    fn confirm_quit_blocks_other_keys() {
        let mut state = state_on(Screen::Grid, &["A"], 2);
        state.confirm_quit = true;
        for code in [KeyCode::Enter, KeyCode::Char('x'), KeyCode::Char('e'), KeyCode::Down] {
            assert!(handle_key(key(code), &mut state).is_none());
        }
        assert!(state.confirm_quit);
        assert!(!state.editing_score);
        assert_eq!(state.grid_cursor.row, 0);
    }

    #[test]
    fn ctrl_c_skips_confirmation() {
        let mut state = state_on(Screen::Grid, &["A"], 1);
        state.confirm_quit = true;
        assert_eq!(
            handle_key(ctrl_key(KeyCode::Char('c')), &mut state),
            Some(UserCommand::Quit)
        );
    }

    // -- Congratulations --

    #[test]
    fn congratulations_keys() {
        let mut state = state_on(Screen::Congratulations, &["A"], 1);
        assert_eq!(
            handle_key(key(KeyCode::Char('b')), &mut state),
            Some(UserCommand::ResumeGame)
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('h')), &mut state),
            Some(UserCommand::GoHome)
        );
    }
}
