// Screen layout: panel arrangement and sizing.
//
// Every screen shares the same frame:
//
// +--------------------------------------------------+
// | Title Bar (1 row)                                 |
// +--------------------------------------------------+
// |                                                   |
// | Body (fill)                                       |
// |                                                   |
// +--------------------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+
//
// The create-game body is further split by `build_setup_layout`.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas shared by all screens.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: app title, game name, phase.
    pub title_bar: Rect,
    /// Screen-specific content.
    pub body: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Areas of the create-game screen body.
#[derive(Debug, Clone)]
pub struct SetupLayout {
    /// Game name input plus its error line.
    pub game_name: Rect,
    /// High/low score wins choice.
    pub win_rule: Rect,
    /// Player feedback line and entry field.
    pub player_entry: Rect,
    /// List of added players.
    pub player_list: Rect,
    /// Start / continue button.
    pub start_button: Rect,
}

/// Build the shared layout from the available terminal area.
pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title bar
            Constraint::Min(5),    // body
            Constraint::Length(1), // help bar
        ])
        .split(area);

    AppLayout {
        title_bar: vertical[0],
        body: vertical[1],
        help_bar: vertical[2],
    }
}

/// Split the create-game body into its fields, top to bottom.
pub fn build_setup_layout(body: Rect) -> SetupLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // game name (bordered field + error line)
            Constraint::Length(3), // win rule
            Constraint::Length(4), // player feedback + entry
            Constraint::Min(3),    // player list
            Constraint::Length(3), // start button
        ])
        .split(body);

    SetupLayout {
        game_name: vertical[0],
        win_rule: vertical[1],
        player_entry: vertical[2],
        player_list: vertical[3],
        start_button: vertical[4],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_fills_area() {
        let area = Rect::new(0, 0, 80, 24);
        let layout = build_layout(area);
        assert_eq!(layout.title_bar.height, 1);
        assert_eq!(layout.help_bar.height, 1);
        assert_eq!(layout.body.height, 22);
        assert_eq!(layout.help_bar.y, 23);
        assert_eq!(layout.body.width, 80);
    }

    #[test]
    fn setup_layout_fixed_rows() {
        let body = Rect::new(0, 1, 80, 30);
        let setup = build_setup_layout(body);
        assert_eq!(setup.game_name.height, 4);
        assert_eq!(setup.win_rule.height, 3);
        assert_eq!(setup.player_entry.height, 4);
        assert_eq!(setup.start_button.height, 3);
        assert_eq!(setup.player_list.height, 30 - 4 - 3 - 4 - 3);
        assert_eq!(setup.game_name.y, 1);
    }

    #[test]
    fn small_terminal_does_not_panic() {
        let layout = build_layout(Rect::new(0, 0, 10, 4));
        let _ = build_setup_layout(layout.body);
    }
}
