// TUI widget modules, one per screen.

pub mod congratulations;
pub mod create_game;
pub mod home;
pub mod quit_confirm;
pub mod score_grid;

/// Flatten a test buffer into one string per row.
#[cfg(test)]
pub(crate) fn buffer_lines(buffer: &ratatui::buffer::Buffer) -> Vec<String> {
    let width = buffer.area.width as usize;
    buffer
        .content()
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect())
        .collect()
}
