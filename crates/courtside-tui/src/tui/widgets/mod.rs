// TUI widget modules for each dashboard panel.

pub mod card;
pub mod help_bar;
pub mod players;
pub mod status_bar;
pub mod teams;

/// First row to draw so that `cursor` stays inside `visible_rows`.
pub fn scroll_offset(cursor: usize, total: usize, visible_rows: usize) -> usize {
    if visible_rows == 0 || total <= visible_rows {
        return 0;
    }
    let max_offset = total - visible_rows;
    cursor.saturating_sub(visible_rows - 1).min(max_offset)
}
