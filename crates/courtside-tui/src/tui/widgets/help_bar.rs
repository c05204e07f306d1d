// Help bar and the `?` key reference overlay.

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::{Focus, ViewState};

const KEYS: [(&str, &str); 8] = [
    ("Up/Down, j/k", "Move cursor"),
    ("PgUp/PgDn", "Move 10 rows"),
    ("Enter, Space", "Select team or player"),
    ("Tab, Right", "Focus players"),
    ("Esc, Left", "Focus teams"),
    ("r", "Retry failed fetch"),
    ("?", "Toggle this help"),
    ("q, Ctrl+C", "Quit"),
];

const OVERLAY_WIDTH: u16 = 44;
const OVERLAY_HEIGHT: u16 = KEYS.len() as u16 + 2;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        hint_text(state.focus),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

pub fn hint_text(focus: Focus) -> &'static str {
    match focus {
        Focus::Teams => " q:Quit | j/k:Move | Enter:Select team | r:Retry | ?:Help",
        Focus::Players => " q:Quit | j/k:Move | Enter:Select player | Esc:Teams | r:Retry | ?:Help",
    }
}

/// Centered key reference drawn over the dashboard.
pub fn render_overlay(frame: &mut Frame, area: Rect) {
    let dialog = centered_rect(OVERLAY_WIDTH, OVERLAY_HEIGHT, area);
    frame.render_widget(Clear, dialog);

    let lines: Vec<Line> = KEYS
        .iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(
                    format!(" {keys:<14}"),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(*action),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" Keys "),
        )
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog);
}

/// Clamped to `area` when the terminal is small.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .split(area);
    Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .split(vertical[0])[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_follow_focus() {
        assert!(hint_text(Focus::Teams).contains("Select team"));
        assert!(hint_text(Focus::Players).contains("Esc:Teams"));
    }

    #[test]
    fn overlay_is_centered_and_clamped() {
        let area = Rect::new(0, 0, 80, 24);
        let rect = centered_rect(OVERLAY_WIDTH, OVERLAY_HEIGHT, area);
        assert_eq!(rect.width, OVERLAY_WIDTH);
        assert_eq!(rect.height, OVERLAY_HEIGHT);
        assert!(rect.x >= 17 && rect.x <= 19);

        let tiny = centered_rect(OVERLAY_WIDTH, OVERLAY_HEIGHT, Rect::new(0, 0, 20, 5));
        assert_eq!(tiny.width, 20);
        assert_eq!(tiny.height, 5);
    }

    #[test]
    fn overlay_lists_keys() {
        let backend = ratatui::backend::TestBackend::new(80, 24);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render_overlay(frame, frame.area()))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Keys"));
        assert!(text.contains("Retry failed fetch"));
        assert!(text.contains("Quit"));
    }
}
