// Players widget: roster of the selected team, upstream order.

use courtside_app::state::Loadable;
use courtside_core::model::Player;
use ratatui::layout::{Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
    Wrap,
};
use ratatui::Frame;

use super::scroll_offset;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState, focused: bool) {
    let focus_border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let title = match state.app.team() {
        Some(team) => format!("Players - {}", team.abbreviation),
        None => "Players".to_string(),
    };

    let players = match &state.app.roster {
        Loadable::Loaded(players) if !players.is_empty() => players,
        other => {
            let (text, color) = match other {
                Loadable::Idle => ("  Select a team.".to_string(), Color::DarkGray),
                Loadable::Loading => ("  Loading players...".to_string(), Color::DarkGray),
                Loadable::Failed(msg) => (format!("  {msg} (r to retry)"), Color::Red),
                Loadable::Loaded(_) => ("  No active players.".to_string(), Color::DarkGray),
            };
            let paragraph = Paragraph::new(text)
                .style(Style::default().fg(color))
                .wrap(Wrap { trim: false })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(focus_border)
                        .title(title),
                );
            frame.render_widget(paragraph, area);
            return;
        }
    };

    let visible_rows = (area.height as usize).saturating_sub(2);
    let total = players.len();
    let offset = scroll_offset(state.player_cursor, total, visible_rows);

    let items: Vec<ListItem> = players
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible_rows.max(1))
        .map(|(idx, player)| {
            let selected = state.app.selected_player == Some(player.id);
            let mut style = Style::default().fg(if selected { Color::Green } else { Color::White });
            if selected {
                style = style.add_modifier(Modifier::BOLD);
            }
            if focused && idx == state.player_cursor {
                style = style.bg(Color::DarkGray);
            }
            ListItem::new(Line::from(Span::styled(format_player(player), style)))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_border)
            .title(format!("{title} ({total})")),
    );
    frame.render_widget(list, area);

    if total > visible_rows {
        let mut scrollbar_state =
            ScrollbarState::new(total.saturating_sub(visible_rows)).position(offset);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

/// "James, LeBron  F  #23"
pub fn format_player(player: &Player) -> String {
    let position = player.position.as_deref().unwrap_or("-");
    let jersey = player
        .jersey_number
        .as_deref()
        .map(|n| format!("  #{n}"))
        .unwrap_or_default();
    format!(
        "{}, {}  {position}{jersey}",
        player.last_name, player.first_name
    )
}
