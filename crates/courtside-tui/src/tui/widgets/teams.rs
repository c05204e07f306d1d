// Teams widget: the franchise picker.
//
// One row per team: selection marker, abbreviation, full name.

use courtside_app::state::Loadable;
use courtside_core::model::Team;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;

use super::scroll_offset;
use crate::tui::ViewState;

/// Render the team list into the given area.
///
/// When `focused` is true, the border and cursor row are highlighted.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState, focused: bool) {
    let focus_border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let teams = match &state.app.teams {
        Loadable::Loaded(teams) if !teams.is_empty() => teams,
        other => {
            let (text, color) = match other {
                Loadable::Loading => ("  Loading teams...".to_string(), Color::DarkGray),
                Loadable::Failed(msg) => (format!("  {msg} (r to retry)"), Color::Red),
                Loadable::Loaded(_) => ("  No teams.".to_string(), Color::DarkGray),
                Loadable::Idle => (String::new(), Color::DarkGray),
            };
            let paragraph = Paragraph::new(text)
                .style(Style::default().fg(color))
                .wrap(Wrap { trim: false })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(focus_border)
                        .title("Teams"),
                );
            frame.render_widget(paragraph, area);
            return;
        }
    };

    let visible_rows = (area.height as usize).saturating_sub(2);
    let offset = scroll_offset(state.team_cursor, teams.len(), visible_rows);

    let items: Vec<ListItem> = teams
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible_rows.max(1))
        .map(|(idx, team)| {
            let selected = state.app.selected_team == Some(team.id);
            let mut style = Style::default().fg(if selected { Color::Green } else { Color::White });
            if selected {
                style = style.add_modifier(Modifier::BOLD);
            }
            if focused && idx == state.team_cursor {
                style = style.bg(Color::DarkGray);
            }
            ListItem::new(Line::from(Span::styled(format_team(team, selected), style)))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_border)
            .title(format!("Teams ({})", teams.len())),
    );
    frame.render_widget(list, area);
}

/// Format one picker row.
pub fn format_team(team: &Team, selected: bool) -> String {
    let marker = if selected { '>' } else { ' ' };
    format!("{marker} {:<4}{}", team.abbreviation, team.full_name)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
