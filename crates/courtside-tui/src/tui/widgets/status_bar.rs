// Status bar widget: app name, season, selection phase.

use courtside_app::state::Phase;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [app name] | [season] | [phase]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let phase = state.app.phase();
    let spans = vec![
        Span::styled(
            " Courtside",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" | ", Style::default().fg(Color::Gray)),
        Span::styled(season_label(state.season), Style::default().fg(Color::White)),
        Span::styled(" | ", Style::default().fg(Color::Gray)),
        Span::styled(phase_label(phase), Style::default().fg(phase_color(phase))),
    ];

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

pub fn season_label(season: Option<u16>) -> String {
    match season {
        Some(year) => format!("Season {year}"),
        None => "Current season".to_string(),
    }
}

pub fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "Pick a team",
        Phase::TeamSelected => "Pick a player",
        Phase::PlayerSelected => "Fetching stats",
        Phase::StatsLoaded => "Stats loaded",
        Phase::StatsUnavailable => "No stats",
        Phase::StatsError => "Stats error",
    }
}

fn phase_color(phase: Phase) -> Color {
    match phase {
        Phase::StatsLoaded => Color::Green,
        Phase::StatsUnavailable => Color::Yellow,
        Phase::StatsError => Color::Red,
        _ => Color::White,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
