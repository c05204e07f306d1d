// Projection card: the selected player's five headline numbers as bars.
//
// Bars are scaled against a fixed ceiling so cards for different players
// are comparable at a glance.

use courtside_app::state::StatsView;
use courtside_core::model::{StatSnapshot, StatSource};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Wrap};
use ratatui::Frame;

use crate::tui::ViewState;

/// Value that fills a bar completely.
pub const STAT_BAR_MAX: f64 = 40.0;

const STATS: [(&str, Color); 5] = [
    ("PTS", Color::Yellow),
    ("REB", Color::Cyan),
    ("AST", Color::Magenta),
    ("STL", Color::Green),
    ("BLK", Color::Blue),
];

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Projection Card");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(player) = state.app.player() else {
        render_message(frame, inner, "Select a player to view stats.", Color::DarkGray);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // name + team
            Constraint::Length(1), // source caption
            Constraint::Length(1),
            Constraint::Min(0), // bars or message
        ])
        .split(inner);

    let team = player
        .team
        .as_ref()
        .map(|t| t.full_name.as_str())
        .unwrap_or("Free agent");
    let position = player.position.as_deref().unwrap_or("-");
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            player.display_name(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{position} | {team}"),
            Style::default().fg(Color::Gray),
        )),
    ]);
    frame.render_widget(header, rows[0]);

    match &state.app.stats {
        StatsView::Idle | StatsView::Loading => {
            render_message(frame, rows[3], "Loading stats...", Color::DarkGray);
        }
        StatsView::Unavailable => {
            render_message(frame, rows[3], "No stats available for this player.", Color::Yellow);
        }
        StatsView::Failed(msg) => {
            render_message(frame, rows[3], &format!("{msg} (r to retry)"), Color::Red);
        }
        StatsView::Loaded(_) => {
            // Only draw numbers that belong to the player on screen.
            if let Some(snapshot) = state.app.snapshot() {
                let caption = Paragraph::new(Span::styled(
                    source_caption(snapshot),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::ITALIC),
                ));
                frame.render_widget(caption, rows[1]);
                render_bars(frame, rows[3], snapshot);
            }
        }
    }
}

fn render_message(frame: &mut Frame, area: Rect, text: &str, color: Color) {
    let paragraph = Paragraph::new(text.to_string())
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_bars(frame: &mut Frame, area: Rect, snapshot: &StatSnapshot) {
    let values = stat_values(snapshot);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2); 5])
        .split(area);

    for (((label, color), value), row) in STATS.iter().zip(values).zip(rows.iter()) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(5), Constraint::Min(1)])
            .split(Rect {
                height: row.height.min(1),
                ..*row
            });
        frame.render_widget(
            Paragraph::new(Span::styled(*label, Style::default().fg(*color))),
            cols[0],
        );
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(*color).bg(Color::Black))
            .ratio(bar_ratio(value))
            .label(format!("{value:.1}"));
        frame.render_widget(gauge, cols[1]);
    }
}

/// pts, reb, ast, stl, blk in display order.
pub fn stat_values(snapshot: &StatSnapshot) -> [f64; 5] {
    [
        snapshot.pts,
        snapshot.reb,
        snapshot.ast,
        snapshot.stl,
        snapshot.blk,
    ]
}

/// Fraction of the bar to fill, clamped to `0.0..=1.0`.
pub fn bar_ratio(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value / STAT_BAR_MAX).clamp(0.0, 1.0)
}

/// Where the numbers came from, e.g. "Season Averages 2025".
pub fn source_caption(snapshot: &StatSnapshot) -> String {
    match (snapshot.source, snapshot.season, snapshot.games) {
        (StatSource::SeasonAverages, Some(season), _) => {
            format!("{} {season}", snapshot.source.label())
        }
        (StatSource::Recent10Games, _, Some(n)) if n != 10 => {
            format!("{} ({n} games)", snapshot.source.label())
        }
        _ => snapshot.source.label().to_string(),
    }
}
