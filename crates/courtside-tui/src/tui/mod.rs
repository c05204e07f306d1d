// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI keeps a copy of the orchestrator's view state plus its own
// cursor/focus state. The orchestrator pushes `UiUpdate` messages over an
// mpsc channel; the TUI applies them and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use courtside_app::protocol::{UiUpdate, UserCommand};
use courtside_app::state::ViewState as AppView;
use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::Frame;
use tokio::sync::mpsc;

use layout::build_layout;

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// Which list receives cursor keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Teams,
    Players,
}

/// TUI-local state: the latest orchestrator view plus cursor positions.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub app: AppView,
    pub focus: Focus,
    pub team_cursor: usize,
    pub player_cursor: usize,
    /// Season shown in the status bar; `None` means the current year.
    pub season: Option<u16>,
    pub show_help: bool,
}

impl ViewState {
    pub fn new(season: Option<u16>) -> Self {
        ViewState {
            season,
            ..ViewState::default()
        }
    }

    /// Keep cursors inside the current lists.
    fn clamp_cursors(&mut self) {
        let teams = self.app.team_list().len();
        let players = self.app.roster_list().len();
        self.team_cursor = self.team_cursor.min(teams.saturating_sub(1));
        self.player_cursor = self.player_cursor.min(players.saturating_sub(1));
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::State(view) => {
            if view.selected_team != state.app.selected_team {
                state.player_cursor = 0;
            }
            state.app = *view;
            state.clamp_cursors();
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete dashboard frame.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::teams::render(frame, layout.teams, state, state.focus == Focus::Teams);
    widgets::players::render(frame, layout.players, state, state.focus == Focus::Players);
    widgets::card::render(frame, layout.card, state);
    widgets::help_bar::render(frame, layout.help_bar, state);

    if state.show_help {
        widgets::help_bar::render_overlay(frame, frame.area());
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// 1. Initializes the terminal (raw mode, alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on clean exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    season: Option<u16>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::new(season);
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // Orchestrator gone.
                    None => break,
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => break,
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    ratatui::restore();
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use courtside_app::state::{Loadable, StatsView};
    use courtside_core::model::{Player, PlayerId, StatSnapshot, StatSource, Team, TeamId};

    pub(crate) fn team(id: u32, full_name: &str, abbr: &str) -> Team {
        Team {
            id: TeamId(id),
            full_name: full_name.into(),
            abbreviation: abbr.into(),
            city: None,
            name: None,
            conference: None,
            division: None,
        }
    }

    pub(crate) fn player(id: u64, first: &str, last: &str, position: &str) -> Player {
        Player {
            id: PlayerId(id),
            first_name: first.into(),
            last_name: last.into(),
            position: Some(position.into()),
            team: Some(team(14, "Los Angeles Lakers", "LAL")),
            height: Some("6-9".into()),
            weight: None,
            jersey_number: Some("23".into()),
        }
    }

    pub(crate) fn snapshot(id: u64) -> StatSnapshot {
        StatSnapshot {
            player_id: PlayerId(id),
            pts: 27.4,
            reb: 7.1,
            ast: 8.0,
            stl: 1.3,
            blk: 0.6,
            source: StatSource::SeasonAverages,
            season: Some(2025),
            games: None,
        }
    }

    /// Teams loaded, LAL selected with a two-man roster, LeBron's stats loaded.
    pub(crate) fn loaded_state() -> ViewState {
        let mut state = ViewState::new(Some(2025));
        state.app = AppView {
            teams: Loadable::Loaded(vec![
                team(1, "Atlanta Hawks", "ATL"),
                team(14, "Los Angeles Lakers", "LAL"),
            ]),
            selected_team: Some(TeamId(14)),
            roster: Loadable::Loaded(vec![
                player(237, "LeBron", "James", "F"),
                player(666, "Anthony", "Davis", "F-C"),
            ]),
            selected_player: Some(PlayerId(237)),
            stats: StatsView::Loaded(snapshot(237)),
        };
        state
    }

    /// Render the whole frame and return the buffer as text.
    pub(crate) fn render_to_string(state: &ViewState, width: u16, height: u16) -> String {
        let backend = ratatui::backend::TestBackend::new(width, height);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal.draw(|frame| render_frame(frame, state)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn view_state_default_is_sensible() {
        let state = ViewState::default();
        assert_eq!(state.focus, Focus::Teams);
        assert_eq!(state.team_cursor, 0);
        assert_eq!(state.player_cursor, 0);
        assert!(state.app.team_list().is_empty());
        assert!(!state.show_help);
    }

    #[test]
    fn apply_state_update_replaces_app_view() {
        let mut state = ViewState::default();
        let loaded = loaded_state();
        apply_ui_update(&mut state, UiUpdate::State(Box::new(loaded.app.clone())));
        assert_eq!(state.app, loaded.app);
    }

    #[test]
    fn team_change_resets_player_cursor() {
        let mut state = loaded_state();
        state.player_cursor = 1;

        let mut next = state.app.clone();
        next.selected_team = Some(TeamId(1));
        next.roster = Loadable::Loading;
        next.selected_player = None;
        next.stats = StatsView::Idle;
        apply_ui_update(&mut state, UiUpdate::State(Box::new(next)));

        assert_eq!(state.player_cursor, 0);
    }

    #[test]
    fn cursors_are_clamped_to_shrunk_lists() {
        let mut state = loaded_state();
        state.team_cursor = 9;
        state.player_cursor = 1;

        let mut next = state.app.clone();
        next.roster = Loadable::Loaded(vec![player(237, "LeBron", "James", "F")]);
        apply_ui_update(&mut state, UiUpdate::State(Box::new(next)));

        assert_eq!(state.team_cursor, 1);
        assert_eq!(state.player_cursor, 0);
    }

    #[test]
    fn full_frame_renders_all_panels() {
        let text = render_to_string(&loaded_state(), 140, 30);
        assert!(text.contains("Teams"));
        assert!(text.contains("Players"));
        assert!(text.contains("LeBron James"));
        assert!(text.contains("Season Averages"));
    }

    #[test]
    fn help_overlay_draws_over_dashboard() {
        let mut state = loaded_state();
        assert!(!render_to_string(&state, 120, 30).contains("Retry failed fetch"));
        state.show_help = true;
        assert!(render_to_string(&state, 120, 30).contains("Retry failed fetch"));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        render_to_string(&loaded_state(), 10, 4);
        render_to_string(&ViewState::default(), 1, 1);
    }
}
