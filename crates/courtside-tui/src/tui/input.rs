// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages for the
// orchestrator, or into local ViewState changes (cursor, focus, help).

use courtside_app::protocol::UserCommand;
use courtside_app::state::{Loadable, StatsView};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{Focus, ViewState};

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should go to the
/// orchestrator, `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Windows reports both Press and Release.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.show_help {
        // Any key closes the help overlay; q still quits.
        view_state.show_help = false;
        return match key_event.code {
            KeyCode::Char('q') => Some(UserCommand::Quit),
            _ => None,
        };
    }

    match key_event.code {
        KeyCode::Char('q') => Some(UserCommand::Quit),
        KeyCode::Char('?') => {
            view_state.show_help = true;
            None
        }

        KeyCode::Up | KeyCode::Char('k') => {
            move_cursor(view_state, -1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            move_cursor(view_state, 1);
            None
        }
        KeyCode::PageUp => {
            move_cursor(view_state, -(PAGE_STEP as isize));
            None
        }
        KeyCode::PageDown => {
            move_cursor(view_state, PAGE_STEP as isize);
            None
        }

        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => {
            if view_state.app.selected_team.is_some() {
                view_state.focus = Focus::Players;
            }
            None
        }
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') | KeyCode::Esc => {
            view_state.focus = Focus::Teams;
            None
        }

        KeyCode::Enter | KeyCode::Char(' ') => select_under_cursor(view_state),
        KeyCode::Char('r') => retry(view_state),

        _ => None,
    }
}

/// Rows moved by PageUp/PageDown.
const PAGE_STEP: usize = 10;

fn move_cursor(view_state: &mut ViewState, delta: isize) {
    let (cursor, len) = match view_state.focus {
        Focus::Teams => (&mut view_state.team_cursor, view_state.app.team_list().len()),
        Focus::Players => (
            &mut view_state.player_cursor,
            view_state.app.roster_list().len(),
        ),
    };
    if len == 0 {
        *cursor = 0;
        return;
    }
    let next = cursor.saturating_add_signed(delta);
    *cursor = next.min(len - 1);
}

fn select_under_cursor(view_state: &mut ViewState) -> Option<UserCommand> {
    match view_state.focus {
        Focus::Teams => {
            let team = view_state.app.team_list().get(view_state.team_cursor)?.id;
            view_state.focus = Focus::Players;
            Some(UserCommand::SelectTeam(team))
        }
        Focus::Players => {
            let player = view_state.app.roster_list().get(view_state.player_cursor)?.id;
            Some(UserCommand::SelectPlayer(player))
        }
    }
}

/// Re-issue whichever fetch last failed.
fn retry(view_state: &ViewState) -> Option<UserCommand> {
    let app = &view_state.app;
    if matches!(app.teams, Loadable::Failed(_)) {
        return Some(UserCommand::ReloadTeams);
    }
    if matches!(app.roster, Loadable::Failed(_)) {
        return app.selected_team.map(UserCommand::SelectTeam);
    }
    if matches!(app.stats, StatsView::Failed(_)) {
        return app.selected_player.map(UserCommand::SelectPlayer);
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
