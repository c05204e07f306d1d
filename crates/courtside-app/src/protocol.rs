// Messages exchanged between the TUI, the orchestrator and fetch tasks.

use courtside_core::model::{Player, PlayerId, StatsOutcome, Team, TeamId};
use courtside_core::ApiResult;

use crate::state::ViewState;

/// Commands sent from the TUI to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    SelectTeam(TeamId),
    SelectPlayer(PlayerId),
    /// Retry the team list after a failure.
    ReloadTeams,
    Quit,
}

/// Results posted back by spawned fetch tasks. Each carries the generation
/// it was started under so late results can be recognised and dropped.
#[derive(Debug)]
pub enum FetchEvent {
    Teams {
        generation: u64,
        result: ApiResult<Vec<Team>>,
    },
    Roster {
        generation: u64,
        team: TeamId,
        result: ApiResult<Vec<Player>>,
    },
    Stats {
        generation: u64,
        player: PlayerId,
        result: ApiResult<StatsOutcome>,
    },
}

impl FetchEvent {
    pub fn generation(&self) -> u64 {
        match self {
            FetchEvent::Teams { generation, .. }
            | FetchEvent::Roster { generation, .. }
            | FetchEvent::Stats { generation, .. } => *generation,
        }
    }
}

/// Updates pushed from the orchestrator to the TUI.
#[derive(Debug, Clone)]
pub enum UiUpdate {
    /// Full copy of the view state after a change.
    State(Box<ViewState>),
}
