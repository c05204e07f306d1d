// Selection state machine.
//
// Idle -> TeamSelected -> PlayerSelected (loading) -> StatsLoaded |
// StatsUnavailable | StatsError. Only explicit selections move the machine.
// Every fetch is stamped with a generation; a result whose generation is no
// longer current is dropped, so a slow response for an old selection can
// never overwrite a newer one.

use courtside_core::model::{Player, PlayerId, StatSnapshot, StatsOutcome, Team, TeamId};
use thiserror::Error;
use tracing::{debug, warn};

use crate::protocol::FetchEvent;

// ---------------------------------------------------------------------------
// View types
// ---------------------------------------------------------------------------

/// A list that is fetched on demand.
#[derive(Debug, Clone, PartialEq)]
pub enum Loadable<T> {
    Idle,
    Loading,
    Loaded(T),
    /// User-facing message.
    Failed(String),
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Loadable::Idle
    }
}

impl<T> Loadable<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Loadable::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading)
    }
}

/// What the stat card shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum StatsView {
    #[default]
    Idle,
    Loading,
    Loaded(StatSnapshot),
    /// The player has no recorded performance. Not an error.
    Unavailable,
    Failed(String),
}

/// Coarse position in the selection flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    TeamSelected,
    /// A player is selected and the stat pipeline is running.
    PlayerSelected,
    StatsLoaded,
    StatsUnavailable,
    StatsError,
}

/// Everything the dashboard renders. Cloned to the TUI after each change.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub teams: Loadable<Vec<Team>>,
    pub selected_team: Option<TeamId>,
    pub roster: Loadable<Vec<Player>>,
    pub selected_player: Option<PlayerId>,
    pub stats: StatsView,
}

impl ViewState {
    pub fn phase(&self) -> Phase {
        match (self.selected_team, self.selected_player, &self.stats) {
            (None, _, _) => Phase::Idle,
            (Some(_), None, _) => Phase::TeamSelected,
            (Some(_), Some(_), StatsView::Idle | StatsView::Loading) => Phase::PlayerSelected,
            (Some(_), Some(_), StatsView::Loaded(_)) => Phase::StatsLoaded,
            (Some(_), Some(_), StatsView::Unavailable) => Phase::StatsUnavailable,
            (Some(_), Some(_), StatsView::Failed(_)) => Phase::StatsError,
        }
    }

    /// Teams in upstream order, empty until loaded.
    pub fn team_list(&self) -> &[Team] {
        self.teams.loaded().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Roster of the selected team in upstream order, empty until loaded.
    pub fn roster_list(&self) -> &[Player] {
        self.roster.loaded().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn team(&self) -> Option<&Team> {
        let id = self.selected_team?;
        self.team_list().iter().find(|t| t.id == id)
    }

    pub fn player(&self) -> Option<&Player> {
        let id = self.selected_player?;
        self.roster_list().iter().find(|p| p.id == id)
    }

    /// The card's snapshot, only if it belongs to the selected player.
    pub fn snapshot(&self) -> Option<&StatSnapshot> {
        match &self.stats {
            StatsView::Loaded(snap) if Some(snap.player_id) == self.selected_player => Some(snap),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Work the caller must start after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchRequest {
    Teams { generation: u64 },
    Roster { generation: u64, team: TeamId },
    Stats { generation: u64, player: PlayerId },
}

/// A selection that does not fit the current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("team {0} is not in the loaded team list")]
    UnknownTeam(TeamId),
    #[error("select a team first")]
    NoTeamSelected,
    #[error("player {0} is not on the selected roster")]
    UnknownPlayer(PlayerId),
}

/// Owns [`ViewState`] and the generation counters.
#[derive(Debug, Default)]
pub struct Controller {
    view: ViewState,
    teams_generation: u64,
    roster_generation: u64,
    stats_generation: u64,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn phase(&self) -> Phase {
        self.view.phase()
    }

    /// Start (or restart) the team list fetch.
    pub fn load_teams(&mut self) -> FetchRequest {
        self.teams_generation += 1;
        self.view.teams = Loadable::Loading;
        FetchRequest::Teams {
            generation: self.teams_generation,
        }
    }

    /// Select a team: clears player and stats, starts the roster fetch.
    pub fn select_team(&mut self, team: TeamId) -> Result<FetchRequest, SelectionError> {
        if !self.view.team_list().iter().any(|t| t.id == team) {
            return Err(SelectionError::UnknownTeam(team));
        }

        self.roster_generation += 1;
        // Invalidate any stats fetch for the previous roster.
        self.stats_generation += 1;

        self.view.selected_team = Some(team);
        self.view.roster = Loadable::Loading;
        self.view.selected_player = None;
        self.view.stats = StatsView::Idle;

        Ok(FetchRequest::Roster {
            generation: self.roster_generation,
            team,
        })
    }

    /// Select a player on the loaded roster and start the stat pipeline.
    pub fn select_player(&mut self, player: PlayerId) -> Result<FetchRequest, SelectionError> {
        if self.view.selected_team.is_none() {
            return Err(SelectionError::NoTeamSelected);
        }
        if !self.view.roster_list().iter().any(|p| p.id == player) {
            return Err(SelectionError::UnknownPlayer(player));
        }

        self.stats_generation += 1;
        self.view.selected_player = Some(player);
        self.view.stats = StatsView::Loading;

        Ok(FetchRequest::Stats {
            generation: self.stats_generation,
            player,
        })
    }

    /// Fold a fetch result into the view. Returns `false` when the result
    /// was stale and nothing changed.
    pub fn apply(&mut self, event: FetchEvent) -> bool {
        match event {
            FetchEvent::Teams { generation, result } => {
                if generation != self.teams_generation {
                    debug!(generation, current = self.teams_generation, "discarding stale teams");
                    return false;
                }
                self.view.teams = match result {
                    Ok(teams) => Loadable::Loaded(teams),
                    Err(e) => {
                        warn!("team list fetch failed: {e}");
                        Loadable::Failed(format!("Failed to load teams: {e}"))
                    }
                };
                true
            }
            FetchEvent::Roster {
                generation,
                team,
                result,
            } => {
                if generation != self.roster_generation || self.view.selected_team != Some(team) {
                    debug!(%team, generation, current = self.roster_generation, "discarding stale roster");
                    return false;
                }
                self.view.roster = match result {
                    Ok(players) => Loadable::Loaded(players),
                    Err(e) => {
                        warn!(%team, "roster fetch failed: {e}");
                        Loadable::Failed(format!("Failed to load players: {e}"))
                    }
                };
                true
            }
            FetchEvent::Stats {
                generation,
                player,
                result,
            } => {
                if generation != self.stats_generation || self.view.selected_player != Some(player)
                {
                    debug!(%player, generation, current = self.stats_generation, "discarding stale stats");
                    return false;
                }
                self.view.stats = match result {
                    Ok(StatsOutcome::Found { snapshot }) => StatsView::Loaded(snapshot),
                    Ok(StatsOutcome::NoData) => StatsView::Unavailable,
                    Err(e) => {
                        warn!(%player, "stats fetch failed: {e}");
                        StatsView::Failed(format!("Failed to load stats: {e}"))
                    }
                };
                true
            }
        }
    }
}
