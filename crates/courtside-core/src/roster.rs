// Team and roster queries.

use tracing::debug;

use crate::error::ApiResult;
use crate::model::{Player, Team, TeamId};
use crate::provider::StatsProvider;

/// Abbreviations of the 30 current franchises. `/teams` also returns
/// defunct historical teams.
pub const CURRENT_FRANCHISES: [&str; 30] = [
    "ATL", "BOS", "BKN", "CHA", "CHI", "CLE", "DAL", "DEN", "DET", "GSW", "HOU", "IND", "LAC",
    "LAL", "MEM", "MIA", "MIL", "MIN", "NOP", "NYK", "OKC", "ORL", "PHI", "PHX", "POR", "SAC",
    "SAS", "TOR", "UTA", "WAS",
];

/// Full names of the same franchises, for feeds whose abbreviations drift.
const CURRENT_FRANCHISE_NAMES: [&str; 30] = [
    "Atlanta Hawks",
    "Boston Celtics",
    "Brooklyn Nets",
    "Charlotte Hornets",
    "Chicago Bulls",
    "Cleveland Cavaliers",
    "Dallas Mavericks",
    "Denver Nuggets",
    "Detroit Pistons",
    "Golden State Warriors",
    "Houston Rockets",
    "Indiana Pacers",
    "LA Clippers",
    "Los Angeles Lakers",
    "Memphis Grizzlies",
    "Miami Heat",
    "Milwaukee Bucks",
    "Minnesota Timberwolves",
    "New Orleans Pelicans",
    "New York Knicks",
    "Oklahoma City Thunder",
    "Orlando Magic",
    "Philadelphia 76ers",
    "Phoenix Suns",
    "Portland Trail Blazers",
    "Sacramento Kings",
    "San Antonio Spurs",
    "Toronto Raptors",
    "Utah Jazz",
    "Washington Wizards",
];

pub fn is_current_franchise(team: &Team) -> bool {
    CURRENT_FRANCHISES.contains(&team.abbreviation.as_str())
        || CURRENT_FRANCHISE_NAMES.contains(&team.full_name.as_str())
}

/// Keep current franchises, preserving upstream order.
pub fn filter_current_teams(teams: Vec<Team>) -> Vec<Team> {
    teams.into_iter().filter(is_current_franchise).collect()
}

/// Heuristic for "on an active roster": has a position and a team.
pub fn is_active(player: &Player) -> bool {
    let has_position = player
        .position
        .as_deref()
        .is_some_and(|p| !p.trim().is_empty());
    has_position && player.team.is_some()
}

/// Keep active players, preserving upstream order. No dedup, no sort.
pub fn active_players(players: Vec<Player>) -> Vec<Player> {
    players.into_iter().filter(is_active).collect()
}

pub async fn list_teams(provider: &dyn StatsProvider, current_only: bool) -> ApiResult<Vec<Team>> {
    let teams = provider.teams().await?;
    let total = teams.len();
    let teams = if current_only {
        filter_current_teams(teams)
    } else {
        teams
    };
    debug!(total, kept = teams.len(), "loaded teams");
    Ok(teams)
}

pub async fn list_team_players(
    provider: &dyn StatsProvider,
    team: TeamId,
    per_page: u32,
) -> ApiResult<Vec<Player>> {
    let players = provider.team_players(team, per_page).await?;
    let total = players.len();
    let players = active_players(players);
    debug!(%team, total, kept = players.len(), "loaded roster");
    Ok(players)
}
