// Static JSON snapshot of teams and rosters.
//
// Writes `teams.json`, `playersByTeam.json` and an empty `projections.json`
// into an output directory for offline use.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::info;

use crate::config::ExportConfig;
use crate::error::ApiResult;
use crate::model::{Meta, Player, Team, TeamId};
use crate::provider::{PageRequest, StatsProvider};

pub const TEAMS_FILE: &str = "teams.json";
pub const PLAYERS_BY_TEAM_FILE: &str = "playersByTeam.json";
pub const PROJECTIONS_FILE: &str = "projections.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub page_size: u32,
    /// Pause between player pages.
    pub page_delay: Duration,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            page_size: 100,
            page_delay: Duration::from_millis(500),
        }
    }
}

impl From<&ExportConfig> for ExportOptions {
    fn from(export: &ExportConfig) -> Self {
        ExportOptions {
            page_size: export.page_size,
            page_delay: Duration::from_millis(export.page_delay_ms),
        }
    }
}

/// What [`run_export`] wrote.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub teams: usize,
    pub players: usize,
    pub files: Vec<PathBuf>,
}

/// Placeholder projections document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Projections {
    all: Vec<serde_json::Value>,
    top10: Vec<serde_json::Value>,
    expert_picks: Vec<serde_json::Value>,
    updated: String,
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Whether another `/players` page should be requested after `page`.
///
/// The provider has reported pagination as page numbers, page counts and
/// cursors; any of them, or a full page, means keep going.
pub fn has_more(meta: &Meta, page: u32, batch_len: usize, page_size: u32) -> bool {
    meta.next_page.is_some()
        || meta.next_cursor.is_some()
        || meta.total_pages.is_some_and(|total| page < total)
        || batch_len == page_size as usize
}

/// Page through `/players` until the provider reports no more data.
pub async fn fetch_all_players(
    provider: &dyn StatsProvider,
    options: &ExportOptions,
) -> ApiResult<Vec<Player>> {
    let mut players = Vec::new();
    let mut request = PageRequest {
        page: 1,
        per_page: options.page_size,
        cursor: None,
    };

    loop {
        let envelope = provider.players_page(request).await?;
        let batch_len = envelope.data.len();
        if batch_len == 0 {
            break;
        }
        players.extend(envelope.data);
        info!(page = request.page, batch = batch_len, "fetched player page");

        let meta = envelope.meta.unwrap_or_default();
        if !has_more(&meta, request.page, batch_len, options.page_size) {
            break;
        }

        request.page += 1;
        request.cursor = meta.next_cursor;
        tokio::time::sleep(options.page_delay).await;
    }

    info!(total = players.len(), "fetched all players");
    Ok(players)
}

/// Bucket players by team. Every team gets an entry, possibly empty;
/// players without a team, or with an unknown one, are left out.
pub fn group_by_team(teams: &[Team], players: &[Player]) -> BTreeMap<TeamId, Vec<Player>> {
    let mut grouped: BTreeMap<TeamId, Vec<Player>> =
        teams.iter().map(|t| (t.id, Vec::new())).collect();
    for player in players {
        if let Some(bucket) = player.team_id().and_then(|id| grouped.get_mut(&id)) {
            bucket.push(player.clone());
        }
    }
    grouped
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

async fn write_json<T: Serialize>(dir: &Path, name: &str, value: &T) -> ApiResult<PathBuf> {
    let path = dir.join(name);
    let json = serde_json::to_string_pretty(value)?;
    tokio::fs::write(&path, json).await?;
    Ok(path)
}

/// Fetch teams and every player page, then write the three snapshot files
/// into `out_dir` (created if missing).
pub async fn run_export(
    provider: &dyn StatsProvider,
    out_dir: &Path,
    options: &ExportOptions,
) -> ApiResult<ExportSummary> {
    tokio::fs::create_dir_all(out_dir).await?;

    let teams = provider.teams().await?;
    info!(count = teams.len(), "fetched teams");
    let players = fetch_all_players(provider, options).await?;
    let by_team = group_by_team(&teams, &players);

    let projections = Projections {
        all: Vec::new(),
        top10: Vec::new(),
        expert_picks: Vec::new(),
        updated: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };

    let files = vec![
        write_json(out_dir, TEAMS_FILE, &teams).await?,
        write_json(out_dir, PLAYERS_BY_TEAM_FILE, &by_team).await?,
        write_json(out_dir, PROJECTIONS_FILE, &projections).await?,
    ];
    info!(dir = %out_dir.display(), "export written");

    Ok(ExportSummary {
        teams: teams.len(),
        players: players.len(),
        files,
    })
}
