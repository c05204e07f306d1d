// Data model: upstream records (teams, players, averages, game logs) and the
// resolved stat snapshot shown on the projection card.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Upstream team identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub u32);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TeamId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// Upstream player identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PlayerId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

// ---------------------------------------------------------------------------
// Upstream records
// ---------------------------------------------------------------------------

/// A franchise as reported by `GET /teams`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub abbreviation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub division: Option<String>,
}

/// A player as reported by `GET /players`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Empty or missing for retired / unassigned players.
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub team: Option<Team>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jersey_number: Option<String>,
}

impl Player {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn team_id(&self) -> Option<TeamId> {
        self.team.as_ref().map(|t| t.id)
    }
}

/// Per-game season means from `GET /season_averages`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonAverage {
    pub player_id: PlayerId,
    #[serde(default)]
    pub season: Option<u16>,
    #[serde(default)]
    pub games_played: Option<u32>,
    #[serde(default)]
    pub min: Option<String>,
    #[serde(default)]
    pub pts: Option<f64>,
    #[serde(default)]
    pub reb: Option<f64>,
    #[serde(default)]
    pub ast: Option<f64>,
    #[serde(default)]
    pub stl: Option<f64>,
    #[serde(default)]
    pub blk: Option<f64>,
}

/// Game reference embedded in a box-score line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRef {
    pub id: u64,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub season: Option<u16>,
}

/// One player's box-score line from `GET /stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStat {
    pub id: u64,
    #[serde(default)]
    pub pts: Option<f64>,
    #[serde(default)]
    pub reb: Option<f64>,
    #[serde(default)]
    pub ast: Option<f64>,
    #[serde(default)]
    pub stl: Option<f64>,
    #[serde(default)]
    pub blk: Option<f64>,
    #[serde(default)]
    pub game: Option<GameRef>,
}

/// Pagination metadata. The provider has used both page numbers and
/// cursors over time, so every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub next_page: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub next_cursor: Option<u64>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

/// Top-level list envelope: `{ "data": [...], "meta": {...} }`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Option<Meta>,
}

/// Single-record envelope used by `GET /players/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Single<T> {
    pub data: T,
}

// ---------------------------------------------------------------------------
// Resolved snapshot
// ---------------------------------------------------------------------------

/// Which fallback tier produced a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatSource {
    SeasonAverages,
    #[serde(rename = "recent_10_games")]
    Recent10Games,
    SingleGame,
}

impl StatSource {
    pub fn label(&self) -> &'static str {
        match self {
            StatSource::SeasonAverages => "Season Averages",
            StatSource::Recent10Games => "Last 10 Games Avg",
            StatSource::SingleGame => "Most Recent Game",
        }
    }
}

/// The five headline numbers for one player, tagged with provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatSnapshot {
    pub player_id: PlayerId,
    pub pts: f64,
    pub reb: f64,
    pub ast: f64,
    pub stl: f64,
    pub blk: f64,
    pub source: StatSource,
    /// Season that produced a `season_averages` snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<u16>,
    /// Number of games averaged for the game-log tiers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub games: Option<usize>,
}

impl StatSnapshot {
    pub fn from_season_average(avg: &SeasonAverage, season: u16) -> Self {
        StatSnapshot {
            player_id: avg.player_id,
            pts: avg.pts.unwrap_or(0.0),
            reb: avg.reb.unwrap_or(0.0),
            ast: avg.ast.unwrap_or(0.0),
            stl: avg.stl.unwrap_or(0.0),
            blk: avg.blk.unwrap_or(0.0),
            source: StatSource::SeasonAverages,
            season: Some(avg.season.unwrap_or(season)),
            games: None,
        }
    }

    /// Average the given box scores, rounding each mean to one decimal.
    ///
    /// Returns `None` for an empty slice.
    pub fn from_games(player_id: PlayerId, games: &[GameStat]) -> Option<Self> {
        if games.is_empty() {
            return None;
        }
        let n = games.len() as f64;
        let mean = |f: fn(&GameStat) -> Option<f64>| {
            round1(games.iter().map(|g| f(g).unwrap_or(0.0)).sum::<f64>() / n)
        };
        let source = if games.len() == 1 {
            StatSource::SingleGame
        } else {
            StatSource::Recent10Games
        };
        Some(StatSnapshot {
            player_id,
            pts: mean(|g| g.pts),
            reb: mean(|g| g.reb),
            ast: mean(|g| g.ast),
            stl: mean(|g| g.stl),
            blk: mean(|g| g.blk),
            source,
            season: None,
            games: Some(games.len()),
        })
    }
}

/// Result of the fallback chain: a snapshot, or a well-formed "nothing".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatsOutcome {
    Found { snapshot: StatSnapshot },
    NoData,
}

impl StatsOutcome {
    pub fn snapshot(&self) -> Option<&StatSnapshot> {
        match self {
            StatsOutcome::Found { snapshot } => Some(snapshot),
            StatsOutcome::NoData => None,
        }
    }
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
