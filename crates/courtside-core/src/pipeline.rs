// Stat resolution with fallback tiers.
//
// current season averages -> prior season averages -> recent games averaged
// -> no data. Tiers run one at a time; the first non-empty result wins and
// any error ends the chain.

use tracing::{debug, info};

use crate::config::FetchConfig;
use crate::error::ApiResult;
use crate::model::{PlayerId, StatSnapshot, StatsOutcome};
use crate::provider::{Clock, StatsProvider};

/// Tunables for [`resolve_player_stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Page size for the recent-games tier.
    pub recent_games: u32,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        PipelineOptions { recent_games: 10 }
    }
}

impl From<&FetchConfig> for PipelineOptions {
    fn from(fetch: &FetchConfig) -> Self {
        PipelineOptions {
            recent_games: fetch.recent_games,
        }
    }
}

/// Resolve one player's headline numbers.
///
/// `season` defaults to the clock's calendar year. A player with no averages
/// and no games yields [`StatsOutcome::NoData`], which is not an error.
pub async fn resolve_player_stats(
    provider: &dyn StatsProvider,
    player_id: PlayerId,
    season: Option<u16>,
    clock: &dyn Clock,
    options: PipelineOptions,
) -> ApiResult<StatsOutcome> {
    let season = season.unwrap_or_else(|| clock.current_year());

    for tier_season in [season, season.saturating_sub(1)] {
        let averages = provider
            .season_averages(player_id, Some(tier_season))
            .await?;
        if let Some(first) = averages.first() {
            info!(%player_id, season = tier_season, "resolved from season averages");
            return Ok(StatsOutcome::Found {
                snapshot: StatSnapshot::from_season_average(first, tier_season),
            });
        }
        debug!(%player_id, season = tier_season, "no season averages");
    }

    let games = provider
        .recent_games(player_id, options.recent_games)
        .await?;
    match StatSnapshot::from_games(player_id, &games) {
        Some(snapshot) => {
            info!(%player_id, games = games.len(), "resolved from recent games");
            Ok(StatsOutcome::Found { snapshot })
        }
        None => {
            info!(%player_id, "no stats recorded");
            Ok(StatsOutcome::NoData)
        }
    }
}
