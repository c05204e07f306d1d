// The seam between the fetch logic and the remote stats API.
//
// `BallDontLieClient` is the production implementation; tests substitute
// in-memory fakes.

use async_trait::async_trait;
use chrono::Datelike;

use crate::error::ApiResult;
use crate::model::{Envelope, GameStat, Player, PlayerId, SeasonAverage, Team, TeamId};

/// One page request for the paginated `/players` listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
    /// Set from the previous page's `meta.next_cursor` when the provider
    /// paginates by cursor.
    pub cursor: Option<u64>,
}

/// Read access to the remote stats provider.
#[async_trait]
pub trait StatsProvider: Send + Sync {
    /// `GET /teams`
    async fn teams(&self) -> ApiResult<Vec<Team>>;

    /// `GET /players?team_ids[]={team}&per_page={per_page}`, upstream order.
    async fn team_players(&self, team: TeamId, per_page: u32) -> ApiResult<Vec<Player>>;

    /// `GET /players?page=&per_page=&cursor=`
    async fn players_page(&self, request: PageRequest) -> ApiResult<Envelope<Player>>;

    /// `GET /players/{id}`
    async fn player(&self, id: PlayerId) -> ApiResult<Player>;

    /// `GET /season_averages?player_ids[]={id}&season={season}`. Without a
    /// season the provider picks its own default.
    async fn season_averages(
        &self,
        player: PlayerId,
        season: Option<u16>,
    ) -> ApiResult<Vec<SeasonAverage>>;

    /// `GET /stats?player_ids[]={id}&per_page={per_page}`
    async fn recent_games(&self, player: PlayerId, per_page: u32) -> ApiResult<Vec<GameStat>>;
}

/// Source of "now" for picking the default season.
pub trait Clock: Send + Sync {
    fn current_year(&self) -> u16;
}

/// Wall-clock time in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_year(&self) -> u16 {
        chrono::Local::now().year() as u16
    }
}

/// A clock pinned to one year.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u16);

impl Clock for FixedClock {
    fn current_year(&self) -> u16 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_reports_its_year() {
        assert_eq!(FixedClock(2025).current_year(), 2025);
    }

    #[test]
    fn system_clock_is_plausible() {
        let year = SystemClock.current_year();
        assert!(year >= 2024, "unexpected year {year}");
    }
}
