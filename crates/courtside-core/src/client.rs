// balldontlie REST client.
//
// Plain JSON GETs against the v1 API. Every request passes through the
// 429 retry policy; any other non-2xx status is surfaced as
// `ApiError::Status` without retrying.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::model::{Envelope, GameStat, Player, PlayerId, SeasonAverage, Single, Team, TeamId};
use crate::provider::{PageRequest, StatsProvider};
use crate::retry::{with_rate_limit_retry, RetryPolicy};

// ---------------------------------------------------------------------------
// BallDontLieClient
// ---------------------------------------------------------------------------

/// HTTP implementation of [`StatsProvider`].
pub struct BallDontLieClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    retry: RetryPolicy,
}

impl BallDontLieClient {
    /// Create a client for `base_url` (e.g. `https://api.balldontlie.io/v1`).
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, retry: RetryPolicy) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            retry,
        }
    }

    /// Build a client from the application config.
    pub fn from_config(config: &Config) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.api.user_agent.clone())
            .build()?;
        Ok(Self {
            http,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            api_key: config.credentials.api_key.clone().filter(|k| !k.is_empty()),
            retry: config.retry.policy(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T>(&self, path: &str, query: &[(&str, String)]) -> ApiResult<T>
    where
        T: DeserializeOwned + Send,
    {
        let url = format!("{}{}", self.base_url, path);
        let url = url.as_str();
        with_rate_limit_retry(&self.retry, path, || self.get_once(url, query)).await
    }

    async fn get_once<T>(&self, url: &str, query: &[(&str, String)]) -> ApiResult<T>
    where
        T: DeserializeOwned + Send,
    {
        let mut request = self.http.get(url).query(query);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(url, status = status.as_u16(), "upstream response");
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl StatsProvider for BallDontLieClient {
    async fn teams(&self) -> ApiResult<Vec<Team>> {
        let envelope: Envelope<Team> = self.get_json("/teams", &[]).await?;
        Ok(envelope.data)
    }

    async fn team_players(&self, team: TeamId, per_page: u32) -> ApiResult<Vec<Player>> {
        let query = [
            ("team_ids[]", team.to_string()),
            ("per_page", per_page.to_string()),
        ];
        let envelope: Envelope<Player> = self.get_json("/players", &query).await?;
        Ok(envelope.data)
    }

    async fn players_page(&self, request: PageRequest) -> ApiResult<Envelope<Player>> {
        let mut query = vec![
            ("page", request.page.to_string()),
            ("per_page", request.per_page.to_string()),
        ];
        if let Some(cursor) = request.cursor {
            query.push(("cursor", cursor.to_string()));
        }
        self.get_json("/players", &query).await
    }

    async fn player(&self, id: PlayerId) -> ApiResult<Player> {
        let single: Single<Player> = self.get_json(&format!("/players/{id}"), &[]).await?;
        Ok(single.data)
    }

    async fn season_averages(
        &self,
        player: PlayerId,
        season: Option<u16>,
    ) -> ApiResult<Vec<SeasonAverage>> {
        let mut query = vec![("player_ids[]", player.to_string())];
        if let Some(season) = season {
            query.push(("season", season.to_string()));
        }
        let envelope: Envelope<SeasonAverage> = self.get_json("/season_averages", &query).await?;
        Ok(envelope.data)
    }

    async fn recent_games(&self, player: PlayerId, per_page: u32) -> ApiResult<Vec<GameStat>> {
        let query = [
            ("player_ids[]", player.to_string()),
            ("per_page", per_page.to_string()),
        ];
        let envelope: Envelope<GameStat> = self.get_json("/stats", &query).await?;
        Ok(envelope.data)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
