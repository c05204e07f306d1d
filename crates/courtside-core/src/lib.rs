// Core library: data model, configuration, the balldontlie client and the
// stat-resolution pipeline.

pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod retry;
pub mod roster;

pub use client::BallDontLieClient;
pub use error::{ApiError, ApiResult};
pub use model::{Player, PlayerId, StatSnapshot, StatSource, StatsOutcome, Team, TeamId};
pub use pipeline::{resolve_player_stats, PipelineOptions};
pub use provider::{Clock, FixedClock, StatsProvider, SystemClock};
