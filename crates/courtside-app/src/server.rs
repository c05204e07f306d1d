// Pass-through JSON endpoints over the stats provider.
//
//   GET /api/team/{id}               -> players on the team, upstream order
//   GET /api/player/{id}             -> { player, seasonAverages }
//   GET /api/player/{id}/snapshot    -> resolved stat outcome
//
// Minimal HTTP/1.1: one request per connection, `Connection: close`.

use std::sync::Arc;
use std::time::Duration;

use courtside_core::config::Config;
use courtside_core::error::ApiError;
use courtside_core::model::{PlayerId, TeamId};
use courtside_core::pipeline::{resolve_player_stats, PipelineOptions};
use courtside_core::provider::{Clock, StatsProvider};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

/// Largest request head accepted, in bytes.
const MAX_HEAD_BYTES: usize = 8 * 1024;

/// How long a client gets to send its request head.
const HEAD_READ_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Team(TeamId),
    Player(PlayerId),
    Snapshot {
        player: PlayerId,
        season: Option<u16>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    NotFound,
    MethodNotAllowed,
    BadRequest(String),
}

impl RouteError {
    fn into_response(self) -> Response {
        match self {
            RouteError::NotFound => Response::error(404, "not found"),
            RouteError::MethodNotAllowed => Response::error(405, "method not allowed"),
            RouteError::BadRequest(msg) => Response::error(400, &msg),
        }
    }
}

fn parse_id<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T, RouteError> {
    raw.parse()
        .map_err(|_| RouteError::BadRequest(format!("invalid {what} id: {raw}")))
}

fn parse_season(query: Option<&str>) -> Result<Option<u16>, RouteError> {
    let Some(query) = query else {
        return Ok(None);
    };
    for pair in query.split('&') {
        if let Some(raw) = pair.strip_prefix("season=") {
            return raw
                .parse()
                .map(Some)
                .map_err(|_| RouteError::BadRequest(format!("invalid season: {raw}")));
        }
    }
    Ok(None)
}

/// Map a request line's method and target to a route.
pub fn parse_route(method: &str, target: &str) -> Result<Route, RouteError> {
    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    };
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    let route = match segments.as_slice() {
        ["api", "team", id] => Route::Team(parse_id(id, "team")?),
        ["api", "player", id] => Route::Player(parse_id(id, "player")?),
        ["api", "player", id, "snapshot"] => Route::Snapshot {
            player: parse_id(id, "player")?,
            season: parse_season(query)?,
        },
        _ => return Err(RouteError::NotFound),
    };

    if method != "GET" {
        return Err(RouteError::MethodNotAllowed);
    }
    Ok(route)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Value,
}

impl Response {
    fn ok<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(body) => Response { status: 200, body },
            Err(e) => Response::error(500, &e.to_string()),
        }
    }

    fn error(status: u16, message: &str) -> Self {
        Response {
            status,
            body: json!({ "error": message }),
        }
    }

    fn from_api_error(err: &ApiError) -> Self {
        Response::error(err.status_code(), &err.to_string())
    }

    /// Serialize as a complete HTTP/1.1 response.
    pub fn to_http(&self) -> String {
        let body = self.body.to_string();
        let reason = reqwest::StatusCode::from_u16(self.status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown");
        format!(
            "HTTP/1.1 {} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            self.status,
            body.len()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerOptions {
    pub roster_page_size: u32,
    /// Default season for snapshot requests without `?season=`.
    pub season: Option<u16>,
    pub pipeline: PipelineOptions,
}

impl Default for ServerOptions {
    fn default() -> Self {
        ServerOptions {
            roster_page_size: 100,
            season: None,
            pipeline: PipelineOptions::default(),
        }
    }
}

impl ServerOptions {
    pub fn from_config(config: &Config, season: Option<u16>) -> Self {
        ServerOptions {
            roster_page_size: config.fetch.roster_page_size,
            season,
            pipeline: PipelineOptions::from(&config.fetch),
        }
    }
}

/// Shared by every connection.
pub struct ServerContext {
    pub provider: Arc<dyn StatsProvider>,
    pub clock: Arc<dyn Clock>,
    pub options: ServerOptions,
}

pub async fn handle_route(ctx: &ServerContext, route: Route) -> Response {
    let provider = ctx.provider.as_ref();
    match route {
        Route::Team(team) => {
            match provider
                .team_players(team, ctx.options.roster_page_size)
                .await
            {
                Ok(players) => Response::ok(&players),
                Err(e) => Response::from_api_error(&e),
            }
        }
        Route::Player(id) => {
            let player = match provider.player(id).await {
                Ok(player) => player,
                Err(e) => return Response::from_api_error(&e),
            };
            let averages = match provider.season_averages(id, None).await {
                Ok(averages) => averages,
                Err(e) => return Response::from_api_error(&e),
            };
            let season_averages = match averages.first() {
                Some(avg) => serde_json::to_value(avg).unwrap_or_else(|_| json!({})),
                None => json!({}),
            };
            Response::ok(&json!({
                "player": player,
                "seasonAverages": season_averages,
            }))
        }
        Route::Snapshot { player, season } => {
            let season = season.or(ctx.options.season);
            match resolve_player_stats(
                provider,
                player,
                season,
                ctx.clock.as_ref(),
                ctx.options.pipeline,
            )
            .await
            {
                Ok(outcome) => Response::ok(&outcome),
                Err(e) => Response::from_api_error(&e),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Connections
// ---------------------------------------------------------------------------

/// Read one request head. Returns `(method, target)`.
///
/// Reads at most [`MAX_HEAD_BYTES`] from the stream; a head that has not
/// ended by then is rejected.
async fn read_request_head<S>(reader: &mut BufReader<S>) -> Result<(String, String), RouteError>
where
    S: AsyncRead + Unpin,
{
    let too_large = || RouteError::BadRequest("request head too large".into());
    let mut limited = (&mut *reader).take(MAX_HEAD_BYTES as u64);
    let mut request_line: Option<String> = None;
    let mut line = Vec::new();

    loop {
        line.clear();
        let n = limited
            .read_until(b'\n', &mut line)
            .await
            .map_err(|e| RouteError::BadRequest(e.to_string()))?;
        if !line.ends_with(b"\n") && limited.limit() == 0 {
            return Err(too_large());
        }
        if n == 0 {
            break;
        }
        if request_line.is_none() {
            request_line = Some(String::from_utf8_lossy(&line).into_owned());
        } else if line == b"\r\n" || line == b"\n" {
            // Headers are drained, none of them matter here.
            break;
        }
    }

    let request_line = request_line.unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(method), Some(target)) => Ok((method.to_string(), target.to_string())),
        _ => Err(RouteError::BadRequest("malformed request line".into())),
    }
}

/// Serve a single request on `stream`.
///
/// Generic over the stream so tests can drive it with in-memory pipes.
pub async fn handle_connection<S>(stream: S, ctx: &ServerContext) -> std::io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut reader = BufReader::new(stream);

    let head = tokio::time::timeout(HEAD_READ_TIMEOUT, read_request_head(&mut reader))
        .await
        .unwrap_or_else(|_| Err(RouteError::BadRequest("timed out reading request head".into())));

    let response = match head {
        Ok((method, target)) => {
            debug!(%method, %target, "request");
            match parse_route(&method, &target) {
                Ok(route) => handle_route(ctx, route).await,
                Err(e) => e.into_response(),
            }
        }
        Err(e) => e.into_response(),
    };

    if response.status >= 400 {
        info!(status = response.status, "request failed");
    }

    let mut stream = reader.into_inner();
    stream.write_all(response.to_http().as_bytes()).await?;
    stream.flush().await?;
    stream.shutdown().await
}

/// Accept connections forever, one task per connection.
pub async fn serve(listener: TcpListener, ctx: Arc<ServerContext>) -> anyhow::Result<()> {
    info!("HTTP server listening on {}", listener.local_addr()?);
    loop {
        let (stream, addr) = listener.accept().await?;
        let ctx = Arc::clone(&ctx);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, &ctx).await {
                warn!("connection from {addr} failed: {e}");
            }
        });
    }
}

/// Bind `127.0.0.1:{port}` and [`serve`].
pub async fn run(port: u16, ctx: Arc<ServerContext>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(format!("127.0.0.1:{port}")).await?;
    serve(listener, ctx).await
}
