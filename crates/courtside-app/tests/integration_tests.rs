// Integration tests for the application layer.
//
// A scripted upstream on 127.0.0.1 stands in for balldontlie; the real
// `BallDontLieClient` talks to it, and the orchestrator and pass-through
// server are driven through their public APIs.

use std::sync::Arc;
use std::time::Duration;

use courtside_app::app::{self, App, AppOptions};
use courtside_app::protocol::{UiUpdate, UserCommand};
use courtside_app::server::{self, ServerContext, ServerOptions};
use courtside_app::state::{Phase, StatsView, ViewState};
use courtside_core::model::{PlayerId, StatSource, TeamId};
use courtside_core::retry::RetryPolicy;
use courtside_core::{BallDontLieClient, FixedClock};

use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

// ===========================================================================
// Scripted upstream
// ===========================================================================

const TEAMS: &str = r#"{ "data": [
    { "id": 1, "full_name": "Atlanta Hawks", "abbreviation": "ATL" },
    { "id": 14, "full_name": "Los Angeles Lakers", "abbreviation": "LAL" },
    { "id": 37, "full_name": "Chicago Stags", "abbreviation": "CHS" }
] }"#;

const LAKERS: &str = r#"{ "data": [
    { "id": 237, "first_name": "LeBron", "last_name": "James", "position": "F",
      "team": { "id": 14, "full_name": "Los Angeles Lakers", "abbreviation": "LAL" } },
    { "id": 17, "first_name": "Retired", "last_name": "Laker", "position": "",
      "team": { "id": 14, "full_name": "Los Angeles Lakers", "abbreviation": "LAL" } },
    { "id": 900, "first_name": "Rookie", "last_name": "Guard", "position": "G",
      "team": { "id": 14, "full_name": "Los Angeles Lakers", "abbreviation": "LAL" } }
] }"#;

const LEBRON_2025: &str = r#"{ "data": [
    { "player_id": 237, "season": 2025, "games_played": 70,
      "pts": 27.4, "reb": 7.1, "ast": 8.0, "stl": 1.3, "blk": 0.6 }
] }"#;

const ROOKIE_GAMES: &str = r#"{ "data": [
    { "id": 1, "pts": 20, "reb": 3, "ast": 4, "stl": 1, "blk": 0 },
    { "id": 2, "pts": 22, "reb": 3, "ast": 4, "stl": 1, "blk": 0 },
    { "id": 3, "pts": 18, "reb": 3, "ast": 4, "stl": 1, "blk": 0 },
    { "id": 4, "pts": 30, "reb": 3, "ast": 4, "stl": 1, "blk": 0 },
    { "id": 5, "pts": 25, "reb": 3, "ast": 4, "stl": 1, "blk": 0 },
    { "id": 6, "pts": 19, "reb": 3, "ast": 4, "stl": 1, "blk": 0 },
    { "id": 7, "pts": 21, "reb": 3, "ast": 4, "stl": 1, "blk": 0 },
    { "id": 8, "pts": 24, "reb": 3, "ast": 4, "stl": 1, "blk": 0 },
    { "id": 9, "pts": 26, "reb": 3, "ast": 4, "stl": 1, "blk": 0 },
    { "id": 10, "pts": 23, "reb": 3, "ast": 4, "stl": 1, "blk": 0 }
] }"#;

/// Answer one request target with `(status line, body)`.
fn route(target: &str) -> (&'static str, &'static str) {
    let decoded = target.replace("%5B", "[").replace("%5D", "]");
    if decoded.starts_with("/teams") {
        ("200 OK", TEAMS)
    } else if decoded.starts_with("/players?") && decoded.contains("team_ids[]=14") {
        ("200 OK", LAKERS)
    } else if decoded.starts_with("/players/237") {
        ("200 OK", r#"{ "data": { "id": 237, "first_name": "LeBron", "last_name": "James", "position": "F" } }"#)
    } else if decoded.starts_with("/season_averages") && decoded.contains("player_ids[]=237") {
        if decoded.contains("season=2025") || !decoded.contains("season=") {
            ("200 OK", LEBRON_2025)
        } else {
            ("200 OK", r#"{ "data": [] }"#)
        }
    } else if decoded.starts_with("/season_averages") {
        ("200 OK", r#"{ "data": [] }"#)
    } else if decoded.starts_with("/stats") && decoded.contains("player_ids[]=900") {
        ("200 OK", ROOKIE_GAMES)
    } else if decoded.starts_with("/stats") {
        ("200 OK", r#"{ "data": [] }"#)
    } else {
        ("404 Not Found", r#"{ "error": "not found" }"#)
    }
}

async fn start_upstream() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                loop {
                    let n = socket.read(&mut chunk).await.unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                    if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                let head = String::from_utf8_lossy(&buf).to_string();
                let target = head.split_whitespace().nth(1).unwrap_or("/").to_string();
                let (status, body) = route(&target);
                let response = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{addr}")
}

fn client(base: String) -> BallDontLieClient {
    BallDontLieClient::new(
        base,
        Some("test-key".into()),
        RetryPolicy {
            max_attempts: 2,
            base_delay: Duration::from_millis(5),
        },
    )
}

// ===========================================================================
// Orchestrator
// ===========================================================================

async fn wait_for(
    ui_rx: &mut mpsc::Receiver<UiUpdate>,
    pred: impl Fn(&ViewState) -> bool,
) -> ViewState {
    let deadline = Duration::from_secs(5);
    tokio::time::timeout(deadline, async {
        loop {
            match ui_rx.recv().await {
                Some(UiUpdate::State(view)) if pred(&view) => return *view,
                Some(_) => continue,
                None => panic!("ui channel closed"),
            }
        }
    })
    .await
    .expect("timed out waiting for view state")
}

#[tokio::test]
async fn dashboard_flow_against_scripted_upstream() {
    let base = start_upstream().await;
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (fetch_tx, fetch_rx) = mpsc::channel(16);
    let (ui_tx, mut ui_rx) = mpsc::channel(64);

    let app = App::new(
        Arc::new(client(base)),
        Arc::new(FixedClock(2025)),
        AppOptions::default(),
        fetch_tx,
    );
    let handle = tokio::spawn(app::run(cmd_rx, fetch_rx, ui_tx, app));

    // Historical franchise filtered out.
    let view = wait_for(&mut ui_rx, |v| v.teams.loaded().is_some()).await;
    let abbrs: Vec<&str> = view.team_list().iter().map(|t| t.abbreviation.as_str()).collect();
    assert_eq!(abbrs, vec!["ATL", "LAL"]);

    // Inactive player filtered out, order preserved.
    cmd_tx.send(UserCommand::SelectTeam(TeamId(14))).await.unwrap();
    let view = wait_for(&mut ui_rx, |v| v.roster.loaded().is_some()).await;
    let ids: Vec<PlayerId> = view.roster_list().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![PlayerId(237), PlayerId(900)]);
    assert_eq!(view.phase(), Phase::TeamSelected);

    // Current-season averages.
    cmd_tx.send(UserCommand::SelectPlayer(PlayerId(237))).await.unwrap();
    let view = wait_for(&mut ui_rx, |v| v.phase() == Phase::StatsLoaded).await;
    let snap = view.snapshot().unwrap();
    assert_eq!(snap.source, StatSource::SeasonAverages);
    assert!((snap.pts - 27.4).abs() < 1e-9);
    assert!((snap.reb - 7.1).abs() < 1e-9);
    assert!((snap.ast - 8.0).abs() < 1e-9);

    // Game-log fallback.
    cmd_tx.send(UserCommand::SelectPlayer(PlayerId(900))).await.unwrap();
    let view = wait_for(&mut ui_rx, |v| {
        v.phase() == Phase::StatsLoaded && v.selected_player == Some(PlayerId(900))
    })
    .await;
    let snap = view.snapshot().unwrap();
    assert_eq!(snap.source, StatSource::Recent10Games);
    assert!((snap.pts - 22.8).abs() < 1e-9);

    cmd_tx.send(UserCommand::Quit).await.unwrap();
    assert!(handle.await.unwrap().is_ok());
}

#[tokio::test]
async fn unreachable_upstream_surfaces_team_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (fetch_tx, fetch_rx) = mpsc::channel(16);
    let (ui_tx, mut ui_rx) = mpsc::channel(64);
    let app = App::new(
        Arc::new(client(format!("http://{addr}"))),
        Arc::new(FixedClock(2025)),
        AppOptions::default(),
        fetch_tx,
    );
    let handle = tokio::spawn(app::run(cmd_rx, fetch_rx, ui_tx, app));

    let view = wait_for(&mut ui_rx, |v| {
        matches!(v.teams, courtside_app::state::Loadable::Failed(_))
    })
    .await;
    assert_eq!(view.phase(), Phase::Idle);
    assert_eq!(view.stats, StatsView::Idle);

    cmd_tx.send(UserCommand::Quit).await.unwrap();
    assert!(handle.await.unwrap().is_ok());
}

// ===========================================================================
// Pass-through server
// ===========================================================================

#[tokio::test]
async fn server_proxies_scripted_upstream() {
    let base = start_upstream().await;
    let ctx = Arc::new(ServerContext {
        provider: Arc::new(client(base)),
        clock: Arc::new(FixedClock(2025)),
        options: ServerOptions::default(),
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(server::serve(listener, ctx));
    let http = reqwest::Client::new();

    let team: Value = http
        .get(format!("http://{addr}/api/team/14"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    // Pass-through is unfiltered.
    assert_eq!(team.as_array().unwrap().len(), 3);

    let player: Value = http
        .get(format!("http://{addr}/api/player/237"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(player["player"]["first_name"], "LeBron");
    assert_eq!(player["seasonAverages"]["pts"], 27.4);

    let snapshot: Value = http
        .get(format!("http://{addr}/api/player/900/snapshot"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(snapshot["status"], "found");
    assert_eq!(snapshot["snapshot"]["source"], "recent_10_games");
    assert_eq!(snapshot["snapshot"]["pts"], 22.8);

    let missing = http
        .get(format!("http://{addr}/api/player/5"))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);
    let body: Value = missing.json().await.unwrap();
    assert!(body["error"].is_string());

    server.abort();
}
