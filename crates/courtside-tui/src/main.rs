// Courtside entry point.
//
// Startup sequence:
// 1. Parse arguments
// 2. Initialize tracing (file for the TUI, stderr otherwise)
// 3. Load config (copying defaults on first run)
// 4. Build the balldontlie client
// 5. Dispatch: dashboard, pass-through server, or static export

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use courtside_app::app::{self, App, AppOptions};
use courtside_app::server::{self, ServerContext, ServerOptions};
use courtside_core::config::{self, Config};
use courtside_core::export::{run_export, ExportOptions};
use courtside_core::provider::SystemClock;
use courtside_core::BallDontLieClient;
use courtside_tui::cli::{Cli, Command};
use courtside_tui::tui;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command();

    // The dashboard owns the terminal, so its logs go to a file.
    init_tracing(command == Command::Tui)?;
    info!("Courtside starting up");

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: api={}, key configured={}",
        config.api.base_url,
        config.credentials.api_key.is_some()
    );

    let client = BallDontLieClient::from_config(&config).context("failed to build HTTP client")?;

    match command {
        Command::Tui => run_dashboard(client, &config, cli.season).await,
        Command::Serve { port } => {
            let port = port.unwrap_or(config.server.port);
            let ctx = Arc::new(ServerContext {
                provider: Arc::new(client),
                clock: Arc::new(SystemClock),
                options: ServerOptions::from_config(&config, cli.season),
            });
            info!("Serving on http://127.0.0.1:{port}");
            server::run(port, ctx).await
        }
        Command::Export { out } => {
            let out_dir = out.unwrap_or_else(|| PathBuf::from(&config.export.output_dir));
            let summary = run_export(&client, &out_dir, &ExportOptions::from(&config.export))
                .await
                .with_context(|| format!("export to {} failed", out_dir.display()))?;
            info!(
                teams = summary.teams,
                players = summary.players,
                "export complete"
            );
            for file in &summary.files {
                println!("wrote {}", file.display());
            }
            Ok(())
        }
    }
}

async fn run_dashboard(
    client: BallDontLieClient,
    config: &Config,
    season: Option<u16>,
) -> anyhow::Result<()> {
    let (fetch_tx, fetch_rx) = mpsc::channel(64);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let app_state = App::new(
        Arc::new(client),
        Arc::new(SystemClock),
        AppOptions::from_config(config, season),
        fetch_tx,
    );

    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, fetch_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // Blocks until the user presses 'q' or Ctrl+C.
    if let Err(e) = tui::run(ui_rx, cmd_tx, season).await {
        error!("TUI error: {}", e);
    }

    let _ = tokio::time::timeout(Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("Courtside shut down cleanly");
    Ok(())
}

/// Log to `logs/courtside.log` when `to_file`, else to stderr.
fn init_tracing(to_file: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("courtside=info,warn"));

    if to_file {
        let log_dir = std::env::current_dir()?.join("logs");
        std::fs::create_dir_all(&log_dir)?;
        let log_file = std::fs::File::create(log_dir.join("courtside.log"))?;

        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(true)
            .with_line_number(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .context("failed to set tracing subscriber")?;
    } else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .context("failed to set tracing subscriber")?;
    }

    Ok(())
}
