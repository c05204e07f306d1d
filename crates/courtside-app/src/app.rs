// Orchestrator: turns user commands into fetch tasks and fetch results into
// view-state updates for the TUI.
//
// Runs a single `tokio::select!` loop and is the only writer of the view
// state. Each fetch runs in its own task; re-selecting aborts the previous
// task of the same kind, and the generation check in `Controller::apply`
// catches anything that finished before the abort landed.

use std::sync::Arc;

use courtside_core::config::Config;
use courtside_core::pipeline::{resolve_player_stats, PipelineOptions};
use courtside_core::provider::{Clock, StatsProvider};
use courtside_core::roster::{list_team_players, list_teams};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::protocol::{FetchEvent, UiUpdate, UserCommand};
use crate::state::{Controller, FetchRequest};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppOptions {
    pub current_teams_only: bool,
    pub roster_page_size: u32,
    /// Season for the first fallback tier; `None` uses the clock's year.
    pub season: Option<u16>,
    pub pipeline: PipelineOptions,
}

impl Default for AppOptions {
    fn default() -> Self {
        AppOptions {
            current_teams_only: true,
            roster_page_size: 100,
            season: None,
            pipeline: PipelineOptions::default(),
        }
    }
}

impl AppOptions {
    pub fn from_config(config: &Config, season: Option<u16>) -> Self {
        AppOptions {
            current_teams_only: config.fetch.current_teams_only,
            roster_page_size: config.fetch.roster_page_size,
            season,
            pipeline: PipelineOptions::from(&config.fetch),
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// In-flight fetch tasks, at most one of each kind.
#[derive(Default)]
struct Tasks {
    teams: Option<JoinHandle<()>>,
    roster: Option<JoinHandle<()>>,
    stats: Option<JoinHandle<()>>,
}

impl Tasks {
    fn abort_all(&mut self) {
        for handle in [self.teams.take(), self.roster.take(), self.stats.take()]
            .into_iter()
            .flatten()
        {
            handle.abort();
        }
    }
}

fn replace_task(slot: &mut Option<JoinHandle<()>>, handle: JoinHandle<()>) {
    if let Some(previous) = slot.replace(handle) {
        if !previous.is_finished() {
            debug!("aborting superseded fetch task");
        }
        previous.abort();
    }
}

/// Application state for the orchestrator loop.
pub struct App {
    provider: Arc<dyn StatsProvider>,
    clock: Arc<dyn Clock>,
    options: AppOptions,
    controller: Controller,
    fetch_tx: mpsc::Sender<FetchEvent>,
    tasks: Tasks,
}

impl App {
    /// `fetch_tx` is the sending half of the channel whose receiver is
    /// passed to [`run`].
    pub fn new(
        provider: Arc<dyn StatsProvider>,
        clock: Arc<dyn Clock>,
        options: AppOptions,
        fetch_tx: mpsc::Sender<FetchEvent>,
    ) -> Self {
        App {
            provider,
            clock,
            options,
            controller: Controller::new(),
            fetch_tx,
            tasks: Tasks::default(),
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Spawn the task for `request`, superseding any task of the same kind.
    fn start(&mut self, request: FetchRequest) {
        let provider = Arc::clone(&self.provider);
        let tx = self.fetch_tx.clone();

        match request {
            FetchRequest::Teams { generation } => {
                let current_only = self.options.current_teams_only;
                let handle = tokio::spawn(async move {
                    let result = list_teams(provider.as_ref(), current_only).await;
                    let _ = tx.send(FetchEvent::Teams { generation, result }).await;
                });
                replace_task(&mut self.tasks.teams, handle);
            }
            FetchRequest::Roster { generation, team } => {
                let per_page = self.options.roster_page_size;
                let handle = tokio::spawn(async move {
                    let result = list_team_players(provider.as_ref(), team, per_page).await;
                    let _ = tx
                        .send(FetchEvent::Roster {
                            generation,
                            team,
                            result,
                        })
                        .await;
                });
                replace_task(&mut self.tasks.roster, handle);
                // A new roster means any stats fetch is for a player no
                // longer on screen.
                if let Some(stats) = self.tasks.stats.take() {
                    stats.abort();
                }
            }
            FetchRequest::Stats { generation, player } => {
                let clock = Arc::clone(&self.clock);
                let season = self.options.season;
                let options = self.options.pipeline;
                let handle = tokio::spawn(async move {
                    let result = resolve_player_stats(
                        provider.as_ref(),
                        player,
                        season,
                        clock.as_ref(),
                        options,
                    )
                    .await;
                    let _ = tx
                        .send(FetchEvent::Stats {
                            generation,
                            player,
                            result,
                        })
                        .await;
                });
                replace_task(&mut self.tasks.stats, handle);
            }
        }
    }

    fn load_teams(&mut self) {
        let request = self.controller.load_teams();
        self.start(request);
    }

    /// Apply a command. Returns `true` when the view changed.
    fn handle_command(&mut self, cmd: UserCommand) -> bool {
        let request = match cmd {
            UserCommand::SelectTeam(team) => {
                info!(%team, "team selected");
                self.controller.select_team(team)
            }
            UserCommand::SelectPlayer(player) => {
                info!(%player, "player selected");
                self.controller.select_player(player)
            }
            UserCommand::ReloadTeams => {
                info!("reloading teams");
                Ok(self.controller.load_teams())
            }
            UserCommand::Quit => return false,
        };

        match request {
            Ok(request) => {
                self.start(request);
                true
            }
            Err(e) => {
                warn!("ignoring selection: {e}");
                false
            }
        }
    }

    fn handle_fetch(&mut self, event: FetchEvent) -> bool {
        self.controller.apply(event)
    }

    async fn push_state(&self, ui_tx: &mpsc::Sender<UiUpdate>) {
        let view = self.controller.view().clone();
        let _ = ui_tx.send(UiUpdate::State(Box::new(view))).await;
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the orchestrator until `Quit` arrives or the command channel closes.
///
/// Loads the team list on entry and pushes a full [`UiUpdate::State`] after
/// every change.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut fetch_rx: mpsc::Receiver<FetchEvent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut app: App,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    app.load_teams();
    app.push_state(&ui_tx).await;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        if app.handle_command(cmd) {
                            app.push_state(&ui_tx).await;
                        }
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            event = fetch_rx.recv() => {
                // `app` holds a sender, so this channel never closes while
                // the loop runs.
                if let Some(event) = event {
                    if app.handle_fetch(event) {
                        app.push_state(&ui_tx).await;
                    }
                }
            }
        }
    }

    app.tasks.abort_all();
    info!("Application event loop exiting");
    Ok(())
}
