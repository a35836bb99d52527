use std::sync::Arc;

use clap::Parser;

mod cli;
mod commands;
mod controller;
mod events;
mod logging;
mod profile;
mod progress;
mod sequence;
mod state;
mod ui;


use self::cli::Cli;
use self::controller::AppController;
use self::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init_tracing("info");

    let cli = Cli::parse();

    let mut config = profile::load_config(cli.config.as_deref())?;
    if let Some(store) = cli.store.clone() {
        config.store.path_override = Some(store);
    }

    let state = Arc::new(AppState::new(config.clone())?);
    let controller = AppController::new(state.clone(), &config);
    let tasks = controller.spawn_tasks();

    let result = tokio::select! {
        result = run_front(cli.command, &controller, &state, &config) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
            Ok(())
        }
    };

    controller.shutdown(tasks).await;

    result
}

/// One subcommand, or the console when none was given
async fn run_front(
    command: Option<cli::Command>,
    controller: &AppController,
    state: &AppState,
    config: &psalo_config::Config,
) -> anyhow::Result<()> {
    let channels = controller.ui_channels();

    match command {
        Some(command) => commands::run_command(command, &channels, config).await,
        None => ui::ui_loop(channels, state.config.clone()).await,
    }
}
