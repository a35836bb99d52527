use std::sync::Arc;
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use psalo_config::Config;
use psalo_types::AppEvent;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::event_loop;
use crate::state::AppState;

/// Upper bound on waiting for background tasks at shutdown
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Centralized channel management
pub struct ChannelSet {
    pub app_to_ui: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub ui_to_app: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new(config: &Config) -> Self {
        Self {
            // Download progress bursts
            app_to_ui: kanal::bounded_async(config.app_channel_capacity.max(1)),
            ui_to_app: kanal::bounded_async(config.ui_channel_capacity.max(1)),
        }
    }
}

/// The UI's ends of the channel pair
pub struct UiChannels {
    pub app_to_ui_rx: AsyncReceiver<AppEvent>,
    pub ui_to_app_tx: AsyncSender<AppEvent>,
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>, config: &Config) -> Self {
        Self {
            channels: ChannelSet::new(config),
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn spawn_tasks(&self) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        tasks.spawn(event_loop(
            self.state.clone(),
            self.channels.ui_to_app.1.clone(),
            self.channels.app_to_ui.0.clone(),
            self.cancel_token.child_token(),
        ));

        tasks
    }

    pub fn ui_channels(&self) -> UiChannels {
        UiChannels {
            app_to_ui_rx: self.channels.app_to_ui.1.clone(),
            ui_to_app_tx: self.channels.ui_to_app.0.clone(),
        }
    }

    /// Stop background work and release the store.
    ///
    /// Running downloads observe the cancellation and clean up their
    /// temporary files before the event loop returns.
    pub async fn shutdown(&self, mut tasks: JoinSet<anyhow::Result<()>>) {
        self.cancel_token.cancel();

        let joined = tokio::time::timeout(SHUTDOWN_TIMEOUT, async {
            while let Some(result) = tasks.join_next().await {
                match result {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => tracing::error!("Task exited with error: {e:#}"),
                    Err(e) => tracing::error!("Task panicked: {e}"),
                }
            }
        })
        .await;

        if joined.is_err() {
            tracing::warn!("Timed out waiting for tasks, aborting");
            tasks.abort_all();
        }

        self.state.store.close().await;
        tracing::info!("Shutdown complete");
    }
}
