use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use kanal::AsyncSender;
use psalo_fetch::{EnsureOutcome, ensure_asset, progress_channel};
use psalo_types::{AppEvent, StoreStatus};
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

pub async fn handle_store_status(
    state: Arc<AppState>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let status = StoreStatus {
        needs_setup: !state.store.is_ready(),
    };
    app_to_ui_tx.send(AppEvent::StoreStatus(status)).await?;
    Ok(())
}

pub async fn handle_store_path(
    state: Arc<AppState>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let path = std::path::absolute(state.store.path())?;
    app_to_ui_tx
        .send(AppEvent::StorePath(path.display().to_string()))
        .await?;
    Ok(())
}

/// Clears the running flag however the download ends
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Download the store if it is missing, forwarding progress to the UI.
///
/// The outcome is reported as `FetchFinished`; only a rejected request
/// (another download already running) surfaces as an error.
pub async fn handle_fetch_store(
    state: Arc<AppState>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    if state.fetch_running.swap(true, Ordering::SeqCst) {
        anyhow::bail!("A store download is already running");
    }
    let running = RunningGuard(&state.fetch_running);

    let (url, capacity) = {
        let config = state.config.read().await;
        (config.store.url.clone(), config.fetch.progress_capacity)
    };

    // The file may be replaced underneath an open handle
    state.store.close().await;

    let (progress_tx, progress_rx) = progress_channel(capacity);
    let forward_tx = app_to_ui_tx.clone();
    let forward = tokio::spawn(async move {
        while let Ok(fraction) = progress_rx.recv().await {
            if forward_tx.send(AppEvent::FetchProgress(fraction)).await.is_err() {
                break;
            }
        }
    });

    let result = ensure_asset(
        &state.fetcher,
        &url,
        state.store.path(),
        Some(&progress_tx),
        &cancel,
    )
    .await;

    drop(progress_tx);
    let _ = forward.await;

    let finished = match result {
        Ok(EnsureOutcome::AlreadyPresent) => Ok(()),
        Ok(EnsureOutcome::Downloaded(outcome)) => {
            tracing::info!(
                "Store ready: {} bytes at {}",
                outcome.bytes_written,
                state.store.path().display()
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Store download failed: {}", e);
            Err(e.to_string())
        }
    };

    // A retry sent right after the result must not be rejected
    drop(running);
    app_to_ui_tx.send(AppEvent::FetchFinished(finished)).await?;

    Ok(())
}
