use std::sync::Arc;
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use psalo_types::{ApiRequest, AppEvent};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

pub mod location;
pub mod search;
pub mod setup;
pub mod word;

use location::handle_open_location;
use search::handle_search;
use setup::{handle_fetch_store, handle_store_path, handle_store_status};
use word::handle_get_word;

/// How long in-flight requests get to finish after shutdown is requested
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// App's main loop.
///
/// Each request runs on its own task so a download never holds up searches.
/// Returns when the UI side hangs up or `cancel` fires.
pub async fn event_loop(
    state: Arc<AppState>,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let mut in_flight = JoinSet::new();

    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = ui_to_app_rx.recv() => match event {
                Ok(event) => event,
                Err(_) => {
                    tracing::info!("[EVENT_LOOP] UI channel closed");
                    break;
                }
            },
        };

        while in_flight.try_join_next().is_some() {}

        match event {
            AppEvent::ApiRequest(request) => {
                tracing::debug!("[EVENT_LOOP] Request: {}", request.name());
                in_flight.spawn(handle_request(
                    state.clone(),
                    request,
                    app_to_ui_tx.clone(),
                    cancel.child_token(),
                ));
            }
            other => {
                tracing::debug!(
                    "[EVENT_LOOP] Ignoring UI-bound event {:?}",
                    std::mem::discriminant(&other)
                );
            }
        }
    }

    cancel.cancel();
    drain(&mut in_flight).await;

    Ok(())
}

/// Let cancelled requests finish their cleanup, then abort stragglers
async fn drain(in_flight: &mut JoinSet<()>) {
    let finished = tokio::time::timeout(DRAIN_TIMEOUT, async {
        while in_flight.join_next().await.is_some() {}
    })
    .await;

    if finished.is_err() {
        tracing::warn!("[EVENT_LOOP] Aborting {} unfinished requests", in_flight.len());
        in_flight.abort_all();
    }
}

async fn handle_request(
    state: Arc<AppState>,
    request: ApiRequest,
    app_to_ui_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) {
    let name = request.name();

    let result = match request {
        ApiRequest::Search(request) => handle_search(state, request, &app_to_ui_tx).await,
        ApiRequest::GetWord(word) => handle_get_word(state, word, &app_to_ui_tx).await,
        ApiRequest::StoreStatus => handle_store_status(state, &app_to_ui_tx).await,
        ApiRequest::StorePath => handle_store_path(state, &app_to_ui_tx).await,
        ApiRequest::FetchStore => handle_fetch_store(state, &app_to_ui_tx, cancel).await,
        ApiRequest::OpenStoreLocation => handle_open_location(state, &app_to_ui_tx).await,
    };

    if let Err(e) = result {
        tracing::warn!("{} failed: {:#}", name, e);
        let _ = app_to_ui_tx
            .send(AppEvent::RequestFailed {
                request: name,
                message: format!("{e:#}"),
            })
            .await;
    }
}
