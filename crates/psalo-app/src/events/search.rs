use std::sync::Arc;

use kanal::AsyncSender;
use psalo_types::{AppEvent, SearchRequest};

use crate::state::AppState;

pub async fn handle_search(
    state: Arc<AppState>,
    request: SearchRequest,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let page = state
        .store
        .search(&request.query, request.mode, request.page, request.limit)
        .await?;

    tracing::debug!(
        "Search #{} '{}': {} results, page {}/{}",
        request.seq,
        request.query,
        page.data.len(),
        page.page,
        page.total_pages
    );

    app_to_ui_tx
        .send(AppEvent::SearchResults {
            seq: request.seq,
            page,
        })
        .await?;

    Ok(())
}
