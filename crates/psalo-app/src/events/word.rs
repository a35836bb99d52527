use std::sync::Arc;

use kanal::AsyncSender;
use psalo_types::AppEvent;

use crate::state::AppState;

pub async fn handle_get_word(
    state: Arc<AppState>,
    word: String,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let result = state.store.lookup(&word).await?;

    if result.is_none() {
        tracing::debug!("No entries for '{}'", word);
    }

    app_to_ui_tx.send(AppEvent::Word { word, result }).await?;

    Ok(())
}
