use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use kanal::AsyncSender;
use psalo_types::AppEvent;

use crate::state::AppState;

/// Folder to show for a store at `path`.
///
/// Always the containing folder, never the file itself.
fn location_target(path: &Path) -> anyhow::Result<PathBuf> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .with_context(|| format!("{} has no containing folder", path.display()))?;

    if !dir.is_dir() {
        anyhow::bail!("{} does not exist yet", dir.display());
    }

    Ok(dir.to_path_buf())
}

/// Open the folder holding the store in the host's file browser.
/// Works before setup too, as long as the folder exists.
pub async fn handle_open_location(
    state: Arc<AppState>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let dir = location_target(state.store.path())?;

    tracing::info!("Opening {}", dir.display());
    let shown = dir.display().to_string();
    tokio::task::spawn_blocking(move || open::that(&dir))
        .await?
        .context("Failed to open file browser")?;

    app_to_ui_tx.send(AppEvent::LocationOpened(shown)).await?;

    Ok(())
}
