use std::io::Write;

use anyhow::Context;
use psalo_config::Config;
use psalo_core::{QueryGate, gate_query, normalize_query};
use psalo_types::{ApiRequest, AppEvent, SearchRequest};

use crate::cli::Command;
use crate::controller::UiChannels;
use crate::progress::ProgressReporter;

/// Send one request and wait for the event `pick` accepts.
///
/// A `RequestFailed` for the same request becomes an error.
pub async fn request<T>(
    channels: &UiChannels,
    request: ApiRequest,
    mut pick: impl FnMut(AppEvent) -> Option<T>,
) -> anyhow::Result<T> {
    let name = request.name();
    channels
        .ui_to_app_tx
        .send(AppEvent::ApiRequest(request))
        .await
        .context("Backend is not running")?;

    loop {
        let event = channels
            .app_to_ui_rx
            .recv()
            .await
            .context("Backend hung up")?;

        match event {
            AppEvent::RequestFailed { request, message } if request == name => {
                anyhow::bail!("{message}");
            }
            other => {
                if let Some(value) = pick(other) {
                    return Ok(value);
                }
            }
        }
    }
}

/// Prepare user input for the search request, or explain why not
pub fn prepare_query(
    input: &str,
    mode: psalo_types::SearchMode,
    config: &Config,
) -> anyhow::Result<String> {
    let query = normalize_query(input.trim());

    match gate_query(&query, mode, config.search.min_contains_chars) {
        QueryGate::Empty => anyhow::bail!("Nothing to search for"),
        QueryGate::TooShort { min } => {
            anyhow::bail!("Contains search needs at least {min} characters")
        }
        QueryGate::Ready => Ok(query),
    }
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

/// Run a single subcommand against the event loop and print its result
pub async fn run_command(
    command: Command,
    channels: &UiChannels,
    config: &Config,
) -> anyhow::Result<()> {
    match command {
        Command::Search {
            query,
            mode,
            page,
            limit,
        } => {
            let mode = mode.into();
            let query = prepare_query(&query, mode, config)?;
            let search = SearchRequest {
                seq: 1,
                query,
                mode,
                page,
                limit: limit.unwrap_or(config.search.page_size),
            };

            let page = request(channels, ApiRequest::Search(search), |event| match event {
                AppEvent::SearchResults { page, .. } => Some(page),
                _ => None,
            })
            .await?;

            print_json(&page)
        }
        Command::Word { word } => {
            let key = normalize_query(word.trim());
            let result = request(channels, ApiRequest::GetWord(key), |event| match event {
                AppEvent::Word { result, .. } => Some(result),
                _ => None,
            })
            .await?;

            match result {
                Some(word) => print_json(&word),
                None => anyhow::bail!("No entries for '{}'", word.trim()),
            }
        }
        Command::Status => {
            let status = request(channels, ApiRequest::StoreStatus, |event| match event {
                AppEvent::StoreStatus(status) => Some(status),
                _ => None,
            })
            .await?;

            print_json(&status)
        }
        Command::Path => {
            let path = request(channels, ApiRequest::StorePath, |event| match event {
                AppEvent::StorePath(path) => Some(path),
                _ => None,
            })
            .await?;

            println!("{path}");
            Ok(())
        }
        Command::Fetch => {
            let mut reporter = ProgressReporter::default();
            let finished = request(channels, ApiRequest::FetchStore, |event| match event {
                AppEvent::FetchProgress(fraction) => {
                    if let Some(percent) = reporter.update(fraction) {
                        eprintln!("Downloading: {percent}%");
                    }
                    None
                }
                AppEvent::FetchFinished(result) => Some(result),
                _ => None,
            })
            .await?;

            finished.map_err(|e| anyhow::anyhow!("Download failed: {e}"))?;
            eprintln!("Store is ready");
            Ok(())
        }
        Command::Open => {
            let dir = request(channels, ApiRequest::OpenStoreLocation, |event| match event {
                AppEvent::LocationOpened(dir) => Some(dir),
                _ => None,
            })
            .await?;

            eprintln!("Opened {dir}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use psalo_types::SearchMode;

    #[test]
    fn queries_are_normalized_and_gated() {
        let config = Config::default();

        assert_eq!(
            prepare_query("  ӀЭ ", SearchMode::StartsWith, &config).unwrap(),
            "1э"
        );
        assert!(prepare_query("   ", SearchMode::StartsWith, &config).is_err());
        assert!(prepare_query("пс", SearchMode::Contains, &config).is_err());
        assert_eq!(
            prepare_query("псы", SearchMode::Contains, &config).unwrap(),
            "псы"
        );
    }
}
