use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use kanal::AsyncReceiver;
use psalo_config::fetch::FetchConfig;
use reqwest::StatusCode;
use reqwest::header::LOCATION;
use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::FetchError;
use crate::progress::{ProgressSender, progress_channel};

#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub bytes_written: u64,
    /// URL the body was finally served from, after redirects
    pub final_url: Url,
}

#[derive(Debug, Clone)]
pub enum EnsureOutcome {
    AlreadyPresent,
    Downloaded(FetchOutcome),
}

/// A transfer running on its own task.
///
/// `progress` yields fractions in `[0, 1]` while the body streams (only when
/// the server announced a length) and closes when the transfer ends.
pub struct FetchHandle {
    pub progress: AsyncReceiver<f64>,
    task: JoinHandle<Result<FetchOutcome, FetchError>>,
}

impl FetchHandle {
    pub async fn join(self) -> Result<FetchOutcome, FetchError> {
        self.task
            .await
            .map_err(|e| FetchError::Task(e.to_string()))?
    }
}

#[derive(Clone)]
pub struct AssetFetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl AssetFetcher {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        // Redirects are followed by hand to enforce the hop limit
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client, config })
    }

    /// Path the body is streamed to before the final rename
    pub fn temp_path(&self, dest: &Path) -> PathBuf {
        let mut name = OsString::from(dest.as_os_str());
        name.push(&self.config.temp_suffix);
        PathBuf::from(name)
    }

    /// Download `url` to `dest`.
    ///
    /// On any failure, including cancellation, the temporary file is removed
    /// and `dest` is left untouched. Cancellation is observed until the body
    /// is on disk; the final rename always runs to completion.
    pub async fn fetch(
        &self,
        url: &str,
        dest: &Path,
        progress: Option<&ProgressSender>,
        cancel: &CancellationToken,
    ) -> Result<FetchOutcome, FetchError> {
        let url = Url::parse(url)?;
        let temp = self.temp_path(dest);

        tracing::info!("Fetching {} -> {}", url, dest.display());

        let transferred = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            result = self.transfer(url, dest, &temp, progress) => result,
        };

        let result = match transferred {
            Ok(outcome) => fs::rename(&temp, dest)
                .await
                .map(|()| outcome)
                .map_err(FetchError::from),
            Err(e) => Err(e),
        };

        match &result {
            Ok(outcome) => {
                tracing::info!(
                    "Fetched {} bytes from {}",
                    outcome.bytes_written,
                    outcome.final_url
                );
            }
            Err(e) => {
                tracing::warn!("Fetch failed: {}", e);
                remove_temp(&temp).await;
            }
        }

        result
    }

    /// Run [`fetch`](Self::fetch) on a new task with a progress channel
    pub fn spawn(&self, url: String, dest: PathBuf, cancel: CancellationToken) -> FetchHandle {
        let (tx, rx) = progress_channel(self.config.progress_capacity);
        let fetcher = self.clone();

        let task = tokio::spawn(async move {
            // tx drops with this task, closing the progress sequence
            fetcher.fetch(&url, &dest, Some(&tx), &cancel).await
        });

        FetchHandle { progress: rx, task }
    }

    async fn transfer(
        &self,
        url: Url,
        dest: &Path,
        temp: &Path,
        progress: Option<&ProgressSender>,
    ) -> Result<FetchOutcome, FetchError> {
        let (response, final_url) = self.follow_redirects(url).await?;
        let total = response.content_length().filter(|len| *len > 0);

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut writer = BufWriter::new(File::create(temp).await?);
        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;
        let mut last_fraction = 0.0;

        loop {
            let next = tokio::time::timeout(self.config.stall_timeout(), stream.next())
                .await
                .map_err(|_| FetchError::Stalled {
                    secs: self.config.stall_timeout_secs,
                })?;

            let Some(chunk) = next else {
                break;
            };
            let chunk = chunk?;

            // The next chunk is not pulled until this one is written
            writer.write_all(&chunk).await?;
            written += chunk.len() as u64;

            if let (Some(total), Some(tx)) = (total, progress) {
                let fraction = (written as f64 / total as f64).clamp(last_fraction, 1.0);
                last_fraction = fraction;
                tx.report(fraction);
            }
        }

        writer.flush().await?;
        writer.into_inner().sync_all().await?;

        Ok(FetchOutcome {
            bytes_written: written,
            final_url,
        })
    }

    async fn follow_redirects(&self, url: Url) -> Result<(reqwest::Response, Url), FetchError> {
        let mut current = url;
        let mut hops: u32 = 0;

        loop {
            let response = self.client.get(current.clone()).send().await?;
            let status = response.status();

            if is_followed_redirect(status) {
                if hops >= self.config.max_redirects {
                    return Err(FetchError::TooManyRedirects {
                        limit: self.config.max_redirects,
                    });
                }

                let location = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .ok_or(FetchError::MissingLocation {
                        status: status.as_u16(),
                    })?;

                // Relative locations resolve against the redirecting URL
                let next = current.join(location)?;
                tracing::debug!("Redirect {} {} -> {}", status.as_u16(), current, next);

                hops += 1;
                current = next;
                continue;
            }

            if !status.is_success() {
                return Err(FetchError::HttpStatus {
                    status: status.as_u16(),
                });
            }

            return Ok((response, current));
        }
    }
}

fn is_followed_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

async fn remove_temp(temp: &Path) {
    match fs::remove_file(temp).await {
        Ok(()) => tracing::debug!("Removed partial download {}", temp.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("Failed to remove {}: {}", temp.display(), e),
    }
}

/// Fetch `url` to `dest` unless `dest` already exists.
pub async fn ensure_asset(
    fetcher: &AssetFetcher,
    url: &str,
    dest: &Path,
    progress: Option<&ProgressSender>,
    cancel: &CancellationToken,
) -> Result<EnsureOutcome, FetchError> {
    if dest.exists() {
        tracing::info!("{} already present, skipping download", dest.display());
        return Ok(EnsureOutcome::AlreadyPresent);
    }

    fetcher
        .fetch(url, dest, progress, cancel)
        .await
        .map(EnsureOutcome::Downloaded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_path_appends_suffix() {
        let fetcher = AssetFetcher::new(FetchConfig::default()).unwrap();
        assert_eq!(
            fetcher.temp_path(Path::new("/data/dictionary.db")),
            Path::new("/data/dictionary.db.tmp")
        );
    }

    #[test]
    fn only_location_redirects_are_followed() {
        assert!(is_followed_redirect(StatusCode::FOUND));
        assert!(is_followed_redirect(StatusCode::PERMANENT_REDIRECT));
        assert!(!is_followed_redirect(StatusCode::NOT_MODIFIED));
        assert!(!is_followed_redirect(StatusCode::MULTIPLE_CHOICES));
        assert!(!is_followed_redirect(StatusCode::OK));
    }
}
