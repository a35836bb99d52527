//! First-run acquisition of the dictionary store.
//!
//! The body is streamed to `<dest><suffix>` and renamed into place only once
//! complete, so a reader checking `dest` sees either nothing or the whole file.

mod error;
mod fetcher;
mod progress;

pub use error::FetchError;
pub use fetcher::{AssetFetcher, EnsureOutcome, FetchHandle, FetchOutcome, ensure_asset};
pub use progress::{ProgressSender, progress_channel};
