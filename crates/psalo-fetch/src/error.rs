#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Too many redirects (limit {limit})")]
    TooManyRedirects { limit: u32 },

    #[error("HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("Redirect {status} without a Location header")]
    MissingLocation { status: u16 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No data received for {secs}s")]
    Stalled { secs: u64 },

    #[error("Download cancelled")]
    Cancelled,

    #[error("Fetch task failed: {0}")]
    Task(String),
}
