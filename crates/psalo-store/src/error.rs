use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store not found at {}", .0.display())]
    Unavailable(PathBuf),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The store file is malformed; never expected from a published asset
    #[error("Data integrity fault: {0}")]
    DataIntegrity(String),

    #[error("Invalid pagination: page {page}, limit {limit}")]
    InvalidPagination { page: u32, limit: u32 },
}
