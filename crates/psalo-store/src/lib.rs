//! Read-only access to the dictionary store: lifecycle of the single
//! connection, paginated word search and per-word entry assembly.

pub mod entries;
pub mod error;
pub mod manager;
pub mod path;
pub mod query;
pub mod rows;

pub use entries::lookup;
pub use error::StoreError;
pub use manager::StoreManager;
pub use path::resolve_store_path;
pub use query::{build_pattern, search, total_pages};
