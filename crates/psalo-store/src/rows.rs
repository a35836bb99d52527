//! Record types at the store boundary. Rows are decoded into these before
//! anything else sees them.

use psalo_types::Dictionary;
use serde::Deserialize;

use crate::error::StoreError;

#[derive(Debug, sqlx::FromRow)]
pub struct WordRow {
    pub word: String,
    /// JSON array of [`RawEntry`]
    pub entries: String,
}

#[derive(Debug, sqlx::FromRow)]
pub struct DictionaryRow {
    pub id: i64,
    pub title: String,
    pub from_lang: String,
    pub to_lang: String,
}

impl From<DictionaryRow> for Dictionary {
    fn from(row: DictionaryRow) -> Self {
        Dictionary {
            id: row.id,
            title: row.title,
            from_lang: row.from_lang,
            to_lang: row.to_lang,
        }
    }
}

/// One stored entry: owning dictionary id and entity-encoded markup
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawEntry {
    pub id: i64,
    pub html: String,
}

/// Decode a word's serialized entry list
pub fn parse_entries(raw: &str) -> Result<Vec<RawEntry>, StoreError> {
    serde_json::from_str(raw)
        .map_err(|e| StoreError::DataIntegrity(format!("malformed entry list: {e}")))
}
