use std::collections::{HashMap, HashSet};

use psalo_core::decode_entities;
use psalo_types::{Dictionary, WordEntry, WordWithEntries};
use sqlx::SqlitePool;

use crate::error::StoreError;
use crate::manager::StoreManager;
use crate::rows::{DictionaryRow, RawEntry, WordRow, parse_entries};

const WORD_SQL: &str = "SELECT word, entries FROM words WHERE word = ?";

/// Load a word with every dictionary's entry for it.
///
/// `word` must be the exact stored key. A missing word is `Ok(None)`.
/// Dictionary metadata is fetched once per distinct id, in a single query.
pub async fn lookup(store: &StoreManager, word: &str) -> Result<Option<WordWithEntries>, StoreError> {
    let pool = store.connection().await?;

    let row = sqlx::query_as::<_, WordRow>(WORD_SQL)
        .bind(word)
        .fetch_optional(&pool)
        .await?;

    let Some(row) = row else {
        tracing::debug!("lookup {:?}: not found", word);
        return Ok(None);
    };

    let result = assemble_row(&pool, row).await;
    if let Err(StoreError::DataIntegrity(reason)) = &result {
        tracing::error!("lookup {:?}: data integrity fault: {}", word, reason);
    }

    result.map(Some)
}

async fn assemble_row(pool: &SqlitePool, row: WordRow) -> Result<WordWithEntries, StoreError> {
    let entries = parse_entries(&row.entries)?;
    let ids = unique_dictionary_ids(&entries);
    let dictionaries = fetch_dictionaries(pool, &ids).await?;

    assemble(row.word, entries, &dictionaries)
}

/// Distinct dictionary ids in first-seen order
fn unique_dictionary_ids(entries: &[RawEntry]) -> Vec<i64> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .map(|e| e.id)
        .filter(|id| seen.insert(*id))
        .collect()
}

async fn fetch_dictionaries(
    pool: &SqlitePool,
    ids: &[i64],
) -> Result<HashMap<i64, Dictionary>, StoreError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        "SELECT id, title, from_lang, to_lang FROM dictionaries WHERE id IN ({placeholders})"
    );

    let mut query = sqlx::query_as::<_, DictionaryRow>(&sql);
    for id in ids {
        query = query.bind(*id);
    }

    let rows = query.fetch_all(pool).await?;

    Ok(rows
        .into_iter()
        .map(|row| (row.id, Dictionary::from(row)))
        .collect())
}

fn assemble(
    word: String,
    entries: Vec<RawEntry>,
    dictionaries: &HashMap<i64, Dictionary>,
) -> Result<WordWithEntries, StoreError> {
    let entries = entries
        .into_iter()
        .map(|entry| {
            let dictionary = dictionaries.get(&entry.id).cloned().ok_or_else(|| {
                StoreError::DataIntegrity(format!(
                    "entry references unknown dictionary {}",
                    entry.id
                ))
            })?;

            Ok(WordEntry {
                id: entry.id,
                html: decode_entities(&entry.html),
                dictionary,
            })
        })
        .collect::<Result<Vec<_>, StoreError>>()?;

    Ok(WordWithEntries { word, entries })
}

impl StoreManager {
    pub async fn lookup(&self, word: &str) -> Result<Option<WordWithEntries>, StoreError> {
        lookup(self, word).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: i64, html: &str) -> RawEntry {
        RawEntry {
            id,
            html: html.to_string(),
        }
    }

    fn dictionary(id: i64) -> Dictionary {
        Dictionary {
            id,
            title: format!("Dictionary {id}"),
            from_lang: "Ady".to_string(),
            to_lang: "Ru".to_string(),
        }
    }

    #[test]
    fn unique_ids_keep_first_seen_order() {
        let entries = vec![raw(7, ""), raw(1, ""), raw(7, ""), raw(3, ""), raw(1, "")];
        assert_eq!(unique_dictionary_ids(&entries), vec![7, 1, 3]);
    }

    #[test]
    fn assemble_joins_and_decodes_each_entry() {
        let dictionaries = HashMap::from([(7, dictionary(7))]);
        let entries = vec![raw(7, "&lt;b&gt;a&lt;/b&gt;"), raw(7, "&amp;lt;"), raw(7, "plain")];

        let word = assemble("псы".to_string(), entries, &dictionaries).unwrap();

        assert_eq!(word.entries.len(), 3);
        assert!(word.entries.iter().all(|e| e.dictionary == dictionary(7)));
        assert_eq!(word.entries[0].html, "<b>a</b>");
        assert_eq!(word.entries[1].html, "&lt;");
        assert_eq!(word.entries[2].html, "plain");
    }

    #[test]
    fn assemble_fails_on_unknown_dictionary() {
        let dictionaries = HashMap::from([(1, dictionary(1))]);
        let entries = vec![raw(1, "ok"), raw(42, "orphan")];

        let err = assemble("x".to_string(), entries, &dictionaries).unwrap_err();
        assert!(matches!(err, StoreError::DataIntegrity(ref m) if m.contains("42")));
    }
}
