use std::path::PathBuf;

use serde_json::json;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Connection, SqliteConnection};
use tempfile::TempDir;

/// Words under the "к" prefix used for pagination checks
pub const PAGED_WORDS: [&str; 7] = ["ка", "кб", "кв", "кг", "кд", "ке", "кж"];

pub struct Fixture {
    // Keeps the directory alive for the test's duration
    _dir: TempDir,
    pub path: PathBuf,
}

/// Build a small store the way the published asset is laid out
pub async fn build_store() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dictionary.db");

    let options = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true);
    let mut conn = SqliteConnection::connect_with(&options).await.unwrap();

    sqlx::query(
        "CREATE TABLE dictionaries (id INTEGER PRIMARY KEY, title TEXT NOT NULL, from_lang TEXT NOT NULL, to_lang TEXT NOT NULL)",
    )
    .execute(&mut conn)
    .await
    .unwrap();
    sqlx::query("CREATE TABLE words (word TEXT PRIMARY KEY, entries TEXT NOT NULL)")
        .execute(&mut conn)
        .await
        .unwrap();

    for (id, title, from, to) in [
        (1, "Adyghe-Russian", "Ady", "Ru"),
        (7, "Kabardian-English", "Kbd", "En"),
        (9, "Adyghe-Turkish", "Ady", "Tr"),
    ] {
        sqlx::query("INSERT INTO dictionaries (id, title, from_lang, to_lang) VALUES (?, ?, ?, ?)")
            .bind(id)
            .bind(title)
            .bind(from)
            .bind(to)
            .execute(&mut conn)
            .await
            .unwrap();
    }

    let mut words = vec![
        (
            "адыгэ",
            json!([
                {"id": 1, "html": "&lt;b&gt;Circassian&lt;/b&gt;"},
                {"id": 7, "html": "people"}
            ])
            .to_string(),
        ),
        (
            "псы",
            json!([
                {"id": 7, "html": "&lt;i&gt;water&lt;/i&gt;"},
                {"id": 7, "html": "&amp;lt;raw&amp;gt;"},
                {"id": 7, "html": "it&#39;s wet"}
            ])
            .to_string(),
        ),
        ("псыхъуэ", json!([{"id": 1, "html": "river"}]).to_string()),
        ("100%", json!([{"id": 1, "html": "percent"}]).to_string()),
        ("1000", json!([{"id": 1, "html": "thousand"}]).to_string()),
        ("100x", json!([{"id": 1, "html": "x"}]).to_string()),
        ("a_b", json!([{"id": 9, "html": "underscore"}]).to_string()),
        ("axb", json!([{"id": 9, "html": "letter"}]).to_string()),
        ("a\\b", json!([{"id": 9, "html": "backslash"}]).to_string()),
        ("orphan", json!([{"id": 1, "html": "ok"}, {"id": 42, "html": "lost"}]).to_string()),
        ("garbled", "not json".to_string()),
    ];
    for word in PAGED_WORDS {
        words.push((word, json!([{"id": 1, "html": word}]).to_string()));
    }

    for (word, entries) in words {
        sqlx::query("INSERT INTO words (word, entries) VALUES (?, ?)")
            .bind(word)
            .bind(entries)
            .execute(&mut conn)
            .await
            .unwrap();
    }

    conn.close().await.unwrap();

    Fixture { _dir: dir, path }
}
