// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Profile documents backed by SQLite.
//
// One row per uid holding the whole profile document as JSON. Writes replace
// the row wholesale; there is no field-level merge and no concurrency token,
// so the last writer wins.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cartao_bridge::DocumentStore;
use cartao_core::Uid;
use cartao_core::error::{CartaoError, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use tracing::{debug, info, instrument};

/// SQLite schema for the profiles table.
const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS profiles (
        uid TEXT PRIMARY KEY,
        document TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
"#;

const UPSERT_SQL: &str = r#"
    INSERT INTO profiles (uid, document, updated_at) VALUES (?1, ?2, ?3)
    ON CONFLICT(uid) DO UPDATE SET
        document = excluded.document,
        updated_at = excluded.updated_at
"#;

/// Synchronous profile table.
///
/// `rusqlite` has no async API; [`SqliteProfileStore`] moves calls onto the
/// blocking pool.
pub struct ProfileDb {
    conn: Connection,
}

impl ProfileDb {
    /// Open (or create) the profile database at `path`.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .map_err(|e| CartaoError::Database(format!("open: {e}")))?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| CartaoError::Database(format!("WAL pragma: {e}")))?;

        conn.execute_batch(CREATE_TABLE_SQL)
            .map_err(|e| CartaoError::Database(format!("create table: {e}")))?;

        info!("profile database opened");
        Ok(Self { conn })
    }

    /// Open an in-memory database (useful for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| CartaoError::Database(format!("open in-memory: {e}")))?;

        conn.execute_batch(CREATE_TABLE_SQL)
            .map_err(|e| CartaoError::Database(format!("create table: {e}")))?;

        debug!("in-memory profile database opened");
        Ok(Self { conn })
    }

    /// The stored document, or `None` when the uid has none.
    pub fn get(&self, uid: &Uid) -> Result<Option<Value>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT document FROM profiles WHERE uid = ?1",
                params![uid.as_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| CartaoError::DocumentRead(format!("query: {e}")))?;

        raw.map(|text| {
            serde_json::from_str(&text)
                .map_err(|e| CartaoError::DocumentRead(format!("corrupt document for {uid}: {e}")))
        })
        .transpose()
    }

    /// Replace the document for `uid`.
    #[instrument(skip(self, document), fields(uid = %uid))]
    pub fn upsert(&self, uid: &Uid, document: &Value) -> Result<()> {
        let text = serde_json::to_string(document)
            .map_err(|e| CartaoError::DocumentWrite(format!("serialize: {e}")))?;
        self.conn
            .execute(UPSERT_SQL, params![uid.as_str(), text, Utc::now().to_rfc3339()])
            .map_err(|e| CartaoError::DocumentWrite(format!("upsert: {e}")))?;
        debug!("profile document written");
        Ok(())
    }

    /// When the document for `uid` was last written.
    pub fn updated_at(&self, uid: &Uid) -> Result<Option<DateTime<Utc>>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT updated_at FROM profiles WHERE uid = ?1",
                params![uid.as_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| CartaoError::Database(format!("query: {e}")))?;

        raw.map(|text| {
            DateTime::parse_from_rfc3339(&text)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| CartaoError::Database(format!("bad timestamp: {e}")))
        })
        .transpose()
    }

    /// Every uid with a stored document, ordered.
    pub fn uids(&self) -> Result<Vec<Uid>> {
        let mut stmt = self
            .conn
            .prepare("SELECT uid FROM profiles ORDER BY uid")
            .map_err(|e| CartaoError::Database(format!("prepare: {e}")))?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| CartaoError::Database(format!("query: {e}")))?;

        let mut uids = Vec::new();
        for row in rows {
            let uid = row.map_err(|e| CartaoError::Database(format!("row: {e}")))?;
            uids.push(Uid::new(uid));
        }
        Ok(uids)
    }
}

/// [`DocumentStore`] over a shared [`ProfileDb`].
#[derive(Clone)]
pub struct SqliteProfileStore {
    db: Arc<Mutex<ProfileDb>>,
}

impl SqliteProfileStore {
    pub fn new(db: ProfileDb) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(ProfileDb::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(ProfileDb::open_in_memory()?))
    }

    /// Run `f` against the database on the blocking pool.
    async fn with_db<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&ProfileDb) -> Result<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let db = db.lock().expect("profile db lock poisoned");
            f(&db)
        })
        .await
        .map_err(|e| CartaoError::Database(format!("blocking task failed: {e}")))?
    }

    pub async fn updated_at(&self, uid: &Uid) -> Result<Option<DateTime<Utc>>> {
        let uid = uid.clone();
        self.with_db(move |db| db.updated_at(&uid)).await
    }

    pub async fn uids(&self) -> Result<Vec<Uid>> {
        self.with_db(|db| db.uids()).await
    }
}

#[async_trait]
impl DocumentStore for SqliteProfileStore {
    async fn load(&self, uid: &Uid) -> Result<Option<Value>> {
        let uid = uid.clone();
        self.with_db(move |db| db.get(&uid)).await
    }

    async fn save(&self, uid: &Uid, document: &Value) -> Result<()> {
        let uid = uid.clone();
        let document = document.clone();
        self.with_db(move |db| db.upsert(&uid, &document)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_uid_is_none() {
        let db = ProfileDb::open_in_memory().expect("open in-memory db");
        assert_eq!(db.get(&Uid::new("nobody")).expect("get"), None);
        assert_eq!(db.updated_at(&Uid::new("nobody")).expect("updated_at"), None);
    }

    #[test]
    fn upsert_replaces_whole_document() {
        let db = ProfileDb::open_in_memory().expect("open in-memory db");
        let uid = Uid::new("u1");
        db.upsert(&uid, &json!({"name": "Ana", "role": "Broker"})).expect("insert");
        db.upsert(&uid, &json!({"name": "Ana Silva"})).expect("replace");

        let doc = db.get(&uid).expect("get").expect("found");
        assert_eq!(doc, json!({"name": "Ana Silva"}));
        assert_eq!(db.uids().expect("uids"), vec![uid.clone()]);
        assert!(db.updated_at(&uid).expect("updated_at").is_some());
    }

    #[test]
    fn corrupt_row_is_a_read_error() {
        let db = ProfileDb::open_in_memory().expect("open in-memory db");
        db.conn
            .execute(
                "INSERT INTO profiles (uid, document, updated_at) VALUES ('u1', '{not json', '')",
                [],
            )
            .expect("raw insert");
        assert!(matches!(
            db.get(&Uid::new("u1")),
            Err(CartaoError::DocumentRead(_))
        ));
    }

    #[test]
    fn survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("profiles.db");
        let uid = Uid::new("u1");
        {
            let db = ProfileDb::open(&path).expect("open");
            db.upsert(&uid, &json!({"photoZoom": 1.5})).expect("upsert");
        }
        let db = ProfileDb::open(&path).expect("reopen");
        assert_eq!(db.get(&uid).expect("get"), Some(json!({"photoZoom": 1.5})));
    }

    #[tokio::test]
    async fn document_store_round_trip() {
        let store = SqliteProfileStore::open_in_memory().expect("open");
        let uid = Uid::new("u2");
        assert_eq!(store.load(&uid).await.expect("load"), None);

        store
            .save(&uid, &json!({"name": "Bia", "address": ["Rua B"]}))
            .await
            .expect("save");
        let doc = store.load(&uid).await.expect("load").expect("found");
        assert_eq!(doc["address"], json!(["Rua B"]));
        assert_eq!(store.uids().await.expect("uids"), vec![uid]);
    }
}
