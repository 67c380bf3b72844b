//! Persisted list of recently searched cities.
//!
//! Every operation re-reads the whole snapshot and, when it changes
//! anything, writes the whole snapshot back. There is no locking: two
//! concurrent `add`/`remove` calls can both read the same snapshot and the
//! later write wins, dropping the other's change.

use std::fmt::Debug;
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::{Error, Result};
use crate::model::HistoryEntry;

/// Storage for the history snapshot.
#[async_trait]
pub trait PersistenceMedium: Send + Sync + Debug {
    /// Current snapshot; empty when the medium is missing or unreadable.
    async fn read_snapshot(&self) -> Vec<HistoryEntry>;

    /// Replace the stored snapshot with `entries`.
    async fn write_snapshot(&self, entries: &[HistoryEntry]) -> Result<()>;
}

/// Snapshot stored as a pretty-printed JSON array of `{id, name}` objects.
#[derive(Debug, Clone)]
pub struct JsonFileMedium {
    path: PathBuf,
}

impl JsonFileMedium {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PersistenceMedium for JsonFileMedium {
    async fn read_snapshot(&self) -> Vec<HistoryEntry> {
        let data = match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no search history yet");
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Error reading search history: {}", e);
                return Vec::new();
            }
        };

        // A `null` document counts as empty.
        match serde_json::from_str::<Option<Vec<HistoryEntry>>>(&data) {
            Ok(entries) => entries.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Error parsing search history: {}", e);
                Vec::new()
            }
        }
    }

    async fn write_snapshot(&self, entries: &[HistoryEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                Error::Persist(format!("create {}: {}", parent.display(), e))
            })?;
        }

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| Error::Persist(format!("serialize history: {e}")))?;

        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| Error::Persist(format!("write {}: {}", self.path.display(), e)))
    }
}

/// Id for a new entry: the creation instant in milliseconds, bumped past the
/// largest existing id so ids stay strictly increasing within a snapshot.
///
/// Fails when the snapshot already holds `i64::MAX`.
pub fn next_id(existing: &[HistoryEntry], now_millis: i64) -> Result<i64> {
    match existing.iter().map(|entry| entry.id).max() {
        None => Ok(now_millis),
        Some(max) => max
            .checked_add(1)
            .map(|next| now_millis.max(next))
            .ok_or_else(|| Error::Persist(format!("no history id left after {max}"))),
    }
}

/// CRUD over the persisted search history.
#[derive(Debug)]
pub struct HistoryStore {
    medium: Box<dyn PersistenceMedium>,
}

impl HistoryStore {
    pub fn new(medium: Box<dyn PersistenceMedium>) -> Self {
        Self { medium }
    }

    /// History backed by a JSON file.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::new(Box::new(JsonFileMedium::new(path)))
    }

    /// All entries in insertion order. Never fails.
    pub async fn list(&self) -> Vec<HistoryEntry> {
        self.medium.read_snapshot().await
    }

    /// Append `name` unless an entry with exactly that name exists.
    ///
    /// Returns the new entry, or `None` when nothing changed.
    pub async fn add(&self, name: &str) -> Result<Option<HistoryEntry>> {
        let mut entries = self.list().await;

        if entries.iter().any(|entry| entry.name == name) {
            tracing::debug!(name, "city already in search history");
            return Ok(None);
        }

        let entry = HistoryEntry {
            id: next_id(&entries, Utc::now().timestamp_millis())?,
            name: name.to_string(),
        };
        entries.push(entry.clone());
        self.medium.write_snapshot(&entries).await?;

        tracing::info!(id = entry.id, name, "city added to search history");
        Ok(Some(entry))
    }

    /// Drop the entry with `id`. The snapshot is rewritten even when no entry
    /// matched.
    pub async fn remove(&self, id: i64) -> Result<()> {
        let mut entries = self.list().await;
        let before = entries.len();
        entries.retain(|entry| entry.id != id);

        self.medium.write_snapshot(&entries).await?;

        tracing::info!(id, removed = before - entries.len(), "search history updated");
        Ok(())
    }
}
