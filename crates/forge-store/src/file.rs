//! File-backed store implementations
//!
//! Persistent backing for production deployments:
//! - [`JsonFileResultStore`]: one JSON file per fingerprint under a root dir
//! - [`JsonlHistoryStore`]: single append-only JSON-lines file

use crate::error::StoreError;
use crate::traits::{HistoryStore, ResultStore};
use forge_spec::{Fingerprint, GenerationResult, HistoryRecord};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;

/// Result cache persisted as one JSON file per fingerprint
#[derive(Debug)]
pub struct JsonFileResultStore {
    root: PathBuf,
}

impl JsonFileResultStore {
    /// Open the cache directory, creating it if absent
    ///
    /// # Errors
    /// Returns error if the directory cannot be created
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    fn entry_path(&self, fingerprint: &Fingerprint) -> PathBuf {
        self.root.join(format!("{fingerprint}.json"))
    }
}

#[async_trait::async_trait]
impl ResultStore for JsonFileResultStore {
    async fn get(
        &self,
        fingerprint: &Fingerprint,
    ) -> Result<Option<GenerationResult>, StoreError> {
        match tokio::fs::read(self.entry_path(fingerprint)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn put(
        &self,
        fingerprint: Fingerprint,
        result: GenerationResult,
    ) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(&result)?;
        tokio::fs::write(self.entry_path(&fingerprint), bytes).await?;
        Ok(())
    }

    async fn invalidate(&self, fingerprint: &Fingerprint) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.entry_path(fingerprint)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// History persisted as an append-only JSON-lines file
///
/// Appends are serialized through an internal lock so concurrent requests
/// never interleave partial lines.
#[derive(Debug)]
pub struct JsonlHistoryStore {
    path: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonlHistoryStore {
    /// Open the history file path, creating parent directories if absent
    ///
    /// The file itself is created on first append.
    ///
    /// # Errors
    /// Returns error if the parent directory cannot be created
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(Self {
            path,
            write_lock: tokio::sync::Mutex::new(()),
        })
    }

    async fn read_all(&self) -> Result<Vec<HistoryRecord>, StoreError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut records = Vec::new();
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(record) => records.push(record),
                Err(err) => {
                    tracing::warn!("skipping unreadable history line: {err}");
                }
            }
        }
        Ok(records)
    }
}

#[async_trait::async_trait]
impl HistoryStore for JsonlHistoryStore {
    async fn append(&self, record: HistoryRecord) -> Result<(), StoreError> {
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<HistoryRecord>, StoreError> {
        let records = self.read_all().await?;
        Ok(records.into_iter().rev().take(limit).collect())
    }

    async fn for_project(&self, project_id: &str) -> Result<Vec<HistoryRecord>, StoreError> {
        let records = self.read_all().await?;
        Ok(records
            .into_iter()
            .filter(|record| record.project_id == project_id)
            .collect())
    }
}
