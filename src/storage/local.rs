// src/storage/local.rs

//! Local filesystem storage implementation.
//!
//! Keeps the snapshot in a single pretty-printed JSON file. Saves go through
//! a sibling temp file and a rename, so an interrupted save leaves either the
//! old file or the new one in place.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::Snapshot;
use crate::storage::{SnapshotStore, StoredSnapshot};

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    /// Create a LocalStorage backed by the given snapshot file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("tmp")
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.ensure_dir().await?;

        let tmp = self.tmp_path();
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read and decode the snapshot, distinguishing absence from corruption.
    async fn try_load(&self) -> Result<Option<Snapshot>> {
        match self.read_bytes().await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl SnapshotStore for LocalStorage {
    async fn load_state(&self) -> StoredSnapshot {
        match self.try_load().await {
            Ok(Some(snapshot)) => {
                log::debug!(
                    "Loaded {} events from {}",
                    snapshot.len(),
                    self.path.display()
                );
                StoredSnapshot::Loaded(snapshot)
            }
            Ok(None) => {
                log::info!("No snapshot found at {}", self.path.display());
                StoredSnapshot::Absent
            }
            Err(e) => {
                log::warn!(
                    "Snapshot at {} is unreadable ({}); treating as empty",
                    self.path.display(),
                    e
                );
                StoredSnapshot::Corrupt
            }
        }
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        self.write_bytes(&bytes).await?;
        log::debug!(
            "Saved {} events to {}",
            snapshot.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventRecord, Server};
    use tempfile::TempDir;

    fn sample_snapshot() -> Snapshot {
        let mut event = EventRecord::new("4821");
        event.name = Some("Sunday Convoy".to_string());
        event.server = Some(Server::named("Simulation 1").into());
        event.description = Some("Bring your own trailer, meet at Straße 5".to_string());
        [event].into_iter().collect()
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("events_db.json"));

        let snapshot = sample_snapshot();
        storage.save(&snapshot).await.unwrap();

        assert_eq!(storage.load().await, snapshot);
        assert!(!storage.tmp_path().exists());
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("nope.json"));

        assert_eq!(storage.load_state().await, StoredSnapshot::Absent);
        assert!(storage.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("events_db.json");
        std::fs::write(&path, b"{\"1\": {\"id\": ").unwrap();

        let storage = LocalStorage::new(&path);
        assert_eq!(storage.load_state().await, StoredSnapshot::Corrupt);
        assert!(storage.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_saved_empty_snapshot_is_loaded_not_absent() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("events_db.json"));

        storage.save(&Snapshot::new()).await.unwrap();

        assert_eq!(
            storage.load_state().await,
            StoredSnapshot::Loaded(Snapshot::new())
        );
    }

    #[tokio::test]
    async fn test_odd_nested_shapes_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("events_db.json");
        std::fs::write(
            &path,
            r#"{"9": {"id": 9, "server": "Simulation 1", "departure": null}}"#,
        )
        .unwrap();
        let storage = LocalStorage::new(&path);

        let snapshot = storage.load().await;
        assert_eq!(
            snapshot.get("9").unwrap().server_name().as_deref(),
            Some("Simulation 1")
        );

        storage.save(&snapshot).await.unwrap();
        assert_eq!(storage.load().await, snapshot);
    }

    #[tokio::test]
    async fn test_file_is_human_readable() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("events_db.json");
        let storage = LocalStorage::new(&path);

        storage.save(&sample_snapshot()).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"4821\": {"));
        assert!(text.contains("Straße"));
    }

    #[tokio::test]
    async fn test_save_creates_parent_dirs_and_overwrites() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("state/nested/events_db.json"));

        storage.save(&sample_snapshot()).await.unwrap();
        storage.save(&Snapshot::new()).await.unwrap();

        assert!(storage.load().await.is_empty());
    }
}
