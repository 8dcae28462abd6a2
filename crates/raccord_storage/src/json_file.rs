//! Durable JSON-file telemetry store.

use async_trait::async_trait;
use raccord_core::{ContinuityState, ManifestationScore};
use raccord_error::{RaccordResult, StorageError, StorageErrorKind};
use raccord_interface::TelemetryStore;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

const STATE_FILE: &str = "continuity_state.json";
const TELEMETRY_FILE: &str = "telemetry.json";

/// Durable telemetry store backed by JSON files under a state directory.
///
/// Layout:
///
/// ```text
/// {state_dir}/
/// ├── continuity_state.json   (latest ContinuityState)
/// └── telemetry.json          (element -> ManifestationScore counters)
/// ```
///
/// Writes go through temp-file + rename so a crash mid-write never leaves
/// a torn file, and a write mutex serializes mutations so concurrent runs
/// sharing one store cannot lose counter updates. Reads bypass the mutex
/// and see the latest fully renamed file.
pub struct JsonFileTelemetryStore {
    state_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileTelemetryStore {
    /// Create a store rooted at the given directory, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    #[tracing::instrument(skip(state_dir))]
    pub fn new(state_dir: impl Into<PathBuf>) -> RaccordResult<Self> {
        let state_dir = state_dir.into();

        std::fs::create_dir_all(&state_dir).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                state_dir.display(),
                e
            )))
        })?;

        tracing::info!(path = %state_dir.display(), "Opened telemetry state directory");
        Ok(Self {
            state_dir,
            write_lock: Mutex::new(()),
        })
    }

    fn state_path(&self) -> PathBuf {
        self.state_dir.join(STATE_FILE)
    }

    fn telemetry_path(&self) -> PathBuf {
        self.state_dir.join(TELEMETRY_FILE)
    }

    /// Write `contents` to `path` atomically via temp file + rename.
    async fn write_atomic(&self, path: &Path, contents: String) -> RaccordResult<()> {
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, contents).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                tmp.display(),
                e
            )))
        })?;
        tokio::fs::rename(&tmp, path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;
        Ok(())
    }

    async fn read_scores(&self) -> RaccordResult<BTreeMap<String, ManifestationScore>> {
        let path = self.telemetry_path();
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = tokio::fs::read_to_string(&path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            StorageError::new(StorageErrorKind::Deserialization(format!(
                "{}: {}",
                path.display(),
                e
            )))
            .into()
        })
    }
}

#[async_trait]
impl TelemetryStore for JsonFileTelemetryStore {
    #[tracing::instrument(skip(self, state), fields(scenes = state.scene_states().len()))]
    async fn save_state(&self, state: &ContinuityState) -> RaccordResult<()> {
        let _guard = self.write_lock.lock().await;
        let contents = serde_json::to_string_pretty(state)
            .map_err(|e| StorageError::new(StorageErrorKind::Serialization(e.to_string())))?;
        self.write_atomic(&self.state_path(), contents).await?;
        debug!("Persisted continuity state");
        Ok(())
    }

    async fn load_state(&self) -> RaccordResult<Option<ContinuityState>> {
        let path = self.state_path();
        if !path.exists() {
            debug!("No persisted continuity state, starting fresh");
            return Ok(None);
        }
        let contents = tokio::fs::read_to_string(&path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;
        let state: ContinuityState = serde_json::from_str(&contents).map_err(|e| {
            StorageError::new(StorageErrorKind::Deserialization(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;
        Ok(Some(state))
    }

    async fn record_manifestation(&self, element: &str, appeared: bool) -> RaccordResult<()> {
        // Read-modify-write under the write lock; loads outside the lock
        // see either the old or the new file, never a torn one.
        let _guard = self.write_lock.lock().await;
        let mut scores = self.read_scores().await?;
        scores
            .entry(element.to_string())
            .or_insert_with(|| ManifestationScore::new(element))
            .record(appeared);
        let contents = serde_json::to_string_pretty(&scores)
            .map_err(|e| StorageError::new(StorageErrorKind::Serialization(e.to_string())))?;
        self.write_atomic(&self.telemetry_path(), contents).await
    }

    async fn load_manifestation_scores(
        &self,
    ) -> RaccordResult<BTreeMap<String, ManifestationScore>> {
        self.read_scores().await
    }

    #[tracing::instrument(skip(self))]
    async fn clear(&self) -> RaccordResult<()> {
        let _guard = self.write_lock.lock().await;
        for path in [self.state_path(), self.telemetry_path()] {
            if path.exists() {
                tokio::fs::remove_file(&path).await.map_err(|e| {
                    StorageError::new(StorageErrorKind::FileWrite(format!(
                        "{}: {}",
                        path.display(),
                        e
                    )))
                })?;
            }
        }
        debug!("Cleared persisted telemetry");
        Ok(())
    }
}
