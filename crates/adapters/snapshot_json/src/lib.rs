//! # autoff-adapter-snapshot-json
//!
//! JSON file persistence for timer snapshots. The whole store is one
//! pretty-printed JSON object mapping target ids to snapshots, read once
//! at open and rewritten in full on every save.
//!
//! ## Dependency rule
//!
//! Depends on `autoff-app` (port traits) and `autoff-domain` only.

mod error;

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use autoff_app::ports::SnapshotStore;
use autoff_domain::error::AutoffError;
use autoff_domain::snapshot::TimerSnapshot;
use autoff_domain::target::TargetId;
use tokio::sync::Mutex;

pub use error::SnapshotError;

/// Snapshot store backed by a single JSON file.
///
/// The file is owned by this process: it is read once at
/// [`open`](Self::open) and rewritten on every save. Concurrent saves are
/// serialized on an internal lock.
#[derive(Debug)]
pub struct JsonSnapshotStore {
    path: PathBuf,
    cache: Mutex<BTreeMap<TargetId, TimerSnapshot>>,
}

impl JsonSnapshotStore {
    /// Opens the store at `path`, creating parent directories as needed.
    ///
    /// A missing file starts the store empty. A file that does not parse
    /// is discarded with a warning so a corrupt snapshot cannot keep the
    /// daemon from booting.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Io`] when the file exists but cannot be
    /// read, or when the parent directory cannot be created.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, SnapshotError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let cache = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(map) => map,
                Err(err) => {
                    tracing::warn!(
                        %err,
                        path = %path.display(),
                        "snapshot file is malformed, starting empty"
                    );
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            path,
            cache: Mutex::new(cache),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write_file(
        &self,
        map: &BTreeMap<TargetId, TimerSnapshot>,
    ) -> Result<(), SnapshotError> {
        let json = serde_json::to_string_pretty(map)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

impl SnapshotStore for JsonSnapshotStore {
    async fn load(&self, target: &TargetId) -> Result<Option<TimerSnapshot>, AutoffError> {
        Ok(self.cache.lock().await.get(target).cloned())
    }

    async fn save(&self, snapshot: &TimerSnapshot) -> Result<(), AutoffError> {
        let mut map = self.cache.lock().await;
        map.insert(snapshot.target.clone(), snapshot.clone());
        self.write_file(&map).await?;
        Ok(())
    }
}
