//! File system artifact store.
//!
//! Artifacts live at `<root>/<group>/<identifier>.<extension>`. The presence of
//! that file is the only persisted state: it marks the job complete and is
//! never rewritten or deleted by the store.

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::constants::output::PARTIAL_SUFFIX;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactStore {
    root: PathBuf,
    extension: String,
}

impl ArtifactStore {
    /// `extension` may be given with or without its leading dot
    pub fn new(root: impl Into<PathBuf>, extension: impl AsRef<str>) -> Self {
        Self {
            root: root.into(),
            extension: extension.as_ref().trim_start_matches('.').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn group_dir(&self, group: &str) -> PathBuf {
        self.root.join(group)
    }

    /// Deterministic artifact location for a job
    pub fn artifact_path(&self, group: &str, identifier: &str) -> PathBuf {
        self.group_dir(group).join(format!("{identifier}.{}", self.extension))
    }

    fn partial_path(&self, group: &str, identifier: &str) -> PathBuf {
        self.group_dir(group).join(format!(
            ".{identifier}.{}.{PARTIAL_SUFFIX}",
            self.extension
        ))
    }

    /// Create the group directory (and the root) if missing
    pub async fn ensure_group_dir(&self, group: &str) -> io::Result<PathBuf> {
        let dir = self.group_dir(group);
        fs::create_dir_all(&dir).await?;
        Ok(dir)
    }

    /// Whether the artifact is present; its content is not inspected
    pub async fn exists(&self, group: &str, identifier: &str) -> io::Result<bool> {
        fs::try_exists(self.artifact_path(group, identifier)).await
    }

    /// Write `bytes` as the job's artifact.
    ///
    /// The bytes go to a hidden sibling file first and are renamed into place,
    /// so the final path only ever holds a complete write.
    pub async fn persist(
        &self,
        group: &str,
        identifier: &str,
        bytes: &[u8],
    ) -> io::Result<PathBuf> {
        self.ensure_group_dir(group).await?;

        let target = self.artifact_path(group, identifier);
        let partial = self.partial_path(group, identifier);

        if let Err(e) = fs::write(&partial, bytes).await {
            let _ = fs::remove_file(&partial).await;
            return Err(e);
        }

        if let Err(e) = fs::rename(&partial, &target).await {
            let _ = fs::remove_file(&partial).await;
            return Err(e);
        }

        debug!(path = %target.display(), bytes = bytes.len(), "Artifact persisted");
        Ok(target)
    }

    /// Artifact bytes, or `None` when the artifact is absent
    pub async fn read(&self, group: &str, identifier: &str) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.artifact_path(group, identifier)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}
