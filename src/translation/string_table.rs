//! Localized string tables assembled from translation artifacts.
//!
//! Each key takes its translated artifact when one exists and otherwise falls
//! back to the source text, so a table is always complete even after a
//! partially failed translation run.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::artifacts::ArtifactStore;
use crate::error::{BatchError, Result};
use crate::models::JobGroup;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringTable {
    pub locale: String,
    pub entries: IndexMap<String, String>,
    /// Keys that carry the untranslated source text
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub fallback_keys: Vec<String>,
}

impl StringTable {
    /// Build the table for `group` from the artifacts in `store`
    ///
    /// Artifacts that are not valid UTF-8 are treated like missing ones.
    pub async fn assemble(group: &JobGroup, store: &ArtifactStore) -> Result<Self> {
        let mut entries = IndexMap::with_capacity(group.len());
        let mut fallback_keys = Vec::new();

        for job in group.jobs() {
            let translated = store
                .read(&job.group, &job.identifier)
                .await
                .map_err(|e| {
                    BatchError::io(
                        format!("reading translation artifact {}/{}", job.group, job.identifier),
                        e,
                    )
                })?
                .and_then(|bytes| String::from_utf8(bytes).ok());

            let text = match translated {
                Some(text) => text.trim().to_string(),
                None => {
                    fallback_keys.push(job.identifier.clone());
                    job.payload.clone()
                }
            };
            entries.insert(job.identifier.clone(), text);
        }

        if !fallback_keys.is_empty() {
            warn!(
                locale = %group.name(),
                count = fallback_keys.len(),
                keys = ?fallback_keys,
                "String table uses source text for untranslated keys"
            );
        }

        Ok(Self {
            locale: group.name().to_string(),
            entries,
            fallback_keys,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.fallback_keys.is_empty()
    }

    /// Default location: `<root>/<locale>.json`
    pub fn default_path(root: &Path, locale: &str) -> PathBuf {
        root.join(format!("{locale}.json"))
    }

    /// Write the key → text map as pretty JSON, replacing any previous table
    pub async fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| BatchError::io(format!("creating {}", parent.display()), e))?;
        }

        let mut json = serde_json::to_string_pretty(&self.entries)?;
        json.push('\n');
        tokio::fs::write(path, json)
            .await
            .map_err(|e| BatchError::io(format!("writing string table {}", path.display()), e))?;

        info!(
            locale = %self.locale,
            path = %path.display(),
            entries = self.entries.len(),
            fallbacks = self.fallback_keys.len(),
            "String table written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_assemble_falls_back_to_source_text() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path(), "txt");
        store.persist("fr", "confirm", "Confirmer\n".as_bytes()).await.unwrap();

        let group = JobGroup::from_entries(
            "fr",
            "fr",
            [("confirm", "Bestätigen"), ("stop", "Stopp")],
        )
        .unwrap();

        let table = StringTable::assemble(&group, &store).await.unwrap();

        assert_eq!(table.locale, "fr");
        assert_eq!(table.entries["confirm"], "Confirmer");
        assert_eq!(table.entries["stop"], "Stopp");
        assert_eq!(table.fallback_keys, vec!["stop".to_string()]);
        assert!(!table.is_complete());
        let keys: Vec<_> = table.entries.keys().cloned().collect();
        assert_eq!(keys, vec!["confirm", "stop"]);
    }

    #[tokio::test]
    async fn test_write_json() {
        let dir = TempDir::new().unwrap();
        let mut entries = IndexMap::new();
        entries.insert("b".to_string(), "zwei".to_string());
        entries.insert("a".to_string(), "eins".to_string());
        let table = StringTable {
            locale: "de".to_string(),
            entries,
            fallback_keys: Vec::new(),
        };

        let path = StringTable::default_path(&dir.path().join("tables"), "de");
        table.write_json(&path).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.find("\"b\"").unwrap() < written.find("\"a\"").unwrap());
        let parsed: IndexMap<String, String> = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed["a"], "eins");
    }
}
