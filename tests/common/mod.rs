//! Shared helpers for integration tests

#![allow(dead_code)]

pub mod mock_service;
pub mod strategies;

use async_trait::async_trait;
use narrator_batch::{ArtifactStore, ConversionError, Converter};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Converter that records every call and answers from a script
///
/// Payloads listed in `failures` fail with the given message; every other
/// payload converts to `output` (or to `AUDIO:<payload>` when unset).
#[derive(Default)]
pub struct RecordingConverter {
    calls: Mutex<Vec<(String, String)>>,
    failures: HashMap<String, String>,
    output: Option<Vec<u8>>,
}

impl RecordingConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn returning(output: &[u8]) -> Self {
        Self {
            output: Some(output.to_vec()),
            ..Self::default()
        }
    }

    pub fn failing_on(mut self, payload: &str, message: &str) -> Self {
        self.failures
            .insert(payload.to_string(), message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn called_payloads(&self) -> Vec<String> {
        self.calls().into_iter().map(|(payload, _)| payload).collect()
    }
}

#[async_trait]
impl Converter for RecordingConverter {
    fn name(&self) -> &str {
        "recording"
    }

    async fn convert(&self, payload: &str, parameter: &str) -> Result<Vec<u8>, ConversionError> {
        self.calls
            .lock()
            .unwrap()
            .push((payload.to_string(), parameter.to_string()));

        if let Some(message) = self.failures.get(payload) {
            return Err(ConversionError::service(message.clone()));
        }

        Ok(self
            .output
            .clone()
            .unwrap_or_else(|| format!("AUDIO:{payload}").into_bytes()))
    }
}

/// Keep a typed handle while handing the driver a trait object
pub fn shared(converter: RecordingConverter) -> (Arc<RecordingConverter>, Arc<dyn Converter>) {
    let converter = Arc::new(converter);
    let as_dyn: Arc<dyn Converter> = converter.clone();
    (converter, as_dyn)
}

pub fn mp3_store(root: &Path) -> ArtifactStore {
    ArtifactStore::new(root, "mp3")
}

/// Place an artifact on disk as if a previous run had produced it
pub fn seed_artifact(root: &Path, group: &str, identifier: &str, extension: &str, bytes: &[u8]) {
    let dir = root.join(group);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(format!("{identifier}.{extension}")), bytes).unwrap();
}

pub fn read_artifact(root: &Path, group: &str, identifier: &str, extension: &str) -> Vec<u8> {
    std::fs::read(root.join(group).join(format!("{identifier}.{extension}"))).unwrap()
}

/// Every file under `root`, relative and sorted
pub fn list_files(root: &Path) -> Vec<String> {
    fn walk(base: &Path, dir: &Path, out: &mut Vec<String>) {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                walk(base, &path, out);
            } else {
                out.push(
                    path.strip_prefix(base)
                        .unwrap()
                        .to_string_lossy()
                        .replace('\\', "/"),
                );
            }
        }
    }

    let mut files = Vec::new();
    walk(root, root, &mut files);
    files.sort();
    files
}
