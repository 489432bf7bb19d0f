//! # Conversion Jobs and Groups
//!
//! A [`ConversionJob`] is one identifier/payload pair; a [`JobGroup`] bundles
//! the jobs that share an output directory and a conversion parameter (a voice
//! id or a target language).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::validation::validate_path_segment;

/// One unit of work: convert `payload` and store it under `identifier`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionJob {
    pub identifier: String,
    pub payload: String,
    pub group: String,
}

/// Jobs sharing an output location and conversion parameter
///
/// Identifiers are unique within the group and jobs iterate in insertion
/// order. Construct through [`JobGroup::new`] / [`JobGroup::from_entries`] so
/// those invariants hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobGroup {
    name: String,
    parameter: String,
    jobs: Vec<ConversionJob>,
}

/// Reasons a group cannot be built
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobGroupError {
    #[error("invalid group name '{name}': {reason}")]
    InvalidGroupName { name: String, reason: String },

    #[error("invalid identifier '{identifier}' in group '{group}': {reason}")]
    InvalidIdentifier {
        group: String,
        identifier: String,
        reason: String,
    },

    #[error("duplicate identifier '{identifier}' in group '{group}'")]
    DuplicateIdentifier { group: String, identifier: String },

    #[error("group '{group}' has an empty conversion parameter")]
    EmptyParameter { group: String },
}

impl JobGroup {
    /// Create an empty group
    pub fn new(
        name: impl Into<String>,
        parameter: impl Into<String>,
    ) -> Result<Self, JobGroupError> {
        let name = name.into();
        let parameter = parameter.into();

        validate_path_segment(&name).map_err(|reason| JobGroupError::InvalidGroupName {
            name: name.clone(),
            reason,
        })?;

        if parameter.trim().is_empty() {
            return Err(JobGroupError::EmptyParameter { group: name });
        }

        Ok(Self {
            name,
            parameter,
            jobs: Vec::new(),
        })
    }

    /// Build a group from ordered `(identifier, payload)` pairs
    pub fn from_entries<I, K, V>(
        name: impl Into<String>,
        parameter: impl Into<String>,
        entries: I,
    ) -> Result<Self, JobGroupError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut group = Self::new(name, parameter)?;
        for (identifier, payload) in entries {
            group.push(identifier, payload)?;
        }
        Ok(group)
    }

    /// Append a job, enforcing identifier validity and uniqueness
    pub fn push(
        &mut self,
        identifier: impl Into<String>,
        payload: impl Into<String>,
    ) -> Result<(), JobGroupError> {
        let identifier = identifier.into();

        validate_path_segment(&identifier).map_err(|reason| JobGroupError::InvalidIdentifier {
            group: self.name.clone(),
            identifier: identifier.clone(),
            reason,
        })?;

        if self.contains(&identifier) {
            return Err(JobGroupError::DuplicateIdentifier {
                group: self.name.clone(),
                identifier,
            });
        }

        self.jobs.push(ConversionJob {
            identifier,
            payload: payload.into(),
            group: self.name.clone(),
        });
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Voice id or target language handed to the converter with every payload
    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    pub fn jobs(&self) -> &[ConversionJob] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.jobs.iter().any(|job| job.identifier == identifier)
    }

    /// Identifier → payload view in job order
    pub fn payloads(&self) -> IndexMap<&str, &str> {
        self.jobs
            .iter()
            .map(|job| (job.identifier.as_str(), job.payload.as_str()))
            .collect()
    }
}
