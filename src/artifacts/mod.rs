//! # Artifacts
//!
//! Persisted conversion outputs. An artifact's existence doubles as the
//! job's completion marker.

pub mod store;

pub use store::ArtifactStore;
