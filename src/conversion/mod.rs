//! # Conversion Backends
//!
//! The [`Converter`] trait is the only boundary the batch driver depends on:
//! given a text payload and the group's parameter (a voice id or a target
//! language), produce the artifact bytes or fail.
//!
//! Implementations:
//! - [`ElevenLabsSynthesizer`] - text-to-speech, returns mp3 audio
//! - [`GoogleTranslator`] - machine translation, returns UTF-8 text
//! - [`FnConverter`] - wraps a closure, for synthetic job sets and tests

pub mod elevenlabs;
pub mod google_translate;

use async_trait::async_trait;
use thiserror::Error;

pub use elevenlabs::ElevenLabsSynthesizer;
pub use google_translate::GoogleTranslator;

/// Failures of a single conversion call
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("service responded with HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode service response: {0}")]
    Decode(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Service(String),
}

impl ConversionError {
    pub fn service(message: impl Into<String>) -> Self {
        Self::Service(message.into())
    }
}

/// An external conversion function: `(payload, parameter) -> bytes`
///
/// The driver calls `convert` at most once per job and awaits it before
/// moving on. Implementations own their timeouts; the driver enforces none.
#[async_trait]
pub trait Converter: Send + Sync {
    /// Short name used in logs and reports
    fn name(&self) -> &str;

    async fn convert(&self, payload: &str, parameter: &str) -> Result<Vec<u8>, ConversionError>;
}

/// Converter backed by a synchronous closure
pub struct FnConverter<F> {
    name: String,
    func: F,
}

impl<F> FnConverter<F>
where
    F: Fn(&str, &str) -> Result<Vec<u8>, ConversionError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

#[async_trait]
impl<F> Converter for FnConverter<F>
where
    F: Fn(&str, &str) -> Result<Vec<u8>, ConversionError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn convert(&self, payload: &str, parameter: &str) -> Result<Vec<u8>, ConversionError> {
        (self.func)(payload, parameter)
    }
}

/// Truncate a response body for inclusion in an error message
pub(crate) fn truncate_body(body: &str, max_chars: usize) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let mut truncated: String = trimmed.chars().take(max_chars).collect();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fn_converter_passes_payload_and_parameter() {
        let converter = FnConverter::new("echo", |payload: &str, parameter: &str| {
            Ok(format!("{parameter}:{payload}").into_bytes())
        });

        assert_eq!(converter.name(), "echo");
        let bytes = converter.convert("Hello", "en").await.unwrap();
        assert_eq!(bytes, b"en:Hello");
    }

    #[tokio::test]
    async fn test_fn_converter_propagates_errors() {
        let converter = FnConverter::new("broken", |_: &str, _: &str| {
            Err(ConversionError::service("quota exceeded"))
        });

        let err = converter.convert("Hello", "en").await.unwrap_err();
        assert_eq!(err.to_string(), "quota exceeded");
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(truncate_body("  short  ", 10), "short");
        assert_eq!(truncate_body("abcdefghij", 4), "abcd...");
    }
}
