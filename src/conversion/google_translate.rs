//! Google Translate backend.
//!
//! Uses the public `translate_a/single?client=gtx` endpoint, which needs no
//! API key. The response is a nested JSON array whose first element lists the
//! translated sentence fragments.

use async_trait::async_trait;
use reqwest::{Client, Request};
use serde_json::Value;
use tracing::debug;

use super::{truncate_body, ConversionError, Converter};
use crate::config::{ConfigResult, ConfigurationError, TranslationConfig};

const PROVIDER: &str = "google";
const MAX_ERROR_BODY_CHARS: usize = 300;

#[derive(Debug, Clone)]
pub struct GoogleTranslator {
    client: Client,
    base_url: String,
    source_language: String,
}

impl GoogleTranslator {
    /// Build from the `translation` configuration section
    ///
    /// `source_language` overrides the configured one (job tables may carry
    /// their own).
    pub fn from_config(
        config: &TranslationConfig,
        source_language: Option<&str>,
    ) -> ConfigResult<Self> {
        if config.provider != PROVIDER {
            return Err(ConfigurationError::invalid_value(
                "translation.provider",
                config.provider.as_str(),
                format!("only '{PROVIDER}' is supported"),
            ));
        }

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ConfigurationError::client_build_error(PROVIDER, e))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            source_language: source_language
                .unwrap_or(&config.source_language)
                .to_string(),
        })
    }

    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    fn build_request(&self, payload: &str, target: &str) -> Result<Request, ConversionError> {
        if payload.trim().is_empty() {
            return Err(ConversionError::InvalidInput("text is empty".to_string()));
        }
        if target.trim().is_empty() {
            return Err(ConversionError::InvalidInput(
                "target language is empty".to_string(),
            ));
        }

        Ok(self
            .client
            .get(format!("{}/translate_a/single", self.base_url))
            .query(&[
                ("client", "gtx"),
                ("sl", self.source_language.as_str()),
                ("tl", target),
                ("dt", "t"),
                ("q", payload),
            ])
            .build()?)
    }

    /// Concatenate the translated fragments of a `translate_a/single` response
    pub fn parse_response(value: &Value) -> Result<String, ConversionError> {
        let sentences = value
            .get(0)
            .and_then(Value::as_array)
            .ok_or_else(|| ConversionError::Decode("missing sentence list".to_string()))?;

        let translated: String = sentences
            .iter()
            .filter_map(|sentence| sentence.get(0).and_then(Value::as_str))
            .collect();

        if translated.trim().is_empty() {
            return Err(ConversionError::Decode(
                "response contained no translated text".to_string(),
            ));
        }

        Ok(translated)
    }
}

#[async_trait]
impl Converter for GoogleTranslator {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn convert(&self, payload: &str, parameter: &str) -> Result<Vec<u8>, ConversionError> {
        let request = self.build_request(payload, parameter)?;
        debug!(
            source = %self.source_language,
            target = %parameter,
            "Requesting translation"
        );

        let response = self.client.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConversionError::Status {
                status: status.as_u16(),
                body: truncate_body(&body, MAX_ERROR_BODY_CHARS),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ConversionError::Decode(e.to_string()))?;

        Ok(Self::parse_response(&body)?.into_bytes())
    }
}
