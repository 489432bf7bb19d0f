//! ElevenLabs text-to-speech backend.
//!
//! `POST {base_url}/v1/text-to-speech/{voice_id}` with the `xi-api-key`
//! header and a JSON body of `{text, model_id}`; the response body is the
//! encoded audio.

use async_trait::async_trait;
use reqwest::{Client, Request};
use serde::Serialize;
use tracing::debug;

use super::{truncate_body, ConversionError, Converter};
use crate::config::{ConfigResult, ConfigurationError, SynthesisConfig};
use crate::constants::synthesis::API_KEY_HEADER;

const PROVIDER: &str = "elevenlabs";
const MAX_ERROR_BODY_CHARS: usize = 300;

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

#[derive(Debug, Clone)]
pub struct ElevenLabsSynthesizer {
    client: Client,
    base_url: String,
    api_key: String,
    model_id: String,
    output_format: Option<String>,
}

impl ElevenLabsSynthesizer {
    /// Build from the `synthesis` configuration section; the API key is required
    pub fn from_config(config: &SynthesisConfig) -> ConfigResult<Self> {
        if config.provider != PROVIDER {
            return Err(ConfigurationError::invalid_value(
                "synthesis.provider",
                config.provider.as_str(),
                format!("only '{PROVIDER}' is supported"),
            ));
        }

        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigurationError::missing_required_field("api_key", "synthesis"))?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ConfigurationError::client_build_error(PROVIDER, e))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model_id: config.model_id.clone(),
            output_format: config.output_format.clone(),
        })
    }

    fn endpoint(&self, voice_id: &str) -> String {
        format!("{}/v1/text-to-speech/{voice_id}", self.base_url)
    }

    fn build_request(&self, payload: &str, voice_id: &str) -> Result<Request, ConversionError> {
        if payload.trim().is_empty() {
            return Err(ConversionError::InvalidInput("text is empty".to_string()));
        }
        if voice_id.trim().is_empty() {
            return Err(ConversionError::InvalidInput("voice id is empty".to_string()));
        }

        let mut builder = self
            .client
            .post(self.endpoint(voice_id))
            .header(API_KEY_HEADER, &self.api_key)
            .header(reqwest::header::ACCEPT, "audio/mpeg")
            .json(&SynthesisRequest {
                text: payload,
                model_id: &self.model_id,
            });

        if let Some(format) = &self.output_format {
            builder = builder.query(&[("output_format", format)]);
        }

        Ok(builder.build()?)
    }
}

#[async_trait]
impl Converter for ElevenLabsSynthesizer {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn convert(&self, payload: &str, parameter: &str) -> Result<Vec<u8>, ConversionError> {
        let request = self.build_request(payload, parameter)?;
        debug!(
            voice_id = %parameter,
            chars = payload.chars().count(),
            "Requesting speech synthesis"
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

        let audio = response.bytes().await?;
        if audio.is_empty() {
            return Err(ConversionError::Decode("empty audio response".to_string()));
        }

        Ok(audio.to_vec())
    }
}
