use base64::{Engine, engine::general_purpose::STANDARD};
use log::{error, warn};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::error::GatewayError;

pub const DEFAULT_DURATION_SECS: f64 = 30.0;
/// rough tokens-per-second of the model
const TOKENS_PER_SECOND: f64 = 50.0;

const UNAVAILABLE: &str = "AI generation service unavailable";

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    /// seconds, any JSON number
    #[serde(default)]
    pub duration: Option<f64>,
}

impl GenerateRequest {
    /// Returns the prompt and duration, or a validation error when the prompt is missing.
    pub fn validate(&self) -> Result<(&str, f64), GatewayError> {
        match self.prompt.as_deref() {
            Some(p) if !p.is_empty() => {
                let duration = self
                    .duration
                    .filter(|d| d.is_finite())
                    .unwrap_or(DEFAULT_DURATION_SECS);
                Ok((p, duration))
            }
            _ => Err(GatewayError::Validation("Prompt is required".into())),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Generated {
    /// audio inlined as a `data:` URI
    Audio { data_uri: String },
    /// no credential configured, nothing was generated
    Mock,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub mock: bool,
}

impl From<Generated> for GenerateResponse {
    fn from(generated: Generated) -> Self {
        match generated {
            Generated::Audio { data_uri } => Self {
                audio_url: Some(data_uri),
                message: None,
                mock: false,
            },
            Generated::Mock => Self {
                audio_url: None,
                message: Some("Set HF_TOKEN env var to enable AI music generation"),
                mock: true,
            },
        }
    }
}

/// Token budget asked of the model for `duration_secs` of audio.
pub fn max_new_tokens(duration_secs: f64) -> u64 {
    (duration_secs * TOKENS_PER_SECOND)
        .round()
        .clamp(0.0, u32::MAX as f64) as u64
}

pub trait Generator: Send + Sync {
    fn generate(&self, prompt: &str, duration_secs: f64) -> Result<Generated, GatewayError>;

    /// false when this generator never leaves the process
    fn is_live(&self) -> bool;
}

/// Used when no generation credential is configured.
pub struct MockGenerator;

impl Generator for MockGenerator {
    fn generate(&self, _prompt: &str, _duration_secs: f64) -> Result<Generated, GatewayError> {
        Ok(Generated::Mock)
    }

    fn is_live(&self) -> bool {
        false
    }
}

/// Hosted inference endpoint returning raw WAV bytes.
pub struct HuggingFaceGenerator {
    http: Client,
    url: String,
    token: String,
}

impl HuggingFaceGenerator {
    pub fn new(http: Client, url: String, token: String) -> Self {
        Self { http, url, token }
    }
}

pub fn audio_data_uri(bytes: &[u8]) -> String {
    format!("data:audio/wav;base64,{}", STANDARD.encode(bytes))
}

impl Generator for HuggingFaceGenerator {
    fn generate(&self, prompt: &str, duration_secs: f64) -> Result<Generated, GatewayError> {
        let body = json!({
            "inputs": prompt,
            "parameters": {
                "max_new_tokens": max_new_tokens(duration_secs),
            },
        });

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .map_err(|e| {
                warn!("generation request failed: {e}");
                GatewayError::upstream(UNAVAILABLE)
            })?;

        let status = response.status();
        if !status.is_success() {
            let details = response.text().unwrap_or_default();
            error!("HuggingFace API error {status}: {details}");
            return Err(GatewayError::Upstream {
                message: UNAVAILABLE.into(),
                details: Some(details),
            });
        }

        let audio = response.bytes().map_err(|e| {
            warn!("reading generated audio failed: {e}");
            GatewayError::upstream(UNAVAILABLE)
        })?;

        Ok(Generated::Audio {
            data_uri: audio_data_uri(&audio),
        })
    }

    fn is_live(&self) -> bool {
        true
    }
}
