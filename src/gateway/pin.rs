use anyhow::{Context, anyhow};
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::error::GatewayError;
use crate::domain::audius::APP_NAME;

/// Fields the mint view sends along with a track.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadRequest {
    pub title: String,
    pub artist: String,
    pub audio_url: String,
    pub artwork_url: Option<String>,
    pub genre: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub trait_type: &'static str,
    pub value: String,
}

/// NFT metadata document in the common marketplace layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NftMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
    pub animation_url: String,
    pub attributes: Vec<Attribute>,
}

impl NftMetadata {
    pub fn build(upload: &UploadRequest, created: NaiveDate) -> Self {
        let mut attributes = vec![Attribute {
            trait_type: "Artist",
            value: upload.artist.clone(),
        }];
        if let Some(genre) = upload.genre.as_ref().filter(|g| !g.is_empty()) {
            attributes.push(Attribute {
                trait_type: "Genre",
                value: genre.clone(),
            });
        }
        attributes.push(Attribute {
            trait_type: "Platform",
            value: APP_NAME.to_string(),
        });
        attributes.push(Attribute {
            trait_type: "Created",
            value: created.format("%Y-%m-%d").to_string(),
        });

        Self {
            name: upload.title.clone(),
            description: format!("{} - {}", upload.artist, upload.title),
            image: upload.artwork_url.clone().unwrap_or_default(),
            animation_url: upload.audio_url.clone(),
            attributes,
        }
    }
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PinReceipt {
    pub metadata_uri: String,
    /// always empty for real pins: only the metadata document is stored
    pub audio_hash: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub mock: bool,
}

pub trait Pinner: Send + Sync {
    fn pin(&self, upload: &UploadRequest, now: DateTime<Utc>) -> Result<PinReceipt, GatewayError>;

    fn is_live(&self) -> bool;
}

/// Hands out timestamp-derived placeholder hashes.
pub struct MockPinner;

impl Pinner for MockPinner {
    fn pin(&self, _upload: &UploadRequest, now: DateTime<Utc>) -> Result<PinReceipt, GatewayError> {
        let millis = now.timestamp_millis();
        Ok(PinReceipt {
            metadata_uri: format!("ipfs://QmDemo{millis}"),
            audio_hash: format!("QmAudio{millis}"),
            mock: true,
        })
    }

    fn is_live(&self) -> bool {
        false
    }
}

pub struct PinataPinner {
    http: Client,
    url: String,
    jwt: String,
}

impl PinataPinner {
    pub fn new(http: Client, url: String, jwt: String) -> Self {
        Self { http, url, jwt }
    }
}

#[derive(Deserialize)]
struct PinataResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}

impl Pinner for PinataPinner {
    // every failure here is internal: callers get a plain 500
    fn pin(&self, upload: &UploadRequest, now: DateTime<Utc>) -> Result<PinReceipt, GatewayError> {
        let metadata = NftMetadata::build(upload, now.date_naive());
        let body = json!({
            "pinataContent": metadata,
            "pinataMetadata": { "name": format!("zaounz-{}-metadata", upload.title) },
        });

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.jwt)
            .json(&body)
            .send()
            .context("Pinata request failed")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Pinata upload failed: {}", status.as_u16()).into());
        }

        let pinned: PinataResponse = response
            .json()
            .context("unexpected Pinata response")?;

        Ok(PinReceipt {
            metadata_uri: format!("ipfs://{}", pinned.ipfs_hash),
            audio_hash: String::new(),
            mock: false,
        })
    }

    fn is_live(&self) -> bool {
        true
    }
}
