use serde::{Deserialize, Serialize};

use super::track::{Track, TrackSource};

/// Application identifier sent with every discovery API call.
pub const APP_NAME: &str = "ZAOUNZ";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Artwork {
    #[serde(rename = "150x150", default)]
    pub small: Option<String>,
    #[serde(rename = "480x480", default)]
    pub medium: Option<String>,
}

impl Artwork {
    /// prefers the larger size
    pub fn best(&self) -> Option<&str> {
        self.medium.as_deref().or(self.small.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudiusUser {
    pub name: String,
    pub handle: String,
}

/// The part of a discovery API track document the app cares about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudiusTrack {
    pub id: String,
    pub title: String,
    pub user: AudiusUser,
    #[serde(default)]
    pub artwork: Option<Artwork>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default)]
    pub play_count: u64,
    #[serde(default)]
    pub favorite_count: u64,
    #[serde(default)]
    pub repost_count: u64,
}

/// Envelope of every list endpoint: `{ "data": [...] }`.
#[derive(Debug, Deserialize)]
pub struct AudiusPage {
    #[serde(default)]
    pub data: Option<Vec<AudiusTrack>>,
}

impl AudiusPage {
    pub fn into_tracks(self) -> Vec<AudiusTrack> {
        self.data.unwrap_or_default()
    }
}

/// Streaming locator of a discovery track.
pub fn stream_url(api_base: &str, track_id: &str) -> String {
    let base = api_base.trim_end_matches('/');
    format!("{base}/tracks/{track_id}/stream?app_name={APP_NAME}")
}

impl AudiusTrack {
    pub fn into_track(self, api_base: &str) -> Track {
        let artwork_url = self
            .artwork
            .as_ref()
            .and_then(Artwork::best)
            .map(str::to_string);

        Track {
            audio_url: stream_url(api_base, &self.id),
            provider_track_id: Some(self.id.clone()),
            id: self.id,
            title: self.title,
            artist: self.user.name,
            artwork_url,
            source: TrackSource::Audius,
            genre: self.genre,
            duration: self.duration,
        }
    }
}
