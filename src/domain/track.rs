use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Genre picker value meaning "no particular genre".
pub const ANY_GENRE: &str = "Any";

const AI_TITLE_CHARS: usize = 50;

/// Where a track came from. Only affects how it is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackSource {
    AiGenerated,
    Audius,
    Upload,
}

/// Represent a playable (and mintable) track.
///
/// A track is a plain value: once built, nothing in it points at state
/// that can change underneath it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub audio_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artwork_url: Option<String>,
    pub source: TrackSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    /// seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_track_id: Option<String>,
}

impl Track {
    /// Builds the track produced by a generation request.
    ///
    /// The id is derived from `now`, so two tracks generated in the same
    /// millisecond share an id and the player treats them as the same track.
    pub fn ai_generated(
        prompt: &str,
        genre: Option<&str>,
        audio_url: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let title: String = prompt.chars().take(AI_TITLE_CHARS).collect();
        let title = if title.is_empty() {
            "AI Track".to_string()
        } else {
            title
        };

        Self {
            id: format!("ai-{}", now.timestamp_millis()),
            title,
            artist: "You".to_string(),
            audio_url: audio_url.into(),
            artwork_url: None,
            source: TrackSource::AiGenerated,
            genre: genre
                .filter(|g| !g.is_empty() && *g != ANY_GENRE)
                .map(str::to_string),
            duration: None,
            provider_track_id: None,
        }
    }

    /// Prompt actually sent to the generator: the genre, when picked, prefixes the text.
    pub fn generation_prompt(prompt: &str, genre: Option<&str>) -> String {
        match genre {
            Some(g) if !g.is_empty() && g != ANY_GENRE => format!("{g} style: {prompt}"),
            _ => prompt.to_string(),
        }
    }
}
