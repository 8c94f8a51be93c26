use anyhow::{Context, bail};
use log::warn;
use reqwest::blocking::Client;
use serde_json::Value;
use url::Url;

use super::error::GatewayError;
use crate::domain::audius::APP_NAME;

const DEFAULT_TIME_RANGE: &str = "week";
/// genre filter value meaning "no filter"
const ALL_GENRES: &str = "All";

/// One of the three discovery listings, with its upstream query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feed {
    Trending { genre: Option<String>, time: String },
    Underground,
    Search { query: String },
}

impl Feed {
    pub fn trending(genre: Option<String>, time: Option<String>) -> Self {
        Feed::Trending {
            genre: genre.filter(|g| !g.is_empty() && g != ALL_GENRES),
            time: time
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_TIME_RANGE.to_string()),
        }
    }

    /// Fails before anything is sent upstream when the query is missing.
    pub fn search(query: Option<String>) -> Result<Self, GatewayError> {
        match query {
            Some(q) if !q.trim().is_empty() => Ok(Feed::Search { query: q }),
            _ => Err(GatewayError::Validation(
                "Query parameter q is required".into(),
            )),
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Feed::Trending { .. } => "/tracks/trending",
            Feed::Underground => "/tracks/trending/underground",
            Feed::Search { .. } => "/tracks/search",
        }
    }

    /// query parameters besides the app name
    pub fn params(&self) -> Vec<(&'static str, &str)> {
        match self {
            Feed::Trending { genre, time } => {
                let mut params = vec![("time", time.as_str())];
                if let Some(genre) = genre {
                    params.push(("genre", genre.as_str()));
                }
                params
            }
            Feed::Underground => Vec::new(),
            Feed::Search { query } => vec![("query", query.as_str())],
        }
    }

    fn failure_message(&self) -> &'static str {
        match self {
            Feed::Trending { .. } => "Failed to fetch trending tracks",
            Feed::Underground => "Failed to fetch underground tracks",
            Feed::Search { .. } => "Search failed",
        }
    }
}

pub trait Discovery: Send + Sync {
    /// Upstream JSON for `feed`, untouched.
    fn fetch(&self, feed: &Feed) -> anyhow::Result<Value>;
}

/// Fetches `feed`, turning any upstream trouble into [`GatewayError::Upstream`].
pub fn discover(discovery: &dyn Discovery, feed: &Feed) -> Result<Value, GatewayError> {
    discovery.fetch(feed).map_err(|e| {
        warn!("{} fetch error: {e:#}", feed.path());
        GatewayError::upstream(feed.failure_message())
    })
}

pub struct AudiusClient {
    http: Client,
    base: String,
}

impl AudiusClient {
    pub fn new(http: Client, base: String) -> Self {
        Self { http, base }
    }

    pub fn url_for(&self, feed: &Feed) -> anyhow::Result<Url> {
        let base = self.base.trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}{}", feed.path()))
            .with_context(|| format!("invalid discovery API base {base}"))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("app_name", APP_NAME);
            for (k, v) in feed.params() {
                query.append_pair(k, v);
            }
        }
        Ok(url)
    }
}

impl Discovery for AudiusClient {
    fn fetch(&self, feed: &Feed) -> anyhow::Result<Value> {
        let url = self.url_for(feed)?;
        let response = self.http.get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            bail!("Audius API error: {}", status.as_u16());
        }

        Ok(response.json()?)
    }
}
