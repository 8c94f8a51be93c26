use std::{path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_AUDIUS_API: &str = "https://discoveryprovider.audius.co/v1";
pub const DEFAULT_HUGGINGFACE_URL: &str =
    "https://api-inference.huggingface.co/models/ACE-Step/ACE-Step-v1-3.5B";
pub const DEFAULT_PINATA_URL: &str = "https://api.pinata.cloud/pinning/pinJSONToIPFS";
pub const DEFAULT_APP_URL: &str = "https://zaounz.xyz";

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub app: AppConfig,
    pub upstream: UpstreamConfig,
    /// never read from the file, only from the environment
    #[serde(skip)]
    pub secrets: Secrets,
}

impl Config {
    /// Loads the TOML file (if any) and applies the process environment on top.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Config> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Config::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&contents).with_context(|| "Failed to parse config TOML")
    }

    /// `PORT` and `APP_URL` override the file; `HF_TOKEN` and `PINATA_JWT`
    /// are the credentials. Empty values count as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(port) = get("PORT") {
            self.http.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT is not a valid port: {port}"))?;
        }
        if let Some(url) = get("APP_URL") {
            self.app.public_url = url;
        }
        self.secrets = Secrets {
            hf_token: get("HF_TOKEN"),
            pinata_jwt: get("PINATA_JWT"),
        };
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub bind_addr: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 3001,
        }
    }
}

/// Where the app is publicly reachable; used in share links.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub public_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            public_url: DEFAULT_APP_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct UpstreamConfig {
    /// applies to every outgoing call
    pub timeout_secs: u64,
    pub audius_api: String,
    pub huggingface_url: String,
    pub pinata_url: String,
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            audius_api: DEFAULT_AUDIUS_API.to_string(),
            huggingface_url: DEFAULT_HUGGINGFACE_URL.to_string(),
            pinata_url: DEFAULT_PINATA_URL.to_string(),
        }
    }
}

#[derive(Clone, Default)]
pub struct Secrets {
    pub hf_token: Option<String>,
    pub pinata_jwt: Option<String>,
}

// keeps tokens out of logs
impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("hf_token", &self.hf_token.as_ref().map(|_| "<set>"))
            .field("pinata_jwt", &self.pinata_jwt.as_ref().map(|_| "<set>"))
            .finish()
    }
}
