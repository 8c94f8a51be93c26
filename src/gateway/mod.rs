//! Stateless translation between the app's API and the third-party services.
//!
//! Which implementation backs each capability is decided once, at startup,
//! from the configured credentials. Handlers never branch on credentials.

use anyhow::Context;
use log::info;
use reqwest::blocking::Client;

use crate::config::Config;

pub mod discover;
pub mod error;
#[cfg(test)]
pub(crate) mod fake_upstream;
pub mod frame;
pub mod generate;
pub mod mint;
pub mod pin;

use discover::{AudiusClient, Discovery};
use generate::{Generator, HuggingFaceGenerator, MockGenerator};
use mint::{DemoMinter, Minter};
use pin::{MockPinner, PinataPinner, Pinner};

pub struct Backends {
    pub generator: Box<dyn Generator>,
    pub pinner: Box<dyn Pinner>,
    pub minter: Box<dyn Minter>,
    pub discovery: Box<dyn Discovery>,
}

impl Backends {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(config.upstream.timeout())
            .user_agent(concat!("zaounz/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        let generator: Box<dyn Generator> = match &config.secrets.hf_token {
            Some(token) => Box::new(HuggingFaceGenerator::new(
                http.clone(),
                config.upstream.huggingface_url.clone(),
                token.clone(),
            )),
            None => Box::new(MockGenerator),
        };

        let pinner: Box<dyn Pinner> = match &config.secrets.pinata_jwt {
            Some(jwt) => Box::new(PinataPinner::new(
                http.clone(),
                config.upstream.pinata_url.clone(),
                jwt.clone(),
            )),
            None => Box::new(MockPinner),
        };

        let backends = Self {
            generator,
            pinner,
            minter: Box::new(DemoMinter),
            discovery: Box::new(AudiusClient::new(http, config.upstream.audius_api.clone())),
        };
        info!(
            "generation: {}, pinning: {}, minting: demo",
            mode(backends.generator.is_live()),
            mode(backends.pinner.is_live())
        );
        Ok(backends)
    }
}

pub fn mode(live: bool) -> &'static str {
    if live { "live" } else { "mock" }
}
