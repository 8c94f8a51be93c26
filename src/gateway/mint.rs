//! Placeholder mint endpoint.
//!
//! Real minting is signed client-side by the user's wallet. Nothing here
//! touches a chain: the address is random and the token id is always 1.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::GatewayError;
use crate::domain::address::ContractAddress;

pub const CHAIN: &str = "base";
pub const DEMO_TOKEN_ID: &str = "1";
pub const DEMO_MESSAGE: &str =
    "Demo mode - in production, minting happens client-side via wallet";

/// Accepted as-is; fields are echoed back without validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MintRequest {
    pub title: Value,
    pub metadata_uri: Value,
    pub price: Value,
    pub supply: Value,
}

#[derive(Debug, Serialize)]
pub struct MintConfig {
    pub title: Value,
    pub price: Value,
    pub supply: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MintReceipt {
    pub contract_address: ContractAddress,
    pub token_id: String,
    pub chain: &'static str,
    pub metadata_uri: Value,
    pub config: MintConfig,
    pub message: &'static str,
}

pub trait Minter: Send + Sync {
    fn mint(&self, request: MintRequest) -> Result<MintReceipt, GatewayError>;
}

pub struct DemoMinter;

impl Minter for DemoMinter {
    fn mint(&self, request: MintRequest) -> Result<MintReceipt, GatewayError> {
        Ok(MintReceipt {
            contract_address: ContractAddress::random(&mut rand::thread_rng()),
            token_id: DEMO_TOKEN_ID.to_string(),
            chain: CHAIN,
            metadata_uri: request.metadata_uri,
            config: MintConfig {
                title: request.title,
                price: request.price,
                supply: request.supply,
            },
            message: DEMO_MESSAGE,
        })
    }
}
