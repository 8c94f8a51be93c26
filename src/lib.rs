pub mod cli;
pub mod config;
pub mod domain;
pub mod gateway;
pub mod http;
mod public_endpoint;
pub mod session;
