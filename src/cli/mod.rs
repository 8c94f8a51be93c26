use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::gateway::{self, Backends};
use crate::http::server::HttpServer;

#[derive(Parser)]
#[command(name = "zaounz")]
#[command(version = "0.1")]
#[command(about = "API gateway for the ZAOUNZ music mini-app")]
pub struct Cli {
    /// Path to an optional config TOML file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP gateway
    Serve,
    /// Show which services are live and which are mocked
    Status,
}

/// Entrypoint for CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = Config::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Serve => {
            let backends = Backends::from_config(&cfg)?;
            let http_server = HttpServer::new(backends, cfg.app, cfg.http);

            println!(
                "ZAOUNZ API running at http://{}:{}",
                http_server.config.bind_addr, http_server.config.port
            );
            http_server.run();
        }

        Commands::Status => {
            let backends = Backends::from_config(&cfg)?;

            println!("Bind address:  {}:{}", cfg.http.bind_addr, cfg.http.port);
            println!("Public URL:    {}", cfg.app.public_url);
            println!("Discovery:     live ({})", cfg.upstream.audius_api);
            println!(
                "Generation:    {}",
                gateway::mode(backends.generator.is_live())
            );
            println!("Pinning:       {}", gateway::mode(backends.pinner.is_live()));
            println!("Minting:       demo (client-side wallet in production)");
            println!("Timeout:       {}s per upstream call", cfg.upstream.timeout_secs);
        }
    }

    Ok(())
}
