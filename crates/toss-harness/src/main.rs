//! Standalone mock server.
//!
//! Starts the configured ports, optionally preloads interactions from a JSON
//! array file and serves until Ctrl-C.
//!
//! Usage:
//!   toss-mock --port 9393 --interactions interactions.json

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use toss_harness::{HarnessConfig, Interaction, MockServer};
use tracing::{info, warn};

/// Toss mock server
#[derive(Parser, Debug)]
#[command(name = "toss-mock")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML configuration file
    #[arg(short, long, env = "TOSS_CONFIG")]
    config: Option<PathBuf>,

    /// Port to serve (repeatable); added to the configured ports
    #[arg(short, long = "port", env = "TOSS_PORTS", value_delimiter = ',')]
    ports: Vec<u16>,

    /// JSON file holding an array of interactions to preload
    #[arg(short, long, env = "TOSS_INTERACTIONS")]
    interactions: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => HarnessConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => HarnessConfig::default(),
    };

    let mut ports = config.mock.ports.clone();
    for port in args.ports {
        if !ports.contains(&port) {
            ports.push(port);
        }
    }
    if ports.is_empty() {
        anyhow::bail!("No ports to serve; pass --port or list mock.ports in the config");
    }

    let server = MockServer::new(&config.mock);
    for port in &ports {
        server.start(*port).await?;
    }

    if let Some(path) = &args.interactions {
        let interactions = load_interactions(path)?;
        let total = interactions.len();
        let mut loaded = 0;
        for interaction in interactions {
            if server.add_interaction(interaction) {
                loaded += 1;
            }
        }
        if loaded < total {
            warn!("{} of {} interactions target ports that are not served", total - loaded, total);
        }
        info!("Loaded {} interactions from {}", loaded, path.display());
    }

    info!("Serving ports {:?}, press Ctrl-C to stop", server.ports());
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    info!("Shutting down");
    server.stop_all().await;
    Ok(())
}

fn load_interactions(path: &Path) -> anyhow::Result<Vec<Interaction>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let interactions = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse interactions in {}", path.display()))?;
    Ok(interactions)
}
