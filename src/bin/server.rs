//! HTTP server for the game rental API
//!
//! Run against MongoDB (settings from the environment or `.env`):
//!     cargo run --bin server
//!
//! Run offline against a JSON seed file:
//!     cargo run --bin server -- --seed seed.json

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use game_rental::api_server::{start_server, ApiState};
use game_rental::config::Config;
use game_rental::db::{init_database, MemoryStore, MongoStore, RentalStore};
use game_rental::RentalService;

#[derive(Parser)]
#[command(name = "game-rental-server")]
#[command(about = "REST API for game rental contracts")]
struct Args {
    /// Address to bind (overrides GAME_RENTAL_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides GAME_RENTAL_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Serve from an in-memory store loaded from this JSON file instead of MongoDB
    #[arg(long)]
    seed: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    let store: Arc<dyn RentalStore> = match &args.seed {
        Some(path) => {
            info!("Using in-memory store seeded from {}", path.display());
            Arc::new(
                MemoryStore::from_seed_file(path)
                    .with_context(|| format!("Failed to load seed file {}", path.display()))?,
            )
        }
        None => {
            info!(
                "Using MongoDB database '{}'",
                config.database.database_name
            );
            let database = init_database(&config.database).await?;
            Arc::new(MongoStore::new(&database, &config.database))
        }
    };

    let state = ApiState {
        service: RentalService::new(store),
    };

    start_server(&config.bind_address(), state).await?;

    Ok(())
}
