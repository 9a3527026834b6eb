//! MongoDB connection setup

use mongodb::{bson::doc, options::ClientOptions, Client, Database};
use tracing::{error, info};

use crate::config::DatabaseConfig;
use crate::error::{RentalError, Result};

const APP_NAME: &str = "game-rental";

/// Connect to MongoDB and verify the server answers a ping
pub async fn init_database(config: &DatabaseConfig) -> Result<Database> {
    let mut options = ClientOptions::parse(&config.connection_string)
        .await
        .map_err(|e| RentalError::Config(format!("Invalid MongoDB connection string: {}", e)))?;
    options.app_name = Some(APP_NAME.to_string());

    let client = Client::with_options(options)
        .map_err(|e| RentalError::Config(format!("Failed to create MongoDB client: {}", e)))?;
    let database = client.database(&config.database_name);

    info!("Pinging MongoDB database '{}'", config.database_name);
    database
        .run_command(doc! { "ping": 1 }, None)
        .await
        .map_err(|e| {
            error!("MongoDB ping failed: {}", e);
            RentalError::Config(format!("MongoDB is not reachable: {}", e))
        })?;
    info!("Connected to MongoDB database '{}'", config.database_name);

    Ok(database)
}
