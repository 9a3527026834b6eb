use std::{env, fmt::Display, str::FromStr};

use tracing::info;

use crate::error::{RentalError, Result};

/// Where the document store lives and which collections hold each record type
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub connection_string: String,
    pub database_name: String,
    pub contracts_collection_name: String,
    pub games_collection_name: String,
    pub accounts_collection_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
}

impl Config {
    /// Read settings from the process environment
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            host: try_load(&lookup, "GAME_RENTAL_HOST", "0.0.0.0")?,
            port: try_load(&lookup, "GAME_RENTAL_PORT", "8080")?,
            database: DatabaseConfig {
                connection_string: try_load(&lookup, "MONGODB_URI", "mongodb://localhost:27017")?,
                database_name: try_load(&lookup, "GAME_RENTAL_DATABASE", "GameRental")?,
                contracts_collection_name: try_load(&lookup, "CONTRACTS_COLLECTION", "Contracts")?,
                games_collection_name: try_load(&lookup, "GAMES_COLLECTION", "Games")?,
                accounts_collection_name: try_load(&lookup, "ACCOUNTS_COLLECTION", "Accounts")?,
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn try_load<F, T>(lookup: &F, key: &str, default: &str) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.trim()
        .parse()
        .map_err(|e| RentalError::Config(format!("Invalid {key} value '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.database.database_name, "GameRental");
        assert_eq!(config.database.contracts_collection_name, "Contracts");
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("GAME_RENTAL_PORT", "9000"),
            ("MONGODB_URI", "mongodb://db:27017"),
            ("GAMES_COLLECTION", "Catalog"),
        ]
        .into_iter()
        .collect();

        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.database.connection_string, "mongodb://db:27017");
        assert_eq!(config.database.games_collection_name, "Catalog");
    }

    #[test]
    fn test_invalid_port() {
        let result = Config::from_lookup(|key| {
            (key == "GAME_RENTAL_PORT").then(|| "eighty".to_string())
        });
        assert!(matches!(result, Err(RentalError::Config(_))));
    }
}
