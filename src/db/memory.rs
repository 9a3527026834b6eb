//! In-process store with the same semantics as the MongoDB one
//!
//! Seeded from a JSON file (`{"contracts": [], "games": [], "accounts": []}`)
//! by the server's offline mode, and used directly by tests.

use std::path::Path;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::info;

use super::documents::parse_object_id;
use super::RentalStore;
use crate::error::{RentalError, Result};
use crate::models::{Account, Contract, ContractStatus, Game};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Seed {
    pub contracts: Vec<Contract>,
    pub games: Vec<Game>,
    pub accounts: Vec<Account>,
}

#[derive(Default)]
pub struct MemoryStore {
    contracts: RwLock<Vec<Contract>>,
    games: Vec<Game>,
    accounts: Vec<Account>,
}

fn contains_ignore_case(value: &str, needle: &str) -> bool {
    value.to_lowercase().contains(&needle.to_lowercase())
}

impl MemoryStore {
    pub fn new(seed: Seed) -> Self {
        Self {
            contracts: RwLock::new(seed.contracts),
            games: seed.games,
            accounts: seed.accounts,
        }
    }

    pub fn from_seed_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let seed: Seed = serde_json::from_str(&content)?;

        info!(
            "Loaded seed {}: {} contracts, {} games, {} accounts",
            path.display(),
            seed.contracts.len(),
            seed.games.len(),
            seed.accounts.len()
        );

        Ok(Self::new(seed))
    }
}

#[async_trait]
impl RentalStore for MemoryStore {
    async fn list_contracts(&self) -> Result<Vec<Contract>> {
        Ok(self.contracts.read().await.clone())
    }

    async fn get_contract(&self, id: &str) -> Result<Option<Contract>> {
        let contracts = self.contracts.read().await;
        Ok(contracts.iter().find(|c| c.id.as_deref() == Some(id)).cloned())
    }

    async fn create_contract(&self, mut contract: Contract) -> Result<Contract> {
        match &contract.id {
            Some(id) => {
                parse_object_id(id)?;
            }
            None => contract.id = Some(ObjectId::new().to_hex()),
        }
        if let Some(game_id) = &contract.game_id {
            parse_object_id(game_id)?;
        }

        let mut contracts = self.contracts.write().await;
        if contracts.iter().any(|c| c.id == contract.id) {
            return Err(RentalError::Conflict(format!(
                "contract {} already exists",
                contract.id.as_deref().unwrap_or_default()
            )));
        }
        contracts.push(contract.clone());
        Ok(contract)
    }

    async fn update_contract(&self, id: &str, mut contract: Contract) -> Result<bool> {
        let mut contracts = self.contracts.write().await;
        match contracts.iter_mut().find(|c| c.id.as_deref() == Some(id)) {
            Some(existing) => {
                contract.id = Some(id.to_string());
                *existing = contract;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_contract(&self, id: &str) -> Result<bool> {
        let mut contracts = self.contracts.write().await;
        let before = contracts.len();
        contracts.retain(|c| c.id.as_deref() != Some(id));
        Ok(contracts.len() < before)
    }

    async fn set_contract_status(&self, id: &str, status: ContractStatus) -> Result<bool> {
        let mut contracts = self.contracts.write().await;
        match contracts.iter_mut().find(|c| c.id.as_deref() == Some(id)) {
            Some(existing) => {
                existing.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_games(&self) -> Result<Vec<Game>> {
        Ok(self.games.clone())
    }

    async fn get_game(&self, id: &str) -> Result<Option<Game>> {
        Ok(self.games.iter().find(|g| g.id.as_deref() == Some(id)).cloned())
    }

    async fn list_games_by_title_substring(&self, needle: &str) -> Result<Vec<Game>> {
        Ok(self
            .games
            .iter()
            .filter(|g| contains_ignore_case(&g.title, needle))
            .cloned()
            .collect())
    }

    async fn list_accounts_by_username_substring(&self, needle: &str) -> Result<Vec<Account>> {
        Ok(self
            .accounts
            .iter()
            .filter(|a| contains_ignore_case(&a.username, needle))
            .cloned()
            .collect())
    }
}
