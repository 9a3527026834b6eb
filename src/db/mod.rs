//! Document store access
//!
//! `RentalStore` is the seam between the service and storage. `MongoStore`
//! bundles one repository per MongoDB collection; `MemoryStore` keeps the same
//! data in process for tests and offline runs.

pub mod account_repo;
pub mod connection;
pub mod contract_repo;
pub mod documents;
pub mod game_repo;
pub mod memory;

use async_trait::async_trait;
use mongodb::Database;

use crate::config::DatabaseConfig;
use crate::error::Result;
use crate::models::{Account, Contract, ContractStatus, Game};

pub use account_repo::AccountRepository;
pub use connection::init_database;
pub use contract_repo::ContractRepository;
pub use documents::parse_object_id;
pub use game_repo::GameRepository;
pub use memory::{MemoryStore, Seed};

#[async_trait]
pub trait RentalStore: Send + Sync {
    async fn list_contracts(&self) -> Result<Vec<Contract>>;

    async fn get_contract(&self, id: &str) -> Result<Option<Contract>>;

    /// Insert a contract and return it with its assigned id
    async fn create_contract(&self, contract: Contract) -> Result<Contract>;

    /// Replace a whole record. Returns false when no contract has `id`.
    async fn update_contract(&self, id: &str, contract: Contract) -> Result<bool>;

    async fn remove_contract(&self, id: &str) -> Result<bool>;

    async fn set_contract_status(&self, id: &str, status: ContractStatus) -> Result<bool>;

    async fn list_games(&self) -> Result<Vec<Game>>;

    async fn get_game(&self, id: &str) -> Result<Option<Game>>;

    /// Games whose title contains `needle`, ignoring case
    async fn list_games_by_title_substring(&self, needle: &str) -> Result<Vec<Game>>;

    /// Accounts whose username contains `needle`, ignoring case
    async fn list_accounts_by_username_substring(&self, needle: &str) -> Result<Vec<Account>>;
}

/// MongoDB-backed store
pub struct MongoStore {
    contracts: ContractRepository,
    games: GameRepository,
    accounts: AccountRepository,
}

impl MongoStore {
    pub fn new(database: &Database, config: &DatabaseConfig) -> Self {
        Self {
            contracts: ContractRepository::new(database, &config.contracts_collection_name),
            games: GameRepository::new(database, &config.games_collection_name),
            accounts: AccountRepository::new(database, &config.accounts_collection_name),
        }
    }
}

#[async_trait]
impl RentalStore for MongoStore {
    async fn list_contracts(&self) -> Result<Vec<Contract>> {
        self.contracts.get_all().await
    }

    async fn get_contract(&self, id: &str) -> Result<Option<Contract>> {
        self.contracts.get(id).await
    }

    async fn create_contract(&self, contract: Contract) -> Result<Contract> {
        self.contracts.create(contract).await
    }

    async fn update_contract(&self, id: &str, contract: Contract) -> Result<bool> {
        self.contracts.update(id, contract).await
    }

    async fn remove_contract(&self, id: &str) -> Result<bool> {
        self.contracts.remove(id).await
    }

    async fn set_contract_status(&self, id: &str, status: ContractStatus) -> Result<bool> {
        self.contracts.set_status(id, status).await
    }

    async fn list_games(&self) -> Result<Vec<Game>> {
        self.games.get_all().await
    }

    async fn get_game(&self, id: &str) -> Result<Option<Game>> {
        self.games.get(id).await
    }

    async fn list_games_by_title_substring(&self, needle: &str) -> Result<Vec<Game>> {
        self.games.find_by_title(needle).await
    }

    async fn list_accounts_by_username_substring(&self, needle: &str) -> Result<Vec<Account>> {
        self.accounts.find_by_username(needle).await
    }
}
