//! Rental operations exposed to the HTTP layer
//!
//! Validation and not-found mapping happen here, above any store.

use std::sync::Arc;

use tracing::info;

use crate::db::{parse_object_id, RentalStore};
use crate::error::{RentalError, Result};
use crate::models::{Contract, ContractStatus, Game};
use crate::search::ContractFinder;

#[derive(Clone)]
pub struct RentalService {
    store: Arc<dyn RentalStore>,
    finder: ContractFinder,
}

impl RentalService {
    pub fn new(store: Arc<dyn RentalStore>) -> Self {
        Self {
            finder: ContractFinder::new(store.clone()),
            store,
        }
    }

    pub async fn list_contracts(&self) -> Result<Vec<Contract>> {
        self.store.list_contracts().await
    }

    pub async fn search_contracts(&self, term: Option<&str>) -> Result<Vec<Contract>> {
        self.finder.search(term).await
    }

    pub async fn get_contract(&self, id: &str) -> Result<Contract> {
        parse_object_id(id)?;
        self.store
            .get_contract(id)
            .await?
            .ok_or_else(|| RentalError::NotFound(format!("contract {}", id)))
    }

    pub async fn create_contract(&self, contract: Contract) -> Result<Contract> {
        contract.validate()?;
        self.store.create_contract(contract).await
    }

    pub async fn update_contract(&self, id: &str, contract: Contract) -> Result<()> {
        parse_object_id(id)?;
        contract.validate()?;
        if let Some(game_id) = &contract.game_id {
            parse_object_id(game_id)?;
        }
        found(self.store.update_contract(id, contract).await?, id)
    }

    pub async fn remove_contract(&self, id: &str) -> Result<()> {
        parse_object_id(id)?;
        found(self.store.remove_contract(id).await?, id)
    }

    pub async fn activate_contract(&self, id: &str) -> Result<()> {
        self.set_status(id, ContractStatus::Active).await
    }

    pub async fn complete_contract(&self, id: &str) -> Result<()> {
        self.set_status(id, ContractStatus::Completed).await
    }

    pub async fn cancel_contract(&self, id: &str) -> Result<()> {
        self.set_status(id, ContractStatus::Canceled).await
    }

    // No transition graph: any status may be set from any other
    async fn set_status(&self, id: &str, status: ContractStatus) -> Result<()> {
        parse_object_id(id)?;
        found(self.store.set_contract_status(id, status).await?, id)?;
        info!("Contract {} is now {}", id, status);
        Ok(())
    }

    pub async fn list_games(&self) -> Result<Vec<Game>> {
        self.store.list_games().await
    }

    pub async fn get_game(&self, id: &str) -> Result<Game> {
        parse_object_id(id)?;
        self.store
            .get_game(id)
            .await?
            .ok_or_else(|| RentalError::NotFound(format!("game {}", id)))
    }
}

fn found(matched: bool, id: &str) -> Result<()> {
    if matched {
        Ok(())
    } else {
        Err(RentalError::NotFound(format!("contract {}", id)))
    }
}
