//! Contract repository for MongoDB operations

use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    error::{ErrorKind, WriteFailure},
    Collection, Database,
};
use tracing::{error, info};

use super::documents::{parse_object_id, ContractDocument};
use crate::error::{RentalError, Result, StoreOperation};
use crate::models::{Contract, ContractStatus};

const DUPLICATE_KEY: i32 = 11000;

fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    matches!(
        e.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

pub struct ContractRepository {
    collection: Collection<ContractDocument>,
}

impl ContractRepository {
    pub fn new(database: &Database, collection_name: &str) -> Self {
        Self {
            collection: database.collection(collection_name),
        }
    }

    async fn find_documents(&self, filter: Document) -> mongodb::error::Result<Vec<ContractDocument>> {
        self.collection.find(filter, None).await?.try_collect().await
    }

    pub async fn get_all(&self) -> Result<Vec<Contract>> {
        info!("Querying contracts collection in database");

        let documents = self.find_documents(doc! {}).await.map_err(|e| {
            error!("An error occurred while retrieving contracts from database: {}", e);
            RentalError::store(StoreOperation::ListContracts, e)
        })?;

        info!("Retrieved {} contracts from database", documents.len());

        Ok(documents.into_iter().map(Contract::from).collect())
    }

    pub async fn get(&self, id: &str) -> Result<Option<Contract>> {
        let oid = parse_object_id(id)?;

        info!("Querying contract with id: {}", id);

        let document = self
            .collection
            .find_one(doc! { "_id": oid }, None)
            .await
            .map_err(|e| {
                error!("An error occurred while retrieving contract with id: {} from database: {}", id, e);
                RentalError::store(StoreOperation::GetContract, e)
            })?;

        match &document {
            Some(_) => info!("Retrieved contract with id: {}", id),
            None => info!("No contract with id: {}", id),
        }

        Ok(document.map(Contract::from))
    }

    pub async fn create(&self, contract: Contract) -> Result<Contract> {
        let mut document = ContractDocument::try_from(contract)?;

        info!("Creating new contract");

        let result = self.collection.insert_one(&document, None).await.map_err(|e| {
            error!("An error occurred while creating a new contract: {}", e);
            if is_duplicate_key(&e) {
                RentalError::Conflict(format!("contract {:?} already exists", document.id))
            } else {
                RentalError::store(StoreOperation::CreateContract, e)
            }
        })?;

        if document.id.is_none() {
            document.id = result.inserted_id.as_object_id();
        }

        let created = Contract::from(document);
        info!("Created new contract with id: {:?}", created.id);

        Ok(created)
    }

    pub async fn update(&self, id: &str, contract: Contract) -> Result<bool> {
        let oid = parse_object_id(id)?;
        let mut document = ContractDocument::try_from(contract)?;
        document.id = Some(oid);

        info!("Updating contract with id: {}", id);

        let result = self
            .collection
            .replace_one(doc! { "_id": oid }, &document, None)
            .await
            .map_err(|e| {
                error!("An error occurred while updating contract with id: {}: {}", id, e);
                RentalError::store(StoreOperation::UpdateContract, e)
            })?;

        info!(
            "Updated contract with id: {} (matched {})",
            id, result.matched_count
        );

        Ok(result.matched_count > 0)
    }

    pub async fn remove(&self, id: &str) -> Result<bool> {
        let oid = parse_object_id(id)?;

        info!("Removing contract with id: {}", id);

        let result = self
            .collection
            .delete_one(doc! { "_id": oid }, None)
            .await
            .map_err(|e| {
                error!("An error occurred while removing contract with id: {}: {}", id, e);
                RentalError::store(StoreOperation::RemoveContract, e)
            })?;

        info!(
            "Removed contract with id: {} (deleted {})",
            id, result.deleted_count
        );

        Ok(result.deleted_count > 0)
    }

    /// Set only the status field, leaving the rest of the record untouched
    pub async fn set_status(&self, id: &str, status: ContractStatus) -> Result<bool> {
        let oid = parse_object_id(id)?;

        info!("Setting status of contract with id: {} to {}", id, status);

        let result = self
            .collection
            .update_one(
                doc! { "_id": oid },
                doc! { "$set": { "Status": status.as_str() } },
                None,
            )
            .await
            .map_err(|e| {
                error!("An error occurred while updating contract with id: {}: {}", id, e);
                RentalError::store(StoreOperation::SetContractStatus, e)
            })?;

        info!(
            "Updated contract with id: {} (matched {})",
            id, result.matched_count
        );

        Ok(result.matched_count > 0)
    }
}
