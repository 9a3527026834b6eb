//! Account lookups used by contract search

use futures::TryStreamExt;
use mongodb::{bson::Document, Collection, Database};
use tracing::{error, info};

use super::documents::AccountDocument;
use super::game_repo::substring_filter;
use crate::error::{RentalError, Result, StoreOperation};
use crate::models::Account;

pub struct AccountRepository {
    collection: Collection<AccountDocument>,
}

impl AccountRepository {
    pub fn new(database: &Database, collection_name: &str) -> Self {
        Self {
            collection: database.collection(collection_name),
        }
    }

    async fn find_documents(&self, filter: Document) -> mongodb::error::Result<Vec<AccountDocument>> {
        self.collection.find(filter, None).await?.try_collect().await
    }

    pub async fn find_by_username(&self, needle: &str) -> Result<Vec<Account>> {
        info!("Querying accounts with username containing: {}", needle);

        let documents = self.find_documents(substring_filter("UserName", needle)).await.map_err(|e| {
            error!(
                "An error occurred while searching accounts (searchTerm: {}): {}",
                needle, e
            );
            RentalError::store(StoreOperation::ListAccounts, e).with_term(needle)
        })?;

        info!("Retrieved {} accounts matching: {}", documents.len(), needle);

        Ok(documents.into_iter().map(Account::from).collect())
    }
}
