//! Game catalog reads

use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    Collection, Database,
};
use tracing::{error, info};

use super::documents::{parse_object_id, GameDocument};
use crate::error::{RentalError, Result, StoreOperation};
use crate::models::Game;

pub struct GameRepository {
    collection: Collection<GameDocument>,
}

/// Case-insensitive substring filter on one string field
pub(crate) fn substring_filter(field: &str, needle: &str) -> Document {
    let mut filter = Document::new();
    filter.insert(field, doc! { "$regex": regex::escape(needle), "$options": "i" });
    filter
}

impl GameRepository {
    pub fn new(database: &Database, collection_name: &str) -> Self {
        Self {
            collection: database.collection(collection_name),
        }
    }

    async fn find_documents(&self, filter: Document) -> mongodb::error::Result<Vec<GameDocument>> {
        self.collection.find(filter, None).await?.try_collect().await
    }

    pub async fn get_all(&self) -> Result<Vec<Game>> {
        info!("Querying games collection in database");

        let documents = self.find_documents(doc! {}).await.map_err(|e| {
            error!("An error occurred while retrieving games from database: {}", e);
            RentalError::store(StoreOperation::ListGames, e)
        })?;

        info!("Retrieved {} games from database", documents.len());

        Ok(documents.into_iter().map(Game::from).collect())
    }

    pub async fn get(&self, id: &str) -> Result<Option<Game>> {
        let oid = parse_object_id(id)?;

        info!("Querying game with id: {}", id);

        let document = self
            .collection
            .find_one(doc! { "_id": oid }, None)
            .await
            .map_err(|e| {
                error!("An error occurred while retrieving game with id: {} from database: {}", id, e);
                RentalError::store(StoreOperation::GetGame, e)
            })?;

        Ok(document.map(Game::from))
    }

    pub async fn find_by_title(&self, needle: &str) -> Result<Vec<Game>> {
        info!("Querying games with title containing: {}", needle);

        let documents = self
            .find_documents(substring_filter("Title", needle))
            .await
            .map_err(|e| {
                error!(
                    "An error occurred while searching games (searchTerm: {}): {}",
                    needle, e
                );
                RentalError::store(StoreOperation::ListGames, e).with_term(needle)
            })?;

        info!("Retrieved {} games matching: {}", documents.len(), needle);

        Ok(documents.into_iter().map(Game::from).collect())
    }
}
