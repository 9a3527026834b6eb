//! Stored document shapes and their mapping to domain models
//!
//! Collections use PascalCase field names and ObjectId keys. Domain models
//! carry ids as hex strings, so every write path parses them here.

use chrono::{DateTime, NaiveDate, Utc};
use mongodb::bson::{oid::ObjectId, serde_helpers::chrono_datetime_as_bson_datetime, Bson};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::error::{RentalError, Result};
use crate::models::{Account, Contract, ContractStatus, Customer, Game};

pub fn parse_object_id(id: &str) -> Result<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| RentalError::InvalidId(id.to_string()))
}

/// Contract dates are written as `YYYY-MM-DD` strings; older records hold BSON dates
fn deserialize_stored_date<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Bson>::deserialize(deserializer)? {
        None | Some(Bson::Null) => Ok(None),
        Some(Bson::String(text)) => NaiveDate::parse_from_str(&text, "%Y-%m-%d")
            .map(Some)
            .map_err(D::Error::custom),
        Some(Bson::DateTime(at)) => Ok(Some(at.to_chrono().date_naive())),
        Some(other) => Err(D::Error::custom(format!("unsupported date value: {}", other))),
    }
}

fn parse_optional_id(id: Option<&str>) -> Result<Option<ObjectId>> {
    id.map(parse_object_id).transpose()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomerDocument {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ContractDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub game_id: Option<ObjectId>,
    pub status: Option<String>,
    pub customer_info: Option<CustomerDocument>,
    #[serde(deserialize_with = "deserialize_stored_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(deserialize_with = "deserialize_stored_date")]
    pub end_date: Option<NaiveDate>,
    pub payment_method: Option<String>,
    pub shipment_method: Option<String>,
    pub shipping_fee: Option<f64>,
    pub late_fee: Option<f64>,
    pub total_cost: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GameDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub genre: Vec<String>,
    pub platform: String,
    pub explore: Vec<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub release_date: DateTime<Utc>,
    pub developer: Vec<String>,
    pub publisher: String,
    pub description: String,
    #[serde(rename = "ESRBRating")]
    pub esrb_rating: String,
}

/// Only the account fields contract search needs; the rest are ignored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(rename = "UserName")]
    pub user_name: String,
    #[serde(rename = "ContractIds")]
    pub contract_ids: Option<Vec<String>>,
}

impl From<CustomerDocument> for Customer {
    fn from(doc: CustomerDocument) -> Self {
        Customer {
            name: doc.name,
            phone_number: doc.phone_number,
            email: doc.email,
            address: doc.address,
        }
    }
}

impl From<Customer> for CustomerDocument {
    fn from(customer: Customer) -> Self {
        CustomerDocument {
            name: customer.name,
            phone_number: customer.phone_number,
            email: customer.email,
            address: customer.address,
        }
    }
}

impl From<ContractDocument> for Contract {
    fn from(doc: ContractDocument) -> Self {
        let status = match doc.status.as_deref() {
            None => ContractStatus::Pending,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(
                    "Contract {:?} has unknown status '{}', treating as Pending",
                    doc.id, raw
                );
                ContractStatus::Pending
            }),
        };

        Contract {
            id: doc.id.map(|id| id.to_hex()),
            game_id: doc.game_id.map(|id| id.to_hex()),
            status,
            customer_info: doc.customer_info.map(Customer::from),
            start_date: doc.start_date,
            end_date: doc.end_date,
            payment_method: doc.payment_method,
            shipment_method: doc.shipment_method,
            shipping_fee: doc.shipping_fee,
            late_fee: doc.late_fee,
            total_cost: doc.total_cost,
        }
    }
}

impl TryFrom<Contract> for ContractDocument {
    type Error = RentalError;

    fn try_from(contract: Contract) -> Result<Self> {
        Ok(ContractDocument {
            id: parse_optional_id(contract.id.as_deref())?,
            game_id: parse_optional_id(contract.game_id.as_deref())?,
            status: Some(contract.status.to_string()),
            customer_info: contract.customer_info.map(CustomerDocument::from),
            start_date: contract.start_date,
            end_date: contract.end_date,
            payment_method: contract.payment_method,
            shipment_method: contract.shipment_method,
            shipping_fee: contract.shipping_fee,
            late_fee: contract.late_fee,
            total_cost: contract.total_cost,
        })
    }
}

impl From<GameDocument> for Game {
    fn from(doc: GameDocument) -> Self {
        Game {
            id: doc.id.map(|id| id.to_hex()),
            title: doc.title,
            genre: doc.genre,
            platform: doc.platform,
            explore: doc.explore,
            release_date: doc.release_date,
            developer: doc.developer,
            publisher: doc.publisher,
            description: doc.description,
            esrb_rating: doc.esrb_rating,
        }
    }
}

impl From<AccountDocument> for Account {
    fn from(doc: AccountDocument) -> Self {
        Account {
            id: doc.id.map(|id| id.to_hex()),
            username: doc.user_name,
            contract_ids: doc.contract_ids.unwrap_or_default(),
        }
    }
}
