//! Domain models for the rental service
//!
//! These are the shapes handlers and the contract finder work with. Ids are
//! hex strings here; the `db` module maps them to and from stored documents.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{RentalError, Result};

/// Rental lifecycle state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractStatus {
    #[default]
    Pending,
    Active,
    Completed,
    Canceled,
}

impl ContractStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractStatus::Pending => "Pending",
            ContractStatus::Active => "Active",
            ContractStatus::Completed => "Completed",
            ContractStatus::Canceled => "Canceled",
        }
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractStatus {
    type Err = RentalError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Pending" => Ok(ContractStatus::Pending),
            "Active" => Ok(ContractStatus::Active),
            "Completed" => Ok(ContractStatus::Completed),
            "Canceled" => Ok(ContractStatus::Canceled),
            other => Err(RentalError::Validation(format!("Unknown contract status: {}", other))),
        }
    }
}

/// Customer contact snapshot embedded in a contract
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl Customer {
    /// Fields considered by free-text search
    pub fn searchable_fields(&self) -> [Option<&str>; 4] {
        [
            self.name.as_deref(),
            self.email.as_deref(),
            self.address.as_deref(),
            self.phone_number.as_deref(),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub game_id: Option<String>,
    #[serde(default)]
    pub status: ContractStatus,
    #[serde(default)]
    pub customer_info: Option<Customer>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub shipment_method: Option<String>,
    #[serde(default)]
    pub shipping_fee: Option<f64>,
    #[serde(default)]
    pub late_fee: Option<f64>,
    #[serde(default)]
    pub total_cost: Option<f64>,
}

impl Contract {
    /// Reject records that must never reach the store
    pub fn validate(&self) -> Result<()> {
        let amounts = [
            ("shippingFee", self.shipping_fee),
            ("lateFee", self.late_fee),
            ("totalCost", self.total_cost),
        ];

        for (field, amount) in amounts {
            if let Some(value) = amount {
                if !value.is_finite() || value < 0.0 {
                    return Err(RentalError::Validation(format!(
                        "{} must be a non-negative amount, got {}",
                        field, value
                    )));
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub genre: Vec<String>,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub explore: Vec<String>,
    #[serde(default)]
    pub release_date: DateTime<Utc>,
    #[serde(default)]
    pub developer: Vec<String>,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub esrb_rating: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(default)]
    pub id: Option<String>,
    pub username: String,
    #[serde(default)]
    pub contract_ids: Vec<String>,
}
