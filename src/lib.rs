//! Game rental backend
//!
//! Tracks the game catalog, customer accounts and rental contracts in MongoDB
//! and serves them over a REST API for the admin UI.

pub mod api_server;
pub mod config;
pub mod error;
pub mod models;
pub mod search;
pub mod service;

// Database module for MongoDB
pub mod db;

pub use error::{RentalError, Result};
pub use search::ContractFinder;
pub use service::RentalService;
