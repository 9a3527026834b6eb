use std::fmt;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Store call that failed, used to annotate store errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    ListContracts,
    GetContract,
    CreateContract,
    UpdateContract,
    RemoveContract,
    SetContractStatus,
    ListGames,
    GetGame,
    ListAccounts,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StoreOperation::ListContracts => "list contracts",
            StoreOperation::GetContract => "get contract",
            StoreOperation::CreateContract => "create contract",
            StoreOperation::UpdateContract => "update contract",
            StoreOperation::RemoveContract => "remove contract",
            StoreOperation::SetContractStatus => "set contract status",
            StoreOperation::ListGames => "list games",
            StoreOperation::GetGame => "get game",
            StoreOperation::ListAccounts => "list accounts",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum RentalError {
    #[error("Store error ({operation}{}): {message}", term_suffix(.term))]
    Store {
        operation: StoreOperation,
        term: Option<String>,
        message: String,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn term_suffix(term: &Option<String>) -> String {
    match term {
        Some(term) => format!(", searchTerm: {}", term),
        None => String::new(),
    }
}

impl RentalError {
    pub fn store(operation: StoreOperation, err: impl fmt::Display) -> Self {
        RentalError::Store {
            operation,
            term: None,
            message: err.to_string(),
        }
    }

    /// Attach the search term in effect to a store error. Other variants pass through.
    pub fn with_term(self, search_term: &str) -> Self {
        match self {
            RentalError::Store {
                operation,
                term: None,
                message,
            } => RentalError::Store {
                operation,
                term: Some(search_term.to_string()),
                message,
            },
            other => other,
        }
    }
}

impl From<JsonRejection> for RentalError {
    fn from(rejection: JsonRejection) -> Self {
        RentalError::Validation(rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for RentalError {
    fn into_response(self) -> Response {
        let status = match self {
            RentalError::NotFound(_) => StatusCode::NOT_FOUND,
            RentalError::InvalidId(_) | RentalError::Validation(_) => StatusCode::BAD_REQUEST,
            RentalError::Conflict(_) => StatusCode::CONFLICT,
            RentalError::Store { .. }
            | RentalError::Config(_)
            | RentalError::Io(_)
            | RentalError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, RentalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_mentions_operation_and_term() {
        let error = RentalError::store(StoreOperation::ListGames, "connection reset").with_term("zelda");
        let message = error.to_string();
        assert!(message.contains("list games"));
        assert!(message.contains("zelda"));
        assert!(message.contains("connection reset"));
    }

    #[test]
    fn test_with_term_keeps_existing_term() {
        let error = RentalError::Store {
            operation: StoreOperation::ListAccounts,
            term: Some("first".to_string()),
            message: "timeout".to_string(),
        }
        .with_term("second");

        match error {
            RentalError::Store { term, .. } => assert_eq!(term.as_deref(), Some("first")),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            RentalError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            RentalError::InvalidId("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RentalError::Conflict("x".into()).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            RentalError::store(StoreOperation::ListContracts, "down")
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
