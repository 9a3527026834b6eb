//! Contract search - free-text lookup across contracts, games and accounts
//!
//! A contract matches a term when any of these hold:
//! - its game's title contains the term
//! - an account whose username contains the term lists the contract id
//! - the embedded customer's name, email, address or phone contains the term
//!
//! Matching is a case-insensitive substring test on the trimmed term. An
//! absent or blank term returns every contract in storage order.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::db::RentalStore;
use crate::error::Result;
use crate::models::{Account, Contract, Game};

/// Trim and lower-case a raw term. `None` means "no filtering".
pub fn normalize_term(term: Option<&str>) -> Option<String> {
    let trimmed = term?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Case-insensitive containment; `needle` must already be lower-cased.
fn contains_term(haystack: Option<&str>, needle: &str) -> bool {
    haystack.map_or(false, |value| value.to_lowercase().contains(needle))
}

/// Filter `contracts` by a raw search term.
///
/// `games` and `accounts` may be full collections or already narrowed by the
/// store; the title and username predicates are re-applied either way.
pub fn search(
    term: Option<&str>,
    contracts: Vec<Contract>,
    games: &[Game],
    accounts: &[Account],
) -> Vec<Contract> {
    match normalize_term(term) {
        Some(needle) => filter_contracts(contracts, &needle, games, accounts),
        None => contracts,
    }
}

/// Core join over the three collections with an already normalized term
pub fn filter_contracts(
    contracts: Vec<Contract>,
    needle: &str,
    games: &[Game],
    accounts: &[Account],
) -> Vec<Contract> {
    let game_ids: HashSet<&str> = games
        .iter()
        .filter(|game| contains_term(Some(game.title.as_str()), needle))
        .filter_map(|game| game.id.as_deref())
        .collect();

    let account_contract_ids: HashSet<&str> = accounts
        .iter()
        .filter(|account| contains_term(Some(account.username.as_str()), needle))
        .flat_map(|account| account.contract_ids.iter().map(String::as_str))
        .collect();

    debug!(
        "Search '{}': {} matching games, {} contract ids from accounts",
        needle,
        game_ids.len(),
        account_contract_ids.len()
    );

    contracts
        .into_iter()
        .filter(|contract| {
            let by_game = contract
                .game_id
                .as_deref()
                .map_or(false, |id| game_ids.contains(id));

            let by_account = contract
                .id
                .as_deref()
                .map_or(false, |id| account_contract_ids.contains(id));

            let by_customer = contract.customer_info.as_ref().map_or(false, |customer| {
                customer
                    .searchable_fields()
                    .into_iter()
                    .any(|field| contains_term(field, needle))
            });

            by_game || by_account || by_customer
        })
        .collect()
}

/// Runs contract searches against a store
#[derive(Clone)]
pub struct ContractFinder {
    store: Arc<dyn RentalStore>,
}

impl ContractFinder {
    pub fn new(store: Arc<dyn RentalStore>) -> Self {
        Self { store }
    }

    /// Search contracts by a free-text term.
    ///
    /// The three reads run concurrently; any failure fails the whole call and
    /// carries the term in effect.
    pub async fn search(&self, term: Option<&str>) -> Result<Vec<Contract>> {
        let Some(needle) = normalize_term(term) else {
            info!("Empty search term, returning all contracts");
            return self.store.list_contracts().await;
        };

        info!("Searching contracts (searchTerm: {})", needle);

        let (contracts, games, accounts) = tokio::try_join!(
            self.store.list_contracts(),
            self.store.list_games_by_title_substring(&needle),
            self.store.list_accounts_by_username_substring(&needle),
        )
        .map_err(|e| e.with_term(&needle))?;

        let matched = filter_contracts(contracts, &needle, &games, &accounts);

        info!(
            "Found {} contracts matching searchTerm: {}",
            matched.len(),
            needle
        );

        Ok(matched)
    }
}
