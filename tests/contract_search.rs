use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use game_rental::db::{MemoryStore, RentalStore, Seed};
use game_rental::error::{RentalError, Result, StoreOperation};
use game_rental::models::{Account, Contract, ContractStatus, Customer, Game};
use game_rental::ContractFinder;

struct Fixture {
    seed: Seed,
    alice_contract: String,
    bob_contract: String,
    orphan_contract: String,
}

fn fixture() -> Fixture {
    let chrono = ObjectId::new().to_hex();
    let tetris = ObjectId::new().to_hex();
    let alice_contract = ObjectId::new().to_hex();
    let bob_contract = ObjectId::new().to_hex();
    let orphan_contract = ObjectId::new().to_hex();

    let seed = Seed {
        contracts: vec![
            Contract {
                id: Some(alice_contract.clone()),
                game_id: Some(chrono.clone()),
                status: ContractStatus::Active,
                customer_info: Some(Customer {
                    name: Some("Alice".to_string()),
                    email: Some("alice@example.com".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            },
            Contract {
                id: Some(bob_contract.clone()),
                game_id: Some(tetris.clone()),
                customer_info: Some(Customer {
                    name: Some("Bob".to_string()),
                    address: Some("7 Harbor Road".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            },
            Contract {
                id: Some(orphan_contract.clone()),
                game_id: None,
                customer_info: None,
                ..Default::default()
            },
        ],
        games: vec![
            Game {
                id: Some(chrono),
                title: "Chrono Trigger".to_string(),
                ..Default::default()
            },
            Game {
                id: Some(tetris),
                title: "Tetris".to_string(),
                ..Default::default()
            },
        ],
        accounts: vec![Account {
            id: Some(ObjectId::new().to_hex()),
            username: "NightOwl".to_string(),
            contract_ids: vec![orphan_contract.clone()],
        }],
    };

    Fixture {
        seed,
        alice_contract,
        bob_contract,
        orphan_contract,
    }
}

fn ids(contracts: &[Contract]) -> Vec<String> {
    contracts.iter().filter_map(|c| c.id.clone()).collect()
}

/// Delegates to a memory store but fails one chosen read
struct FailingStore {
    inner: MemoryStore,
    failing: StoreOperation,
}

impl FailingStore {
    fn check(&self, operation: StoreOperation) -> Result<()> {
        if operation == self.failing {
            Err(RentalError::store(operation, "connection reset by peer"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RentalStore for FailingStore {
    async fn list_contracts(&self) -> Result<Vec<Contract>> {
        self.check(StoreOperation::ListContracts)?;
        self.inner.list_contracts().await
    }

    async fn get_contract(&self, id: &str) -> Result<Option<Contract>> {
        self.inner.get_contract(id).await
    }

    async fn create_contract(&self, contract: Contract) -> Result<Contract> {
        self.inner.create_contract(contract).await
    }

    async fn update_contract(&self, id: &str, contract: Contract) -> Result<bool> {
        self.inner.update_contract(id, contract).await
    }

    async fn remove_contract(&self, id: &str) -> Result<bool> {
        self.inner.remove_contract(id).await
    }

    async fn set_contract_status(&self, id: &str, status: ContractStatus) -> Result<bool> {
        self.inner.set_contract_status(id, status).await
    }

    async fn list_games(&self) -> Result<Vec<Game>> {
        self.inner.list_games().await
    }

    async fn get_game(&self, id: &str) -> Result<Option<Game>> {
        self.inner.get_game(id).await
    }

    async fn list_games_by_title_substring(&self, needle: &str) -> Result<Vec<Game>> {
        self.check(StoreOperation::ListGames)?;
        self.inner.list_games_by_title_substring(needle).await
    }

    async fn list_accounts_by_username_substring(&self, needle: &str) -> Result<Vec<Account>> {
        self.check(StoreOperation::ListAccounts)?;
        self.inner.list_accounts_by_username_substring(needle).await
    }
}

#[tokio::test]
async fn test_blank_terms_return_everything_in_order() {
    let fixture = fixture();
    let expected = fixture.seed.contracts.clone();
    let finder = ContractFinder::new(Arc::new(MemoryStore::new(fixture.seed)));

    for term in [None, Some(""), Some(" "), Some("   ")] {
        assert_eq!(finder.search(term).await.unwrap(), expected);
    }
}

#[tokio::test]
async fn test_matches_by_game_title_customer_and_account() {
    let fixture = fixture();
    let finder = ContractFinder::new(Arc::new(MemoryStore::new(fixture.seed)));

    let by_game = finder.search(Some("Chrono")).await.unwrap();
    assert_eq!(ids(&by_game), vec![fixture.alice_contract.clone()]);

    let by_address = finder.search(Some("harbor")).await.unwrap();
    assert_eq!(ids(&by_address), vec![fixture.bob_contract.clone()]);

    let by_account = finder.search(Some("nightowl")).await.unwrap();
    assert_eq!(ids(&by_account), vec![fixture.orphan_contract.clone()]);

    assert!(finder.search(Some("xyz")).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_upper_and_lower_case_terms_agree() {
    let fixture = fixture();
    let finder = ContractFinder::new(Arc::new(MemoryStore::new(fixture.seed)));

    let upper = finder.search(Some("TETRIS")).await.unwrap();
    let lower = finder.search(Some("tetris")).await.unwrap();
    assert_eq!(upper, lower);
    assert_eq!(ids(&upper), vec![fixture.bob_contract]);
}

#[tokio::test]
async fn test_term_matching_several_criteria_returns_union_in_storage_order() {
    let fixture = fixture();
    let finder = ContractFinder::new(Arc::new(MemoryStore::new(fixture.seed)));

    // "o" hits Alice's game title, Bob's name and the account username
    let result = finder.search(Some("o")).await.unwrap();
    assert_eq!(
        ids(&result),
        vec![
            fixture.alice_contract,
            fixture.bob_contract,
            fixture.orphan_contract
        ]
    );
}

#[tokio::test]
async fn test_failed_read_fails_whole_search_with_term() {
    for failing in [
        StoreOperation::ListContracts,
        StoreOperation::ListGames,
        StoreOperation::ListAccounts,
    ] {
        let store = FailingStore {
            inner: MemoryStore::new(fixture().seed),
            failing,
        };
        let finder = ContractFinder::new(Arc::new(store));

        match finder.search(Some("  Chrono ")).await {
            Err(RentalError::Store {
                operation, term, ..
            }) => {
                assert_eq!(operation, failing);
                assert_eq!(term.as_deref(), Some("chrono"));
            }
            other => panic!("expected store error for {}, got {:?}", failing, other),
        }
    }
}

#[tokio::test]
async fn test_blank_term_only_reads_contracts() {
    let store = FailingStore {
        inner: MemoryStore::new(fixture().seed),
        failing: StoreOperation::ListGames,
    };
    let finder = ContractFinder::new(Arc::new(store));

    assert_eq!(finder.search(None).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_demo_seed_loads_and_searches() {
    let store = MemoryStore::from_seed_file("demos/seed.json").unwrap();
    let finder = ContractFinder::new(Arc::new(store));

    assert_eq!(finder.search(None).await.unwrap().len(), 2);

    let by_account = finder.search(Some("NIGHT")).await.unwrap();
    assert_eq!(ids(&by_account), vec!["65a1f0c2e4b0a1b2c3d4e702".to_string()]);
}
