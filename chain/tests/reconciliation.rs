//! Wallet reconciliation against mocked contract reads

use std::sync::Arc;

use chain::types::CollectionInfo;
use chain::{
    ChainError, ChainReconciler, MockContractReader, MockMetadataFetcher, PacingConfig,
    RetryPolicy,
};
use shared::{ProviderFailure, TokenMetadata};

const CREATOR: &str = "0x1111111111111111111111111111111111111111";
const CONTRACT: &str = "0x2222222222222222222222222222222222222222";
const EXPLORER: &str = "https://testnet.monadexplorer.com";

fn info(id_name: &str) -> CollectionInfo {
    CollectionInfo {
        contract_address: CONTRACT.to_string(),
        name: id_name.to_string(),
        symbol: "ART".to_string(),
        description: "test collection".to_string(),
        creator: CREATOR.to_string(),
        max_supply: 100,
        mint_price: "10000000000000000".to_string(),
        created_at: 1700000000,
        is_active: true,
    }
}

fn reconciler(
    reader: MockContractReader,
    metadata: MockMetadataFetcher,
) -> ChainReconciler {
    ChainReconciler::new(Arc::new(reader), Arc::new(metadata), EXPLORER)
        .with_retry(RetryPolicy::immediate())
        .with_pacing(PacingConfig::immediate())
}

#[tokio::test]
async fn happy_path_mirrors_collections_and_capped_tokens() {
    let mut reader = MockContractReader::new();
    reader
        .expect_creator_collections()
        .withf(|creator| creator == CREATOR)
        .times(1)
        .returning(|_| Ok(vec![1]));
    reader
        .expect_collection_info()
        .withf(|&id| id == 1)
        .times(1)
        .returning(|_| Ok(info("Dragons")));
    reader
        .expect_total_supply()
        .withf(|contract| contract == CONTRACT)
        .times(1)
        .returning(|_| Ok(10));
    // Supply 10 but only token ids 1..=3 are read
    reader
        .expect_token_uri()
        .withf(|contract, token_id| contract == CONTRACT && (1..=3).contains(token_id))
        .times(3)
        .returning(|_, token_id| Ok(format!("ipfs://QmHash/{token_id}.json")));

    let mut metadata = MockMetadataFetcher::new();
    metadata.expect_fetch().times(3).returning(|uri| {
        Ok(TokenMetadata {
            name: Some(format!("Dragon {uri}")),
            description: Some("fierce".to_string()),
            image: Some("ipfs://QmImg".to_string()),
        })
    });

    let snapshot = reconciler(reader, metadata)
        .load_user_data(CREATOR)
        .await
        .unwrap();

    assert_eq!(snapshot.collections.len(), 1);
    let collection = &snapshot.collections[0];
    assert_eq!(collection.id, 1);
    assert_eq!(collection.current_supply, 10);
    assert_eq!(collection.mint_price, "10000000000000000");

    assert_eq!(snapshot.tokens.len(), 3);
    let token = &snapshot.tokens[0];
    assert_eq!(token.id, format!("{CONTRACT}-1"));
    assert_eq!(token.owner, CREATOR);
    assert_eq!(token.explorer_url, format!("{EXPLORER}/token/{CONTRACT}"));
    assert_eq!(
        snapshot.message.as_deref(),
        Some("Loaded 1 collections and 3 NFTs from the blockchain")
    );
}

#[tokio::test]
async fn factory_failure_degrades_to_an_empty_snapshot() {
    let mut reader = MockContractReader::new();
    reader
        .expect_creator_collections()
        .times(1)
        .returning(|_| Err(ProviderFailure::Server("boom".to_string())));
    reader.expect_collection_info().times(0);

    let snapshot = reconciler(reader, MockMetadataFetcher::new())
        .load_user_data(CREATOR)
        .await
        .unwrap();
    assert!(snapshot.collections.is_empty());
    assert!(snapshot.tokens.is_empty());
    assert!(snapshot.message.is_some());
}

#[tokio::test]
async fn unreadable_collection_is_skipped_not_fatal() {
    let mut reader = MockContractReader::new();
    reader
        .expect_creator_collections()
        .returning(|_| Ok(vec![1, 2]));
    reader
        .expect_collection_info()
        .returning(|id| match id {
            1 => Err(ProviderFailure::ServiceUnavailable),
            _ => Ok(info("Second")),
        });
    reader.expect_total_supply().returning(|_| Ok(0));
    reader.expect_token_uri().times(0);

    let snapshot = reconciler(reader, MockMetadataFetcher::new())
        .load_user_data(CREATOR)
        .await
        .unwrap();
    assert_eq!(snapshot.collections.len(), 1);
    assert_eq!(snapshot.collections[0].id, 2);
}

#[tokio::test]
async fn failed_supply_read_records_zero_and_no_tokens() {
    let mut reader = MockContractReader::new();
    reader
        .expect_creator_collections()
        .returning(|_| Ok(vec![1]));
    reader.expect_collection_info().returning(|_| Ok(info("Dragons")));
    reader
        .expect_total_supply()
        .returning(|_| Err(ProviderFailure::Server("boom".to_string())));
    reader.expect_token_uri().times(0);

    let snapshot = reconciler(reader, MockMetadataFetcher::new())
        .load_user_data(CREATOR)
        .await
        .unwrap();
    assert_eq!(snapshot.collections[0].current_supply, 0);
    assert!(snapshot.tokens.is_empty());
}

#[tokio::test]
async fn metadata_failure_falls_back_to_placeholder_fields() {
    let mut reader = MockContractReader::new();
    reader
        .expect_creator_collections()
        .returning(|_| Ok(vec![1]));
    reader.expect_collection_info().returning(|_| Ok(info("Dragons")));
    reader.expect_total_supply().returning(|_| Ok(1));
    reader
        .expect_token_uri()
        .returning(|_, _| Ok("ipfs://QmHash/1.json".to_string()));

    let mut metadata = MockMetadataFetcher::new();
    metadata
        .expect_fetch()
        .returning(|_| Err(ProviderFailure::Network("timeout".to_string())));

    let snapshot = reconciler(reader, metadata)
        .load_user_data(CREATOR)
        .await
        .unwrap();
    let token = &snapshot.tokens[0];
    assert_eq!(token.name, "Dragons #1");
    assert!(token.metadata.is_none());
}

#[tokio::test]
async fn rate_limited_reads_are_retried() {
    use std::sync::atomic::{AtomicU32, Ordering};

    let calls = Arc::new(AtomicU32::new(0));
    let mut reader = MockContractReader::new();
    let counter = calls.clone();
    reader.expect_creator_collections().times(2).returning(move |_| {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            Err(ProviderFailure::RateLimited)
        } else {
            Ok(vec![])
        }
    });

    let snapshot = reconciler(reader, MockMetadataFetcher::new())
        .load_user_data(CREATOR)
        .await
        .unwrap();
    assert!(snapshot.collections.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn malformed_address_is_rejected_up_front() {
    let mut reader = MockContractReader::new();
    reader.expect_creator_collections().times(0);

    let result = reconciler(reader, MockMetadataFetcher::new())
        .load_user_data("not-an-address")
        .await;
    assert!(matches!(result, Err(ChainError::InvalidAddress { .. })));
}
