//! Read-side seams for dependency injection

use async_trait::async_trait;
use shared::{ProviderFailure, TokenMetadata};

use crate::types::CollectionInfo;

/// Read-only view of the factory and its collection contracts
///
/// Implementations map transport failures into [`ProviderFailure`] so the
/// retry wrapper can tell rate limits from everything else.
#[mockall::automock]
#[async_trait]
pub trait ContractReader: Send + Sync {
    /// Collection ids registered by `creator` on the factory
    async fn creator_collections(&self, creator: &str) -> Result<Vec<u64>, ProviderFailure>;

    /// Full collection tuple for a factory collection id
    async fn collection_info(&self, collection_id: u64) -> Result<CollectionInfo, ProviderFailure>;

    /// Current supply of a collection contract
    async fn total_supply(&self, contract_address: &str) -> Result<u64, ProviderFailure>;

    /// Token URI for one minted token
    async fn token_uri(
        &self,
        contract_address: &str,
        token_id: u64,
    ) -> Result<String, ProviderFailure>;
}

/// Resolves a token URI into its metadata document
#[mockall::automock]
#[async_trait]
pub trait MetadataFetcher: Send + Sync {
    async fn fetch(&self, uri: &str) -> Result<TokenMetadata, ProviderFailure>;
}
