//! Chain-internal types

use serde::{Deserialize, Serialize};
use shared::{CollectionRecord, TokenRecord};

/// Raw collection tuple as returned by the factory contract
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionInfo {
    pub contract_address: String,
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub creator: String,
    pub max_supply: u64,
    /// Mint price in wei, decimal string
    pub mint_price: String,
    /// Unix seconds
    pub created_at: u64,
    pub is_active: bool,
}

/// Reconciled view of one wallet's on-chain state
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChainSnapshot {
    pub collections: Vec<CollectionRecord>,
    pub tokens: Vec<TokenRecord>,
    /// Degradation notice surfaced to the caller, if any read was skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
