//! Per-address snapshot cache

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::types::ChainSnapshot;

/// Read-through cache of the latest reconciled snapshot per wallet address
///
/// No write authority and no staleness bound: the chain is the source of
/// truth and any supply or eligibility decision must re-read it. Entries are
/// only ever replaced by a fresh load or removed by explicit request; writers
/// are serialized behind the mutex.
#[derive(Default)]
pub struct ChainStore {
    snapshots: Mutex<HashMap<String, ChainSnapshot>>,
}

impl ChainStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached snapshot for `address`
    pub async fn replace(&self, address: &str, snapshot: ChainSnapshot) {
        let mut snapshots = self.snapshots.lock().await;
        snapshots.insert(address.to_lowercase(), snapshot);
    }

    /// Latest cached snapshot for `address`, if any
    pub async fn get(&self, address: &str) -> Option<ChainSnapshot> {
        let snapshots = self.snapshots.lock().await;
        snapshots.get(&address.to_lowercase()).cloned()
    }

    /// Drop the cached snapshot for `address`
    pub async fn remove(&self, address: &str) -> bool {
        let mut snapshots = self.snapshots.lock().await;
        snapshots.remove(&address.to_lowercase()).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replace_and_get_are_case_insensitive_on_address() {
        let store = ChainStore::new();
        let snapshot = ChainSnapshot {
            message: Some("loaded".to_string()),
            ..Default::default()
        };
        store.replace("0xAbC123", snapshot.clone()).await;
        assert_eq!(store.get("0xabc123").await, Some(snapshot));
    }

    #[tokio::test]
    async fn remove_is_explicit_and_reports_presence() {
        let store = ChainStore::new();
        store.replace("0xabc", ChainSnapshot::default()).await;
        assert!(store.remove("0xabc").await);
        assert!(!store.remove("0xabc").await);
        assert_eq!(store.get("0xabc").await, None);
    }
}
