//! Shared application state

use std::sync::Arc;

use chain::{ChainReconciler, ChainStore};
use generator::{CollectionGenerator, ImageOrchestrator};
use shared::ProviderId;

use crate::traits::IpfsPinner;

/// Configuration summary surfaced by the debug endpoint
#[derive(Debug, Clone)]
pub struct ConfigSummary {
    pub providers: Vec<ProviderId>,
    pub rpc_url: String,
    pub factory_address: String,
}

/// Everything the handlers need, cheap to clone
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ImageOrchestrator>,
    pub collections: Arc<CollectionGenerator>,
    pub reconciler: Arc<ChainReconciler>,
    pub store: Arc<ChainStore>,
    pub pinner: Arc<dyn IpfsPinner>,
    pub config: Arc<ConfigSummary>,
    /// Key required by the debug endpoint in release builds
    pub debug_key: Option<String>,
}
