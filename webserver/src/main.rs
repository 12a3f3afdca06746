//! artmint server entry point
//!
//! Wires the provider registry, the two orchestrators and the pinning service
//! together and serves the HTTP API.

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use chain::{ChainReconciler, ChainStore, HttpMetadataFetcher, RpcContractReader};
use generator::{CollectionGenerator, ImageOrchestrator, ProviderCredentials, ProviderRegistry};
use webserver::services::PinataPinner;
use webserver::state::{AppState, ConfigSummary};
use webserver::{build_router, WebServerError, WebServerResult};

#[derive(Parser, Debug)]
#[command(name = "webserver")]
#[command(about = "AI art generation and NFT chain mirror server")]
struct Args {
    /// Port for the HTTP server
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// JSON-RPC endpoint for contract reads
    #[arg(long, default_value = "https://testnet-rpc.monad.xyz")]
    rpc_url: String,

    /// Collection factory contract address
    #[arg(long, default_value = "0x7867B987ed2f04Afab67392d176b06a5b002d1F8")]
    factory_address: String,

    /// Block explorer base URL for token links
    #[arg(long, default_value = "https://testnet.monadexplorer.com")]
    explorer_url: String,
}

#[tokio::main]
async fn main() -> WebServerResult<()> {
    let args = Args::parse();

    // Credentials come from .env plus the process environment
    let _ = dotenvy::dotenv();
    shared::logging::init_tracing(&args.log_level);

    let client = reqwest::Client::new();

    let credentials = ProviderCredentials::from_env();
    let registry = ProviderRegistry::from_credentials(&credentials, client.clone());
    let provider_ids = registry.ids();
    let orchestrator = Arc::new(ImageOrchestrator::new(registry));
    let collections = Arc::new(CollectionGenerator::new(orchestrator.clone()));

    let reader = RpcContractReader::new(
        client.clone(),
        args.rpc_url.clone(),
        args.factory_address.clone(),
    );
    let metadata = HttpMetadataFetcher::new(client.clone());
    let reconciler = Arc::new(ChainReconciler::new(
        Arc::new(reader),
        Arc::new(metadata),
        args.explorer_url.clone(),
    ));

    let pinner = PinataPinner::new(
        client,
        std::env::var("PINATA_API_KEY").unwrap_or_default(),
        std::env::var("PINATA_SECRET_API_KEY").unwrap_or_default(),
    );

    let state = AppState {
        orchestrator,
        collections,
        reconciler,
        store: Arc::new(ChainStore::new()),
        pinner: Arc::new(pinner),
        config: Arc::new(ConfigSummary {
            providers: provider_ids,
            rpc_url: args.rpc_url,
            factory_address: args.factory_address,
        }),
        debug_key: std::env::var("DEBUG_KEY").ok(),
    };

    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port))
        .await
        .map_err(WebServerError::Server)?;
    info!(port = args.port, "server listening");
    axum::serve(listener, router)
        .await
        .map_err(WebServerError::Server)?;
    Ok(())
}
