//! API endpoint behavior through the full router

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::util::ServiceExt;

use chain::{ChainReconciler, ChainStore, MockContractReader, MockMetadataFetcher, PacingConfig, RetryPolicy};
use generator::{CollectionGenerator, ImageOrchestrator, MockImageProvider, ProviderRegistry};
use shared::ProviderId;
use webserver::state::{AppState, ConfigSummary};
use webserver::{build_router, IpfsPinner, MockIpfsPinner};

fn provider(image: &str) -> MockImageProvider {
    let image = image.to_string();
    let mut mock = MockImageProvider::new();
    mock.expect_id().return_const(ProviderId::HuggingFace);
    mock.expect_generate().returning(move |_| Ok(image.clone()));
    mock
}

fn empty_reader() -> MockContractReader {
    let mut reader = MockContractReader::new();
    reader.expect_creator_collections().returning(|_| Ok(vec![]));
    reader
}

fn state_with(
    providers: Vec<MockImageProvider>,
    reader: MockContractReader,
    pinner: MockIpfsPinner,
) -> AppState {
    let providers = providers
        .into_iter()
        .map(|p| Arc::new(p) as Arc<dyn generator::ImageProvider>)
        .collect();
    let orchestrator = Arc::new(ImageOrchestrator::new(ProviderRegistry::new(providers)));
    let collections = Arc::new(
        CollectionGenerator::new(orchestrator.clone()).with_item_delay(Duration::ZERO),
    );
    let reconciler = Arc::new(
        ChainReconciler::new(
            Arc::new(reader),
            Arc::new(MockMetadataFetcher::new()),
            "https://testnet.monadexplorer.com",
        )
        .with_retry(RetryPolicy::immediate())
        .with_pacing(PacingConfig::immediate()),
    );

    AppState {
        orchestrator,
        collections,
        reconciler,
        store: Arc::new(ChainStore::new()),
        pinner: Arc::new(pinner) as Arc<dyn IpfsPinner>,
        config: Arc::new(ConfigSummary {
            providers: vec![ProviderId::HuggingFace],
            rpc_url: "https://testnet-rpc.monad.xyz".to_string(),
            factory_address: "0x7867B987ed2f04Afab67392d176b06a5b002d1F8".to_string(),
        }),
        debug_key: Some("secret".to_string()),
    }
}

async fn post(state: AppState, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = build_router(state).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn generate_art_answers_with_image_and_service() {
    let state = state_with(
        vec![provider("data:image/jpeg;base64,AAAA")],
        empty_reader(),
        MockIpfsPinner::new(),
    );
    let (status, body) = post(
        state,
        "/api/generate-art",
        json!({ "prompt": "a teapot" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["imageData"], "data:image/jpeg;base64,AAAA");
    assert_eq!(body["service"], "Hugging Face SDXL");
}

#[tokio::test]
async fn generate_art_rejects_an_empty_prompt() {
    let mut mock = MockImageProvider::new();
    mock.expect_id().return_const(ProviderId::HuggingFace);
    mock.expect_generate().times(0);

    let state = state_with(vec![mock], empty_reader(), MockIpfsPinner::new());
    let (status, body) = post(state, "/api/generate-art", json!({ "prompt": "  " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn generate_collection_rejects_bad_quantity() {
    let state = state_with(vec![], empty_reader(), MockIpfsPinner::new());
    let (status, _) = post(
        state,
        "/api/generate-collection",
        json!({ "basePrompt": "orbs", "name": "Orbs", "quantity": 0 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn generate_collection_reports_counts() {
    let state = state_with(
        vec![provider("data:image/jpeg;base64,AAAA")],
        empty_reader(),
        MockIpfsPinner::new(),
    );
    let (status, body) = post(
        state,
        "/api/generate-collection",
        json!({ "basePrompt": "orbs", "name": "Orbs", "quantity": 2 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["collection"]["totalGenerated"], 2);
    assert_eq!(body["message"], "Generated 2 of 2 NFTs");
}

#[tokio::test]
async fn load_user_data_requires_an_address() {
    let mut reader = MockContractReader::new();
    reader.expect_creator_collections().times(0);

    let state = state_with(vec![], reader, MockIpfsPinner::new());
    let (status, body) = post(state, "/api/load-user-data", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "User address is required");
}

#[tokio::test]
async fn load_user_data_caches_the_snapshot() {
    let address = "0x1111111111111111111111111111111111111111";
    let state = state_with(vec![], empty_reader(), MockIpfsPinner::new());
    let store = state.store.clone();

    let (status, body) = post(
        state,
        "/api/load-user-data",
        json!({ "userAddress": address }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(store.get(address).await.is_some());
}

#[tokio::test]
async fn upload_ipfs_pins_image_then_metadata() {
    let mut pinner = MockIpfsPinner::new();
    pinner
        .expect_pin_file()
        .withf(|bytes, name| bytes == b"hello" && name == "Teapot.png")
        .times(1)
        .returning(|_, _| Ok("https://gateway.pinata.cloud/ipfs/QmImg".to_string()));
    pinner
        .expect_pin_json()
        .withf(|document, _| document["image"] == "https://gateway.pinata.cloud/ipfs/QmImg")
        .times(1)
        .returning(|_, _| Ok("https://gateway.pinata.cloud/ipfs/QmMeta".to_string()));

    let state = state_with(vec![], empty_reader(), pinner);
    let (status, body) = post(
        state,
        "/api/upload-ipfs",
        json!({
            "imageData": "data:image/png;base64,aGVsbG8=",
            "name": "Teapot",
            "description": "steamy",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["imageUrl"], "https://gateway.pinata.cloud/ipfs/QmImg");
    assert_eq!(body["metadataUrl"], "https://gateway.pinata.cloud/ipfs/QmMeta");
    assert_eq!(body["metadata"]["name"], "Teapot");
}

#[tokio::test]
async fn upload_ipfs_requires_some_image_input() {
    let state = state_with(vec![], empty_reader(), MockIpfsPinner::new());
    let (status, body) = post(state, "/api/upload-ipfs", json!({ "name": "Teapot" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "imageData or imageUrl is required");
}

#[tokio::test]
async fn debug_endpoint_reports_configuration() {
    // Debug builds leave the endpoint open
    let state = state_with(vec![], empty_reader(), MockIpfsPinner::new());
    let request = Request::builder()
        .method("GET")
        .uri("/api/debug")
        .header("x-debug-key", "secret")
        .body(Body::empty())
        .unwrap();
    let response = build_router(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["factoryAddress"], "0x7867B987ed2f04Afab67392d176b06a5b002d1F8");
    assert_eq!(body["providers"][0], "huggingface");
}
