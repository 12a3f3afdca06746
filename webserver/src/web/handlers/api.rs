//! REST API handlers
//!
//! Validation failures answer 400 before any orchestration work; orchestrator
//! degradation (partial chain data, procedural fallback) is still a 200 with
//! a message, per the error model of the crates below.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{json, Value};
use shared::{GenerationRequest, GenerationResult};
use tracing::{error, info};

use chain::ChainError;
use generator::types::CollectionRequest;
use generator::GeneratorError;

use crate::state::AppState;

type ApiError = (StatusCode, Json<Value>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "success": false, "error": message.into() })),
    )
}

fn server_error(message: impl Into<String>) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "success": false, "error": message.into() })),
    )
}

/// Generate one image - /api/generate-art
pub async fn generate_art(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let request: GenerationRequest =
        serde_json::from_value(payload).map_err(|e| bad_request(format!("invalid request: {e}")))?;
    if request.prompt.trim().is_empty() {
        return Err(bad_request("Prompt is required"));
    }

    match state.orchestrator.generate(&request).await {
        GenerationResult::Success {
            image_data,
            service,
            prompt,
        } => Ok(Json(json!({
            "success": true,
            "imageData": image_data,
            "prompt": prompt,
            "service": service.label(),
        }))),
        GenerationResult::Failure { error } => Err(server_error(error)),
    }
}

/// Generate a collection - /api/generate-collection
pub async fn generate_collection(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let request: CollectionRequest =
        serde_json::from_value(payload).map_err(|e| bad_request(format!("invalid request: {e}")))?;

    match state.collections.generate(&request).await {
        Ok(collection) => {
            let message = format!(
                "Generated {} of {} NFTs",
                collection.total_generated, collection.requested_quantity
            );
            Ok(Json(json!({
                "success": true,
                "collection": collection,
                "message": message,
            })))
        }
        Err(GeneratorError::InvalidRequest { message }) => Err(bad_request(message)),
        Err(GeneratorError::EmptyCollection) => {
            Err(server_error("Failed to generate any NFTs for the collection"))
        }
        Err(error) => {
            error!(%error, "collection generation failed");
            Err(server_error(error.to_string()))
        }
    }
}

/// Load a wallet's collections and tokens - /api/load-user-data
pub async fn load_user_data(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let address = payload
        .get("userAddress")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .ok_or_else(|| bad_request("User address is required"))?;

    let snapshot = match state.reconciler.load_user_data(address).await {
        Ok(snapshot) => snapshot,
        Err(ChainError::InvalidAddress { address }) => {
            return Err(bad_request(format!("Invalid wallet address: {address}")));
        }
    };

    state.store.replace(address, snapshot.clone()).await;
    Ok(Json(json!({
        "success": true,
        "collections": snapshot.collections,
        "nfts": snapshot.tokens,
        "message": snapshot.message,
    })))
}

/// Pin an image plus its metadata document - /api/upload-ipfs
pub async fn upload_ipfs(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let name = payload
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("AI Generated NFT")
        .to_string();
    let description = payload
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or("Created with artmint")
        .to_string();

    let bytes = image_bytes(&payload).await?;
    let image_url = state
        .pinner
        .pin_file(bytes, &format!("{name}.png"))
        .await
        .map_err(|e| server_error(format!("image pin failed: {e}")))?;

    let metadata = json!({
        "name": name,
        "description": description,
        "image": image_url,
    });
    let metadata_url = state
        .pinner
        .pin_json(&metadata, &name)
        .await
        .map_err(|e| server_error(format!("metadata pin failed: {e}")))?;

    info!(%image_url, %metadata_url, "content pinned");
    Ok(Json(json!({
        "success": true,
        "imageUrl": image_url,
        "metadataUrl": metadata_url,
        "metadata": metadata,
    })))
}

/// Resolve the request's image to raw bytes (inline data URI or remote URL)
async fn image_bytes(payload: &Value) -> Result<Vec<u8>, ApiError> {
    if let Some(data) = payload.get("imageData").and_then(Value::as_str) {
        let encoded = data
            .split_once("base64,")
            .map(|(_, rest)| rest)
            .unwrap_or(data);
        return BASE64
            .decode(encoded)
            .map_err(|e| bad_request(format!("invalid image data: {e}")));
    }

    if let Some(url) = payload.get("imageUrl").and_then(Value::as_str) {
        let response = reqwest::get(url)
            .await
            .map_err(|e| server_error(format!("image fetch failed: {e}")))?;
        if !response.status().is_success() {
            return Err(server_error(format!(
                "image fetch failed with status {}",
                response.status()
            )));
        }
        return response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| server_error(format!("image fetch failed: {e}")));
    }

    Err(bad_request("imageData or imageUrl is required"))
}

/// Configuration introspection - /api/debug
///
/// Open in debug builds; otherwise requires the x-debug-key header to match
/// the configured key.
pub async fn debug_config(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    if !cfg!(debug_assertions) {
        let presented = headers.get("x-debug-key").and_then(|v| v.to_str().ok());
        let authorized = matches!(
            (&state.debug_key, presented),
            (Some(expected), Some(presented)) if expected == presented
        );
        if !authorized {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "success": false, "error": "Unauthorized" })),
            ));
        }
    }

    let providers: Vec<String> = state
        .config
        .providers
        .iter()
        .map(|p| p.to_string())
        .collect();
    Ok(Json(json!({
        "success": true,
        "providers": providers,
        "rpcUrl": state.config.rpc_url,
        "factoryAddress": state.config.factory_address,
    })))
}
