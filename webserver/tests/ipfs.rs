//! Pinata pinning service against a stub API

use serde_json::json;
use webserver::services::PinataPinner;
use webserver::IpfsPinner;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn pinner(server: &MockServer) -> PinataPinner {
    PinataPinner::new(
        reqwest::Client::new(),
        "key".to_string(),
        "secret".to_string(),
    )
    .with_base_url(server.uri())
}

#[tokio::test]
async fn pin_file_sends_multipart_with_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pinning/pinFileToIPFS"))
        .and(header("pinata_api_key", "key"))
        .and(header("pinata_secret_api_key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "IpfsHash": "QmImg",
            "PinSize": 5,
            "Timestamp": "2024-01-01T00:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let url = pinner(&server)
        .pin_file(b"hello".to_vec(), "art.png")
        .await
        .unwrap();
    assert_eq!(url, "https://gateway.pinata.cloud/ipfs/QmImg");
}

#[tokio::test]
async fn pin_json_wraps_the_document() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pinning/pinJSONToIPFS"))
        .and(body_partial_json(json!({
            "pinataContent": { "name": "Teapot" },
            "pinataMetadata": { "name": "Teapot" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "IpfsHash": "QmMeta"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let url = pinner(&server)
        .pin_json(&json!({ "name": "Teapot" }), "Teapot")
        .await
        .unwrap();
    assert_eq!(url, "https://gateway.pinata.cloud/ipfs/QmMeta");
}

#[tokio::test]
async fn bad_credentials_map_to_an_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pinning/pinJSONToIPFS"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = pinner(&server).pin_json(&json!({}), "x").await;
    assert_eq!(result, Err(shared::ProviderFailure::AuthenticationFailed));
}
