//! JSON-RPC contract reader
//!
//! Plain `eth_call` over reqwest with hand-rolled ABI plumbing: function
//! selectors are computed from the signatures with Keccak-256 and arguments
//! are left-padded 32-byte words. The factory and collection contracts only
//! return word arrays, strings and one struct, so a cursor over 32-byte
//! words covers all of it. Dynamic returns (arrays, strings, the collection
//! struct) arrive behind an outer offset word, with member offsets relative
//! to the start of the pointed-to body.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::{json, Value};
use sha3::{Digest, Keccak256};
use shared::ProviderFailure;

use crate::traits::ContractReader;
use crate::types::CollectionInfo;

const DEFAULT_RATE_LIMIT_MARKER: &str = "request limit reached";

pub struct RpcContractReader {
    client: reqwest::Client,
    rpc_url: String,
    factory_address: String,
    rate_limit_marker: String,
    next_id: AtomicU64,
}

impl RpcContractReader {
    pub fn new(client: reqwest::Client, rpc_url: String, factory_address: String) -> Self {
        Self {
            client,
            rpc_url,
            factory_address,
            rate_limit_marker: DEFAULT_RATE_LIMIT_MARKER.to_string(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Override the substring that marks a rate-limited RPC error body
    pub fn with_rate_limit_marker(mut self, marker: impl Into<String>) -> Self {
        self.rate_limit_marker = marker.into();
        self
    }

    async fn eth_call(&self, to: &str, data: Vec<u8>) -> Result<Vec<u8>, ProviderFailure> {
        let payload = json!({
            "jsonrpc": "2.0",
            "method": "eth_call",
            "params": [{ "to": to, "data": format!("0x{}", hex::encode(data)) }, "latest"],
            "id": self.next_id.fetch_add(1, Ordering::Relaxed),
        });

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ProviderFailure::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderFailure::Network(e.to_string()))?;
        if status == 429 {
            return Err(ProviderFailure::RateLimited);
        }
        if !(200..300).contains(&status) {
            return Err(ProviderFailure::from_status(status, body));
        }

        let body: Value = serde_json::from_str(&body)
            .map_err(|e| ProviderFailure::InvalidResponse(e.to_string()))?;
        if let Some(error) = body.get("error") {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown RPC error")
                .to_string();
            if message.contains(&self.rate_limit_marker) {
                return Err(ProviderFailure::RateLimited);
            }
            return Err(ProviderFailure::Server(message));
        }

        let result = body
            .get("result")
            .and_then(Value::as_str)
            .ok_or_else(|| ProviderFailure::InvalidResponse("missing result".to_string()))?;
        hex::decode(result.trim_start_matches("0x"))
            .map_err(|e| ProviderFailure::InvalidResponse(e.to_string()))
    }
}

/// First four bytes of the Keccak-256 hash of the function signature
fn selector(signature: &str) -> [u8; 4] {
    let digest = Keccak256::digest(signature.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

fn encode_address(data: &mut Vec<u8>, address: &str) -> Result<(), ProviderFailure> {
    let raw = hex::decode(address.trim_start_matches("0x"))
        .map_err(|e| ProviderFailure::InvalidResponse(format!("bad address: {e}")))?;
    if raw.len() != 20 {
        return Err(ProviderFailure::InvalidResponse(format!(
            "bad address length: {}",
            raw.len()
        )));
    }
    data.extend_from_slice(&[0u8; 12]);
    data.extend_from_slice(&raw);
    Ok(())
}

fn encode_u64(data: &mut Vec<u8>, value: u64) {
    data.extend_from_slice(&[0u8; 24]);
    data.extend_from_slice(&value.to_be_bytes());
}

/// Cursor over the 32-byte words of an ABI-encoded return payload
struct AbiReader<'a> {
    data: &'a [u8],
    cursor: usize,
}

impl<'a> AbiReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, cursor: 0 }
    }

    fn word(&mut self) -> Result<&'a [u8], ProviderFailure> {
        let word = self
            .data
            .get(self.cursor..self.cursor + 32)
            .ok_or_else(|| ProviderFailure::InvalidResponse("truncated payload".to_string()))?;
        self.cursor += 32;
        Ok(word)
    }

    fn u64(&mut self) -> Result<u64, ProviderFailure> {
        let word = self.word()?;
        if word[..24].iter().any(|&b| b != 0) {
            return Err(ProviderFailure::InvalidResponse(
                "uint out of u64 range".to_string(),
            ));
        }
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&word[24..]);
        Ok(u64::from_be_bytes(raw))
    }

    /// uint256 as a decimal string; wei amounts overflow u64 routinely
    fn u256_decimal(&mut self) -> Result<String, ProviderFailure> {
        let word = self.word()?;
        if word[..16].iter().any(|&b| b != 0) {
            return Err(ProviderFailure::InvalidResponse(
                "uint out of u128 range".to_string(),
            ));
        }
        let mut raw = [0u8; 16];
        raw.copy_from_slice(&word[16..]);
        Ok(u128::from_be_bytes(raw).to_string())
    }

    fn address(&mut self) -> Result<String, ProviderFailure> {
        let word = self.word()?;
        Ok(format!("0x{}", hex::encode(&word[12..])))
    }

    fn bool(&mut self) -> Result<bool, ProviderFailure> {
        Ok(self.u64()? != 0)
    }

    /// String at the dynamic offset found in the current head word
    fn string_at_offset(&mut self) -> Result<String, ProviderFailure> {
        let offset = self.u64()? as usize;
        let mut tail = AbiReader::new(
            self.data
                .get(offset..)
                .ok_or_else(|| ProviderFailure::InvalidResponse("bad offset".to_string()))?,
        );
        let length = tail.u64()? as usize;
        let bytes = tail
            .data
            .get(32..32 + length)
            .ok_or_else(|| ProviderFailure::InvalidResponse("truncated string".to_string()))?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| ProviderFailure::InvalidResponse(e.to_string()))
    }

    /// Reader over the tuple body at the offset found in the current head word
    ///
    /// A struct with dynamic members is itself dynamic, so its offsets (and
    /// the offsets of its string members) are relative to the tuple start,
    /// not the payload start.
    fn tuple_at_offset(&mut self) -> Result<AbiReader<'a>, ProviderFailure> {
        let offset = self.u64()? as usize;
        Ok(AbiReader::new(self.data.get(offset..).ok_or_else(|| {
            ProviderFailure::InvalidResponse("bad tuple offset".to_string())
        })?))
    }

    /// uint256[] at the dynamic offset found in the current head word
    fn u64_array_at_offset(&mut self) -> Result<Vec<u64>, ProviderFailure> {
        let offset = self.u64()? as usize;
        let mut tail = AbiReader::new(
            self.data
                .get(offset..)
                .ok_or_else(|| ProviderFailure::InvalidResponse("bad offset".to_string()))?,
        );
        let length = tail.u64()?;
        (0..length).map(|_| tail.u64()).collect()
    }
}

#[async_trait]
impl ContractReader for RpcContractReader {
    async fn creator_collections(&self, creator: &str) -> Result<Vec<u64>, ProviderFailure> {
        let mut data = selector("getCreatorCollections(address)").to_vec();
        encode_address(&mut data, creator)?;
        let payload = self.eth_call(&self.factory_address, data).await?;
        AbiReader::new(&payload).u64_array_at_offset()
    }

    async fn collection_info(&self, collection_id: u64) -> Result<CollectionInfo, ProviderFailure> {
        let mut data = selector("getCollection(uint256)").to_vec();
        encode_u64(&mut data, collection_id);
        let payload = self.eth_call(&self.factory_address, data).await?;

        let mut reader = AbiReader::new(&payload).tuple_at_offset()?;
        Ok(CollectionInfo {
            contract_address: reader.address()?,
            name: reader.string_at_offset()?,
            symbol: reader.string_at_offset()?,
            description: reader.string_at_offset()?,
            creator: reader.address()?,
            max_supply: reader.u64()?,
            mint_price: reader.u256_decimal()?,
            created_at: reader.u64()?,
            is_active: reader.bool()?,
        })
    }

    async fn total_supply(&self, contract_address: &str) -> Result<u64, ProviderFailure> {
        let data = selector("totalSupply()").to_vec();
        let payload = self.eth_call(contract_address, data).await?;
        AbiReader::new(&payload).u64()
    }

    async fn token_uri(
        &self,
        contract_address: &str,
        token_id: u64,
    ) -> Result<String, ProviderFailure> {
        let mut data = selector("tokenURI(uint256)").to_vec();
        encode_u64(&mut data, token_id);
        let payload = self.eth_call(contract_address, data).await?;
        AbiReader::new(&payload).string_at_offset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_selectors() {
        // Canonical ERC-721 selectors
        assert_eq!(hex::encode(selector("totalSupply()")), "18160ddd");
        assert_eq!(hex::encode(selector("tokenURI(uint256)")), "c87b56dd");
    }

    #[test]
    fn test_encode_address_pads_to_a_word() {
        let mut data = Vec::new();
        encode_address(&mut data, "0x7867B987ed2f04Afab67392d176b06a5b002d1F8").unwrap();
        assert_eq!(data.len(), 32);
        assert_eq!(&data[..12], &[0u8; 12]);
        assert!(encode_address(&mut Vec::new(), "0x1234").is_err());
    }

    #[test]
    fn test_decode_u64_array() {
        let mut payload = Vec::new();
        encode_u64(&mut payload, 32); // offset
        encode_u64(&mut payload, 2); // length
        encode_u64(&mut payload, 7);
        encode_u64(&mut payload, 9);
        assert_eq!(
            AbiReader::new(&payload).u64_array_at_offset().unwrap(),
            vec![7, 9]
        );
    }

    #[test]
    fn test_decode_string() {
        let mut payload = Vec::new();
        encode_u64(&mut payload, 32); // offset
        encode_u64(&mut payload, 5); // length
        let mut chunk = b"Artsy".to_vec();
        chunk.resize(32, 0);
        payload.extend_from_slice(&chunk);
        assert_eq!(AbiReader::new(&payload).string_at_offset().unwrap(), "Artsy");
    }

    #[test]
    fn test_decode_struct_behind_offset_word() {
        // Outer offset word, then a (uint256, string) body; the string
        // offset counts from the tuple start, not the payload start
        let mut payload = Vec::new();
        encode_u64(&mut payload, 32); // outer offset
        encode_u64(&mut payload, 7);
        encode_u64(&mut payload, 64); // string offset within the tuple
        encode_u64(&mut payload, 5);
        let mut chunk = b"Artsy".to_vec();
        chunk.resize(32, 0);
        payload.extend_from_slice(&chunk);

        let mut tuple = AbiReader::new(&payload).tuple_at_offset().unwrap();
        assert_eq!(tuple.u64().unwrap(), 7);
        assert_eq!(tuple.string_at_offset().unwrap(), "Artsy");
    }

    #[test]
    fn test_truncated_payload_is_an_error() {
        let payload = vec![0u8; 16];
        assert!(AbiReader::new(&payload).u64().is_err());
    }
}
