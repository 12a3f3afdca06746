//! Transport implementations of the read seams

mod metadata;
mod rpc;

pub use metadata::HttpMetadataFetcher;
pub use rpc::RpcContractReader;
