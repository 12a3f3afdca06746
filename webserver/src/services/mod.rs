//! Service implementations

mod ipfs;

pub use ipfs::PinataPinner;
