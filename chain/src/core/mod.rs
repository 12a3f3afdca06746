//! Core read orchestration: retry policy, reconciliation and the local store

pub mod reconciler;
pub mod retry;
pub mod store;
