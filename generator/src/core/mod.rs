//! Core generation logic: prompt shaping, the fallback chain and the
//! procedural terminal renderer

pub mod collection;
pub mod orchestrator;
pub mod procedural;
pub mod prompt;
