//! # Protocol Types
//!
//! The chain's value vocabulary: assets and prices, the weighted authority
//! model, the closed operation registry and every operation payload. All of
//! it has two faces — canonical wire bytes through the codec traits, and the
//! node's JSON shapes through serde — and both are defined here, field order
//! and all.

pub mod authority;
pub mod operations;
pub mod registry;
pub mod types;

pub use authority::Authority;
pub use registry::{OpWrapper, Operation, OperationError};
pub use types::{Asset, MemoData};
