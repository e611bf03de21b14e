//! # Transactions
//!
//! The wire transaction and its signing rules live in [`signed`]; the
//! session-oriented builder that accumulates operations, resolves signing
//! keys and talks to a node lives in [`builder`].

pub mod builder;
pub mod signed;

pub use builder::{BuilderError, BuilderState, ConfirmationMode, NodeApi, TransactionBuilder};
pub use signed::{Anchor, Transaction, TransactionError};
