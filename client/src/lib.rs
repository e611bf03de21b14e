// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Graphene Client — Core Library
//!
//! Client-side middleware for graphene-family chains: the boundary between
//! application intent ("transfer funds", "update this asset") and a node's
//! binary wire format, authorization rules and RPC surface.
//!
//! Consensus does not forgive. A transaction signs over its exact canonical
//! bytes, so every encoder in this crate is deterministic down to the last
//! varint, and everything that feeds a signature is covered by byte-exact
//! tests.
//!
//! ## Architecture
//!
//! The crate is split into modules that mirror the actual concerns of a
//! chain client:
//!
//! - **codec** — Canonical binary and JSON encoding for protocol values.
//! - **object_id** — `space.type.instance` references, the only type safety
//!   the chain's integer handles get.
//! - **protocol** — Operation payloads, the closed opcode registry, and the
//!   weighted authority model.
//! - **crypto** — secp256k1 keys and recoverable signatures, memo
//!   encryption, brain-key and password-key derivation.
//! - **transaction** — The wire transaction, signing rules, and the
//!   session-oriented builder that drives a transaction from staged
//!   operations to broadcast.
//! - **rpc** — Blocking JSON-RPC transport with endpoint failover, plus the
//!   typed node facade.
//! - **account** / **wallet** — The directory and key-store seams the
//!   signing pipeline resolves accounts and keys through.
//! - **config** — Known chains and every tuning constant.
//!
//! ## Design Philosophy
//!
//! 1. Canonical bytes are sacred; everything else is presentation.
//! 2. The operation set is closed at compile time — no stringly-typed
//!    dispatch, ever.
//! 3. Errors are typed at the seam they cross. Callers match, they don't
//!    grep.
//! 4. If it touches money, it has tests. Plural.

pub mod account;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod object_id;
pub mod protocol;
pub mod rpc;
pub mod transaction;
pub mod wallet;
