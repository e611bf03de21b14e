//! # Node RPC
//!
//! Everything that talks to a node. [`protocol`] defines the JSON-RPC wire
//! shapes and turns node error strings into typed errors; [`transport`] owns
//! the socket, the endpoint rotation and the retry loop; [`node`] is the
//! typed facade the rest of the client calls.
//!
//! The whole stack is synchronous and blocking on purpose. One connection,
//! one in-flight request, replies matched in order. A client that signs
//! transactions interactively gains nothing from multiplexing and loses a
//! lot of debuggability.

pub mod node;
pub mod protocol;
pub mod transport;

use thiserror::Error;

pub use node::{Block, DynamicGlobalProperties, NodeClient};
pub use transport::RpcTransport;

#[derive(Debug, Error)]
pub enum RpcError {
    /// Transport-level failures were retried up to the budget and the node
    /// still could not be reached.
    #[error("node unreachable after {attempts} connection attempts")]
    RetriesExhausted { attempts: u32 },

    /// The node rejected the call for lack of signing authority.
    #[error("missing required authority: {0}")]
    MissingRequiredAuthority(String),

    /// The method does not exist in the registered API namespace.
    #[error("no such RPC method: {0}")]
    NoSuchMethod(String),

    /// Any other structured node error. Never retried.
    #[error("node error: {0}")]
    UnhandledRpc(String),

    /// The reply arrived but was not shaped like an answer to our request.
    #[error("malformed reply: {0}")]
    BadReply(String),

    #[error("reply did not decode: {0}")]
    Json(#[from] serde_json::Error),
}
