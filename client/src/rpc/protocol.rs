//! # JSON-RPC Wire Shapes
//!
//! Requests go out as `{"method":"call","params":[api_id, method, args],
//! "jsonrpc":"2.0","id":N}` with a strictly increasing `id`. Replies carry
//! either `result` or a structured `error`; error text is classified into
//! typed [`RpcError`] kinds by pattern so callers can match on the condition
//! rather than grep strings themselves.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rpc::RpcError;

/// The login API is always namespace 1; every other namespace id is
/// assigned by the node at registration time.
pub const LOGIN_API: u64 = 1;

/// Namespaces registered on every fresh connection, in this order.
pub const API_NAMESPACES: &[&str] = &["database", "network_broadcast", "history"];

/// One outgoing call.
#[derive(Debug, Serialize)]
pub struct CallRequest<'a> {
    pub method: &'static str,
    pub params: (u64, &'a str, &'a Value),
    pub jsonrpc: &'static str,
    pub id: u64,
}

impl<'a> CallRequest<'a> {
    pub fn new(id: u64, api_id: u64, method: &'a str, args: &'a Value) -> Self {
        CallRequest {
            method: "call",
            params: (api_id, method, args),
            jsonrpc: "2.0",
            id,
        }
    }
}

/// One incoming reply. A reply without an `error` is a success, and its
/// `result` may legitimately be JSON null — lookups of things that do not
/// exist (an unknown account name, a block past the head) answer that way.
#[derive(Debug, Deserialize)]
pub struct Reply {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub error: Option<ReplyError>,
}

/// The node's structured error payload. `detail` carries the full trace
/// when present and is preferred over the short `message`.
#[derive(Debug, Deserialize)]
pub struct ReplyError {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ReplyError {
    pub fn text(&self) -> &str {
        self.detail
            .as_deref()
            .or(self.message.as_deref())
            .unwrap_or("unknown node error")
    }
}

/// Turn a node error string into a typed error. Application errors are
/// terminal; the transport never retries them.
pub fn classify(text: &str) -> RpcError {
    if text.contains("missing required active authority")
        || text.contains("missing required owner authority")
    {
        RpcError::MissingRequiredAuthority(text.to_string())
    } else if text.starts_with("no method with name") {
        RpcError::NoSuchMethod(text.to_string())
    } else {
        RpcError::UnhandledRpc(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_shape() {
        let args = json!(["alice"]);
        let request = CallRequest::new(7, 2, "get_account_by_name", &args);
        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(
            encoded,
            json!({
                "method": "call",
                "params": [2, "get_account_by_name", ["alice"]],
                "jsonrpc": "2.0",
                "id": 7
            })
        );
    }

    #[test]
    fn reply_with_result() {
        let reply: Reply =
            serde_json::from_str(r#"{"id":7,"jsonrpc":"2.0","result":42}"#).unwrap();
        assert_eq!(reply.id, Some(7));
        assert_eq!(reply.result, json!(42));
        assert!(reply.error.is_none());
    }

    #[test]
    fn null_result_is_a_successful_reply() {
        // get_account_by_name and get_block answer unknown lookups this way.
        let reply: Reply = serde_json::from_str(r#"{"id":3,"result":null}"#).unwrap();
        assert!(reply.error.is_none());
        assert_eq!(reply.result, Value::Null);
    }

    #[test]
    fn reply_error_prefers_detail() {
        let reply: Reply = serde_json::from_str(
            r#"{"id":7,"error":{"message":"short","detail":"long trace"}}"#,
        )
        .unwrap();
        assert_eq!(reply.error.unwrap().text(), "long trace");
    }

    #[test]
    fn classification_patterns() {
        assert!(matches!(
            classify("rethrow: missing required active authority for 1.2.1"),
            RpcError::MissingRequiredAuthority(_)
        ));
        assert!(matches!(
            classify("no method with name 'get_frobnicator'"),
            RpcError::NoSuchMethod(_)
        ));
        assert!(matches!(
            classify("assert_exception: insufficient balance"),
            RpcError::UnhandledRpc(_)
        ));
    }
}
