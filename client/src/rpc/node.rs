//! # Typed Node Facade
//!
//! [`NodeClient`] wraps the raw transport with the handful of typed calls
//! the rest of the client needs: chain identification, head-block state for
//! anchoring, account lookup, broadcast and confirmation polling. It also
//! implements the [`AccountDirectory`] and [`NodeApi`] seams so the builder
//! and memo service can run against a live node or a fixture
//! interchangeably.

use std::cell::{Cell, RefCell};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::account::{AccountDirectory, AccountRecord, DirectoryError};
use crate::codec::TimePointSec;
use crate::config::{chain_by_id, ChainParams, CONFIRMATION_POLL_INTERVAL};
use crate::object_id::ObjectId;
use crate::rpc::transport::RpcTransport;
use crate::rpc::RpcError;
use crate::transaction::builder::{ConfirmationMode, NodeApi};
use crate::transaction::signed::{Anchor, Transaction};

/// The slice of `get_dynamic_global_properties` the client consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct DynamicGlobalProperties {
    pub head_block_number: u64,
    pub head_block_id: String,
    /// Node head time, `%Y-%m-%dT%H:%M:%S`.
    pub time: String,
    #[serde(default)]
    pub last_irreversible_block_num: u64,
}

/// The slice of a block the confirmation poller consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct Block {
    pub previous: String,
    pub timestamp: String,
    #[serde(default)]
    pub transaction_ids: Vec<String>,
    #[serde(default)]
    pub transactions: Vec<Value>,
}

/// A blocking client for one node (with failover behind it).
///
/// Interior mutability keeps the read-oriented seams (`AccountDirectory`)
/// on `&self`; the client is single-threaded by design, like the transport
/// under it.
pub struct NodeClient {
    transport: RefCell<RpcTransport>,
    cached_chain_id: RefCell<Option<String>>,
    // Next block number the confirmation poller will scan.
    scan_from: Cell<Option<u64>>,
}

impl NodeClient {
    pub fn new(transport: RpcTransport) -> Self {
        NodeClient {
            transport: RefCell::new(transport),
            cached_chain_id: RefCell::new(None),
            scan_from: Cell::new(None),
        }
    }

    fn call(&self, namespace: &str, method: &str, args: Value) -> Result<Value, RpcError> {
        self.transport.borrow_mut().call(namespace, method, args)
    }

    /// The node's chain id, fetched once and cached for the connection's
    /// lifetime.
    pub fn chain_id(&self) -> Result<String, RpcError> {
        if let Some(id) = self.cached_chain_id.borrow().as_ref() {
            return Ok(id.clone());
        }
        let value = self.call("database", "get_chain_id", json!([]))?;
        let id = value
            .as_str()
            .ok_or_else(|| RpcError::BadReply(format!("non-string chain id: {value}")))?
            .to_string();
        match chain_by_id(&id) {
            Some(chain) => info!(chain = chain.name, "connected to known chain"),
            None => warn!(chain_id = %id, "connected to unrecognized chain"),
        }
        *self.cached_chain_id.borrow_mut() = Some(id.clone());
        Ok(id)
    }

    /// The registered parameters for the connected chain, if it is known.
    pub fn chain_params(&self) -> Result<Option<&'static ChainParams>, RpcError> {
        Ok(chain_by_id(&self.chain_id()?))
    }

    pub fn dynamic_global_properties(&self) -> Result<DynamicGlobalProperties, RpcError> {
        let value = self.call("database", "get_dynamic_global_properties", json!([]))?;
        Ok(serde_json::from_value(value)?)
    }

    /// A produced block by number, or `None` past the head.
    pub fn block(&self, number: u64) -> Result<Option<Block>, RpcError> {
        let value = self.call("database", "get_block", json!([number]))?;
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(value)?))
    }

    /// Look an account up by name or by `1.2.x` id.
    pub fn account(&self, name_or_id: &str) -> Result<Option<AccountRecord>, RpcError> {
        let value = if ObjectId::from_str(name_or_id).is_ok() {
            let mut objects = self.call("database", "get_objects", json!([[name_or_id]]))?;
            match objects.as_array_mut().and_then(|a| a.first_mut()) {
                Some(first) => first.take(),
                None => Value::Null,
            }
        } else {
            self.call("database", "get_account_by_name", json!([name_or_id]))?
        };
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(value)?))
    }

    /// Submit a signed transaction. The returned id is computed locally —
    /// it is the same digest the node derives.
    pub fn broadcast_transaction(&self, tx: &Transaction) -> Result<String, RpcError> {
        self.call(
            "network_broadcast",
            "broadcast_transaction",
            json!([tx]),
        )?;
        Ok(tx.id())
    }

    /// Ask the node whether the attached signatures satisfy the required
    /// authorities. A missing-authority rejection is a `false`, not a fault.
    pub fn check_authority(&self, tx: &Transaction) -> Result<bool, RpcError> {
        match self.call("database", "verify_authority", json!([tx])) {
            Ok(value) => Ok(value.as_bool().unwrap_or(false)),
            Err(RpcError::MissingRequiredAuthority(reason)) => {
                debug!(%reason, "authority check failed");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Block until the transaction appears in a produced (or irreversible)
    /// block, and return the block number.
    pub fn await_confirmation(
        &self,
        tx_id: &str,
        mode: ConfirmationMode,
    ) -> Result<u64, RpcError> {
        loop {
            if let Some(block) = self.scan_for_transaction(tx_id, mode)? {
                return Ok(block);
            }
            std::thread::sleep(CONFIRMATION_POLL_INTERVAL);
        }
    }

    /// One confirmation poll: scan every not-yet-seen block up to the
    /// mode's horizon for the transaction id.
    fn scan_for_transaction(
        &self,
        tx_id: &str,
        mode: ConfirmationMode,
    ) -> Result<Option<u64>, RpcError> {
        let props = self.dynamic_global_properties()?;
        let horizon = match mode {
            ConfirmationMode::Head => props.head_block_number,
            ConfirmationMode::Irreversible => props.last_irreversible_block_num,
        };
        let start = self.scan_from.get().unwrap_or(horizon);
        for number in start..=horizon {
            if let Some(block) = self.block(number)? {
                if block.transaction_ids.iter().any(|id| id == tx_id) {
                    self.scan_from.set(Some(number));
                    return Ok(Some(number));
                }
            }
        }
        self.scan_from.set(Some(horizon + 1));
        Ok(None)
    }
}

impl AccountDirectory for NodeClient {
    fn account(&self, name_or_id: &str) -> Result<AccountRecord, DirectoryError> {
        match NodeClient::account(self, name_or_id) {
            Ok(Some(record)) => Ok(record),
            Ok(None) => Err(DirectoryError::UnknownAccount(name_or_id.to_string())),
            Err(err) => Err(DirectoryError::Backend(err.to_string())),
        }
    }
}

impl NodeApi for NodeClient {
    fn chain_id(&mut self) -> Result<String, RpcError> {
        NodeClient::chain_id(self)
    }

    fn anchor(&mut self, expiration: Duration) -> Result<Anchor, RpcError> {
        let props = self.dynamic_global_properties()?;
        let head_time = TimePointSec::parse(&props.time)
            .map_err(|err| RpcError::BadReply(err.to_string()))?;
        let expires = TimePointSec(head_time.0 + expiration.as_secs() as u32);
        Anchor::from_head_block(props.head_block_number, &props.head_block_id, expires)
            .map_err(|err| RpcError::BadReply(err.to_string()))
    }

    fn verify_authority(&mut self, tx: &Transaction) -> Result<bool, RpcError> {
        self.check_authority(tx)
    }

    fn broadcast(&mut self, tx: &Transaction) -> Result<(), RpcError> {
        self.broadcast_transaction(tx).map(|_| ())
    }

    fn find_transaction(
        &mut self,
        tx_id: &str,
        mode: ConfirmationMode,
    ) -> Result<Option<u64>, RpcError> {
        self.scan_for_transaction(tx_id, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;

    const CHAIN: &str = "2ad1a1f442e89bcf30dbb087c21f4f85fd904eda7d2f24a3f8a161946a69cd0e";

    /// A fake node serving the database calls this module exercises.
    fn spawn_fake_node() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut writer = stream;
            let mut line = String::new();
            loop {
                line.clear();
                if reader.read_line(&mut line).unwrap_or(0) == 0 {
                    return;
                }
                let request: Value = serde_json::from_str(&line).unwrap();
                let id = &request["id"];
                let method = request["params"][1].as_str().unwrap_or("");
                let args = &request["params"][2];
                let result = match method {
                    "login" => json!(true),
                    "database" => json!(2),
                    "network_broadcast" => json!(3),
                    "history" => json!(4),
                    "get_chain_id" => json!(CHAIN),
                    "get_dynamic_global_properties" => json!({
                        "head_block_number": 200_001u64,
                        "head_block_id": "00030d41efbeadde00000000000000000000000000000000",
                        "time": "2023-11-14T22:13:20",
                        "last_irreversible_block_num": 200_000u64
                    }),
                    "get_block" => {
                        if args[0].as_u64().unwrap_or(0) > 200_001 {
                            Value::Null
                        } else {
                            json!({
                                "previous": "00030d40aaaaaaaa00000000000000000000000000000000",
                                "timestamp": "2023-11-14T22:13:18",
                                "transaction_ids": ["feedface"],
                                "transactions": []
                            })
                        }
                    }
                    "get_account_by_name" => {
                        if args[0] == json!("alice") {
                            json!({
                                "id": "1.2.1",
                                "name": "alice",
                                "owner": {"weight_threshold": 1, "account_auths": [], "key_auths": []},
                                "active": {"weight_threshold": 1, "account_auths": [], "key_auths": []},
                                "options": {"memo_key": "TESTmemo"}
                            })
                        } else {
                            Value::Null
                        }
                    }
                    "get_objects" => json!([{
                        "id": "1.2.1",
                        "name": "alice",
                        "owner": {"weight_threshold": 1, "account_auths": [], "key_auths": []},
                        "active": {"weight_threshold": 1, "account_auths": [], "key_auths": []},
                        "options": {"memo_key": "TESTmemo"}
                    }]),
                    "verify_authority" => {
                        let reply = json!({
                            "id": id,
                            "error": {"message": "missing required active authority for 1.2.1"}
                        });
                        let mut out = reply.to_string();
                        out.push('\n');
                        if writer.write_all(out.as_bytes()).is_err() {
                            return;
                        }
                        continue;
                    }
                    _ => Value::Null,
                };
                let reply = json!({"id": id, "result": result});
                let mut out = reply.to_string();
                out.push('\n');
                if writer.write_all(out.as_bytes()).is_err() {
                    return;
                }
            }
        });
        addr
    }

    fn client() -> NodeClient {
        let addr = spawn_fake_node();
        NodeClient::new(RpcTransport::new(vec![addr]).with_retries(1))
    }

    #[test]
    fn chain_id_is_cached_and_recognized() {
        let node = client();
        assert_eq!(node.chain_id().unwrap(), CHAIN);
        assert_eq!(node.chain_params().unwrap().unwrap().name, "testnet");
    }

    #[test]
    fn anchor_from_node_head() {
        let mut node = client();
        let anchor = node.anchor(Duration::from_secs(30)).unwrap();
        assert_eq!(anchor.ref_block_num, 0x0d41);
        assert_eq!(anchor.ref_block_prefix, 0xdeadbeef);
        assert_eq!(anchor.expiration, TimePointSec(1_700_000_000 + 30));
    }

    #[test]
    fn account_lookup_dispatches_on_shape() {
        let node = client();
        let by_name = NodeClient::account(&node, "alice").unwrap().unwrap();
        assert_eq!(by_name.id, "1.2.1");
        let by_id = NodeClient::account(&node, "1.2.1").unwrap().unwrap();
        assert_eq!(by_id.name, "alice");
        assert!(NodeClient::account(&node, "nobody").unwrap().is_none());
    }

    #[test]
    fn unknown_account_surfaces_through_the_directory_seam() {
        let node = client();
        let directory: &dyn AccountDirectory = &node;
        assert!(matches!(
            directory.account("nobody"),
            Err(DirectoryError::UnknownAccount(_))
        ));
    }

    #[test]
    fn authority_rejection_is_a_clean_false() {
        let node = client();
        let anchor = Anchor {
            ref_block_num: 1,
            ref_block_prefix: 2,
            expiration: TimePointSec(0),
        };
        let tx = Transaction::new(anchor, vec![]);
        assert!(!node.check_authority(&tx).unwrap());
    }

    #[test]
    fn confirmation_scan_finds_the_transaction() {
        let mut node = client();
        let found = node
            .find_transaction("feedface", ConfirmationMode::Head)
            .unwrap();
        assert_eq!(found, Some(200_001));
        assert!(node
            .find_transaction("not-there", ConfirmationMode::Head)
            .unwrap()
            .is_none());
    }

    #[test]
    fn block_past_the_head_is_none() {
        let node = client();
        assert!(node.block(200_001).unwrap().is_some());
        assert!(node.block(200_002).unwrap().is_none());
    }

    #[test]
    fn properties_deserialize() {
        let node = client();
        let props = node.dynamic_global_properties().unwrap();
        assert_eq!(props.head_block_number, 200_001);
        assert_eq!(props.last_irreversible_block_num, 200_000);
    }
}
