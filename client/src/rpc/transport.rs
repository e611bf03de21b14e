//! # Blocking RPC Transport
//!
//! One socket, one request in flight, newline-delimited JSON both ways. The
//! transport owns a rotation of candidate endpoints: every (re)connect takes
//! the next one, logs in, registers the API namespaces and records the ids
//! the node assigned. Transport failures tear the connection down, sleep a
//! growing backoff and try the next endpoint, up to the retry budget;
//! structured node errors are classified and surfaced immediately, never
//! retried.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::time::Duration;

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::config::{DEFAULT_NUM_RETRIES, RECONNECT_BACKOFF_CAP, RECONNECT_BACKOFF_KNEE};
use crate::rpc::protocol::{classify, CallRequest, Reply, API_NAMESPACES, LOGIN_API};
use crate::rpc::RpcError;

/// A live, logged-in connection with its namespace registrations.
struct Connection {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
    api_ids: HashMap<String, u64>,
}

/// How one attempt failed: transport failures feed the retry loop, terminal
/// failures surface unchanged.
enum Failure {
    Transport(std::io::Error),
    Terminal(RpcError),
}

pub struct RpcTransport {
    endpoints: Vec<String>,
    credentials: (String, String),
    num_retries: i32,
    backoff_base: Duration,
    next_endpoint: usize,
    request_id: u64,
    connection: Option<Connection>,
}

impl RpcTransport {
    /// A transport over `host:port` endpoints. Connects lazily on the first
    /// call.
    pub fn new(endpoints: Vec<String>) -> Self {
        RpcTransport {
            endpoints,
            credentials: (String::new(), String::new()),
            num_retries: DEFAULT_NUM_RETRIES,
            backoff_base: Duration::from_secs(2),
            next_endpoint: 0,
            request_id: 0,
            connection: None,
        }
    }

    /// Connection-attempt budget. Negative means retry forever.
    pub fn with_retries(mut self, num_retries: i32) -> Self {
        self.num_retries = num_retries;
        self
    }

    pub fn with_credentials(mut self, user: &str, password: &str) -> Self {
        self.credentials = (user.to_string(), password.to_string());
        self
    }

    /// Backoff growth step. Tests set this to zero; production leaves the
    /// default.
    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Dispatch one call on a registered namespace, reconnecting and
    /// retrying through the endpoint rotation as needed.
    pub fn call(&mut self, namespace: &str, method: &str, args: Value) -> Result<Value, RpcError> {
        let mut attempt: u32 = 0;
        loop {
            if self.connection.is_none() {
                attempt += 1;
                if self.num_retries >= 0 && attempt > self.num_retries as u32 {
                    return Err(RpcError::RetriesExhausted {
                        attempts: attempt - 1,
                    });
                }
                self.sleep_before(attempt);
                match self.connect_next() {
                    Ok(connection) => self.connection = Some(connection),
                    Err(Failure::Transport(err)) => {
                        debug!(error = %err, "connection attempt failed");
                        continue;
                    }
                    Err(Failure::Terminal(err)) => return Err(err),
                }
            }

            let Some(connection) = self.connection.as_mut() else {
                continue;
            };
            let api_id = if namespace == "login" {
                LOGIN_API
            } else {
                match connection.api_ids.get(namespace) {
                    Some(id) => *id,
                    None => {
                        return Err(RpcError::NoSuchMethod(format!(
                            "api namespace {namespace:?} is not registered"
                        )))
                    }
                }
            };

            self.request_id += 1;
            match exchange(connection, self.request_id, api_id, method, &args) {
                Ok(result) => return Ok(result),
                Err(Failure::Transport(err)) => {
                    warn!(method, error = %err, "transport failure, reconnecting");
                    self.connection = None;
                }
                Err(Failure::Terminal(err)) => return Err(err),
            }
        }
    }

    /// Linear backoff, two seconds per prior failed attempt, capped. The
    /// first attempt never waits.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let step = attempt.saturating_sub(1).min(RECONNECT_BACKOFF_KNEE);
        (self.backoff_base * step).min(RECONNECT_BACKOFF_CAP)
    }

    fn sleep_before(&self, attempt: u32) {
        let delay = self.backoff_delay(attempt);
        if !delay.is_zero() {
            debug!(attempt, ?delay, "backing off before reconnect");
            std::thread::sleep(delay);
        }
    }

    /// Connect to the next endpoint in rotation and run the handshake:
    /// login, then register every API namespace.
    fn connect_next(&mut self) -> Result<Connection, Failure> {
        let endpoint = self.endpoints[self.next_endpoint % self.endpoints.len()].clone();
        self.next_endpoint += 1;

        let stream = TcpStream::connect(&endpoint).map_err(Failure::Transport)?;
        stream.set_nodelay(true).map_err(Failure::Transport)?;
        let reader = BufReader::new(stream.try_clone().map_err(Failure::Transport)?);
        let mut connection = Connection {
            reader,
            writer: stream,
            api_ids: HashMap::new(),
        };

        let (user, password) = self.credentials.clone();
        self.request_id += 1;
        let accepted = exchange(
            &mut connection,
            self.request_id,
            LOGIN_API,
            "login",
            &json!([user, password]),
        )?;
        if accepted != Value::Bool(true) {
            return Err(Failure::Terminal(RpcError::UnhandledRpc(format!(
                "login rejected by {endpoint}"
            ))));
        }

        for namespace in API_NAMESPACES {
            self.request_id += 1;
            let reply = exchange(
                &mut connection,
                self.request_id,
                LOGIN_API,
                namespace,
                &json!([]),
            )?;
            let id = reply.as_u64().ok_or_else(|| {
                Failure::Terminal(RpcError::BadReply(format!(
                    "non-numeric api id for {namespace}: {reply}"
                )))
            })?;
            connection.api_ids.insert(namespace.to_string(), id);
        }

        info!(endpoint, "connected and registered APIs");
        Ok(connection)
    }
}

/// Send one request and block for its reply.
fn exchange(
    connection: &mut Connection,
    request_id: u64,
    api_id: u64,
    method: &str,
    args: &Value,
) -> Result<Value, Failure> {
    let request = CallRequest::new(request_id, api_id, method, args);
    let mut line = serde_json::to_string(&request)
        .map_err(|err| Failure::Terminal(RpcError::Json(err)))?;
    line.push('\n');
    connection
        .writer
        .write_all(line.as_bytes())
        .and_then(|_| connection.writer.flush())
        .map_err(Failure::Transport)?;

    let mut reply_line = String::new();
    let read = connection
        .reader
        .read_line(&mut reply_line)
        .map_err(Failure::Transport)?;
    if read == 0 {
        return Err(Failure::Transport(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "connection closed by node",
        )));
    }

    let reply: Reply = serde_json::from_str(&reply_line)
        .map_err(|err| Failure::Terminal(RpcError::Json(err)))?;
    if let Some(error) = reply.error {
        return Err(Failure::Terminal(classify(error.text())));
    }
    if reply.id != Some(request_id) {
        return Err(Failure::Terminal(RpcError::BadReply(format!(
            "reply id {:?} does not match request id {request_id}",
            reply.id
        ))));
    }
    // No error means success, and a null result is a real answer.
    Ok(reply.result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;

    const CHAIN: &str = "6057d856c398875cac2650fe6a5a6b98fa134b5e1b775ba133b50ac5d6c12cbb";

    /// A single-connection fake node speaking the newline-JSON protocol.
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
                let reply = match method {
                    "login" => json!({"id": id, "result": true}),
                    "database" => json!({"id": id, "result": 2}),
                    "network_broadcast" => json!({"id": id, "result": 3}),
                    "history" => json!({"id": id, "result": 4}),
                    "get_chain_id" => json!({"id": id, "result": CHAIN}),
                    other => json!({
                        "id": id,
                        "error": {"message": format!("no method with name '{other}'")}
                    }),
                };
                let mut out = reply.to_string();
                out.push('\n');
                if writer.write_all(out.as_bytes()).is_err() {
                    return;
                }
            }
        });
        addr
    }

    #[test]
    fn unreachable_endpoints_exhaust_the_budget() {
        // Two dead endpoints, budget 3: exactly three attempts, cycling.
        let mut transport = RpcTransport::new(vec![
            "127.0.0.1:1".to_string(),
            "127.0.0.1:2".to_string(),
        ])
        .with_retries(3)
        .with_backoff_base(Duration::ZERO);

        match transport.call("database", "get_chain_id", json!([])) {
            Err(RpcError::RetriesExhausted { attempts }) => assert_eq!(attempts, 3),
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
        assert!(!transport.is_connected());
    }

    #[test]
    fn handshake_then_call() {
        let addr = spawn_fake_node();
        let mut transport = RpcTransport::new(vec![addr]).with_retries(1);

        let chain = transport.call("database", "get_chain_id", json!([])).unwrap();
        assert_eq!(chain, json!(CHAIN));
        assert!(transport.is_connected());
    }

    #[test]
    fn application_errors_are_terminal() {
        let addr = spawn_fake_node();
        let mut transport = RpcTransport::new(vec![addr]).with_retries(1);

        assert!(matches!(
            transport.call("database", "get_frobnicator", json!([])),
            Err(RpcError::NoSuchMethod(_))
        ));
        // The connection survives an application error.
        assert!(transport.is_connected());
    }

    #[test]
    fn rotation_skips_a_dead_endpoint() {
        let addr = spawn_fake_node();
        let mut transport = RpcTransport::new(vec!["127.0.0.1:1".to_string(), addr])
            .with_retries(2)
            .with_backoff_base(Duration::ZERO);

        let chain = transport.call("database", "get_chain_id", json!([])).unwrap();
        assert_eq!(chain, json!(CHAIN));
    }

    #[test]
    fn unregistered_namespace_is_refused() {
        let addr = spawn_fake_node();
        let mut transport = RpcTransport::new(vec![addr]).with_retries(1);
        assert!(matches!(
            transport.call("crypto", "anything", json!([])),
            Err(RpcError::NoSuchMethod(_))
        ));
    }

    #[test]
    fn backoff_grows_linearly_to_the_cap() {
        let transport = RpcTransport::new(vec!["unused".to_string()]);
        assert_eq!(transport.backoff_delay(1), Duration::ZERO);
        assert_eq!(transport.backoff_delay(2), Duration::from_secs(2));
        assert_eq!(transport.backoff_delay(4), Duration::from_secs(6));
        assert_eq!(transport.backoff_delay(100), RECONNECT_BACKOFF_CAP);
    }
}
