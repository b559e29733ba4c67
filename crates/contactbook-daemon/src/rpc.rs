//! Newline-delimited JSON-RPC 2.0 over the daemon's Unix socket.
//!
//! One request per line, one response line per request. Connections are
//! served concurrently; the store itself is serialized behind the
//! directory mutex in [`DaemonState`].

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tracing::{debug, error, info, warn};

use crate::commands;
use crate::DaemonState;

const JSONRPC_VERSION: &str = "2.0";

/// Incoming call.
#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub id: Value,
    pub method: String,
    /// Absent params deserialize to `null`.
    #[serde(default)]
    pub params: Value,
}

/// Outgoing reply. Exactly one of `result` / `error` is set.
#[derive(Debug, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    /// Stop the daemon once this reply has been flushed to the client.
    #[serde(skip)]
    pub stop_after: bool,
}

/// Wire error: numeric code, upper-case name, optional detail object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self::reply(id, Ok(result))
    }

    pub fn error(id: Value, error: RpcError) -> Self {
        Self::reply(id, Err(error))
    }

    fn reply(id: Value, outcome: Result<Value, RpcError>) -> Self {
        let (result, error) = match outcome {
            Ok(value) => (Some(value), None),
            Err(err) => (None, Some(err)),
        };
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result,
            error,
            stop_after: false,
        }
    }
}

impl RpcError {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
    pub const CONTACT_NOT_FOUND: i32 = -32004;
    pub const VALIDATION_FAILED: i32 = -32005;
    pub const NOTHING_TO_EXPORT: i32 = -32006;
    pub const IMPORT_FAILED: i32 = -32007;

    fn new(code: i32, message: &str, data: Option<Value>) -> Self {
        Self {
            code,
            message: message.to_string(),
            data,
        }
    }

    fn with_detail(code: i32, message: &str, detail: &str) -> Self {
        Self::new(code, message, Some(json!({ "detail": detail })))
    }

    pub fn parse_error() -> Self {
        Self::new(Self::PARSE_ERROR, "PARSE_ERROR", None)
    }

    pub fn invalid_request() -> Self {
        Self::new(Self::INVALID_REQUEST, "INVALID_REQUEST", None)
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(
            Self::METHOD_NOT_FOUND,
            "METHOD_NOT_FOUND",
            Some(json!({ "method": method })),
        )
    }

    pub fn invalid_params(detail: &str) -> Self {
        Self::with_detail(Self::INVALID_PARAMS, "INVALID_PARAMS", detail)
    }

    pub fn internal_error(detail: &str) -> Self {
        Self::with_detail(Self::INTERNAL_ERROR, "INTERNAL_ERROR", detail)
    }

    pub fn contact_not_found(id: i64) -> Self {
        Self::new(
            Self::CONTACT_NOT_FOUND,
            "CONTACT_NOT_FOUND",
            Some(json!({ "id": id })),
        )
    }

    pub fn validation_failed(field: &str, detail: &str) -> Self {
        Self::new(
            Self::VALIDATION_FAILED,
            "VALIDATION_FAILED",
            Some(json!({ "field": field, "detail": detail })),
        )
    }

    pub fn nothing_to_export() -> Self {
        Self::new(Self::NOTHING_TO_EXPORT, "NOTHING_TO_EXPORT", None)
    }

    pub fn import_failed(detail: &str) -> Self {
        Self::with_detail(Self::IMPORT_FAILED, "IMPORT_FAILED", detail)
    }
}

/// Socket listener bound to the daemon state.
pub struct RpcServer {
    state: Arc<DaemonState>,
    socket_path: PathBuf,
}

impl RpcServer {
    pub fn new(state: Arc<DaemonState>, socket_path: PathBuf) -> Self {
        Self { state, socket_path }
    }

    /// Bind the socket and serve until the task is dropped.
    ///
    /// A leftover socket file from an unclean exit is replaced.
    pub async fn run(&self) -> anyhow::Result<()> {
        if self.socket_path.exists() {
            std::fs::remove_file(&self.socket_path)?;
        }
        let listener = UnixListener::bind(&self.socket_path)?;
        info!("Listening for clients on {:?}", self.socket_path);

        loop {
            let stream = match listener.accept().await {
                Ok((stream, _)) => stream,
                Err(e) => {
                    error!("Failed to accept client: {}", e);
                    continue;
                }
            };
            let state = Arc::clone(&self.state);
            tokio::spawn(async move {
                if let Err(e) = serve_client(state, stream).await {
                    warn!("Client session ended with error: {}", e);
                }
            });
        }
    }
}

/// Answer requests from one client until it hangs up.
async fn serve_client(state: Arc<DaemonState>, stream: UnixStream) -> anyhow::Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_line(&state, &line).await;
        let mut encoded = serde_json::to_vec(&response)?;
        encoded.push(b'\n');
        write_half.write_all(&encoded).await?;
        write_half.flush().await?;

        if response.stop_after {
            info!("Reply to shutdown delivered, signalling daemon stop");
            let _ = state.shutdown_tx.send(());
            break;
        }
    }

    debug!("Client disconnected");
    Ok(())
}

/// Parse and answer one request line.
async fn handle_line(state: &Arc<DaemonState>, line: &str) -> RpcResponse {
    let request = match serde_json::from_str::<RpcRequest>(line) {
        Ok(request) => request,
        Err(e) => {
            debug!("Unparseable request: {}", e);
            return RpcResponse::error(Value::Null, RpcError::parse_error());
        }
    };
    if request.jsonrpc != JSONRPC_VERSION {
        return RpcResponse::error(request.id, RpcError::invalid_request());
    }

    let RpcRequest {
        id, method, params, ..
    } = request;
    let mut response = RpcResponse::reply(id, dispatch(state, &method, &params).await);
    response.stop_after = method == "shutdown" && response.error.is_none();
    response
}

/// Route a method name to its handler.
async fn dispatch(state: &Arc<DaemonState>, method: &str, params: &Value) -> commands::Result {
    debug!("RPC call: {}", method);

    match method {
        "list_contacts" => commands::contacts::list_contacts(state, params).await,
        "get_contact" => commands::contacts::get_contact(state, params).await,
        "create_contact" => commands::contacts::create_contact(state, params).await,
        "update_contact" => commands::contacts::update_contact(state, params).await,
        "delete_contact" => commands::contacts::delete_contact(state, params).await,
        "toggle_favorite" => commands::contacts::toggle_favorite(state, params).await,

        "export_contacts" => commands::transfer::export_contacts(state, params).await,
        "import_contacts" => commands::transfer::import_contacts(state, params).await,
        "download_template" => commands::transfer::download_template(params).await,

        "get_daemon_info" => commands::diagnostics::get_daemon_info(state).await,
        "shutdown" => commands::diagnostics::shutdown(state).await,

        _ => Err(RpcError::method_not_found(method)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_error_codes() {
        let err = RpcError::contact_not_found(3);
        assert_eq!(err.code, RpcError::CONTACT_NOT_FOUND);
        assert_eq!(err.message, "CONTACT_NOT_FOUND");
        assert_eq!(err.data.expect("data")["id"], 3);

        assert_eq!(RpcError::nothing_to_export().code, -32006);
        assert_eq!(RpcError::import_failed("zip").code, -32007);
        assert_eq!(RpcError::validation_failed("name", "empty").code, -32005);
    }

    #[test]
    fn test_reply_sets_exactly_one_side() {
        let ok = RpcResponse::success(json!(1), json!({"deleted": true}));
        assert!(ok.result.is_some() && ok.error.is_none());

        let encoded = serde_json::to_value(RpcResponse::error(json!(7), RpcError::parse_error()))
            .expect("serialize");
        assert_eq!(encoded["jsonrpc"], "2.0");
        assert!(encoded.get("result").is_none());
        assert_eq!(encoded["error"]["code"], -32700);
        assert!(encoded["error"].get("data").is_none());
    }

    #[tokio::test]
    async fn test_handle_line_dispatches() {
        let state = DaemonState::for_tests();

        let resp = handle_line(
            &state,
            r#"{"jsonrpc":"2.0","id":1,"method":"create_contact","params":{"contact":{"name":"Alice"}}}"#,
        )
        .await;
        assert_eq!(resp.id, json!(1));
        assert_eq!(resp.result.expect("result")["name"], "Alice");

        let resp = handle_line(&state, r#"{"jsonrpc":"2.0","id":2,"method":"list_contacts"}"#).await;
        assert_eq!(resp.result.expect("result").as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_handle_line_protocol_errors() {
        let state = DaemonState::for_tests();

        let resp = handle_line(&state, "not json").await;
        assert_eq!(resp.id, Value::Null);
        assert_eq!(resp.error.expect("error").code, RpcError::PARSE_ERROR);

        let resp = handle_line(&state, r#"{"jsonrpc":"1.0","id":1,"method":"list_contacts"}"#).await;
        assert_eq!(resp.error.expect("error").code, RpcError::INVALID_REQUEST);

        let resp = handle_line(&state, r#"{"jsonrpc":"2.0","id":1,"method":"frobnicate"}"#).await;
        assert_eq!(resp.error.expect("error").code, RpcError::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_socket_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let socket_path = dir.path().join("test.sock");
        let server = RpcServer::new(DaemonState::for_tests(), socket_path.clone());
        let server_task = tokio::spawn(async move { server.run().await });

        let mut stream = None;
        for _ in 0..50 {
            if let Ok(s) = UnixStream::connect(&socket_path).await {
                stream = Some(s);
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        let stream = stream.expect("connect to server");
        let (read_half, mut write_half) = stream.into_split();
        let mut lines = BufReader::new(read_half).lines();

        write_half
            .write_all(b"{\"jsonrpc\":\"2.0\",\"id\":5,\"method\":\"get_daemon_info\"}\n")
            .await
            .expect("write request");
        let line = lines.next_line().await.expect("read").expect("response line");
        let resp: Value = serde_json::from_str(&line).expect("parse response");
        assert_eq!(resp["id"], 5);
        assert_eq!(resp["result"]["contact_count"], 0);

        server_task.abort();
    }

    #[tokio::test]
    async fn test_shutdown_reply_arrives_before_stop_signal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let socket_path = dir.path().join("stop.sock");
        let state = DaemonState::for_tests();
        let mut shutdown_rx = state.shutdown_tx.subscribe();
        let server = RpcServer::new(state, socket_path.clone());
        let server_task = tokio::spawn(async move { server.run().await });

        let mut stream = None;
        for _ in 0..50 {
            if let Ok(s) = UnixStream::connect(&socket_path).await {
                stream = Some(s);
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        let (read_half, mut write_half) = stream.expect("connect to server").into_split();
        let mut lines = BufReader::new(read_half).lines();

        write_half
            .write_all(b"{\"jsonrpc\":\"2.0\",\"id\":9,\"method\":\"shutdown\"}\n")
            .await
            .expect("write request");

        // Nothing is signalled until the reply has been written.
        let line = lines.next_line().await.expect("read").expect("response line");
        let resp: Value = serde_json::from_str(&line).expect("parse response");
        assert_eq!(resp["result"]["stopping"], true);
        assert!(resp.get("stop_after").is_none());

        tokio::time::timeout(std::time::Duration::from_secs(1), shutdown_rx.recv())
            .await
            .expect("stop signal in time")
            .expect("stop signal");

        server_task.abort();
    }

    #[tokio::test]
    async fn test_only_successful_shutdown_stops() {
        let state = DaemonState::for_tests();
        let resp = handle_line(&state, r#"{"jsonrpc":"2.0","id":1,"method":"shutdown"}"#).await;
        assert!(resp.stop_after);

        let resp = handle_line(&state, r#"{"jsonrpc":"2.0","id":2,"method":"get_daemon_info"}"#).await;
        assert!(!resp.stop_after);
    }
}
