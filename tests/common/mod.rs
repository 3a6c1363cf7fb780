//! Mock MCP endpoint and descriptor helpers shared by the integration tests

#![allow(dead_code)]

use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

/// A running mock server and every request body it received.
pub struct MockServer {
    pub port: u16,
    pub token: String,
    pub seen: Arc<Mutex<Vec<Value>>>,
}

impl MockServer {
    pub fn methods(&self) -> Vec<String> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|body| body["method"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    pub fn last_request(&self) -> Value {
        self.seen.lock().unwrap().last().cloned().unwrap_or(Value::Null)
    }
}

#[derive(Clone)]
struct MockState {
    token: String,
    seen: Arc<Mutex<Vec<Value>>>,
}

/// Handshake, `tools/list` and `tools/call` (echoing params) behave like a
/// real server. `explode` answers 500, `garbage` answers 200 with a non-JSON
/// body, anything else gets a JSON-RPC "method not found" error.
async fn mcp(State(state): State<MockState>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let auth = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    if auth != Some(state.token.as_str()) {
        return (StatusCode::UNAUTHORIZED, "invalid auth token").into_response();
    }
    state.seen.lock().unwrap().push(body.clone());

    let id = body["id"].clone();
    let reply = match body["method"].as_str() {
        Some("initialize") => json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": {
                "protocolVersion": "2024-11-05",
                "capabilities": {"tools": {}},
                "serverInfo": {"name": "mock-ide", "version": "0.0.1"}
            }
        }),
        Some("tools/list") => json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": {"tools": [{"name": "echo", "inputSchema": {"type": "object"}}]}
        }),
        Some("tools/call") => json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": {"echo": body["params"].clone()}
        }),
        Some("explode") => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "kaboom").into_response();
        }
        Some("garbage") => return (StatusCode::OK, "this is not json").into_response(),
        _ => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": {"code": -32601, "message": "Method not found"}
        }),
    };
    Json(reply).into_response()
}

pub async fn spawn_server(token: &str) -> MockServer {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        token: token.to_string(),
        seen: Arc::clone(&seen),
    };
    let app = Router::new().route("/mcp", post(mcp)).with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockServer {
        port,
        token: token.to_string(),
        seen,
    }
}

/// A local port with nothing listening on it.
pub async fn dead_port() -> u16 {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// Writes `gemini-ide-server-<pid>-<port>.json` and backdates it by `age`.
pub fn write_descriptor(dir: &Path, pid: u32, port: u16, token: &str, age: Duration) -> PathBuf {
    let path = dir.join(format!("gemini-ide-server-{}-{}.json", pid, port));
    let body = json!({"port": port, "authToken": token, "pid": pid});
    std::fs::write(&path, body.to_string()).unwrap();

    let file = File::options().write(true).open(&path).unwrap();
    file.set_modified(SystemTime::now() - age).unwrap();
    path
}
