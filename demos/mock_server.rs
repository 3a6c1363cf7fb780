//! Minimal MCP endpoint for trying the client by hand
//!
//! Usage:
//! 1. Start the server: cargo run --example mock_server
//! 2. In another terminal: cargo run -- info
//!
//! The server registers itself by writing a descriptor into the same
//! registry the client scans, and removes it again on Ctrl-C.

use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use ide_mcp_client::config::default_registry_dir;
use serde_json::{json, Value};
use std::sync::Arc;

async fn handle(
    State(token): State<Arc<String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) != Some(token.as_str()) {
        return (StatusCode::UNAUTHORIZED, "invalid auth token").into_response();
    }

    let id = body["id"].clone();
    eprintln!("[mock] {}", body["method"]);
    let reply = match body["method"].as_str() {
        Some("initialize") => json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": {
                "protocolVersion": "2024-11-05",
                "capabilities": {"tools": {"listChanged": false}},
                "serverInfo": {"name": "mock-ide", "version": env!("CARGO_PKG_VERSION")}
            }
        }),
        Some("tools/list") => json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": {
                "tools": [{
                    "name": "echo",
                    "description": "Returns its arguments",
                    "inputSchema": {"type": "object"}
                }]
            }
        }),
        Some("tools/call") => json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": {
                "content": [{"type": "text", "text": body["params"]["arguments"].to_string()}]
            }
        }),
        _ => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": {"code": -32601, "message": "Method not found"}
        }),
    };
    Json(reply).into_response()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    let pid = std::process::id();
    let token = format!("mock-{}-{}", pid, port);

    let registry = default_registry_dir();
    std::fs::create_dir_all(&registry)?;
    let descriptor = registry.join(format!("gemini-ide-server-{}-{}.json", pid, port));
    std::fs::write(
        &descriptor,
        json!({"port": port, "authToken": token, "pid": pid}).to_string(),
    )?;
    eprintln!("[MCP] listening on http://127.0.0.1:{}/mcp", port);
    eprintln!("[MCP] descriptor: {}", descriptor.display());

    let app = Router::new()
        .route("/mcp", post(handle))
        .with_state(Arc::new(token));

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await;

    let _ = std::fs::remove_file(&descriptor);
    served?;
    Ok(())
}
