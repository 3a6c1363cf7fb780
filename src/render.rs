//! Output formatting

use crate::discovery::ResolvedSession;
use crate::protocol::JsonRpcResponse;
use std::fmt::Write as _;

/// Pretty-prints the response body with two-space indentation.
pub fn render_response(response: &JsonRpcResponse) -> String {
    serde_json::to_string_pretty(response.body()).unwrap_or_else(|_| response.body().to_string())
}

/// Connection summary printed by `info`.
pub fn render_info(session: &ResolvedSession, program: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Connected to port: {}", session.port);
    let _ = writeln!(out, "Token: {}", session.token);
    let _ = writeln!(out, "Base URL: {}", session.endpoint);
    let _ = writeln!(out, "Descriptor: {}", session.descriptor.display());
    if let Some(pid) = session.pid {
        let _ = writeln!(out, "Server PID: {}", pid);
    }
    let _ = writeln!(out, "Try running: {} list", program);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::path::PathBuf;

    #[test]
    fn rendered_response_parses_back_unchanged() {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1700000000000u64,
            "result": {"zeta": [1, 2.5, null], "alpha": {"ok": true}, "text": "a\nb"}
        });
        let rendered = render_response(&JsonRpcResponse::from(body.clone()));

        let parsed: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed, body);
        assert!(rendered.contains("\n  \"result\": {\n    \"zeta\""));
        // Server key order survives.
        assert!(rendered.find("zeta").unwrap() < rendered.find("alpha").unwrap());
    }

    #[test]
    fn info_lists_connection_details() {
        let session = ResolvedSession {
            endpoint: "http://127.0.0.1:5123/mcp".parse().unwrap(),
            port: 5123,
            token: "abc".to_string(),
            pid: Some(77),
            descriptor: PathBuf::from("/tmp/gemini/ide/gemini-ide-server-77-5123.json"),
        };
        let text = render_info(&session, "ide_mcp_client");

        assert!(text.contains("Connected to port: 5123\n"));
        assert!(text.contains("Token: abc\n"));
        assert!(text.contains("Base URL: http://127.0.0.1:5123/mcp\n"));
        assert!(text.contains("Server PID: 77\n"));
        assert!(text.ends_with("Try running: ide_mcp_client list\n"));
    }
}
