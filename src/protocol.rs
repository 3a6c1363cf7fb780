//! JSON-RPC 2.0 envelope types and the MCP handshake payload

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Version tag carried by every JSON-RPC 2.0 message.
pub const JSONRPC_VERSION: &str = "2.0";

/// MCP protocol revision announced during the handshake.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Request id used for the discovery handshake.
pub const HANDSHAKE_ID: u64 = 1;

/// A JSON-RPC request as sent to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: Value,
    pub id: u64,
}

impl JsonRpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id,
        }
    }

    /// `initialize` request sent to every discovery candidate.
    pub fn initialize() -> Self {
        let params = InitializeParams {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: Map::new(),
            client_info: ClientInfo::default(),
        };
        // InitializeParams only holds strings and maps, so this cannot fail.
        let params = serde_json::to_value(params).unwrap_or_else(|_| Value::Object(Map::new()));
        Self::new(HANDSHAKE_ID, "initialize", params)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    pub protocol_version: String,
    pub capabilities: Map<String, Value>,
    pub client_info: ClientInfo,
}

/// Identity the client reports during the handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self {
            name: "test-script".to_string(),
            version: "1.0".to_string(),
        }
    }
}

/// Error object of a JSON-RPC response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A decoded response body.
///
/// The body is kept as received (key order included) so that what gets
/// printed is exactly what the server sent. Whether it carries `result` or
/// `error` is left to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRpcResponse(Value);

impl JsonRpcResponse {
    pub fn new(body: Value) -> Self {
        Self(body)
    }

    pub fn body(&self) -> &Value {
        &self.0
    }

    pub fn into_body(self) -> Value {
        self.0
    }

    pub fn result(&self) -> Option<&Value> {
        self.0.get("result")
    }

    /// The `error` member, if present and well formed.
    pub fn error(&self) -> Option<JsonRpcError> {
        self.0
            .get("error")
            .and_then(|e| serde_json::from_value(e.clone()).ok())
    }

    pub fn is_error(&self) -> bool {
        self.0.get("error").is_some()
    }
}

impl From<Value> for JsonRpcResponse {
    fn from(body: Value) -> Self {
        Self(body)
    }
}
