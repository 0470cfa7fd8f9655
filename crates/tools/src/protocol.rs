//! JSON-RPC 2.0 message handling for the Model Context Protocol.
//!
//! Transports hand every inbound message to [`McpHandler::handle_message`] and
//! write back whatever it returns. Supported methods: `initialize`, `ping`,
//! `tools/list`, `tools/call`, plus the `notifications/*` family (acknowledged
//! silently). Tool failures are reported inside a successful response with
//! `isError: true`, so one failing call never affects the transport.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::ToolError;
use crate::registry::ToolRegistry;

pub const JSONRPC_VERSION: &str = "2.0";

/// Protocol revision answered when the client does not request one.
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

// ============================================================================
// Wire Structures
// ============================================================================

#[derive(Debug, Deserialize)]
struct Request {
    #[serde(default)]
    jsonrpc: Option<String>,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Serialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl Response {
    fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

// ============================================================================
// McpHandler
// ============================================================================

/// Dispatches protocol messages against a [`ToolRegistry`].
#[derive(Clone)]
pub struct McpHandler {
    registry: Arc<ToolRegistry>,
    server_name: String,
    server_version: String,
}

impl McpHandler {
    pub fn new(registry: Arc<ToolRegistry>, server_name: impl Into<String>) -> Self {
        Self {
            registry,
            server_name: server_name.into(),
            server_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Handles one raw message. Returns the serialized response, or `None`
    /// for notifications and client responses.
    pub async fn handle_message(&self, raw: &str) -> Option<String> {
        let response = match serde_json::from_str::<Value>(raw) {
            Ok(value) => self.handle_value(value).await?,
            Err(e) => {
                warn!("Discarding unparseable message: {}", e);
                Response::failure(Value::Null, PARSE_ERROR, format!("Parse error: {}", e))
            }
        };

        match serde_json::to_string(&response) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Failed to serialize response: {}", e);
                None
            }
        }
    }

    /// Handles one decoded message.
    pub async fn handle_value(&self, value: Value) -> Option<Response> {
        let is_request = value.get("method").is_some();
        if !is_request {
            if value.get("result").is_some() || value.get("error").is_some() {
                debug!("Ignoring client response message");
                return None;
            }
            let id = value.get("id").cloned().unwrap_or(Value::Null);
            return Some(Response::failure(id, INVALID_REQUEST, "Invalid request"));
        }

        // An explicit `"id": null` is still a request; only an absent id marks a notification.
        let id = value.get("id").cloned();
        let request: Request = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return Some(Response::failure(
                    Value::Null,
                    INVALID_REQUEST,
                    format!("Invalid request: {}", e),
                ))
            }
        };

        if request.jsonrpc.as_deref() != Some(JSONRPC_VERSION) {
            debug!("Request '{}' without jsonrpc 2.0 marker", request.method);
        }

        let Some(id) = id else {
            debug!("Notification '{}'", request.method);
            return None;
        };

        let outcome = match request.method.as_str() {
            "initialize" => Ok(self.initialize(&request.params)),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(self.list_tools()),
            "tools/call" => self.call_tool(request.params).await,
            other => Err((METHOD_NOT_FOUND, format!("Method not found: {}", other))),
        };

        Some(match outcome {
            Ok(result) => Response::success(id, result),
            Err((code, message)) => Response::failure(id, code, message),
        })
    }

    fn initialize(&self, params: &Value) -> Value {
        let version = params
            .get("protocolVersion")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_PROTOCOL_VERSION);
        json!({
            "protocolVersion": version,
            "capabilities": { "tools": { "listChanged": false } },
            "serverInfo": { "name": self.server_name, "version": self.server_version },
        })
    }

    fn list_tools(&self) -> Value {
        json!({ "tools": self.registry.list() })
    }

    async fn call_tool(&self, params: Value) -> Result<Value, (i64, String)> {
        let params: CallParams = serde_json::from_value(params)
            .map_err(|e| (INVALID_PARAMS, format!("Invalid tools/call params: {}", e)))?;

        match self.registry.call(&params.name, params.arguments).await {
            Ok(table) => {
                let text = serde_json::to_string(&table.records())
                    .map_err(|e| (INTERNAL_ERROR, e.to_string()))?;
                Ok(json!({
                    "content": [{ "type": "text", "text": text }],
                    "isError": false,
                }))
            }
            Err(e @ (ToolError::NotFound(_) | ToolError::InvalidArguments(_))) => {
                Err((INVALID_PARAMS, e.to_string()))
            }
            Err(e) => Ok(json!({
                "content": [{ "type": "text", "text": e.to_string() }],
                "isError": true,
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ToolDescriptor;
    use crate::test_support::{quote_table, StubOperation};

    fn handler() -> McpHandler {
        let mut registry = ToolRegistry::default();
        registry
            .register(ToolDescriptor::from_operation(StubOperation::rows(
                "daily",
                quote_table(),
            )))
            .unwrap();
        registry
            .register(ToolDescriptor::from_operation(StubOperation::failing(
                "income",
                "Failed to fetch income statements",
            )))
            .unwrap();
        McpHandler::new(Arc::new(registry), "finData")
    }

    async fn roundtrip(handler: &McpHandler, message: Value) -> Value {
        let text = handler
            .handle_message(&message.to_string())
            .await
            .expect("response");
        serde_json::from_str(&text).unwrap()
    }

    #[tokio::test]
    async fn test_initialize_echoes_protocol_version() {
        let response = roundtrip(
            &handler(),
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "initialize",
                "params": { "protocolVersion": "2025-03-26" }
            }),
        )
        .await;

        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["protocolVersion"], "2025-03-26");
        assert_eq!(response["result"]["serverInfo"]["name"], "finData");
        assert_eq!(
            response["result"]["capabilities"]["tools"]["listChanged"],
            false
        );
    }

    #[tokio::test]
    async fn test_initialize_default_version() {
        let response = roundtrip(
            &handler(),
            json!({ "jsonrpc": "2.0", "id": "a", "method": "initialize" }),
        )
        .await;
        assert_eq!(
            response["result"]["protocolVersion"],
            DEFAULT_PROTOCOL_VERSION
        );
    }

    #[tokio::test]
    async fn test_notification_has_no_response() {
        let handler = handler();
        let out = handler
            .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn test_null_id_is_answered() {
        let response = roundtrip(
            &handler(),
            json!({ "jsonrpc": "2.0", "id": null, "method": "ping" }),
        )
        .await;
        assert_eq!(response["id"], Value::Null);
        assert_eq!(response["result"], json!({}));
    }

    #[tokio::test]
    async fn test_client_response_is_ignored() {
        let handler = handler();
        let out = handler
            .handle_message(r#"{"jsonrpc":"2.0","id":7,"result":{}}"#)
            .await;
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn test_tools_list() {
        let response = roundtrip(
            &handler(),
            json!({ "jsonrpc": "2.0", "id": 2, "method": "tools/list" }),
        )
        .await;

        let tools = response["result"]["tools"].as_array().unwrap();
        let names: Vec<_> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["daily", "income"]);
        assert!(tools[0]["inputSchema"].is_object());
    }

    #[tokio::test]
    async fn test_tools_call_success_returns_records() {
        let response = roundtrip(
            &handler(),
            json!({
                "jsonrpc": "2.0",
                "id": 3,
                "method": "tools/call",
                "params": { "name": "daily", "arguments": { "ts_code": "000001.SZ" } }
            }),
        )
        .await;

        assert_eq!(response["result"]["isError"], false);
        let text = response["result"]["content"][0]["text"].as_str().unwrap();
        let rows: Value = serde_json::from_str(text).unwrap();
        assert_eq!(rows, json!([{ "ts_code": "000001.SZ", "close": 10.5 }]));
    }

    #[tokio::test]
    async fn test_tools_call_failure_is_tool_error() {
        let response = roundtrip(
            &handler(),
            json!({
                "jsonrpc": "2.0",
                "id": 4,
                "method": "tools/call",
                "params": { "name": "income", "arguments": {} }
            }),
        )
        .await;

        assert!(response.get("error").is_none());
        assert_eq!(response["result"]["isError"], true);
        let text = response["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("Failed to fetch income statements: "));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_invalid_params() {
        let response = roundtrip(
            &handler(),
            json!({
                "jsonrpc": "2.0",
                "id": 5,
                "method": "tools/call",
                "params": { "name": "weather" }
            }),
        )
        .await;
        assert_eq!(response["error"]["code"], INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let response = roundtrip(
            &handler(),
            json!({ "jsonrpc": "2.0", "id": 6, "method": "resources/list" }),
        )
        .await;
        assert_eq!(response["error"]["code"], METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_parse_error() {
        let handler = handler();
        let text = handler.handle_message("{not json").await.unwrap();
        let response: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(response["error"]["code"], PARSE_ERROR);
        assert_eq!(response["id"], Value::Null);
    }

    #[tokio::test]
    async fn test_batch_is_invalid_request() {
        let response = roundtrip(&handler(), json!([{ "jsonrpc": "2.0", "id": 1, "method": "ping" }])).await;
        assert_eq!(response["error"]["code"], INVALID_REQUEST);
    }

    #[tokio::test]
    async fn test_ping() {
        let response = roundtrip(
            &handler(),
            json!({ "jsonrpc": "2.0", "id": 8, "method": "ping" }),
        )
        .await;
        assert_eq!(response["result"], json!({}));
    }
}
