//! # JSON-RPC Envelope
//!
//! Classifies incoming JSON-RPC 2.0 messages and builds outgoing ones. The
//! typed payloads (`InitializeResult`, `PublishDiagnosticsParams`, ...) come
//! from `lsp-types`; this module only deals with the envelope around them.

use serde_json::{json, Map, Value};

/// Invalid JSON was received.
pub const PARSE_ERROR: i64 = -32700;
/// The JSON sent is not a valid request object.
pub const INVALID_REQUEST: i64 = -32600;
/// The method does not exist or is not available.
pub const METHOD_NOT_FOUND: i64 = -32601;
/// Invalid method parameters.
pub const INVALID_PARAMS: i64 = -32602;
/// A request arrived before `initialize`.
pub const SERVER_NOT_INITIALIZED: i64 = -32002;

/// An incoming message, classified by the presence of `method` and `id`.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Has both `method` and `id`; expects a response.
    Request {
        id: Value,
        method: String,
        params: Value,
    },
    /// Has `method` but no `id`.
    Notification { method: String, params: Value },
    /// A response to a server-initiated request.
    Response { id: Value },
}

/// A message that could not be classified.
///
/// `id` is the request id when one could be recovered, `null` otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidMessage {
    pub id: Value,
    pub reason: String,
}

impl Message {
    /// Classify a parsed JSON value.
    pub fn parse(value: Value) -> Result<Self, InvalidMessage> {
        let Value::Object(mut map) = value else {
            return Err(InvalidMessage {
                id: Value::Null,
                reason: "message is not a JSON object".to_string(),
            });
        };
        let id = map.remove("id");
        let params = map.remove("params").unwrap_or(Value::Null);

        match (map.remove("method"), id) {
            (Some(Value::String(method)), Some(id)) => Ok(Message::Request { id, method, params }),
            (Some(Value::String(method)), None) => Ok(Message::Notification { method, params }),
            (Some(_), id) => Err(InvalidMessage {
                id: id.unwrap_or(Value::Null),
                reason: "method is not a string".to_string(),
            }),
            (None, Some(id)) if is_response(&map) => Ok(Message::Response { id }),
            (None, id) => Err(InvalidMessage {
                id: id.unwrap_or(Value::Null),
                reason: "message has neither a method nor a result".to_string(),
            }),
        }
    }
}

fn is_response(map: &Map<String, Value>) -> bool {
    map.contains_key("result") || map.contains_key("error")
}

/// A successful response.
pub fn response(id: Value, result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}

/// An error response.
pub fn error_response(id: Value, code: i64, message: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": code, "message": message },
    })
}

/// A server-to-client notification.
pub fn notification(method: &str, params: Value) -> Value {
    json!({ "jsonrpc": "2.0", "method": method, "params": params })
}
