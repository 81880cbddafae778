//! Wire shapes exchanged with hosts and clients.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{JoinError, RelayError, Result};

/// The three independent actions a host message can carry. Each one fires
/// when its field is set, read the same way as a join request's fields.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HostCommand {
    pub room: Option<String>,
    pub name: Option<String>,
    pub remove: Option<String>,
}

impl HostCommand {
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        if value.is_null() {
            return Err(RelayError::NullMessage);
        }

        Ok(Self {
            room: truthy(&value, "room"),
            name: truthy(&value, "name"),
            remove: truthy(&value, "remove"),
        })
    }
}

/// `{ room, name }` sent by a client that wants to join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    pub room: String,
    pub name: String,
}

impl JoinRequest {
    pub fn parse(text: &str) -> std::result::Result<Self, JoinError> {
        let value: Value = serde_json::from_str(text).map_err(|_| JoinError::NotValidJson)?;
        if value.is_null() {
            return Err(JoinError::Unknown);
        }

        match (truthy(&value, "room"), truthy(&value, "name")) {
            (Some(room), Some(name)) => Ok(Self { room, name }),
            _ => Err(JoinError::MissingRoomOrName),
        }
    }
}

/// Reads `key` as a string if it is set to something other than `null`,
/// `false`, `0` or `""`. Non-string values are rendered as JSON.
fn truthy(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[derive(Serialize)]
struct ErrorReply {
    error: String,
}

pub fn error_reply(err: &JoinError) -> String {
    let reply = ErrorReply {
        error: err.to_string(),
    };
    serde_json::to_string(&reply).unwrap_or_else(|_| r#"{"error":"unknown error"}"#.to_string())
}

/// Re-serializes a client message with `name` set to the sender. Objects
/// keep their fields; arrays and strings spread into index keys; any other
/// value contributes nothing.
pub fn tag_with_name(text: &str, name: &str) -> Result<String> {
    let value: Value = serde_json::from_str(text)?;

    let mut object: Map<String, Value> = match value {
        Value::Object(map) => map,
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| (i.to_string(), item))
            .collect(),
        Value::String(s) => s
            .chars()
            .enumerate()
            .map(|(i, c)| (i.to_string(), Value::String(c.to_string())))
            .collect(),
        _ => Map::new(),
    };
    object.insert("name".to_string(), Value::String(name.to_string()));

    Ok(serde_json::to_string(&object)?)
}
