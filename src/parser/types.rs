use serde_json::Value;
use thiserror::Error;

/// Why a document could not be turned into a JSON value.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

/// A `launch.json` style document: a version tag plus the raw configuration entries.
///
/// Entries are kept as plain JSON values since a hand-written document may hold
/// anything in that list, including non-objects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigDocument {
    pub version: String,
    pub configurations: Vec<Value>,
}

impl ConfigDocument {
    /// Accept a parsed value only if it has a non-empty `version` string and a
    /// `configurations` array. Anything else is rejected as a whole.
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(mut map) = value else {
            return None;
        };

        let version = match map.get("version") {
            Some(Value::String(v)) if !v.is_empty() => v.clone(),
            _ => return None,
        };

        match map.remove("configurations") {
            Some(Value::Array(configurations)) => Some(Self {
                version,
                configurations,
            }),
            _ => None,
        }
    }
}
