mod scanner;
mod types;

pub use scanner::{strip_comments, strip_trailing_commas};
pub use types::{ConfigDocument, ParseError};

use serde_json::Value;

/// Parse JSON that may contain comments and trailing commas, reporting failures.
pub fn parse_strict(text: &str) -> Result<Value, ParseError> {
    let without_comments = strip_comments(text)?;
    let cleaned = strip_trailing_commas(&without_comments);
    Ok(serde_json::from_str(&cleaned)?)
}

/// Lenient variant: any malformed input yields an empty array.
pub fn parse(text: &str) -> Value {
    match parse_strict(text) {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!(error = %err, "falling back to empty document");
            Value::Array(Vec::new())
        }
    }
}

/// Parse a configuration document; a corrupt or wrongly shaped one is empty.
pub fn parse_document(text: &str) -> ConfigDocument {
    ConfigDocument::from_value(parse(text)).unwrap_or_default()
}
