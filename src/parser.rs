use thiserror::Error;

use crate::value::NestedValue;

const UTF8_BOM: &str = "\u{feff}";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("content is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decode one JSON document.
pub fn parse(text: &str) -> Result<NestedValue, ParseError> {
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);
    let value: serde_json::Value = serde_json::from_str(text)?;
    Ok(value.into())
}
