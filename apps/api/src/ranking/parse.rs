//! Reply parsing — turns the model's text reply into a [`ScoreRecord`].
//!
//! The model is instructed to return bare JSON but routinely wraps it in
//! markdown code fences anyway, so fences are stripped before parsing.
//! Parsing never panics; every malformed reply surfaces as a [`ParseError`]
//! and the caller decides what to substitute.

use thiserror::Error;

use crate::ranking::models::ScoreRecord;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("reply is empty after fence stripping")]
    EmptyReply,

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parses a model reply into a `ScoreRecord`, stripping surrounding code
/// fences first. Strict on shape: all six fields must be present.
pub fn parse_reply(raw: &str) -> Result<ScoreRecord, ParseError> {
    let text = strip_json_fences(raw);
    if text.is_empty() {
        return Err(ParseError::EmptyReply);
    }
    Ok(serde_json::from_str(text)?)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
