//! Locating and decoding the JSON payload inside a model reply.
//!
//! Models wrap structured output in fenced code blocks, surround it with
//! prose, or emit it bare. Extraction picks one candidate span; decoding
//! classifies it into one of four shapes so callers can match exhaustively.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// A fenced block whose body starts with `[`/`{` and ends with `]`/`}`.
/// The body is greedy: it runs to the last closing bracket that is followed
/// by a fence, even across several blocks.
static FENCED_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*([\[{].*[\]}])\s*```").expect("invalid fenced block regex")
});

/// First opening bracket through the last closing bracket anywhere.
static BRACKET_SPAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)[\[{].*[\]}]").expect("invalid bracket span regex")
});

/// Shape of a decoded candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// Top-level JSON object.
    Mapping(Map<String, Value>),
    /// Top-level JSON array.
    List(Vec<Value>),
    /// Any other JSON value: string, number, boolean, null.
    Scalar(Value),
    /// Candidate is not valid JSON.
    Failure(String),
}

/// Pick the text most likely to hold the reply's JSON payload.
///
/// Tries a fenced block first, then the widest bracket span, and finally
/// falls back to the raw text unchanged.
pub fn candidate_json(raw: &str) -> &str {
    if let Some(body) = FENCED_BLOCK_RE.captures(raw).and_then(|c| c.get(1)) {
        return body.as_str().trim();
    }
    if let Some(span) = BRACKET_SPAN_RE.find(raw) {
        return span.as_str().trim();
    }
    raw
}

/// Strictly decode a candidate and classify its top-level shape.
pub fn decode(candidate: &str) -> Decoded {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Decoded::Mapping(map),
        Ok(Value::Array(items)) => Decoded::List(items),
        Ok(other) => Decoded::Scalar(other),
        Err(e) => Decoded::Failure(e.to_string()),
    }
}
