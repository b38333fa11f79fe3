use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

pub const FEED_URL: &str = "https://mb-api.abuse.ch/api/v1/";

/// Form parameters for the "samples uploaded recently" query.
pub const FEED_QUERY_PARAMS: [(&str, &str); 2] = [("query", "get_recent"), ("selector", "time")];

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("feed response is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("feed response must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// One feed response, kept verbatim and stored as a single document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeedRecord(Map<String, Value>);

impl FeedRecord {
    pub fn parse(body: &str) -> Result<Self, ParseError> {
        match serde_json::from_str::<Value>(body)? {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(ParseError::NotAnObject(json_kind(&other))),
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }

    pub fn field_count(&self) -> usize {
        self.0.len()
    }

    /// Status string reported by the feed, when present.
    pub fn query_status(&self) -> Option<&str> {
        self.0.get("query_status").and_then(Value::as_str)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
