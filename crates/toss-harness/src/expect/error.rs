//! Assertion failures raised by the expectation engine.

use serde_json::Value;
use std::fmt;

/// Which declared assertion failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectationKind {
    StatusCode,
    Header,
    HeaderContains,
    Body,
    BodyContains,
    Json,
    JsonLike,
    JsonQuery,
}

impl fmt::Display for ExpectationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExpectationKind::StatusCode => "statusCode",
            ExpectationKind::Header => "header",
            ExpectationKind::HeaderContains => "headerContains",
            ExpectationKind::Body => "body",
            ExpectationKind::BodyContains => "bodyContains",
            ExpectationKind::Json => "json",
            ExpectationKind::JsonLike => "jsonLike",
            ExpectationKind::JsonQuery => "jsonQuery",
        };
        f.write_str(label)
    }
}

/// First failing assertion of an expectation set
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExpectationError {
    #[error("Expected status code {expected}, received {actual}")]
    StatusCode { expected: u16, actual: u16 },

    #[error("Expected header '{key}' to be '{expected}', received {}", quoted(.actual))]
    Header {
        key: String,
        expected: String,
        actual: Option<String>,
    },

    #[error("Expected header '{key}' to contain '{expected}', received {}", quoted(.actual))]
    HeaderContains {
        key: String,
        expected: String,
        actual: Option<String>,
    },

    #[error("Expected body {expected}, received '{actual}'")]
    Body { expected: Value, actual: String },

    #[error("Expected body to contain '{expected}', received '{actual}'")]
    BodyContains { expected: String, actual: String },

    #[error("Expected json {expected}, received {}", json_or_missing(.actual))]
    Json {
        expected: Value,
        actual: Option<Value>,
    },

    #[error("Expected json like {expected}, received {}: {reason}", json_or_missing(.actual))]
    JsonLike {
        expected: Value,
        actual: Option<Value>,
        reason: String,
    },

    #[error("Expected json at '{path}' to be {expected}, received {}", json_or_missing(.actual))]
    JsonQuery {
        path: String,
        expected: Value,
        actual: Option<Value>,
    },

    #[error("Invalid json query path '{path}': {reason}")]
    InvalidJsonPath { path: String, reason: String },
}

impl ExpectationError {
    pub fn kind(&self) -> ExpectationKind {
        match self {
            ExpectationError::StatusCode { .. } => ExpectationKind::StatusCode,
            ExpectationError::Header { .. } => ExpectationKind::Header,
            ExpectationError::HeaderContains { .. } => ExpectationKind::HeaderContains,
            ExpectationError::Body { .. } => ExpectationKind::Body,
            ExpectationError::BodyContains { .. } => ExpectationKind::BodyContains,
            ExpectationError::Json { .. } => ExpectationKind::Json,
            ExpectationError::JsonLike { .. } => ExpectationKind::JsonLike,
            ExpectationError::JsonQuery { .. } | ExpectationError::InvalidJsonPath { .. } => {
                ExpectationKind::JsonQuery
            }
        }
    }
}

fn quoted(value: &Option<String>) -> String {
    match value {
        Some(v) => format!("'{v}'"),
        None => "no such header".to_string(),
    }
}

fn json_or_missing(value: &Option<Value>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "nothing".to_string(),
    }
}
