//! Captured outcome of an outbound call.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Coarse classification of a failed outbound call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkErrorKind {
    Connect,
    Timeout,
    Body,
    Request,
}

impl fmt::Display for NetworkErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NetworkErrorKind::Connect => "connect",
            NetworkErrorKind::Timeout => "timeout",
            NetworkErrorKind::Body => "body",
            NetworkErrorKind::Request => "request",
        };
        f.write_str(label)
    }
}

/// An outbound call that failed before a response was read
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} error: {message}")]
pub struct NetworkError {
    pub kind: NetworkErrorKind,
    pub message: String,
}

impl From<&reqwest::Error> for NetworkError {
    fn from(error: &reqwest::Error) -> Self {
        let kind = if error.is_timeout() {
            NetworkErrorKind::Timeout
        } else if error.is_connect() {
            NetworkErrorKind::Connect
        } else if error.is_body() || error.is_decode() {
            NetworkErrorKind::Body
        } else {
            NetworkErrorKind::Request
        };
        Self {
            kind,
            message: error.to_string(),
        }
    }
}

/// Status, headers and body observed for an invocation.
///
/// A network failure is captured as a record with status `0`, no headers,
/// an empty body and `error` set, so expectations run uniformly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseRecord {
    pub status: u16,
    /// Header names are lower-cased
    pub headers: HashMap<String, String>,
    pub raw_body: String,
    /// Parsed body, populated by `parse_json` when the body is valid JSON
    pub json: Option<serde_json::Value>,
    pub error: Option<NetworkError>,
}

impl ResponseRecord {
    pub fn new(status: u16, raw_body: impl Into<String>) -> Self {
        Self {
            status,
            raw_body: raw_body.into(),
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn from_network_error(error: NetworkError) -> Self {
        Self {
            error: Some(error),
            ..Default::default()
        }
    }

    pub fn is_network_error(&self) -> bool {
        self.error.is_some()
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Parse the raw body as JSON; a body that does not parse leaves `json`
    /// empty.
    pub fn parse_json(&mut self) {
        if self.json.is_none() {
            self.json = serde_json::from_str(&self.raw_body).ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let record = ResponseRecord::new(200, "").with_header("Content-Type", "application/json");
        assert_eq!(record.header("content-type"), Some("application/json"));
        assert_eq!(record.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(record.header("x-missing"), None);
    }

    #[test]
    fn test_parse_json_is_lenient() {
        let mut record = ResponseRecord::new(200, r#"{"id": 1}"#);
        record.parse_json();
        assert_eq!(record.json, Some(json!({"id": 1})));

        let mut record = ResponseRecord::new(200, "plain text");
        record.parse_json();
        assert_eq!(record.json, None);
    }

    #[test]
    fn test_network_error_record() {
        let record = ResponseRecord::from_network_error(NetworkError {
            kind: NetworkErrorKind::Connect,
            message: "connection refused".to_string(),
        });
        assert!(record.is_network_error());
        assert_eq!(record.status, 0);
        assert!(record.raw_body.is_empty());
        assert_eq!(
            record.error.unwrap().to_string(),
            "connect error: connection refused"
        );
    }
}
