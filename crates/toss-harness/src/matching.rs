//! Request matching engine.
//!
//! Given an inbound request and a port's registry, decides which interactions
//! match, marks them exercised and picks the response to serve. The scan is
//! synchronous and performs no I/O, so callers can run it under the registry
//! lock.

use crate::interaction::{InteractionRequest, InteractionResponse};
use crate::mock::InteractionRegistry;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Status served when no interaction matches
pub const NOT_FOUND_STATUS: u16 = 404;
/// Body served when no interaction matches
pub const NOT_FOUND_BODY: &str = "Interaction Not Found";

/// How to pick a response when several interactions match one request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchPolicy {
    /// Every matching interaction is marked exercised; the last one in
    /// registration order supplies the response.
    #[default]
    LastMatchWins,
    /// Stop at the first matching interaction; later ones stay untouched.
    FirstMatchWins,
}

/// A request as seen by the mock server, normalized for matching
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InboundRequest {
    pub method: String,
    pub path: String,
    /// Decoded query parameters
    pub query: HashMap<String, String>,
    /// Header names are lower-cased
    pub headers: HashMap<String, String>,
    /// JSON body when the content type is JSON, raw text otherwise
    pub body: Option<serde_json::Value>,
}

impl InboundRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    /// Parse and attach a raw query string (`a=1&b=two`)
    pub fn with_query_string(mut self, query: &str) -> Self {
        self.query = parse_query_string(query);
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Build the body view from raw bytes.
    ///
    /// JSON content types are parsed; anything else (or JSON that fails to
    /// parse) is kept as a string. Empty payloads yield no body.
    pub fn body_from_raw(content_type: Option<&str>, raw: &[u8]) -> Option<serde_json::Value> {
        if raw.is_empty() {
            return None;
        }
        let is_json = content_type
            .map(|ct| ct.to_ascii_lowercase().contains("json"))
            .unwrap_or(false);
        if is_json {
            if let Ok(value) = serde_json::from_slice(raw) {
                return Some(value);
            }
        }
        Some(serde_json::Value::String(
            String::from_utf8_lossy(raw).into_owned(),
        ))
    }
}

/// Parse a query string into a map, URL-decoding keys and values
pub fn parse_query_string(query: &str) -> HashMap<String, String> {
    let decode = |s: &str| {
        let s = s.replace('+', " ");
        urlencoding::decode(&s)
            .map(|d| d.into_owned())
            .unwrap_or(s)
    };

    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (decode(key), decode(value)),
            None => (decode(pair), String::new()),
        })
        .collect()
}

/// Check whether a request satisfies an interaction's predicate
pub fn request_matches(expected: &InteractionRequest, request: &InboundRequest) -> bool {
    expected.method.as_str() == request.method
        && expected.path == request.path
        && query_matches(expected.query.as_ref(), &request.query)
        && headers_match(expected.headers.as_ref(), &request.headers)
        && body_matches(expected.body.as_ref(), request.body.as_ref())
}

/// Subset match: declared keys must be present with equal values
fn query_matches(
    expected: Option<&BTreeMap<String, String>>,
    actual: &HashMap<String, String>,
) -> bool {
    let Some(expected) = expected else {
        return true;
    };
    expected
        .iter()
        .all(|(key, value)| actual.get(key) == Some(value))
}

/// Subset match on headers; names are case-insensitive, values exact
fn headers_match(
    expected: Option<&BTreeMap<String, String>>,
    actual: &HashMap<String, String>,
) -> bool {
    let Some(expected) = expected else {
        return true;
    };
    expected
        .iter()
        .all(|(name, value)| actual.get(&name.to_ascii_lowercase()) == Some(value))
}

fn body_matches(expected: Option<&serde_json::Value>, actual: Option<&serde_json::Value>) -> bool {
    match (expected, actual) {
        (None, _) => true,
        (Some(expected), Some(actual)) => expected == actual,
        (Some(_), None) => false,
    }
}

/// Resolve a request against a registry.
///
/// Matching interactions are marked exercised according to `policy`. Returns
/// the response to serve, or `None` when nothing matched.
pub fn resolve(
    registry: &mut InteractionRegistry,
    request: &InboundRequest,
    policy: MatchPolicy,
) -> Option<InteractionResponse> {
    let mut chosen = None;

    for interaction in registry.iter_mut() {
        if !request_matches(&interaction.with_request, request) {
            continue;
        }
        debug!(
            id = %interaction.id,
            method = %request.method,
            path = %request.path,
            "Interaction matched"
        );
        interaction.exercised = true;
        chosen = Some(interaction.will_respond_with.clone());

        if policy == MatchPolicy::FirstMatchWins {
            break;
        }
    }

    chosen
}
