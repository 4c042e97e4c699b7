//! Outbound call made by an invocation.

use crate::interaction::Method;
use crate::record::{NetworkError, ResponseRecord};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Description of the request an invocation dispatches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundRequest {
    /// Unknown verbs in serialized requests fall back to GET
    #[serde(default, deserialize_with = "lenient_method")]
    pub method: Method,
    pub url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    /// JSON body; takes precedence over `body`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<Value>,
    /// Raw text body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

fn lenient_method<'de, D>(deserializer: D) -> Result<Method, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(Method::parse_lenient(&raw))
}

impl OutboundRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: BTreeMap::new(),
            json: None,
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn json(mut self, json: Value) -> Self {
        self.json = Some(json);
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Dispatch `request` and capture the outcome.
///
/// Never fails: a request that produces no response is captured as a
/// network-error record.
pub async fn send(client: &reqwest::Client, request: &OutboundRequest) -> ResponseRecord {
    let mut builder = client.request(request.method.into(), &request.url);

    if !request.query.is_empty() {
        builder = builder.query(&request.query);
    }
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    if let Some(json) = &request.json {
        builder = builder.json(json);
    } else if let Some(body) = &request.body {
        builder = builder.body(body.clone());
    }

    let response = match builder.send().await {
        Ok(response) => response,
        Err(e) => return capture_error(request, &e),
    };

    let status = response.status().as_u16();
    let mut headers: HashMap<String, String> = HashMap::new();
    for (name, value) in response.headers() {
        if let Ok(v) = value.to_str() {
            headers
                .entry(name.as_str().to_string())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(v);
                })
                .or_insert_with(|| v.to_string());
        }
    }

    let raw_body = match response.text().await {
        Ok(text) => text,
        Err(e) => return capture_error(request, &e),
    };

    debug!(
        method = %request.method,
        url = %request.url,
        status,
        "Outbound call completed"
    );

    ResponseRecord {
        status,
        headers,
        raw_body,
        ..Default::default()
    }
}

fn capture_error(request: &OutboundRequest, error: &reqwest::Error) -> ResponseRecord {
    let error = NetworkError::from(error);
    warn!(
        method = %request.method,
        url = %request.url,
        "Outbound call failed: {}",
        error
    );
    ResponseRecord::from_network_error(error)
}
