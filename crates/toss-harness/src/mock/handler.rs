//! Request handling for mock server ports.

use super::port::MockPort;
use super::response::{interaction_response, not_found};
use crate::matching::{parse_query_string, InboundRequest};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::{Request, Response};
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::debug;

/// Handle a request to a mock port
pub(crate) async fn handle_mock_request(
    req: Request<Incoming>,
    state: Arc<MockPort>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();

    let raw_body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            debug!(port = state.port(), "Failed to read request body: {}", e);
            Bytes::new()
        }
    };

    let headers = lowercase_headers(&parts.headers);
    let body = InboundRequest::body_from_raw(
        headers.get("content-type").map(String::as_str),
        &raw_body,
    );

    let request = InboundRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parse_query_string(parts.uri.query().unwrap_or("")),
        headers,
        body,
    };

    match state.dispatch(&request) {
        Some(response) => {
            debug!(
                port = state.port(),
                method = %request.method,
                path = %request.path,
                status = response.status,
                "Serving interaction response"
            );
            Ok(interaction_response(&response))
        }
        None => {
            debug!(
                port = state.port(),
                method = %request.method,
                path = %request.path,
                "No interaction matched"
            );
            Ok(not_found())
        }
    }
}

/// Flatten a header map, lower-casing names and joining repeated values
fn lowercase_headers(headers: &hyper::HeaderMap) -> HashMap<String, String> {
    let mut map: HashMap<String, String> = HashMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        map.entry(name.as_str().to_ascii_lowercase())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    map
}
