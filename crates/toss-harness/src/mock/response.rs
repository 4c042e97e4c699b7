//! Rendering of canned interaction responses onto the wire.

use crate::interaction::InteractionResponse;
use crate::matching::{NOT_FOUND_BODY, NOT_FOUND_STATUS};
use bytes::Bytes;
use http_body_util::Full;
use hyper::header::CONTENT_TYPE;
use hyper::{Response, StatusCode};
use tracing::warn;

const JSON_CONTENT_TYPE: &str = "application/json";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Build an HTTP response with headers.
///
/// Falls back to a bare 500 if the builder rejects a header.
pub(crate) fn build_response_with_headers(
    status: StatusCode,
    headers: impl IntoIterator<Item = (impl AsRef<str>, impl AsRef<str>)>,
    body: impl Into<Bytes>,
) -> Response<Full<Bytes>> {
    let mut builder = Response::builder().status(status);
    for (key, value) in headers {
        builder = builder.header(key.as_ref(), value.as_ref());
    }
    builder.body(Full::new(body.into())).unwrap_or_else(|e| {
        warn!("Failed to build mock response: {}", e);
        let mut response = Response::new(Full::new(Bytes::from("Internal Server Error")));
        *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        response
    })
}

/// Fixed response for requests no interaction matched
pub(crate) fn not_found() -> Response<Full<Bytes>> {
    let status = StatusCode::from_u16(NOT_FOUND_STATUS).unwrap_or(StatusCode::NOT_FOUND);
    build_response_with_headers(
        status,
        [(CONTENT_TYPE.as_str(), TEXT_CONTENT_TYPE)],
        NOT_FOUND_BODY,
    )
}

/// Render an interaction's configured response.
///
/// String bodies are written verbatim; any other JSON value is serialized and
/// labelled `application/json` unless the interaction declares its own
/// content type.
pub(crate) fn interaction_response(response: &InteractionResponse) -> Response<Full<Bytes>> {
    let status = StatusCode::from_u16(response.status).unwrap_or_else(|_| {
        warn!(
            status = response.status,
            "Invalid status code in interaction response, serving 500"
        );
        StatusCode::INTERNAL_SERVER_ERROR
    });

    let mut headers: Vec<(String, String)> = response
        .headers
        .iter()
        .flatten()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let has_content_type = headers
        .iter()
        .any(|(k, _)| k.eq_ignore_ascii_case(CONTENT_TYPE.as_str()));

    let (body, default_content_type) = match &response.body {
        None => (Bytes::new(), None),
        Some(serde_json::Value::String(text)) => {
            (Bytes::from(text.clone()), Some(TEXT_CONTENT_TYPE))
        }
        Some(value) => (Bytes::from(value.to_string()), Some(JSON_CONTENT_TYPE)),
    };

    if let (false, Some(content_type)) = (has_content_type, default_content_type) {
        headers.push((CONTENT_TYPE.as_str().to_string(), content_type.to_string()));
    }

    build_response_with_headers(status, headers, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::json;

    async fn body_text(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_response() {
        let response = not_found();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "Interaction Not Found");
    }

    #[tokio::test]
    async fn test_json_body_gets_json_content_type() {
        let response = interaction_response(&InteractionResponse::new(201).body(json!({"id": 1})));
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(body_text(response).await, r#"{"id":1}"#);
    }

    #[tokio::test]
    async fn test_string_body_written_verbatim() {
        let response = interaction_response(&InteractionResponse::new(200).body(json!("pong")));
        assert_eq!(response.headers()[CONTENT_TYPE], TEXT_CONTENT_TYPE);
        assert_eq!(body_text(response).await, "pong");
    }

    #[tokio::test]
    async fn test_declared_content_type_wins() {
        let response = interaction_response(
            &InteractionResponse::new(200)
                .header("Content-Type", "application/vnd.api+json")
                .header("x-trace", "abc")
                .body(json!({"data": []})),
        );
        assert_eq!(response.headers()[CONTENT_TYPE], "application/vnd.api+json");
        assert_eq!(response.headers()["x-trace"], "abc");
        assert_eq!(response.headers().get_all(CONTENT_TYPE).iter().count(), 1);
    }

    #[tokio::test]
    async fn test_empty_body_and_invalid_status() {
        let response = interaction_response(&InteractionResponse::new(204));
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response.headers().get(CONTENT_TYPE).is_none());

        let response = interaction_response(&InteractionResponse::new(42));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
