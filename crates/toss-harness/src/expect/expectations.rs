use super::error::ExpectationError;
use super::json_like::json_like;
use super::json_query::query;
use crate::record::ResponseRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Exact header value assertion; also used for substring assertions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderExpectation {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonQueryExpectation {
    pub path: String,
    pub value: Value,
}

/// Assertions evaluated against a response record.
///
/// Categories run in a fixed order and evaluation stops at the first
/// failing assertion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Expectations {
    pub status_code: Option<u16>,
    pub headers: Vec<HeaderExpectation>,
    pub header_contains: Vec<HeaderExpectation>,
    pub body: Option<Value>,
    pub body_contains: Vec<String>,
    pub json: Vec<Value>,
    pub json_like: Vec<Value>,
    pub json_query: Vec<JsonQueryExpectation>,
}

impl Expectations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status_code(mut self, status: u16) -> Self {
        self.status_code = Some(status);
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(HeaderExpectation {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    pub fn header_contains(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.header_contains.push(HeaderExpectation {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    pub fn body(mut self, body: impl Into<Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn body_contains(mut self, fragment: impl Into<String>) -> Self {
        self.body_contains.push(fragment.into());
        self
    }

    pub fn json(mut self, value: Value) -> Self {
        self.json.push(value);
        self
    }

    pub fn json_like(mut self, value: Value) -> Self {
        self.json_like.push(value);
        self
    }

    pub fn json_query(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.json_query.push(JsonQueryExpectation {
            path: path.into(),
            value: value.into(),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Run every assertion against `record`, reporting the first failure.
    ///
    /// JSON assertions use `record.json`; call `ResponseRecord::parse_json`
    /// first.
    pub fn validate(&self, record: &ResponseRecord) -> Result<(), ExpectationError> {
        if let Some(expected) = self.status_code {
            if record.status != expected {
                return Err(ExpectationError::StatusCode {
                    expected,
                    actual: record.status,
                });
            }
        }

        for expectation in &self.headers {
            let actual = record.header(&expectation.key);
            if actual != Some(expectation.value.as_str()) {
                return Err(ExpectationError::Header {
                    key: expectation.key.clone(),
                    expected: expectation.value.clone(),
                    actual: actual.map(str::to_string),
                });
            }
        }

        for expectation in &self.header_contains {
            let actual = record.header(&expectation.key);
            if !actual.is_some_and(|v| v.contains(expectation.value.as_str())) {
                return Err(ExpectationError::HeaderContains {
                    key: expectation.key.clone(),
                    expected: expectation.value.clone(),
                    actual: actual.map(str::to_string),
                });
            }
        }

        if let Some(expected) = &self.body {
            let matches = match expected {
                Value::String(text) => *text == record.raw_body,
                structured => record.json.as_ref() == Some(structured),
            };
            if !matches {
                return Err(ExpectationError::Body {
                    expected: expected.clone(),
                    actual: record.raw_body.clone(),
                });
            }
        }

        for fragment in &self.body_contains {
            if !record.raw_body.contains(fragment.as_str()) {
                return Err(ExpectationError::BodyContains {
                    expected: fragment.clone(),
                    actual: record.raw_body.clone(),
                });
            }
        }

        for expected in &self.json {
            if record.json.as_ref() != Some(expected) {
                return Err(ExpectationError::Json {
                    expected: expected.clone(),
                    actual: record.json.clone(),
                });
            }
        }

        for expected in &self.json_like {
            let result = match &record.json {
                Some(actual) => json_like(actual, expected),
                None => Err("body is not JSON".to_string()),
            };
            if let Err(reason) = result {
                return Err(ExpectationError::JsonLike {
                    expected: expected.clone(),
                    actual: record.json.clone(),
                    reason,
                });
            }
        }

        for expectation in &self.json_query {
            let actual = match &record.json {
                Some(document) => query(document, &expectation.path).map_err(|e| {
                    ExpectationError::InvalidJsonPath {
                        path: expectation.path.clone(),
                        reason: e.to_string(),
                    }
                })?,
                None => None,
            };
            if actual != Some(&expectation.value) {
                return Err(ExpectationError::JsonQuery {
                    path: expectation.path.clone(),
                    expected: expectation.value.clone(),
                    actual: actual.cloned(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expect::ExpectationKind;
    use serde_json::json;

    fn json_record(status: u16, body: Value) -> ResponseRecord {
        let mut record = ResponseRecord::new(status, body.to_string())
            .with_header("Content-Type", "application/json; charset=utf-8");
        record.parse_json();
        record
    }

    #[test]
    fn test_empty_expectations_pass() {
        let expectations = Expectations::new();
        assert!(expectations.is_empty());
        assert!(expectations
            .validate(&ResponseRecord::new(500, "boom"))
            .is_ok());
    }

    #[test]
    fn test_status_code() {
        let record = json_record(200, json!({"id": 1}));
        assert!(Expectations::new().status_code(200).validate(&record).is_ok());

        let err = Expectations::new()
            .status_code(201)
            .validate(&record)
            .unwrap_err();
        assert_eq!(
            err,
            ExpectationError::StatusCode {
                expected: 201,
                actual: 200
            }
        );
    }

    #[test]
    fn test_headers_are_case_insensitive_with_exact_values() {
        let record = json_record(200, json!({}));
        assert!(Expectations::new()
            .header("CONTENT-TYPE", "application/json; charset=utf-8")
            .validate(&record)
            .is_ok());

        let err = Expectations::new()
            .header("content-type", "application/json")
            .validate(&record)
            .unwrap_err();
        assert_eq!(err.kind(), ExpectationKind::Header);

        let err = Expectations::new()
            .header("x-request-id", "1")
            .validate(&record)
            .unwrap_err();
        assert!(matches!(err, ExpectationError::Header { actual: None, .. }));
    }

    #[test]
    fn test_header_contains() {
        let record = json_record(200, json!({}));
        assert!(Expectations::new()
            .header_contains("Content-Type", "json")
            .validate(&record)
            .is_ok());
        let err = Expectations::new()
            .header_contains("content-type", "xml")
            .validate(&record)
            .unwrap_err();
        assert_eq!(err.kind(), ExpectationKind::HeaderContains);
    }

    #[test]
    fn test_body_string_against_raw_text() {
        let record = ResponseRecord::new(200, "hello world");
        assert!(Expectations::new().body("hello world").validate(&record).is_ok());
        let err = Expectations::new().body("hello").validate(&record).unwrap_err();
        assert_eq!(err.kind(), ExpectationKind::Body);
    }

    #[test]
    fn test_body_structured_against_parsed_json() {
        let record = json_record(200, json!({"id": 1, "tags": ["a"]}));
        assert!(Expectations::new()
            .body(json!({"tags": ["a"], "id": 1}))
            .validate(&record)
            .is_ok());
        assert!(Expectations::new()
            .body(json!({"id": 1}))
            .validate(&record)
            .is_err());
    }

    #[test]
    fn test_body_contains() {
        let record = ResponseRecord::new(200, "the quick brown fox");
        assert!(Expectations::new()
            .body_contains("quick")
            .body_contains("fox")
            .validate(&record)
            .is_ok());
        let err = Expectations::new()
            .body_contains("quick")
            .body_contains("dog")
            .validate(&record)
            .unwrap_err();
        assert_eq!(
            err,
            ExpectationError::BodyContains {
                expected: "dog".to_string(),
                actual: "the quick brown fox".to_string()
            }
        );
    }

    #[test]
    fn test_json_exact() {
        let record = json_record(200, json!({"id": 1}));
        assert!(Expectations::new().json(json!({"id": 1})).validate(&record).is_ok());
        let err = Expectations::new()
            .json(json!({"id": 2}))
            .validate(&record)
            .unwrap_err();
        assert_eq!(err.kind(), ExpectationKind::Json);

        let text = ResponseRecord::new(200, "not json");
        let err = Expectations::new().json(json!(1)).validate(&text).unwrap_err();
        assert!(matches!(err, ExpectationError::Json { actual: None, .. }));
    }

    #[test]
    fn test_json_like() {
        let record = json_record(200, json!({"a": 1, "b": 2}));
        assert!(Expectations::new().json_like(json!({"a": 1})).validate(&record).is_ok());

        let err = Expectations::new()
            .json_like(json!({"a": 1, "c": 3}))
            .validate(&record)
            .unwrap_err();
        match err {
            ExpectationError::JsonLike { reason, .. } => assert_eq!(reason, "$.c is missing"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_json_query() {
        let record = json_record(200, json!({"user": {"id": 1, "name": "x"}}));
        assert!(Expectations::new()
            .json_query("user.id", 1)
            .validate(&record)
            .is_ok());

        let other = json_record(200, json!({"user": {"id": 2}}));
        let err = Expectations::new()
            .json_query("user.id", 1)
            .validate(&other)
            .unwrap_err();
        assert_eq!(
            err,
            ExpectationError::JsonQuery {
                path: "user.id".to_string(),
                expected: json!(1),
                actual: Some(json!(2))
            }
        );

        let err = Expectations::new()
            .json_query("user.email", "a@b.c")
            .validate(&other)
            .unwrap_err();
        assert!(matches!(err, ExpectationError::JsonQuery { actual: None, .. }));

        let err = Expectations::new()
            .json_query("user..id", 1)
            .validate(&other)
            .unwrap_err();
        assert!(matches!(err, ExpectationError::InvalidJsonPath { .. }));
    }

    #[test]
    fn test_first_failure_in_fixed_order() {
        let record = json_record(404, json!({"error": "missing"}));
        let err = Expectations::new()
            .json_query("error", "other")
            .body_contains("nope")
            .status_code(200)
            .validate(&record)
            .unwrap_err();
        assert_eq!(err.kind(), ExpectationKind::StatusCode);

        let err = Expectations::new()
            .json_query("error", "other")
            .body_contains("nope")
            .validate(&record)
            .unwrap_err();
        assert_eq!(err.kind(), ExpectationKind::BodyContains);
    }

    #[test]
    fn test_network_error_record_fails_status() {
        let record = ResponseRecord::from_network_error(crate::record::NetworkError {
            kind: crate::record::NetworkErrorKind::Connect,
            message: "refused".to_string(),
        });
        let err = Expectations::new().status_code(200).validate(&record).unwrap_err();
        assert_eq!(
            err,
            ExpectationError::StatusCode {
                expected: 200,
                actual: 0
            }
        );
    }

    #[test]
    fn test_deserialize_camel_case() {
        let expectations: Expectations = serde_json::from_value(json!({
            "statusCode": 200,
            "headerContains": [{"key": "content-type", "value": "json"}],
            "jsonQuery": [{"path": "user.id", "value": 1}]
        }))
        .unwrap();
        assert_eq!(expectations.status_code, Some(200));
        assert_eq!(expectations.header_contains.len(), 1);
        assert_eq!(expectations.json_query[0].value, json!(1));
        assert!(expectations.json_like.is_empty());
    }
}
