//! Expectation engine.
//!
//! Declarative assertions over a captured [`ResponseRecord`](crate::record::ResponseRecord):
//! status, headers, raw body and three flavours of JSON comparison.

mod error;
mod expectations;
mod json_like;
mod json_query;

pub use error::{ExpectationError, ExpectationKind};
pub use expectations::{Expectations, HeaderExpectation, JsonQueryExpectation};
pub use json_like::json_like;
pub use json_query::{parse_path, query, JsonPathError, PathSegment};
