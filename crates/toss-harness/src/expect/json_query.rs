//! Path lookups into JSON documents.
//!
//! Supports dotted keys and bracketed indices or quoted keys:
//! `user.id`, `items[0].name`, `['odd.key']`, with an optional leading `$`.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JsonPathError {
    #[error("empty path segment")]
    EmptySegment,
    #[error("unclosed '['")]
    UnclosedBracket,
    #[error("invalid bracket selector '{0}'")]
    InvalidSelector(String),
    #[error("unexpected character '{0}' after ']'")]
    UnexpectedCharacter(char),
}

/// Split a path into key and index segments. An empty path (or `$`) selects
/// the whole document.
pub fn parse_path(path: &str) -> Result<Vec<PathSegment>, JsonPathError> {
    let rooted = path.starts_with('$');
    let mut chars = path.strip_prefix('$').unwrap_or(path).chars().peekable();
    let mut segments = Vec::new();
    let mut key = String::new();
    // `$.a` and `a[0].b` both allow a dot right after a closed segment
    let mut after_bracket = rooted;

    while let Some(c) = chars.next() {
        match c {
            '.' => {
                if !key.is_empty() {
                    segments.push(PathSegment::Key(std::mem::take(&mut key)));
                } else if !after_bracket {
                    return Err(JsonPathError::EmptySegment);
                }
                after_bracket = false;
                if chars.peek().is_none() {
                    return Err(JsonPathError::EmptySegment);
                }
            }
            '[' => {
                if !key.is_empty() {
                    segments.push(PathSegment::Key(std::mem::take(&mut key)));
                }
                let mut selector = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == ']' {
                        closed = true;
                        break;
                    }
                    selector.push(c);
                }
                if !closed {
                    return Err(JsonPathError::UnclosedBracket);
                }
                segments.push(parse_selector(&selector)?);
                after_bracket = true;
            }
            _ if after_bracket && key.is_empty() && !segments.is_empty() => {
                return Err(JsonPathError::UnexpectedCharacter(c));
            }
            _ => {
                after_bracket = false;
                key.push(c);
            }
        }
    }

    if !key.is_empty() {
        segments.push(PathSegment::Key(key));
    }
    Ok(segments)
}

fn parse_selector(selector: &str) -> Result<PathSegment, JsonPathError> {
    let selector = selector.trim();
    let quoted = selector.len() >= 2
        && ((selector.starts_with('\'') && selector.ends_with('\''))
            || (selector.starts_with('"') && selector.ends_with('"')));
    if quoted {
        return Ok(PathSegment::Key(selector[1..selector.len() - 1].to_string()));
    }
    selector
        .parse::<usize>()
        .map(PathSegment::Index)
        .map_err(|_| JsonPathError::InvalidSelector(selector.to_string()))
}

/// Look up `path` in `value`; `Ok(None)` when any segment is missing
pub fn query<'a>(value: &'a Value, path: &str) -> Result<Option<&'a Value>, JsonPathError> {
    let segments = parse_path(path)?;
    let mut current = value;
    for segment in &segments {
        let next = match segment {
            PathSegment::Key(key) => current.as_object().and_then(|o| o.get(key)),
            PathSegment::Index(index) => current.as_array().and_then(|a| a.get(*index)),
        };
        match next {
            Some(v) => current = v,
            None => return Ok(None),
        }
    }
    Ok(Some(current))
}
