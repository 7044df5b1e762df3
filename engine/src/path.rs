//! Property path parsing.
//!
//! Paths mix property segments and index segments:
//!
//! - `name`, `a.b.c`: property segments, read on object-like values
//! - `[key]`, `[a][b]`: index segments, read on array-like values and lists
//! - `a[0].b`: mixed
//!
//! The empty path addresses the whole record.

use crate::{error::Result, Error, Key};
use std::fmt;
use std::str::FromStr;

/// One step of a property path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Property(String),
    Index(Key),
}

/// A parsed property path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PropertyPath {
    raw: String,
    segments: Vec<Segment>,
}

impl PropertyPath {
    /// Parse a path expression.
    pub fn parse(raw: &str) -> Result<Self> {
        let segments = parse_segments(raw).map_err(|reason| Error::InvalidPropertyPath {
            path: raw.to_string(),
            reason,
        })?;

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The whole-record path.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl FromStr for PropertyPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn parse_segments(raw: &str) -> std::result::Result<Vec<Segment>, String> {
    let mut segments = Vec::new();
    let mut rest = raw;
    let mut after_dot = false;

    while !rest.is_empty() {
        if let Some(inner) = rest.strip_prefix('[') {
            if after_dot {
                return Err("expected a property name after '.'".into());
            }
            let end = inner.find(']').ok_or_else(|| "unclosed '['".to_string())?;
            let key = &inner[..end];
            if key.is_empty() {
                return Err("empty index segment".into());
            }
            if key.contains('[') {
                return Err("nested '[' inside an index segment".into());
            }
            segments.push(Segment::Index(Key::new(key)));
            rest = &inner[end + 1..];
            if !(rest.is_empty() || rest.starts_with('[') || rest.starts_with('.')) {
                return Err(format!("unexpected '{rest}' after an index segment"));
            }
        } else if let Some(tail) = rest.strip_prefix('.') {
            if segments.is_empty() || after_dot {
                return Err("empty property segment".into());
            }
            after_dot = true;
            rest = tail;
            continue;
        } else {
            let end = rest
                .find(|c| matches!(c, '.' | '[' | ']'))
                .unwrap_or(rest.len());
            if rest[end..].starts_with(']') {
                return Err("unexpected ']'".into());
            }
            segments.push(Segment::Property(rest[..end].to_string()));
            rest = &rest[end..];
        }
        after_dot = false;
    }

    if after_dot {
        return Err("trailing '.'".into());
    }

    Ok(segments)
}
