//! Keys of indexes and tree levels.

use crate::error::SegmentError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A mapping key: an integer or a string.
///
/// Strings holding a canonical decimal integer are stored as integers, so
/// `Key::from("42") == Key::from(42)` while `"042"` stays a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    Int(i64),
    Str(String),
}

impl Key {
    /// Create a key from a string, normalizing integer strings.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        match raw.parse::<i64>() {
            Ok(n) if n.to_string() == raw => Key::Int(n),
            _ => Key::Str(raw),
        }
    }

    /// Convert a resolved value into a key.
    ///
    /// `null` and `false` stringify to the empty key, `true` to `1`.
    pub fn from_value(value: &Value) -> Result<Self, SegmentError> {
        match value {
            Value::Null | Value::Bool(false) => Ok(Key::Str(String::new())),
            Value::Bool(true) => Ok(Key::Int(1)),
            Value::Number(n) => Ok(match n.as_i64() {
                Some(i) => Key::Int(i),
                None => Key::new(n.to_string()),
            }),
            Value::String(s) => Ok(Key::new(s.as_str())),
            Value::Array(_) | Value::Object(_) => Err(SegmentError::NotStringable),
        }
    }

    /// Convert a resolved value into a non-empty path segment.
    pub fn segment(value: &Value) -> Result<Self, SegmentError> {
        let key = Self::from_value(value)?;
        if key.is_empty() {
            return Err(SegmentError::Empty);
        }
        Ok(key)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Key::Str(s) if s.is_empty())
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Key::Int(n) => Some(*n),
            Key::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::Int(_) => None,
            Key::Str(s) => Some(s),
        }
    }

    /// Position in a sequence, if the key is a non-negative integer.
    pub fn as_position(&self) -> Option<usize> {
        self.as_int().and_then(|n| usize::try_from(n).ok())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(n) => write!(f, "{n}"),
            Key::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self {
        Key::Int(n)
    }
}

impl From<i32> for Key {
    fn from(n: i32) -> Self {
        Key::Int(n.into())
    }
}

impl From<u32> for Key {
    fn from(n: u32) -> Self {
        Key::Int(n.into())
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::new(s)
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::new(s)
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}
