//! Record types fed into indexes and trees.

use crate::{error::Result, Error};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Shape of a record, which decides how its mappings are addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Struct-like: mappings are read with property segments (`a.b`).
    Object,
    /// Associative-array-like: mappings are read with index segments (`[a][b]`).
    Array,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Object => write!(f, "object"),
            RecordKind::Array => write!(f, "array"),
        }
    }
}

/// A single input item.
///
/// Values nested inside a record share its kind, so a sub-path read on an
/// extracted value follows the same addressing rules as the record itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    kind: RecordKind,
    value: Value,
}

impl Record {
    /// Create a record of the given kind.
    pub fn new(kind: RecordKind, value: Value) -> Self {
        Self { kind, value }
    }

    /// Create an object-like record.
    pub fn object(value: Value) -> Self {
        Self::new(RecordKind::Object, value)
    }

    /// Create an associative-array-like record.
    pub fn array(value: Value) -> Self {
        Self::new(RecordKind::Array, value)
    }

    /// Serialize any Rust value into an object-like record.
    pub fn from_serialize<T: Serialize>(item: &T) -> Result<Self> {
        let value = serde_json::to_value(item).map_err(|e| Error::Serialization(e.to_string()))?;
        Ok(Self::object(value))
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// Whether the value has addressable sub-paths.
    pub fn is_structured(&self) -> bool {
        matches!(self.value, Value::Object(_) | Value::Array(_))
    }

    /// Wrap a value extracted from this record, keeping the record's kind.
    pub(crate) fn derive(&self, value: Value) -> Record {
        Self::new(self.kind, value)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        record.value
    }
}
