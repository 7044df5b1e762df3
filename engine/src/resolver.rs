//! Path resolution against records.
//!
//! [`PropertyAccess`] is the read side of the property accessor: it either
//! returns the value a path points at or reports the path as unreadable.
//! How a segment is applied depends on the record's kind, which is checked
//! once per step here and nowhere else.

use crate::{error::Result, Error, PropertyPath, Record, RecordKind, Segment};
use serde_json::Value;

/// Read access to values inside records.
pub trait PropertyAccess {
    /// Resolve `path` against `record`.
    ///
    /// Fails with [`Error::UnresolvablePath`] naming the record's kind.
    fn get_value<'r>(&self, record: &'r Record, path: &PropertyPath) -> Result<&'r Value>;

    /// Whether `path` resolves against `record`. Never fails.
    fn is_readable(&self, record: &Record, path: &PropertyPath) -> bool {
        self.get_value(record, path).is_ok()
    }
}

/// Accessor over `serde_json` values.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonAccessor;

impl PropertyAccess for JsonAccessor {
    fn get_value<'r>(&self, record: &'r Record, path: &PropertyPath) -> Result<&'r Value> {
        let kind = record.kind();
        path.segments()
            .iter()
            .try_fold(record.value(), |node, segment| step(kind, node, segment))
            .ok_or_else(|| Error::UnresolvablePath {
                kind,
                path: path.to_string(),
            })
    }
}

fn step<'v>(kind: RecordKind, node: &'v Value, segment: &Segment) -> Option<&'v Value> {
    match (kind, segment, node) {
        (_, Segment::Index(key), Value::Array(items)) => items.get(key.as_position()?),
        (RecordKind::Object, Segment::Property(name), Value::Object(map)) => map.get(name),
        (RecordKind::Array, Segment::Index(key), Value::Object(map)) => map.get(&key.to_string()),
        _ => None,
    }
}

/// Resolve `path` against `record`.
pub fn resolve<'r>(record: &'r Record, path: &PropertyPath) -> Result<&'r Value> {
    JsonAccessor.get_value(record, path)
}

/// Whether `path` resolves against `record`. Never fails.
pub fn is_valid(record: &Record, path: &PropertyPath) -> bool {
    JsonAccessor.is_readable(record, path)
}
