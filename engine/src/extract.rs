//! Path specifications: literal paths or value-deriving functions.

use crate::{
    error::{GroupBySpecError, Result},
    resolver, Error, Key, PropertyPath, Record,
};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A function deriving a value from a record.
pub type DeriveFn = Arc<dyn Fn(&Record) -> Value + Send + Sync>;

/// How to extract a value from a record.
#[derive(Clone)]
pub enum PathSpec {
    /// A property path expression, parsed when the owning structure is built.
    Literal(String),
    /// A function applied to each record.
    Derived(DeriveFn),
}

impl PathSpec {
    pub fn derived<F>(f: F) -> Self
    where
        F: Fn(&Record) -> Value + Send + Sync + 'static,
    {
        PathSpec::Derived(Arc::new(f))
    }
}

impl fmt::Debug for PathSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSpec::Literal(raw) => f.debug_tuple("Literal").field(raw).finish(),
            PathSpec::Derived(_) => f.write_str("Derived(<fn>)"),
        }
    }
}

impl From<&str> for PathSpec {
    fn from(raw: &str) -> Self {
        PathSpec::Literal(raw.to_string())
    }
}

impl From<String> for PathSpec {
    fn from(raw: String) -> Self {
        PathSpec::Literal(raw)
    }
}

impl TryFrom<&Value> for PathSpec {
    type Error = String;

    /// Only strings are paths; the error names the JSON type found instead.
    fn try_from(value: &Value) -> std::result::Result<Self, String> {
        match value {
            Value::String(raw) => Ok(PathSpec::Literal(raw.clone())),
            other => Err(json_type_name(other).to_string()),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "Null",
        Value::Bool(_) => "Bool",
        Value::Number(n) if n.is_i64() || n.is_u64() => "Int",
        Value::Number(_) => "Float",
        Value::String(_) => "String",
        Value::Array(_) => "Array",
        Value::Object(_) => "Object",
    }
}

/// A validated [`PathSpec`], ready to run against records.
#[derive(Clone)]
pub(crate) enum Extractor {
    Path(PropertyPath),
    Derived(DeriveFn),
}

impl fmt::Debug for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extractor::Path(path) => f.debug_tuple("Path").field(&path.as_str()).finish(),
            Extractor::Derived(_) => f.write_str("Derived(<fn>)"),
        }
    }
}

impl Extractor {
    /// Compile a leaf specification. `None` and `""` both select the whole record.
    pub(crate) fn leaf(spec: Option<PathSpec>) -> Result<Self> {
        match spec {
            None => Ok(Extractor::Path(PropertyPath::root())),
            Some(PathSpec::Literal(raw)) => Ok(Extractor::Path(PropertyPath::parse(&raw)?)),
            Some(PathSpec::Derived(f)) => Ok(Extractor::Derived(f)),
        }
    }

    /// Compile group-by specifications, rejecting blank paths.
    pub(crate) fn group_by(specs: Vec<PathSpec>) -> Result<Vec<Self>> {
        specs
            .into_iter()
            .enumerate()
            .map(|(position, spec)| match spec {
                PathSpec::Literal(raw) if raw.trim().is_empty() => Err(
                    Error::InvalidGroupBySpec(GroupBySpecError::BlankEntry { position }),
                ),
                PathSpec::Literal(raw) => Ok(Extractor::Path(PropertyPath::parse(&raw)?)),
                PathSpec::Derived(f) => Ok(Extractor::Derived(f)),
            })
            .collect()
    }

    /// Extract a leaf value.
    pub(crate) fn value(&self, record: &Record) -> Result<Value> {
        match self {
            Extractor::Path(path) => resolver::resolve(record, path).cloned(),
            Extractor::Derived(f) => Ok(f(record)),
        }
    }

    /// Extract the path segment for tree level `level`.
    pub(crate) fn segment(&self, record: &Record, level: usize) -> Result<Key> {
        match self {
            Extractor::Path(path) => {
                let value = resolver::resolve(record, path)?;
                Key::segment(value).map_err(|reason| Error::InvalidGroupValue {
                    path: path.to_string(),
                    reason,
                })
            }
            Extractor::Derived(f) => Key::segment(&f(record))
                .map_err(|reason| Error::InvalidClosureResult { level, reason }),
        }
    }
}
