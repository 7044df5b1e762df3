//! Serializable configuration for indexes and trees.
//!
//! Configurations only carry literal paths. Value-deriving functions are
//! set through [`TreeBuilder`](crate::TreeBuilder).

use crate::{
    error::{GroupBySpecError, Result},
    Error, LeafMode, PathSpec,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Configuration of a [`PropertyIndexer`](crate::PropertyIndexer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexerConfig {
    /// Path of the key inside each record
    pub key_path: String,
    /// Path of the stored value; the whole record when unset
    #[serde(default)]
    pub value_path: Option<String>,
}

impl IndexerConfig {
    pub fn new(key_path: impl Into<String>) -> Self {
        Self {
            key_path: key_path.into(),
            value_path: None,
        }
    }

    pub fn with_value_path(mut self, value_path: impl Into<String>) -> Self {
        self.value_path = Some(value_path.into());
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))
    }
}

/// Configuration of a [`PropertyTree`](crate::PropertyTree).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeConfig {
    /// Path of the leaf value; the whole record when unset
    #[serde(default)]
    pub value_path: Option<String>,
    /// Group-by paths, outermost level first. Entries must be strings.
    #[serde(default)]
    pub group_by: Vec<Value>,
    #[serde(default)]
    pub mode: LeafMode,
}

impl TreeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value_path(mut self, value_path: impl Into<String>) -> Self {
        self.value_path = Some(value_path.into());
        self
    }

    pub fn with_group_by(mut self, path: impl Into<String>) -> Self {
        self.group_by.push(Value::String(path.into()));
        self
    }

    pub fn with_mode(mut self, mode: LeafMode) -> Self {
        self.mode = mode;
        self
    }

    /// Parse from JSON.
    ///
    /// `mode` accepts a name (`"replace"`, `"accumulate"`) or a numeric
    /// code (`1`, `2`); anything else fails with [`Error::UndefinedMode`].
    pub fn from_json(json: &str) -> Result<Self> {
        let mut raw: Value =
            serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))?;

        let mode = match raw.as_object_mut().and_then(|fields| fields.remove("mode")) {
            None | Some(Value::Null) => LeafMode::default(),
            Some(Value::String(name)) => name.parse()?,
            Some(Value::Number(code)) => code
                .as_u64()
                .and_then(|code| u8::try_from(code).ok())
                .ok_or_else(|| Error::UndefinedMode(code.to_string()))
                .and_then(LeafMode::try_from)?,
            Some(other) => return Err(Error::UndefinedMode(other.to_string())),
        };

        let mut config: TreeConfig =
            serde_json::from_value(raw).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.mode = mode;
        Ok(config)
    }

    /// Group-by entries as path specifications.
    ///
    /// A non-string entry rejects the whole list.
    pub fn group_by_specs(&self) -> Result<Vec<PathSpec>> {
        self.group_by
            .iter()
            .enumerate()
            .map(|(position, entry)| {
                PathSpec::try_from(entry).map_err(|found| {
                    Error::InvalidGroupBySpec(GroupBySpecError::List { position, found })
                })
            })
            .collect()
    }
}
