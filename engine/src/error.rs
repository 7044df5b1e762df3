//! Error types for the property indexing engine.

use crate::{Key, RecordKind};
use std::fmt;
use thiserror::Error;

/// Why a resolved value could not become a path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentError {
    /// The value stringifies to `""` (`null`, `false`, empty string).
    Empty,
    /// The value has no string form at all (arrays, objects).
    NotStringable,
}

impl fmt::Display for SegmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentError::Empty => write!(f, "stringified value is empty"),
            SegmentError::NotStringable => write!(f, "value is not stringable"),
        }
    }
}

/// Why a list of group-by specifications was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupBySpecError {
    /// The list holds an entry that is neither a path nor a function.
    List { position: usize, found: String },
    /// A path entry is empty or whitespace-only.
    BlankEntry { position: usize },
}

impl fmt::Display for GroupBySpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupBySpecError::List { position, found } => write!(
                f,
                "group-by list rejected: entry {position} is {found}, expected a path string or a function"
            ),
            GroupBySpecError::BlankEntry { position } => {
                write!(f, "group-by entry {position} is an empty path")
            }
        }
    }
}

/// All possible errors from the engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    // Resolution errors
    #[error("property {path} is not owned by the {kind}")]
    UnresolvablePath { kind: RecordKind, path: String },

    #[error("invalid property path '{path}': {reason}")]
    InvalidPropertyPath { path: String, reason: String },

    // Index errors
    #[error("undefined index key {0}")]
    UndefinedKey(Key),

    #[error("item under key {key} does not support property access")]
    NotIndexable { key: Key },

    // Tree errors
    #[error("invalid group-by specification: {0}")]
    InvalidGroupBySpec(GroupBySpecError),

    #[error("group-by function at level {level} returned an invalid segment: {reason}")]
    InvalidClosureResult { level: usize, reason: SegmentError },

    #[error("value at {path} cannot be used as a key: {reason}")]
    InvalidGroupValue { path: String, reason: SegmentError },

    #[error("undefined leaf mode: {0}")]
    UndefinedMode(String),

    #[error("offset {0} is not the append position")]
    InvalidOffset(Key),

    // Configuration errors
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
