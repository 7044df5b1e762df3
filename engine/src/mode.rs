//! Leaf modes: what happens when several records land on the same tree path.

use crate::{error::Result, node::Leaf, Error};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Leaf combination policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeafMode {
    /// The last record on a path wins.
    #[default]
    Replace,
    /// Every record on a path is kept, in insertion order.
    Accumulate,
}

impl LeafMode {
    /// Numeric code of [`LeafMode::Replace`].
    pub const SCALAR_LEAF: u8 = 1;
    /// Numeric code of [`LeafMode::Accumulate`].
    pub const ARRAY_LEAF: u8 = 2;

    pub(crate) fn strategy(self) -> &'static dyn LeafStrategy {
        match self {
            LeafMode::Replace => &ReplaceLeaf,
            LeafMode::Accumulate => &AccumulateLeaf,
        }
    }
}

impl fmt::Display for LeafMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeafMode::Replace => write!(f, "replace"),
            LeafMode::Accumulate => write!(f, "accumulate"),
        }
    }
}

impl FromStr for LeafMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "replace" | "scalar" => Ok(LeafMode::Replace),
            "accumulate" | "array" | "list" => Ok(LeafMode::Accumulate),
            _ => Err(Error::UndefinedMode(s.to_string())),
        }
    }
}

impl TryFrom<u8> for LeafMode {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            Self::SCALAR_LEAF => Ok(LeafMode::Replace),
            Self::ARRAY_LEAF => Ok(LeafMode::Accumulate),
            other => Err(Error::UndefinedMode(other.to_string())),
        }
    }
}

/// Merges an incoming leaf value with whatever already sits on its path.
pub(crate) trait LeafStrategy {
    fn combine(&self, existing: Option<Leaf>, incoming: Value) -> Leaf;
}

struct ReplaceLeaf;

impl LeafStrategy for ReplaceLeaf {
    fn combine(&self, _existing: Option<Leaf>, incoming: Value) -> Leaf {
        Leaf::Value(incoming)
    }
}

struct AccumulateLeaf;

impl LeafStrategy for AccumulateLeaf {
    fn combine(&self, existing: Option<Leaf>, incoming: Value) -> Leaf {
        match existing {
            None => Leaf::List(vec![incoming]),
            Some(Leaf::List(mut items)) => {
                items.push(incoming);
                Leaf::List(items)
            }
            // Written before a switch from Replace.
            Some(Leaf::Value(previous)) => {
                tracing::warn!("accumulating onto a replace-mode leaf, coercing it to a list");
                Leaf::List(vec![previous, incoming])
            }
        }
    }
}
