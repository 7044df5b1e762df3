//! Tree nodes and the segment-path writer.

use crate::{mode::LeafStrategy, Key};
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// One level of a tree, in insertion order.
pub type Branch = IndexMap<Key, Node>;

/// Value stored at the deepest level of a tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Leaf {
    /// Written in replace mode.
    Value(Value),
    /// Written in accumulate mode, one entry per record.
    List(Vec<Value>),
}

impl Leaf {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Leaf::Value(value) => Some(value),
            Leaf::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Leaf::Value(_) => None,
            Leaf::List(items) => Some(items),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Leaf::Value(value) => value.clone(),
            Leaf::List(items) => Value::Array(items.clone()),
        }
    }
}

/// A tree node: either a nested level or a leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Branch(Branch),
    Leaf(Leaf),
}

impl Node {
    pub fn as_branch(&self) -> Option<&Branch> {
        match self {
            Node::Branch(branch) => Some(branch),
            Node::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Node::Branch(_) => None,
            Node::Leaf(leaf) => Some(leaf),
        }
    }

    /// Child under `key`, if this node is a branch.
    pub fn get(&self, key: &Key) -> Option<&Node> {
        self.as_branch()?.get(key)
    }

    /// Render as JSON; keys become object member names.
    pub fn to_value(&self) -> Value {
        match self {
            Node::Branch(branch) => branch_to_value(branch),
            Node::Leaf(leaf) => leaf.to_value(),
        }
    }
}

pub(crate) fn branch_to_value(branch: &Branch) -> Value {
    let map: Map<String, Value> = branch
        .iter()
        .map(|(key, node)| (key.to_string(), node.to_value()))
        .collect();
    Value::Object(map)
}

/// Follow `segments` down from `branch`.
pub(crate) fn read<'a>(branch: &'a Branch, segments: &[Key]) -> Option<&'a Node> {
    let (first, rest) = segments.split_first()?;
    rest.iter()
        .try_fold(branch.get(first)?, |node, key| node.get(key))
}

/// Write `incoming` at `segments`, creating intermediate levels as needed.
///
/// The strategy decides how `incoming` merges with a leaf already on that
/// exact path. Existing keys keep their position.
pub(crate) fn insert(
    branch: &mut Branch,
    segments: &[Key],
    incoming: Value,
    strategy: &dyn LeafStrategy,
) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut level = branch;
    for key in parents {
        let child = level
            .entry(key.clone())
            .or_insert_with(|| Node::Branch(Branch::new()));
        // A leaf on an intermediate level gives way to a branch.
        if let Node::Leaf(_) = child {
            *child = Node::Branch(Branch::new());
        }
        let Node::Branch(next) = child else {
            return;
        };
        level = next;
    }

    let existing = match level.get_mut(last) {
        Some(Node::Leaf(leaf)) => Some(std::mem::replace(leaf, Leaf::List(Vec::new()))),
        _ => None,
    };
    level.insert(last.clone(), Node::Leaf(strategy.combine(existing, incoming)));
}
