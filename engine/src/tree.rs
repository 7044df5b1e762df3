//! Classification trees.
//!
//! A [`PropertyTree`] groups records into nested levels, one level per
//! group-by specification, and stores a leaf value at the bottom:
//!
//! ```text
//! records = [
//!   { prop1: "val1a", prop2: "val2a", prop3: "val3a" },
//!   { prop1: "val1a", prop2: "val2b", prop3: "val3b" },
//!   { prop1: "val3a", prop2: "val2a", prop3: "val3a" },
//! ]
//!
//! leaf prop3, grouped by [prop1, prop2]:
//! {
//!   "val1a": { "val2a": "val3a", "val2b": "val3b" },
//!   "val3a": { "val2a": "val3a" },
//! }
//! ```
//!
//! Without group-by specifications the tree is a flat list indexed by
//! insertion position. Navigation (`len`, `keys`, `get`, iteration) only
//! covers the top level.

use crate::{
    error::Result,
    extract::Extractor,
    node::{self, Branch, Node},
    Error, Key, LeafMode, PathSpec, Record, TreeConfig,
};
use serde_json::Value;
use std::borrow::Borrow;

/// A nested grouping of records.
#[derive(Debug, Clone)]
pub struct PropertyTree {
    leaf: Extractor,
    group_by: Vec<Extractor>,
    mode: LeafMode,
    root: Branch,
}

impl PropertyTree {
    /// Start configuring a tree.
    pub fn builder() -> TreeBuilder {
        TreeBuilder::default()
    }

    /// Build an empty tree from a serializable configuration.
    pub fn from_config(config: &TreeConfig) -> Result<Self> {
        let mut builder = Self::builder().mode(config.mode);
        if let Some(path) = &config.value_path {
            builder = builder.leaf(path.as_str());
        }
        for spec in config.group_by_specs()? {
            builder = builder.group_by(spec);
        }
        builder.build()
    }

    pub fn mode(&self) -> LeafMode {
        self.mode
    }

    /// Switch the leaf mode for subsequent insertions.
    ///
    /// Leaves already written keep their shape.
    pub fn set_mode(&mut self, mode: LeafMode) -> &mut Self {
        self.mode = mode;
        self
    }

    /// Number of key lookups from the root to any leaf.
    pub fn depth(&self) -> usize {
        self.group_by.len().max(1)
    }

    /// Insert one record, returning the top-level key it landed under.
    pub fn add(&mut self, record: &Record) -> Result<Key> {
        let leaf = self.leaf.value(record)?;
        let segments = self.segments(record)?;

        tracing::trace!(path = ?segments, mode = %self.mode, "inserting leaf");
        node::insert(&mut self.root, &segments, leaf, self.mode.strategy());

        Ok(segments[0].clone())
    }

    /// Append a record. Same as [`add`](Self::add); positions are never chosen by the caller.
    pub fn push(&mut self, record: &Record) -> Result<Key> {
        self.add(record)
    }

    /// Insert every record in order.
    ///
    /// Stops at the first failing record; records before it stay inserted.
    pub fn load<I>(&mut self, records: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: Borrow<Record>,
    {
        let mut count = 0usize;
        for record in records {
            self.add(record.borrow())?;
            count += 1;
        }
        tracing::debug!(records = count, top_level = self.len(), "loaded records into tree");
        Ok(self)
    }

    /// Write at an explicit top-level position.
    ///
    /// Only the next append position of a flat tree is accepted; every
    /// other offset fails with [`Error::InvalidOffset`].
    pub fn set_at(&mut self, key: impl Into<Key>, record: &Record) -> Result<Key> {
        let key = key.into();
        let append_position = Key::Int(self.root.len() as i64);
        if !self.group_by.is_empty() || key != append_position || self.root.contains_key(&key) {
            return Err(Error::InvalidOffset(key));
        }
        self.add(record)
    }

    pub fn get(&self, key: impl Into<Key>) -> Option<&Node> {
        self.root.get(&key.into())
    }

    pub fn contains_key(&self, key: impl Into<Key>) -> bool {
        self.root.contains_key(&key.into())
    }

    /// Remove a top-level entry with its whole subtree.
    pub fn remove(&mut self, key: impl Into<Key>) -> Option<Node> {
        self.root.shift_remove(&key.into())
    }

    /// Follow a full or partial key path from the root.
    pub fn read(&self, segments: &[Key]) -> Option<&Node> {
        node::read(&self.root, segments)
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.root.keys()
    }

    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, Key, Node> {
        self.root.iter()
    }

    /// The full nested structure.
    pub fn tree(&self) -> &Branch {
        &self.root
    }

    pub fn into_tree(self) -> Branch {
        self.root
    }

    /// Render the full nested structure as JSON.
    pub fn to_value(&self) -> Value {
        node::branch_to_value(&self.root)
    }

    fn segments(&self, record: &Record) -> Result<Vec<Key>> {
        if self.group_by.is_empty() {
            return Ok(vec![Key::Int(self.root.len() as i64)]);
        }
        self.group_by
            .iter()
            .enumerate()
            .map(|(level, extractor)| extractor.segment(record, level))
            .collect()
    }
}

impl<'a> IntoIterator for &'a PropertyTree {
    type Item = (&'a Key, &'a Node);
    type IntoIter = indexmap::map::Iter<'a, Key, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Configures and validates a [`PropertyTree`].
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    leaf: Option<PathSpec>,
    group_by: Vec<PathSpec>,
    mode: LeafMode,
}

impl TreeBuilder {
    /// Leaf value specification. Unset means the whole record.
    pub fn leaf(mut self, spec: impl Into<PathSpec>) -> Self {
        self.leaf = Some(spec.into());
        self
    }

    pub fn leaf_fn<F>(self, f: F) -> Self
    where
        F: Fn(&Record) -> Value + Send + Sync + 'static,
    {
        self.leaf(PathSpec::derived(f))
    }

    /// Append one grouping level.
    pub fn group_by(mut self, spec: impl Into<PathSpec>) -> Self {
        self.group_by.push(spec.into());
        self
    }

    pub fn group_by_fn<F>(self, f: F) -> Self
    where
        F: Fn(&Record) -> Value + Send + Sync + 'static,
    {
        self.group_by(PathSpec::derived(f))
    }

    pub fn mode(mut self, mode: LeafMode) -> Self {
        self.mode = mode;
        self
    }

    /// Validate the specifications and create an empty tree.
    pub fn build(self) -> Result<PropertyTree> {
        Ok(PropertyTree {
            leaf: Extractor::leaf(self.leaf)?,
            group_by: Extractor::group_by(self.group_by)?,
            mode: self.mode,
            root: Branch::new(),
        })
    }

    /// Build the tree and insert `records`.
    pub fn load<I>(self, records: I) -> Result<PropertyTree>
    where
        I: IntoIterator,
        I::Item: Borrow<Record>,
    {
        let mut tree = self.build()?;
        tree.load(records)?;
        Ok(tree)
    }
}
