//! # Propidx Engine
//!
//! Build key/value indexes and classification trees from collections of
//! records, addressing values inside each record with property paths.
//!
//! ## Core Concepts
//!
//! ### Records
//!
//! A [`Record`] is a JSON value tagged with a [`RecordKind`]. The kind decides
//! which path syntax reaches into it:
//! - [`RecordKind::Object`] - property access, `value.value`
//! - [`RecordKind::Array`] - index access, `[value][value]`
//!
//! Positional segments (`tags[0]`) work on lists in both kinds. A path that
//! does not resolve fails with [`Error::UnresolvablePath`] naming the kind.
//!
//! ### Indexes
//!
//! A [`PropertyIndexer`] maps the value at a key path to either the whole
//! record or the value at a value path. Adding a record whose key is already
//! present replaces the stored value. Keys keep insertion order.
//!
//! ### Trees
//!
//! A [`PropertyTree`] nests records one level per group-by specification and
//! stores a leaf value at the bottom. A [`LeafMode`] decides what happens
//! when two records land on the same leaf:
//! - [`LeafMode::Replace`] - the last record wins (default)
//! - [`LeafMode::Accumulate`] - every record's leaf is kept, in order
//!
//! Leaf values and group-by segments come from a [`PathSpec`]: a literal path
//! or a function over the record.
//!
//! ## Quick Start
//!
//! ```rust
//! use propidx_engine::{LeafMode, PropertyIndexer, PropertyTree, Record};
//! use serde_json::json;
//!
//! let records: Vec<Record> = vec![
//!     json!({"id": "a1", "city": "Lyon", "kind": "shop", "name": "Bakery"}),
//!     json!({"id": "a2", "city": "Lyon", "kind": "shop", "name": "Florist"}),
//!     json!({"id": "a3", "city": "Nice", "kind": "park", "name": "Castle Hill"}),
//! ]
//! .into_iter()
//! .map(Record::object)
//! .collect();
//!
//! // 1. Index names by id
//! let index = PropertyIndexer::new("id")
//!     .and_then(|index| index.with_value_path("name"))
//!     .and_then(|index| index.with_records(&records))
//!     .unwrap();
//! assert_eq!(index.get("a2").unwrap(), &json!("Florist"));
//!
//! // 2. Group names by city and kind
//! let tree = PropertyTree::builder()
//!     .leaf("name")
//!     .group_by("city")
//!     .group_by("kind")
//!     .mode(LeafMode::Accumulate)
//!     .load(&records)
//!     .unwrap();
//!
//! assert_eq!(
//!     tree.to_value(),
//!     json!({
//!         "Lyon": {"shop": ["Bakery", "Florist"]},
//!         "Nice": {"park": ["Castle Hill"]},
//!     })
//! );
//! ```
//!
//! ## Configuration
//!
//! [`IndexerConfig`] and [`TreeConfig`] describe literal-path structures as
//! JSON, for callers that cannot pass functions.
//!
//! ## FFI
//!
//! The [`ffi`] module provides C-compatible functions for use from other languages.
//! All data is exchanged as JSON strings.
//!
//! ## Logging
//!
//! The engine emits [`tracing`] events (`debug` per load, `trace` per
//! insertion, `warn` when an accumulated leaf coerces a scalar) and never
//! installs a subscriber.

pub mod config;
pub mod error;
pub mod extract;
pub mod ffi;
pub mod indexer;
pub mod key;
pub mod mode;
pub mod node;
pub mod path;
pub mod record;
pub mod resolver;
pub mod tree;

// Re-export main types at crate root
pub use config::{IndexerConfig, TreeConfig};
pub use error::{Error, GroupBySpecError, SegmentError};
pub use extract::{DeriveFn, PathSpec};
pub use indexer::{Lookup, PropertyIndexer};
pub use key::Key;
pub use mode::LeafMode;
pub use node::{Branch, Leaf, Node};
pub use path::{PropertyPath, Segment};
pub use record::{Record, RecordKind};
pub use resolver::{JsonAccessor, PropertyAccess};
pub use tree::{PropertyTree, TreeBuilder};
