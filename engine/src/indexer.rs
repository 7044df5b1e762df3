//! Flat key-value indexes.
//!
//! A [`PropertyIndexer`] maps the value found at a key path to the value
//! found at a value path (or the whole record):
//!
//! ```rust
//! use propidx_engine::{PropertyIndexer, Record};
//! use serde_json::json;
//!
//! let mut index = PropertyIndexer::new("path.to.id")
//!     .unwrap()
//!     .with_value_path("path.to.value")
//!     .unwrap();
//!
//! index
//!     .add(&Record::object(json!({"path": {"to": {"id": "myId", "value": "MyValue"}}})))
//!     .unwrap();
//! assert_eq!(index.get("myId").unwrap(), &json!("MyValue"));
//! ```
//!
//! Adding a record whose key is already present replaces the stored value.

use crate::{
    error::Result, resolver, Error, IndexerConfig, Key, PropertyPath, Record,
};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::borrow::Borrow;

/// A key given directly, or a record to read the key from.
#[derive(Debug, Clone)]
pub enum Lookup<'a> {
    Key(Key),
    Record(&'a Record),
}

impl From<Key> for Lookup<'_> {
    fn from(key: Key) -> Self {
        Lookup::Key(key)
    }
}

impl From<&Key> for Lookup<'_> {
    fn from(key: &Key) -> Self {
        Lookup::Key(key.clone())
    }
}

impl From<i64> for Lookup<'_> {
    fn from(n: i64) -> Self {
        Lookup::Key(Key::Int(n))
    }
}

impl From<i32> for Lookup<'_> {
    fn from(n: i32) -> Self {
        Lookup::Key(n.into())
    }
}

impl From<&str> for Lookup<'_> {
    fn from(s: &str) -> Self {
        Lookup::Key(s.into())
    }
}

impl From<String> for Lookup<'_> {
    fn from(s: String) -> Self {
        Lookup::Key(s.into())
    }
}

impl<'a> From<&'a Record> for Lookup<'a> {
    fn from(record: &'a Record) -> Self {
        Lookup::Record(record)
    }
}

/// Single-level index from extracted keys to extracted values.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyIndexer {
    key_path: PropertyPath,
    value_path: Option<PropertyPath>,
    index: IndexMap<Key, Record>,
}

impl PropertyIndexer {
    /// Create an index storing whole records under the value at `key_path`.
    pub fn new(key_path: &str) -> Result<Self> {
        Ok(Self {
            key_path: PropertyPath::parse(key_path)?,
            value_path: None,
            index: IndexMap::new(),
        })
    }

    /// Store the value at `value_path` instead of the whole record.
    pub fn with_value_path(mut self, value_path: &str) -> Result<Self> {
        self.value_path = Some(PropertyPath::parse(value_path)?);
        Ok(self)
    }

    pub fn from_config(config: &IndexerConfig) -> Result<Self> {
        let index = Self::new(&config.key_path)?;
        match &config.value_path {
            Some(path) => index.with_value_path(path),
            None => Ok(index),
        }
    }

    /// Load `records` right after construction.
    pub fn with_records<I>(mut self, records: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Borrow<Record>,
    {
        self.load(records)?;
        Ok(self)
    }

    pub fn key_path(&self) -> &PropertyPath {
        &self.key_path
    }

    pub fn value_path(&self) -> Option<&PropertyPath> {
        self.value_path.as_ref()
    }

    /// Index one record, returning its key.
    pub fn add(&mut self, record: &Record) -> Result<Key> {
        let key = self.key_of(record)?;
        let value = match &self.value_path {
            Some(path) => resolver::resolve(record, path)?.clone(),
            None => record.value().clone(),
        };

        tracing::trace!(key = %key, "indexing record");
        self.index.insert(key.clone(), record.derive(value));
        Ok(key)
    }

    /// Index every record in order.
    ///
    /// Stops at the first failing record; records before it stay indexed.
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
        tracing::debug!(records = count, size = self.len(), "loaded records into index");
        Ok(self)
    }

    /// Stored value for a key, or for the key of a record.
    pub fn get<'a>(&self, lookup: impl Into<Lookup<'a>>) -> Result<&Value> {
        let key = self.resolve_key(lookup.into())?;
        self.entry(key).map(Record::value)
    }

    /// Resolve `path` against the stored value for a key.
    ///
    /// Fails with [`Error::NotIndexable`] when the stored value is a scalar.
    pub fn get_path<'a>(&self, lookup: impl Into<Lookup<'a>>, path: &str) -> Result<&Value> {
        let path = PropertyPath::parse(path)?;
        let key = self.resolve_key(lookup.into())?;
        let item = self.entry(key.clone())?;
        if path.is_root() {
            return Ok(item.value());
        }
        if !item.is_structured() {
            return Err(Error::NotIndexable { key });
        }
        resolver::resolve(item, &path)
    }

    pub fn contains<'a>(&self, lookup: impl Into<Lookup<'a>>) -> bool {
        self.resolve_key(lookup.into())
            .map(|key| self.index.contains_key(&key))
            .unwrap_or(false)
    }

    /// Remove an entry. Absent keys are ignored.
    pub fn remove<'a>(&mut self, lookup: impl Into<Lookup<'a>>) -> Result<Option<Value>> {
        let key = self.resolve_key(lookup.into())?;
        Ok(self.index.shift_remove(&key).map(Record::into_value))
    }

    /// Whether `record` can be indexed. Never fails.
    pub fn is_valid(&self, record: &Record) -> bool {
        self.key_of(record).is_ok()
            && self
                .value_path
                .as_ref()
                .map_or(true, |path| resolver::is_valid(record, path))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.index.keys()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.index.iter(),
        }
    }

    /// Render the index as a JSON object.
    pub fn to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();
        Value::Object(map)
    }

    fn key_of(&self, record: &Record) -> Result<Key> {
        let value = resolver::resolve(record, &self.key_path)?;
        Key::from_value(value).map_err(|reason| Error::InvalidGroupValue {
            path: self.key_path.to_string(),
            reason,
        })
    }

    fn resolve_key(&self, lookup: Lookup<'_>) -> Result<Key> {
        match lookup {
            Lookup::Key(key) => Ok(key),
            Lookup::Record(record) => self.key_of(record),
        }
    }

    fn entry(&self, key: Key) -> Result<&Record> {
        match self.index.get(&key) {
            Some(item) => Ok(item),
            None => Err(Error::UndefinedKey(key)),
        }
    }
}

/// Iterator over `(key, value)` pairs in index order.
pub struct Iter<'a> {
    inner: indexmap::map::Iter<'a, Key, Record>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a Key, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, record)| (key, record.value()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a PropertyIndexer {
    type Item = (&'a Key, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordKind;
    use serde_json::json;

    fn simple_object(id: impl Into<Value>, value: impl Into<Value>) -> Record {
        let (id, value): (Value, Value) = (id.into(), value.into());
        Record::object(json!({"id": id, "value": value}))
    }

    fn simple_array(id: impl Into<Value>, value: impl Into<Value>) -> Record {
        let (id, value): (Value, Value) = (id.into(), value.into());
        Record::array(json!({"id": id, "value": value}))
    }

    fn objects(n: i64) -> Vec<Record> {
        (1..=n)
            .map(|i| simple_object(i, format!("Nice Value {i}")))
            .collect()
    }

    fn object_index() -> PropertyIndexer {
        PropertyIndexer::new("id")
            .unwrap()
            .with_value_path("value")
            .unwrap()
    }

    fn array_index() -> PropertyIndexer {
        PropertyIndexer::new("[id]")
            .unwrap()
            .with_value_path("[value]")
            .unwrap()
    }

    #[test]
    fn fill_with_objects() {
        let mut index = object_index();
        assert_eq!(index.len(), 0);

        let record = simple_object(1, "Nice Value");
        index.add(&record).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.get(1).unwrap(), &json!("Nice Value"));

        index.add(&record).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.get(1).unwrap(), &json!("Nice Value"));

        let nested = simple_object("azerty", record.value().clone());
        index.add(&nested).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("azerty").unwrap(), record.value());
    }

    #[test]
    fn fill_with_arrays() {
        let mut index = array_index();
        let record = simple_array(1, "Nice Value");
        index.add(&record).unwrap();
        index.add(&record).unwrap();

        assert_eq!(index.len(), 1);
        assert_eq!(index.get(1).unwrap(), &json!("Nice Value"));
    }

    #[test]
    fn last_write_wins() {
        let mut index = object_index();
        index.add(&simple_object(1, "first")).unwrap();
        index.add(&simple_object(1, "second")).unwrap();

        assert_eq!(index.len(), 1);
        assert_eq!(index.get(1).unwrap(), &json!("second"));
    }

    #[test]
    fn validity() {
        assert!(object_index().is_valid(&simple_object(1, "Nice Value")));
        assert!(array_index().is_valid(&simple_array(1, "Nice Value")));

        let index = PropertyIndexer::new("identity")
            .unwrap()
            .with_value_path("content")
            .unwrap();
        assert!(!index.is_valid(&simple_object(1, "Nice Value")));

        let index = PropertyIndexer::new("[identity]")
            .unwrap()
            .with_value_path("[content]")
            .unwrap();
        assert!(!index.is_valid(&simple_array(1, "Nice Value")));

        // key resolves, value does not
        let index = PropertyIndexer::new("id")
            .unwrap()
            .with_value_path("content")
            .unwrap();
        assert!(!index.is_valid(&simple_object(1, "Nice Value")));

        // shape mismatch
        assert!(!object_index().is_valid(&simple_array(1, "Nice Value")));
    }

    #[test]
    fn undefined_key() {
        let index = object_index();
        let err = index.get(1).unwrap_err();
        assert_eq!(err, Error::UndefinedKey(Key::Int(1)));
        assert_eq!(err.to_string(), "undefined index key 1");
    }

    #[test]
    fn missing_key_path_names_record_kind() {
        let mut index = PropertyIndexer::new("id").unwrap();
        let err = index
            .add(&Record::object(json!({"invalid": 1})))
            .unwrap_err();
        assert_eq!(err.to_string(), "property id is not owned by the object");

        let mut index = PropertyIndexer::new("[id]")
            .unwrap()
            .with_value_path("value")
            .unwrap();
        let err = index
            .add(&Record::array(json!({"invalidKey": 1, "value": "Nice Value"})))
            .unwrap_err();
        assert_eq!(
            err,
            Error::UnresolvablePath {
                kind: RecordKind::Array,
                path: "[id]".into()
            }
        );
    }

    #[test]
    fn missing_value_path() {
        let mut index = object_index();
        let err = index
            .add(&Record::object(json!({"id": 1, "invalid": "value"})))
            .unwrap_err();
        assert_eq!(err.to_string(), "property value is not owned by the object");
        assert!(index.is_empty());
    }

    #[test]
    fn key_accessor() {
        let mut index = object_index();
        let flat = simple_object("flat", "Nice Value from flat object");
        let nested = simple_object("nested", flat.value().clone());
        index.add(&nested).unwrap();

        assert_eq!(index.get("nested").unwrap(), flat.value());
        assert_eq!(
            index.get_path("nested", "value").unwrap(),
            &json!("Nice Value from flat object")
        );
        assert_eq!(index.get(&nested).unwrap(), flat.value());
        assert_eq!(
            index.get_path(&nested, "value").unwrap(),
            &json!("Nice Value from flat object")
        );
    }

    #[test]
    fn key_accessor_on_arrays() {
        let mut index = array_index();
        let flat = simple_array("flat", "Nice Value from flat object");
        let nested = simple_array("nested", flat.value().clone());
        index.add(&nested).unwrap();

        assert_eq!(
            index.get_path("nested", "[value]").unwrap(),
            &json!("Nice Value from flat object")
        );
        assert!(index.get_path("nested", "value").is_err());
    }

    #[test]
    fn deep_property_access_on_whole_records() {
        let mut index = PropertyIndexer::new("id").unwrap();
        let child = simple_object("child", "Nice Value from child object");
        let parent = simple_object("parent", child.value().clone());
        let grandfather = simple_object("grandFather", parent.value().clone());
        index.add(&grandfather).unwrap();

        assert_eq!(index.get("grandFather").unwrap(), grandfather.value());
        assert_eq!(
            index.get_path("grandFather", "value").unwrap(),
            parent.value()
        );
        assert_eq!(
            index.get_path("grandFather", "value.value").unwrap(),
            child.value()
        );
        assert_eq!(
            index.get_path("grandFather", "value.value.value").unwrap(),
            &json!("Nice Value from child object")
        );
    }

    #[test]
    fn sub_path_on_scalar_is_not_indexable() {
        let mut index = object_index();
        index.add(&simple_object(1, "scalar")).unwrap();

        assert_eq!(
            index.get_path(1, "value").unwrap_err(),
            Error::NotIndexable { key: Key::Int(1) }
        );
        assert_eq!(index.get_path(1, "").unwrap(), &json!("scalar"));
        assert_eq!(
            index.get_path(2, "value").unwrap_err(),
            Error::UndefinedKey(Key::Int(2))
        );
    }

    #[test]
    fn load_collection() {
        let mut index = object_index();
        index.load(objects(3)).unwrap();

        assert_eq!(index.len(), 3);
        assert_eq!(index.get(1).unwrap(), &json!("Nice Value 1"));
        assert_eq!(index.get(2).unwrap(), &json!("Nice Value 2"));
        assert_eq!(index.get(3).unwrap(), &json!("Nice Value 3"));
    }

    #[test]
    fn load_collection_on_construction() {
        let index = object_index().with_records(objects(10)).unwrap();

        assert_eq!(index.len(), 10);
        assert_eq!(index.get(1).unwrap(), &json!("Nice Value 1"));
        assert_eq!(index.get(10).unwrap(), &json!("Nice Value 10"));
    }

    #[test]
    fn failed_load_keeps_processed_records() {
        let mut index = object_index();
        let mut records = objects(2);
        records.push(Record::object(json!({"value": "no id"})));
        records.extend(objects(5).into_iter().skip(3));

        assert!(index.load(&records).is_err());
        assert_eq!(index.len(), 2);
        assert!(!index.contains(4));
    }

    #[test]
    fn iteration_in_insertion_order() {
        let index = object_index().with_records(objects(3)).unwrap();

        let mut expected = 1;
        for (key, value) in &index {
            assert_eq!(key, &Key::Int(expected));
            assert_eq!(value, &json!(format!("Nice Value {expected}")));
            expected += 1;
        }
        assert_eq!(index.iter().len(), 3);

        let keys: Vec<_> = index.keys().cloned().collect();
        assert_eq!(keys, vec![Key::Int(1), Key::Int(2), Key::Int(3)]);
    }

    #[test]
    fn remove_entries() {
        let mut index = object_index().with_records(objects(3)).unwrap();

        assert_eq!(index.remove(2).unwrap(), Some(json!("Nice Value 2")));
        assert_eq!(index.remove(2).unwrap(), None);
        assert_eq!(index.len(), 2);

        let record = simple_object(3, "ignored");
        assert!(index.contains(&record));
        index.remove(&record).unwrap();
        assert!(!index.contains(&record));

        let orphan = Record::object(json!({"value": 1}));
        assert!(index.remove(&orphan).is_err());
        assert!(!index.contains(&orphan));
    }

    #[test]
    fn structured_keys_are_rejected() {
        let mut index = PropertyIndexer::new("tags").unwrap();
        let err = index
            .add(&Record::object(json!({"tags": ["a", "b"]})))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidGroupValue { .. }));
    }

    #[test]
    fn to_value_renders_object() {
        let index = array_index()
            .with_records([simple_array(1, "A"), simple_array("b", "B")])
            .unwrap();
        assert_eq!(index.to_value(), json!({"1": "A", "b": "B"}));
    }

    #[test]
    fn from_config() {
        let config = IndexerConfig::new("[id]").with_value_path("[value]");
        let index = PropertyIndexer::from_config(&config).unwrap();
        assert_eq!(index.key_path().as_str(), "[id]");
        assert_eq!(index.value_path().map(PropertyPath::as_str), Some("[value]"));

        let err = PropertyIndexer::from_config(&IndexerConfig::new("a..b")).unwrap_err();
        assert!(matches!(err, Error::InvalidPropertyPath { .. }));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_last_write_wins(
                rows in prop::collection::vec((0i64..8, any::<i32>()), 1..50),
            ) {
                let records: Vec<Record> = rows.iter().map(|(k, v)| simple_object(*k, *v)).collect();
                let index = object_index().with_records(&records).unwrap();

                let mut expected = std::collections::HashMap::new();
                for (k, v) in &rows {
                    expected.insert(*k, *v);
                }

                prop_assert_eq!(index.len(), expected.len());
                for (k, v) in expected {
                    prop_assert_eq!(index.get(k).unwrap(), &json!(v));
                }
            }

            #[test]
            fn prop_adding_twice_is_idempotent(id in any::<i64>(), value in ".*") {
                let record = simple_object(id, value.clone());
                let mut index = object_index();
                index.add(&record).unwrap();
                let snapshot = index.clone();
                index.add(&record).unwrap();

                prop_assert_eq!(index, snapshot);
            }
        }
    }
}
