//! Shared helpers for integration tests.

use propidx_engine::Record;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

/// Route engine events to the test writer. Set `RUST_LOG` to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// `{id, value}` pairs as records of `kind`.
#[allow(dead_code)]
pub fn pairs(kind: propidx_engine::RecordKind, items: &[(Value, Value)]) -> Vec<Record> {
    items
        .iter()
        .map(|(id, value)| Record::new(kind, json!({"id": id, "value": value})))
        .collect()
}
