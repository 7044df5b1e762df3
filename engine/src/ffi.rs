//! FFI layer for building indexes and trees from other languages.
//!
//! All data crosses the boundary as JSON strings.
//!
//! # Memory Management
//!
//! - Strings returned by `pidx_*` functions are allocated by Rust
//! - Caller must free them with `pidx_string_free`
//!
//! # Error Handling
//!
//! Functions return JSON with either:
//! - `{"ok": <result>}` on success
//! - `{"error": "<message>"}` on failure
//!
//! # Record kinds
//!
//! `kind` selects how records are addressed: `0` for object-like records
//! (`a.b` paths), `1` for associative-array-like records (`[a][b]` paths).

use crate::{IndexerConfig, PropertyIndexer, PropertyTree, Record, RecordKind, TreeConfig};
use serde_json::Value;
use std::ffi::{c_char, CStr, CString};

/// Result wrapper for FFI responses.
#[derive(serde::Serialize)]
#[serde(untagged)]
enum FfiResult<T: serde::Serialize> {
    Ok { ok: T },
    Err { error: String },
}

impl<T: serde::Serialize> FfiResult<T> {
    fn ok(value: T) -> Self {
        FfiResult::Ok { ok: value }
    }

    fn err(message: impl Into<String>) -> Self {
        FfiResult::Err {
            error: message.into(),
        }
    }

    fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|e| format!(r#"{{"error":"serialization failed: {}"}}"#, e))
    }
}

impl<T: serde::Serialize> From<Result<T, String>> for FfiResult<T> {
    fn from(result: Result<T, String>) -> Self {
        match result {
            Ok(value) => FfiResult::ok(value),
            Err(message) => FfiResult::err(message),
        }
    }
}

/// Convert a Rust string to a C string pointer.
/// Caller must free with `pidx_string_free`.
fn to_c_string(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(cs) => cs.into_raw(),
        Err(_) => {
            // serde_json escapes NUL, so this only triggers on malformed fallbacks
            let error = c"{\"error\":\"string contained null bytes\"}";
            error.to_owned().into_raw()
        }
    }
}

/// Convert a C string pointer to a Rust string.
/// Returns None if pointer is null or invalid UTF-8.
unsafe fn from_c_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

fn record_kind(kind: u8) -> Result<RecordKind, String> {
    match kind {
        0 => Ok(RecordKind::Object),
        1 => Ok(RecordKind::Array),
        other => Err(format!("unknown record kind: {}", other)),
    }
}

/// Parse a JSON array of records.
unsafe fn parse_records(records_json: *const c_char, kind: u8) -> Result<Vec<Record>, String> {
    let kind = record_kind(kind)?;
    let raw = from_c_string(records_json).ok_or("invalid records JSON")?;
    let values: Vec<Value> =
        serde_json::from_str(&raw).map_err(|e| format!("parse error: {}", e))?;
    Ok(values
        .into_iter()
        .map(|value| Record::new(kind, value))
        .collect())
}

unsafe fn build_index(
    config_json: *const c_char,
    records_json: *const c_char,
    kind: u8,
) -> Result<Value, String> {
    let config = from_c_string(config_json).ok_or("invalid config JSON")?;
    let config = IndexerConfig::from_json(&config).map_err(|e| e.to_string())?;
    let records = parse_records(records_json, kind)?;

    let index = PropertyIndexer::from_config(&config)
        .and_then(|index| index.with_records(&records))
        .map_err(|e| e.to_string())?;
    Ok(index.to_value())
}

unsafe fn build_tree(
    config_json: *const c_char,
    records_json: *const c_char,
    kind: u8,
) -> Result<Value, String> {
    let config = from_c_string(config_json).ok_or("invalid config JSON")?;
    let config = TreeConfig::from_json(&config).map_err(|e| e.to_string())?;
    let records = parse_records(records_json, kind)?;

    let mut tree = PropertyTree::from_config(&config).map_err(|e| e.to_string())?;
    tree.load(&records).map_err(|e| e.to_string())?;
    Ok(tree.to_value())
}

// ============================================================================
// Builders
// ============================================================================

/// Build a flat index.
///
/// # Arguments
/// - `config_json`: JSON string of IndexerConfig
/// - `records_json`: JSON array of records
/// - `kind`: record kind (`0` object, `1` array)
///
/// # Returns
/// JSON string: `{"ok": {<key>: <value>, ...}}` or `{"error": "message"}`
///
/// # Safety
/// - `config_json` and `records_json` must be valid null-terminated C strings or null
/// - Caller must free the returned string with `pidx_string_free`
#[no_mangle]
pub unsafe extern "C" fn pidx_index_build(
    config_json: *const c_char,
    records_json: *const c_char,
    kind: u8,
) -> *mut c_char {
    let result = FfiResult::from(build_index(config_json, records_json, kind));
    to_c_string(result.to_json())
}

/// Build a classification tree.
///
/// # Arguments
/// - `config_json`: JSON string of TreeConfig
/// - `records_json`: JSON array of records
/// - `kind`: record kind (`0` object, `1` array)
///
/// # Returns
/// JSON string: `{"ok": <tree>}` or `{"error": "message"}`
///
/// # Safety
/// - `config_json` and `records_json` must be valid null-terminated C strings or null
/// - Caller must free the returned string with `pidx_string_free`
#[no_mangle]
pub unsafe extern "C" fn pidx_tree_build(
    config_json: *const c_char,
    records_json: *const c_char,
    kind: u8,
) -> *mut c_char {
    let result = FfiResult::from(build_tree(config_json, records_json, kind));
    to_c_string(result.to_json())
}

/// Free a string allocated by the engine.
///
/// # Safety
/// - `s` must be a valid pointer from a `pidx_*` function
/// - Must not be called twice on the same pointer
#[no_mangle]
pub unsafe extern "C" fn pidx_string_free(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}
