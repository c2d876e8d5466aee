//! Parsing of raw search index artifacts into entries.
//!
//! Accepted inputs:
//!
//! - a bare JSON array of entry objects
//! - a JSON object with a `docs` array (what Documenter writes)
//! - either of the above behind a JavaScript assignment, e.g.
//!   `var documenterSearchIndex = {"docs": [...]}` with an optional `;`

use crate::error::{Result, SearchError};
use crate::index::types::{DocId, IndexEntry};
use memmap2::Mmap;
use regex::Regex;
use serde_json::Value;
use std::fs::File;
use std::path::Path;
use std::sync::OnceLock;

/// `var name =`, `const name =`, `window.name =` and similar prefixes
fn js_assignment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?:(?:var|let|const)\s+)?[A-Za-z_$][\w$.]*\s*=\s*")
            .expect("static regex is valid")
    })
}

/// Strip the JavaScript wrapper (if any) around the JSON payload
pub fn strip_js_wrapper(raw: &str) -> &str {
    let raw = raw.trim_start_matches('\u{feff}');
    let body = match js_assignment().find(raw) {
        Some(m) => &raw[m.end()..],
        None => raw,
    };
    body.trim_end().trim_end_matches(';').trim()
}

/// Parse raw index text into entries, in document order.
///
/// Fails on the first malformed entry, naming its position; no partial
/// result is returned.
pub fn parse_entries(raw: &str) -> Result<Vec<IndexEntry>> {
    let body = strip_js_wrapper(raw);
    if body.is_empty() {
        return Err(SearchError::format("input is empty"));
    }

    let value: Value = serde_json::from_str(body)
        .map_err(|e| SearchError::format(format!("invalid JSON: {}", e)))?;

    let docs = match value {
        Value::Array(docs) => docs,
        Value::Object(mut obj) => match obj.remove("docs") {
            Some(Value::Array(docs)) => docs,
            Some(other) => {
                return Err(SearchError::format(format!(
                    "`docs` must be an array, found {}",
                    value_kind(&other)
                )));
            }
            None => {
                return Err(SearchError::format(
                    "expected an array of entries or an object with a `docs` array",
                ));
            }
        },
        other => {
            return Err(SearchError::format(format!(
                "expected an array of entries, found {}",
                value_kind(&other)
            )));
        }
    };

    if docs.len() > DocId::MAX as usize {
        return Err(SearchError::format(format!(
            "too many entries ({})",
            docs.len()
        )));
    }

    docs.into_iter()
        .enumerate()
        .map(|(pos, doc)| {
            if !doc.is_object() {
                return Err(SearchError::entry(
                    pos,
                    format!("expected an object, found {}", value_kind(&doc)),
                ));
            }
            serde_json::from_value(doc).map_err(|e| SearchError::entry(pos, e.to_string()))
        })
        .collect()
}

/// Memory-map an index file and parse it
pub fn read_index_file(path: &Path) -> Result<Vec<IndexEntry>> {
    let file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Err(SearchError::format("input is empty"));
    }

    // SAFETY: the map is read-only and dropped before this function returns
    let mmap = unsafe { Mmap::map(&file)? };
    let raw = std::str::from_utf8(&mmap)
        .map_err(|e| SearchError::format(format!("not valid UTF-8: {}", e)))?;

    parse_entries(raw)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
