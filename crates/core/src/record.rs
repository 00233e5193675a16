//! Nested records built from dotted column paths.
//!
//! A CSV header such as `address.city` names a path into a record rather
//! than a flat field. [`expand_row`] turns one flat row into a tree of JSON
//! objects with string leaves:
//!
//! ```text
//! firstName=Jane, address.city=Springfield
//!   => {"firstName": "Jane", "address": {"city": "Springfield"}}
//! ```
//!
//! Two columns that collide (one path is a prefix of another, or the same
//! path appears twice) are rejected with [`Error::KeyPathConflict`]; no
//! value is ever dropped silently.

use crate::error::{Error, Result};
use serde_json::map::Entry;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Separator between path segments in a column name.
pub const PATH_SEPARATOR: char = '.';

/// A record expanded from one CSV row.
pub type NestedRecord = Map<String, Value>;

/// Expand `(column, value)` pairs into a nested record.
///
/// Column segments and values are trimmed of surrounding whitespace.
pub fn expand_row<'a, I>(fields: I) -> Result<NestedRecord>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut record = NestedRecord::new();
    for (key, value) in fields {
        let path: Vec<&str> = key.split(PATH_SEPARATOR).map(str::trim).collect();
        insert_path(&mut record, key, &path, value.trim())?;
    }
    Ok(record)
}

fn insert_path(record: &mut NestedRecord, key: &str, path: &[&str], value: &str) -> Result<()> {
    // `split` always yields at least one segment.
    let Some((&leaf, parents)) = path.split_last() else {
        return Ok(());
    };

    let conflict = |segment: &str| Error::KeyPathConflict {
        key: key.to_string(),
        segment: segment.to_string(),
    };

    let mut node = record;
    for &segment in parents {
        node = match node
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()))
        {
            Value::Object(child) => child,
            _ => return Err(conflict(segment)),
        };
    }

    match node.entry(leaf.to_string()) {
        Entry::Vacant(slot) => {
            slot.insert(Value::String(value.to_string()));
            Ok(())
        }
        Entry::Occupied(_) => Err(conflict(leaf)),
    }
}

/// Flatten a nested record back into dotted paths.
///
/// Non-string leaves are rendered as their JSON text. An empty nested
/// object has no leaves and therefore contributes nothing.
pub fn flatten_record(record: &NestedRecord) -> BTreeMap<String, String> {
    let mut flat = BTreeMap::new();
    flatten_into(record, None, &mut flat);
    flat
}

fn flatten_into(node: &NestedRecord, prefix: Option<&str>, flat: &mut BTreeMap<String, String>) {
    for (segment, value) in node {
        let path = match prefix {
            Some(prefix) => format!("{prefix}{PATH_SEPARATOR}{segment}"),
            None => segment.clone(),
        };
        match value {
            Value::Object(child) => flatten_into(child, Some(&path), flat),
            Value::String(text) => {
                flat.insert(path, text.clone());
            }
            other => {
                flat.insert(path, other.to_string());
            }
        }
    }
}
