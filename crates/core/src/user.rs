//! Splitting nested records into user rows.

use crate::record::NestedRecord;
use serde::Serialize;
use serde_json::{Map, Value};

/// Column holding the given name.
pub const FIRST_NAME_KEY: &str = "firstName";
/// Column holding the family name.
pub const LAST_NAME_KEY: &str = "lastName";
/// Column holding the age.
pub const AGE_KEY: &str = "age";
/// Top-level key whose sub-object is stored as the address payload.
pub const ADDRESS_KEY: &str = "address";

/// A user row ready to be written to the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRecord {
    /// Display name built from the first and last name.
    pub name: String,
    /// Age as received. Numeric coercion is left to the store.
    pub age: Option<String>,
    /// Value of the top-level `address` key, `{}` when absent.
    pub address: Value,
    /// Every other top-level field.
    pub additional_info: Value,
}

impl UserRecord {
    /// Split a nested record into its user row.
    ///
    /// `firstName`, `lastName` and `age` are pulled out as scalars, the
    /// `address` subtree becomes the address payload, and everything else
    /// lands in `additional_info`. Together the four fields cover every
    /// column of the source row.
    pub fn from_nested(record: &NestedRecord) -> Self {
        let mut rest = record.clone();

        let first_name = rest.shift_remove(FIRST_NAME_KEY).map(scalar_text);
        let last_name = rest.shift_remove(LAST_NAME_KEY).map(scalar_text);
        let age = rest.shift_remove(AGE_KEY).map(scalar_text);
        let address = rest
            .shift_remove(ADDRESS_KEY)
            .unwrap_or_else(|| Value::Object(Map::new()));

        Self {
            name: display_name(first_name.as_deref(), last_name.as_deref()),
            age,
            address,
            additional_info: Value::Object(rest),
        }
    }
}

/// Join the present, non-empty name parts with a single space.
pub fn display_name(first: Option<&str>, last: Option<&str>) -> String {
    [first, last]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn scalar_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}
