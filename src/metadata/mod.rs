//! Metadata scraped from pages
//!
//! Metadata is a flat mapping from field name to a [`MetaValue`]. Values come
//! in three shapes, tagged by how the extractor's selector was declared:
//! a single string, an ordered list of strings (selector matched several
//! elements), or an insertion-ordered key/value table (entry selectors).
//!
//! Metadata accumulates as the crawl descends: a discovered page inherits a
//! snapshot of its parent's merged metadata, and fields extracted later
//! overwrite same-named inherited fields.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;

/// Reserved metadata field holding the URL of the page that produced the
/// mapping. Stamped by the crawl engine on every dequeued page.
pub const URL_KEY: &str = "url";

/// A page's metadata: field name to value
pub type MetaMap = BTreeMap<String, MetaValue>;

/// A single metadata value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaValue {
    /// A selector that matched exactly one element
    Text(String),

    /// A selector that matched zero or several elements, in document order
    List(Vec<String>),

    /// An entry selector's key/value table, in insertion order
    Table(Vec<(String, String)>),
}

impl MetaValue {
    /// Returns the inner string for `Text` values, `None` otherwise.
    ///
    /// Save-path templating only substitutes text values; lists and tables
    /// have no single string form.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetaValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        MetaValue::Text(s.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(s: String) -> Self {
        MetaValue::Text(s)
    }
}

impl From<Vec<String>> for MetaValue {
    fn from(items: Vec<String>) -> Self {
        MetaValue::List(items)
    }
}

impl Serialize for MetaValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            MetaValue::Text(s) => serializer.serialize_str(s),
            MetaValue::List(items) => items.serialize(serializer),
            MetaValue::Table(pairs) => {
                // Tables serialize as JSON objects preserving insertion order
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (key, value) in pairs {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}
