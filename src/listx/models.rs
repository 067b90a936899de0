//! Data models for -listx structures
//!
//! `Table`, `Tag` and `Description` mirror the XML elements exactly as they are
//! read. `TagRecord` is the JSON object written into the output array.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Represents a single `<table>` element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Table name, e.g. `EXIF` or `XMP::dc`
    pub name: String,

    /// Family 0 group
    pub g0: Option<String>,

    /// Family 1 group
    pub g1: Option<String>,

    /// Family 2 group
    pub g2: Option<String>,

    /// Table-level description
    pub description: Option<Description>,

    /// Tags in document order
    pub tags: Vec<Tag>,
}

impl Table {
    /// Number of tags in this table
    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    /// True when the table holds no tags
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Represents a single `<tag>` element inside a table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
    /// Tag ID (numeric or textual, format depends on the table)
    pub id: Option<String>,

    /// Tag name
    pub name: String,

    /// Value type name, e.g. `string` or `int16u`
    pub tag_type: String,

    /// Raw `writable` attribute text, empty when absent
    pub writable: String,

    /// Family 2 group override
    pub g2: Option<String>,

    /// One description per language
    pub descriptions: Vec<Description>,
}

/// A `<desc lang="..">` element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Description {
    /// Language code, e.g. `en` or `de`
    pub lang: String,

    /// Description text
    pub text: String,
}

impl Description {
    /// Create a new description
    pub fn new(lang: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            text: text.into(),
        }
    }
}

/// One element of the output `tags` array
///
/// Field order is significant: it is the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRecord {
    /// Whether exiftool can write this tag
    pub writable: bool,

    /// Fully qualified `group:name` identifier
    pub path: String,

    /// Enclosing table name
    pub group: String,

    /// Description text keyed by language code
    pub description: BTreeMap<String, String>,

    /// Value type name
    #[serde(rename = "type")]
    pub tag_type: String,
}
