//! Tag to JSON record mapping

use std::collections::BTreeMap;

use crate::listx::models::{Tag, TagRecord};

/// Errors that can occur while mapping a decoded tag to its JSON record
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    /// The `writable` attribute is not a boolean literal
    #[error("transforming xml attribute 'writable' to boolean failed: invalid value {0:?}")]
    InvalidWritable(String),
}

/// Parse a `writable` attribute; only `true` and `false` are accepted
fn parse_writable(value: &str) -> Result<bool, MappingError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(MappingError::InvalidWritable(other.to_string())),
    }
}

/// Build the output record for `tag` inside the table named `table_name`
///
/// A repeated language code keeps the last description.
pub fn map_tag_to_record(tag: &Tag, table_name: &str) -> Result<TagRecord, MappingError> {
    let writable = parse_writable(&tag.writable)?;

    let description: BTreeMap<String, String> = tag
        .descriptions
        .iter()
        .map(|d| (d.lang.clone(), d.text.clone()))
        .collect();

    Ok(TagRecord {
        writable,
        path: format!("{}:{}", table_name, tag.name),
        group: table_name.to_string(),
        description,
        tag_type: tag.tag_type.clone(),
    })
}
