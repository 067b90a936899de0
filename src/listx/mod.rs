//! # ExifTool `-listx` Module
//!
//! This module provides streaming conversion of the XML tag database that
//! `exiftool -listx` prints into the JSON document served by this crate.
//!
//! ## Design Goals
//!
//! - **Streaming**: Hold at most one `<table>` in memory at a time
//! - **Incremental**: Emit every JSON record as soon as its table is decoded
//! - **Strict**: The first malformed element or attribute aborts the whole run
//!
//! ## -listx Structure
//!
//! ```text
//! taginfo
//! └── table* (name, g0, g1, g2)
//!     ├── desc* (lang)
//!     └── tag* (id, name, type, writable, g2)
//!         └── desc* (lang)
//! ```
//!
//! ## Output
//!
//! ```text
//! {"tags": [{"writable":true,"path":"EXIF:Make","group":"EXIF","description":{"en":"Make"},"type":"string"}
//! ,{"writable":false, ...}
//! ]}
//! ```

mod models;
mod streamer;
pub mod converter;

pub use converter::{
    map_tag_to_record, ConversionConfig, ConversionError, ConversionStats, ErrorKind,
    MappingError, TagConverter,
};
pub use models::*;
pub use streamer::{ListxError, ListxStreamer, TableIterator, DEFAULT_INPUT_BUFFER_SIZE};
