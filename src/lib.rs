//! # exiftags - ExifTool Tag Definitions as JSON
//!
//! `exiftags` turns the XML tag database printed by `exiftool -listx` into a
//! single JSON document, streaming it table by table so that neither the XML
//! nor the JSON ever has to be held in memory as a whole.
//!
//! ## Key Features
//!
//! - **Streaming**: Pull-based XML parsing with quick-xml; one `<table>` is
//!   decoded at a time and its records are written immediately.
//!
//! - **Strict**: Malformed XML, an unreadable source, a failing sink or a
//!   `writable` attribute that is not `true`/`false` aborts the conversion.
//!   The closing `]}` is only written after a clean end of input.
//!
//! - **Two front ends**: A one-shot CLI run and an HTTP endpoint that pipes a
//!   live `exiftool` process straight into the response body.
//!
//! ## Quick Start
//!
//! ```rust
//! use exiftags::listx::TagConverter;
//!
//! let xml = br#"<taginfo>
//! <table name='EXIF'>
//!  <tag id='271' name='Make' type='string' writable='true'>
//!   <desc lang='en'>Manufacturer</desc>
//!  </tag>
//! </table>
//! </taginfo>"#;
//!
//! let json = TagConverter::new().convert_bytes(xml)?;
//! assert_eq!(
//!     String::from_utf8(json).unwrap(),
//!     "{\"tags\": [{\"writable\":true,\"path\":\"EXIF:Make\",\"group\":\"EXIF\",\
//!      \"description\":{\"en\":\"Manufacturer\"},\"type\":\"string\"}\n]}"
//! );
//! # Ok::<(), exiftags::listx::ConversionError>(())
//! ```
//!
//! ## Streaming From exiftool
//!
//! ```rust,no_run
//! use exiftags::listx::TagConverter;
//! use exiftags::source::ListxCommand;
//!
//! let xml = ListxCommand::default().capture()?;
//! let stats = TagConverter::new().convert(xml.as_slice(), std::io::stdout().lock())?;
//! eprintln!("{} tags", stats.tags);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`listx`]: Streaming reader, record mapping and the JSON converter
//! - [`source`]: Running `exiftool -listx` or opening a captured dump
//! - `server`: HTTP endpoint (enabled by the `server` feature)

pub mod listx;
pub mod source;

#[cfg(feature = "server")]
pub mod server;
