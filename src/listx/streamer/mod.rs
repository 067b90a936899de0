//! Streaming -listx reader using quick-xml
//!
//! This module provides a pull-based reader that yields one fully decoded
//! [`Table`] at a time, so documents of any size are processed with memory
//! bounded by the largest single table.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use super::models::Table;

pub use error::ListxError;
pub use iterators::TableIterator;

mod error;
mod helpers;
mod iterators;
mod table;

#[cfg(test)]
mod tests;

/// Default input buffer size for -listx parsing (64KB)
pub const DEFAULT_INPUT_BUFFER_SIZE: usize = 64 * 1024;

/// Streaming reader for `exiftool -listx` output
pub struct ListxStreamer<R: BufRead> {
    reader: Reader<R>,
    /// Open elements outside of any table (e.g. the `<taginfo>` root)
    depth: usize,
    tables_read: usize,
    finished: bool,
}

impl ListxStreamer<BufReader<File>> {
    /// Open a -listx dump for streaming with the default buffer size (64KB)
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ListxError> {
        let file = File::open(path.as_ref())?;
        Ok(Self::new(BufReader::with_capacity(
            DEFAULT_INPUT_BUFFER_SIZE,
            file,
        )))
    }
}

impl<R: BufRead> ListxStreamer<R> {
    /// Create a new streamer from a BufRead source
    pub fn new(reader: R) -> Self {
        let mut xml_reader = Reader::from_reader(reader);
        // <desc> bodies keep their whitespace verbatim
        xml_reader.config_mut().trim_text(false);

        Self {
            reader: xml_reader,
            depth: 0,
            tables_read: 0,
            finished: false,
        }
    }

    /// Number of tables returned so far
    pub fn tables_read(&self) -> usize {
        self.tables_read
    }

    /// Read the next `<table>` from the stream
    ///
    /// Returns `Ok(None)` once the document ended cleanly. Reaching the end of
    /// input with elements still open is an error.
    pub fn next_table(&mut self) -> Result<Option<Table>, ListxError> {
        if self.finished {
            return Ok(None);
        }

        let mut buf = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    if e.local_name().as_ref() == b"table" {
                        let table = self.parse_table(&e, false)?;
                        self.tables_read += 1;
                        return Ok(Some(table));
                    }
                    self.depth += 1;
                }
                Ok(Event::Empty(e)) => {
                    if e.local_name().as_ref() == b"table" {
                        let table = self.parse_table(&e, true)?;
                        self.tables_read += 1;
                        return Ok(Some(table));
                    }
                }
                Ok(Event::End(_)) => {
                    // Unmatched end tags are rejected by quick-xml itself
                    self.depth = self.depth.saturating_sub(1);
                }
                Ok(Event::Eof) => {
                    self.finished = true;
                    if self.depth > 0 {
                        return Err(ListxError::InvalidStructure(format!(
                            "unexpected end of document with {} unclosed element(s)",
                            self.depth
                        )));
                    }
                    return Ok(None);
                }
                Err(e) => return Err(ListxError::from_xml(e)),
                _ => {}
            }
            buf.clear();
        }
    }

    /// Iterate over all remaining tables
    pub fn tables(self) -> TableIterator<R> {
        TableIterator { streamer: self }
    }
}
