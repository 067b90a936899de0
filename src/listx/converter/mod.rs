//! -listx to JSON converter
//!
//! This module provides the streaming conversion from `exiftool -listx` XML
//! into the `{"tags": [...]}` JSON document. Records are written to the sink
//! as soon as the table containing them has been decoded; nothing is buffered
//! beyond a single table and a single serialized record.

use std::io::{BufRead, Write};
use std::path::Path;

use log::{debug, info};

use super::models::TagRecord;
use super::streamer::{ListxError, ListxStreamer};

pub use mapping::{map_tag_to_record, MappingError};

mod mapping;


/// Literal written before the first record
pub const DOCUMENT_OPEN: &[u8] = b"{\"tags\": [";

/// Literal written after the last record of a successful conversion
pub const DOCUMENT_CLOSE: &[u8] = b"]}";

/// Errors that can occur during conversion
///
/// Every variant aborts the conversion; nothing is written after it.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// The XML source could not be read
    #[error("reading xml source failed: {0}")]
    Source(#[source] std::io::Error),

    /// The XML source is malformed
    #[error("xml decoding failed: {0}")]
    Decode(#[source] ListxError),

    /// A decoded tag failed semantic validation
    #[error("xml to json transformation failed for {path}: {source}")]
    Validation {
        /// `group:name` of the offending tag
        path: String,
        /// Underlying mapping error
        #[source]
        source: MappingError,
    },

    /// A record could not be serialized
    #[error("json encoding of tags failed: {0}")]
    Encode(#[from] serde_json::Error),

    /// The output sink rejected bytes
    #[error("writing json output failed: {0}")]
    Sink(#[source] std::io::Error),
}

/// Coarse classification of a [`ConversionError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Reading the input failed
    Source,
    /// Malformed XML or unexpected structure
    Decode,
    /// A field failed semantic validation
    Validation,
    /// The output destination failed to accept bytes
    Sink,
}

impl ConversionError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConversionError::Source(_) => ErrorKind::Source,
            ConversionError::Decode(_) => ErrorKind::Decode,
            ConversionError::Validation { .. } => ErrorKind::Validation,
            // Records are strings, booleans and string maps; serde_json only
            // fails on them when the writer does
            ConversionError::Encode(_) | ConversionError::Sink(_) => ErrorKind::Sink,
        }
    }
}

impl From<ListxError> for ConversionError {
    fn from(err: ListxError) -> Self {
        match err {
            ListxError::IoError(io) => ConversionError::Source(io),
            other => ConversionError::Decode(other),
        }
    }
}

/// Configuration for the -listx to JSON conversion
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Log a progress line every this many tables (0 disables)
    pub progress_interval: usize,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            progress_interval: 100,
        }
    }
}

/// Statistics from a conversion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionStats {
    /// Tables decoded
    pub tables: usize,
    /// Records written
    pub tags: usize,
    /// Bytes written to the sink
    pub bytes_written: u64,
}

/// Writes the JSON document piece by piece and owns the separator bookkeeping
struct TagsWriter<W: Write> {
    out: W,
    scratch: Vec<u8>,
    records_written: usize,
    bytes_written: u64,
}

impl<W: Write> TagsWriter<W> {
    fn new(out: W) -> Self {
        Self {
            out,
            scratch: Vec::with_capacity(512),
            records_written: 0,
            bytes_written: 0,
        }
    }

    fn write_raw(&mut self, bytes: &[u8]) -> Result<(), ConversionError> {
        self.out.write_all(bytes).map_err(ConversionError::Sink)?;
        self.out.flush().map_err(ConversionError::Sink)?;
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }

    fn open(&mut self) -> Result<(), ConversionError> {
        self.write_raw(DOCUMENT_OPEN)
    }

    /// Serialize one record, prefixed by a comma unless it is the first
    fn write_record(&mut self, record: &TagRecord) -> Result<(), ConversionError> {
        let mut scratch = std::mem::take(&mut self.scratch);
        scratch.clear();
        if self.records_written > 0 {
            scratch.push(b',');
        }
        serde_json::to_writer(&mut scratch, record)?;
        scratch.push(b'\n');

        let result = self.write_raw(&scratch);
        self.scratch = scratch;
        result?;

        self.records_written += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), ConversionError> {
        self.write_raw(DOCUMENT_CLOSE)
    }
}

/// Streaming -listx to JSON converter
#[derive(Debug, Clone, Default)]
pub struct TagConverter {
    config: ConversionConfig,
}

impl TagConverter {
    /// Create a new converter with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new converter with custom configuration
    pub fn with_config(config: ConversionConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Convert a -listx XML stream into the JSON tags document
    ///
    /// The opening literal is written immediately, every record as soon as its
    /// table has been decoded, and the closing literal only after the input
    /// ended cleanly. On error the output holds a truncated document and
    /// nothing further is written.
    pub fn convert<R: BufRead, W: Write>(
        &self,
        input: R,
        output: W,
    ) -> Result<ConversionStats, ConversionError> {
        let mut streamer = ListxStreamer::new(input);
        let mut writer = TagsWriter::new(output);
        let mut stats = ConversionStats::default();

        writer.open()?;

        while let Some(table) = streamer.next_table()? {
            stats.tables += 1;

            for tag in &table.tags {
                let record = map_tag_to_record(tag, &table.name).map_err(|source| {
                    ConversionError::Validation {
                        path: format!("{}:{}", table.name, tag.name),
                        source,
                    }
                })?;
                writer.write_record(&record)?;
            }

            debug!(
                "Table {}: {} tags ({} total)",
                table.name,
                table.tag_count(),
                writer.records_written
            );
            if self.config.progress_interval > 0 && stats.tables % self.config.progress_interval == 0
            {
                info!(
                    "Progress: {} tables, {} tags",
                    stats.tables, writer.records_written
                );
            }
        }

        writer.close()?;

        stats.tags = writer.records_written;
        stats.bytes_written = writer.bytes_written;
        info!(
            "Conversion complete: {} tables, {} tags, {} bytes",
            stats.tables, stats.tags, stats.bytes_written
        );
        Ok(stats)
    }

    /// Convert a pre-captured -listx buffer
    pub fn convert_bytes(&self, xml: &[u8]) -> Result<Vec<u8>, ConversionError> {
        let mut output = Vec::with_capacity(xml.len() / 2);
        self.convert(xml, &mut output)?;
        Ok(output)
    }

    /// Convert a -listx dump stored on disk
    pub fn convert_file<P: AsRef<Path>, W: Write>(
        &self,
        path: P,
        output: W,
    ) -> Result<ConversionStats, ConversionError> {
        let file = std::fs::File::open(path.as_ref()).map_err(ConversionError::Source)?;
        let reader =
            std::io::BufReader::with_capacity(super::streamer::DEFAULT_INPUT_BUFFER_SIZE, file);
        self.convert(reader, output)
    }
}
