use std::io::{self, Write};

use bytes::Bytes;
use tokio::sync::mpsc;

/// Chunk type carried from the converter thread to the response body
pub type BodyChunk = Result<Bytes, io::Error>;

/// Blocking `Write` adapter feeding an async response body
///
/// Every `write` call becomes one body chunk. Must only be used off the async
/// runtime (e.g. inside `spawn_blocking`), since it blocks on a full channel.
pub struct ChannelWriter {
    tx: mpsc::Sender<BodyChunk>,
}

impl ChannelWriter {
    /// Create a writer sending into `tx`
    pub fn new(tx: mpsc::Sender<BodyChunk>) -> Self {
        Self { tx }
    }
}

impl Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.tx
            .blocking_send(Ok(Bytes::copy_from_slice(buf)))
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "response body was dropped"))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
