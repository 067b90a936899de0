use std::io::BufRead;

use super::{ListxError, ListxStreamer};
use crate::listx::models::Table;

/// Iterator over tables in a -listx document
///
/// Stops after the first error.
pub struct TableIterator<R: BufRead> {
    pub(super) streamer: ListxStreamer<R>,
}

impl<R: BufRead> Iterator for TableIterator<R> {
    type Item = Result<Table, ListxError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.streamer.next_table() {
            Ok(Some(table)) => Some(Ok(table)),
            Ok(None) => None,
            Err(e) => {
                self.streamer.finished = true;
                Some(Err(e))
            }
        }
    }
}
