// SPDX-License-Identifier: MIT
//! Positioned JSONL reader: a stateful cursor over a line-oriented stream
//!
//! [`JsonlReader`] owns a [`StreamHandle`] and a cursor (zero-based line
//! index plus the last raw line) and drives it through the external-iteration
//! protocol expressed by [`RecordCursor`]: `valid` / `current` / `next` /
//! `key` / `rewind`. Repositioning seeks the stream back to its start (or
//! closes and reopens it when the source is non-seekable) and reads forward
//! to the configured start offset.

use std::io::Read;
use std::path::Path;

use tracing::{debug, warn};

use crate::codec::{self, DecodeOptions};
use crate::projection::Projection;
use crate::record::Record;
use crate::stream::{StreamError, StreamHandle, StreamMetadata};

/// Errors that can occur while opening or repositioning a reader
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("stream error: {0}")]
    Stream(#[from] StreamError),

    #[error("repositioning failed: {0}")]
    Reposition(StreamError),
}

/// External-iteration protocol over positioned line records.
///
/// The cursor starts unread (`key() == -1`); `rewind` repositions it to the
/// configured first record and `next` advances it one line at a time.
/// `current` is only meaningful while `valid` holds.
pub trait RecordCursor {
    /// Advance the cursor one line
    fn next(&mut self);

    /// True while the cursor rests on a non-empty line
    fn valid(&self) -> bool;

    /// Decode and transform the current line.
    ///
    /// `None` when the cursor is not valid or the line is undecodable; an
    /// undecodable line does not stop the stream.
    fn current(&self) -> Option<Record>;

    /// Zero-based index of the current line, -1 before any read
    fn key(&self) -> i64;

    /// Reposition to the configured start offset
    fn rewind(&mut self) -> Result<(), ReadError>;
}

/// Random-access JSONL reader with positional seeking and field projection.
///
/// One reader instance has one logical owner; concurrent scans over the same
/// path need independent readers, each with its own handle.
pub struct JsonlReader {
    handle: StreamHandle,
    index: i64,
    line: Option<String>,
    options: DecodeOptions,
    use_main_array: bool,
    projection: Option<Projection>,
    start_offset: u64,
}

impl JsonlReader {
    /// Open a plain JSONL file
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ReadError> {
        Ok(Self::with_handle(StreamHandle::open(path)?))
    }

    /// Open a gzip-compressed JSONL file.
    ///
    /// The source is non-seekable, so every rewind after the first read goes
    /// through the close-and-reopen fallback.
    #[cfg(feature = "compression")]
    pub fn open_compressed(path: impl AsRef<Path>) -> Result<Self, ReadError> {
        Ok(Self::with_handle(StreamHandle::open_compressed(path)?))
    }

    /// Adopt an externally supplied stream.
    ///
    /// Adopted streams cannot be repositioned once read: the first `rewind`
    /// at logical position zero succeeds without seeking, any later one fails
    /// and leaves the reader unusable.
    pub fn from_stream<R: Read + 'static>(stream: R) -> Self {
        Self::with_handle(StreamHandle::adopt(stream))
    }

    fn with_handle(handle: StreamHandle) -> Self {
        Self {
            handle,
            index: -1,
            line: None,
            options: DecodeOptions::default(),
            use_main_array: true,
            projection: None,
            start_offset: 0,
        }
    }

    /// Set the projection table applied by [`JsonlReader::current`]
    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }

    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the line index iteration returns to on rewind; negative input
    /// clamps to 0
    pub fn with_start_offset(mut self, offset: i64) -> Self {
        self.set_start_offset(offset);
        self
    }

    pub fn with_use_main_array(mut self, use_main_array: bool) -> Self {
        self.use_main_array = use_main_array;
        self
    }

    pub fn projection(&self) -> Option<&Projection> {
        self.projection.as_ref()
    }

    /// Replace or clear the projection table; takes effect on the next
    /// `current` call
    pub fn set_projection(&mut self, projection: Option<Projection>) {
        self.projection = projection;
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decode options take effect on the next decode, not retroactively
    pub fn set_options(&mut self, options: DecodeOptions) {
        self.options = options;
    }

    pub fn use_main_array(&self) -> bool {
        self.use_main_array
    }

    /// Toggle main-array normalization of structured-object records
    pub fn set_use_main_array(&mut self, use_main_array: bool) {
        self.use_main_array = use_main_array;
    }

    pub fn start_offset(&self) -> u64 {
        self.start_offset
    }

    /// Negative offsets clamp to 0; the offset persists across rewinds
    pub fn set_start_offset(&mut self, offset: i64) {
        self.start_offset = offset.max(0) as u64;
    }

    /// Advance the cursor one line.
    ///
    /// Valid from any state. A read failure is logged and presented as end
    /// of stream.
    pub fn next(&mut self) {
        self.index += 1;
        self.line = match self.handle.read_line() {
            Ok(line) => line,
            Err(err) => {
                warn!(line = self.index, error = %err, "read failed, treating stream as exhausted");
                None
            }
        };
    }

    /// True while the cursor rests on a non-empty line.
    ///
    /// A blank line reads as empty text and therefore terminates iteration.
    pub fn valid(&self) -> bool {
        self.line.as_deref().is_some_and(|line| !line.is_empty())
    }

    /// Decode the current line, normalize its shape and apply the projection.
    ///
    /// Returns `None` when the cursor is not valid or the line is not valid
    /// JSON within the configured depth; iteration continues past such lines.
    /// Calling this twice without an intervening [`JsonlReader::next`]
    /// returns equal values.
    pub fn current(&self) -> Option<Record> {
        let record = self.decode_current()?;
        let record = if self.use_main_array {
            record.into_mapping()
        } else {
            record
        };
        Some(match &self.projection {
            Some(table) => table.project(&record),
            None => record,
        })
    }

    /// Decode the current line with no normalization or projection applied
    pub fn current_original(&self) -> Option<Record> {
        self.decode_current()
    }

    fn decode_current(&self) -> Option<Record> {
        if !self.valid() {
            return None;
        }
        let line = self.line.as_deref()?;
        match codec::decode(line, &self.options) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(line = self.index, error = %err, "skipping undecodable record");
                None
            }
        }
    }

    /// Zero-based index of the current line, -1 before any read
    pub fn key(&self) -> i64 {
        self.index
    }

    /// Advance up to `count` lines, stopping early at end of stream.
    ///
    /// Returns the number of advances performed; a result smaller than
    /// `count` signals the stream ran out first.
    pub fn skip(&mut self, count: usize) -> usize {
        let mut skipped = 0;
        while self.valid() && skipped < count {
            self.next();
            skipped += 1;
        }
        skipped
    }

    /// Reposition the cursor to the configured start offset.
    ///
    /// Seeks the stream back to its start, falling back to close-and-reopen
    /// for non-seekable path-backed sources, then reads forward to land the
    /// cursor on line `start_offset` (or exhausted, for shorter streams).
    /// When the fallback is unavailable the reader is left closed and
    /// [`ReadError::Reposition`] is returned; [`JsonlReader::is_ready`]
    /// reports the resulting state.
    pub fn rewind(&mut self) -> Result<(), ReadError> {
        let offset = self.start_offset;
        if !self.handle.is_open() || self.handle.tell() != 0 {
            if let Err(err) = self.handle.seek_to_start() {
                debug!(error = %err, "seek to start failed, reopening from path");
                self.close();
                if let Err(err) = self.handle.reopen() {
                    return Err(ReadError::Reposition(err));
                }
            }
        }
        self.index = -1;
        self.line = None;
        self.next();
        self.skip(offset.saturating_sub(self.index.max(0) as u64) as usize);
        Ok(())
    }

    /// Release the stream handle and reset the cursor.
    ///
    /// Returns true iff an owned, path-backed stream was open; adopted
    /// streams are never reported as closed.
    pub fn close(&mut self) -> bool {
        let closed = self.handle.close();
        self.index = -1;
        self.line = None;
        closed
    }

    /// Readiness predicate: true while the underlying stream is open
    pub fn is_ready(&self) -> bool {
        self.handle.is_open()
    }

    pub fn metadata(&self) -> StreamMetadata {
        self.handle.metadata()
    }

    /// Iterate records from the start offset.
    ///
    /// Rewinds on the first pull, then yields `(line index, record)` until
    /// exhaustion. Undecodable lines yield [`Record::Null`] and iteration
    /// continues. An adapter over the [`RecordCursor`] protocol for `for`
    /// loops.
    pub fn records(&mut self) -> Records<'_> {
        Records {
            reader: self,
            started: false,
        }
    }
}

impl RecordCursor for JsonlReader {
    fn next(&mut self) {
        JsonlReader::next(self)
    }

    fn valid(&self) -> bool {
        JsonlReader::valid(self)
    }

    fn current(&self) -> Option<Record> {
        JsonlReader::current(self)
    }

    fn key(&self) -> i64 {
        JsonlReader::key(self)
    }

    fn rewind(&mut self) -> Result<(), ReadError> {
        JsonlReader::rewind(self)
    }
}

/// Iterator adapter returned by [`JsonlReader::records`]
pub struct Records<'a> {
    reader: &'a mut JsonlReader,
    started: bool,
}

impl Iterator for Records<'_> {
    type Item = (i64, Record);

    fn next(&mut self) -> Option<Self::Item> {
        if self.started {
            self.reader.next();
        } else {
            self.reader.rewind().ok()?;
            self.started = true;
        }
        if !self.reader.valid() {
            return None;
        }
        let record = self.reader.current().unwrap_or(Record::Null);
        Some((self.reader.key(), record))
    }
}
