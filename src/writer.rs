// SPDX-License-Identifier: MIT
//! Sequential JSONL writer

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

#[cfg(feature = "compression")]
use flate2::{write::GzEncoder, Compression};

use crate::codec;

/// Errors that can occur during writing
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("writer is closed")]
    Closed,
}

enum Sink {
    Plain(File),
    #[cfg(feature = "compression")]
    Compressed(GzEncoder<File>),
    Adopted(Box<dyn Write>),
    Closed,
}

/// Snapshot of a writer's state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriterMetadata {
    pub path: Option<PathBuf>,
    pub compressed: bool,
    pub adopted: bool,
    pub lines: u64,
    pub open: bool,
}

/// Appends one JSON value per line to a file or adopted sink.
///
/// Encoding `null` yields an empty line, which a reader treats as end of
/// stream; callers that round-trip data should avoid writing nulls.
pub struct JsonlWriter {
    sink: Sink,
    path: Option<PathBuf>,
    compressed: bool,
    lines: u64,
}

impl JsonlWriter {
    /// Create or truncate a plain JSONL file
    pub fn create(path: impl AsRef<Path>) -> Result<Self, WriteError> {
        let path = path.as_ref();
        let file = File::create(path)?;
        Ok(Self::with_sink(
            Sink::Plain(file),
            Some(path.to_path_buf()),
            false,
        ))
    }

    /// Open a plain JSONL file for appending, creating it if missing
    pub fn append(path: impl AsRef<Path>) -> Result<Self, WriteError> {
        let path = path.as_ref();
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::with_sink(
            Sink::Plain(file),
            Some(path.to_path_buf()),
            false,
        ))
    }

    /// Create a gzip-compressed JSONL file.
    ///
    /// Unsuitable for large outputs: the whole stream is a single gzip
    /// member that only becomes readable once the writer is closed. For
    /// large data, write plain and compress the finished file.
    #[cfg(feature = "compression")]
    pub fn create_compressed(path: impl AsRef<Path>) -> Result<Self, WriteError> {
        let path = path.as_ref();
        let file = File::create(path)?;
        Ok(Self::with_sink(
            Sink::Compressed(GzEncoder::new(file, Compression::fast())),
            Some(path.to_path_buf()),
            true,
        ))
    }

    /// Adopt an externally supplied sink.
    ///
    /// The writer flushes but never closes it; recover ownership with
    /// [`JsonlWriter::into_inner`].
    pub fn from_stream<W: Write + 'static>(sink: W) -> Self {
        Self::with_sink(Sink::Adopted(Box::new(sink)), None, false)
    }

    fn with_sink(sink: Sink, path: Option<PathBuf>, compressed: bool) -> Self {
        Self {
            sink,
            path,
            compressed,
            lines: 0,
        }
    }

    /// Encode one value as one newline-terminated line.
    ///
    /// `null` encodes to a bare newline.
    pub fn encode_line(value: &Value) -> String {
        let mut line = codec::encode_line(value);
        line.push('\n');
        line
    }

    /// Encode `value` and append it as one line.
    ///
    /// Returns the number of bytes written.
    pub fn write(&mut self, value: &Value) -> Result<usize, WriteError> {
        let line = Self::encode_line(value);
        let sink = self.sink_mut()?;
        sink.write_all(line.as_bytes())?;
        self.lines += 1;
        Ok(line.len())
    }

    /// Serialize any record type and append it as one line
    pub fn write_record<T: Serialize>(&mut self, record: &T) -> Result<usize, WriteError> {
        let value = serde_json::to_value(record)?;
        self.write(&value)
    }

    pub fn flush(&mut self) -> Result<(), WriteError> {
        self.sink_mut()?.flush()?;
        Ok(())
    }

    /// Finish and release the sink.
    ///
    /// Finalizes the gzip stream for compressed writers. Returns true iff an
    /// owned, path-backed sink was open; adopted sinks are flushed but never
    /// reported as closed.
    pub fn close(&mut self) -> bool {
        match std::mem::replace(&mut self.sink, Sink::Closed) {
            Sink::Plain(mut file) => {
                let _ = file.flush();
                true
            }
            #[cfg(feature = "compression")]
            Sink::Compressed(encoder) => {
                let _ = encoder.finish();
                true
            }
            Sink::Adopted(mut sink) => {
                let _ = sink.flush();
                false
            }
            Sink::Closed => false,
        }
    }

    /// Recover an adopted sink, consuming the writer.
    ///
    /// Returns `None` for path-backed or closed writers.
    pub fn into_inner(self) -> Option<Box<dyn Write>> {
        match self.sink {
            Sink::Adopted(sink) => Some(sink),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        !matches!(self.sink, Sink::Closed)
    }

    pub fn metadata(&self) -> WriterMetadata {
        WriterMetadata {
            path: self.path.clone(),
            compressed: self.compressed,
            adopted: self.path.is_none(),
            lines: self.lines,
            open: self.is_ready(),
        }
    }

    fn sink_mut(&mut self) -> Result<&mut dyn Write, WriteError> {
        match &mut self.sink {
            Sink::Plain(file) => Ok(file),
            #[cfg(feature = "compression")]
            Sink::Compressed(encoder) => Ok(encoder),
            Sink::Adopted(sink) => Ok(sink.as_mut()),
            Sink::Closed => Err(WriteError::Closed),
        }
    }
}
