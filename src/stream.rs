// SPDX-License-Identifier: MIT
//! Byte-stream handles for line-oriented reading
//!
//! A [`StreamHandle`] wraps a plain file, a gzip-compressed file or an
//! adopted caller-supplied stream behind one line-reading surface, and tracks
//! the logical byte position used by the reader's repositioning logic.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use serde::Serialize;

#[cfg(feature = "compression")]
use flate2::read::GzDecoder;

/// Errors raised by stream operations
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("stream is not seekable")]
    NotSeekable,

    #[error("stream was not opened from a path and cannot be reopened")]
    NotReopenable,

    #[error("stream is closed")]
    Closed,
}

enum Source {
    Plain(BufReader<File>),
    #[cfg(feature = "compression")]
    Compressed(BufReader<GzDecoder<File>>),
    Adopted(BufReader<Box<dyn Read>>),
    Closed,
}

/// Snapshot of a handle's state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamMetadata {
    pub path: Option<PathBuf>,
    pub compressed: bool,
    pub adopted: bool,
    pub position: u64,
    pub open: bool,
}

/// One readable line-oriented byte stream.
///
/// Path-backed handles own their file and can be reopened after a failed
/// seek. Adopted handles have no path, are treated as non-seekable, and are
/// never reported as closed by [`StreamHandle::close`]; ownership of the
/// underlying stream can be recovered with [`StreamHandle::into_inner`].
pub struct StreamHandle {
    source: Source,
    path: Option<PathBuf>,
    compressed: bool,
    position: u64,
}

impl StreamHandle {
    /// Open a plain file for line reading
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StreamError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Ok(Self {
            source: Source::Plain(BufReader::new(file)),
            path: Some(path.to_path_buf()),
            compressed: false,
            position: 0,
        })
    }

    /// Open a gzip-compressed file, decompressing on read
    #[cfg(feature = "compression")]
    pub fn open_compressed(path: impl AsRef<Path>) -> Result<Self, StreamError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Ok(Self {
            source: Source::Compressed(BufReader::new(GzDecoder::new(file))),
            path: Some(path.to_path_buf()),
            compressed: true,
            position: 0,
        })
    }

    /// Adopt an externally supplied stream.
    ///
    /// The handle reads the stream from its current position; `tell` reports
    /// bytes consumed through this handle, not the stream's own offset.
    pub fn adopt<R: Read + 'static>(stream: R) -> Self {
        Self {
            source: Source::Adopted(BufReader::new(Box::new(stream))),
            path: None,
            compressed: false,
            position: 0,
        }
    }

    /// Read one line, stripping the `\n` (or `\r\n`) terminator.
    ///
    /// Returns `None` at end of stream. Invalid UTF-8 bytes are replaced
    /// rather than failing the read, leaving the per-line decode to reject
    /// the record. The logical position advances by the raw bytes consumed,
    /// terminator included.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let raw = match &mut self.source {
            Source::Plain(reader) => read_raw_line(reader)?,
            #[cfg(feature = "compression")]
            Source::Compressed(reader) => read_raw_line(reader)?,
            Source::Adopted(reader) => read_raw_line(reader)?,
            Source::Closed => None,
        };

        let Some(bytes) = raw else {
            return Ok(None);
        };
        self.position += bytes.len() as u64;

        let mut line = String::from_utf8_lossy(&bytes).into_owned();
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }

    /// Logical byte position: bytes consumed since open or the last
    /// successful seek or reopen
    pub fn tell(&self) -> u64 {
        self.position
    }

    /// Seek back to the start of the stream.
    ///
    /// Only plain path-backed files are seekable; compressed and adopted
    /// sources report [`StreamError::NotSeekable`], for which the only
    /// recovery is close plus [`StreamHandle::reopen`].
    pub fn seek_to_start(&mut self) -> Result<(), StreamError> {
        match &mut self.source {
            Source::Plain(reader) => {
                reader.seek(SeekFrom::Start(0))?;
                self.position = 0;
                Ok(())
            }
            #[cfg(feature = "compression")]
            Source::Compressed(_) => Err(StreamError::NotSeekable),
            Source::Adopted(_) => Err(StreamError::NotSeekable),
            Source::Closed => Err(StreamError::Closed),
        }
    }

    /// Reopen the original path from scratch.
    ///
    /// Fails with [`StreamError::NotReopenable`] for adopted handles.
    pub fn reopen(&mut self) -> Result<(), StreamError> {
        let Some(path) = self.path.clone() else {
            return Err(StreamError::NotReopenable);
        };
        let source = if self.compressed {
            #[cfg(feature = "compression")]
            {
                Source::Compressed(BufReader::new(GzDecoder::new(File::open(&path)?)))
            }
            #[cfg(not(feature = "compression"))]
            {
                return Err(StreamError::NotReopenable);
            }
        } else {
            Source::Plain(BufReader::new(File::open(&path)?))
        };
        self.source = source;
        self.position = 0;
        Ok(())
    }

    /// Release the underlying source.
    ///
    /// Returns true iff an owned, path-backed source was open. An adopted
    /// stream is dropped here rather than explicitly closed; use
    /// [`StreamHandle::into_inner`] first to keep it.
    pub fn close(&mut self) -> bool {
        let owned_open = self.path.is_some() && !matches!(self.source, Source::Closed);
        self.source = Source::Closed;
        owned_open
    }

    /// Recover an adopted stream, consuming the handle.
    ///
    /// Buffered but unconsumed bytes are discarded. Returns `None` for
    /// path-backed or closed handles.
    pub fn into_inner(self) -> Option<Box<dyn Read>> {
        match self.source {
            Source::Adopted(reader) => Some(reader.into_inner()),
            _ => None,
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.source, Source::Closed)
    }

    pub fn is_adopted(&self) -> bool {
        self.path.is_none()
    }

    pub fn metadata(&self) -> StreamMetadata {
        StreamMetadata {
            path: self.path.clone(),
            compressed: self.compressed,
            adopted: self.path.is_none(),
            position: self.position,
            open: self.is_open(),
        }
    }
}

impl fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamHandle")
            .field("path", &self.path)
            .field("compressed", &self.compressed)
            .field("position", &self.position)
            .field("open", &self.is_open())
            .finish()
    }
}

fn read_raw_line<R: BufRead>(reader: &mut R) -> io::Result<Option<Vec<u8>>> {
    let mut buf = Vec::new();
    let read = reader.read_until(b'\n', &mut buf)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(buf))
}
