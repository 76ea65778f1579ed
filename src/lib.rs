// SPDX-License-Identifier: MIT
//! # JSONL Cursor
//!
//! Random-access reading of line-delimited JSON (JSONL) with positional
//! seeking and field-level renaming/projection, plus a companion sequential
//! writer.
//!
//! ## Format Overview
//!
//! One JSON value (object or array) per physical text line, terminated by
//! `\n`. A value never spans multiple lines. A blank line terminates
//! iteration early rather than being skipped.
//!
//! ## Key Features
//!
//! - **Positioned cursor**: zero-based line index with forward iteration,
//!   skip, and seek-to-offset rewind
//! - **Reopen fallback**: non-seekable path-backed sources (gzip) rewind by
//!   closing and reopening the file
//! - **Field projection**: an ordered alias table renames and filters record
//!   fields, preserving whether the record is mapping- or object-shaped
//! - **Shape-tagged records**: arrays become positional mappings, objects
//!   decode structured or generic per the configured options
//! - **Adopted streams**: any `Read` source can be iterated once, ownership
//!   stays with the caller
//! - **Chunked reads**: page through a stream in fixed-size batches keyed by
//!   line index
//!
//! ## Usage
//!
//! ```rust
//! use jsonl_cursor::{JsonlReader, JsonlWriter, Projection};
//! use serde_json::json;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("records.jsonl");
//!
//! let mut writer = JsonlWriter::create(&path).unwrap();
//! writer.write(&json!({"a": 1, "b": 2})).unwrap();
//! writer.write(&json!({"a": 3, "b": null})).unwrap();
//! writer.close();
//!
//! let mut reader = JsonlReader::open(&path)
//!     .unwrap()
//!     .with_projection(Projection::new().map("a", "x").map("b", "y"));
//! reader.rewind().unwrap();
//! while reader.valid() {
//!     // {"a":1,"b":2} projects to {x:1, y:2}; the null "b" field of the
//!     // second record is dropped, leaving {x:3}
//!     let record = reader.current().unwrap();
//!     println!("{}: {:?}", reader.key(), record);
//!     reader.next();
//! }
//! ```
//!
//! ## Error Model
//!
//! Construction failures (unreadable path, adopted stream) surface as `Err`
//! with no partial reader or writer. A failed reposition leaves the reader
//! closed and is reported by both `rewind` and `is_ready`. An undecodable
//! line is a per-record condition: `current` returns `None` for it and
//! iteration continues. End of stream is `valid() == false`, never an error.

pub mod chunk;
pub mod codec;
pub mod projection;
pub mod reader;
pub mod record;
pub mod stream;
pub mod writer;

// Re-export main types
pub use chunk::read_chunk;
pub use codec::{decode_flags, DecodeError, DecodeOptions};
pub use projection::Projection;
pub use reader::{JsonlReader, ReadError, RecordCursor, Records};
pub use record::{FieldKey, Record};
pub use stream::{StreamError, StreamHandle, StreamMetadata};
pub use writer::{JsonlWriter, WriteError, WriterMetadata};
