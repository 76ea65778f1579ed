// SPDX-License-Identifier: MIT
//! Line codec: one JSONL line to one shape-tagged record and back

use serde_json::Value;

use crate::record::{FieldKey, Record};

/// Decode behavior flags
pub mod decode_flags {
    /// Default behavior
    pub const NONE: u32 = 0x00000000;

    /// Decode JSON objects as generic mappings even in structured mode
    pub const OBJECT_AS_MAPPING: u32 = 0x00000001;
}

/// Options applied to every line decode.
///
/// Changing options between reads takes effect on the next decode; the codec
/// never mutates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Keep JSON objects object-shaped instead of converting them to mappings
    pub structured: bool,

    /// Maximum nesting depth accepted per line
    pub max_depth: usize,

    /// Bitmask of [`decode_flags`]
    pub flags: u32,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            structured: true,
            max_depth: 512,
            flags: decode_flags::NONE,
        }
    }
}

/// Errors raised while decoding one line
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("nesting depth {depth} exceeds maximum {max}")]
    DepthExceeded { depth: usize, max: usize },
}

/// Decode one line of text into a record.
///
/// Objects become `Record::Object` in structured mode (unless
/// `OBJECT_AS_MAPPING` is set) and name-keyed `Record::Mapping` otherwise.
/// Arrays always become index-keyed mappings, which is what integer keys in a
/// projection table address.
pub fn decode(line: &str, options: &DecodeOptions) -> Result<Record, DecodeError> {
    let value: Value = serde_json::from_str(line)?;
    let depth = nesting_depth(&value);
    if depth > options.max_depth {
        return Err(DecodeError::DepthExceeded {
            depth,
            max: options.max_depth,
        });
    }

    let as_mapping =
        !options.structured || options.flags & decode_flags::OBJECT_AS_MAPPING != 0;

    Ok(match value {
        Value::Null => Record::Null,
        Value::Object(fields) if as_mapping => Record::Mapping(
            fields
                .into_iter()
                .map(|(name, value)| (FieldKey::Name(name), value))
                .collect(),
        ),
        Value::Object(fields) => Record::Object(fields),
        Value::Array(items) => Record::Mapping(
            items
                .into_iter()
                .enumerate()
                .map(|(index, value)| (FieldKey::Index(index), value))
                .collect(),
        ),
        scalar => Record::Scalar(scalar),
    })
}

/// Encode one value as one line of text, without the trailing newline.
///
/// `null` encodes to an empty line.
pub fn encode_line(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn nesting_depth(value: &Value) -> usize {
    match value {
        Value::Array(items) => 1 + items.iter().map(nesting_depth).max().unwrap_or(0),
        Value::Object(fields) => 1 + fields.values().map(nesting_depth).max().unwrap_or(0),
        _ => 1,
    }
}
