// SPDX-License-Identifier: MIT
//! Chunked reading on top of the cursor protocol

use indexmap::IndexMap;

use crate::reader::RecordCursor;
use crate::record::Record;

/// Collect up to `size` records starting at the cursor's current position.
///
/// Records are keyed by line index, in stream order. Undecodable lines are
/// stored as [`Record::Null`]. The cursor is left one line past the chunk and
/// is never reset, so repeated calls page through the stream; fewer than
/// `size` entries are returned once the stream is exhausted.
pub fn read_chunk<C: RecordCursor>(cursor: &mut C, size: usize) -> IndexMap<i64, Record> {
    let mut chunk = IndexMap::new();
    for _ in 0..size {
        if !cursor.valid() {
            break;
        }
        chunk.insert(cursor.key(), cursor.current().unwrap_or(Record::Null));
        cursor.next();
    }
    chunk
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::JsonlReader;
    use crate::record::FieldKey;
    use serde_json::json;
    use std::path::PathBuf;

    fn fixture(lines: usize) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.jsonl");
        let contents: String = (0..lines).map(|i| format!("{{\"i\":{i}}}\n")).collect();
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_chunk_of_three_over_five_lines() {
        let (_dir, path) = fixture(5);
        let mut reader = JsonlReader::open(&path).unwrap();
        reader.rewind().unwrap();

        let chunk = read_chunk(&mut reader, 3);
        let keys: Vec<i64> = chunk.keys().copied().collect();
        assert_eq!(keys, vec![0, 1, 2]);
        assert_eq!(
            chunk[&1].get(&FieldKey::from("i")),
            Some(&json!(1))
        );
    }

    #[test]
    fn test_chunk_truncates_at_end_of_stream() {
        let (_dir, path) = fixture(2);
        let mut reader = JsonlReader::open(&path).unwrap();
        reader.rewind().unwrap();

        let chunk = read_chunk(&mut reader, 3);
        assert_eq!(chunk.len(), 2);
        assert!(!reader.valid());
    }

    #[test]
    fn test_chunks_page_through_the_stream() {
        let (_dir, path) = fixture(5);
        let mut reader = JsonlReader::open(&path).unwrap();
        reader.rewind().unwrap();

        let first = read_chunk(&mut reader, 2);
        let second = read_chunk(&mut reader, 2);
        let third = read_chunk(&mut reader, 2);

        assert_eq!(first.keys().copied().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(second.keys().copied().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(third.keys().copied().collect::<Vec<_>>(), vec![4]);
        assert!(read_chunk(&mut reader, 2).is_empty());
    }

    #[test]
    fn test_chunk_size_zero_is_empty() {
        let (_dir, path) = fixture(2);
        let mut reader = JsonlReader::open(&path).unwrap();
        reader.rewind().unwrap();

        assert!(read_chunk(&mut reader, 0).is_empty());
        // The cursor did not move
        assert_eq!(reader.key(), 0);
    }

    #[test]
    fn test_chunk_before_rewind_is_empty() {
        let (_dir, path) = fixture(2);
        let mut reader = JsonlReader::open(&path).unwrap();
        assert!(read_chunk(&mut reader, 3).is_empty());
    }

    #[test]
    fn test_undecodable_lines_become_null_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.jsonl");
        std::fs::write(&path, "{\"i\":0}\nbroken\n").unwrap();

        let mut reader = JsonlReader::open(&path).unwrap();
        reader.rewind().unwrap();

        let chunk = read_chunk(&mut reader, 2);
        assert_eq!(chunk.len(), 2);
        assert_eq!(chunk[&1], Record::Null);
    }
}
