// SPDX-License-Identifier: MIT
//! Field projection example: renaming, filtering and positional columns

use jsonl_cursor::{JsonlReader, JsonlWriter, Projection};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== JSONL Cursor - Projection ===\n");

    let dir = tempfile::tempdir()?;

    // Object records: rename and filter named fields
    let people = dir.path().join("people.jsonl");
    let mut writer = JsonlWriter::create(&people)?;
    writer.write(&json!({"first": "Ada", "last": "Lovelace", "born": 1815}))?;
    writer.write(&json!({"first": "Alan", "last": "Turing", "born": null}))?;
    writer.close();

    println!("1. Renaming object fields (null fields are dropped)...");
    let mut reader = JsonlReader::open(&people)?.with_projection(
        Projection::new().map("first", "name").map("born", "year"),
    );
    for (key, record) in reader.records() {
        println!("   line {key}: {record:?}");
    }

    // Array records: address columns by position, like CSV rows
    let rows = dir.path().join("rows.jsonl");
    let mut writer = JsonlWriter::create(&rows)?;
    writer.write(&json!(["Ada", "Lovelace", "mathematics"]))?;
    writer.write(&json!(["Alan", "Turing", "computing"]))?;
    writer.close();

    println!("\n2. Naming positional columns...");
    let mut reader = JsonlReader::open(&rows)?.with_projection(
        Projection::new().map(0usize, "name").map(2usize, "field"),
    );
    for (key, record) in reader.records() {
        println!("   line {key}: {record:?}");
    }

    Ok(())
}
