// SPDX-License-Identifier: MIT
//! Basic usage example for the JSONL cursor

use jsonl_cursor::{read_chunk, JsonlReader, JsonlWriter};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== JSONL Cursor - Basic Usage ===\n");

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("inventory.jsonl");

    // Step 1: Write a few records
    println!("1. Writing records to {}...", path.display());
    let mut writer = JsonlWriter::create(&path)?;
    for (name, stock) in [("bolt", 120), ("nut", 80), ("washer", 45), ("screw", 230)] {
        writer.write(&json!({"name": name, "stock": stock}))?;
    }
    println!("   {} lines written", writer.metadata().lines);
    writer.close();

    // Step 2: Iterate from the start
    println!("\n2. Iterating every record...");
    let mut reader = JsonlReader::open(&path)?;
    for (key, record) in reader.records() {
        println!("   line {key}: {record:?}");
    }

    // Step 3: Rewind to a start offset
    println!("\n3. Iterating again from line 2...");
    reader.set_start_offset(2);
    reader.rewind()?;
    while reader.valid() {
        println!("   line {}: {:?}", reader.key(), reader.current());
        reader.next();
    }

    // Step 4: Page through the file in chunks
    println!("\n4. Reading in chunks of 3...");
    reader.set_start_offset(0);
    reader.rewind()?;
    loop {
        let chunk = read_chunk(&mut reader, 3);
        if chunk.is_empty() {
            break;
        }
        println!("   chunk of {}: keys {:?}", chunk.len(), chunk.keys().collect::<Vec<_>>());
    }

    reader.close();
    println!("\nDone.");
    Ok(())
}
