// SPDX-License-Identifier: MIT
//! Benchmark for positioned JSONL scanning and projection

use criterion::{criterion_group, criterion_main, Criterion};
use jsonl_cursor::{read_chunk, JsonlReader, JsonlWriter, Projection};
use serde_json::json;
use std::hint::black_box;
use std::path::PathBuf;

const LINES: usize = 10_000;

fn create_fixture() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bench.jsonl");
    let mut writer = JsonlWriter::create(&path).unwrap();
    for i in 0..LINES {
        writer
            .write(&json!({
                "id": i,
                "name": format!("record-{i}"),
                "score": (i % 100) as f64 / 100.0,
                "tags": ["alpha", "beta"],
            }))
            .unwrap();
    }
    writer.close();
    (dir, path)
}

fn benchmark_sequential_scan(c: &mut Criterion) {
    let (_dir, path) = create_fixture();

    c.bench_function("scan_10k_lines", |b| {
        b.iter(|| {
            let mut reader = JsonlReader::open(&path).unwrap();
            reader.rewind().unwrap();
            let mut count = 0usize;
            while reader.valid() {
                black_box(reader.current());
                reader.next();
                count += 1;
            }
            count
        })
    });
}

fn benchmark_projected_chunks(c: &mut Criterion) {
    let (_dir, path) = create_fixture();

    c.bench_function("projected_chunks_10k_lines", |b| {
        b.iter(|| {
            let mut reader = JsonlReader::open(&path)
                .unwrap()
                .with_projection(Projection::new().map("id", "key").keep("score"));
            reader.rewind().unwrap();
            let mut total = 0usize;
            loop {
                let chunk = read_chunk(&mut reader, 256);
                if chunk.is_empty() {
                    break;
                }
                total += black_box(chunk).len();
            }
            total
        })
    });
}

fn benchmark_offset_rewind(c: &mut Criterion) {
    let (_dir, path) = create_fixture();

    c.bench_function("rewind_to_offset_5k", |b| {
        let mut reader = JsonlReader::open(&path).unwrap().with_start_offset(5_000);
        b.iter(|| {
            reader.rewind().unwrap();
            black_box(reader.key())
        })
    });
}

criterion_group!(
    benches,
    benchmark_sequential_scan,
    benchmark_projected_chunks,
    benchmark_offset_rewind
);
criterion_main!(benches);
