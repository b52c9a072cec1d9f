//! Benchmarks for dense text parsing and identifier resolution
//!
//! Run with: cargo bench --bench dense_text

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gct::{resolve_indices, DenseTextReader, MatchMode, NoProgress};
use rand::{Rng, SeedableRng};
use std::fmt::Write;
use std::io::Cursor;

/// Generate a dense text file with random values and two column metadata lines
fn generate_gct(rows: usize, cols: usize) -> String {
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let mut text = String::new();

    writeln!(text, "#1.3").unwrap();
    writeln!(text, "{rows}\t{cols}\t1\t2").unwrap();

    text.push_str("id\tsymbol");
    for col in 0..cols {
        write!(text, "\tSAMPLE_{col}").unwrap();
    }
    text.push('\n');

    for header in ["pert_dose", "cell_id"] {
        text.push_str(header);
        text.push_str("\tna");
        for col in 0..cols {
            write!(text, "\t{}", col % 7).unwrap();
        }
        text.push('\n');
    }

    for row in 0..rows {
        write!(text, "{row}_at\tGENE{row}").unwrap();
        for _ in 0..cols {
            write!(text, "\t{:.4}", rng.gen_range(-10.0..10.0)).unwrap();
        }
        text.push('\n');
    }
    text
}

/// Benchmark full parses across matrix sizes
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("dense_text_parse");

    for (rows, cols) in [(100, 12), (978, 100), (978, 1_000)] {
        let text = generate_gct(rows, cols);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{rows}x{cols}")),
            &text,
            |b, text| {
                b.iter(|| {
                    DenseTextReader::new(Cursor::new(black_box(text.as_bytes())))
                        .read(&mut NoProgress)
                        .unwrap()
                })
            },
        );
    }

    group.finish();
}

/// Benchmark substring resolution of sample patterns against large id arrays
fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_indices");

    for size in [1_000, 10_000, 100_000] {
        let ids: Vec<String> = (0..size)
            .map(|i| format!("CPC{:03}_A375_6H:BRD-K{i:08}", i % 20))
            .collect();
        let patterns = ["CPC004", "A375_6H:BRD-K00000042", "missing"];

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &ids, |b, ids| {
            b.iter(|| resolve_indices(black_box(ids), Some(&patterns[..]), MatchMode::Substring))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_resolve);
criterion_main!(benches);
