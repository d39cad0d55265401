#![allow(missing_docs)]
//! Benchmarks for the `move_pattern_to_field` check.
//!
//! Measures relocation over synthetic records with many source fields,
//! with and without duplicate suppression.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use inspire_marc::{AmendableRecord, Field, MovePatternToField, Record};

/// Build a record with `n` 035 fields, half of them arXiv identifiers.
fn synthetic_record(n: usize) -> Record {
    let mut record = Record::new();
    for i in 0..n {
        let value = if i % 2 == 0 {
            format!("oai:arXiv.org:{:04}.{:05}", 1000 + i % 97, i)
        } else {
            format!("SPIRES-{i}")
        };
        record.add_field(Field::builder("035", ' ', ' ').subfield_str('a', &value).build());
    }
    record
}

fn benchmark_relocate(c: &mut Criterion) {
    let rule = MovePatternToField::new("035__a", "037__a", r"oai:arXiv.org:(?P<value>.+)")
        .expect("valid rule");

    for size in [10, 1_000] {
        let record = synthetic_record(size);
        c.bench_function(&format!("relocate_{size}_fields"), |b| {
            b.iter(|| {
                let mut amendable = AmendableRecord::new(record.clone());
                black_box(rule.apply(&mut amendable))
            });
        });
    }

    let record = synthetic_record(1_000);
    let rule = rule.allow_duplicates(true);
    c.bench_function("relocate_1000_fields_allow_duplicates", |b| {
        b.iter(|| {
            let mut amendable = AmendableRecord::new(record.clone());
            black_box(rule.apply(&mut amendable))
        });
    });
}

criterion_group!(benches, benchmark_relocate);
criterion_main!(benches);
