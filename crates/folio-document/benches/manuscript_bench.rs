// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the manuscript hot path: block splitting and
// chapter heading classification over a synthetic novel.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use folio_document::{is_chapter_heading, split_into_blocks};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A 40-chapter manuscript with twelve multi-line paragraphs per chapter,
/// roughly the size of a short novel.
fn synthetic_manuscript() -> String {
    let paragraph = "The lamps along the quay were lit one by one as the tide came in,\n\
                     and the fishermen drew their boats up onto the shingle.";
    let mut text = String::new();
    for chapter in 1..=40 {
        text.push_str(&format!("Chapter {chapter}\n\n"));
        for _ in 0..12 {
            text.push_str(paragraph);
            text.push_str("\n\n");
        }
    }
    text
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_split_into_blocks(c: &mut Criterion) {
    let text = synthetic_manuscript();
    c.bench_function("split_into_blocks (40 chapters)", |b| {
        b.iter(|| black_box(split_into_blocks(black_box(&text))));
    });
}

/// Mix of lines that exit at each classifier rule.
fn bench_is_chapter_heading(c: &mut Criterion) {
    let lines = [
        "Chapter Twelve",
        "It was the best of times, it was the worst of times, it was the age of wisdom",
        "THE STORM",
        "12. Homecoming",
        "She closed the door.",
    ];
    c.bench_function("is_chapter_heading (mixed lines)", |b| {
        b.iter(|| {
            for line in &lines {
                black_box(is_chapter_heading(black_box(line)));
            }
        });
    });
}

criterion_group!(benches, bench_split_into_blocks, bench_is_chapter_heading);
criterion_main!(benches);
