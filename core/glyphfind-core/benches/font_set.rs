//! Criterion benchmarks for font set queries and grid layout (made by FontLab https://www.fontlab.com/)

use std::env;
use std::path::PathBuf;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glyphfind_core::fontset::{query_font_set, CharsetQuery, SearchOptions};
use glyphfind_core::layout::GridLayout;

fn fonts_dir() -> Option<PathBuf> {
    env::var("GLYPHFIND_TEST_FONTS")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/usr/share/fonts"))
        .canonicalize()
        .ok()
}

fn bench_query(c: &mut Criterion) {
    let Some(fonts) = fonts_dir() else {
        eprintln!("no fonts available; skipping font set benchmark");
        return;
    };
    let roots = [fonts];
    let opts = SearchOptions::default();

    let mut group = c.benchmark_group("query_font_set");
    group.sample_size(10);
    for (label, ch) in [("latin", 'A'), ("snowman", '☃')] {
        group.bench_function(label, |b| {
            b.iter(|| {
                query_font_set(&roots, &CharsetQuery::new(black_box(ch)), &opts)
                    .expect("query")
                    .len()
            })
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    c.bench_function("grid layout 500 fonts", |b| {
        b.iter(|| {
            let grid = GridLayout::compute(black_box(500), 1920, 1080, 40).expect("grid");
            grid.cells().map(|cell| cell.glyph_bottom).max()
        })
    });
}

criterion_group!(benches, bench_query, bench_layout);
criterion_main!(benches);
