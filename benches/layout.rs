//! Benchmarks for sheet layout performance.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_possible_truncation)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use xlplan::{
    convert, Cell, CellStyle, Grid, LayoutConfig, MergeRegion, RenderContext, SheetData,
};

/// A `rows x cols` sheet mixing text, numbers and a bold header row.
fn generated_sheet(rows: usize, cols: usize) -> SheetData {
    let grid = Grid::new(
        (0..rows)
            .map(|r| {
                (0..cols)
                    .map(|c| match (r, c % 3) {
                        (0, _) => Cell::text(format!("Column {c}")).with_style(CellStyle::bold()),
                        (_, 0) => Cell::text(format!("item-{r}-{c}")),
                        (_, 1) => Cell::number(r as f64 * 1.25, "0.00"),
                        _ => Cell::number((r * c) as f64, ""),
                    })
                    .collect()
            })
            .collect(),
    );
    let mut sheet = SheetData::new(grid);
    if cols >= 2 {
        sheet.merges.push(MergeRegion::new(1, 1, 1, 2));
    }
    sheet
}

/// Full pipeline on growing sheets, unpaginated
fn bench_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert");
    for rows in [100usize, 1000, 5000] {
        let sheet = generated_sheet(rows, 20);
        let config = LayoutConfig::default();
        group.throughput(Throughput::Elements((rows * 20) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &sheet, |b, sheet| {
            b.iter(|| {
                let mut ctx = RenderContext::new();
                convert(black_box(sheet), &config, &mut ctx).expect("Failed to convert")
            })
        });
    }
    group.finish();
}

/// Pagination with a warm measurement cache
fn bench_paginated_warm_cache(c: &mut Criterion) {
    let sheet = generated_sheet(5000, 20);
    let config = LayoutConfig {
        max_page_height: 842.0,
        ..LayoutConfig::default()
    }
    .paginated();
    let mut ctx = RenderContext::new();
    convert(&sheet, &config, &mut ctx).expect("Failed to convert");

    c.bench_function("convert_paginated_5000x20_warm", |b| {
        b.iter(|| convert(black_box(&sheet), &config, &mut ctx).expect("Failed to convert"))
    });
}

criterion_group!(benches, bench_convert, bench_paginated_warm_cache);
criterion_main!(benches);
