//! Full vs incremental cell repaint on the headless surface.
//!
//! Run with: cargo bench -p antgrid-render --bench cell_repaint

use std::hint::black_box;

use antgrid_core::{CanvasSize, CellKey, CellMap, Color, GridSize};
use antgrid_render::{LayerSet, LayeredRenderer, RecordingSurface, RenderConfig};
use antgrid_store::GameStore;
use antgrid_viewport::{Viewport, ViewportConfig};
use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};

const PALETTE: [&str; 4] = ["#111111", "#FF0000", "#00FF00", "#0000FF"];

/// Fill `pct` percent of the grid deterministically.
fn scattered(grid: GridSize, pct: usize, salt: usize) -> CellMap {
    let total = (grid.width * grid.height) as usize;
    let count = total * pct / 100;
    (0..count)
        .map(|i| {
            let n = (i * 7919 + salt * 104_729) % total;
            let key = CellKey::new((n % grid.width as usize) as u32, (n / grid.width as usize) as u32);
            (key, Color::from(PALETTE[(i + salt) % PALETTE.len()]))
        })
        .collect()
}

fn setup(side: u32) -> (GameStore, Viewport, LayeredRenderer<RecordingSurface>) {
    let grid = GridSize::new(side, side);
    let mut store = GameStore::new(grid);
    store.merge_cells(scattered(grid, 60, 0));
    let mut viewport = Viewport::new(grid, ViewportConfig::default());
    viewport.resize(CanvasSize::new(1280.0, 800.0));
    let mut renderer = LayeredRenderer::new(RenderConfig::default(), LayerSet::default());
    let _ = renderer.frame(&store, &viewport);
    (store, viewport, renderer)
}

fn bench_cell_repaint(c: &mut Criterion) {
    let mut group = c.benchmark_group("cell_repaint");
    for side in [100u32, 250] {
        group.bench_with_input(BenchmarkId::new("full", side), &side, |b, &side| {
            b.iter_batched(
                || {
                    let (store, mut viewport, renderer) = setup(side);
                    viewport.zoom_in();
                    (store, viewport, renderer)
                },
                |(store, viewport, mut renderer)| {
                    black_box(renderer.frame(&store, &viewport).map(|r| r.cells.painted()))
                },
                BatchSize::LargeInput,
            );
        });
        group.bench_with_input(BenchmarkId::new("incremental", side), &side, |b, &side| {
            b.iter_batched(
                || {
                    let (mut store, viewport, renderer) = setup(side);
                    store.merge_cells(scattered(store.grid(), 1, 1));
                    (store, viewport, renderer)
                },
                |(store, viewport, mut renderer)| {
                    black_box(renderer.frame(&store, &viewport).map(|r| r.cells.painted()))
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_cell_repaint);
criterion_main!(benches);
