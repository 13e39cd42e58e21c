use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use pneumatic_core::{CellType, Coord, Grid, StepRules, advance, compute};

/// A serpentine wire with sources at both ends and shuttles parked along the turns.
fn serpentine(size: Coord) -> Grid {
    let mut grid = Grid::new((size, size));
    for y in 0..size {
        if y % 2 == 0 {
            for x in 0..size {
                grid.set((x, y), CellType::Empty);
            }
        } else {
            let x = if y % 4 == 1 { size - 1 } else { 0 };
            grid.set((x, y), CellType::Empty);
            grid.set((size / 2, y), CellType::Shuttle);
        }
    }
    grid.set((0, 0), CellType::Positive);
    grid.set((size - 1, size - 1), CellType::Negative);
    grid
}

fn bench_pressure(c: &mut Criterion) {
    let mut group = c.benchmark_group("pressure");
    for size in [16, 64, 256] {
        let grid = serpentine(size);
        group.bench_with_input(BenchmarkId::new("compute", size), &grid, |b, grid| {
            b.iter(|| compute(black_box(grid)))
        });
        group.bench_with_input(BenchmarkId::new("advance", size), &grid, |b, grid| {
            b.iter(|| advance(black_box(grid), &StepRules::default()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_pressure);
criterion_main!(benches);
