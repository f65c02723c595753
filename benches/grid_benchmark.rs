use criterion::{black_box, criterion_group, criterion_main, Criterion};
use curvgrid::shapes::QuarterRing2d;
use curvgrid::{GridOptions, StructuredGrid};

fn linspace(npts: usize) -> Vec<f64> {
    (0..npts)
        .map(|i| -1.0 + 2.0 * i as f64 / (npts - 1) as f64)
        .collect()
}

pub fn grid_construction_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid");
    group.sample_size(20);

    let map = QuarterRing2d::new(1.0, 2.0);
    for npts in [33, 129] {
        let r = linspace(npts);
        for parallel in [false, true] {
            let mut options = GridOptions::default();
            options.set_parallel(parallel);
            group.bench_function(
                format!(
                    "Quarter ring grid with {}x{} nodes (parallel: {})",
                    npts, npts, parallel
                ),
                |b| {
                    b.iter(|| {
                        black_box(
                            StructuredGrid::transfinite_with_options(&map, &[&r, &r], &options)
                                .unwrap(),
                        )
                    })
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, grid_construction_benchmark);
criterion_main!(benches);
