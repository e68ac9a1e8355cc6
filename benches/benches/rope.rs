// Copyright 2025 the Spatia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Point;
use spatia_rope::{Rope, RopeConfig};

fn rope(length: f64, iterations: usize) -> Rope {
    let mut rope = Rope::new(RopeConfig::default().with_iterations(iterations));
    rope.set_anchors(Point::ZERO, Point::new(length, 0.0));
    rope
}

fn bench_rope(c: &mut Criterion) {
    let mut group = c.benchmark_group("spatia_rope");
    group.sample_size(50);

    for &(length, iterations) in &[(200.0, 100_usize), (1_000.0, 100), (1_000.0, 600)] {
        group.bench_function(format!("step(len={length},iters={iterations})"), |b| {
            b.iter_batched(
                || rope(length, iterations),
                |mut rope| {
                    rope.step(1.0 / 60.0);
                    black_box(rope)
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.bench_function("relax_once(len=1000)", |b| {
        let mut rope = rope(1_000.0, 0);
        rope.set_anchors(Point::ZERO, Point::new(600.0, 0.0));
        b.iter(|| {
            rope.relax_once();
            black_box(rope.total_constraint_error())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_rope);
criterion_main!(benches);
