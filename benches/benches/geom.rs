// Copyright 2025 the Spatia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use kurbo::Point;
use spatia_geom::{Corner, Matrix, RectGeometry, RectUpdate, RotatedRect};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_f64(&mut self) -> f64 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        ((self.0 >> 11) as f64) / ((1_u64 << 53) as f64)
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

fn random_points(n: usize, seed: u64) -> Vec<Point> {
    let mut rng = Lcg::new(seed);
    (0..n)
        .map(|_| Point::new(rng.range(-500.0, 500.0), rng.range(-500.0, 500.0)))
        .collect()
}

fn bench_geom(c: &mut Criterion) {
    let mut group = c.benchmark_group("spatia_geom");

    let rect = RotatedRect::from_update(
        RectUpdate::default()
            .position(40.0, 25.0)
            .size(120.0, 80.0)
            .rotation(0.7)
            .rotate_origin(Point::new(0.25, 0.75)),
    );
    let points = random_points(1_024, 0x5EED_0000_0000_0001);

    group.bench_function("round_trip(1024)", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for &p in &points {
                let q = rect.to_local_space(rect.to_parent_space(p));
                acc += q.x + q.y;
            }
            black_box(acc)
        });
    });

    group.bench_function("contains(1024)", |b| {
        b.iter(|| points.iter().filter(|&&p| rect.contains(p)).count());
    });

    group.bench_function("set_corner_then_read", |b| {
        let mut rect = rect.clone();
        let mut rng = Lcg::new(7);
        b.iter(|| {
            let target = Point::new(rng.range(10.0, 200.0), rng.range(10.0, 200.0));
            rect.set_corner(Corner::BottomRight, target);
            black_box(rect.bounds())
        });
    });

    group.bench_function("matrix_inverse", |b| {
        let m = Matrix::new(1.5, 0.3, -0.2, 0.9, 12.0, -7.0);
        b.iter(|| black_box(m).inverse());
    });

    group.finish();
}

criterion_group!(benches, bench_geom);
criterion_main!(benches);
