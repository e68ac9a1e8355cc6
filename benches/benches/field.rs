// Copyright 2025 the Spatia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use kurbo::Point;
use peniko::Color;
use spatia_field::{Algorithm, DistanceField, FieldConfig, Shape, ShapeId};

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
}

fn build_field(n: usize, shapes: u32, algorithm: Algorithm, seed: u64) -> DistanceField {
    let mut rng = Lcg::new(seed);
    let mut field = DistanceField::new(
        FieldConfig::default()
            .with_resolution(n)
            .with_algorithm(algorithm),
    )
    .expect("non-zero resolution");
    let size = n as f64;
    for id in 0..shapes {
        let points: Vec<Point> = (0..6)
            .map(|_| Point::new(rng.next_f64() * size, rng.next_f64() * size))
            .collect();
        field
            .add_shape(ShapeId(id), Shape::new(points, Color::WHITE))
            .expect("ids are unique");
    }
    field
}

fn bench_field(c: &mut Criterion) {
    let mut group = c.benchmark_group("spatia_field");
    group.sample_size(20);

    for &n in &[64_usize, 256, 512] {
        for algorithm in [Algorithm::Exact, Algorithm::JumpFlood] {
            group.bench_function(format!("compute({algorithm:?},n={n})"), |b| {
                let mut field = build_field(n, 8, algorithm, 0xF1E1_D000_0000_0001);
                b.iter(|| {
                    field.compute();
                    black_box(field.squared_distances().len())
                });
            });
        }
    }

    group.bench_function("generate_image_data(n=256)", |b| {
        let mut field = build_field(256, 8, Algorithm::Exact, 0xF1E1_D000_0000_0002);
        field.compute();
        b.iter(|| black_box(field.generate_image_data()));
    });

    group.finish();
}

criterion_group!(benches, bench_field);
criterion_main!(benches);
