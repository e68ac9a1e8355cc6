// Copyright 2025 the Spatia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end checks for distance fields and the worker protocol.

use std::sync::mpsc;
use std::thread;

use kurbo::{Point, Rect};
use peniko::Color;
use spatia_field::{
    Algorithm, DistanceField, FieldConfig, FieldRequest, FieldResponse, FieldWorker, GridPoint,
    Shape, ShapeId, ShapeMessage,
};
use spatia_geom::{RectUpdate, RotatedRect};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        ((self.0 >> 11) as f64) / ((1_u64 << 53) as f64)
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

fn random_field(seed: u64, n: usize, algorithm: Algorithm) -> DistanceField {
    let mut rng = Lcg(seed);
    let mut field = DistanceField::new(
        FieldConfig::default()
            .with_resolution(n)
            .with_algorithm(algorithm),
    )
    .unwrap();
    let size = n as f64;
    for id in 0..4 {
        let points: Vec<Point> = (0..5)
            .map(|_| Point::new(rng.range(-4.0, size + 4.0), rng.range(-4.0, size + 4.0)))
            .collect();
        field
            .add_shape(ShapeId(id), Shape::new(points, Color::WHITE))
            .unwrap();
    }
    field.compute();
    field
}

#[test]
fn nearest_seed_is_always_a_seed() {
    for seed in 1..6 {
        let n = 40;
        let field = random_field(seed, n, Algorithm::Exact);
        for y in 0..n {
            for x in 0..n {
                let cell = GridPoint::new(x, y);
                let nearest = field.nearest_seed(cell).unwrap();
                assert!(field.is_seed(nearest), "{cell:?} -> {nearest:?}");
                assert_eq!(field.squared_distance(nearest), Some(0.0));
                let d = field.squared_distance(cell).unwrap();
                assert_eq!(d, nearest.distance_squared(cell) as f32);
                assert!(field.nearest_shape(cell).is_some());
            }
        }
    }
}

#[test]
fn exact_distances_match_brute_force() {
    let n = 24;
    let field = random_field(11, n, Algorithm::Exact);
    let seeds: Vec<GridPoint> = (0..n * n)
        .map(|i| GridPoint::new(i % n, i / n))
        .filter(|&c| field.is_seed(c))
        .collect();
    assert!(!seeds.is_empty());
    for y in 0..n {
        for x in 0..n {
            let cell = GridPoint::new(x, y);
            let expected = seeds
                .iter()
                .map(|s| s.distance_squared(cell))
                .min()
                .unwrap();
            assert_eq!(field.squared_distance(cell), Some(expected as f32), "{cell:?}");
        }
    }
}

#[test]
fn jump_flood_never_beats_exact() {
    let n = 40;
    let exact = random_field(3, n, Algorithm::Exact);
    let approx = random_field(3, n, Algorithm::JumpFlood);
    let mut equal = 0;
    for (a, e) in approx
        .squared_distances()
        .iter()
        .zip(exact.squared_distances())
    {
        assert!(a >= e);
        if a == e {
            equal += 1;
        }
    }
    assert!(equal * 10 >= n * n * 9, "only {equal} cells exact");
}

#[test]
fn rotated_rect_outline_seeds_its_corners() {
    let rect = RotatedRect::from_update(
        RectUpdate::default()
            .position(10.0, 10.0)
            .size(12.0, 6.0)
            .rotation(0.5),
    );
    let mut field = DistanceField::new(FieldConfig::default().with_resolution(32)).unwrap();
    field
        .add_shape(ShapeId(1), Shape::from_rect(&rect, Color::WHITE))
        .unwrap();
    field.compute();
    for corner in spatia_geom::RectGeometry::corners(&rect) {
        let cell = GridPoint::new(corner.x.round() as usize, corner.y.round() as usize);
        assert!(field.is_seed(cell), "{corner:?}");
    }
}

#[test]
fn world_bounds_scale_shapes_onto_the_grid() {
    let config = FieldConfig::default()
        .with_resolution(10)
        .with_world_bounds(Rect::new(0.0, 0.0, 1000.0, 1000.0));
    let mut field = DistanceField::new(config).unwrap();
    // World (50, 50) is the centre of cell (0, 0); (950, 50) of cell (9, 0).
    field
        .add_shape(
            ShapeId(1),
            Shape::new([Point::new(50.0, 50.0), Point::new(950.0, 50.0)], Color::WHITE),
        )
        .unwrap();
    field.compute();
    for x in 0..10 {
        assert!(field.is_seed(GridPoint::new(x, 0)));
    }
    assert_eq!(field.distance(GridPoint::new(3, 9)), Some(9.0));
}

#[test]
fn worker_runs_on_its_own_thread() {
    let (request_tx, request_rx) = mpsc::channel();
    let (reply_tx, reply_rx) = mpsc::channel();
    let handle = thread::spawn(move || {
        let mut worker = FieldWorker::new();
        worker.run(request_rx, |reply| reply_tx.send(reply).unwrap());
    });

    request_tx
        .send(FieldRequest::Initialize(
            FieldConfig::default().with_resolution(8),
        ))
        .unwrap();
    request_tx
        .send(FieldRequest::AddShape(ShapeMessage {
            id: ShapeId(4),
            points: vec![Point::new(0.0, 0.0), Point::new(7.0, 0.0)],
            color: [0, 255, 0, 255],
        }))
        .unwrap();
    request_tx.send(FieldRequest::Unknown).unwrap();
    request_tx.send(FieldRequest::GenerateImageData).unwrap();
    drop(request_tx);

    let FieldResponse::ImageData {
        width,
        height,
        data,
    } = reply_rx.recv().unwrap();
    assert_eq!((width, height), (8, 8));
    assert_eq!(&data[..4], &[0, 255, 0, 255]);
    handle.join().unwrap();
    assert!(reply_rx.recv().is_err());
}

#[cfg(feature = "serde")]
mod wire {
    use super::*;

    #[test]
    fn requests_parse_from_json() {
        let init: FieldRequest = serde_json::from_str(
            r#"{"type":"initialize","data":{"resolution":64,"algorithm":"jumpFlood"}}"#,
        )
        .unwrap();
        assert_eq!(
            init,
            FieldRequest::Initialize(
                FieldConfig::default()
                    .with_resolution(64)
                    .with_algorithm(Algorithm::JumpFlood)
            )
        );

        let add: FieldRequest = serde_json::from_str(
            r#"{"type":"addShape","data":{"id":3,"points":[{"x":1.0,"y":2.0}],"color":[1,2,3,4]}}"#,
        )
        .unwrap();
        assert_eq!(
            add,
            FieldRequest::AddShape(ShapeMessage {
                id: ShapeId(3),
                points: vec![Point::new(1.0, 2.0)],
                color: [1, 2, 3, 4],
            })
        );

        let remove: FieldRequest =
            serde_json::from_str(r#"{"type":"removeShape","data":3}"#).unwrap();
        assert_eq!(remove, FieldRequest::RemoveShape(ShapeId(3)));

        let generate: FieldRequest =
            serde_json::from_str(r#"{"type":"generateImageData"}"#).unwrap();
        assert_eq!(generate, FieldRequest::GenerateImageData);
    }

    #[test]
    fn unknown_request_types_are_tolerated() {
        for json in [
            r#"{"type":"resize"}"#,
            r#"{"type":"resize","data":null}"#,
            r#"{"type":"resize","data":{"w":3,"nested":[1,{"h":2}]}}"#,
            r#"{"type":"resize","data":[1,2,3],"id":9}"#,
        ] {
            let request: FieldRequest = serde_json::from_str(json).unwrap();
            assert_eq!(request, FieldRequest::Unknown, "{json}");
        }

        let unknown: FieldRequest =
            serde_json::from_str(r#"{"type":"resize","data":{"w":3}}"#).unwrap();
        let mut worker = FieldWorker::new();
        assert_eq!(worker.handle(unknown), None);
    }

    #[test]
    fn malformed_requests_are_rejected() {
        for json in [
            r#"{"data":3}"#,
            r#"{"type":"removeShape"}"#,
            r#"{"data":3,"type":"removeShape"}"#,
            r#"{"type":"removeShape","data":"three"}"#,
            r#"{"type":"initialize","type":"initialize","data":{}}"#,
        ] {
            assert!(serde_json::from_str::<FieldRequest>(json).is_err(), "{json}");
        }
    }

    #[test]
    fn requests_survive_a_json_round_trip() {
        let request = FieldRequest::UpdateShape(ShapeMessage {
            id: ShapeId(8),
            points: vec![Point::new(0.5, 1.5), Point::new(2.0, 3.0)],
            color: [9, 8, 7, 6],
        });
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.starts_with(r#"{"type":"updateShape""#), "{json}");
        assert_eq!(serde_json::from_str::<FieldRequest>(&json).unwrap(), request);
    }

    #[test]
    fn image_reply_serializes_with_type_tag() {
        let reply = FieldResponse::ImageData {
            width: 1,
            height: 1,
            data: vec![1, 2, 3, 4],
        };
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["type"], "imageData");
        assert_eq!(json["data"]["width"], 1);
        assert_eq!(json["data"]["data"][3], 4);
    }
}
