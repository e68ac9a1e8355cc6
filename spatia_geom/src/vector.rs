// Copyright 2025 the Spatia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point and vector helpers shared by the rectangle model and the rope integrator.
//!
//! Kurbo already provides the arithmetic operators on [`Point`] and [`Vec2`];
//! these functions fill in the rotation and angle handling used throughout
//! Spatia, with the same clockwise-positive (Y down) convention as
//! [`Matrix::rotation`](crate::Matrix::rotation).

use core::f64::consts::TAU;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};

/// Rotates `v` by `radians` about the origin.
#[inline]
pub fn rotate(v: Vec2, radians: f64) -> Vec2 {
    let (sin, cos) = radians.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Rotates `p` by `radians` about `pivot`.
#[inline]
pub fn rotate_about(p: Point, pivot: Point, radians: f64) -> Point {
    pivot + rotate(p - pivot, radians)
}

/// Angle of `v` measured from the +X axis, in `(-π, π]`.
#[inline]
pub fn angle(v: Vec2) -> f64 {
    v.y.atan2(v.x)
}

/// Angle of the direction from `from` to `to`.
#[inline]
pub fn angle_between(from: Point, to: Point) -> f64 {
    angle(to - from)
}

/// Linear interpolation between two points.
#[inline]
pub fn lerp(a: Point, b: Point, t: f64) -> Point {
    a + (b - a) * t
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    (b - a).hypot()
}

/// Squared Euclidean distance between two points.
#[inline]
pub fn distance_squared(a: Point, b: Point) -> f64 {
    (b - a).hypot2()
}

/// Returns `v` scaled to unit length, or zero when `v` has no length.
#[inline]
pub fn normalize_or_zero(v: Vec2) -> Vec2 {
    let len = v.hypot();
    if len > 0.0 && len.is_finite() {
        v / len
    } else {
        Vec2::ZERO
    }
}

/// Wraps an angle into `[0, 2π)`.
pub fn normalize_angle(radians: f64) -> f64 {
    let r = radians % TAU;
    let r = if r < 0.0 { r + TAU } else { r };
    // `-tiny + TAU` can round up to exactly TAU.
    if r >= TAU { 0.0 } else { r }
}

/// Returns `true` when both coordinates differ by at most `epsilon`.
#[inline]
pub fn approx_eq_point(a: Point, b: Point, epsilon: f64) -> bool {
    (a.x - b.x).abs() <= epsilon && (a.y - b.y).abs() <= epsilon
}
