// Copyright 2025 the Spatia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatia Geom: affine matrices and rotated rectangles for spatial canvases.
//!
//! This crate is the coordinate-space core used by the rest of Spatia. It
//! provides:
//! - [`Matrix`]: a general 2D affine transform with composition, fail-loud
//!   inversion and decomposition into translation/rotation/shear/scale.
//! - [`RotatedRect`]: a rectangle with position, size, rotation and
//!   independently configurable transform/rotation origins, mapping points
//!   between its own local space and its parent space.
//! - [`ReadOnlyRect`]: an immutable, shareable snapshot of a [`RotatedRect`].
//! - [`vector`]: small point/vector helpers (rotation, angles, interpolation).
//!
//! It does **not** know about any UI toolkit. Callers read geometry from
//! wherever it lives, push it into a [`RotatedRect`], and read back
//! parent-space polygons for drawing connectors, overlays or GPU seeds.
//!
//! ## Coordinate conventions
//!
//! - Y points down; positive rotations turn clockwise on screen.
//! - `x`/`y` of a [`RotatedRect`] is the top-left of its **unrotated** box.
//! - Local space has its origin at that top-left, with axes along the edges.
//!
//! ## Minimal example
//!
//! ```rust
//! use core::f64::consts::FRAC_PI_4;
//! use kurbo::Point;
//! use spatia_geom::{Corner, RectGeometry, RotatedRect};
//!
//! let mut rect = RotatedRect::new(100.0, 100.0, 80.0, 40.0);
//! rect.set_rotation(FRAC_PI_4);
//!
//! // Drag the bottom-right handle; the top-left corner stays put.
//! let anchor = rect.top_left();
//! rect.set_corner(Corner::BottomRight, Point::new(120.0, 60.0));
//! assert!((rect.top_left() - anchor).hypot() < 1e-9);
//! assert!((rect.width() - 120.0).abs() < 1e-9);
//! assert!((rect.height() - 60.0).abs() < 1e-9);
//! ```
//!
//! ## Nested spaces
//!
//! Matrices compose parent-first, so a rectangle nested inside another maps
//! into the outer parent with `outer.matrix() * inner.matrix()`:
//!
//! ```rust
//! use kurbo::Point;
//! use spatia_geom::{RectGeometry, RotatedRect};
//!
//! let outer = RotatedRect::new(50.0, 0.0, 200.0, 200.0);
//! let inner = RotatedRect::new(10.0, 10.0, 20.0, 20.0);
//! let to_root = outer.matrix() * inner.matrix();
//! assert_eq!(to_root * Point::ZERO, Point::new(60.0, 10.0));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod matrix;
mod rect;
pub mod vector;

pub use matrix::{Matrix, MatrixDecomposition, SingularMatrixError};
pub use rect::{Corner, ReadOnlyRect, RectGeometry, RectUpdate, RotatedRect};
