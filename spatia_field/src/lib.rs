// Copyright 2025 the Spatia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatia Field: distance fields over shape outlines.
//!
//! A [`DistanceField`] is a square grid. Registered [`Shape`]s (closed
//! polylines) are rasterized into it as zero-distance seed cells, then every
//! cell is assigned:
//! - the squared Euclidean distance to the nearest seed,
//! - the [`GridPoint`] of that seed (the closest-point transform),
//! - and through the seed, the [`ShapeId`] that owns it.
//!
//! Two algorithms are available via [`Algorithm`]: an exact separable
//! transform built from lower envelopes of parabolas, and CPU jump flooding,
//! which mirrors the ping-pong passes a GPU implementation would run.
//!
//! The field can render itself as an RGBA8 image where each cell takes the
//! colour of its nearest shape, fading with distance. A [`FieldWorker`]
//! wraps a field behind a small request/response protocol so the whole
//! pipeline can run on its own thread.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Point;
//! use peniko::Color;
//! use spatia_field::{DistanceField, FieldConfig, GridPoint, Shape, ShapeId};
//!
//! let mut field = DistanceField::new(FieldConfig::default().with_resolution(32))?;
//! let outline = [
//!     Point::new(4.0, 4.0),
//!     Point::new(12.0, 4.0),
//!     Point::new(12.0, 12.0),
//!     Point::new(4.0, 12.0),
//! ];
//! field.add_shape(ShapeId(1), Shape::new(outline, Color::WHITE))?;
//! field.compute();
//!
//! assert!(field.is_seed(GridPoint::new(4, 8)));
//! assert_eq!(field.distance(GridPoint::new(20, 8)), Some(8.0));
//! assert_eq!(field.nearest_seed(GridPoint::new(20, 8)), Some(GridPoint::new(12, 8)));
//! # Ok::<(), spatia_field::FieldError>(())
//! ```
//!
//! Shapes can also be built from geometry in [`spatia_geom`], for example
//! [`Shape::from_rect`] takes the parent-space corners of a rotated rectangle.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod edt;
mod error;
mod field;
mod jump_flood;
mod raster;
mod shape;
mod worker;

pub use edt::FAR;
pub use error::FieldError;
pub use field::{Algorithm, DistanceField, FieldConfig};
pub use shape::{GridPoint, Shape, ShapeId};
pub use worker::{FieldRequest, FieldResponse, FieldWorker, ShapeMessage};
