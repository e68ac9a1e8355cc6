// Copyright 2025 the Spatia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatia Rope: a Verlet rope hanging between two moving anchors.
//!
//! A [`Rope`] is a chain of point masses connected by rest-length links. Its
//! two ends are pinned to anchor positions that the caller supplies every
//! frame, typically the centres of two [`RotatedRect`](spatia_geom::RotatedRect)s
//! joined by a connector. Each simulation step:
//!
//! 1. integrates every free point with Störmer–Verlet, using the previous
//!    position as implicit velocity and a time-corrected carry-over;
//! 2. relaxes the link constraints with a fixed number of Gauss–Seidel sweeps.
//!
//! Time is fed through [`Rope::advance`], which accumulates wall-clock time
//! and steps on whole frames of [`RopeConfig::frame_interval`], folding long
//! hitches into a single capped step.
//!
//! ```rust
//! use kurbo::Point;
//! use spatia_rope::{Rope, RopeConfig};
//!
//! let mut rope = Rope::new(RopeConfig::default().with_resolution(10.0));
//! rope.set_anchors(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
//!
//! for _ in 0..30 {
//!     rope.advance(1.0 / 60.0);
//! }
//!
//! // The middle sags under gravity while the ends stay pinned.
//! let middle = rope.points()[rope.len() / 2].pos;
//! assert!(middle.y > 0.0);
//! assert_eq!(rope.points()[0].pos, Point::ZERO);
//! ```
//!
//! Links can be cut and mended at runtime; [`Rope::segments`] and
//! [`Rope::to_path`] split the drawable output at every cut.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod rope;

pub use config::RopeConfig;
pub use rope::{MAX_POINTS, Rope, RopeError, RopePoint, RopeState};
