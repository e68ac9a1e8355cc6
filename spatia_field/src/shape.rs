// Copyright 2025 the Spatia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use core::fmt;

use kurbo::{BezPath, PathEl, Point};
use peniko::Color;
use spatia_geom::RectGeometry;

/// Caller-chosen identifier of a shape registered with a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ShapeId(pub u32);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Integer cell coordinate in a distance-field grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPoint {
    /// Column.
    pub x: usize,
    /// Row.
    pub y: usize,
}

impl GridPoint {
    /// Creates a grid point from a column and row.
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance between two cells.
    pub fn distance_squared(self, other: Self) -> usize {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx * dx + dy * dy
    }
}

/// A closed polyline outline with a colour.
///
/// Every edge, including the closing one from the last vertex back to the
/// first, is rasterized into the grid as seed cells owned by this shape.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    /// Outline vertices in world space.
    pub points: Vec<Point>,
    /// Colour used for this shape's region in generated images.
    pub color: Color,
}

impl Shape {
    /// Creates a shape from its outline vertices and colour.
    pub fn new(points: impl IntoIterator<Item = Point>, color: Color) -> Self {
        Self {
            points: points.into_iter().collect(),
            color,
        }
    }

    /// The four parent-space corners of a rectangle, as a shape.
    pub fn from_rect(rect: &impl RectGeometry, color: Color) -> Self {
        Self::new(rect.corners(), color)
    }

    /// Flattens a path into a shape, keeping only its on-curve vertices.
    ///
    /// Curves are approximated by their end points; flatten the path first
    /// when curved outlines matter.
    pub fn from_path(path: &BezPath, color: Color) -> Self {
        let points = path.elements().iter().filter_map(|el| match *el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => Some(p),
            PathEl::QuadTo(_, p) | PathEl::CurveTo(_, _, p) => Some(p),
            PathEl::ClosePath => None,
        });
        Self::new(points, color)
    }

    /// Edges of the closed outline, as `(from, to)` pairs.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        // A single vertex yields one zero-length edge, seeding its own cell.
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }
}
