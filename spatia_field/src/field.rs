// Copyright 2025 the Spatia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::collections::BTreeMap;
use alloc::vec;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect, Vec2};
use spatia_geom::Matrix;

use crate::edt::{EdtScratch, FAR, exact_transform};
use crate::jump_flood::{JumpFloodScratch, jump_flood};
use crate::raster::draw_line;
use crate::{FieldError, GridPoint, Shape, ShapeId};

/// Nearest-seed algorithm used by [`DistanceField::compute`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Algorithm {
    /// Separable lower-envelope transform; exact squared distances.
    #[default]
    Exact,
    /// Jump flooding with halving offsets; approximate but embarrassingly parallel.
    JumpFlood,
}

/// Settings for a [`DistanceField`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct FieldConfig {
    /// Cells along each side of the square grid.
    pub resolution: usize,
    /// Which transform [`DistanceField::compute`] runs.
    pub algorithm: Algorithm,
    /// Distance in cells over which a shape's colour fades to transparent in
    /// generated images. Zero or less paints every reachable cell at full
    /// opacity.
    pub falloff: f32,
    /// World rectangle mapped onto the grid. `None` means world units are cells.
    pub world_bounds: Option<Rect>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            resolution: 256,
            algorithm: Algorithm::Exact,
            falloff: 32.0,
            world_bounds: None,
        }
    }
}

impl FieldConfig {
    /// Sets [`FieldConfig::resolution`].
    #[must_use]
    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    /// Sets [`FieldConfig::algorithm`].
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets [`FieldConfig::falloff`].
    #[must_use]
    pub fn with_falloff(mut self, cells: f32) -> Self {
        self.falloff = cells;
        self
    }

    /// Sets [`FieldConfig::world_bounds`].
    #[must_use]
    pub fn with_world_bounds(mut self, bounds: Rect) -> Self {
        self.world_bounds = Some(bounds);
        self
    }
}

/// A square grid holding the distance from every cell to the nearest shape
/// outline, plus which outline cell that is and which shape owns it.
///
/// Shapes are registered by id and rasterized as seeds when
/// [`compute`](Self::compute) runs; every mutation marks the field dirty.
/// Distances are stored squared; [`distance`](Self::distance) takes the root.
///
/// ```
/// use kurbo::Point;
/// use peniko::Color;
/// use spatia_field::{DistanceField, FieldConfig, GridPoint, Shape, ShapeId};
///
/// let mut field = DistanceField::new(FieldConfig::default().with_resolution(5))?;
/// field.add_shape(ShapeId(1), Shape::new([Point::new(2.0, 2.0)], Color::WHITE))?;
/// field.compute();
///
/// assert_eq!(field.squared_distance(GridPoint::new(0, 0)), Some(8.0));
/// assert_eq!(field.nearest_shape(GridPoint::new(4, 0)), Some(ShapeId(1)));
/// # Ok::<(), spatia_field::FieldError>(())
/// ```
#[derive(Debug)]
pub struct DistanceField {
    config: FieldConfig,
    to_grid: Matrix,
    shapes: BTreeMap<ShapeId, Shape>,
    edt: Vec<f32>,
    cpt: Vec<Option<GridPoint>>,
    owner: Vec<Option<ShapeId>>,
    dirty: bool,
    edt_scratch: EdtScratch,
    jump_flood_scratch: JumpFloodScratch,
}

impl DistanceField {
    /// Creates an empty field.
    ///
    /// Fails with [`FieldError::InvalidResolution`] for a zero-sized grid.
    pub fn new(config: FieldConfig) -> Result<Self, FieldError> {
        let n = config.resolution;
        let cells = n
            .checked_mul(n)
            .filter(|&c| c > 0)
            .ok_or(FieldError::InvalidResolution(n))?;
        Ok(Self {
            config,
            to_grid: grid_mapping(&config),
            shapes: BTreeMap::new(),
            edt: vec![FAR; cells],
            cpt: vec![None; cells],
            owner: vec![None; cells],
            dirty: true,
            edt_scratch: EdtScratch::default(),
            jump_flood_scratch: JumpFloodScratch::default(),
        })
    }

    /// Replaces the configuration, resizing the grid if needed.
    ///
    /// Registered shapes are kept; the field becomes dirty.
    pub fn reconfigure(&mut self, config: FieldConfig) -> Result<(), FieldError> {
        let mut next = Self::new(config)?;
        next.shapes = core::mem::take(&mut self.shapes);
        *self = next;
        Ok(())
    }

    /// The configuration in use.
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Cells along each side of the grid.
    pub fn resolution(&self) -> usize {
        self.config.resolution
    }

    /// Returns `true` if shapes changed since the last [`compute`](Self::compute).
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Matrix taking world coordinates to grid coordinates (cell centres at integers).
    pub fn world_to_grid(&self) -> Matrix {
        self.to_grid
    }

    /// Maps a world-space point into grid coordinates.
    pub fn grid_point(&self, world: Point) -> Point {
        self.to_grid * world
    }

    /// Registers a new shape.
    pub fn add_shape(&mut self, id: ShapeId, shape: Shape) -> Result<(), FieldError> {
        if self.shapes.contains_key(&id) {
            return Err(FieldError::DuplicateShape(id));
        }
        self.shapes.insert(id, shape);
        self.dirty = true;
        Ok(())
    }

    /// Replaces the outline and colour of a registered shape.
    pub fn update_shape(&mut self, id: ShapeId, shape: Shape) -> Result<(), FieldError> {
        let slot = self
            .shapes
            .get_mut(&id)
            .ok_or(FieldError::UnknownShape(id))?;
        *slot = shape;
        self.dirty = true;
        Ok(())
    }

    /// Unregisters a shape, returning it.
    pub fn remove_shape(&mut self, id: ShapeId) -> Result<Shape, FieldError> {
        let shape = self
            .shapes
            .remove(&id)
            .ok_or(FieldError::UnknownShape(id))?;
        self.dirty = true;
        Ok(shape)
    }

    /// The shape registered under `id`.
    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    /// All registered shapes, in id order.
    pub fn shapes(&self) -> impl Iterator<Item = (ShapeId, &Shape)> + '_ {
        self.shapes.iter().map(|(&id, shape)| (id, shape))
    }

    /// Removes every shape.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.dirty = true;
    }

    /// Rasterizes all shapes and recomputes distances and nearest seeds.
    ///
    /// Where shapes overlap, the one with the larger id owns the cell.
    pub fn compute(&mut self) {
        let n = self.config.resolution;
        self.edt.fill(FAR);
        self.owner.fill(None);

        let mut seeds = 0_usize;
        for (&id, shape) in &self.shapes {
            for (a, b) in shape.edges() {
                let (a, b) = (self.to_grid * a, self.to_grid * b);
                draw_line(a, b, n, |cell| {
                    let i = cell.y * n + cell.x;
                    if self.edt[i] != 0.0 {
                        seeds += 1;
                    }
                    self.edt[i] = 0.0;
                    self.owner[i] = Some(id);
                });
            }
        }

        match self.config.algorithm {
            Algorithm::Exact => {
                exact_transform(&mut self.edt, &mut self.cpt, n, &mut self.edt_scratch);
            }
            Algorithm::JumpFlood => {
                jump_flood(&mut self.edt, &mut self.cpt, n, &mut self.jump_flood_scratch);
            }
        }
        self.dirty = false;
        log::debug!(
            "computed {n}x{n} field ({:?}) from {} shapes, {seeds} seed cells",
            self.config.algorithm,
            self.shapes.len()
        );
    }

    /// Recomputes only if a shape changed since the last run.
    pub fn compute_if_dirty(&mut self) {
        if self.dirty {
            self.compute();
        }
    }

    fn index(&self, cell: GridPoint) -> Option<usize> {
        let n = self.config.resolution;
        (cell.x < n && cell.y < n).then_some(cell.y * n + cell.x)
    }

    /// Squared distance from `cell` to the nearest seed.
    ///
    /// `None` outside the grid or when no seed exists.
    pub fn squared_distance(&self, cell: GridPoint) -> Option<f32> {
        let d = self.edt[self.index(cell)?];
        (d < FAR).then_some(d)
    }

    /// Euclidean distance from `cell` to the nearest seed, in cells.
    pub fn distance(&self, cell: GridPoint) -> Option<f32> {
        self.squared_distance(cell).map(|d| d.sqrt())
    }

    /// The seed cell nearest to `cell`.
    pub fn nearest_seed(&self, cell: GridPoint) -> Option<GridPoint> {
        self.cpt[self.index(cell)?]
    }

    /// The shape owning the seed nearest to `cell`.
    pub fn nearest_shape(&self, cell: GridPoint) -> Option<ShapeId> {
        let seed = self.nearest_seed(cell)?;
        self.owner[self.index(seed)?]
    }

    /// Returns `true` if `cell` lies on a rasterized outline.
    pub fn is_seed(&self, cell: GridPoint) -> bool {
        self.index(cell).is_some_and(|i| self.edt[i] == 0.0)
    }

    /// Squared distances, row-major.
    pub fn squared_distances(&self) -> &[f32] {
        &self.edt
    }

    /// Nearest seed per cell, row-major.
    pub fn nearest_seeds(&self) -> &[Option<GridPoint>] {
        &self.cpt
    }

    /// Renders the field as row-major RGBA8 pixels, one per cell.
    ///
    /// Each cell takes the colour of the shape owning its nearest seed, with
    /// alpha fading linearly to zero at [`FieldConfig::falloff`] cells.
    /// Unreachable cells are transparent black. Recomputes first if dirty.
    pub fn generate_image_data(&mut self) -> Vec<u8> {
        self.compute_if_dirty();
        let mut data = vec![0_u8; self.edt.len() * 4];
        let falloff = self.config.falloff;
        for (i, pixel) in data.chunks_exact_mut(4).enumerate() {
            let Some(seed) = self.cpt[i] else {
                continue;
            };
            let Some(shape) = self.owner[seed.y * self.config.resolution + seed.x]
                .and_then(|id| self.shapes.get(&id))
            else {
                continue;
            };
            let fade = if falloff > 0.0 {
                (1.0 - self.edt[i].sqrt() / falloff).max(0.0)
            } else {
                1.0
            };
            let rgba = shape.color.to_rgba8();
            pixel.copy_from_slice(&[rgba.r, rgba.g, rgba.b, scale_alpha(rgba.a, fade)]);
        }
        data
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "fade is in [0, 1], so the product stays within u8"
)]
fn scale_alpha(alpha: u8, fade: f32) -> u8 {
    (f32::from(alpha) * fade).round() as u8
}

/// Builds the world → grid matrix: the bounds' edges land on the outer cell
/// edges, so cell centres sit at integer grid coordinates.
fn grid_mapping(config: &FieldConfig) -> Matrix {
    let Some(bounds) = config.world_bounds else {
        return Matrix::IDENTITY;
    };
    let bounds = bounds.abs();
    if !bounds.is_finite() || bounds.width() <= 0.0 || bounds.height() <= 0.0 {
        log::warn!("ignoring degenerate world bounds {bounds:?}");
        return Matrix::IDENTITY;
    }
    let n = config.resolution as f64;
    Matrix::translation(Vec2::new(-0.5, -0.5))
        * Matrix::scale(n / bounds.width(), n / bounds.height())
        * Matrix::translation(-bounds.origin().to_vec2())
}
