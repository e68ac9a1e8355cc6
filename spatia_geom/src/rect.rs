// Copyright 2025 the Spatia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rotatable, resizable rectangles and their local/parent coordinate spaces.

use core::cell::Cell;

use kurbo::{BezPath, Point, Rect, Vec2};

use crate::matrix::Matrix;
use crate::vector;

/// One of the four corners of a rectangle, in clockwise order from the top-left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Corner {
    /// The `(0, 0)` corner in local space.
    TopLeft,
    /// The `(width, 0)` corner in local space.
    TopRight,
    /// The `(width, height)` corner in local space.
    BottomRight,
    /// The `(0, height)` corner in local space.
    BottomLeft,
}

impl Corner {
    /// All corners, clockwise from the top-left.
    pub const ALL: [Self; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomRight,
        Self::BottomLeft,
    ];

    /// The diagonally opposite corner.
    pub const fn opposite(self) -> Self {
        match self {
            Self::TopLeft => Self::BottomRight,
            Self::TopRight => Self::BottomLeft,
            Self::BottomRight => Self::TopLeft,
            Self::BottomLeft => Self::TopRight,
        }
    }

    /// The local-space position of this corner for a `width × height` box.
    pub const fn local_point(self, width: f64, height: f64) -> Point {
        match self {
            Self::TopLeft => Point::new(0.0, 0.0),
            Self::TopRight => Point::new(width, 0.0),
            Self::BottomRight => Point::new(width, height),
            Self::BottomLeft => Point::new(0.0, height),
        }
    }

    /// Unit direction (per local axis) from the opposite corner towards this one.
    const fn direction(self) -> Vec2 {
        match self {
            Self::TopLeft => Vec2::new(-1.0, -1.0),
            Self::TopRight => Vec2::new(1.0, -1.0),
            Self::BottomRight => Vec2::new(1.0, 1.0),
            Self::BottomLeft => Vec2::new(-1.0, 1.0),
        }
    }
}

/// Read access shared by [`RotatedRect`] and [`ReadOnlyRect`].
///
/// Local space has its origin at the rectangle's own unrotated top-left with
/// axes aligned to its edges; parent space is whatever space the rectangle is
/// positioned in. Every conversion goes through [`RectGeometry::matrix`] or its
/// inverse, so nested spaces compose by multiplying matrices.
pub trait RectGeometry {
    /// Top-left of the unrotated layout box, in parent space.
    fn position(&self) -> Point;

    /// Width in local units.
    fn width(&self) -> f64;

    /// Height in local units.
    fn height(&self) -> f64;

    /// Rotation in radians, clockwise-positive with Y pointing down.
    fn rotation(&self) -> f64;

    /// Local → parent transform.
    fn matrix(&self) -> Matrix;

    /// Parent → local transform.
    ///
    /// This is `None` only when the geometry is not finite.
    fn inverse_matrix(&self) -> Option<Matrix>;

    /// Maps a local-space point into parent space.
    fn to_parent_space(&self, local: Point) -> Point {
        self.matrix() * local
    }

    /// Maps a parent-space point into local space.
    ///
    /// Non-finite geometry yields a NaN point rather than a silently wrong one.
    fn to_local_space(&self, parent: Point) -> Point {
        match self.inverse_matrix() {
            Some(inverse) => inverse * parent,
            None => Point::new(f64::NAN, f64::NAN),
        }
    }

    /// The four corners in local space, clockwise from the top-left.
    fn vertices(&self) -> [Point; 4] {
        let (w, h) = (self.width(), self.height());
        Corner::ALL.map(|c| c.local_point(w, h))
    }

    /// The four corners in parent space, clockwise from the top-left.
    fn corners(&self) -> [Point; 4] {
        self.vertices().map(|v| self.to_parent_space(v))
    }

    /// A single corner in parent space.
    fn corner(&self, corner: Corner) -> Point {
        self.corners()[corner as usize]
    }

    /// Top-left corner in parent space.
    fn top_left(&self) -> Point {
        self.corner(Corner::TopLeft)
    }

    /// Top-right corner in parent space.
    fn top_right(&self) -> Point {
        self.corner(Corner::TopRight)
    }

    /// Bottom-right corner in parent space.
    fn bottom_right(&self) -> Point {
        self.corner(Corner::BottomRight)
    }

    /// Bottom-left corner in parent space.
    fn bottom_left(&self) -> Point {
        self.corner(Corner::BottomLeft)
    }

    /// Centre of the rectangle in parent space.
    fn center(&self) -> Point {
        self.to_parent_space(Point::new(self.width() * 0.5, self.height() * 0.5))
    }

    /// Axis-aligned bounding box of the four parent-space corners.
    fn bounds(&self) -> Rect {
        let [first, rest @ ..] = self.corners();
        rest.iter().fold(Rect::from_points(first, first), |acc, p| {
            Rect::new(
                acc.x0.min(p.x),
                acc.y0.min(p.y),
                acc.x1.max(p.x),
                acc.y1.max(p.y),
            )
        })
    }

    /// Returns `true` if the parent-space point lies inside (or on the edge of) the rectangle.
    fn contains(&self, parent: Point) -> bool {
        let p = self.to_local_space(parent);
        (0.0..=self.width()).contains(&p.x) && (0.0..=self.height()).contains(&p.y)
    }

    /// Two parent-space triangles covering the rectangle, for GPU seeding.
    ///
    /// Order: `[tl, tr, br, tl, br, bl]`.
    fn triangles(&self) -> [Point; 6] {
        let [tl, tr, br, bl] = self.corners();
        [tl, tr, br, tl, br, bl]
    }

    /// Closed parent-space outline, suitable for connectors and debug overlays.
    fn to_path(&self) -> BezPath {
        let [tl, tr, br, bl] = self.corners();
        let mut path = BezPath::new();
        path.move_to(tl);
        path.line_to(tr);
        path.line_to(br);
        path.line_to(bl);
        path.close_path();
        path
    }
}

/// Partial update applied by [`RotatedRect::update`].
///
/// Unset fields are left untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RectUpdate {
    /// New left edge of the unrotated box.
    pub x: Option<f64>,
    /// New top edge of the unrotated box.
    pub y: Option<f64>,
    /// New width; negative values clamp to zero.
    pub width: Option<f64>,
    /// New height; negative values clamp to zero.
    pub height: Option<f64>,
    /// New rotation in radians.
    pub rotation: Option<f64>,
    /// New normalized transform origin.
    pub transform_origin: Option<Point>,
    /// New normalized rotation origin.
    pub rotate_origin: Option<Point>,
}

impl RectUpdate {
    /// Sets the position.
    #[must_use]
    pub fn position(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Sets the size.
    #[must_use]
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Sets the rotation.
    #[must_use]
    pub fn rotation(mut self, radians: f64) -> Self {
        self.rotation = Some(radians);
        self
    }

    /// Sets the transform origin.
    #[must_use]
    pub fn transform_origin(mut self, origin: Point) -> Self {
        self.transform_origin = Some(origin);
        self
    }

    /// Sets the rotation origin.
    #[must_use]
    pub fn rotate_origin(mut self, origin: Point) -> Self {
        self.rotate_origin = Some(origin);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Derived {
    matrix: Matrix,
    inverse: Option<Matrix>,
    corners: [Point; 4],
    center: Point,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Layout {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    rotation: f64,
    transform_origin: Point,
    rotate_origin: Point,
}

impl Layout {
    const DEFAULT_ORIGIN: Point = Point::new(0.5, 0.5);

    fn matrix(&self) -> Matrix {
        let pivot = Point::new(
            self.rotate_origin.x * self.width,
            self.rotate_origin.y * self.height,
        );
        Matrix::translation(Vec2::new(self.x, self.y)).rotated_about(self.rotation, pivot)
    }

    fn derive(&self) -> Derived {
        let matrix = self.matrix();
        Derived {
            matrix,
            inverse: matrix.inverse().ok(),
            corners: Corner::ALL.map(|c| matrix * c.local_point(self.width, self.height)),
            center: matrix * Point::new(self.width * 0.5, self.height * 0.5),
        }
    }

    fn transform_origin_local(&self) -> Point {
        Point::new(
            self.transform_origin.x * self.width,
            self.transform_origin.y * self.height,
        )
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            rotation: 0.0,
            transform_origin: Self::DEFAULT_ORIGIN,
            rotate_origin: Self::DEFAULT_ORIGIN,
        }
    }
}

/// A mutable rectangle with position, size, rotation and independent origins.
///
/// - `x`/`y` is the top-left of the **unrotated** layout box in parent space.
/// - Rotation is applied about [`RotatedRect::rotate_origin`], given as a
///   normalized `[0, 1] × [0, 1]` point of the box (default: the centre).
/// - [`RotatedRect::transform_origin`] is the normalized point held fixed by
///   [`RotatedRect::resize_about_origin`] and [`RotatedRect::scale_about_origin`].
///
/// Derived values (the transform, its inverse, corners and centre) are computed
/// lazily on first read and cached until the next effective mutation.
///
/// ```
/// use core::f64::consts::FRAC_PI_2;
/// use kurbo::Point;
/// use spatia_geom::{RectGeometry, RotatedRect};
///
/// let mut rect = RotatedRect::new(0.0, 0.0, 100.0, 50.0);
/// rect.set_rotation(FRAC_PI_2);
///
/// let parent = rect.to_parent_space(Point::new(10.0, 5.0));
/// let local = rect.to_local_space(parent);
/// assert!((local.x - 10.0).abs() < 1e-9 && (local.y - 5.0).abs() < 1e-9);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RotatedRect {
    layout: Layout,
    cache: Cell<Option<Derived>>,
    recomputes: Cell<u64>,
}

impl RotatedRect {
    /// Creates an unrotated rectangle with centred origins.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_update(RectUpdate::default().position(x, y).size(width, height))
    }

    /// Creates a rectangle from a partial description; unset fields take their defaults.
    pub fn from_update(init: RectUpdate) -> Self {
        let mut rect = Self::default();
        rect.update(init);
        rect
    }

    /// Left edge of the unrotated box.
    pub fn x(&self) -> f64 {
        self.layout.x
    }

    /// Top edge of the unrotated box.
    pub fn y(&self) -> f64 {
        self.layout.y
    }

    /// Normalized pivot used when resizing about an origin.
    pub fn transform_origin(&self) -> Point {
        self.layout.transform_origin
    }

    /// Normalized pivot used for rotation.
    pub fn rotate_origin(&self) -> Point {
        self.layout.rotate_origin
    }

    /// Rotation wrapped into `[0, 2π)`.
    pub fn normalized_rotation(&self) -> f64 {
        vector::normalize_angle(self.layout.rotation)
    }

    /// Number of times derived values have been recomputed.
    ///
    /// Exposed for diagnostics and tests of the caching behavior.
    pub fn recompute_count(&self) -> u64 {
        self.recomputes.get()
    }

    /// Sets the left edge.
    pub fn set_x(&mut self, x: f64) {
        self.update(RectUpdate {
            x: Some(x),
            ..RectUpdate::default()
        });
    }

    /// Sets the top edge.
    pub fn set_y(&mut self, y: f64) {
        self.update(RectUpdate {
            y: Some(y),
            ..RectUpdate::default()
        });
    }

    /// Sets the top-left of the unrotated box.
    pub fn set_position(&mut self, position: Point) {
        self.update(RectUpdate::default().position(position.x, position.y));
    }

    /// Sets the width, clamping negative values to zero.
    pub fn set_width(&mut self, width: f64) {
        self.update(RectUpdate {
            width: Some(width),
            ..RectUpdate::default()
        });
    }

    /// Sets the height, clamping negative values to zero.
    pub fn set_height(&mut self, height: f64) {
        self.update(RectUpdate {
            height: Some(height),
            ..RectUpdate::default()
        });
    }

    /// Sets the rotation in radians.
    pub fn set_rotation(&mut self, radians: f64) {
        self.update(RectUpdate::default().rotation(radians));
    }

    /// Sets the normalized transform origin.
    pub fn set_transform_origin(&mut self, origin: Point) {
        self.update(RectUpdate::default().transform_origin(origin));
    }

    /// Sets the normalized rotation origin.
    pub fn set_rotate_origin(&mut self, origin: Point) {
        self.update(RectUpdate::default().rotate_origin(origin));
    }

    /// Applies every set field of `update`.
    ///
    /// Cached values are invalidated at most once, and not at all when nothing
    /// actually changes.
    pub fn update(&mut self, update: RectUpdate) {
        let mut next = self.layout;
        if let Some(x) = update.x {
            next.x = x;
        }
        if let Some(y) = update.y {
            next.y = y;
        }
        if let Some(width) = update.width {
            next.width = width.max(0.0);
        }
        if let Some(height) = update.height {
            next.height = height.max(0.0);
        }
        if let Some(rotation) = update.rotation {
            next.rotation = rotation;
        }
        if let Some(origin) = update.transform_origin {
            next.transform_origin = origin;
        }
        if let Some(origin) = update.rotate_origin {
            next.rotate_origin = origin;
        }
        self.replace_layout(next);
    }

    /// Moves the rectangle by `delta` in parent space.
    pub fn translate_by(&mut self, delta: Vec2) {
        let mut next = self.layout;
        next.x += delta.x;
        next.y += delta.y;
        self.replace_layout(next);
    }

    /// Adds `radians` to the current rotation.
    pub fn rotate_by(&mut self, radians: f64) {
        self.set_rotation(self.layout.rotation + radians);
    }

    /// Moves the rectangle so that its centre lands on `center` (parent space).
    pub fn set_center(&mut self, center: Point) {
        let drift = center - self.center();
        self.translate_by(drift);
    }

    /// Resizes to `width × height` while keeping the transform-origin point fixed in parent space.
    pub fn resize_about_origin(&mut self, width: f64, height: f64) {
        let anchor = self.layout.matrix() * self.layout.transform_origin_local();
        let mut next = self.layout;
        next.width = width.max(0.0);
        next.height = height.max(0.0);
        let drift = anchor - next.matrix() * next.transform_origin_local();
        next.x += drift.x;
        next.y += drift.y;
        self.replace_layout(next);
    }

    /// Scales the size by `(sx, sy)` about the transform origin.
    pub fn scale_about_origin(&mut self, sx: f64, sy: f64) {
        self.resize_about_origin(self.layout.width * sx, self.layout.height * sy);
    }

    /// Moves one corner to `local` (given in the current local space).
    ///
    /// The rectangle keeps its rotation and the opposite corner stays fixed in
    /// parent space. If `local` crosses over the opposite corner along an axis,
    /// that extent clamps to zero instead of going negative.
    pub fn set_corner(&mut self, corner: Corner, local: Point) {
        let current = self.layout;
        let opposite = corner.opposite();
        let fixed = current.matrix() * opposite.local_point(current.width, current.height);
        let target = current.matrix() * local;

        // The parent-space diagonal, expressed along the local axes.
        let diagonal = vector::rotate(target - fixed, -current.rotation);
        let dir = corner.direction();

        let mut next = current;
        next.width = (diagonal.x * dir.x).max(0.0);
        next.height = (diagonal.y * dir.y).max(0.0);

        // Pin the opposite corner by measuring where it would land and undoing the drift.
        let drift = fixed - next.matrix() * opposite.local_point(next.width, next.height);
        next.x += drift.x;
        next.y += drift.y;
        self.replace_layout(next);
    }

    /// Moves one corner to a parent-space point; see [`RotatedRect::set_corner`].
    pub fn set_corner_in_parent(&mut self, corner: Corner, parent: Point) {
        let local = self.to_local_space(parent);
        self.set_corner(corner, local);
    }

    /// Moves the top-left corner to a local-space point.
    pub fn set_top_left(&mut self, local: Point) {
        self.set_corner(Corner::TopLeft, local);
    }

    /// Moves the top-right corner to a local-space point.
    pub fn set_top_right(&mut self, local: Point) {
        self.set_corner(Corner::TopRight, local);
    }

    /// Moves the bottom-right corner to a local-space point.
    pub fn set_bottom_right(&mut self, local: Point) {
        self.set_corner(Corner::BottomRight, local);
    }

    /// Moves the bottom-left corner to a local-space point.
    pub fn set_bottom_left(&mut self, local: Point) {
        self.set_corner(Corner::BottomLeft, local);
    }

    /// Takes a frozen snapshot of the current geometry.
    pub fn to_read_only(&self) -> ReadOnlyRect {
        ReadOnlyRect {
            layout: self.layout,
            derived: self.derived(),
        }
    }

    fn replace_layout(&mut self, next: Layout) {
        if next != self.layout {
            self.layout = next;
            self.cache.set(None);
        }
    }

    fn derived(&self) -> Derived {
        if let Some(derived) = self.cache.get() {
            return derived;
        }
        let derived = self.layout.derive();
        self.cache.set(Some(derived));
        self.recomputes.set(self.recomputes.get() + 1);
        derived
    }
}

impl RectGeometry for RotatedRect {
    fn position(&self) -> Point {
        Point::new(self.layout.x, self.layout.y)
    }

    fn width(&self) -> f64 {
        self.layout.width
    }

    fn height(&self) -> f64 {
        self.layout.height
    }

    fn rotation(&self) -> f64 {
        self.layout.rotation
    }

    fn matrix(&self) -> Matrix {
        self.derived().matrix
    }

    fn inverse_matrix(&self) -> Option<Matrix> {
        self.derived().inverse
    }

    fn corners(&self) -> [Point; 4] {
        self.derived().corners
    }

    fn center(&self) -> Point {
        self.derived().center
    }
}

impl From<Rect> for RotatedRect {
    fn from(rect: Rect) -> Self {
        let rect = rect.abs();
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }
}

impl From<&ReadOnlyRect> for RotatedRect {
    fn from(view: &ReadOnlyRect) -> Self {
        Self {
            layout: view.layout,
            cache: Cell::new(Some(view.derived)),
            recomputes: Cell::new(0),
        }
    }
}

/// An immutable snapshot of a [`RotatedRect`].
///
/// It exposes the same read accessors through [`RectGeometry`] but has no
/// mutators. All derived values are computed up front, so a `ReadOnlyRect` can
/// be shared freely (it is `Send + Sync`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReadOnlyRect {
    layout: Layout,
    derived: Derived,
}

impl ReadOnlyRect {
    /// Left edge of the unrotated box.
    pub fn x(&self) -> f64 {
        self.layout.x
    }

    /// Top edge of the unrotated box.
    pub fn y(&self) -> f64 {
        self.layout.y
    }

    /// Normalized pivot used when resizing about an origin.
    pub fn transform_origin(&self) -> Point {
        self.layout.transform_origin
    }

    /// Normalized pivot used for rotation.
    pub fn rotate_origin(&self) -> Point {
        self.layout.rotate_origin
    }
}

impl From<&RotatedRect> for ReadOnlyRect {
    fn from(rect: &RotatedRect) -> Self {
        rect.to_read_only()
    }
}

impl RectGeometry for ReadOnlyRect {
    fn position(&self) -> Point {
        Point::new(self.layout.x, self.layout.y)
    }

    fn width(&self) -> f64 {
        self.layout.width
    }

    fn height(&self) -> f64 {
        self.layout.height
    }

    fn rotation(&self) -> f64 {
        self.layout.rotation
    }

    fn matrix(&self) -> Matrix {
        self.derived.matrix
    }

    fn inverse_matrix(&self) -> Option<Matrix> {
        self.derived.inverse
    }

    fn corners(&self) -> [Point; 4] {
        self.derived.corners
    }

    fn center(&self) -> Point {
        self.derived.center
    }
}
