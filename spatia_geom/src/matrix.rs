// Copyright 2025 the Spatia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! General 2D affine matrices.

use core::fmt;
use core::ops::{Mul, MulAssign};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Point, Vec2};

/// A 2D affine transform with named coefficients.
///
/// The coefficients `(a, b, c, d, e, f)` describe the augmented matrix
///
/// ```text
/// | a  c  e |
/// | b  d  f |
/// | 0  0  1 |
/// ```
///
/// so a point maps as `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
///
/// Multiplication composes in the conventional "apply child, then parent"
/// order: `(parent * child) * p == parent * (child * p)`.
///
/// ```
/// use kurbo::Point;
/// use spatia_geom::Matrix;
///
/// let m = Matrix::translation((10.0, 0.0).into()) * Matrix::scale(2.0, 2.0);
/// assert_eq!(m * Point::new(1.0, 1.0), Point::new(12.0, 2.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Matrix {
    /// Horizontal scale / rotation cosine term.
    pub a: f64,
    /// Vertical shear / rotation sine term.
    pub b: f64,
    /// Horizontal shear / negated rotation sine term.
    pub c: f64,
    /// Vertical scale / rotation cosine term.
    pub d: f64,
    /// Horizontal translation.
    pub e: f64,
    /// Vertical translation.
    pub f: f64,
}

/// Error returned when inverting a matrix whose determinant is zero or not finite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SingularMatrixError {
    /// The offending determinant `a*d - b*c`.
    pub determinant: f64,
}

impl fmt::Display for SingularMatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "matrix is not invertible (determinant {})",
            self.determinant
        )
    }
}

impl core::error::Error for SingularMatrixError {}

/// Translation, rotation, shear and scale factors recovered from a [`Matrix`].
///
/// [`MatrixDecomposition::recompose`] rebuilds the matrix as
/// `translate · rotate · shear_x · scale`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatrixDecomposition {
    /// Translation component `(e, f)`.
    pub translation: Vec2,
    /// Per-axis scale. `scale.y` is negative for reflections.
    pub scale: Vec2,
    /// Rotation in radians.
    pub rotation: f64,
    /// Horizontal shear factor applied after scaling.
    pub skew: f64,
}

impl MatrixDecomposition {
    /// Rebuilds the matrix described by these factors.
    #[must_use]
    pub fn recompose(&self) -> Matrix {
        Matrix::translation(self.translation)
            * Matrix::rotation(self.rotation)
            * Matrix::new(
                self.scale.x,
                0.0,
                self.skew * self.scale.y,
                self.scale.y,
                0.0,
                0.0,
            )
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    /// The identity transform.
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    /// Creates a matrix from its six coefficients.
    #[inline]
    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Creates a matrix from `[a, b, c, d, e, f]`.
    #[inline]
    pub const fn from_coeffs(c: [f64; 6]) -> Self {
        Self::new(c[0], c[1], c[2], c[3], c[4], c[5])
    }

    /// Returns the coefficients as `[a, b, c, d, e, f]`.
    #[inline]
    pub const fn coeffs(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    /// A pure translation.
    #[inline]
    pub const fn translation(offset: Vec2) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, offset.x, offset.y)
    }

    /// A non-uniform scale about the origin.
    #[inline]
    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// A rotation about the origin.
    ///
    /// With Y pointing down (screen space) a positive angle turns clockwise.
    #[inline]
    pub fn rotation(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// A rotation about `pivot`: `translate(pivot) · rotate(radians) · translate(-pivot)`.
    #[inline]
    pub fn rotation_about(radians: f64, pivot: Point) -> Self {
        let pivot = pivot.to_vec2();
        Self::translation(pivot) * Self::rotation(radians) * Self::translation(-pivot)
    }

    /// Returns `self · translate(offset)`.
    #[must_use]
    pub fn translated(self, offset: Vec2) -> Self {
        self * Self::translation(offset)
    }

    /// Returns `self · rotate(radians)`.
    #[must_use]
    pub fn rotated(self, radians: f64) -> Self {
        self * Self::rotation(radians)
    }

    /// Returns `self · rotate(radians)` with the rotation taken about `pivot`.
    #[must_use]
    pub fn rotated_about(self, radians: f64, pivot: Point) -> Self {
        self * Self::rotation_about(radians, pivot)
    }

    /// Returns `self · scale(sx, sy)`.
    #[must_use]
    pub fn scaled(self, sx: f64, sy: f64) -> Self {
        self * Self::scale(sx, sy)
    }

    /// The determinant `a*d - b*c` of the linear part.
    #[inline]
    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// Returns `true` if [`Matrix::inverse`] would succeed.
    #[inline]
    pub fn is_invertible(&self) -> bool {
        let det = self.determinant();
        det != 0.0 && det.is_finite()
    }

    /// Computes the inverse transform.
    ///
    /// A zero (or non-finite) determinant is reported as an error rather than
    /// silently replaced with the identity; callers that build matrices from
    /// user geometry should reject zero extents before inverting.
    pub fn inverse(&self) -> Result<Self, SingularMatrixError> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return Err(SingularMatrixError { determinant: det });
        }
        let inv = 1.0 / det;
        Ok(Self::new(
            self.d * inv,
            -self.b * inv,
            -self.c * inv,
            self.a * inv,
            (self.c * self.f - self.d * self.e) * inv,
            (self.b * self.e - self.a * self.f) * inv,
        ))
    }

    /// Splits the matrix into translation, rotation, shear and scale.
    ///
    /// Singular matrices have no meaningful rotation and are rejected.
    pub fn decompose(&self) -> Result<MatrixDecomposition, SingularMatrixError> {
        if !self.is_invertible() {
            return Err(SingularMatrixError {
                determinant: self.determinant(),
            });
        }
        let sx = Vec2::new(self.a, self.b).hypot();
        let rotation = self.b.atan2(self.a);
        let (sin, cos) = rotation.sin_cos();
        // Second column expressed in the rotated frame.
        let c_local = cos * self.c + sin * self.d;
        let d_local = -sin * self.c + cos * self.d;
        let sy = d_local;
        Ok(MatrixDecomposition {
            translation: Vec2::new(self.e, self.f),
            scale: Vec2::new(sx, sy),
            rotation,
            skew: c_local / sy,
        })
    }

    /// Applies the transform to a point.
    #[inline]
    pub fn transform_point(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// Applies only the linear part (no translation) to a vector.
    #[inline]
    pub fn transform_vector(&self, v: Vec2) -> Vec2 {
        Vec2::new(self.a * v.x + self.c * v.y, self.b * v.x + self.d * v.y)
    }

    /// Returns the translation component.
    #[inline]
    pub fn translation_part(&self) -> Vec2 {
        Vec2::new(self.e, self.f)
    }

    /// Returns `true` if every coefficient is within `epsilon` of `other`'s.
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.coeffs()
            .iter()
            .zip(other.coeffs().iter())
            .all(|(x, y)| (x - y).abs() <= epsilon)
    }

    /// Returns `true` if this is exactly the identity.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Returns `true` if every coefficient is finite.
    pub fn is_finite(&self) -> bool {
        self.coeffs().iter().all(|c| c.is_finite())
    }
}

impl Mul for Matrix {
    type Output = Self;

    #[inline]
    fn mul(self, o: Self) -> Self {
        Self::new(
            self.a * o.a + self.c * o.b,
            self.b * o.a + self.d * o.b,
            self.a * o.c + self.c * o.d,
            self.b * o.c + self.d * o.d,
            self.a * o.e + self.c * o.f + self.e,
            self.b * o.e + self.d * o.f + self.f,
        )
    }
}

impl MulAssign for Matrix {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<Point> for Matrix {
    type Output = Point;

    #[inline]
    fn mul(self, p: Point) -> Point {
        self.transform_point(p)
    }
}

impl From<Affine> for Matrix {
    fn from(affine: Affine) -> Self {
        Self::from_coeffs(affine.as_coeffs())
    }
}

impl From<Matrix> for Affine {
    fn from(m: Matrix) -> Self {
        Self::new(m.coeffs())
    }
}

/// Formats as a CSS `matrix()` function.
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "matrix({}, {}, {}, {}, {}, {})",
            self.a, self.b, self.c, self.d, self.e, self.f
        )
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use core::f64::consts::{FRAC_PI_2, PI};
    use std::string::ToString;

    use super::*;

    fn assert_point_near(a: Point, b: Point) {
        assert!(
            (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn rotation_is_clockwise_in_screen_space() {
        let r = Matrix::rotation(FRAC_PI_2);
        // +X turns into +Y (downwards) for a quarter turn.
        assert_point_near(r * Point::new(1.0, 0.0), Point::new(0.0, 1.0));
    }

    #[test]
    fn composition_applies_right_operand_first() {
        let t = Matrix::translation(Vec2::new(5.0, 0.0));
        let s = Matrix::scale(2.0, 3.0);
        assert_point_near((t * s) * Point::new(1.0, 1.0), Point::new(7.0, 3.0));
        assert_point_near((s * t) * Point::new(1.0, 1.0), Point::new(12.0, 3.0));
    }

    #[test]
    fn rotation_about_keeps_pivot_fixed() {
        let pivot = Point::new(3.0, -4.0);
        let m = Matrix::rotation_about(1.234, pivot);
        assert_point_near(m * pivot, pivot);
        let explicit = Matrix::translation(pivot.to_vec2())
            * Matrix::rotation(1.234)
            * Matrix::translation(-pivot.to_vec2());
        assert!(m.approx_eq(&explicit, 1e-12), "pivot rotation order");
    }

    #[test]
    fn chained_helpers_post_multiply() {
        let m = Matrix::IDENTITY
            .translated(Vec2::new(10.0, 20.0))
            .rotated(PI)
            .scaled(2.0, 2.0);
        assert_point_near(m * Point::new(1.0, 1.0), Point::new(8.0, 18.0));
    }

    #[test]
    fn inverse_round_trips() {
        let m = Matrix::new(2.0, 0.5, -1.0, 3.0, 7.0, -2.0);
        let inv = m.inverse().unwrap();
        assert!((m * inv).approx_eq(&Matrix::IDENTITY, 1e-12), "m * inv");
        assert!((inv * m).approx_eq(&Matrix::IDENTITY, 1e-12), "inv * m");
        let p = Point::new(-3.5, 11.0);
        assert_point_near(inv * (m * p), p);
    }

    #[test]
    fn singular_inverse_fails_loudly() {
        let m = Matrix::scale(0.0, 1.0);
        assert!(!m.is_invertible());
        let err = m.inverse().unwrap_err();
        assert_eq!(err.determinant, 0.0);
        assert!(err.to_string().contains("not invertible"));
        assert!(Matrix::new(f64::NAN, 0.0, 0.0, 1.0, 0.0, 0.0).inverse().is_err());
    }

    #[test]
    fn decompose_and_recompose() {
        let m = Matrix::translation(Vec2::new(4.0, -9.0))
            * Matrix::rotation(0.7)
            * Matrix::new(1.0, 0.0, 0.25, 1.0, 0.0, 0.0)
            * Matrix::scale(2.0, 0.5);
        let parts = m.decompose().unwrap();
        assert!((parts.rotation - 0.7).abs() < 1e-12, "rotation");
        assert!((parts.scale.x - 2.0).abs() < 1e-12, "scale x");
        assert!((parts.scale.y - 0.5).abs() < 1e-12, "scale y");
        assert!((parts.skew - 0.25).abs() < 1e-12, "skew");
        assert_eq!(parts.translation, Vec2::new(4.0, -9.0));
        assert!(parts.recompose().approx_eq(&m, 1e-12), "recompose");
    }

    #[test]
    fn decompose_reports_reflection_in_y_scale() {
        let parts = Matrix::scale(1.0, -1.0).decompose().unwrap();
        assert_eq!(parts.scale, Vec2::new(1.0, -1.0));
        assert!(Matrix::scale(0.0, 0.0).decompose().is_err());
    }

    #[test]
    fn affine_conversion_is_lossless() {
        let m = Matrix::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        let affine: Affine = m.into();
        assert_eq!(affine.as_coeffs(), m.coeffs());
        assert_eq!(Matrix::from(affine), m);
        let p = Point::new(0.5, -2.0);
        assert_point_near(affine * p, m * p);
    }

    #[test]
    fn display_uses_css_syntax() {
        let m = Matrix::new(1.0, 0.0, 0.0, 1.0, 10.5, -3.0);
        assert_eq!(m.to_string(), "matrix(1, 0, 0, 1, 10.5, -3)");
    }
}
