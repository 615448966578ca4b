//! Geometric primitives for shape outlines and connector routing.
//!
//! This module provides the fundamental geometric types used throughout Vellum
//! for describing node boxes, outline vertices and connector paths.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate (or vector) in page space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangular bounding box defined by minimum and maximum coordinates
//! - [`Transform`] - A 2D affine transform used to map unit-square outlines onto pages
//!
//! # Coordinate System
//!
//! Vellum uses the same coordinate system as draw.io and SVG:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **Origin**: Top-left corner of the page at `(0, 0)`
//! - **Y-axis**: Increases downward
//! - **Rotation**: Positive angles turn clockwise on screen

use serde::{Deserialize, Serialize};

/// Tolerance used for geometric comparisons in page units.
pub const EPSILON: f32 = 1e-4;

/// A 2D point representing a position in page coordinate space.
///
/// Points double as 2D vectors (directions, normals, offsets).
///
/// # Examples
///
/// ```
/// # use vellum_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
///
/// let mid = p1.midpoint(p2);
/// assert_eq!(mid.x(), 7.5);
/// assert_eq!(mid.y(), 12.5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Creates a new point with the specified x-coordinate
    pub fn with_x(mut self, x: f32) -> Self {
        self.x = x;
        self
    }

    /// Creates a new point with the specified y-coordinate
    pub fn with_y(mut self, y: f32) -> Self {
        self.y = y;
        self
    }

    /// Checks if both x and y coordinates are zero
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Checks that both coordinates are finite numbers
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Linear interpolation towards `other`; `t = 0` is `self`, `t = 1` is `other`
    pub fn lerp(self, other: Point, t: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    /// Calculates the hypotenuse (Euclidean length of the vector)
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Point) -> f32 {
        other.sub_point(self).hypot()
    }

    /// Multiplies both coordinates by the given factor.
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Returns a new point with absolute values of both coordinates
    pub fn abs(self) -> Self {
        Self {
            x: self.x.abs(),
            y: self.y.abs(),
        }
    }

    /// Dot product of two vectors
    pub fn dot(self, other: Point) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the cross product of two vectors
    pub fn cross(self, other: Point) -> f32 {
        self.x * other.y - self.y * other.x
    }

    /// Returns the unit vector in the same direction.
    ///
    /// Vectors shorter than [`EPSILON`] normalize to the zero vector.
    pub fn normalize(self) -> Self {
        let len = self.hypot();
        if len < EPSILON {
            Self::default()
        } else {
            self.scale(1.0 / len)
        }
    }

    /// Rotates the point clockwise (y-down) about `center` by `degrees`.
    pub fn rotate_about(self, center: Point, degrees: f32) -> Self {
        if degrees == 0.0 {
            return self;
        }
        let (sin, cos) = degrees.to_radians().sin_cos();
        let d = self.sub_point(center);
        Point::new(
            center.x + d.x * cos - d.y * sin,
            center.y + d.x * sin + d.y * cos,
        )
    }

    /// Converts a point and size into a bounds rectangle
    ///
    /// The point is treated as the center of the bounds.
    pub fn to_bounds(self, size: Size) -> Bounds {
        Bounds::new_from_center(self, size)
    }

    /// Approximate equality within [`EPSILON`] on both axes
    pub fn approx_eq(self, other: Point) -> bool {
        (self.x - other.x).abs() <= EPSILON && (self.y - other.y).abs() <= EPSILON
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns a new Size with the maximum width and height between this size and another
    pub fn max(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    /// Returns the shorter of the two sides
    pub fn min_side(self) -> f32 {
        self.width.min(self.height)
    }

    /// Multiplies both dimension by the given factor
    pub fn scale(self, factor: f32) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    /// A size is degenerate when either side is zero, negative or not finite
    pub fn is_degenerate(self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from a center point and a size
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;
        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
        }
    }

    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Smallest bounds containing every point, or `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        points.into_iter().fold(None, |acc: Option<Bounds>, p| {
            let single = Bounds::new_from_top_left(p, Size::default());
            Some(match acc {
                Some(b) => b.merge(&single),
                None => single,
            })
        })
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner as a Point
    pub fn min_point(self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    /// Converts bounds to a Size object
    pub fn to_size(self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Merges two bounds into the smallest bounds containing both.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vellum_core::geometry::{Bounds, Point, Size};
    /// let a = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 30.0));
    /// let b = Bounds::new_from_top_left(Point::new(10.0, 40.0), Size::new(120.0, 80.0));
    ///
    /// let combined = a.merge(&b);
    /// assert_eq!(combined.width(), 130.0);
    /// assert_eq!(combined.height(), 120.0);
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Moves the bounds by the specified offset.
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_y: self.min_y + offset.y,
            max_x: self.max_x + offset.x,
            max_y: self.max_y + offset.y,
        }
    }

    /// Whether the point lies inside or on the border
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Whether the two bounds overlap (touching counts as overlap)
    pub fn intersects(&self, other: &Self) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }
}

/// A 2D affine transform.
///
/// Maps `(x, y)` to `(a·x + c·y + e, b·x + d·y + f)`, the same layout as
/// the SVG `matrix(a b c d e f)` attribute.
///
/// # Examples
///
/// ```
/// # use vellum_core::geometry::{Bounds, Point, Size, Transform};
/// let bounds = Bounds::new_from_top_left(Point::new(10.0, 20.0), Size::new(100.0, 50.0));
/// let t = Transform::for_box(bounds, 0.0, false, false);
///
/// let p = t.apply(Point::new(1.0, 1.0));
/// assert_eq!(p, Point::new(110.0, 70.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub fn translate(dx: f32, dy: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, dx, dy)
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Clockwise rotation (y-down) about `center`.
    pub fn rotate_about(center: Point, degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::translate(center.x, center.y)
            .then_after(Self::new(cos, sin, -sin, cos, 0.0, 0.0))
            .then_after(Self::translate(-center.x, -center.y))
    }

    /// Returns `self ∘ inner`: the result applies `inner` first, then `self`.
    pub fn then_after(self, inner: Transform) -> Self {
        Self {
            a: self.a * inner.a + self.c * inner.b,
            b: self.b * inner.a + self.d * inner.b,
            c: self.a * inner.c + self.c * inner.d,
            d: self.b * inner.c + self.d * inner.d,
            e: self.a * inner.e + self.c * inner.f + self.e,
            f: self.b * inner.e + self.d * inner.f + self.f,
        }
    }

    /// Maps a unit-square outline onto an absolute box.
    ///
    /// The flip happens in unit space about the square's center, then the
    /// square is scaled and translated onto `bounds`, then the result is
    /// rotated clockwise by `rotation` degrees about the box center.
    pub fn for_box(bounds: Bounds, rotation: f32, flip_h: bool, flip_v: bool) -> Self {
        let flip = Self::new(
            if flip_h { -1.0 } else { 1.0 },
            0.0,
            0.0,
            if flip_v { -1.0 } else { 1.0 },
            if flip_h { 1.0 } else { 0.0 },
            if flip_v { 1.0 } else { 0.0 },
        );
        let place = Self::new(
            bounds.width(),
            0.0,
            0.0,
            bounds.height(),
            bounds.min_x(),
            bounds.min_y(),
        );
        let placed = place.then_after(flip);
        if rotation == 0.0 {
            placed
        } else {
            Self::rotate_about(bounds.center(), rotation).then_after(placed)
        }
    }

    /// The linear part of [`Transform::for_box`] without the box scale:
    /// flip, then rotate. Maps pixel offsets from the unrotated local
    /// frame into page space.
    pub fn orientation(rotation: f32, flip_h: bool, flip_v: bool) -> Self {
        let flip = Self::scale(
            if flip_h { -1.0 } else { 1.0 },
            if flip_v { -1.0 } else { 1.0 },
        );
        Self::rotate_about(Point::default(), rotation).then_after(flip)
    }

    /// Applies the transform to a point
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// Applies only the linear part (no translation), for direction vectors
    pub fn apply_vector(&self, v: Point) -> Point {
        Point::new(self.a * v.x + self.c * v.y, self.b * v.x + self.d * v.y)
    }

    /// Determinant of the linear part; negative when the transform mirrors
    pub fn determinant(&self) -> f32 {
        self.a * self.d - self.b * self.c
    }

    /// Returns the inverse transform, or `None` when the transform is singular.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() < f32::EPSILON {
            return None;
        }
        let inv = 1.0 / det;
        let a = self.d * inv;
        let b = -self.b * inv;
        let c = -self.c * inv;
        let d = self.a * inv;
        Some(Self {
            a,
            b,
            c,
            d,
            e: -(a * self.e + c * self.f),
            f: -(b * self.e + d * self.f),
        })
    }

    /// The matrix entries in SVG order `[a, b, c, d, e, f]`
    pub fn to_array(&self) -> [f32; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_point_new() {
        let point = Point::new(3.5, 4.2);
        assert_eq!(point.x(), 3.5);
        assert_eq!(point.y(), 4.2);
    }

    #[test]
    fn test_point_default_is_zero() {
        assert!(Point::default().is_zero());
        assert!(!Point::new(1.0, 0.0).is_zero());
    }

    #[test]
    fn test_point_add_sub() {
        let p1 = Point::new(5.0, 8.0);
        let p2 = Point::new(2.0, 3.0);
        assert_eq!(p1.add_point(p2), Point::new(7.0, 11.0));
        assert_eq!(p1.sub_point(p2), Point::new(3.0, 5.0));
    }

    #[test]
    fn test_point_hypot_and_distance() {
        assert_eq!(Point::new(3.0, 4.0).hypot(), 5.0);
        assert_eq!(Point::new(1.0, 1.0).distance(Point::new(4.0, 5.0)), 5.0);
    }

    #[test]
    fn test_point_lerp() {
        let p = Point::new(0.0, 0.0).lerp(Point::new(10.0, 20.0), 0.25);
        assert_eq!(p, Point::new(2.5, 5.0));
    }

    #[test]
    fn test_point_normalize() {
        let n = Point::new(3.0, 4.0).normalize();
        assert_approx_eq!(f32, n.x(), 0.6);
        assert_approx_eq!(f32, n.y(), 0.8);

        assert!(Point::new(0.0, 0.0).normalize().is_zero());
    }

    #[test]
    fn test_point_dot_cross() {
        let a = Point::new(1.0, 0.0);
        let b = Point::new(0.0, 1.0);
        assert_eq!(a.dot(b), 0.0);
        assert_eq!(a.cross(b), 1.0);
        assert_eq!(b.cross(a), -1.0);
    }

    #[test]
    fn test_point_rotate_about_is_clockwise() {
        // On screen (y-down) a clockwise quarter turn maps east to south.
        let p = Point::new(1.0, 0.0).rotate_about(Point::default(), 90.0);
        assert_approx_eq!(f32, p.x(), 0.0, epsilon = 1e-6);
        assert_approx_eq!(f32, p.y(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_size_degenerate() {
        assert!(!Size::new(10.0, 5.0).is_degenerate());
        assert!(Size::new(0.0, 5.0).is_degenerate());
        assert!(Size::new(5.0, -1.0).is_degenerate());
        assert!(Size::new(f32::NAN, 5.0).is_degenerate());
        assert_eq!(Size::new(10.0, 5.0).min_side(), 5.0);
    }

    #[test]
    fn test_bounds_new_from_center() {
        let center = Point::new(50.0, 60.0);
        let bounds = Bounds::new_from_center(center, Size::new(20.0, 30.0));

        assert_eq!(bounds.min_x(), 40.0);
        assert_eq!(bounds.min_y(), 45.0);
        assert_eq!(bounds.max_x(), 60.0);
        assert_eq!(bounds.max_y(), 75.0);
        assert_eq!(bounds.center(), center);
    }

    #[test]
    fn test_bounds_from_points() {
        assert!(Bounds::from_points(Vec::<Point>::new()).is_none());

        let bounds = Bounds::from_points([
            Point::new(5.0, 1.0),
            Point::new(-3.0, 4.0),
            Point::new(2.0, 9.0),
        ])
        .unwrap();
        assert_eq!(bounds.min_point(), Point::new(-3.0, 1.0));
        assert_eq!(bounds.max_x(), 5.0);
        assert_eq!(bounds.max_y(), 9.0);
    }

    #[test]
    fn test_bounds_contains_and_intersects() {
        let a = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        let b = Bounds::new_from_top_left(Point::new(10.0, 5.0), Size::new(10.0, 10.0));
        let c = Bounds::new_from_top_left(Point::new(30.0, 30.0), Size::new(1.0, 1.0));

        assert!(a.contains_point(Point::new(10.0, 10.0)));
        assert!(!a.contains_point(Point::new(10.1, 10.0)));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_transform_for_box_plain() {
        let bounds = Bounds::new_from_top_left(Point::new(10.0, 20.0), Size::new(100.0, 50.0));
        let t = Transform::for_box(bounds, 0.0, false, false);

        assert_eq!(t.apply(Point::new(0.0, 0.0)), Point::new(10.0, 20.0));
        assert_eq!(t.apply(Point::new(0.5, 0.5)), Point::new(60.0, 45.0));
    }

    #[test]
    fn test_transform_for_box_flip() {
        let bounds = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 50.0));
        let t = Transform::for_box(bounds, 0.0, true, false);

        // The unit-space left edge lands on the box's right edge.
        assert_eq!(t.apply(Point::new(0.0, 0.25)), Point::new(100.0, 12.5));
        assert!(t.determinant() < 0.0);
    }

    #[test]
    fn test_transform_for_box_rotation() {
        let bounds = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 50.0));
        let t = Transform::for_box(bounds, 90.0, false, false);

        // The right-edge midpoint turns to the bottom of the rotated box.
        let p = t.apply(Point::new(1.0, 0.5));
        assert_approx_eq!(f32, p.x(), 50.0, epsilon = 1e-3);
        assert_approx_eq!(f32, p.y(), 75.0, epsilon = 1e-3);

        // The center is a fixed point of the rotation.
        let c = t.apply(Point::new(0.5, 0.5));
        assert_approx_eq!(f32, c.x(), 50.0, epsilon = 1e-3);
        assert_approx_eq!(f32, c.y(), 25.0, epsilon = 1e-3);
    }

    #[test]
    fn test_transform_inverse_singular() {
        assert!(Transform::scale(0.0, 1.0).inverse().is_none());
        assert!(Transform::scale(2.0, 1.0).inverse().is_some());
    }
}

#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (
            -1000.0f32..1000.0,
            -1000.0f32..1000.0,
            1.0f32..500.0,
            1.0f32..500.0,
        )
            .prop_map(|(x, y, w, h)| Bounds::new_from_top_left(Point::new(x, y), Size::new(w, h)))
    }

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn unit_point_strategy() -> impl Strategy<Value = Point> {
        (0.0f32..=1.0, 0.0f32..=1.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn rotation_strategy() -> impl Strategy<Value = f32> {
        0.0f32..360.0
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Point addition should be commutative: p1 + p2 == p2 + p1.
    fn check_point_add_is_commutative(p1: Point, p2: Point) -> Result<(), TestCaseError> {
        let result1 = p1.add_point(p2);
        let result2 = p2.add_point(p1);

        prop_assert!(approx_eq!(f32, result1.x(), result2.x()));
        prop_assert!(approx_eq!(f32, result1.y(), result2.y()));
        Ok(())
    }

    /// Rotation preserves the distance from the rotation center.
    fn check_rotation_preserves_distance(
        p: Point,
        center: Point,
        degrees: f32,
    ) -> Result<(), TestCaseError> {
        let before = p.distance(center);
        let after = p.rotate_about(center, degrees).distance(center);

        prop_assert!(approx_eq!(f32, before, after, epsilon = 0.05));
        Ok(())
    }

    /// Applying a box transform then its inverse returns the original unit point.
    fn check_box_transform_inverse_roundtrip(
        bounds: Bounds,
        rotation: f32,
        flip_h: bool,
        flip_v: bool,
        p: Point,
    ) -> Result<(), TestCaseError> {
        let t = Transform::for_box(bounds, rotation, flip_h, flip_v);
        let inv = t.inverse();
        prop_assert!(inv.is_some());
        let back = inv.map(|inv| inv.apply(t.apply(p))).unwrap_or_default();

        prop_assert!(approx_eq!(f32, back.x(), p.x(), epsilon = 0.01));
        prop_assert!(approx_eq!(f32, back.y(), p.y(), epsilon = 0.01));
        Ok(())
    }

    /// The box center is a fixed point of every rotation and flip.
    fn check_box_transform_keeps_center(
        bounds: Bounds,
        rotation: f32,
        flip_h: bool,
        flip_v: bool,
    ) -> Result<(), TestCaseError> {
        let t = Transform::for_box(bounds, rotation, flip_h, flip_v);
        let c = t.apply(Point::new(0.5, 0.5));

        prop_assert!(approx_eq!(f32, c.x(), bounds.center().x(), epsilon = 0.01));
        prop_assert!(approx_eq!(f32, c.y(), bounds.center().y(), epsilon = 0.01));
        Ok(())
    }

    /// Merged bounds should contain both original bounds.
    fn check_bounds_merge_contains_both(b1: Bounds, b2: Bounds) -> Result<(), TestCaseError> {
        let merged = b1.merge(&b2);

        prop_assert!(merged.contains_point(b1.min_point()));
        prop_assert!(merged.contains_point(b2.min_point()));
        prop_assert!(merged.max_x() >= b1.max_x() && merged.max_x() >= b2.max_x());
        prop_assert!(merged.max_y() >= b1.max_y() && merged.max_y() >= b2.max_y());
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn point_add_is_commutative(p1 in point_strategy(), p2 in point_strategy()) {
            check_point_add_is_commutative(p1, p2)?;
        }

        #[test]
        fn rotation_preserves_distance(p in point_strategy(), center in point_strategy(), degrees in rotation_strategy()) {
            check_rotation_preserves_distance(p, center, degrees)?;
        }

        #[test]
        fn box_transform_inverse_roundtrip(
            bounds in bounds_strategy(),
            rotation in rotation_strategy(),
            flip_h in any::<bool>(),
            flip_v in any::<bool>(),
            p in unit_point_strategy(),
        ) {
            check_box_transform_inverse_roundtrip(bounds, rotation, flip_h, flip_v, p)?;
        }

        #[test]
        fn box_transform_keeps_center(
            bounds in bounds_strategy(),
            rotation in rotation_strategy(),
            flip_h in any::<bool>(),
            flip_v in any::<bool>(),
        ) {
            check_box_transform_keeps_center(bounds, rotation, flip_h, flip_v)?;
        }

        #[test]
        fn bounds_merge_contains_both(b1 in bounds_strategy(), b2 in bounds_strategy()) {
            check_bounds_merge_contains_both(b1, b2)?;
        }
    }
}
