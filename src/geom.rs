//! Pure 2D geometry: points, affine transforms, and axis-aligned rectangles.
//!
//! Three coordinate spaces flow through the engine and every API names the one
//! it expects:
//!
//! - **client**: CSS pixels as reported by pointer events.
//! - **view**: the space inside the pannable/zoomable group (the page image).
//! - **local**: a span's own space, mapped to view space by its transform.
//!
//! The host supplies the client mapping as a *screen* transform (surface → client);
//! the viewport transform maps view → surface.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

use crate::consts::SINGULAR_EPSILON;
use crate::error::EditorError;

/// A point (or vector) in whichever space the surrounding API names.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Component-wise difference `self - other`.
    #[must_use]
    pub fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    /// Component-wise sum.
    #[must_use]
    pub fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    /// Point halfway between `self` and `other`.
    #[must_use]
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }
}

/// A 2D affine map with SVG/DOMMatrix coefficient layout:
///
/// ```text
/// x' = a·x + c·y + e
/// y' = b·x + d·y + f
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    #[must_use]
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    #[must_use]
    pub fn translate(dx: f64, dy: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, dx, dy)
    }

    #[must_use]
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Clockwise rotation in screen coordinates (y down), in degrees.
    #[must_use]
    pub fn rotate_deg(deg: f64) -> Self {
        let (sin, cos) = deg.to_radians().sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// `m` applied about `origin`: `translate(origin) ∘ m ∘ translate(-origin)`.
    #[must_use]
    pub fn about(origin: Point, m: Affine) -> Self {
        Self::translate(origin.x, origin.y)
            .compose(&m)
            .compose(&Self::translate(-origin.x, -origin.y))
    }

    /// `self ∘ other`: the map that applies `other` first, then `self`.
    #[must_use]
    pub fn compose(&self, other: &Affine) -> Affine {
        Affine {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    #[must_use]
    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// The inverse map.
    ///
    /// # Errors
    ///
    /// [`EditorError::SingularTransform`] when `|det| < 1e-9`.
    pub fn invert(&self) -> Result<Affine, EditorError> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < SINGULAR_EPSILON {
            return Err(EditorError::SingularTransform { det });
        }
        Ok(Affine {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }

    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        Point::new(self.a * p.x + self.c * p.y + self.e, self.b * p.x + self.d * p.y + self.f)
    }

    /// Apply only the linear part, for deltas and directions.
    #[must_use]
    pub fn apply_vector(&self, v: Point) -> Point {
        Point::new(self.a * v.x + self.c * v.y, self.b * v.x + self.d * v.y)
    }

    /// Uniform scale magnitude `sqrt(a² + b²)`. Assumes no shear, which holds for
    /// every transform this crate builds.
    #[must_use]
    pub fn scale_factor(&self) -> f64 {
        self.a.hypot(self.b)
    }

    /// [`Self::scale_factor`], rejecting zero so callers can divide by it.
    ///
    /// # Errors
    ///
    /// [`EditorError::SingularTransform`] when the scale is (near) zero.
    pub fn checked_scale_factor(&self) -> Result<f64, EditorError> {
        let scale = self.scale_factor();
        if !scale.is_finite() || scale < SINGULAR_EPSILON {
            return Err(EditorError::SingularTransform { det: self.determinant() });
        }
        Ok(scale)
    }

    /// Coefficient-wise comparison within `eps`.
    #[must_use]
    pub fn approx_eq(&self, other: &Affine, eps: f64) -> bool {
        [
            (self.a, other.a),
            (self.b, other.b),
            (self.c, other.c),
            (self.d, other.d),
            (self.e, other.e),
            (self.f, other.f),
        ]
        .iter()
        .all(|(l, r)| (l - r).abs() <= eps)
    }

    /// SVG `transform` attribute value.
    #[must_use]
    pub fn to_svg(&self) -> String {
        format!("matrix({} {} {} {} {} {})", self.a, self.b, self.c, self.d, self.e, self.f)
    }
}

/// Free-function form of [`Affine::compose`].
#[must_use]
pub fn compose(a: &Affine, b: &Affine) -> Affine {
    a.compose(b)
}

/// Free-function form of [`Affine::invert`].
///
/// # Errors
///
/// [`EditorError::SingularTransform`] for degenerate transforms.
pub fn invert(a: &Affine) -> Result<Affine, EditorError> {
    a.invert()
}

/// Free-function form of [`Affine::apply`].
#[must_use]
pub fn apply(a: &Affine, p: Point) -> Point {
    a.apply(p)
}

/// Axis-aligned rectangle. `width` and `height` are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_corners(Point::new(x, y), Point::new(x + width, y + height))
    }

    /// Smallest rectangle containing both corners, in any order.
    #[must_use]
    pub fn from_corners(p: Point, q: Point) -> Self {
        let x = p.x.min(q.x);
        let y = p.y.min(q.y);
        Self { x, y, width: (p.x - q.x).abs(), height: (p.y - q.y).abs() }
    }

    /// Bounding box of a point set; `None` when empty.
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| {
            (Point::new(min.x.min(p.x), min.y.min(p.y)), Point::new(max.x.max(p.x), max.y.max(p.y)))
        });
        Some(Self::from_corners(min, max))
    }

    #[must_use]
    pub fn left(&self) -> f64 {
        self.x
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn top(&self) -> f64 {
        self.y
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.left(), self.top()),
            Point::new(self.right(), self.top()),
            Point::new(self.right(), self.bottom()),
            Point::new(self.left(), self.bottom()),
        ]
    }

    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::from_corners(
            Point::new(self.left().min(other.left()), self.top().min(other.top())),
            Point::new(self.right().max(other.right()), self.bottom().max(other.bottom())),
        )
    }

    /// Axis-aligned bounds of this rectangle after mapping all four corners through `m`.
    #[must_use]
    pub fn transformed(&self, m: &Affine) -> Rect {
        let [p0, p1, p2, p3] = self.corners().map(|p| m.apply(p));
        let min = Point::new(p0.x.min(p1.x).min(p2.x).min(p3.x), p0.y.min(p1.y).min(p2.y).min(p3.y));
        let max = Point::new(p0.x.max(p1.x).max(p2.x).max(p3.x), p0.y.max(p1.y).max(p2.y).max(p3.y));
        Rect::from_corners(min, max)
    }

    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// SVG path data outlining this rectangle.
    #[must_use]
    pub fn to_path_data(&self) -> String {
        format!("M{},{} h{} v{} h{}Z", self.x, self.y, self.width, self.height, -self.width)
    }
}

/// Separating-axis overlap test; touching edges count as overlapping.
#[must_use]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    !(a.top() > b.bottom() || a.right() < b.left() || a.bottom() < b.top() || a.left() > b.right())
}
