//! Axis-aligned bounding box.

use std::fmt;
use std::ops::Index;

use crate::{GeometryError, Position, Vector};

/// Closed axis-aligned rectangle.
///
/// Corners are normalized on construction so `min <= max` on both axes.
/// A NaN corner coordinate makes the whole axis NaN; such a box contains,
/// touches and overlaps nothing. Use [`Aabb::try_new`] to reject it instead.
/// Tests against other boxes and points come in four strengths:
///
/// | method               | box vs box                      | box vs point            |
/// |----------------------|---------------------------------|-------------------------|
/// | `contains`           | other inside, edges may touch   | inside or on the edge   |
/// | `contains_strictly`  | other inside, no shared edges   | strictly inside         |
/// | `touches`            | share any area or boundary      | inside or on the edge   |
/// | `overlaps`           | share interior area             | strictly inside         |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Aabb {
    /// Create a box from two opposite corners given as coordinates.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        let (min_x, max_x) = ordered(x0, x1);
        let (min_y, max_y) = ordered(y0, y1);
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Create a box, rejecting NaN coordinates.
    pub fn try_new(x0: f64, y0: f64, x1: f64, y1: f64) -> Result<Self, GeometryError> {
        if [x0, y0, x1, y1].iter().any(|v| v.is_nan()) {
            return Err(GeometryError::NotNumeric);
        }
        Ok(Self::new(x0, y0, x1, y1))
    }

    /// Create a box from two opposite corners.
    pub fn from_corners(a: (f64, f64), b: (f64, f64)) -> Self {
        Self::new(a.0, a.1, b.0, b.1)
    }

    pub fn from_points(a: &Vector, b: &Vector) -> Self {
        Self::new(a.x(), a.y(), b.x(), b.y())
    }

    /// The unit square `(0, 0, 1, 1)`.
    pub fn unit() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    /// Square box centered on `center` extending `half_extent` each way.
    pub fn around(center: &Vector, half_extent: f64) -> Self {
        let h = half_extent.abs();
        Self::new(center.x() - h, center.y() - h, center.x() + h, center.y() + h)
    }

    #[inline]
    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    #[inline]
    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    #[inline]
    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    #[inline]
    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    /// Any coordinate is NaN.
    #[inline]
    pub fn is_nan(&self) -> bool {
        self.to_array().iter().any(|v| v.is_nan())
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Geometric center, as a point.
    pub fn center(&self) -> Vector {
        Vector::point(
            (self.max_x - self.min_x) / 2.0 + self.min_x,
            (self.max_y - self.min_y) / 2.0 + self.min_y,
        )
    }

    /// `(min_x, min_y, max_x, max_y)`.
    #[inline]
    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (self.min_x, self.min_y, self.max_x, self.max_y)
    }

    #[inline]
    pub fn to_array(&self) -> [f64; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }

    /// Coordinate by index in `as_tuple` order.
    pub fn get(&self, index: usize) -> Result<f64, GeometryError> {
        self.to_array()
            .get(index)
            .copied()
            .ok_or_else(|| GeometryError::IndexOutOfRange(index.to_string()))
    }

    /// Smallest box enclosing both boxes.
    #[must_use]
    pub fn union(&self, other: &Aabb) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    #[inline]
    pub fn contains_box(&self, other: &Aabb) -> bool {
        self.min_x <= other.min_x
            && self.min_y <= other.min_y
            && self.max_x >= other.max_x
            && self.max_y >= other.max_y
    }

    #[inline]
    pub fn contains_box_strictly(&self, other: &Aabb) -> bool {
        self.min_x < other.min_x
            && self.min_y < other.min_y
            && self.max_x > other.max_x
            && self.max_y > other.max_y
    }

    #[inline]
    pub fn contains_point(&self, p: &Vector) -> bool {
        self.min_x <= p.x() && p.x() <= self.max_x && self.min_y <= p.y() && p.y() <= self.max_y
    }

    #[inline]
    pub fn contains_point_strictly(&self, p: &Vector) -> bool {
        self.min_x < p.x() && p.x() < self.max_x && self.min_y < p.y() && p.y() < self.max_y
    }

    /// Boxes share any area or boundary.
    #[inline]
    pub fn touches_box(&self, other: &Aabb) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    /// Boxes share interior area; touching edges do not count.
    #[inline]
    pub fn overlaps_box(&self, other: &Aabb) -> bool {
        self.min_x < other.max_x
            && other.min_x < self.max_x
            && self.min_y < other.max_y
            && other.min_y < self.max_y
    }

    /// `position` lies within this box or on its boundary.
    pub fn contains(&self, position: &Position) -> bool {
        match position {
            Position::Point(p) => self.contains_point(p),
            Position::Box(b) => self.contains_box(b),
        }
    }

    /// `position` lies within this box without touching its boundary.
    pub fn contains_strictly(&self, position: &Position) -> bool {
        match position {
            Position::Point(p) => self.contains_point_strictly(p),
            Position::Box(b) => self.contains_box_strictly(b),
        }
    }

    /// `position` shares any area or boundary with this box.
    pub fn touches(&self, position: &Position) -> bool {
        match position {
            Position::Point(p) => self.contains_point(p),
            Position::Box(b) => self.touches_box(b),
        }
    }

    /// `position` shares interior area with this box.
    pub fn overlaps(&self, position: &Position) -> bool {
        match position {
            Position::Point(p) => self.contains_point_strictly(p),
            Position::Box(b) => self.overlaps_box(b),
        }
    }
}

impl From<(f64, f64, f64, f64)> for Aabb {
    fn from((x0, y0, x1, y1): (f64, f64, f64, f64)) -> Self {
        Self::new(x0, y0, x1, y1)
    }
}

impl From<[f64; 4]> for Aabb {
    fn from([x0, y0, x1, y1]: [f64; 4]) -> Self {
        Self::new(x0, y0, x1, y1)
    }
}

impl TryFrom<&[f64]> for Aabb {
    type Error = GeometryError;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        match *values {
            [x0, y0, x1, y1] => Self::try_new(x0, y0, x1, y1),
            _ => Err(GeometryError::InvalidLength {
                expected: 4,
                found: values.len(),
            }),
        }
    }
}

/// `(min, max)` of two coordinates; NaN if either is.
fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a.is_nan() || b.is_nan() {
        (f64::NAN, f64::NAN)
    } else {
        (a.min(b), a.max(b))
    }
}

/// Coordinate in `as_tuple` order.
///
/// # Panics
///
/// Panics if `index` is greater than 3. Use [`Aabb::get`] for a checked
/// lookup returning [`GeometryError::IndexOutOfRange`].
impl Index<usize> for Aabb {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        match index {
            0 => &self.min_x,
            1 => &self.min_y,
            2 => &self.max_x,
            3 => &self.max_y,
            _ => panic!("invalid index {index} for Aabb"),
        }
    }
}

impl fmt::Display for Aabb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AABB({}, {}, {}, {})",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_corners() {
        let b = Aabb::new(1.0, 2.0, -1.0, 0.0);
        assert_eq!(b.as_tuple(), (-1.0, 0.0, 1.0, 2.0));
        assert_eq!(Aabb::from_corners((1.0, 1.0), (0.0, 0.0)), Aabb::unit());
        assert_eq!(b.width(), 2.0);
        assert_eq!(b.area(), 4.0);
        assert_eq!(b.center(), Vector::point(0.0, 1.0));
    }

    #[test]
    fn test_box_predicates() {
        let a = Aabb::new(0.0, 0.0, 1.0, 1.0);
        let b = Aabb::new(0.1, 0.1, 0.9, 0.9);
        let c = Aabb::new(0.1, 0.1, 1.0, 1.0);
        let d = Aabb::new(-0.5, -0.5, 0.5, 0.5);
        let e = Aabb::new(1.0, 0.0, 2.0, 1.0);
        let far = Aabb::new(3.0, 3.0, 4.0, 4.0);

        assert!(a.contains_box_strictly(&b));
        assert!(!a.contains_box_strictly(&c));
        assert!(a.contains_box(&c));
        assert!(!a.contains_box(&d));

        assert!(a.overlaps_box(&d));
        assert!(a.touches_box(&d));
        assert!(!a.overlaps_box(&e));
        assert!(a.touches_box(&e));
        assert!(!a.touches_box(&far));
    }

    #[test]
    fn test_cross_shaped_overlap() {
        let wide = Aabb::new(0.0, 0.4, 1.0, 0.6);
        let tall = Aabb::new(0.4, 0.0, 0.6, 1.0);
        assert!(wide.overlaps_box(&tall));
        assert!(tall.touches_box(&wide));
    }

    #[test]
    fn test_point_predicates() {
        let a = Aabb::unit();
        let corner = Position::from((1.0, 1.0));
        let inside = Position::from((1.0 - 1e-7, 1.0 - 1e-7));

        assert!(a.contains(&corner));
        assert!(!a.contains_strictly(&corner));
        assert!(!a.overlaps(&corner));
        assert!(a.touches(&corner));
        assert!(a.overlaps(&inside));
        assert!(!a.touches(&Position::from((1.5, 0.5))));
    }

    #[test]
    fn test_indexing() {
        let b = Aabb::new(0.0, 1.0, 2.0, 3.0);
        assert_eq!(b[2], 2.0);
        assert_eq!(b.get(3).unwrap(), 3.0);
        assert!(matches!(b.get(4), Err(GeometryError::IndexOutOfRange(_))));
        assert_eq!(
            Aabb::try_from(&[0.0, 1.0][..]).unwrap_err(),
            GeometryError::InvalidLength { expected: 4, found: 2 }
        );
    }

    #[test]
    fn test_nan_corner_is_not_coerced() {
        let b = Aabb::new(f64::NAN, 0.1, 0.2, 0.2);
        assert!(b.is_nan());
        assert!(b.min_x().is_nan() && b.max_x().is_nan());
        assert_eq!((b.min_y(), b.max_y()), (0.1, 0.2));
        assert!(!Aabb::unit().contains_box(&b));
        assert!(!Aabb::unit().touches_box(&b));
        assert!(!Aabb::unit().is_nan());

        assert_eq!(Aabb::try_new(0.0, f64::NAN, 1.0, 1.0), Err(GeometryError::NotNumeric));
        assert_eq!(Aabb::try_new(1.0, 1.0, 0.0, 0.0), Ok(Aabb::unit()));
        assert_eq!(
            Aabb::try_from(&[0.0, 0.0, f64::NAN, 1.0][..]),
            Err(GeometryError::NotNumeric)
        );
    }

    #[test]
    #[should_panic(expected = "invalid index")]
    fn test_index_out_of_range_panics() {
        let _ = Aabb::unit()[4];
    }

    #[test]
    fn test_union_and_display() {
        let u = Aabb::new(0.0, 0.0, 1.0, 1.0).union(&Aabb::new(-1.0, 0.5, 0.5, 2.0));
        assert_eq!(u.as_tuple(), (-1.0, 0.0, 1.0, 2.0));
        assert_eq!(Aabb::new(0.0, 0.0, 0.5, 1.0).to_string(), "AABB(0, 0, 0.5, 1)");
    }
}
