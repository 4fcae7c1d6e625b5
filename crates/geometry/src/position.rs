//! Point-or-box position entries are stored under.

use std::fmt;

use crate::{Aabb, Vector};

/// Where an object sits: a single point or a box.
#[derive(Debug, Clone, PartialEq)]
pub enum Position {
    Point(Vector),
    Box(Aabb),
}

impl Position {
    #[inline]
    pub fn is_box(&self) -> bool {
        matches!(self, Position::Box(_))
    }

    #[inline]
    pub fn is_point(&self) -> bool {
        matches!(self, Position::Point(_))
    }

    pub fn as_point(&self) -> Option<&Vector> {
        match self {
            Position::Point(p) => Some(p),
            Position::Box(_) => None,
        }
    }

    pub fn as_box(&self) -> Option<&Aabb> {
        match self {
            Position::Box(b) => Some(b),
            Position::Point(_) => None,
        }
    }

    /// Any coordinate is NaN. Such a position cannot be stored or found.
    pub fn is_nan(&self) -> bool {
        match self {
            Position::Point(p) => p.x().is_nan() || p.y().is_nan(),
            Position::Box(b) => b.is_nan(),
        }
    }

    /// Tight bounds; a point yields a zero-area box.
    pub fn bounds(&self) -> Aabb {
        match self {
            Position::Point(p) => Aabb::from_points(p, p),
            Position::Box(b) => *b,
        }
    }

    /// Bounds used to prune a search for this position.
    ///
    /// Points are inflated by their precision so that a stored point just
    /// across a region edge is still reached.
    pub fn search_bounds(&self) -> Aabb {
        match self {
            Position::Point(p) => Aabb::around(p, p.precision()),
            Position::Box(b) => *b,
        }
    }

    /// Whether an entry stored at `self` satisfies `query`.
    ///
    /// Two points match when they are approximately equal within the
    /// query's precision. Otherwise `overlap` selects boundary-inclusive
    /// tests, and its absence requires shared interior.
    pub fn matches(&self, query: &Position, overlap: bool) -> bool {
        match (self, query) {
            (Position::Point(stored), Position::Point(q)) => q.almost_equal(stored),
            (stored, Position::Box(q)) => {
                if overlap {
                    q.touches(stored)
                } else {
                    q.overlaps(stored)
                }
            }
            (Position::Box(stored), Position::Point(q)) => {
                if overlap {
                    stored.contains_point(q)
                } else {
                    stored.contains_point_strictly(q)
                }
            }
        }
    }
}

impl From<Vector> for Position {
    fn from(v: Vector) -> Self {
        if v.is_point() {
            Position::Point(v)
        } else {
            Position::Point(v.as_point())
        }
    }
}

impl From<&Vector> for Position {
    fn from(v: &Vector) -> Self {
        Position::Point(v.as_point())
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Position::Point(Vector::point(x, y))
    }
}

impl From<[f64; 2]> for Position {
    fn from([x, y]: [f64; 2]) -> Self {
        Position::Point(Vector::point(x, y))
    }
}

impl From<Aabb> for Position {
    fn from(b: Aabb) -> Self {
        Position::Box(b)
    }
}

impl From<&Aabb> for Position {
    fn from(b: &Aabb) -> Self {
        Position::Box(*b)
    }
}

impl From<(f64, f64, f64, f64)> for Position {
    fn from(corners: (f64, f64, f64, f64)) -> Self {
        Position::Box(Aabb::from(corners))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Point(p) => p.fmt(f),
            Position::Box(b) => b.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions_tag_points() {
        let pos = Position::from(Vector::new(0.5, 0.5));
        assert!(pos.as_point().is_some_and(Vector::is_point));
        assert!(Position::from((0.1, 0.1, 0.2, 0.2)).is_box());
        assert_eq!(Position::from((0.3, 0.4)).bounds(), Aabb::new(0.3, 0.4, 0.3, 0.4));
    }

    #[test]
    fn test_nan_positions() {
        assert!(Position::from((f64::NAN, 0.5)).is_nan());
        assert!(Position::from(Aabb::new(0.0, 0.1, 0.2, f64::NAN)).is_nan());
        assert!(!Position::from((0.0, 0.5)).is_nan());
        assert!(!Position::from(Aabb::unit()).is_nan());
    }

    #[test]
    fn test_point_matches_point_within_precision() {
        let stored = Position::from((0.7, 0.2));
        assert!(stored.matches(&Position::from((0.7 + 1e-7, 0.2)), false));
        assert!(stored.matches(&Position::from((0.7, 0.2 - 1e-7)), true));
        assert!(!stored.matches(&Position::from((0.7 + 1e-5, 0.2)), true));
    }

    #[test]
    fn test_box_query_strict_and_inclusive() {
        let stored = Position::from((0.1, 0.1, 0.2, 0.2));
        let inner = Position::from((0.11, 0.11, 0.19, 0.19));
        let adjacent = Position::from((0.2, 0.1, 0.3, 0.2));

        assert!(stored.matches(&inner, false));
        assert!(!stored.matches(&adjacent, false));
        assert!(stored.matches(&adjacent, true));

        let edge_point = Position::from((0.2, 0.15));
        assert!(!edge_point.matches(&stored, false));
        assert!(edge_point.matches(&stored, true));
    }

    #[test]
    fn test_point_query_against_box() {
        let stored = Position::from((0.0, 0.0, 1.0, 1.0));
        assert!(stored.matches(&Position::from((0.5, 0.5)), false));
        assert!(!stored.matches(&Position::from((1.0, 0.5)), false));
        assert!(stored.matches(&Position::from((1.0, 0.5)), true));
    }

    #[test]
    fn test_search_bounds_inflates_points() {
        let p = Position::from((0.5, 0.5));
        let bounds = p.search_bounds();
        assert!(bounds.width() > 0.0);
        assert!(bounds.contains_point(&Vector::point(0.5 + 5e-7, 0.5)));
    }
}
