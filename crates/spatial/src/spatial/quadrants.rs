//! The four sub-quadrants of a region.

use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use geometry::Aabb;

use crate::SpatialError;

/// Quadrant position, in child order.
///
/// "Upper" is the half with the smaller y (screen coordinates).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    UpperLeft = 0,
    UpperRight = 1,
    LowerLeft = 2,
    LowerRight = 3,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::UpperLeft,
        Quadrant::UpperRight,
        Quadrant::LowerLeft,
        Quadrant::LowerRight,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Short name: `ul`, `ur`, `dl` or `dr`.
    pub fn name(self) -> &'static str {
        match self {
            Quadrant::UpperLeft => "ul",
            Quadrant::UpperRight => "ur",
            Quadrant::LowerLeft => "dl",
            Quadrant::LowerRight => "dr",
        }
    }
}

impl TryFrom<usize> for Quadrant {
    type Error = SpatialError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Quadrant::ALL
            .get(index)
            .copied()
            .ok_or_else(|| SpatialError::UnknownQuadrant(index.to_string()))
    }
}

impl FromStr for Quadrant {
    type Err = SpatialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Quadrant::ALL
            .into_iter()
            .find(|q| q.name() == s)
            .ok_or_else(|| SpatialError::UnknownQuadrant(s.to_string()))
    }
}

/// A region split at its center into four equal boxes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadrants([Aabb; 4]);

impl Quadrants {
    pub fn new(region: &Aabb) -> Self {
        let center = region.center();
        let (cx, cy) = (center.x(), center.y());
        let (min_x, min_y, max_x, max_y) = region.as_tuple();
        Self([
            Aabb::new(min_x, min_y, cx, cy),
            Aabb::new(cx, min_y, max_x, cy),
            Aabb::new(min_x, cy, cx, max_y),
            Aabb::new(cx, cy, max_x, max_y),
        ])
    }

    #[inline]
    pub fn get(&self, quadrant: Quadrant) -> &Aabb {
        &self.0[quadrant.index()]
    }

    /// Quadrant box by index `0..=3`.
    pub fn by_index(&self, index: usize) -> Result<&Aabb, SpatialError> {
        Ok(self.get(Quadrant::try_from(index)?))
    }

    /// Quadrant box by short name.
    pub fn by_name(&self, name: &str) -> Result<&Aabb, SpatialError> {
        Ok(self.get(name.parse()?))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Quadrant, &Aabb)> {
        Quadrant::ALL.into_iter().zip(self.0.iter())
    }

    pub fn into_array(self) -> [Aabb; 4] {
        self.0
    }
}

impl Index<Quadrant> for Quadrants {
    type Output = Aabb;

    fn index(&self, quadrant: Quadrant) -> &Aabb {
        self.get(quadrant)
    }
}

impl fmt::Display for Quadrants {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [ul, ur, dl, dr] = &self.0;
        write!(f, "Quadrants({ul}, {ur}, {dl}, {dr})")
    }
}
