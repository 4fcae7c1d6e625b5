//! Region quadtree spatial index.
//!
//! Objects are registered at a point or a box and later retrieved by any
//! point or box query, without scanning every stored object.

pub mod config;
mod error;
pub mod spatial;

pub use config::{Config, TreeConfig};
pub use error::SpatialError;
pub use spatial::{Iter, QuadTree, Quadrant, Quadrants, DEFAULT_MAX_DEPTH};

// Re-export the geometry primitives used in the public API
pub use geometry::{Aabb, GeometryError, Position, Vector};
