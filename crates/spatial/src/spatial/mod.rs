//! Spatial indexing utilities.
//!
//! A region quadtree that subdivides lazily and stores each entry at the
//! deepest node that alone contains it.

mod quadrants;
mod quadtree;

pub use quadrants::{Quadrant, Quadrants};
pub use quadtree::{Iter, QuadTree, DEFAULT_MAX_DEPTH};
