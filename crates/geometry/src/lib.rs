//! Geometry primitives for the qtree spatial index.
//!
//! This crate contains:
//! - `Vector`, a 2D vector that can be tagged as a point
//! - `Aabb`, an axis-aligned bounding box with containment/overlap tests
//! - `Position`, the point-or-box key entries are stored under

mod aabb;
mod error;
mod position;
mod vector;

pub use aabb::Aabb;
pub use error::GeometryError;
pub use position::Position;
pub use vector::{Axis, Kind, Operand, Vector, DEFAULT_PRECISION};
