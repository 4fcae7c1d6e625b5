//! 2D vector with a cached length and a point/vector tag.
//!
//! Arithmetic keeps the tag of its operands: any expression that involves a
//! point yields a point, so positions stay positions through offsets and
//! scaling without explicit re-casting.

use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Index, Mul, MulAssign, Neg, Sub, SubAssign};
use std::str::FromStr;
use std::sync::OnceLock;

use glam::DVec2;

use crate::GeometryError;

/// Default absolute tolerance for approximate equality.
pub const DEFAULT_PRECISION: f64 = 1e-6;

/// What a [`Vector`] denotes: a displacement or a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Kind {
    #[default]
    Vector,
    Point,
}

impl Kind {
    /// Result tag of an operation between two operands.
    #[inline]
    fn merge(self, other: Option<Kind>) -> Kind {
        if self == Kind::Point || other == Some(Kind::Point) {
            Kind::Point
        } else {
            Kind::Vector
        }
    }
}

/// Component selector for [`Vector::component`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl TryFrom<usize> for Axis {
    type Error = GeometryError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(Axis::X),
            1 => Ok(Axis::Y),
            other => Err(GeometryError::IndexOutOfRange(other.to_string())),
        }
    }
}

impl TryFrom<&str> for Axis {
    type Error = GeometryError;

    fn try_from(key: &str) -> Result<Self, Self::Error> {
        match key {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            other => Err(GeometryError::IndexOutOfRange(other.to_string())),
        }
    }
}

impl FromStr for Axis {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Axis::try_from(s)
    }
}

/// Right-hand side of an additive operation, normalized to two components.
///
/// Scalars are splatted to both axes, pairs and arrays are taken as-is, and
/// vectors carry their tag along so the result can inherit it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Operand {
    xy: DVec2,
    kind: Option<Kind>,
}

impl From<f64> for Operand {
    fn from(v: f64) -> Self {
        Self { xy: DVec2::splat(v), kind: None }
    }
}

impl From<(f64, f64)> for Operand {
    fn from((x, y): (f64, f64)) -> Self {
        Self { xy: DVec2::new(x, y), kind: None }
    }
}

impl From<[f64; 2]> for Operand {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { xy: DVec2::new(x, y), kind: None }
    }
}

impl From<DVec2> for Operand {
    fn from(xy: DVec2) -> Self {
        Self { xy, kind: None }
    }
}

impl From<Vector> for Operand {
    fn from(v: Vector) -> Self {
        Self { xy: v.xy, kind: Some(v.kind) }
    }
}

impl From<&Vector> for Operand {
    fn from(v: &Vector) -> Self {
        Self { xy: v.xy, kind: Some(v.kind) }
    }
}

/// A mutable 2D vector.
///
/// The Euclidean length is computed on first access and memoized until the
/// next mutation. `precision` is the tolerance used by `==` and is fixed when
/// the vector is built.
#[derive(Clone)]
pub struct Vector {
    xy: DVec2,
    precision: f64,
    length: OnceLock<f64>,
    kind: Kind,
}

impl Vector {
    /// Number of components.
    pub const LEN: usize = 2;

    /// Create a vector (a displacement).
    pub fn new(x: f64, y: f64) -> Self {
        Self::with_kind(DVec2::new(x, y), Kind::Vector, DEFAULT_PRECISION)
    }

    /// Create a point (a location).
    pub fn point(x: f64, y: f64) -> Self {
        Self::with_kind(DVec2::new(x, y), Kind::Point, DEFAULT_PRECISION)
    }

    /// Create a vector, rejecting NaN coordinates.
    pub fn try_new(x: f64, y: f64) -> Result<Self, GeometryError> {
        if x.is_nan() || y.is_nan() {
            return Err(GeometryError::NotNumeric);
        }
        Ok(Self::new(x, y))
    }

    /// Same coordinates and tag with a different equality tolerance.
    ///
    /// The sign of `precision` is ignored.
    #[must_use]
    pub fn with_precision(self, precision: f64) -> Self {
        Self::with_kind(self.xy, self.kind, precision.abs())
    }

    #[inline]
    fn with_kind(xy: DVec2, kind: Kind, precision: f64) -> Self {
        Self {
            xy,
            precision,
            length: OnceLock::new(),
            kind,
        }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.xy.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.xy.y
    }

    /// Set the x coordinate.
    pub fn set_x(&mut self, x: f64) -> Result<(), GeometryError> {
        if x.is_nan() {
            return Err(GeometryError::NotNumeric);
        }
        self.xy.x = x;
        self.invalidate();
        Ok(())
    }

    /// Set the y coordinate.
    pub fn set_y(&mut self, y: f64) -> Result<(), GeometryError> {
        if y.is_nan() {
            return Err(GeometryError::NotNumeric);
        }
        self.xy.y = y;
        self.invalidate();
        Ok(())
    }

    #[inline]
    fn invalidate(&mut self) {
        self.length = OnceLock::new();
    }

    #[inline]
    pub fn precision(&self) -> f64 {
        self.precision
    }

    #[inline]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    #[inline]
    pub fn is_point(&self) -> bool {
        self.kind == Kind::Point
    }

    /// The underlying glam vector.
    #[inline]
    pub fn as_dvec2(&self) -> DVec2 {
        self.xy
    }

    /// Euclidean length, cached until the next mutation.
    pub fn length(&self) -> f64 {
        *self.length.get_or_init(|| self.xy.length())
    }

    /// Unit vector in the same direction.
    pub fn normalized(&self) -> Result<Self, GeometryError> {
        let len = self.length();
        if len == 0.0 {
            return Err(GeometryError::ZeroLength);
        }
        Ok(self.derive(self.xy / len, self.kind))
    }

    /// Scale this vector to unit length in place.
    pub fn normalize(&mut self) -> Result<(), GeometryError> {
        let len = self.length();
        if len == 0.0 {
            return Err(GeometryError::ZeroLength);
        }
        self.xy /= len;
        self.invalidate();
        Ok(())
    }

    /// Rotate clockwise about the origin by `degrees`.
    #[must_use]
    pub fn rotate(&self, degrees: f64) -> Self {
        let rotation = DVec2::from_angle((-degrees).to_radians());
        self.derive(rotation.rotate(self.xy), self.kind)
    }

    #[inline]
    pub fn dot(&self, other: &Vector) -> f64 {
        self.xy.dot(other.xy)
    }

    /// Coordinates truncated toward zero, or rounded half-to-even first when
    /// `rounding` is set.
    #[must_use]
    pub fn as_int(&self, rounding: bool) -> Self {
        let convert = |v: f64| {
            if rounding {
                v.round_ties_even().trunc()
            } else {
                v.trunc()
            }
        };
        self.derive(DVec2::new(convert(self.xy.x), convert(self.xy.y)), self.kind)
    }

    /// Copy of this vector tagged as a point.
    #[must_use]
    pub fn as_point(&self) -> Self {
        self.derive(self.xy, Kind::Point)
    }

    /// Copy of this vector tagged as a displacement.
    #[must_use]
    pub fn as_vector(&self) -> Self {
        self.derive(self.xy, Kind::Vector)
    }

    /// Approximate equality using this vector's own precision.
    pub fn almost_equal(&self, other: &Vector) -> bool {
        self.almost_equal_within(other, self.precision)
    }

    /// Approximate equality: both components differ by at most `|tolerance|`.
    pub fn almost_equal_within(&self, other: &Vector, tolerance: f64) -> bool {
        self.xy.abs_diff_eq(other.xy, tolerance.abs())
    }

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.xy.x,
            Axis::Y => self.xy.y,
        }
    }

    /// Component by index (`0`, `1`) or key (`"x"`, `"y"`).
    pub fn component<K>(&self, key: K) -> Result<f64, GeometryError>
    where
        K: TryInto<Axis, Error = GeometryError>,
    {
        Ok(self.get(key.try_into()?))
    }

    #[inline]
    pub fn to_array(&self) -> [f64; 2] {
        self.xy.to_array()
    }

    /// Floor division by a scalar.
    #[must_use]
    pub fn floor_div(&self, rhs: f64) -> Self {
        self.derive((self.xy / rhs).floor(), self.kind)
    }

    /// Floor division of a scalar by each component.
    #[must_use]
    pub fn rfloor_div(&self, lhs: f64) -> Self {
        self.derive((DVec2::splat(lhs) / self.xy).floor(), self.kind)
    }

    /// New value of the given tag that keeps this vector's precision.
    #[inline]
    fn derive(&self, xy: DVec2, kind: Kind) -> Self {
        Self::with_kind(xy, kind, self.precision)
    }

    #[inline]
    fn combine(&self, rhs: Operand, op: impl FnOnce(DVec2, DVec2) -> DVec2) -> Self {
        self.derive(op(self.xy, rhs.xy), self.kind.merge(rhs.kind))
    }

    #[inline]
    fn combine_rev(&self, lhs: Operand, op: impl FnOnce(DVec2, DVec2) -> DVec2) -> Self {
        self.derive(op(lhs.xy, self.xy), self.kind.merge(lhs.kind))
    }
}

impl Default for Vector {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl PartialEq for Vector {
    fn eq(&self, other: &Self) -> bool {
        self.almost_equal(other)
    }
}

impl fmt::Debug for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector")
            .field("x", &self.xy.x)
            .field("y", &self.xy.y)
            .field("precision", &self.precision)
            .field("kind", &self.kind)
            .finish()
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.kind {
            Kind::Vector => "Vector",
            Kind::Point => "Point",
        };
        write!(f, "{name}({:.4}, {:.4})", self.xy.x, self.xy.y)
    }
}

/// Component `0` (x) or `1` (y).
///
/// # Panics
///
/// Panics on any other index. Use [`Vector::component`] for a checked
/// lookup returning [`GeometryError::IndexOutOfRange`].
impl Index<usize> for Vector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        match index {
            0 => &self.xy.x,
            1 => &self.xy.y,
            _ => panic!("invalid index {index} for Vector"),
        }
    }
}

impl Index<Axis> for Vector {
    type Output = f64;

    fn index(&self, axis: Axis) -> &f64 {
        match axis {
            Axis::X => &self.xy.x,
            Axis::Y => &self.xy.y,
        }
    }
}

impl IntoIterator for &Vector {
    type Item = f64;
    type IntoIter = std::array::IntoIter<f64, 2>;

    fn into_iter(self) -> Self::IntoIter {
        self.to_array().into_iter()
    }
}

impl From<(f64, f64)> for Vector {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<[f64; 2]> for Vector {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<DVec2> for Vector {
    fn from(xy: DVec2) -> Self {
        Self::with_kind(xy, Kind::Vector, DEFAULT_PRECISION)
    }
}

impl TryFrom<&[f64]> for Vector {
    type Error = GeometryError;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        match *values {
            [x, y] => Self::try_new(x, y),
            _ => Err(GeometryError::InvalidLength {
                expected: Self::LEN,
                found: values.len(),
            }),
        }
    }
}

impl From<&Vector> for (f64, f64) {
    fn from(v: &Vector) -> Self {
        (v.xy.x, v.xy.y)
    }
}

impl From<Vector> for [f64; 2] {
    fn from(v: Vector) -> Self {
        v.to_array()
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        self.derive(-self.xy, self.kind)
    }
}

impl Neg for &Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        self.derive(-self.xy, self.kind)
    }
}

/// `+` and `-` accept any [`Operand`] on either side.
macro_rules! impl_additive {
    ($Trait:ident, $method:ident, $AssignTrait:ident, $assign:ident, $op:tt) => {
        impl<R: Into<Operand>> $Trait<R> for Vector {
            type Output = Vector;

            fn $method(self, rhs: R) -> Vector {
                self.combine(rhs.into(), |a, b| a $op b)
            }
        }

        impl<R: Into<Operand>> $Trait<R> for &Vector {
            type Output = Vector;

            fn $method(self, rhs: R) -> Vector {
                self.combine(rhs.into(), |a, b| a $op b)
            }
        }

        impl<R: Into<Operand>> $AssignTrait<R> for Vector {
            fn $assign(&mut self, rhs: R) {
                *self = self.combine(rhs.into(), |a, b| a $op b);
            }
        }

        impl_additive!(@rev $Trait, $method, $op, f64);
        impl_additive!(@rev $Trait, $method, $op, (f64, f64));
        impl_additive!(@rev $Trait, $method, $op, [f64; 2]);
        impl_additive!(@rev $Trait, $method, $op, DVec2);
    };
    (@rev $Trait:ident, $method:ident, $op:tt, $Lhs:ty) => {
        impl $Trait<Vector> for $Lhs {
            type Output = Vector;

            fn $method(self, rhs: Vector) -> Vector {
                rhs.combine_rev(Operand::from(self), |a, b| a $op b)
            }
        }

        impl $Trait<&Vector> for $Lhs {
            type Output = Vector;

            fn $method(self, rhs: &Vector) -> Vector {
                rhs.combine_rev(Operand::from(self), |a, b| a $op b)
            }
        }
    };
}

impl_additive!(Add, add, AddAssign, add_assign, +);
impl_additive!(Sub, sub, SubAssign, sub_assign, -);

/// `*` and `/` are scalar-only; there is no elementwise vector product.
macro_rules! impl_scalar {
    ($Trait:ident, $method:ident, $AssignTrait:ident, $assign:ident, $op:tt) => {
        impl $Trait<f64> for Vector {
            type Output = Vector;

            fn $method(self, rhs: f64) -> Vector {
                self.combine(Operand::from(rhs), |a, b| a $op b)
            }
        }

        impl $Trait<f64> for &Vector {
            type Output = Vector;

            fn $method(self, rhs: f64) -> Vector {
                self.combine(Operand::from(rhs), |a, b| a $op b)
            }
        }

        impl $Trait<Vector> for f64 {
            type Output = Vector;

            fn $method(self, rhs: Vector) -> Vector {
                rhs.combine_rev(Operand::from(self), |a, b| a $op b)
            }
        }

        impl $Trait<&Vector> for f64 {
            type Output = Vector;

            fn $method(self, rhs: &Vector) -> Vector {
                rhs.combine_rev(Operand::from(self), |a, b| a $op b)
            }
        }

        impl $AssignTrait<f64> for Vector {
            fn $assign(&mut self, rhs: f64) {
                *self = self.combine(Operand::from(rhs), |a, b| a $op b);
            }
        }
    };
}

impl_scalar!(Mul, mul, MulAssign, mul_assign, *);
impl_scalar!(Div, div, DivAssign, div_assign, /);
