#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::float_cmp)]

//! Data structures to describe the 2D paths consumed by the mesh generators.
//!
//! A path is an ordered sequence of points that is either open (a polyline)
//! or closed (a polygon). The tessellators never read raw user input directly:
//! points first go through [`Polyline::new`], which validates and normalizes
//! them so that every segment has a well defined direction.
//!
//! This crate is reexported in [shapemesh](../shapemesh/index.html).
//!
//! # Examples
//!
//! ```
//! use shapemesh_path::Polyline;
//! use shapemesh_path::math::point;
//!
//! // The repeated point and the explicit closing point are collapsed.
//! let polyline = Polyline::new(
//!     &[
//!         point(0.0, 0.0),
//!         point(0.0, 1.0),
//!         point(0.0, 1.0),
//!         point(1.0, 1.0),
//!         point(0.0, 0.0),
//!     ],
//!     true,
//! ).unwrap();
//!
//! assert_eq!(polyline.len(), 3);
//! assert_eq!(polyline.segment_count(), 3);
//! ```

pub use euclid;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

mod error;
pub mod polygon;
pub mod polyline;

#[doc(inline)]
pub use crate::error::DegeneratePathError;
#[doc(inline)]
pub use crate::polygon::{Polygon, Segments};
#[doc(inline)]
pub use crate::polyline::Polyline;

use math::Point;

pub mod math {
    //! f64 versions of the euclid types used everywhere. The other shapemesh
    //! crates reexport them.

    /// Alias for ```euclid::default::Point2D<f64>```.
    pub type Point = euclid::default::Point2D<f64>;

    /// Alias for ```euclid::default::Vector2D<f64>```.
    pub type Vector = euclid::default::Vector2D<f64>;

    /// Alias for ```euclid::default::Box2D<f64>```.
    pub type Box2D = euclid::default::Box2D<f64>;

    /// Shorthand for `Vector::new(x, y)`.
    #[inline]
    pub fn vector(x: f64, y: f64) -> Vector {
        Vector::new(x, y)
    }

    /// Shorthand for `Point::new(x, y)`.
    #[inline]
    pub fn point(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }
}

/// The two possible orientations for the edges of a shape.
///
/// Positive winding corresponds to the positive orientation in trigonometry
/// (counter-clockwise in a y-up coordinate space).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Winding {
    Positive,
    Negative,
}

/// Left or right side of the path.
///
/// The positive side is the one the path normal (the tangent rotated by +90
/// degrees) points to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Side {
    Positive,
    Negative,
}

impl Side {
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Side::Positive => Side::Negative,
            Side::Negative => Side::Positive,
        }
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        self == Side::Positive
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        self == Side::Negative
    }

    #[inline]
    pub fn to_f64(self) -> f64 {
        match self {
            Side::Positive => 1.0,
            Side::Negative => -1.0,
        }
    }
}

/// Line cap as defined by the SVG specification.
///
/// Only applies to the two ends of open paths.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum LineCap {
    /// The stroke ends exactly at the endpoint, with plain perpendicular
    /// offsets.
    Butt,
    /// The stroke is extended past the endpoint by half of the line width.
    Square,
}

/// Line join as defined by the SVG specification.
///
/// Joins that exceed the miter limit always fall back to `Bevel`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum LineJoin {
    /// A sharp corner is to be used to join path segments.
    Miter,
    /// A beveled corner is to be used to join path segments.
    Bevel,
}

/// Interface for input vertex types that have a 2D position.
pub trait Position {
    fn position(&self) -> Point;
}

impl<U> Position for euclid::Point2D<f64, U> {
    fn position(&self) -> Point {
        self.to_untyped()
    }
}

impl<'l, T: Position> Position for &'l T {
    fn position(&self) -> Point {
        (*self).position()
    }
}

impl Position for (f64, f64) {
    fn position(&self) -> Point {
        Point::new(self.0, self.1)
    }
}

impl Position for [f64; 2] {
    fn position(&self) -> Point {
        Point::new(self[0], self[1])
    }
}

#[test]
fn side_opposite() {
    assert_eq!(Side::Positive.opposite(), Side::Negative);
    assert_eq!(Side::Negative.opposite(), Side::Positive);
    assert_eq!(Side::Positive.to_f64() * Side::Negative.to_f64(), -1.0);
    assert!(Side::Positive.is_positive());
    assert!(!Side::Positive.is_negative());
    assert!(Side::Negative.is_negative());
    assert!(!Side::Negative.opposite().is_negative());
}

#[test]
fn position_adapters() {
    use math::point;

    assert_eq!((1.0, 2.0).position(), point(1.0, 2.0));
    assert_eq!([3.0, -4.0].position(), point(3.0, -4.0));
    assert_eq!((&point(5.0, 6.0)).position(), point(5.0, 6.0));
}
