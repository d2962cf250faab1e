//! The validated path type consumed by the tessellators.

use crate::math::{Box2D, Point};
use crate::polygon::{Polygon, Segments};
use crate::{DegeneratePathError, Position, Winding};

/// An owned, normalized sequence of points.
///
/// A `Polyline` upholds the following invariants:
///
/// - every coordinate is finite,
/// - no two consecutive points coincide,
/// - if closed, the last point differs from the first one (an explicit
///   closing point is removed),
/// - it has at least 2 points if open, 3 points if closed.
///
/// As a result, every segment of a `Polyline` has a non-zero length and a
/// well defined direction.
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    points: Vec<Point>,
    closed: bool,
}

impl Polyline {
    /// Minimum number of distinct points of an open path.
    pub const MIN_OPEN_POINTS: usize = 2;
    /// Minimum number of distinct points of a closed path.
    pub const MIN_CLOSED_POINTS: usize = 3;

    /// Validates and normalizes a sequence of points.
    ///
    /// Consecutive coincident points are collapsed into one and, for closed
    /// paths, trailing points equal to the first point are dropped.
    pub fn new<Iter>(points: Iter, closed: bool) -> Result<Self, DegeneratePathError>
    where
        Iter: IntoIterator,
        Iter::Item: Position,
    {
        let points = points.into_iter();
        let mut normalized: Vec<Point> = Vec::with_capacity(points.size_hint().0);

        for (index, p) in points.enumerate() {
            let p = p.position();
            if !p.x.is_finite() || !p.y.is_finite() {
                return Err(DegeneratePathError::NonFinitePosition { index });
            }

            if normalized.last() != Some(&p) {
                normalized.push(p);
            }
        }

        if closed {
            while normalized.len() > 1 && normalized.last() == normalized.first() {
                normalized.pop();
            }
        }

        let required = if closed {
            Self::MIN_CLOSED_POINTS
        } else {
            Self::MIN_OPEN_POINTS
        };

        if normalized.len() < required {
            return Err(DegeneratePathError::TooFewPoints {
                closed,
                found: normalized.len(),
                required,
            });
        }

        Ok(Polyline {
            points: normalized,
            closed,
        })
    }

    /// Same as `Polyline::new` for a borrowed polygon view.
    pub fn from_polygon(polygon: Polygon) -> Result<Self, DegeneratePathError> {
        Self::new(polygon.points, polygon.closed)
    }

    /// Returns a normalized copy of this path without the point at `idx`.
    pub fn without_point(&self, idx: usize) -> Result<Self, DegeneratePathError> {
        let points = self
            .points
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != idx)
            .map(|(_, p)| p);

        Self::new(points, self.closed)
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of points, never less than 2.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false, a polyline has at least two points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `N` segments if closed, `N - 1` otherwise.
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.as_polygon().segment_count()
    }

    #[inline]
    pub fn as_polygon(&self) -> Polygon {
        Polygon {
            points: &self.points,
            closed: self.closed,
        }
    }

    #[inline]
    pub fn segments(&self) -> Segments {
        self.as_polygon().segments()
    }

    #[inline]
    pub fn signed_area(&self) -> f64 {
        self.as_polygon().signed_area()
    }

    #[inline]
    pub fn winding(&self) -> Option<Winding> {
        self.as_polygon().winding()
    }

    #[inline]
    pub fn bounding_box(&self) -> Box2D {
        self.as_polygon().bounding_box()
    }

    /// Consumes the polyline and returns its points.
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

impl<'l> From<&'l Polyline> for Polygon<'l> {
    fn from(polyline: &'l Polyline) -> Self {
        polyline.as_polygon()
    }
}

#[cfg(test)]
use crate::math::point;

#[test]
fn collapse_consecutive_duplicates() {
    let polyline = Polyline::new(
        &[
            point(0.0, 0.0),
            point(0.0, 0.0),
            point(1.0, 0.0),
            point(1.0, 0.0),
            point(1.0, 0.0),
            point(1.0, 1.0),
        ],
        false,
    )
    .unwrap();

    assert_eq!(
        polyline.points(),
        &[point(0.0, 0.0), point(1.0, 0.0), point(1.0, 1.0)]
    );
    assert_eq!(polyline.segment_count(), 2);
}

#[test]
fn closed_drops_closing_point() {
    let polyline = Polyline::new(
        [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0], [0.0, 0.0]],
        true,
    )
    .unwrap();

    assert_eq!(polyline.len(), 4);
    assert_eq!(polyline.segment_count(), 4);
    assert!(polyline.is_closed());

    // Open paths keep a final point equal to the first one.
    let open = Polyline::new([[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]], false).unwrap();
    assert_eq!(open.len(), 3);
}

#[test]
fn too_few_points() {
    assert_eq!(
        Polyline::new([(0.0, 0.0)], false),
        Err(DegeneratePathError::TooFewPoints {
            closed: false,
            found: 1,
            required: 2
        })
    );
    assert_eq!(
        Polyline::new([(0.0, 0.0), (0.0, 0.0), (0.0, 0.0)], false),
        Err(DegeneratePathError::TooFewPoints {
            closed: false,
            found: 1,
            required: 2
        })
    );
    assert_eq!(
        Polyline::new([(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)], true),
        Err(DegeneratePathError::TooFewPoints {
            closed: true,
            found: 2,
            required: 3
        })
    );
    let empty: &[Point] = &[];
    assert!(Polyline::new(empty, true).is_err());

    assert!(Polyline::new([(0.0, 0.0), (1.0, 0.0)], false).is_ok());
}

#[test]
fn non_finite_positions() {
    assert_eq!(
        Polyline::new([(0.0, 0.0), (f64::NAN, 1.0), (2.0, 2.0)], false),
        Err(DegeneratePathError::NonFinitePosition { index: 1 })
    );
    assert_eq!(
        Polyline::new([(0.0, 0.0), (1.0, 1.0), (2.0, f64::INFINITY)], true),
        Err(DegeneratePathError::NonFinitePosition { index: 2 })
    );
}

#[test]
fn remove_point() {
    let polyline = Polyline::new([(0.0, 0.0), (1.0, 0.0), (0.0, 0.0), (0.0, 1.0)], false).unwrap();

    // Removing the middle point makes two coincident points consecutive.
    let reduced = polyline.without_point(1).unwrap();
    assert_eq!(reduced.points(), &[point(0.0, 0.0), point(0.0, 1.0)]);

    let triangle = Polyline::new([(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)], true).unwrap();
    assert!(triangle.without_point(0).is_err());
}

#[test]
fn polyline_is_idempotent() {
    let raw = [(1.0, 1.0), (10.0, 0.0), (10.0, 0.0), (1.0, -1.0), (1.0, 1.0)];
    let a = Polyline::new(raw, true).unwrap();
    let b = Polyline::new(a.points(), true).unwrap();
    assert_eq!(a, b);

    let points = b.into_points();
    assert_eq!(points.len(), 4);
    assert_eq!(Polyline::new(points, true).unwrap(), a);
}
