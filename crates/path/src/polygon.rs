//! A borrowed view over a sequence of points forming an open or closed path.

use crate::math::{Box2D, Point, Vector};
use crate::Winding;

/// A view over a sequence of points forming a polygon (if `closed`) or a
/// polyline.
///
/// `Polygon` does not check anything about its points. Use
/// [`Polyline`](../polyline/struct.Polyline.html) to get a validated path.
///
/// ## Example
///
/// ```
/// use shapemesh_path::polygon::Polygon;
/// use shapemesh_path::math::point;
///
/// let path = Polygon {
///     points: &[
///         point(0.0, 0.0),
///         point(10.0, 10.0),
///         point(0.0, 10.0),
///     ],
///     closed: true,
/// };
///
/// assert_eq!(path.segments().count(), 3);
/// assert_eq!(path.signed_area(), 50.0);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Polygon<'l> {
    pub points: &'l [Point],
    pub closed: bool,
}

/// A straight segment between two consecutive points of a path.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    /// Index of the point the segment starts at.
    pub index: usize,
    pub from: Point,
    pub to: Point,
}

impl Segment {
    #[inline]
    pub fn to_vector(&self) -> Vector {
        self.to - self.from
    }
}

impl<'l> Polygon<'l> {
    /// Number of segments: `N` for closed paths, `N - 1` for open ones.
    pub fn segment_count(&self) -> usize {
        match (self.points.len(), self.closed) {
            (0, _) => 0,
            (n, true) => n,
            (n, false) => n - 1,
        }
    }

    /// Returns an iterator over the segments, including the one closing the
    /// path if `closed` is true.
    pub fn segments(&self) -> Segments<'l> {
        Segments {
            points: self.points,
            idx: 0,
            end: self.segment_count(),
        }
    }

    /// Index of the point following `idx`, wrapping around for closed paths.
    #[inline]
    pub fn next_index(&self, idx: usize) -> Option<usize> {
        if idx + 1 < self.points.len() {
            Some(idx + 1)
        } else if self.closed && !self.points.is_empty() {
            Some(0)
        } else {
            None
        }
    }

    /// Index of the point preceding `idx`, wrapping around for closed paths.
    #[inline]
    pub fn previous_index(&self, idx: usize) -> Option<usize> {
        if idx > 0 {
            Some(idx - 1)
        } else if self.closed && !self.points.is_empty() {
            Some(self.points.len() - 1)
        } else {
            None
        }
    }

    /// Signed area of the polygon, positive for counter-clockwise (y-up)
    /// orientations.
    ///
    /// The path is considered closed regardless of the `closed` flag.
    pub fn signed_area(&self) -> f64 {
        if self.points.len() < 3 {
            return 0.0;
        }

        // Vectors relative to the first point keep the sum well conditioned
        // for shapes far from the origin.
        let first = self.points[0];
        let mut double_area = 0.0;
        let mut v0 = Vector::zero();
        for p in &self.points[1..] {
            let v1 = *p - first;
            double_area += v0.cross(v1);
            v0 = v1;
        }

        double_area * 0.5
    }

    /// Orientation of the polygon, `None` if its area is zero.
    pub fn winding(&self) -> Option<Winding> {
        let area = self.signed_area();
        if area > 0.0 {
            Some(Winding::Positive)
        } else if area < 0.0 {
            Some(Winding::Negative)
        } else {
            None
        }
    }

    /// Smallest axis-aligned box containing every point.
    pub fn bounding_box(&self) -> Box2D {
        Box2D::from_points(self.points.iter())
    }
}

/// An iterator over the segments of a [`Polygon`].
#[derive(Clone)]
pub struct Segments<'l> {
    points: &'l [Point],
    idx: usize,
    end: usize,
}

impl<'l> Iterator for Segments<'l> {
    type Item = Segment;
    fn next(&mut self) -> Option<Segment> {
        if self.idx >= self.end {
            return None;
        }

        let index = self.idx;
        self.idx += 1;
        let to = if index + 1 < self.points.len() { index + 1 } else { 0 };

        Some(Segment {
            index,
            from: self.points[index],
            to: self.points[to],
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.end - self.idx;
        (n, Some(n))
    }
}

impl<'l> ExactSizeIterator for Segments<'l> {}

#[test]
fn segments_closed_and_open() {
    use crate::math::point;

    let points = &[point(0.0, 0.0), point(1.0, 0.0), point(1.0, 1.0), point(0.0, 1.0)];

    let closed = Polygon { points, closed: true };
    let segments: Vec<Segment> = closed.segments().collect();
    assert_eq!(segments.len(), 4);
    assert_eq!(segments[0].from, point(0.0, 0.0));
    assert_eq!(segments[0].to, point(1.0, 0.0));
    assert_eq!(segments[3].index, 3);
    assert_eq!(segments[3].from, point(0.0, 1.0));
    assert_eq!(segments[3].to, point(0.0, 0.0));

    let open = Polygon { points, closed: false };
    assert_eq!(open.segments().len(), 3);
    assert_eq!(open.segments().last().map(|s| s.to), Some(point(0.0, 1.0)));

    let empty = Polygon { points: &[], closed: true };
    assert_eq!(empty.segments().count(), 0);
}

#[test]
fn neighbor_indices() {
    use crate::math::point;

    let points = &[point(0.0, 0.0), point(1.0, 0.0), point(1.0, 1.0)];
    let closed = Polygon { points, closed: true };
    let open = Polygon { points, closed: false };

    assert_eq!(closed.next_index(2), Some(0));
    assert_eq!(closed.previous_index(0), Some(2));
    assert_eq!(open.next_index(2), None);
    assert_eq!(open.previous_index(0), None);
    assert_eq!(open.next_index(0), Some(1));
}

#[test]
fn polygon_signed_area() {
    use crate::math::point;

    let ccw = Polygon {
        points: &[point(0.0, 0.0), point(1.0, 0.0), point(1.0, 1.0), point(0.0, 1.0)],
        closed: true,
    };
    assert_eq!(ccw.signed_area(), 1.0);
    assert_eq!(ccw.winding(), Some(Winding::Positive));

    let cw = Polygon {
        points: &[point(0.0, 0.0), point(0.0, 1.0), point(1.0, 1.0), point(1.0, 0.0)],
        closed: true,
    };
    assert_eq!(cw.signed_area(), -1.0);
    assert_eq!(cw.winding(), Some(Winding::Negative));

    let cross = Polygon {
        points: &[
            point(0.0, 1.0),
            point(1.0, 1.0),
            point(1.0, 0.0),
            point(2.0, 0.0),
            point(2.0, 1.0),
            point(3.0, 1.0),
            point(3.0, 2.0),
            point(2.0, 2.0),
            point(2.0, 3.0),
            point(1.0, 3.0),
            point(1.0, 2.0),
            point(0.0, 2.0),
        ],
        closed: true,
    };
    assert_eq!(cross.signed_area(), 5.0);

    let flat = Polygon {
        points: &[point(0.0, -10.0), point(0.0, 0.0), point(0.0, 10.0)],
        closed: true,
    };
    assert_eq!(flat.winding(), None);
}
