use crate::error::ZeroLengthSegmentError;
use crate::math::{Point, Vector};
use crate::math_utils::{left_normal, unit_direction};
use crate::path::Polygon;

/// A position on the path and the unit direction the path follows from there.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Tangent {
    pub position: Point,
    pub direction: Vector,
}

impl Tangent {
    /// The direction rotated by +90 degrees, pointing to the positive side of the path.
    #[inline]
    pub fn normal(&self) -> Vector {
        left_normal(self.direction)
    }
}

/// One unit tangent per point of a path.
///
/// The tangent of point `i` is the direction of the segment starting at `i`.
/// The last point of an open path has no such segment, its tangent is the
/// opposite of the previous one.
///
/// ```
/// use shapemesh_tessellation::TangentField;
/// use shapemesh_tessellation::path::Polygon;
/// use shapemesh_tessellation::math::{point, vector};
///
/// let points = [point(0.0, 0.0), point(2.0, 0.0), point(2.0, 3.0)];
/// let field = TangentField::compute(Polygon { points: &points, closed: false }).unwrap();
///
/// assert_eq!(field[0].direction, vector(1.0, 0.0));
/// assert_eq!(field[1].direction, vector(0.0, 1.0));
/// assert_eq!(field[2].direction, vector(0.0, -1.0));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TangentField {
    tangents: Vec<Tangent>,
    closed: bool,
}

impl TangentField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the tangents of a path.
    ///
    /// Paths with less than two points produce an empty field.
    pub fn compute(polygon: Polygon) -> Result<Self, ZeroLengthSegmentError> {
        let mut field = TangentField::new();
        field.recompute(polygon)?;

        Ok(field)
    }

    /// Same as `compute`, reusing the allocation of this field.
    ///
    /// The field is left empty if an error is returned.
    pub fn recompute(&mut self, polygon: Polygon) -> Result<(), ZeroLengthSegmentError> {
        self.tangents.clear();
        self.closed = polygon.closed;

        let n = polygon.points.len();
        if n < 2 {
            return Ok(());
        }

        self.tangents.reserve(n);
        for segment in polygon.segments() {
            let direction = match unit_direction(segment.from, segment.to) {
                Some(direction) => direction,
                None => {
                    self.tangents.clear();
                    return Err(ZeroLengthSegmentError {
                        segment: segment.index,
                    });
                }
            };

            self.tangents.push(Tangent {
                position: segment.from,
                direction,
            });
        }

        if !self.closed {
            let previous = self.tangents[n - 2].direction;
            self.tangents.push(Tangent {
                position: polygon.points[n - 1],
                direction: -previous,
            });
        }

        debug_assert_eq!(self.tangents.len(), n);

        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tangents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tangents.is_empty()
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    #[inline]
    pub fn as_slice(&self) -> &[Tangent] {
        &self.tangents
    }

    /// Direction of the segment ending at point `idx`, if any.
    pub fn incoming(&self, idx: usize) -> Option<Vector> {
        if idx > 0 {
            Some(self.tangents[idx - 1].direction)
        } else if self.closed {
            self.tangents.last().map(|t| t.direction)
        } else {
            None
        }
    }

    /// Direction of the segment starting at point `idx`, if any.
    pub fn outgoing(&self, idx: usize) -> Option<Vector> {
        if !self.closed && idx + 1 == self.tangents.len() {
            return None;
        }

        Some(self.tangents[idx].direction)
    }

    /// Normal of the tangent at point `idx`.
    #[inline]
    pub fn normal(&self, idx: usize) -> Vector {
        self.tangents[idx].normal()
    }
}

impl std::ops::Index<usize> for TangentField {
    type Output = Tangent;
    fn index(&self, idx: usize) -> &Tangent {
        &self.tangents[idx]
    }
}

#[cfg(test)]
use crate::math::{point, vector};

#[test]
fn closed_square_tangents() {
    let points = [point(0.0, 0.0), point(0.0, 1.0), point(1.0, 1.0), point(1.0, 0.0)];
    let field = TangentField::compute(Polygon {
        points: &points,
        closed: true,
    })
    .unwrap();

    assert_eq!(field.len(), 4);
    assert!(field.is_closed());
    assert_eq!(field[0].direction, vector(0.0, 1.0));
    assert_eq!(field[3].direction, vector(-1.0, 0.0));
    assert_eq!(field[3].position, point(1.0, 0.0));

    assert_eq!(field.incoming(0), Some(vector(-1.0, 0.0)));
    assert_eq!(field.outgoing(3), Some(vector(-1.0, 0.0)));
    assert_eq!(field.normal(0), vector(-1.0, 0.0));
}

#[test]
fn open_path_ends() {
    let points = [point(0.0, 0.0), point(1.0, 0.0)];
    let field = TangentField::compute(Polygon {
        points: &points,
        closed: false,
    })
    .unwrap();

    assert_eq!(field.len(), 2);
    assert_eq!(field[1].direction, vector(-1.0, 0.0));
    assert_eq!(field.incoming(0), None);
    assert_eq!(field.outgoing(0), Some(vector(1.0, 0.0)));
    assert_eq!(field.incoming(1), Some(vector(1.0, 0.0)));
    assert_eq!(field.outgoing(1), None);
}

#[test]
fn tangents_are_unit_length() {
    let points = [
        point(1.0, 1.0),
        point(10.0, 0.0),
        point(1.0, -1.0),
        point(0.0, -10.0),
        point(-1.0, -1.0),
        point(-10.0, 0.0),
    ];
    let field = TangentField::compute(Polygon {
        points: &points,
        closed: true,
    })
    .unwrap();

    for t in field.as_slice() {
        assert!((t.direction.length() - 1.0).abs() < 1e-12);
        assert!((t.normal().dot(t.direction)).abs() < 1e-12);
    }
}

#[test]
fn zero_length_segment() {
    let points = [point(0.0, 0.0), point(1.0, 0.0), point(1.0, 0.0), point(2.0, 1.0)];
    let mut field = TangentField::new();
    let result = field.recompute(Polygon {
        points: &points,
        closed: false,
    });

    assert_eq!(result, Err(ZeroLengthSegmentError { segment: 1 }));
    assert!(field.is_empty());

    // The closing segment of a closed path is checked as well.
    let points = [point(0.0, 0.0), point(1.0, 0.0), point(0.0, 0.0)];
    assert_eq!(
        TangentField::compute(Polygon {
            points: &points,
            closed: true,
        }),
        Err(ZeroLengthSegmentError { segment: 2 })
    );
}

#[test]
fn too_short() {
    let points = [point(3.0, 0.0)];
    let field = TangentField::compute(Polygon {
        points: &points,
        closed: false,
    })
    .unwrap();
    assert!(field.is_empty());
}
