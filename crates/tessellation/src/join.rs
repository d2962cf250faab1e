use crate::math::Vector;
use crate::math_utils::{compute_normal, left_normal, miter_limit_is_exceeded};
use crate::path::{LineCap, LineJoin, Side};
use crate::{EdgeOptions, TangentField};

/// Above this dot product between two segment directions, `LineJoin::Bevel`
/// still produces a miter since both look the same.
const BEVEL_ALIGNMENT_THRESHOLD: f64 = 0.95;

/// The offsets of the two edge vertices generated at a point.
///
/// `inner` points to the positive side of the path (left of the travel direction
/// in a y-up space) and `outer` to the negative side. Offsets are expressed for a
/// line of width 1 so a plain perpendicular offset has a length of 0.5.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct OffsetPair {
    pub inner: Vector,
    pub outer: Vector,
}

impl OffsetPair {
    #[inline]
    pub fn symmetric(offset: Vector) -> Self {
        OffsetPair {
            inner: offset,
            outer: -offset,
        }
    }

    /// The offset on a given side of the path.
    #[inline]
    pub fn get(&self, side: Side) -> Vector {
        match side {
            Side::Positive => self.inner,
            Side::Negative => self.outer,
        }
    }
}

/// How the edge of a path is built around one of its points.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Join {
    /// Both segments meet at the tip of `offset` on the positive side and of
    /// `-offset` on the negative side.
    Miter { offset: Vector },
    /// Each segment keeps its own perpendicular offsets and the gap on the
    /// `front` (convex) side is filled with an extra triangle.
    ///
    /// At an exact reversal the two segments overlap and there is no gap to
    /// fill, see `Join::fills_corner`.
    ///
    /// `incoming` and `outgoing` are the positive side half-width normals of
    /// the two segments.
    Bevel {
        incoming: Vector,
        outgoing: Vector,
        front: Side,
    },
    /// Start or end of an open path.
    Cap { inner: Vector, outer: Vector },
}

impl Join {
    #[inline]
    pub fn is_bevel(&self) -> bool {
        matches!(self, Join::Bevel { .. })
    }

    /// Whether the edge tessellator adds a triangle on the front side of the
    /// join.
    ///
    /// False for everything but bevels, and for bevels at an exact reversal where
    /// the incoming and outgoing normals are antiparallel: that triangle would
    /// have no area.
    #[inline]
    pub fn fills_corner(&self) -> bool {
        match *self {
            Join::Bevel {
                incoming, outgoing, ..
            } => incoming.cross(outgoing) != 0.0,
            _ => false,
        }
    }

    /// Number of edge vertices generated for this join.
    #[inline]
    pub fn vertex_count(&self) -> u32 {
        if self.is_bevel() {
            4
        } else {
            2
        }
    }

    /// The characteristic offsets of the join.
    ///
    /// For bevels this is the pair of front side normals, the two points the
    /// bevel triangle cuts between.
    pub fn offsets(&self) -> OffsetPair {
        match *self {
            Join::Miter { offset } => OffsetPair::symmetric(offset),
            Join::Bevel {
                incoming,
                outgoing,
                front,
            } => {
                let sign = front.to_f64();
                OffsetPair {
                    inner: incoming * sign,
                    outer: outgoing * sign,
                }
            }
            Join::Cap { inner, outer } => OffsetPair { inner, outer },
        }
    }

    /// The offsets the segment ending at this point connects to.
    pub fn incoming_pair(&self) -> OffsetPair {
        match *self {
            Join::Bevel { incoming, .. } => OffsetPair::symmetric(incoming),
            _ => self.offsets(),
        }
    }

    /// The offsets the segment starting at this point connects to.
    pub fn outgoing_pair(&self) -> OffsetPair {
        match *self {
            Join::Bevel { outgoing, .. } => OffsetPair::symmetric(outgoing),
            _ => self.offsets(),
        }
    }
}

/// Resolves the join of a point given the directions of its adjacent segments.
///
/// `incoming` is `None` at the start of an open path and `outgoing` is `None`
/// at its end. A point without any adjacent segment gets an empty cap.
pub fn resolve_join(incoming: Option<Vector>, outgoing: Option<Vector>, options: &EdgeOptions) -> Join {
    match (incoming, outgoing) {
        (Some(prev), Some(next)) => resolve_corner(prev, next, options),
        (None, Some(next)) => {
            let n = left_normal(next);
            match options.start_cap {
                LineCap::Butt => cap(n * 0.5, -n * 0.5),
                LineCap::Square => cap((n - next) * 0.5, (-n - next) * 0.5),
            }
        }
        (Some(prev), None) => {
            let n = left_normal(prev);
            match options.end_cap {
                LineCap::Butt => cap(n * 0.5, -n * 0.5),
                LineCap::Square => cap((n + prev) * 0.5, (-n + prev) * 0.5),
            }
        }
        (None, None) => cap(Vector::zero(), Vector::zero()),
    }
}

/// Resolves the joins of every point of a path.
///
/// `output` is cleared first. Returns the number of bevel joins, including the
/// ones at exact reversals that don't fill their corner.
pub fn resolve_joins(field: &TangentField, options: &EdgeOptions, output: &mut Vec<Join>) -> usize {
    output.clear();
    output.reserve(field.len());

    let mut bevels = 0;
    for idx in 0..field.len() {
        let join = resolve_join(field.incoming(idx), field.outgoing(idx), options);
        if join.is_bevel() {
            bevels += 1;
            if options.line_join == LineJoin::Miter {
                tracing::debug!(
                    point = idx,
                    "miter undefined or above limit, falling back to a bevel join"
                );
            }
        }
        output.push(join);
    }

    bevels
}

fn resolve_corner(prev: Vector, next: Vector, options: &EdgeOptions) -> Join {
    let miter = match options.line_join {
        LineJoin::Bevel if prev.dot(next) < BEVEL_ALIGNMENT_THRESHOLD => None,
        _ => compute_normal(prev, next)
            .filter(|n| !miter_limit_is_exceeded(*n, options.miter_limit)),
    };

    match miter {
        Some(n) => Join::Miter { offset: n * 0.5 },
        None => {
            let front = if next.cross(prev) >= 0.0 {
                Side::Positive
            } else {
                Side::Negative
            };

            Join::Bevel {
                incoming: left_normal(prev) * 0.5,
                outgoing: left_normal(next) * 0.5,
                front,
            }
        }
    }
}

#[inline]
fn cap(inner: Vector, outer: Vector) -> Join {
    Join::Cap { inner, outer }
}

#[cfg(test)]
use crate::math::vector;

#[cfg(test)]
fn assert_almost_eq(a: Vector, b: Vector) {
    if (a - b).square_length() > 1e-10 {
        panic!("assert almost equal: {:?} != {:?}", a, b);
    }
}

#[test]
fn straight_continuation() {
    let options = EdgeOptions::default();
    let join = resolve_join(Some(vector(1.0, 0.0)), Some(vector(1.0, 0.0)), &options);
    assert_eq!(join, Join::Miter { offset: vector(0.0, 0.5) });
    assert_eq!(
        join.offsets(),
        OffsetPair {
            inner: vector(0.0, 0.5),
            outer: vector(0.0, -0.5)
        }
    );
}

#[test]
fn right_angle_miter() {
    let options = EdgeOptions::default();
    let join = resolve_join(Some(vector(1.0, 0.0)), Some(vector(0.0, 1.0)), &options);
    match join {
        Join::Miter { offset } => assert_almost_eq(offset, vector(-0.5, 0.5)),
        _ => panic!("expected a miter, got {:?}", join),
    }

    let pair = join.offsets();
    assert_eq!(pair.inner, -pair.outer);
    assert_eq!(join.incoming_pair(), pair);
    assert_eq!(join.vertex_count(), 2);
}

#[test]
fn sharp_angle_bevel() {
    let options = EdgeOptions::default();
    let prev = vector(1.0, 0.0);
    let next = vector(-0.9, 0.1).normalize();
    let join = resolve_join(Some(prev), Some(next), &options);

    // Left turn: the convex side is on the right (negative side).
    match join {
        Join::Bevel { front, .. } => assert_eq!(front, Side::Negative),
        _ => panic!("expected a bevel, got {:?}", join),
    }

    let pair = join.offsets();
    assert!((pair.inner.length() - 0.5).abs() < 1e-12);
    assert!((pair.outer.length() - 0.5).abs() < 1e-12);
    assert!(pair.inner.normalize().dot(pair.outer.normalize()) > -0.999);
    assert_eq!(join.vertex_count(), 4);
    assert!(join.fills_corner());

    assert_eq!(join.incoming_pair().inner, vector(0.0, 0.5));
    assert_almost_eq(join.outgoing_pair().inner, vector(-next.y, next.x) * 0.5);
}

#[test]
fn miter_limit_is_configurable() {
    let prev = vector(1.0, 0.0);
    let next = vector(0.0, 1.0);

    let strict = EdgeOptions::default().with_miter_limit(1.2);
    assert!(resolve_join(Some(prev), Some(next), &strict).is_bevel());

    let loose = EdgeOptions::default().with_miter_limit(1.5);
    assert!(!resolve_join(Some(prev), Some(next), &loose).is_bevel());
}

#[test]
fn reversal_is_a_bevel() {
    let options = EdgeOptions::default();
    let join = resolve_join(Some(vector(1.0, 0.0)), Some(vector(-1.0, 0.0)), &options);
    assert_eq!(
        join,
        Join::Bevel {
            incoming: vector(0.0, 0.5),
            outgoing: vector(-0.0, -0.5),
            front: Side::Positive,
        }
    );

    // The two segments overlap, there is no corner to fill.
    assert!(join.is_bevel());
    assert!(!join.fills_corner());
    assert_eq!(join.vertex_count(), 4);
    assert_eq!(join.outgoing_pair().inner, join.incoming_pair().outer);

    // Also holds for directions that aren't axis aligned.
    let d = vector(3.0, 1.0).normalize();
    let join = resolve_join(Some(d), Some(-d), &options);
    assert!(join.is_bevel());
    assert!(!join.fills_corner());
}

#[test]
fn bevel_line_join() {
    let options = EdgeOptions::bevel();
    assert!(resolve_join(Some(vector(1.0, 0.0)), Some(vector(0.0, 1.0)), &options).is_bevel());

    let almost_straight = vector(1.0, 0.1).normalize();
    assert!(!resolve_join(Some(vector(1.0, 0.0)), Some(almost_straight), &options).is_bevel());
}

#[test]
fn caps() {
    let butt = EdgeOptions::default();
    assert_eq!(
        resolve_join(None, Some(vector(1.0, 0.0)), &butt),
        Join::Cap {
            inner: vector(0.0, 0.5),
            outer: vector(0.0, -0.5)
        }
    );
    assert_eq!(
        resolve_join(Some(vector(1.0, 0.0)), None, &butt),
        Join::Cap {
            inner: vector(0.0, 0.5),
            outer: vector(0.0, -0.5)
        }
    );

    let mixed = EdgeOptions::default().with_end_cap(LineCap::Square);
    assert_eq!(mixed.start_cap, LineCap::Butt);
    assert_eq!(
        resolve_join(Some(vector(1.0, 0.0)), None, &mixed),
        Join::Cap {
            inner: vector(0.5, 0.5),
            outer: vector(0.5, -0.5)
        }
    );
    let mixed = EdgeOptions::default().with_start_cap(LineCap::Square);
    assert_eq!(mixed.end_cap, LineCap::Butt);
    assert_eq!(
        resolve_join(None, Some(vector(1.0, 0.0)), &mixed),
        Join::Cap {
            inner: vector(-0.5, 0.5),
            outer: vector(-0.5, -0.5)
        }
    );
    assert_eq!(mixed.with_line_cap(LineCap::Butt).start_cap, LineCap::Butt);

    let square = EdgeOptions::default().with_line_cap(LineCap::Square);
    assert_eq!(
        resolve_join(None, Some(vector(1.0, 0.0)), &square),
        Join::Cap {
            inner: vector(-0.5, 0.5),
            outer: vector(-0.5, -0.5)
        }
    );
    assert_eq!(
        resolve_join(Some(vector(1.0, 0.0)), None, &square),
        Join::Cap {
            inner: vector(0.5, 0.5),
            outer: vector(0.5, -0.5)
        }
    );
}

#[test]
fn resolve_all_joins() {
    let points = [
        crate::math::point(0.0, 0.0),
        crate::math::point(10.0, 0.0),
        crate::math::point(0.0, 1.0),
    ];
    let field = TangentField::compute(crate::path::Polygon {
        points: &points,
        closed: false,
    })
    .unwrap();

    let mut joins = Vec::new();
    let bevels = resolve_joins(&field, &EdgeOptions::default(), &mut joins);
    assert_eq!(bevels, 1);
    assert_eq!(joins.len(), 3);
    assert!(matches!(joins[0], Join::Cap { .. }));
    assert!(joins[1].is_bevel());
    assert!(matches!(joins[2], Join::Cap { .. }));
}
