//! Various math tools that are mostly useful for the tessellators.

use crate::math::*;

/// Below this value, the bisector of two tangents is considered undefined.
const EPSILON: f64 = 1e-8;

/// Relative slack of the miter limit test. Miters whose length is the limit up
/// to rounding errors are kept.
const MITER_LIMIT_TOLERANCE: f64 = 1e-9;

/// The unit vector pointing from `from` to `to`, or `None` if both points
/// are at the same position.
///
/// The difference is rescaled before being normalized so that the result
/// stays accurate for very small and very large segments. Coordinates close
/// to `f64::MAX` whose difference overflows are halved first.
pub fn unit_direction(from: Point, to: Point) -> Option<Vector> {
    let mut d = to - from;
    if !d.x.is_finite() || !d.y.is_finite() {
        d = to.to_vector() * 0.5 - from.to_vector() * 0.5;
    }

    let scale = d.x.abs().max(d.y.abs());
    if scale == 0.0 || !scale.is_finite() {
        return None;
    }

    let d = d / scale;
    Some(d / d.length())
}

/// The tangent rotated by +90 degrees.
#[inline]
pub fn left_normal(t: Vector) -> Vector {
    vector(-t.y, t.x)
}

/// Compute a normal vector at a point P such that ```x ---v1----> P ---v2---> x```
///
/// The resulting vector is not normalized. The length is such that extruding the shape
/// would yield parallel segments exactly 1 unit away from their original.
/// The normal points towards the positive side of v1.
///
/// Returns `None` if the path goes back onto itself at P, in which case no finite
/// miter exists.
///
/// v1 and v2 are expected to be normalized.
pub fn compute_normal(v1: Vector, v2: Vector) -> Option<Vector> {
    let n1 = left_normal(v1);

    let v12 = v1 + v2;

    if v12.square_length() < EPSILON {
        return None;
    }

    let tangent = v12.normalize();
    let n = left_normal(tangent);

    let inv_len = n.dot(n1);

    if inv_len < EPSILON {
        return None;
    }

    Some(n / inv_len)
}

/// Returns true if a miter of the given length (relative to the half line
/// width) is longer than the limit.
///
/// A miter exactly as long as the limit is not exceeded, even when rounding
/// puts its computed length a few ulps above it.
#[inline]
pub fn miter_limit_is_exceeded(normal: Vector, miter_limit: f64) -> bool {
    normal.square_length() > miter_limit * miter_limit * (1.0 + MITER_LIMIT_TOLERANCE)
}

#[cfg(test)]
fn assert_almost_eq(a: Vector, b: Vector) {
    if (a - b).square_length() > 0.00001 {
        panic!("assert almost equal: {:?} != {:?}", a, b);
    }
}

#[test]
fn test_compute_normal() {
    assert_almost_eq(
        compute_normal(vector(1.0, 0.0), vector(0.0, 1.0)).unwrap(),
        vector(-1.0, 1.0),
    );
    assert_almost_eq(
        compute_normal(vector(1.0, 0.0), vector(0.0, -1.0)).unwrap(),
        vector(1.0, 1.0),
    );
    assert_almost_eq(
        compute_normal(vector(1.0, 0.0), vector(1.0, 0.0)).unwrap(),
        vector(0.0, 1.0),
    );
    assert_eq!(compute_normal(vector(1.0, 0.0), vector(-1.0, 0.0)), None);
}

#[test]
fn test_miter_limit() {
    let right_angle = compute_normal(vector(1.0, 0.0), vector(0.0, 1.0)).unwrap();
    // The miter of a right angle is sqrt(2) times longer than the half width.
    assert!(!miter_limit_is_exceeded(right_angle, 2.0));
    assert!(miter_limit_is_exceeded(right_angle, 1.4));

    let sharp = compute_normal(vector(1.0, 0.0), vector(-0.9, 0.1).normalize()).unwrap();
    assert!(miter_limit_is_exceeded(sharp, 2.0));

    // The corners of an equilateral triangle sit exactly on a limit of 2.
    let angle = 2.0 * std::f64::consts::PI / 3.0;
    let turn = vector(angle.cos(), angle.sin());
    let equilateral = compute_normal(vector(1.0, 0.0), turn).unwrap();
    assert!((equilateral.length() - 2.0).abs() < 1e-12);
    assert!(!miter_limit_is_exceeded(equilateral, 2.0));
    assert!(!miter_limit_is_exceeded(equilateral * (1.0 + 1e-12), 2.0));
    assert!(miter_limit_is_exceeded(equilateral * (1.0 + 1e-6), 2.0));
}

#[test]
fn test_unit_direction() {
    assert_almost_eq(
        unit_direction(point(0.0, 0.0), point(3.0, 4.0)).unwrap(),
        vector(0.6, 0.8),
    );
    assert_almost_eq(
        unit_direction(point(1e-300, 0.0), point(0.0, 1e-300)).unwrap(),
        vector(-1.0, 1.0).normalize(),
    );
    assert_almost_eq(
        unit_direction(point(-f64::MAX, 0.0), point(f64::MAX, 0.0)).unwrap(),
        vector(1.0, 0.0),
    );
    assert_eq!(unit_direction(point(2.0, 2.0), point(2.0, 2.0)), None);
}
