//! Shapes that exercise the interesting cases of the mesh generators: regular
//! polygons, very sharp spikes, an open path, collinear points and an irregular
//! hexagon.

use crate::math::{vector, Point, Vector};
use crate::tessellation::Shape;

/// An eight pointed star with very sharp spikes.
pub const SHARP: [[f64; 2]; 8] = [
    [1.0, 1.0],
    [10.0, 0.0],
    [1.0, -1.0],
    [0.0, -10.0],
    [-1.0, -1.0],
    [-10.0, 0.0],
    [-1.0, 1.0],
    [0.0, 10.0],
];

/// A concave "W" shape with one spike pointing inside.
pub const SHARP2: [[f64; 2]; 5] = [
    [2.0, 10.0],
    [0.0, -5.0],
    [-2.0, 10.0],
    [-2.0, -10.0],
    [2.0, -10.0],
];

/// Three sides of a square of size 10, in clockwise order.
pub const SQUARE_PATH: [[f64; 2]; 4] = [[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0]];

/// Three aligned points.
pub const COLLINEAR: [[f64; 2]; 3] = [[0.0, -10.0], [0.0, 0.0], [0.0, 10.0]];

/// An irregular concave hexagon.
pub const HEXAGON: [[f64; 2]; 6] = [
    [10.97627008, 14.30378733],
    [12.05526752, 10.89766366],
    [8.47309599, 12.91788226],
    [8.75174423, 17.83546002],
    [19.27325521, 7.66883038],
    [15.83450076, 10.5778984],
];

/// The vertices of a regular polygon centered at the origin, starting at
/// `(radius, 0)` in counter-clockwise order.
pub fn regular_polygon(n: usize, radius: f64) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / n as f64;
            Point::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

fn translated<'l>(points: impl IntoIterator<Item = &'l [f64; 2]>, by: Vector) -> Vec<Point> {
    points
        .into_iter()
        .map(|p| Point::new(p[0], p[1]) + by)
        .collect()
}

fn moved(points: Vec<Point>, by: Vector) -> Vec<Point> {
    points.into_iter().map(|p| p + by).collect()
}

/// Ten shapes laid out side by side without overlapping.
///
/// The first six are closed polygons, followed by three open paths and a closed
/// hexagon.
pub fn calibration_shapes() -> Vec<Shape> {
    vec![
        Shape::new(regular_polygon(4, 10.0), true),
        Shape::new(moved(regular_polygon(10, 10.0), vector(25.0, 0.0)), true),
        Shape::new(moved(regular_polygon(3, 10.0), vector(0.0, 25.0)), true),
        Shape::new(translated(&SHARP2, vector(25.0, 25.0)), true),
        Shape::new(translated(&SHARP, vector(50.0, 0.0)), true),
        Shape::new(translated(SHARP.iter().rev(), vector(50.0, 26.0)), true),
        Shape::new(translated(&SQUARE_PATH, vector(0.0, 50.0)), false),
        Shape::new(moved(regular_polygon(10, 10.0), vector(25.0, 50.0)), false),
        Shape::new(translated(&COLLINEAR, vector(50.0, 50.0)), false),
        Shape::new(translated(&HEXAGON, vector(60.0, -15.0)), true),
    ]
}

#[cfg(test)]
use crate::math::point;

#[test]
fn test_regular_polygon() {
    let square = regular_polygon(4, 10.0);
    assert_eq!(square.len(), 4);
    assert_eq!(square[0], point(10.0, 0.0));
    for p in &square {
        assert!((p.to_vector().length() - 10.0).abs() < 1e-12);
    }
    assert!((square[1] - point(0.0, 10.0)).length() < 1e-12);

    assert!(regular_polygon(0, 1.0).is_empty());
}

#[test]
fn test_calibration_shapes() {
    let shapes = calibration_shapes();
    assert_eq!(shapes.len(), 10);

    let closed: Vec<bool> = shapes.iter().map(|s| s.closed).collect();
    assert_eq!(
        closed,
        vec![true, true, true, true, true, true, false, false, false, true]
    );

    assert_eq!(shapes[3].points[0], point(27.0, 35.0));
    assert_eq!(shapes[5].points[0], point(50.0, 36.0));
    assert_eq!(shapes[5].points[7], point(51.0, 27.0));
    assert_eq!(shapes[8].points, vec![point(50.0, 40.0), point(50.0, 50.0), point(50.0, 60.0)]);
    assert_eq!(shapes[9].points.len(), 6);
}
