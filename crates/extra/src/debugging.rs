//! Vector fields describing how a mesh was built, and a tool to reduce failing
//! inputs to a minimal test case.
//!
//! Every generator returns [`OriginVector`]s: an origin and a direction, which
//! are typically drawn as arrows over the shapes.

use crate::math::{Point, Vector};
use crate::path::{Polygon, Polyline};
use crate::tessellation::{
    compute_meshes, EdgeMesh, FaceMesh, Shape, TangentField, ZeroLengthSegmentError,
};

use std::panic;

/// A vector anchored at a point.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct OriginVector {
    pub origin: Point,
    pub direction: Vector,
}

impl OriginVector {
    #[inline]
    pub fn new(origin: Point, direction: Vector) -> Self {
        OriginVector { origin, direction }
    }

    /// Where the arrow ends.
    #[inline]
    pub fn tip(&self) -> Point {
        self.origin + self.direction
    }
}

/// The unit tangent of each point of a path, anchored at the point.
pub fn order_vectors(polygon: Polygon) -> Result<Vec<OriginVector>, ZeroLengthSegmentError> {
    let field = TangentField::compute(polygon)?;

    Ok(field
        .as_slice()
        .iter()
        .map(|t| OriginVector::new(t.position, t.direction))
        .collect())
}

/// The construction lines of the miter joins.
///
/// The first half contains the tangents scaled by 1/2. The second half contains,
/// for each point, the opposite of the previous point's half tangent anchored at
/// the tip of the point's own half tangent.
pub fn miter_helper_vectors(order: &[OriginVector]) -> Vec<OriginVector> {
    let n = order.len();
    let mut result = Vec::with_capacity(n * 2);

    result.extend(
        order
            .iter()
            .map(|o| OriginVector::new(o.origin, o.direction * 0.5)),
    );

    for (i, o) in order.iter().enumerate() {
        let previous = &order[(i + n - 1) % n];
        result.push(OriginVector::new(
            o.origin + o.direction * 0.5,
            -previous.direction * 0.5,
        ));
    }

    result
}

/// For each half tangent, the half tangent rotated by +90 degrees anchored at its
/// middle.
pub fn orthogonal_vectors(order: &[OriginVector]) -> Vec<OriginVector> {
    order
        .iter()
        .map(|o| {
            let half = o.direction * 0.5;
            OriginVector::new(o.origin + half, Vector::new(-half.y, half.x))
        })
        .collect()
}

/// The offset of each edge vertex, anchored at its position on the path.
pub fn miter_vectors(mesh: &EdgeMesh) -> Vec<OriginVector> {
    mesh.vertices
        .iter()
        .zip(mesh.offsets.iter())
        .map(|(p, o)| OriginVector::new(*p, *o))
        .collect()
}

/// Edge vertex positions for a line of width 1.
pub fn join_points(mesh: &EdgeMesh) -> Vec<Point> {
    mesh.draw_positions(1.0).collect()
}

/// Three vectors per triangle following its borders, for a line of width 1.
pub fn edge_triangle_borders(mesh: &EdgeMesh) -> Vec<OriginVector> {
    let positions = join_points(mesh);
    triangle_borders(&positions, &mesh.triangles)
}

/// Three vectors per triangle following its borders.
pub fn face_triangle_borders(mesh: &FaceMesh) -> Vec<OriginVector> {
    triangle_borders(&mesh.vertices, &mesh.triangles)
}

fn triangle_borders(positions: &[Point], triangles: &[[u32; 3]]) -> Vec<OriginVector> {
    let mut result = Vec::with_capacity(triangles.len() * 3);
    for &[a, b, c] in triangles {
        let a = positions[a as usize];
        let b = positions[b as usize];
        let c = positions[c as usize];
        result.push(OriginVector::new(a, b - a));
        result.push(OriginVector::new(b, c - b));
        result.push(OriginVector::new(c, a - c));
    }

    result
}

/// All of the debugging vectors of a collection of shapes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Helpers {
    pub join_points: Vec<Point>,
    pub order_vectors: Vec<OriginVector>,
    pub miter_helper: Vec<OriginVector>,
    pub orthogonal_vectors: Vec<OriginVector>,
    pub miter_vectors: Vec<OriginVector>,
    pub edge_triangle_borders: Vec<OriginVector>,
    pub face_triangle_borders: Vec<OriginVector>,
}

impl Helpers {
    /// Meshes the shapes and computes the debugging vectors of all of them.
    ///
    /// Shapes that can't be normalized are skipped.
    pub fn from_shapes(shapes: &[Shape]) -> Self {
        let batch = compute_meshes(shapes);

        let mut helpers = Helpers {
            join_points: join_points(&batch.edge),
            miter_vectors: miter_vectors(&batch.edge),
            edge_triangle_borders: edge_triangle_borders(&batch.edge),
            face_triangle_borders: face_triangle_borders(&batch.face),
            ..Helpers::default()
        };

        for shape in shapes {
            let order = match Polyline::new(&shape.points, shape.closed)
                .ok()
                .and_then(|path| order_vectors(path.as_polygon()).ok())
            {
                Some(order) => order,
                None => continue,
            };

            helpers.miter_helper.extend(miter_helper_vectors(&order));
            helpers.orthogonal_vectors.extend(orthogonal_vectors(&order));
            helpers.order_vectors.extend(order);
        }

        helpers
    }
}

/// Removes points from a failing input as long as it keeps failing, and prints
/// the result as a test case.
///
/// `cb` returns true (or panics) when the input reproduces the failure.
pub fn find_reduced_test_case<F>(points: &[Point], closed: bool, cb: &F) -> Vec<Point>
where
    F: Fn(&[Point], bool) -> bool + panic::UnwindSafe + panic::RefUnwindSafe,
{
    let min_points = if closed {
        Polyline::MIN_CLOSED_POINTS
    } else {
        Polyline::MIN_OPEN_POINTS
    };

    let mut points = points.to_vec();

    println!(" -- removing vertices...");

    let mut v = 0;
    loop {
        if v >= points.len() || points.len() <= min_points {
            break;
        }

        let mut cloned = points.clone();
        cloned.remove(v);

        let failed = panic::catch_unwind(|| cb(&cloned, closed)).unwrap_or(true);

        if failed {
            points = cloned;
            continue;
        }

        v += 1;
    }

    println!(" ----------- reduced test case: -----------\n\n");
    println!("#[test]");
    println!("fn reduced_test_case() {{");
    println!("    let points = [");
    for p in &points {
        println!("        point({:?}, {:?}),", p.x, p.y);
    }
    println!("    ];\n");
    println!("    test_shape(&points, {});", closed);
    println!("}}\n\n");

    points
}

#[cfg(test)]
use crate::math::{point, vector};

#[cfg(test)]
fn square_order() -> Vec<OriginVector> {
    let points = [point(0.0, 0.0), point(0.0, 1.0), point(1.0, 1.0), point(1.0, 0.0)];
    order_vectors(Polygon {
        points: &points,
        closed: true,
    })
    .unwrap()
}

#[test]
fn test_order_vectors() {
    let order = square_order();
    assert_eq!(order.len(), 4);
    assert_eq!(order[0], OriginVector::new(point(0.0, 0.0), vector(0.0, 1.0)));
    assert_eq!(order[3], OriginVector::new(point(1.0, 0.0), vector(-1.0, 0.0)));
    assert_eq!(order[3].tip(), point(0.0, 0.0));

    let points = [point(0.0, 0.0), point(0.0, 0.0)];
    assert!(order_vectors(Polygon {
        points: &points,
        closed: false,
    })
    .is_err());
}

#[test]
fn test_miter_helper_vectors() {
    let order = square_order();
    let helper = miter_helper_vectors(&order);

    assert_eq!(helper.len(), 8);
    assert_eq!(helper[1], OriginVector::new(point(0.0, 1.0), vector(0.5, 0.0)));
    // Anchored at the tip of the first half tangent, pointing back along the
    // closing segment.
    assert_eq!(helper[4], OriginVector::new(point(0.0, 0.5), vector(0.5, 0.0)));
}

#[test]
fn test_orthogonal_vectors() {
    let order = square_order();
    let orthogonal = orthogonal_vectors(&order);

    assert_eq!(orthogonal.len(), 4);
    assert_eq!(orthogonal[0], OriginVector::new(point(0.0, 0.5), vector(-0.5, 0.0)));
    for (o, t) in orthogonal.iter().zip(order.iter()) {
        assert_eq!(o.direction.dot(t.direction), 0.0);
    }
}

#[test]
fn test_mesh_vectors() {
    let mesh = crate::tessellation::generate_edge_mesh([[0.0, 0.0], [2.0, 0.0]], false).unwrap();

    let miters = miter_vectors(&mesh);
    assert_eq!(miters.len(), 4);
    assert_eq!(miters[0].origin, point(0.0, 0.0));

    let points = join_points(&mesh);
    assert_eq!(points, vec![point(0.0, 0.5), point(0.0, -0.5), point(2.0, 0.5), point(2.0, -0.5)]);

    let borders = edge_triangle_borders(&mesh);
    assert_eq!(borders.len(), 6);
    // Each triangle's borders form a closed loop.
    for tri in borders.chunks(3) {
        let sum = tri[0].direction + tri[1].direction + tri[2].direction;
        assert_eq!(sum, vector(0.0, 0.0));
        assert_eq!(tri[0].tip(), tri[1].origin);
        assert_eq!(tri[1].tip(), tri[2].origin);
    }

    let face = crate::tessellation::generate_face_mesh([[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]], true).unwrap();
    let borders = face_triangle_borders(&face);
    assert_eq!(borders.len(), 3);
    assert_eq!(borders[0], OriginVector::new(point(0.0, 0.0), vector(1.0, 0.0)));
}

#[test]
fn test_helpers_from_shapes() {
    let shapes = [
        Shape::new([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)], true),
        Shape::new([(5.0, 5.0)], false),
        Shape::new([(0.0, 0.0), (1.0, 0.0)], false),
    ];

    let helpers = Helpers::from_shapes(&shapes);
    assert_eq!(helpers.order_vectors.len(), 4 + 2);
    assert_eq!(helpers.miter_helper.len(), 2 * (4 + 2));
    assert_eq!(helpers.orthogonal_vectors.len(), 4 + 2);
    assert_eq!(helpers.join_points.len(), 8 + 4);
    assert_eq!(helpers.miter_vectors.len(), 8 + 4);
    assert_eq!(helpers.edge_triangle_borders.len(), 3 * (8 + 2));
    assert_eq!(helpers.face_triangle_borders.len(), 3 * 2);
}

#[test]
fn test_find_reduced_test_case() {
    // Fails whenever the point (5, 5) is present.
    let fails = |points: &[Point], _closed: bool| points.contains(&point(5.0, 5.0));

    let points = [
        point(0.0, 0.0),
        point(1.0, 0.0),
        point(5.0, 5.0),
        point(2.0, 3.0),
        point(0.0, 4.0),
    ];

    let reduced = find_reduced_test_case(&points, true, &fails);
    assert_eq!(reduced.len(), 3);
    assert!(reduced.contains(&point(5.0, 5.0)));
}
