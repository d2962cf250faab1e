use shapemesh::math::Point;
use shapemesh::path::Polyline;
use shapemesh::tessellation::{compute_meshes, Execution, MeshBatch, Shape};
use shapemesh_extra::debugging::Helpers;
use shapemesh_extra::fixtures::calibration_shapes;

fn signed_area(points: &[Point]) -> f64 {
    Polyline::new(points, true).unwrap().signed_area()
}

fn face_area(batch: &MeshBatch, shape: usize) -> f64 {
    let ranges = &batch.ranges[shape];
    batch.face.triangles[ranges.face_triangles.clone()]
        .iter()
        .map(|&[a, b, c]| {
            let (a, b, c) = (
                batch.face.vertices[a as usize],
                batch.face.vertices[b as usize],
                batch.face.vertices[c as usize],
            );
            (b - a).cross(c - a) * 0.5
        })
        .sum()
}

#[test]
fn calibration_shapes_mesh_without_errors() {
    let shapes = calibration_shapes();
    let batch = compute_meshes(&shapes);

    assert!(batch.errors.is_empty(), "{:?}", batch.errors);
    assert_eq!(batch.ranges.len(), shapes.len());
}

#[test]
fn edge_counts() {
    let shapes = calibration_shapes();
    let batch = compute_meshes(&shapes);

    for (idx, (shape, ranges)) in shapes.iter().zip(batch.ranges.iter()).enumerate() {
        let n = shape.points.len();
        let segments = if shape.closed { n } else { n - 1 };

        // Each bevel adds two vertices and one triangle.
        let triangles = ranges.edge_triangles.len();
        assert!(triangles >= 2 * segments, "shape #{}", idx);
        let bevels = triangles - 2 * segments;
        assert_eq!(ranges.edge_vertices.len(), 2 * n + 2 * bevels, "shape #{}", idx);
    }

    let counts: Vec<(usize, usize)> = batch
        .ranges
        .iter()
        .map(|r| (r.edge_vertices.len(), r.edge_triangles.len()))
        .collect();

    // Smooth shapes have no bevels.
    assert_eq!(counts[0], (8, 8));
    assert_eq!(counts[1], (20, 20));
    assert_eq!(counts[6], (8, 6));
    assert_eq!(counts[7], (20, 18));
    assert_eq!(counts[8], (6, 4));
    // The corners of the equilateral triangle are exactly on the miter limit,
    // which keeps them mitered.
    assert_eq!(counts[2], (6, 6));
    // Every spike of the stars is beveled.
    assert_eq!(counts[4], (24, 20));
    assert_eq!(counts[5], (24, 20));
    assert_eq!(counts[3], (16, 13));
    assert_eq!(counts[9], (20, 16));
}

#[test]
fn face_areas() {
    let shapes = calibration_shapes();
    let batch = compute_meshes(&shapes);

    for (idx, shape) in shapes.iter().enumerate() {
        let ranges = &batch.ranges[idx];
        if !shape.closed {
            assert!(ranges.face_vertices.is_empty(), "shape #{}", idx);
            assert!(ranges.face_triangles.is_empty(), "shape #{}", idx);
            continue;
        }

        let expected = signed_area(&shape.points).abs();
        let area = face_area(&batch, idx);
        assert!(
            (area - expected).abs() <= 1e-9 * expected,
            "shape #{}: {} != {}",
            idx,
            area,
            expected
        );
        assert_eq!(ranges.face_triangles.len(), shape.points.len() - 2, "shape #{}", idx);
    }
}

#[test]
fn face_triangles_are_counter_clockwise() {
    let batch = compute_meshes(&calibration_shapes());

    for &[a, b, c] in &batch.face.triangles {
        let (a, b, c) = (
            batch.face.vertices[a as usize],
            batch.face.vertices[b as usize],
            batch.face.vertices[c as usize],
        );
        assert!((b - a).cross(c - a) > 0.0);
    }
}

#[test]
fn reversed_shapes_have_the_same_counts() {
    let shapes = calibration_shapes();

    let reversed: Vec<Shape> = shapes
        .iter()
        .map(|s| Shape::new(s.points.iter().rev(), s.closed))
        .collect();

    let a = compute_meshes(&shapes);
    let b = compute_meshes(&reversed);

    assert_eq!(a.edge.count(), b.edge.count());
    assert_eq!(a.face.count(), b.face.count());
}

#[test]
fn execution_mode_does_not_change_the_output() {
    let shapes = calibration_shapes();
    assert_eq!(
        MeshBatch::compute_with(&shapes, Execution::Sequential),
        MeshBatch::compute_with(&shapes, Execution::Parallel),
    );
}

#[test]
fn offsets_are_bounded() {
    let batch = compute_meshes(&calibration_shapes());

    // Miters longer than the default limit of 2 half widths are beveled.
    for offset in &batch.edge.offsets {
        assert!(offset.x.is_finite() && offset.y.is_finite());
        assert!(offset.length() <= 1.0 + 1e-9, "{:?}", offset);
    }
}

#[test]
fn debugging_helpers() {
    let shapes = calibration_shapes();
    let batch = compute_meshes(&shapes);
    let helpers = Helpers::from_shapes(&shapes);

    let points: usize = shapes.iter().map(|s| s.points.len()).sum();
    assert_eq!(helpers.order_vectors.len(), points);
    assert_eq!(helpers.miter_helper.len(), 2 * points);
    assert_eq!(helpers.orthogonal_vectors.len(), points);
    assert_eq!(helpers.join_points.len(), batch.edge.vertices.len());
    assert_eq!(helpers.miter_vectors.len(), batch.edge.vertices.len());
    assert_eq!(helpers.edge_triangle_borders.len(), 3 * batch.edge.triangles.len());
    assert_eq!(helpers.face_triangle_borders.len(), 3 * batch.face.triangles.len());

    for v in &helpers.order_vectors {
        assert!((v.direction.length() - 1.0).abs() < 1e-12);
    }
}
