use crate::geometry_builder::*;
use crate::math::*;
use crate::path::{LineCap, Polygon, Polyline};
use crate::{
    generate_edge_mesh, generate_edge_mesh_with_options, generate_face_mesh, resolve_joins,
    EdgeOptions, EdgeTessellator, EdgeVertex, FaceTessellator, FaceVertex, Join, MeshError,
    TangentField, VertexId,
};

use std::f64::consts::PI;

const SHARP: [[f64; 2]; 8] = [
    [1.0, 1.0],
    [10.0, 0.0],
    [1.0, -1.0],
    [0.0, -10.0],
    [-1.0, -1.0],
    [-10.0, 0.0],
    [-1.0, 1.0],
    [0.0, 10.0],
];

const SHARP2: [[f64; 2]; 5] = [[2.0, 10.0], [0.0, -5.0], [-2.0, 10.0], [-2.0, -10.0], [2.0, -10.0]];

fn regular_polygon(n: usize, radius: f64) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / n as f64;
            point(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

/// Wraps an `EdgeMeshBuilder` and checks every vertex and triangle as they are
/// generated.
struct TestBuilder<'l> {
    builder: EdgeMeshBuilder<'l>,
    line_width: f64,
}

impl<'l> GeometryBuilder for TestBuilder<'l> {
    fn begin_geometry(&mut self) {
        self.builder.begin_geometry();
    }
    fn end_geometry(&mut self) {
        self.builder.end_geometry();
    }
    fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
        assert!(a != b);
        assert!(a != c);
        assert!(b != c);
        let mesh = self.builder.mesh();
        let [pa, pb, pc] = [a, b, c].map(|id| {
            let i = id.to_usize();
            mesh.vertices[i] + mesh.offsets[i] * self.line_width
        });
        assert!(
            (pb - pa).cross(pc - pa) > 0.0,
            "clockwise triangle {:?} {:?} {:?}",
            pa,
            pb,
            pc
        );
        self.builder.add_triangle(a, b, c);
    }
    fn abort_geometry(&mut self) {
        panic!();
    }
}

impl<'l> EdgeGeometryBuilder for TestBuilder<'l> {
    fn add_edge_vertex(&mut self, vertex: EdgeVertex) -> Result<VertexId, GeometryBuilderError> {
        assert!(vertex.position.x.is_finite());
        assert!(vertex.position.y.is_finite());
        assert!(vertex.offset.x.is_finite());
        assert!(vertex.offset.y.is_finite());
        assert!(vertex.offset.square_length() != 0.0);
        self.builder.add_edge_vertex(vertex)
    }
}

fn test_edge(points: &[Point], closed: bool, options: EdgeOptions) -> EdgeMesh {
    let path = Polyline::new(points, closed).unwrap();
    let mut mesh = EdgeMesh::new();
    let count = EdgeTessellator::new()
        .tessellate(
            &path,
            &options,
            &mut TestBuilder {
                builder: mesh.builder(),
                line_width: 0.01,
            },
        )
        .unwrap();

    assert_eq!(mesh.count(), count);
    for t in &mesh.triangles {
        for &i in t {
            assert!((i as usize) < mesh.vertices.len());
        }
    }

    mesh
}

fn to_points(raw: &[[f64; 2]]) -> Vec<Point> {
    raw.iter().map(|p| point(p[0], p[1])).collect()
}

#[test]
fn test_convex_face_area() {
    for n in 3..20 {
        let polygon = regular_polygon(n, 10.0);
        let expected = Polygon {
            points: &polygon,
            closed: true,
        }
        .signed_area();

        let mesh = generate_face_mesh(&polygon, true).unwrap();
        assert_eq!(mesh.triangles.len(), n - 2);
        assert!((mesh.area() - expected).abs() < 1e-9, "n = {}", n);

        // Clockwise input gives the same area with counter-clockwise triangles.
        let reversed: Vec<Point> = polygon.iter().rev().cloned().collect();
        let mesh = generate_face_mesh(&reversed, true).unwrap();
        assert!((mesh.area() - expected).abs() < 1e-9, "n = {}", n);
    }
}

#[test]
fn test_edge_triangle_count_without_bevels() {
    // Regular polygons with at least 4 sides never exceed the default miter limit.
    for n in 4..20 {
        let polygon = regular_polygon(n, 10.0);
        let mesh = test_edge(&polygon, true, EdgeOptions::default());
        assert_eq!(mesh.triangles.len(), 2 * n);
        assert_eq!(mesh.vertices.len(), 2 * n);

        let open = test_edge(&polygon, false, EdgeOptions::default());
        assert_eq!(open.triangles.len(), 2 * (n - 1));
    }
}

#[test]
fn test_edge_counts_with_bevels() {
    for (raw, closed) in [(&SHARP[..], true), (&SHARP[..], false), (&SHARP2[..], true)] {
        let points = to_points(raw);
        let path = Polyline::new(&points, closed).unwrap();
        let field = TangentField::compute(path.as_polygon()).unwrap();
        let mut joins = Vec::new();
        let bevels = resolve_joins(&field, &EdgeOptions::default(), &mut joins);
        assert!(bevels > 0);

        assert!(joins.iter().filter(|j| j.is_bevel()).all(|j| j.fills_corner()));

        let mesh = test_edge(&points, closed, EdgeOptions::default());
        assert_eq!(mesh.vertices.len(), 2 * path.len() + 2 * bevels);
        assert_eq!(mesh.triangles.len(), 2 * path.segment_count() + bevels);
    }
}

#[test]
fn test_join_offsets() {
    let points = to_points(&SHARP);
    let field = TangentField::compute(Polygon {
        points: &points,
        closed: true,
    })
    .unwrap();

    let mut joins = Vec::new();
    resolve_joins(&field, &EdgeOptions::default(), &mut joins);

    let mut miters = 0;
    let mut bevels = 0;
    for join in &joins {
        let pair = join.offsets();
        match join {
            Join::Miter { .. } => {
                miters += 1;
                assert_eq!(pair.inner, -pair.outer);
                assert!(pair.inner.length() >= 0.5 - 1e-12);
                assert!(pair.inner.length() <= 0.5 * EdgeOptions::DEFAULT_MITER_LIMIT + 1e-12);
            }
            Join::Bevel { .. } => {
                bevels += 1;
                assert!((pair.inner.length() - 0.5).abs() < 1e-12);
                assert!((pair.outer.length() - 0.5).abs() < 1e-12);
                assert!((pair.inner + pair.outer).square_length() > 1e-12);
            }
            Join::Cap { .. } => panic!("no cap in a closed path"),
        }
    }

    // The zig-zag alternates between blunt and very sharp corners.
    assert_eq!(miters, 4);
    assert_eq!(bevels, 4);
}

#[test]
fn test_direction_reversals() {
    // (points, closed, expected vertices, expected triangles)
    let cases: [(&[[f64; 2]], bool, usize, usize); 3] = [
        // Back and forth twice.
        (&[[0.0, 0.0], [1.0, 0.0], [0.0, 0.0], [1.0, 0.0]], false, 12, 6),
        // Closed and flat: turns around at both ends.
        (&[[0.0, 0.0], [2.0, 0.0], [1.0, 0.0]], true, 10, 6),
        // Not axis aligned.
        (&[[0.0, 0.0], [3.0, 1.0], [0.0, 0.0], [3.0, 1.0], [0.0, 0.0]], false, 16, 8),
    ];

    for (raw, closed, vertices, triangles) in cases {
        let points = to_points(raw);
        let path = Polyline::new(&points, closed).unwrap();
        let field = TangentField::compute(path.as_polygon()).unwrap();
        let mut joins = Vec::new();
        let bevels = resolve_joins(&field, &EdgeOptions::default(), &mut joins);
        let filled = joins.iter().filter(|j| j.fills_corner()).count();
        assert_eq!(filled, 0);

        let mesh = test_edge(&points, closed, EdgeOptions::default());
        assert_eq!(mesh.vertices.len(), vertices);
        assert_eq!(mesh.triangles.len(), triangles);
        assert_eq!(mesh.vertices.len(), 2 * path.len() + 2 * bevels);
        assert_eq!(mesh.triangles.len(), 2 * path.segment_count() + filled);

        // Same thing with bevels requested everywhere.
        let mesh = test_edge(&points, closed, EdgeOptions::bevel());
        assert_eq!(mesh.triangles.len(), triangles);
    }
}

#[test]
fn test_sharp_zigzag_is_finite() {
    let mesh = generate_edge_mesh(SHARP, true).unwrap();

    for (p, o) in mesh.vertices.iter().zip(mesh.offsets.iter()) {
        assert!(p.x.is_finite() && p.y.is_finite());
        assert!(o.x.is_finite() && o.y.is_finite());
    }
    for t in &mesh.triangles {
        for &i in t {
            assert!((i as usize) < mesh.vertices.len());
        }
    }
}

#[test]
fn test_single_segment() {
    let mesh = generate_edge_mesh([[0.0, 0.0], [1.0, 0.0]], false).unwrap();
    assert_eq!(mesh.triangles.len(), 2);
    assert_eq!(mesh.vertices.len(), 4);
    for o in &mesh.offsets {
        assert_eq!(o.length(), 0.5);
        assert_eq!(o.x, 0.0);
    }
}

#[test]
fn test_unit_square() {
    let square = [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]];

    let face = generate_face_mesh(square, true).unwrap();
    assert_eq!(face.area(), 1.0);

    let edge = generate_edge_mesh(square, true).unwrap();
    assert_eq!(edge.triangles.len(), 8);
    assert_eq!(edge.vertices.len(), 8);

    // Also holds with an explicit closing point.
    let closing = [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
    assert_eq!(generate_edge_mesh(closing, true).unwrap(), edge);
    assert_eq!(generate_face_mesh(closing, true).unwrap(), face);
}

#[test]
fn test_idempotence() {
    let points = to_points(&SHARP2);
    let options = EdgeOptions::default().with_line_cap(LineCap::Square);

    let a = generate_edge_mesh_with_options(&points, false, &options).unwrap();
    let b = generate_edge_mesh_with_options(&points, false, &options).unwrap();
    assert_eq!(a, b);

    let a = generate_face_mesh(&points, true).unwrap();
    let b = generate_face_mesh(&points, true).unwrap();
    assert_eq!(a, b);

    // A reused tessellator gives the same result as a fresh one.
    let path = Polyline::new(&points, true).unwrap();
    let mut tessellator = EdgeTessellator::new();
    let mut first = EdgeMesh::new();
    let mut second = EdgeMesh::new();
    tessellator.tessellate(&path, &options, &mut first.builder()).unwrap();
    tessellator.tessellate(&path, &options, &mut second.builder()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_scale_independence() {
    let points = to_points(&SHARP);
    let reference = generate_edge_mesh(&points, true).unwrap();

    for scale in [1e-200, 1e-3, 1e3, 1e200] {
        let scaled: Vec<Point> = points.iter().map(|p| (p.to_vector() * scale).to_point()).collect();
        let mesh = generate_edge_mesh(&scaled, true).unwrap();

        assert_eq!(mesh.triangles, reference.triangles);
        for (a, b) in mesh.offsets.iter().zip(reference.offsets.iter()) {
            assert!((*a - *b).length() < 1e-9, "scale {}: {:?} != {:?}", scale, a, b);
        }
    }
}

#[test]
fn test_bevel_line_join() {
    let polygon = regular_polygon(6, 10.0);
    let mesh = test_edge(&polygon, true, EdgeOptions::bevel());

    // A hexagon turns by 60 degrees at each corner.
    assert_eq!(mesh.vertices.len(), 4 * 6);
    assert_eq!(mesh.triangles.len(), 3 * 6);
}

#[test]
fn test_square_caps() {
    let points = to_points(&SHARP2);
    let options = EdgeOptions::default().with_line_cap(LineCap::Square);
    let butt = test_edge(&points, false, EdgeOptions::default());
    let square = test_edge(&points, false, options);

    assert_eq!(butt.triangles, square.triangles);
    let last = square.offsets.len() - 1;
    assert!(square.offsets[0].length() > butt.offsets[0].length());
    assert!(square.offsets[last].length() > butt.offsets[last].length());
}

#[test]
fn test_inverted_winding() {
    let polygon = regular_polygon(5, 1.0);
    let path = Polyline::new(&polygon, true).unwrap();

    let mut mesh = FaceMesh::new();
    FaceTessellator::new()
        .tessellate(&path, &mut mesh.builder().with_inverted_winding())
        .unwrap();

    assert!((mesh.area() + path.signed_area()).abs() < 1e-12);
}

#[test]
fn test_too_many_vertices() {
    /// Checks that the tessellators return the proper error when the geometry
    /// builder runs out of vertex ids.
    struct Builder {
        max_vertices: u32,
    }

    impl GeometryBuilder for Builder {
        fn add_triangle(&mut self, _a: VertexId, _b: VertexId, _c: VertexId) {}
    }

    impl EdgeGeometryBuilder for Builder {
        fn add_edge_vertex(&mut self, _: EdgeVertex) -> Result<VertexId, GeometryBuilderError> {
            if self.max_vertices == 0 {
                return Err(GeometryBuilderError::TooManyVertices);
            }
            self.max_vertices -= 1;
            Ok(VertexId(self.max_vertices))
        }
    }

    impl FaceGeometryBuilder for Builder {
        fn add_face_vertex(&mut self, _: FaceVertex) -> Result<VertexId, GeometryBuilderError> {
            if self.max_vertices == 0 {
                return Err(GeometryBuilderError::TooManyVertices);
            }
            self.max_vertices -= 1;
            Ok(VertexId(self.max_vertices))
        }
    }

    let path = Polyline::new(regular_polygon(8, 1.0), true).unwrap();
    let expected = Err(MeshError::GeometryBuilder(GeometryBuilderError::TooManyVertices));

    for max_vertices in [0, 1, 5, 15] {
        assert_eq!(
            EdgeTessellator::new().tessellate(
                &path,
                &EdgeOptions::default(),
                &mut Builder { max_vertices }
            ),
            expected
        );
    }
    for max_vertices in [0, 1, 7] {
        assert_eq!(
            FaceTessellator::new().tessellate(&path, &mut Builder { max_vertices }),
            expected
        );
    }
}

#[test]
fn test_no_output() {
    let path = Polyline::new(to_points(&SHARP), true).unwrap();
    let mut mesh = EdgeMesh::new();
    let mut tessellator = EdgeTessellator::new();

    let counted = tessellator
        .tessellate(&path, &EdgeOptions::default(), &mut NoOutput::new())
        .unwrap();
    let built = tessellator
        .tessellate(&path, &EdgeOptions::default(), &mut mesh.builder())
        .unwrap();

    assert_eq!(counted, built);
}
