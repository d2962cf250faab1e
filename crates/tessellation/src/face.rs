use crate::error::TriangulationError;
use crate::geometry_builder::{FaceGeometryBuilder, FaceMesh};
use crate::math::Point;
use crate::path::{Polygon, Polyline, Position};
use crate::{Count, MeshError, TessellationResult, VertexId};

/// A context object that can triangulate the interior of closed paths.
///
/// ## Overview
///
/// The face tessellator implements ear clipping: it walks around the polygon
/// in counter-clockwise order and repeatedly cuts off a convex vertex (an "ear")
/// whose triangle contains no other vertex of the polygon, until three vertices
/// remain. Both clockwise and counter-clockwise inputs are supported, the
/// generated triangles are always counter-clockwise in a y-up coordinate space.
///
/// Vertices that are aligned with their two neighbors are dropped without
/// generating a triangle. Holes and multiple sub-paths are not supported.
///
/// The interior of an open path is empty: no geometry is generated for it.
///
/// Simple polygons always have an ear. If none can be found, the polygon is
/// self-intersecting and a `TriangulationError` is returned. In this case the
/// geometry builder is aborted so that no partial geometry is left in the output.
///
/// # Examples
///
/// ```
/// use shapemesh_tessellation::{FaceTessellator, FaceMesh, Polyline};
///
/// // An L shape.
/// let path = Polyline::new(
///     [(0.0, 0.0), (2.0, 0.0), (2.0, 1.0), (1.0, 1.0), (1.0, 2.0), (0.0, 2.0)],
///     true,
/// ).unwrap();
///
/// let mut mesh = FaceMesh::new();
/// FaceTessellator::new().tessellate(&path, &mut mesh.builder()).unwrap();
///
/// assert_eq!(mesh.triangles.len(), 4);
/// assert_eq!(mesh.area(), 3.0);
/// ```
#[derive(Default)]
pub struct FaceTessellator {
    ids: Vec<VertexId>,
    remaining: Vec<usize>,
}

impl FaceTessellator {
    pub fn new() -> Self {
        FaceTessellator {
            ids: Vec::new(),
            remaining: Vec::new(),
        }
    }

    /// Triangulate the interior of a normalized path.
    pub fn tessellate(
        &mut self,
        path: &Polyline,
        output: &mut dyn FaceGeometryBuilder,
    ) -> TessellationResult {
        output.begin_geometry();

        if !path.is_closed() {
            output.end_geometry();
            return Ok(Count::default());
        }

        match self.triangulate(path, output) {
            Ok(count) => {
                output.end_geometry();
                Ok(count)
            }
            Err(e) => {
                tracing::warn!("face triangulation failed: {}", e);
                output.abort_geometry();
                Err(e)
            }
        }
    }

    /// Triangulate the interior of a sequence of points that hasn't been normalized yet.
    pub fn tessellate_polygon(
        &mut self,
        polygon: Polygon,
        output: &mut dyn FaceGeometryBuilder,
    ) -> TessellationResult {
        let path = Polyline::from_polygon(polygon)?;
        self.tessellate(&path, output)
    }

    fn triangulate(
        &mut self,
        path: &Polyline,
        output: &mut dyn FaceGeometryBuilder,
    ) -> Result<Count, MeshError> {
        let points = path.points();
        let mut count = Count::default();

        self.ids.clear();
        for (source, &position) in points.iter().enumerate() {
            self.ids
                .push(output.add_face_vertex(FaceVertex { position, source })?);
            count.vertices += 1;
        }

        self.remaining.clear();
        self.remaining.extend(0..points.len());
        // Zero-area paths are walked in their original order.
        if path.signed_area() < 0.0 {
            self.remaining.reverse();
        }

        while self.remaining.len() > 3 {
            let ear = self.find_ear(points)?;
            if let Clip::Ear(prev, curr, next) = ear.1 {
                output.add_triangle(self.ids[prev], self.ids[curr], self.ids[next]);
                count.triangles += 1;
            }
            self.remaining.remove(ear.0);
        }

        if let &[a, b, c] = self.remaining.as_slice() {
            let cross = (points[b] - points[a]).cross(points[c] - points[b]);
            if cross > 0.0 {
                output.add_triangle(self.ids[a], self.ids[b], self.ids[c]);
                count.triangles += 1;
            } else if cross < 0.0 {
                return Err(TriangulationError::NoEar { remaining: 3 }.into());
            }
        }

        Ok(count)
    }

    /// Returns the position in `remaining` of the next vertex to remove.
    fn find_ear(&self, points: &[Point]) -> Result<(usize, Clip), TriangulationError> {
        let m = self.remaining.len();
        for i in 0..m {
            let prev = self.remaining[(i + m - 1) % m];
            let curr = self.remaining[i];
            let next = self.remaining[(i + 1) % m];

            let (a, b, c) = (points[prev], points[curr], points[next]);
            let cross = (b - a).cross(c - b);

            if cross == 0.0 {
                return Ok((i, Clip::Collinear));
            }

            if cross < 0.0 {
                // Reflex vertex.
                continue;
            }

            let blocked = self.remaining.iter().any(|&idx| {
                if idx == prev || idx == curr || idx == next {
                    return false;
                }
                let p = points[idx];
                p != a && p != b && p != c && triangle_contains_point(a, b, c, p)
            });

            if !blocked {
                return Ok((i, Clip::Ear(prev, curr, next)));
            }
        }

        Err(TriangulationError::NoEar { remaining: m })
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Clip {
    Ear(usize, usize, usize),
    Collinear,
}

/// Whether `p` is inside or on the border of the counter-clockwise triangle `abc`.
fn triangle_contains_point(a: Point, b: Point, c: Point, p: Point) -> bool {
    (b - a).cross(p - a) >= 0.0 && (c - b).cross(p - b) >= 0.0 && (a - c).cross(p - c) >= 0.0
}

/// Vertex produced by the face tessellator.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct FaceVertex {
    pub position: Point,
    /// Index of the point in the normalized path.
    pub source: usize,
}

/// Computes the face mesh of a path.
///
/// The points are normalized first. Open paths produce an empty mesh.
pub fn generate_face_mesh<Iter>(points: Iter, closed: bool) -> Result<FaceMesh, MeshError>
where
    Iter: IntoIterator,
    Iter::Item: Position,
{
    let path = Polyline::new(points, closed)?;
    let mut mesh = FaceMesh::with_capacity(path.len(), path.len().saturating_sub(2));
    FaceTessellator::new().tessellate(&path, &mut mesh.builder())?;

    Ok(mesh)
}

#[cfg(test)]
use crate::math::point;

#[test]
fn unit_square() {
    let mesh = generate_face_mesh([[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]], true).unwrap();
    assert_eq!(mesh.vertices.len(), 4);
    assert_eq!(mesh.triangles.len(), 2);
    assert_eq!(mesh.area(), 1.0);
}

#[test]
fn open_path_is_empty() {
    let mesh = generate_face_mesh([[0.0, 0.0], [0.0, 1.0], [1.0, 1.0]], false).unwrap();
    assert!(mesh.is_empty());
    assert!(mesh.triangles.is_empty());
}

#[test]
fn collinear_vertices_are_dropped() {
    let mesh = generate_face_mesh(
        [[1.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0], [0.0, 0.0]],
        true,
    )
    .unwrap();
    assert_eq!(mesh.vertices.len(), 5);
    assert_eq!(mesh.triangles.len(), 2);
    assert_eq!(mesh.area(), 4.0);

    let flat = generate_face_mesh([[0.0, -10.0], [0.0, 0.0], [0.0, 10.0]], true).unwrap();
    assert!(flat.triangles.is_empty());
}

#[test]
fn concave_polygon() {
    // An arrow pointing right, clockwise.
    let points = [
        point(0.0, 1.0),
        point(2.0, 1.0),
        point(2.0, 2.0),
        point(4.0, 0.0),
        point(2.0, -2.0),
        point(2.0, -1.0),
        point(0.0, -1.0),
    ];
    let path = Polyline::new(&points, true).unwrap();
    assert!(path.signed_area() < 0.0);

    let mut mesh = FaceMesh::new();
    let count = FaceTessellator::new()
        .tessellate(&path, &mut mesh.builder())
        .unwrap();

    assert_eq!(count.vertices, 7);
    assert!(count.triangles <= 5);
    assert_eq!(mesh.area(), -path.signed_area());
    for &[a, b, c] in &mesh.triangles {
        let (a, b, c) = (
            mesh.vertices[a as usize],
            mesh.vertices[b as usize],
            mesh.vertices[c as usize],
        );
        assert!((b - a).cross(c - a) > 0.0);
    }
}

#[test]
fn self_intersecting_aborts() {
    // A bow tie: after the first ear, the last three vertices are clockwise.
    let bow_tie = [point(0.0, 0.0), point(2.0, 2.0), point(2.0, 0.0), point(0.0, 2.0)];
    let mut mesh = FaceMesh {
        vertices: vec![point(0.0, 0.0), point(1.0, 0.0), point(0.0, 1.0)],
        triangles: vec![[0, 1, 2]],
    };

    let result = FaceTessellator::new().tessellate_polygon(
        Polygon {
            points: &bow_tie,
            closed: true,
        },
        &mut mesh.builder(),
    );

    assert_eq!(
        result,
        Err(MeshError::Triangulation(TriangulationError::NoEar { remaining: 3 }))
    );
    // The geometry added before is untouched.
    assert_eq!(mesh.vertices.len(), 3);
    assert_eq!(mesh.triangles, vec![[0, 1, 2]]);
}
