use crate::geometry_builder::{EdgeGeometryBuilder, EdgeMesh, GeometryBuilderError};
use crate::math::{Point, Vector};
use crate::path::{Polygon, Polyline, Position, Side};
use crate::{
    resolve_joins, Count, EdgeOptions, Join, MeshError, OffsetPair, TangentField,
    TessellationResult, VertexId,
};

/// A context object that can build the edge mesh of paths.
///
/// ## Overview
///
/// The edge of a path is a ribbon of triangles following the path, two
/// triangles per segment. The ribbon is built for a line of width 1 and
/// centered on the path: each vertex has the position of a path point and an
/// offset toward one side of the path. Scaling the offsets by a line width
/// (for example in a vertex shader) thickens the ribbon without generating
/// the geometry again.
///
/// At each point the adjacent segments are connected by a miter join. When the
/// miter would be longer than `EdgeOptions::miter_limit` times the half width,
/// a bevel join is used instead: both segments keep their own perpendicular
/// offsets and one extra triangle fills the gap on the convex side. Where the
/// path turns back onto itself the two segments overlap and no triangle is
/// added. The two ends of open paths get a cap.
///
/// All triangles are counter-clockwise in a y-up coordinate space.
///
/// Since the ribbon is generated segment by segment, self-intersecting paths
/// produce overlapping triangles.
///
/// The tessellator keeps its scratch buffers between calls so that a single
/// instance can be reused to tessellate many paths.
///
/// # Examples
///
/// ```
/// use shapemesh_tessellation::{EdgeOptions, EdgeTessellator, EdgeMesh, Polyline};
///
/// let path = Polyline::new([(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)], false).unwrap();
///
/// let mut mesh = EdgeMesh::new();
/// let mut tessellator = EdgeTessellator::new();
/// tessellator
///     .tessellate(&path, &EdgeOptions::default(), &mut mesh.builder())
///     .unwrap();
///
/// // Three points and a right angle, no bevel.
/// assert_eq!(mesh.vertices.len(), 6);
/// assert_eq!(mesh.triangles.len(), 4);
/// ```
#[derive(Default)]
pub struct EdgeTessellator {
    tangents: TangentField,
    joins: Vec<Join>,
}

impl EdgeTessellator {
    pub fn new() -> Self {
        EdgeTessellator {
            tangents: TangentField::new(),
            joins: Vec::new(),
        }
    }

    /// Compute the edge mesh of a normalized path.
    pub fn tessellate(
        &mut self,
        path: &Polyline,
        options: &EdgeOptions,
        output: &mut dyn EdgeGeometryBuilder,
    ) -> TessellationResult {
        if let Err(e) = self.tangents.recompute(path.as_polygon()) {
            debug_assert!(false, "{}", e);
            tracing::error!(
                segment = e.segment,
                "zero length segment in a normalized path, skipping it"
            );
            let end = path
                .as_polygon()
                .next_index(e.segment)
                .unwrap_or(e.segment);
            let reduced = path.without_point(end)?;

            return self.tessellate(&reduced, options, output);
        }

        resolve_joins(&self.tangents, options, &mut self.joins);

        output.begin_geometry();
        match self.build(path, output) {
            Ok(count) => {
                output.end_geometry();
                Ok(count)
            }
            Err(e) => {
                output.abort_geometry();
                Err(e.into())
            }
        }
    }

    /// Compute the edge mesh of a sequence of points that hasn't been normalized yet.
    pub fn tessellate_polygon(
        &mut self,
        polygon: Polygon,
        options: &EdgeOptions,
        output: &mut dyn EdgeGeometryBuilder,
    ) -> TessellationResult {
        let path = Polyline::from_polygon(polygon)?;
        self.tessellate(&path, options, output)
    }

    fn build(
        &self,
        path: &Polyline,
        output: &mut dyn EdgeGeometryBuilder,
    ) -> Result<Count, GeometryBuilderError> {
        let points = path.points();
        let mut count = Count::default();

        let mut first_incoming = (VertexId::INVALID, VertexId::INVALID);
        let mut previous_outgoing = (VertexId::INVALID, VertexId::INVALID);

        for (idx, join) in self.joins.iter().enumerate() {
            let position = points[idx];

            let incoming = add_pair(position, join.incoming_pair(), idx, output)?;
            count.vertices += 2;

            let outgoing = match *join {
                Join::Bevel { front, .. } => {
                    let outgoing = add_pair(position, join.outgoing_pair(), idx, output)?;
                    count.vertices += 2;

                    if join.fills_corner() {
                        let (a, b) = incoming;
                        let (c, d) = outgoing;
                        match front {
                            Side::Positive => output.add_triangle(a, b, c),
                            Side::Negative => output.add_triangle(b, d, a),
                        }
                        count.triangles += 1;
                    }

                    outgoing
                }
                _ => incoming,
            };

            if idx == 0 {
                first_incoming = incoming;
            } else {
                add_segment(previous_outgoing, incoming, output);
                count.triangles += 2;
            }

            previous_outgoing = outgoing;
        }

        if path.is_closed() {
            add_segment(previous_outgoing, first_incoming, output);
            count.triangles += 2;
        }

        Ok(count)
    }
}

fn add_pair(
    position: Point,
    pair: OffsetPair,
    source: usize,
    output: &mut dyn EdgeGeometryBuilder,
) -> Result<(VertexId, VertexId), GeometryBuilderError> {
    let positive = output.add_edge_vertex(EdgeVertex {
        position,
        offset: pair.inner,
        side: Side::Positive,
        source,
    })?;
    let negative = output.add_edge_vertex(EdgeVertex {
        position,
        offset: pair.outer,
        side: Side::Negative,
        source,
    })?;

    Ok((positive, negative))
}

/// Two counter-clockwise triangles between the vertex pairs at the start and
/// at the end of a segment.
fn add_segment(
    (start_pos, start_neg): (VertexId, VertexId),
    (end_pos, end_neg): (VertexId, VertexId),
    output: &mut dyn EdgeGeometryBuilder,
) {
    output.add_triangle(start_neg, end_neg, start_pos);
    output.add_triangle(start_pos, end_neg, end_pos);
}

/// Vertex produced by the edge tessellator.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct EdgeVertex {
    /// Position of the path point the vertex is generated for.
    pub position: Point,
    /// Offset of the vertex for a line of width 1.
    pub offset: Vector,
    /// Which side of the path the vertex is on.
    pub side: Side,
    /// Index of the point in the normalized path.
    pub source: usize,
}

impl EdgeVertex {
    /// Position of the vertex for a given line width.
    #[inline]
    pub fn position_for_width(&self, line_width: f64) -> Point {
        self.position + self.offset * line_width
    }
}

/// Computes the edge mesh of a path with the default options.
///
/// The points are normalized first, see [`Polyline::new`](path/polyline/struct.Polyline.html).
pub fn generate_edge_mesh<Iter>(points: Iter, closed: bool) -> Result<EdgeMesh, MeshError>
where
    Iter: IntoIterator,
    Iter::Item: Position,
{
    generate_edge_mesh_with_options(points, closed, &EdgeOptions::DEFAULT)
}

/// Computes the edge mesh of a path.
pub fn generate_edge_mesh_with_options<Iter>(
    points: Iter,
    closed: bool,
    options: &EdgeOptions,
) -> Result<EdgeMesh, MeshError>
where
    Iter: IntoIterator,
    Iter::Item: Position,
{
    let path = Polyline::new(points, closed)?;
    let mut mesh = EdgeMesh::with_capacity(path.len() * 2, path.segment_count() * 2);
    EdgeTessellator::new().tessellate(&path, options, &mut mesh.builder())?;

    Ok(mesh)
}

#[cfg(test)]
use crate::geometry_builder::NoOutput;
#[cfg(test)]
use crate::math::{point, vector};

#[test]
fn single_segment() {
    let mesh = generate_edge_mesh([[0.0, 0.0], [1.0, 0.0]], false).unwrap();

    assert_eq!(mesh.vertices, vec![point(0.0, 0.0), point(0.0, 0.0), point(1.0, 0.0), point(1.0, 0.0)]);
    assert_eq!(
        mesh.offsets,
        vec![vector(0.0, 0.5), vector(0.0, -0.5), vector(0.0, 0.5), vector(0.0, -0.5)]
    );
    assert_eq!(mesh.triangles, vec![[1, 3, 0], [0, 3, 2]]);
}

#[test]
fn closed_square() {
    let mesh = generate_edge_mesh([[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]], true).unwrap();

    assert_eq!(mesh.vertices.len(), 8);
    assert_eq!(mesh.triangles.len(), 8);

    // The closing segment connects the last pair to the first one.
    assert_eq!(mesh.triangles[6], [7, 1, 6]);
    assert_eq!(mesh.triangles[7], [6, 1, 0]);

    // Every corner is a right angle.
    for (i, o) in mesh.offsets.iter().enumerate() {
        assert!((o.length() - 0.5 * 2.0f64.sqrt()).abs() < 1e-12, "{} {:?}", i, o);
    }
}

#[test]
fn bevel_vertices_and_triangle() {
    // A very sharp turn exceeds the miter limit.
    let path = Polyline::new([(0.0, 0.0), (10.0, 0.0), (0.0, 1.0)], false).unwrap();
    let mut mesh = EdgeMesh::new();
    let count = EdgeTessellator::new()
        .tessellate(&path, &EdgeOptions::default(), &mut mesh.builder())
        .unwrap();

    assert_eq!(count, Count { vertices: 8, triangles: 5 });
    assert_eq!(mesh.count(), count);

    // Incoming pair, then outgoing pair, all at the join position.
    for v in &mesh.vertices[2..6] {
        assert_eq!(*v, point(10.0, 0.0));
    }
    assert_eq!(mesh.offsets[2], vector(0.0, 0.5));
    assert_eq!(mesh.offsets[3], vector(0.0, -0.5));
    assert_eq!(mesh.offsets[4], -mesh.offsets[5]);

    // Left turn: the bevel triangle is on the negative side.
    assert_eq!(mesh.triangles[0], [3, 5, 2]);
}

#[test]
fn reversal_has_no_corner_triangle() {
    let mesh = generate_edge_mesh([[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]], false).unwrap();

    // The turning point keeps both vertex pairs but adds no triangle.
    assert_eq!(mesh.count(), Count { vertices: 8, triangles: 4 });
    for &[a, b, c] in &mesh.triangles {
        let [pa, pb, pc] = [a, b, c].map(|i| mesh.vertices[i as usize] + mesh.offsets[i as usize]);
        assert!((pb - pa).cross(pc - pa) > 0.0, "{:?}", [a, b, c]);
    }

    // The outgoing pair sits where the incoming pair is, sides swapped.
    assert_eq!(mesh.offsets[4], mesh.offsets[3]);
    assert_eq!(mesh.offsets[5], mesh.offsets[2]);
}

#[test]
fn vertex_position_for_width() {
    let vertex = EdgeVertex {
        position: point(1.0, 2.0),
        offset: vector(0.0, -0.5),
        side: Side::Negative,
        source: 3,
    };
    assert_eq!(vertex.position_for_width(4.0), point(1.0, 0.0));
    assert_eq!(vertex.position_for_width(0.0), vertex.position);
}

#[test]
fn square_caps() {
    let options = EdgeOptions::default().with_line_cap(crate::LineCap::Square);
    let mesh = generate_edge_mesh_with_options([[0.0, 0.0], [2.0, 0.0]], false, &options).unwrap();

    let positions: Vec<Point> = mesh.draw_positions(1.0).collect();
    assert_eq!(
        positions,
        vec![point(-0.5, 0.5), point(-0.5, -0.5), point(2.5, 0.5), point(2.5, -0.5)]
    );
}

#[test]
fn degenerate_input() {
    assert_eq!(
        generate_edge_mesh([[1.0, 1.0], [1.0, 1.0]], false),
        Err(MeshError::DegeneratePath(
            crate::path::DegeneratePathError::TooFewPoints {
                closed: false,
                found: 1,
                required: 2
            }
        ))
    );

    let points = [point(0.0, 0.0), point(1.0, 0.0)];
    let mut tessellator = EdgeTessellator::new();
    assert!(tessellator
        .tessellate_polygon(
            Polygon {
                points: &points,
                closed: true,
            },
            &EdgeOptions::default(),
            &mut NoOutput::new(),
        )
        .is_err());
}

#[test]
fn reuse_tessellator() {
    let mut tessellator = EdgeTessellator::new();
    let mut mesh = EdgeMesh::new();

    let a = Polyline::new([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)], true).unwrap();
    let b = Polyline::new([(5.0, 5.0), (6.0, 5.0)], false).unwrap();

    tessellator.tessellate(&a, &EdgeOptions::default(), &mut mesh.builder()).unwrap();
    let first = mesh.count();
    tessellator.tessellate(&b, &EdgeOptions::default(), &mut mesh.builder()).unwrap();

    assert_eq!(mesh.vertices.len() as u32, first.vertices + 4);
    let base = first.vertices;
    assert!(mesh.triangles[first.triangles as usize..]
        .iter()
        .all(|t| t.iter().all(|&i| i >= base)));
}
