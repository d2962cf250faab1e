//! Tools to help with generating vertex and index buffers.
//!
//! ## Overview
//!
//! The tessellators don't write into vertex and index buffers directly. They talk to a
//! geometry builder which decides what to do with the generated vertices and triangles.
//!
//! See:
//!
//! * [`GeometryBuilder`](trait.GeometryBuilder.html)
//! * [`EdgeGeometryBuilder`](trait.EdgeGeometryBuilder.html)
//! * [`FaceGeometryBuilder`](trait.FaceGeometryBuilder.html)
//!
//! The traits above are what the tessellators interface with. The common case of pushing
//! vertices and triangles into vectors is covered by:
//!
//! * [`EdgeMesh`](struct.EdgeMesh.html), parallel arrays of positions and width 1 offsets,
//!   plus a list of triangles. It is filled through an [`EdgeMeshBuilder`](struct.EdgeMeshBuilder.html).
//! * [`FaceMesh`](struct.FaceMesh.html), positions and triangles, filled through a
//!   [`FaceMeshBuilder`](struct.FaceMeshBuilder.html).
//!
//! Mesh builders record the size of the mesh when a geometry begins so that several shapes
//! can be accumulated in the same mesh, and so that a failed shape can be removed without
//! affecting the shapes added before it.
//!
//! ## Examples
//!
//! ### Counting the output
//!
//! ```
//! use shapemesh_tessellation::{EdgeOptions, EdgeTessellator, Polyline};
//! use shapemesh_tessellation::geometry_builder::NoOutput;
//!
//! // Both 45 degree corners exceed the miter limit and are beveled.
//! let path = Polyline::new([(0.0, 0.0), (10.0, 0.0), (5.0, 5.0)], true).unwrap();
//! let count = EdgeTessellator::new()
//!     .tessellate(&path, &EdgeOptions::default(), &mut NoOutput::new())
//!     .unwrap();
//!
//! assert_eq!(count.triangles as usize, 2 * path.segment_count() + 2);
//! assert_eq!(count.vertices as usize, 2 * path.len() + 4);
//! ```
//!
//! ### Generating a completely custom output
//!
//! ```
//! use shapemesh_tessellation::{EdgeTessellator, EdgeOptions, EdgeVertex, Polyline, VertexId};
//! use shapemesh_tessellation::geometry_builder::{GeometryBuilder, EdgeGeometryBuilder, GeometryBuilderError};
//!
//! // A geometry builder that writes the result of the tessellation to stdout instead
//! // of filling vertex and index buffers.
//! pub struct ToStdOut {
//!     vertices: u32,
//! }
//!
//! impl GeometryBuilder for ToStdOut {
//!     fn begin_geometry(&mut self) {
//!         self.vertices = 0;
//!         println!(" -- begin geometry");
//!     }
//!
//!     fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
//!         println!("triangle ({}, {}, {})", a.offset(), b.offset(), c.offset());
//!     }
//!
//!     fn abort_geometry(&mut self) {
//!         println!(" -- oops!");
//!     }
//! }
//!
//! impl EdgeGeometryBuilder for ToStdOut {
//!     fn add_edge_vertex(&mut self, vertex: EdgeVertex) -> Result<VertexId, GeometryBuilderError> {
//!         println!("vertex {:?} + {:?}", vertex.position, vertex.offset);
//!         if self.vertices == u32::MAX {
//!             return Err(GeometryBuilderError::TooManyVertices);
//!         }
//!         self.vertices += 1;
//!         Ok(VertexId(self.vertices - 1))
//!     }
//! }
//!
//! let path = Polyline::new([(0.0, 0.0), (10.0, 0.0), (5.0, 5.0)], false).unwrap();
//! EdgeTessellator::new()
//!     .tessellate(&path, &EdgeOptions::default(), &mut ToStdOut { vertices: 0 })
//!     .unwrap();
//! ```

pub use crate::error::GeometryBuilderError;
use crate::math::{Point, Vector};
use crate::{Count, EdgeVertex, FaceVertex, Index, VertexId};

/// An interface separating tessellators from the actual vertex construction.
///
/// Depending on which tessellator a geometry builder interfaces with, it also has to
/// implement one of the following traits:
///  - [`EdgeGeometryBuilder`](trait.EdgeGeometryBuilder.html)
///  - [`FaceGeometryBuilder`](trait.FaceGeometryBuilder.html)
pub trait GeometryBuilder {
    /// Called at the beginning of a generation.
    ///
    /// end_geometry must be called before begin_geometry is called again.
    fn begin_geometry(&mut self) {}

    /// Called at the end of a generation.
    fn end_geometry(&mut self) {}

    /// Insert a triangle made of vertices that were added after the last call to begin_geometry.
    ///
    /// This method can only be called between begin_geometry and end_geometry.
    fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId);

    /// abort_geometry is called instead of end_geometry if an error occurred while producing
    /// the geometry and we won't be able to finish.
    ///
    /// The implementation is expected to discard the geometry that was generated since the last
    /// time begin_geometry was called, and to remain in a usable state.
    fn abort_geometry(&mut self) {}
}

/// A geometry builder to interface with the [`EdgeTessellator`](../struct.EdgeTessellator.html).
pub trait EdgeGeometryBuilder: GeometryBuilder {
    /// Inserts a vertex and returns an id that is only valid between begin_geometry and
    /// end_geometry.
    fn add_edge_vertex(&mut self, vertex: EdgeVertex) -> Result<VertexId, GeometryBuilderError>;
}

/// A geometry builder to interface with the [`FaceTessellator`](../struct.FaceTessellator.html).
pub trait FaceGeometryBuilder: GeometryBuilder {
    /// Inserts a vertex and returns an id that is only valid between begin_geometry and
    /// end_geometry.
    fn add_face_vertex(&mut self, vertex: FaceVertex) -> Result<VertexId, GeometryBuilderError>;
}

/// The triangulated ribbon of one or several paths.
///
/// `vertices` and `offsets` are parallel arrays. The offsets are expressed for a
/// line of width 1: the vertex `i` is drawn at `vertices[i] + offsets[i] * line_width`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct EdgeMesh {
    pub vertices: Vec<Point>,
    pub offsets: Vec<Vector>,
    pub triangles: Vec<[Index; 3]>,
}

impl EdgeMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(num_vertices: usize, num_triangles: usize) -> Self {
        EdgeMesh {
            vertices: Vec::with_capacity(num_vertices),
            offsets: Vec::with_capacity(num_vertices),
            triangles: Vec::with_capacity(num_triangles),
        }
    }

    /// Returns a geometry builder that appends to this mesh.
    pub fn builder(&mut self) -> EdgeMeshBuilder<'_> {
        EdgeMeshBuilder::new(self)
    }

    pub fn count(&self) -> Count {
        Count {
            vertices: self.vertices.len() as u32,
            triangles: self.triangles.len() as u32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Empty the mesh without freeing memory, for reuse without reallocation.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.offsets.clear();
        self.triangles.clear();
    }

    /// Appends the content of another mesh, shifting its triangle indices by the
    /// current number of vertices.
    pub fn append(&mut self, other: &EdgeMesh) -> Result<(), GeometryBuilderError> {
        let base = checked_base(self.vertices.len(), other.vertices.len())?;
        self.vertices.extend_from_slice(&other.vertices);
        self.offsets.extend_from_slice(&other.offsets);
        self.triangles
            .extend(other.triangles.iter().map(|t| rebase(*t, base)));

        Ok(())
    }

    /// Positions of the vertices once the offsets are applied for a given line width.
    pub fn draw_positions(&self, line_width: f64) -> impl Iterator<Item = Point> + '_ {
        self.vertices
            .iter()
            .zip(self.offsets.iter())
            .map(move |(p, o)| *p + *o * line_width)
    }
}

/// The triangulated interior of one or several closed paths.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct FaceMesh {
    pub vertices: Vec<Point>,
    pub triangles: Vec<[Index; 3]>,
}

impl FaceMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(num_vertices: usize, num_triangles: usize) -> Self {
        FaceMesh {
            vertices: Vec::with_capacity(num_vertices),
            triangles: Vec::with_capacity(num_triangles),
        }
    }

    /// Returns a geometry builder that appends to this mesh.
    pub fn builder(&mut self) -> FaceMeshBuilder<'_> {
        FaceMeshBuilder::new(self)
    }

    pub fn count(&self) -> Count {
        Count {
            vertices: self.vertices.len() as u32,
            triangles: self.triangles.len() as u32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.triangles.clear();
    }

    /// Appends the content of another mesh, shifting its triangle indices by the
    /// current number of vertices.
    pub fn append(&mut self, other: &FaceMesh) -> Result<(), GeometryBuilderError> {
        let base = checked_base(self.vertices.len(), other.vertices.len())?;
        self.vertices.extend_from_slice(&other.vertices);
        self.triangles
            .extend(other.triangles.iter().map(|t| rebase(*t, base)));

        Ok(())
    }

    /// Sum of the signed areas of the triangles.
    ///
    /// Since the triangles are counter-clockwise, this is the (positive) area of
    /// the filled shapes.
    pub fn area(&self) -> f64 {
        self.triangles
            .iter()
            .map(|&[a, b, c]| {
                let a = self.vertices[a as usize];
                let b = self.vertices[b as usize];
                let c = self.vertices[c as usize];
                (b - a).cross(c - a) * 0.5
            })
            .sum()
    }
}

fn checked_base(current: usize, added: usize) -> Result<Index, GeometryBuilderError> {
    if current + added > Index::MAX as usize {
        return Err(GeometryBuilderError::TooManyVertices);
    }

    Ok(current as Index)
}

#[inline]
fn rebase(triangle: [Index; 3], base: Index) -> [Index; 3] {
    [triangle[0] + base, triangle[1] + base, triangle[2] + base]
}

/// A temporary view on an `EdgeMesh` which writes the generated geometry at its end.
///
/// The vertex ids handed out are absolute indices in the mesh, so the triangles need
/// no translation.
pub struct EdgeMeshBuilder<'l> {
    mesh: &'l mut EdgeMesh,
    first_vertex: Index,
    first_triangle: Index,
}

impl<'l> EdgeMeshBuilder<'l> {
    pub fn new(mesh: &'l mut EdgeMesh) -> Self {
        let first_vertex = mesh.vertices.len() as Index;
        let first_triangle = mesh.triangles.len() as Index;
        EdgeMeshBuilder {
            mesh,
            first_vertex,
            first_triangle,
        }
    }

    /// Consumes self and returns a builder with opposite triangle face winding.
    pub fn with_inverted_winding(self) -> InvertWinding<Self> {
        InvertWinding(self)
    }

    pub fn mesh(&self) -> &EdgeMesh {
        self.mesh
    }
}

impl<'l> GeometryBuilder for EdgeMeshBuilder<'l> {
    fn begin_geometry(&mut self) {
        self.first_vertex = self.mesh.vertices.len() as Index;
        self.first_triangle = self.mesh.triangles.len() as Index;
    }

    fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
        debug_assert!(a != b);
        debug_assert!(a != c);
        debug_assert!(b != c);
        debug_assert!(a != VertexId::INVALID);
        debug_assert!(b != VertexId::INVALID);
        debug_assert!(c != VertexId::INVALID);
        self.mesh.triangles.push([a.into(), b.into(), c.into()]);
    }

    fn abort_geometry(&mut self) {
        self.mesh.vertices.truncate(self.first_vertex as usize);
        self.mesh.offsets.truncate(self.first_vertex as usize);
        self.mesh.triangles.truncate(self.first_triangle as usize);
    }
}

impl<'l> EdgeGeometryBuilder for EdgeMeshBuilder<'l> {
    fn add_edge_vertex(&mut self, vertex: EdgeVertex) -> Result<VertexId, GeometryBuilderError> {
        let len = self.mesh.vertices.len();
        if len >= Index::MAX as usize {
            return Err(GeometryBuilderError::TooManyVertices);
        }
        if !vertex.offset.x.is_finite() || !vertex.offset.y.is_finite() {
            return Err(GeometryBuilderError::InvalidVertex);
        }
        self.mesh.vertices.push(vertex.position);
        self.mesh.offsets.push(vertex.offset);

        Ok(VertexId(len as Index))
    }
}

/// A temporary view on a `FaceMesh` which writes the generated geometry at its end.
pub struct FaceMeshBuilder<'l> {
    mesh: &'l mut FaceMesh,
    first_vertex: Index,
    first_triangle: Index,
}

impl<'l> FaceMeshBuilder<'l> {
    pub fn new(mesh: &'l mut FaceMesh) -> Self {
        let first_vertex = mesh.vertices.len() as Index;
        let first_triangle = mesh.triangles.len() as Index;
        FaceMeshBuilder {
            mesh,
            first_vertex,
            first_triangle,
        }
    }

    /// Consumes self and returns a builder with opposite triangle face winding.
    pub fn with_inverted_winding(self) -> InvertWinding<Self> {
        InvertWinding(self)
    }

    pub fn mesh(&self) -> &FaceMesh {
        self.mesh
    }
}

impl<'l> GeometryBuilder for FaceMeshBuilder<'l> {
    fn begin_geometry(&mut self) {
        self.first_vertex = self.mesh.vertices.len() as Index;
        self.first_triangle = self.mesh.triangles.len() as Index;
    }

    fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
        debug_assert!(a != b);
        debug_assert!(a != c);
        debug_assert!(b != c);
        debug_assert!(a != VertexId::INVALID);
        debug_assert!(b != VertexId::INVALID);
        debug_assert!(c != VertexId::INVALID);
        self.mesh.triangles.push([a.into(), b.into(), c.into()]);
    }

    fn abort_geometry(&mut self) {
        self.mesh.vertices.truncate(self.first_vertex as usize);
        self.mesh.triangles.truncate(self.first_triangle as usize);
    }
}

impl<'l> FaceGeometryBuilder for FaceMeshBuilder<'l> {
    fn add_face_vertex(&mut self, vertex: FaceVertex) -> Result<VertexId, GeometryBuilderError> {
        let len = self.mesh.vertices.len();
        if len >= Index::MAX as usize {
            return Err(GeometryBuilderError::TooManyVertices);
        }
        self.mesh.vertices.push(vertex.position);

        Ok(VertexId(len as Index))
    }
}

/// A wrapper for edge and face geometry builders that inverts the triangle face winding.
///
/// The tessellators produce counter-clockwise triangles in a y-up coordinate space, which
/// appear clockwise once projected in a y-down space such as most screen coordinates.
pub struct InvertWinding<B>(B);

impl<B: GeometryBuilder> GeometryBuilder for InvertWinding<B> {
    fn begin_geometry(&mut self) {
        self.0.begin_geometry();
    }

    fn end_geometry(&mut self) {
        self.0.end_geometry()
    }

    fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
        // Invert the triangle winding by flipping b and c.
        self.0.add_triangle(a, c, b);
    }

    fn abort_geometry(&mut self) {
        self.0.abort_geometry();
    }
}

impl<B: EdgeGeometryBuilder> EdgeGeometryBuilder for InvertWinding<B> {
    #[inline]
    fn add_edge_vertex(&mut self, vertex: EdgeVertex) -> Result<VertexId, GeometryBuilderError> {
        self.0.add_edge_vertex(vertex)
    }
}

impl<B: FaceGeometryBuilder> FaceGeometryBuilder for InvertWinding<B> {
    #[inline]
    fn add_face_vertex(&mut self, vertex: FaceVertex) -> Result<VertexId, GeometryBuilderError> {
        self.0.add_face_vertex(vertex)
    }
}

/// A geometry builder that does not output any geometry.
///
/// Mostly useful for testing.
pub struct NoOutput {
    next_vertex: u32,
}

impl NoOutput {
    pub fn new() -> Self {
        NoOutput { next_vertex: 0 }
    }
}

impl Default for NoOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl NoOutput {
    fn next_id(&mut self) -> Result<VertexId, GeometryBuilderError> {
        if self.next_vertex == u32::MAX {
            return Err(GeometryBuilderError::TooManyVertices);
        }
        self.next_vertex += 1;
        Ok(VertexId(self.next_vertex - 1))
    }
}

impl GeometryBuilder for NoOutput {
    fn begin_geometry(&mut self) {
        self.next_vertex = 0;
    }

    fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
        debug_assert!(a != b);
        debug_assert!(a != c);
        debug_assert!(b != c);
    }
}

impl EdgeGeometryBuilder for NoOutput {
    fn add_edge_vertex(&mut self, _: EdgeVertex) -> Result<VertexId, GeometryBuilderError> {
        self.next_id()
    }
}

impl FaceGeometryBuilder for NoOutput {
    fn add_face_vertex(&mut self, _: FaceVertex) -> Result<VertexId, GeometryBuilderError> {
        self.next_id()
    }
}

#[cfg(test)]
use crate::math::{point, vector};

#[cfg(test)]
fn edge_vertex(x: f64, y: f64) -> EdgeVertex {
    EdgeVertex {
        position: point(x, y),
        offset: vector(0.0, 0.5),
        source: 0,
        side: crate::Side::Positive,
    }
}

#[test]
fn abort_keeps_previous_geometry() {
    let mut mesh = EdgeMesh::new();
    {
        let mut builder = mesh.builder();
        builder.begin_geometry();
        let a = builder.add_edge_vertex(edge_vertex(0.0, 0.0)).unwrap();
        let b = builder.add_edge_vertex(edge_vertex(1.0, 0.0)).unwrap();
        let c = builder.add_edge_vertex(edge_vertex(1.0, 1.0)).unwrap();
        builder.add_triangle(a, b, c);
        builder.end_geometry();

        builder.begin_geometry();
        let d = builder.add_edge_vertex(edge_vertex(5.0, 0.0)).unwrap();
        assert_eq!(d, VertexId(3));
        builder.abort_geometry();
    }

    assert_eq!(mesh.vertices.len(), 3);
    assert_eq!(mesh.offsets.len(), 3);
    assert_eq!(mesh.triangles, vec![[0, 1, 2]]);
}

#[test]
fn inverted_winding() {
    let mut mesh = FaceMesh::new();
    let mut builder = mesh.builder().with_inverted_winding();
    builder.begin_geometry();
    let ids: Vec<VertexId> = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| {
            builder
                .add_face_vertex(FaceVertex {
                    position: point(x, y),
                    source: i,
                })
                .unwrap()
        })
        .collect();
    builder.add_triangle(ids[0], ids[1], ids[2]);
    builder.end_geometry();

    assert_eq!(mesh.triangles, vec![[0, 2, 1]]);
    assert_eq!(mesh.area(), -0.5);
}

#[test]
fn append_rebases_indices() {
    let mut a = FaceMesh {
        vertices: vec![point(0.0, 0.0), point(1.0, 0.0), point(0.0, 1.0)],
        triangles: vec![[0, 1, 2]],
    };
    let b = a.clone();
    a.append(&b).unwrap();

    assert_eq!(a.vertices.len(), 6);
    assert_eq!(a.triangles, vec![[0, 1, 2], [3, 4, 5]]);
    assert_eq!(a.area(), 1.0);

    let mut edges = EdgeMesh::new();
    edges.append(&EdgeMesh::new()).unwrap();
    assert!(edges.is_empty());
}

#[test]
fn invalid_offset() {
    let mut mesh = EdgeMesh::new();
    let mut builder = mesh.builder();
    builder.begin_geometry();
    let mut v = edge_vertex(0.0, 0.0);
    v.offset = vector(f64::NAN, 0.0);
    assert_eq!(
        builder.add_edge_vertex(v),
        Err(GeometryBuilderError::InvalidVertex)
    );
}

#[test]
fn draw_positions() {
    let mesh = EdgeMesh {
        vertices: vec![point(0.0, 0.0), point(0.0, 0.0)],
        offsets: vec![vector(0.0, 0.5), vector(0.0, -0.5)],
        triangles: Vec::new(),
    };

    let positions: Vec<Point> = mesh.draw_positions(4.0).collect();
    assert_eq!(positions, vec![point(0.0, 2.0), point(0.0, -2.0)]);
}
