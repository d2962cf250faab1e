//! Meshing a collection of shapes at once.

use std::ops::Range;

use crate::geometry_builder::{EdgeMesh, FaceMesh};
use crate::math::Point;
use crate::path::{Polyline, Position};
use crate::{EdgeOptions, EdgeTessellator, FaceTessellator, MeshError, ShapeError};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A path to mesh along with its edge parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub points: Vec<Point>,
    pub closed: bool,
    pub options: EdgeOptions,
}

impl Shape {
    pub fn new<Iter>(points: Iter, closed: bool) -> Self
    where
        Iter: IntoIterator,
        Iter::Item: Position,
    {
        Shape {
            points: points.into_iter().map(|p| p.position()).collect(),
            closed,
            options: EdgeOptions::DEFAULT,
        }
    }

    pub fn with_options(mut self, options: EdgeOptions) -> Self {
        self.options = options;
        self
    }
}

/// Where the geometry of a shape lives in the meshes of a batch.
///
/// Ranges of shapes that failed to mesh are empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ShapeRanges {
    pub edge_vertices: Range<usize>,
    pub edge_triangles: Range<usize>,
    pub face_vertices: Range<usize>,
    pub face_triangles: Range<usize>,
}

/// How the shapes of a batch are distributed over threads.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Execution {
    Sequential,
    /// Uses the rayon thread pool. Same as `Sequential` if the `parallel`
    /// feature is disabled.
    Parallel,
}

impl Default for Execution {
    fn default() -> Self {
        if cfg!(feature = "parallel") {
            Execution::Parallel
        } else {
            Execution::Sequential
        }
    }
}

/// The meshes of a collection of shapes, concatenated.
///
/// Triangle indices are global: the triangles of each shape are shifted by the
/// number of vertices of the shapes before it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBatch {
    pub edge: EdgeMesh,
    pub face: FaceMesh,
    /// One entry per input shape, in input order.
    pub ranges: Vec<ShapeRanges>,
    /// Failures, in input order. A shape may have an error and still
    /// contribute an edge mesh, for example when its interior can't be
    /// triangulated.
    pub errors: Vec<ShapeError>,
}

impl MeshBatch {
    /// Meshes every shape with the default execution mode.
    pub fn compute(shapes: &[Shape]) -> Self {
        Self::compute_with(shapes, Execution::default())
    }

    /// Meshes every shape.
    ///
    /// Errors never interrupt the batch. The output does not depend on the
    /// execution mode.
    pub fn compute_with(shapes: &[Shape], execution: Execution) -> Self {
        let meshes = match execution {
            #[cfg(feature = "parallel")]
            Execution::Parallel => shapes.par_iter().map(mesh_shape).collect::<Vec<_>>(),
            _ => shapes.iter().map(mesh_shape).collect::<Vec<_>>(),
        };

        let (mut edge_vertices, mut edge_triangles) = (0, 0);
        let (mut face_vertices, mut face_triangles) = (0, 0);
        for m in &meshes {
            edge_vertices += m.edge.vertices.len();
            edge_triangles += m.edge.triangles.len();
            face_vertices += m.face.vertices.len();
            face_triangles += m.face.triangles.len();
        }

        let mut batch = MeshBatch {
            edge: EdgeMesh::with_capacity(edge_vertices, edge_triangles),
            face: FaceMesh::with_capacity(face_vertices, face_triangles),
            ranges: Vec::with_capacity(shapes.len()),
            errors: Vec::new(),
        };

        for (shape, m) in meshes.into_iter().enumerate() {
            let mut errors = m.errors;
            let mut ranges = ShapeRanges::default();

            let (vertices, triangles) = (batch.edge.vertices.len(), batch.edge.triangles.len());
            match batch.edge.append(&m.edge) {
                Ok(()) => {
                    ranges.edge_vertices = vertices..batch.edge.vertices.len();
                    ranges.edge_triangles = triangles..batch.edge.triangles.len();
                }
                Err(e) => errors.push(e.into()),
            }

            let (vertices, triangles) = (batch.face.vertices.len(), batch.face.triangles.len());
            match batch.face.append(&m.face) {
                Ok(()) => {
                    ranges.face_vertices = vertices..batch.face.vertices.len();
                    ranges.face_triangles = triangles..batch.face.triangles.len();
                }
                Err(e) => errors.push(e.into()),
            }

            for error in &errors {
                if let MeshError::DegeneratePath(e) = error {
                    tracing::warn!(shape, "skipping degenerate shape: {}", e);
                }
            }

            batch.ranges.push(ranges);
            batch
                .errors
                .extend(errors.into_iter().map(|error| ShapeError { shape, error }));
        }

        tracing::debug!(
            shapes = shapes.len(),
            edge_vertices = batch.edge.vertices.len(),
            edge_triangles = batch.edge.triangles.len(),
            face_triangles = batch.face.triangles.len(),
            errors = batch.errors.len(),
            "computed meshes"
        );

        batch
    }

    /// Errors reported for a given shape.
    pub fn errors_for(&self, shape: usize) -> impl Iterator<Item = &MeshError> + '_ {
        self.errors
            .iter()
            .filter(move |e| e.shape == shape)
            .map(|e| &e.error)
    }
}

/// Computes the edge and face meshes of every shape and concatenates them.
///
/// Shapes are processed in parallel when the `parallel` feature is enabled.
///
/// ```
/// use shapemesh_tessellation::{compute_meshes, Shape};
///
/// let shapes = [
///     Shape::new([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)], true),
///     Shape::new([(5.0, 5.0), (5.0, 5.0)], false),
///     Shape::new([(0.0, 0.0), (1.0, 0.0)], false),
/// ];
///
/// let batch = compute_meshes(&shapes);
/// assert_eq!(batch.ranges.len(), 3);
/// assert_eq!(batch.errors.len(), 1);
/// assert_eq!(batch.errors[0].shape, 1);
/// assert_eq!(batch.edge.vertices.len(), 8 + 4);
/// assert_eq!(batch.face.triangles.len(), 2);
/// ```
pub fn compute_meshes(shapes: &[Shape]) -> MeshBatch {
    MeshBatch::compute(shapes)
}

struct ShapeMeshes {
    edge: EdgeMesh,
    face: FaceMesh,
    errors: Vec<MeshError>,
}

fn mesh_shape(shape: &Shape) -> ShapeMeshes {
    let mut meshes = ShapeMeshes {
        edge: EdgeMesh::new(),
        face: FaceMesh::new(),
        errors: Vec::new(),
    };

    let path = match Polyline::new(&shape.points, shape.closed) {
        Ok(path) => path,
        Err(e) => {
            meshes.errors.push(e.into());
            return meshes;
        }
    };

    if let Err(e) =
        EdgeTessellator::new().tessellate(&path, &shape.options, &mut meshes.edge.builder())
    {
        meshes.errors.push(e);
    }

    if let Err(e) = FaceTessellator::new().tessellate(&path, &mut meshes.face.builder()) {
        meshes.errors.push(e);
    }

    meshes
}

#[cfg(test)]
use crate::path::DegeneratePathError;

#[cfg(test)]
fn test_shapes() -> Vec<Shape> {
    vec![
        Shape::new([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)], true),
        Shape::new([(0.0, 0.0), (f64::NAN, 0.0), (1.0, 1.0)], false),
        Shape::new([(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0)], true),
        Shape::new([(1.0, 1.0), (10.0, 0.0), (1.0, -1.0), (0.0, -10.0)], true)
            .with_options(EdgeOptions::bevel()),
        Shape::new([(3.0, 3.0), (4.0, 3.0)], false),
    ]
}

#[test]
fn batch_errors_are_per_shape() {
    let shapes = test_shapes();
    let batch = MeshBatch::compute_with(&shapes, Execution::Sequential);

    assert_eq!(batch.ranges.len(), shapes.len());
    assert_eq!(batch.errors.len(), 2);

    // The degenerate shape contributes nothing.
    assert_eq!(
        batch.errors_for(1).collect::<Vec<_>>(),
        vec![&MeshError::DegeneratePath(
            DegeneratePathError::NonFinitePosition { index: 1 }
        )]
    );
    assert!(batch.ranges[1].edge_vertices.is_empty());
    assert!(batch.ranges[1].face_vertices.is_empty());

    // The bow tie keeps its edge mesh.
    assert!(matches!(
        batch.errors_for(2).next(),
        Some(MeshError::Triangulation(_))
    ));
    // Every corner of the bow tie is beveled.
    assert_eq!(batch.ranges[2].edge_vertices.len(), 16);
    assert!(batch.ranges[2].face_vertices.is_empty());

    // The open path has no face.
    assert_eq!(batch.ranges[4].edge_triangles.len(), 2);
    assert!(batch.ranges[4].face_triangles.is_empty());
}

#[test]
fn batch_indices_are_global() {
    let shapes = test_shapes();
    let batch = MeshBatch::compute(&shapes);

    for ranges in &batch.ranges {
        for t in &batch.edge.triangles[ranges.edge_triangles.clone()] {
            for &i in t {
                assert!(ranges.edge_vertices.contains(&(i as usize)));
            }
        }
        for t in &batch.face.triangles[ranges.face_triangles.clone()] {
            for &i in t {
                assert!(ranges.face_vertices.contains(&(i as usize)));
            }
        }
    }

    assert_eq!(batch.edge.vertices.len(), batch.edge.offsets.len());
    assert_eq!(batch.ranges.last().map(|r| r.edge_vertices.end), Some(batch.edge.vertices.len()));
}

#[test]
fn batch_execution_modes_match() {
    let shapes = test_shapes();
    let sequential = MeshBatch::compute_with(&shapes, Execution::Sequential);
    let parallel = MeshBatch::compute_with(&shapes, Execution::Parallel);

    assert_eq!(sequential, parallel);
}

#[test]
fn empty_batch() {
    let batch = compute_meshes(&[]);
    assert!(batch.edge.is_empty());
    assert!(batch.face.is_empty());
    assert!(batch.ranges.is_empty());
    assert!(batch.errors.is_empty());
}
