use crate::path::DegeneratePathError;
use thiserror::Error;

/// The result type of the edge and face tessellators.
pub type TessellationResult = Result<crate::Count, MeshError>;

/// An error that can happen while generating geometry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum GeometryBuilderError {
    #[error("Invalid vertex")]
    InvalidVertex,
    #[error("Too many vertices")]
    TooManyVertices,
}

/// A segment whose direction cannot be computed because both of its
/// endpoints are at the same position.
///
/// Normalized paths never contain such segments, so running into this
/// error means a mesh generator was fed points that did not go through
/// [`Polyline::new`](path/polyline/struct.Polyline.html).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Error)]
#[error("segment #{segment} has a length of zero")]
pub struct ZeroLengthSegmentError {
    /// Index of the point the segment starts at.
    pub segment: usize,
}

/// The face tessellator's error enumeration.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum TriangulationError {
    /// No ear could be found although more than two vertices remain. This
    /// happens with self-intersecting polygons.
    #[error("no ear found with {remaining} vertices remaining, the polygon is probably self-intersecting")]
    NoEar { remaining: usize },
}

/// Any error produced while meshing a single shape.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum MeshError {
    #[error("Degenerate path: {0}")]
    DegeneratePath(#[from] DegeneratePathError),
    #[error(transparent)]
    ZeroLengthSegment(#[from] ZeroLengthSegmentError),
    #[error("Triangulation failed: {0}")]
    Triangulation(#[from] TriangulationError),
    #[error("Geometry builder error: {0}")]
    GeometryBuilder(#[from] GeometryBuilderError),
}

/// An error attached to one shape of a batch.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("shape #{shape}: {error}")]
pub struct ShapeError {
    /// Index of the shape in the batch input.
    pub shape: usize,
    #[source]
    pub error: MeshError,
}

#[test]
fn error_messages() {
    let err: MeshError = TriangulationError::NoEar { remaining: 5 }.into();
    assert_eq!(
        err.to_string(),
        "Triangulation failed: no ear found with 5 vertices remaining, the polygon is probably self-intersecting"
    );

    let err: MeshError = ZeroLengthSegmentError { segment: 3 }.into();
    assert_eq!(err.to_string(), "segment #3 has a length of zero");

    let err: MeshError = GeometryBuilderError::TooManyVertices.into();
    assert_eq!(err.to_string(), "Geometry builder error: Too many vertices");

    let err = ShapeError {
        shape: 2,
        error: DegeneratePathError::NonFinitePosition { index: 0 }.into(),
    };
    assert_eq!(
        err.to_string(),
        "shape #2: Degenerate path: position #0 is not a finite number"
    );
}
