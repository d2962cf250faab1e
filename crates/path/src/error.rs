use thiserror::Error;

/// A path that cannot be turned into a mesh.
///
/// This is fatal to the mesh of the shape it comes from, but never to the
/// other shapes of a collection.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum DegeneratePathError {
    /// Not enough distinct points remain after collapsing duplicates.
    #[error("path needs at least {required} distinct points, found {found} (closed: {closed})")]
    TooFewPoints {
        closed: bool,
        found: usize,
        required: usize,
    },
    /// A coordinate is NaN or infinite.
    #[error("position #{index} is not a finite number")]
    NonFinitePosition { index: usize },
}
