#![deny(bare_trait_objects)]

//! Resolution independent edge and face meshes for 2D shapes.
//!
//! # Crates
//!
//! This meta-crate (`shapemesh`) reexports the following sub-crates for convenience:
//!
//! * **shapemesh_path** - Validated and normalized polylines.
//! * **shapemesh_tessellation** - Edge and face mesh generation, and batching.
//! * **shapemesh_extra** - Calibration shapes and debugging tools.
//!
//! Each `shapemesh_<name>` crate is reexported as a `<name>` module in `shapemesh`.
//!
//! # Feature flags
//!
//! * `parallel` (enabled by default) meshes the shapes of a batch on the rayon
//!   thread pool.
//! * `serialization` derives serde's traits for the public data types.
//! * `extra` enables the `shapemesh_extra` reexport.
//!
//! # Examples
//!
//! ## Meshing a collection of shapes
//!
//! ```
//! use shapemesh::tessellation::{compute_meshes, Shape};
//!
//! let shapes = [
//!     // A closed square.
//!     Shape::new([(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)], true),
//!     // An open path: it has an edge but no face.
//!     Shape::new([(20.0, 0.0), (30.0, 0.0), (30.0, 10.0)], false),
//! ];
//!
//! let batch = compute_meshes(&shapes);
//! assert!(batch.errors.is_empty());
//!
//! // Two vertices per point and two triangles per segment.
//! assert_eq!(batch.edge.vertices.len(), 8 + 6);
//! assert_eq!(batch.edge.triangles.len(), 8 + 4);
//! assert_eq!(batch.face.triangles.len(), 2);
//!
//! // Edge vertices are expanded to the stroke width at draw time.
//! let positions: Vec<_> = batch.edge.draw_positions(2.0).collect();
//! assert_eq!(positions.len(), batch.edge.vertices.len());
//! ```

#[cfg(feature = "extra")]
pub extern crate shapemesh_extra;
pub extern crate shapemesh_tessellation;

#[cfg(feature = "extra")]
pub use shapemesh_extra as extra;
pub use shapemesh_tessellation as tessellation;
pub use tessellation::path;

pub use path::math;
