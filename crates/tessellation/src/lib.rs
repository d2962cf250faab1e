#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::float_cmp)]

//! Generation of edge (stroke) and face (fill) meshes for 2D paths.
//!
//! This crate is reexported in [shapemesh](../shapemesh/index.html).
//!
//! ## Overview
//!
//! The most interesting types and functions of this crate are:
//!
//! * [`EdgeTessellator`](struct.EdgeTessellator.html) - Builds the triangulated ribbon
//!   of a path's stroke.
//! * [`FaceTessellator`](struct.FaceTessellator.html) - Triangulates the interior of a
//!   closed path.
//! * [`compute_meshes`](fn.compute_meshes.html) - Meshes a whole collection of shapes
//!   into a single pair of buffers.
//! * [`GeometryBuilder`](geometry_builder/trait.GeometryBuilder.html) - (See the
//!   documentation of the [geometry_builder module](geometry_builder/index.html)) which
//!   the tessellators are built on.
//!
//! ## The pipeline
//!
//! ```text
//! points ─► Polyline ─► TangentField ─► Join (per point) ─► EdgeMesh
//!              │
//!              └──────────────────────► ear clipping ─────► FaceMesh
//! ```
//!
//! 1. [`Polyline::new`](path/polyline/struct.Polyline.html) validates the input and
//!    collapses coincident points.
//! 2. [`TangentField`](struct.TangentField.html) computes one unit tangent per point.
//! 3. [`resolve_join`](fn.resolve_join.html) turns each pair of adjacent tangents into
//!    a miter, a bevel (when the miter would be too long) or a cap.
//! 4. The edge tessellator emits two vertices per point (four at bevels) and two
//!    triangles per segment.
//!
//! ### Resolution independence
//!
//! The edge mesh is not built for a particular line width. Each vertex is made of a
//! position on the path and an offset expressed for a line of width 1 (a plain
//! perpendicular offset has a length of 0.5). The final position of a vertex is
//! `position + offset * line_width`, which can be evaluated in a vertex shader so
//! that the stroke keeps a constant on-screen width at any zoom level.
//!
//! ## Examples
//!
//! ```
//! use shapemesh_tessellation::{generate_edge_mesh, generate_face_mesh};
//!
//! let square = [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]];
//!
//! let edges = generate_edge_mesh(square, true).unwrap();
//! assert_eq!(edges.vertices.len(), 8);
//! assert_eq!(edges.triangles.len(), 8);
//!
//! let faces = generate_face_mesh(square, true).unwrap();
//! assert_eq!(faces.triangles.len(), 2);
//! ```

pub use shapemesh_path as path;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

mod batch;
mod edge;
mod error;
mod face;
pub mod geometry_builder;
mod join;
mod math_utils;
mod tangent;

#[cfg(test)]
mod mesh_tests;

pub use crate::path::math;

#[doc(inline)]
pub use crate::batch::*;

#[doc(inline)]
pub use crate::edge::*;

#[doc(inline)]
pub use crate::face::*;

#[doc(inline)]
pub use crate::join::*;

#[doc(inline)]
pub use crate::tangent::*;

#[doc(inline)]
pub use crate::geometry_builder::{
    EdgeGeometryBuilder, EdgeMesh, FaceGeometryBuilder, FaceMesh, GeometryBuilder,
};

#[doc(inline)]
pub use crate::error::*;

pub use crate::path::{DegeneratePathError, LineCap, LineJoin, Polygon, Polyline, Side};

use core::ops::Add;

/// Parameters for the edge tessellator.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct EdgeOptions {
    /// What cap to use at the start of open paths.
    ///
    /// Default value: `LineCap::Butt`.
    pub start_cap: LineCap,

    /// What cap to use at the end of open paths.
    ///
    /// Default value: `LineCap::Butt`.
    pub end_cap: LineCap,

    /// See the SVG specification.
    ///
    /// Default value: `LineJoin::Miter`.
    pub line_join: LineJoin,

    /// Maximum ratio between the length of a miter offset and the base
    /// half-width. Miter joins above this ratio become bevel joins.
    ///
    /// Must be greater than or equal to 1.0.
    /// Default value: `EdgeOptions::DEFAULT_MITER_LIMIT`.
    pub miter_limit: f64,
}

impl EdgeOptions {
    /// Below 1.0 every join, including straight continuations, would exceed the limit.
    pub const MINIMUM_MITER_LIMIT: f64 = 1.0;
    pub const DEFAULT_MITER_LIMIT: f64 = 2.0;
    pub const DEFAULT_LINE_CAP: LineCap = LineCap::Butt;
    pub const DEFAULT_LINE_JOIN: LineJoin = LineJoin::Miter;

    pub const DEFAULT: Self = EdgeOptions {
        start_cap: Self::DEFAULT_LINE_CAP,
        end_cap: Self::DEFAULT_LINE_CAP,
        line_join: Self::DEFAULT_LINE_JOIN,
        miter_limit: Self::DEFAULT_MITER_LIMIT,
    };

    #[inline]
    pub fn bevel() -> Self {
        Self::DEFAULT.with_line_join(LineJoin::Bevel)
    }

    #[inline]
    pub const fn with_line_cap(mut self, cap: LineCap) -> Self {
        self.start_cap = cap;
        self.end_cap = cap;
        self
    }

    #[inline]
    pub const fn with_start_cap(mut self, cap: LineCap) -> Self {
        self.start_cap = cap;
        self
    }

    #[inline]
    pub const fn with_end_cap(mut self, cap: LineCap) -> Self {
        self.end_cap = cap;
        self
    }

    #[inline]
    pub const fn with_line_join(mut self, join: LineJoin) -> Self {
        self.line_join = join;
        self
    }

    #[inline]
    pub fn with_miter_limit(mut self, limit: f64) -> Self {
        assert!(limit >= Self::MINIMUM_MITER_LIMIT);
        self.miter_limit = limit;
        self
    }
}

impl Default for EdgeOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

pub type Index = u32;

/// A virtual vertex offset in a geometry.
///
/// The `VertexId`s are only valid between `GeometryBuilder::begin_geometry` and
/// `GeometryBuilder::end_geometry`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct VertexId(pub Index);

impl VertexId {
    pub const INVALID: VertexId = VertexId(u32::MAX);

    pub fn offset(self) -> Index {
        self.0
    }

    pub fn to_usize(self) -> usize {
        self.0 as usize
    }

    pub fn from_usize(v: usize) -> Self {
        VertexId(v as Index)
    }
}

impl Add<u32> for VertexId {
    type Output = Self;
    fn add(self, rhs: u32) -> Self {
        VertexId(self.0 + rhs)
    }
}

impl From<u32> for VertexId {
    fn from(v: u32) -> Self {
        VertexId(v)
    }
}

impl From<VertexId> for u32 {
    fn from(v: VertexId) -> Self {
        v.0
    }
}

impl From<VertexId> for usize {
    fn from(v: VertexId) -> Self {
        v.0 as usize
    }
}

/// Number of vertices and triangles added during a tessellation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Count {
    pub vertices: u32,
    pub triangles: u32,
}

impl Add for Count {
    type Output = Count;
    fn add(self, other: Count) -> Count {
        Count {
            vertices: self.vertices + other.vertices,
            triangles: self.triangles + other.triangles,
        }
    }
}

#[test]
fn test_default_miter_limit() {
    let expected_limit = 2.0;
    let options = EdgeOptions::default();

    assert_eq!(expected_limit, options.miter_limit);
    assert_eq!(options.line_join, LineJoin::Miter);
    assert_eq!(options.start_cap, LineCap::Butt);
}

#[test]
fn test_with_miter_limit() {
    let expected_limit = 3.0;
    let options = EdgeOptions::default().with_miter_limit(expected_limit);

    assert_eq!(expected_limit, options.miter_limit);
}

#[test]
#[should_panic]
fn test_with_invalid_miter_limit() {
    let _ = EdgeOptions::default().with_miter_limit(0.5);
}

#[test]
fn test_vertex_id_conversions() {
    let id = VertexId::from_usize(7);
    assert_eq!(id, VertexId(7));
    assert_eq!(id.to_usize(), 7);
    assert_eq!(id.offset(), 7);
    assert_eq!(id + 3, VertexId(10));
    assert_eq!(u32::from(id), 7);
    assert_eq!(usize::from(id), 7);
    assert_eq!(VertexId::from(7u32), id);
}

#[test]
fn test_count_add() {
    let a = Count { vertices: 4, triangles: 2 };
    let b = Count { vertices: 8, triangles: 9 };
    assert_eq!(a + b, Count { vertices: 12, triangles: 11 });
}
