#![deny(bare_trait_objects)]

//! Various optional utilities for the shapemesh crates.
//!
//! * [`debugging`] turns paths and meshes into vector fields that are easy to
//!   display on top of the geometry, and helps reducing failing inputs.
//! * [`fixtures`] contains the shapes used to calibrate the tessellators.

pub extern crate shapemesh_path as path;
pub extern crate shapemesh_tessellation as tessellation;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub use path::euclid;
pub use path::math;

pub mod debugging;
pub mod fixtures;
