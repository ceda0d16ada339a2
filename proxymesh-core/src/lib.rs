//! Core data structures and traits for proxymesh
//!
//! This crate provides the polygon mesh type, the edge/adjacency tables
//! derived from it, the [`MeshAdapter`] trait through which a hosting
//! environment exposes its meshes, and the shared error type.

pub mod point;
pub mod mesh;
pub mod topology;
pub mod adapter;
pub mod error;

pub use point::*;
pub use mesh::*;
pub use topology::*;
pub use adapter::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Matrix3, Matrix4, Point3, Vector3, Vector4};
