//! CPU-side mesh data consumed by the mesh renderer.

mod mesh;

pub use mesh::{Aabb, MeshData, MeshId};
