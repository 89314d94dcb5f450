//! Indexed mesh data model and the axis-aligned split operation (§3, §4.2).

pub mod dedup;
pub mod error;
pub mod material;
pub mod mesh;
pub mod split;

pub use error::MeshError;
pub use material::{AlphaMode, AtlasRegion, FilterMode, Material, Rgb, TextureRef, TextureSource, WrapMode};
pub use mesh::{AnyMesh, Face, FaceT, Mesh, MeshT};
