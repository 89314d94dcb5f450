//! Binary glTF (GLB) encoder (§4.4).

pub mod encode;
pub mod error;

pub use encode::encode_glb;
pub use error::GltfError;
