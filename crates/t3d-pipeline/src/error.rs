use std::fmt::{Display, Formatter};

/// Pipeline-level errors (§7), wrapping the sub-crate errors that bubble
/// up out of a worker's split/repack/encode stages.
#[derive(Debug)]
pub enum PipelineError {
    Mesh(t3d_mesh::MeshError),
    Atlas(t3d_atlas::AtlasError),
    Gltf(t3d_gltf::GltfError),
    Tile(t3d_tiles::TileError),
    /// `maxLevel` outside `[0, 20]` (§6 config table).
    InvalidConfig(String),
    /// Explicit cancellation unwound the pool before a tileset was emitted (§5).
    Cancelled,
}

impl std::error::Error for PipelineError {}

impl Display for PipelineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Mesh(e) => write!(f, "{e}"),
            PipelineError::Atlas(e) => write!(f, "{e}"),
            PipelineError::Gltf(e) => write!(f, "{e}"),
            PipelineError::Tile(e) => write!(f, "{e}"),
            PipelineError::InvalidConfig(reason) => write!(f, "invalid config: {reason}"),
            PipelineError::Cancelled => write!(f, "task cancelled before a tileset was emitted"),
        }
    }
}

impl From<t3d_mesh::MeshError> for PipelineError {
    fn from(e: t3d_mesh::MeshError) -> Self {
        PipelineError::Mesh(e)
    }
}
impl From<t3d_atlas::AtlasError> for PipelineError {
    fn from(e: t3d_atlas::AtlasError) -> Self {
        PipelineError::Atlas(e)
    }
}
impl From<t3d_gltf::GltfError> for PipelineError {
    fn from(e: t3d_gltf::GltfError) -> Self {
        PipelineError::Gltf(e)
    }
}
impl From<t3d_tiles::TileError> for PipelineError {
    fn from(e: t3d_tiles::TileError) -> Self {
        PipelineError::Tile(e)
    }
}
