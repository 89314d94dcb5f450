use std::fmt::{Display, Formatter};

/// Errors surfaced by the atlas repacker (§7). Same hand-written-enum
/// convention as `t3d_mesh::MeshError`.
#[derive(Debug)]
pub enum AtlasError {
    /// A chart collapsed to zero UV extent; the chart is dropped and the
    /// task continues (§7 `DegenerateGeometry`).
    DegenerateGeometry { material_index: u32 },
    /// MaxRects couldn't place a chart even after doubling the atlas once.
    PackOverflow { material_index: u32, atlas_edge: u32 },
    /// Source texture missing or undecodable; caller falls back to the
    /// material's color factors.
    TextureLoadFailed { path: String },
}

impl std::error::Error for AtlasError {}

impl Display for AtlasError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AtlasError::DegenerateGeometry { material_index } => {
                write!(f, "material {material_index}: chart has zero UV extent")
            }
            AtlasError::PackOverflow { material_index, atlas_edge } => {
                write!(f, "material {material_index}: chart does not fit even a {atlas_edge}px atlas")
            }
            AtlasError::TextureLoadFailed { path } => write!(f, "failed to load texture at {path}"),
        }
    }
}
