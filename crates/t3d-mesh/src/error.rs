use std::fmt::{Display, Formatter};

/// Errors surfaced by the mesh data model (§7). Hand-written enum with a
/// `Display` impl, matching the teacher's `FileError`
/// (`fyrox-core/src/io.rs`) rather than reaching for `thiserror`.
#[derive(Debug)]
pub enum MeshError {
    /// Empty mesh handed to an operation that requires at least one face.
    EmptyMesh,
    /// A face index is out of range for the owning mesh's vertex/uv/material list.
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },
    /// `maxLevel` outside the `[0, 20]` range allowed by §6.
    InvalidMaxLevel(u32),
}

impl std::error::Error for MeshError {}

impl Display for MeshError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshError::EmptyMesh => write!(f, "mesh has no faces"),
            MeshError::IndexOutOfRange { what, index, len } => {
                write!(f, "{what} index {index} out of range (len {len})")
            }
            MeshError::InvalidMaxLevel(level) => {
                write!(f, "maxLevel {level} is outside the allowed [0, 20] range")
            }
        }
    }
}
