//! Storage and loader contracts consumed by the pipeline (§6 of the spec).
//!
//! Concrete loaders (OBJ, glTF, OSGB, ...) and the concrete storage backend
//! (filesystem, object store) are out of scope for this crate; only the
//! interfaces they must satisfy live here.

use std::fmt::{Display, Formatter};
use std::path::Path;

/// Error surfaced by a storage backend. Mirrors the shape of a
/// file-system error without committing to one: a backend wraps its own
/// I/O error in `Io`, anything else goes through `Custom`.
#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Custom(String),
}

impl std::error::Error for StorageError {}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "storage I/O error: {err}"),
            Self::Custom(err) => write!(f, "{err}"),
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Output contract (§6 "Produced to storage layer"). Implemented by whatever
/// concrete backend a caller wires in; the pipeline only ever calls through
/// this trait so it stays backend-agnostic. Retry policy on `IoFailure`
/// (§7) is the implementer's responsibility.
pub trait TileStorage: Send + Sync {
    /// Writes `bytes` to `logical_path`, overwriting any existing content.
    fn write_bytes(&self, logical_path: &str, bytes: &[u8]) -> Result<(), StorageError>;

    /// Ensures that the directory portion of `logical_path` exists. A no-op
    /// for backends without a directory concept (e.g. most object stores).
    fn ensure_directory(&self, logical_path: &str) -> Result<(), StorageError>;
}

/// Axis-aligned bounding box returned by a loader, expressed in the same
/// world units as the mesh it bounds. Duplicated here (rather than
/// depending on `t3d-math`) so this crate has no dependency on the mesh
/// representation itself — only on the shape loaders must produce.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LoaderBoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

/// Input contract (§6 "Consumed from loaders"). A loader hands back
/// whatever it parsed plus its bounding box; the pipeline never inspects
/// the concrete mesh type beyond this trait's accessors.
pub trait LoadedMesh {
    fn vertex_count(&self) -> usize;
    fn faces_count(&self) -> usize;
    fn has_texture(&self) -> bool;
}

/// A loader turns a filesystem path into a `LoadedMesh` plus its bounds.
/// No concrete implementation ships in this crate (OBJ/glTF/OSGB loaders
/// are explicitly out of scope per §1) — this is purely the shape every
/// loader must have.
pub trait ModelLoader {
    type Mesh: LoadedMesh;

    fn load_model(&self, path: &Path) -> Result<(Self::Mesh, LoaderBoundingBox), StorageError>;
}
