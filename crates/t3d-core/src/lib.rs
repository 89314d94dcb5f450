//! Shared ambient stack for the tileforge pipeline: logging, the storage
//! and loader contracts the core consumes/produces (§6), and the
//! cancellation/progress primitives used by every long-running stage (§5).

pub mod cancellation;
pub mod io;
pub mod log;

pub use cancellation::{CancellationToken, ProgressIndicator, ProgressStage};
pub use io::{LoadedMesh, LoaderBoundingBox, ModelLoader, StorageError, TileStorage};
pub use log::{Log, MessageKind};

/// Fixed epsilon used throughout the pipeline for coincidence checks on
/// world-space coordinates (§4.1). `1e-6` world units, per spec.
pub const EPS: f64 = 1e-6;
