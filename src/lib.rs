//! Tileforge: mesh-to-Cesium-3D-Tiles pipeline.
//!
//! This crate is a thin facade over the workspace members, the same way
//! the teacher's own root crate re-exports its subsystem crates rather
//! than hosting logic directly. Pull in the pieces you need:
//!
//! - [`t3d_core`] — logging, cancellation/progress, storage and loader contracts.
//! - [`t3d_math`] — AABBs, the split-plane axis contract, WGS-84/ECEF transforms.
//! - [`t3d_mesh`] — the indexed mesh model, materials, and the axis-aligned split.
//! - [`t3d_atlas`] — UV chart clustering and MaxRects atlas repacking.
//! - [`t3d_gltf`] — binary glTF (GLB) encoding.
//! - [`t3d_tiles`] — B3DM/I3DM/PNTS/CMPT container encoding.
//! - [`t3d_pipeline`] — the recursive tiler, tileset.json builder, and worker pool.

pub use t3d_atlas;
pub use t3d_core;
pub use t3d_gltf;
pub use t3d_math;
pub use t3d_mesh;
pub use t3d_pipeline;
pub use t3d_tiles;

pub use t3d_core::{CancellationToken, ProgressIndicator, ProgressStage};
pub use t3d_mesh::AnyMesh;
pub use t3d_pipeline::{run_pipeline, PipelineError, RunOutput, TilerConfig, TilerConfigBuilder};
