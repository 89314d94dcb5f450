//! Recursive tiler, tileset.json tree builder, and the worker-pool
//! orchestration tying C6/C7/C8 together (§4.6, §4.7, §4.8, §5).

pub mod config;
pub mod error;
pub mod manifest;
pub mod run;
pub mod tiler;
pub mod tileset;

pub use config::{GeoOrigin, Strategy, TileFormat, TilerConfig, TilerConfigBuilder};
pub use error::PipelineError;
pub use manifest::{tile_uri, Manifest, Tile};
pub use run::{run_pipeline, RunOutput};
pub use tiler::{build_tree, SliceCoords, TileNode};
pub use tileset::build_tileset;
