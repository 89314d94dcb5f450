//! 3D Tiles container encoding: B3DM, I3DM, PNTS, CMPT (§4.5).

pub mod b3dm;
pub mod cmpt;
pub mod error;
pub mod i3dm;
pub mod padding;
pub mod pnts;

pub use b3dm::encode_b3dm;
pub use cmpt::{encode_cmpt, parse_cmpt};
pub use error::TileError;
pub use i3dm::encode_i3dm;
pub use pnts::{encode_pnts, sample_points, SamplingStrategy};
