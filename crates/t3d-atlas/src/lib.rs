//! UV chart clustering and MaxRects atlas repacking (§4.3).

pub mod atlas;
pub mod chart;
pub mod error;
pub mod pack;

pub use atlas::{repack_material, PackedAtlas, BLEED_PADDING};
pub use chart::{build_charts, Chart};
pub use error::AtlasError;
pub use pack::{MaxRectsPacker, Rect};
