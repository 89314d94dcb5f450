//! Tiling configuration (§6). Builder pattern, since the teacher has no
//! single "config" module either — options accumulate on a struct via
//! chained `with_*` calls the way its graphics/window params do
//! (`fyrox-graphics`'s `GraphicsServerParams`).

use t3d_tiles::SamplingStrategy;

use crate::error::PipelineError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Strategy {
    Grid,
    Octree,
    KdTree,
    /// Octree gated by `geometricErrorThreshold`: stop subdividing once a
    /// node's geometric error would already fall under the threshold.
    Adaptive,
    /// Alias for `Octree` (§9 open-question resolution — kept as a
    /// distinct config value rather than silently dropped, so a caller
    /// that asks for it by name still gets deterministic behavior).
    Recursive,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TileFormat {
    B3dm,
    I3dm,
    Gltf,
    Pnts,
    Cmpt,
}

/// WGS-84 geodetic origin for the root ENU→ECEF transform (§4.7).
#[derive(Copy, Clone, Debug)]
pub struct GeoOrigin {
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub height_m: f64,
}

#[derive(Clone, Debug)]
pub struct TilerConfig {
    pub strategy: Strategy,
    pub tile_format: TileFormat,
    pub tile_size: f64,
    pub max_level: u32,
    pub generate_tileset: bool,
    pub enable_mesh_decimation: bool,
    pub lod_levels: u32,
    pub preserve_boundary: bool,
    pub point_cloud_sampling_strategy: SamplingStrategy,
    pub point_cloud_sampling_density: f64,
    pub instance_count: u32,
    pub coordinate_system: String,
    pub geometric_error_threshold: f64,
    pub parallel_processing_count: usize,
    pub storage_location: String,
    /// Not a named §6 option but required to bound octree/grid recursion
    /// below `maxLevel`; a node at or under this triangle count is a leaf.
    pub min_triangle_threshold: usize,
    /// Root geometric error clamp (§4.7: "the reference sets 1000.0").
    pub root_geometric_error_clamp: f64,
    pub origin: Option<GeoOrigin>,
}

impl Default for TilerConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Octree,
            tile_format: TileFormat::B3dm,
            tile_size: 1.0,
            max_level: 8,
            generate_tileset: true,
            enable_mesh_decimation: false,
            lod_levels: 1,
            preserve_boundary: true,
            point_cloud_sampling_strategy: SamplingStrategy::VerticesOnly,
            point_cloud_sampling_density: 1.0,
            instance_count: 1,
            coordinate_system: "EPSG:4978".to_string(),
            geometric_error_threshold: 16.0,
            parallel_processing_count: rayon::current_num_threads(),
            storage_location: "local".to_string(),
            min_triangle_threshold: 1000,
            root_geometric_error_clamp: 1000.0,
            origin: None,
        }
    }
}

impl TilerConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.max_level > 20 {
            return Err(PipelineError::InvalidConfig(format!(
                "maxLevel {} exceeds the allowed [0, 20] range",
                self.max_level
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub struct TilerConfigBuilder {
    config: TilerConfig,
}

impl TilerConfigBuilder {
    pub fn new() -> Self {
        Self { config: TilerConfig::default() }
    }

    pub fn strategy(mut self, s: Strategy) -> Self {
        self.config.strategy = s;
        self
    }

    pub fn tile_format(mut self, f: TileFormat) -> Self {
        self.config.tile_format = f;
        self
    }

    pub fn max_level(mut self, level: u32) -> Self {
        self.config.max_level = level;
        self
    }

    pub fn min_triangle_threshold(mut self, n: usize) -> Self {
        self.config.min_triangle_threshold = n;
        self
    }

    pub fn geometric_error_threshold(mut self, t: f64) -> Self {
        self.config.geometric_error_threshold = t;
        self
    }

    pub fn point_cloud_sampling(mut self, strategy: SamplingStrategy, density: f64) -> Self {
        self.config.point_cloud_sampling_strategy = strategy;
        self.config.point_cloud_sampling_density = density;
        self
    }

    pub fn origin(mut self, origin: GeoOrigin) -> Self {
        self.config.origin = Some(origin);
        self
    }

    pub fn parallel_processing_count(mut self, n: usize) -> Self {
        self.config.parallel_processing_count = n;
        self
    }

    pub fn build(self) -> Result<TilerConfig, PipelineError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_max_level_above_20() {
        let result = TilerConfigBuilder::new().max_level(21).build();
        assert!(matches!(result, Err(PipelineError::InvalidConfig(_))));
    }

    #[test]
    fn default_strategy_is_octree() {
        assert_eq!(TilerConfig::default().strategy, Strategy::Octree);
    }
}
