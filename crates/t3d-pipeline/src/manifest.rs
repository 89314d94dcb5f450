//! In-memory manifest of the tiles a run produced. Not named by the
//! distilled spec directly, but implied by its "Produced to storage
//! layer" contract (§6) and supplemented here so a caller can list what
//! was written without re-walking the output directory.

use t3d_math::Box3;

use crate::tiler::SliceCoords;

/// One encoded tile's record: where it landed, what it covers, how big it is.
#[derive(Clone, Debug)]
pub struct Tile {
    pub id: u64,
    pub coords: SliceCoords,
    pub relative_path: String,
    pub bounds: Box3,
    pub byte_len: usize,
}

/// Manifest entries in the order tiles were collected, not necessarily
/// sorted by `(level, z, y, x)` — sort with [`Manifest::sorted_by_coords`]
/// before anything that needs deterministic output ordering (§5).
#[derive(Clone, Debug, Default)]
pub struct Manifest {
    tiles: Vec<Tile>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tile: Tile) {
        self.tiles.push(tile);
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn total_bytes(&self) -> usize {
        self.tiles.iter().map(|t| t.byte_len).sum()
    }

    /// Tiles ordered by `(level, z, y, x)`, the deterministic collection
    /// order §5 requires before tileset assembly.
    pub fn sorted_by_coords(&self) -> Vec<&Tile> {
        let mut out: Vec<&Tile> = self.tiles.iter().collect();
        out.sort_by_key(|t| (t.coords.level, t.coords.z, t.coords.y, t.coords.x));
        out
    }
}

/// Relative URI a leaf tile is written under: `Tile_<level>_<x>_<y>_<z>.<ext>`.
pub fn tile_uri(coords: SliceCoords, extension: &str) -> String {
    format!("./Tile_{}_{}_{}_{}.{}", coords.level, coords.x, coords.y, coords.z, extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tile(id: u64, level: u32, x: u32) -> Tile {
        Tile {
            id,
            coords: SliceCoords { level, x, y: 0, z: 0 },
            relative_path: tile_uri(SliceCoords { level, x, y: 0, z: 0 }, "b3dm"),
            bounds: Box3::from_min_max(nalgebra::Vector3::new(0.0, 0.0, 0.0), nalgebra::Vector3::new(1.0, 1.0, 1.0)),
            byte_len: 128,
        }
    }

    #[test]
    fn sorted_by_coords_orders_level_then_x() {
        let mut manifest = Manifest::new();
        manifest.push(sample_tile(1, 1, 1));
        manifest.push(sample_tile(2, 0, 0));
        manifest.push(sample_tile(3, 1, 0));
        let sorted = manifest.sorted_by_coords();
        let ids: Vec<u64> = sorted.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn total_bytes_sums_all_tiles() {
        let mut manifest = Manifest::new();
        manifest.push(sample_tile(1, 0, 0));
        manifest.push(sample_tile(2, 0, 1));
        assert_eq!(manifest.total_bytes(), 256);
    }

    #[test]
    fn tile_uri_uses_level_x_y_z_and_extension() {
        let uri = tile_uri(SliceCoords { level: 2, x: 3, y: 1, z: 0 }, "pnts");
        assert_eq!(uri, "./Tile_2_3_1_0.pnts");
    }
}
