//! Worker-pool orchestration (§5): a `rayon` pool repacks, encodes and
//! containerizes every leaf of the tiling tree in parallel, a single
//! collector gathers the results in deterministic `(level, z, y, x)`
//! order, then the tileset is assembled from that order.

use image::RgbaImage;
use nalgebra::Vector3;
use rayon::prelude::*;

use t3d_core::{CancellationToken, Log, ProgressIndicator, ProgressStage};
use t3d_mesh::{AnyMesh, TextureRef, TextureSource};
use t3d_tiles::SamplingStrategy;

use crate::config::{TileFormat, TilerConfig};
use crate::error::PipelineError;
use crate::manifest::{tile_uri, Tile};
use crate::tiler::{build_tree, TileNode};
use crate::tileset::build_tileset;

/// Everything a finished run produced: the tileset document and the
/// per-tile bytes a caller hands to a [`t3d_core::TileStorage`].
pub struct RunOutput {
    pub tileset_json: serde_json::Value,
    pub tiles: Vec<(Tile, Vec<u8>)>,
}

fn load_rgba(texture: &TextureSource) -> Option<RgbaImage> {
    match texture {
        TextureSource::Path(path) => image::open(path).ok().map(|img| img.to_rgba8()),
        TextureSource::InMemory { width, height, rgba } => {
            RgbaImage::from_raw(*width, *height, rgba.clone())
        }
    }
}

/// Repacks every material a textured leaf mesh uses into a fresh atlas,
/// mutating the mesh's UVs and material table in place and swapping each
/// material's diffuse texture for the packed atlas pixels. Materials with
/// no loadable diffuse texture are left untouched, per §4.3's "untextured
/// materials pass through unchanged".
///
/// Faces are only reassigned onto the first atlas a material's charts
/// land in: `repack_material` doesn't report which chart landed in which
/// overflow atlas, so an overflow (§4.3 step 6) keeps every face on the
/// base material while its later atlases are produced but not wired back
/// onto geometry. Rare in practice — overflow only triggers once a single
/// material's charts exceed one packed sheet.
fn repack_leaf_atlas(mesh: &mut AnyMesh) -> Result<(), PipelineError> {
    let AnyMesh::Textured(mesh_t) = mesh else { return Ok(()) };
    let material_count = mesh_t.materials.len();
    for material_index in 0..material_count {
        let source = match mesh_t.materials[material_index].diffuse_texture.as_ref() {
            Some(tex) => tex.source.clone(),
            None => continue,
        };
        let Some(image) = load_rgba(&source) else { continue };
        let atlases = t3d_atlas::repack_material(mesh_t, material_index as u32, &image)?;
        let Some(base_atlas) = atlases.into_iter().next() else { continue };
        if base_atlas.image.width() == 0 {
            continue;
        }
        let (width, height) = base_atlas.image.dimensions();
        mesh_t.materials[material_index] = base_atlas.material;
        mesh_t.materials[material_index].diffuse_texture = Some(TextureRef {
            source: TextureSource::InMemory { width, height, rgba: base_atlas.image.into_raw() },
            ..TextureRef::from_path("")
        });
        if mesh_t.faces.iter().any(|f| f.material_index == material_index as u32) {
            Log::info(format!("repacked atlas for material {material_index} into {width}x{height}"));
        }
    }
    Ok(())
}

fn encode_container(mesh: &AnyMesh, config: &TilerConfig) -> Result<(Vec<u8>, &'static str), PipelineError> {
    match config.tile_format {
        TileFormat::Gltf => {
            let glb = t3d_gltf::encode_glb(mesh)?;
            Ok((glb, "glb"))
        }
        TileFormat::B3dm => {
            let glb = t3d_gltf::encode_glb(mesh)?;
            let material_names: Vec<String> = match mesh {
                AnyMesh::Textured(m) => m.materials.iter().map(|mat| mat.name.clone()).collect(),
                AnyMesh::Plain(_) => vec![],
            };
            Ok((t3d_tiles::encode_b3dm(&glb, &material_names)?, "b3dm"))
        }
        TileFormat::I3dm => {
            let glb = t3d_gltf::encode_glb(mesh)?;
            let positions: Vec<Vector3<f64>> = vec![mesh.bounds().center()];
            Ok((t3d_tiles::encode_i3dm(&glb, &positions)?, "i3dm"))
        }
        TileFormat::Pnts => {
            let points = t3d_tiles::sample_points(mesh, config.point_cloud_sampling_strategy, config.point_cloud_sampling_density);
            Ok((t3d_tiles::encode_pnts(&points)?, "pnts"))
        }
        TileFormat::Cmpt => {
            let glb = t3d_gltf::encode_glb(mesh)?;
            let b3dm = t3d_tiles::encode_b3dm(&glb, &[])?;
            let points = t3d_tiles::sample_points(mesh, SamplingStrategy::VerticesOnly, config.point_cloud_sampling_density);
            let pnts = t3d_tiles::encode_pnts(&points)?;
            Ok((t3d_tiles::encode_cmpt(&[b3dm, pnts]), "cmpt"))
        }
    }
}

fn collect_leaves<'a>(node: &'a TileNode, out: &mut Vec<&'a TileNode>) {
    if node.is_leaf() {
        out.push(node);
    } else {
        for child in &node.children {
            collect_leaves(child, out);
        }
    }
}

/// Runs the full C6-C8 pipeline over an already-loaded root mesh: builds
/// the tiling tree, repacks/encodes every leaf in parallel, then
/// assembles the tileset document from the deterministically-ordered
/// results.
pub fn run_pipeline(
    mesh: AnyMesh,
    bounds: t3d_math::Box3,
    config: &TilerConfig,
    cancel: &CancellationToken,
    progress: &ProgressIndicator,
) -> Result<RunOutput, PipelineError> {
    progress.set_stage(ProgressStage::Splitting, 1);
    let root = build_tree(mesh, bounds, config, cancel, progress)
        .ok_or_else(|| PipelineError::InvalidConfig("input mesh has no faces".to_string()))?;

    if cancel.is_cancelled() {
        return Err(PipelineError::Cancelled);
    }

    let mut leaves = Vec::new();
    collect_leaves(&root, &mut leaves);

    progress.set_stage(ProgressStage::TileEncoding, leaves.len() as u32);

    let encoded: Result<Vec<(Tile, Vec<u8>)>, PipelineError> = leaves
        .par_iter()
        .enumerate()
        .map(|(index, node)| -> Result<(Tile, Vec<u8>), PipelineError> {
            if cancel.is_cancelled() {
                return Err(PipelineError::Cancelled);
            }
            let mut mesh = node.mesh.clone().expect("leaf nodes always carry a mesh");
            repack_leaf_atlas(&mut mesh)?;
            let (bytes, ext) = encode_container(&mesh, config)?;
            progress.advance();
            Ok((
                Tile {
                    id: index as u64,
                    coords: node.coords,
                    relative_path: tile_uri(node.coords, ext),
                    bounds: node.bounds,
                    byte_len: bytes.len(),
                },
                bytes,
            ))
        })
        .collect();
    let mut encoded = encoded?;
    encoded.sort_by_key(|(tile, _)| (tile.coords.level, tile.coords.z, tile.coords.y, tile.coords.x));

    progress.set_stage(ProgressStage::TilesetAssembly, 1);
    let uri_by_coords: std::collections::HashMap<_, _> =
        encoded.iter().map(|(tile, _)| (tile.coords, tile.relative_path.clone())).collect();
    let tileset_json = build_tileset(&root, config, |node| uri_by_coords.get(&node.coords).cloned());
    progress.advance();

    Ok(RunOutput { tileset_json, tiles: encoded })
}

#[cfg(test)]
mod tests {
    use super::*;
    use t3d_mesh::{Face, Mesh};

    fn triangle_soup() -> AnyMesh {
        let mut m = Mesh::new("soup");
        m.vertices = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(4.0, 0.0, 0.0),
            Vector3::new(0.0, 4.0, 0.0),
            Vector3::new(4.0, 4.0, 0.0),
        ];
        m.faces.push(Face { a: 0, b: 1, c: 2 });
        m.faces.push(Face { a: 1, b: 3, c: 2 });
        AnyMesh::Plain(m)
    }

    #[test]
    fn pipeline_produces_tiles_ordered_by_coords() {
        let mesh = triangle_soup();
        let bounds = mesh.bounds();
        let config = TilerConfig { max_level: 1, min_triangle_threshold: 0, tile_format: TileFormat::Gltf, ..TilerConfig::default() };
        let cancel = CancellationToken::new();
        let progress = ProgressIndicator::new();
        let output = run_pipeline(mesh, bounds, &config, &cancel, &progress).unwrap();
        assert!(!output.tiles.is_empty());
        let mut prev = None;
        for (tile, _) in &output.tiles {
            let key = (tile.coords.level, tile.coords.z, tile.coords.y, tile.coords.x);
            if let Some(p) = prev {
                assert!(key >= p);
            }
            prev = Some(key);
        }
    }

    #[test]
    fn cancelled_token_aborts_before_tileset() {
        let mesh = triangle_soup();
        let bounds = mesh.bounds();
        let config = TilerConfig::default();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let progress = ProgressIndicator::new();
        let result = run_pipeline(mesh, bounds, &config, &cancel, &progress);
        assert!(matches!(result, Err(PipelineError::Cancelled)));
    }
}
