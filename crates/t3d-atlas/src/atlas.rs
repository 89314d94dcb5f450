//! Atlas sizing, packing and UV remap orchestration (§4.3 steps 5, 6, 8).
//! Pixel block copy (step 7) and JPEG recompression (step 9) are left to
//! the caller via the returned [`image::RgbaImage`] buffers — this module
//! owns geometry, not codecs.

use fxhash::FxHashMap;
use image::{imageops, RgbaImage};
use nalgebra::Vector2;
use t3d_mesh::{FaceT, Material, MeshT};

use crate::chart::{build_charts, Chart};
use crate::error::AtlasError;
use crate::pack::MaxRectsPacker;

/// 2-pixel bleed padding on every chart edge, per §4.3 step 5.
pub const BLEED_PADDING: u32 = 2;

fn next_pow2(mut x: u32) -> u32 {
    if x == 0 {
        return 1;
    }
    x -= 1;
    x |= x >> 1;
    x |= x >> 2;
    x |= x >> 4;
    x |= x >> 8;
    x |= x >> 16;
    x + 1
}

/// Pixel-space size of a chart's packed footprint, given the source
/// texture's resolution and the chart's UV extent.
fn chart_pixel_size(chart: &Chart, source: &RgbaImage) -> (u32, u32) {
    let extent = chart.uv_max - chart.uv_min;
    let w = ((extent.x.abs() * source.width() as f64).round() as u32).max(1) + 2 * BLEED_PADDING;
    let h = ((extent.y.abs() * source.height() as f64).round() as u32).max(1) + 2 * BLEED_PADDING;
    (w, h)
}

/// Chooses the atlas edge length: next power of two at least `sqrt(total
/// chart area)` and at least the largest single chart dimension, minimum
/// 32 (§4.3 step 5).
fn choose_atlas_edge(sizes: &[(u32, u32)]) -> u32 {
    let total_area: u64 = sizes.iter().map(|&(w, h)| w as u64 * h as u64).sum();
    let max_dim = sizes.iter().map(|&(w, h)| w.max(h)).max().unwrap_or(32);
    let edge = (total_area as f64).sqrt().ceil() as u32;
    next_pow2(edge.max(max_dim).max(32))
}

/// One produced atlas: the new material (cloned and renamed when this is
/// an overflow atlas) and its pixel buffer.
pub struct PackedAtlas {
    pub material: Material,
    pub image: RgbaImage,
}

/// Repacks every chart of one material group into one or more atlases,
/// remapping UVs in place on `mesh` and returning the new materials plus
/// their pixel data. `source` is the already-decoded diffuse texture for
/// this material; faces without a usable texture still get UVs clamped
/// into `[0,1)` of a blank atlas.
pub fn repack_material(
    mesh: &mut MeshT,
    material_index: u32,
    source: &RgbaImage,
) -> Result<Vec<PackedAtlas>, AtlasError> {
    let faces: Vec<(usize, FaceT)> = mesh
        .faces
        .iter()
        .enumerate()
        .filter(|(_, f)| f.material_index == material_index)
        .map(|(i, f)| (i, *f))
        .collect();
    if faces.is_empty() {
        return Ok(Vec::new());
    }
    let group_faces: Vec<FaceT> = faces.iter().map(|(_, f)| *f).collect();
    let charts = build_charts(mesh, &group_faces);

    let sizes: Vec<(u32, u32)> = charts.iter().map(|c| chart_pixel_size(c, source)).collect();
    let mut atlas_edge = choose_atlas_edge(&sizes);

    let base_material = mesh.materials[material_index as usize].clone_as(base_name(&mesh.materials[material_index as usize].name));
    let mut atlases = vec![PackedAtlas {
        material: base_material.clone(),
        image: RgbaImage::new(atlas_edge, atlas_edge),
    }];
    let mut packers = vec![MaxRectsPacker::new(atlas_edge, atlas_edge)];

    let mut new_uvs: FxHashMap<u32, Vector2<f64>> = FxHashMap::default();

    'chart: for (chart_idx, chart) in charts.iter().enumerate() {
        let (w, h) = sizes[chart_idx];
        if w == 0 || h == 0 {
            return Err(AtlasError::DegenerateGeometry { material_index });
        }

        for attempt in 0..2 {
            if let Some(rect) = packers.last_mut().unwrap().insert(w, h) {
                blit_chart(&mut atlases.last_mut().unwrap().image, source, chart, rect);
                remap_chart_uvs(mesh, &faces, chart, rect, atlases.last().unwrap().image.dimensions(), &mut new_uvs);
                continue 'chart;
            }
            if attempt == 0 {
                // Retry once in a fresh, doubled atlas (§4.3 step 6 / §7 `PackOverflow`).
                atlas_edge *= 2;
                let k = atlases.len();
                atlases.push(PackedAtlas {
                    material: base_material.clone_as(format!("{}-{}", base_material.name, k)),
                    image: RgbaImage::new(atlas_edge, atlas_edge),
                });
                packers.push(MaxRectsPacker::new(atlas_edge, atlas_edge));
            }
        }
        return Err(AtlasError::PackOverflow { material_index, atlas_edge });
    }

    for (&uv_idx, &uv) in &new_uvs {
        mesh.uvs[uv_idx as usize] = uv;
    }

    Ok(atlases)
}

fn base_name(name: &str) -> String {
    name.to_owned()
}

fn blit_chart(dest: &mut RgbaImage, source: &RgbaImage, chart: &Chart, rect: crate::pack::Rect) {
    let sx = (chart.uv_min.x * source.width() as f64).round().clamp(0.0, (source.width() - 1) as f64) as u32;
    let sy = ((1.0 - chart.uv_max.y) * source.height() as f64).round().clamp(0.0, (source.height() - 1) as f64) as u32;
    let sw = ((chart.uv_max.x - chart.uv_min.x).abs() * source.width() as f64).round().max(1.0) as u32;
    let sh = ((chart.uv_max.y - chart.uv_min.y).abs() * source.height() as f64).round().max(1.0) as u32;
    let sw = sw.min(source.width().saturating_sub(sx)).max(1);
    let sh = sh.min(source.height().saturating_sub(sy)).max(1);

    let inner_w = rect.w.saturating_sub(2 * BLEED_PADDING).max(1);
    let inner_h = rect.h.saturating_sub(2 * BLEED_PADDING).max(1);
    let cropped = imageops::crop_imm(source, sx, sy, sw, sh).to_image();
    let resized = imageops::resize(&cropped, inner_w, inner_h, imageops::FilterType::Triangle);
    imageops::overlay(dest, &resized, (rect.x + BLEED_PADDING) as i64, (rect.y + BLEED_PADDING) as i64);
}

/// Rewrites the UV of every vertex a chart's faces reference so the
/// chart-local normalized position maps onto `rect` within `atlas_dims`,
/// flipping Y between UV's bottom-left origin and the image's top-left
/// origin (§4.3 step 8).
fn remap_chart_uvs(
    mesh: &MeshT,
    faces: &[(usize, FaceT)],
    chart: &Chart,
    rect: crate::pack::Rect,
    atlas_dims: (u32, u32),
    new_uvs: &mut FxHashMap<u32, Vector2<f64>>,
) {
    let extent = chart.uv_max - chart.uv_min;
    let (aw, ah) = (atlas_dims.0 as f64, atlas_dims.1 as f64);
    let inner_x0 = (rect.x + BLEED_PADDING) as f64 / aw;
    let inner_y0 = (rect.y + BLEED_PADDING) as f64 / ah;
    let inner_w = rect.w.saturating_sub(2 * BLEED_PADDING).max(1) as f64 / aw;
    let inner_h = rect.h.saturating_sub(2 * BLEED_PADDING).max(1) as f64 / ah;

    for &chart_face_idx in &chart.faces {
        let (_, face) = faces[chart_face_idx];
        for uv_idx in [face.uv_a, face.uv_b, face.uv_c] {
            if new_uvs.contains_key(&uv_idx) {
                continue;
            }
            let uv = mesh.uvs[uv_idx as usize];
            let local_u = if extent.x.abs() > 0.0 { (uv.x - chart.uv_min.x) / extent.x } else { 0.0 };
            let local_v = if extent.y.abs() > 0.0 { (uv.y - chart.uv_min.y) / extent.y } else { 0.0 };
            let dest_u = inner_x0 + local_u * inner_w;
            // Flip: UV v=0 is the bottom of the chart, image y=0 is the top.
            let dest_v = 1.0 - (inner_y0 + (1.0 - local_v) * inner_h);
            new_uvs.insert(uv_idx, Vector2::new(dest_u, dest_v));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_pow2_rounds_up() {
        assert_eq!(next_pow2(1), 1);
        assert_eq!(next_pow2(33), 64);
        assert_eq!(next_pow2(64), 64);
    }

    #[test]
    fn atlas_edge_covers_total_area_and_min_32() {
        assert_eq!(choose_atlas_edge(&[(10, 10)]), 32);
        assert_eq!(choose_atlas_edge(&[(200, 200), (200, 200)]), 512);
    }
}
