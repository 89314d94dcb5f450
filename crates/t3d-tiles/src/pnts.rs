//! PNTS container encoding (§4.5) and the three point-cloud sampling
//! strategies named in §6 (`pointCloudSamplingStrategy`). Dense sampling
//! uses a deterministic low-discrepancy (van der Corput) sequence rather
//! than `rand`, since the pipeline's ordering guarantee (§5) requires the
//! same mesh and config to always produce the same point set.

use byteorder::{LittleEndian, WriteBytesExt};
use nalgebra::Vector3;
use serde_json::json;
use t3d_mesh::{AnyMesh, Face};

use crate::error::TileError;
use crate::padding::{pad_binary_to_8, pad_json_to_4};

pub const MAGIC: &[u8; 4] = b"pnts";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SamplingStrategy {
    VerticesOnly,
    UniformSampling,
    DenseSampling,
}

fn van_der_corput(mut i: u32, base: u32) -> f64 {
    let mut f = 1.0;
    let mut r = 0.0;
    while i > 0 {
        f /= base as f64;
        r += f * (i % base) as f64;
        i /= base;
    }
    r
}

fn triangle_area(a: Vector3<f64>, b: Vector3<f64>, c: Vector3<f64>) -> f64 {
    (b - a).cross(&(c - a)).norm() * 0.5
}

fn triangle_point(a: Vector3<f64>, b: Vector3<f64>, c: Vector3<f64>, r1: f64, r2: f64) -> Vector3<f64> {
    let sqrt_r1 = r1.sqrt();
    let wa = 1.0 - sqrt_r1;
    let wb = sqrt_r1 * (1.0 - r2);
    let wc = sqrt_r1 * r2;
    a.scale(wa) + b.scale(wb) + c.scale(wc)
}

fn mesh_triangle_positions(mesh: &AnyMesh) -> Vec<[Vector3<f64>; 3]> {
    match mesh {
        AnyMesh::Plain(m) => m
            .faces
            .iter()
            .map(|f: &Face| [m.vertices[f.a as usize], m.vertices[f.b as usize], m.vertices[f.c as usize]])
            .collect(),
        AnyMesh::Textured(m) => m
            .faces
            .iter()
            .map(|f| [m.vertices[f.a as usize], m.vertices[f.b as usize], m.vertices[f.c as usize]])
            .collect(),
    }
}

/// Produces the point set for a sampling strategy. `density` is
/// triangles-to-samples: for dense sampling, `samples = ceil(area *
/// density)` per triangle (per-triangle area-proportional sampling).
pub fn sample_points(mesh: &AnyMesh, strategy: SamplingStrategy, density: f64) -> Vec<Vector3<f64>> {
    match strategy {
        SamplingStrategy::VerticesOnly => match mesh {
            AnyMesh::Plain(m) => m.vertices.clone(),
            AnyMesh::Textured(m) => m.vertices.clone(),
        },
        SamplingStrategy::UniformSampling => mesh_triangle_positions(mesh)
            .into_iter()
            .map(|[a, b, c]| Vector3::new((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0, (a.z + b.z + c.z) / 3.0))
            .collect(),
        SamplingStrategy::DenseSampling => {
            let mut points = Vec::new();
            for [a, b, c] in mesh_triangle_positions(mesh) {
                let area = triangle_area(a, b, c);
                let samples = (area * density).ceil().max(1.0) as u32;
                for i in 0..samples {
                    let r1 = van_der_corput(i + 1, 2);
                    let r2 = van_der_corput(i + 1, 3);
                    points.push(triangle_point(a, b, c, r1, r2));
                }
            }
            points
        }
    }
}

pub fn encode_pnts(points: &[Vector3<f64>]) -> Result<Vec<u8>, TileError> {
    if points.is_empty() {
        return Err(TileError::InvalidInput("no points to encode".into()));
    }

    let mut feature_json = serde_json::to_vec(&json!({
        "POINTS_LENGTH": points.len(),
        "POSITION": { "byteOffset": 0 },
    }))
    .unwrap();
    pad_json_to_4(&mut feature_json);

    let mut feature_bin = Vec::with_capacity(points.len() * 12);
    for p in points {
        feature_bin.write_f32::<LittleEndian>(p.x as f32).unwrap();
        feature_bin.write_f32::<LittleEndian>(p.y as f32).unwrap();
        feature_bin.write_f32::<LittleEndian>(p.z as f32).unwrap();
    }
    pad_binary_to_8(&mut feature_bin);

    let mut batch_json: Vec<u8> = Vec::new();
    pad_json_to_4(&mut batch_json);
    let mut batch_bin: Vec<u8> = Vec::new();
    pad_binary_to_8(&mut batch_bin);

    let total_len = 28 + feature_json.len() + feature_bin.len() + batch_json.len() + batch_bin.len();

    let mut out = Vec::with_capacity(total_len);
    out.extend_from_slice(MAGIC);
    out.write_u32::<LittleEndian>(1).unwrap();
    out.write_u32::<LittleEndian>(total_len as u32).unwrap();
    out.write_u32::<LittleEndian>(feature_json.len() as u32).unwrap();
    out.write_u32::<LittleEndian>(feature_bin.len() as u32).unwrap();
    out.write_u32::<LittleEndian>(batch_json.len() as u32).unwrap();
    out.write_u32::<LittleEndian>(batch_bin.len() as u32).unwrap();
    out.extend_from_slice(&feature_json);
    out.extend_from_slice(&feature_bin);
    out.extend_from_slice(&batch_json);
    out.extend_from_slice(&batch_bin);

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use t3d_mesh::{Face, Mesh};

    fn triangle_mesh() -> AnyMesh {
        let mut m = Mesh::new("tri");
        m.vertices = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        ];
        m.faces.push(Face { a: 0, b: 1, c: 2 });
        AnyMesh::Plain(m)
    }

    #[test]
    fn vertices_only_returns_mesh_vertices() {
        let points = sample_points(&triangle_mesh(), SamplingStrategy::VerticesOnly, 1.0);
        assert_eq!(points.len(), 3);
    }

    #[test]
    fn dense_sampling_scales_with_density() {
        let low = sample_points(&triangle_mesh(), SamplingStrategy::DenseSampling, 2.0);
        let high = sample_points(&triangle_mesh(), SamplingStrategy::DenseSampling, 20.0);
        assert!(high.len() > low.len());
    }

    #[test]
    fn dense_sampling_is_deterministic() {
        let a = sample_points(&triangle_mesh(), SamplingStrategy::DenseSampling, 10.0);
        let b = sample_points(&triangle_mesh(), SamplingStrategy::DenseSampling, 10.0);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_points_rejected() {
        assert!(matches!(encode_pnts(&[]), Err(TileError::InvalidInput(_))));
    }
}
