//! UV chart clustering (§4.3 steps 1-4): group a material's faces into
//! connected components by shared UV edges, via breadth-first search —
//! the same "treat faces as nodes, shared edges as adjacency" approach the
//! teacher's navmesh code uses for region flood-fill, adapted from index
//! triples to UV-edge triples.

use fxhash::FxHashMap;
use nalgebra::Vector2;
use t3d_core::log::Log;
use t3d_mesh::{FaceT, MeshT};

/// A connected cluster of a single material's faces in UV space.
pub struct Chart {
    /// Indices into the material-filtered face list passed to [`build_charts`].
    pub faces: Vec<usize>,
    pub uv_min: Vector2<f64>,
    pub uv_max: Vector2<f64>,
}

fn edge_key(a: u32, b: u32) -> (u32, u32) {
    if a < b { (a, b) } else { (b, a) }
}

/// Clusters `faces` (already filtered to one material) into UV-connected
/// charts, sorted descending by face count (§4.3 step 3, "improve packing
/// density").
pub fn build_charts(mesh: &MeshT, faces: &[FaceT]) -> Vec<Chart> {
    let mut edge_to_faces: FxHashMap<(u32, u32), Vec<usize>> = FxHashMap::default();
    for (i, f) in faces.iter().enumerate() {
        for edge in [
            edge_key(f.uv_a, f.uv_b),
            edge_key(f.uv_b, f.uv_c),
            edge_key(f.uv_c, f.uv_a),
        ] {
            edge_to_faces.entry(edge).or_default().push(i);
        }
    }

    let mut visited = vec![false; faces.len()];
    let mut charts = Vec::new();

    for start in 0..faces.len() {
        if visited[start] {
            continue;
        }
        let mut queue = vec![start];
        visited[start] = true;
        let mut members = Vec::new();

        while let Some(i) = queue.pop() {
            members.push(i);
            let f = &faces[i];
            for edge in [
                edge_key(f.uv_a, f.uv_b),
                edge_key(f.uv_b, f.uv_c),
                edge_key(f.uv_c, f.uv_a),
            ] {
                if let Some(neighbors) = edge_to_faces.get(&edge) {
                    for &n in neighbors {
                        if !visited[n] {
                            visited[n] = true;
                            queue.push(n);
                        }
                    }
                }
            }
        }

        let mut uv_min = Vector2::new(f64::MAX, f64::MAX);
        let mut uv_max = Vector2::new(f64::MIN, f64::MIN);
        for &i in &members {
            let f = &faces[i];
            for uv_idx in [f.uv_a, f.uv_b, f.uv_c] {
                let uv = mesh.uvs[uv_idx as usize];
                uv_min.x = uv_min.x.min(uv.x);
                uv_min.y = uv_min.y.min(uv.y);
                uv_max.x = uv_max.x.max(uv.x);
                uv_max.y = uv_max.y.max(uv.y);
            }
        }

        clamp_udim_span(&mut uv_min, &mut uv_max);
        charts.push(Chart { faces: members, uv_min, uv_max });
    }

    charts.sort_by_key(|c| std::cmp::Reverse(c.faces.len()));
    charts
}

/// If a chart straddles a UDIM tile boundary on either axis, clamps the
/// max to the tile containing `uv_min` and logs it, per §4.3 step 4.
fn clamp_udim_span(uv_min: &mut Vector2<f64>, uv_max: &mut Vector2<f64>) {
    const EPS: f64 = 1e-6;
    for axis in 0..2 {
        let lo = uv_min[axis];
        let hi = uv_max[axis];
        if (hi - EPS).floor() != (lo + EPS).floor() {
            Log::warn(format!(
                "chart straddles a UDIM tile boundary on axis {axis} ({lo}..{hi}); clamping"
            ));
            uv_max[axis] = lo.floor() + 1.0 - EPS;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use t3d_mesh::Material;

    fn square_mesh() -> (MeshT, Vec<FaceT>) {
        let mut m = MeshT::new("m");
        m.vertices = vec![nalgebra::Vector3::new(0.0, 0.0, 0.0); 6];
        m.uvs = vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(0.0, 1.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(5.0, 5.0),
            Vector2::new(6.0, 5.0),
        ];
        m.materials = vec![Material::new("mat")];
        let faces = vec![
            FaceT { a: 0, b: 1, c: 2, uv_a: 0, uv_b: 1, uv_c: 2, material_index: 0 },
            FaceT { a: 1, b: 3, c: 2, uv_a: 1, uv_b: 3, uv_c: 2, material_index: 0 },
            FaceT { a: 4, b: 5, c: 0, uv_a: 4, uv_b: 5, uv_c: 0, material_index: 0 },
        ];
        (m, faces)
    }

    #[test]
    fn adjacent_faces_form_one_chart_isolated_face_forms_another() {
        let (mesh, faces) = square_mesh();
        let charts = build_charts(&mesh, &faces);
        assert_eq!(charts.len(), 2);
        assert_eq!(charts[0].faces.len(), 2);
        assert_eq!(charts[1].faces.len(), 1);
    }
}
