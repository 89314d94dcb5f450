//! The indexed mesh data model (§3) and the public `Split`/`RemoveUnused`
//! operations (§4.2) built on top of [`crate::split::split_triangle`].

use nalgebra::{Vector2, Vector3};
use t3d_math::{Axis, Box3};

use crate::dedup::DedupList;
use crate::error::MeshError;
use crate::material::Material;
use crate::split::split_triangle;

/// Plain (untextured) triangle: three vertex indices.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Face {
    pub a: u32,
    pub b: u32,
    pub c: u32,
}

/// Textured triangle: vertex indices, parallel UV indices, and the
/// material it belongs to (§3).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FaceT {
    pub a: u32,
    pub b: u32,
    pub c: u32,
    pub uv_a: u32,
    pub uv_b: u32,
    pub uv_c: u32,
    pub material_index: u32,
}

/// Indexed mesh with no UVs or materials.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub name: String,
    pub vertices: Vec<Vector3<f64>>,
    pub faces: Vec<Face>,
}

/// Indexed mesh with per-vertex UVs and a material table (§3).
#[derive(Clone, Debug, Default)]
pub struct MeshT {
    pub name: String,
    pub vertices: Vec<Vector3<f64>>,
    pub uvs: Vec<Vector2<f64>>,
    pub faces: Vec<FaceT>,
    pub materials: Vec<Material>,
}

impl Mesh {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn faces_count(&self) -> usize {
        self.faces.len()
    }

    pub fn bounds(&self) -> Box3 {
        Box3::from_points(&self.vertices)
    }

    /// Checks every face index is in range, per §7.
    pub fn validate(&self) -> Result<(), MeshError> {
        for face in &self.faces {
            for (what, idx) in [("vertex", face.a), ("vertex", face.b), ("vertex", face.c)] {
                if idx as usize >= self.vertices.len() {
                    return Err(MeshError::IndexOutOfRange {
                        what,
                        index: idx as usize,
                        len: self.vertices.len(),
                    });
                }
            }
        }
        Ok(())
    }

    /// `Split(axis, q) -> (left, right, crossCount)` (§4.2). Every input
    /// face is classified by its three vertices' side of `axis = q`;
    /// straddling faces are cut into the quad/cap triangles described
    /// there, and `crossCount` counts only faces that actually produced a
    /// cut (the collinear special case does not).
    pub fn split(&self, axis: Axis, q: f64) -> (Mesh, Mesh, usize) {
        let mut left_verts = DedupList::new();
        let mut right_verts = DedupList::new();
        let mut left_faces = Vec::new();
        let mut right_faces = Vec::new();
        let mut cross_count = 0usize;

        for face in &self.faces {
            let pos = [
                self.vertices[face.a as usize],
                self.vertices[face.b as usize],
                self.vertices[face.c as usize],
            ];
            let cut = split_triangle(axis, q, pos, None);
            if cut.crossed {
                cross_count += 1;
            }
            for tri in &cut.left {
                let idx = tri.map(|v| left_verts.insert(v));
                left_faces.push(Face { a: idx[0], b: idx[1], c: idx[2] });
            }
            for tri in &cut.right {
                let idx = tri.map(|v| right_verts.insert(v));
                right_faces.push(Face { a: idx[0], b: idx[1], c: idx[2] });
            }
        }

        (
            Mesh {
                name: self.name.clone(),
                vertices: left_verts.into_vec(),
                faces: left_faces,
            },
            Mesh {
                name: self.name.clone(),
                vertices: right_verts.into_vec(),
                faces: right_faces,
            },
            cross_count,
        )
    }

    /// Rebuilds the vertex list containing only entries referenced by a
    /// face, remapping indices and preserving first-appearance order (§4.2
    /// "RemoveUnused").
    pub fn remove_unused(&self) -> Mesh {
        let mut used = DedupList::new();
        let faces = self
            .faces
            .iter()
            .map(|f| Face {
                a: used.insert(self.vertices[f.a as usize]),
                b: used.insert(self.vertices[f.b as usize]),
                c: used.insert(self.vertices[f.c as usize]),
            })
            .collect();
        Mesh {
            name: self.name.clone(),
            vertices: used.into_vec(),
            faces,
        }
    }
}

impl MeshT {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vertices: Vec::new(),
            uvs: Vec::new(),
            faces: Vec::new(),
            materials: Vec::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn faces_count(&self) -> usize {
        self.faces.len()
    }

    pub fn bounds(&self) -> Box3 {
        Box3::from_points(&self.vertices)
    }

    pub fn validate(&self) -> Result<(), MeshError> {
        for face in &self.faces {
            for (what, idx, len) in [
                ("vertex", face.a, self.vertices.len()),
                ("vertex", face.b, self.vertices.len()),
                ("vertex", face.c, self.vertices.len()),
                ("uv", face.uv_a, self.uvs.len()),
                ("uv", face.uv_b, self.uvs.len()),
                ("uv", face.uv_c, self.uvs.len()),
                ("material", face.material_index, self.materials.len()),
            ] {
                if idx as usize >= len {
                    return Err(MeshError::IndexOutOfRange { what, index: idx as usize, len });
                }
            }
        }
        Ok(())
    }

    /// Same contract as [`Mesh::split`] with UVs interpolated alongside the
    /// 3D cut (§4.2 "UV propagation") and `materialIndex` carried through
    /// unchanged onto both output faces.
    pub fn split(&self, axis: Axis, q: f64) -> (MeshT, MeshT, usize) {
        let mut left_verts = DedupList::new();
        let mut right_verts = DedupList::new();
        let mut left_uvs = DedupList::new();
        let mut right_uvs = DedupList::new();
        let mut left_faces = Vec::new();
        let mut right_faces = Vec::new();
        let mut cross_count = 0usize;

        for face in &self.faces {
            let pos = [
                self.vertices[face.a as usize],
                self.vertices[face.b as usize],
                self.vertices[face.c as usize],
            ];
            let uv = [
                self.uvs[face.uv_a as usize],
                self.uvs[face.uv_b as usize],
                self.uvs[face.uv_c as usize],
            ];
            let cut = split_triangle(axis, q, pos, Some(uv));
            if cut.crossed {
                cross_count += 1;
            }
            for (tri, tri_uv) in cut.left.iter().zip(cut.left_uv.iter()) {
                let vidx = tri.map(|v| left_verts.insert(v));
                let uidx = tri_uv.map(|u| left_uvs.insert(u));
                left_faces.push(FaceT {
                    a: vidx[0],
                    b: vidx[1],
                    c: vidx[2],
                    uv_a: uidx[0],
                    uv_b: uidx[1],
                    uv_c: uidx[2],
                    material_index: face.material_index,
                });
            }
            for (tri, tri_uv) in cut.right.iter().zip(cut.right_uv.iter()) {
                let vidx = tri.map(|v| right_verts.insert(v));
                let uidx = tri_uv.map(|u| right_uvs.insert(u));
                right_faces.push(FaceT {
                    a: vidx[0],
                    b: vidx[1],
                    c: vidx[2],
                    uv_a: uidx[0],
                    uv_b: uidx[1],
                    uv_c: uidx[2],
                    material_index: face.material_index,
                });
            }
        }

        (
            MeshT {
                name: self.name.clone(),
                vertices: left_verts.into_vec(),
                uvs: left_uvs.into_vec(),
                faces: left_faces,
                materials: self.materials.clone(),
            },
            MeshT {
                name: self.name.clone(),
                vertices: right_verts.into_vec(),
                uvs: right_uvs.into_vec(),
                faces: right_faces,
                materials: self.materials.clone(),
            },
            cross_count,
        )
    }

    /// Rebuilds vertex, UV and material lists to contain only entries a
    /// face references, remapping indices and preserving first-appearance
    /// order (§4.2 "RemoveUnused").
    pub fn remove_unused(&self) -> MeshT {
        let mut used_verts = DedupList::new();
        let mut used_uvs = DedupList::new();
        let mut used_mats: Vec<u32> = Vec::new();
        let mut mat_remap = vec![None; self.materials.len()];

        let faces = self
            .faces
            .iter()
            .map(|f| {
                let material_index = match mat_remap[f.material_index as usize] {
                    Some(idx) => idx,
                    None => {
                        let idx = used_mats.len() as u32;
                        used_mats.push(f.material_index);
                        mat_remap[f.material_index as usize] = Some(idx);
                        idx
                    }
                };
                FaceT {
                    a: used_verts.insert(self.vertices[f.a as usize]),
                    b: used_verts.insert(self.vertices[f.b as usize]),
                    c: used_verts.insert(self.vertices[f.c as usize]),
                    uv_a: used_uvs.insert(self.uvs[f.uv_a as usize]),
                    uv_b: used_uvs.insert(self.uvs[f.uv_b as usize]),
                    uv_c: used_uvs.insert(self.uvs[f.uv_c as usize]),
                    material_index,
                }
            })
            .collect();

        MeshT {
            name: self.name.clone(),
            vertices: used_verts.into_vec(),
            uvs: used_uvs.into_vec(),
            faces,
            materials: used_mats.into_iter().map(|i| self.materials[i as usize].clone()).collect(),
        }
    }
}

/// Tagged union over the two mesh flavors (§9 design note: "one enum with
/// a plain/textured tag rather than a trait object", since the split
/// algorithm and storage only ever need to branch once per call, not per
/// vertex).
#[derive(Clone, Debug)]
pub enum AnyMesh {
    Plain(Mesh),
    Textured(MeshT),
}

impl AnyMesh {
    pub fn vertex_count(&self) -> usize {
        match self {
            AnyMesh::Plain(m) => m.vertex_count(),
            AnyMesh::Textured(m) => m.vertex_count(),
        }
    }

    pub fn faces_count(&self) -> usize {
        match self {
            AnyMesh::Plain(m) => m.faces_count(),
            AnyMesh::Textured(m) => m.faces_count(),
        }
    }

    pub fn bounds(&self) -> Box3 {
        match self {
            AnyMesh::Plain(m) => m.bounds(),
            AnyMesh::Textured(m) => m.bounds(),
        }
    }

    pub fn has_texture(&self) -> bool {
        matches!(self, AnyMesh::Textured(_))
    }

    pub fn split(&self, axis: Axis, q: f64) -> (AnyMesh, AnyMesh, usize) {
        match self {
            AnyMesh::Plain(m) => {
                let (l, r, c) = m.split(axis, q);
                (AnyMesh::Plain(l), AnyMesh::Plain(r), c)
            }
            AnyMesh::Textured(m) => {
                let (l, r, c) = m.split(axis, q);
                (AnyMesh::Textured(l), AnyMesh::Textured(r), c)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_mesh() -> Mesh {
        let mut m = Mesh::new("tri");
        m.vertices.push(Vector3::new(0.0, 0.0, 0.0));
        m.vertices.push(Vector3::new(1.0, 0.0, 0.0));
        m.vertices.push(Vector3::new(0.0, 1.0, 0.0));
        m.faces.push(Face { a: 0, b: 1, c: 2 });
        m
    }

    #[test]
    fn split_no_op_is_conservative() {
        let m = triangle_mesh();
        let (left, right, cross) = m.split(Axis::X, -1.0);
        assert_eq!(cross, 0);
        assert_eq!(left.faces_count(), 0);
        assert_eq!(right.faces_count(), 1);
    }

    #[test]
    fn split_counts_cut_faces() {
        let m = triangle_mesh();
        let (left, right, cross) = m.split(Axis::X, 0.5);
        assert_eq!(cross, 1);
        assert_eq!(left.faces_count(), 2);
        assert_eq!(right.faces_count(), 1);
    }

    #[test]
    fn remove_unused_drops_orphan_vertices() {
        let mut m = triangle_mesh();
        m.vertices.push(Vector3::new(9.0, 9.0, 9.0)); // unreferenced
        let cleaned = m.remove_unused();
        assert_eq!(cleaned.vertex_count(), 3);
        assert_eq!(cleaned.faces_count(), 1);
    }

    #[test]
    fn validate_flags_out_of_range_index() {
        let mut m = triangle_mesh();
        m.faces.push(Face { a: 0, b: 1, c: 99 });
        assert!(matches!(m.validate(), Err(MeshError::IndexOutOfRange { .. })));
    }
}
