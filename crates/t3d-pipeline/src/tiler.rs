//! Recursive tiler (§4.6): turns a root mesh into a bounded tree of
//! sub-meshes. Octree is the default strategy; Grid, KdTree, Adaptive and
//! Recursive share the same node type and differ only in how a node
//! decides whether and how to subdivide.

use t3d_core::{CancellationToken, ProgressIndicator};
use t3d_math::{Axis, Box3};
use t3d_mesh::AnyMesh;

use crate::config::{Strategy, TilerConfig};

#[derive(Clone, Debug, Copy, PartialEq, Eq, Hash)]
pub struct SliceCoords {
    pub level: u32,
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

/// One node of the tiling tree. Internal (non-leaf) nodes carry no mesh
/// of their own — they are pure grouping nodes in the tileset tree;
/// only leaves hold geometry and become tile content.
pub struct TileNode {
    pub coords: SliceCoords,
    pub bounds: Box3,
    pub mesh: Option<AnyMesh>,
    pub children: Vec<TileNode>,
}

impl TileNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Builds the full tiling tree for `mesh` rooted at `bounds`, per the
/// strategy named in `config`. Returns `None` only if the root mesh is
/// already empty.
pub fn build_tree(
    mesh: AnyMesh,
    bounds: Box3,
    config: &TilerConfig,
    cancel: &CancellationToken,
    progress: &ProgressIndicator,
) -> Option<TileNode> {
    if mesh.faces_count() == 0 {
        return None;
    }
    let root = SliceCoords { level: 0, x: 0, y: 0, z: 0 };
    let node = match config.strategy {
        Strategy::Grid => build_grid(mesh, bounds, root, config, cancel, progress),
        Strategy::Octree | Strategy::Recursive => build_octree(mesh, bounds, root, config, cancel, progress, false),
        Strategy::Adaptive => build_octree(mesh, bounds, root, config, cancel, progress, true),
        Strategy::KdTree => build_kdtree(mesh, bounds, root, config, cancel, progress),
    };
    progress.advance();
    Some(node)
}

fn should_stop(faces: usize, level: u32, config: &TilerConfig) -> bool {
    level >= config.max_level || faces <= config.min_triangle_threshold
}

/// Octree strategy (§4.6 "default"). `adaptive` additionally stops once
/// this node's would-be geometric error (`extent/20` heuristic, same
/// formula §4.7 uses for a childless node) already falls under
/// `geometricErrorThreshold` — the §9 resolution for the `Adaptive` value.
fn build_octree(
    mesh: AnyMesh,
    bounds: Box3,
    coords: SliceCoords,
    config: &TilerConfig,
    cancel: &CancellationToken,
    progress: &ProgressIndicator,
    adaptive: bool,
) -> TileNode {
    if cancel.is_cancelled() {
        return TileNode { coords, bounds, mesh: Some(mesh), children: vec![] };
    }
    let extent = bounds.extents();
    let geometric_error_here = extent.x.max(extent.y).max(extent.z) / 20.0;
    let gated = adaptive && geometric_error_here < config.geometric_error_threshold;

    if gated || should_stop(mesh.faces_count(), coords.level, config) {
        return TileNode { coords, bounds, mesh: Some(mesh), children: vec![] };
    }

    let center = bounds.center();
    let octants = split_octants(&mesh, center);
    let mut children = Vec::new();
    for (xi, yi, zi, sub_mesh, sub_bounds) in octants {
        if sub_mesh.faces_count() == 0 {
            continue;
        }
        let child_coords = SliceCoords {
            level: coords.level + 1,
            x: coords.x * 2 + xi,
            y: coords.y * 2 + yi,
            z: coords.z * 2 + zi,
        };
        children.push(build_octree(sub_mesh, sub_bounds, child_coords, config, cancel, progress, adaptive));
        progress.advance();
    }

    if children.is_empty() {
        TileNode { coords, bounds, mesh: Some(mesh), children: vec![] }
    } else {
        TileNode { coords, bounds, mesh: None, children }
    }
}

/// Splits `mesh` into its eight octants about `center`, via three nested
/// axial splits (X, then Y, then Z), pairing each sub-mesh with the AABB
/// of the octant it occupies.
fn split_octants(mesh: &AnyMesh, center: nalgebra::Vector3<f64>) -> Vec<(u32, u32, u32, AnyMesh, Box3)> {
    let mut out = Vec::with_capacity(8);
    let (lx, hx, _) = mesh.split(Axis::X, center.x);
    for (xi, mx) in [(0u32, lx), (1u32, hx)] {
        let (ly, hy, _) = mx.split(Axis::Y, center.y);
        for (yi, my) in [(0u32, ly), (1u32, hy)] {
            let (lz, hz, _) = my.split(Axis::Z, center.z);
            for (zi, mz) in [(0u32, lz), (1u32, hz)] {
                let bounds = mz.bounds();
                if bounds.is_valid() {
                    out.push((xi, yi, zi, mz, bounds));
                }
            }
        }
    }
    out
}

/// Grid strategy (§4.6): at level L, carve the root AABB into `2^L` cells
/// per axis and cut the mesh down to whichever cells actually intersect
/// content, skipping empty or degenerate cells.
fn build_grid(
    mesh: AnyMesh,
    root_bounds: Box3,
    _coords: SliceCoords,
    config: &TilerConfig,
    cancel: &CancellationToken,
    progress: &ProgressIndicator,
) -> TileNode {
    let mut children = Vec::new();
    let divisions = 1u32 << config.max_level;

    for x in 0..divisions {
        if cancel.is_cancelled() {
            break;
        }
        for y in 0..divisions {
            for z in 0..divisions {
                let cell = root_bounds.grid_cell(config.max_level, x, y, z);
                if !cell.is_valid() || cell.diagonal() < 1e-6 {
                    continue;
                }
                if !cell.intersects(&root_bounds) {
                    continue;
                }
                let carved = carve_cell(&mesh, cell);
                if carved.faces_count() == 0 {
                    continue;
                }
                children.push(TileNode {
                    coords: SliceCoords { level: config.max_level, x, y, z },
                    bounds: carved.bounds(),
                    mesh: Some(carved),
                    children: vec![],
                });
                progress.advance();
            }
        }
    }

    TileNode { coords: SliceCoords { level: 0, x: 0, y: 0, z: 0 }, bounds: root_bounds, mesh: None, children }
}

fn carve_cell(mesh: &AnyMesh, cell: Box3) -> AnyMesh {
    let (_, right_x, _) = mesh.split(Axis::X, cell.min.x);
    let (left_x, _, _) = right_x.split(Axis::X, cell.max.x);
    let (_, right_y, _) = left_x.split(Axis::Y, cell.min.y);
    let (left_y, _, _) = right_y.split(Axis::Y, cell.max.y);
    let (_, right_z, _) = left_y.split(Axis::Z, cell.min.z);
    let (left_z, _, _) = right_z.split(Axis::Z, cell.max.z);
    left_z
}

/// KdTree strategy (§9 open-question resolution): alternates the split
/// axis by depth (`axis = level % 3`) and cuts at the bounding box's
/// midpoint on that axis, rather than a true median-of-centroids split —
/// cheap to compute and still balances across all three axes over depth.
fn build_kdtree(
    mesh: AnyMesh,
    bounds: Box3,
    coords: SliceCoords,
    config: &TilerConfig,
    cancel: &CancellationToken,
    progress: &ProgressIndicator,
) -> TileNode {
    if cancel.is_cancelled() || should_stop(mesh.faces_count(), coords.level, config) {
        return TileNode { coords, bounds, mesh: Some(mesh), children: vec![] };
    }

    let axis = match coords.level % 3 {
        0 => Axis::X,
        1 => Axis::Y,
        _ => Axis::Z,
    };
    let center = bounds.center();
    let q = axis.dim(center);
    let (left, right, _) = mesh.split(axis, q);

    let mut children = Vec::new();
    if left.faces_count() > 0 {
        let child_coords = SliceCoords { level: coords.level + 1, x: coords.x * 2, y: coords.y, z: coords.z };
        children.push(build_kdtree(left, left_bounds(bounds, axis, q), child_coords, config, cancel, progress));
    }
    if right.faces_count() > 0 {
        let child_coords = SliceCoords { level: coords.level + 1, x: coords.x * 2 + 1, y: coords.y, z: coords.z };
        children.push(build_kdtree(right, right_bounds(bounds, axis, q), child_coords, config, cancel, progress));
    }
    progress.advance();

    if children.is_empty() {
        TileNode { coords, bounds, mesh: Some(mesh), children: vec![] }
    } else {
        TileNode { coords, bounds, mesh: None, children }
    }
}

fn left_bounds(bounds: Box3, axis: Axis, q: f64) -> Box3 {
    let mut max = bounds.max;
    match axis {
        Axis::X => max.x = q,
        Axis::Y => max.y = q,
        Axis::Z => max.z = q,
    }
    Box3::from_min_max(bounds.min, max)
}

fn right_bounds(bounds: Box3, axis: Axis, q: f64) -> Box3 {
    let mut min = bounds.min;
    match axis {
        Axis::X => min.x = q,
        Axis::Y => min.y = q,
        Axis::Z => min.z = q,
    }
    Box3::from_min_max(min, bounds.max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use t3d_mesh::{Face, Mesh};

    fn big_triangle() -> AnyMesh {
        let mut m = Mesh::new("root");
        m.vertices = vec![
            nalgebra::Vector3::new(0.0, 0.0, 0.0),
            nalgebra::Vector3::new(4.0, 0.0, 0.0),
            nalgebra::Vector3::new(0.0, 4.0, 0.0),
        ];
        m.faces.push(Face { a: 0, b: 1, c: 2 });
        AnyMesh::Plain(m)
    }

    #[test]
    fn octree_never_exceeds_max_level() {
        let mesh = big_triangle();
        let bounds = mesh.bounds();
        let config = TilerConfig { max_level: 2, min_triangle_threshold: 0, ..TilerConfig::default() };
        let cancel = CancellationToken::new();
        let progress = ProgressIndicator::new();
        let tree = build_tree(mesh, bounds, &config, &cancel, &progress).unwrap();

        fn max_depth(node: &TileNode) -> u32 {
            node.children.iter().map(max_depth).max().unwrap_or(node.coords.level)
        }
        assert!(max_depth(&tree) <= 2);
    }

    #[test]
    fn leaves_carry_a_mesh_internal_nodes_do_not() {
        let mesh = big_triangle();
        let bounds = mesh.bounds();
        let config = TilerConfig { max_level: 1, min_triangle_threshold: 0, ..TilerConfig::default() };
        let cancel = CancellationToken::new();
        let progress = ProgressIndicator::new();
        let tree = build_tree(mesh, bounds, &config, &cancel, &progress).unwrap();
        if !tree.is_leaf() {
            assert!(tree.mesh.is_none());
            assert!(tree.children.iter().all(|c| c.mesh.is_some() || !c.is_leaf()));
        }
    }
}
