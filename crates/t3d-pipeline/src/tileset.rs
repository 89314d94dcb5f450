//! tileset.json tree assembly (§4.7). Field order is emitted explicitly
//! via `serde_json::Map` insertion order (the workspace enables
//! `serde_json`'s `preserve_order` feature for exactly this) rather than
//! relying on alphabetical key sort.

use serde_json::{Map, Value};
use t3d_math::{ecef, Box3};

use crate::config::{GeoOrigin, TilerConfig};
use crate::tiler::TileNode;

/// `boundingVolume.box`: center then half-extents per axis, each clamped
/// to a minimum of 0.01 to avoid a degenerate zero (§4.7, §8 invariant 6).
fn bounding_volume_box(bounds: &Box3) -> Vec<f64> {
    let c = bounds.center();
    let r = bounds.half_extents();
    let (rx, ry, rz) = (r.x.max(0.01), r.y.max(0.01), r.z.max(0.01));
    vec![c.x, c.y, c.z, rx, 0.0, 0.0, 0.0, ry, 0.0, 0.0, 0.0, rz]
}

/// Recursively emits a node and returns its geometric error, computed
/// post-order per §4.7: leaves are `0.0`; an internal node takes `2x` the
/// first non-zero child error, or `max(extent)/20` if every child is
/// zero.
fn node_to_json(node: &TileNode, content_uri: &dyn Fn(&TileNode) -> Option<String>) -> (Value, f64) {
    let mut map = Map::new();
    map.insert("boundingVolume".into(), serde_json::json!({ "box": bounding_volume_box(&node.bounds) }));

    let geometric_error = if node.children.is_empty() {
        if let Some(uri) = content_uri(node) {
            map.insert("content".into(), serde_json::json!({ "uri": uri }));
        }
        0.0
    } else {
        let mut children_json = Vec::with_capacity(node.children.len());
        let mut child_errors = Vec::with_capacity(node.children.len());
        for child in &node.children {
            let (cj, ce) = node_to_json(child, content_uri);
            children_json.push(cj);
            child_errors.push(ce);
        }
        map.insert("children".into(), Value::Array(children_json));

        if let Some(uri) = content_uri(node) {
            map.insert("content".into(), serde_json::json!({ "uri": uri }));
        }

        match child_errors.iter().find(|&&e| e > 0.0) {
            Some(&nonzero) => 2.0 * nonzero,
            None => {
                let extent = node.bounds.extents();
                extent.x.max(extent.y).max(extent.z) / 20.0
            }
        }
    };

    map.insert("geometricError".into(), serde_json::json!(geometric_error));
    (Value::Object(map), geometric_error)
}

fn transform_matrix(origin: &GeoOrigin) -> Vec<f64> {
    let lat = origin.lat_deg.to_radians();
    let lon = origin.lon_deg.to_radians();
    let matrix = ecef::enu_to_ecef_matrix(lat, lon, origin.height_m);
    ecef::matrix_to_column_major_array(&matrix).to_vec()
}

/// Assembles the full `tileset.json` document (§4.7, §6 "Tileset JSON").
/// `content_uri` maps a leaf node to its relative tile URI; internal
/// nodes are contentless, per the tiler's own grouping-node convention.
pub fn build_tileset(root: &TileNode, config: &TilerConfig, content_uri: impl Fn(&TileNode) -> Option<String>) -> Value {
    let (mut root_json, root_error) = node_to_json(root, &content_uri);
    let clamped_root_error = root_error.min(config.root_geometric_error_clamp);

    if let Value::Object(map) = &mut root_json {
        // Reinsert geometricError with the clamp applied, then refine,
        // then transform, so the root node keeps `boundingVolume`,
        // `children`, `content`, `geometricError`, `transform` order.
        map.insert("geometricError".into(), serde_json::json!(clamped_root_error));
        map.insert("refine".into(), serde_json::json!("ADD"));
        if let Some(origin) = &config.origin {
            map.insert("transform".into(), serde_json::json!(transform_matrix(origin)));
        }
    }

    serde_json::json!({
        "asset": { "version": "1.0", "gltfUpAxis": "Z" },
        "geometricError": clamped_root_error,
        "root": root_json,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiler::SliceCoords;
    use t3d_math::Box3;
    use t3d_mesh::{Face, Mesh};

    fn leaf(level: u32, x: u32, y: u32, z: u32) -> TileNode {
        let mut m = Mesh::new("leaf");
        m.vertices = vec![
            nalgebra::Vector3::new(0.0, 0.0, 0.0),
            nalgebra::Vector3::new(1.0, 0.0, 0.0),
            nalgebra::Vector3::new(0.0, 1.0, 0.0),
        ];
        m.faces.push(Face { a: 0, b: 1, c: 2 });
        TileNode {
            coords: SliceCoords { level, x, y, z },
            bounds: Box3::from_points(&m.vertices),
            mesh: Some(t3d_mesh::AnyMesh::Plain(m)),
            children: vec![],
        }
    }

    #[test]
    fn bounding_volume_box_has_12_entries_and_min_half_extent() {
        let bounds = Box3::from_min_max(nalgebra::Vector3::new(0.0, 0.0, 0.0), nalgebra::Vector3::new(0.0, 0.0, 0.0));
        let arr = bounding_volume_box(&bounds);
        assert_eq!(arr.len(), 12);
        assert!(arr[3] >= 0.01 && arr[7] >= 0.01 && arr[11] >= 0.01);
    }

    #[test]
    fn leaf_has_zero_geometric_error_internal_node_nonzero() {
        let root = TileNode {
            coords: SliceCoords { level: 0, x: 0, y: 0, z: 0 },
            bounds: Box3::from_min_max(nalgebra::Vector3::new(0.0, 0.0, 0.0), nalgebra::Vector3::new(2.0, 2.0, 2.0)),
            mesh: None,
            children: vec![leaf(1, 0, 0, 0), leaf(1, 1, 0, 0)],
        };
        let config = TilerConfig::default();
        let doc = build_tileset(&root, &config, |_| None);
        let root_err = doc["root"]["geometricError"].as_f64().unwrap();
        assert!(root_err > 0.0);
        let leaf_err = doc["root"]["children"][0]["geometricError"].as_f64().unwrap();
        assert_eq!(leaf_err, 0.0);
    }

    #[test]
    fn root_error_is_clamped() {
        let root = TileNode {
            coords: SliceCoords { level: 0, x: 0, y: 0, z: 0 },
            bounds: Box3::from_min_max(nalgebra::Vector3::new(0.0, 0.0, 0.0), nalgebra::Vector3::new(1.0e6, 1.0, 1.0)),
            mesh: None,
            children: vec![leaf(1, 0, 0, 0), leaf(1, 1, 0, 0)],
        };
        let config = TilerConfig { root_geometric_error_clamp: 1000.0, ..TilerConfig::default() };
        let doc = build_tileset(&root, &config, |_| None);
        assert_eq!(doc["root"]["geometricError"].as_f64().unwrap(), 1000.0);
        assert_eq!(doc["geometricError"].as_f64().unwrap(), 1000.0);
    }
}
