//! I3DM container encoding (§4.5): a 32-byte header (B3DM's plus a
//! trailing `gltfFormat`), a feature table declaring instance positions,
//! then the embedded GLB.

use byteorder::{LittleEndian, WriteBytesExt};
use nalgebra::Vector3;
use serde_json::json;

use crate::error::TileError;
use crate::padding::{pad_binary_to_8, pad_json_to_4};

pub const MAGIC: &[u8; 4] = b"i3dm";

/// `gltfFormat = 1` means the GLB is embedded inline rather than referenced by URI.
const GLTF_FORMAT_EMBEDDED: u32 = 1;

pub fn encode_i3dm(glb: &[u8], instance_positions: &[Vector3<f64>]) -> Result<Vec<u8>, TileError> {
    if glb.is_empty() {
        return Err(TileError::InvalidInput("empty GLB payload".into()));
    }
    if instance_positions.is_empty() {
        return Err(TileError::InvalidInput("no instance positions".into()));
    }

    let mut feature_json = serde_json::to_vec(&json!({
        "INSTANCES_LENGTH": instance_positions.len(),
        "POSITION": { "byteOffset": 0 },
    }))
    .unwrap();
    pad_json_to_4(&mut feature_json);

    let mut feature_bin = Vec::with_capacity(instance_positions.len() * 12);
    for p in instance_positions {
        feature_bin.write_f32::<LittleEndian>(p.x as f32).unwrap();
        feature_bin.write_f32::<LittleEndian>(p.y as f32).unwrap();
        feature_bin.write_f32::<LittleEndian>(p.z as f32).unwrap();
    }
    pad_binary_to_8(&mut feature_bin);

    let mut batch_json: Vec<u8> = Vec::new();
    pad_json_to_4(&mut batch_json);
    let mut batch_bin: Vec<u8> = Vec::new();
    pad_binary_to_8(&mut batch_bin);

    let total_len =
        32 + feature_json.len() + feature_bin.len() + batch_json.len() + batch_bin.len() + glb.len();

    let mut out = Vec::with_capacity(total_len);
    out.extend_from_slice(MAGIC);
    out.write_u32::<LittleEndian>(1).unwrap();
    out.write_u32::<LittleEndian>(total_len as u32).unwrap();
    out.write_u32::<LittleEndian>(feature_json.len() as u32).unwrap();
    out.write_u32::<LittleEndian>(feature_bin.len() as u32).unwrap();
    out.write_u32::<LittleEndian>(batch_json.len() as u32).unwrap();
    out.write_u32::<LittleEndian>(batch_bin.len() as u32).unwrap();
    out.write_u32::<LittleEndian>(GLTF_FORMAT_EMBEDDED).unwrap();
    out.extend_from_slice(&feature_json);
    out.extend_from_slice(&feature_bin);
    out.extend_from_slice(&batch_json);
    out.extend_from_slice(&batch_bin);
    out.extend_from_slice(glb);

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_32_bytes_with_embedded_format() {
        let glb = vec![0u8; 10];
        let positions = vec![Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0)];
        let tile = encode_i3dm(&glb, &positions).unwrap();
        assert_eq!(&tile[0..4], MAGIC);
        let gltf_format = u32::from_le_bytes(tile[28..32].try_into().unwrap());
        assert_eq!(gltf_format, GLTF_FORMAT_EMBEDDED);
    }
}
