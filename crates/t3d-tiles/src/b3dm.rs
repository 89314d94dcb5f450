//! B3DM container encoding (§4.5): a 28-byte header, a feature table
//! naming the batch length, a batch table naming each material, then the
//! GLB payload verbatim.

use byteorder::{LittleEndian, WriteBytesExt};
use serde_json::json;

use crate::error::TileError;
use crate::padding::{pad_binary_to_8, pad_json_to_4};

pub const MAGIC: &[u8; 4] = b"b3dm";

/// Wraps `glb` as a B3DM tile. `material_names` becomes the batch table;
/// an empty slice still yields `BATCH_LENGTH: 1` per §4.5.
pub fn encode_b3dm(glb: &[u8], material_names: &[String]) -> Result<Vec<u8>, TileError> {
    if glb.is_empty() {
        return Err(TileError::InvalidInput("empty GLB payload".into()));
    }
    let batch_length = material_names.len().max(1);

    let mut feature_json = serde_json::to_vec(&json!({ "BATCH_LENGTH": batch_length })).unwrap();
    pad_json_to_4(&mut feature_json);

    let names: Vec<String> = if material_names.is_empty() {
        vec!["default".to_string()]
    } else {
        material_names.to_vec()
    };
    let ids: Vec<u32> = (0..names.len() as u32).collect();
    let mut batch_json =
        serde_json::to_vec(&json!({ "MaterialID": ids, "MaterialName": names })).unwrap();
    pad_json_to_4(&mut batch_json);

    let mut feature_bin: Vec<u8> = Vec::new();
    pad_binary_to_8(&mut feature_bin);
    let mut batch_bin: Vec<u8> = Vec::new();
    pad_binary_to_8(&mut batch_bin);

    let total_len = 28 + feature_json.len() + feature_bin.len() + batch_json.len() + batch_bin.len() + glb.len();

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
    out.extend_from_slice(glb);

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_fields_match_s4() {
        let glb = vec![0u8; 40];
        let names = vec!["wood".to_string(), "metal".to_string()];
        let tile = encode_b3dm(&glb, &names).unwrap();
        assert_eq!(&tile[0..4], MAGIC);
        assert_eq!(&tile[4..8], &1u32.to_le_bytes());
        let declared_len = u32::from_le_bytes(tile[8..12].try_into().unwrap());
        assert_eq!(declared_len as usize, tile.len());

        let feature_json_len = u32::from_le_bytes(tile[12..16].try_into().unwrap());
        let feature_bin_len = u32::from_le_bytes(tile[16..20].try_into().unwrap());
        let batch_json_len = u32::from_le_bytes(tile[20..24].try_into().unwrap());
        let batch_bin_len = u32::from_le_bytes(tile[24..28].try_into().unwrap());
        let sum = 28 + feature_json_len + feature_bin_len + batch_json_len + batch_bin_len;
        assert_eq!(sum as usize + glb.len(), tile.len());
    }

    #[test]
    fn empty_glb_is_rejected() {
        assert!(matches!(encode_b3dm(&[], &[]), Err(TileError::InvalidInput(_))));
    }
}
