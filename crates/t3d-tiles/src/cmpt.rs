//! CMPT composite container (§4.5): a 16-byte header naming how many
//! inner tiles follow, then their bytes concatenated verbatim. Parsing is
//! a simple header-walk — read `magic|version|byteLength`, slice
//! `byteLength` bytes, advance — rather than a real recursive-descent
//! parser, since every known inner format already declares its own total
//! length up front.

use byteorder::{LittleEndian, WriteBytesExt};
use t3d_core::log::Log;

use crate::error::TileError;

pub const MAGIC: &[u8; 4] = b"cmpt";

const KNOWN_INNER_MAGICS: [&[u8; 4]; 4] = [crate::b3dm::MAGIC, crate::i3dm::MAGIC, crate::pnts::MAGIC, MAGIC];

pub fn encode_cmpt(tiles: &[Vec<u8>]) -> Vec<u8> {
    let body_len: usize = tiles.iter().map(|t| t.len()).sum();
    let total_len = 16 + body_len;

    let mut out = Vec::with_capacity(total_len);
    out.extend_from_slice(MAGIC);
    out.write_u32::<LittleEndian>(1).unwrap();
    out.write_u32::<LittleEndian>(total_len as u32).unwrap();
    out.write_u32::<LittleEndian>(tiles.len() as u32).unwrap();
    for tile in tiles {
        out.extend_from_slice(tile);
    }
    out
}

/// Walks a CMPT buffer's inner headers, returning each recognized inner
/// tile's bytes in order. An unrecognized magic is logged and skipped,
/// per §4.5's "log and skip but continue".
pub fn parse_cmpt(bytes: &[u8]) -> Result<Vec<Vec<u8>>, TileError> {
    if bytes.len() < 16 || &bytes[0..4] != MAGIC {
        return Err(TileError::InvalidInput("not a CMPT buffer".into()));
    }
    let declared_len = u32::from_le_bytes(bytes[8..12].try_into().unwrap()) as usize;
    if declared_len > bytes.len() {
        return Err(TileError::Truncated);
    }

    let mut out = Vec::new();
    let mut offset = 16usize;
    while offset + 12 <= declared_len {
        let magic: [u8; 4] = bytes[offset..offset + 4].try_into().unwrap();
        let inner_len = u32::from_le_bytes(bytes[offset + 8..offset + 12].try_into().unwrap()) as usize;
        if inner_len == 0 || offset + inner_len > declared_len {
            return Err(TileError::Truncated);
        }
        if KNOWN_INNER_MAGICS.iter().any(|m| **m == magic) {
            out.push(bytes[offset..offset + inner_len].to_vec());
        } else {
            Log::warn(format!("CMPT: skipping unknown inner tile magic {:?}", String::from_utf8_lossy(&magic)));
        }
        offset += inner_len;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_tile(magic: &[u8; 4], len: usize) -> Vec<u8> {
        let mut t = vec![0u8; len];
        t[0..4].copy_from_slice(magic);
        t[4..8].copy_from_slice(&1u32.to_le_bytes());
        t[8..12].copy_from_slice(&(len as u32).to_le_bytes());
        t
    }

    #[test]
    fn s5_three_tiles_round_trip() {
        let tiles = vec![
            fake_tile(crate::b3dm::MAGIC, 100),
            fake_tile(crate::i3dm::MAGIC, 200),
            fake_tile(crate::pnts::MAGIC, 300),
        ];
        let cmpt = encode_cmpt(&tiles);
        assert_eq!(cmpt.len(), 16 + 600);
        let tiles_length = u32::from_le_bytes(cmpt[12..16].try_into().unwrap());
        assert_eq!(tiles_length, 3);

        let parsed = parse_cmpt(&cmpt).unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0], tiles[0]);
        assert_eq!(parsed[1], tiles[1]);
        assert_eq!(parsed[2], tiles[2]);
    }

    #[test]
    fn unknown_magic_is_skipped_not_fatal() {
        let tiles = vec![fake_tile(b"zzzz", 50), fake_tile(crate::b3dm::MAGIC, 60)];
        let cmpt = encode_cmpt(&tiles);
        let parsed = parse_cmpt(&cmpt).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0], tiles[1]);
    }
}
