//! Integration test: assemble a CMPT out of real B3DM/PNTS tiles (not
//! synthetic headers) and parse it back, mirroring the teacher's
//! preference for a `tests/` round-trip over a binary container
//! (`fyrox-resource/tests/registry.rs` does the same for its own format).

use nalgebra::Vector3;
use t3d_tiles::{encode_b3dm, encode_cmpt, encode_pnts, parse_cmpt};

#[test]
fn cmpt_of_real_tiles_round_trips() {
    let glb = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    let b3dm = encode_b3dm(&glb, &["wood".to_string()]).unwrap();
    let pnts = encode_pnts(&[Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0)]).unwrap();

    let cmpt = encode_cmpt(&[b3dm.clone(), pnts.clone()]);
    let parsed = parse_cmpt(&cmpt).unwrap();

    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0], b3dm);
    assert_eq!(parsed[1], pnts);
}
