//! Shared padding rules (§4.5): JSON tables pad with ASCII space to a
//! 4-byte boundary, binary sections pad with zero to an 8-byte boundary.

pub fn pad_json_to_4(bytes: &mut Vec<u8>) {
    while bytes.len() % 4 != 0 {
        bytes.push(b' ');
    }
}

pub fn pad_binary_to_8(bytes: &mut Vec<u8>) {
    while bytes.len() % 8 != 0 {
        bytes.push(0);
    }
}
