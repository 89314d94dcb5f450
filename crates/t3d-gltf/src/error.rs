use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum GltfError {
    /// Empty mesh or a non-triangle primitive handed to the encoder (§7 `InvalidInput`).
    InvalidInput(String),
}

impl std::error::Error for GltfError {}

impl Display for GltfError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GltfError::InvalidInput(reason) => write!(f, "invalid input for GLB encoding: {reason}"),
        }
    }
}
