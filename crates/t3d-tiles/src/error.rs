use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum TileError {
    /// Empty mesh handed to a point-cloud or mesh-backed tile encoder (§7 `InvalidInput`).
    InvalidInput(String),
    /// A CMPT buffer is truncated mid-header or mid-body.
    Truncated,
}

impl std::error::Error for TileError {}

impl Display for TileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TileError::InvalidInput(reason) => write!(f, "invalid tile input: {reason}"),
            TileError::Truncated => write!(f, "tile buffer truncated before header or body end"),
        }
    }
}
