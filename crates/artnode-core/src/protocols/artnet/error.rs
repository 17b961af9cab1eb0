use thiserror::Error;

/// Reasons a datagram is dropped by the Art-Net codec.
///
/// None of these are fatal: the node counts the drop and moves on to the next
/// datagram.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArtNetError {
    #[error("empty datagram")]
    Empty,
    #[error("datagram too large: {actual} bytes exceeds {max}")]
    Oversized { max: usize, actual: usize },
    #[error("payload too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
    #[error("invalid Art-Net identifier")]
    InvalidId,
    #[error("unsupported opcode: {opcode:#06x}")]
    UnsupportedOpcode { opcode: u16 },
}

impl ArtNetError {
    /// True for framing failures (identifier, size, truncation).
    pub fn is_malformed(&self) -> bool {
        !matches!(self, ArtNetError::UnsupportedOpcode { .. })
    }
}
