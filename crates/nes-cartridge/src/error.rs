use thiserror::Error;

/// Failure to load a cartridge image.
#[derive(Debug, Error)]
pub enum CartridgeError {
    #[error("unsupported cartridge mapper {0}")]
    UnsupportedCartridgeMapper(u8),
    #[error("invalid iNES magic (expected NES\\x1A)")]
    InvalidMagic,
    #[error("iNES file too short: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
    #[error("cannot read ROM file: {0}")]
    Io(#[from] std::io::Error),
}
