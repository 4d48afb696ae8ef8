//! PPU errors.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PpuError {
    /// Read of a write-only register or write of a read-only one.
    #[error("invalid PPU register {} at ${address:04X}", access_kind(.write))]
    InvalidRegisterAccess { address: u16, write: bool },
    #[error("palette index {0:#04X} out of range (0-63)")]
    PaletteIndexOutOfRange(u8),
    #[error("pattern address ${0:04X} past the last tile at $1FF0")]
    InvalidPatternAddress(u16),
    #[error("nametable address ${0:04X} outside $2000-$2FBF")]
    InvalidNametableAddress(u16),
    #[error("palette {0} out of range (0-7)")]
    InvalidPalette(u8),
}

fn access_kind(write: &bool) -> &'static str {
    if *write { "write" } else { "read" }
}
