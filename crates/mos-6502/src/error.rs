//! CPU execution errors.

use thiserror::Error;

/// Error raised while executing an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CpuError {
    /// The opcode byte has no entry in the decode table (an undocumented
    /// opcode). PC is left on the offending byte.
    #[error("unsupported opcode ${opcode:02X} at ${address:04X}")]
    UnsupportedOpcode { address: u16, opcode: u8 },
}
