//! MOS 6502 CPU core.
//!
//! Instruction-stepped: [`Mos6502::step`] runs one whole instruction
//! (or interrupt entry) against an [`emu_core::Bus`] and returns the cycles
//! it took. Only the 151 documented opcodes are implemented; anything else
//! fails with [`CpuError::UnsupportedOpcode`].

mod addressing;
mod cpu;
mod error;
pub mod flags;
mod opcodes;
mod registers;
pub mod trace;

pub use addressing::Operand;
pub use cpu::{IRQ_VECTOR, Mos6502, NMI_VECTOR, RESET_VECTOR};
pub use error::CpuError;
pub use flags::Status;
pub use opcodes::{AddressingMode, OPCODES, Opcode, Operation, decode};
pub use registers::Registers;
