//! 6502 CPU register set.

use crate::Status;

/// 6502 CPU register set.
///
/// - A: 8-bit accumulator
/// - X, Y: 8-bit index registers
/// - SP: 8-bit stack pointer (stack at $0100-$01FF)
/// - PC: 16-bit program counter
/// - P: processor status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    /// Accumulator.
    pub a: u8,
    /// X index register.
    pub x: u8,
    /// Y index register.
    pub y: u8,
    /// Stack pointer (next free slot in page $01).
    pub sp: u8,
    /// Program counter.
    pub pc: u16,
    /// Processor status flags.
    pub p: Status,
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    /// Registers in post-reset state: SP=$FD, only I set (P reads $24).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFD,
            pc: 0,
            p: Status {
                carry: false,
                zero: false,
                interrupt_disable: true,
                decimal: false,
                brk: false,
                overflow: false,
                negative: false,
            },
        }
    }

    /// Decrement SP after a push, returning the address written.
    ///
    /// SP wraps within page $01; there is no carry into the high byte.
    pub fn push(&mut self) -> u16 {
        let addr = self.stack_addr();
        self.sp = self.sp.wrapping_sub(1);
        addr
    }

    /// Increment SP for a pull, returning the address to read.
    pub fn pull(&mut self) -> u16 {
        self.sp = self.sp.wrapping_add(1);
        self.stack_addr()
    }

    /// Current stack address without modifying SP.
    #[must_use]
    pub const fn stack_addr(&self) -> u16 {
        0x0100 | (self.sp as u16)
    }
}
