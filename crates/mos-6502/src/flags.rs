//! 6502 processor status register (P).
//!
//! Bit layout, high to low: `N V 1 B D I Z C`. Bit 5 has no storage and
//! always reads as 1. B only has meaning in a copy of P pushed to the stack.

/// Carry.
pub const C: u8 = 0x01;
/// Zero.
pub const Z: u8 = 0x02;
/// Interrupt disable.
pub const I: u8 = 0x04;
/// Decimal mode.
pub const D: u8 = 0x08;
/// Break (pushed copies only).
pub const B: u8 = 0x10;
/// Unused, always 1.
pub const U: u8 = 0x20;
/// Overflow.
pub const V: u8 = 0x40;
/// Negative.
pub const N: u8 = 0x80;

/// Processor status register, one named field per flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Status {
    pub carry: bool,
    pub zero: bool,
    pub interrupt_disable: bool,
    pub decimal: bool,
    pub brk: bool,
    pub overflow: bool,
    pub negative: bool,
}

impl Status {
    /// Unpack a status byte. Bit 5 is ignored.
    #[must_use]
    pub const fn from_byte(value: u8) -> Self {
        Self {
            carry: value & C != 0,
            zero: value & Z != 0,
            interrupt_disable: value & I != 0,
            decimal: value & D != 0,
            brk: value & B != 0,
            overflow: value & V != 0,
            negative: value & N != 0,
        }
    }

    /// Pack into a status byte, with bit 5 set.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        let mut value = U;
        if self.carry {
            value |= C;
        }
        if self.zero {
            value |= Z;
        }
        if self.interrupt_disable {
            value |= I;
        }
        if self.decimal {
            value |= D;
        }
        if self.brk {
            value |= B;
        }
        if self.overflow {
            value |= V;
        }
        if self.negative {
            value |= N;
        }
        value
    }

    /// Byte pushed by BRK and PHP: B set.
    #[must_use]
    pub const fn to_byte_brk(self) -> u8 {
        self.to_byte() | B
    }

    /// Byte pushed by IRQ and NMI: B clear.
    #[must_use]
    pub const fn to_byte_irq(self) -> u8 {
        self.to_byte() & !B
    }

    /// Status pulled by PLP and RTI. B does not exist in the live register.
    #[must_use]
    pub const fn from_stack(value: u8) -> Self {
        Self::from_byte(value & !B)
    }

    /// Update N and Z from a result.
    pub fn update_nz(&mut self, value: u8) {
        self.negative = value & 0x80 != 0;
        self.zero = value == 0;
    }
}
