//! 6502 addressing modes and stack helpers.
//!
//! Each mode consumes its operand bytes from PC and yields an [`Operand`].
//! Indexed modes also report whether indexing crossed a page, which read
//! instructions turn into an extra cycle.

use emu_core::Bus;

use crate::opcodes::AddressingMode;
use crate::Mos6502;

/// Effective operand of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// No operand.
    Implied,
    /// The accumulator.
    Accumulator,
    /// A memory address (for immediate mode, the address of the operand byte).
    Address(u16),
}

impl Mos6502 {
    /// Fetch the byte at PC and increment PC.
    pub(crate) fn fetch(&mut self, bus: &mut impl Bus) -> u8 {
        let value = bus.read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    /// Fetch a little-endian word at PC.
    pub(crate) fn fetch_word(&mut self, bus: &mut impl Bus) -> u16 {
        let low = self.fetch(bus);
        let high = self.fetch(bus);
        u16::from_le_bytes([low, high])
    }

    /// Read a little-endian word.
    pub(crate) fn read_word(bus: &mut impl Bus, addr: u16) -> u16 {
        let low = bus.read(addr);
        let high = bus.read(addr.wrapping_add(1));
        u16::from_le_bytes([low, high])
    }

    /// Read a pointer stored in page zero. The high byte wraps to $00.
    fn read_zero_page_word(bus: &mut impl Bus, ptr: u8) -> u16 {
        let low = bus.read(u16::from(ptr));
        let high = bus.read(u16::from(ptr.wrapping_add(1)));
        u16::from_le_bytes([low, high])
    }

    /// Read a word for indirect JMP. At $xxFF the high byte comes from $xx00.
    fn read_word_page_bug(bus: &mut impl Bus, addr: u16) -> u16 {
        let low = bus.read(addr);
        let high_addr = (addr & 0xFF00) | (addr.wrapping_add(1) & 0x00FF);
        let high = bus.read(high_addr);
        u16::from_le_bytes([low, high])
    }

    pub(crate) fn push(&mut self, bus: &mut impl Bus, value: u8) {
        let addr = self.regs.push();
        bus.write(addr, value);
    }

    pub(crate) fn pull(&mut self, bus: &mut impl Bus) -> u8 {
        let addr = self.regs.pull();
        bus.read(addr)
    }

    /// Push a word, high byte first.
    pub(crate) fn push_word(&mut self, bus: &mut impl Bus, value: u16) {
        let [low, high] = value.to_le_bytes();
        self.push(bus, high);
        self.push(bus, low);
    }

    /// Pull a word, low byte first.
    pub(crate) fn pull_word(&mut self, bus: &mut impl Bus) -> u16 {
        let low = self.pull(bus);
        let high = self.pull(bus);
        u16::from_le_bytes([low, high])
    }

    /// Resolve an addressing mode, consuming its operand bytes.
    ///
    /// Returns the operand and whether an index or branch crossed a page.
    pub(crate) fn resolve(&mut self, bus: &mut impl Bus, mode: AddressingMode) -> (Operand, bool) {
        match mode {
            AddressingMode::Implicit => (Operand::Implied, false),
            AddressingMode::Accumulator => (Operand::Accumulator, false),
            AddressingMode::Immediate => {
                let addr = self.regs.pc;
                self.regs.pc = self.regs.pc.wrapping_add(1);
                (Operand::Address(addr), false)
            }
            AddressingMode::ZeroPage => {
                let addr = self.fetch(bus);
                (Operand::Address(u16::from(addr)), false)
            }
            AddressingMode::ZeroPageX => {
                let addr = self.fetch(bus).wrapping_add(self.regs.x);
                (Operand::Address(u16::from(addr)), false)
            }
            AddressingMode::ZeroPageY => {
                let addr = self.fetch(bus).wrapping_add(self.regs.y);
                (Operand::Address(u16::from(addr)), false)
            }
            AddressingMode::Relative => {
                let offset = self.fetch(bus) as i8;
                let target = self.regs.pc.wrapping_add(offset as u16);
                let crossed = (self.regs.pc & 0xFF00) != (target & 0xFF00);
                (Operand::Address(target), crossed)
            }
            AddressingMode::Absolute => (Operand::Address(self.fetch_word(bus)), false),
            AddressingMode::AbsoluteX => {
                let base = self.fetch_word(bus);
                Self::indexed(base, self.regs.x)
            }
            AddressingMode::AbsoluteY => {
                let base = self.fetch_word(bus);
                Self::indexed(base, self.regs.y)
            }
            AddressingMode::Indirect => {
                let ptr = self.fetch_word(bus);
                (Operand::Address(Self::read_word_page_bug(bus, ptr)), false)
            }
            AddressingMode::IndexedIndirect => {
                let ptr = self.fetch(bus).wrapping_add(self.regs.x);
                (Operand::Address(Self::read_zero_page_word(bus, ptr)), false)
            }
            AddressingMode::IndirectIndexed => {
                let ptr = self.fetch(bus);
                let base = Self::read_zero_page_word(bus, ptr);
                Self::indexed(base, self.regs.y)
            }
        }
    }

    fn indexed(base: u16, index: u8) -> (Operand, bool) {
        let addr = base.wrapping_add(u16::from(index));
        let crossed = (base & 0xFF00) != (addr & 0xFF00);
        (Operand::Address(addr), crossed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emu_core::SimpleBus;

    fn cpu_at(pc: u16) -> Mos6502 {
        let mut cpu = Mos6502::new();
        cpu.regs.pc = pc;
        cpu
    }

    #[test]
    fn zero_page_x_wraps_in_page_zero() {
        let mut bus = SimpleBus::new();
        bus.load(0x0200, &[0xF0]);
        let mut cpu = cpu_at(0x0200);
        cpu.regs.x = 0x20;
        let (operand, crossed) = cpu.resolve(&mut bus, AddressingMode::ZeroPageX);
        assert_eq!(operand, Operand::Address(0x0010));
        assert!(!crossed);
        assert_eq!(cpu.regs.pc, 0x0201);
    }

    #[test]
    fn absolute_y_reports_page_cross() {
        let mut bus = SimpleBus::new();
        bus.load(0x0200, &[0xF0, 0x12]);
        let mut cpu = cpu_at(0x0200);
        cpu.regs.y = 0x20;
        let (operand, crossed) = cpu.resolve(&mut bus, AddressingMode::AbsoluteY);
        assert_eq!(operand, Operand::Address(0x1310));
        assert!(crossed);
        assert_eq!(cpu.regs.pc, 0x0202);
    }

    #[test]
    fn indirect_jmp_pointer_wraps_within_page() {
        let mut bus = SimpleBus::new();
        bus.load(0x0200, &[0xFF, 0x30]);
        bus.load(0x30FF, &[0x80]);
        bus.load(0x3000, &[0x50]);
        bus.load(0x3100, &[0x40]);
        let mut cpu = cpu_at(0x0200);
        let (operand, _) = cpu.resolve(&mut bus, AddressingMode::Indirect);
        assert_eq!(operand, Operand::Address(0x5080));
    }

    #[test]
    fn indexed_indirect_pointer_wraps_in_page_zero() {
        let mut bus = SimpleBus::new();
        bus.load(0x0200, &[0xFE]);
        bus.load(0x00FF, &[0x34]);
        bus.load(0x0000, &[0x12]);
        let mut cpu = cpu_at(0x0200);
        cpu.regs.x = 0x01;
        let (operand, _) = cpu.resolve(&mut bus, AddressingMode::IndexedIndirect);
        assert_eq!(operand, Operand::Address(0x1234));
    }

    #[test]
    fn relative_target_is_from_next_instruction() {
        let mut bus = SimpleBus::new();
        bus.load(0x02F0, &[0x20]);
        let mut cpu = cpu_at(0x02F0);
        let (operand, crossed) = cpu.resolve(&mut bus, AddressingMode::Relative);
        assert_eq!(operand, Operand::Address(0x0311));
        assert!(crossed);

        bus.load(0x0280, &[0xFE]);
        let mut cpu = cpu_at(0x0280);
        let (operand, crossed) = cpu.resolve(&mut bus, AddressingMode::Relative);
        assert_eq!(operand, Operand::Address(0x027F));
        assert!(!crossed);
    }
}
