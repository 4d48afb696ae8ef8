//! Instruction-stepped 6502 core.

use emu_core::{Bus, Cpu, Observable, Value};
use log::{debug, trace};

use crate::addressing::Operand;
use crate::opcodes::{self, Operation};
use crate::{CpuError, Registers, Status};

/// NMI vector.
pub const NMI_VECTOR: u16 = 0xFFFA;
/// Reset vector.
pub const RESET_VECTOR: u16 = 0xFFFC;
/// IRQ/BRK vector.
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// Cycles taken by reset and by interrupt entry.
const INTERRUPT_CYCLES: u32 = 7;

/// MOS 6502 CPU.
///
/// `step` executes a whole instruction and reports its cycle cost. The NES
/// variant (2A03) keeps the D flag but never does BCD arithmetic.
#[derive(Debug, Clone)]
pub struct Mos6502 {
    /// Register file.
    pub regs: Registers,
    /// Whether ADC/SBC honour the D flag.
    decimal_enabled: bool,
    nmi_pending: bool,
    irq_pending: bool,
    total_cycles: u64,
}

impl Default for Mos6502 {
    fn default() -> Self {
        Self::new()
    }
}

impl Mos6502 {
    /// NMOS 6502 with decimal mode.
    #[must_use]
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            decimal_enabled: true,
            nmi_pending: false,
            irq_pending: false,
            total_cycles: 0,
        }
    }

    /// Ricoh 2A03: a 6502 with the BCD adder disconnected.
    #[must_use]
    pub fn new_2a03() -> Self {
        Self {
            decimal_enabled: false,
            ..Self::new()
        }
    }

    #[must_use]
    pub fn pc(&self) -> u16 {
        self.regs.pc
    }

    #[must_use]
    pub fn a(&self) -> u8 {
        self.regs.a
    }

    #[must_use]
    pub fn x(&self) -> u8 {
        self.regs.x
    }

    #[must_use]
    pub fn y(&self) -> u8 {
        self.regs.y
    }

    #[must_use]
    pub fn sp(&self) -> u8 {
        self.regs.sp
    }

    /// Status register as a byte (bit 5 set).
    #[must_use]
    pub fn status(&self) -> u8 {
        self.regs.p.to_byte()
    }

    /// Cycles executed since construction.
    #[must_use]
    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    /// Whether an NMI is latched and will be serviced by the next step.
    #[must_use]
    pub fn nmi_pending(&self) -> bool {
        self.nmi_pending
    }

    /// Whether ADC/SBC honour the D flag.
    #[must_use]
    pub fn decimal_enabled(&self) -> bool {
        self.decimal_enabled
    }

    /// Return to power-up register state without touching the bus.
    pub fn clear(&mut self) {
        self.regs = Registers::new();
        self.nmi_pending = false;
        self.irq_pending = false;
        self.total_cycles = 0;
    }

    /// Push PC and P, set I and jump through `vector`.
    fn enter_interrupt(&mut self, bus: &mut impl Bus, vector: u16) -> u32 {
        self.push_word(bus, self.regs.pc);
        self.push(bus, self.regs.p.to_byte_irq());
        self.regs.p.interrupt_disable = true;
        self.regs.pc = Self::read_word(bus, vector);
        INTERRUPT_CYCLES
    }

    fn load(&mut self, bus: &mut impl Bus, operand: Operand) -> u8 {
        match operand {
            Operand::Address(addr) => bus.read(addr),
            Operand::Accumulator => self.regs.a,
            Operand::Implied => 0,
        }
    }

    fn store(&mut self, bus: &mut impl Bus, operand: Operand, value: u8) {
        match operand {
            Operand::Address(addr) => bus.write(addr, value),
            Operand::Accumulator => self.regs.a = value,
            Operand::Implied => {}
        }
    }

    /// Read-modify-write on memory or the accumulator.
    fn modify(
        &mut self,
        bus: &mut impl Bus,
        operand: Operand,
        f: impl FnOnce(&mut Self, u8) -> u8,
    ) {
        let value = self.load(bus, operand);
        let result = f(self, value);
        self.store(bus, operand, result);
    }

    /// Take a branch if `condition` holds. Returns the extra cycles.
    fn branch(&mut self, operand: Operand, page_crossed: bool, condition: bool) -> u32 {
        match operand {
            Operand::Address(target) if condition => {
                self.regs.pc = target;
                if page_crossed { 2 } else { 1 }
            }
            _ => 0,
        }
    }

    /// Execute a decoded operation. Returns cycles beyond the table's base
    /// count and page penalty (only branches add any).
    fn execute(
        &mut self,
        bus: &mut impl Bus,
        operation: Operation,
        operand: Operand,
        page_crossed: bool,
    ) -> u32 {
        match operation {
            // Loads and stores
            Operation::Lda => {
                self.regs.a = self.load(bus, operand);
                self.regs.p.update_nz(self.regs.a);
            }
            Operation::Ldx => {
                self.regs.x = self.load(bus, operand);
                self.regs.p.update_nz(self.regs.x);
            }
            Operation::Ldy => {
                self.regs.y = self.load(bus, operand);
                self.regs.p.update_nz(self.regs.y);
            }
            Operation::Sta => self.store(bus, operand, self.regs.a),
            Operation::Stx => self.store(bus, operand, self.regs.x),
            Operation::Sty => self.store(bus, operand, self.regs.y),

            // Transfers
            Operation::Tax => {
                self.regs.x = self.regs.a;
                self.regs.p.update_nz(self.regs.x);
            }
            Operation::Tay => {
                self.regs.y = self.regs.a;
                self.regs.p.update_nz(self.regs.y);
            }
            Operation::Txa => {
                self.regs.a = self.regs.x;
                self.regs.p.update_nz(self.regs.a);
            }
            Operation::Tya => {
                self.regs.a = self.regs.y;
                self.regs.p.update_nz(self.regs.a);
            }
            Operation::Tsx => {
                self.regs.x = self.regs.sp;
                self.regs.p.update_nz(self.regs.x);
            }
            Operation::Txs => self.regs.sp = self.regs.x,

            // Arithmetic and logic
            Operation::Adc => {
                let value = self.load(bus, operand);
                self.adc(value);
            }
            Operation::Sbc => {
                let value = self.load(bus, operand);
                self.sbc(value);
            }
            Operation::And => {
                self.regs.a &= self.load(bus, operand);
                self.regs.p.update_nz(self.regs.a);
            }
            Operation::Ora => {
                self.regs.a |= self.load(bus, operand);
                self.regs.p.update_nz(self.regs.a);
            }
            Operation::Eor => {
                self.regs.a ^= self.load(bus, operand);
                self.regs.p.update_nz(self.regs.a);
            }
            Operation::Bit => {
                let value = self.load(bus, operand);
                self.regs.p.zero = self.regs.a & value == 0;
                self.regs.p.negative = value & 0x80 != 0;
                self.regs.p.overflow = value & 0x40 != 0;
            }
            Operation::Cmp => {
                let value = self.load(bus, operand);
                self.compare(self.regs.a, value);
            }
            Operation::Cpx => {
                let value = self.load(bus, operand);
                self.compare(self.regs.x, value);
            }
            Operation::Cpy => {
                let value = self.load(bus, operand);
                self.compare(self.regs.y, value);
            }

            // Shifts, rotates, increments
            Operation::Asl => self.modify(bus, operand, Self::asl),
            Operation::Lsr => self.modify(bus, operand, Self::lsr),
            Operation::Rol => self.modify(bus, operand, Self::rol),
            Operation::Ror => self.modify(bus, operand, Self::ror),
            Operation::Inc => self.modify(bus, operand, |cpu, value| {
                let result = value.wrapping_add(1);
                cpu.regs.p.update_nz(result);
                result
            }),
            Operation::Dec => self.modify(bus, operand, |cpu, value| {
                let result = value.wrapping_sub(1);
                cpu.regs.p.update_nz(result);
                result
            }),
            Operation::Inx => {
                self.regs.x = self.regs.x.wrapping_add(1);
                self.regs.p.update_nz(self.regs.x);
            }
            Operation::Iny => {
                self.regs.y = self.regs.y.wrapping_add(1);
                self.regs.p.update_nz(self.regs.y);
            }
            Operation::Dex => {
                self.regs.x = self.regs.x.wrapping_sub(1);
                self.regs.p.update_nz(self.regs.x);
            }
            Operation::Dey => {
                self.regs.y = self.regs.y.wrapping_sub(1);
                self.regs.p.update_nz(self.regs.y);
            }

            // Branches
            Operation::Bcc => return self.branch(operand, page_crossed, !self.regs.p.carry),
            Operation::Bcs => return self.branch(operand, page_crossed, self.regs.p.carry),
            Operation::Bne => return self.branch(operand, page_crossed, !self.regs.p.zero),
            Operation::Beq => return self.branch(operand, page_crossed, self.regs.p.zero),
            Operation::Bpl => return self.branch(operand, page_crossed, !self.regs.p.negative),
            Operation::Bmi => return self.branch(operand, page_crossed, self.regs.p.negative),
            Operation::Bvc => return self.branch(operand, page_crossed, !self.regs.p.overflow),
            Operation::Bvs => return self.branch(operand, page_crossed, self.regs.p.overflow),

            // Jumps, calls, interrupts
            Operation::Jmp => {
                if let Operand::Address(target) = operand {
                    self.regs.pc = target;
                }
            }
            Operation::Jsr => {
                if let Operand::Address(target) = operand {
                    // Pushes the address of the last byte of the JSR.
                    self.push_word(bus, self.regs.pc.wrapping_sub(1));
                    self.regs.pc = target;
                }
            }
            Operation::Rts => {
                self.regs.pc = self.pull_word(bus).wrapping_add(1);
            }
            Operation::Rti => {
                let p = self.pull(bus);
                self.regs.p = Status::from_stack(p);
                self.regs.pc = self.pull_word(bus);
            }
            Operation::Brk => {
                // Padding byte after BRK is skipped.
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.push_word(bus, self.regs.pc);
                self.push(bus, self.regs.p.to_byte_brk());
                self.regs.p.interrupt_disable = true;
                self.regs.pc = Self::read_word(bus, IRQ_VECTOR);
            }

            // Stack
            Operation::Pha => self.push(bus, self.regs.a),
            Operation::Php => self.push(bus, self.regs.p.to_byte_brk()),
            Operation::Pla => {
                self.regs.a = self.pull(bus);
                self.regs.p.update_nz(self.regs.a);
            }
            Operation::Plp => {
                let p = self.pull(bus);
                self.regs.p = Status::from_stack(p);
            }

            // Flags
            Operation::Clc => self.regs.p.carry = false,
            Operation::Sec => self.regs.p.carry = true,
            Operation::Cli => self.regs.p.interrupt_disable = false,
            Operation::Sei => self.regs.p.interrupt_disable = true,
            Operation::Cld => self.regs.p.decimal = false,
            Operation::Sed => self.regs.p.decimal = true,
            Operation::Clv => self.regs.p.overflow = false,

            Operation::Nop => {}
        }
        0
    }

    // =========================================================================
    // ALU
    // =========================================================================

    fn adc(&mut self, value: u8) {
        if self.decimal_enabled && self.regs.p.decimal {
            self.adc_decimal(value);
        } else {
            self.adc_binary(value);
        }
    }

    fn adc_binary(&mut self, value: u8) {
        let a = self.regs.a;
        let sum = u16::from(a) + u16::from(value) + u16::from(self.regs.p.carry);
        let result = sum as u8;

        self.regs.p.carry = sum > 0xFF;
        self.regs.p.overflow = (a ^ result) & (value ^ result) & 0x80 != 0;
        self.regs.p.update_nz(result);
        self.regs.a = result;
    }

    fn adc_decimal(&mut self, value: u8) {
        let a = u16::from(self.regs.a);
        let v = u16::from(value);
        let c = u16::from(self.regs.p.carry);

        let mut low = (a & 0x0F) + (v & 0x0F) + c;
        if low > 9 {
            low += 6;
        }
        let mut high = (a >> 4) + (v >> 4) + u16::from(low > 0x0F);

        // Z, N and V follow the NMOS behaviour of the intermediate results.
        let binary = (a + v + c) as u8;
        let binary16 = u16::from(binary);
        self.regs.p.zero = binary == 0;
        self.regs.p.negative = high & 0x08 != 0;
        self.regs.p.overflow = (a ^ binary16) & (v ^ binary16) & 0x80 != 0;

        if high > 9 {
            high += 6;
        }
        self.regs.p.carry = high > 0x0F;
        self.regs.a = ((high << 4) | (low & 0x0F)) as u8;
    }

    fn sbc(&mut self, value: u8) {
        if self.decimal_enabled && self.regs.p.decimal {
            self.sbc_decimal(value);
        } else {
            // A - M - !C is A + !M + C.
            self.adc_binary(!value);
        }
    }

    fn sbc_decimal(&mut self, value: u8) {
        let a = i16::from(self.regs.a);
        let v = i16::from(value);
        let borrow = i16::from(!self.regs.p.carry);

        let mut low = (a & 0x0F) - (v & 0x0F) - borrow;
        if low < 0 {
            low = ((low - 6) & 0x0F) - 0x10;
        }
        let mut high = (a >> 4) - (v >> 4) + if low < 0 { -1 } else { 0 };
        if high < 0 {
            high = (high - 6) & 0x0F;
        }

        // Flags come from the binary subtraction.
        let binary = a - v - borrow;
        let result8 = binary as u8;
        self.regs.p.carry = binary >= 0;
        self.regs.p.zero = result8 == 0;
        self.regs.p.negative = result8 & 0x80 != 0;
        self.regs.p.overflow = (self.regs.a ^ value) & (self.regs.a ^ result8) & 0x80 != 0;

        self.regs.a = ((high << 4) | (low & 0x0F)) as u8;
    }

    fn compare(&mut self, register: u8, value: u8) {
        self.regs.p.carry = register >= value;
        self.regs.p.update_nz(register.wrapping_sub(value));
    }

    fn asl(&mut self, value: u8) -> u8 {
        self.regs.p.carry = value & 0x80 != 0;
        let result = value << 1;
        self.regs.p.update_nz(result);
        result
    }

    fn lsr(&mut self, value: u8) -> u8 {
        self.regs.p.carry = value & 0x01 != 0;
        let result = value >> 1;
        self.regs.p.update_nz(result);
        result
    }

    fn rol(&mut self, value: u8) -> u8 {
        let carry_in = u8::from(self.regs.p.carry);
        self.regs.p.carry = value & 0x80 != 0;
        let result = (value << 1) | carry_in;
        self.regs.p.update_nz(result);
        result
    }

    fn ror(&mut self, value: u8) -> u8 {
        let carry_in = if self.regs.p.carry { 0x80 } else { 0 };
        self.regs.p.carry = value & 0x01 != 0;
        let result = (value >> 1) | carry_in;
        self.regs.p.update_nz(result);
        result
    }
}

impl Cpu for Mos6502 {
    type Registers = Registers;
    type Error = CpuError;

    fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u32, CpuError> {
        let cycles = if self.nmi_pending {
            self.nmi_pending = false;
            trace!("NMI at ${:04X}", self.regs.pc);
            self.enter_interrupt(bus, NMI_VECTOR)
        } else if self.irq_pending && !self.regs.p.interrupt_disable {
            self.irq_pending = false;
            trace!("IRQ at ${:04X}", self.regs.pc);
            self.enter_interrupt(bus, IRQ_VECTOR)
        } else {
            let address = self.regs.pc;
            let byte = bus.read(address);
            let Some(opcode) = opcodes::decode(byte) else {
                return Err(CpuError::UnsupportedOpcode {
                    address,
                    opcode: byte,
                });
            };
            trace!("{address:04X}  {byte:02X}  {}", opcode.operation);

            self.regs.pc = address.wrapping_add(1);
            let (operand, page_crossed) = self.resolve(bus, opcode.mode);

            let mut cycles = u32::from(opcode.cycles);
            if page_crossed && opcode.operation.has_page_penalty() {
                cycles += 1;
            }
            cycles + self.execute(bus, opcode.operation, operand, page_crossed)
        };

        self.total_cycles += u64::from(cycles);
        Ok(cycles)
    }

    fn reset<B: Bus>(&mut self, bus: &mut B) {
        self.regs = Registers::new();
        self.regs.pc = Self::read_word(bus, RESET_VECTOR);
        self.nmi_pending = false;
        self.irq_pending = false;
        self.total_cycles += u64::from(INTERRUPT_CYCLES);
        debug!("CPU reset, PC=${:04X}", self.regs.pc);
    }

    fn nmi(&mut self) {
        self.nmi_pending = true;
    }

    fn irq(&mut self) {
        self.irq_pending = true;
    }

    fn pc(&self) -> u16 {
        self.regs.pc
    }

    fn registers(&self) -> Registers {
        self.regs
    }
}

impl Observable for Mos6502 {
    fn query(&self, path: &str) -> Option<Value> {
        let p = &self.regs.p;
        match path {
            "pc" => Some(self.regs.pc.into()),
            "a" => Some(self.regs.a.into()),
            "x" => Some(self.regs.x.into()),
            "y" => Some(self.regs.y.into()),
            "sp" | "s" => Some(self.regs.sp.into()),
            "p" | "status" => Some(p.to_byte().into()),
            "flags.c" => Some(p.carry.into()),
            "flags.z" => Some(p.zero.into()),
            "flags.i" => Some(p.interrupt_disable.into()),
            "flags.d" => Some(p.decimal.into()),
            "flags.b" => Some(p.brk.into()),
            "flags.v" => Some(p.overflow.into()),
            "flags.n" => Some(p.negative.into()),
            "cycles" => Some(self.total_cycles.into()),
            "nmi_pending" => Some(self.nmi_pending.into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "pc",
            "a",
            "x",
            "y",
            "sp",
            "p",
            "flags.c",
            "flags.z",
            "flags.i",
            "flags.d",
            "flags.b",
            "flags.v",
            "flags.n",
            "cycles",
            "nmi_pending",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emu_core::SimpleBus;

    fn setup(program: &[u8]) -> (Mos6502, SimpleBus) {
        let mut bus = SimpleBus::new();
        bus.load(0x0200, program);
        let mut cpu = Mos6502::new();
        cpu.regs.pc = 0x0200;
        (cpu, bus)
    }

    #[test]
    fn test_lda_immediate() {
        let (mut cpu, mut bus) = setup(&[0xA9, 0x42]);
        let cycles = cpu.step(&mut bus).expect("step");
        assert_eq!(cpu.regs.a, 0x42);
        assert_eq!(cpu.regs.pc, 0x0202);
        assert_eq!(cycles, 2);
        assert!(!cpu.regs.p.zero);
        assert!(!cpu.regs.p.negative);
    }

    #[test]
    fn test_lda_flags() {
        let (mut cpu, mut bus) = setup(&[0xA9, 0x00, 0xA9, 0x80]);
        cpu.step(&mut bus).expect("step");
        assert!(cpu.regs.p.zero);
        cpu.step(&mut bus).expect("step");
        assert!(!cpu.regs.p.zero);
        assert!(cpu.regs.p.negative);
    }

    #[test]
    fn test_page_cross_adds_cycle_for_reads_only() {
        // LDA $02F0,X ; STA $02F0,X
        let (mut cpu, mut bus) = setup(&[0xBD, 0xF0, 0x02, 0x9D, 0xF0, 0x02]);
        cpu.regs.x = 0x20;
        assert_eq!(cpu.step(&mut bus).expect("step"), 5);
        assert_eq!(cpu.step(&mut bus).expect("step"), 5);
    }

    #[test]
    fn test_branch_cycles() {
        // BNE +2 (not taken, Z set) ; BEQ +0 (taken)
        let (mut cpu, mut bus) = setup(&[0xD0, 0x02, 0xF0, 0x00]);
        cpu.regs.p.zero = true;
        assert_eq!(cpu.step(&mut bus).expect("step"), 2);
        assert_eq!(cpu.regs.pc, 0x0202);
        assert_eq!(cpu.step(&mut bus).expect("step"), 3);
        assert_eq!(cpu.regs.pc, 0x0204);
    }

    #[test]
    fn test_adc_overflow_and_carry() {
        // CLC ; LDA #$7F ; ADC #$01 ; ADC #$80
        let (mut cpu, mut bus) = setup(&[0x18, 0xA9, 0x7F, 0x69, 0x01, 0x69, 0x80]);
        for _ in 0..3 {
            cpu.step(&mut bus).expect("step");
        }
        assert_eq!(cpu.regs.a, 0x80);
        assert!(cpu.regs.p.overflow);
        assert!(!cpu.regs.p.carry);
        cpu.step(&mut bus).expect("step");
        assert_eq!(cpu.regs.a, 0x00);
        assert!(cpu.regs.p.carry);
        assert!(cpu.regs.p.zero);
        assert!(cpu.regs.p.overflow);
    }

    #[test]
    fn test_sbc_borrow() {
        // SEC ; LDA #$10 ; SBC #$20
        let (mut cpu, mut bus) = setup(&[0x38, 0xA9, 0x10, 0xE9, 0x20]);
        for _ in 0..3 {
            cpu.step(&mut bus).expect("step");
        }
        assert_eq!(cpu.regs.a, 0xF0);
        assert!(!cpu.regs.p.carry);
        assert!(cpu.regs.p.negative);
    }

    #[test]
    fn test_decimal_mode_depends_on_variant() {
        // SED ; CLC ; LDA #$09 ; ADC #$01
        let program = [0xF8, 0x18, 0xA9, 0x09, 0x69, 0x01];

        let (mut cpu, mut bus) = setup(&program);
        for _ in 0..4 {
            cpu.step(&mut bus).expect("step");
        }
        assert_eq!(cpu.regs.a, 0x10);

        let mut bus = SimpleBus::new();
        bus.load(0x0200, &program);
        let mut cpu = Mos6502::new_2a03();
        cpu.regs.pc = 0x0200;
        for _ in 0..4 {
            cpu.step(&mut bus).expect("step");
        }
        assert_eq!(cpu.regs.a, 0x0A);
        assert!(cpu.regs.p.decimal);
    }

    #[test]
    fn test_jsr_rts() {
        // JSR $0210 ; ... ; $0210: RTS
        let (mut cpu, mut bus) = setup(&[0x20, 0x10, 0x02]);
        bus.load(0x0210, &[0x60]);
        assert_eq!(cpu.step(&mut bus).expect("step"), 6);
        assert_eq!(cpu.regs.pc, 0x0210);
        assert_eq!(bus.peek(0x01FD), 0x02);
        assert_eq!(bus.peek(0x01FC), 0x02);
        cpu.step(&mut bus).expect("step");
        assert_eq!(cpu.regs.pc, 0x0203);
        assert_eq!(cpu.regs.sp, 0xFD);
    }

    #[test]
    fn test_unsupported_opcode() {
        let (mut cpu, mut bus) = setup(&[0x02]);
        let err = cpu.step(&mut bus).expect_err("undocumented opcode");
        assert_eq!(
            err,
            CpuError::UnsupportedOpcode {
                address: 0x0200,
                opcode: 0x02
            }
        );
        assert_eq!(cpu.regs.pc, 0x0200);
        assert_eq!(cpu.total_cycles(), 0);
    }

    #[test]
    fn test_reset_loads_vector() {
        let mut bus = SimpleBus::new();
        bus.load(RESET_VECTOR, &[0x34, 0x12]);
        let mut cpu = Mos6502::new();
        cpu.regs.a = 0x55;
        cpu.regs.sp = 0x10;
        cpu.reset(&mut bus);
        assert_eq!(cpu.pc(), 0x1234);
        assert_eq!(cpu.sp(), 0xFD);
        assert_eq!(cpu.status(), 0x24);
        assert_eq!(cpu.a(), 0);
    }

    #[test]
    fn test_nmi_entry() {
        let (mut cpu, mut bus) = setup(&[0xEA]);
        bus.load(NMI_VECTOR, &[0x00, 0x90]);
        cpu.regs.p.carry = true;
        cpu.nmi();
        assert!(cpu.nmi_pending());
        assert_eq!(cpu.step(&mut bus).expect("step"), 7);
        assert_eq!(cpu.pc(), 0x9000);
        assert!(cpu.regs.p.interrupt_disable);
        assert_eq!(bus.peek(0x01FD), 0x02);
        assert_eq!(bus.peek(0x01FC), 0x00);
        // Pushed status: C and bit 5, B clear.
        assert_eq!(bus.peek(0x01FB), 0x21);
        assert!(!cpu.nmi_pending());
    }

    #[test]
    fn test_irq_masked_by_i_flag() {
        let (mut cpu, mut bus) = setup(&[0xEA, 0x58, 0xEA]);
        bus.load(IRQ_VECTOR, &[0x00, 0xA0]);
        cpu.irq();
        cpu.step(&mut bus).expect("step"); // NOP, I still set
        assert_eq!(cpu.pc(), 0x0201);
        cpu.step(&mut bus).expect("step"); // CLI
        cpu.step(&mut bus).expect("step"); // IRQ taken
        assert_eq!(cpu.pc(), 0xA000);
    }

    #[test]
    fn test_observable_registers() {
        let (mut cpu, mut bus) = setup(&[0xA2, 0x07]);
        cpu.step(&mut bus).expect("step");
        assert_eq!(cpu.query("x"), Some(Value::U8(0x07)));
        assert_eq!(cpu.query("pc"), Some(Value::U16(0x0202)));
        assert_eq!(cpu.query("flags.i"), Some(Value::Bool(true)));
        assert_eq!(cpu.query("cycles"), Some(Value::U64(2)));
        assert_eq!(cpu.query("nope"), None);
    }
}
