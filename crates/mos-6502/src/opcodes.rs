//! Opcode table: every opcode byte maps to an (operation, addressing mode)
//! pair and a base cycle count.
//!
//! The table is plain data. Dispatch is a lookup here followed by a `match`
//! on [`Operation`] in the CPU, so tests can inspect the decode of every byte
//! without executing anything. Undocumented opcodes have no entry.

use std::fmt;

/// The 13 addressing modes of the 6502.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    /// No operand (`CLC`, `RTS`).
    Implicit,
    /// Operates on A (`ASL A`).
    Accumulator,
    /// `#$nn`
    Immediate,
    /// `$nn`
    ZeroPage,
    /// `$nn,X`, wraps within page zero.
    ZeroPageX,
    /// `$nn,Y`, wraps within page zero.
    ZeroPageY,
    /// Signed 8-bit branch offset.
    Relative,
    /// `$nnnn`
    Absolute,
    /// `$nnnn,X`
    AbsoluteX,
    /// `$nnnn,Y`
    AbsoluteY,
    /// `($nnnn)`, JMP only. The pointer high byte does not carry across a page.
    Indirect,
    /// `($nn,X)`
    IndexedIndirect,
    /// `($nn),Y`
    IndirectIndexed,
}

impl AddressingMode {
    /// Number of operand bytes following the opcode.
    #[must_use]
    pub const fn operand_len(self) -> u16 {
        match self {
            Self::Implicit | Self::Accumulator => 0,
            Self::Immediate
            | Self::ZeroPage
            | Self::ZeroPageX
            | Self::ZeroPageY
            | Self::Relative
            | Self::IndexedIndirect
            | Self::IndirectIndexed => 1,
            Self::Absolute | Self::AbsoluteX | Self::AbsoluteY | Self::Indirect => 2,
        }
    }
}

/// The 56 documented 6502 operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
}

impl Operation {
    /// Assembler mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Adc => "ADC",
            Self::And => "AND",
            Self::Asl => "ASL",
            Self::Bcc => "BCC",
            Self::Bcs => "BCS",
            Self::Beq => "BEQ",
            Self::Bit => "BIT",
            Self::Bmi => "BMI",
            Self::Bne => "BNE",
            Self::Bpl => "BPL",
            Self::Brk => "BRK",
            Self::Bvc => "BVC",
            Self::Bvs => "BVS",
            Self::Clc => "CLC",
            Self::Cld => "CLD",
            Self::Cli => "CLI",
            Self::Clv => "CLV",
            Self::Cmp => "CMP",
            Self::Cpx => "CPX",
            Self::Cpy => "CPY",
            Self::Dec => "DEC",
            Self::Dex => "DEX",
            Self::Dey => "DEY",
            Self::Eor => "EOR",
            Self::Inc => "INC",
            Self::Inx => "INX",
            Self::Iny => "INY",
            Self::Jmp => "JMP",
            Self::Jsr => "JSR",
            Self::Lda => "LDA",
            Self::Ldx => "LDX",
            Self::Ldy => "LDY",
            Self::Lsr => "LSR",
            Self::Nop => "NOP",
            Self::Ora => "ORA",
            Self::Pha => "PHA",
            Self::Php => "PHP",
            Self::Pla => "PLA",
            Self::Plp => "PLP",
            Self::Rol => "ROL",
            Self::Ror => "ROR",
            Self::Rti => "RTI",
            Self::Rts => "RTS",
            Self::Sbc => "SBC",
            Self::Sec => "SEC",
            Self::Sed => "SED",
            Self::Sei => "SEI",
            Self::Sta => "STA",
            Self::Stx => "STX",
            Self::Sty => "STY",
            Self::Tax => "TAX",
            Self::Tay => "TAY",
            Self::Tsx => "TSX",
            Self::Txa => "TXA",
            Self::Txs => "TXS",
            Self::Tya => "TYA",
        }
    }

    /// Read operations pay one extra cycle when indexing crosses a page.
    ///
    /// Stores and read-modify-write operations always take the long path,
    /// which is already in their base cycle count.
    #[must_use]
    pub const fn has_page_penalty(self) -> bool {
        matches!(
            self,
            Self::Adc
                | Self::And
                | Self::Cmp
                | Self::Eor
                | Self::Lda
                | Self::Ldx
                | Self::Ldy
                | Self::Ora
                | Self::Sbc
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// One decoded opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Opcode {
    pub operation: Operation,
    pub mode: AddressingMode,
    /// Cycles before page-cross and branch penalties.
    pub cycles: u8,
}

impl Opcode {
    const fn new(operation: Operation, mode: AddressingMode, cycles: u8) -> Self {
        Self {
            operation,
            mode,
            cycles,
        }
    }

    /// Instruction length in bytes, including the opcode.
    ///
    /// BRK reads and discards a padding byte, so it is two bytes long even
    /// though its addressing mode is implicit.
    #[must_use]
    pub const fn len(self) -> u16 {
        if matches!(self.operation, Operation::Brk) {
            2
        } else {
            1 + self.mode.operand_len()
        }
    }
}

/// Look up an opcode byte.
#[must_use]
pub fn decode(opcode: u8) -> Option<Opcode> {
    OPCODES[opcode as usize]
}

/// Decode table for all 256 opcode bytes.
pub static OPCODES: [Option<Opcode>; 256] = build_table();

#[allow(clippy::enum_glob_use)]
const fn build_table() -> [Option<Opcode>; 256] {
    use AddressingMode::*;
    use Operation::*;

    let mut t: [Option<Opcode>; 256] = [None; 256];

    t[0x69] = Some(Opcode::new(Adc, Immediate, 2));
    t[0x65] = Some(Opcode::new(Adc, ZeroPage, 3));
    t[0x75] = Some(Opcode::new(Adc, ZeroPageX, 4));
    t[0x6D] = Some(Opcode::new(Adc, Absolute, 4));
    t[0x7D] = Some(Opcode::new(Adc, AbsoluteX, 4));
    t[0x79] = Some(Opcode::new(Adc, AbsoluteY, 4));
    t[0x61] = Some(Opcode::new(Adc, IndexedIndirect, 6));
    t[0x71] = Some(Opcode::new(Adc, IndirectIndexed, 5));

    t[0x29] = Some(Opcode::new(And, Immediate, 2));
    t[0x25] = Some(Opcode::new(And, ZeroPage, 3));
    t[0x35] = Some(Opcode::new(And, ZeroPageX, 4));
    t[0x2D] = Some(Opcode::new(And, Absolute, 4));
    t[0x3D] = Some(Opcode::new(And, AbsoluteX, 4));
    t[0x39] = Some(Opcode::new(And, AbsoluteY, 4));
    t[0x21] = Some(Opcode::new(And, IndexedIndirect, 6));
    t[0x31] = Some(Opcode::new(And, IndirectIndexed, 5));

    t[0x0A] = Some(Opcode::new(Asl, Accumulator, 2));
    t[0x06] = Some(Opcode::new(Asl, ZeroPage, 5));
    t[0x16] = Some(Opcode::new(Asl, ZeroPageX, 6));
    t[0x0E] = Some(Opcode::new(Asl, Absolute, 6));
    t[0x1E] = Some(Opcode::new(Asl, AbsoluteX, 7));

    t[0x90] = Some(Opcode::new(Bcc, Relative, 2));
    t[0xB0] = Some(Opcode::new(Bcs, Relative, 2));
    t[0xF0] = Some(Opcode::new(Beq, Relative, 2));
    t[0x30] = Some(Opcode::new(Bmi, Relative, 2));
    t[0xD0] = Some(Opcode::new(Bne, Relative, 2));
    t[0x10] = Some(Opcode::new(Bpl, Relative, 2));
    t[0x50] = Some(Opcode::new(Bvc, Relative, 2));
    t[0x70] = Some(Opcode::new(Bvs, Relative, 2));

    t[0x24] = Some(Opcode::new(Bit, ZeroPage, 3));
    t[0x2C] = Some(Opcode::new(Bit, Absolute, 4));

    t[0x00] = Some(Opcode::new(Brk, Implicit, 7));

    t[0x18] = Some(Opcode::new(Clc, Implicit, 2));
    t[0xD8] = Some(Opcode::new(Cld, Implicit, 2));
    t[0x58] = Some(Opcode::new(Cli, Implicit, 2));
    t[0xB8] = Some(Opcode::new(Clv, Implicit, 2));

    t[0xC9] = Some(Opcode::new(Cmp, Immediate, 2));
    t[0xC5] = Some(Opcode::new(Cmp, ZeroPage, 3));
    t[0xD5] = Some(Opcode::new(Cmp, ZeroPageX, 4));
    t[0xCD] = Some(Opcode::new(Cmp, Absolute, 4));
    t[0xDD] = Some(Opcode::new(Cmp, AbsoluteX, 4));
    t[0xD9] = Some(Opcode::new(Cmp, AbsoluteY, 4));
    t[0xC1] = Some(Opcode::new(Cmp, IndexedIndirect, 6));
    t[0xD1] = Some(Opcode::new(Cmp, IndirectIndexed, 5));

    t[0xE0] = Some(Opcode::new(Cpx, Immediate, 2));
    t[0xE4] = Some(Opcode::new(Cpx, ZeroPage, 3));
    t[0xEC] = Some(Opcode::new(Cpx, Absolute, 4));

    t[0xC0] = Some(Opcode::new(Cpy, Immediate, 2));
    t[0xC4] = Some(Opcode::new(Cpy, ZeroPage, 3));
    t[0xCC] = Some(Opcode::new(Cpy, Absolute, 4));

    t[0xC6] = Some(Opcode::new(Dec, ZeroPage, 5));
    t[0xD6] = Some(Opcode::new(Dec, ZeroPageX, 6));
    t[0xCE] = Some(Opcode::new(Dec, Absolute, 6));
    t[0xDE] = Some(Opcode::new(Dec, AbsoluteX, 7));

    t[0xCA] = Some(Opcode::new(Dex, Implicit, 2));
    t[0x88] = Some(Opcode::new(Dey, Implicit, 2));

    t[0x49] = Some(Opcode::new(Eor, Immediate, 2));
    t[0x45] = Some(Opcode::new(Eor, ZeroPage, 3));
    t[0x55] = Some(Opcode::new(Eor, ZeroPageX, 4));
    t[0x4D] = Some(Opcode::new(Eor, Absolute, 4));
    t[0x5D] = Some(Opcode::new(Eor, AbsoluteX, 4));
    t[0x59] = Some(Opcode::new(Eor, AbsoluteY, 4));
    t[0x41] = Some(Opcode::new(Eor, IndexedIndirect, 6));
    t[0x51] = Some(Opcode::new(Eor, IndirectIndexed, 5));

    t[0xE6] = Some(Opcode::new(Inc, ZeroPage, 5));
    t[0xF6] = Some(Opcode::new(Inc, ZeroPageX, 6));
    t[0xEE] = Some(Opcode::new(Inc, Absolute, 6));
    t[0xFE] = Some(Opcode::new(Inc, AbsoluteX, 7));

    t[0xE8] = Some(Opcode::new(Inx, Implicit, 2));
    t[0xC8] = Some(Opcode::new(Iny, Implicit, 2));

    t[0x4C] = Some(Opcode::new(Jmp, Absolute, 3));
    t[0x6C] = Some(Opcode::new(Jmp, Indirect, 5));
    t[0x20] = Some(Opcode::new(Jsr, Absolute, 6));

    t[0xA9] = Some(Opcode::new(Lda, Immediate, 2));
    t[0xA5] = Some(Opcode::new(Lda, ZeroPage, 3));
    t[0xB5] = Some(Opcode::new(Lda, ZeroPageX, 4));
    t[0xAD] = Some(Opcode::new(Lda, Absolute, 4));
    t[0xBD] = Some(Opcode::new(Lda, AbsoluteX, 4));
    t[0xB9] = Some(Opcode::new(Lda, AbsoluteY, 4));
    t[0xA1] = Some(Opcode::new(Lda, IndexedIndirect, 6));
    t[0xB1] = Some(Opcode::new(Lda, IndirectIndexed, 5));

    t[0xA2] = Some(Opcode::new(Ldx, Immediate, 2));
    t[0xA6] = Some(Opcode::new(Ldx, ZeroPage, 3));
    t[0xB6] = Some(Opcode::new(Ldx, ZeroPageY, 4));
    t[0xAE] = Some(Opcode::new(Ldx, Absolute, 4));
    t[0xBE] = Some(Opcode::new(Ldx, AbsoluteY, 4));

    t[0xA0] = Some(Opcode::new(Ldy, Immediate, 2));
    t[0xA4] = Some(Opcode::new(Ldy, ZeroPage, 3));
    t[0xB4] = Some(Opcode::new(Ldy, ZeroPageX, 4));
    t[0xAC] = Some(Opcode::new(Ldy, Absolute, 4));
    t[0xBC] = Some(Opcode::new(Ldy, AbsoluteX, 4));

    t[0x4A] = Some(Opcode::new(Lsr, Accumulator, 2));
    t[0x46] = Some(Opcode::new(Lsr, ZeroPage, 5));
    t[0x56] = Some(Opcode::new(Lsr, ZeroPageX, 6));
    t[0x4E] = Some(Opcode::new(Lsr, Absolute, 6));
    t[0x5E] = Some(Opcode::new(Lsr, AbsoluteX, 7));

    t[0xEA] = Some(Opcode::new(Nop, Implicit, 2));

    t[0x09] = Some(Opcode::new(Ora, Immediate, 2));
    t[0x05] = Some(Opcode::new(Ora, ZeroPage, 3));
    t[0x15] = Some(Opcode::new(Ora, ZeroPageX, 4));
    t[0x0D] = Some(Opcode::new(Ora, Absolute, 4));
    t[0x1D] = Some(Opcode::new(Ora, AbsoluteX, 4));
    t[0x19] = Some(Opcode::new(Ora, AbsoluteY, 4));
    t[0x01] = Some(Opcode::new(Ora, IndexedIndirect, 6));
    t[0x11] = Some(Opcode::new(Ora, IndirectIndexed, 5));

    t[0x48] = Some(Opcode::new(Pha, Implicit, 3));
    t[0x08] = Some(Opcode::new(Php, Implicit, 3));
    t[0x68] = Some(Opcode::new(Pla, Implicit, 4));
    t[0x28] = Some(Opcode::new(Plp, Implicit, 4));

    t[0x2A] = Some(Opcode::new(Rol, Accumulator, 2));
    t[0x26] = Some(Opcode::new(Rol, ZeroPage, 5));
    t[0x36] = Some(Opcode::new(Rol, ZeroPageX, 6));
    t[0x2E] = Some(Opcode::new(Rol, Absolute, 6));
    t[0x3E] = Some(Opcode::new(Rol, AbsoluteX, 7));

    t[0x6A] = Some(Opcode::new(Ror, Accumulator, 2));
    t[0x66] = Some(Opcode::new(Ror, ZeroPage, 5));
    t[0x76] = Some(Opcode::new(Ror, ZeroPageX, 6));
    t[0x6E] = Some(Opcode::new(Ror, Absolute, 6));
    t[0x7E] = Some(Opcode::new(Ror, AbsoluteX, 7));

    t[0x40] = Some(Opcode::new(Rti, Implicit, 6));
    t[0x60] = Some(Opcode::new(Rts, Implicit, 6));

    t[0xE9] = Some(Opcode::new(Sbc, Immediate, 2));
    t[0xE5] = Some(Opcode::new(Sbc, ZeroPage, 3));
    t[0xF5] = Some(Opcode::new(Sbc, ZeroPageX, 4));
    t[0xED] = Some(Opcode::new(Sbc, Absolute, 4));
    t[0xFD] = Some(Opcode::new(Sbc, AbsoluteX, 4));
    t[0xF9] = Some(Opcode::new(Sbc, AbsoluteY, 4));
    t[0xE1] = Some(Opcode::new(Sbc, IndexedIndirect, 6));
    t[0xF1] = Some(Opcode::new(Sbc, IndirectIndexed, 5));

    t[0x38] = Some(Opcode::new(Sec, Implicit, 2));
    t[0xF8] = Some(Opcode::new(Sed, Implicit, 2));
    t[0x78] = Some(Opcode::new(Sei, Implicit, 2));

    t[0x85] = Some(Opcode::new(Sta, ZeroPage, 3));
    t[0x95] = Some(Opcode::new(Sta, ZeroPageX, 4));
    t[0x8D] = Some(Opcode::new(Sta, Absolute, 4));
    t[0x9D] = Some(Opcode::new(Sta, AbsoluteX, 5));
    t[0x99] = Some(Opcode::new(Sta, AbsoluteY, 5));
    t[0x81] = Some(Opcode::new(Sta, IndexedIndirect, 6));
    t[0x91] = Some(Opcode::new(Sta, IndirectIndexed, 6));

    t[0x86] = Some(Opcode::new(Stx, ZeroPage, 3));
    t[0x96] = Some(Opcode::new(Stx, ZeroPageY, 4));
    t[0x8E] = Some(Opcode::new(Stx, Absolute, 4));

    t[0x84] = Some(Opcode::new(Sty, ZeroPage, 3));
    t[0x94] = Some(Opcode::new(Sty, ZeroPageX, 4));
    t[0x8C] = Some(Opcode::new(Sty, Absolute, 4));

    t[0xAA] = Some(Opcode::new(Tax, Implicit, 2));
    t[0xA8] = Some(Opcode::new(Tay, Implicit, 2));
    t[0xBA] = Some(Opcode::new(Tsx, Implicit, 2));
    t[0x8A] = Some(Opcode::new(Txa, Implicit, 2));
    t[0x9A] = Some(Opcode::new(Txs, Implicit, 2));
    t[0x98] = Some(Opcode::new(Tya, Implicit, 2));

    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn documented_opcode_count() {
        assert_eq!(OPCODES.iter().flatten().count(), 151);
    }

    #[test]
    fn every_operation_is_reachable() {
        let ops: HashSet<Operation> = OPCODES.iter().flatten().map(|op| op.operation).collect();
        assert_eq!(ops.len(), 56);
    }

    #[test]
    fn every_addressing_mode_is_used() {
        let modes: HashSet<AddressingMode> = OPCODES.iter().flatten().map(|op| op.mode).collect();
        assert_eq!(modes.len(), 13);
    }

    #[test]
    fn operation_and_mode_pairs_are_unique() {
        let mut seen = HashSet::new();
        for op in OPCODES.iter().flatten() {
            assert!(
                seen.insert((op.operation, op.mode)),
                "duplicate entry for {} {:?}",
                op.operation,
                op.mode
            );
        }
    }

    #[test]
    fn undocumented_bytes_have_no_entry() {
        for byte in [0x02, 0x03, 0x1A, 0x80, 0xA3, 0xEB, 0xFF] {
            assert_eq!(decode(byte), None, "${byte:02X}");
        }
    }

    #[test]
    fn spot_check_decodes() {
        assert_eq!(
            decode(0xA9),
            Some(Opcode::new(Operation::Lda, AddressingMode::Immediate, 2))
        );
        assert_eq!(
            decode(0x6C),
            Some(Opcode::new(Operation::Jmp, AddressingMode::Indirect, 5))
        );
        assert_eq!(
            decode(0x91),
            Some(Opcode::new(Operation::Sta, AddressingMode::IndirectIndexed, 6))
        );
        assert_eq!(
            decode(0xB6),
            Some(Opcode::new(Operation::Ldx, AddressingMode::ZeroPageY, 4))
        );
    }

    #[test]
    fn instruction_lengths() {
        let len = |byte| decode(byte).map(Opcode::len);
        assert_eq!(len(0x00), Some(2)); // BRK
        assert_eq!(len(0xEA), Some(1)); // NOP
        assert_eq!(len(0xD0), Some(2)); // BNE
        assert_eq!(len(0x20), Some(3)); // JSR
    }
}
