//! Execution-trace conformance and disassembly.
//!
//! Reference traces (nestest logs, JSON fixtures) are lists of register
//! snapshots taken after each instruction. [`check_trace`] steps a CPU
//! against such a list and reports the first divergence.

use std::fmt;

use emu_core::{Bus, Cpu};
use thiserror::Error;

use crate::opcodes::{self, AddressingMode};
use crate::{CpuError, Mos6502};

/// Register state at an instruction boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuSnapshot {
    pub pc: u16,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub p: u8,
    pub sp: u8,
}

/// A register compared by [`CpuSnapshot::diff`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceField {
    Pc,
    A,
    X,
    Y,
    P,
    Sp,
}

impl fmt::Display for TraceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pc => "PC",
            Self::A => "A",
            Self::X => "X",
            Self::Y => "Y",
            Self::P => "P",
            Self::Sp => "SP",
        })
    }
}

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("step {step}: {field} expected ${expected:04X}, got ${actual:04X}")]
    Mismatch {
        step: usize,
        field: TraceField,
        expected: u16,
        actual: u16,
    },
    #[error("step {step}: {source}")]
    Cpu {
        step: usize,
        #[source]
        source: CpuError,
    },
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

impl CpuSnapshot {
    #[must_use]
    pub fn of(cpu: &Mos6502) -> Self {
        Self {
            pc: cpu.regs.pc,
            a: cpu.regs.a,
            x: cpu.regs.x,
            y: cpu.regs.y,
            p: cpu.regs.p.to_byte(),
            sp: cpu.regs.sp,
        }
    }

    /// First field that differs from `expected`, as `(field, expected, actual)`.
    #[must_use]
    pub fn diff(&self, expected: &Self) -> Option<(TraceField, u16, u16)> {
        let fields = [
            (TraceField::Pc, expected.pc, self.pc),
            (TraceField::A, expected.a.into(), self.a.into()),
            (TraceField::X, expected.x.into(), self.x.into()),
            (TraceField::Y, expected.y.into(), self.y.into()),
            (TraceField::P, expected.p.into(), self.p.into()),
            (TraceField::Sp, expected.sp.into(), self.sp.into()),
        ];
        fields.into_iter().find(|&(_, e, a)| e != a)
    }
}

/// Parse one nestest log line:
///
/// ```text
/// C000  4C F5 C5  JMP $C5F5                       A:00 X:00 Y:00 P:24 SP:FD PPU:  0, 21 CYC:7
/// ```
///
/// # Errors
///
/// `TraceError::Parse` when the PC or a register field is missing or not hex.
pub fn parse_nestest_line(line_number: usize, line: &str) -> Result<CpuSnapshot, TraceError> {
    let parse_err = |reason: String| TraceError::Parse {
        line: line_number,
        reason,
    };

    let pc_text = line
        .get(..4)
        .ok_or_else(|| parse_err("line too short".to_string()))?;
    let pc = u16::from_str_radix(pc_text, 16)
        .map_err(|e| parse_err(format!("bad PC {pc_text:?}: {e}")))?;

    let field = |name: &str| -> Result<u8, TraceError> {
        let tag = format!(" {name}:");
        let start = line
            .find(&tag)
            .ok_or_else(|| parse_err(format!("missing {name}")))?
            + tag.len();
        let text = line
            .get(start..start + 2)
            .ok_or_else(|| parse_err(format!("truncated {name}")))?;
        u8::from_str_radix(text, 16).map_err(|e| parse_err(format!("bad {name} {text:?}: {e}")))
    };

    Ok(CpuSnapshot {
        pc,
        a: field("A")?,
        x: field("X")?,
        y: field("Y")?,
        p: field("P")?,
        sp: field("SP")?,
    })
}

/// Parse a whole nestest log, skipping blank lines. Line numbers are 1-based.
///
/// # Errors
///
/// The first line that fails [`parse_nestest_line`].
pub fn parse_nestest_log(log: &str) -> Result<Vec<CpuSnapshot>, TraceError> {
    log.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| parse_nestest_line(i + 1, line))
        .collect()
}

/// Compare `cpu` against `expected[0]`, then step once per following entry
/// and compare again. Returns the number of instructions executed.
///
/// # Errors
///
/// `Mismatch` at the first divergent entry, `Cpu` if a step fails.
pub fn check_trace<B: Bus>(
    cpu: &mut Mos6502,
    bus: &mut B,
    expected: &[CpuSnapshot],
) -> Result<usize, TraceError> {
    for (step, want) in expected.iter().enumerate() {
        if step > 0 {
            cpu.step(bus)
                .map_err(|source| TraceError::Cpu { step, source })?;
        }
        if let Some((field, expected, actual)) = CpuSnapshot::of(cpu).diff(want) {
            return Err(TraceError::Mismatch {
                step,
                field,
                expected,
                actual,
            });
        }
    }
    Ok(expected.len().saturating_sub(1))
}

/// Disassemble the instruction at the start of `bytes`, located at `address`.
///
/// Undocumented opcodes render as `.db $XX`; missing operand bytes read as 0.
#[must_use]
pub fn disassemble(address: u16, bytes: &[u8]) -> String {
    let Some(&byte) = bytes.first() else {
        return String::new();
    };
    let Some(opcode) = opcodes::decode(byte) else {
        return format!(".db ${byte:02X}");
    };

    let lo = bytes.get(1).copied().unwrap_or(0);
    let hi = bytes.get(2).copied().unwrap_or(0);
    let word = u16::from_le_bytes([lo, hi]);
    let name = opcode.operation.mnemonic();

    match opcode.mode {
        AddressingMode::Implicit => name.to_string(),
        AddressingMode::Accumulator => format!("{name} A"),
        AddressingMode::Immediate => format!("{name} #${lo:02X}"),
        AddressingMode::ZeroPage => format!("{name} ${lo:02X}"),
        AddressingMode::ZeroPageX => format!("{name} ${lo:02X},X"),
        AddressingMode::ZeroPageY => format!("{name} ${lo:02X},Y"),
        AddressingMode::Relative => {
            let target = address.wrapping_add(2).wrapping_add(lo as i8 as u16);
            format!("{name} ${target:04X}")
        }
        AddressingMode::Absolute => format!("{name} ${word:04X}"),
        AddressingMode::AbsoluteX => format!("{name} ${word:04X},X"),
        AddressingMode::AbsoluteY => format!("{name} ${word:04X},Y"),
        AddressingMode::Indirect => format!("{name} (${word:04X})"),
        AddressingMode::IndexedIndirect => format!("{name} (${lo:02X},X)"),
        AddressingMode::IndirectIndexed => format!("{name} (${lo:02X}),Y"),
    }
}
