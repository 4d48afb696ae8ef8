#![allow(dead_code)]

use emu_nes::{Nes, NesConfig, StepMode};

pub const PRG_SIZE: usize = 0x8000;
pub const CHR_SIZE: usize = 0x2000;

/// Builds a 32K PRG / 8K CHR NROM image. Reset goes to $8000, NMI to
/// $9000, IRQ/BRK to $A000.
pub struct RomBuilder {
    prg: Vec<u8>,
    chr: Vec<u8>,
}

impl RomBuilder {
    pub fn new() -> Self {
        let mut prg = vec![0xEA; PRG_SIZE];
        prg[0x7FFA..].copy_from_slice(&[0x00, 0x90, 0x00, 0x80, 0x00, 0xA0]);
        // default NMI and IRQ handlers: RTI
        prg[0x1000] = 0x40;
        prg[0x2000] = 0x40;
        Self {
            prg,
            chr: vec![0; CHR_SIZE],
        }
    }

    /// Place `code` at CPU address `address` ($8000-$FFF9).
    pub fn code(mut self, address: u16, code: &[u8]) -> Self {
        let offset = usize::from(address - 0x8000);
        self.prg[offset..offset + code.len()].copy_from_slice(code);
        self
    }

    pub fn chr(mut self, offset: usize, bytes: &[u8]) -> Self {
        self.chr[offset..offset + bytes.len()].copy_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut rom = Vec::with_capacity(16 + PRG_SIZE + CHR_SIZE);
        rom.extend_from_slice(b"NES\x1a");
        rom.extend_from_slice(&[2, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        rom.extend_from_slice(&self.prg);
        rom.extend_from_slice(&self.chr);
        rom
    }
}

pub fn nes_with(code: &[u8], step_mode: StepMode, strict_registers: bool) -> Nes {
    let config = NesConfig {
        rom_data: RomBuilder::new().code(0x8000, code).build(),
        step_mode,
        strict_registers,
    };
    Nes::new(&config).expect("valid ROM")
}

pub fn nes(code: &[u8]) -> Nes {
    nes_with(code, StepMode::Fixed, true)
}
