//! NROM (mapper 0): no bank switching.
//!
//! - PRG: 16 KB mirrored at $8000-$FFFF, or 32 KB
//! - PRG RAM: 8 KB at $6000-$7FFF
//! - CHR: 8 KB at PPU $0000-$1FFF (ROM, or RAM when the image has none)

use ricoh_ppu_2c02::{Mirroring, PpuMemory};

use crate::Mapper;

pub struct Nrom {
    prg_rom: Vec<u8>,
    prg_ram: [u8; 0x2000],
    chr: Vec<u8>,
    chr_is_ram: bool,
    mirroring: Mirroring,
}

impl Nrom {
    #[must_use]
    pub fn new(prg_rom: Vec<u8>, chr_data: Vec<u8>, mirroring: Mirroring) -> Self {
        let chr_is_ram = chr_data.is_empty();
        let chr = if chr_is_ram { vec![0u8; 0x2000] } else { chr_data };
        Self {
            prg_rom,
            prg_ram: [0; 0x2000],
            chr,
            chr_is_ram,
            mirroring,
        }
    }

    #[must_use]
    pub fn chr_is_ram(&self) -> bool {
        self.chr_is_ram
    }
}

impl Mapper for Nrom {
    fn cpu_read(&self, address: u16) -> u8 {
        match address {
            0x6000..=0x7FFF => self.prg_ram[usize::from(address & 0x1FFF)],
            0x8000..=0xFFFF => {
                // A 16 KB image repeats at $C000.
                let offset = usize::from(address - 0x8000);
                let len = self.prg_rom.len().max(1);
                self.prg_rom.get(offset % len).copied().unwrap_or(0)
            }
            _ => 0,
        }
    }

    fn cpu_write(&mut self, address: u16, value: u8) {
        if let 0x6000..=0x7FFF = address {
            self.prg_ram[usize::from(address & 0x1FFF)] = value;
        }
    }
}

impl PpuMemory for Nrom {
    fn chr_read(&mut self, address: u16) -> u8 {
        self.chr
            .get(usize::from(address & 0x1FFF))
            .copied()
            .unwrap_or(0)
    }

    fn chr_write(&mut self, address: u16, value: u8) {
        if self.chr_is_ram {
            self.chr[usize::from(address & 0x1FFF)] = value;
        }
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }
}
