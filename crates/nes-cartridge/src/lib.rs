//! iNES parsing and cartridge mappers.
//!
//! A cartridge sits on both buses: PRG on the CPU side through [`Mapper`],
//! CHR and nametable mirroring on the PPU side through
//! [`ricoh_ppu_2c02::PpuMemory`]. Only NROM (mapper 0) is implemented.

mod error;
mod header;
mod nrom;

use std::path::Path;

use log::info;
use ricoh_ppu_2c02::PpuMemory;

pub use error::CartridgeError;
pub use header::{CHR_BANK_LEN, HEADER_LEN, InesHeader, PRG_BANK_LEN, TRAINER_LEN};
pub use nrom::Nrom;

/// CPU side of a cartridge ($4020-$FFFF).
pub trait Mapper: PpuMemory {
    fn cpu_read(&self, address: u16) -> u8;
    fn cpu_write(&mut self, address: u16, value: u8);
}

/// Parse an iNES image into a mapper.
pub fn parse_ines(data: &[u8]) -> Result<Box<dyn Mapper>, CartridgeError> {
    let header = InesHeader::parse(data)?;
    if data.len() < header.file_len() {
        return Err(CartridgeError::Truncated {
            expected: header.file_len(),
            actual: data.len(),
        });
    }

    let prg_start = header.prg_offset();
    let chr_start = prg_start + header.prg_rom_len();
    let prg_rom = data[prg_start..chr_start].to_vec();
    let chr_data = data[chr_start..chr_start + header.chr_rom_len()].to_vec();

    match header.mapper_number {
        0 => {
            info!(
                "NROM cartridge: {} KB PRG, {} KB CHR {}, {:?} mirroring",
                prg_rom.len() / 1024,
                if chr_data.is_empty() { 8 } else { chr_data.len() / 1024 },
                if chr_data.is_empty() { "RAM" } else { "ROM" },
                header.mirroring
            );
            Ok(Box::new(Nrom::new(prg_rom, chr_data, header.mirroring)))
        }
        n => Err(CartridgeError::UnsupportedCartridgeMapper(n)),
    }
}

/// Read and parse an iNES file.
pub fn load_ines(path: impl AsRef<Path>) -> Result<Box<dyn Mapper>, CartridgeError> {
    let data = std::fs::read(path)?;
    parse_ines(&data)
}
