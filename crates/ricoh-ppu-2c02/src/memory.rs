//! PPU address space: pattern tables on the cartridge, nametables and
//! palette RAM inside the PPU.

/// Nametable mirroring mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mirroring {
    /// $2000=$2400, $2800=$2C00.
    #[default]
    Horizontal,
    /// $2000=$2800, $2400=$2C00.
    Vertical,
    /// Needs cartridge VRAM; only 2 KB exists here, so it folds like
    /// vertical.
    FourScreen,
    SingleScreenLower,
    SingleScreenUpper,
}

/// Cartridge side of the PPU bus.
pub trait PpuMemory {
    /// Read CHR ($0000-$1FFF).
    fn chr_read(&mut self, address: u16) -> u8;
    /// Write CHR. Ignored when the cartridge has CHR ROM.
    fn chr_write(&mut self, address: u16, value: u8);
    fn mirroring(&self) -> Mirroring;
}

/// Internal nametable and palette RAM.
#[derive(Clone)]
pub struct Vram {
    nametables: [u8; 0x800],
    palette: [u8; 0x20],
}

impl Default for Vram {
    fn default() -> Self {
        Self::new()
    }
}

impl Vram {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nametables: [0; 0x800],
            palette: [0; 0x20],
        }
    }

    /// Read any PPU address; $4000+ folds into $0000-$3FFF.
    pub fn read<M: PpuMemory + ?Sized>(&self, address: u16, memory: &mut M) -> u8 {
        let address = address & 0x3FFF;
        match address {
            0x0000..=0x1FFF => memory.chr_read(address),
            0x2000..=0x3EFF => {
                self.nametables[nametable_index(address, memory.mirroring())]
            }
            _ => self.palette[palette_index(address)],
        }
    }

    pub fn write<M: PpuMemory + ?Sized>(&mut self, address: u16, value: u8, memory: &mut M) {
        let address = address & 0x3FFF;
        match address {
            0x0000..=0x1FFF => memory.chr_write(address, value),
            0x2000..=0x3EFF => {
                self.nametables[nametable_index(address, memory.mirroring())] = value;
            }
            _ => self.palette[palette_index(address)] = value,
        }
    }

    /// Palette RAM entry, `index` already folded to 0-31.
    #[must_use]
    pub fn palette_entry(&self, index: usize) -> u8 {
        self.palette[palette_index(0x3F00 | (index as u16 & 0x1F))]
    }
}

/// Offset into the 2 KB nametable RAM for an address in $2000-$3EFF.
#[must_use]
pub fn nametable_index(address: u16, mirroring: Mirroring) -> usize {
    let offset = usize::from(address & 0x0FFF);
    let table = offset / 0x400;
    let within = offset & 0x3FF;
    let page = match mirroring {
        Mirroring::Horizontal => table / 2,
        Mirroring::Vertical | Mirroring::FourScreen => table & 1,
        Mirroring::SingleScreenLower => 0,
        Mirroring::SingleScreenUpper => 1,
    };
    page * 0x400 + within
}

/// Offset into the 32-byte palette RAM. The backdrop entries of the sprite
/// palettes ($3F10/$14/$18/$1C) alias the background ones.
#[must_use]
pub fn palette_index(address: u16) -> usize {
    let index = usize::from(address.wrapping_sub(0x3F00) & 0x1F);
    if index & 0x13 == 0x10 { index - 0x10 } else { index }
}
