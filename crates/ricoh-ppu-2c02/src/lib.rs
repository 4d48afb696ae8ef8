//! Ricoh 2C02 picture processing unit.
//!
//! The PPU owns its nametable, palette and OAM memory. Pattern data and the
//! nametable mirroring mode come from the cartridge through [`PpuMemory`],
//! passed in on every call along with the CPU that receives NMI.

mod error;
mod memory;
mod palette;
mod ppu;
mod registers;
mod tile;

pub use error::PpuError;
pub use memory::{Mirroring, PpuMemory, Vram, nametable_index, palette_index};
pub use palette::{PALETTE, Rgb, palette_rgb};
pub use ppu::{DOTS_PER_SCANLINE, FB_HEIGHT, FB_WIDTH, Ppu, SCANLINES_PER_FRAME};
pub use registers::{PpuCtrl, PpuMask, PpuStatus};
pub use tile::{PatternTable, Tile};
