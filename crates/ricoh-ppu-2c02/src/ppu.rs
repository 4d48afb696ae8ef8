//! Dot-stepped 2C02.
//!
//! One `tick()` = one PPU dot. A frame is 341 dots x 262 scanlines:
//! - 0-239: visible
//! - 240: post-render (idle)
//! - 241-260: vblank
//! - 261: pre-render

use emu_core::{Cpu, Observable, Value};
use log::{debug, trace};

use crate::memory::{PpuMemory, Vram};
use crate::palette::PALETTE;
use crate::registers::{PpuCtrl, PpuMask, PpuStatus};
use crate::tile::{PatternTable, Tile};
use crate::PpuError;

/// Framebuffer dimensions.
pub const FB_WIDTH: usize = 256;
pub const FB_HEIGHT: usize = 240;

pub const DOTS_PER_SCANLINE: u16 = 341;
pub const SCANLINES_PER_FRAME: u16 = 262;

const VBLANK_SCANLINE: u16 = 241;
const PRERENDER_SCANLINE: u16 = 261;

/// PPU 2C02.
pub struct Ppu {
    vram: Vram,
    oam: [u8; 256],
    secondary_oam: [u8; 32],

    ctrl: PpuCtrl,
    mask: PpuMask,
    status: PpuStatus,
    oam_addr: u8,
    /// Last value written to any register.
    open_bus: u8,

    // Loopy scroll/address registers
    v: u16,
    t: u16,
    fine_x: u8,
    w: bool,

    scanline: u16,
    cycle: u16,
    frame_complete: bool,
    /// NMI raised by a PPUCTRL write during vblank, delivered on the next dot.
    nmi_pending: bool,

    // Background latches and shift registers
    nt_latch: u8,
    at_latch: u8,
    pattern_lo_latch: u8,
    pattern_hi_latch: u8,
    bg_pattern_lo: u16,
    bg_pattern_hi: u16,
    bg_attr_lo: u16,
    bg_attr_hi: u16,

    // Sprites for the next scanline
    sprite_count: u8,
    sprite_patterns_lo: [u8; 8],
    sprite_patterns_hi: [u8; 8],
    sprite_attribs: [u8; 8],
    sprite_x: [u8; 8],
    sprite_zero_on_line: bool,

    framebuffer: Vec<u32>,
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}

impl Ppu {
    #[must_use]
    pub fn new() -> Self {
        Self::with_framebuffer(vec![0; FB_WIDTH * FB_HEIGHT])
    }

    fn with_framebuffer(framebuffer: Vec<u32>) -> Self {
        Self {
            vram: Vram::new(),
            oam: [0; 256],
            secondary_oam: [0xFF; 32],

            ctrl: PpuCtrl::default(),
            mask: PpuMask::default(),
            status: PpuStatus::default(),
            oam_addr: 0,
            open_bus: 0,

            v: 0,
            t: 0,
            fine_x: 0,
            w: false,

            scanline: 0,
            cycle: 0,
            frame_complete: false,
            nmi_pending: false,

            nt_latch: 0,
            at_latch: 0,
            pattern_lo_latch: 0,
            pattern_hi_latch: 0,
            bg_pattern_lo: 0,
            bg_pattern_hi: 0,
            bg_attr_lo: 0,
            bg_attr_hi: 0,

            sprite_count: 0,
            sprite_patterns_lo: [0; 8],
            sprite_patterns_hi: [0; 8],
            sprite_attribs: [0; 8],
            sprite_x: [0; 8],
            sprite_zero_on_line: false,

            framebuffer,
        }
    }

    /// Power-up state: memories zeroed, registers cleared, scanline 0 dot 0.
    /// The framebuffer allocation is reused.
    pub fn clear(&mut self) {
        let mut framebuffer = std::mem::take(&mut self.framebuffer);
        framebuffer.fill(0);
        *self = Self::with_framebuffer(framebuffer);
    }

    /// One PPU dot. NMI is asserted on `cpu` at the start of vblank when
    /// PPUCTRL enables it.
    pub fn tick<M, C>(&mut self, memory: &mut M, cpu: &mut C)
    where
        M: PpuMemory + ?Sized,
        C: Cpu,
    {
        if self.nmi_pending {
            self.nmi_pending = false;
            cpu.nmi();
        }

        match self.scanline {
            0..=239 => self.tick_visible(memory),
            VBLANK_SCANLINE if self.cycle == 1 => {
                self.status.vblank = true;
                trace!("vblank start, NMI {}", self.ctrl.nmi_enable);
                if self.ctrl.nmi_enable {
                    cpu.nmi();
                }
            }
            PRERENDER_SCANLINE => self.tick_prerender(memory),
            _ => {}
        }

        self.cycle += 1;
        if self.cycle >= DOTS_PER_SCANLINE {
            self.cycle = 0;
            self.scanline += 1;
            if self.scanline >= SCANLINES_PER_FRAME {
                self.scanline = 0;
                self.frame_complete = true;
                debug!("PPU frame complete");
            }
        }
    }

    fn tick_prerender<M: PpuMemory + ?Sized>(&mut self, memory: &mut M) {
        if self.cycle == 1 {
            self.status = PpuStatus::default();
            self.sprite_patterns_lo = [0; 8];
            self.sprite_patterns_hi = [0; 8];
        }

        if self.mask.rendering_enabled() {
            if (1..=256).contains(&self.cycle) || (321..=336).contains(&self.cycle) {
                self.background_fetch(memory);
                self.shift_background();
            }
            if self.cycle == 256 {
                self.increment_y();
            }
            if self.cycle == 257 {
                self.copy_horizontal();
            }
            if (280..=304).contains(&self.cycle) {
                self.copy_vertical();
            }
        }
    }

    fn tick_visible<M: PpuMemory + ?Sized>(&mut self, memory: &mut M) {
        if !self.mask.rendering_enabled() {
            if (1..=256).contains(&self.cycle) {
                let backdrop = self.vram.palette_entry(0);
                self.put_pixel(usize::from(self.cycle - 1), backdrop);
            }
            return;
        }

        if (1..=256).contains(&self.cycle) {
            self.render_pixel();
            self.background_fetch(memory);
            self.shift_background();
        }
        if self.cycle == 256 {
            self.increment_y();
        }
        if self.cycle == 257 {
            self.copy_horizontal();
            self.evaluate_sprites(memory);
        }
        if (321..=336).contains(&self.cycle) {
            self.background_fetch(memory);
            self.shift_background();
        }
    }

    // =========================================================================
    // Background pipeline
    // =========================================================================

    fn background_fetch<M: PpuMemory + ?Sized>(&mut self, memory: &mut M) {
        match self.cycle % 8 {
            1 => {
                // The first prefetch dot has nothing latched yet.
                if self.cycle != 321 {
                    self.load_background();
                }
                self.nt_latch = self.vram.read(0x2000 | (self.v & 0x0FFF), memory);
            }
            3 => {
                let addr =
                    0x23C0 | (self.v & 0x0C00) | ((self.v >> 4) & 0x38) | ((self.v >> 2) & 0x07);
                let shift = ((self.v >> 4) & 0x04) | (self.v & 0x02);
                self.at_latch = (self.vram.read(addr, memory) >> shift) & 0x03;
            }
            5 => {
                let addr = self.background_pattern_addr();
                self.pattern_lo_latch = self.vram.read(addr, memory);
            }
            7 => {
                let addr = self.background_pattern_addr() + 8;
                self.pattern_hi_latch = self.vram.read(addr, memory);
            }
            0 => self.increment_x(),
            _ => {}
        }
    }

    fn background_pattern_addr(&self) -> u16 {
        let fine_y = (self.v >> 12) & 0x07;
        self.ctrl.background_table() + u16::from(self.nt_latch) * 16 + fine_y
    }

    fn load_background(&mut self) {
        self.bg_pattern_lo = (self.bg_pattern_lo & 0xFF00) | u16::from(self.pattern_lo_latch);
        self.bg_pattern_hi = (self.bg_pattern_hi & 0xFF00) | u16::from(self.pattern_hi_latch);
        let lo = if self.at_latch & 0x01 != 0 { 0xFF } else { 0x00 };
        let hi = if self.at_latch & 0x02 != 0 { 0xFF } else { 0x00 };
        self.bg_attr_lo = (self.bg_attr_lo & 0xFF00) | lo;
        self.bg_attr_hi = (self.bg_attr_hi & 0xFF00) | hi;
    }

    fn shift_background(&mut self) {
        self.bg_pattern_lo <<= 1;
        self.bg_pattern_hi <<= 1;
        self.bg_attr_lo <<= 1;
        self.bg_attr_hi <<= 1;
    }

    // =========================================================================
    // Pixel output
    // =========================================================================

    fn render_pixel(&mut self) {
        let x = usize::from(self.cycle - 1);
        let (bg_pixel, bg_palette) = self.background_pixel();
        let (sp_pixel, sp_palette, behind_bg, sprite_zero) = self.sprite_pixel(x);

        let (pixel, palette) = match (bg_pixel, sp_pixel) {
            (0, 0) => (0, 0),
            (0, _) => (sp_pixel, sp_palette),
            (_, 0) => (bg_pixel, bg_palette),
            _ => {
                if sprite_zero && x != 255 {
                    self.status.sprite_zero_hit = true;
                }
                if behind_bg {
                    (bg_pixel, bg_palette)
                } else {
                    (sp_pixel, sp_palette)
                }
            }
        };

        let entry = if pixel == 0 {
            0
        } else {
            usize::from(palette << 2 | pixel)
        };
        let colour = self.vram.palette_entry(entry);
        self.put_pixel(x, colour);
    }

    fn background_pixel(&self) -> (u8, u8) {
        if !self.mask.show_background || (self.cycle <= 8 && !self.mask.background_left) {
            return (0, 0);
        }
        let bit = 0x8000 >> self.fine_x;
        let pixel = u8::from(self.bg_pattern_lo & bit != 0) | u8::from(self.bg_pattern_hi & bit != 0) << 1;
        let palette = u8::from(self.bg_attr_lo & bit != 0) | u8::from(self.bg_attr_hi & bit != 0) << 1;
        (pixel, palette)
    }

    /// `(pixel, palette, behind_background, is_sprite_zero)` at column `x`.
    fn sprite_pixel(&self, x: usize) -> (u8, u8, bool, bool) {
        if !self.mask.show_sprites || (x < 8 && !self.mask.sprites_left) {
            return (0, 0, false, false);
        }

        for i in 0..usize::from(self.sprite_count) {
            let Some(offset) = x.checked_sub(usize::from(self.sprite_x[i])) else {
                continue;
            };
            if offset > 7 {
                continue;
            }
            let shift = 7 - offset;
            let pixel = (self.sprite_patterns_lo[i] >> shift) & 1
                | ((self.sprite_patterns_hi[i] >> shift) & 1) << 1;
            if pixel == 0 {
                continue;
            }
            let attribs = self.sprite_attribs[i];
            return (
                pixel,
                (attribs & 0x03) + 4,
                attribs & 0x20 != 0,
                self.sprite_zero_on_line && i == 0,
            );
        }

        (0, 0, false, false)
    }

    fn put_pixel(&mut self, x: usize, palette_value: u8) {
        let y = usize::from(self.scanline);
        if x < FB_WIDTH && y < FB_HEIGHT {
            self.framebuffer[y * FB_WIDTH + x] = self.colour(palette_value);
        }
    }

    /// Resolve a palette RAM value to `0x00RRGGBB` with PPUMASK greyscale and
    /// emphasis applied. Each emphasis bit dims the other two channels.
    fn colour(&self, palette_value: u8) -> u32 {
        let index = if self.mask.greyscale {
            palette_value & 0x30
        } else {
            palette_value & 0x3F
        };
        let rgb = PALETTE[usize::from(index)];
        let (mut r, mut g, mut b) = (u32::from(rgb.r), u32::from(rgb.g), u32::from(rgb.b));

        if self.mask.emphasize_red {
            g = g * 13 / 16;
            b = b * 13 / 16;
        }
        if self.mask.emphasize_green {
            r = r * 13 / 16;
            b = b * 13 / 16;
        }
        if self.mask.emphasize_blue {
            r = r * 13 / 16;
            g = g * 13 / 16;
        }
        r << 16 | g << 8 | b
    }

    // =========================================================================
    // Sprites
    // =========================================================================

    /// Fill secondary OAM with up to 8 sprites on the current scanline and
    /// fetch their patterns for the next one.
    fn evaluate_sprites<M: PpuMemory + ?Sized>(&mut self, memory: &mut M) {
        let height = self.ctrl.sprite_height();
        let line = self.scanline;

        self.secondary_oam = [0xFF; 32];
        self.sprite_count = 0;
        self.sprite_zero_on_line = false;

        for n in 0..64usize {
            let y = u16::from(self.oam[n * 4]);
            if line.wrapping_sub(y) >= height {
                continue;
            }
            if self.sprite_count < 8 {
                let slot = usize::from(self.sprite_count) * 4;
                self.secondary_oam[slot..slot + 4].copy_from_slice(&self.oam[n * 4..n * 4 + 4]);
                if n == 0 {
                    self.sprite_zero_on_line = true;
                }
                self.sprite_count += 1;
            } else {
                self.check_overflow(n + 1, height);
                break;
            }
        }

        for i in 0..8usize {
            if i >= usize::from(self.sprite_count) {
                self.sprite_patterns_lo[i] = 0;
                self.sprite_patterns_hi[i] = 0;
                continue;
            }
            let sprite = &self.secondary_oam[i * 4..i * 4 + 4];
            let (y, tile, attribs, x) = (u16::from(sprite[0]), sprite[1], sprite[2], sprite[3]);

            let mut row = line.wrapping_sub(y);
            let flip_v = attribs & 0x80 != 0;
            let (table, tile, row) = if height == 16 {
                // Bit 0 of the tile selects the pattern table.
                let table = u16::from(tile & 1) * 0x1000;
                let top = tile & 0xFE;
                if flip_v {
                    row = 15 - row;
                }
                if row >= 8 {
                    (table, top + 1, row - 8)
                } else {
                    (table, top, row)
                }
            } else {
                if flip_v {
                    row = 7 - row;
                }
                (self.ctrl.sprite_table(), tile, row)
            };

            let addr = table + u16::from(tile) * 16 + row;
            let mut lo = self.vram.read(addr, memory);
            let mut hi = self.vram.read(addr + 8, memory);
            if attribs & 0x40 != 0 {
                lo = lo.reverse_bits();
                hi = hi.reverse_bits();
            }

            self.sprite_patterns_lo[i] = lo;
            self.sprite_patterns_hi[i] = hi;
            self.sprite_attribs[i] = attribs;
            self.sprite_x[i] = x;
        }
    }

    /// The 2C02 overflow search after 8 sprites: the byte offset `m` advances
    /// with the sprite index on every miss, so tile, attribute and X bytes
    /// get compared as if they were Y.
    fn check_overflow(&mut self, start: usize, height: u16) {
        let mut m = 0usize;
        for n in start..64 {
            let byte = u16::from(self.oam[(n * 4 + m) & 0xFF]);
            if self.scanline.wrapping_sub(byte) < height {
                self.status.sprite_overflow = true;
                return;
            }
            m = (m + 1) & 3;
        }
    }

    // =========================================================================
    // Scroll counters
    // =========================================================================

    fn increment_x(&mut self) {
        if self.v & 0x001F == 31 {
            self.v &= !0x001F;
            self.v ^= 0x0400;
        } else {
            self.v += 1;
        }
    }

    fn increment_y(&mut self) {
        if self.v & 0x7000 != 0x7000 {
            self.v += 0x1000;
            return;
        }
        self.v &= !0x7000;
        let mut coarse_y = (self.v & 0x03E0) >> 5;
        if coarse_y == 29 {
            coarse_y = 0;
            self.v ^= 0x0800;
        } else if coarse_y == 31 {
            coarse_y = 0;
        } else {
            coarse_y += 1;
        }
        self.v = (self.v & !0x03E0) | (coarse_y << 5);
    }

    fn copy_horizontal(&mut self) {
        self.v = (self.v & !0x041F) | (self.t & 0x041F);
    }

    fn copy_vertical(&mut self) {
        self.v = (self.v & !0x7BE0) | (self.t & 0x7BE0);
    }

    fn increment_vram_address(&mut self) {
        self.v = self.v.wrapping_add(self.ctrl.vram_increment()) & 0x7FFF;
    }

    // =========================================================================
    // CPU-facing registers
    // =========================================================================

    /// CPU read of `$2000-$2007` (higher addresses fold mod 8). `$2007`
    /// reads leave `v` unchanged; only writes advance it.
    pub fn read_register<M: PpuMemory + ?Sized>(
        &mut self,
        address: u16,
        memory: &mut M,
    ) -> Result<u8, PpuError> {
        let register = 0x2000 | (address & 0x07);
        match register {
            0x2002 => {
                let value = self.status.to_byte() | (self.open_bus & 0x1F);
                self.status.vblank = false;
                self.w = false;
                Ok(value)
            }
            0x2004 => Ok(self.oam[usize::from(self.oam_addr)]),
            0x2007 => Ok(self.vram.read(self.v, memory)),
            _ => Err(PpuError::InvalidRegisterAccess {
                address: register,
                write: false,
            }),
        }
    }

    /// CPU write of `$2000-$2007` (higher addresses fold mod 8).
    pub fn write_register<M: PpuMemory + ?Sized>(
        &mut self,
        address: u16,
        value: u8,
        memory: &mut M,
    ) -> Result<(), PpuError> {
        let register = 0x2000 | (address & 0x07);
        self.open_bus = value;
        match register {
            0x2000 => {
                let was_enabled = self.ctrl.nmi_enable;
                self.ctrl = PpuCtrl::from_byte(value);
                self.t = (self.t & !0x0C00) | (u16::from(value & 0x03) << 10);
                if !was_enabled && self.ctrl.nmi_enable && self.status.vblank {
                    self.nmi_pending = true;
                }
            }
            0x2001 => self.mask = PpuMask::from_byte(value),
            0x2002 => {
                return Err(PpuError::InvalidRegisterAccess {
                    address: register,
                    write: true,
                });
            }
            0x2003 => self.oam_addr = value,
            0x2004 => {
                self.oam[usize::from(self.oam_addr)] = value;
                self.oam_addr = self.oam_addr.wrapping_add(1);
            }
            0x2005 => {
                if self.w {
                    self.t = (self.t & !0x73E0)
                        | (u16::from(value & 0x07) << 12)
                        | (u16::from(value >> 3) << 5);
                } else {
                    self.t = (self.t & !0x001F) | u16::from(value >> 3);
                    self.fine_x = value & 0x07;
                }
                self.w = !self.w;
            }
            0x2006 => {
                if self.w {
                    self.t = (self.t & 0xFF00) | u16::from(value);
                    self.v = self.t;
                } else {
                    self.t = (self.t & 0x00FF) | (u16::from(value & 0x3F) << 8);
                }
                self.w = !self.w;
            }
            _ => {
                self.vram.write(self.v, value, memory);
                self.increment_vram_address();
            }
        }
        Ok(())
    }

    /// Copy a 256-byte page into OAM starting at the OAM address, wrapping.
    pub fn oam_dma(&mut self, page: &[u8; 256]) {
        for (i, &byte) in page.iter().enumerate() {
            let slot = usize::from(self.oam_addr).wrapping_add(i) & 0xFF;
            self.oam[slot] = byte;
        }
    }

    // =========================================================================
    // Rendering queries
    // =========================================================================

    /// Decode the tile whose 16 bytes start at `address`.
    pub fn pattern_tile<M: PpuMemory + ?Sized>(
        &self,
        address: u16,
        memory: &mut M,
    ) -> Result<Tile, PpuError> {
        if address > 0x1FF0 {
            return Err(PpuError::InvalidPatternAddress(address));
        }
        let mut bytes = [0u8; 16];
        for (offset, byte) in (0u16..).zip(bytes.iter_mut()) {
            *byte = memory.chr_read(address + offset);
        }
        Ok(Tile::from_planes(&bytes))
    }

    /// Decode tile `index` (0-255) of one pattern table.
    pub fn pattern_tile_by_index<M: PpuMemory + ?Sized>(
        &self,
        index: u8,
        table: PatternTable,
        memory: &mut M,
    ) -> Tile {
        let address = table.base() + u16::from(index) * 16;
        let mut bytes = [0u8; 16];
        for (offset, byte) in (0u16..).zip(bytes.iter_mut()) {
            *byte = memory.chr_read(address + offset);
        }
        Tile::from_planes(&bytes)
    }

    /// The 2-bit background palette the attribute table assigns to the tile
    /// at nametable `address` ($2000-$2FBF).
    pub fn palette_from_nametable<M: PpuMemory + ?Sized>(
        &self,
        address: u16,
        memory: &mut M,
    ) -> Result<u8, PpuError> {
        if !(0x2000..=0x2FBF).contains(&address) {
            return Err(PpuError::InvalidNametableAddress(address));
        }
        let coarse_x = address & 0x1F;
        let coarse_y = (address >> 5) & 0x1F;
        let attr = 0x23C0 | (address & 0x0C00) | ((coarse_y >> 2) << 3) | (coarse_x >> 2);
        let shift = ((coarse_y & 0x02) << 1) | (coarse_x & 0x02);
        Ok((self.vram.read(attr, memory) >> shift) & 0x03)
    }

    /// The four colour indices of palette `palette` (0-3 background, 4-7
    /// sprite). Entry 0 is the shared backdrop.
    pub fn color_set(&self, palette: u8) -> Result<[u8; 4], PpuError> {
        if palette >= 8 {
            return Err(PpuError::InvalidPalette(palette));
        }
        let base = usize::from(palette) * 4;
        Ok(std::array::from_fn(|i| {
            self.vram.palette_entry(base + i) & 0x3F
        }))
    }

    #[must_use]
    pub fn frame_complete(&self) -> bool {
        self.frame_complete
    }

    pub fn clear_frame_complete(&mut self) {
        self.frame_complete = false;
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    #[must_use]
    pub fn scanline(&self) -> u16 {
        self.scanline
    }

    #[must_use]
    pub fn cycle(&self) -> u16 {
        self.cycle
    }

    #[must_use]
    pub fn v(&self) -> u16 {
        self.v
    }

    #[must_use]
    pub fn t(&self) -> u16 {
        self.t
    }

    #[must_use]
    pub fn fine_x(&self) -> u8 {
        self.fine_x
    }

    #[must_use]
    pub fn write_toggle(&self) -> bool {
        self.w
    }

    #[must_use]
    pub fn ctrl(&self) -> PpuCtrl {
        self.ctrl
    }

    #[must_use]
    pub fn mask(&self) -> PpuMask {
        self.mask
    }

    #[must_use]
    pub fn status(&self) -> PpuStatus {
        self.status
    }

    #[must_use]
    pub fn oam_addr(&self) -> u8 {
        self.oam_addr
    }

    #[must_use]
    pub fn oam(&self) -> &[u8; 256] {
        &self.oam
    }

    /// Last value written to any register (the PPU data bus latch).
    #[must_use]
    pub fn open_bus(&self) -> u8 {
        self.open_bus
    }

    #[must_use]
    pub fn vram(&self) -> &Vram {
        &self.vram
    }

    /// 256x240 pixels, `0x00RRGGBB`.
    #[must_use]
    pub fn framebuffer(&self) -> &[u32] {
        &self.framebuffer
    }
}

impl Observable for Ppu {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "scanline" => Some(self.scanline.into()),
            "cycle" | "dot" => Some(self.cycle.into()),
            "v" => Some(self.v.into()),
            "t" => Some(self.t.into()),
            "fine_x" => Some(self.fine_x.into()),
            "w" => Some(self.w.into()),
            "ctrl" => Some(self.ctrl.to_byte().into()),
            "mask" => Some(self.mask.to_byte().into()),
            "status" => Some(self.status.to_byte().into()),
            "oam_addr" => Some(self.oam_addr.into()),
            "vblank" => Some(self.status.vblank.into()),
            "frame_complete" => Some(self.frame_complete.into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "scanline",
            "cycle",
            "v",
            "t",
            "fine_x",
            "w",
            "ctrl",
            "mask",
            "status",
            "oam_addr",
            "vblank",
            "frame_complete",
        ]
    }
}
