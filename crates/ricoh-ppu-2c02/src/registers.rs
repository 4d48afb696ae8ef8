//! PPUCTRL, PPUMASK and PPUSTATUS as named fields.

/// PPUCTRL ($2000).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PpuCtrl {
    /// Base nametable, 0-3 ($2000/$2400/$2800/$2C00).
    pub nametable: u8,
    /// VRAM address increment per $2007 access: false = 1, true = 32.
    pub increment_32: bool,
    /// 8x8 sprite pattern table at $1000.
    pub sprite_table_high: bool,
    /// Background pattern table at $1000.
    pub background_table_high: bool,
    /// 8x16 sprites.
    pub sprite_size_16: bool,
    pub master_slave: bool,
    /// Generate NMI at the start of vblank.
    pub nmi_enable: bool,
}

impl PpuCtrl {
    #[must_use]
    pub const fn from_byte(value: u8) -> Self {
        Self {
            nametable: value & 0x03,
            increment_32: value & 0x04 != 0,
            sprite_table_high: value & 0x08 != 0,
            background_table_high: value & 0x10 != 0,
            sprite_size_16: value & 0x20 != 0,
            master_slave: value & 0x40 != 0,
            nmi_enable: value & 0x80 != 0,
        }
    }

    #[must_use]
    pub const fn to_byte(self) -> u8 {
        (self.nametable & 0x03)
            | (self.increment_32 as u8) << 2
            | (self.sprite_table_high as u8) << 3
            | (self.background_table_high as u8) << 4
            | (self.sprite_size_16 as u8) << 5
            | (self.master_slave as u8) << 6
            | (self.nmi_enable as u8) << 7
    }

    /// Step applied to `v` after each $2007 access.
    #[must_use]
    pub const fn vram_increment(self) -> u16 {
        if self.increment_32 { 32 } else { 1 }
    }

    #[must_use]
    pub const fn background_table(self) -> u16 {
        if self.background_table_high { 0x1000 } else { 0 }
    }

    #[must_use]
    pub const fn sprite_table(self) -> u16 {
        if self.sprite_table_high { 0x1000 } else { 0 }
    }

    #[must_use]
    pub const fn sprite_height(self) -> u16 {
        if self.sprite_size_16 { 16 } else { 8 }
    }
}

/// PPUMASK ($2001).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PpuMask {
    pub greyscale: bool,
    pub background_left: bool,
    pub sprites_left: bool,
    pub show_background: bool,
    pub show_sprites: bool,
    pub emphasize_red: bool,
    pub emphasize_green: bool,
    pub emphasize_blue: bool,
}

impl PpuMask {
    #[must_use]
    pub const fn from_byte(value: u8) -> Self {
        Self {
            greyscale: value & 0x01 != 0,
            background_left: value & 0x02 != 0,
            sprites_left: value & 0x04 != 0,
            show_background: value & 0x08 != 0,
            show_sprites: value & 0x10 != 0,
            emphasize_red: value & 0x20 != 0,
            emphasize_green: value & 0x40 != 0,
            emphasize_blue: value & 0x80 != 0,
        }
    }

    #[must_use]
    pub const fn to_byte(self) -> u8 {
        (self.greyscale as u8)
            | (self.background_left as u8) << 1
            | (self.sprites_left as u8) << 2
            | (self.show_background as u8) << 3
            | (self.show_sprites as u8) << 4
            | (self.emphasize_red as u8) << 5
            | (self.emphasize_green as u8) << 6
            | (self.emphasize_blue as u8) << 7
    }

    /// Background or sprites enabled.
    #[must_use]
    pub const fn rendering_enabled(self) -> bool {
        self.show_background || self.show_sprites
    }
}

/// PPUSTATUS ($2002). Bits 0-4 are not stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PpuStatus {
    pub sprite_overflow: bool,
    pub sprite_zero_hit: bool,
    pub vblank: bool,
}

impl PpuStatus {
    #[must_use]
    pub const fn from_byte(value: u8) -> Self {
        Self {
            sprite_overflow: value & 0x20 != 0,
            sprite_zero_hit: value & 0x40 != 0,
            vblank: value & 0x80 != 0,
        }
    }

    #[must_use]
    pub const fn to_byte(self) -> u8 {
        (self.sprite_overflow as u8) << 5
            | (self.sprite_zero_hit as u8) << 6
            | (self.vblank as u8) << 7
    }
}
