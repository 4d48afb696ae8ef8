//! 2C02 master palette.

use crate::PpuError;

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Packed `0x00RRGGBB`.
    #[must_use]
    pub const fn to_u32(self) -> u32 {
        (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }
}

const fn rgb(r: u8, g: u8, b: u8) -> Rgb {
    Rgb::new(r, g, b)
}

/// The 64 colours the PPU can emit, indexed by the 6-bit value stored in
/// palette RAM.
pub const PALETTE: [Rgb; 64] = [
    // $00-$0F
    rgb(84, 84, 84),
    rgb(0, 30, 116),
    rgb(8, 16, 144),
    rgb(48, 0, 136),
    rgb(68, 0, 100),
    rgb(92, 0, 48),
    rgb(84, 4, 0),
    rgb(60, 24, 0),
    rgb(32, 42, 0),
    rgb(8, 58, 0),
    rgb(0, 64, 0),
    rgb(0, 60, 0),
    rgb(0, 50, 60),
    rgb(0, 0, 0),
    rgb(0, 0, 0),
    rgb(0, 0, 0),
    // $10-$1F
    rgb(152, 150, 152),
    rgb(8, 76, 197),
    rgb(48, 50, 236),
    rgb(92, 30, 228),
    rgb(136, 20, 176),
    rgb(160, 20, 100),
    rgb(152, 34, 32),
    rgb(120, 60, 0),
    rgb(84, 90, 0),
    rgb(40, 114, 0),
    rgb(8, 124, 0),
    rgb(0, 118, 40),
    rgb(0, 102, 120),
    rgb(0, 0, 0),
    rgb(0, 0, 0),
    rgb(0, 0, 0),
    // $20-$2F
    rgb(236, 238, 236),
    rgb(76, 154, 236),
    rgb(120, 124, 236),
    rgb(176, 98, 236),
    rgb(228, 84, 236),
    rgb(236, 88, 180),
    rgb(236, 106, 100),
    rgb(212, 136, 32),
    rgb(160, 170, 0),
    rgb(116, 196, 0),
    rgb(76, 208, 32),
    rgb(56, 204, 108),
    rgb(57, 180, 204),
    rgb(60, 60, 60),
    rgb(0, 0, 0),
    rgb(0, 0, 0),
    // $30-$3F
    rgb(236, 238, 236),
    rgb(168, 204, 236),
    rgb(188, 188, 236),
    rgb(212, 178, 236),
    rgb(236, 174, 236),
    rgb(236, 174, 212),
    rgb(236, 180, 176),
    rgb(228, 196, 144),
    rgb(204, 210, 120),
    rgb(180, 222, 120),
    rgb(168, 226, 144),
    rgb(152, 226, 180),
    rgb(160, 214, 228),
    rgb(160, 162, 160),
    rgb(0, 0, 0),
    rgb(0, 0, 0),
];

/// RGB value of master palette entry `index`.
pub fn palette_rgb(index: u8) -> Result<Rgb, PpuError> {
    PALETTE
        .get(usize::from(index))
        .copied()
        .ok_or(PpuError::PaletteIndexOutOfRange(index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_rgb_bounds() {
        assert_eq!(palette_rgb(0x21), Ok(Rgb::new(76, 154, 236)));
        assert_eq!(palette_rgb(63), Ok(Rgb::new(0, 0, 0)));
        assert_eq!(palette_rgb(64), Err(PpuError::PaletteIndexOutOfRange(64)));
        assert_eq!(palette_rgb(0xFF), Err(PpuError::PaletteIndexOutOfRange(0xFF)));
    }

    #[test]
    fn packs_rgb() {
        assert_eq!(PALETTE[0x00].to_u32(), 0x0054_5454);
        assert_eq!(PALETTE[0x01].to_u32(), 0x0000_1E74);
        assert_eq!(PALETTE[0x30].to_u32(), 0x00EC_EEEC);
    }

    #[test]
    fn unused_columns_are_black() {
        for row in 0..4 {
            for col in [0x0E, 0x0F] {
                assert_eq!(PALETTE[row * 16 + col], Rgb::new(0, 0, 0));
            }
        }
    }
}
