//! 8x8 tiles decoded from pattern-table bit planes.

/// Which 4 KB half of CHR space holds the tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternTable {
    /// $0000-$0FFF.
    Left,
    /// $1000-$1FFF.
    Right,
}

impl PatternTable {
    #[must_use]
    pub const fn base(self) -> u16 {
        match self {
            Self::Left => 0x0000,
            Self::Right => 0x1000,
        }
    }
}

/// A decoded tile: 2-bit colour values, `pixels[row][column]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tile {
    pub pixels: [[u8; 8]; 8],
}

impl Tile {
    /// Decode 16 bytes of pattern data: bytes 0-7 are the low plane rows,
    /// bytes 8-15 the high plane rows. Bit 7 is the leftmost pixel.
    #[must_use]
    pub fn from_planes(bytes: &[u8; 16]) -> Self {
        let mut pixels = [[0u8; 8]; 8];
        for (r, row) in pixels.iter_mut().enumerate() {
            let lo = bytes[r];
            let hi = bytes[r + 8];
            for (c, pixel) in row.iter_mut().enumerate() {
                let bit = 7 - c;
                *pixel = ((lo >> bit) & 1) | (((hi >> bit) & 1) << 1);
            }
        }
        Self { pixels }
    }

    /// Row `r` packed two bits per pixel, leftmost pixel in bits 15-14.
    #[must_use]
    pub fn packed_row(&self, r: usize) -> u16 {
        self.pixels[r & 7]
            .iter()
            .fold(0u16, |acc, &p| (acc << 2) | u16::from(p & 3))
    }
}
