//! iNES header.

use ricoh_ppu_2c02::Mirroring;

use crate::CartridgeError;

pub const HEADER_LEN: usize = 16;
pub const TRAINER_LEN: usize = 512;
pub const PRG_BANK_LEN: usize = 16 * 1024;
pub const CHR_BANK_LEN: usize = 8 * 1024;

/// Parsed iNES file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InesHeader {
    /// 16 KB PRG ROM banks.
    pub prg_rom_banks: u8,
    /// 8 KB CHR ROM banks. Zero means the board has CHR RAM.
    pub chr_rom_banks: u8,
    pub mapper_number: u8,
    pub mirroring: Mirroring,
    pub has_battery: bool,
    pub has_trainer: bool,
    /// Header bytes 6-10 as stored.
    pub flags: [u8; 5],
}

impl InesHeader {
    /// Parse the 16-byte header at the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Self, CartridgeError> {
        let Some(bytes) = data.get(..HEADER_LEN) else {
            return Err(CartridgeError::Truncated {
                expected: HEADER_LEN,
                actual: data.len(),
            });
        };
        if &bytes[..4] != b"NES\x1a" {
            return Err(CartridgeError::InvalidMagic);
        }

        let flags6 = bytes[6];
        let flags7 = bytes[7];
        let mirroring = if flags6 & 0x08 != 0 {
            Mirroring::FourScreen
        } else if flags6 & 0x01 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };

        let mut flags = [0u8; 5];
        flags.copy_from_slice(&bytes[6..11]);

        Ok(Self {
            prg_rom_banks: bytes[4],
            chr_rom_banks: bytes[5],
            mapper_number: (flags7 & 0xF0) | (flags6 >> 4),
            mirroring,
            has_battery: flags6 & 0x02 != 0,
            has_trainer: flags6 & 0x04 != 0,
            flags,
        })
    }

    #[must_use]
    pub fn prg_rom_len(&self) -> usize {
        usize::from(self.prg_rom_banks) * PRG_BANK_LEN
    }

    #[must_use]
    pub fn chr_rom_len(&self) -> usize {
        usize::from(self.chr_rom_banks) * CHR_BANK_LEN
    }

    /// Offset of PRG ROM in the file.
    #[must_use]
    pub fn prg_offset(&self) -> usize {
        if self.has_trainer {
            HEADER_LEN + TRAINER_LEN
        } else {
            HEADER_LEN
        }
    }

    /// Total file length the header describes.
    #[must_use]
    pub fn file_len(&self) -> usize {
        self.prg_offset() + self.prg_rom_len() + self.chr_rom_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(flags6: u8, flags7: u8) -> [u8; 16] {
        let mut h = [0u8; 16];
        h[..4].copy_from_slice(b"NES\x1a");
        h[4] = 2;
        h[5] = 1;
        h[6] = flags6;
        h[7] = flags7;
        h
    }

    #[test]
    fn mapper_number_from_both_nibbles() {
        let h = InesHeader::parse(&header(0x10, 0x40)).expect("header");
        assert_eq!(h.mapper_number, 0x41);
    }

    #[test]
    fn mirroring_bits() {
        let parse = |f6| InesHeader::parse(&header(f6, 0)).expect("header").mirroring;
        assert_eq!(parse(0x00), Mirroring::Horizontal);
        assert_eq!(parse(0x01), Mirroring::Vertical);
        assert_eq!(parse(0x09), Mirroring::FourScreen);
    }

    #[test]
    fn sizes_and_trainer_offset() {
        let h = InesHeader::parse(&header(0x06, 0)).expect("header");
        assert!(h.has_trainer);
        assert!(h.has_battery);
        assert_eq!(h.prg_offset(), 16 + 512);
        assert_eq!(h.file_len(), 16 + 512 + 2 * 16384 + 8192);
        assert_eq!(h.flags[0], 0x06);
    }

    #[test]
    fn rejects_bad_magic_and_short_input() {
        let mut h = header(0, 0);
        h[3] = 0;
        assert!(matches!(InesHeader::parse(&h), Err(CartridgeError::InvalidMagic)));
        assert!(matches!(
            InesHeader::parse(b"NES"),
            Err(CartridgeError::Truncated { expected: 16, actual: 3 })
        ));
    }
}
