//! iNES ROM image parsing.
//!
//! Only the legacy iNES 1.0 layout is handled, sized for NROM: a 16-byte
//! header, then PRG-ROM in 16 KiB pages and CHR-ROM in 8 KiB pages.
//! Malformed images are rejected here, before any emulation state exists.

/// Errors from parsing an iNES image.
#[derive(Debug, thiserror::Error)]
pub enum RomError {
    /// Image is too small to contain a header.
    #[error("ROM file too small: expected at least 16 bytes, got {0}")]
    FileTooSmall(usize),

    /// Header does not begin with `NES\x1A`.
    #[error("invalid iNES magic number: expected [4E 45 53 1A], got {0:02X?}")]
    InvalidMagic([u8; 4]),

    /// PRG-ROM page count is zero.
    #[error("PRG-ROM size cannot be 0")]
    EmptyPrgRom,

    /// PRG-ROM exceeds the 32 KiB an NROM board can map.
    #[error("PRG-ROM too large for NROM: {0} x 16 KiB pages (max 2)")]
    PrgRomTooLarge(u8),

    /// The payload is shorter than the header promises.
    #[error("ROM file truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Expected file size in bytes.
        expected: usize,
        /// Actual file size in bytes.
        actual: usize,
    },
}

/// Parsed iNES header fields the core cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RomHeader {
    /// PRG-ROM size in bytes (16 KiB or 32 KiB for NROM).
    pub prg_rom_size: usize,
    /// CHR-ROM size in bytes; 0 means the cartridge provides CHR-RAM.
    pub chr_rom_size: usize,
}

impl RomHeader {
    /// iNES magic: "NES" followed by MS-DOS EOF.
    const MAGIC: [u8; 4] = [0x4E, 0x45, 0x53, 0x1A];

    /// Parse the 16-byte header.
    pub fn parse(data: &[u8]) -> Result<Self, RomError> {
        if data.len() < 16 {
            return Err(RomError::FileTooSmall(data.len()));
        }

        let magic = [data[0], data[1], data[2], data[3]];
        if magic != Self::MAGIC {
            return Err(RomError::InvalidMagic(magic));
        }

        let prg_pages = data[4];
        if prg_pages == 0 {
            return Err(RomError::EmptyPrgRom);
        }
        if prg_pages > 2 {
            return Err(RomError::PrgRomTooLarge(prg_pages));
        }

        Ok(Self {
            prg_rom_size: prg_pages as usize * 16 * 1024,
            chr_rom_size: data[5] as usize * 8 * 1024,
        })
    }
}

/// A loaded iNES ROM.
#[derive(Debug, Clone)]
pub struct Rom {
    /// Header information.
    pub header: RomHeader,
    /// PRG-ROM payload (program code and vectors).
    pub prg_rom: Vec<u8>,
    /// CHR-ROM payload (pattern tables); empty when the board uses CHR-RAM.
    pub chr_rom: Vec<u8>,
}

impl Rom {
    /// Load a ROM from raw file bytes.
    ///
    /// # Errors
    ///
    /// Returns [`RomError`] when the header is malformed or the payload is
    /// shorter than the header declares.
    pub fn load(data: &[u8]) -> Result<Self, RomError> {
        let header = RomHeader::parse(data)?;

        let expected = 16 + header.prg_rom_size + header.chr_rom_size;
        if data.len() < expected {
            return Err(RomError::Truncated {
                expected,
                actual: data.len(),
            });
        }

        let prg_rom = data[16..16 + header.prg_rom_size].to_vec();
        let chr_start = 16 + header.prg_rom_size;
        let chr_rom = data[chr_start..chr_start + header.chr_rom_size].to_vec();

        log::info!(
            "loaded iNES image: PRG {} KiB, CHR {} KiB",
            header.prg_rom_size / 1024,
            header.chr_rom_size / 1024,
        );

        Ok(Self {
            header,
            prg_rom,
            chr_rom,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(prg_pages: u8, chr_pages: u8) -> Vec<u8> {
        let mut data = vec![0x4E, 0x45, 0x53, 0x1A, prg_pages, chr_pages];
        data.resize(16, 0);
        data.resize(
            16 + prg_pages as usize * 16384 + chr_pages as usize * 8192,
            0,
        );
        data
    }

    #[test]
    fn parses_valid_image() {
        let rom = Rom::load(&image(2, 1)).unwrap();
        assert_eq!(rom.header.prg_rom_size, 32768);
        assert_eq!(rom.header.chr_rom_size, 8192);
        assert_eq!(rom.prg_rom.len(), 32768);
        assert_eq!(rom.chr_rom.len(), 8192);
    }

    #[test]
    fn chr_ram_image_has_no_chr_payload() {
        let rom = Rom::load(&image(1, 0)).unwrap();
        assert_eq!(rom.header.chr_rom_size, 0);
        assert!(rom.chr_rom.is_empty());
    }

    #[test]
    fn rejects_short_file() {
        let err = RomHeader::parse(&[0x4E, 0x45, 0x53]).unwrap_err();
        assert!(matches!(err, RomError::FileTooSmall(3)));
    }

    #[test]
    fn rejects_bad_magic() {
        let mut data = image(1, 0);
        data[0] = 0x00;
        let err = Rom::load(&data).unwrap_err();
        assert!(matches!(err, RomError::InvalidMagic(_)));
    }

    #[test]
    fn rejects_empty_prg() {
        let mut data = image(1, 0);
        data[4] = 0;
        let err = Rom::load(&data).unwrap_err();
        assert!(matches!(err, RomError::EmptyPrgRom));
    }

    #[test]
    fn rejects_oversized_prg() {
        let mut data = image(1, 0);
        data[4] = 3;
        let err = Rom::load(&data).unwrap_err();
        assert!(matches!(err, RomError::PrgRomTooLarge(3)));
    }

    #[test]
    fn rejects_truncated_payload() {
        let mut data = image(2, 1);
        data.truncate(2000);
        let err = Rom::load(&data).unwrap_err();
        assert!(matches!(err, RomError::Truncated { .. }));
    }
}
