//! PPU control register ($2000).
//!
//! ```text
//! 7  6  5  4  3  2  1  0
//! V  P  H  B  S  I  N  N
//! |  |  |  |  |  |  +--+-- Base nametable address
//! |  |  |  |  |  +-------- VRAM address increment (0: add 1; 1: add 32)
//! |  |  |  |  +----------- Sprite pattern table address
//! |  |  |  +-------------- Background pattern table address
//! |  |  +----------------- Sprite size
//! |  +-------------------- PPU master/slave select
//! +----------------------- Generate an NMI at the start of vblank
//! ```
//!
//! The shim stores every bit but only interprets the two the CPU-facing
//! register protocol depends on: NMI enable and the VRAM increment step.

use bitflags::bitflags;

bitflags! {
    /// PPU control register flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Ctrl: u8 {
        /// Base nametable address bit 0.
        const NAMETABLE_LO = 1 << 0;
        /// Base nametable address bit 1.
        const NAMETABLE_HI = 1 << 1;
        /// VRAM address increment mode (0: add 1, 1: add 32).
        const VRAM_INCREMENT = 1 << 2;
        /// Sprite pattern table address for 8x8 sprites.
        const SPRITE_PATTERN = 1 << 3;
        /// Background pattern table address.
        const BG_PATTERN = 1 << 4;
        /// Sprite size (0: 8x8, 1: 8x16).
        const SPRITE_SIZE = 1 << 5;
        /// PPU master/slave select.
        const MASTER_SLAVE = 1 << 6;
        /// NMI enable at start of VBlank.
        const NMI_ENABLE = 1 << 7;
    }
}

impl Ctrl {
    /// The `$2007` address increment selected by bit 2: 1 (across) or 32
    /// (down).
    #[must_use]
    #[inline]
    pub const fn vram_increment(self) -> u16 {
        if self.contains(Self::VRAM_INCREMENT) {
            32
        } else {
            1
        }
    }

    /// Whether vertical blank raises NMI.
    #[must_use]
    #[inline]
    pub const fn nmi_enabled(self) -> bool {
        self.contains(Self::NMI_ENABLE)
    }
}
