//! PPU status register ($2002).
//!
//! Read-only from the CPU side. Reading it has side effects: the VBlank
//! flag clears and the shared `$2005/$2006` write latch resets.

use bitflags::bitflags;

bitflags! {
    /// PPU status register flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Status: u8 {
        /// Sprite overflow. Stored but never raised by the shim.
        const SPRITE_OVERFLOW = 1 << 5;
        /// Sprite 0 hit. Stored but never raised by the shim.
        const SPRITE_ZERO_HIT = 1 << 6;
        /// VBlank flag - set when the frame driver signals vertical blank,
        /// cleared by reading $2002 or by the pre-frame clear.
        const VBLANK = 1 << 7;
    }
}

impl Status {
    /// Whether the VBlank flag is set.
    #[must_use]
    #[inline]
    pub const fn in_vblank(self) -> bool {
        self.contains(Self::VBLANK)
    }
}
