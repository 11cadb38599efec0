//! CPU status register (P) flags.
//!
//! ```text
//! 7  6  5  4  3  2  1  0
//! N  V  U  B  D  I  Z  C
//! │  │  │  │  │  │  │  └─ Carry
//! │  │  │  │  │  │  └──── Zero
//! │  │  │  │  │  └─────── Interrupt Disable
//! │  │  │  │  └────────── Decimal (settable, ignored by 2A03 arithmetic)
//! │  │  │  └───────────── Break (1 when pushed from PHP/BRK, 0 from IRQ/NMI)
//! │  │  └──────────────── Unused (always 1 when pushed to stack)
//! │  └─────────────────── Overflow
//! └────────────────────── Negative
//! ```
//!
//! B and U are virtual: they only exist in the byte pushed onto the stack.
//! In the register proper U stays set and B stays clear, which is what
//! [`Status::from_stack_byte`] enforces on every pull.

use bitflags::bitflags;

bitflags! {
    /// CPU status register flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Status: u8 {
        /// Carry flag.
        const C = 1 << 0;

        /// Zero flag - set if the result of the last operation was zero.
        const Z = 1 << 1;

        /// Interrupt Disable flag - when set, IRQ is masked (NMI is not).
        const I = 1 << 2;

        /// Decimal Mode flag - the 2A03 has no BCD unit, but the bit
        /// still latches.
        const D = 1 << 3;

        /// Break flag - only meaningful in the pushed byte.
        const B = 1 << 4;

        /// Unused flag - always 1 in the pushed byte.
        const U = 1 << 5;

        /// Overflow flag - set on signed overflow.
        const V = 1 << 6;

        /// Negative flag - set if bit 7 of the result is set.
        const N = 1 << 7;
    }
}

impl Status {
    /// Status after power-on and reset: I set, U set (`0b0010_0100`).
    pub const POWER_ON: Self = Self::I.union(Self::U);

    /// Creates a new status register in the power-on state.
    #[must_use]
    pub const fn new() -> Self {
        Self::POWER_ON
    }

    /// Sets or clears the Zero and Negative flags from a result byte.
    #[inline]
    pub fn set_zn(&mut self, value: u8) {
        self.set(Self::Z, value == 0);
        self.set(Self::N, value & 0x80 != 0);
    }

    /// Converts the register to the byte pushed onto the stack.
    ///
    /// U is always set in the pushed byte; B is set only for PHP and BRK.
    #[inline]
    #[must_use]
    pub const fn to_stack_byte(self, brk: bool) -> u8 {
        let mut value = self.bits() | Self::U.bits();
        if brk {
            value |= Self::B.bits();
        }
        value
    }

    /// Builds the register from a byte pulled off the stack.
    ///
    /// B is discarded and U is forced on, so PLP and RTI leave the virtual
    /// bits untouched.
    #[inline]
    #[must_use]
    pub fn from_stack_byte(value: u8) -> Self {
        Self::from_bits_truncate((value & !Self::B.bits()) | Self::U.bits())
    }
}
