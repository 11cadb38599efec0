//! Famicore - NES emulation core integration layer.
//!
//! This crate wires the 6502 interpreter and the PPU register shim to a
//! system bus, an NROM cartridge and the controller latch, and exposes the
//! [`Console`] front-end that hosts drive frame by frame.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                      Console                          │
//! │  ┌─────────────────────────────────────────────────┐  │
//! │  │                    NesBus                       │  │
//! │  │  ┌─────┐  ┌─────┐  ┌───────────┐  ┌──────────┐ │  │
//! │  │  │ RAM │  │ PPU │  │ Cartridge │  │ Controller│ │  │
//! │  │  │ 2KB │  │shim │  │   NROM    │  │   latch  │ │  │
//! │  │  └─────┘  └─────┘  └───────────┘  └──────────┘ │  │
//! │  └─────────────────────────────────────────────────┘  │
//! │                         ▲                             │
//! │                    ┌────┴────┐                        │
//! │                    │   CPU   │                        │
//! │                    │  6502   │                        │
//! │                    └─────────┘                        │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! The CPU reaches everything through the [`famicore_cpu::Bus`] trait; the
//! frame driver in [`Console::run_frame`] owns the CPU-stepping /
//! VBlank-signalling loop and forwards the PPU's NMI request to the CPU.

mod bus;
mod cartridge;
mod console;
mod input;
mod rom;

pub use bus::NesBus;
pub use cartridge::Cartridge;
pub use console::{timing, Console, ConsoleError};
pub use input::{Button, Controller};
pub use rom::{Rom, RomError, RomHeader};

// Re-export the component crates' primary types.
pub use famicore_cpu::{Bus, Cpu, CpuError, Status};
pub use famicore_ppu::Ppu;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_constants() {
        assert_eq!(timing::MASTER_CLOCK_NTSC, 21_477_272);
        assert_eq!(timing::CPU_CLOCK_NTSC, 1_789_772);
        assert_eq!(timing::CPU_CYCLES_PER_FRAME, 29_780);
    }

    #[test]
    fn button_masks_cover_the_byte() {
        let all = Button::A as u8
            | Button::B as u8
            | Button::Select as u8
            | Button::Start as u8
            | Button::Up as u8
            | Button::Down as u8
            | Button::Left as u8
            | Button::Right as u8;
        assert_eq!(all, 0xFF);
    }
}
