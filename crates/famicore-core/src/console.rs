//! Console front-end: CPU + bus wiring and the frame driver.

use famicore_cpu::{Bus, Cpu, CpuError};
use famicore_ppu::Ppu;

use crate::bus::NesBus;
use crate::cartridge::Cartridge;
use crate::rom::{Rom, RomError};

/// NTSC timing constants.
pub mod timing {
    /// Master clock frequency (NTSC).
    pub const MASTER_CLOCK_NTSC: u32 = 21_477_272;
    /// CPU clock frequency (NTSC).
    pub const CPU_CLOCK_NTSC: u32 = MASTER_CLOCK_NTSC / 12;
    /// CPU cycles in one NTSC frame; the frame driver's vblank budget.
    pub const CPU_CYCLES_PER_FRAME: u32 = 29_780;
}

/// Errors surfaced by the console front-end.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// The ROM image was rejected at load time.
    #[error("ROM error: {0}")]
    Rom(#[from] RomError),

    /// The CPU hit a fatal condition while stepping.
    #[error("CPU error: {0}")]
    Cpu(#[from] CpuError),
}

/// The emulated console: CPU, bus, and the per-frame driver loop.
///
/// # Usage
///
/// ```no_run
/// use famicore_core::Console;
///
/// let rom_data = std::fs::read("game.nes").unwrap();
/// let mut console = Console::new(&rom_data).unwrap();
/// console.reset();
///
/// loop {
///     console.set_controller(0x00); // host-polled button byte
///     console.run_frame().unwrap();
/// }
/// ```
#[derive(Debug)]
pub struct Console {
    cpu: Cpu,
    bus: NesBus,
}

impl Console {
    /// Build a console from iNES file bytes. CHR-ROM, when present, is
    /// installed into the PPU's pattern-table region; a CHR-less image
    /// leaves that region as zeroed CHR-RAM.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Rom`] for malformed images.
    pub fn new(rom_data: &[u8]) -> Result<Self, ConsoleError> {
        let rom = Rom::load(rom_data)?;
        let cartridge = Cartridge::new(&rom);
        let mut ppu = Ppu::new();
        if !rom.chr_rom.is_empty() {
            ppu.load_chr(&rom.chr_rom);
        }

        Ok(Self {
            cpu: Cpu::new(),
            bus: NesBus::new(cartridge, ppu),
        })
    }

    /// Reset the whole machine: bus (RAM, PPU registers, controller latch)
    /// and then the CPU, which fetches the RESET vector from the cartridge.
    pub fn reset(&mut self) {
        self.bus.reset();
        self.cpu.reset(&mut self.bus);
    }

    /// Execute one instruction (or interrupt dispatch); returns its cycles.
    ///
    /// # Errors
    ///
    /// Propagates [`CpuError`] on an undefined opcode.
    pub fn step(&mut self) -> Result<u8, ConsoleError> {
        Ok(self.cpu.step(&mut self.bus)?)
    }

    /// Run one NTSC frame: clear VBlank for the new frame, step the CPU to
    /// the frame's cycle budget, then signal vertical blank - which raises
    /// NMI on the CPU when the ROM has enabled it in PPUCTRL.
    ///
    /// Returns the cycles actually executed this frame.
    ///
    /// # Errors
    ///
    /// Propagates [`CpuError`] on an undefined opcode.
    pub fn run_frame(&mut self) -> Result<u64, ConsoleError> {
        self.bus.ppu.clear_vblank();

        let target = self.cpu.cycles + u64::from(timing::CPU_CYCLES_PER_FRAME);
        let start = self.cpu.cycles;
        while self.cpu.cycles < target {
            self.cpu.step(&mut self.bus)?;
        }

        if self.bus.ppu.begin_vblank() {
            self.cpu.request_nmi();
        }

        Ok(self.cpu.cycles - start)
    }

    /// Set controller 1's button byte for the coming frame
    /// (bit 0 = A ... bit 7 = Right).
    pub fn set_controller(&mut self, buttons: u8) {
        self.bus.controller.set_buttons(buttons);
    }

    /// Peek CPU-visible memory without side effects.
    #[must_use]
    pub fn peek_memory(&self, addr: u16) -> u8 {
        self.bus.peek(addr)
    }

    /// The CPU, for state inspection.
    #[must_use]
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// Mutable CPU access, for tests and debuggers.
    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    /// The PPU shim, for state inspection.
    #[must_use]
    pub fn ppu(&self) -> &Ppu {
        &self.bus.ppu
    }

    /// The system bus.
    #[must_use]
    pub fn bus(&self) -> &NesBus {
        &self.bus
    }

    /// Mutable bus access, for tests and debuggers.
    pub fn bus_mut(&mut self) -> &mut NesBus {
        &mut self.bus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A 32 KiB NROM image of NOPs with the reset vector at $8000.
    fn nop_rom() -> Vec<u8> {
        let mut data = vec![0x4E, 0x45, 0x53, 0x1A, 2, 0];
        data.resize(16, 0);
        let mut prg = vec![0xEA; 32768];
        prg[0x7FFC] = 0x00;
        prg[0x7FFD] = 0x80;
        data.extend_from_slice(&prg);
        data
    }

    #[test]
    fn boots_from_reset_vector() {
        let mut console = Console::new(&nop_rom()).unwrap();
        console.reset();
        assert_eq!(console.cpu().pc, 0x8000);
        assert_eq!(console.cpu().sp, 0xFD);
        assert_eq!(console.cpu().cycles, 0);
    }

    #[test]
    fn step_advances_cycles() {
        let mut console = Console::new(&nop_rom()).unwrap();
        console.reset();

        let cycles = console.step().unwrap();
        assert_eq!(cycles, 2);
        assert_eq!(console.cpu().cycles, 2);
        assert_eq!(console.cpu().pc, 0x8001);
    }

    #[test]
    fn run_frame_meets_the_cycle_budget() {
        let mut console = Console::new(&nop_rom()).unwrap();
        console.reset();

        let executed = console.run_frame().unwrap();
        assert!(executed >= u64::from(timing::CPU_CYCLES_PER_FRAME));
        // NOPs are 2 cycles, so overshoot stays below one instruction.
        assert!(executed < u64::from(timing::CPU_CYCLES_PER_FRAME) + 2);
        assert!(console.ppu().in_vblank(), "frame ends inside vblank");
    }

    #[test]
    fn rejects_malformed_rom() {
        let err = Console::new(&[0u8; 4]).unwrap_err();
        assert!(matches!(err, ConsoleError::Rom(_)));
    }
}
