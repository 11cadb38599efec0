//! 6502 CPU core.
//!
//! Register file, stack discipline, effective-address resolution, the
//! instruction executor and the NMI/IRQ dispatch sequence. Execution is
//! instruction-grained: one [`Cpu::step`] runs one instruction (or one
//! interrupt sequence) and settles the cycle counter before returning, so a
//! partially executed instruction is never observable.

use crate::addressing::{AddrMode, Resolved};
use crate::bus::Bus;
use crate::opcodes::{Mnemonic, Opcode, OPCODE_TABLE};
use crate::status::Status;
use crate::{vectors, CpuError, Result};

/// NES 6502 CPU (Ricoh 2A03 core: no decimal mode).
///
/// All timing is table-driven: each opcode's base cost plus the documented
/// page-cross and branch-taken penalties.
#[derive(Debug)]
pub struct Cpu {
    /// Accumulator.
    pub a: u8,
    /// X index register.
    pub x: u8,
    /// Y index register.
    pub y: u8,
    /// Program counter.
    pub pc: u16,
    /// Stack pointer; the next free slot at `$0100 | sp`.
    pub sp: u8,
    /// Status flags.
    pub status: Status,
    /// Total cycles executed since reset.
    pub cycles: u64,
    /// NMI line, edge-triggered; cleared when the interrupt is serviced.
    nmi_pending: bool,
    /// IRQ line, level-triggered; masked by the I flag.
    irq_pending: bool,
}

impl Cpu {
    /// Create a new CPU in power-on state. Call [`Cpu::reset`] once the bus
    /// has a ROM mapped before stepping.
    #[must_use]
    pub fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            pc: 0,
            sp: 0xFD,
            status: Status::POWER_ON,
            cycles: 0,
            nmi_pending: false,
            irq_pending: false,
        }
    }

    /// Reset the CPU: `SP = $FD`, `P = I | U`, PC from the RESET vector at
    /// `$FFFC/$FFFD`, cycle counter and interrupt lines cleared.
    pub fn reset(&mut self, bus: &mut impl Bus) {
        self.sp = 0xFD;
        self.status = Status::POWER_ON;
        self.pc = bus.read_u16(vectors::RESET);
        self.cycles = 0;
        self.nmi_pending = false;
        self.irq_pending = false;
        log::debug!("reset: pc=${:04X}", self.pc);
    }

    /// Execute one instruction (or dispatch one pending interrupt) and
    /// return the cycles it took.
    ///
    /// # Errors
    ///
    /// Returns [`CpuError::UndefinedOpcode`] when the fetched byte has no
    /// documented decoding; the register file is left untouched so the
    /// caller can report the faulting PC.
    pub fn step(&mut self, bus: &mut impl Bus) -> Result<u8> {
        // NMI wins over IRQ and is checked only at instruction boundaries.
        if self.nmi_pending {
            self.nmi_pending = false;
            return Ok(self.interrupt(bus, vectors::NMI));
        }

        if self.irq_pending && !self.status.contains(Status::I) {
            return Ok(self.interrupt(bus, vectors::IRQ));
        }

        let pc = self.pc;
        let opcode = bus.read(pc);
        let Some(op) = OPCODE_TABLE[opcode as usize] else {
            log::warn!("undefined opcode ${opcode:02X} at ${pc:04X}");
            return Err(CpuError::UndefinedOpcode { opcode, pc });
        };
        self.pc = self.pc.wrapping_add(1);

        let extra = self.execute(bus, op);
        let total = op.cycles + extra;
        self.cycles += u64::from(total);
        Ok(total)
    }

    /// Raise the NMI line. Edge-triggered: latched until the next
    /// instruction boundary, where it is serviced and cleared.
    pub fn request_nmi(&mut self) {
        self.nmi_pending = true;
    }

    /// Set the IRQ line level. Serviced at instruction boundaries while the
    /// line is high and the I flag is clear.
    pub fn set_irq(&mut self, active: bool) {
        self.irq_pending = active;
    }

    /// Whether an NMI is latched and not yet serviced.
    #[must_use]
    pub fn nmi_pending(&self) -> bool {
        self.nmi_pending
    }

    // =======================================================================
    // Stack
    // =======================================================================

    /// Push a byte; `sp` denotes the next free slot, so write then
    /// decrement.
    pub(crate) fn push(&mut self, bus: &mut impl Bus, value: u8) {
        bus.write(0x0100 | u16::from(self.sp), value);
        self.sp = self.sp.wrapping_sub(1);
    }

    /// Pull a byte; increment then read.
    pub(crate) fn pull(&mut self, bus: &mut impl Bus) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        bus.read(0x0100 | u16::from(self.sp))
    }

    /// Push a word, high byte first.
    pub(crate) fn push_u16(&mut self, bus: &mut impl Bus, value: u16) {
        self.push(bus, (value >> 8) as u8);
        self.push(bus, (value & 0xFF) as u8);
    }

    /// Pull a word, low byte first.
    pub(crate) fn pull_u16(&mut self, bus: &mut impl Bus) -> u16 {
        let lo = self.pull(bus);
        let hi = self.pull(bus);
        u16::from_le_bytes([lo, hi])
    }

    // =======================================================================
    // Operand fetch
    // =======================================================================

    fn fetch_byte(&mut self, bus: &mut impl Bus) -> u8 {
        let value = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        value
    }

    fn fetch_word(&mut self, bus: &mut impl Bus) -> u16 {
        let lo = self.fetch_byte(bus);
        let hi = self.fetch_byte(bus);
        u16::from_le_bytes([lo, hi])
    }

    /// Resolve the effective address for `mode`, consuming the operand
    /// bytes at PC exactly once. The page-cross flag is derived from the
    /// base/effective pair here, so penalty accounting never re-reads the
    /// instruction stream.
    fn effective_addr(&mut self, bus: &mut impl Bus, mode: AddrMode) -> Resolved {
        match mode {
            AddrMode::Imm => {
                let addr = self.pc;
                self.pc = self.pc.wrapping_add(1);
                Resolved::at(addr)
            }
            AddrMode::Zp0 => Resolved::at(u16::from(self.fetch_byte(bus))),
            AddrMode::Zpx => {
                let zp = self.fetch_byte(bus).wrapping_add(self.x);
                Resolved::at(u16::from(zp))
            }
            AddrMode::Zpy => {
                let zp = self.fetch_byte(bus).wrapping_add(self.y);
                Resolved::at(u16::from(zp))
            }
            AddrMode::Abs => Resolved::at(self.fetch_word(bus)),
            AddrMode::Abx => {
                let base = self.fetch_word(bus);
                Self::indexed(base, self.x)
            }
            AddrMode::Aby => {
                let base = self.fetch_word(bus);
                Self::indexed(base, self.y)
            }
            AddrMode::Ind => {
                // JMP only. The pointer's high byte never leaves its page.
                let ptr = self.fetch_word(bus);
                Resolved::at(bus.read_u16_wrap(ptr))
            }
            AddrMode::Idx => {
                let zp = self.fetch_byte(bus).wrapping_add(self.x);
                Resolved::at(bus.read_u16_wrap(u16::from(zp)))
            }
            AddrMode::Idy => {
                let zp = self.fetch_byte(bus);
                let base = bus.read_u16_wrap(u16::from(zp));
                Self::indexed(base, self.y)
            }
            AddrMode::Imp | AddrMode::Acc | AddrMode::Rel => {
                unreachable!("{mode:?} has no effective address")
            }
        }
    }

    fn indexed(base: u16, index: u8) -> Resolved {
        let addr = base.wrapping_add(u16::from(index));
        Resolved {
            addr,
            page_crossed: (base & 0xFF00) != (addr & 0xFF00),
        }
    }

    /// Fetch the operand value for a read-class instruction. Returns the
    /// value and the page-cross penalty cycles (0 or 1) for this opcode.
    fn read_operand(&mut self, bus: &mut impl Bus, op: Opcode) -> (u8, u8) {
        if op.mode == AddrMode::Imm {
            return (self.fetch_byte(bus), 0);
        }
        let resolved = self.effective_addr(bus, op.mode);
        let value = bus.read(resolved.addr);
        (value, u8::from(op.page_penalty && resolved.page_crossed))
    }

    // =======================================================================
    // Execution
    // =======================================================================

    /// Execute one decoded opcode; returns extra cycles beyond the table
    /// base cost.
    #[allow(clippy::too_many_lines)]
    fn execute(&mut self, bus: &mut impl Bus, op: Opcode) -> u8 {
        use Mnemonic::{
            Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Clc, Cld, Cli, Clv,
            Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Jmp, Jsr, Lda, Ldx, Ldy, Lsr, Nop,
            Ora, Pha, Php, Pla, Plp, Rol, Ror, Rti, Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax,
            Tay, Tsx, Txa, Txs, Tya,
        };

        match op.mnemonic {
            // Loads
            Lda => {
                let (value, extra) = self.read_operand(bus, op);
                self.a = value;
                self.status.set_zn(value);
                extra
            }
            Ldx => {
                let (value, extra) = self.read_operand(bus, op);
                self.x = value;
                self.status.set_zn(value);
                extra
            }
            Ldy => {
                let (value, extra) = self.read_operand(bus, op);
                self.y = value;
                self.status.set_zn(value);
                extra
            }

            // Stores (no flags, no page penalty)
            Sta => {
                let addr = self.effective_addr(bus, op.mode).addr;
                bus.write(addr, self.a);
                0
            }
            Stx => {
                let addr = self.effective_addr(bus, op.mode).addr;
                bus.write(addr, self.x);
                0
            }
            Sty => {
                let addr = self.effective_addr(bus, op.mode).addr;
                bus.write(addr, self.y);
                0
            }

            // Transfers
            Tax => {
                self.x = self.a;
                self.status.set_zn(self.x);
                0
            }
            Tay => {
                self.y = self.a;
                self.status.set_zn(self.y);
                0
            }
            Txa => {
                self.a = self.x;
                self.status.set_zn(self.a);
                0
            }
            Tya => {
                self.a = self.y;
                self.status.set_zn(self.a);
                0
            }
            Tsx => {
                self.x = self.sp;
                self.status.set_zn(self.x);
                0
            }
            Txs => {
                // The only transfer that leaves the flags alone.
                self.sp = self.x;
                0
            }

            // Arithmetic
            Adc => {
                let (value, extra) = self.read_operand(bus, op);
                self.add(value);
                extra
            }
            Sbc => {
                // SBC is ADC of the one's complement; carry means no borrow.
                let (value, extra) = self.read_operand(bus, op);
                self.add(!value);
                extra
            }

            // Logic
            And => {
                let (value, extra) = self.read_operand(bus, op);
                self.a &= value;
                self.status.set_zn(self.a);
                extra
            }
            Ora => {
                let (value, extra) = self.read_operand(bus, op);
                self.a |= value;
                self.status.set_zn(self.a);
                extra
            }
            Eor => {
                let (value, extra) = self.read_operand(bus, op);
                self.a ^= value;
                self.status.set_zn(self.a);
                extra
            }
            Bit => {
                let (value, extra) = self.read_operand(bus, op);
                self.status.set(Status::Z, self.a & value == 0);
                self.status.set(Status::V, value & 0x40 != 0);
                self.status.set(Status::N, value & 0x80 != 0);
                extra
            }

            // Shifts/rotates (accumulator or memory)
            Asl => self.modify(bus, op.mode, Self::asl_value),
            Lsr => self.modify(bus, op.mode, Self::lsr_value),
            Rol => self.modify(bus, op.mode, Self::rol_value),
            Ror => self.modify(bus, op.mode, Self::ror_value),

            // Increment/decrement
            Inc => self.modify(bus, op.mode, Self::inc_value),
            Dec => self.modify(bus, op.mode, Self::dec_value),
            Inx => {
                self.x = self.x.wrapping_add(1);
                self.status.set_zn(self.x);
                0
            }
            Iny => {
                self.y = self.y.wrapping_add(1);
                self.status.set_zn(self.y);
                0
            }
            Dex => {
                self.x = self.x.wrapping_sub(1);
                self.status.set_zn(self.x);
                0
            }
            Dey => {
                self.y = self.y.wrapping_sub(1);
                self.status.set_zn(self.y);
                0
            }

            // Compares
            Cmp => {
                let (value, extra) = self.read_operand(bus, op);
                self.compare(self.a, value);
                extra
            }
            Cpx => {
                let (value, extra) = self.read_operand(bus, op);
                self.compare(self.x, value);
                extra
            }
            Cpy => {
                let (value, extra) = self.read_operand(bus, op);
                self.compare(self.y, value);
                extra
            }

            // Branches
            Bcc => self.branch(bus, !self.status.contains(Status::C)),
            Bcs => self.branch(bus, self.status.contains(Status::C)),
            Bne => self.branch(bus, !self.status.contains(Status::Z)),
            Beq => self.branch(bus, self.status.contains(Status::Z)),
            Bpl => self.branch(bus, !self.status.contains(Status::N)),
            Bmi => self.branch(bus, self.status.contains(Status::N)),
            Bvc => self.branch(bus, !self.status.contains(Status::V)),
            Bvs => self.branch(bus, self.status.contains(Status::V)),

            // Jumps and subroutines
            Jmp => {
                self.pc = self.effective_addr(bus, op.mode).addr;
                0
            }
            Jsr => {
                let target = self.fetch_word(bus);
                // Return address is the last byte of the JSR instruction;
                // RTS adds the 1 back.
                self.push_u16(bus, self.pc.wrapping_sub(1));
                self.pc = target;
                0
            }
            Rts => {
                self.pc = self.pull_u16(bus).wrapping_add(1);
                0
            }
            Rti => {
                let pulled = self.pull(bus);
                self.status = Status::from_stack_byte(pulled);
                self.pc = self.pull_u16(bus);
                0
            }
            Brk => {
                // The byte after BRK is padding; skip it before pushing.
                self.pc = self.pc.wrapping_add(1);
                self.push_u16(bus, self.pc);
                self.push(bus, self.status.to_stack_byte(true));
                self.status.insert(Status::I);
                self.pc = bus.read_u16(vectors::IRQ);
                0
            }

            // Stack
            Pha => {
                self.push(bus, self.a);
                0
            }
            Php => {
                let byte = self.status.to_stack_byte(true);
                self.push(bus, byte);
                0
            }
            Pla => {
                self.a = self.pull(bus);
                self.status.set_zn(self.a);
                0
            }
            Plp => {
                let pulled = self.pull(bus);
                self.status = Status::from_stack_byte(pulled);
                0
            }

            // Flags
            Clc => {
                self.status.remove(Status::C);
                0
            }
            Sec => {
                self.status.insert(Status::C);
                0
            }
            Cli => {
                self.status.remove(Status::I);
                0
            }
            Sei => {
                self.status.insert(Status::I);
                0
            }
            Clv => {
                self.status.remove(Status::V);
                0
            }
            Cld => {
                self.status.remove(Status::D);
                0
            }
            Sed => {
                self.status.insert(Status::D);
                0
            }

            Nop => 0,
        }
    }

    /// Shared ADC core; also serves SBC with the operand inverted.
    ///
    /// The D flag is ignored: the 2A03 has no BCD unit.
    fn add(&mut self, value: u8) {
        let carry = u16::from(self.status.contains(Status::C));
        let sum = u16::from(self.a) + u16::from(value) + carry;
        let result = sum as u8;

        self.status.set(Status::C, sum > 0xFF);
        // Signed overflow: both inputs share a sign the result lacks.
        self.status.set(
            Status::V,
            (self.a ^ result) & (value ^ result) & 0x80 != 0,
        );
        self.a = result;
        self.status.set_zn(result);
    }

    /// CMP/CPX/CPY: 9-bit subtract for the carry, Z/N from the difference.
    fn compare(&mut self, register: u8, value: u8) {
        let diff = register.wrapping_sub(value);
        self.status.set(Status::C, register >= value);
        self.status.set_zn(diff);
    }

    /// Shared branch body. Consumes the displacement, then pays +1 when
    /// taken and +1 more when the target sits on a different page than the
    /// PC after the operand fetch.
    fn branch(&mut self, bus: &mut impl Bus, condition: bool) -> u8 {
        let offset = self.fetch_byte(bus) as i8;
        if !condition {
            return 0;
        }
        let target = self.pc.wrapping_add(offset as u16);
        let extra = if (self.pc & 0xFF00) == (target & 0xFF00) {
            1
        } else {
            2
        };
        self.pc = target;
        extra
    }

    /// Apply a read-modify-write operation to the accumulator or to memory,
    /// depending on the addressing mode.
    fn modify(&mut self, bus: &mut impl Bus, mode: AddrMode, f: fn(&mut Self, u8) -> u8) -> u8 {
        if mode == AddrMode::Acc {
            let value = self.a;
            self.a = f(self, value);
        } else {
            let addr = self.effective_addr(bus, mode).addr;
            let value = bus.read(addr);
            let result = f(self, value);
            bus.write(addr, result);
        }
        0
    }

    fn asl_value(&mut self, value: u8) -> u8 {
        self.status.set(Status::C, value & 0x80 != 0);
        let result = value << 1;
        self.status.set_zn(result);
        result
    }

    fn lsr_value(&mut self, value: u8) -> u8 {
        self.status.set(Status::C, value & 0x01 != 0);
        let result = value >> 1;
        // Bit 7 is always 0 after LSR, so N always clears.
        self.status.set_zn(result);
        result
    }

    fn rol_value(&mut self, value: u8) -> u8 {
        let carry_in = u8::from(self.status.contains(Status::C));
        self.status.set(Status::C, value & 0x80 != 0);
        let result = (value << 1) | carry_in;
        self.status.set_zn(result);
        result
    }

    fn ror_value(&mut self, value: u8) -> u8 {
        let carry_in = u8::from(self.status.contains(Status::C)) << 7;
        self.status.set(Status::C, value & 0x01 != 0);
        let result = (value >> 1) | carry_in;
        self.status.set_zn(result);
        result
    }

    fn inc_value(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.status.set_zn(result);
        result
    }

    fn dec_value(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.status.set_zn(result);
        result
    }

    /// Interrupt entry shared by NMI and IRQ: push PC then status with B
    /// clear, mask further IRQs, load the vector. Always 7 cycles.
    fn interrupt(&mut self, bus: &mut impl Bus, vector: u16) -> u8 {
        self.push_u16(bus, self.pc);
        self.push(bus, self.status.to_stack_byte(false));
        self.status.insert(Status::I);
        self.pc = bus.read_u16(vector);
        self.cycles += 7;
        7
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}
