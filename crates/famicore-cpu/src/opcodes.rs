//! Opcode decode table for the documented 6502 instruction set.
//!
//! A flat 256-entry table maps each opcode byte to its mnemonic, addressing
//! mode, base cycle cost and page-cross eligibility. The 105 undocumented
//! opcodes decode to `None` and are fatal at step time.

use crate::addressing::AddrMode;

/// Instruction mnemonics of the documented 6502 instruction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)] // The names are the documentation.
pub enum Mnemonic {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Clc,
    Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Jmp,
    Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp, Rol, Ror, Rti,
    Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya,
}

impl Mnemonic {
    /// Three-letter assembler name, for error messages and disassembly.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Adc => "ADC", Self::And => "AND", Self::Asl => "ASL",
            Self::Bcc => "BCC", Self::Bcs => "BCS", Self::Beq => "BEQ",
            Self::Bit => "BIT", Self::Bmi => "BMI", Self::Bne => "BNE",
            Self::Bpl => "BPL", Self::Brk => "BRK", Self::Bvc => "BVC",
            Self::Bvs => "BVS", Self::Clc => "CLC", Self::Cld => "CLD",
            Self::Cli => "CLI", Self::Clv => "CLV", Self::Cmp => "CMP",
            Self::Cpx => "CPX", Self::Cpy => "CPY", Self::Dec => "DEC",
            Self::Dex => "DEX", Self::Dey => "DEY", Self::Eor => "EOR",
            Self::Inc => "INC", Self::Inx => "INX", Self::Iny => "INY",
            Self::Jmp => "JMP", Self::Jsr => "JSR", Self::Lda => "LDA",
            Self::Ldx => "LDX", Self::Ldy => "LDY", Self::Lsr => "LSR",
            Self::Nop => "NOP", Self::Ora => "ORA", Self::Pha => "PHA",
            Self::Php => "PHP", Self::Pla => "PLA", Self::Plp => "PLP",
            Self::Rol => "ROL", Self::Ror => "ROR", Self::Rti => "RTI",
            Self::Rts => "RTS", Self::Sbc => "SBC", Self::Sec => "SEC",
            Self::Sed => "SED", Self::Sei => "SEI", Self::Sta => "STA",
            Self::Stx => "STX", Self::Sty => "STY", Self::Tax => "TAX",
            Self::Tay => "TAY", Self::Tsx => "TSX", Self::Txa => "TXA",
            Self::Txs => "TXS", Self::Tya => "TYA",
        }
    }
}

/// One decoded opcode table entry.
#[derive(Debug, Clone, Copy)]
pub struct Opcode {
    /// Instruction mnemonic.
    pub mnemonic: Mnemonic,
    /// Addressing mode.
    pub mode: AddrMode,
    /// Base cycle cost.
    pub cycles: u8,
    /// Whether a page-crossing read adds one cycle. Only read-class
    /// `abs,X`/`abs,Y`/`(zp),Y` opcodes carry this; branch penalties are
    /// handled by the branch logic itself.
    pub page_penalty: bool,
}

const fn op(mnemonic: Mnemonic, mode: AddrMode, cycles: u8) -> Option<Opcode> {
    Some(Opcode {
        mnemonic,
        mode,
        cycles,
        page_penalty: false,
    })
}

const fn op_pc(mnemonic: Mnemonic, mode: AddrMode, cycles: u8) -> Option<Opcode> {
    Some(Opcode {
        mnemonic,
        mode,
        cycles,
        page_penalty: true,
    })
}

#[allow(clippy::too_many_lines)]
const fn build_table() -> [Option<Opcode>; 256] {
    use AddrMode::{Abs, Abx, Aby, Acc, Idx, Idy, Imm, Imp, Ind, Rel, Zp0, Zpx, Zpy};
    use Mnemonic::{
        Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Clc, Cld, Cli, Clv, Cmp,
        Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Jmp, Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha,
        Php, Pla, Plp, Rol, Ror, Rti, Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay, Tsx, Txa,
        Txs, Tya,
    };

    let mut t: [Option<Opcode>; 256] = [None; 256];

    // Load/store
    t[0xA9] = op(Lda, Imm, 2);
    t[0xA5] = op(Lda, Zp0, 3);
    t[0xB5] = op(Lda, Zpx, 4);
    t[0xAD] = op(Lda, Abs, 4);
    t[0xBD] = op_pc(Lda, Abx, 4);
    t[0xB9] = op_pc(Lda, Aby, 4);
    t[0xA1] = op(Lda, Idx, 6);
    t[0xB1] = op_pc(Lda, Idy, 5);
    t[0xA2] = op(Ldx, Imm, 2);
    t[0xA6] = op(Ldx, Zp0, 3);
    t[0xB6] = op(Ldx, Zpy, 4);
    t[0xAE] = op(Ldx, Abs, 4);
    t[0xBE] = op_pc(Ldx, Aby, 4);
    t[0xA0] = op(Ldy, Imm, 2);
    t[0xA4] = op(Ldy, Zp0, 3);
    t[0xB4] = op(Ldy, Zpx, 4);
    t[0xAC] = op(Ldy, Abs, 4);
    t[0xBC] = op_pc(Ldy, Abx, 4);
    t[0x85] = op(Sta, Zp0, 3);
    t[0x95] = op(Sta, Zpx, 4);
    t[0x8D] = op(Sta, Abs, 4);
    t[0x9D] = op(Sta, Abx, 5);
    t[0x99] = op(Sta, Aby, 5);
    t[0x81] = op(Sta, Idx, 6);
    t[0x91] = op(Sta, Idy, 6);
    t[0x86] = op(Stx, Zp0, 3);
    t[0x96] = op(Stx, Zpy, 4);
    t[0x8E] = op(Stx, Abs, 4);
    t[0x84] = op(Sty, Zp0, 3);
    t[0x94] = op(Sty, Zpx, 4);
    t[0x8C] = op(Sty, Abs, 4);

    // Transfers
    t[0xAA] = op(Tax, Imp, 2);
    t[0xA8] = op(Tay, Imp, 2);
    t[0x8A] = op(Txa, Imp, 2);
    t[0x98] = op(Tya, Imp, 2);
    t[0xBA] = op(Tsx, Imp, 2);
    t[0x9A] = op(Txs, Imp, 2);

    // Stack
    t[0x48] = op(Pha, Imp, 3);
    t[0x08] = op(Php, Imp, 3);
    t[0x68] = op(Pla, Imp, 4);
    t[0x28] = op(Plp, Imp, 4);

    // Arithmetic
    t[0x69] = op(Adc, Imm, 2);
    t[0x65] = op(Adc, Zp0, 3);
    t[0x75] = op(Adc, Zpx, 4);
    t[0x6D] = op(Adc, Abs, 4);
    t[0x7D] = op_pc(Adc, Abx, 4);
    t[0x79] = op_pc(Adc, Aby, 4);
    t[0x61] = op(Adc, Idx, 6);
    t[0x71] = op_pc(Adc, Idy, 5);
    t[0xE9] = op(Sbc, Imm, 2);
    t[0xE5] = op(Sbc, Zp0, 3);
    t[0xF5] = op(Sbc, Zpx, 4);
    t[0xED] = op(Sbc, Abs, 4);
    t[0xFD] = op_pc(Sbc, Abx, 4);
    t[0xF9] = op_pc(Sbc, Aby, 4);
    t[0xE1] = op(Sbc, Idx, 6);
    t[0xF1] = op_pc(Sbc, Idy, 5);

    // Logic
    t[0x29] = op(And, Imm, 2);
    t[0x25] = op(And, Zp0, 3);
    t[0x35] = op(And, Zpx, 4);
    t[0x2D] = op(And, Abs, 4);
    t[0x3D] = op_pc(And, Abx, 4);
    t[0x39] = op_pc(And, Aby, 4);
    t[0x21] = op(And, Idx, 6);
    t[0x31] = op_pc(And, Idy, 5);
    t[0x09] = op(Ora, Imm, 2);
    t[0x05] = op(Ora, Zp0, 3);
    t[0x15] = op(Ora, Zpx, 4);
    t[0x0D] = op(Ora, Abs, 4);
    t[0x1D] = op_pc(Ora, Abx, 4);
    t[0x19] = op_pc(Ora, Aby, 4);
    t[0x01] = op(Ora, Idx, 6);
    t[0x11] = op_pc(Ora, Idy, 5);
    t[0x49] = op(Eor, Imm, 2);
    t[0x45] = op(Eor, Zp0, 3);
    t[0x55] = op(Eor, Zpx, 4);
    t[0x4D] = op(Eor, Abs, 4);
    t[0x5D] = op_pc(Eor, Abx, 4);
    t[0x59] = op_pc(Eor, Aby, 4);
    t[0x41] = op(Eor, Idx, 6);
    t[0x51] = op_pc(Eor, Idy, 5);
    t[0x24] = op(Bit, Zp0, 3);
    t[0x2C] = op(Bit, Abs, 4);

    // Shifts/rotates
    t[0x0A] = op(Asl, Acc, 2);
    t[0x06] = op(Asl, Zp0, 5);
    t[0x16] = op(Asl, Zpx, 6);
    t[0x0E] = op(Asl, Abs, 6);
    t[0x1E] = op(Asl, Abx, 7);
    t[0x4A] = op(Lsr, Acc, 2);
    t[0x46] = op(Lsr, Zp0, 5);
    t[0x56] = op(Lsr, Zpx, 6);
    t[0x4E] = op(Lsr, Abs, 6);
    t[0x5E] = op(Lsr, Abx, 7);
    t[0x2A] = op(Rol, Acc, 2);
    t[0x26] = op(Rol, Zp0, 5);
    t[0x36] = op(Rol, Zpx, 6);
    t[0x2E] = op(Rol, Abs, 6);
    t[0x3E] = op(Rol, Abx, 7);
    t[0x6A] = op(Ror, Acc, 2);
    t[0x66] = op(Ror, Zp0, 5);
    t[0x76] = op(Ror, Zpx, 6);
    t[0x6E] = op(Ror, Abs, 6);
    t[0x7E] = op(Ror, Abx, 7);

    // Increment/decrement
    t[0xE6] = op(Inc, Zp0, 5);
    t[0xF6] = op(Inc, Zpx, 6);
    t[0xEE] = op(Inc, Abs, 6);
    t[0xFE] = op(Inc, Abx, 7);
    t[0xC6] = op(Dec, Zp0, 5);
    t[0xD6] = op(Dec, Zpx, 6);
    t[0xCE] = op(Dec, Abs, 6);
    t[0xDE] = op(Dec, Abx, 7);
    t[0xE8] = op(Inx, Imp, 2);
    t[0xC8] = op(Iny, Imp, 2);
    t[0xCA] = op(Dex, Imp, 2);
    t[0x88] = op(Dey, Imp, 2);

    // Compares
    t[0xC9] = op(Cmp, Imm, 2);
    t[0xC5] = op(Cmp, Zp0, 3);
    t[0xD5] = op(Cmp, Zpx, 4);
    t[0xCD] = op(Cmp, Abs, 4);
    t[0xDD] = op_pc(Cmp, Abx, 4);
    t[0xD9] = op_pc(Cmp, Aby, 4);
    t[0xC1] = op(Cmp, Idx, 6);
    t[0xD1] = op_pc(Cmp, Idy, 5);
    t[0xE0] = op(Cpx, Imm, 2);
    t[0xE4] = op(Cpx, Zp0, 3);
    t[0xEC] = op(Cpx, Abs, 4);
    t[0xC0] = op(Cpy, Imm, 2);
    t[0xC4] = op(Cpy, Zp0, 3);
    t[0xCC] = op(Cpy, Abs, 4);

    // Branches (penalties computed by the branch logic)
    t[0x90] = op(Bcc, Rel, 2);
    t[0xB0] = op(Bcs, Rel, 2);
    t[0xF0] = op(Beq, Rel, 2);
    t[0x30] = op(Bmi, Rel, 2);
    t[0xD0] = op(Bne, Rel, 2);
    t[0x10] = op(Bpl, Rel, 2);
    t[0x50] = op(Bvc, Rel, 2);
    t[0x70] = op(Bvs, Rel, 2);

    // Jumps/subroutines/interrupt returns
    t[0x4C] = op(Jmp, Abs, 3);
    t[0x6C] = op(Jmp, Ind, 5);
    t[0x20] = op(Jsr, Abs, 6);
    t[0x60] = op(Rts, Imp, 6);
    t[0x40] = op(Rti, Imp, 6);
    t[0x00] = op(Brk, Imp, 7);

    // Flags
    t[0x18] = op(Clc, Imp, 2);
    t[0x38] = op(Sec, Imp, 2);
    t[0x58] = op(Cli, Imp, 2);
    t[0x78] = op(Sei, Imp, 2);
    t[0xB8] = op(Clv, Imp, 2);
    t[0xD8] = op(Cld, Imp, 2);
    t[0xF8] = op(Sed, Imp, 2);

    t[0xEA] = op(Nop, Imp, 2);

    t
}

/// The 256-entry opcode table, indexed by opcode byte.
///
/// `None` entries are undocumented opcodes; executing one is a
/// [`crate::CpuError::UndefinedOpcode`].
pub static OPCODE_TABLE: [Option<Opcode>; 256] = build_table();
