/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

mod components;
mod constants;

use crate::ast::{Fixup, Opcode, OperandBundle};
use components::*;
use constants::*;

/// Encode one fully resolved instruction into its 32-bit word. This is a
/// pure function of the opcode and operand bundle: the fixup kind only
/// selects whether the 16-bit field comes from the resolved-label slot, the
/// memory offset, or the immediate.
pub fn encode(opcode: Opcode, b: &OperandBundle, fixup: Fixup) -> u32 {
    // the value OR-ed into the low 16 bits
    let field = if fixup != Fixup::None {
        b.resolved
    } else if opcode.is_memory_access() {
        b.offset as u32
    } else {
        b.imm as u32
    };

    match opcode {
        // shifts by a constant: rd, rt, sa
        Opcode::Sll => r_type(FUNCT_SLL, 0, b.reg2, b.reg1, b.imm as u32),
        Opcode::Srl => r_type(FUNCT_SRL, 0, b.reg2, b.reg1, b.imm as u32),
        Opcode::Sra => r_type(FUNCT_SRA, 0, b.reg2, b.reg1, b.imm as u32),

        // shifts by a register count: rd, rt, rs
        Opcode::Sllv => r_type(FUNCT_SLLV, b.reg3, b.reg2, b.reg1, 0),
        Opcode::Srlv => r_type(FUNCT_SRLV, b.reg3, b.reg2, b.reg1, 0),
        Opcode::Srav => r_type(FUNCT_SRAV, b.reg3, b.reg2, b.reg1, 0),

        Opcode::Jr => r_type(FUNCT_JR, b.reg1, 0, 0, 0),
        Opcode::Jalr => r_type(FUNCT_JALR, b.reg2, 0, b.reg1, 0),
        Opcode::Syscall => r_type(FUNCT_SYSCALL, 0, 0, 0, 0),
        Opcode::Break => (OP_SPECIAL << 26) | (((b.imm as u32) & 0xFFFFF) << 6) | FUNCT_BREAK,

        Opcode::Mfhi => r_type(FUNCT_MFHI, 0, 0, b.reg1, 0),
        Opcode::Mthi => r_type(FUNCT_MTHI, b.reg1, 0, 0, 0),
        Opcode::Mflo => r_type(FUNCT_MFLO, 0, 0, b.reg1, 0),
        Opcode::Mtlo => r_type(FUNCT_MTLO, b.reg1, 0, 0, 0),

        // rs, rt pairs into HI/LO
        Opcode::Mult => r_type(FUNCT_MULT, b.reg1, b.reg2, 0, 0),
        Opcode::Multu => r_type(FUNCT_MULTU, b.reg1, b.reg2, 0, 0),
        Opcode::Div => r_type(FUNCT_DIV, b.reg1, b.reg2, 0, 0),
        Opcode::Divu => r_type(FUNCT_DIVU, b.reg1, b.reg2, 0, 0),

        // rd, rs, rt
        Opcode::Add => r_type(FUNCT_ADD, b.reg2, b.reg3, b.reg1, 0),
        Opcode::Addu => r_type(FUNCT_ADDU, b.reg2, b.reg3, b.reg1, 0),
        Opcode::Sub => r_type(FUNCT_SUB, b.reg2, b.reg3, b.reg1, 0),
        Opcode::Subu => r_type(FUNCT_SUBU, b.reg2, b.reg3, b.reg1, 0),
        Opcode::And => r_type(FUNCT_AND, b.reg2, b.reg3, b.reg1, 0),
        Opcode::Or => r_type(FUNCT_OR, b.reg2, b.reg3, b.reg1, 0),
        Opcode::Xor => r_type(FUNCT_XOR, b.reg2, b.reg3, b.reg1, 0),
        Opcode::Nor => r_type(FUNCT_NOR, b.reg2, b.reg3, b.reg1, 0),
        Opcode::Slt => r_type(FUNCT_SLT, b.reg2, b.reg3, b.reg1, 0),
        Opcode::Sltu => r_type(FUNCT_SLTU, b.reg2, b.reg3, b.reg1, 0),

        // rt, rs, imm
        Opcode::Addi => i_type(OP_ADDI, b.reg2, b.reg1, field),
        Opcode::Addiu => i_type(OP_ADDIU, b.reg2, b.reg1, field),
        Opcode::Slti => i_type(OP_SLTI, b.reg2, b.reg1, field),
        Opcode::Sltiu => i_type(OP_SLTIU, b.reg2, b.reg1, field),
        Opcode::Andi => i_type(OP_ANDI, b.reg2, b.reg1, field),
        Opcode::Ori => i_type(OP_ORI, b.reg2, b.reg1, field),
        Opcode::Xori => i_type(OP_XORI, b.reg2, b.reg1, field),
        Opcode::Lui => i_type(OP_LUI, 0, b.reg1, field),

        // rs, rt, offset
        Opcode::Beq => i_type(OP_BEQ, b.reg1, b.reg2, field),
        Opcode::Bne => i_type(OP_BNE, b.reg1, b.reg2, field),
        Opcode::Blez => i_type(OP_BLEZ, b.reg1, 0, field),
        Opcode::Bgtz => i_type(OP_BGTZ, b.reg1, 0, field),
        Opcode::Bgez => regimm(b.reg1, RT_BGEZ, field),
        Opcode::Bltz => regimm(b.reg1, RT_BLTZ, field),
        Opcode::Bgezal => regimm(b.reg1, RT_BGEZAL, field),
        Opcode::Bltzal => regimm(b.reg1, RT_BLTZAL, field),

        Opcode::Tgei => regimm(b.reg1, RT_TGEI, field),
        Opcode::Tgeiu => regimm(b.reg1, RT_TGEIU, field),
        Opcode::Tlti => regimm(b.reg1, RT_TLTI, field),
        Opcode::Tltiu => regimm(b.reg1, RT_TLTIU, field),
        Opcode::Teqi => regimm(b.reg1, RT_TEQI, field),
        Opcode::Tnei => regimm(b.reg1, RT_TNEI, field),

        // absolute jumps: a raw target address drops its low two bits here,
        // a resolved label already arrives as a word address
        Opcode::J | Opcode::Jal => {
            let target = if fixup == Fixup::None {
                (b.imm as u32) >> 2
            } else {
                b.resolved
            };
            let op = if opcode == Opcode::J { OP_J } else { OP_JAL };
            j_type(op, target)
        }

        // rt, offset(base)
        Opcode::Lb => i_type(OP_LB, b.reg2, b.reg1, field),
        Opcode::Lh => i_type(OP_LH, b.reg2, b.reg1, field),
        Opcode::Lwl => i_type(OP_LWL, b.reg2, b.reg1, field),
        Opcode::Lw => i_type(OP_LW, b.reg2, b.reg1, field),
        Opcode::Lbu => i_type(OP_LBU, b.reg2, b.reg1, field),
        Opcode::Lhu => i_type(OP_LHU, b.reg2, b.reg1, field),
        Opcode::Lwr => i_type(OP_LWR, b.reg2, b.reg1, field),
        Opcode::Ll => i_type(OP_LL, b.reg2, b.reg1, field),
        Opcode::Sb => i_type(OP_SB, b.reg2, b.reg1, field),
        Opcode::Sh => i_type(OP_SH, b.reg2, b.reg1, field),
        Opcode::Swl => i_type(OP_SWL, b.reg2, b.reg1, field),
        Opcode::Sw => i_type(OP_SW, b.reg2, b.reg1, field),
        Opcode::Swr => i_type(OP_SWR, b.reg2, b.reg1, field),
        Opcode::Sc => i_type(OP_SC, b.reg2, b.reg1, field),
        Opcode::Lwc1 => i_type(OP_LWC1, b.reg2, b.reg1, field),
        Opcode::Swc1 => i_type(OP_SWC1, b.reg2, b.reg1, field),
        Opcode::Ldc1 => i_type(OP_LDC1, b.reg2, b.reg1, field),
        Opcode::Sdc1 => i_type(OP_SDC1, b.reg2, b.reg1, field),

        // fd, fs, ft
        Opcode::AddS => cop1(FMT_S, b.reg3, b.reg2, b.reg1, FUNCT_FP_ADD),
        Opcode::AddD => cop1(FMT_D, b.reg3, b.reg2, b.reg1, FUNCT_FP_ADD),
        Opcode::SubS => cop1(FMT_S, b.reg3, b.reg2, b.reg1, FUNCT_FP_SUB),
        Opcode::SubD => cop1(FMT_D, b.reg3, b.reg2, b.reg1, FUNCT_FP_SUB),
        Opcode::MulS => cop1(FMT_S, b.reg3, b.reg2, b.reg1, FUNCT_FP_MUL),
        Opcode::MulD => cop1(FMT_D, b.reg3, b.reg2, b.reg1, FUNCT_FP_MUL),
        Opcode::DivS => cop1(FMT_S, b.reg3, b.reg2, b.reg1, FUNCT_FP_DIV),
        Opcode::DivD => cop1(FMT_D, b.reg3, b.reg2, b.reg1, FUNCT_FP_DIV),

        // fd, fs
        Opcode::AbsS => cop1(FMT_S, 0, b.reg2, b.reg1, FUNCT_FP_ABS),
        Opcode::AbsD => cop1(FMT_D, 0, b.reg2, b.reg1, FUNCT_FP_ABS),
        Opcode::NegS => cop1(FMT_S, 0, b.reg2, b.reg1, FUNCT_FP_NEG),
        Opcode::NegD => cop1(FMT_D, 0, b.reg2, b.reg1, FUNCT_FP_NEG),
        Opcode::MovS => cop1(FMT_S, 0, b.reg2, b.reg1, FUNCT_FP_MOV),
        Opcode::MovD => cop1(FMT_D, 0, b.reg2, b.reg1, FUNCT_FP_MOV),
        Opcode::SqrtS => cop1(FMT_S, 0, b.reg2, b.reg1, FUNCT_FP_SQRT),
        Opcode::SqrtD => cop1(FMT_D, 0, b.reg2, b.reg1, FUNCT_FP_SQRT),

        // conversions carry the source format
        Opcode::CvtSD => cop1(FMT_D, 0, b.reg2, b.reg1, FUNCT_CVT_S),
        Opcode::CvtSW => cop1(FMT_W, 0, b.reg2, b.reg1, FUNCT_CVT_S),
        Opcode::CvtDS => cop1(FMT_S, 0, b.reg2, b.reg1, FUNCT_CVT_D),
        Opcode::CvtDW => cop1(FMT_W, 0, b.reg2, b.reg1, FUNCT_CVT_D),
        Opcode::CvtWS => cop1(FMT_S, 0, b.reg2, b.reg1, FUNCT_CVT_W),
        Opcode::CvtWD => cop1(FMT_D, 0, b.reg2, b.reg1, FUNCT_CVT_W),

        // fs, ft compares write condition flag cc (held in imm)
        Opcode::CEqS => cop1(FMT_S, b.reg2, b.reg1, (b.imm as u8) << 2, FUNCT_C_EQ),
        Opcode::CEqD => cop1(FMT_D, b.reg2, b.reg1, (b.imm as u8) << 2, FUNCT_C_EQ),
        Opcode::CLtS => cop1(FMT_S, b.reg2, b.reg1, (b.imm as u8) << 2, FUNCT_C_LT),
        Opcode::CLtD => cop1(FMT_D, b.reg2, b.reg1, (b.imm as u8) << 2, FUNCT_C_LT),
        Opcode::CLeS => cop1(FMT_S, b.reg2, b.reg1, (b.imm as u8) << 2, FUNCT_C_LE),
        Opcode::CLeD => cop1(FMT_D, b.reg2, b.reg1, (b.imm as u8) << 2, FUNCT_C_LE),

        Opcode::Bc1f => cop1_branch(b.imm as u32, false, field),
        Opcode::Bc1t => cop1_branch(b.imm as u32, true, field),

        Opcode::Mfc1 => cop1_move(COP1_MF, b.reg1, b.reg2),
        Opcode::Mtc1 => cop1_move(COP1_MT, b.reg1, b.reg2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Archetype;

    fn rrr(reg1: u8, reg2: u8, reg3: u8) -> OperandBundle {
        OperandBundle {
            archetype: Archetype::RegRegReg,
            reg1,
            reg2,
            reg3,
            ..Default::default()
        }
    }

    fn rri(reg1: u8, reg2: u8, imm: i32) -> OperandBundle {
        OperandBundle {
            archetype: Archetype::RegRegImm,
            reg1,
            reg2,
            imm,
            ..Default::default()
        }
    }

    #[test]
    fn test_encode_add() {
        assert_eq!(encode(Opcode::Add, &rrr(8, 9, 10), Fixup::None), 0x012A_4020);
    }

    #[test]
    fn test_encode_addi() {
        assert_eq!(
            encode(Opcode::Addi, &rri(8, 9, 42), Fixup::None),
            0x2128_002A
        );
    }

    #[test]
    fn test_encode_negative_immediate_masks() {
        assert_eq!(
            encode(Opcode::Addi, &rri(8, 8, -1), Fixup::None),
            0x2108_FFFF
        );
    }

    #[test]
    fn test_encode_lui_ori_pair() {
        assert_eq!(
            encode(Opcode::Lui, &rri(1, 0, 0x1234), Fixup::None),
            0x3C01_1234
        );
        assert_eq!(
            encode(Opcode::Ori, &rri(8, 1, 0x5678), Fixup::None),
            0x3528_5678
        );
    }

    #[test]
    fn test_encode_resolved_branch() {
        let bundle = OperandBundle {
            archetype: Archetype::RegRegLabel,
            reg1: 8,
            reg2: 0,
            label: Some("loop".to_string()),
            resolved: 0xFFFE,
            ..Default::default()
        };
        assert_eq!(encode(Opcode::Bne, &bundle, Fixup::Branch), 0x1500_FFFE);
    }

    #[test]
    fn test_encode_memory_uses_offset() {
        let bundle = OperandBundle {
            archetype: Archetype::RegOffsetForReg,
            reg1: 8,
            reg2: 29,
            offset: -4,
            ..Default::default()
        };
        assert_eq!(encode(Opcode::Lw, &bundle, Fixup::None), 0x8FA8_FFFC);
    }

    #[test]
    fn test_encode_jump_drops_low_bits() {
        let bundle = OperandBundle {
            archetype: Archetype::Imm,
            imm: 0x0400_0000,
            ..Default::default()
        };
        assert_eq!(encode(Opcode::J, &bundle, Fixup::None), 0x0900_0000);
    }

    #[test]
    fn test_encode_shifts() {
        assert_eq!(encode(Opcode::Sll, &rri(8, 9, 4), Fixup::None), 0x0009_4100);
        assert_eq!(
            encode(Opcode::Sllv, &rrr(8, 9, 10), Fixup::None),
            0x0149_4004
        );
    }

    #[test]
    fn test_encode_jr_and_jalr() {
        let reg = OperandBundle {
            archetype: Archetype::Reg,
            reg1: 31,
            ..Default::default()
        };
        assert_eq!(encode(Opcode::Jr, &reg, Fixup::None), 0x03E0_0008);

        let pair = OperandBundle {
            archetype: Archetype::RegReg,
            reg1: 31,
            reg2: 25,
            ..Default::default()
        };
        assert_eq!(encode(Opcode::Jalr, &pair, Fixup::None), 0x0320_F809);
    }

    #[test]
    fn test_encode_syscall_break() {
        let none = OperandBundle::default();
        assert_eq!(encode(Opcode::Syscall, &none, Fixup::None), 0x0000_000C);
        let code = OperandBundle {
            imm: 1,
            ..Default::default()
        };
        assert_eq!(encode(Opcode::Break, &code, Fixup::None), 0x0000_004D);
    }

    #[test]
    fn test_encode_regimm_branch() {
        let bundle = OperandBundle {
            archetype: Archetype::RegLabel,
            reg1: 8,
            resolved: 0x0010,
            label: Some("x".to_string()),
            ..Default::default()
        };
        assert_eq!(encode(Opcode::Bgez, &bundle, Fixup::Branch), 0x0501_0010);
        assert_eq!(encode(Opcode::Bltz, &bundle, Fixup::Branch), 0x0500_0010);
    }

    #[test]
    fn test_encode_fp_arith() {
        assert_eq!(
            encode(Opcode::AddS, &rrr(1, 2, 3), Fixup::None),
            0x4603_1040
        );
        assert_eq!(
            encode(Opcode::AddD, &rrr(0, 2, 4), Fixup::None),
            0x4624_1000
        );
    }

    #[test]
    fn test_encode_fp_compare_with_flag() {
        let bundle = OperandBundle {
            archetype: Archetype::ImmRegReg,
            imm: 2,
            reg1: 2,
            reg2: 4,
            ..Default::default()
        };
        // cc=2 lands in the upper bits of the fd slot
        assert_eq!(encode(Opcode::CEqD, &bundle, Fixup::None), 0x4624_1232);
    }

    #[test]
    fn test_encode_fp_moves() {
        let bundle = OperandBundle {
            archetype: Archetype::RegReg,
            reg1: 8,
            reg2: 2,
            ..Default::default()
        };
        assert_eq!(encode(Opcode::Mfc1, &bundle, Fixup::None), 0x4408_1000);
        assert_eq!(encode(Opcode::Mtc1, &bundle, Fixup::None), 0x4488_1000);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let bundle = rrr(8, 9, 10);
        let first = encode(Opcode::Add, &bundle, Fixup::None);
        assert_eq!(first, encode(Opcode::Add, &bundle, Fixup::None));
    }

    fn mem(reg1: u8, reg2: u8, offset: i32) -> OperandBundle {
        OperandBundle {
            archetype: Archetype::RegOffsetForReg,
            reg1,
            reg2,
            offset,
            ..Default::default()
        }
    }

    #[test]
    fn test_encode_loads() {
        assert_eq!(encode(Opcode::Lb, &mem(8, 9, 4), Fixup::None), 0x8128_0004);
        assert_eq!(encode(Opcode::Lbu, &mem(8, 9, 4), Fixup::None), 0x9128_0004);
        assert_eq!(encode(Opcode::Lh, &mem(8, 9, 0), Fixup::None), 0x8528_0000);
        assert_eq!(encode(Opcode::Lhu, &mem(8, 9, 0), Fixup::None), 0x9528_0000);
        assert_eq!(encode(Opcode::Lwl, &mem(8, 9, 3), Fixup::None), 0x8928_0003);
        assert_eq!(encode(Opcode::Lwr, &mem(8, 9, 0), Fixup::None), 0x9928_0000);
        assert_eq!(encode(Opcode::Ll, &mem(8, 9, 0), Fixup::None), 0xC128_0000);
    }

    #[test]
    fn test_encode_stores() {
        assert_eq!(encode(Opcode::Sb, &mem(8, 9, 4), Fixup::None), 0xA128_0004);
        assert_eq!(encode(Opcode::Sh, &mem(8, 9, 0), Fixup::None), 0xA528_0000);
        assert_eq!(encode(Opcode::Sw, &mem(8, 29, -4), Fixup::None), 0xAFA8_FFFC);
        assert_eq!(encode(Opcode::Swl, &mem(8, 9, 3), Fixup::None), 0xA928_0003);
        assert_eq!(encode(Opcode::Swr, &mem(8, 9, 0), Fixup::None), 0xB928_0000);
        assert_eq!(encode(Opcode::Sc, &mem(8, 9, 0), Fixup::None), 0xE128_0000);
    }

    #[test]
    fn test_encode_coprocessor_transfers() {
        assert_eq!(
            encode(Opcode::Lwc1, &mem(2, 8, 8), Fixup::None),
            0xC502_0008
        );
        assert_eq!(
            encode(Opcode::Swc1, &mem(2, 8, 8), Fixup::None),
            0xE502_0008
        );
        assert_eq!(
            encode(Opcode::Ldc1, &mem(2, 8, 0), Fixup::None),
            0xD502_0000
        );
        assert_eq!(
            encode(Opcode::Sdc1, &mem(2, 8, 0), Fixup::None),
            0xF502_0000
        );
    }

    #[test]
    fn test_encode_hi_lo_moves() {
        let reg = OperandBundle {
            archetype: Archetype::Reg,
            reg1: 8,
            ..Default::default()
        };
        assert_eq!(encode(Opcode::Mfhi, &reg, Fixup::None), 0x0000_4010);
        assert_eq!(encode(Opcode::Mthi, &reg, Fixup::None), 0x0100_0011);
        assert_eq!(encode(Opcode::Mflo, &reg, Fixup::None), 0x0000_4012);
        assert_eq!(encode(Opcode::Mtlo, &reg, Fixup::None), 0x0100_0013);
    }

    #[test]
    fn test_encode_products_and_quotients() {
        let pair = OperandBundle {
            archetype: Archetype::RegReg,
            reg1: 9,
            reg2: 10,
            ..Default::default()
        };
        assert_eq!(encode(Opcode::Mult, &pair, Fixup::None), 0x012A_0018);
        assert_eq!(encode(Opcode::Multu, &pair, Fixup::None), 0x012A_0019);
        assert_eq!(encode(Opcode::Div, &pair, Fixup::None), 0x012A_001A);
        assert_eq!(encode(Opcode::Divu, &pair, Fixup::None), 0x012A_001B);
    }

    #[test]
    fn test_encode_logic_register_forms() {
        assert_eq!(encode(Opcode::Xor, &rrr(8, 9, 10), Fixup::None), 0x012A_4026);
        assert_eq!(encode(Opcode::Nor, &rrr(8, 9, 10), Fixup::None), 0x012A_4027);
        assert_eq!(encode(Opcode::Slt, &rrr(8, 9, 10), Fixup::None), 0x012A_402A);
        assert_eq!(
            encode(Opcode::Sltu, &rrr(8, 9, 10), Fixup::None),
            0x012A_402B
        );
    }

    #[test]
    fn test_encode_logic_immediate_forms() {
        assert_eq!(
            encode(Opcode::Andi, &rri(8, 9, 0xFF), Fixup::None),
            0x3128_00FF
        );
        assert_eq!(
            encode(Opcode::Xori, &rri(8, 9, 0xFF), Fixup::None),
            0x3928_00FF
        );
        assert_eq!(encode(Opcode::Slti, &rri(8, 9, 10), Fixup::None), 0x2928_000A);
        assert_eq!(
            encode(Opcode::Sltiu, &rri(8, 9, 10), Fixup::None),
            0x2D28_000A
        );
    }

    #[test]
    fn test_encode_single_register_branches() {
        let bundle = OperandBundle {
            archetype: Archetype::RegLabel,
            reg1: 8,
            resolved: 4,
            label: Some("x".to_string()),
            ..Default::default()
        };
        assert_eq!(encode(Opcode::Blez, &bundle, Fixup::Branch), 0x1900_0004);
        assert_eq!(encode(Opcode::Bgtz, &bundle, Fixup::Branch), 0x1D00_0004);
        assert_eq!(encode(Opcode::Bgezal, &bundle, Fixup::Branch), 0x0511_0004);
        assert_eq!(encode(Opcode::Bltzal, &bundle, Fixup::Branch), 0x0510_0004);
    }

    #[test]
    fn test_encode_trap_immediates() {
        let bundle = OperandBundle {
            archetype: Archetype::RegImm,
            reg1: 8,
            imm: 5,
            ..Default::default()
        };
        assert_eq!(encode(Opcode::Teqi, &bundle, Fixup::None), 0x050C_0005);
        assert_eq!(encode(Opcode::Tnei, &bundle, Fixup::None), 0x050E_0005);
        assert_eq!(encode(Opcode::Tgei, &bundle, Fixup::None), 0x0508_0005);
        assert_eq!(encode(Opcode::Tlti, &bundle, Fixup::None), 0x050A_0005);
    }

    #[test]
    fn test_encode_fp_unary_and_converts() {
        let unary = OperandBundle {
            archetype: Archetype::RegReg,
            reg1: 1,
            reg2: 2,
            ..Default::default()
        };
        assert_eq!(encode(Opcode::SqrtS, &unary, Fixup::None), 0x4600_1044);
        assert_eq!(encode(Opcode::CvtWS, &unary, Fixup::None), 0x4600_1064);

        let double = OperandBundle {
            archetype: Archetype::RegReg,
            reg1: 0,
            reg2: 2,
            ..Default::default()
        };
        assert_eq!(encode(Opcode::NegD, &double, Fixup::None), 0x4620_1007);
        assert_eq!(encode(Opcode::MovD, &double, Fixup::None), 0x4620_1006);
    }
}
