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
#![allow(dead_code)]

mod arithmetic;
mod control_flow;
mod directive;
mod float;
mod load_store;
pub mod operand_builders;
mod utility_functions;
mod validators;

use crate::AssemblerOptions;
use crate::ast::*;
use crate::errors::AssemblyError;
use crate::parser::Rule;
use crate::parser::operand_parser;
use anyhow::Result;
use pest::iterators::Pair;

/// Per-instruction builder: holds the written operands of one source line and
/// realizes them as tokens. Pseudo-instructions expand here unless the
/// assembler was asked to keep them.
pub struct TokenBuilder<'a> {
    line: usize,
    mnemonic: &'a str,
    operands: Vec<Operand>,
    keep_pseudo: bool,
}

impl<'a> TokenBuilder<'a> {
    pub fn new(
        line: usize,
        mnemonic: &'a str,
        operands: Vec<Operand>,
        options: &AssemblerOptions,
    ) -> Self {
        Self {
            line,
            mnemonic,
            operands,
            keep_pseudo: options.keep_pseudoinstructions,
        }
    }

    // select an archetype for the written operands against this mnemonic's mask
    fn parse(&self, mask: &[Archetype]) -> Result<OperandBundle, AssemblyError> {
        operand_parser::parse_operands(&self.operands, mask, self.line)
    }

    // one real instruction token taken directly from the source
    fn real(&self, opcode: Opcode, operands: OperandBundle, fixup: Fixup) -> Token {
        Token::Instruction(InstructionToken {
            opcode,
            operands,
            fixup,
            address: 0,
            line: self.line,
        })
    }

    // one compiler-generated instruction inside an expansion
    fn synth(&self, opcode: Opcode, operands: OperandBundle, fixup: Fixup) -> Token {
        debug_assert_eq!(operands.archetype, Archetype::CompilerGenerated);
        Token::Instruction(InstructionToken {
            opcode,
            operands,
            fixup,
            address: 0,
            line: self.line,
        })
    }

    // the unexpanded pseudo record carried through when expansion is off
    fn pseudo(&self, operands: OperandBundle) -> Vec<Token> {
        vec![Token::Pseudoinstruction(PseudoToken {
            mnemonic: self.mnemonic.to_string(),
            operands,
            address: 0,
            line: self.line,
        })]
    }

    /// Materialize a 32-bit constant into `target`. Small signed constants
    /// take a single `addiu`, small unsigned a single `ori`; anything wider
    /// uses the canonical `lui` high half followed by an `ori` that lands the
    /// combined value in `target`.
    fn load_constant(&self, target: u8, value: i32, out: &mut Vec<Token>) {
        if validators::fits_signed16(value) {
            out.push(self.synth(
                Opcode::Addiu,
                OperandBundle::gen_rri(target, ZERO, value),
                Fixup::None,
            ));
        } else if validators::fits_unsigned16(value) {
            out.push(self.synth(
                Opcode::Ori,
                OperandBundle::gen_rri(target, ZERO, value),
                Fixup::None,
            ));
        } else {
            out.push(self.synth(
                Opcode::Lui,
                OperandBundle::gen_rri(AT, ZERO, hi16(value)),
                Fixup::None,
            ));
            out.push(self.synth(
                Opcode::Ori,
                OperandBundle::gen_rri(target, AT, lo16(value)),
                Fixup::None,
            ));
        }
    }
}

// high half of a 32-bit constant, as the lui immediate
pub(crate) fn hi16(value: i32) -> i32 {
    ((value as u32) >> 16) as i32
}

// low half of a 32-bit constant
pub(crate) fn lo16(value: i32) -> i32 {
    value & 0xFFFF
}

/// Realize one source instruction as tokens. Dispatch is keyed on the
/// mnemonic; unknown mnemonics are a syntax error.
pub fn build_instruction(
    line: usize,
    mnemonic: &str,
    operands: Vec<Operand>,
    options: &AssemblerOptions,
) -> Result<Vec<Token>> {
    let b = TokenBuilder::new(line, mnemonic, operands, options);
    match mnemonic {
        // arithmetic and logic
        "add" => b.build_add(),
        "addu" => b.build_addu(),
        "sub" => b.build_sub(),
        "subu" => b.build_subu(),
        "and" => b.build_and(),
        "or" => b.build_or(),
        "xor" => b.build_xor(),
        "nor" => b.build_nor(),
        "slt" => b.build_slt(),
        "sltu" => b.build_sltu(),
        "addi" => b.build_addi(),
        "addiu" => b.build_addiu(),
        "slti" => b.build_slti(),
        "sltiu" => b.build_sltiu(),
        "andi" => b.build_andi(),
        "ori" => b.build_ori(),
        "xori" => b.build_xori(),
        "lui" => b.build_lui(),
        "sll" => b.build_sll(),
        "srl" => b.build_srl(),
        "sra" => b.build_sra(),
        "sllv" => b.build_sllv(),
        "srlv" => b.build_srlv(),
        "srav" => b.build_srav(),
        "mfhi" => b.build_mfhi(),
        "mthi" => b.build_mthi(),
        "mflo" => b.build_mflo(),
        "mtlo" => b.build_mtlo(),
        "mult" => b.build_mult(),
        "multu" => b.build_multu(),
        "div" => b.build_div(),
        "divu" => b.build_divu(),
        "rem" => b.build_rem(),
        "remu" => b.build_remu(),
        "mul" => b.build_mul(),
        "mulo" => b.build_mulo(),
        "mulou" => b.build_mulou(),
        "move" => b.build_move(),
        "not" => b.build_not(),
        "neg" => b.build_neg(),
        "negu" => b.build_negu(),
        "abs" => b.build_abs(),
        "li" => b.build_li(),
        "seq" => b.build_seq(),
        "sne" => b.build_sne(),
        "sge" => b.build_sge(),
        "sgeu" => b.build_sgeu(),
        "sgt" => b.build_sgt(),
        "sgtu" => b.build_sgtu(),
        "sle" => b.build_sle(),
        "sleu" => b.build_sleu(),
        "rol" => b.build_rol(),
        "ror" => b.build_ror(),

        // control flow
        "nop" => b.build_nop(),
        "j" => b.build_j(),
        "jal" => b.build_jal(),
        "jr" => b.build_jr(),
        "jalr" => b.build_jalr(),
        "beq" => b.build_beq(),
        "bne" => b.build_bne(),
        "blez" => b.build_blez(),
        "bgtz" => b.build_bgtz(),
        "bgez" => b.build_bgez(),
        "bltz" => b.build_bltz(),
        "bgezal" => b.build_bgezal(),
        "bltzal" => b.build_bltzal(),
        "b" => b.build_b(),
        "beqz" => b.build_beqz(),
        "bnez" => b.build_bnez(),
        "bge" => b.build_bge(),
        "bgeu" => b.build_bgeu(),
        "bgt" => b.build_bgt(),
        "bgtu" => b.build_bgtu(),
        "ble" => b.build_ble(),
        "bleu" => b.build_bleu(),
        "blt" => b.build_blt(),
        "bltu" => b.build_bltu(),
        "syscall" => b.build_syscall(),
        "break" => b.build_break(),
        "tgei" => b.build_tgei(),
        "tgeiu" => b.build_tgeiu(),
        "tlti" => b.build_tlti(),
        "tltiu" => b.build_tltiu(),
        "teqi" => b.build_teqi(),
        "tnei" => b.build_tnei(),

        // loads and stores
        "lb" => b.build_lb(),
        "lbu" => b.build_lbu(),
        "lh" => b.build_lh(),
        "lhu" => b.build_lhu(),
        "lw" => b.build_lw(),
        "lwl" => b.build_lwl(),
        "lwr" => b.build_lwr(),
        "ll" => b.build_ll(),
        "sb" => b.build_sb(),
        "sh" => b.build_sh(),
        "sw" => b.build_sw(),
        "swl" => b.build_swl(),
        "swr" => b.build_swr(),
        "sc" => b.build_sc(),
        "lwc1" => b.build_lwc1(),
        "swc1" => b.build_swc1(),
        "ldc1" => b.build_ldc1(),
        "sdc1" => b.build_sdc1(),
        "ld" => b.build_ld(),
        "sd" => b.build_sd(),
        "ulh" => b.build_ulh(),
        "ulhu" => b.build_ulhu(),
        "ulw" => b.build_ulw(),
        "usw" => b.build_usw(),
        "l.s" => b.build_l_s(),
        "l.d" => b.build_l_d(),
        "s.s" => b.build_s_s(),
        "s.d" => b.build_s_d(),
        "la" => b.build_la(),

        // floating point
        "add.s" => b.build_add_s(),
        "add.d" => b.build_add_d(),
        "sub.s" => b.build_sub_s(),
        "sub.d" => b.build_sub_d(),
        "mul.s" => b.build_mul_s(),
        "mul.d" => b.build_mul_d(),
        "div.s" => b.build_div_s(),
        "div.d" => b.build_div_d(),
        "abs.s" => b.build_abs_s(),
        "abs.d" => b.build_abs_d(),
        "neg.s" => b.build_neg_s(),
        "neg.d" => b.build_neg_d(),
        "mov.s" => b.build_mov_s(),
        "mov.d" => b.build_mov_d(),
        "sqrt.s" => b.build_sqrt_s(),
        "sqrt.d" => b.build_sqrt_d(),
        "cvt.s.d" => b.build_cvt_s_d(),
        "cvt.s.w" => b.build_cvt_s_w(),
        "cvt.d.s" => b.build_cvt_d_s(),
        "cvt.d.w" => b.build_cvt_d_w(),
        "cvt.w.s" => b.build_cvt_w_s(),
        "cvt.w.d" => b.build_cvt_w_d(),
        "c.eq.s" => b.build_c_eq_s(),
        "c.eq.d" => b.build_c_eq_d(),
        "c.lt.s" => b.build_c_lt_s(),
        "c.lt.d" => b.build_c_lt_d(),
        "c.le.s" => b.build_c_le_s(),
        "c.le.d" => b.build_c_le_d(),
        "bc1f" => b.build_bc1f(),
        "bc1t" => b.build_bc1t(),
        "mfc1" => b.build_mfc1(),
        "mtc1" => b.build_mtc1(),
        "mfc1.d" => b.build_mfc1_d(),
        "mtc1.d" => b.build_mtc1_d(),

        _ => Err(AssemblyError::InvalidSyntax {
            line,
            reason: format!("Unknown mnemonic: {}", mnemonic),
        }
        .into()),
    }
}

/// Realize one parsed directive rule as its typed form.
pub fn build_directive(pair: Pair<Rule>) -> Result<DirectiveKind> {
    directive::build(pair)
}
