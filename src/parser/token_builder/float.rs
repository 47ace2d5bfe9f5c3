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

use crate::ast::*;
use crate::errors::AssemblyError;
use crate::parser::token_builder::TokenBuilder;
use crate::parser::token_builder::validators::*;
use anyhow::Result;

impl<'a> TokenBuilder<'a> {
    // fd, fs, ft
    fn build_fp_arith(&self, opcode: Opcode, double: bool) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::RegRegReg])?;
        if double {
            check_even_registers(&[bundle.reg1, bundle.reg2, bundle.reg3], self.line)?;
        }
        Ok(vec![self.real(opcode, bundle, Fixup::None)])
    }

    pub fn build_add_s(&self) -> Result<Vec<Token>> {
        self.build_fp_arith(Opcode::AddS, false)
    }

    pub fn build_add_d(&self) -> Result<Vec<Token>> {
        self.build_fp_arith(Opcode::AddD, true)
    }

    pub fn build_sub_s(&self) -> Result<Vec<Token>> {
        self.build_fp_arith(Opcode::SubS, false)
    }

    pub fn build_sub_d(&self) -> Result<Vec<Token>> {
        self.build_fp_arith(Opcode::SubD, true)
    }

    pub fn build_mul_s(&self) -> Result<Vec<Token>> {
        self.build_fp_arith(Opcode::MulS, false)
    }

    pub fn build_mul_d(&self) -> Result<Vec<Token>> {
        self.build_fp_arith(Opcode::MulD, true)
    }

    pub fn build_div_s(&self) -> Result<Vec<Token>> {
        self.build_fp_arith(Opcode::DivS, false)
    }

    pub fn build_div_d(&self) -> Result<Vec<Token>> {
        self.build_fp_arith(Opcode::DivD, true)
    }

    // fd, fs
    fn build_fp_unary(&self, opcode: Opcode, double: bool) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::RegReg])?;
        if double {
            check_even_registers(&[bundle.reg1, bundle.reg2], self.line)?;
        }
        Ok(vec![self.real(opcode, bundle, Fixup::None)])
    }

    pub fn build_abs_s(&self) -> Result<Vec<Token>> {
        self.build_fp_unary(Opcode::AbsS, false)
    }

    pub fn build_abs_d(&self) -> Result<Vec<Token>> {
        self.build_fp_unary(Opcode::AbsD, true)
    }

    pub fn build_neg_s(&self) -> Result<Vec<Token>> {
        self.build_fp_unary(Opcode::NegS, false)
    }

    pub fn build_neg_d(&self) -> Result<Vec<Token>> {
        self.build_fp_unary(Opcode::NegD, true)
    }

    pub fn build_mov_s(&self) -> Result<Vec<Token>> {
        self.build_fp_unary(Opcode::MovS, false)
    }

    pub fn build_mov_d(&self) -> Result<Vec<Token>> {
        self.build_fp_unary(Opcode::MovD, true)
    }

    pub fn build_sqrt_s(&self) -> Result<Vec<Token>> {
        self.build_fp_unary(Opcode::SqrtS, false)
    }

    pub fn build_sqrt_d(&self) -> Result<Vec<Token>> {
        self.build_fp_unary(Opcode::SqrtD, true)
    }

    // fd, fs — evenness applies to whichever side carries the double operand
    fn build_fp_convert(
        &self,
        opcode: Opcode,
        dest_double: bool,
        src_double: bool,
    ) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::RegReg])?;
        if dest_double {
            check_even_registers(&[bundle.reg1], self.line)?;
        }
        if src_double {
            check_even_registers(&[bundle.reg2], self.line)?;
        }
        Ok(vec![self.real(opcode, bundle, Fixup::None)])
    }

    pub fn build_cvt_s_d(&self) -> Result<Vec<Token>> {
        self.build_fp_convert(Opcode::CvtSD, false, true)
    }

    pub fn build_cvt_s_w(&self) -> Result<Vec<Token>> {
        self.build_fp_convert(Opcode::CvtSW, false, false)
    }

    pub fn build_cvt_d_s(&self) -> Result<Vec<Token>> {
        self.build_fp_convert(Opcode::CvtDS, true, false)
    }

    pub fn build_cvt_d_w(&self) -> Result<Vec<Token>> {
        self.build_fp_convert(Opcode::CvtDW, true, false)
    }

    pub fn build_cvt_w_s(&self) -> Result<Vec<Token>> {
        self.build_fp_convert(Opcode::CvtWS, false, false)
    }

    pub fn build_cvt_w_d(&self) -> Result<Vec<Token>> {
        self.build_fp_convert(Opcode::CvtWD, false, true)
    }

    // fs, ft — or cc, fs, ft naming one of the eight condition flags
    fn build_fp_compare(&self, opcode: Opcode, double: bool) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::RegReg, Archetype::ImmRegReg])?;
        if bundle.archetype == Archetype::ImmRegReg {
            check_flag_range(bundle.imm, self.line)?;
        }
        if double {
            check_even_registers(&[bundle.reg1, bundle.reg2], self.line)?;
        }
        Ok(vec![self.real(opcode, bundle, Fixup::None)])
    }

    pub fn build_c_eq_s(&self) -> Result<Vec<Token>> {
        self.build_fp_compare(Opcode::CEqS, false)
    }

    pub fn build_c_eq_d(&self) -> Result<Vec<Token>> {
        self.build_fp_compare(Opcode::CEqD, true)
    }

    pub fn build_c_lt_s(&self) -> Result<Vec<Token>> {
        self.build_fp_compare(Opcode::CLtS, false)
    }

    pub fn build_c_lt_d(&self) -> Result<Vec<Token>> {
        self.build_fp_compare(Opcode::CLtD, true)
    }

    pub fn build_c_le_s(&self) -> Result<Vec<Token>> {
        self.build_fp_compare(Opcode::CLeS, false)
    }

    pub fn build_c_le_d(&self) -> Result<Vec<Token>> {
        self.build_fp_compare(Opcode::CLeD, true)
    }

    // branch on the FP condition flag, default flag 0
    fn build_fp_branch(&self, opcode: Opcode) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::Label, Archetype::ImmLabel])?;
        if bundle.archetype == Archetype::ImmLabel {
            check_flag_range(bundle.imm, self.line)?;
        }
        Ok(vec![self.real(opcode, bundle, Fixup::Branch)])
    }

    pub fn build_bc1f(&self) -> Result<Vec<Token>> {
        self.build_fp_branch(Opcode::Bc1f)
    }

    pub fn build_bc1t(&self) -> Result<Vec<Token>> {
        self.build_fp_branch(Opcode::Bc1t)
    }

    // rt, fs
    pub fn build_mfc1(&self) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::RegReg])?;
        Ok(vec![self.real(Opcode::Mfc1, bundle, Fixup::None)])
    }

    pub fn build_mtc1(&self) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::RegReg])?;
        Ok(vec![self.real(Opcode::Mtc1, bundle, Fixup::None)])
    }

    /// Doubleword move between the register banks: both halves transfer
    /// through consecutive indices, so the FP register must be the even half
    /// of an aligned pair and the integer side must leave room for its
    /// partner.
    fn build_fp_move_double(&self, opcode: Opcode) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::RegReg])?;
        check_even_registers(&[bundle.reg2], self.line)?;
        if bundle.reg1 == 31 {
            return Err(AssemblyError::InvalidInstruction {
                line: self.line,
                reason: "Register 31 cannot anchor a doubleword register pair.".to_string(),
            }
            .into());
        }
        if self.keep_pseudo {
            return Ok(self.pseudo(bundle));
        }

        Ok(vec![
            self.synth(
                opcode,
                OperandBundle {
                    archetype: Archetype::CompilerGenerated,
                    reg1: bundle.reg1,
                    reg2: bundle.reg2,
                    ..Default::default()
                },
                Fixup::None,
            ),
            self.synth(
                opcode,
                OperandBundle {
                    archetype: Archetype::CompilerGenerated,
                    reg1: bundle.reg1 + 1,
                    reg2: bundle.reg2 + 1,
                    ..Default::default()
                },
                Fixup::None,
            ),
        ])
    }

    pub fn build_mfc1_d(&self) -> Result<Vec<Token>> {
        self.build_fp_move_double(Opcode::Mfc1)
    }

    pub fn build_mtc1_d(&self) -> Result<Vec<Token>> {
        self.build_fp_move_double(Opcode::Mtc1)
    }
}
