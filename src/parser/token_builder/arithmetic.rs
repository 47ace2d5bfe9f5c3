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
use crate::parser::token_builder::TokenBuilder;
use crate::parser::token_builder::validators::*;
use crate::parser::token_builder::{hi16, lo16};
use anyhow::Result;

// the immediate spelling of a three-register operation, with its declared range
fn immediate_form(opcode: Opcode) -> Option<(Opcode, bool)> {
    match opcode {
        Opcode::Add => Some((Opcode::Addi, true)),
        Opcode::Addu => Some((Opcode::Addiu, true)),
        Opcode::And => Some((Opcode::Andi, false)),
        Opcode::Or => Some((Opcode::Ori, false)),
        Opcode::Xor => Some((Opcode::Xori, false)),
        Opcode::Slt => Some((Opcode::Slti, true)),
        Opcode::Sltu => Some((Opcode::Sltiu, true)),
        _ => None,
    }
}

impl<'a> TokenBuilder<'a> {
    // rd, rs, rt — plus the register-immediate spelling every ALU mnemonic
    // also accepts, which lowers through `build_alu_immediate`
    fn build_alu(&self, opcode: Opcode) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::RegRegReg, Archetype::RegRegImm])?;
        match bundle.archetype {
            Archetype::RegRegReg => Ok(vec![self.real(opcode, bundle, Fixup::None)]),
            _ => self.build_alu_immediate(opcode, bundle),
        }
    }

    fn build_alu_immediate(&self, opcode: Opcode, bundle: OperandBundle) -> Result<Vec<Token>> {
        if self.keep_pseudo {
            return Ok(self.pseudo(bundle));
        }

        if let Some((imm_opcode, signed)) = immediate_form(opcode) {
            let fits = if signed {
                fits_signed16(bundle.imm)
            } else {
                fits_unsigned16(bundle.imm)
            };
            if fits {
                let operands = OperandBundle::gen_rri(bundle.reg1, bundle.reg2, bundle.imm);
                return Ok(vec![self.synth(imm_opcode, operands, Fixup::None)]);
            }
        }

        // subtraction of a small constant is addition of its negation
        if matches!(opcode, Opcode::Sub | Opcode::Subu) {
            if let Some(negated) = bundle.imm.checked_neg() {
                if fits_signed16(negated) {
                    let imm_opcode = if opcode == Opcode::Sub {
                        Opcode::Addi
                    } else {
                        Opcode::Addiu
                    };
                    let operands = OperandBundle::gen_rri(bundle.reg1, bundle.reg2, negated);
                    return Ok(vec![self.synth(imm_opcode, operands, Fixup::None)]);
                }
            }
        }

        let mut out = Vec::new();
        self.load_constant(AT, bundle.imm, &mut out);
        out.push(self.synth(
            opcode,
            OperandBundle::gen_rrr(bundle.reg1, bundle.reg2, AT),
            Fixup::None,
        ));
        Ok(out)
    }

    pub fn build_add(&self) -> Result<Vec<Token>> {
        self.build_alu(Opcode::Add)
    }

    pub fn build_addu(&self) -> Result<Vec<Token>> {
        self.build_alu(Opcode::Addu)
    }

    pub fn build_sub(&self) -> Result<Vec<Token>> {
        self.build_alu(Opcode::Sub)
    }

    pub fn build_subu(&self) -> Result<Vec<Token>> {
        self.build_alu(Opcode::Subu)
    }

    pub fn build_and(&self) -> Result<Vec<Token>> {
        self.build_alu(Opcode::And)
    }

    pub fn build_or(&self) -> Result<Vec<Token>> {
        self.build_alu(Opcode::Or)
    }

    pub fn build_xor(&self) -> Result<Vec<Token>> {
        self.build_alu(Opcode::Xor)
    }

    pub fn build_nor(&self) -> Result<Vec<Token>> {
        self.build_alu(Opcode::Nor)
    }

    pub fn build_slt(&self) -> Result<Vec<Token>> {
        self.build_alu(Opcode::Slt)
    }

    pub fn build_sltu(&self) -> Result<Vec<Token>> {
        self.build_alu(Opcode::Sltu)
    }

    /// rt, rs, imm. When the constant fits the declared 16-bit range the
    /// instruction encodes directly; otherwise the canonical constant load
    /// lands it in `$at` and the register form of the operation finishes.
    fn build_itype(
        &self,
        opcode: Opcode,
        register_form: Opcode,
        signed: bool,
    ) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::RegRegImm])?;
        self.build_itype_from(opcode, register_form, signed, bundle)
    }

    pub fn build_addi(&self) -> Result<Vec<Token>> {
        self.build_itype(Opcode::Addi, Opcode::Add, true)
    }

    pub fn build_addiu(&self) -> Result<Vec<Token>> {
        self.build_itype(Opcode::Addiu, Opcode::Addu, true)
    }

    pub fn build_slti(&self) -> Result<Vec<Token>> {
        self.build_itype(Opcode::Slti, Opcode::Slt, true)
    }

    pub fn build_sltiu(&self) -> Result<Vec<Token>> {
        self.build_itype(Opcode::Sltiu, Opcode::Sltu, true)
    }

    pub fn build_andi(&self) -> Result<Vec<Token>> {
        self.build_itype(Opcode::Andi, Opcode::And, false)
    }

    // also accepts a label third operand, which resolves to the low half of
    // the label's address
    pub fn build_ori(&self) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::RegRegImm, Archetype::RegRegLabel])?;
        if bundle.archetype == Archetype::RegRegLabel {
            return Ok(vec![self.real(Opcode::Ori, bundle, Fixup::Lo16)]);
        }
        self.build_itype_from(Opcode::Ori, Opcode::Or, false, bundle)
    }

    pub fn build_xori(&self) -> Result<Vec<Token>> {
        self.build_itype(Opcode::Xori, Opcode::Xor, false)
    }

    // build_itype for callers that already hold a parsed bundle
    fn build_itype_from(
        &self,
        opcode: Opcode,
        register_form: Opcode,
        signed: bool,
        bundle: OperandBundle,
    ) -> Result<Vec<Token>> {
        let fits = if signed {
            fits_signed16(bundle.imm)
        } else {
            fits_unsigned16(bundle.imm)
        };

        if fits {
            return Ok(vec![self.real(opcode, bundle, Fixup::None)]);
        }
        if self.keep_pseudo {
            return Ok(self.pseudo(bundle));
        }

        let mut out = Vec::new();
        out.push(self.synth(
            Opcode::Lui,
            OperandBundle::gen_rri(AT, ZERO, hi16(bundle.imm)),
            Fixup::None,
        ));
        out.push(self.synth(
            Opcode::Ori,
            OperandBundle::gen_rri(AT, AT, lo16(bundle.imm)),
            Fixup::None,
        ));
        out.push(self.synth(
            register_form,
            OperandBundle::gen_rrr(bundle.reg1, bundle.reg2, AT),
            Fixup::None,
        ));
        Ok(out)
    }

    // rt, imm — or rt, label, which resolves to the high half of the address
    pub fn build_lui(&self) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::RegImm, Archetype::RegLabel])?;
        if bundle.archetype == Archetype::RegLabel {
            return Ok(vec![self.real(Opcode::Lui, bundle, Fixup::Hi16)]);
        }
        check_unsigned16(bundle.imm, self.line)?;
        Ok(vec![self.real(Opcode::Lui, bundle, Fixup::None)])
    }

    // rd, rt, sa
    fn build_shift(&self, opcode: Opcode) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::RegRegImm])?;
        check_shift_amount(bundle.imm, self.line)?;
        Ok(vec![self.real(opcode, bundle, Fixup::None)])
    }

    pub fn build_sll(&self) -> Result<Vec<Token>> {
        self.build_shift(Opcode::Sll)
    }

    pub fn build_srl(&self) -> Result<Vec<Token>> {
        self.build_shift(Opcode::Srl)
    }

    pub fn build_sra(&self) -> Result<Vec<Token>> {
        self.build_shift(Opcode::Sra)
    }

    // rd, rt, rs
    fn build_shift_variable(&self, opcode: Opcode) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::RegRegReg])?;
        Ok(vec![self.real(opcode, bundle, Fixup::None)])
    }

    pub fn build_sllv(&self) -> Result<Vec<Token>> {
        self.build_shift_variable(Opcode::Sllv)
    }

    pub fn build_srlv(&self) -> Result<Vec<Token>> {
        self.build_shift_variable(Opcode::Srlv)
    }

    pub fn build_srav(&self) -> Result<Vec<Token>> {
        self.build_shift_variable(Opcode::Srav)
    }

    fn build_hi_lo_move(&self, opcode: Opcode) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::Reg])?;
        Ok(vec![self.real(opcode, bundle, Fixup::None)])
    }

    pub fn build_mfhi(&self) -> Result<Vec<Token>> {
        self.build_hi_lo_move(Opcode::Mfhi)
    }

    pub fn build_mthi(&self) -> Result<Vec<Token>> {
        self.build_hi_lo_move(Opcode::Mthi)
    }

    pub fn build_mflo(&self) -> Result<Vec<Token>> {
        self.build_hi_lo_move(Opcode::Mflo)
    }

    pub fn build_mtlo(&self) -> Result<Vec<Token>> {
        self.build_hi_lo_move(Opcode::Mtlo)
    }

    pub fn build_mult(&self) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::RegReg])?;
        Ok(vec![self.real(Opcode::Mult, bundle, Fixup::None)])
    }

    pub fn build_multu(&self) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::RegReg])?;
        Ok(vec![self.real(Opcode::Multu, bundle, Fixup::None)])
    }

    /// The divisor register for a three-operand divide/remainder form,
    /// materializing an immediate comparand into `$at` first.
    fn divisor_register(&self, bundle: &OperandBundle, out: &mut Vec<Token>) -> u8 {
        if bundle.archetype == Archetype::RegRegImm {
            self.load_constant(AT, bundle.imm, out);
            AT
        } else {
            bundle.reg3
        }
    }

    // guard the divisor against zero, then divide and move the requested
    // half of HI/LO into rd
    fn build_divide(&self, opcode: Opcode, move_from: Opcode) -> Result<Vec<Token>> {
        let bundle = self.parse(&[
            Archetype::RegReg,
            Archetype::RegRegReg,
            Archetype::RegRegImm,
        ])?;

        if bundle.archetype == Archetype::RegReg {
            return Ok(vec![self.real(opcode, bundle, Fixup::None)]);
        }
        if self.keep_pseudo {
            return Ok(self.pseudo(bundle));
        }

        let mut out = Vec::new();
        let divisor = self.divisor_register(&bundle, &mut out);

        // the guard skips the break, landing on the divide itself
        out.push(self.synth(
            Opcode::Bne,
            OperandBundle::gen_rri(divisor, ZERO, 1),
            Fixup::None,
        ));
        out.push(self.synth(
            Opcode::Break,
            OperandBundle::gen_rri(ZERO, ZERO, 0),
            Fixup::None,
        ));
        out.push(self.synth(
            opcode,
            OperandBundle {
                archetype: Archetype::CompilerGenerated,
                reg1: bundle.reg2,
                reg2: divisor,
                ..Default::default()
            },
            Fixup::None,
        ));
        out.push(self.synth(
            move_from,
            OperandBundle {
                archetype: Archetype::CompilerGenerated,
                reg1: bundle.reg1,
                ..Default::default()
            },
            Fixup::None,
        ));
        Ok(out)
    }

    pub fn build_div(&self) -> Result<Vec<Token>> {
        self.build_divide(Opcode::Div, Opcode::Mflo)
    }

    pub fn build_divu(&self) -> Result<Vec<Token>> {
        self.build_divide(Opcode::Divu, Opcode::Mflo)
    }

    pub fn build_rem(&self) -> Result<Vec<Token>> {
        self.build_divide(Opcode::Div, Opcode::Mfhi)
    }

    pub fn build_remu(&self) -> Result<Vec<Token>> {
        self.build_divide(Opcode::Divu, Opcode::Mfhi)
    }

    /// The multiplier register for the three-operand product forms.
    fn multiplier_register(&self, bundle: &OperandBundle, out: &mut Vec<Token>) -> u8 {
        if bundle.archetype == Archetype::RegRegImm {
            self.load_constant(AT, bundle.imm, out);
            AT
        } else {
            bundle.reg3
        }
    }

    // rd, rs, rt — product without an overflow check
    pub fn build_mul(&self) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::RegRegReg, Archetype::RegRegImm])?;
        if self.keep_pseudo {
            return Ok(self.pseudo(bundle));
        }

        let mut out = Vec::new();
        let rt = self.multiplier_register(&bundle, &mut out);
        out.push(self.synth(
            Opcode::Mult,
            OperandBundle {
                archetype: Archetype::CompilerGenerated,
                reg1: bundle.reg2,
                reg2: rt,
                ..Default::default()
            },
            Fixup::None,
        ));
        out.push(self.synth(
            Opcode::Mflo,
            OperandBundle {
                archetype: Archetype::CompilerGenerated,
                reg1: bundle.reg1,
                ..Default::default()
            },
            Fixup::None,
        ));
        Ok(out)
    }

    // rd, rs, rt — signed product that traps when the result does not fit a
    // word: HI must hold the sign extension of LO
    pub fn build_mulo(&self) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::RegRegReg, Archetype::RegRegImm])?;
        if self.keep_pseudo {
            return Ok(self.pseudo(bundle));
        }

        let rd = bundle.reg1;
        let mut out = Vec::new();
        let rt = self.multiplier_register(&bundle, &mut out);
        out.push(self.synth(
            Opcode::Mult,
            OperandBundle {
                archetype: Archetype::CompilerGenerated,
                reg1: bundle.reg2,
                reg2: rt,
                ..Default::default()
            },
            Fixup::None,
        ));
        out.push(self.synth(
            Opcode::Mfhi,
            OperandBundle {
                archetype: Archetype::CompilerGenerated,
                reg1: AT,
                ..Default::default()
            },
            Fixup::None,
        ));
        out.push(self.synth(
            Opcode::Mflo,
            OperandBundle {
                archetype: Archetype::CompilerGenerated,
                reg1: rd,
                ..Default::default()
            },
            Fixup::None,
        ));
        out.push(self.synth(
            Opcode::Sra,
            OperandBundle::gen_rri(rd, rd, 31),
            Fixup::None,
        ));
        out.push(self.synth(
            Opcode::Beq,
            OperandBundle::gen_rri(AT, rd, 1),
            Fixup::None,
        ));
        out.push(self.synth(
            Opcode::Break,
            OperandBundle::gen_rri(ZERO, ZERO, 0),
            Fixup::None,
        ));
        out.push(self.synth(
            Opcode::Mflo,
            OperandBundle {
                archetype: Archetype::CompilerGenerated,
                reg1: rd,
                ..Default::default()
            },
            Fixup::None,
        ));
        Ok(out)
    }

    // rd, rs, rt — unsigned product that traps when HI is non-zero
    pub fn build_mulou(&self) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::RegRegReg, Archetype::RegRegImm])?;
        if self.keep_pseudo {
            return Ok(self.pseudo(bundle));
        }

        let mut out = Vec::new();
        let rt = self.multiplier_register(&bundle, &mut out);
        out.push(self.synth(
            Opcode::Multu,
            OperandBundle {
                archetype: Archetype::CompilerGenerated,
                reg1: bundle.reg2,
                reg2: rt,
                ..Default::default()
            },
            Fixup::None,
        ));
        out.push(self.synth(
            Opcode::Mfhi,
            OperandBundle {
                archetype: Archetype::CompilerGenerated,
                reg1: AT,
                ..Default::default()
            },
            Fixup::None,
        ));
        out.push(self.synth(
            Opcode::Mflo,
            OperandBundle {
                archetype: Archetype::CompilerGenerated,
                reg1: bundle.reg1,
                ..Default::default()
            },
            Fixup::None,
        ));
        out.push(self.synth(
            Opcode::Beq,
            OperandBundle::gen_rri(AT, ZERO, 1),
            Fixup::None,
        ));
        out.push(self.synth(
            Opcode::Break,
            OperandBundle::gen_rri(ZERO, ZERO, 0),
            Fixup::None,
        ));
        Ok(out)
    }

    pub fn build_move(&self) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::RegReg])?;
        if self.keep_pseudo {
            return Ok(self.pseudo(bundle));
        }
        Ok(vec![self.synth(
            Opcode::Addu,
            OperandBundle::gen_rrr(bundle.reg1, ZERO, bundle.reg2),
            Fixup::None,
        )])
    }

    pub fn build_not(&self) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::RegReg])?;
        if self.keep_pseudo {
            return Ok(self.pseudo(bundle));
        }
        Ok(vec![self.synth(
            Opcode::Nor,
            OperandBundle::gen_rrr(bundle.reg1, bundle.reg2, ZERO),
            Fixup::None,
        )])
    }

    fn build_negate(&self, opcode: Opcode) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::RegReg])?;
        if self.keep_pseudo {
            return Ok(self.pseudo(bundle));
        }
        Ok(vec![self.synth(
            opcode,
            OperandBundle::gen_rrr(bundle.reg1, ZERO, bundle.reg2),
            Fixup::None,
        )])
    }

    pub fn build_neg(&self) -> Result<Vec<Token>> {
        self.build_negate(Opcode::Sub)
    }

    pub fn build_negu(&self) -> Result<Vec<Token>> {
        self.build_negate(Opcode::Subu)
    }

    // rd, rs — copy, then conditionally replace with the negation; the guard
    // skips the subtraction for non-negative sources
    pub fn build_abs(&self) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::RegReg])?;
        if self.keep_pseudo {
            return Ok(self.pseudo(bundle));
        }
        Ok(vec![
            self.synth(
                Opcode::Addu,
                OperandBundle::gen_rrr(bundle.reg1, ZERO, bundle.reg2),
                Fixup::None,
            ),
            self.synth(
                Opcode::Bgez,
                OperandBundle::gen_rri(bundle.reg2, ZERO, 1),
                Fixup::None,
            ),
            self.synth(
                Opcode::Sub,
                OperandBundle::gen_rrr(bundle.reg1, ZERO, bundle.reg2),
                Fixup::None,
            ),
        ])
    }

    pub fn build_li(&self) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::RegImm])?;
        if self.keep_pseudo {
            return Ok(self.pseudo(bundle));
        }
        let mut out = Vec::new();
        self.load_constant(bundle.reg1, bundle.imm, &mut out);
        Ok(out)
    }

    /// The comparand register for the set-on-comparison forms.
    fn comparand_register(&self, bundle: &OperandBundle, out: &mut Vec<Token>) -> u8 {
        if bundle.archetype == Archetype::RegRegImm {
            self.load_constant(AT, bundle.imm, out);
            AT
        } else {
            bundle.reg3
        }
    }

    // rd, rs, rt — rd = (rs == rt)
    pub fn build_seq(&self) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::RegRegReg, Archetype::RegRegImm])?;
        if self.keep_pseudo {
            return Ok(self.pseudo(bundle));
        }
        let mut out = Vec::new();
        let rt = self.comparand_register(&bundle, &mut out);
        out.push(self.synth(
            Opcode::Xor,
            OperandBundle::gen_rrr(bundle.reg1, bundle.reg2, rt),
            Fixup::None,
        ));
        out.push(self.synth(
            Opcode::Sltiu,
            OperandBundle::gen_rri(bundle.reg1, bundle.reg1, 1),
            Fixup::None,
        ));
        Ok(out)
    }

    // rd, rs, rt — rd = (rs != rt)
    pub fn build_sne(&self) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::RegRegReg, Archetype::RegRegImm])?;
        if self.keep_pseudo {
            return Ok(self.pseudo(bundle));
        }
        let mut out = Vec::new();
        let rt = self.comparand_register(&bundle, &mut out);
        out.push(self.synth(
            Opcode::Xor,
            OperandBundle::gen_rrr(bundle.reg1, bundle.reg2, rt),
            Fixup::None,
        ));
        out.push(self.synth(
            Opcode::Sltu,
            OperandBundle::gen_rrr(bundle.reg1, ZERO, bundle.reg1),
            Fixup::None,
        ));
        Ok(out)
    }

    // set-on-comparison through slt/sltu, optionally swapping the operands
    // and negating the result
    fn build_set_compare(&self, unsigned: bool, swap: bool, negate: bool) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::RegRegReg, Archetype::RegRegImm])?;
        if self.keep_pseudo {
            return Ok(self.pseudo(bundle));
        }

        let set = if unsigned { Opcode::Sltu } else { Opcode::Slt };
        let mut out = Vec::new();
        let rt = self.comparand_register(&bundle, &mut out);
        let (x, y) = if swap {
            (rt, bundle.reg2)
        } else {
            (bundle.reg2, rt)
        };
        out.push(self.synth(set, OperandBundle::gen_rrr(bundle.reg1, x, y), Fixup::None));
        if negate {
            out.push(self.synth(
                Opcode::Xori,
                OperandBundle::gen_rri(bundle.reg1, bundle.reg1, 1),
                Fixup::None,
            ));
        }
        Ok(out)
    }

    pub fn build_sge(&self) -> Result<Vec<Token>> {
        self.build_set_compare(false, false, true)
    }

    pub fn build_sgeu(&self) -> Result<Vec<Token>> {
        self.build_set_compare(true, false, true)
    }

    pub fn build_sgt(&self) -> Result<Vec<Token>> {
        self.build_set_compare(false, true, false)
    }

    pub fn build_sgtu(&self) -> Result<Vec<Token>> {
        self.build_set_compare(true, true, false)
    }

    pub fn build_sle(&self) -> Result<Vec<Token>> {
        self.build_set_compare(false, true, true)
    }

    pub fn build_sleu(&self) -> Result<Vec<Token>> {
        self.build_set_compare(true, true, true)
    }

    // rotate left/right by a constant or a register count, realized with a
    // shift pair OR-ed together
    fn build_rotate(&self, left: bool) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::RegRegReg, Archetype::RegRegImm])?;
        if self.keep_pseudo {
            return Ok(self.pseudo(bundle));
        }

        let (main_shift, spill_shift) = if left {
            (Opcode::Sll, Opcode::Srl)
        } else {
            (Opcode::Srl, Opcode::Sll)
        };
        let (main_var, spill_var) = if left {
            (Opcode::Sllv, Opcode::Srlv)
        } else {
            (Opcode::Srlv, Opcode::Sllv)
        };

        let mut out = Vec::new();
        match bundle.archetype {
            Archetype::RegRegImm => {
                check_shift_amount(bundle.imm, self.line)?;
                let spill = (32 - bundle.imm) & 31;
                out.push(self.synth(
                    spill_shift,
                    OperandBundle::gen_rri(AT, bundle.reg2, spill),
                    Fixup::None,
                ));
                out.push(self.synth(
                    main_shift,
                    OperandBundle::gen_rri(bundle.reg1, bundle.reg2, bundle.imm),
                    Fixup::None,
                ));
            }
            _ => {
                // negated count mod 32 gives the spill shift distance
                out.push(self.synth(
                    Opcode::Subu,
                    OperandBundle::gen_rrr(AT, ZERO, bundle.reg3),
                    Fixup::None,
                ));
                out.push(self.synth(
                    spill_var,
                    OperandBundle::gen_rrr(AT, bundle.reg2, AT),
                    Fixup::None,
                ));
                out.push(self.synth(
                    main_var,
                    OperandBundle::gen_rrr(bundle.reg1, bundle.reg2, bundle.reg3),
                    Fixup::None,
                ));
            }
        }
        out.push(self.synth(
            Opcode::Or,
            OperandBundle::gen_rrr(bundle.reg1, bundle.reg1, AT),
            Fixup::None,
        ));
        Ok(out)
    }

    pub fn build_rol(&self) -> Result<Vec<Token>> {
        self.build_rotate(true)
    }

    pub fn build_ror(&self) -> Result<Vec<Token>> {
        self.build_rotate(false)
    }
}

#[cfg(test)]
mod tests {
    use crate::AssemblerOptions;
    use crate::ast::*;
    use crate::parser::parse_source;

    fn build(source: &str) -> Vec<Token> {
        parse_source(source, &AssemblerOptions::default()).unwrap()
    }

    fn opcodes(tokens: &[Token]) -> Vec<Opcode> {
        tokens
            .iter()
            .map(|t| match t {
                Token::Instruction(i) => i.opcode,
                other => panic!("expected instruction token, got {:?}", other),
            })
            .collect()
    }

    #[test]
    fn test_add_register_form_is_real() {
        let tokens = build("add $t0, $t1, $t2\n");
        assert_eq!(opcodes(&tokens), vec![Opcode::Add]);
        match &tokens[0] {
            Token::Instruction(t) => assert_eq!(t.operands.archetype, Archetype::RegRegReg),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_add_small_immediate_lowers_to_addi() {
        let tokens = build("add $t0, $t1, 42\n");
        assert_eq!(opcodes(&tokens), vec![Opcode::Addi]);
    }

    #[test]
    fn test_add_wide_immediate_materializes_constant() {
        let tokens = build("add $t0, $t1, 0x12345678\n");
        assert_eq!(
            opcodes(&tokens),
            vec![Opcode::Lui, Opcode::Ori, Opcode::Add]
        );
    }

    #[test]
    fn test_sub_immediate_negates_into_addi() {
        let tokens = build("sub $t0, $t1, 5\n");
        assert_eq!(opcodes(&tokens), vec![Opcode::Addi]);
        match &tokens[0] {
            Token::Instruction(t) => assert_eq!(t.operands.imm, -5),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_addi_wide_immediate_gets_prologue() {
        let tokens = build("addi $t0, $t1, 0x12345678\n");
        assert_eq!(
            opcodes(&tokens),
            vec![Opcode::Lui, Opcode::Ori, Opcode::Add]
        );
        match &tokens[0] {
            Token::Instruction(t) => {
                assert_eq!(t.operands.reg1, AT);
                assert_eq!(t.operands.imm, 0x1234);
                assert_eq!(t.operands.archetype, Archetype::CompilerGenerated);
            }
            _ => unreachable!(),
        }
        match &tokens[1] {
            Token::Instruction(t) => {
                assert_eq!(t.operands.imm, 0x5678);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_li_small_signed() {
        let tokens = build("li $t0, -7\n");
        assert_eq!(opcodes(&tokens), vec![Opcode::Addiu]);
        match &tokens[0] {
            Token::Instruction(t) => {
                assert_eq!(t.operands.reg1, 8);
                assert_eq!(t.operands.reg2, ZERO);
                assert_eq!(t.operands.imm, -7);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_li_small_unsigned() {
        let tokens = build("li $t0, 40000\n");
        assert_eq!(opcodes(&tokens), vec![Opcode::Ori]);
    }

    #[test]
    fn test_li_wide_uses_canonical_pair() {
        let tokens = build("li $t0, 0x12345678\n");
        assert_eq!(opcodes(&tokens), vec![Opcode::Lui, Opcode::Ori]);
        match (&tokens[0], &tokens[1]) {
            (Token::Instruction(lui), Token::Instruction(ori)) => {
                assert_eq!(lui.operands.reg1, AT);
                assert_eq!(lui.operands.imm, 0x1234);
                assert_eq!(ori.operands.reg1, 8);
                assert_eq!(ori.operands.reg2, AT);
                assert_eq!(ori.operands.imm, 0x5678);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_move_expands_to_addu() {
        let tokens = build("move $t0, $t1\n");
        assert_eq!(opcodes(&tokens), vec![Opcode::Addu]);
        match &tokens[0] {
            Token::Instruction(t) => {
                assert_eq!((t.operands.reg1, t.operands.reg2, t.operands.reg3), (8, 0, 9));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_not_expands_to_nor() {
        let tokens = build("not $t0, $t1\n");
        assert_eq!(opcodes(&tokens), vec![Opcode::Nor]);
    }

    #[test]
    fn test_neg_expands_to_sub() {
        let tokens = build("neg $t0, $t1\n");
        assert_eq!(opcodes(&tokens), vec![Opcode::Sub]);
    }

    #[test]
    fn test_div_two_operand_is_real() {
        let tokens = build("div $t1, $t2\n");
        assert_eq!(opcodes(&tokens), vec![Opcode::Div]);
    }

    #[test]
    fn test_div_three_operand_guards_against_zero() {
        let tokens = build("div $t0, $t1, $t2\n");
        assert_eq!(
            opcodes(&tokens),
            vec![Opcode::Bne, Opcode::Break, Opcode::Div, Opcode::Mflo]
        );
        match &tokens[0] {
            Token::Instruction(t) => {
                // guard skips the break: word offset +1
                assert_eq!(t.operands.reg1, 10);
                assert_eq!(t.operands.reg2, ZERO);
                assert_eq!(t.operands.imm, 1);
            }
            _ => unreachable!(),
        }
        match &tokens[3] {
            Token::Instruction(t) => assert_eq!(t.operands.reg1, 8),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_rem_moves_from_hi() {
        let tokens = build("rem $t0, $t1, $t2\n");
        assert_eq!(
            opcodes(&tokens),
            vec![Opcode::Bne, Opcode::Break, Opcode::Div, Opcode::Mfhi]
        );
    }

    #[test]
    fn test_div_immediate_materializes_divisor() {
        let tokens = build("div $t0, $t1, 10\n");
        assert_eq!(
            opcodes(&tokens),
            vec![
                Opcode::Addiu,
                Opcode::Bne,
                Opcode::Break,
                Opcode::Div,
                Opcode::Mflo
            ]
        );
    }

    #[test]
    fn test_mulo_overflow_check_shape() {
        let tokens = build("mulo $t0, $t1, $t2\n");
        assert_eq!(
            opcodes(&tokens),
            vec![
                Opcode::Mult,
                Opcode::Mfhi,
                Opcode::Mflo,
                Opcode::Sra,
                Opcode::Beq,
                Opcode::Break,
                Opcode::Mflo
            ]
        );
    }

    #[test]
    fn test_rol_constant_uses_shift_pair() {
        let tokens = build("rol $t0, $t1, 4\n");
        assert_eq!(
            opcodes(&tokens),
            vec![Opcode::Srl, Opcode::Sll, Opcode::Or]
        );
        match &tokens[0] {
            Token::Instruction(t) => assert_eq!(t.operands.imm, 28),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_ror_variable_uses_negated_count() {
        let tokens = build("ror $t0, $t1, $t2\n");
        assert_eq!(
            opcodes(&tokens),
            vec![Opcode::Subu, Opcode::Sllv, Opcode::Srlv, Opcode::Or]
        );
    }

    #[test]
    fn test_seq_shape() {
        let tokens = build("seq $t0, $t1, $t2\n");
        assert_eq!(opcodes(&tokens), vec![Opcode::Xor, Opcode::Sltiu]);
    }

    #[test]
    fn test_sgt_is_swapped_slt() {
        let tokens = build("sgt $t0, $t1, $t2\n");
        assert_eq!(opcodes(&tokens), vec![Opcode::Slt]);
        match &tokens[0] {
            Token::Instruction(t) => {
                assert_eq!((t.operands.reg2, t.operands.reg3), (10, 9));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_sge_negates() {
        let tokens = build("sge $t0, $t1, $t2\n");
        assert_eq!(opcodes(&tokens), vec![Opcode::Slt, Opcode::Xori]);
    }

    #[test]
    fn test_keep_pseudo_carries_li_through() {
        let options = AssemblerOptions {
            keep_pseudoinstructions: true,
        };
        let tokens = parse_source("li $t0, 0x12345678\n", &options).unwrap();
        assert_eq!(tokens.len(), 1);
        match &tokens[0] {
            Token::Pseudoinstruction(t) => {
                assert_eq!(t.mnemonic, "li");
                assert_eq!(t.operands.imm, 0x12345678);
            }
            other => panic!("expected pseudo token, got {:?}", other),
        }
    }

    #[test]
    fn test_sll_shift_range_checked() {
        assert!(parse_source("sll $t0, $t1, 32\n", &AssemblerOptions::default()).is_err());
    }

    #[test]
    fn test_abs_shape() {
        let tokens = build("abs $t0, $t1\n");
        assert_eq!(
            opcodes(&tokens),
            vec![Opcode::Addu, Opcode::Bgez, Opcode::Sub]
        );
    }
}
