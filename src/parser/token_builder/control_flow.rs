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
    pub fn build_nop(&self) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::NoParams])?;
        if self.keep_pseudo {
            return Ok(self.pseudo(bundle));
        }
        Ok(vec![self.synth(
            Opcode::Sll,
            OperandBundle::gen_rri(ZERO, ZERO, 0),
            Fixup::None,
        )])
    }

    // absolute jumps take a label or a raw target address
    fn build_jump(&self, opcode: Opcode) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::Imm, Archetype::Label])?;
        let fixup = if bundle.label.is_some() {
            Fixup::Jump
        } else {
            Fixup::None
        };
        Ok(vec![self.real(opcode, bundle, fixup)])
    }

    pub fn build_j(&self) -> Result<Vec<Token>> {
        self.build_jump(Opcode::J)
    }

    pub fn build_jal(&self) -> Result<Vec<Token>> {
        self.build_jump(Opcode::Jal)
    }

    pub fn build_jr(&self) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::Reg])?;
        Ok(vec![self.real(Opcode::Jr, bundle, Fixup::None)])
    }

    // jalr rs (linking through $ra) or jalr rd, rs
    pub fn build_jalr(&self) -> Result<Vec<Token>> {
        let mut bundle = self.parse(&[Archetype::Reg, Archetype::RegReg])?;
        if bundle.archetype == Archetype::Reg {
            bundle.reg2 = bundle.reg1;
            bundle.reg1 = RA;
        }
        Ok(vec![self.real(Opcode::Jalr, bundle, Fixup::None)])
    }

    // beq/bne compare two registers, or a register against a constant that
    // is first materialized into $at
    fn build_branch_eq(&self, opcode: Opcode) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::RegRegLabel, Archetype::RegImmLabel])?;
        if bundle.archetype == Archetype::RegRegLabel {
            return Ok(vec![self.real(opcode, bundle, Fixup::Branch)]);
        }
        if self.keep_pseudo {
            return Ok(self.pseudo(bundle));
        }

        let label = bundle.label.clone().expect("archetype carries a label");
        let mut out = Vec::new();
        self.load_constant(AT, bundle.imm, &mut out);
        out.push(self.synth(
            opcode,
            OperandBundle::gen_label(bundle.reg1, AT, label, 0),
            Fixup::Branch,
        ));
        Ok(out)
    }

    pub fn build_beq(&self) -> Result<Vec<Token>> {
        self.build_branch_eq(Opcode::Beq)
    }

    pub fn build_bne(&self) -> Result<Vec<Token>> {
        self.build_branch_eq(Opcode::Bne)
    }

    // single-register relative branches
    fn build_branch_zero(&self, opcode: Opcode) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::RegLabel])?;
        Ok(vec![self.real(opcode, bundle, Fixup::Branch)])
    }

    pub fn build_blez(&self) -> Result<Vec<Token>> {
        self.build_branch_zero(Opcode::Blez)
    }

    pub fn build_bgtz(&self) -> Result<Vec<Token>> {
        self.build_branch_zero(Opcode::Bgtz)
    }

    pub fn build_bgez(&self) -> Result<Vec<Token>> {
        self.build_branch_zero(Opcode::Bgez)
    }

    pub fn build_bltz(&self) -> Result<Vec<Token>> {
        self.build_branch_zero(Opcode::Bltz)
    }

    pub fn build_bgezal(&self) -> Result<Vec<Token>> {
        self.build_branch_zero(Opcode::Bgezal)
    }

    pub fn build_bltzal(&self) -> Result<Vec<Token>> {
        self.build_branch_zero(Opcode::Bltzal)
    }

    // unconditional branch: bgez on the zero register always takes
    pub fn build_b(&self) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::Label])?;
        if self.keep_pseudo {
            return Ok(self.pseudo(bundle));
        }
        let label = bundle.label.expect("archetype carries a label");
        Ok(vec![self.synth(
            Opcode::Bgez,
            OperandBundle::gen_label(ZERO, ZERO, label, 0),
            Fixup::Branch,
        )])
    }

    fn build_branch_zero_compare(&self, opcode: Opcode) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::RegLabel])?;
        if self.keep_pseudo {
            return Ok(self.pseudo(bundle));
        }
        let label = bundle.label.expect("archetype carries a label");
        Ok(vec![self.synth(
            opcode,
            OperandBundle::gen_label(bundle.reg1, ZERO, label, 0),
            Fixup::Branch,
        )])
    }

    pub fn build_beqz(&self) -> Result<Vec<Token>> {
        self.build_branch_zero_compare(Opcode::Beq)
    }

    pub fn build_bnez(&self) -> Result<Vec<Token>> {
        self.build_branch_zero_compare(Opcode::Bne)
    }

    /// Two-register (or register/constant) ordered comparisons synthesized
    /// from slt/sltu plus a branch on the set result. `swap` reverses the
    /// comparison operands; `branch_if_set` picks bne over beq.
    fn build_branch_compare(
        &self,
        unsigned: bool,
        swap: bool,
        branch_if_set: bool,
    ) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::RegRegLabel, Archetype::RegImmLabel])?;
        if self.keep_pseudo {
            return Ok(self.pseudo(bundle));
        }

        let label = bundle.label.clone().expect("archetype carries a label");
        let mut out = Vec::new();
        let rt = if bundle.archetype == Archetype::RegImmLabel {
            self.load_constant(AT, bundle.imm, &mut out);
            AT
        } else {
            bundle.reg2
        };

        let set = if unsigned { Opcode::Sltu } else { Opcode::Slt };
        let (x, y) = if swap {
            (rt, bundle.reg1)
        } else {
            (bundle.reg1, rt)
        };
        out.push(self.synth(set, OperandBundle::gen_rrr(AT, x, y), Fixup::None));

        let branch = if branch_if_set {
            Opcode::Bne
        } else {
            Opcode::Beq
        };
        out.push(self.synth(
            branch,
            OperandBundle::gen_label(AT, ZERO, label, 0),
            Fixup::Branch,
        ));
        Ok(out)
    }

    pub fn build_bge(&self) -> Result<Vec<Token>> {
        self.build_branch_compare(false, false, false)
    }

    pub fn build_bgeu(&self) -> Result<Vec<Token>> {
        self.build_branch_compare(true, false, false)
    }

    pub fn build_bgt(&self) -> Result<Vec<Token>> {
        self.build_branch_compare(false, true, true)
    }

    pub fn build_bgtu(&self) -> Result<Vec<Token>> {
        self.build_branch_compare(true, true, true)
    }

    pub fn build_ble(&self) -> Result<Vec<Token>> {
        self.build_branch_compare(false, true, false)
    }

    pub fn build_bleu(&self) -> Result<Vec<Token>> {
        self.build_branch_compare(true, true, false)
    }

    pub fn build_blt(&self) -> Result<Vec<Token>> {
        self.build_branch_compare(false, false, true)
    }

    pub fn build_bltu(&self) -> Result<Vec<Token>> {
        self.build_branch_compare(true, false, true)
    }

    pub fn build_syscall(&self) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::NoParams])?;
        Ok(vec![self.real(Opcode::Syscall, bundle, Fixup::None)])
    }

    pub fn build_break(&self) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::NoParams, Archetype::Imm])?;
        if !(0..=0xFFFFF).contains(&bundle.imm) {
            return Err(AssemblyError::InvalidInstruction {
                line: self.line,
                reason: format!("Break code must fit in 20 bits, got {}", bundle.imm),
            }
            .into());
        }
        Ok(vec![self.real(Opcode::Break, bundle, Fixup::None)])
    }

    // REGIMM trap-on-comparison against a 16-bit constant
    fn build_trap_immediate(&self, opcode: Opcode) -> Result<Vec<Token>> {
        let bundle = self.parse(&[Archetype::RegImm])?;
        if !fits_signed16(bundle.imm) {
            return Err(AssemblyError::InvalidInstruction {
                line: self.line,
                reason: format!(
                    "Trap comparand must be a signed 16 bit value, got {}",
                    bundle.imm
                ),
            }
            .into());
        }
        Ok(vec![self.real(opcode, bundle, Fixup::None)])
    }

    pub fn build_tgei(&self) -> Result<Vec<Token>> {
        self.build_trap_immediate(Opcode::Tgei)
    }

    pub fn build_tgeiu(&self) -> Result<Vec<Token>> {
        self.build_trap_immediate(Opcode::Tgeiu)
    }

    pub fn build_tlti(&self) -> Result<Vec<Token>> {
        self.build_trap_immediate(Opcode::Tlti)
    }

    pub fn build_tltiu(&self) -> Result<Vec<Token>> {
        self.build_trap_immediate(Opcode::Tltiu)
    }

    pub fn build_teqi(&self) -> Result<Vec<Token>> {
        self.build_trap_immediate(Opcode::Teqi)
    }

    pub fn build_tnei(&self) -> Result<Vec<Token>> {
        self.build_trap_immediate(Opcode::Tnei)
    }
}
