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

// every addressing form the memory-transfer mnemonics accept
const MEM_MASK: [Archetype; 7] = [
    Archetype::RegImm,
    Archetype::RegMemReg,
    Archetype::RegOffsetForReg,
    Archetype::RegLabel,
    Archetype::RegLabelAsOffsetReg,
    Archetype::RegLabelPlusImm,
    Archetype::RegLabelPlusImmOffsetForReg,
];

/// The base register and 16-bit displacement a transfer ends up using once
/// any address prologue has run. Label displacements stay symbolic until
/// pass 2 resolves their low half.
enum MemAddr {
    BaseOffset(u8, i32),
    LoLabel(u8, String, i32),
}

impl<'a> TokenBuilder<'a> {
    /// Emit the address prologue for a memory-form bundle. Constant
    /// addresses wider than 16 bits and all label addresses load their high
    /// half into $at; indexed label forms fold the written base register in
    /// with an addu.
    fn mem_address(&self, bundle: &OperandBundle, out: &mut Vec<Token>) -> MemAddr {
        match bundle.archetype {
            Archetype::RegMemReg => MemAddr::BaseOffset(bundle.reg2, 0),
            Archetype::RegOffsetForReg => {
                if fits_signed16(bundle.offset) {
                    MemAddr::BaseOffset(bundle.reg2, bundle.offset)
                } else {
                    out.push(self.synth(
                        Opcode::Lui,
                        OperandBundle::gen_rri(AT, ZERO, hi16(bundle.offset)),
                        Fixup::None,
                    ));
                    out.push(self.synth(
                        Opcode::Addu,
                        OperandBundle::gen_rrr(AT, AT, bundle.reg2),
                        Fixup::None,
                    ));
                    MemAddr::BaseOffset(AT, lo16(bundle.offset))
                }
            }
            Archetype::RegImm => {
                // the absolute-address form keeps its raw low half; the high
                // half alone goes through $at
                out.push(self.synth(
                    Opcode::Lui,
                    OperandBundle::gen_rri(AT, ZERO, hi16(bundle.imm)),
                    Fixup::None,
                ));
                MemAddr::BaseOffset(AT, lo16(bundle.imm))
            }
            Archetype::RegLabel | Archetype::RegLabelPlusImm => {
                let label = bundle.label.clone().expect("archetype carries a label");
                out.push(self.synth(
                    Opcode::Lui,
                    OperandBundle::gen_label(AT, ZERO, label.clone(), bundle.imm),
                    Fixup::Hi16,
                ));
                MemAddr::LoLabel(AT, label, bundle.imm)
            }
            Archetype::RegLabelAsOffsetReg | Archetype::RegLabelPlusImmOffsetForReg => {
                let label = bundle.label.clone().expect("archetype carries a label");
                out.push(self.synth(
                    Opcode::Lui,
                    OperandBundle::gen_label(AT, ZERO, label.clone(), bundle.imm),
                    Fixup::Hi16,
                ));
                out.push(self.synth(
                    Opcode::Addu,
                    OperandBundle::gen_rrr(AT, AT, bundle.reg2),
                    Fixup::None,
                ));
                MemAddr::LoLabel(AT, label, bundle.imm)
            }
            _ => unreachable!("memory mask admits only memory-form archetypes"),
        }
    }

    // one transfer at a byte displacement from the prepared address
    fn mem_transfer(&self, opcode: Opcode, rt: u8, addr: &MemAddr, extra: i32) -> Token {
        match addr {
            MemAddr::BaseOffset(base, offset) => self.synth(
                opcode,
                OperandBundle::gen_mem(rt, *base, offset + extra),
                Fixup::None,
            ),
            MemAddr::LoLabel(base, label, addend) => self.synth(
                opcode,
                OperandBundle::gen_label(rt, *base, label.clone(), addend + extra),
                Fixup::Lo16,
            ),
        }
    }

    /// Shared path of every single-transfer load and store: direct forms
    /// encode as-is, everything else lowers to an address prologue plus one
    /// transfer through $at.
    fn build_transfer(&self, opcode: Opcode) -> Result<Vec<Token>> {
        let bundle = self.parse(&MEM_MASK)?;
        match bundle.archetype {
            Archetype::RegMemReg => Ok(vec![self.real(opcode, bundle, Fixup::None)]),
            Archetype::RegOffsetForReg if fits_signed16(bundle.offset) => {
                Ok(vec![self.real(opcode, bundle, Fixup::None)])
            }
            _ => {
                if self.keep_pseudo {
                    return Ok(self.pseudo(bundle));
                }
                let mut out = Vec::new();
                let addr = self.mem_address(&bundle, &mut out);
                out.push(self.mem_transfer(opcode, bundle.reg1, &addr, 0));
                Ok(out)
            }
        }
    }

    pub fn build_lb(&self) -> Result<Vec<Token>> {
        self.build_transfer(Opcode::Lb)
    }

    pub fn build_lbu(&self) -> Result<Vec<Token>> {
        self.build_transfer(Opcode::Lbu)
    }

    pub fn build_lh(&self) -> Result<Vec<Token>> {
        self.build_transfer(Opcode::Lh)
    }

    pub fn build_lhu(&self) -> Result<Vec<Token>> {
        self.build_transfer(Opcode::Lhu)
    }

    pub fn build_lw(&self) -> Result<Vec<Token>> {
        self.build_transfer(Opcode::Lw)
    }

    pub fn build_lwl(&self) -> Result<Vec<Token>> {
        self.build_transfer(Opcode::Lwl)
    }

    pub fn build_lwr(&self) -> Result<Vec<Token>> {
        self.build_transfer(Opcode::Lwr)
    }

    pub fn build_ll(&self) -> Result<Vec<Token>> {
        self.build_transfer(Opcode::Ll)
    }

    pub fn build_sb(&self) -> Result<Vec<Token>> {
        self.build_transfer(Opcode::Sb)
    }

    pub fn build_sh(&self) -> Result<Vec<Token>> {
        self.build_transfer(Opcode::Sh)
    }

    pub fn build_sw(&self) -> Result<Vec<Token>> {
        self.build_transfer(Opcode::Sw)
    }

    pub fn build_swl(&self) -> Result<Vec<Token>> {
        self.build_transfer(Opcode::Swl)
    }

    pub fn build_swr(&self) -> Result<Vec<Token>> {
        self.build_transfer(Opcode::Swr)
    }

    pub fn build_sc(&self) -> Result<Vec<Token>> {
        self.build_transfer(Opcode::Sc)
    }

    pub fn build_lwc1(&self) -> Result<Vec<Token>> {
        self.build_transfer(Opcode::Lwc1)
    }

    pub fn build_swc1(&self) -> Result<Vec<Token>> {
        self.build_transfer(Opcode::Swc1)
    }

    pub fn build_ldc1(&self) -> Result<Vec<Token>> {
        self.build_transfer(Opcode::Ldc1)
    }

    pub fn build_sdc1(&self) -> Result<Vec<Token>> {
        self.build_transfer(Opcode::Sdc1)
    }

    // integer doubleword transfers: two word transfers at +0 and +4
    fn build_pair_transfer(&self, opcode: Opcode) -> Result<Vec<Token>> {
        let bundle = self.parse(&MEM_MASK)?;
        check_pair_destination(bundle.reg1, self.line)?;
        if self.keep_pseudo {
            return Ok(self.pseudo(bundle));
        }

        let mut out = Vec::new();
        let addr = self.mem_address(&bundle, &mut out);
        out.push(self.mem_transfer(opcode, bundle.reg1, &addr, 0));
        out.push(self.mem_transfer(opcode, bundle.reg1 + 1, &addr, 4));
        Ok(out)
    }

    pub fn build_ld(&self) -> Result<Vec<Token>> {
        self.build_pair_transfer(Opcode::Lw)
    }

    pub fn build_sd(&self) -> Result<Vec<Token>> {
        self.build_pair_transfer(Opcode::Sw)
    }

    // unaligned halfword load: high byte (at +1, little endian) shifted over
    // the zero-extended low byte
    fn build_unaligned_half(&self, signed: bool) -> Result<Vec<Token>> {
        let bundle = self.parse(&MEM_MASK)?;
        if self.keep_pseudo {
            return Ok(self.pseudo(bundle));
        }

        let high_load = if signed { Opcode::Lb } else { Opcode::Lbu };
        let rd = bundle.reg1;
        let mut out = Vec::new();
        let addr = self.mem_address(&bundle, &mut out);
        out.push(self.mem_transfer(high_load, rd, &addr, 1));
        out.push(self.mem_transfer(Opcode::Lbu, AT, &addr, 0));
        out.push(self.synth(
            Opcode::Sll,
            OperandBundle::gen_rri(rd, rd, 8),
            Fixup::None,
        ));
        out.push(self.synth(
            Opcode::Or,
            OperandBundle::gen_rrr(rd, rd, AT),
            Fixup::None,
        ));
        Ok(out)
    }

    pub fn build_ulh(&self) -> Result<Vec<Token>> {
        self.build_unaligned_half(true)
    }

    pub fn build_ulhu(&self) -> Result<Vec<Token>> {
        self.build_unaligned_half(false)
    }

    // unaligned word transfers through the left/right pair
    pub fn build_ulw(&self) -> Result<Vec<Token>> {
        let bundle = self.parse(&MEM_MASK)?;
        if self.keep_pseudo {
            return Ok(self.pseudo(bundle));
        }
        let mut out = Vec::new();
        let addr = self.mem_address(&bundle, &mut out);
        out.push(self.mem_transfer(Opcode::Lwl, bundle.reg1, &addr, 3));
        out.push(self.mem_transfer(Opcode::Lwr, bundle.reg1, &addr, 0));
        Ok(out)
    }

    pub fn build_usw(&self) -> Result<Vec<Token>> {
        let bundle = self.parse(&MEM_MASK)?;
        if self.keep_pseudo {
            return Ok(self.pseudo(bundle));
        }
        let mut out = Vec::new();
        let addr = self.mem_address(&bundle, &mut out);
        out.push(self.mem_transfer(Opcode::Swl, bundle.reg1, &addr, 3));
        out.push(self.mem_transfer(Opcode::Swr, bundle.reg1, &addr, 0));
        Ok(out)
    }

    // single-register floating point spellings of the coprocessor transfers
    fn build_fp_transfer(&self, opcode: Opcode, double: bool) -> Result<Vec<Token>> {
        if double {
            let bundle = self.parse(&MEM_MASK)?;
            check_even_registers(&[bundle.reg1], self.line)?;
            self.build_transfer_from(opcode, bundle)
        } else {
            self.build_transfer(opcode)
        }
    }

    // build_transfer, but for callers that already parsed and validated
    fn build_transfer_from(&self, opcode: Opcode, bundle: OperandBundle) -> Result<Vec<Token>> {
        match bundle.archetype {
            Archetype::RegMemReg => Ok(vec![self.real(opcode, bundle, Fixup::None)]),
            Archetype::RegOffsetForReg if fits_signed16(bundle.offset) => {
                Ok(vec![self.real(opcode, bundle, Fixup::None)])
            }
            _ => {
                if self.keep_pseudo {
                    return Ok(self.pseudo(bundle));
                }
                let mut out = Vec::new();
                let addr = self.mem_address(&bundle, &mut out);
                out.push(self.mem_transfer(opcode, bundle.reg1, &addr, 0));
                Ok(out)
            }
        }
    }

    pub fn build_l_s(&self) -> Result<Vec<Token>> {
        self.build_fp_transfer(Opcode::Lwc1, false)
    }

    pub fn build_l_d(&self) -> Result<Vec<Token>> {
        self.build_fp_transfer(Opcode::Ldc1, true)
    }

    pub fn build_s_s(&self) -> Result<Vec<Token>> {
        self.build_fp_transfer(Opcode::Swc1, false)
    }

    pub fn build_s_d(&self) -> Result<Vec<Token>> {
        self.build_fp_transfer(Opcode::Sdc1, true)
    }

    // load address: the canonical high/low pair against the label, plus an
    // add of the written base register when one is present
    pub fn build_la(&self) -> Result<Vec<Token>> {
        let bundle = self.parse(&[
            Archetype::RegImm,
            Archetype::RegLabel,
            Archetype::RegLabelAsOffsetReg,
            Archetype::RegLabelPlusImm,
            Archetype::RegLabelPlusImmOffsetForReg,
        ])?;
        if self.keep_pseudo {
            return Ok(self.pseudo(bundle));
        }

        // a raw constant address degenerates to a constant load
        if bundle.archetype == Archetype::RegImm {
            let mut out = Vec::new();
            self.load_constant(bundle.reg1, bundle.imm, &mut out);
            return Ok(out);
        }

        let label = bundle.label.clone().expect("archetype carries a label");
        let mut out = Vec::new();
        out.push(self.synth(
            Opcode::Lui,
            OperandBundle::gen_label(AT, ZERO, label.clone(), bundle.imm),
            Fixup::Hi16,
        ));
        out.push(self.synth(
            Opcode::Ori,
            OperandBundle::gen_label(bundle.reg1, AT, label, bundle.imm),
            Fixup::Lo16,
        ));
        if matches!(
            bundle.archetype,
            Archetype::RegLabelAsOffsetReg | Archetype::RegLabelPlusImmOffsetForReg
        ) {
            out.push(self.synth(
                Opcode::Add,
                OperandBundle::gen_rrr(bundle.reg1, bundle.reg1, bundle.reg2),
                Fixup::None,
            ));
        }
        Ok(out)
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
    fn test_lw_base_offset_is_real() {
        let tokens = build("lw $t0, 8($sp)\n");
        assert_eq!(opcodes(&tokens), vec![Opcode::Lw]);
        match &tokens[0] {
            Token::Instruction(t) => {
                assert_eq!(t.operands.archetype, Archetype::RegOffsetForReg);
                assert_eq!(t.operands.offset, 8);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_lw_bare_indirect_is_real() {
        let tokens = build("lw $t0, ($t1)\n");
        assert_eq!(opcodes(&tokens), vec![Opcode::Lw]);
        match &tokens[0] {
            Token::Instruction(t) => {
                assert_eq!(t.operands.archetype, Archetype::RegMemReg);
                assert_eq!(t.operands.offset, 0);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_lw_label_lowers_to_lui_pair() {
        let tokens = build("lw $t0, msg\n");
        assert_eq!(opcodes(&tokens), vec![Opcode::Lui, Opcode::Lw]);
        match (&tokens[0], &tokens[1]) {
            (Token::Instruction(lui), Token::Instruction(lw)) => {
                assert_eq!(lui.fixup, Fixup::Hi16);
                assert_eq!(lui.operands.reg1, AT);
                assert_eq!(lw.fixup, Fixup::Lo16);
                assert_eq!((lw.operands.reg1, lw.operands.reg2), (8, AT));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_lw_absolute_address_keeps_raw_low_half() {
        // the absolute form is exactly a lui plus one transfer
        let tokens = build("lw $t0, 0x10010004\n");
        assert_eq!(opcodes(&tokens), vec![Opcode::Lui, Opcode::Lw]);
        match (&tokens[0], &tokens[1]) {
            (Token::Instruction(lui), Token::Instruction(lw)) => {
                assert_eq!(lui.operands.imm, 0x1001);
                assert_eq!(lw.operands.offset, 0x0004);
                assert_eq!(lw.operands.reg2, AT);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_lw_indexed_label_folds_base_register() {
        let tokens = build("lw $t0, table($t1)\n");
        assert_eq!(
            opcodes(&tokens),
            vec![Opcode::Lui, Opcode::Addu, Opcode::Lw]
        );
        match &tokens[1] {
            Token::Instruction(addu) => {
                assert_eq!(
                    (addu.operands.reg1, addu.operands.reg2, addu.operands.reg3),
                    (AT, AT, 9)
                );
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_lw_wide_offset_gets_prologue() {
        let tokens = build("lw $t0, 0x12340($t1)\n");
        assert_eq!(
            opcodes(&tokens),
            vec![Opcode::Lui, Opcode::Addu, Opcode::Lw]
        );
        match &tokens[2] {
            Token::Instruction(lw) => {
                assert_eq!(lw.operands.offset, 0x2340);
                assert_eq!(lw.operands.reg2, AT);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_ld_splits_into_word_pair() {
        let tokens = build("ld $t0, 8($sp)\n");
        assert_eq!(opcodes(&tokens), vec![Opcode::Lw, Opcode::Lw]);
        match (&tokens[0], &tokens[1]) {
            (Token::Instruction(low), Token::Instruction(high)) => {
                assert_eq!((low.operands.reg1, low.operands.offset), (8, 8));
                assert_eq!((high.operands.reg1, high.operands.offset), (9, 12));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_ld_rejects_ra_destination() {
        assert!(parse_source("ld $ra, 0($sp)\n", &AssemblerOptions::default()).is_err());
    }

    #[test]
    fn test_ulh_shape() {
        let tokens = build("ulh $t0, 2($t1)\n");
        assert_eq!(
            opcodes(&tokens),
            vec![Opcode::Lb, Opcode::Lbu, Opcode::Sll, Opcode::Or]
        );
        match (&tokens[0], &tokens[1]) {
            (Token::Instruction(high), Token::Instruction(low)) => {
                assert_eq!((high.operands.reg1, high.operands.offset), (8, 3));
                assert_eq!((low.operands.reg1, low.operands.offset), (AT, 2));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_ulw_uses_left_right_pair() {
        let tokens = build("ulw $t0, 0($t1)\n");
        assert_eq!(opcodes(&tokens), vec![Opcode::Lwl, Opcode::Lwr]);
        match &tokens[0] {
            Token::Instruction(lwl) => assert_eq!(lwl.operands.offset, 3),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_la_label_shape() {
        let tokens = build("la $a0, msg\n");
        assert_eq!(opcodes(&tokens), vec![Opcode::Lui, Opcode::Ori]);
        match (&tokens[0], &tokens[1]) {
            (Token::Instruction(lui), Token::Instruction(ori)) => {
                assert_eq!(lui.fixup, Fixup::Hi16);
                assert_eq!(ori.fixup, Fixup::Lo16);
                assert_eq!((ori.operands.reg1, ori.operands.reg2), (4, AT));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_la_with_addend_and_base() {
        let tokens = build("la $a0, table+8($t1)\n");
        assert_eq!(
            opcodes(&tokens),
            vec![Opcode::Lui, Opcode::Ori, Opcode::Add]
        );
        match &tokens[0] {
            Token::Instruction(lui) => assert_eq!(lui.operands.imm, 8),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_l_d_requires_even_register() {
        assert!(parse_source("l.d $f1, 0($t0)\n", &AssemblerOptions::default()).is_err());
        assert!(parse_source("l.d $f2, 0($t0)\n", &AssemblerOptions::default()).is_ok());
    }

    #[test]
    fn test_sw_label_plus_addend() {
        let tokens = build("sw $t0, msg+4\n");
        assert_eq!(opcodes(&tokens), vec![Opcode::Lui, Opcode::Sw]);
        match &tokens[1] {
            Token::Instruction(sw) => {
                assert_eq!(sw.operands.imm, 4);
                assert_eq!(sw.fixup, Fixup::Lo16);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_keep_pseudo_label_load() {
        let options = AssemblerOptions {
            keep_pseudoinstructions: true,
        };
        let tokens = parse_source("lw $t0, msg\n", &options).unwrap();
        assert_eq!(tokens.len(), 1);
        match &tokens[0] {
            Token::Pseudoinstruction(t) => assert_eq!(t.mnemonic, "lw"),
            other => panic!("expected pseudo token, got {:?}", other),
        }
    }
}
