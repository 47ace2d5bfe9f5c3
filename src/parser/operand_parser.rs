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

use crate::ast::{Archetype, Operand, OperandBundle};
use crate::errors::AssemblyError;

// Candidate archetypes in their canonical order. Matching walks this list
// and takes the first mask member whose shape fits, so the order is part of
// the surface-syntax contract.
const MATCH_ORDER: [Archetype; 18] = [
    Archetype::NoParams,
    Archetype::Reg,
    Archetype::Imm,
    Archetype::RegReg,
    Archetype::RegImm,
    Archetype::RegRegReg,
    Archetype::RegRegImm,
    Archetype::ImmRegReg,
    Archetype::Label,
    Archetype::ImmLabel,
    Archetype::RegLabel,
    Archetype::RegRegLabel,
    Archetype::RegImmLabel,
    Archetype::RegMemReg,
    Archetype::RegOffsetForReg,
    Archetype::RegLabelAsOffsetReg,
    Archetype::RegLabelPlusImm,
    Archetype::RegLabelPlusImmOffsetForReg,
];

/// Select the archetype for the written operands of one instruction against
/// the mnemonic's mask and decode its fields. Immediate range is not checked
/// here; each builder enforces the subrange its instruction encodes.
pub fn parse_operands(
    operands: &[Operand],
    mask: &[Archetype],
    line: usize,
) -> Result<OperandBundle, AssemblyError> {
    for archetype in MATCH_ORDER {
        if !mask.contains(&archetype) {
            continue;
        }
        if let Some(bundle) = try_match(archetype, operands) {
            return Ok(bundle);
        }
    }

    Err(AssemblyError::InvalidSyntax {
        line,
        reason: "Operands do not match any form accepted by this instruction.".to_string(),
    })
}

fn try_match(archetype: Archetype, ops: &[Operand]) -> Option<OperandBundle> {
    let mut bundle = OperandBundle {
        archetype,
        ..Default::default()
    };

    match (archetype, ops) {
        (Archetype::NoParams, []) => {}
        (Archetype::Reg, [Operand::Register(r)]) => {
            bundle.reg1 = *r;
        }
        (Archetype::Imm, [Operand::Immediate(v)]) => {
            bundle.imm = *v as i32;
        }
        (Archetype::RegReg, [Operand::Register(a), Operand::Register(b)]) => {
            bundle.reg1 = *a;
            bundle.reg2 = *b;
        }
        (Archetype::RegImm, [Operand::Register(a), Operand::Immediate(v)]) => {
            bundle.reg1 = *a;
            bundle.imm = *v as i32;
        }
        (
            Archetype::RegRegReg,
            [
                Operand::Register(a),
                Operand::Register(b),
                Operand::Register(c),
            ],
        ) => {
            bundle.reg1 = *a;
            bundle.reg2 = *b;
            bundle.reg3 = *c;
        }
        (
            Archetype::RegRegImm,
            [
                Operand::Register(a),
                Operand::Register(b),
                Operand::Immediate(v),
            ],
        ) => {
            bundle.reg1 = *a;
            bundle.reg2 = *b;
            bundle.imm = *v as i32;
        }
        (
            Archetype::ImmRegReg,
            [
                Operand::Immediate(v),
                Operand::Register(a),
                Operand::Register(b),
            ],
        ) => {
            bundle.imm = *v as i32;
            bundle.reg1 = *a;
            bundle.reg2 = *b;
        }
        (Archetype::Label, [Operand::Label(l)]) => {
            bundle.label = Some(l.clone());
        }
        (Archetype::ImmLabel, [Operand::Immediate(v), Operand::Label(l)]) => {
            bundle.imm = *v as i32;
            bundle.label = Some(l.clone());
        }
        (Archetype::RegLabel, [Operand::Register(a), Operand::Label(l)]) => {
            bundle.reg1 = *a;
            bundle.label = Some(l.clone());
        }
        (
            Archetype::RegRegLabel,
            [
                Operand::Register(a),
                Operand::Register(b),
                Operand::Label(l),
            ],
        ) => {
            bundle.reg1 = *a;
            bundle.reg2 = *b;
            bundle.label = Some(l.clone());
        }
        (
            Archetype::RegImmLabel,
            [
                Operand::Register(a),
                Operand::Immediate(v),
                Operand::Label(l),
            ],
        ) => {
            bundle.reg1 = *a;
            bundle.imm = *v as i32;
            bundle.label = Some(l.clone());
        }
        (Archetype::RegMemReg, [Operand::Register(a), Operand::Indirect(b)]) => {
            bundle.reg1 = *a;
            bundle.reg2 = *b;
        }
        (Archetype::RegOffsetForReg, [Operand::Register(a), Operand::OffsetBase(off, b)]) => {
            bundle.reg1 = *a;
            bundle.reg2 = *b;
            bundle.offset = *off as i32;
        }
        (Archetype::RegLabelAsOffsetReg, [Operand::Register(a), Operand::LabelBase(l, b)]) => {
            bundle.reg1 = *a;
            bundle.reg2 = *b;
            bundle.label = Some(l.clone());
        }
        (Archetype::RegLabelPlusImm, [Operand::Register(a), Operand::LabelPlusImm(l, i)]) => {
            bundle.reg1 = *a;
            bundle.imm = *i;
            bundle.label = Some(l.clone());
        }
        (
            Archetype::RegLabelPlusImmOffsetForReg,
            [Operand::Register(a), Operand::LabelPlusImmBase(l, i, b)],
        ) => {
            bundle.reg1 = *a;
            bundle.reg2 = *b;
            bundle.imm = *i;
            bundle.label = Some(l.clone());
        }
        _ => return None,
    }

    Some(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_reg_reg_reg() {
        let ops = vec![
            Operand::Register(8),
            Operand::Register(9),
            Operand::Register(10),
        ];
        let bundle = parse_operands(&ops, &[Archetype::RegRegReg], 1).unwrap();
        assert_eq!(bundle.archetype, Archetype::RegRegReg);
        assert_eq!((bundle.reg1, bundle.reg2, bundle.reg3), (8, 9, 10));
    }

    #[test]
    fn test_match_picks_first_fitting_archetype() {
        // RegRegImm comes before RegRegLabel in the canonical order, but the
        // shapes differ, so the label form must fall through to it.
        let ops = vec![
            Operand::Register(8),
            Operand::Register(9),
            Operand::Label("target".to_string()),
        ];
        let bundle =
            parse_operands(&ops, &[Archetype::RegRegImm, Archetype::RegRegLabel], 1).unwrap();
        assert_eq!(bundle.archetype, Archetype::RegRegLabel);
        assert_eq!(bundle.label.as_deref(), Some("target"));
    }

    #[test]
    fn test_match_memory_forms() {
        let ops = vec![Operand::Register(8), Operand::Indirect(29)];
        let bundle = parse_operands(
            &ops,
            &[Archetype::RegMemReg, Archetype::RegOffsetForReg],
            1,
        )
        .unwrap();
        assert_eq!(bundle.archetype, Archetype::RegMemReg);
        assert_eq!(bundle.reg2, 29);

        let ops = vec![Operand::Register(8), Operand::OffsetBase(-12, 29)];
        let bundle = parse_operands(
            &ops,
            &[Archetype::RegMemReg, Archetype::RegOffsetForReg],
            1,
        )
        .unwrap();
        assert_eq!(bundle.archetype, Archetype::RegOffsetForReg);
        assert_eq!(bundle.offset, -12);
    }

    #[test]
    fn test_match_label_plus_imm_base() {
        let ops = vec![
            Operand::Register(4),
            Operand::LabelPlusImmBase("table".to_string(), 16, 9),
        ];
        let bundle =
            parse_operands(&ops, &[Archetype::RegLabelPlusImmOffsetForReg], 1).unwrap();
        assert_eq!(bundle.archetype, Archetype::RegLabelPlusImmOffsetForReg);
        assert_eq!(bundle.reg1, 4);
        assert_eq!(bundle.reg2, 9);
        assert_eq!(bundle.imm, 16);
        assert_eq!(bundle.label.as_deref(), Some("table"));
    }

    #[test]
    fn test_no_fit_is_rejected() {
        let ops = vec![Operand::Register(8)];
        let result = parse_operands(&ops, &[Archetype::RegReg], 7);
        assert_eq!(
            result,
            Err(AssemblyError::InvalidSyntax {
                line: 7,
                reason: "Operands do not match any form accepted by this instruction."
                    .to_string()
            })
        );
    }

    #[test]
    fn test_empty_mask_rejects_everything() {
        assert!(parse_operands(&[], &[], 1).is_err());
    }
}
