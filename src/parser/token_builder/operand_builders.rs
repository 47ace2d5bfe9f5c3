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

use crate::ast::{Operand, register_index};
use crate::errors::AssemblyError;
use crate::parser::Rule;
use crate::parser::token_builder::utility_functions::parse_int;
use anyhow::Result;
use pest::iterators::Pair;

// Helper to build an Operand from a pest Pair
pub fn build_operand(pair: Pair<Rule>) -> Result<Operand> {
    let line = pair.as_span().start_pos().line_col().0;
    let inner_pair = pair
        .into_inner()
        .next()
        .ok_or_else(|| AssemblyError::InvalidSyntax {
            line,
            reason: "Expected an inner operand rule.".to_string(),
        })?;
    match inner_pair.as_rule() {
        Rule::register => Ok(Operand::Register(build_register(inner_pair)?)),
        Rule::number => Ok(Operand::Immediate(parse_int(inner_pair.as_str(), line)?)),
        Rule::label_expr => build_label_expr(inner_pair),
        Rule::memory => build_memory(inner_pair),
        _ => unreachable!("Unknown operand rule: {:?}", inner_pair.as_rule()),
    }
}

// translate a register pair ($name or $number) to its index
pub fn build_register(pair: Pair<Rule>) -> Result<u8> {
    let line = pair.as_span().start_pos().line_col().0;
    let text = pair.as_str();
    let name = text
        .strip_prefix('$')
        .ok_or_else(|| AssemblyError::InvalidSyntax {
            line,
            reason: format!("Invalid register: {}", text),
        })?
        .to_lowercase();

    register_index(&name).ok_or_else(|| {
        AssemblyError::InvalidSyntax {
            line,
            reason: format!("Invalid register: {}", text),
        }
        .into()
    })
}

// label with optional constant addend, e.g. msg or msg+4
fn build_label_expr(pair: Pair<Rule>) -> Result<Operand> {
    let line = pair.as_span().start_pos().line_col().0;
    let mut inner = pair.into_inner();
    let name = inner
        .next()
        .ok_or_else(|| AssemblyError::InvalidSyntax {
            line,
            reason: "Expected a label name.".to_string(),
        })?
        .as_str()
        .to_string();

    match inner.next() {
        Some(addend_pair) => {
            let addend = parse_int(addend_pair.as_str(), line)?;
            Ok(Operand::LabelPlusImm(name, addend as i32))
        }
        None => Ok(Operand::Label(name)),
    }
}

// (rs), off(rs), lbl(rs), lbl+imm(rs)
fn build_memory(pair: Pair<Rule>) -> Result<Operand> {
    let line = pair.as_span().start_pos().line_col().0;
    let mut addr: Option<Operand> = None;
    let mut base: Option<u8> = None;

    for inner_pair in pair.into_inner() {
        match inner_pair.as_rule() {
            Rule::number => {
                addr = Some(Operand::Immediate(parse_int(inner_pair.as_str(), line)?));
            }
            Rule::label_expr => {
                addr = Some(build_label_expr(inner_pair)?);
            }
            Rule::register => {
                base = Some(build_register(inner_pair)?);
            }
            _ => unreachable!("Unknown memory operand rule: {:?}", inner_pair.as_rule()),
        }
    }

    let base = base.ok_or_else(|| AssemblyError::InvalidSyntax {
        line,
        reason: "Memory operand is missing its base register.".to_string(),
    })?;

    match addr {
        None => Ok(Operand::Indirect(base)),
        Some(Operand::Immediate(offset)) => Ok(Operand::OffsetBase(offset, base)),
        Some(Operand::Label(name)) => Ok(Operand::LabelBase(name, base)),
        Some(Operand::LabelPlusImm(name, imm)) => Ok(Operand::LabelPlusImmBase(name, imm, base)),
        Some(_) => unreachable!("memory address part is numeric or a label expression"),
    }
}

#[cfg(test)]
mod tests {
    use crate::AssemblerOptions;
    use crate::ast::Token;
    use crate::parser::parse_source;

    #[test]
    fn test_register_forms() {
        // numeric and ABI-name registers resolve to the same indices
        let tokens = parse_source(
            "add $8, $9, $10\nadd $t0, $t1, $t2\n",
            &AssemblerOptions::default(),
        )
        .unwrap();
        match (&tokens[0], &tokens[1]) {
            (Token::Instruction(a), Token::Instruction(b)) => {
                assert_eq!(a.operands, b.operands);
            }
            other => panic!("expected two instructions, got {:?}", other),
        }
    }

    #[test]
    fn test_numeric_literal_bases() {
        let options = AssemblerOptions {
            keep_pseudoinstructions: true,
        };
        for (source, value) in [
            ("li $t0, 10\n", 10),
            ("li $t0, 0x10\n", 16),
            ("li $t0, 010\n", 8),
            ("li $t0, 0b110\n", 6),
            ("li $t0, -10\n", -10),
        ] {
            let tokens = parse_source(source, &options).unwrap();
            match &tokens[0] {
                Token::Pseudoinstruction(t) => assert_eq!(t.operands.imm, value, "{}", source),
                other => panic!("expected pseudo token, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_bad_register_is_rejected() {
        assert!(parse_source("add $t0, $t1, $zz\n", &AssemblerOptions::default()).is_err());
        assert!(parse_source("add $t0, $t1, $32\n", &AssemblerOptions::default()).is_err());
    }
}
