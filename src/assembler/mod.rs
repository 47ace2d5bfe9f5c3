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

pub mod encoder;
pub mod segment;
pub mod symbol_table;

use crate::ast::*;
use crate::errors::AssemblyError;
use segment::{SegmentCursors, SegmentSet};
use symbol_table::{SymbolTable, bind_symbol, get_symbol};

/// Pass 1: walk the token stream in emission order, assign every encodable
/// token its address, and bind each tag to the current cursor. Instructions
/// only land in code segments, on 4-aligned addresses.
pub fn layout(tokens: &mut [Token]) -> Result<SymbolTable, AssemblyError> {
    let mut symbols = SymbolTable::new();
    let mut cursors = SegmentCursors::new();
    let mut exported: Vec<String> = Vec::new();

    for token in tokens.iter_mut() {
        match token {
            Token::Directive(t) => match &t.kind {
                DirectiveKind::Segment(segment, address) => {
                    cursors.switch(*segment, *address);
                    t.address = cursors.cursor();
                }
                DirectiveKind::Align(power) => {
                    cursors.align(*power);
                    t.address = cursors.cursor();
                }
                DirectiveKind::Globl(name) => {
                    exported.push(name.clone());
                    t.address = cursors.cursor();
                }
                data => {
                    t.address = cursors.cursor();
                    cursors.advance(data.byte_size());
                }
            },
            Token::Tag(t) => {
                bind_symbol(&mut symbols, &t.name, cursors.cursor(), t.line)?;
            }
            Token::Instruction(t) => {
                t.address = instruction_slot(&mut cursors, t.line)?;
            }
            Token::Pseudoinstruction(t) => {
                t.address = instruction_slot(&mut cursors, t.line)?;
            }
        }
    }

    // .globl markings apply once every label is bound
    for name in exported {
        if let Some(symbol) = symbols.get_mut(&name) {
            symbol.global = true;
        }
    }

    Ok(symbols)
}

// claim the next 4-byte instruction slot in the active segment
fn instruction_slot(cursors: &mut SegmentCursors, line: usize) -> Result<u32, AssemblyError> {
    let segment = cursors.active();
    if !segment.holds_code() {
        return Err(AssemblyError::SegmentMisuse {
            line,
            reason: format!(
                "Instructions cannot be emitted into the {} segment.",
                segment.name()
            ),
        });
    }

    let address = cursors.cursor();
    if address % 4 != 0 {
        return Err(AssemblyError::SegmentMisuse {
            line,
            reason: format!("Instruction address 0x{:08x} is not 4-byte aligned.", address),
        });
    }

    cursors.advance(4);
    Ok(address)
}

/// Pass 2, resolution: replace every label reference with its numeric field.
/// All references resolve before any emission begins, so an unresolved label
/// anywhere aborts before bytes are produced.
pub fn resolve(tokens: &mut [Token], symbols: &SymbolTable) -> Result<(), AssemblyError> {
    for token in tokens.iter_mut() {
        match token {
            Token::Instruction(t) => {
                if let Some(label) = &t.operands.label {
                    let target = get_symbol(symbols, label, t.line)?.address;
                    t.operands.resolved =
                        resolve_field(t.fixup, target, &t.operands, t.address, t.line, label)?;
                }
            }
            Token::Pseudoinstruction(t) => {
                // kept pseudos resolve to the absolute address plus addend
                if let Some(label) = &t.operands.label {
                    let target = get_symbol(symbols, label, t.line)?.address;
                    t.operands.resolved = target.wrapping_add(t.operands.imm as u32);
                }
            }
            Token::Directive(t) => {
                if let DirectiveKind::Word(items) = &mut t.kind {
                    for item in items.iter_mut() {
                        if let Some(label) = &item.label {
                            item.value = get_symbol(symbols, label, t.line)?.address;
                        }
                    }
                }
            }
            Token::Tag(_) => {}
        }
    }
    Ok(())
}

// turn a bound label address into the token's encodable field
fn resolve_field(
    fixup: Fixup,
    target: u32,
    operands: &OperandBundle,
    address: u32,
    line: usize,
    label: &str,
) -> Result<u32, AssemblyError> {
    match fixup {
        Fixup::Branch => {
            let delta = target as i64 - (address as i64 + 4);
            let words = delta >> 2;
            if words < i16::MIN as i64 || words > i16::MAX as i64 {
                return Err(AssemblyError::BranchOutOfRange {
                    line,
                    reason: format!(
                        "Label \"{}\" is {} words away from the branch delay reference point.",
                        label, words
                    ),
                });
            }
            Ok((words as u32) & 0xFFFF)
        }
        Fixup::Jump => Ok((target >> 2) & 0x03FF_FFFF),
        Fixup::Hi16 => Ok((target.wrapping_add(operands.imm as u32) >> 16) & 0xFFFF),
        Fixup::Lo16 => Ok(target.wrapping_add(operands.imm as u32) & 0xFFFF),
        Fixup::None => Ok(target),
    }
}

/// Pass 2, emission: append every resolved token's bytes to its segment
/// image in stream order. Pseudo tokens carried through unexpanded hold
/// their 4-byte slot with a zero placeholder word.
pub fn emit(tokens: &[Token]) -> Result<SegmentSet, AssemblyError> {
    let mut images = SegmentSet::new();
    let mut active = Segment::Text;

    for token in tokens {
        match token {
            Token::Directive(t) => match &t.kind {
                DirectiveKind::Segment(segment, _) => active = *segment,
                DirectiveKind::Align(_) | DirectiveKind::Globl(_) => {}
                data => {
                    images
                        .get_mut(active)
                        .write(t.address, &data_bytes(data), t.line)?;
                }
            },
            Token::Instruction(t) => {
                let word = encoder::encode(t.opcode, &t.operands, t.fixup);
                images
                    .get_mut(active)
                    .write(t.address, &word.to_le_bytes(), t.line)?;
            }
            Token::Pseudoinstruction(t) => {
                images
                    .get_mut(active)
                    .write(t.address, &0u32.to_le_bytes(), t.line)?;
            }
            Token::Tag(_) => {}
        }
    }

    Ok(images)
}

// little-endian byte image of one data directive
fn data_bytes(kind: &DirectiveKind) -> Vec<u8> {
    match kind {
        DirectiveKind::Byte(items) => items.clone(),
        DirectiveKind::Half(items) => items.iter().flat_map(|v| v.to_le_bytes()).collect(),
        DirectiveKind::Word(items) => items.iter().flat_map(|w| w.value.to_le_bytes()).collect(),
        DirectiveKind::Float(items) => items.iter().flat_map(|v| v.to_le_bytes()).collect(),
        DirectiveKind::Double(items) => items.iter().flat_map(|v| v.to_le_bytes()).collect(),
        DirectiveKind::Ascii(bytes) => bytes.clone(),
        DirectiveKind::Space(count) => vec![0x00; *count as usize],
        DirectiveKind::Align(_) | DirectiveKind::Segment(..) | DirectiveKind::Globl(_) => {
            unreachable!("layout-only directives produce no bytes")
        }
    }
}
