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

use crate::ast::{DirectiveKind, Segment, WordItem};
use crate::errors::AssemblyError;
use crate::parser::Rule;
use crate::parser::token_builder::utility_functions::*;
use anyhow::Result;
use pest::iterators::Pair;

/// Realize one parsed directive. Numeric data arguments are parsed wide and
/// stored truncated to the directive's declared width.
pub fn build(pair: Pair<Rule>) -> Result<DirectiveKind> {
    let line = pair.as_span().start_pos().line_col().0;
    match pair.as_rule() {
        Rule::byte_directive => {
            let mut items = Vec::new();
            for arg in pair.into_inner() {
                items.push(parse_int(arg.as_str(), line)? as u8);
            }
            Ok(DirectiveKind::Byte(items))
        }
        Rule::half_directive => {
            let mut items = Vec::new();
            for arg in pair.into_inner() {
                items.push(parse_int(arg.as_str(), line)? as u16);
            }
            Ok(DirectiveKind::Half(items))
        }
        Rule::word_directive => {
            let mut items = Vec::new();
            for arg in pair.into_inner() {
                let inner = arg
                    .into_inner()
                    .next()
                    .expect("word argument wraps a number or an ident");
                match inner.as_rule() {
                    Rule::number => items.push(WordItem {
                        value: parse_int(inner.as_str(), line)? as u32,
                        label: None,
                    }),
                    Rule::ident => items.push(WordItem {
                        value: 0,
                        label: Some(inner.as_str().to_string()),
                    }),
                    _ => unreachable!("unknown word argument: {:?}", inner.as_rule()),
                }
            }
            Ok(DirectiveKind::Word(items))
        }
        Rule::float_directive => {
            let mut items = Vec::new();
            for arg in pair.into_inner() {
                items.push(parse_float(arg.as_str(), line)? as f32);
            }
            Ok(DirectiveKind::Float(items))
        }
        Rule::double_directive => {
            let mut items = Vec::new();
            for arg in pair.into_inner() {
                items.push(parse_float(arg.as_str(), line)?);
            }
            Ok(DirectiveKind::Double(items))
        }
        Rule::ascii_directive => Ok(DirectiveKind::Ascii(string_bytes(pair, line, false)?)),
        Rule::asciiz_directive => Ok(DirectiveKind::Ascii(string_bytes(pair, line, true)?)),
        Rule::space_directive => {
            let arg = pair
                .into_inner()
                .next()
                .expect("space directive carries its size");
            let size = parse_int(arg.as_str(), line)?;
            if size < 0 {
                return Err(AssemblyError::InvalidDirective {
                    line,
                    reason: format!(".space size cannot be negative, got {}", size),
                }
                .into());
            }
            Ok(DirectiveKind::Space(size as u32))
        }
        Rule::align_directive => {
            let arg = pair
                .into_inner()
                .next()
                .expect("align directive carries its exponent");
            let power = parse_int(arg.as_str(), line)?;
            if !(0..=3).contains(&power) {
                return Err(AssemblyError::InvalidDirective {
                    line,
                    reason: format!(".align argument must be between 0 and 3, got {}", power),
                }
                .into());
            }
            Ok(DirectiveKind::Align(power as u32))
        }
        Rule::text_directive => segment_directive(pair, Segment::Text, line),
        Rule::data_directive => segment_directive(pair, Segment::Data, line),
        Rule::ktext_directive => segment_directive(pair, Segment::KText, line),
        Rule::kdata_directive => segment_directive(pair, Segment::KData, line),
        Rule::globl_directive => {
            let name = pair
                .into_inner()
                .next()
                .expect("globl directive carries its symbol")
                .as_str()
                .to_string();
            Ok(DirectiveKind::Globl(name))
        }
        _ => unreachable!("Unknown directive rule: {:?}", pair.as_rule()),
    }
}

// segment switch with an optional explicit start address
fn segment_directive(pair: Pair<Rule>, segment: Segment, line: usize) -> Result<DirectiveKind> {
    match pair.into_inner().next() {
        Some(arg) => {
            let address = parse_int(arg.as_str(), line)?;
            if address < 0 {
                return Err(AssemblyError::InvalidDirective {
                    line,
                    reason: format!("Segment address cannot be negative, got {}", address),
                }
                .into());
            }
            Ok(DirectiveKind::Segment(segment, Some(address as u32)))
        }
        None => Ok(DirectiveKind::Segment(segment, None)),
    }
}

// decode and concatenate the string arguments; asciiz terminates each one
fn string_bytes(pair: Pair<Rule>, line: usize, terminate: bool) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    for literal in pair.into_inner() {
        let inner = literal
            .into_inner()
            .next()
            .expect("string literal wraps its body");
        bytes.extend(decode_string(inner.as_str(), line)?);
        if terminate {
            bytes.push(0);
        }
    }
    Ok(bytes)
}
