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

pub mod operand_parser;
pub mod token_builder;

use crate::AssemblerOptions;
use crate::ast::*;
use anyhow::Result;
use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;

// Derive the parser from our grammar file.
#[derive(Parser)]
#[grammar = "./grammar.pest"]
pub struct MipsParser;

/// Parse the entire source into the flat token stream the layout engine
/// consumes. Label definitions become Tag tokens in source order; each
/// instruction line becomes one or more instruction tokens (more than one
/// when a pseudo-instruction expands).
pub fn parse_source(source: &str, options: &AssemblerOptions) -> Result<Vec<Token>> {
    let pairs = MipsParser::parse(Rule::program, source)?;
    let mut tokens = Vec::new();

    for line_pair in pairs
        .flatten()
        .filter(|p| p.as_rule() == Rule::line_content)
    {
        for pair in line_pair.into_inner() {
            match pair.as_rule() {
                Rule::label => {
                    let line = pair.as_span().start_pos().line_col().0;
                    let name = pair
                        .into_inner()
                        .next()
                        .expect("label rule always wraps an ident")
                        .as_str()
                        .to_string();
                    tokens.push(Token::Tag(TagToken { name, line }));
                }
                Rule::instruction => {
                    tokens.extend(build_instruction(pair, options)?);
                }
                Rule::directive => {
                    tokens.push(build_directive(pair)?);
                }
                _ => {}
            }
        }
    }

    Ok(tokens)
}

fn build_instruction(pair: Pair<Rule>, options: &AssemblerOptions) -> Result<Vec<Token>> {
    let line = pair.as_span().start_pos().line_col().0;
    let mut inner = pair.into_inner();
    let mnemonic = inner
        .next()
        .expect("instruction rule always starts with a mnemonic")
        .as_str()
        .to_lowercase();

    let mut operands = Vec::new();
    for op_pair in inner {
        operands.push(token_builder::operand_builders::build_operand(op_pair)?);
    }

    token_builder::build_instruction(line, &mnemonic, operands, options)
}

fn build_directive(pair: Pair<Rule>) -> Result<Token> {
    let line = pair.as_span().start_pos().line_col().0;
    let inner = pair
        .into_inner()
        .next()
        .expect("directive rule always wraps a concrete directive");
    let kind = token_builder::build_directive(inner)?;

    Ok(Token::Directive(DirectiveToken {
        kind,
        address: 0,
        line,
    }))
}

// ------------- unit tests -------------
