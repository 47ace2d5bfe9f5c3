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

pub mod assembler;
pub mod ast;
pub mod errors;
pub mod parser;

use anyhow::{Context, Result};
use assembler::segment::SegmentSet;
use assembler::symbol_table::SymbolTable;
use ast::Token;

/// Assembler-wide configuration.
#[derive(Debug, Default, Clone)]
pub struct AssemblerOptions {
    /// Carry pseudo-instructions through to emission as opaque records
    /// instead of expanding them into real instructions.
    pub keep_pseudoinstructions: bool,
}

/// Everything the two passes produce: the addressed and resolved token
/// stream, the pass-1 symbol table, and the per-segment byte images.
#[derive(Debug)]
pub struct Assembly {
    pub tokens: Vec<Token>,
    pub symbols: SymbolTable,
    pub images: SegmentSet,
}

pub fn assemble(source: &str, options: &AssemblerOptions) -> Result<Assembly> {
    let mut tokens =
        parser::parse_source(source, options).context("Failed during parsing stage")?;

    let symbols = assembler::layout(&mut tokens).context("Failed during assembler pass 1")?;

    assembler::resolve(&mut tokens, &symbols).context("Failed during label resolution")?;

    let images = assembler::emit(&tokens).context("Failed during code emission")?;

    Ok(Assembly {
        tokens,
        symbols,
        images,
    })
}
