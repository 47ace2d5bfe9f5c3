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

use crate::errors::AssemblyError;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, PartialEq, Serialize)]
pub struct Symbol {
    pub address: u32,
    // marked exported by .globl; carried without further semantics
    pub global: bool,
}

// The symbol table stores label names and their assigned addresses. It is
// written during pass 1 and read-only from then on.
pub type SymbolTable = HashMap<String, Symbol>;

/// Bind a label to an address. Each label binds exactly once.
pub fn bind_symbol(
    symbol_table: &mut SymbolTable,
    name: &str,
    address: u32,
    line: usize,
) -> Result<(), AssemblyError> {
    if symbol_table.contains_key(name) {
        return Err(AssemblyError::DuplicateSymbol {
            line,
            name: name.to_string(),
        });
    }

    symbol_table.insert(
        name.to_string(),
        Symbol {
            address,
            global: false,
        },
    );
    Ok(())
}

pub fn get_symbol<'a>(
    symbol_table: &'a SymbolTable,
    name: &str,
    line: usize,
) -> Result<&'a Symbol, AssemblyError> {
    symbol_table
        .get(name)
        .ok_or_else(|| AssemblyError::UndefinedSymbol {
            line,
            name: name.to_string(),
        })
}
