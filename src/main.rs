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

use anyhow::{Context, Result};
use clap::Parser as clap_parser;
use mipsasm::{AssemblerOptions, assemble};
use std::fs;
use std::path::PathBuf;

#[derive(clap_parser)]
#[clap(version = "0.1.0", author = "Connor Nolan")]
struct Opts {
    #[clap(short, long)]
    input: PathBuf,
    /// Output stem; each non-empty segment image lands in <stem>.<segment>
    #[clap(short, long)]
    output: PathBuf,
    /// Carry pseudo-instructions through without expanding them
    #[clap(long)]
    keep_pseudo: bool,
    /// Write the symbol table to this path as JSON
    #[clap(long)]
    symbols: Option<PathBuf>,
}

fn main() -> Result<()> {
    let opts: Opts = Opts::parse();

    let source = fs::read_to_string(&opts.input)
        .with_context(|| format!("Failed to read input file: {}", opts.input.display()))?;

    let options = AssemblerOptions {
        keep_pseudoinstructions: opts.keep_pseudo,
    };
    let assembly = assemble(&source, &options)?;

    for (segment, image) in assembly.images.iter() {
        if image.bytes.is_empty() {
            continue;
        }
        let path = opts.output.with_extension(segment.name());
        fs::write(&path, &image.bytes)
            .with_context(|| format!("Failed to write output file: {}", path.display()))?;
        println!(
            "Wrote {} bytes ({} segment, base 0x{:08x}) to {}",
            image.bytes.len(),
            segment.name(),
            image.base(),
            path.display()
        );
    }

    if let Some(path) = &opts.symbols {
        let json = serde_json::to_string_pretty(&assembly.symbols)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write symbol file: {}", path.display()))?;
    }

    Ok(())
}
