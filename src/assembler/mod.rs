// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Two-pass assembler for the 12-bit word-addressed machine - main entry
//! point.
//!
//! This module ties together the macro preprocessor, the two assembly
//! passes, and the object/entries/externals writers.

pub mod cli;
mod engine;
mod first_pass;
mod output;
mod passes;
mod second_pass;
#[cfg(test)]
mod tests;

use engine::Assembler;

use std::fs;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};

use clap::Parser;

use crate::core::error::{
    AsmRunError, AsmRunReport, Diagnostic, ErrorKind, LineFailed, LineResult, PassCounts,
};
use crate::core::isa::{AddressingMode, Directive, Opcode, StatementKind};
use crate::core::lexer;
use crate::core::macro_processor::MacroProcessor;
use crate::core::symbol_table::{ExternLog, SymbolTable};
use crate::core::words::{
    encode_are, extract_bits, Are, DST_MODE_END, DST_MODE_START, MEM_START, MODE_BITS,
    OPCODE_BITS, REG_FIELD_BITS, SRC_MODE_END, SRC_MODE_START,
};

use cli::{validate_cli, Cli};

// Re-export public types
pub use crate::core::error::{AsmRunError as RunError, AsmRunReport as RunReport};
pub use cli::VERSION;

/// Run the assembler with command-line arguments.
pub fn run() -> Result<Vec<AsmRunReport>, AsmRunError> {
    passes::run()
}

pub fn run_with_cli(cli: &Cli) -> Result<Vec<AsmRunReport>, AsmRunError> {
    passes::run_with_cli(cli)
}
