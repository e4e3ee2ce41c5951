// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

use super::*;

/// Per-file assembler state: the code and data images, symbol table,
/// external-reference log, output flags, and collected diagnostics. Built
/// fresh for every input file.
pub(crate) struct Assembler {
    pub(crate) code: Vec<u16>,
    pub(crate) data: Vec<u16>,
    pub(crate) symbols: SymbolTable,
    pub(crate) externs: ExternLog,
    pub(crate) diagnostics: Vec<Diagnostic>,
    pub(crate) entry_seen: bool,
    pub(crate) extern_seen: bool,
    pub(crate) line_num: u32,
    // Word cursor walked by the second pass.
    pub(crate) pc: usize,
}

impl Assembler {
    pub(crate) fn new() -> Self {
        Self {
            code: Vec::new(),
            data: Vec::new(),
            symbols: SymbolTable::new(),
            externs: ExternLog::new(),
            diagnostics: Vec::new(),
            entry_seen: false,
            extern_seen: false,
            line_num: 1,
            pc: 0,
        }
    }

    pub(crate) fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub(crate) fn report(&mut self, kind: ErrorKind) {
        self.diagnostics
            .push(Diagnostic::at_line(kind, self.line_num));
    }

    /// Record a diagnostic for the current line and hand back the failure
    /// marker, so call sites read `return Err(self.fail(kind))`.
    pub(crate) fn fail(&mut self, kind: ErrorKind) -> LineFailed {
        self.report(kind);
        LineFailed
    }

    /// First pass: build the symbol table, size every instruction (emitting
    /// the first word plus operand placeholders), and collect all data
    /// words. Finishes by relocating symbols to their load addresses.
    pub(crate) fn pass1(&mut self, lines: &[String]) -> PassCounts {
        let mut counts = PassCounts::new();
        self.line_num = 1;

        for src in lines {
            let line = lexer::trim(src);
            if !lexer::should_ignore(line) && self.parse_line(line).is_err() {
                counts.errors += 1;
            }
            self.line_num += 1;
        }

        // Data labels land after the code region in the final image.
        let ic = self.code.len() as u16;
        self.symbols.relocate(StatementKind::Instruction, MEM_START);
        self.symbols.relocate(StatementKind::Directive, ic + MEM_START);

        counts.lines = self.line_num - 1;
        counts
    }

    /// Second pass: walk the code image emitted by pass 1, fill in every
    /// operand word, record external references, and action `.entry`
    /// directives.
    pub(crate) fn pass2(&mut self, lines: &[String]) -> PassCounts {
        let mut counts = PassCounts::new();
        self.line_num = 1;
        self.pc = 0;
        self.externs.clear();

        for src in lines {
            let line = lexer::trim(src);
            if !lexer::should_ignore(line) && self.parse_line_second(line).is_err() {
                counts.errors += 1;
            }
            self.line_num += 1;
        }

        counts.lines = self.line_num - 1;
        counts
    }

    /// Overwrite the word under the pass-2 cursor and advance. Writes past
    /// the image (possible only after a failed first pass) are dropped.
    pub(crate) fn store_word(&mut self, word: u16) {
        if let Some(slot) = self.code.get_mut(self.pc) {
            *slot = word;
        }
        self.pc += 1;
    }
}
