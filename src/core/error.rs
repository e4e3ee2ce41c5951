// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Error kinds, diagnostics, and run reporting for the assembler.

use std::fmt;

use serde_json::json;

/// Every failure the pipeline can report. The set is closed: each variant has
/// one canonical message and the passes never invent free-form text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotEnoughParams,
    MacroExpansionFailed,
    FirstPassFailed,
    SecondPassFailed,
    CannotOpenFile,
    CannotCreateFile,
    CannotDeleteFile,
    MacroNameTooLong,
    MacroNameIsRegister,
    MacroNameIsOperation,
    MacroNameIsDirective,
    MacroMissingName,
    McroExtraneousText,
    EndmcroExtraneousText,
    SymbolOnly,
    IllegalComma,
    ConsecutiveCommas,
    UndefinedOpOrDirective,
    ExtraneousComma,
    MissingOperand,
    ExtraneousTextAfterOperation,
    InvalidAddressingMode,
    InvalidOperandCount,
    InvalidOperandModes,
    DirectiveMissingParams,
    DataNotNumber,
    DataMissingComma,
    DataExtraneousText,
    StringNotString,
    EntryMissingSymbol,
    EntryExtraneousText,
    ExternMissingSymbol,
    ExternExtraneousText,
    SymbolTooLong,
    SymbolIsRegister,
    SymbolIsOperation,
    SymbolIsDirective,
    SymbolInvalidFirstChar,
    SymbolInvalidChar,
    EntryCannotBeExtern,
    EntrySymbolNotFound,
    SymbolAlreadyExists,
    SymbolNotFound,
}

impl ErrorKind {
    pub fn message(self) -> &'static str {
        match self {
            Self::NotEnoughParams => "Not enough parameters",
            Self::MacroExpansionFailed => "Macro expansion failed",
            Self::FirstPassFailed => "First pass failed",
            Self::SecondPassFailed => "Second pass failed",
            Self::CannotOpenFile => "Cannot open file",
            Self::CannotCreateFile => "Cannot create file",
            Self::CannotDeleteFile => "Cannot delete file",
            Self::MacroNameTooLong => "Macro name is too long",
            Self::MacroNameIsRegister => "Macro name cannot be a register name",
            Self::MacroNameIsOperation => "Macro name cannot be an operation name",
            Self::MacroNameIsDirective => "Macro name cannot be a directive name",
            Self::MacroMissingName => "Missing macro name",
            Self::McroExtraneousText => "Extraneous text after mcro",
            Self::EndmcroExtraneousText => "Extraneous text after endmcro",
            Self::SymbolOnly => "Only a symbol name is provided",
            Self::IllegalComma => "Illegal comma",
            Self::ConsecutiveCommas => "Consecutive commas",
            Self::UndefinedOpOrDirective => "Undefined operation or directive encountered",
            Self::ExtraneousComma => "Extraneous comma",
            Self::MissingOperand => "Missing operand",
            Self::ExtraneousTextAfterOperation => "Extraneous text after operation",
            Self::InvalidAddressingMode => "Invalid addressing mode",
            Self::InvalidOperandCount => "Invalid number of operands",
            Self::InvalidOperandModes => "Invalid operands' addressing mode combination",
            Self::DirectiveMissingParams => "Directive missing parameters",
            Self::DataNotNumber => ".data argument is not a valid number",
            Self::DataMissingComma => ".data missing comma",
            Self::DataExtraneousText => "Extraneous text after .data argument",
            Self::StringNotString => ".string argument is not a valid string",
            Self::EntryMissingSymbol => ".entry missing symbol",
            Self::EntryExtraneousText => "Extraneous text after .entry argument",
            Self::ExternMissingSymbol => ".extern missing symbol",
            Self::ExternExtraneousText => "Extraneous text after .extern argument",
            Self::SymbolTooLong => "Symbol name is too long",
            Self::SymbolIsRegister => "Symbol name cannot be a register name",
            Self::SymbolIsOperation => "Symbol name cannot be an operation name",
            Self::SymbolIsDirective => "Symbol name cannot be a directive name",
            Self::SymbolInvalidFirstChar => "Symbol name must start with an alphabetic character",
            Self::SymbolInvalidChar => {
                "Symbol name contains an invalid character. \
                 Only alphabetic characters and digits are allowed"
            }
            Self::EntryCannotBeExtern => "Symbol marked as .entry cannot also be .extern",
            Self::EntrySymbolNotFound => "Entry symbol not found in the symbol table",
            Self::SymbolAlreadyExists => "Symbol already exists in the symbol table",
            Self::SymbolNotFound => "Symbol not found in the symbol table",
        }
    }
}

/// One reported error event, optionally anchored to a source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    kind: ErrorKind,
    line: Option<u32>,
}

impl Diagnostic {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, line: None }
    }

    pub fn at_line(kind: ErrorKind, line: u32) -> Self {
        Self {
            kind,
            line: Some(line),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn line(&self) -> Option<u32> {
        self.line
    }

    pub fn format(&self) -> String {
        match self.line {
            Some(line) => format!("ERROR at line {line}: {}", self.kind.message()),
            None => format!("ERROR: {}", self.kind.message()),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "severity": "error",
            "line": self.line,
            "message": self.kind.message(),
        })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}

/// Marker for a line that failed to assemble; the diagnostic has already been
/// recorded by the time this propagates.
#[derive(Debug, Clone, Copy)]
pub struct LineFailed;

pub type LineResult = Result<(), LineFailed>;

/// Pass statistics.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassCounts {
    pub lines: u32,
    pub errors: u32,
}

impl PassCounts {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Per-input outcome of an assembly run.
#[derive(Debug)]
pub struct AsmRunReport {
    input: String,
    diagnostics: Vec<Diagnostic>,
}

impl AsmRunReport {
    pub fn new(input: impl Into<String>, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            input: input.into(),
            diagnostics,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Run-level failure: the arguments themselves were unusable.
#[derive(Debug)]
pub struct AsmRunError {
    diagnostic: Diagnostic,
}

impl AsmRunError {
    pub fn new(diagnostic: Diagnostic) -> Self {
        Self { diagnostic }
    }

    pub fn diagnostic(&self) -> &Diagnostic {
        &self.diagnostic
    }
}

impl fmt::Display for AsmRunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diagnostic)
    }
}

impl std::error::Error for AsmRunError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_format_includes_line_when_present() {
        let diag = Diagnostic::at_line(ErrorKind::IllegalComma, 12);
        assert_eq!(diag.format(), "ERROR at line 12: Illegal comma");
    }

    #[test]
    fn diagnostic_format_omits_line_for_run_level_errors() {
        let diag = Diagnostic::new(ErrorKind::NotEnoughParams);
        assert_eq!(diag.format(), "ERROR: Not enough parameters");
    }

    #[test]
    fn diagnostic_json_carries_line_and_message() {
        let diag = Diagnostic::at_line(ErrorKind::SymbolNotFound, 3);
        let value = diag.to_json();
        assert_eq!(value["line"], 3);
        assert_eq!(value["severity"], "error");
        assert_eq!(value["message"], "Symbol not found in the symbol table");

        let unanchored = Diagnostic::new(ErrorKind::FirstPassFailed).to_json();
        assert!(unanchored["line"].is_null());
    }
}
