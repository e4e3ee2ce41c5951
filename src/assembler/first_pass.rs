// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! First pass: statement parsing, symbol collection, and instruction sizing.

use super::*;

const STATEMENT_SEPS: &str = ":\t ";
const OPERAND_SEPS: &str = ",\t ";
const SPACE_SEPS: &str = "\t ";

impl Assembler {
    /// Parse one non-ignorable line. A failed line records its diagnostics,
    /// retracts any symbol defined by the line, and leaves the counters as
    /// they were.
    pub(crate) fn parse_line(&mut self, line: &str) -> LineResult {
        let first = lexer::next_token(line, STATEMENT_SEPS);
        let mut tentative: Option<String> = None;
        let mut rest = line;
        let mut token = first;

        if let Some(label) = lexer::split_label(first) {
            match label {
                Ok(name) => {
                    if self
                        .symbols
                        .insert(name, 0, StatementKind::Instruction, false)
                        .is_err()
                    {
                        return Err(self.fail(ErrorKind::SymbolAlreadyExists));
                    }
                    tentative = Some(name.to_string());
                    rest = lexer::remaining(line, ":");
                    if lexer::is_empty(rest) {
                        self.retract(&mut tentative);
                        return Err(self.fail(ErrorKind::SymbolOnly));
                    }
                    token = lexer::next_token(rest, OPERAND_SEPS);
                }
                // The invalid name was reported; the colon-bearing token now
                // falls through the operation/directive lookup below.
                Err(kind) => self.report(kind),
            }
        }

        if let Some(op) = Opcode::from_name(token) {
            if let Some(name) = &tentative {
                let address = self.code.len() as u16;
                self.symbols
                    .set_location(name, StatementKind::Instruction, address);
            }
            let args = lexer::remaining(rest, OPERAND_SEPS);
            if let Err(err) = self.preflight_commas(args) {
                self.retract(&mut tentative);
                return Err(err);
            }
            if let Err(err) = self.process_operation(op, args) {
                self.retract(&mut tentative);
                return Err(err);
            }
            Ok(())
        } else if let Some(dir) = Directive::from_name(token) {
            match dir {
                // A label in front of .entry/.extern is silently dropped.
                Directive::Entry | Directive::Extern => self.retract(&mut tentative),
                Directive::Data | Directive::String => {
                    if let Some(name) = &tentative {
                        let address = self.data.len() as u16;
                        self.symbols
                            .set_location(name, StatementKind::Directive, address);
                    }
                }
            }
            let args = lexer::remaining(rest, OPERAND_SEPS);
            if let Err(err) = self.preflight_commas(args) {
                self.retract(&mut tentative);
                return Err(err);
            }
            if let Err(err) = self.process_directive(dir, args) {
                self.retract(&mut tentative);
                return Err(err);
            }
            Ok(())
        } else {
            self.retract(&mut tentative);
            Err(self.fail(ErrorKind::UndefinedOpOrDirective))
        }
    }

    fn retract(&mut self, tentative: &mut Option<String>) {
        if let Some(name) = tentative.take() {
            self.symbols.remove(&name);
        }
    }

    fn preflight_commas(&mut self, args: &str) -> LineResult {
        if args.starts_with(',') {
            return Err(self.fail(ErrorKind::IllegalComma));
        }
        if lexer::has_consecutive_commas(args) {
            return Err(self.fail(ErrorKind::ConsecutiveCommas));
        }
        Ok(())
    }

    /// Validate an operation's operands, emit its first word, and reserve
    /// placeholder words for the operands the second pass fills in.
    pub(crate) fn process_operation(&mut self, op: Opcode, args: &str) -> LineResult {
        let first;
        let mut second = "";
        let mut rest = args;

        let commas = lexer::count_commas(args);
        if commas > 1 {
            return Err(self.fail(ErrorKind::ExtraneousComma));
        }
        if commas == 1 {
            first = lexer::next_token(rest, OPERAND_SEPS);
            rest = lexer::remaining(rest, OPERAND_SEPS);
            if first.is_empty() {
                return Err(self.fail(ErrorKind::MissingOperand));
            }
            if !rest.starts_with(',') {
                return Err(self.fail(ErrorKind::ExtraneousTextAfterOperation));
            }
            rest = &rest[1..];
            second = lexer::next_token(rest, SPACE_SEPS);
            rest = lexer::remaining(rest, SPACE_SEPS);
            if second.is_empty() {
                return Err(self.fail(ErrorKind::MissingOperand));
            }
        } else {
            first = lexer::next_token(rest, SPACE_SEPS);
            rest = lexer::remaining(rest, SPACE_SEPS);
            if first.is_empty() && op != Opcode::Rts && op != Opcode::Stop {
                return Err(self.fail(ErrorKind::MissingOperand));
            }
        }
        if !lexer::is_empty(rest) {
            return Err(self.fail(ErrorKind::ExtraneousTextAfterOperation));
        }

        let has_first = !first.is_empty();
        let has_second = !second.is_empty();
        let first_mode = if has_first { self.detect_mode(first) } else { None };
        let second_mode = if has_second {
            self.detect_mode(second)
        } else {
            None
        };

        if (has_first && first_mode.is_none()) || (has_second && second_mode.is_none()) {
            return Err(self.fail(ErrorKind::InvalidAddressingMode));
        }
        if !op.valid_operand_count(has_first, has_second) {
            return Err(self.fail(ErrorKind::InvalidOperandCount));
        }
        if !op.allows_modes(first_mode, second_mode) {
            return Err(self.fail(ErrorKind::InvalidOperandModes));
        }

        self.code
            .push(encode_first_word(op, has_first, has_second, first_mode, second_mode));
        for _ in 0..additional_word_count(has_first, has_second, first_mode, second_mode) {
            self.code.push(0);
        }
        Ok(())
    }

    /// Classify one operand. An unclassifiable operand reports the precise
    /// symbol failure here; the caller adds the addressing-mode error.
    fn detect_mode(&mut self, operand: &str) -> Option<AddressingMode> {
        let number = operand.strip_prefix('#').unwrap_or(operand);
        if lexer::is_number(number) {
            return Some(AddressingMode::Immediate);
        }
        if lexer::is_register(operand) {
            return Some(AddressingMode::RegisterDirect);
        }
        match lexer::check_symbol_name(operand) {
            Ok(()) => Some(AddressingMode::Direct),
            Err(kind) => {
                self.report(kind);
                None
            }
        }
    }

    pub(crate) fn process_directive(&mut self, dir: Directive, args: &str) -> LineResult {
        if lexer::is_empty(args) {
            return Err(self.fail(ErrorKind::DirectiveMissingParams));
        }
        match dir {
            Directive::Data => self.process_data(args),
            Directive::String => self.process_string(args),
            Directive::Entry => self.process_entry(args),
            Directive::Extern => self.process_extern(args),
        }
    }

    fn process_data(&mut self, args: &str) -> LineResult {
        let mut rest = args;
        while !lexer::is_empty(rest) {
            let param = lexer::next_token(rest, OPERAND_SEPS);
            if !lexer::is_number(param) {
                return Err(self.fail(ErrorKind::DataNotNumber));
            }
            rest = lexer::remaining(rest, OPERAND_SEPS);
            if !lexer::is_empty(rest) && !rest.starts_with(',') {
                return Err(self.fail(ErrorKind::DataMissingComma));
            }
            if rest.starts_with(',') && lexer::is_empty(&rest[1..]) {
                return Err(self.fail(ErrorKind::DataExtraneousText));
            }
            let value: i32 = param.parse().unwrap_or_default();
            self.data.push(value as u16 & crate::core::words::WORD_MASK);
            if !lexer::is_empty(rest) {
                rest = &rest[1..];
            }
        }
        Ok(())
    }

    fn process_string(&mut self, args: &str) -> LineResult {
        let param = lexer::trim(args);
        if !lexer::is_string(param) {
            return Err(self.fail(ErrorKind::StringNotString));
        }
        let bytes = param.as_bytes();
        for &ch in &bytes[1..bytes.len() - 1] {
            self.data.push(u16::from(ch));
        }
        self.data.push(0);
        Ok(())
    }

    // .entry is validated here and actioned by the second pass, once the
    // named symbol exists.
    fn process_entry(&mut self, args: &str) -> LineResult {
        let param = lexer::next_token(args, SPACE_SEPS);
        if param.is_empty() {
            return Err(self.fail(ErrorKind::EntryMissingSymbol));
        }
        if let Err(kind) = lexer::check_symbol_name(param) {
            return Err(self.fail(kind));
        }
        let rest = lexer::remaining(args, SPACE_SEPS);
        if !lexer::is_empty(rest) {
            return Err(self.fail(ErrorKind::EntryExtraneousText));
        }
        Ok(())
    }

    fn process_extern(&mut self, args: &str) -> LineResult {
        let param = lexer::next_token(args, SPACE_SEPS);
        if param.is_empty() {
            return Err(self.fail(ErrorKind::ExternMissingSymbol));
        }
        if let Err(kind) = lexer::check_symbol_name(param) {
            return Err(self.fail(kind));
        }
        let rest = lexer::remaining(args, SPACE_SEPS);
        if !lexer::is_empty(rest) {
            return Err(self.fail(ErrorKind::ExternExtraneousText));
        }
        if self
            .symbols
            .insert(param, 0, StatementKind::Directive, true)
            .is_err()
        {
            return Err(self.fail(ErrorKind::SymbolAlreadyExists));
        }
        self.extern_seen = true;
        Ok(())
    }
}

/// Encode the fixed first word of an instruction:
/// `[11..9] src_mode | [8..5] opcode | [4..2] dst_mode | [1..0] ARE`.
/// A sole operand occupies the destination field.
fn encode_first_word(
    op: Opcode,
    has_first: bool,
    has_second: bool,
    first_mode: Option<AddressingMode>,
    second_mode: Option<AddressingMode>,
) -> u16 {
    let payload = if has_first && has_second {
        (AddressingMode::bits(first_mode) << (OPCODE_BITS + MODE_BITS))
            | (op.value() << MODE_BITS)
            | AddressingMode::bits(second_mode)
    } else if has_first {
        (op.value() << MODE_BITS) | AddressingMode::bits(first_mode)
    } else {
        op.value() << MODE_BITS
    };
    encode_are(payload, Are::Absolute)
}

/// Operand words that follow the first word. Two register-direct operands
/// pack into a single word.
fn additional_word_count(
    has_first: bool,
    has_second: bool,
    first_mode: Option<AddressingMode>,
    second_mode: Option<AddressingMode>,
) -> usize {
    let mut count = usize::from(has_first) + usize::from(has_second);
    if has_first
        && has_second
        && first_mode == Some(AddressingMode::RegisterDirect)
        && second_mode == Some(AddressingMode::RegisterDirect)
    {
        count -= 1;
    }
    count
}
