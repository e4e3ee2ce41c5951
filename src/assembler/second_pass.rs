// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Second pass: operand-word encoding and symbol resolution against the
//! table built by the first pass.

use super::*;

const STATEMENT_SEPS: &str = ":\t ";
const OPERAND_SEPS: &str = ",\t ";
const SPACE_SEPS: &str = "\t ";

impl Assembler {
    /// Re-walk one line. Labels were validated in pass 1 and are skipped
    /// here; only operations and `.entry` change state.
    pub(crate) fn parse_line_second(&mut self, line: &str) -> LineResult {
        let first = lexer::next_token(line, STATEMENT_SEPS);
        let mut rest = line;
        let mut token = first;

        if let Some(Ok(_)) = lexer::split_label(first) {
            rest = lexer::remaining(line, ":");
            token = lexer::next_token(rest, OPERAND_SEPS);
        }

        if let Some(op) = Opcode::from_name(token) {
            let args = lexer::remaining(rest, OPERAND_SEPS);
            self.process_operation_second(op, args)
        } else if let Some(dir) = Directive::from_name(token) {
            let args = lexer::remaining(rest, OPERAND_SEPS);
            if dir == Directive::Entry {
                let name = lexer::next_token(args, SPACE_SEPS);
                self.mark_entry(name)
            } else {
                Ok(())
            }
        } else {
            Ok(())
        }
    }

    /// Read back the modes encoded in the instruction's first word,
    /// re-tokenize the operands, and emit their words.
    fn process_operation_second(&mut self, op: Opcode, args: &str) -> LineResult {
        let (has_src, has_dest) = op.operand_presence();
        let word = self.code.get(self.pc).copied().unwrap_or(0);
        let src_mode = if has_src {
            AddressingMode::from_bits(extract_bits(word, SRC_MODE_START, SRC_MODE_END))
        } else {
            None
        };
        let dest_mode = if has_dest {
            AddressingMode::from_bits(extract_bits(word, DST_MODE_START, DST_MODE_END))
        } else {
            None
        };

        let mut src = "";
        let mut dest = "";
        if has_dest {
            if has_src {
                src = lexer::next_token(args, OPERAND_SEPS);
                let rest = lexer::remaining(args, OPERAND_SEPS);
                let rest = rest.strip_prefix(',').unwrap_or(rest);
                dest = lexer::next_token(rest, SPACE_SEPS);
            } else {
                dest = lexer::next_token(args, SPACE_SEPS);
            }
        }

        self.pc += 1;
        self.encode_additional_words(src, dest, has_src, has_dest, src_mode, dest_mode)
    }

    fn encode_additional_words(
        &mut self,
        src: &str,
        dest: &str,
        has_src: bool,
        has_dest: bool,
        src_mode: Option<AddressingMode>,
        dest_mode: Option<AddressingMode>,
    ) -> LineResult {
        if has_src
            && has_dest
            && src_mode == Some(AddressingMode::RegisterDirect)
            && dest_mode == Some(AddressingMode::RegisterDirect)
        {
            // Both registers pack into one word.
            self.store_word(encode_register(src, false) | encode_register(dest, true));
            return Ok(());
        }

        if has_dest {
            if has_src {
                let src_result = self.encode_operand(src, src_mode, false);
                let dest_result = self.encode_operand(dest, dest_mode, true);
                if src_result.is_err() || dest_result.is_err() {
                    return Err(LineFailed);
                }
                return Ok(());
            }
            return self.encode_operand(dest, dest_mode, true);
        }

        Ok(())
    }

    fn encode_operand(
        &mut self,
        operand: &str,
        mode: Option<AddressingMode>,
        is_dest: bool,
    ) -> LineResult {
        match mode {
            Some(AddressingMode::Immediate) => {
                let number = operand.strip_prefix('#').unwrap_or(operand);
                let value: i32 = number.parse().unwrap_or_default();
                self.store_word(encode_are(value as u16, Are::Absolute));
                Ok(())
            }
            Some(AddressingMode::Direct) => self.encode_symbol(operand),
            Some(AddressingMode::RegisterDirect) => {
                self.store_word(encode_register(operand, is_dest));
                Ok(())
            }
            // Unreadable mode bits only happen after a failed first pass;
            // the line already carries a diagnostic.
            None => Err(LineFailed),
        }
    }

    fn encode_symbol(&mut self, name: &str) -> LineResult {
        let Some((address, is_external)) = self
            .symbols
            .get(name)
            .map(|symbol| (symbol.address, symbol.is_external))
        else {
            // The placeholder word is still consumed so scanning stays
            // aligned for the rest of the image.
            self.pc += 1;
            return Err(self.fail(ErrorKind::SymbolNotFound));
        };

        let word = if is_external {
            self.externs.record(name, self.pc as u16 + MEM_START);
            encode_are(address, Are::External)
        } else {
            encode_are(address, Are::Relocatable)
        };
        self.store_word(word);
        Ok(())
    }

    fn mark_entry(&mut self, name: &str) -> LineResult {
        match self.symbols.mark_entry(name) {
            Ok(()) => {
                self.entry_seen = true;
                Ok(())
            }
            Err(kind) => Err(self.fail(kind)),
        }
    }
}

/// A register operand word: the number sits in the high field for a source
/// operand and the low field for a destination.
fn encode_register(token: &str, is_dest: bool) -> u16 {
    let number = lexer::register_number(token).unwrap_or(0);
    let payload = if is_dest {
        number
    } else {
        number << REG_FIELD_BITS
    };
    encode_are(payload, Are::Absolute)
}
