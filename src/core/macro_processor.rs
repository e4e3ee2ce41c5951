// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// Assembler macro processor implementing mcro/endmcro expansion.

use indexmap::IndexMap;

use crate::core::error::{Diagnostic, ErrorKind};
use crate::core::isa::{Directive, Opcode};
use crate::core::lexer;
use crate::core::lexer::MAX_SYMBOL_LEN;

/// Which definition, if any, subsequent lines belong to. A redefinition of a
/// known name opens a shadow body so the first definition keeps winning at
/// expansion time.
#[derive(Debug)]
enum OpenDef {
    Keep(String),
    Shadow,
}

pub struct MacroProcessor {
    macros: IndexMap<String, Vec<String>>,
    open: Option<OpenDef>,
}

impl Default for MacroProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl MacroProcessor {
    pub fn new() -> Self {
        Self {
            macros: IndexMap::new(),
            open: None,
        }
    }

    /// Expand the source lines: macro definitions are stripped, invocation
    /// lines are replaced by the stored body, everything else passes through
    /// verbatim. Stops at the first error.
    pub fn expand(&mut self, lines: &[String]) -> Result<Vec<String>, Diagnostic> {
        let mut out = Vec::with_capacity(lines.len());

        for (idx, line) in lines.iter().enumerate() {
            let line_num = idx as u32 + 1;
            let trimmed = lexer::trim(line);

            if let Some(rest) = trimmed.strip_prefix("mcro") {
                let mut words = rest.split_whitespace();
                let name = words
                    .next()
                    .ok_or_else(|| Diagnostic::at_line(ErrorKind::MacroMissingName, line_num))?;
                if words.next().is_some() {
                    return Err(Diagnostic::at_line(ErrorKind::McroExtraneousText, line_num));
                }
                check_macro_name(name).map_err(|kind| Diagnostic::at_line(kind, line_num))?;
                self.open = Some(if self.macros.contains_key(name) {
                    OpenDef::Shadow
                } else {
                    self.macros.insert(name.to_string(), Vec::new());
                    OpenDef::Keep(name.to_string())
                });
            } else if self.open.is_some() && trimmed.starts_with("endmcro") {
                let rest = &trimmed["endmcro".len()..];
                if rest.split_whitespace().next().is_some() {
                    return Err(Diagnostic::at_line(
                        ErrorKind::EndmcroExtraneousText,
                        line_num,
                    ));
                }
                self.open = None;
            } else if let Some(open) = &self.open {
                if let OpenDef::Keep(name) = open {
                    if let Some(body) = self.macros.get_mut(name) {
                        body.push(line.clone());
                    }
                }
            } else if let Some(body) = self.macros.get(trimmed) {
                out.extend(body.iter().cloned());
            } else {
                out.push(line.clone());
            }
        }

        Ok(out)
    }
}

fn check_macro_name(name: &str) -> Result<(), ErrorKind> {
    if name.len() > MAX_SYMBOL_LEN {
        return Err(ErrorKind::MacroNameTooLong);
    }
    if lexer::is_register(name) {
        return Err(ErrorKind::MacroNameIsRegister);
    }
    if Opcode::from_name(name).is_some() {
        return Err(ErrorKind::MacroNameIsOperation);
    }
    if Directive::from_name(name).is_some() {
        return Err(ErrorKind::MacroNameIsDirective);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(lines: &[&str]) -> Result<Vec<String>, Diagnostic> {
        let owned: Vec<String> = lines.iter().map(|s| s.to_string()).collect();
        MacroProcessor::new().expand(&owned)
    }

    #[test]
    fn strips_definitions_and_inlines_invocations() {
        let out = expand(&[
            "mcro twice",
            "\tinc COUNT",
            "\tinc COUNT",
            "endmcro",
            "MAIN: clr COUNT",
            "twice",
            "stop",
        ])
        .expect("expand");
        assert_eq!(
            out,
            vec![
                "MAIN: clr COUNT",
                "\tinc COUNT",
                "\tinc COUNT",
                "stop",
            ]
        );
    }

    #[test]
    fn body_lines_are_preserved_verbatim() {
        let out = expand(&["mcro m", "   mov  @r1 ,\tLIST", "endmcro", "m"]).expect("expand");
        assert_eq!(out, vec!["   mov  @r1 ,\tLIST"]);
    }

    #[test]
    fn invocation_must_match_the_whole_trimmed_line() {
        let out = expand(&["mcro m", "stop", "endmcro", "  m  ", "m extra"]).expect("expand");
        assert_eq!(out, vec!["stop", "m extra"]);
    }

    #[test]
    fn endmcro_outside_a_definition_passes_through() {
        let out = expand(&["endmcro"]).expect("expand");
        assert_eq!(out, vec!["endmcro"]);
    }

    #[test]
    fn missing_name_and_extraneous_text_are_reported_in_order() {
        let err = expand(&["mcro"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MacroMissingName);
        assert_eq!(err.line(), Some(1));

        let err = expand(&["", "mcro m extra"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::McroExtraneousText);
        assert_eq!(err.line(), Some(2));

        let err = expand(&["mcro m", "stop", "endmcro trailing"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EndmcroExtraneousText);
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn reserved_names_are_rejected_with_their_own_kinds() {
        assert_eq!(
            expand(&["mcro @r3"]).unwrap_err().kind(),
            ErrorKind::MacroNameIsRegister
        );
        assert_eq!(
            expand(&["mcro mov"]).unwrap_err().kind(),
            ErrorKind::MacroNameIsOperation
        );
        assert_eq!(
            expand(&["mcro .data"]).unwrap_err().kind(),
            ErrorKind::MacroNameIsDirective
        );
        let long = format!("mcro {}", "m".repeat(31));
        let lines = vec![long];
        assert_eq!(
            MacroProcessor::new().expand(&lines).unwrap_err().kind(),
            ErrorKind::MacroNameTooLong
        );
    }

    #[test]
    fn first_definition_wins_on_redefinition() {
        let out = expand(&[
            "mcro m", "stop", "endmcro", "mcro m", "rts", "endmcro", "m",
        ])
        .expect("expand");
        assert_eq!(out, vec!["stop"]);
    }

    #[test]
    fn expansion_is_idempotent_on_its_own_output() {
        let source: Vec<String> = ["mcro m", "inc X", "endmcro", "m", "stop"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let first = MacroProcessor::new().expand(&source).expect("expand");
        let second = MacroProcessor::new().expand(&first).expect("re-expand");
        assert_eq!(first, second);
    }
}
