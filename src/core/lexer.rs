// Lexical primitives for assembly source lines.

use crate::core::error::ErrorKind;
use crate::core::isa::{Directive, Opcode};

/// Longest accepted symbol or macro name.
pub const MAX_SYMBOL_LEN: usize = 30;

const REG_PREFIX: &[u8] = b"@r";
const REG_TOKEN_LEN: usize = 3;

pub fn skip_whitespace(s: &str) -> &str {
    s.trim_start_matches(|c: char| c.is_ascii_whitespace())
}

pub fn trim(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_ascii_whitespace())
}

pub fn is_empty(s: &str) -> bool {
    skip_whitespace(s).is_empty()
}

/// Blank lines and `;` comments carry nothing for the passes.
pub fn should_ignore(line: &str) -> bool {
    let line = skip_whitespace(line);
    line.is_empty() || line.starts_with(';')
}

fn is_separator(c: u8, seps: &str) -> bool {
    seps.bytes().any(|sep| sep == c)
}

/// Next token of `src` after leading whitespace, delimited by `seps`. A `:`
/// terminator is included in the token, which makes label recognition a
/// purely lexical property (`FOO:` is one token).
pub fn next_token<'a>(src: &'a str, seps: &str) -> &'a str {
    let src = skip_whitespace(src);
    let bytes = src.as_bytes();
    let mut end = 0;
    while end < bytes.len() && !is_separator(bytes[end], seps) {
        end += 1;
    }
    if bytes.get(end) == Some(&b':') {
        end += 1;
    }
    &src[..end]
}

/// Rest of `src` after one token: advances past non-separator characters,
/// consumes a `:` separator if that is what stopped the scan, and skips the
/// whitespace that follows. Other separators (notably `,`) are left in place
/// for the caller to inspect.
pub fn remaining<'a>(src: &'a str, seps: &str) -> &'a str {
    let src = skip_whitespace(src);
    let bytes = src.as_bytes();
    let mut pos = 0;
    while pos < bytes.len() && !is_separator(bytes[pos], seps) {
        pos += 1;
    }
    if bytes.get(pos) == Some(&b':') {
        pos += 1;
    }
    skip_whitespace(&src[pos..])
}

/// Exact register shape: `@r0` through `@r7`.
pub fn is_register(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() == REG_TOKEN_LEN
        && bytes.starts_with(REG_PREFIX)
        && (b'0'..=b'7').contains(&bytes[2])
}

pub fn register_number(token: &str) -> Option<u16> {
    if !is_register(token) {
        return None;
    }
    Some(u16::from(token.as_bytes()[2] - b'0'))
}

/// Validate a symbol name (no colon). Each failed check maps to its own
/// error kind so call sites report the precise reason.
pub fn check_symbol_name(name: &str) -> Result<(), ErrorKind> {
    if name.len() > MAX_SYMBOL_LEN {
        return Err(ErrorKind::SymbolTooLong);
    }
    if is_register(name) {
        return Err(ErrorKind::SymbolIsRegister);
    }
    if Opcode::from_name(name).is_some() {
        return Err(ErrorKind::SymbolIsOperation);
    }
    if Directive::from_name(name).is_some() {
        return Err(ErrorKind::SymbolIsDirective);
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return Err(ErrorKind::SymbolInvalidFirstChar),
    }
    if chars.any(|c| !c.is_ascii_alphanumeric()) {
        return Err(ErrorKind::SymbolInvalidChar);
    }
    Ok(())
}

/// Treat a token as a label definition. `None` when the token carries no
/// trailing colon (not a label at all); otherwise the validation outcome for
/// the name without the colon.
pub fn split_label(token: &str) -> Option<Result<&str, ErrorKind>> {
    let name = token.strip_suffix(':')?;
    Some(check_symbol_name(name).map(|()| name))
}

/// Optional sign, then one or more digits.
pub fn is_number(token: &str) -> bool {
    let digits = token
        .strip_prefix(['+', '-'])
        .unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|c| c.is_ascii_digit())
}

/// A `"`-delimited literal with no interior quote.
pub fn is_string(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() >= 2
        && bytes[0] == b'"'
        && bytes[bytes.len() - 1] == b'"'
        && !bytes[1..bytes.len() - 1].contains(&b'"')
}

pub fn count_commas(s: &str) -> usize {
    s.bytes().filter(|&c| c == b',').count()
}

/// Two commas separated only by whitespace, anywhere in the string.
pub fn has_consecutive_commas(s: &str) -> bool {
    let mut comma_seen = false;
    for c in s.bytes() {
        if c == b',' {
            if comma_seen {
                return true;
            }
            comma_seen = true;
        } else if !c.is_ascii_whitespace() {
            comma_seen = false;
        }
    }
    false
}
