// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Whole-pipeline tests: both passes over in-memory sources, plus output
//! rendering.

use super::*;

use crate::core::words::{base64_pair, WORD_MASK};

fn assemble(lines: &[&str]) -> (Assembler, PassCounts, PassCounts) {
    let owned: Vec<String> = lines.iter().map(|s| s.to_string()).collect();
    let mut assembler = Assembler::new();
    let pass1 = assembler.pass1(&owned);
    let pass2 = assembler.pass2(&owned);
    (assembler, pass1, pass2)
}

fn object_text(assembler: &Assembler) -> String {
    let mut buf = Vec::new();
    output::write_object(&mut buf, &assembler.code, &assembler.data).unwrap();
    String::from_utf8(buf).unwrap()
}

#[test]
fn string_directive_stores_characters_and_a_terminator() {
    let (asm, pass1, pass2) = assemble(&["HELLO: .string \"hi\""]);
    assert_eq!(pass1.errors, 0);
    assert_eq!(pass2.errors, 0);
    assert_eq!(asm.data, vec![b'h' as u16, b'i' as u16, 0]);
    let hello = asm.symbols.get("HELLO").unwrap();
    assert_eq!(hello.kind, StatementKind::Directive);
    assert_eq!(hello.address, MEM_START);
}

#[test]
fn external_jump_emits_an_external_word_and_a_reference() {
    let (asm, _, pass2) = assemble(&[".extern X", "jmp X"]);
    assert_eq!(pass2.errors, 0);
    assert_eq!((asm.code[0] >> 2) & 7, 3);
    assert_eq!(asm.code[1], encode_are(0, Are::External));
    let refs: Vec<(&str, u16)> = asm
        .externs
        .iter()
        .map(|r| (r.name.as_str(), r.address))
        .collect();
    assert_eq!(refs, [("X", MEM_START + 1)]);
}

#[test]
fn two_register_move_packs_and_advances_ic_by_two() {
    let (asm, _, pass2) = assemble(&["mov @r3, @r5"]);
    assert_eq!(pass2.errors, 0);
    assert_eq!(asm.code.len(), 2);
    let first = asm.code[0];
    assert_eq!((first >> 9) & 7, 5);
    assert_eq!((first >> 5) & 15, 0);
    assert_eq!((first >> 2) & 7, 5);
    assert_eq!(first & 3, 0);
    assert_eq!(asm.code[1], (3 << 7) | (5 << 2));
}

#[test]
fn immediate_plus_register_keeps_the_low_twelve_bits() {
    let (asm, _, pass2) = assemble(&["add #-1, @r2"]);
    assert_eq!(pass2.errors, 0);
    assert_eq!(asm.code.len(), 3);
    assert_eq!(asm.code[0], (1 << 9) | (2 << 5) | (5 << 2));
    assert_eq!(asm.code[1], (-1i16 as u16) << 2 & WORD_MASK);
    assert_eq!(asm.code[2], 2 << 2);
}

#[test]
fn duplicate_label_sets_the_first_pass_error_flag() {
    let (asm, pass1, _) = assemble(&["FOO: inc K", "FOO: dec K", "K: .data 4"]);
    assert_eq!(pass1.errors, 1);
    assert!(asm
        .diagnostics
        .iter()
        .any(|d| d.kind() == ErrorKind::SymbolAlreadyExists && d.line() == Some(2)));
}

#[test]
fn consecutive_data_commas_fail_the_line_but_not_the_run() {
    let (asm, pass1, _) = assemble(&[".data 1, , 2", "MAIN: stop"]);
    assert_eq!(pass1.errors, 1);
    assert!(asm
        .diagnostics
        .iter()
        .any(|d| d.kind() == ErrorKind::ConsecutiveCommas && d.line() == Some(1)));
    // Processing continued past the failed line.
    assert_eq!(asm.symbols.get("MAIN").unwrap().address, MEM_START);
}

#[test]
fn object_output_has_header_and_one_line_per_word() {
    let (asm, pass1, pass2) = assemble(&[
        "MAIN: mov @r3, LEN",
        "jsr MAIN",
        "stop",
        "LEN: .data 9",
    ]);
    assert_eq!(pass1.errors + pass2.errors, 0);
    let text = object_text(&asm);
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("6\t1"));
    assert_eq!(lines.count(), asm.code.len() + asm.data.len());
}

#[test]
fn every_emitted_word_fits_twelve_bits() {
    let (asm, pass1, pass2) = assemble(&[
        "MAIN: cmp #-200, BUF",
        "prn #7",
        "jmp MAIN",
        "stop",
        "BUF: .data -1, 2047, -2048",
        "MSG: .string \"ok\"",
    ]);
    assert_eq!(pass1.errors + pass2.errors, 0);
    for &word in asm.code.iter().chain(&asm.data) {
        assert!(word <= WORD_MASK, "word {word:#x} exceeds 12 bits");
        assert_eq!(base64_pair(word).len(), 2);
    }
}

#[test]
fn relocated_symbols_partition_into_code_and_data_ranges() {
    let (asm, pass1, _) = assemble(&[
        ".extern FAR",
        "MAIN: lea TEXT, @r4",
        "LOOP: bne LOOP",
        "sub @r1, FAR",
        "stop",
        "TEXT: .string \"abc\"",
        "TAIL: .data 7, 8",
    ]);
    assert_eq!(pass1.errors, 0);
    let ic = asm.code.len() as u16;
    let dc = asm.data.len() as u16;
    for symbol in asm.symbols.iter() {
        if symbol.is_external {
            assert_eq!(symbol.address, 0);
            continue;
        }
        match symbol.kind {
            StatementKind::Instruction => {
                assert!((MEM_START..MEM_START + ic).contains(&symbol.address), "{symbol:?}");
            }
            StatementKind::Directive => {
                assert!(
                    (MEM_START + ic..MEM_START + ic + dc).contains(&symbol.address),
                    "{symbol:?}"
                );
            }
        }
    }
}

#[test]
fn external_references_point_into_the_code_region() {
    let (asm, _, pass2) = assemble(&[
        ".extern OUT",
        "MAIN: jsr OUT",
        "mov OUT, @r1",
        "stop",
    ]);
    assert_eq!(pass2.errors, 0);
    let ic = asm.code.len() as u16;
    assert_eq!(asm.externs.len(), 2);
    for reference in asm.externs.iter() {
        let symbol = asm.symbols.get(&reference.name).unwrap();
        assert!(symbol.is_external);
        assert!((MEM_START..MEM_START + ic).contains(&reference.address));
    }
}

#[test]
fn entry_file_reflects_relocated_addresses() {
    let (asm, pass1, pass2) = assemble(&[
        "MAIN: mov #3, @r1",
        "stop",
        "K: .data 22",
        ".entry K",
        ".entry MAIN",
    ]);
    assert_eq!(pass1.errors + pass2.errors, 0);
    assert!(asm.entry_seen);
    let mut buf = Vec::new();
    output::write_entries(&mut buf, &asm.symbols).unwrap();
    // Insertion order: MAIN was defined before K.
    assert_eq!(String::from_utf8(buf).unwrap(), "MAIN\t100\nK\t104\n");
}

#[test]
fn failed_first_pass_still_lets_the_second_pass_report() {
    let (asm, pass1, pass2) = assemble(&["mov @r1", "jmp GONE", ".entry GONE"]);
    assert!(pass1.errors > 0);
    assert!(pass2.errors > 0);
    let kinds: Vec<ErrorKind> = asm.diagnostics.iter().map(|d| d.kind()).collect();
    assert!(kinds.contains(&ErrorKind::InvalidOperandCount));
    assert!(kinds.contains(&ErrorKind::EntrySymbolNotFound));
}
