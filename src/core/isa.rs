// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Instruction set tables for the 12-bit target machine: opcodes, directives,
//! addressing modes, and the per-opcode operand rules.

/// The sixteen machine operations, numbered as encoded in the opcode field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Mov = 0,
    Cmp = 1,
    Add = 2,
    Sub = 3,
    Not = 4,
    Clr = 5,
    Lea = 6,
    Inc = 7,
    Dec = 8,
    Jmp = 9,
    Bne = 10,
    Red = 11,
    Prn = 12,
    Jsr = 13,
    Rts = 14,
    Stop = 15,
}

/// How many operands an opcode takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandCount {
    Zero,
    One,
    Two,
}

impl Opcode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "mov" => Some(Self::Mov),
            "cmp" => Some(Self::Cmp),
            "add" => Some(Self::Add),
            "sub" => Some(Self::Sub),
            "not" => Some(Self::Not),
            "clr" => Some(Self::Clr),
            "lea" => Some(Self::Lea),
            "inc" => Some(Self::Inc),
            "dec" => Some(Self::Dec),
            "jmp" => Some(Self::Jmp),
            "bne" => Some(Self::Bne),
            "red" => Some(Self::Red),
            "prn" => Some(Self::Prn),
            "jsr" => Some(Self::Jsr),
            "rts" => Some(Self::Rts),
            "stop" => Some(Self::Stop),
            _ => None,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Mov => "mov",
            Self::Cmp => "cmp",
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Not => "not",
            Self::Clr => "clr",
            Self::Lea => "lea",
            Self::Inc => "inc",
            Self::Dec => "dec",
            Self::Jmp => "jmp",
            Self::Bne => "bne",
            Self::Red => "red",
            Self::Prn => "prn",
            Self::Jsr => "jsr",
            Self::Rts => "rts",
            Self::Stop => "stop",
        }
    }

    pub fn value(self) -> u16 {
        self as u16
    }

    pub fn operand_count(self) -> OperandCount {
        match self {
            Self::Mov | Self::Cmp | Self::Add | Self::Sub | Self::Lea => OperandCount::Two,
            Self::Not
            | Self::Clr
            | Self::Inc
            | Self::Dec
            | Self::Jmp
            | Self::Bne
            | Self::Red
            | Self::Prn
            | Self::Jsr => OperandCount::One,
            Self::Rts | Self::Stop => OperandCount::Zero,
        }
    }

    pub fn valid_operand_count(self, has_first: bool, has_second: bool) -> bool {
        match self.operand_count() {
            OperandCount::Two => has_first && has_second,
            OperandCount::One => has_first && !has_second,
            OperandCount::Zero => !has_first && !has_second,
        }
    }

    /// Which of the source/destination operand slots this opcode fills.
    pub fn operand_presence(self) -> (bool, bool) {
        match self.operand_count() {
            OperandCount::Two => (true, true),
            OperandCount::One => (false, true),
            OperandCount::Zero => (false, false),
        }
    }

    /// Per-opcode legal addressing-mode combinations. Operand counts have
    /// already been validated when this runs.
    pub fn allows_modes(
        self,
        first: Option<AddressingMode>,
        second: Option<AddressingMode>,
    ) -> bool {
        use AddressingMode::{Direct, RegisterDirect};
        match self {
            Self::Mov | Self::Add | Self::Sub => {
                first.is_some() && matches!(second, Some(Direct | RegisterDirect))
            }
            Self::Lea => first == Some(Direct) && matches!(second, Some(Direct | RegisterDirect)),
            Self::Not
            | Self::Clr
            | Self::Inc
            | Self::Dec
            | Self::Jmp
            | Self::Bne
            | Self::Red
            | Self::Jsr => matches!(first, Some(Direct | RegisterDirect)),
            Self::Cmp | Self::Prn | Self::Rts | Self::Stop => true,
        }
    }
}

/// Addressing modes; the discriminants are the exact mode-field bit patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    Immediate = 1,
    Direct = 3,
    RegisterDirect = 5,
}

impl AddressingMode {
    /// Mode-field bits for an optional operand; an absent operand encodes 0.
    pub fn bits(mode: Option<Self>) -> u16 {
        mode.map_or(0, |mode| mode as u16)
    }

    pub fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            1 => Some(Self::Immediate),
            3 => Some(Self::Direct),
            5 => Some(Self::RegisterDirect),
            _ => None,
        }
    }
}

/// The four assembler directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Data,
    String,
    Entry,
    Extern,
}

impl Directive {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            ".data" => Some(Self::Data),
            ".string" => Some(Self::String),
            ".entry" => Some(Self::Entry),
            ".extern" => Some(Self::Extern),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Data => ".data",
            Self::String => ".string",
            Self::Entry => ".entry",
            Self::Extern => ".extern",
        }
    }
}

/// Which counter a label belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Instruction,
    Directive,
}
