//! Declarative instruction layouts.
//!
//! Each opcode owns a list of word specifications, one per emitted word. A
//! word specification lists its fields from the most significant bit down.
//! Token fields consume instruction arguments in order, across word
//! boundaries: `mvi $4, 0x1` takes `$4` in word 0 and `0x1` in word 1.

use std::collections::HashMap;

use crate::config::AsmConfig;
use crate::error::AsmError;
use crate::instructions::{InstrDesc, Opcode, TABLE};
use crate::lexer::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Bits spliced in verbatim.
    Const(&'static str),
    /// The instruction's opcode, zero-extended to the given width.
    Opcode(u32),
    /// The next argument parsed as `TokenKind`, zero-extended to the given width.
    Token(TokenKind, u32),
}

impl Field {
    pub fn width(&self) -> usize {
        match self {
            Field::Const(bits) => bits.len(),
            Field::Opcode(width) | Field::Token(_, width) => *width as usize,
        }
    }
}

pub type WordSpec = &'static [Field];

#[derive(Debug, Clone, Copy)]
pub struct Encoding {
    pub opcode: Opcode,
    pub words: &'static [WordSpec],
}

// 0x0 { XXXX XXXi iixx xyyy }
const REG_REG: &[WordSpec] = &[&[
    Field::Opcode(10),
    Field::Token(TokenKind::Register, 3),
    Field::Token(TokenKind::Register, 3),
]];

// 0x0 { XXXX XXXi iixx x000 }
// 0x1 { immediate }
const REG_IMM: &[WordSpec] = &[
    &[Field::Opcode(10), Field::Token(TokenKind::Register, 3), Field::Const("000")],
    &[Field::Token(TokenKind::NumericLiteral, 16)],
];

pub const ENCODINGS: &[Encoding] = &[
    Encoding { opcode: Opcode::new(0b000, 3), words: REG_REG },
    Encoding { opcode: Opcode::new(0b001, 3), words: REG_IMM },
    Encoding { opcode: Opcode::new(0b010, 3), words: REG_REG },
    Encoding { opcode: Opcode::new(0b011, 3), words: REG_REG },
];

/// Instruction table and encoding table, immutable once built.
///
/// Assemblers borrow an `InstructionSet`, so one instance can back any
/// number of concurrent assembly runs.
#[derive(Debug, Clone)]
pub struct InstructionSet {
    instrs: Vec<InstrDesc>,
    opcodes: HashMap<String, Opcode>,
    encodings: HashMap<Opcode, &'static [WordSpec]>,
}

impl InstructionSet {
    pub fn new(instrs: &[InstrDesc], encodings: &[Encoding]) -> Self {
        Self {
            instrs: instrs.to_vec(),
            opcodes: instrs
                .iter()
                .map(|d| (d.mnemonic.to_ascii_lowercase(), d.opcode))
                .collect(),
            encodings: encodings.iter().map(|e| (e.opcode, e.words)).collect(),
        }
    }

    /// The `mv` / `mvi` / `add` / `sub` machine.
    pub fn standard() -> Self {
        Self::new(TABLE, ENCODINGS)
    }

    /// Case-insensitive mnemonic lookup.
    pub fn opcode_of(&self, mnemonic: &str) -> Result<Opcode, AsmError> {
        self.opcodes
            .get(&mnemonic.to_ascii_lowercase())
            .copied()
            .ok_or_else(|| AsmError::UnknownMnemonic { mnemonic: mnemonic.to_string() })
    }

    pub fn word_specs_of(&self, opcode: Opcode) -> Result<&'static [WordSpec], AsmError> {
        self.encodings
            .get(&opcode)
            .copied()
            .ok_or_else(|| AsmError::UnknownOpcode { opcode: opcode.to_string() })
    }

    /// Words occupied by one occurrence of `mnemonic` (`.next - .here`).
    pub fn word_count(&self, mnemonic: &str) -> Result<u32, AsmError> {
        let opcode = self.opcode_of(mnemonic)?;
        Ok(self.word_specs_of(opcode)?.len() as u32)
    }

    pub fn is_mnemonic(&self, name: &str) -> bool {
        self.opcodes.contains_key(&name.to_ascii_lowercase())
    }

    /// Instructions in table order.
    pub fn instructions(&self) -> &[InstrDesc] {
        &self.instrs
    }

    /// Check that every instruction has an encoding and every word adds up to
    /// exactly `cfg.memory_width` bits.
    pub fn validate(&self, cfg: &AsmConfig) -> Result<(), AsmError> {
        for desc in &self.instrs {
            let words = self.word_specs_of(desc.opcode)?;
            if words.is_empty() {
                return Err(AsmError::MalformedWordSpec {
                    opcode: desc.opcode.to_string(),
                    word: 0,
                    bits: 0,
                    expected: cfg.memory_width,
                });
            }
            for (index, word) in words.iter().enumerate() {
                let malformed = || AsmError::MalformedWordSpec {
                    opcode: desc.opcode.to_string(),
                    word: index,
                    bits: word.iter().map(Field::width).sum(),
                    expected: cfg.memory_width,
                };
                for field in word.iter() {
                    match *field {
                        Field::Const(bits) => {
                            if !bits.chars().all(|c| c == '0' || c == '1') {
                                return Err(malformed());
                            }
                        }
                        Field::Opcode(width) => {
                            if desc.opcode.width > width {
                                return Err(AsmError::FieldWidthOverflow {
                                    argument: desc.opcode.to_string(),
                                    needed: desc.opcode.width,
                                    width,
                                });
                            }
                        }
                        Field::Token(_, width) => {
                            if width == 0 || width > 32 {
                                return Err(malformed());
                            }
                        }
                    }
                }
                let bits: usize = word.iter().map(Field::width).sum();
                if bits != cfg.memory_width as usize {
                    return Err(malformed());
                }
            }
        }
        Ok(())
    }
}
