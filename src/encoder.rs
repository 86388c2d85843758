use bitvec::prelude::*;
use tracing::trace;

use crate::config::AsmConfig;
use crate::encoding::{Field, InstructionSet};
use crate::error::AsmError;
use crate::lexer;

/// One encoded word, most significant bit first.
pub type WordBits = BitVec<u32, Msb0>;

/// An instruction occurrence: mnemonic plus raw, trimmed argument strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction<'a> {
    pub mnemonic: &'a str,
    pub args: Vec<&'a str>,
}

impl<'a> Instruction<'a> {
    pub fn parse(line: &'a str) -> Result<Self, AsmError> {
        let (mnemonic, rest) = lexer::mnemonic(line).ok_or_else(|| AsmError::UnknownMnemonic {
            mnemonic: line.trim().to_string(),
        })?;
        Ok(Self { mnemonic, args: split_args(rest) })
    }
}

/// Comma separated, whitespace trimmed; nothing at all means no arguments.
pub fn split_args(rest: &str) -> Vec<&str> {
    if rest.trim().is_empty() {
        return Vec::new();
    }
    rest.split(',').map(str::trim).collect()
}

/// Read position over an instruction's arguments.
///
/// A single cursor is threaded through every word of the instruction and is
/// never reset between words; multi-word layouts rely on that ordering.
#[derive(Debug)]
pub struct ArgCursor<'i, 'a> {
    args: &'i [&'a str],
    next: usize,
}

impl<'i, 'a> ArgCursor<'i, 'a> {
    pub fn new(args: &'i [&'a str]) -> Self {
        Self { args, next: 0 }
    }

    pub fn take(&mut self, kind: lexer::TokenKind) -> Result<&'a str, AsmError> {
        let arg = self
            .args
            .get(self.next)
            .copied()
            .ok_or(AsmError::MissingArgument { index: self.next + 1, kind })?;
        self.next += 1;
        Ok(arg)
    }

    pub fn consumed(&self) -> usize {
        self.next
    }

    pub fn remaining(&self) -> usize {
        self.args.len() - self.next
    }
}

fn push_field(word: &mut WordBits, value: u32, width: u32, argument: &str) -> Result<(), AsmError> {
    let needed = (u32::BITS - value.leading_zeros()).max(1);
    if needed > width {
        return Err(AsmError::FieldWidthOverflow { argument: argument.to_string(), needed, width });
    }
    let pad = width.saturating_sub(u32::BITS) as usize;
    word.resize(word.len() + pad, false);
    let take = width.min(u32::BITS) as usize;
    word.extend_from_bitslice(&value.view_bits::<Msb0>()[u32::BITS as usize - take..]);
    Ok(())
}

pub struct Encoder<'a> {
    isa: &'a InstructionSet,
    cfg: &'a AsmConfig,
}

impl<'a> Encoder<'a> {
    pub fn new(isa: &'a InstructionSet, cfg: &'a AsmConfig) -> Self {
        Self { isa, cfg }
    }

    /// Encode one source line into its words; either every word or an error.
    pub fn encode_line(&self, line: &str) -> Result<Vec<u32>, AsmError> {
        let words = self.encode_bits(line)?;
        Ok(words.iter().map(|w| w.load_be::<u32>()).collect())
    }

    pub fn encode_bits(&self, line: &str) -> Result<Vec<WordBits>, AsmError> {
        let instr = Instruction::parse(line)?;
        let words = self.encode(&instr)?;
        trace!(line = line.trim(), words = words.len(), "encoded");
        Ok(words)
    }

    pub fn encode(&self, instr: &Instruction<'_>) -> Result<Vec<WordBits>, AsmError> {
        let opcode = self.isa.opcode_of(instr.mnemonic)?;
        let specs = self.isa.word_specs_of(opcode)?;
        let mut cursor = ArgCursor::new(&instr.args);
        let mut words = Vec::with_capacity(specs.len());

        for (index, spec) in specs.iter().enumerate() {
            let mut word = WordBits::with_capacity(self.cfg.memory_width as usize);
            for field in spec.iter() {
                match *field {
                    Field::Const(bits) => {
                        for c in bits.chars() {
                            match c {
                                '0' => word.push(false),
                                '1' => word.push(true),
                                _ => {
                                    return Err(AsmError::MalformedWordSpec {
                                        opcode: opcode.to_string(),
                                        word: index,
                                        bits: word.len(),
                                        expected: self.cfg.memory_width,
                                    })
                                }
                            }
                        }
                    }
                    Field::Opcode(width) => {
                        if opcode.width > width {
                            return Err(AsmError::FieldWidthOverflow {
                                argument: opcode.to_string(),
                                needed: opcode.width,
                                width,
                            });
                        }
                        push_field(&mut word, opcode.bits, width, &opcode.to_string())?;
                    }
                    Field::Token(kind, width) => {
                        let arg = cursor.take(kind)?;
                        let value = kind.parse(arg, self.cfg)?;
                        push_field(&mut word, value, width, arg)?;
                    }
                }
            }
            if word.len() != self.cfg.memory_width as usize {
                return Err(AsmError::MalformedWordSpec {
                    opcode: opcode.to_string(),
                    word: index,
                    bits: word.len(),
                    expected: self.cfg.memory_width,
                });
            }
            words.push(word);
        }

        if self.cfg.strict_arguments && cursor.remaining() > 0 {
            return Err(AsmError::ExtraArgument {
                expected: cursor.consumed(),
                found: instr.args.len(),
            });
        }
        Ok(words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_is_shared_and_monotonic() {
        let args = ["$1", "0x2"];
        let mut cursor = ArgCursor::new(&args);
        assert_eq!(cursor.take(lexer::TokenKind::Register).unwrap(), "$1");
        assert_eq!(cursor.take(lexer::TokenKind::NumericLiteral).unwrap(), "0x2");
        assert_eq!(cursor.remaining(), 0);
        assert_eq!(
            cursor.take(lexer::TokenKind::Register),
            Err(AsmError::MissingArgument { index: 3, kind: lexer::TokenKind::Register })
        );
    }

    #[test]
    fn push_field_pads_and_rejects_overflow() {
        let mut word = WordBits::new();
        push_field(&mut word, 0b101, 5, "b101").unwrap();
        assert_eq!(word.as_bitslice(), bits![u32, Msb0; 0, 0, 1, 0, 1]);
        assert!(matches!(
            push_field(&mut word, 8, 3, "8"),
            Err(AsmError::FieldWidthOverflow { needed: 4, width: 3, .. })
        ));
    }

    #[test]
    fn split_args_handles_empty_tail() {
        assert!(split_args("   ").is_empty());
        assert_eq!(split_args(" $0 ,   $1 "), vec!["$0", "$1"]);
    }
}
