use std::fmt;

use bitvec::prelude::*;

use crate::config::{AsmConfig, CharLiteral};
use crate::encoding::{Field, InstructionSet, WordSpec};
use crate::instructions::Opcode;
use crate::lexer::TokenKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub mnemonic: &'static str,
    pub args: Vec<String>,
    pub len: usize, // words consumed
}

impl fmt::Display for Decoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic)?;
        if !self.args.is_empty() {
            write!(f, " {}", self.args.join(", "))?;
        }
        Ok(())
    }
}

fn fmt_arg(kind: TokenKind, value: u32, cfg: &AsmConfig) -> Option<String> {
    let text = match kind {
        TokenKind::Register => {
            if value >= cfg.num_registers {
                return None;
            }
            format!("${value}")
        }
        TokenKind::LiteralHex | TokenKind::NumericLiteral => format!("{value:#x}"),
        TokenKind::LiteralBinary => format!("b{value:b}"),
        TokenKind::LiteralDecimal => value.to_string(),
        TokenKind::LiteralChar => {
            let c = match cfg.char_literals {
                CharLiteral::Glyph => char::from_digit(value, 2)?,
                CharLiteral::Ordinal => char::from_u32(value)?,
            };
            if !(c.is_ascii_alphanumeric() || c == '_') {
                return None;
            }
            format!("'{c}'")
        }
    };
    Some(text)
}

fn match_word(spec: WordSpec, opcode: Opcode, word: u32, cfg: &AsmConfig, args: &mut Vec<String>) -> Option<()> {
    let width = cfg.memory_width as usize;
    if width == 0 || width > 32 {
        return None;
    }
    let bits = &word.view_bits::<Msb0>()[u32::BITS as usize - width..];
    let mut pos = 0usize;
    for field in spec.iter() {
        let w = field.width();
        let slot = bits.get(pos..pos + w)?;
        match *field {
            Field::Const(pattern) => {
                if !pattern.chars().zip(slot.iter()).all(|(c, b)| (c == '1') == *b) {
                    return None;
                }
            }
            Field::Opcode(_) => {
                if w == 0 || w > 32 || slot.load_be::<u32>() != opcode.bits {
                    return None;
                }
            }
            Field::Token(kind, _) => {
                if w == 0 || w > 32 {
                    return None;
                }
                args.push(fmt_arg(kind, slot.load_be::<u32>(), cfg)?);
            }
        }
        pos += w;
    }
    (pos == width).then_some(())
}

/// Decode the instruction starting at `words[0]`, if any table entry matches.
pub fn decode(isa: &InstructionSet, cfg: &AsmConfig, words: &[u32]) -> Option<Decoded> {
    isa.instructions().iter().find_map(|desc| {
        let specs = isa.word_specs_of(desc.opcode).ok()?;
        if specs.is_empty() || words.len() < specs.len() {
            return None;
        }
        let mut args = Vec::new();
        for (spec, word) in specs.iter().zip(words) {
            match_word(spec, desc.opcode, *word, cfg, &mut args)?;
        }
        Some(Decoded { mnemonic: desc.mnemonic, args, len: specs.len() })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_register_pair() {
        let isa = InstructionSet::standard();
        let cfg = AsmConfig::default();
        let d = decode(&isa, &cfg, &[0b0000000010_001_000]).unwrap();
        assert_eq!(d.to_string(), "add $1, $0");
        assert_eq!(d.len, 1);
    }

    #[test]
    fn two_word_instruction_needs_both_words() {
        let isa = InstructionSet::standard();
        let cfg = AsmConfig::default();
        let first = 0b0000000001_100_000;
        assert!(decode(&isa, &cfg, &[first]).is_none());
        let d = decode(&isa, &cfg, &[first, 0x1]).unwrap();
        assert_eq!(d.to_string(), "mvi $4, 0x1");
        assert_eq!(d.len, 2);
    }

    #[test]
    fn constant_bits_must_match() {
        let isa = InstructionSet::standard();
        let cfg = AsmConfig::default();
        // mvi with a non-zero padding field
        assert!(decode(&isa, &cfg, &[0b0000000001_100_010, 0x1]).is_none());
    }
}
