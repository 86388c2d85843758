//! Token recognizers for instruction arguments.
//!
//! Every recognizer works on an already trimmed argument and must match it
//! in full: `0x1g` is not a hex literal followed by garbage, it is no match.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{AsmConfig, CharLiteral};
use crate::error::AsmError;

/// Argument categories an encoding field can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Register,
    LiteralHex,
    LiteralBinary,
    LiteralDecimal,
    LiteralChar,
    /// Any of the literal syntaxes, tried hex, binary, decimal, char.
    NumericLiteral,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Register => "register",
            TokenKind::LiteralHex => "hex literal",
            TokenKind::LiteralBinary => "binary literal",
            TokenKind::LiteralDecimal => "decimal literal",
            TokenKind::LiteralChar => "character literal",
            TokenKind::NumericLiteral => "numeric literal",
        };
        f.write_str(name)
    }
}

impl TokenKind {
    /// Parse `arg` as this kind, applying the register and word-size limits of `cfg`.
    pub fn parse(self, arg: &str, cfg: &AsmConfig) -> Result<u32, AsmError> {
        let arg = arg.trim();
        let literal = match self {
            TokenKind::Register => return register(arg, cfg),
            TokenKind::NumericLiteral => return numeric_literal(arg, cfg),
            TokenKind::LiteralHex => literal_hex(arg),
            TokenKind::LiteralBinary => literal_binary(arg),
            TokenKind::LiteralDecimal => literal_decimal(arg),
            TokenKind::LiteralChar => literal_char(arg, cfg.char_literals),
        };
        let value = literal.ok_or_else(|| AsmError::ArgumentParse {
            argument: arg.to_string(),
            kind: self,
        })?;
        fit_word(arg, value, cfg)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn digits(s: &str, radix: u32) -> Option<u64> {
    if s.is_empty() || !s.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    // All digits are valid here, so the only way to fail is overflow.
    Some(u64::from_str_radix(s, radix).unwrap_or(u64::MAX))
}

fn fit_word(arg: &str, value: u64, cfg: &AsmConfig) -> Result<u32, AsmError> {
    let max = cfg.max_literal();
    if value > max {
        return Err(AsmError::OversizedLiteral { argument: arg.to_string(), max });
    }
    Ok(value as u32)
}

/// `$<digits>`, checked against the configured register count.
pub fn register(arg: &str, cfg: &AsmConfig) -> Result<u32, AsmError> {
    let index = arg
        .strip_prefix('$')
        .and_then(|d| digits(d, 10))
        .ok_or_else(|| AsmError::ArgumentParse {
            argument: arg.to_string(),
            kind: TokenKind::Register,
        })?;
    if index >= u64::from(cfg.num_registers) {
        return Err(AsmError::RegisterOutOfRange {
            argument: arg.to_string(),
            index,
            limit: cfg.num_registers,
        });
    }
    Ok(index as u32)
}

pub fn literal_hex(arg: &str) -> Option<u64> {
    let rest = arg.strip_prefix("0x").or_else(|| arg.strip_prefix("0X"))?;
    digits(rest, 16)
}

pub fn literal_binary(arg: &str) -> Option<u64> {
    let rest = arg.strip_prefix('b').or_else(|| arg.strip_prefix('B'))?;
    digits(rest, 2)
}

pub fn literal_decimal(arg: &str) -> Option<u64> {
    digits(arg, 10)
}

/// A single word character in single quotes.
pub fn literal_char(arg: &str, mode: CharLiteral) -> Option<u64> {
    let inner = arg.strip_prefix('\'')?.strip_suffix('\'')?;
    let mut chars = inner.chars();
    let c = chars.next().filter(|c| is_word_char(*c))?;
    if chars.next().is_some() {
        return None;
    }
    match mode {
        CharLiteral::Glyph => c.to_digit(2).map(u64::from),
        CharLiteral::Ordinal => Some(u64::from(u32::from(c))),
    }
}

pub fn numeric_literal(arg: &str, cfg: &AsmConfig) -> Result<u32, AsmError> {
    let value = literal_hex(arg)
        .or_else(|| literal_binary(arg))
        .or_else(|| literal_decimal(arg))
        .or_else(|| literal_char(arg, cfg.char_literals))
        .ok_or_else(|| AsmError::ArgumentParse {
            argument: arg.to_string(),
            kind: TokenKind::NumericLiteral,
        })?;
    fit_word(arg, value, cfg)
}

/// Split a line into its leading mnemonic and the rest of the line.
pub fn mnemonic(line: &str) -> Option<(&str, &str)> {
    let line = line.trim_start();
    let end = line.find(|c: char| !is_word_char(c)).unwrap_or(line.len());
    if end == 0 {
        return None;
    }
    Some(line.split_at(end))
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => chars.all(is_word_char),
        _ => false,
    }
}

/// True when `arg` would be taken as a register or literal rather than a name.
pub fn is_literal_syntax(arg: &str, cfg: &AsmConfig) -> bool {
    arg.starts_with('$')
        || literal_hex(arg).is_some()
        || literal_binary(arg).is_some()
        || literal_decimal(arg).is_some()
        || literal_char(arg, cfg.char_literals).is_some()
}
