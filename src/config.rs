use serde::{Deserialize, Serialize};

use crate::error::AsmError;

/// How a quoted character literal such as `'1'` is converted to a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharLiteral {
    /// The glyph is read as a base-2 digit string: only `'0'` and `'1'` convert.
    #[default]
    Glyph,
    /// The glyph's Unicode scalar value.
    Ordinal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsmConfig {
    pub num_registers: u32,
    pub memory_depth: u32, // addressable words
    pub memory_width: u32, // bits per word
    pub address_separator: u32,
    pub char_literals: CharLiteral,
    pub strict_arguments: bool, // surplus instruction arguments are an error
}

impl Default for AsmConfig {
    fn default() -> Self {
        Self {
            num_registers: 8,
            memory_depth: 256,
            memory_width: 16,
            address_separator: 1,
            char_literals: CharLiteral::Glyph,
            strict_arguments: true,
        }
    }
}

impl AsmConfig {
    /// Largest value a single word can hold.
    pub fn max_literal(&self) -> u64 {
        (1u64 << self.memory_width) - 1
    }

    pub fn validate(&self) -> Result<(), AsmError> {
        if self.memory_width == 0 || self.memory_width > 32 {
            return Err(AsmError::InvalidConfig {
                reason: format!("memory width {} is outside 1..=32", self.memory_width),
            });
        }
        if self.memory_depth == 0 || u64::from(self.memory_depth) > self.max_literal() + 1 {
            return Err(AsmError::InvalidConfig {
                reason: format!(
                    "memory depth {} is not addressable with {}-bit words",
                    self.memory_depth, self.memory_width
                ),
            });
        }
        if self.num_registers == 0 {
            return Err(AsmError::InvalidConfig { reason: "no registers configured".into() });
        }
        if self.address_separator == 0 {
            return Err(AsmError::InvalidConfig { reason: "address separator must be non-zero".into() });
        }
        Ok(())
    }
}
