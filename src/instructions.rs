use std::fmt;

use serde::{Deserialize, Serialize};

/// Fixed-width opcode bit pattern, e.g. `010` for `add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Opcode {
    pub bits: u32,
    pub width: u32,
}

impl Opcode {
    pub const fn new(bits: u32, width: u32) -> Self {
        Self { bits, width }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$b}", self.bits, width = self.width as usize)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct InstrDesc {
    pub mnemonic: &'static str,
    pub opcode: Opcode,
}

pub const TABLE: &[InstrDesc] = &[
    InstrDesc {
        mnemonic: "mv",
        opcode: Opcode::new(0b000, 3),
    },
    InstrDesc {
        mnemonic: "mvi",
        opcode: Opcode::new(0b001, 3),
    },
    InstrDesc {
        mnemonic: "add",
        opcode: Opcode::new(0b010, 3),
    },
    InstrDesc {
        mnemonic: "sub",
        opcode: Opcode::new(0b011, 3),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_renders_at_its_width() {
        assert_eq!(Opcode::new(0b010, 3).to_string(), "010");
        assert_eq!(Opcode::new(1, 5).to_string(), "00001");
    }
}
