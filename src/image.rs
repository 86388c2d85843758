use serde::{Deserialize, Serialize};

use crate::config::AsmConfig;
use crate::disasm;
use crate::encoding::InstructionSet;
use crate::error::AsmError;

/// The assembled memory: `words.len()` is the memory depth, each word holds
/// `width` significant bits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryImage {
    pub width: u32,
    pub words: Vec<u32>,
    pub text_end: u32,   // first address past the text segment
    pub data_start: u32, // lowest data address, == depth when there is no data
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingRow {
    pub address: u32,
    pub bits: String,
    pub text: String,
}

impl MemoryImage {
    pub fn new(cfg: &AsmConfig) -> Self {
        Self {
            width: cfg.memory_width,
            words: vec![0; cfg.memory_depth as usize],
            text_end: 0,
            data_start: cfg.memory_depth,
        }
    }

    pub fn depth(&self) -> usize {
        self.words.len()
    }

    pub fn word(&self, address: u32) -> Option<u32> {
        self.words.get(address as usize).copied()
    }

    pub fn write(&mut self, address: u32, words: &[u32]) -> Result<(), AsmError> {
        let start = address as usize;
        let slots = self
            .words
            .get_mut(start..start + words.len())
            .ok_or(AsmError::MemoryOverflow {
                words: words.len() as u32,
                text_end: self.text_end,
                data_start: self.data_start,
            })?;
        slots.copy_from_slice(words);
        Ok(())
    }

    pub fn text_segment(&self) -> &[u32] {
        self.words.get(..self.text_end as usize).unwrap_or(&[])
    }

    pub fn data_segment(&self) -> &[u32] {
        self.words.get(self.data_start as usize..).unwrap_or(&[])
    }

    pub fn bit_string(&self, word: u32) -> String {
        format!("{:0width$b}", word, width = self.width as usize)
    }

    pub fn to_bit_strings(&self) -> Vec<String> {
        self.words.iter().map(|w| self.bit_string(*w)).collect()
    }

    /// One bit string per line, address 0 first.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.depth() * (self.width as usize + 1));
        for bits in self.to_bit_strings() {
            out.push_str(&bits);
            out.push('\n');
        }
        out
    }

    /// Disassembly of the text segment followed by the raw data segment.
    pub fn listing(&self, isa: &InstructionSet, cfg: &AsmConfig) -> Vec<ListingRow> {
        let mut rows = Vec::new();
        let text = self.text_segment();
        let mut pc = 0usize;
        while pc < text.len() {
            let (len, line) = match disasm::decode(isa, cfg, &text[pc..]) {
                Some(d) => (d.len, d.to_string()),
                None => (1, format!(".word {:#x}", text[pc])),
            };
            for (i, word) in text[pc..pc + len].iter().enumerate() {
                rows.push(ListingRow {
                    address: (pc + i) as u32 * cfg.address_separator,
                    bits: self.bit_string(*word),
                    text: if i == 0 { line.clone() } else { String::new() },
                });
            }
            pc += len;
        }
        for (i, word) in self.data_segment().iter().enumerate() {
            rows.push(ListingRow {
                address: (self.data_start + i as u32) * cfg.address_separator,
                bits: self.bit_string(*word),
                text: format!(".word {word:#x}"),
            });
        }
        rows
    }
}

pub fn render_listing(rows: &[ListingRow]) -> String {
    let mut out = String::new();
    for row in rows {
        let line = format!("{:#06x}  {}  {}", row.address, row.bits, row.text);
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_rejects_out_of_range() {
        let cfg = AsmConfig { memory_depth: 4, ..AsmConfig::default() };
        let mut img = MemoryImage::new(&cfg);
        img.write(2, &[1, 2]).unwrap();
        assert_eq!(img.words, vec![0, 0, 1, 2]);
        assert!(matches!(img.write(3, &[1, 2]), Err(AsmError::MemoryOverflow { .. })));
    }

    #[test]
    fn bit_strings_are_padded_to_width() {
        let cfg = AsmConfig { memory_depth: 2, ..AsmConfig::default() };
        let mut img = MemoryImage::new(&cfg);
        img.write(0, &[5]).unwrap();
        assert_eq!(img.render(), "0000000000000101\n0000000000000000\n");
    }
}
