use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::AsmError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    Text, // grows up from 0
    Data, // grows down from the top of memory
}

/// Two bump allocators over one address space of `depth` words.
///
/// `here_text` is the next free text address; `here_data` is the lowest
/// address handed out to data so far (`depth` while data is empty).
/// `here_text <= here_data` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    here_text: u32,
    here_data: u32,
}

impl Layout {
    pub fn new(depth: u32) -> Self {
        Self { here_text: 0, here_data: depth }
    }

    /// The counter a label in `segment` binds to when nothing follows it.
    pub fn here(&self, segment: Segment) -> u32 {
        match segment {
            Segment::Text => self.here_text,
            Segment::Data => self.here_data,
        }
    }

    pub fn free(&self) -> u32 {
        self.here_data - self.here_text
    }

    /// Reserve `words` contiguous words and return the first address.
    pub fn place(&mut self, segment: Segment, words: u32) -> Result<u32, AsmError> {
        if words > self.free() {
            return Err(AsmError::MemoryOverflow {
                words,
                text_end: self.here_text,
                data_start: self.here_data,
            });
        }
        match segment {
            Segment::Text => {
                let start = self.here_text;
                self.here_text += words;
                Ok(start)
            }
            Segment::Data => {
                self.here_data -= words;
                Ok(self.here_data)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub address: u32,
    pub segment: Segment,
}

/// Write-once name to address bindings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelTable {
    labels: BTreeMap<String, Label>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, name: &str, label: Label) -> Result<(), AsmError> {
        if let Some(prev) = self.labels.get(name) {
            return Err(AsmError::LabelRedefinition { name: name.to_string(), address: prev.address });
        }
        self.labels.insert(name.to_string(), label);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Label> {
        self.labels.get(name).copied()
    }

    pub fn address_of(&self, name: &str) -> Option<u32> {
        self.get(name).map(|l| l.address)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Label)> + '_ {
        self.labels.iter().map(|(name, label)| (name.as_str(), *label))
    }
}
