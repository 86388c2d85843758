//! Two-pass driver.
//!
//! Source grammar, one statement per line:
//!
//! ```text
//! ; comment                 # comment (first column only)
//! .text | .data             switch segment
//! name:                     label for the next statement of the segment
//! name: mvi $0, value       label and statement on one line
//! mv $1, $0                 text: one instruction
//! 0x2A, b101, 'x'           data: one word per value
//! ```
//!
//! Pass one binds labels, pass two substitutes them and encodes. Both passes
//! share one layout walk, so they see identical addresses.

use tracing::{debug, info};

use crate::config::AsmConfig;
use crate::encoder::{split_args, Encoder};
use crate::encoding::InstructionSet;
use crate::error::{AsmError, LineError};
use crate::image::MemoryImage;
use crate::layout::{Label, LabelTable, Layout, Segment};
use crate::lexer::{self, TokenKind};

const HERE: &str = ".here";
const NEXT: &str = ".next";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Body<'a> {
    Empty,
    Directive(Segment),
    Statement(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SourceLine<'a> {
    label: Option<&'a str>,
    body: Body<'a>,
}

/// A statement after layout: where it lives and how many words it takes.
#[derive(Debug, Clone, Copy)]
struct Placed<'a> {
    segment: Segment,
    start: u32,
    len: u32,
    body: &'a str,
}

pub struct Assembler<'a> {
    isa: &'a InstructionSet,
    cfg: AsmConfig,
}

impl<'a> Assembler<'a> {
    pub fn new(isa: &'a InstructionSet, cfg: AsmConfig) -> Result<Self, AsmError> {
        cfg.validate()?;
        isa.validate(&cfg)?;
        Ok(Self { isa, cfg })
    }

    pub fn config(&self) -> &AsmConfig {
        &self.cfg
    }

    pub fn assemble<S: AsRef<str>>(&self, lines: &[S]) -> Result<MemoryImage, LineError> {
        let labels = self.pass_one(lines)?;
        let image = self.pass_two(lines, &labels)?;
        info!(
            text_words = image.text_end,
            data_words = self.cfg.memory_depth - image.data_start,
            labels = labels.len(),
            "assembled"
        );
        Ok(image)
    }

    pub fn assemble_str(&self, source: &str) -> Result<MemoryImage, LineError> {
        let lines: Vec<&str> = source.lines().collect();
        self.assemble(&lines)
    }

    /// Bind every label to its address without emitting anything.
    pub fn pass_one<S: AsRef<str>>(&self, lines: &[S]) -> Result<LabelTable, LineError> {
        let mut labels = LabelTable::new();
        let layout = self.walk(
            lines,
            |name, label| {
                debug!(label = name, address = label.address, segment = ?label.segment, "bound");
                labels.define(name, label)
            },
            |_| Ok(()),
        )?;
        debug!(labels = labels.len(), free = layout.free(), "pass one done");
        Ok(labels)
    }

    /// Encode every statement into a fresh image using `labels` from pass one.
    pub fn pass_two<S: AsRef<str>>(&self, lines: &[S], labels: &LabelTable) -> Result<MemoryImage, LineError> {
        let encoder = Encoder::new(self.isa, &self.cfg);
        let mut image = MemoryImage::new(&self.cfg);
        let layout = self.walk(
            lines,
            |_, _| Ok(()),
            |placed| {
                let words = self.emit(&encoder, labels, placed)?;
                image.write(placed.start, &words)
            },
        )?;
        image.text_end = layout.here(Segment::Text);
        image.data_start = layout.here(Segment::Data);
        Ok(image)
    }

    fn walk<'s, S, L, P>(&self, lines: &'s [S], mut on_label: L, mut on_stmt: P) -> Result<Layout, LineError>
    where
        S: AsRef<str>,
        L: FnMut(&'s str, Label) -> Result<(), AsmError>,
        P: FnMut(Placed<'s>) -> Result<(), AsmError>,
    {
        let mut layout = Layout::new(self.cfg.memory_depth);
        let mut mode = Segment::Text;
        // (name, line number, line text)
        let mut pending: Vec<(&'s str, usize, &'s str)> = Vec::new();

        let mut flush = |pending: &mut Vec<(&'s str, usize, &'s str)>, label: Label| -> Result<(), LineError> {
            for (name, no, text) in pending.drain(..) {
                on_label(name, label).map_err(|e| LineError::new(no, text, e))?;
            }
            Ok(())
        };

        for (index, raw) in lines.iter().enumerate() {
            let no = index + 1;
            let text = raw.as_ref();
            let line = self.classify(text).map_err(|e| LineError::new(no, text, e))?;
            if let Some(name) = line.label {
                pending.push((name, no, text));
            }
            match line.body {
                Body::Empty => {}
                Body::Directive(segment) => {
                    flush(&mut pending, Label { address: layout.here(mode), segment: mode })?;
                    mode = segment;
                }
                Body::Statement(body) => {
                    let len = self.statement_len(mode, body).map_err(|e| LineError::new(no, text, e))?;
                    let start = layout.place(mode, len).map_err(|e| LineError::new(no, text, e))?;
                    flush(&mut pending, Label { address: start, segment: mode })?;
                    on_stmt(Placed { segment: mode, start, len, body })
                        .map_err(|e| LineError::new(no, text, e))?;
                }
            }
        }
        flush(&mut pending, Label { address: layout.here(mode), segment: mode })?;
        Ok(layout)
    }

    fn classify<'s>(&self, text: &'s str) -> Result<SourceLine<'s>, AsmError> {
        let mut s = text.trim_start();
        if s.starts_with('#') {
            return Ok(SourceLine { label: None, body: Body::Empty });
        }
        if let Some(p) = s.find(';') {
            s = &s[..p];
        }
        let mut s = s.trim();

        let mut label = None;
        if let Some(p) = s.find(':') {
            let name = s[..p].trim();
            if !lexer::is_identifier(name)
                || lexer::is_literal_syntax(name, &self.cfg)
                || self.isa.is_mnemonic(name)
            {
                return Err(AsmError::InvalidLabelName { name: name.to_string() });
            }
            label = Some(name);
            s = s[p + 1..].trim();
        }

        let body = if s.is_empty() {
            Body::Empty
        } else if s.starts_with('.') {
            match s.to_ascii_lowercase().as_str() {
                ".text" => Body::Directive(Segment::Text),
                ".data" => Body::Directive(Segment::Data),
                _ => return Err(AsmError::UnknownDirective { name: s.to_string() }),
            }
        } else {
            Body::Statement(s)
        };
        Ok(SourceLine { label, body })
    }

    fn statement_len(&self, mode: Segment, body: &str) -> Result<u32, AsmError> {
        match mode {
            Segment::Text => {
                let (mnemonic, _) = lexer::mnemonic(body)
                    .ok_or_else(|| AsmError::UnknownMnemonic { mnemonic: body.to_string() })?;
                self.isa.word_count(mnemonic)
            }
            Segment::Data => Ok(split_args(body).len() as u32),
        }
    }

    /// Replace `.here`, `.next` and label names with decimal addresses.
    fn resolve(&self, arg: &str, labels: &LabelTable, placed: &Placed<'_>) -> Result<String, AsmError> {
        if arg.eq_ignore_ascii_case(HERE) {
            return Ok(placed.start.to_string());
        }
        if arg.eq_ignore_ascii_case(NEXT) {
            return Ok((placed.start + placed.len).to_string());
        }
        if lexer::is_identifier(arg) && !lexer::is_literal_syntax(arg, &self.cfg) {
            return labels
                .address_of(arg)
                .map(|a| a.to_string())
                .ok_or_else(|| AsmError::UndefinedLabel { name: arg.to_string() });
        }
        Ok(arg.to_string())
    }

    fn emit(&self, encoder: &Encoder<'_>, labels: &LabelTable, placed: Placed<'_>) -> Result<Vec<u32>, AsmError> {
        match placed.segment {
            Segment::Text => {
                let (mnemonic, rest) = lexer::mnemonic(placed.body)
                    .ok_or_else(|| AsmError::UnknownMnemonic { mnemonic: placed.body.to_string() })?;
                let args = split_args(rest)
                    .into_iter()
                    .map(|arg| self.resolve(arg, labels, &placed))
                    .collect::<Result<Vec<_>, _>>()?;
                let line = format!("{mnemonic} {}", args.join(", "));
                encoder.encode_line(&line)
            }
            Segment::Data => split_args(placed.body)
                .into_iter()
                .map(|value| {
                    let value = self.resolve(value, labels, &placed)?;
                    TokenKind::NumericLiteral.parse(&value, &self.cfg)
                })
                .collect(),
        }
    }
}
