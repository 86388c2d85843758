use crate::lexer::TokenKind;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    #[error("unknown mnemonic `{mnemonic}`")]
    UnknownMnemonic { mnemonic: String },
    #[error("no encoding entry for opcode {opcode}")]
    UnknownOpcode { opcode: String },
    #[error("register `{argument}` does not exist, largest register index is {}", .limit.saturating_sub(1))]
    RegisterOutOfRange { argument: String, index: u64, limit: u32 },
    #[error("literal `{argument}` is larger than {max}")]
    OversizedLiteral { argument: String, max: u64 },
    #[error("could not parse `{argument}` as {kind}")]
    ArgumentParse { argument: String, kind: TokenKind },
    #[error("missing argument #{index} ({kind})")]
    MissingArgument { index: usize, kind: TokenKind },
    #[error("too many arguments: expected {expected}, found {found}")]
    ExtraArgument { expected: usize, found: usize },
    #[error("value of `{argument}` needs {needed} bits but its field is {width} bits wide")]
    FieldWidthOverflow { argument: String, needed: u32, width: u32 },
    #[error("label `{name}` is already defined at {address:#x}")]
    LabelRedefinition { name: String, address: u32 },
    #[error("undefined label `{name}`")]
    UndefinedLabel { name: String },
    #[error("`{name}` is not a valid label name")]
    InvalidLabelName { name: String },
    #[error("unknown directive `{name}`")]
    UnknownDirective { name: String },
    #[error("{words} word(s) do not fit: text ends at {text_end:#x}, data starts at {data_start:#x}")]
    MemoryOverflow { words: u32, text_end: u32, data_start: u32 },
    #[error("word {word} of opcode {opcode} is malformed: {bits} bits, expected {expected}")]
    MalformedWordSpec { opcode: String, word: usize, bits: usize, expected: u32 },
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

/// An [`AsmError`] pinned to the source line that raised it.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {source} (in `{text}`)")]
pub struct LineError {
    pub line: usize, // 1-based
    pub text: String,
    #[source]
    pub source: AsmError,
}

impl LineError {
    pub fn new(line: usize, text: &str, source: AsmError) -> Self {
        Self { line, text: text.trim().to_string(), source }
    }

    pub fn kind(&self) -> &AsmError {
        &self.source
    }
}
