pub mod assembler;
pub mod config;
pub mod disasm;
pub mod encoder;
pub mod encoding;
pub mod error;
pub mod image;
pub mod instructions;
pub mod layout;
pub mod lexer;

pub use assembler::Assembler;
pub use config::{AsmConfig, CharLiteral};
pub use encoder::Encoder;
pub use encoding::InstructionSet;
pub use error::{AsmError, LineError};
pub use image::MemoryImage;
pub use layout::{Label, LabelTable, Segment};
pub use lexer::TokenKind;
