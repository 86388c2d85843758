use minasm::encoding::{Encoding, Field, WordSpec};
use minasm::instructions::{InstrDesc, Opcode};
use minasm::{AsmConfig, AsmError, Encoder, InstructionSet, TokenKind};
use pretty_assertions::assert_eq;

fn bits(cfg: &AsmConfig, line: &str) -> Result<Vec<String>, AsmError> {
    let isa = InstructionSet::standard();
    let enc = Encoder::new(&isa, cfg);
    Ok(enc
        .encode_line(line)?
        .into_iter()
        .map(|w| format!("{w:016b}"))
        .collect())
}

fn encode(line: &str) -> Result<Vec<String>, AsmError> {
    bits(&AsmConfig::default(), line)
}

#[test]
fn register_to_register() {
    assert_eq!(encode("mv $0, $1").unwrap(), vec!["0000000000000001"]);
    assert_eq!(encode("add $1, $0").unwrap(), vec!["0000000010001000"]);
    assert_eq!(encode("sub $5, $2").unwrap(), vec!["0000000011101010"]);
}

#[test]
fn whitespace_and_case_do_not_matter() {
    assert_eq!(encode("    mv $0, $1").unwrap(), encode("mv $0,$1").unwrap());
    assert_eq!(encode("mv       $2,   $3").unwrap(), vec!["0000000000010011"]);
    assert_eq!(encode(" mvI $4, 0x1").unwrap(), encode("mvi $4, 0x1").unwrap());
}

#[test]
fn immediate_spans_two_words() {
    assert_eq!(
        encode("mvi $4, 0x1").unwrap(),
        vec!["0000000001100000", "0000000000000001"]
    );
    let fifteen = vec!["0000000001000000", "0000000000001111"];
    assert_eq!(encode("mvi $0, 0x000F").unwrap(), fifteen);
    assert_eq!(encode("mvi $0, 15").unwrap(), fifteen);
    assert_eq!(encode("mvi $0, b1111").unwrap(), fifteen);
}

#[test]
fn encoding_is_idempotent() {
    let isa = InstructionSet::standard();
    let cfg = AsmConfig::default();
    let enc = Encoder::new(&isa, &cfg);
    let first = enc.encode_bits("mvi $2, 0x0002").unwrap();
    let second = enc.encode_bits("mvi $2, 0x0002").unwrap();
    assert_eq!(first, second);
}

#[test]
fn oversized_immediate() {
    assert_eq!(
        encode("mvi $0, 0x12345"),
        Err(AsmError::OversizedLiteral { argument: "0x12345".into(), max: 0xFFFF })
    );
}

#[test]
fn out_of_range_second_register() {
    assert_eq!(
        encode("add        $7, $9"),
        Err(AsmError::RegisterOutOfRange { argument: "$9".into(), index: 9, limit: 8 })
    );
    assert!(matches!(encode("sub $0, $10"), Err(AsmError::RegisterOutOfRange { index: 10, .. })));
}

#[test]
fn unparsable_argument_names_kind() {
    assert_eq!(
        encode("add $d, $2"),
        Err(AsmError::ArgumentParse { argument: "$d".into(), kind: TokenKind::Register })
    );
    assert_eq!(
        encode("mvi $1, zz!"),
        Err(AsmError::ArgumentParse { argument: "zz!".into(), kind: TokenKind::NumericLiteral })
    );
}

#[test]
fn argument_count_mismatch() {
    assert_eq!(
        encode("add $1"),
        Err(AsmError::MissingArgument { index: 2, kind: TokenKind::Register })
    );
    assert_eq!(
        encode("mvi $1"),
        Err(AsmError::MissingArgument { index: 2, kind: TokenKind::NumericLiteral })
    );
    assert_eq!(encode("add $1, $2, $3"), Err(AsmError::ExtraArgument { expected: 2, found: 3 }));
}

#[test]
fn lenient_mode_ignores_surplus_arguments() {
    let cfg = AsmConfig { strict_arguments: false, ..AsmConfig::default() };
    assert_eq!(bits(&cfg, "add $1, $2, $3").unwrap(), bits(&cfg, "add $1, $2").unwrap());
}

#[test]
fn unknown_mnemonic() {
    assert_eq!(encode("jmp $0"), Err(AsmError::UnknownMnemonic { mnemonic: "jmp".into() }));
    assert!(matches!(encode(", $0"), Err(AsmError::UnknownMnemonic { .. })));
}

const LDI: &[WordSpec] = &[&[
    Field::Opcode(9),
    Field::Token(TokenKind::Register, 3),
    Field::Token(TokenKind::LiteralDecimal, 4),
]];

const WIDE_OPCODE: &[WordSpec] = &[&[Field::Opcode(2), Field::Const("00000000000000")]];

#[test]
fn narrow_fields_refuse_to_truncate() {
    let instrs = [InstrDesc { mnemonic: "ldi", opcode: Opcode::new(0b101, 3) }];
    let encodings = [Encoding { opcode: Opcode::new(0b101, 3), words: LDI }];
    let isa = InstructionSet::new(&instrs, &encodings);
    let cfg = AsmConfig::default();
    isa.validate(&cfg).unwrap();
    let enc = Encoder::new(&isa, &cfg);

    assert_eq!(enc.encode_line("ldi $1, 15").unwrap(), vec![0b000000101_001_1111]);
    assert_eq!(
        enc.encode_line("ldi $1, 20"),
        Err(AsmError::FieldWidthOverflow { argument: "20".into(), needed: 5, width: 4 })
    );
}

#[test]
fn opcode_wider_than_its_field() {
    let instrs = [InstrDesc { mnemonic: "op", opcode: Opcode::new(0b100, 3) }];
    let encodings = [Encoding { opcode: Opcode::new(0b100, 3), words: WIDE_OPCODE }];
    let isa = InstructionSet::new(&instrs, &encodings);
    let cfg = AsmConfig::default();
    assert!(matches!(isa.validate(&cfg), Err(AsmError::FieldWidthOverflow { needed: 3, width: 2, .. })));
    let enc = Encoder::new(&isa, &cfg);
    assert!(matches!(enc.encode_line("op"), Err(AsmError::FieldWidthOverflow { .. })));
}
