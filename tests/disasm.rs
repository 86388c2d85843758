use minasm::disasm::decode;
use minasm::{AsmConfig, Encoder, InstructionSet};

#[test]
fn disasm_mv_mvi() {
    let isa = InstructionSet::standard();
    let cfg = AsmConfig::default();

    // mv $2, $3
    let d = decode(&isa, &cfg, &[0b0000000000_010_011]).unwrap();
    assert_eq!(d.to_string(), "mv $2, $3");

    // mvi $0, 0x2a
    let d2 = decode(&isa, &cfg, &[0b0000000001_000_000, 0x2A]).unwrap();
    assert_eq!(d2.to_string(), "mvi $0, 0x2a");
    assert_eq!(d2.len, 2);
}

#[test]
fn disassembly_reassembles_to_the_same_words() {
    let isa = InstructionSet::standard();
    let cfg = AsmConfig::default();
    let enc = Encoder::new(&isa, &cfg);
    for line in ["mv $0, $1", "mvi $4, 0x1", "add $7, $6", "sub $5, $2", "mvi $2, 65535"] {
        let words = enc.encode_line(line).unwrap();
        let text = decode(&isa, &cfg, &words).unwrap().to_string();
        assert_eq!(enc.encode_line(&text).unwrap(), words, "{line} -> {text}");
    }
}

#[test]
fn register_fields_beyond_the_count_do_not_decode() {
    let isa = InstructionSet::standard();
    let cfg = AsmConfig { num_registers: 4, ..AsmConfig::default() };
    // add $5, $0
    assert!(decode(&isa, &cfg, &[0b0000000010_101_000]).is_none());
}

#[test]
fn unknown_opcode_bits_do_not_decode() {
    let isa = InstructionSet::standard();
    let cfg = AsmConfig::default();
    assert!(decode(&isa, &cfg, &[0b1000000000_000_000]).is_none());
}
