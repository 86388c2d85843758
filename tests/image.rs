use minasm::image::render_listing;
use minasm::{AsmConfig, Assembler, InstructionSet};
use pretty_assertions::assert_eq;

#[test]
fn listing_disassembles_text_and_dumps_data() {
    let isa = InstructionSet::standard();
    let cfg = AsmConfig { memory_depth: 8, ..AsmConfig::default() };
    let asm = Assembler::new(&isa, cfg).unwrap();
    let img = asm.assemble_str(".data\nv: 0x2A\n.text\nmvi $4, v\nadd $1, $0\n").unwrap();

    let text = render_listing(&img.listing(&isa, &cfg));
    assert_eq!(
        text,
        "\
0x0000  0000000001100000  mvi $4, 0x7
0x0001  0000000000000111
0x0002  0000000010001000  add $1, $0
0x0007  0000000000101010  .word 0x2a
"
    );
}

#[test]
fn listing_addresses_follow_the_separator() {
    let isa = InstructionSet::standard();
    let cfg = AsmConfig { memory_depth: 8, address_separator: 2, ..AsmConfig::default() };
    let asm = Assembler::new(&isa, cfg).unwrap();
    let img = asm.assemble_str("mv $0, $1\nmv $1, $0\n").unwrap();
    let rows = img.listing(&isa, &cfg);
    assert_eq!(rows.iter().map(|r| r.address).collect::<Vec<_>>(), vec![0, 2]);
}

#[test]
fn render_emits_every_address() {
    let isa = InstructionSet::standard();
    let asm = Assembler::new(&isa, AsmConfig::default()).unwrap();
    let img = asm.assemble_str("mv $0, $1").unwrap();
    let bits = img.to_bit_strings();
    assert_eq!(bits.len(), 256);
    assert_eq!(bits[0], "0000000000000001");
    assert!(bits[1..].iter().all(|b| b == "0000000000000000"));
    assert_eq!(img.render().lines().count(), 256);
}

#[test]
fn image_serializes_to_json() {
    let isa = InstructionSet::standard();
    let cfg = AsmConfig { memory_depth: 2, ..AsmConfig::default() };
    let asm = Assembler::new(&isa, cfg).unwrap();
    let img = asm.assemble_str("mv $0, $1").unwrap();
    let json = serde_json::to_value(&img).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "width": 16, "words": [1, 0], "text_end": 1, "data_start": 2 })
    );
}
