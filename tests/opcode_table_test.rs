//! Tests for the opcode metadata table.
//!
//! The table is the single source of truth for decoding, so these checks
//! tie every entry back to the `AABCDDDD` encoding.

use ls8::opcodes::{is_alu, operand_count, sets_pc};
use ls8::{Instruction, OperandKind, OPCODE_TABLE};

#[test]
fn test_table_has_one_entry_per_instruction() {
    let defined = OPCODE_TABLE.iter().filter(|entry| entry.is_some()).count();
    assert_eq!(defined, Instruction::ALL.len());
}

#[test]
fn test_entries_match_their_index() {
    for (index, entry) in OPCODE_TABLE.iter().enumerate() {
        if let Some(metadata) = entry {
            assert_eq!(metadata.instruction.opcode() as usize, index);
            assert_eq!(metadata.mnemonic, metadata.instruction.mnemonic());
        }
    }
}

#[test]
fn test_size_follows_operand_bits() {
    for metadata in OPCODE_TABLE.iter().flatten() {
        let opcode = metadata.instruction.opcode();
        assert_eq!(
            metadata.size_bytes,
            operand_count(opcode) + 1,
            "{}",
            metadata.mnemonic
        );
        assert_eq!(metadata.operands.len(), operand_count(opcode) as usize);
    }
}

#[test]
fn test_flag_bits_follow_encoding() {
    for metadata in OPCODE_TABLE.iter().flatten() {
        let opcode = metadata.instruction.opcode();
        assert_eq!(metadata.alu, is_alu(opcode), "{}", metadata.mnemonic);
        assert_eq!(metadata.sets_pc, sets_pc(opcode), "{}", metadata.mnemonic);
    }
}

#[test]
fn test_pc_setting_instructions() {
    let pc_setters: Vec<&str> = OPCODE_TABLE
        .iter()
        .flatten()
        .filter(|m| m.sets_pc)
        .map(|m| m.mnemonic)
        .collect();

    assert_eq!(
        pc_setters,
        vec!["RET", "CALL", "JMP", "JEQ", "JNE", "JGT", "JLT", "JLE", "JGE"]
    );
}

#[test]
fn test_core_opcode_values() {
    let expected = [
        (0b0000_0001, "HLT"),
        (0b1000_0010, "LDI"),
        (0b0100_0111, "PRN"),
        (0b1010_0010, "MUL"),
        (0b1010_0000, "ADD"),
        (0b1010_0111, "CMP"),
        (0b0100_0101, "PUSH"),
        (0b0100_0110, "POP"),
        (0b0101_0000, "CALL"),
        (0b0001_0001, "RET"),
        (0b0101_0100, "JMP"),
        (0b0101_0101, "JEQ"),
        (0b0101_0110, "JNE"),
    ];

    for (opcode, mnemonic) in expected {
        let metadata = OPCODE_TABLE[opcode as usize].unwrap();
        assert_eq!(metadata.mnemonic, mnemonic);
    }
}

#[test]
fn test_ldi_operands() {
    let ldi = OPCODE_TABLE[0b1000_0010].unwrap();
    assert_eq!(ldi.operands, &[OperandKind::Register, OperandKind::Immediate]);
}

#[test]
fn test_zero_byte_is_not_an_instruction() {
    assert!(OPCODE_TABLE[0].is_none());
    assert_eq!(Instruction::decode(0), None);
}

#[test]
fn test_decode_round_trips_every_instruction() {
    for instruction in Instruction::ALL {
        assert_eq!(Instruction::decode(instruction.opcode()), Some(instruction));
    }
}
