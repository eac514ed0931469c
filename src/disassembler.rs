//! LS-8 Disassembler Module
//!
//! Converts machine code into human-readable assembly, e.g. `LDI R0,8`.

pub mod decoder;
pub mod formatter;

pub use decoder::decode_instruction;
pub use formatter::format_instruction;

use crate::operands::OperandKind;

/// A single disassembled instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisassembledInstruction {
    /// Memory address where this instruction starts
    pub address: u8,

    /// The opcode byte value
    pub opcode: u8,

    /// Instruction mnemonic (e.g., "LDI", "PRN"), or ".byte" for data
    pub mnemonic: &'static str,

    /// How each operand byte is interpreted
    pub operand_kinds: &'static [OperandKind],

    /// Operand bytes (0-2)
    pub operand_bytes: Vec<u8>,

    /// Total size in bytes (opcode + operands)
    pub size_bytes: u8,
}

impl DisassembledInstruction {
    /// A one-byte `.byte` entry for a value that is not an instruction.
    pub fn data(address: u8, value: u8) -> Self {
        Self {
            address,
            opcode: value,
            mnemonic: ".byte",
            operand_kinds: &[],
            operand_bytes: Vec::new(),
            size_bytes: 1,
        }
    }
}

/// Disassemble a byte slice into a vector of instructions
///
/// `start_address` is the address of `bytes[0]`; addresses wrap at 256.
/// Bytes that do not start a complete instruction become `.byte` entries.
///
/// # Examples
///
/// ```
/// use ls8::{disassemble, format_instruction};
///
/// let listing: Vec<String> = disassemble(&[0b10000010, 0, 8, 0b01000111, 0, 0b00000001], 0)
///     .iter()
///     .map(format_instruction)
///     .collect();
///
/// assert_eq!(listing, vec!["LDI R0,8", "PRN R0", "HLT"]);
/// ```
pub fn disassemble(bytes: &[u8], start_address: u8) -> Vec<DisassembledInstruction> {
    let mut instructions = Vec::new();
    let mut offset = 0;
    let mut address = start_address;

    while offset < bytes.len() {
        let instr = decode_instruction(&bytes[offset..], address)
            .unwrap_or_else(|| DisassembledInstruction::data(address, bytes[offset]));

        offset += instr.size_bytes as usize;
        address = address.wrapping_add(instr.size_bytes);
        instructions.push(instr);
    }

    instructions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disassemble_empty() {
        assert!(disassemble(&[], 0).is_empty());
    }

    #[test]
    fn test_unknown_byte_becomes_data() {
        let instructions = disassemble(&[0x00, 0b0000_0001], 0x10);

        assert_eq!(instructions.len(), 2);
        assert_eq!(instructions[0], DisassembledInstruction::data(0x10, 0x00));
        assert_eq!(instructions[1].mnemonic, "HLT");
        assert_eq!(instructions[1].address, 0x11);
    }

    #[test]
    fn test_truncated_instruction_becomes_data() {
        // LDI missing its immediate
        let instructions = disassemble(&[0b1000_0010, 0], 0);

        assert_eq!(instructions[0].mnemonic, ".byte");
        assert_eq!(instructions[1].mnemonic, ".byte");
    }
}
