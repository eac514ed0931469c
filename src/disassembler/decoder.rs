//! Instruction decoder for the LS-8 disassembler

use crate::disassembler::DisassembledInstruction;
use crate::opcodes::OPCODE_TABLE;

/// Decode a single instruction from a byte slice
///
/// # Arguments
///
/// * `bytes` - The byte slice starting at the instruction to decode
/// * `address` - The memory address of this instruction
///
/// # Returns
///
/// `None` if the first byte is not an opcode or the slice is too short to
/// hold the instruction's operands.
pub fn decode_instruction(bytes: &[u8], address: u8) -> Option<DisassembledInstruction> {
    let (&opcode, rest) = bytes.split_first()?;
    let metadata = OPCODE_TABLE[opcode as usize]?;

    let operand_count = metadata.operands.len();
    if rest.len() < operand_count {
        return None;
    }

    Some(DisassembledInstruction {
        address,
        opcode,
        mnemonic: metadata.mnemonic,
        operand_kinds: metadata.operands,
        operand_bytes: rest[..operand_count].to_vec(),
        size_bytes: metadata.size_bytes,
    })
}
