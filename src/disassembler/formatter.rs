//! Formatting functions for disassembled instructions

use crate::disassembler::DisassembledInstruction;

/// Format a single instruction as assembly text
///
/// Operands are comma separated with no space: `LDI R0,8`, `MUL R0,R1`.
/// Data bytes render as `.byte 0bXXXXXXXX`.
///
/// # Examples
///
/// ```
/// use ls8::disassembler::{decode_instruction, format_instruction};
///
/// let instr = decode_instruction(&[0b10100010, 0, 1], 0).unwrap();
/// assert_eq!(format_instruction(&instr), "MUL R0,R1");
/// ```
pub fn format_instruction(instr: &DisassembledInstruction) -> String {
    if instr.mnemonic == ".byte" {
        return format!(".byte 0b{:08b}", instr.opcode);
    }

    let operands: Vec<String> = instr
        .operand_kinds
        .iter()
        .zip(&instr.operand_bytes)
        .map(|(kind, &value)| kind.format(value))
        .collect();

    if operands.is_empty() {
        instr.mnemonic.to_string()
    } else {
        format!("{} {}", instr.mnemonic, operands.join(","))
    }
}

/// Format a listing line: address, raw bytes, then the instruction.
///
/// ```
/// use ls8::disassembler::{decode_instruction, formatter::format_listing_line};
///
/// let instr = decode_instruction(&[0b01000111, 0], 0x0B).unwrap();
/// assert_eq!(format_listing_line(&instr), "0B: 47 00     PRN R0");
/// ```
pub fn format_listing_line(instr: &DisassembledInstruction) -> String {
    let mut raw = format!("{:02X}", instr.opcode);
    for byte in &instr.operand_bytes {
        raw.push_str(&format!(" {:02X}", byte));
    }

    format!("{:02X}: {:<8}  {}", instr.address, raw, format_instruction(instr))
}
