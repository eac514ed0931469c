//! # Opcode Metadata Table
//!
//! This module contains the 256-entry opcode table that serves as the single
//! source of truth for LS-8 instruction information.
//!
//! An LS-8 opcode is laid out as `AABCDDDD`:
//!
//! - `AA`: number of operand bytes that follow (0-2)
//! - `B`: instruction is handled by the ALU
//! - `C`: instruction may set the PC itself
//! - `DDDD`: instruction identifier
//!
//! Bytes that do not name an instruction map to `None`; fetching one of them
//! faults the CPU.

use crate::operands::OperandKind;

/// Every instruction the LS-8 implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// Halt the CPU.
    Hlt,
    /// Load an immediate into a register.
    Ldi,
    /// Load a register from the address held in another register.
    Ld,
    /// Store a register to the address held in another register.
    St,
    /// Print a register as a decimal number.
    Prn,
    /// Print a register as an ASCII character.
    Pra,
    /// Push a register onto the stack.
    Push,
    /// Pop the top of the stack into a register.
    Pop,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Inc,
    Dec,
    /// Compare two registers and set the flags.
    Cmp,
    And,
    Or,
    Xor,
    Not,
    Shl,
    Shr,
    /// Call the subroutine at the address held in a register.
    Call,
    /// Return from a subroutine.
    Ret,
    Jmp,
    Jeq,
    Jne,
    Jgt,
    Jlt,
    Jle,
    Jge,
}

const NONE: &[OperandKind] = &[];
const REG: &[OperandKind] = &[OperandKind::Register];
const REG_REG: &[OperandKind] = &[OperandKind::Register, OperandKind::Register];
const REG_IMM: &[OperandKind] = &[OperandKind::Register, OperandKind::Immediate];

impl Instruction {
    /// All instructions, in opcode order.
    pub const ALL: [Instruction; 31] = [
        Instruction::Hlt,
        Instruction::Ret,
        Instruction::Push,
        Instruction::Pop,
        Instruction::Prn,
        Instruction::Pra,
        Instruction::Call,
        Instruction::Jmp,
        Instruction::Jeq,
        Instruction::Jne,
        Instruction::Jgt,
        Instruction::Jlt,
        Instruction::Jle,
        Instruction::Jge,
        Instruction::Inc,
        Instruction::Dec,
        Instruction::Not,
        Instruction::Ldi,
        Instruction::Ld,
        Instruction::St,
        Instruction::Add,
        Instruction::Sub,
        Instruction::Mul,
        Instruction::Div,
        Instruction::Mod,
        Instruction::Cmp,
        Instruction::And,
        Instruction::Or,
        Instruction::Xor,
        Instruction::Shl,
        Instruction::Shr,
    ];

    /// The opcode byte for this instruction.
    ///
    /// # Examples
    ///
    /// ```
    /// use ls8::Instruction;
    ///
    /// assert_eq!(Instruction::Ldi.opcode(), 0b10000010);
    /// assert_eq!(Instruction::Hlt.opcode(), 0b00000001);
    /// ```
    pub const fn opcode(self) -> u8 {
        match self {
            Instruction::Hlt => 0b0000_0001,
            Instruction::Ret => 0b0001_0001,
            Instruction::Push => 0b0100_0101,
            Instruction::Pop => 0b0100_0110,
            Instruction::Prn => 0b0100_0111,
            Instruction::Pra => 0b0100_1000,
            Instruction::Call => 0b0101_0000,
            Instruction::Jmp => 0b0101_0100,
            Instruction::Jeq => 0b0101_0101,
            Instruction::Jne => 0b0101_0110,
            Instruction::Jgt => 0b0101_0111,
            Instruction::Jlt => 0b0101_1000,
            Instruction::Jle => 0b0101_1001,
            Instruction::Jge => 0b0101_1010,
            Instruction::Inc => 0b0110_0101,
            Instruction::Dec => 0b0110_0110,
            Instruction::Not => 0b0110_1001,
            Instruction::Ldi => 0b1000_0010,
            Instruction::Ld => 0b1000_0011,
            Instruction::St => 0b1000_0100,
            Instruction::Add => 0b1010_0000,
            Instruction::Sub => 0b1010_0001,
            Instruction::Mul => 0b1010_0010,
            Instruction::Div => 0b1010_0011,
            Instruction::Mod => 0b1010_0100,
            Instruction::Cmp => 0b1010_0111,
            Instruction::And => 0b1010_1000,
            Instruction::Or => 0b1010_1010,
            Instruction::Xor => 0b1010_1011,
            Instruction::Shl => 0b1010_1100,
            Instruction::Shr => 0b1010_1101,
        }
    }

    /// Assembly mnemonic.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Instruction::Hlt => "HLT",
            Instruction::Ret => "RET",
            Instruction::Push => "PUSH",
            Instruction::Pop => "POP",
            Instruction::Prn => "PRN",
            Instruction::Pra => "PRA",
            Instruction::Call => "CALL",
            Instruction::Jmp => "JMP",
            Instruction::Jeq => "JEQ",
            Instruction::Jne => "JNE",
            Instruction::Jgt => "JGT",
            Instruction::Jlt => "JLT",
            Instruction::Jle => "JLE",
            Instruction::Jge => "JGE",
            Instruction::Inc => "INC",
            Instruction::Dec => "DEC",
            Instruction::Not => "NOT",
            Instruction::Ldi => "LDI",
            Instruction::Ld => "LD",
            Instruction::St => "ST",
            Instruction::Add => "ADD",
            Instruction::Sub => "SUB",
            Instruction::Mul => "MUL",
            Instruction::Div => "DIV",
            Instruction::Mod => "MOD",
            Instruction::Cmp => "CMP",
            Instruction::And => "AND",
            Instruction::Or => "OR",
            Instruction::Xor => "XOR",
            Instruction::Shl => "SHL",
            Instruction::Shr => "SHR",
        }
    }

    /// Kinds of the operand bytes that follow the opcode.
    pub const fn operands(self) -> &'static [OperandKind] {
        match self {
            Instruction::Hlt | Instruction::Ret => NONE,
            Instruction::Ldi => REG_IMM,
            Instruction::Push
            | Instruction::Pop
            | Instruction::Prn
            | Instruction::Pra
            | Instruction::Call
            | Instruction::Jmp
            | Instruction::Jeq
            | Instruction::Jne
            | Instruction::Jgt
            | Instruction::Jlt
            | Instruction::Jle
            | Instruction::Jge
            | Instruction::Inc
            | Instruction::Dec
            | Instruction::Not => REG,
            Instruction::Ld
            | Instruction::St
            | Instruction::Add
            | Instruction::Sub
            | Instruction::Mul
            | Instruction::Div
            | Instruction::Mod
            | Instruction::Cmp
            | Instruction::And
            | Instruction::Or
            | Instruction::Xor
            | Instruction::Shl
            | Instruction::Shr => REG_REG,
        }
    }

    /// Looks up the instruction an opcode byte names.
    ///
    /// # Examples
    ///
    /// ```
    /// use ls8::Instruction;
    ///
    /// assert_eq!(Instruction::decode(0b10100010), Some(Instruction::Mul));
    /// assert_eq!(Instruction::decode(0x00), None);
    /// ```
    pub fn decode(opcode: u8) -> Option<Instruction> {
        OPCODE_TABLE[opcode as usize].map(|metadata| metadata.instruction)
    }
}

/// Number of operand bytes encoded in the top two bits of an opcode.
pub const fn operand_count(opcode: u8) -> u8 {
    opcode >> 6
}

/// Whether bit 5 marks the opcode as an ALU operation.
pub const fn is_alu(opcode: u8) -> bool {
    opcode & 0b0010_0000 != 0
}

/// Whether bit 4 marks the opcode as one that may set the PC itself.
pub const fn sets_pc(opcode: u8) -> bool {
    opcode & 0b0001_0000 != 0
}

/// Metadata for a single LS-8 opcode.
///
/// # Fields
///
/// - `instruction`: The decoded instruction
/// - `mnemonic`: Assembly name (e.g., "LDI", "PRN")
/// - `operands`: Kinds of the operand bytes
/// - `size_bytes`: Total instruction size including opcode (1-3 bytes)
/// - `alu`: Handled by the arithmetic unit
/// - `sets_pc`: May overwrite the PC instead of falling through
///
/// # Examples
///
/// ```
/// use ls8::{OperandKind, OPCODE_TABLE};
///
/// let ldi = OPCODE_TABLE[0b10000010].unwrap();
/// assert_eq!(ldi.mnemonic, "LDI");
/// assert_eq!(ldi.operands, &[OperandKind::Register, OperandKind::Immediate]);
/// assert_eq!(ldi.size_bytes, 3);
/// assert!(!ldi.sets_pc);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeMetadata {
    /// The instruction this opcode names.
    pub instruction: Instruction,

    /// Instruction mnemonic.
    pub mnemonic: &'static str,

    /// Operand kinds, one per operand byte.
    pub operands: &'static [OperandKind],

    /// Total instruction size in bytes (opcode + operands).
    pub size_bytes: u8,

    /// Whether the ALU executes this instruction.
    pub alu: bool,

    /// Whether the instruction may set the PC itself.
    ///
    /// Conditional jumps that are not taken still fall through to the
    /// generic advance.
    pub sets_pc: bool,
}

/// Complete 256-entry opcode table indexed by opcode byte value.
///
/// # Examples
///
/// ```
/// use ls8::OPCODE_TABLE;
///
/// let hlt = OPCODE_TABLE[0x01].unwrap();
/// assert_eq!(hlt.mnemonic, "HLT");
/// assert_eq!(hlt.size_bytes, 1);
///
/// // 0x00 is not an instruction
/// assert!(OPCODE_TABLE[0x00].is_none());
/// ```
pub const OPCODE_TABLE: [Option<OpcodeMetadata>; 256] = build_opcode_table();

const fn build_opcode_table() -> [Option<OpcodeMetadata>; 256] {
    let mut table: [Option<OpcodeMetadata>; 256] = [None; 256];

    let mut i = 0;
    while i < Instruction::ALL.len() {
        let instruction = Instruction::ALL[i];
        let opcode = instruction.opcode();

        table[opcode as usize] = Some(OpcodeMetadata {
            instruction,
            mnemonic: instruction.mnemonic(),
            operands: instruction.operands(),
            size_bytes: operand_count(opcode) + 1,
            alu: is_alu(opcode),
            sets_pc: sets_pc(opcode),
        });

        i += 1;
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operand_count_matches_operand_kinds() {
        for instruction in Instruction::ALL {
            assert_eq!(
                operand_count(instruction.opcode()) as usize,
                instruction.operands().len(),
                "{} operand count disagrees with its opcode",
                instruction.mnemonic()
            );
        }
    }

    #[test]
    fn test_opcodes_are_unique() {
        let registered = OPCODE_TABLE.iter().filter(|m| m.is_some()).count();
        assert_eq!(registered, Instruction::ALL.len());
    }

    #[test]
    fn test_decode_round_trips_through_table() {
        for instruction in Instruction::ALL {
            assert_eq!(Instruction::decode(instruction.opcode()), Some(instruction));
        }
    }
}
