//! # Operand Kinds
//!
//! LS-8 operands are single bytes following the opcode. Each one is either a
//! register index or an immediate value; the kind decides how the
//! disassembler renders it and whether the CPU validates it.

/// How an operand byte is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    /// Index of a register, R0-R7.
    ///
    /// Examples: `PRN R0`, `ADD R0,R1`
    Register,

    /// 8-bit constant.
    ///
    /// Example: `LDI R0,8` (second operand)
    Immediate,
}

impl OperandKind {
    /// Renders an operand byte in assembly syntax.
    ///
    /// # Examples
    ///
    /// ```
    /// use ls8::OperandKind;
    ///
    /// assert_eq!(OperandKind::Register.format(3), "R3");
    /// assert_eq!(OperandKind::Immediate.format(72), "72");
    /// ```
    pub fn format(self, value: u8) -> String {
        match self {
            OperandKind::Register => format!("R{}", value),
            OperandKind::Immediate => value.to_string(),
        }
    }
}
