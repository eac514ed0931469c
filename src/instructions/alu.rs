//! # ALU (Arithmetic Logic Unit) Instructions
//!
//! This module implements the operations whose opcodes carry the ALU bit:
//! - ADD, SUB, MUL, DIV, MOD: arithmetic
//! - INC, DEC: increment/decrement
//! - AND, OR, XOR, NOT: bitwise logic
//! - SHL, SHR: shifts
//! - CMP: compare and set flags
//!
//! All results wrap modulo 256. The operation set is a closed enum, so the
//! dispatcher cannot hand the ALU an operation it does not implement.

use super::PcUpdate;
use crate::cpu::{FLAG_E, FLAG_G, FLAG_L};
use crate::{ExecutionError, MemoryBus, CPU};

/// Operations the ALU performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AluOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Inc,
    Dec,
    Cmp,
    And,
    Or,
    Xor,
    Not,
    Shl,
    Shr,
}

impl AluOp {
    /// Unary operations take a single register operand.
    fn is_unary(self) -> bool {
        matches!(self, AluOp::Inc | AluOp::Dec | AluOp::Not)
    }
}

/// Executes an ALU instruction.
///
/// Reads `regA` from `PC+1` and, for binary operations, `regB` from `PC+2`.
/// The result is written back to `regA`; CMP writes the flags register
/// instead.
///
/// Flags affected: only by CMP, which sets exactly one of E, G, L.
///
/// # Errors
///
/// - `InvalidRegister` if an operand is not R0-R7
/// - `DivisionByZero` for DIV or MOD with `regB == 0`
pub(crate) fn execute_alu<M: MemoryBus>(
    cpu: &mut CPU<M>,
    op: AluOp,
) -> Result<PcUpdate, ExecutionError> {
    let reg_a = cpu.register_operand(1)?;
    let a = cpu.reg[reg_a];

    let b = if op.is_unary() {
        0
    } else {
        let reg_b = cpu.register_operand(2)?;
        cpu.reg[reg_b]
    };

    let address = cpu.pc;
    let division_by_zero = || ExecutionError::DivisionByZero { address };

    let result = match op {
        AluOp::Add => a.wrapping_add(b),
        AluOp::Sub => a.wrapping_sub(b),
        AluOp::Mul => a.wrapping_mul(b),
        AluOp::Div => a.checked_div(b).ok_or_else(division_by_zero)?,
        AluOp::Mod => a.checked_rem(b).ok_or_else(division_by_zero)?,
        AluOp::Inc => a.wrapping_add(1),
        AluOp::Dec => a.wrapping_sub(1),
        AluOp::And => a & b,
        AluOp::Or => a | b,
        AluOp::Xor => a ^ b,
        AluOp::Not => !a,
        // Shifting by 8 or more clears the register
        AluOp::Shl => a.checked_shl(u32::from(b)).unwrap_or(0),
        AluOp::Shr => a.checked_shr(u32::from(b)).unwrap_or(0),
        AluOp::Cmp => {
            cpu.fl = compare(a, b);
            return Ok(PcUpdate::Advance);
        }
    };

    cpu.reg[reg_a] = result;

    Ok(PcUpdate::Advance)
}

/// Flags byte for comparing `a` with `b`. Exactly one bit is set.
fn compare(a: u8, b: u8) -> u8 {
    match a.cmp(&b) {
        std::cmp::Ordering::Equal => FLAG_E,
        std::cmp::Ordering::Greater => FLAG_G,
        std::cmp::Ordering::Less => FLAG_L,
    }
}
