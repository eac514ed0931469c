//! # Jump Instructions
//!
//! This module implements the register-indirect jumps:
//! - JMP: unconditional
//! - JEQ, JNE: on the E flag
//! - JGT, JLT, JLE, JGE: on the G/L/E flags
//!
//! Every jump takes one register operand holding the target address. A jump
//! that is not taken falls through to the generic advance (PC + 2).

use super::PcUpdate;
use crate::cpu::{FLAG_E, FLAG_G, FLAG_L};
use crate::{ExecutionError, MemoryBus, CPU};

/// Condition a jump tests against the flags register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Condition {
    Always,
    Equal,
    NotEqual,
    Greater,
    Less,
    LessOrEqual,
    GreaterOrEqual,
}

impl Condition {
    fn holds(self, fl: u8) -> bool {
        match self {
            Condition::Always => true,
            Condition::Equal => fl & FLAG_E != 0,
            Condition::NotEqual => fl & FLAG_E == 0,
            Condition::Greater => fl & FLAG_G != 0,
            Condition::Less => fl & FLAG_L != 0,
            Condition::LessOrEqual => fl & (FLAG_L | FLAG_E) != 0,
            Condition::GreaterOrEqual => fl & (FLAG_G | FLAG_E) != 0,
        }
    }
}

/// Executes a jump.
///
/// If `condition` holds, PC is set to the value of the register named at
/// `PC+1` and the handler reports `Jumped`. Otherwise the run loop advances
/// past the two-byte instruction.
///
/// Flags affected: None
pub(crate) fn execute_jump<M: MemoryBus>(
    cpu: &mut CPU<M>,
    condition: Condition,
) -> Result<PcUpdate, ExecutionError> {
    let reg = cpu.register_operand(1)?;

    if condition.holds(cpu.fl) {
        cpu.pc = cpu.reg[reg];
        Ok(PcUpdate::Jumped)
    } else {
        Ok(PcUpdate::Advance)
    }
}
