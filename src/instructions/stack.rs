//! # Stack Operations
//!
//! This module implements stack manipulation instructions:
//! - PUSH: Push register on stack
//! - POP: Pop stack into register
//!
//! The stack pointer lives in R7, starts at 0xF4 and grows toward address 0.
//! SP arithmetic wraps within the 256-byte address space.

use super::PcUpdate;
use crate::{ExecutionError, MemoryBus, CPU};

/// Executes the PUSH instruction.
///
/// Stack operation:
/// 1. Decrement SP
/// 2. Write the register named at PC+1 to memory[SP]
///
/// The register is read before SP moves, so `PUSH R7` saves the old SP.
///
/// Flags affected: None
pub(crate) fn execute_push<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<PcUpdate, ExecutionError> {
    let reg = cpu.register_operand(1)?;
    let value = cpu.reg[reg];

    cpu.push(value);

    Ok(PcUpdate::Advance)
}

/// Executes the POP instruction.
///
/// Stack operation:
/// 1. Read memory[SP]
/// 2. Increment SP
/// 3. Store the value in the register named at PC+1
///
/// `POP R7` therefore leaves SP equal to the popped value.
///
/// Flags affected: None
pub(crate) fn execute_pop<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<PcUpdate, ExecutionError> {
    let reg = cpu.register_operand(1)?;
    let value = cpu.pop();

    cpu.reg[reg] = value;

    Ok(PcUpdate::Advance)
}
