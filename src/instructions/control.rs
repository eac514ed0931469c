//! # Control Flow Instructions
//!
//! This module implements:
//! - HLT: Halt the CPU
//! - CALL: Call subroutine
//! - RET: Return from subroutine
//!
//! CALL pushes the address of the instruction after it (PC + 2) and jumps to
//! the address held in a register. RET pops that address back into the PC.

use super::PcUpdate;
use crate::{ExecutionError, MemoryBus, CPU};

/// Executes the HLT instruction.
///
/// Marks the CPU halted; the run loop stops fetching after this step.
pub(crate) fn execute_hlt<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<PcUpdate, ExecutionError> {
    cpu.halted = true;
    Ok(PcUpdate::Advance)
}

/// Executes the CALL instruction.
///
/// Stack operation:
/// 1. Decrement SP
/// 2. Write the return address (PC + 2) to memory[SP]
/// 3. Set PC to the value of the register named at PC+1
///
/// The target is read before SP moves, so `CALL R7` jumps to the old SP.
///
/// Flags affected: None
pub(crate) fn execute_call<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<PcUpdate, ExecutionError> {
    let reg = cpu.register_operand(1)?;
    let target = cpu.reg[reg];
    let return_address = cpu.pc.wrapping_add(2);

    cpu.push(return_address);
    cpu.pc = target;

    Ok(PcUpdate::Jumped)
}

/// Executes the RET instruction.
///
/// Pops the return address pushed by CALL into the PC.
///
/// Flags affected: None
pub(crate) fn execute_ret<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<PcUpdate, ExecutionError> {
    cpu.pc = cpu.pop();
    Ok(PcUpdate::Jumped)
}
