//! # Load and Store Instructions
//!
//! This module implements register and memory transfers:
//! - LDI: Load immediate into register
//! - LD: Load register from the address held in another register
//! - ST: Store register at the address held in another register

use super::PcUpdate;
use crate::{ExecutionError, MemoryBus, CPU};

/// Executes the LDI (Load Immediate) instruction.
///
/// `LDI reg, value`: reg <- value.
pub(crate) fn execute_ldi<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<PcUpdate, ExecutionError> {
    let reg = cpu.register_operand(1)?;
    cpu.reg[reg] = cpu.operand(2);

    Ok(PcUpdate::Advance)
}

/// Executes the LD instruction.
///
/// `LD regA, regB`: regA <- memory[regB].
pub(crate) fn execute_ld<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<PcUpdate, ExecutionError> {
    let reg_a = cpu.register_operand(1)?;
    let reg_b = cpu.register_operand(2)?;

    cpu.reg[reg_a] = cpu.memory.read(cpu.reg[reg_b]);

    Ok(PcUpdate::Advance)
}

/// Executes the ST instruction.
///
/// `ST regA, regB`: memory[regA] <- regB.
pub(crate) fn execute_st<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<PcUpdate, ExecutionError> {
    let reg_a = cpu.register_operand(1)?;
    let reg_b = cpu.register_operand(2)?;

    cpu.memory.write(cpu.reg[reg_a], cpu.reg[reg_b]);

    Ok(PcUpdate::Advance)
}
