//! # Output Instructions
//!
//! - PRN: Print register as a decimal number
//! - PRA: Print register as an ASCII character
//!
//! Output is handed to the CPU's output callback rather than written
//! directly, so hosts decide where it goes.

use super::PcUpdate;
use crate::{ExecutionError, MemoryBus, Output, CPU};

/// Executes the PRN instruction.
pub(crate) fn execute_prn<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<PcUpdate, ExecutionError> {
    let reg = cpu.register_operand(1)?;
    cpu.emit(Output::Number(cpu.reg[reg]));

    Ok(PcUpdate::Advance)
}

/// Executes the PRA instruction.
pub(crate) fn execute_pra<M: MemoryBus>(cpu: &mut CPU<M>) -> Result<PcUpdate, ExecutionError> {
    let reg = cpu.register_operand(1)?;
    cpu.emit(Output::Char(cpu.reg[reg]));

    Ok(PcUpdate::Advance)
}
