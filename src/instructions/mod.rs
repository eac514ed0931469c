//! # LS-8 Instruction Implementations
//!
//! This module contains the implementations of all LS-8 instructions, organized by category.
//! Each instruction is implemented as a standalone function that takes a mutable reference
//! to the CPU and reads its operands from memory at `PC+1` and `PC+2`.
//!
//! Every handler returns a [`PcUpdate`] telling the run loop whether to apply
//! the generic `size_bytes` advance or leave the PC where the handler put it.
//!
//! ## Categories
//!
//! - **alu**: Arithmetic, logic, shift and compare (ADD, SUB, MUL, DIV, MOD, INC, DEC, CMP, AND, OR, XOR, NOT, SHL, SHR)
//! - **branches**: Jumps (JMP, JEQ, JNE, JGT, JLT, JLE, JGE)
//! - **control**: HLT and subroutine calls (CALL, RET)
//! - **load_store**: Register/memory transfers (LDI, LD, ST)
//! - **stack**: Stack operations (PUSH, POP)
//! - **io**: Output (PRN, PRA)

pub mod alu;
pub mod branches;
pub mod control;
pub mod io;
pub mod load_store;
pub mod stack;

use crate::{ExecutionError, Instruction, MemoryBus, CPU};
use alu::AluOp;
use branches::Condition;

/// How the run loop should move the PC after a handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PcUpdate {
    /// Advance past the instruction and its operands.
    Advance,
    /// The handler already set the PC.
    Jumped,
}

/// Routes a decoded instruction to its handler.
pub(crate) fn dispatch<M: MemoryBus>(
    cpu: &mut CPU<M>,
    instruction: Instruction,
) -> Result<PcUpdate, ExecutionError> {
    match instruction {
        Instruction::Hlt => control::execute_hlt(cpu),
        Instruction::Call => control::execute_call(cpu),
        Instruction::Ret => control::execute_ret(cpu),

        Instruction::Ldi => load_store::execute_ldi(cpu),
        Instruction::Ld => load_store::execute_ld(cpu),
        Instruction::St => load_store::execute_st(cpu),

        Instruction::Push => stack::execute_push(cpu),
        Instruction::Pop => stack::execute_pop(cpu),

        Instruction::Prn => io::execute_prn(cpu),
        Instruction::Pra => io::execute_pra(cpu),

        Instruction::Add => alu::execute_alu(cpu, AluOp::Add),
        Instruction::Sub => alu::execute_alu(cpu, AluOp::Sub),
        Instruction::Mul => alu::execute_alu(cpu, AluOp::Mul),
        Instruction::Div => alu::execute_alu(cpu, AluOp::Div),
        Instruction::Mod => alu::execute_alu(cpu, AluOp::Mod),
        Instruction::Inc => alu::execute_alu(cpu, AluOp::Inc),
        Instruction::Dec => alu::execute_alu(cpu, AluOp::Dec),
        Instruction::Cmp => alu::execute_alu(cpu, AluOp::Cmp),
        Instruction::And => alu::execute_alu(cpu, AluOp::And),
        Instruction::Or => alu::execute_alu(cpu, AluOp::Or),
        Instruction::Xor => alu::execute_alu(cpu, AluOp::Xor),
        Instruction::Not => alu::execute_alu(cpu, AluOp::Not),
        Instruction::Shl => alu::execute_alu(cpu, AluOp::Shl),
        Instruction::Shr => alu::execute_alu(cpu, AluOp::Shr),

        Instruction::Jmp => branches::execute_jump(cpu, Condition::Always),
        Instruction::Jeq => branches::execute_jump(cpu, Condition::Equal),
        Instruction::Jne => branches::execute_jump(cpu, Condition::NotEqual),
        Instruction::Jgt => branches::execute_jump(cpu, Condition::Greater),
        Instruction::Jlt => branches::execute_jump(cpu, Condition::Less),
        Instruction::Jle => branches::execute_jump(cpu, Condition::LessOrEqual),
        Instruction::Jge => branches::execute_jump(cpu, Condition::GreaterOrEqual),
    }
}
