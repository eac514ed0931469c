//! # LS-8 Emulator Core
//!
//! An emulator for the LS-8, a small 8-bit computer with eight registers,
//! 256 bytes of memory and a compact instruction set.
//!
//! This crate provides the CPU state, a trait-based memory bus, a table-driven
//! opcode metadata system, the instruction handlers and the run loop, plus the
//! loader for the textual program image format and a disassembler.
//!
//! ## Quick Start
//!
//! ```rust
//! use ls8::{Ram, CPU};
//!
//! // LDI R0,8 / LDI R1,9 / MUL R0,R1 / PRN R0 / HLT
//! let program = [
//!     0b10000010, 0, 8,
//!     0b10000010, 1, 9,
//!     0b10100010, 0, 1,
//!     0b01000111, 0,
//!     0b00000001,
//! ];
//!
//! let mut cpu = CPU::new(Ram::new());
//! cpu.load(&program).unwrap();
//! cpu.set_output_callback(|_| {});
//! cpu.run().unwrap();
//!
//! assert!(cpu.halted());
//! assert_eq!(cpu.register(0), 72);
//! ```
//!
//! ## Architecture
//!
//! - **Modularity**: CPU state is separated from memory implementation via the `MemoryBus` trait
//! - **WebAssembly Portability**: no OS dependencies in the core, output goes through a callback
//! - **Table-Driven Design**: all opcode metadata lives in a single 256-entry table
//! - **Explicit control flow**: handlers report whether they set PC themselves
//!
//! ## Modules
//!
//! - `cpu` - CPU state and the fetch-decode-execute loop
//! - `memory` - MemoryBus trait and the 256-byte `Ram`
//! - `opcodes` - Opcode metadata table and instruction decoding
//! - `operands` - Operand kinds (register vs. immediate)
//! - `loader` - Program image parsing
//! - `disassembler` - Machine code to mnemonic listing

pub mod cpu;
pub mod disassembler;
pub mod loader;
pub mod memory;
pub mod opcodes;
pub mod operands;

// Internal instruction implementations (not part of public API)
mod instructions;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export public API
pub use cpu::{Output, RunState, CPU, FLAG_E, FLAG_G, FLAG_L, SP, STACK_START};
pub use disassembler::{disassemble, format_instruction, DisassembledInstruction};
pub use loader::{load_file, parse_program, LoadError};
pub use memory::{MemoryBus, Ram, MEMORY_SIZE};
pub use opcodes::{Instruction, OpcodeMetadata, OPCODE_TABLE};
pub use operands::OperandKind;

/// Errors that stop the run loop.
///
/// Every variant is fatal: the CPU enters the faulted state and no further
/// instruction is fetched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutionError {
    /// The byte at `address` has no registered handler.
    #[error("unknown instruction 0b{opcode:08b} at address {address}")]
    UnknownOpcode {
        /// The offending byte
        opcode: u8,
        /// Address it was fetched from
        address: u8,
    },

    /// A register operand was outside R0-R7.
    #[error("invalid register {register} in instruction at address {address}")]
    InvalidRegister {
        /// The operand byte
        register: u8,
        /// Address of the instruction's opcode
        address: u8,
    },

    /// DIV or MOD with a zero divisor.
    #[error("division by zero at address {address}")]
    DivisionByZero {
        /// Address of the instruction's opcode
        address: u8,
    },
}

impl ExecutionError {
    /// Address of the instruction that faulted.
    pub fn address(&self) -> u8 {
        match self {
            ExecutionError::UnknownOpcode { address, .. }
            | ExecutionError::InvalidRegister { address, .. }
            | ExecutionError::DivisionByZero { address } => *address,
        }
    }
}
