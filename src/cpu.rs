//! # CPU State and Execution
//!
//! This module contains the CPU struct representing the LS-8 processor state
//! and the fetch-decode-execute loop.
//!
//! ## CPU State
//!
//! The CPU maintains:
//! - **Registers**: R0-R7, with R7 reserved as the stack pointer
//! - **Program counter** (PC): 8-bit address of the next opcode
//! - **Flags** (FL): `00000LGE`, set by CMP
//! - **Run state**: running, halted, or faulted
//! - **Step counter**: number of instructions executed
//!
//! ## Execution Model
//!
//! The CPU executes instructions via:
//! - `step()`: Execute one instruction
//! - `run()`: Execute until the CPU halts or faults
//! - `run_for_steps()`: Execute until a step budget is exhausted

use std::fmt;

use crate::instructions::{self, PcUpdate};
use crate::loader::LoadError;
use crate::memory::MEMORY_SIZE;
use crate::{ExecutionError, MemoryBus, OPCODE_TABLE};

/// Index of the register used as the stack pointer.
pub const SP: usize = 7;

/// Initial stack pointer value. The stack grows down from here.
pub const STACK_START: u8 = 0xF4;

/// Equal flag (bit 0 of FL).
pub const FLAG_E: u8 = 0b0000_0001;

/// Greater-than flag (bit 1 of FL).
pub const FLAG_G: u8 = 0b0000_0010;

/// Less-than flag (bit 2 of FL).
pub const FLAG_L: u8 = 0b0000_0100;

/// Where the run loop stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Fetching and executing instructions.
    Running,
    /// HLT executed. Terminal.
    Halted,
    /// An instruction faulted. Terminal.
    Faulted,
}

/// A value written by PRN or PRA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    /// PRN: decimal number followed by a newline.
    Number(u8),
    /// PRA: a single ASCII character.
    Char(u8),
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Number(value) => writeln!(f, "{}", value),
            Output::Char(value) => write!(f, "{}", *value as char),
        }
    }
}

/// LS-8 CPU state and execution context.
///
/// Generic over the memory implementation via the `MemoryBus` trait.
///
/// # Examples
///
/// ```
/// use ls8::{Ram, CPU};
///
/// let cpu = CPU::new(Ram::new());
///
/// assert_eq!(cpu.pc(), 0);
/// assert_eq!(cpu.sp(), 0xF4);
/// assert_eq!(cpu.flags(), 0);
/// assert!(!cpu.halted());
/// ```
pub struct CPU<M: MemoryBus> {
    /// General purpose registers; R7 is the stack pointer
    pub(crate) reg: [u8; 8],

    /// Program counter (address of next opcode)
    pub(crate) pc: u8,

    /// Flags register, `00000LGE`
    pub(crate) fl: u8,

    /// Set by HLT
    pub(crate) halted: bool,

    /// Set when an instruction faults
    pub(crate) fault: Option<ExecutionError>,

    /// Instructions executed
    pub(crate) steps: u64,

    /// Memory bus implementation
    pub(crate) memory: M,

    /// Receives PRN/PRA output
    on_output: Box<dyn FnMut(Output)>,
}

impl<M: MemoryBus> CPU<M> {
    /// Creates a new CPU with the given memory bus.
    ///
    /// Power-on state: registers R0-R6 are zero, SP (R7) is `0xF4`, PC is 0,
    /// flags are clear. Output goes to stdout until a callback is installed
    /// with [`CPU::set_output_callback`].
    pub fn new(memory: M) -> Self {
        let mut reg = [0; 8];
        reg[SP] = STACK_START;

        Self {
            reg,
            pc: 0,
            fl: 0,
            halted: false,
            fault: None,
            steps: 0,
            memory,
            on_output: Box::new(|output| print!("{}", output)),
        }
    }

    /// Replaces the handler that receives PRN/PRA output.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::cell::RefCell;
    /// use std::rc::Rc;
    /// use ls8::{Output, Ram, CPU};
    ///
    /// let printed = Rc::new(RefCell::new(Vec::new()));
    /// let sink = Rc::clone(&printed);
    ///
    /// let mut cpu = CPU::new(Ram::new());
    /// cpu.set_output_callback(move |output| sink.borrow_mut().push(output));
    ///
    /// // LDI R0,42 / PRN R0 / HLT
    /// cpu.load(&[0b10000010, 0, 42, 0b01000111, 0, 0b00000001]).unwrap();
    /// cpu.run().unwrap();
    ///
    /// assert_eq!(*printed.borrow(), vec![Output::Number(42)]);
    /// ```
    pub fn set_output_callback<F>(&mut self, callback: F)
    where
        F: FnMut(Output) + 'static,
    {
        self.on_output = Box::new(callback);
    }

    /// Copies a program image into memory starting at address 0.
    ///
    /// Returns `LoadError::TooLarge` if the image does not fit in memory.
    pub fn load(&mut self, program: &[u8]) -> Result<(), LoadError> {
        if program.len() > MEMORY_SIZE {
            return Err(LoadError::TooLarge {
                len: program.len(),
                capacity: MEMORY_SIZE,
            });
        }

        for (address, &byte) in (0..=u8::MAX).zip(program) {
            self.memory.write(address, byte);
        }

        tracing::debug!(bytes = program.len(), "program loaded");
        Ok(())
    }

    /// Executes one instruction and advances the CPU state.
    ///
    /// Performs the fetch-decode-execute cycle:
    /// 1. Fetch opcode byte at current PC
    /// 2. Look up instruction metadata in the opcode table
    /// 3. Dispatch to the instruction handler
    /// 4. Advance PC by the instruction size unless the handler set it
    ///
    /// Once the CPU has halted this is a no-op returning `RunState::Halted`;
    /// once it has faulted it returns the recorded fault again without
    /// fetching.
    ///
    /// # Examples
    ///
    /// ```
    /// use ls8::{ExecutionError, Ram, RunState, CPU};
    ///
    /// let mut cpu = CPU::new(Ram::new());
    /// cpu.load(&[0b10000010, 0, 8, 0b00000001]).unwrap();
    ///
    /// assert_eq!(cpu.step(), Ok(RunState::Running));
    /// assert_eq!(cpu.register(0), 8);
    /// assert_eq!(cpu.pc(), 3);
    ///
    /// assert_eq!(cpu.step(), Ok(RunState::Halted));
    ///
    /// // Fresh memory is all 0x00, which is not an instruction
    /// let mut cpu = CPU::new(Ram::new());
    /// assert_eq!(
    ///     cpu.step(),
    ///     Err(ExecutionError::UnknownOpcode { opcode: 0, address: 0 })
    /// );
    /// ```
    pub fn step(&mut self) -> Result<RunState, ExecutionError> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }
        if self.halted {
            return Ok(RunState::Halted);
        }

        let address = self.pc;
        let opcode = self.memory.read(address);

        let Some(metadata) = OPCODE_TABLE[opcode as usize] else {
            return Err(self.record_fault(ExecutionError::UnknownOpcode { opcode, address }));
        };

        tracing::trace!(pc = address, opcode, mnemonic = metadata.mnemonic, "execute");

        match instructions::dispatch(self, metadata.instruction) {
            Ok(PcUpdate::Advance) => self.pc = self.pc.wrapping_add(metadata.size_bytes),
            Ok(PcUpdate::Jumped) => {}
            Err(err) => return Err(self.record_fault(err)),
        }

        self.steps += 1;

        if self.halted {
            tracing::debug!(pc = address, steps = self.steps, "cpu halted");
        }

        Ok(self.state())
    }

    /// Runs until the CPU halts.
    ///
    /// Returns the number of instructions executed by this call. A program
    /// that never halts keeps this call looping; use
    /// [`CPU::run_for_steps`] when termination must be bounded.
    pub fn run(&mut self) -> Result<u64, ExecutionError> {
        let start_steps = self.steps;

        while self.step()? == RunState::Running {}

        Ok(self.steps - start_steps)
    }

    /// Runs for at most `step_budget` instructions.
    ///
    /// Stops early if the CPU halts. Returns the number of instructions
    /// executed.
    ///
    /// # Examples
    ///
    /// ```
    /// use ls8::{Ram, RunState, CPU};
    ///
    /// // LDI R0,0 / JMP R0: loops forever
    /// let mut cpu = CPU::new(Ram::new());
    /// cpu.load(&[0b10000010, 0, 0, 0b01010100, 0]).unwrap();
    ///
    /// assert_eq!(cpu.run_for_steps(100), Ok(100));
    /// assert_eq!(cpu.state(), RunState::Running);
    /// ```
    pub fn run_for_steps(&mut self, step_budget: u64) -> Result<u64, ExecutionError> {
        let start_steps = self.steps;
        let target_steps = start_steps.saturating_add(step_budget);

        while self.steps < target_steps {
            if self.step()? != RunState::Running {
                break;
            }
        }

        Ok(self.steps - start_steps)
    }

    /// Returns the CPU to its power-on register state, keeping memory.
    pub fn reset(&mut self) {
        self.reg = [0; 8];
        self.reg[SP] = STACK_START;
        self.pc = 0;
        self.fl = 0;
        self.halted = false;
        self.fault = None;
        self.steps = 0;
    }

    /// Formats the CPU state as a single trace line.
    ///
    /// Layout: `TRACE: PC | [PC] [PC+1] [PC+2] | R0 R1 R2 R3 R4 R5 R6 R7`,
    /// all in two-digit hex.
    ///
    /// # Examples
    ///
    /// ```
    /// use ls8::{Ram, CPU};
    ///
    /// let mut cpu = CPU::new(Ram::new());
    /// cpu.load(&[0b10000010, 0, 8]).unwrap();
    ///
    /// assert_eq!(
    ///     cpu.trace(),
    ///     "TRACE: 00 | 82 00 08 | 00 00 00 00 00 00 00 F4"
    /// );
    /// ```
    pub fn trace(&self) -> String {
        let [b0, b1, b2] = self.instruction_bytes();
        let mut line = format!("TRACE: {:02X} | {:02X} {:02X} {:02X} |", self.pc, b0, b1, b2);

        for value in self.reg {
            line.push_str(&format!(" {:02X}", value));
        }

        line
    }

    /// The three bytes starting at PC (opcode plus up to two operands).
    pub fn instruction_bytes(&self) -> [u8; 3] {
        [
            self.memory.read(self.pc),
            self.memory.read(self.pc.wrapping_add(1)),
            self.memory.read(self.pc.wrapping_add(2)),
        ]
    }

    // ========== Handler Support ==========

    /// Reads the operand byte `offset` bytes after the current opcode.
    pub(crate) fn operand(&self, offset: u8) -> u8 {
        self.memory.read(self.pc.wrapping_add(offset))
    }

    /// Reads an operand byte and checks that it names a register.
    pub(crate) fn register_operand(&self, offset: u8) -> Result<usize, ExecutionError> {
        let register = self.operand(offset);

        if (register as usize) < self.reg.len() {
            Ok(register as usize)
        } else {
            Err(ExecutionError::InvalidRegister {
                register,
                address: self.pc,
            })
        }
    }

    /// Decrements SP, then writes `value` at the new top of stack.
    pub(crate) fn push(&mut self, value: u8) {
        self.reg[SP] = self.reg[SP].wrapping_sub(1);
        self.memory.write(self.reg[SP], value);
    }

    /// Reads the top of stack, then increments SP.
    pub(crate) fn pop(&mut self) -> u8 {
        let value = self.memory.read(self.reg[SP]);
        self.reg[SP] = self.reg[SP].wrapping_add(1);
        value
    }

    pub(crate) fn emit(&mut self, output: Output) {
        (self.on_output)(output);
    }

    fn record_fault(&mut self, err: ExecutionError) -> ExecutionError {
        tracing::debug!(error = %err, "cpu faulted");
        self.fault = Some(err.clone());
        err
    }

    // ========== Getters ==========

    /// Returns the program counter value.
    pub fn pc(&self) -> u8 {
        self.pc
    }

    /// Returns the value of register `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in `0..8`.
    pub fn register(&self, index: usize) -> u8 {
        self.reg[index]
    }

    /// Returns a copy of the register file.
    pub fn registers(&self) -> [u8; 8] {
        self.reg
    }

    /// Returns the stack pointer (R7).
    pub fn sp(&self) -> u8 {
        self.reg[SP]
    }

    /// Returns the flags register, `00000LGE`.
    pub fn flags(&self) -> u8 {
        self.fl
    }

    /// Returns true if the last CMP found its operands equal.
    pub fn flag_e(&self) -> bool {
        self.fl & FLAG_E != 0
    }

    /// Returns true if the last CMP found the first operand greater.
    pub fn flag_g(&self) -> bool {
        self.fl & FLAG_G != 0
    }

    /// Returns true if the last CMP found the first operand less.
    pub fn flag_l(&self) -> bool {
        self.fl & FLAG_L != 0
    }

    /// Returns true once HLT has executed.
    pub fn halted(&self) -> bool {
        self.halted
    }

    /// Returns where the run loop stands.
    pub fn state(&self) -> RunState {
        if self.fault.is_some() {
            RunState::Faulted
        } else if self.halted {
            RunState::Halted
        } else {
            RunState::Running
        }
    }

    /// Returns the fault that stopped the CPU, if any.
    pub fn fault(&self) -> Option<&ExecutionError> {
        self.fault.as_ref()
    }

    /// Returns the number of instructions executed since power-on or reset.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Returns a shared reference to the memory bus.
    pub fn memory(&self) -> &M {
        &self.memory
    }

    /// Returns a mutable reference to the memory bus.
    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    // ========== Setters ==========

    /// Sets the program counter.
    pub fn set_pc(&mut self, pc: u8) {
        self.pc = pc;
    }

    /// Sets register `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in `0..8`.
    pub fn set_register(&mut self, index: usize, value: u8) {
        self.reg[index] = value;
    }

    /// Sets the flags register.
    pub fn set_flags(&mut self, flags: u8) {
        self.fl = flags;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Ram;

    #[test]
    fn test_cpu_initialization() {
        let cpu = CPU::new(Ram::new());

        assert_eq!(cpu.pc(), 0);
        assert_eq!(cpu.registers(), [0, 0, 0, 0, 0, 0, 0, 0xF4]);
        assert_eq!(cpu.flags(), 0);
        assert_eq!(cpu.steps(), 0);
        assert_eq!(cpu.state(), RunState::Running);
        assert!(cpu.fault().is_none());
    }

    #[test]
    fn test_push_pop_helpers() {
        let mut cpu = CPU::new(Ram::new());

        cpu.push(0xAB);
        assert_eq!(cpu.sp(), 0xF3);
        assert_eq!(cpu.memory().read(0xF3), 0xAB);

        assert_eq!(cpu.pop(), 0xAB);
        assert_eq!(cpu.sp(), 0xF4);
    }

    #[test]
    fn test_register_operand_rejects_out_of_range() {
        let mut cpu = CPU::new(Ram::new());
        cpu.memory_mut().write(1, 8);

        assert_eq!(
            cpu.register_operand(1),
            Err(ExecutionError::InvalidRegister {
                register: 8,
                address: 0
            })
        );
    }

    #[test]
    fn test_operand_wraps_past_end_of_memory() {
        let mut cpu = CPU::new(Ram::new());
        cpu.memory_mut().write(0x00, 0x11);
        cpu.set_pc(0xFF);

        assert_eq!(cpu.operand(1), 0x11);
    }

    #[test]
    fn test_load_rejects_oversize_program() {
        let mut cpu = CPU::new(Ram::new());
        let program = vec![0u8; MEMORY_SIZE + 1];

        assert!(matches!(
            cpu.load(&program),
            Err(LoadError::TooLarge { len: 257, capacity: 256 })
        ));
    }

    #[test]
    fn test_load_fills_whole_memory() {
        let mut cpu = CPU::new(Ram::new());
        let program: Vec<u8> = (0..=255).collect();

        cpu.load(&program).unwrap();
        assert_eq!(cpu.memory().read(0xFF), 0xFF);
        assert_eq!(cpu.memory().read(0x10), 0x10);
    }

    #[test]
    fn test_fault_is_sticky() {
        let mut cpu = CPU::new(Ram::new());
        let expected = ExecutionError::UnknownOpcode {
            opcode: 0,
            address: 0,
        };

        assert_eq!(cpu.step(), Err(expected.clone()));
        assert_eq!(cpu.state(), RunState::Faulted);

        // No fetch once faulted: PC and steps stay put
        cpu.memory_mut().write(0, 0b0000_0001);
        assert_eq!(cpu.step(), Err(expected));
        assert_eq!(cpu.pc(), 0);
        assert_eq!(cpu.steps(), 0);
    }

    #[test]
    fn test_reset_keeps_memory() {
        let mut cpu = CPU::new(Ram::new());
        cpu.load(&[0b1000_0010, 0, 5, 0b0000_0001]).unwrap();
        cpu.run().unwrap();

        cpu.reset();
        assert_eq!(cpu.state(), RunState::Running);
        assert_eq!(cpu.register(0), 0);
        assert_eq!(cpu.memory().read(2), 5);

        cpu.set_output_callback(|_| {});
        cpu.run().unwrap();
        assert_eq!(cpu.register(0), 5);
    }

    #[test]
    fn test_output_display() {
        assert_eq!(Output::Number(72).to_string(), "72\n");
        assert_eq!(Output::Char(b'A').to_string(), "A");
    }
}
