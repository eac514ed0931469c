//! Fuzz target for the run loop.
//!
//! This target fills memory with an arbitrary image, sets arbitrary
//! register and flag state, then runs a bounded number of instructions
//! to find panics and broken run-state invariants.

#![no_main]

use arbitrary::Arbitrary;
use ls8::{MemoryBus, Ram, RunState, CPU};
use libfuzzer_sys::fuzz_target;

/// Arbitrary CPU initial state for fuzzing
#[derive(Debug, Arbitrary)]
struct FuzzCpuState {
    /// R0-R7 (R7 is the stack pointer)
    registers: [u8; 8],
    /// Flags register
    flags: u8,
    /// Starting program counter
    pc: u8,
}

/// Complete fuzz input
#[derive(Debug, Arbitrary)]
struct FuzzInput {
    cpu_state: FuzzCpuState,
    memory: [u8; 256],
    step_budget: u16,
}

fuzz_target!(|input: FuzzInput| {
    let mut memory = Ram::new();
    for (address, &byte) in (0..=u8::MAX).zip(input.memory.iter()) {
        memory.write(address, byte);
    }

    let mut cpu = CPU::new(memory);
    cpu.set_output_callback(|_| {});

    for (index, &value) in input.cpu_state.registers.iter().enumerate() {
        cpu.set_register(index, value);
    }
    cpu.set_flags(input.cpu_state.flags);
    cpu.set_pc(input.cpu_state.pc);

    // We don't care if it faults - just no panics
    let result = cpu.run_for_steps(input.step_budget as u64);

    match result {
        Ok(steps) => {
            assert!(steps <= input.step_budget as u64);
            assert_ne!(cpu.state(), RunState::Faulted);
        }
        Err(err) => {
            // A fault is terminal and sticky
            assert_eq!(cpu.state(), RunState::Faulted);
            assert_eq!(cpu.fault(), Some(&err));
            let pc = cpu.pc();
            assert_eq!(cpu.step(), Err(err));
            assert_eq!(cpu.pc(), pc);
        }
    }

    // CMP only ever sets one flag; fuzzed flags may hold anything until then
    assert!(cpu.flags() == input.cpu_state.flags || cpu.flags().count_ones() == 1);
});
