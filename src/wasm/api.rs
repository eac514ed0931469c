//! WASM API for the LS-8 emulator.
//!
//! Provides JavaScript-callable interfaces for program loading, CPU control,
//! state inspection and disassembly.

use crate::disassembler::formatter::format_instruction;
use crate::{disassemble, parse_program, MemoryBus, Ram, RunState, CPU};
use wasm_bindgen::prelude::*;

/// JavaScript-compatible error wrapper
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsError {
    message: String,
}

#[wasm_bindgen]
impl JsError {
    #[wasm_bindgen(constructor)]
    pub fn new(message: &str) -> JsError {
        JsError {
            message: message.to_string(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn message(&self) -> String {
        self.message.clone()
    }
}

impl JsError {
    fn from_error(err: impl std::fmt::Display) -> JsError {
        JsError {
            message: err.to_string(),
        }
    }
}

/// One line of a disassembly listing
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct DisassemblyLine {
    address: u8,
    bytes: Vec<u8>,
    text: String,
}

#[wasm_bindgen]
impl DisassemblyLine {
    #[wasm_bindgen(getter)]
    pub fn address(&self) -> u8 {
        self.address
    }

    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn text(&self) -> String {
        self.text.clone()
    }
}

/// Main emulator interface for JavaScript
#[wasm_bindgen]
pub struct Ls8Emulator {
    cpu: CPU<Ram>,
    program: Vec<u8>,
}

#[wasm_bindgen]
impl Ls8Emulator {
    /// Create an emulator that sends PRN/PRA output to `on_output` as strings
    #[wasm_bindgen(constructor)]
    pub fn new(on_output: js_sys::Function) -> Self {
        let mut cpu = CPU::new(Ram::new());
        cpu.set_output_callback(move |output| {
            let _ = on_output.call1(&JsValue::NULL, &JsValue::from_str(&output.to_string()));
        });

        Ls8Emulator {
            cpu,
            program: Vec::new(),
        }
    }

    /// Parse a program image and load it at address 0, resetting the CPU.
    ///
    /// Returns the number of bytes loaded.
    pub fn load_program(&mut self, source: &str) -> Result<usize, JsError> {
        let program = parse_program(source).map_err(JsError::from_error)?;

        // Clear whatever the previous program left behind
        for address in 0..=u8::MAX {
            self.cpu.memory_mut().write(address, 0);
        }
        self.cpu.load(&program).map_err(JsError::from_error)?;
        self.cpu.reset();

        let len = program.len();
        self.program = program;
        Ok(len)
    }

    /// Execute a single instruction. Returns true once the CPU has halted.
    pub fn step(&mut self) -> Result<bool, JsError> {
        self.cpu
            .step()
            .map(|state| state == RunState::Halted)
            .map_err(JsError::from_error)
    }

    /// Execute up to `steps` instructions and return how many ran
    pub fn run_for_steps(&mut self, steps: u32) -> Result<u32, JsError> {
        self.cpu
            .run_for_steps(steps as u64)
            .map(|n| n as u32)
            .map_err(JsError::from_error)
    }

    /// Reset registers and PC, keeping memory
    pub fn reset(&mut self) {
        self.cpu.reset();
    }

    /// Disassemble the loaded program
    pub fn disassemble(&self) -> Vec<DisassemblyLine> {
        disassemble(&self.program, 0)
            .iter()
            .map(|instr| {
                let mut bytes = vec![instr.opcode];
                bytes.extend_from_slice(&instr.operand_bytes);
                DisassemblyLine {
                    address: instr.address,
                    bytes,
                    text: format_instruction(instr),
                }
            })
            .collect()
    }

    /// Current CPU state as a trace line
    pub fn trace(&self) -> String {
        self.cpu.trace()
    }

    // ========== State Getters ==========

    #[wasm_bindgen(getter)]
    pub fn pc(&self) -> u8 {
        self.cpu.pc()
    }

    #[wasm_bindgen(getter)]
    pub fn sp(&self) -> u8 {
        self.cpu.sp()
    }

    #[wasm_bindgen(getter)]
    pub fn flags(&self) -> u8 {
        self.cpu.flags()
    }

    #[wasm_bindgen(getter)]
    pub fn registers(&self) -> Vec<u8> {
        self.cpu.registers().to_vec()
    }

    #[wasm_bindgen(getter)]
    pub fn halted(&self) -> bool {
        self.cpu.halted()
    }

    #[wasm_bindgen(getter)]
    pub fn faulted(&self) -> bool {
        self.cpu.state() == RunState::Faulted
    }

    #[wasm_bindgen(getter)]
    pub fn steps(&self) -> f64 {
        self.cpu.steps() as f64
    }

    /// Copy of the full 256-byte memory image
    pub fn memory(&self) -> Vec<u8> {
        self.cpu.memory().as_slice().to_vec()
    }
}
