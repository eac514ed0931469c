//! WebAssembly bindings for the LS-8 emulator.
//!
//! This module provides JavaScript-callable interfaces to the emulator,
//! enabling browser-based execution of LS-8 programs.

pub mod api;

pub use api::Ls8Emulator;
