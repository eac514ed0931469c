//! # Memory Bus Abstraction
//!
//! This module provides the `MemoryBus` trait that decouples the CPU from the
//! memory implementation, and `Ram`, the LS-8's 256-byte memory image.
//!
//! ## Design Principles
//!
//! - Addresses are `u8`: the LS-8 address space is exactly 256 bytes, so every
//!   address is in range and `PC+1`/`PC+2` or stack arithmetic wraps modulo 256
//! - No bus errors - reads/writes always succeed
//! - Simple signatures for WASM compatibility

/// Size of the LS-8 address space in bytes.
pub const MEMORY_SIZE: usize = 256;

/// Memory bus trait for CPU to read/write bytes.
///
/// # Design
///
/// - `read(&self)`: Immutable reference allows shared reads
/// - `write(&mut self)`: Mutable reference makes side effects explicit
/// - No error types: every `u8` is a valid address
///
/// # Examples
///
/// ```
/// use ls8::{MemoryBus, Ram};
///
/// let mut mem = Ram::new();
///
/// mem.write(0x42, 0x99);
/// assert_eq!(mem.read(0x42), 0x99);
/// ```
///
/// ## Implementing Custom Memory
///
/// ```
/// use ls8::MemoryBus;
///
/// /// Memory that ignores writes to the program area.
/// struct WriteProtected {
///     data: [u8; 256],
///     protect_below: u8,
/// }
///
/// impl MemoryBus for WriteProtected {
///     fn read(&self, addr: u8) -> u8 {
///         self.data[addr as usize]
///     }
///
///     fn write(&mut self, addr: u8, value: u8) {
///         if addr >= self.protect_below {
///             self.data[addr as usize] = value;
///         }
///     }
/// }
/// ```
pub trait MemoryBus {
    /// Reads a byte from the specified address.
    ///
    /// This method must never panic.
    fn read(&self, addr: u8) -> u8;

    /// Writes a byte to the specified address.
    ///
    /// This method must never panic. Implementations may ignore the write.
    fn write(&mut self, addr: u8, value: u8);
}

/// The LS-8's 256-byte RAM, zero-initialized.
///
/// # Examples
///
/// ```
/// use ls8::{MemoryBus, Ram};
///
/// let mem = Ram::new();
/// assert_eq!(mem.read(0x00), 0x00);
/// assert_eq!(mem.read(0xFF), 0x00);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ram {
    data: [u8; MEMORY_SIZE],
}

impl Ram {
    /// Creates a new Ram instance with all bytes initialized to zero.
    pub fn new() -> Self {
        Self {
            data: [0; MEMORY_SIZE],
        }
    }

    /// Returns the whole memory image.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

impl Default for Ram {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBus for Ram {
    fn read(&self, addr: u8) -> u8 {
        self.data[addr as usize]
    }

    fn write(&mut self, addr: u8, value: u8) {
        self.data[addr as usize] = value;
    }
}
