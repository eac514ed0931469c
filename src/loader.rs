//! # Program Loader
//!
//! Parses the LS-8 program image format: one byte per line written as a
//! binary literal, `#` starts a comment, surrounding whitespace and blank
//! lines are ignored.
//!
//! ```text
//! # print8.ls8
//! 10000010 # LDI R0,8
//! 00000000
//! 00001000
//! 01000111 # PRN R0
//! 00000000
//! 00000001 # HLT
//! ```
//!
//! Malformed input is rejected rather than clamped: a line must hold one to
//! eight `0`/`1` digits, and the image must fit in memory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::memory::MEMORY_SIZE;

/// Errors from reading or parsing a program image.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The program file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A line is not a binary byte literal.
    #[error("line {line}: `{text}` is not an 8-bit binary literal")]
    InvalidByte { line: usize, text: String },

    /// The byte on `line` would land past the end of memory.
    #[error("line {line}: program does not fit in {capacity} bytes of memory")]
    Overflow { line: usize, capacity: usize },

    /// The image does not fit in memory.
    #[error("program is {len} bytes but memory holds {capacity}")]
    TooLarge { len: usize, capacity: usize },
}

/// Parses program image text into bytes, in file order.
///
/// # Examples
///
/// ```
/// use ls8::parse_program;
///
/// let source = concat!(
///     "10000010 # LDI R0,8\n",
///     "00000000\n",
///     "00001000\n",
///     "\n",
///     "  01000111   # PRN R0\n",
///     "00000000\n",
///     "00000001 # HLT\n",
/// );
///
/// assert_eq!(
///     parse_program(source).unwrap(),
///     vec![0b10000010, 0, 8, 0b01000111, 0, 0b00000001]
/// );
/// ```
pub fn parse_program(source: &str) -> Result<Vec<u8>, LoadError> {
    let mut program = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let code = raw.split_once('#').map_or(raw, |(code, _)| code).trim();
        if code.is_empty() {
            continue;
        }

        let byte = parse_byte(code).ok_or_else(|| LoadError::InvalidByte {
            line: index + 1,
            text: code.to_string(),
        })?;

        if program.len() == MEMORY_SIZE {
            return Err(LoadError::Overflow {
                line: index + 1,
                capacity: MEMORY_SIZE,
            });
        }
        program.push(byte);
    }

    Ok(program)
}

/// Reads and parses a program image file.
pub fn load_file(path: impl AsRef<Path>) -> Result<Vec<u8>, LoadError> {
    let path = path.as_ref();

    let source = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let program = parse_program(&source)?;

    tracing::debug!(path = %path.display(), bytes = program.len(), "parsed program image");
    Ok(program)
}

fn parse_byte(text: &str) -> Option<u8> {
    if text.len() > 8 || !text.bytes().all(|b| b == b'0' || b == b'1') {
        return None;
    }

    u8::from_str_radix(text, 2).ok()
}
