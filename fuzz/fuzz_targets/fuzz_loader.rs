//! Fuzz target for the program image loader.
//!
//! This target feeds arbitrary text to the parser to find panics, and
//! checks that whatever it accepts fits in memory.

#![no_main]

use ls8::{parse_program, MEMORY_SIZE};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let source = String::from_utf8_lossy(data);

    if let Ok(program) = parse_program(&source) {
        assert!(program.len() <= MEMORY_SIZE);

        // Every accepted byte comes from one non-blank line
        let code_lines = source
            .lines()
            .filter(|line| !line.split('#').next().unwrap_or("").trim().is_empty())
            .count();
        assert_eq!(program.len(), code_lines);
    }
});
