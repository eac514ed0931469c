//! `ls8` command-line runner.
//!
//! Loads a program image and runs it to completion:
//!
//! ```text
//! ls8 programs/mult.ls8
//! ls8 --trace programs/call.ls8
//! ls8 --disassemble programs/stack.ls8
//! ```
//!
//! Logging goes to stderr and is controlled by `LS8_LOG` (e.g. `LS8_LOG=debug`).

use std::cell::RefCell;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use ls8::disassembler::{decode_instruction, formatter::format_listing_line};
use ls8::{disassemble, format_instruction, load_file, DisassembledInstruction, Ram, RunState, CPU};
use tracing_subscriber::EnvFilter;

/// Emulator for the LS-8 8-bit computer
#[derive(Debug, Parser)]
#[command(name = "ls8", version, about)]
struct Args {
    /// Program image: one binary byte per line, `#` starts a comment
    program: PathBuf,

    /// Print the CPU state before every instruction
    #[arg(long, env = "LS8_TRACE")]
    trace: bool,

    /// Print a listing of the program instead of running it
    #[arg(long, conflicts_with = "trace")]
    disassemble: bool,

    /// Give up after this many instructions
    #[arg(long, value_name = "N")]
    max_steps: Option<u64>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing();

    let result = run(&args);
    let flushed = io::stdout().flush().context("could not flush output");

    match result.and(flushed) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("LS8_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let program = load_file(&args.program).context("could not load program")?;
    let mut stdout = io::stdout();

    if args.disassemble {
        for instr in disassemble(&program, 0) {
            writeln!(stdout, "{}", format_listing_line(&instr)).context("could not write output")?;
        }
        return Ok(());
    }

    let mut cpu = CPU::new(Ram::new());
    cpu.load(&program)?;

    // PRN/PRA output; the first write failure stops the run
    let write_error: Rc<RefCell<Option<io::Error>>> = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&write_error);
    cpu.set_output_callback(move |output| {
        let mut slot = sink.borrow_mut();
        if slot.is_none() {
            if let Err(err) = write!(io::stdout(), "{}", output) {
                *slot = Some(err);
            }
        }
    });

    loop {
        if let Some(max_steps) = args.max_steps {
            if cpu.steps() >= max_steps {
                bail!("program did not halt within {} instructions", max_steps);
            }
        }

        if args.trace {
            writeln!(stdout, "{} | {}", cpu.trace(), describe_next(&cpu))
                .context("could not write output")?;
        }

        let state = cpu.step()?;

        if let Some(err) = write_error.borrow_mut().take() {
            return Err(err).context("could not write output");
        }
        if state == RunState::Halted {
            return Ok(());
        }
    }
}

/// Disassembly of the instruction at PC, for trace output.
fn describe_next(cpu: &CPU<Ram>) -> String {
    let bytes = cpu.instruction_bytes();
    let instr = decode_instruction(&bytes, cpu.pc())
        .unwrap_or_else(|| DisassembledInstruction::data(cpu.pc(), bytes[0]));

    format_instruction(&instr)
}
