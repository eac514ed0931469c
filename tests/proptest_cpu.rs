//! Property-based tests for CPU invariants.
//!
//! These tests use proptest to verify that CPU operations maintain
//! fundamental invariants across all register values and operands.

use std::cell::RefCell;
use std::rc::Rc;

use ls8::{MemoryBus, Output, Ram, RunState, CPU, FLAG_E, FLAG_G, FLAG_L, OPCODE_TABLE, STACK_START};
use proptest::prelude::*;

const LDI: u8 = 0b1000_0010;
const PRN: u8 = 0b0100_0111;
const ADD: u8 = 0b1010_0000;
const SUB: u8 = 0b1010_0001;
const MUL: u8 = 0b1010_0010;
const CMP: u8 = 0b1010_0111;
const AND: u8 = 0b1010_1000;
const OR: u8 = 0b1010_1010;
const XOR: u8 = 0b1010_1011;
const INC: u8 = 0b0110_0101;
const DEC: u8 = 0b0110_0110;
const NOT: u8 = 0b0110_1001;
const PUSH: u8 = 0b0100_0101;
const POP: u8 = 0b0100_0110;
const CALL: u8 = 0b0101_0000;
const RET: u8 = 0b0001_0001;
const JEQ: u8 = 0b0101_0101;
const JNE: u8 = 0b0101_0110;
const HLT: u8 = 0b0000_0001;

/// Helper function to create a CPU with `program` loaded and output captured
fn setup_cpu(program: &[u8]) -> (CPU<Ram>, Rc<RefCell<Vec<Output>>>) {
    let mut cpu = CPU::new(Ram::new());
    cpu.load(program).unwrap();

    let output = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&output);
    cpu.set_output_callback(move |out| sink.borrow_mut().push(out));

    (cpu, output)
}

/// Opcodes that leave PC to the run loop
fn non_jumping_opcodes() -> Vec<u8> {
    OPCODE_TABLE
        .iter()
        .flatten()
        .filter(|m| !m.sets_pc)
        .map(|m| m.instruction.opcode())
        .collect()
}

/// One straight-line instruction that cannot fault when its registers are R0-R6
fn straight_line_instruction() -> impl Strategy<Value = Vec<u8>> {
    let reg = 0u8..7;
    prop_oneof![
        (reg.clone(), any::<u8>()).prop_map(|(r, v)| vec![LDI, r, v]),
        reg.clone().prop_map(|r| vec![PRN, r]),
        reg.clone().prop_map(|r| vec![INC, r]),
        reg.clone().prop_map(|r| vec![DEC, r]),
        reg.clone().prop_map(|r| vec![NOT, r]),
        (
            prop::sample::select(vec![ADD, SUB, MUL, CMP, AND, OR, XOR]),
            reg.clone(),
            reg,
        )
            .prop_map(|(op, a, b)| vec![op, a, b]),
    ]
}

// ========== Instruction Semantics ==========

proptest! {
    /// Property: LDI then PRN prints exactly the loaded value
    #[test]
    fn prop_ldi_prn_emits_value(reg in 0u8..8, value in any::<u8>()) {
        let (mut cpu, output) = setup_cpu(&[LDI, reg, value, PRN, reg, HLT]);

        cpu.run().unwrap();

        prop_assert_eq!(output.borrow().clone(), vec![Output::Number(value)]);
    }

    /// Property: ADD and MUL wrap modulo 256
    #[test]
    fn prop_add_mul_wrap(a in any::<u8>(), b in any::<u8>()) {
        let (mut cpu, _) = setup_cpu(&[
            LDI, 0, a, LDI, 1, b, LDI, 2, a,
            ADD, 0, 1,
            MUL, 2, 1,
            HLT,
        ]);

        cpu.run().unwrap();

        prop_assert_eq!(cpu.register(0), a.wrapping_add(b));
        prop_assert_eq!(cpu.register(2), a.wrapping_mul(b));
        prop_assert_eq!(cpu.register(1), b);
    }

    /// Property: CMP sets exactly one of L, G, E
    #[test]
    fn prop_cmp_sets_one_flag(a in any::<u8>(), b in any::<u8>()) {
        let (mut cpu, _) = setup_cpu(&[LDI, 0, a, LDI, 1, b, CMP, 0, 1, HLT]);

        cpu.run().unwrap();

        let expected = match a.cmp(&b) {
            std::cmp::Ordering::Less => FLAG_L,
            std::cmp::Ordering::Equal => FLAG_E,
            std::cmp::Ordering::Greater => FLAG_G,
        };
        prop_assert_eq!(cpu.flags(), expected);
    }

    /// Property: CMP followed by JEQ/JNE jumps iff the operands are (un)equal
    #[test]
    fn prop_cmp_branch(a in any::<u8>(), b in any::<u8>(), target in any::<u8>(), jump_if_equal in any::<bool>()) {
        let jump = if jump_if_equal { JEQ } else { JNE };
        let (mut cpu, _) = setup_cpu(&[LDI, 0, a, LDI, 1, b, LDI, 2, target, CMP, 0, 1, jump, 2]);

        cpu.run_for_steps(5).unwrap();

        let taken = (a == b) == jump_if_equal;
        prop_assert_eq!(cpu.pc(), if taken { target } else { 14 });
    }
}

// ========== Stack Property Tests ==========

proptest! {
    /// Property: PUSH then POP copies the value and restores SP
    ///
    /// SP 3 and 4 are excluded: the pushed byte would land on the POP at 2-3.
    #[test]
    fn prop_push_pop_restores_sp(
        value in any::<u8>(),
        src in 0u8..7,
        dst in 0u8..7,
        sp in prop_oneof![0u8..=2, 5u8..=255],
    ) {
        let (mut cpu, _) = setup_cpu(&[PUSH, src, POP, dst]);
        cpu.set_register(src as usize, value);
        cpu.set_register(7, sp);

        cpu.run_for_steps(2).unwrap();

        prop_assert_eq!(cpu.register(dst as usize), value);
        prop_assert_eq!(cpu.sp(), sp);
    }

    /// Property: CALL then RET returns to the instruction after CALL with SP restored
    #[test]
    fn prop_call_ret_round_trip(call_site in 0u8..0xE0, target in 0xE4u8..0xF0) {
        let (mut cpu, _) = setup_cpu(&[]);
        cpu.memory_mut().write(call_site, CALL);
        cpu.memory_mut().write(call_site + 1, 3);
        cpu.memory_mut().write(target, RET);
        cpu.set_register(3, target);
        cpu.set_pc(call_site);

        cpu.step().unwrap();
        prop_assert_eq!(cpu.pc(), target);
        prop_assert_eq!(cpu.memory().read(STACK_START - 1), call_site + 2);

        cpu.step().unwrap();
        prop_assert_eq!(cpu.pc(), call_site + 2);
        prop_assert_eq!(cpu.sp(), STACK_START);
    }
}

// ========== PC Advancement Property Tests ==========

proptest! {
    /// Property: For non-jumping instructions, PC advances by exactly size_bytes
    #[test]
    fn prop_pc_advances_by_instruction_size(
        opcode in prop::sample::select(non_jumping_opcodes()),
        operand1 in 0u8..8,
        operand2 in any::<u8>(),
        pc in any::<u8>(),
        fill in 1u8..=255,
    ) {
        let (mut cpu, _) = setup_cpu(&[]);
        // Nonzero registers keep DIV and MOD from faulting
        for reg in 0..8 {
            cpu.set_register(reg, fill);
        }
        cpu.memory_mut().write(pc, opcode);
        cpu.memory_mut().write(pc.wrapping_add(1), operand1);
        cpu.memory_mut().write(pc.wrapping_add(2), operand2 % 8);
        cpu.set_pc(pc);

        let metadata = OPCODE_TABLE[opcode as usize].unwrap();
        cpu.step().unwrap();

        prop_assert_eq!(
            cpu.pc(),
            pc.wrapping_add(metadata.size_bytes),
            "PC should advance by {} bytes for {}",
            metadata.size_bytes,
            metadata.mnemonic
        );
    }

    /// Property: Any byte that is not in the table faults without moving PC
    #[test]
    fn prop_unknown_opcode_faults(opcode in any::<u8>()) {
        prop_assume!(OPCODE_TABLE[opcode as usize].is_none());
        let (mut cpu, output) = setup_cpu(&[opcode, 0, 0]);

        prop_assert!(cpu.step().is_err());
        prop_assert_eq!(cpu.state(), RunState::Faulted);
        prop_assert_eq!(cpu.pc(), 0);
        prop_assert!(output.borrow().is_empty());
    }
}

// ========== Termination ==========

proptest! {
    /// Property: A straight-line program ending in HLT halts after one step per instruction
    #[test]
    fn prop_straight_line_program_halts(
        body in prop::collection::vec(straight_line_instruction(), 0..40),
    ) {
        let mut program: Vec<u8> = body.iter().flatten().copied().collect();
        program.push(HLT);
        let (mut cpu, _) = setup_cpu(&program);

        let steps = cpu.run().unwrap();

        prop_assert_eq!(steps, body.len() as u64 + 1);
        prop_assert!(cpu.halted());
        prop_assert_eq!(cpu.pc() as usize, program.len());
        prop_assert_eq!(cpu.sp(), STACK_START);
    }
}
