//! The execution engine: fetch-decode-dispatch against a decoded program,
//! resolving operands against the register file and RAM, and applying
//! per-opcode transitions.
//!
//! Follows a `step`/`execute` split: `step` reads and advances the
//! program counter, then hands the decoded instruction to `dispatch`,
//! which runs one opcode handler per recognized mnemonic.

use std::io::{Read, Write};

use crate::error::{RuntimeError, RuntimeErrorKind};
use crate::instruction::{Instruction, Opcode, Operand};
use crate::program::Program;
use crate::register;
use crate::state::State;
use crate::word::{generalize, Kind, Word};

/// What a single `step` accomplished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Halted,
}

/// A resolved operand: a place a word can be read from or (except for
/// `Immediate`) written to. Resolving to an index rather than a live
/// reference is what lets `ADD R0 R0 R0` read both inputs before the
/// output write touches the same cell.
enum Location {
    Register(usize),
    Ram(i32),
    Immediate(Word),
}

/// Owns the machine state and runs a loaded [`Program`] to completion or
/// to the first runtime error.
pub struct Interpreter {
    state: State,
    program: Vec<Instruction>,
}

impl Interpreter {
    pub fn new(ram_size: usize) -> Interpreter {
        Interpreter {
            state: State::new(ram_size),
            program: Vec::new(),
        }
    }

    /// Copy a parsed program's instructions in. The program array is
    /// immutable once loaded.
    pub fn load_program(&mut self, program: &Program) {
        self.program = program.instructions().to_vec();
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Run until `HALT` or a runtime error.
    pub fn run(&mut self, input: &mut dyn Read, output: &mut dyn Write) -> Result<(), RuntimeError> {
        loop {
            if let StepOutcome::Halted = self.step(input, output)? {
                return Ok(());
            }
        }
    }

    /// Execute exactly one fetch-decode-dispatch cycle.
    pub fn step(&mut self, input: &mut dyn Read, output: &mut dyn Write) -> Result<StepOutcome, RuntimeError> {
        let eip = self.eip();
        if eip < 0 || eip as usize >= self.program.len() {
            return Err(self.err(RuntimeErrorKind::EipOutOfRange));
        }
        let index = eip as usize;
        self.set_eip(eip + 1);

        let instruction = self.program[index].clone();
        let opcode = instruction
            .opcode
            .ok_or_else(|| RuntimeError::new(index, RuntimeErrorKind::UnknownOpcode(instruction.mnemonic.clone())))?;

        self.dispatch(index, opcode, &instruction, input, output)
    }

    fn dispatch(
        &mut self,
        eip_at_fetch: usize,
        opcode: Opcode,
        instr: &Instruction,
        input: &mut dyn Read,
        output: &mut dyn Write,
    ) -> Result<StepOutcome, RuntimeError> {
        macro_rules! at {
            ($e:expr) => {
                $e.map_err(|k| RuntimeError::new(eip_at_fetch, k))?
            };
        }

        match opcode {
            Opcode::Add => at!(self.binary_arith(instr, |a, b| a + b, i32::wrapping_add)),
            Opcode::Sub => at!(self.binary_arith(instr, |a, b| a - b, i32::wrapping_sub)),
            Opcode::Mult => at!(self.binary_arith(instr, |a, b| a * b, i32::wrapping_mul)),
            Opcode::Div => at!(self.divide(instr)),
            Opcode::Mod => at!(self.modulo(instr)),
            Opcode::And => at!(self.binary_logic(instr, |a, b| a && b)),
            Opcode::Or => at!(self.binary_logic(instr, |a, b| a || b)),
            Opcode::Not => at!(self.not(instr)),
            Opcode::Neg => at!(self.neg(instr)),
            Opcode::Inv => at!(self.inv(instr)),
            Opcode::Ceq => at!(self.compare(instr, |a, b| a == b)),
            Opcode::Cne => at!(self.compare(instr, |a, b| a != b)),
            Opcode::Cgt => at!(self.compare(instr, |a, b| a > b)),
            Opcode::Cge => at!(self.compare(instr, |a, b| a >= b)),
            Opcode::Clt => at!(self.compare(instr, |a, b| a < b)),
            Opcode::Cle => at!(self.compare(instr, |a, b| a <= b)),
            Opcode::Ass => at!(self.ass(instr)),
            Opcode::Mov => at!(self.mov(instr)),
            Opcode::Cast => at!(self.cast(instr)),
            Opcode::Push => at!(self.push(instr)),
            Opcode::Pop => at!(self.pop(instr)),
            Opcode::Call => at!(self.call(instr, eip_at_fetch)),
            Opcode::Ret => at!(self.ret()),
            Opcode::Jmp => at!(self.jmp(instr)),
            Opcode::Jeq => at!(self.jcc(instr, |v| v == 0)),
            Opcode::Jne => at!(self.jcc(instr, |v| v != 0)),
            Opcode::Read => at!(self.read_opcode(instr, input)),
            Opcode::Write => at!(self.write_opcode(instr, output)),
            Opcode::Halt => {
                self.state.halted = true;
                return Ok(StepOutcome::Halted);
            }
        }
        Ok(StepOutcome::Continue)
    }

    fn err(&self, kind: RuntimeErrorKind) -> RuntimeError {
        RuntimeError::new(self.eip().max(0) as usize, kind)
    }

    // -- register helpers -------------------------------------------------

    fn reg_index(name: &str) -> usize {
        register::index_of(name).expect("named registers always resolve")
    }

    fn eip(&self) -> i32 {
        self.state.registers.get(Self::reg_index(register::EIP)).as_int()
    }

    fn set_eip(&mut self, value: i32) {
        self.state
            .registers
            .get_mut(Self::reg_index(register::EIP))
            .write_numeric(value as f64);
    }

    fn esp(&self) -> i32 {
        self.state.registers.get(Self::reg_index(register::ESP)).as_int()
    }

    fn set_esp(&mut self, value: i32) {
        self.state
            .registers
            .get_mut(Self::reg_index(register::ESP))
            .write_numeric(value as f64);
    }

    // -- operand resolution -------------------------------------------------

    fn resolve(&self, operand: Operand) -> Result<Location, RuntimeErrorKind> {
        match operand {
            Operand::Register(i) => Ok(Location::Register(i)),
            Operand::AbsoluteAddress(a) => Ok(Location::Ram(a)),
            Operand::RelativeAddress(r, d) => {
                let base = self.state.registers.get(r).as_int();
                Ok(Location::Ram(base + d))
            }
            Operand::Immediate(w) => Ok(Location::Immediate(w)),
            Operand::Empty => Err(RuntimeErrorKind::EmptyOperand),
        }
    }

    fn read_loc(&self, loc: &Location) -> Result<Word, RuntimeErrorKind> {
        match *loc {
            Location::Register(i) => Ok(*self.state.registers.get(i)),
            Location::Ram(a) => self
                .state
                .ram
                .get(a)
                .copied()
                .ok_or(RuntimeErrorKind::RamIndexOutOfRange(a)),
            Location::Immediate(w) => Ok(w),
        }
    }

    fn with_mut_word<F>(&mut self, loc: &Location, f: F) -> Result<(), RuntimeErrorKind>
    where
        F: FnOnce(&mut Word),
    {
        match *loc {
            Location::Register(i) => {
                f(self.state.registers.get_mut(i));
                Ok(())
            }
            Location::Ram(a) => {
                let cell = self
                    .state
                    .ram
                    .get_mut(a)
                    .ok_or(RuntimeErrorKind::RamIndexOutOfRange(a))?;
                f(cell);
                Ok(())
            }
            Location::Immediate(_) => Err(RuntimeErrorKind::ImmediateWrite),
        }
    }

    fn read_operand(&self, operand: Operand) -> Result<Word, RuntimeErrorKind> {
        let loc = self.resolve(operand)?;
        self.read_loc(&loc)
    }

    // -- three-operand arithmetic / logic / comparison ---------------------

    /// Int/Logic results go through native wrapping `i32` arithmetic, not
    /// `f64`, so that overflow mirrors the host integer's two's-complement
    /// wraparound (spec'd behavior) instead of `f64->i32`'s saturating
    /// cast. Only a Float-generalized result takes the float path.
    fn binary_arith(
        &mut self,
        instr: &Instruction,
        float_op: impl Fn(f64, f64) -> f64,
        int_op: impl Fn(i32, i32) -> i32,
    ) -> Result<(), RuntimeErrorKind> {
        let a = self.read_operand(instr.a())?;
        let b = self.read_operand(instr.b())?;
        let kind = generalize(a.kind(), b.kind());
        let value = if kind == Kind::Float {
            float_op(a.numeric_value(), b.numeric_value())
        } else {
            int_op(a.as_int(), b.as_int()) as f64
        };
        self.set_generalized(instr.c(), kind, value)
    }

    fn binary_logic(&mut self, instr: &Instruction, f: impl Fn(bool, bool) -> bool) -> Result<(), RuntimeErrorKind> {
        let a = self.read_operand(instr.a())?;
        let b = self.read_operand(instr.b())?;
        let value = if f(a.numeric_value() != 0.0, b.numeric_value() != 0.0) {
            1.0
        } else {
            0.0
        };
        self.set_generalized(instr.c(), generalize(a.kind(), b.kind()), value)
    }

    fn compare(&mut self, instr: &Instruction, f: impl Fn(f64, f64) -> bool) -> Result<(), RuntimeErrorKind> {
        let a = self.read_operand(instr.a())?;
        let b = self.read_operand(instr.b())?;
        let result = f(a.numeric_value(), b.numeric_value());
        let loc = self.resolve(instr.c())?;
        self.with_mut_word(&loc, |w| {
            *w = Word::zero_of(generalize(a.kind(), b.kind()));
            w.write_bool(result);
        })
    }

    fn divide(&mut self, instr: &Instruction) -> Result<(), RuntimeErrorKind> {
        let a = self.read_operand(instr.a())?;
        let b = self.read_operand(instr.b())?;
        if b.numeric_value() == 0.0 {
            return Err(RuntimeErrorKind::DivisionByZero);
        }
        let kind = generalize(a.kind(), b.kind());
        let value = if kind == Kind::Float {
            a.numeric_value() / b.numeric_value()
        } else {
            (a.as_int() / b.as_int()) as f64
        };
        self.set_generalized(instr.c(), kind, value)
    }

    fn modulo(&mut self, instr: &Instruction) -> Result<(), RuntimeErrorKind> {
        let a = self.read_operand(instr.a())?;
        let b = self.read_operand(instr.b())?;
        let (ai, bi) = (a.as_int(), b.as_int());
        if bi == 0 {
            return Err(RuntimeErrorKind::DivisionByZero);
        }
        // Both operands truncate to int before the modulo regardless of
        // kind. Rust's `%` on i32 already truncates toward zero.
        let value = (ai % bi) as f64;
        self.set_generalized(instr.c(), generalize(a.kind(), b.kind()), value)
    }

    fn set_generalized(&mut self, operand: Operand, kind: Kind, value: f64) -> Result<(), RuntimeErrorKind> {
        let loc = self.resolve(operand)?;
        self.with_mut_word(&loc, |w| {
            *w = Word::zero_of(kind);
            w.write_numeric(value);
        })
    }

    // -- two-operand unary ops ------------------------------------------

    fn not(&mut self, instr: &Instruction) -> Result<(), RuntimeErrorKind> {
        let a = self.read_operand(instr.a())?;
        let value = a.numeric_value() == 0.0;
        let loc = self.resolve(instr.b())?;
        self.with_mut_word(&loc, |w| {
            *w = Word::zero_of(Kind::Logic);
            w.write_bool(value);
        })
    }

    fn neg(&mut self, instr: &Instruction) -> Result<(), RuntimeErrorKind> {
        let a = self.read_operand(instr.a())?;
        let value = !a.as_int();
        let loc = self.resolve(instr.b())?;
        self.with_mut_word(&loc, |w| {
            *w = Word::zero_of(Kind::Int);
            w.write_numeric(value as f64);
        })
    }

    fn inv(&mut self, instr: &Instruction) -> Result<(), RuntimeErrorKind> {
        let a = self.read_operand(instr.a())?;
        let kind = if a.kind() == Kind::Float { Kind::Float } else { Kind::Int };
        let value = -a.numeric_value();
        self.set_generalized(instr.b(), kind, value)
    }

    fn ass(&mut self, instr: &Instruction) -> Result<(), RuntimeErrorKind> {
        let value = self.read_operand(instr.a())?.numeric_value();
        let loc = self.resolve(instr.b())?;
        self.with_mut_word(&loc, |w| w.write_numeric(value))
    }

    fn mov(&mut self, instr: &Instruction) -> Result<(), RuntimeErrorKind> {
        let a = self.read_operand(instr.a())?;
        let loc = self.resolve(instr.b())?;
        self.with_mut_word(&loc, |w| *w = a.raw_copy())
    }

    fn cast(&mut self, instr: &Instruction) -> Result<(), RuntimeErrorKind> {
        let new_kind = self.read_operand(instr.a())?.kind();
        let loc = self.resolve(instr.b())?;
        self.with_mut_word(&loc, |w| *w = w.cast_to(new_kind))
    }

    // -- stack / control flow ---------------------------------------------

    fn push(&mut self, instr: &Instruction) -> Result<(), RuntimeErrorKind> {
        let value = self.read_operand(instr.a())?;
        let esp = self.esp();
        if esp <= 0 {
            return Err(RuntimeErrorKind::StackOverflow);
        }
        let new_esp = esp - 1;
        let cell = self
            .state
            .ram
            .get_mut(new_esp)
            .ok_or(RuntimeErrorKind::RamIndexOutOfRange(new_esp))?;
        *cell = value.raw_copy();
        self.set_esp(new_esp);
        Ok(())
    }

    fn pop(&mut self, instr: &Instruction) -> Result<(), RuntimeErrorKind> {
        let esp = self.esp();
        if esp as usize >= self.state.ram.len() {
            return Err(RuntimeErrorKind::StackUnderflow);
        }
        let value = *self
            .state
            .ram
            .get(esp)
            .ok_or(RuntimeErrorKind::RamIndexOutOfRange(esp))?;
        let loc = self.resolve(instr.a())?;
        self.with_mut_word(&loc, |w| *w = value)?;
        self.set_esp(esp + 1);
        Ok(())
    }

    fn call(&mut self, instr: &Instruction, _eip_at_fetch: usize) -> Result<(), RuntimeErrorKind> {
        let target = self.read_operand(instr.a())?.as_int();
        let esp = self.esp();
        if esp <= 0 {
            return Err(RuntimeErrorKind::StackOverflow);
        }
        let new_esp = esp - 1;
        let return_addr = self.eip(); // EIP already post-incremented at fetch time
        let cell = self
            .state
            .ram
            .get_mut(new_esp)
            .ok_or(RuntimeErrorKind::RamIndexOutOfRange(new_esp))?;
        *cell = Word::Int(return_addr);
        self.set_esp(new_esp);
        self.set_eip(target);
        Ok(())
    }

    fn ret(&mut self) -> Result<(), RuntimeErrorKind> {
        let esp = self.esp();
        if esp as usize >= self.state.ram.len() {
            return Err(RuntimeErrorKind::StackUnderflow);
        }
        let target = self
            .state
            .ram
            .get(esp)
            .ok_or(RuntimeErrorKind::RamIndexOutOfRange(esp))?
            .as_int();
        self.set_esp(esp + 1);
        self.set_eip(target);
        Ok(())
    }

    fn jmp(&mut self, instr: &Instruction) -> Result<(), RuntimeErrorKind> {
        let target = self.read_operand(instr.a())?.as_int();
        self.set_eip(target);
        Ok(())
    }

    fn jcc(&mut self, instr: &Instruction, take: impl Fn(i32) -> bool) -> Result<(), RuntimeErrorKind> {
        let a = self.read_operand(instr.a())?.as_int();
        if take(a) {
            let target = self.read_operand(instr.b())?.as_int();
            self.set_eip(target);
        }
        Ok(())
    }

    // -- I/O ---------------------------------------------------------------

    fn read_opcode(&mut self, instr: &Instruction, input: &mut dyn Read) -> Result<(), RuntimeErrorKind> {
        let loc = self.resolve(instr.a())?;
        let kind = self.read_loc(&loc)?.kind();
        let value = match kind {
            Kind::Char => {
                let ch = read_one_char(input).map_err(|e| RuntimeErrorKind::ReadFailure(e.to_string()))?;
                let ch = ch.ok_or_else(|| RuntimeErrorKind::ReadFailure("unexpected end of input".into()))?;
                ch as i32 as f64
            }
            Kind::Float => {
                let token = read_token(input).map_err(|e| RuntimeErrorKind::ReadFailure(e.to_string()))?;
                token
                    .parse::<f64>()
                    .map_err(|_| RuntimeErrorKind::ReadFailure(format!("'{}' is not a float", token)))?
            }
            Kind::Int | Kind::Logic => {
                let token = read_token(input).map_err(|e| RuntimeErrorKind::ReadFailure(e.to_string()))?;
                token
                    .parse::<i64>()
                    .map_err(|_| RuntimeErrorKind::ReadFailure(format!("'{}' is not an integer", token)))?
                    as f64
            }
        };
        self.with_mut_word(&loc, |w| w.write_numeric(value))
    }

    fn write_opcode(&mut self, instr: &Instruction, output: &mut dyn Write) -> Result<(), RuntimeErrorKind> {
        let value = self.read_operand(instr.a())?;
        match value {
            Word::Int(i) => write!(output, "{}", i),
            Word::Logic(b) => write!(output, "{}", b as i32),
            Word::Float(f) => write!(output, "{}", f),
            Word::Char(c) => output.write_all(&[c as u8]),
        }
        .map_err(|e| RuntimeErrorKind::WriteFailure(e.to_string()))
    }
}

fn read_one_char(input: &mut dyn Read) -> std::io::Result<Option<char>> {
    let mut byte = [0u8; 1];
    loop {
        if input.read(&mut byte)? == 0 {
            return Ok(None);
        }
        let c = byte[0] as char;
        if !c.is_whitespace() {
            return Ok(Some(c));
        }
    }
}

fn read_token(input: &mut dyn Read) -> std::io::Result<String> {
    let mut byte = [0u8; 1];
    loop {
        if input.read(&mut byte)? == 0 {
            return Ok(String::new());
        }
        if !(byte[0] as char).is_whitespace() {
            break;
        }
    }
    let mut token = String::new();
    token.push(byte[0] as char);
    loop {
        if input.read(&mut byte)? == 0 {
            break;
        }
        let c = byte[0] as char;
        if c.is_whitespace() {
            break;
        }
        token.push(c);
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::Program;
    use std::io::Cursor;

    fn run_source(source: &str) -> String {
        let program = Program::from_source(source).unwrap();
        let mut interp = Interpreter::new(100);
        interp.load_program(&program);
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();
        interp.run(&mut input, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn scenario_1_add_writes_five() {
        assert_eq!(run_source("ADD <int>2 <int>3 R0\nWRITE R0\nHALT\n"), "5");
    }

    #[test]
    fn scenario_2_generalize_widens_destination_to_float() {
        let out = run_source("ASS <float>1.5 R0\nASS <int>2 R1\nADD R0 R1 R2\nWRITE R2\nHALT\n");
        assert_eq!(out, "3.5");
    }

    #[test]
    fn scenario_3_stack_is_lifo() {
        assert_eq!(
            run_source("PUSH <int>7\nPUSH <int>8\nPOP R0\nPOP R1\nWRITE R0\nWRITE R1\nHALT\n"),
            "87"
        );
    }

    #[test]
    fn scenario_4_jeq_jumps_on_zero() {
        let src = "ASS <int>0 R0\nJEQ R0 <int>4\nWRITE <int>1\nHALT\nWRITE <int>2\nHALT\n";
        assert_eq!(run_source(src), "2");
    }

    #[test]
    fn scenario_5_call_and_ret_roundtrip() {
        let src = "ASS <int>3 R0\nCALL <int>3\nHALT\nMULT R0 R0 R0\nWRITE R0\nRET\n";
        assert_eq!(run_source(src), "9");
    }

    #[test]
    fn scenario_6_and_of_logics() {
        let src = "ASS <logic>1 R0\nASS <logic>0 R1\nAND R0 R1 R2\nWRITE R2\nHALT\n";
        assert_eq!(run_source(src), "0");
    }

    #[test]
    fn round_trip_stack_law() {
        let program = Program::from_source("PUSH <float>2.5\nPOP R0\nHALT\n").unwrap();
        let mut interp = Interpreter::new(100);
        interp.load_program(&program);
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();
        interp.run(&mut input, &mut output).unwrap();
        let r0 = interp.state().registers.get(register::index_of("R0").unwrap());
        assert_eq!(*r0, Word::Float(2.5));
    }

    #[test]
    fn call_ret_balance_restores_esp_and_eip() {
        let program = Program::from_source("CALL <int>2\nHALT\nRET\n").unwrap();
        let mut interp = Interpreter::new(100);
        interp.load_program(&program);
        let starting_esp = interp.esp();
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();
        // Step CALL, then RET, then we should be back at instruction 1 (HALT).
        interp.step(&mut input, &mut output).unwrap(); // CALL
        interp.step(&mut input, &mut output).unwrap(); // RET
        assert_eq!(interp.eip(), 1);
        assert_eq!(interp.esp(), starting_esp);
    }

    #[test]
    fn comparison_idempotence_writes_true_regardless_of_kind() {
        let program = Program::from_source("ASS <float>4.0 R0\nCEQ R0 R0 R1\nHALT\n").unwrap();
        let mut interp = Interpreter::new(100);
        interp.load_program(&program);
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();
        interp.run(&mut input, &mut output).unwrap();
        let r1 = interp.state().registers.get(register::index_of("R1").unwrap());
        assert_eq!(*r1, Word::Int(1));
    }

    #[test]
    fn division_by_zero_is_a_runtime_error() {
        let program = Program::from_source("DIV <int>1 <int>0 R0\nHALT\n").unwrap();
        let mut interp = Interpreter::new(100);
        interp.load_program(&program);
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();
        let err = interp.run(&mut input, &mut output).unwrap_err();
        assert_eq!(err.reason, RuntimeErrorKind::DivisionByZero);
    }

    #[test]
    fn falling_off_the_end_is_a_runtime_error() {
        let program = Program::from_source("ASS <int>1 R0\n").unwrap();
        let mut interp = Interpreter::new(100);
        interp.load_program(&program);
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();
        let err = interp.run(&mut input, &mut output).unwrap_err();
        assert_eq!(err.reason, RuntimeErrorKind::EipOutOfRange);
    }

    #[test]
    fn push_with_esp_at_zero_overflows() {
        let program = Program::from_source("PUSH <int>1\n").unwrap();
        let mut interp = Interpreter::new(100);
        interp.load_program(&program);
        interp.set_esp(0);
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();
        let err = interp.run(&mut input, &mut output).unwrap_err();
        assert_eq!(err.reason, RuntimeErrorKind::StackOverflow);
    }

    #[test]
    fn pop_with_empty_stack_underflows() {
        let program = Program::from_source("POP R0\n").unwrap();
        let mut interp = Interpreter::new(100);
        interp.load_program(&program);
        interp.set_esp(100);
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();
        let err = interp.run(&mut input, &mut output).unwrap_err();
        assert_eq!(err.reason, RuntimeErrorKind::StackUnderflow);
    }

    #[test]
    fn add_wraps_on_overflow_like_native_int() {
        let program = Program::from_source("ADD <int>2147483647 <int>1 R0\nHALT\n").unwrap();
        let mut interp = Interpreter::new(100);
        interp.load_program(&program);
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();
        interp.run(&mut input, &mut output).unwrap();
        let r0 = interp.state().registers.get(register::index_of("R0").unwrap());
        assert_eq!(*r0, Word::Int(i32::MIN));
    }

    #[test]
    fn mod_truncates_toward_zero() {
        let program = Program::from_source("MOD <int>-7 <int>2 R0\nHALT\n").unwrap();
        let mut interp = Interpreter::new(100);
        interp.load_program(&program);
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();
        interp.run(&mut input, &mut output).unwrap();
        let r0 = interp.state().registers.get(register::index_of("R0").unwrap());
        assert_eq!(*r0, Word::Int(-1));
    }

    #[test]
    fn neg_is_bitwise_complement_not_arithmetic_negation() {
        let program = Program::from_source("NEG <int>0 R0\nHALT\n").unwrap();
        let mut interp = Interpreter::new(100);
        interp.load_program(&program);
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();
        interp.run(&mut input, &mut output).unwrap();
        let r0 = interp.state().registers.get(register::index_of("R0").unwrap());
        assert_eq!(*r0, Word::Int(-1)); // !0i32 == -1
    }

    #[test]
    fn inv_is_arithmetic_negation() {
        let program = Program::from_source("INV <int>5 R0\nHALT\n").unwrap();
        let mut interp = Interpreter::new(100);
        interp.load_program(&program);
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();
        interp.run(&mut input, &mut output).unwrap();
        let r0 = interp.state().registers.get(register::index_of("R0").unwrap());
        assert_eq!(*r0, Word::Int(-5));
    }

    #[test]
    fn read_opcode_parses_int_from_stdin() {
        let program = Program::from_source("READ R0\nWRITE R0\nHALT\n").unwrap();
        let mut interp = Interpreter::new(100);
        interp.load_program(&program);
        let mut input = Cursor::new(b"42\n".to_vec());
        let mut output = Vec::new();
        interp.run(&mut input, &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "42");
    }

    #[test]
    fn immediate_operand_cannot_be_written_through() {
        let program = Program::from_source("ASS R0 <int>5\n").unwrap();
        let mut interp = Interpreter::new(100);
        interp.load_program(&program);
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();
        let err = interp.run(&mut input, &mut output).unwrap_err();
        assert_eq!(err.reason, RuntimeErrorKind::ImmediateWrite);
    }
}
