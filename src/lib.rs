//! `compita` is a tagged-word register-and-stack virtual machine: a small
//! fixed register file, a linear block of RAM doubling as a descending
//! call stack, and a fixed program array, driven by a line-oriented
//! textual assembly language.
//!
//! Every storage cell — register or RAM word — carries one of four kinds
//! (`Int`, `Char`, `Float`, `Logic`) alongside its value. Reading a word
//! always yields a numeric value regardless of kind; writing into a word
//! coerces the incoming value to that word's *current* kind, unless the
//! operation explicitly retags the destination first (binary arithmetic
//! and comparisons do, via [`word::generalize`]; `ASS` does not).
//!
//! ```
//! use compita::interpreter::Interpreter;
//! use compita::program::Program;
//! use std::io::Cursor;
//!
//! let program = Program::from_source("ADD <int>2 <int>3 R0\nWRITE R0\nHALT\n").unwrap();
//! let mut interpreter = Interpreter::new(64);
//! interpreter.load_program(&program);
//! let mut input = Cursor::new(Vec::new());
//! let mut output = Vec::new();
//! interpreter.run(&mut input, &mut output).unwrap();
//! assert_eq!(output, b"5");
//! ```

pub mod error;
pub mod instruction;
pub mod interpreter;
pub mod parser;
pub mod program;
pub mod register;
pub mod state;
pub mod word;

pub use error::{ParseError, RuntimeError, RuntimeErrorKind};
pub use instruction::{Instruction, Opcode, Operand};
pub use interpreter::{Interpreter, StepOutcome};
pub use program::Program;
pub use state::{Ram, State, DEFAULT_PROGRAM_CAPACITY, DEFAULT_RAM_SIZE};
pub use word::{Kind, Word};
