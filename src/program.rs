//! A decoded, immutable program — the parser's sole output and the
//! interpreter's sole input.

use std::io::Read;

use crate::error::ParseError;
use crate::instruction::Instruction;
use crate::parser;
use crate::state::DEFAULT_PROGRAM_CAPACITY;

/// The parsed instruction sequence, indexed by `EIP`. Built once by the
/// parser and never mutated afterward.
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    /// Parse a whole program from a byte stream, consumed from its
    /// current position to EOF.
    pub fn from_reader(input: &mut dyn Read) -> Result<Program, ParseError> {
        Program::from_reader_with_capacity(input, DEFAULT_PROGRAM_CAPACITY)
    }

    pub fn from_reader_with_capacity(
        input: &mut dyn Read,
        max_instructions: usize,
    ) -> Result<Program, ParseError> {
        let mut source = String::new();
        input
            .read_to_string(&mut source)
            .map_err(|e| ParseError::new(0, format!("error while reading program source: {}", e)))?;
        Program::from_source_with_capacity(&source, max_instructions)
    }

    pub fn from_source(source: &str) -> Result<Program, ParseError> {
        Program::from_source_with_capacity(source, DEFAULT_PROGRAM_CAPACITY)
    }

    pub fn from_source_with_capacity(source: &str, max_instructions: usize) -> Result<Program, ParseError> {
        let instructions = parser::parse_program(source, max_instructions)?;
        Ok(Program { instructions })
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
