//! The state container: register file, RAM, and the halted flag.
//! Constructed exactly once per program and owned exclusively by the
//! [`crate::interpreter::Interpreter`] that runs it.

use crate::register::RegisterFile;
use crate::word::Word;

/// Fixed linear data memory, sized once at construction and never grown
/// afterward.
pub struct Ram {
    cells: Vec<Word>,
}

impl Ram {
    pub fn new(size: usize) -> Ram {
        Ram {
            cells: vec![Word::Int(0); size],
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, index: i32) -> Option<&Word> {
        usize::try_from(index).ok().and_then(|i| self.cells.get(i))
    }

    pub fn get_mut(&mut self, index: i32) -> Option<&mut Word> {
        usize::try_from(index)
            .ok()
            .and_then(move |i| self.cells.get_mut(i))
    }
}

/// Default RAM size, matching the reference implementation.
pub const DEFAULT_RAM_SIZE: usize = 8096;

/// Default maximum instruction count, matching the reference
/// implementation.
pub const DEFAULT_PROGRAM_CAPACITY: usize = 10_000;

/// Everything the engine mutates while running a program.
pub struct State {
    pub registers: RegisterFile,
    pub ram: Ram,
    pub halted: bool,
}

impl State {
    pub fn new(ram_size: usize) -> State {
        State {
            registers: RegisterFile::new(ram_size),
            ram: Ram::new(ram_size),
            halted: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ram_is_zero_initialized() {
        let ram = Ram::new(16);
        for i in 0..16 {
            assert_eq!(*ram.get(i).unwrap(), Word::Int(0));
        }
    }

    #[test]
    fn ram_rejects_out_of_range_indices() {
        let ram = Ram::new(16);
        assert!(ram.get(-1).is_none());
        assert!(ram.get(16).is_none());
    }

    #[test]
    fn state_starts_not_halted() {
        let state = State::new(DEFAULT_RAM_SIZE);
        assert!(!state.halted);
    }
}
