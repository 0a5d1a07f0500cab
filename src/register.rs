//! The register file: a small fixed set of named [`Word`](crate::word::Word)
//! slots, addressed by a mnemonic.
//!
//! An older scheme derived a register's index from a polynomial hash of
//! its mnemonic so that an arbitrary 1..3 character mnemonic could be
//! used as an array index. That hash is not a value programs ever
//! observe, so this crate keeps the mnemonic as the key directly: a
//! fixed-size slot table plus a string lookup, rather than reproducing
//! the hash and its collision table.

use crate::word::Word;

/// Number of register slots. Kept larger than the eight named registers
/// so an arbitrary well-formed mnemonic still maps to a real, addressable
/// slot rather than being rejected outright.
pub const REGISTER_COUNT: usize = 21;

pub const EIP: &str = "EIP";
pub const ESP: &str = "ESP";
pub const EBP: &str = "EBP";
pub const EHM: &str = "EHM";
pub const ERV: &str = "ERV";
pub const R0: &str = "R0";
pub const R1: &str = "R1";
pub const R2: &str = "R2";

/// All mnemonics the engine gives initial semantics to, in slot order.
pub const NAMED_REGISTERS: [&str; 8] = [EIP, ESP, EBP, EHM, ERV, R0, R1, R2];

/// Maps a register mnemonic to its slot index.
///
/// The eight named registers get fixed, pairwise-distinct slots. Any
/// other well-formed mnemonic (uppercase
/// first character, 1..3 uppercase/digit characters) is accepted and
/// mapped deterministically so unused slots remain addressable, but such
/// registers carry no initial semantics.
pub fn index_of(mnemonic: &str) -> Option<usize> {
    let slot = match mnemonic {
        EIP => 0,
        ESP => 1,
        EBP => 2,
        EHM => 3,
        ERV => 4,
        R0 => 5,
        R1 => 6,
        R2 => 7,
        other => {
            // Deterministic fallback so two equal mnemonics always agree
            // on a slot, and the 8 named ones above never collide with it.
            let mut sum: usize = 0;
            for (i, c) in other.bytes().enumerate() {
                sum += (c as usize) * (other.len() - i);
            }
            8 + (sum % (REGISTER_COUNT - 8))
        }
    };
    Some(slot)
}

/// The register file: `REGISTER_COUNT` words, zero-initialized except for
/// the two stack-bound registers.
pub struct RegisterFile {
    slots: [Word; REGISTER_COUNT],
}

impl RegisterFile {
    /// Build a fresh register file: `EIP = 0`, `ESP = EHM = ram_size - 1`,
    /// `EBP = ERV = R0 = R1 = R2 = 0`, everything else `Int(0)`.
    pub fn new(ram_size: usize) -> RegisterFile {
        let mut slots = [Word::Int(0); REGISTER_COUNT];
        slots[index_of(ESP).unwrap()] = Word::Int(ram_size as i32 - 1);
        slots[index_of(EHM).unwrap()] = Word::Int(ram_size as i32 - 1);
        RegisterFile { slots }
    }

    pub fn get(&self, index: usize) -> &Word {
        &self.slots[index]
    }

    pub fn get_mut(&mut self, index: usize) -> &mut Word {
        &mut self.slots[index]
    }
}
