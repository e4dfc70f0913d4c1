//! # Compiled decode tables
//!
//! The code tables in [`crate::codes`] are compiled, once per process, into
//! byte-at-a-time transition tables: one cell per `(state, byte)` pair. The
//! first eight states stand for the eight bit offsets a code word can start
//! at inside a byte; every further state is a code-word prefix that ran past
//! a byte boundary. Looking up a cell either completes a code word (and says
//! at which bit offset the next one starts) or names the state to continue
//! in with the next byte.
//!
//! Compilation walks every state against every byte value, bit by bit,
//! matching the accumulated prefix against the code table after each bit.
//! New prefix states are discovered on the way and deduplicated by prefix
//! value and length. Because every table in [`crate::codes`] is exhaustive,
//! the walk always terminates; a table that is not canonical would blow the
//! state or code-length limits, which is a programming error and panics.

use once_cell::sync::Lazy;

use crate::bits::{BitReader, EndOfInput};
use crate::codes::{self, Code, Mode, RunSym, Uncomp};
use crate::color::Color;

/// Code words never have more bits than the longest black make-up code
const MAX_CODE_LEN: u8 = 13;
/// Hard cap on states per table; the real tables stay well below this
const MAX_STATES: usize = 256;

/// One transition cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<T> {
    /// A code word is complete. The next one starts `at` bits into the
    /// current byte; 0 means the byte is used up.
    Done {
        /// Decoded meaning of the completed code word
        sym: T,
        /// Bit offset of the next code word within the current byte
        at: u8,
    },
    /// The byte ended inside a code word; continue with the next byte
    Incomplete {
        /// State representing the accumulated prefix
        state: u16,
    },
}

/// A compiled transition table
pub struct Table<T> {
    cells: Vec<Step<T>>,
}

#[derive(Clone, Copy)]
struct Prefix {
    off: u8,
    len: u8,
    bits: u16,
}

fn find_code<T: Copy>(codes: &[Code<T>], len: u8, bits: u16) -> Option<T> {
    codes
        .iter()
        .find(|c| c.len == len && c.bits == bits)
        .map(|c| c.sym)
}

fn intern(states: &mut Vec<Prefix>, len: u8, bits: u16, name: &str) -> u16 {
    if let Some(id) = states[8..]
        .iter()
        .position(|s| s.len == len && s.bits == bits)
    {
        return (id + 8) as u16;
    }
    if states.len() == MAX_STATES {
        panic!("{} code table is not canonical: too many decoder states", name);
    }
    states.push(Prefix { off: 0, len, bits });
    (states.len() - 1) as u16
}

impl<T: Copy> Table<T> {
    fn compile(codes: &[Code<T>], name: &str) -> Table<T> {
        let mut states: Vec<Prefix> = (0..8)
            .map(|off| Prefix {
                off,
                len: 0,
                bits: 0,
            })
            .collect();
        let mut cells = Vec::with_capacity(64 * 256);
        let mut si = 0;
        while si < states.len() {
            let state = states[si];
            for byte in 0..=255u8 {
                let mut len = state.len;
                let mut bits = u32::from(state.bits);
                let mut step = None;
                for k in state.off..8 {
                    bits = (bits << 1) | u32::from((byte >> (7 - k)) & 1);
                    len += 1;
                    if len > MAX_CODE_LEN {
                        panic!("{} code table is not canonical: no code word matches", name);
                    }
                    if let Some(sym) = find_code(codes, len, bits as u16) {
                        step = Some(Step::Done {
                            sym,
                            at: (k + 1) % 8,
                        });
                        break;
                    }
                }
                cells.push(step.unwrap_or_else(|| Step::Incomplete {
                    state: intern(&mut states, len, bits as u16, name),
                }));
            }
            si += 1;
        }
        Table { cells }
    }

    /// Look up the transition for `byte` in `state`
    pub fn step(&self, state: u16, byte: u8) -> Step<T> {
        self.cells[usize::from(state) * 256 + usize::from(byte)]
    }

    /// Consume one code word from the reader and decode it.
    ///
    /// Picks up at the reader's current bit offset and leaves the reader
    /// on the first bit after the code word.
    pub fn drive(&self, reader: &mut BitReader<'_>) -> Result<T, EndOfInput> {
        let mut state = u16::from(reader.bit_offset());
        if state == 0 {
            reader.fetch()?;
        }
        loop {
            match self.step(state, reader.current()) {
                Step::Done { sym, at } => {
                    reader.seek_bit(at);
                    return Ok(sym);
                }
                Step::Incomplete { state: next } => {
                    reader.fetch()?;
                    state = next;
                }
            }
        }
    }
}

/// The four compiled tables a decoder needs
pub struct DecodeTables {
    /// White run lengths
    pub white: Table<RunSym>,
    /// Black run lengths
    pub black: Table<RunSym>,
    /// Two-dimensional mode codes
    pub mode: Table<Mode>,
    /// Uncompressed mode codes
    pub uncomp: Table<Uncomp>,
}

impl DecodeTables {
    fn build() -> Self {
        DecodeTables {
            white: Table::compile(codes::WHITE_CODES, "white"),
            black: Table::compile(codes::BLACK_CODES, "black"),
            mode: Table::compile(codes::MODE_CODES, "mode"),
            uncomp: Table::compile(codes::UNCOMPRESSED_CODES, "uncompressed"),
        }
    }

    /// The run-length table for one color
    pub fn run(&self, color: Color) -> &Table<RunSym> {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }
}

static TABLES: Lazy<DecodeTables> = Lazy::new(DecodeTables::build);

/// The compiled tables, built on first use
pub fn decode_tables() -> &'static DecodeTables {
    &TABLES
}
