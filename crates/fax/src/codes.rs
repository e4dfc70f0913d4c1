//! # Canonical code words
//!
//! The run-length alphabets of ITU-T T.4 §2 (terminating codes, make-up
//! codes and the extended make-up codes shared by both colors), the
//! two-dimensional mode codes of T.4 §4.2 / T.6 §2.2, and the uncompressed
//! mode alphabet of T.4 §4.2.1.3.5.
//!
//! Each table also carries the patterns a decoder must reject: the 12-bit
//! EOL code and the "too many leading zeros" prefixes that no valid code
//! word starts with. Together these make every table exhaustive, which is
//! what lets [`crate::tables`] compile them into total transition tables.

use crate::color::Color;

/// The 12-bit end-of-line pattern, eleven zeros and a one
pub const EOL_CODE: u16 = 0b0000_0000_0001;
/// Bit length of [`EOL_CODE`]
pub const EOL_LEN: u8 = 12;

/// A single code word and its decoded meaning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Code<T> {
    /// Number of significant bits, between 1 and 13
    pub len: u8,
    /// The code word, MSB-first in the low `len` bits
    pub bits: u16,
    /// What decoding this code word means
    pub sym: T,
}

/// Decoded meaning of a run-length code word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunSym {
    /// A pixel run. Values below 64 terminate the run, larger values
    /// (all multiples of 64) add up with the codes that follow.
    Run(u16),
    /// The code word was an EOL
    Eol,
    /// No valid code word starts with this pattern
    Invalid,
}

/// A two-dimensional coding mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Skip past `b2` without changing color
    Pass,
    /// Two explicit runs follow
    Horizontal,
    /// The next change lies this many pixels right (positive) or left
    /// (negative) of `b1`
    Vertical(i8),
    /// Switch to uncompressed mode
    Uncompressed,
    /// No valid mode code starts with this pattern
    Error,
    /// An EOL inside a two-dimensionally coded row
    ErrorAtEol,
}

/// One step of the uncompressed mode alphabet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uncomp {
    /// `n - 1` white pixels followed by one black pixel (1 <= n <= 5)
    Run(u8),
    /// Five white pixels, stay in uncompressed mode
    Skip,
    /// `k` white pixels (0 <= k <= 4), then leave uncompressed mode; the
    /// bit after this code selects the color of the following run
    Exit(u8),
    /// An EOL pattern inside uncompressed mode
    Eol,
    /// No valid uncompressed code starts with this pattern
    Invalid,
}

const fn run(len: u8, bits: u16, n: u16) -> Code<RunSym> {
    Code {
        len,
        bits,
        sym: RunSym::Run(n),
    }
}

const fn stop(len: u8, bits: u16, sym: RunSym) -> Code<RunSym> {
    Code { len, bits, sym }
}

/// White run-length codes.
///
/// Layout: indices `0..=63` hold the terminating codes in run order,
/// `64..=90` the make-up codes for 64 to 1728, `91..=103` the extended
/// make-up codes for 1792 to 2560, and the rest the EOL/invalid patterns.
pub static WHITE_CODES: &[Code<RunSym>] = &[
    run(8, 0b00110101, 0),
    run(6, 0b000111, 1),
    run(4, 0b0111, 2),
    run(4, 0b1000, 3),
    run(4, 0b1011, 4),
    run(4, 0b1100, 5),
    run(4, 0b1110, 6),
    run(4, 0b1111, 7),
    run(5, 0b10011, 8),
    run(5, 0b10100, 9),
    run(5, 0b00111, 10),
    run(5, 0b01000, 11),
    run(6, 0b001000, 12),
    run(6, 0b000011, 13),
    run(6, 0b110100, 14),
    run(6, 0b110101, 15),
    run(6, 0b101010, 16),
    run(6, 0b101011, 17),
    run(7, 0b0100111, 18),
    run(7, 0b0001100, 19),
    run(7, 0b0001000, 20),
    run(7, 0b0010111, 21),
    run(7, 0b0000011, 22),
    run(7, 0b0000100, 23),
    run(7, 0b0101000, 24),
    run(7, 0b0101011, 25),
    run(7, 0b0010011, 26),
    run(7, 0b0100100, 27),
    run(7, 0b0011000, 28),
    run(8, 0b00000010, 29),
    run(8, 0b00000011, 30),
    run(8, 0b00011010, 31),
    run(8, 0b00011011, 32),
    run(8, 0b00010010, 33),
    run(8, 0b00010011, 34),
    run(8, 0b00010100, 35),
    run(8, 0b00010101, 36),
    run(8, 0b00010110, 37),
    run(8, 0b00010111, 38),
    run(8, 0b00101000, 39),
    run(8, 0b00101001, 40),
    run(8, 0b00101010, 41),
    run(8, 0b00101011, 42),
    run(8, 0b00101100, 43),
    run(8, 0b00101101, 44),
    run(8, 0b00000100, 45),
    run(8, 0b00000101, 46),
    run(8, 0b00001010, 47),
    run(8, 0b00001011, 48),
    run(8, 0b01010010, 49),
    run(8, 0b01010011, 50),
    run(8, 0b01010100, 51),
    run(8, 0b01010101, 52),
    run(8, 0b00100100, 53),
    run(8, 0b00100101, 54),
    run(8, 0b01011000, 55),
    run(8, 0b01011001, 56),
    run(8, 0b01011010, 57),
    run(8, 0b01011011, 58),
    run(8, 0b01001010, 59),
    run(8, 0b01001011, 60),
    run(8, 0b00110010, 61),
    run(8, 0b00110011, 62),
    run(8, 0b00110100, 63),
    // make-up codes
    run(5, 0b11011, 64),
    run(5, 0b10010, 128),
    run(6, 0b010111, 192),
    run(7, 0b0110111, 256),
    run(8, 0b00110110, 320),
    run(8, 0b00110111, 384),
    run(8, 0b01100100, 448),
    run(8, 0b01100101, 512),
    run(8, 0b01101000, 576),
    run(8, 0b01100111, 640),
    run(9, 0b011001100, 704),
    run(9, 0b011001101, 768),
    run(9, 0b011010010, 832),
    run(9, 0b011010011, 896),
    run(9, 0b011010100, 960),
    run(9, 0b011010101, 1024),
    run(9, 0b011010110, 1088),
    run(9, 0b011010111, 1152),
    run(9, 0b011011000, 1216),
    run(9, 0b011011001, 1280),
    run(9, 0b011011010, 1344),
    run(9, 0b011011011, 1408),
    run(9, 0b010011000, 1472),
    run(9, 0b010011001, 1536),
    run(9, 0b010011010, 1600),
    run(6, 0b011000, 1664),
    run(9, 0b010011011, 1728),
    // extended make-up codes, shared with the black table
    run(11, 0b00000001000, 1792),
    run(11, 0b00000001100, 1856),
    run(11, 0b00000001101, 1920),
    run(12, 0b000000010010, 1984),
    run(12, 0b000000010011, 2048),
    run(12, 0b000000010100, 2112),
    run(12, 0b000000010101, 2176),
    run(12, 0b000000010110, 2240),
    run(12, 0b000000010111, 2304),
    run(12, 0b000000011100, 2368),
    run(12, 0b000000011101, 2432),
    run(12, 0b000000011110, 2496),
    run(12, 0b000000011111, 2560),
    // EOL and the zero-run prefixes no code word starts with
    stop(12, 0b000000000001, RunSym::Eol),
    stop(9, 0b000000001, RunSym::Invalid),
    stop(10, 0b0000000001, RunSym::Invalid),
    stop(11, 0b00000000001, RunSym::Invalid),
    stop(12, 0b000000000000, RunSym::Invalid),
];

/// Black run-length codes, laid out like [`WHITE_CODES`]
pub static BLACK_CODES: &[Code<RunSym>] = &[
    run(10, 0b0000110111, 0),
    run(3, 0b010, 1),
    run(2, 0b11, 2),
    run(2, 0b10, 3),
    run(3, 0b011, 4),
    run(4, 0b0011, 5),
    run(4, 0b0010, 6),
    run(5, 0b00011, 7),
    run(6, 0b000101, 8),
    run(6, 0b000100, 9),
    run(7, 0b0000100, 10),
    run(7, 0b0000101, 11),
    run(7, 0b0000111, 12),
    run(8, 0b00000100, 13),
    run(8, 0b00000111, 14),
    run(9, 0b000011000, 15),
    run(10, 0b0000010111, 16),
    run(10, 0b0000011000, 17),
    run(10, 0b0000001000, 18),
    run(11, 0b00001100111, 19),
    run(11, 0b00001101000, 20),
    run(11, 0b00001101100, 21),
    run(11, 0b00000110111, 22),
    run(11, 0b00000101000, 23),
    run(11, 0b00000010111, 24),
    run(11, 0b00000011000, 25),
    run(12, 0b000011001010, 26),
    run(12, 0b000011001011, 27),
    run(12, 0b000011001100, 28),
    run(12, 0b000011001101, 29),
    run(12, 0b000001101000, 30),
    run(12, 0b000001101001, 31),
    run(12, 0b000001101010, 32),
    run(12, 0b000001101011, 33),
    run(12, 0b000011010010, 34),
    run(12, 0b000011010011, 35),
    run(12, 0b000011010100, 36),
    run(12, 0b000011010101, 37),
    run(12, 0b000011010110, 38),
    run(12, 0b000011010111, 39),
    run(12, 0b000001101100, 40),
    run(12, 0b000001101101, 41),
    run(12, 0b000011011010, 42),
    run(12, 0b000011011011, 43),
    run(12, 0b000001010100, 44),
    run(12, 0b000001010101, 45),
    run(12, 0b000001010110, 46),
    run(12, 0b000001010111, 47),
    run(12, 0b000001100100, 48),
    run(12, 0b000001100101, 49),
    run(12, 0b000001010010, 50),
    run(12, 0b000001010011, 51),
    run(12, 0b000000100100, 52),
    run(12, 0b000000110111, 53),
    run(12, 0b000000111000, 54),
    run(12, 0b000000100111, 55),
    run(12, 0b000000101000, 56),
    run(12, 0b000001011000, 57),
    run(12, 0b000001011001, 58),
    run(12, 0b000000101011, 59),
    run(12, 0b000000101100, 60),
    run(12, 0b000001011010, 61),
    run(12, 0b000001100110, 62),
    run(12, 0b000001100111, 63),
    // make-up codes
    run(10, 0b0000001111, 64),
    run(12, 0b000011001000, 128),
    run(12, 0b000011001001, 192),
    run(12, 0b000001011011, 256),
    run(12, 0b000000110011, 320),
    run(12, 0b000000110100, 384),
    run(12, 0b000000110101, 448),
    run(13, 0b0000001101100, 512),
    run(13, 0b0000001101101, 576),
    run(13, 0b0000001001010, 640),
    run(13, 0b0000001001011, 704),
    run(13, 0b0000001001100, 768),
    run(13, 0b0000001001101, 832),
    run(13, 0b0000001110010, 896),
    run(13, 0b0000001110011, 960),
    run(13, 0b0000001110100, 1024),
    run(13, 0b0000001110101, 1088),
    run(13, 0b0000001110110, 1152),
    run(13, 0b0000001110111, 1216),
    run(13, 0b0000001010010, 1280),
    run(13, 0b0000001010011, 1344),
    run(13, 0b0000001010100, 1408),
    run(13, 0b0000001010101, 1472),
    run(13, 0b0000001011010, 1536),
    run(13, 0b0000001011011, 1600),
    run(13, 0b0000001100100, 1664),
    run(13, 0b0000001100101, 1728),
    // extended make-up codes, shared with the white table
    run(11, 0b00000001000, 1792),
    run(11, 0b00000001100, 1856),
    run(11, 0b00000001101, 1920),
    run(12, 0b000000010010, 1984),
    run(12, 0b000000010011, 2048),
    run(12, 0b000000010100, 2112),
    run(12, 0b000000010101, 2176),
    run(12, 0b000000010110, 2240),
    run(12, 0b000000010111, 2304),
    run(12, 0b000000011100, 2368),
    run(12, 0b000000011101, 2432),
    run(12, 0b000000011110, 2496),
    run(12, 0b000000011111, 2560),
    // EOL and the zero-run prefixes no code word starts with
    stop(12, 0b000000000001, RunSym::Eol),
    stop(9, 0b000000001, RunSym::Invalid),
    stop(10, 0b0000000001, RunSym::Invalid),
    stop(11, 0b00000000001, RunSym::Invalid),
    stop(12, 0b000000000000, RunSym::Invalid),
];

/// Vertical mode, next change directly below `b1`
pub const V0: Code<Mode> = Code {
    len: 1,
    bits: 0b1,
    sym: Mode::Vertical(0),
};
/// Vertical mode, one pixel right of `b1`
pub const VR1: Code<Mode> = Code {
    len: 3,
    bits: 0b011,
    sym: Mode::Vertical(1),
};
/// Vertical mode, two pixels right of `b1`
pub const VR2: Code<Mode> = Code {
    len: 6,
    bits: 0b000011,
    sym: Mode::Vertical(2),
};
/// Vertical mode, three pixels right of `b1`
pub const VR3: Code<Mode> = Code {
    len: 7,
    bits: 0b0000011,
    sym: Mode::Vertical(3),
};
/// Vertical mode, one pixel left of `b1`
pub const VL1: Code<Mode> = Code {
    len: 3,
    bits: 0b010,
    sym: Mode::Vertical(-1),
};
/// Vertical mode, two pixels left of `b1`
pub const VL2: Code<Mode> = Code {
    len: 6,
    bits: 0b000010,
    sym: Mode::Vertical(-2),
};
/// Vertical mode, three pixels left of `b1`
pub const VL3: Code<Mode> = Code {
    len: 7,
    bits: 0b0000010,
    sym: Mode::Vertical(-3),
};
/// Horizontal mode
pub const HORIZONTAL: Code<Mode> = Code {
    len: 3,
    bits: 0b001,
    sym: Mode::Horizontal,
};
/// Pass mode
pub const PASS: Code<Mode> = Code {
    len: 4,
    bits: 0b0001,
    sym: Mode::Pass,
};

/// The vertical mode codes, indexed by offset plus three
pub const VERTICAL: [Code<Mode>; 7] = [VL3, VL2, VL1, V0, VR1, VR2, VR3];

const fn mode(len: u8, bits: u16, sym: Mode) -> Code<Mode> {
    Code { len, bits, sym }
}

/// Two-dimensional mode codes.
///
/// Of the eight `0000001xxx` extension codes only the uncompressed entry is
/// in use; the other seven, like the bare zero-run prefixes, decode as
/// errors.
pub static MODE_CODES: &[Code<Mode>] = &[
    V0,
    VR1,
    VR2,
    VR3,
    VL1,
    VL2,
    VL3,
    HORIZONTAL,
    PASS,
    mode(10, 0b0000001111, Mode::Uncompressed),
    mode(10, 0b0000001000, Mode::Error),
    mode(10, 0b0000001001, Mode::Error),
    mode(10, 0b0000001010, Mode::Error),
    mode(10, 0b0000001011, Mode::Error),
    mode(10, 0b0000001100, Mode::Error),
    mode(10, 0b0000001101, Mode::Error),
    mode(10, 0b0000001110, Mode::Error),
    mode(8, 0b00000001, Mode::Error),
    mode(9, 0b000000001, Mode::Error),
    mode(10, 0b0000000001, Mode::Error),
    mode(11, 0b00000000001, Mode::Error),
    mode(12, 0b000000000001, Mode::ErrorAtEol),
    mode(12, 0b000000000000, Mode::Error),
];

const fn unc(len: u8, bits: u16, sym: Uncomp) -> Code<Uncomp> {
    Code { len, bits, sym }
}

/// Uncompressed mode codes
pub static UNCOMPRESSED_CODES: &[Code<Uncomp>] = &[
    unc(1, 0b1, Uncomp::Run(1)),
    unc(2, 0b01, Uncomp::Run(2)),
    unc(3, 0b001, Uncomp::Run(3)),
    unc(4, 0b0001, Uncomp::Run(4)),
    unc(5, 0b00001, Uncomp::Run(5)),
    unc(6, 0b000001, Uncomp::Skip),
    unc(7, 0b0000001, Uncomp::Exit(0)),
    unc(8, 0b00000001, Uncomp::Exit(1)),
    unc(9, 0b000000001, Uncomp::Exit(2)),
    unc(10, 0b0000000001, Uncomp::Exit(3)),
    unc(11, 0b00000000001, Uncomp::Exit(4)),
    unc(12, 0b000000000001, Uncomp::Eol),
    unc(12, 0b000000000000, Uncomp::Invalid),
];

/// All run-length codes of one color
pub fn run_codes(color: Color) -> &'static [Code<RunSym>] {
    match color {
        Color::White => WHITE_CODES,
        Color::Black => BLACK_CODES,
    }
}

/// The terminating code for a run of `n < 64` pixels
pub fn terminating(color: Color, n: u16) -> &'static Code<RunSym> {
    debug_assert!(n < 64);
    let code = &run_codes(color)[usize::from(n)];
    debug_assert_eq!(code.sym, RunSym::Run(n));
    code
}

/// The make-up code for `n` pixels, a multiple of 64 up to 2560
pub fn make_up(color: Color, n: u16) -> &'static Code<RunSym> {
    debug_assert!(n >= 64 && n <= 2560 && n % 64 == 0);
    let code = &run_codes(color)[usize::from(n / 64) + 63];
    debug_assert_eq!(code.sym, RunSym::Run(n));
    code
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_prefix<T>(a: &Code<T>, b: &Code<T>) -> bool {
        a.len <= b.len && (b.bits >> (b.len - a.len)) == a.bits
    }

    fn assert_prefix_free<T>(codes: &[Code<T>]) {
        for (i, a) in codes.iter().enumerate() {
            for (j, b) in codes.iter().enumerate() {
                if i != j {
                    assert!(
                        !is_prefix(a, b),
                        "{:0w$b} is a prefix of {:0v$b}",
                        a.bits,
                        b.bits,
                        w = a.len as usize,
                        v = b.len as usize
                    );
                }
            }
        }
    }

    #[test]
    fn test_tables_are_prefix_free() {
        assert_prefix_free(WHITE_CODES);
        assert_prefix_free(BLACK_CODES);
        assert_prefix_free(MODE_CODES);
        assert_prefix_free(UNCOMPRESSED_CODES);
    }

    #[test]
    fn test_table_layout() {
        assert_eq!(WHITE_CODES.len(), 109);
        assert_eq!(BLACK_CODES.len(), 109);
        for n in 0..64 {
            assert_eq!(terminating(Color::White, n).sym, RunSym::Run(n));
            assert_eq!(terminating(Color::Black, n).sym, RunSym::Run(n));
        }
        for k in 1..=40 {
            assert_eq!(make_up(Color::White, k * 64).sym, RunSym::Run(k * 64));
            assert_eq!(make_up(Color::Black, k * 64).sym, RunSym::Run(k * 64));
        }
    }

    #[test]
    fn test_well_known_codes() {
        assert_eq!(terminating(Color::White, 4).bits, 0b1011);
        assert_eq!(terminating(Color::Black, 4).bits, 0b011);
        assert_eq!(make_up(Color::White, 1728).bits, 0b010011011);
        assert_eq!(make_up(Color::Black, 64).bits, 0b0000001111);
        // the extension region is color independent
        for k in 28..=40 {
            assert_eq!(make_up(Color::White, k * 64), make_up(Color::Black, k * 64));
        }
        assert_eq!(VERTICAL[3], V0);
        assert_eq!(VERTICAL[0].sym, Mode::Vertical(-3));
        assert_eq!(VERTICAL[6].sym, Mode::Vertical(3));
    }
}
