//! # Error types

use thiserror::Error;

/// Everything that can go wrong while encoding or decoding a strip.
///
/// Decode failures name the absolute row they happened in. When end-of-line
/// codes are present in the stream, [`FaxError::InvalidCode`] and
/// [`FaxError::PrematureEol`] are recovered from internally by resynchronizing
/// on the next EOL; without EOLs they end the strip.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FaxError {
    /// The caller handed in parameters or buffers that make no sense
    #[error("invalid parameters: {0}")]
    Config(&'static str),
    /// Subsets of a strip have to be requested in order, without gaps
    #[error("subset out of sequence: expected row {expected}, got {got}")]
    Sequence {
        /// The row the codec was ready to process next
        expected: u32,
        /// The row the caller asked for
        got: u32,
    },
    /// The output buffer filled up before the strip was complete
    #[error("output buffer full after {written} bytes")]
    OutputFull {
        /// Bytes written into the current buffer before running out of room
        written: usize,
    },
    /// A bit pattern that is no valid code word, or one that would move
    /// past the end of the row
    #[error("invalid code word in row {row}")]
    InvalidCode {
        /// Absolute row index within the strip
        row: u32,
    },
    /// An end-of-line code showed up before the row was fully painted
    #[error("end of line inside row {row}")]
    PrematureEol {
        /// Absolute row index within the strip
        row: u32,
    },
    /// The input buffer ran dry in the middle of a row
    #[error("input exhausted in row {row}")]
    PrematureEof {
        /// Absolute row index within the strip
        row: u32,
    },
}

/// Alias for results that fail with [`FaxError`]
pub type FaxResult<T> = Result<T, FaxError>;
