#![warn(missing_docs)]
//! # CCITT Group 3 / Group 4 fax coding
//!
//! Run-length and two-dimensional coding of bi-level images per
//! ITU-T Recommendation T.4 (07/03) <https://www.itu.int/rec/T-REC-T.4-200307-I/en>
//! and ITU-T Recommendation T.6 (11/88) <https://www.itu.int/rec/T-REC-T.6-198811-I/en>.
//!
//! [`FaxEncoder`] turns packed scanlines into a coded strip and
//! [`FaxDecoder`] reverses it, whole-strip or row subset by row subset
//! with explicit state in between. [`FaxParams`] selects the coding
//! flavor (Group 3 one-dimensional, Group 3 mixed, Group 4) and the
//! stream framing around it.
//!
//! ```
//! use fax_g3g4::{FaxDecoder, FaxEncoder, FaxParams};
//!
//! # fn main() -> fax_g3g4::FaxResult<()> {
//! let params = FaxParams::default(); // Group 4
//! let rows = [0b0000_1111, 0b0001_1111];
//!
//! let mut coded = [0u8; 64];
//! let mut encoder = FaxEncoder::new(8, 2, params.clone())?;
//! let len = encoder.encode(&rows, &mut coded)?;
//!
//! let mut back = [0u8; 2];
//! let mut decoder = FaxDecoder::new(8, 2, params)?;
//! decoder.decode(&coded[..len], &mut back)?;
//! assert_eq!(back, rows);
//! # Ok(())
//! # }
//! ```

pub mod bits;
pub mod codes;
mod color;
mod decode;
mod encode;
mod error;
mod params;
pub mod pbm;
mod raster;
pub mod tables;

pub use bits::FillOrder;
pub use color::Color;
pub use decode::FaxDecoder;
pub use encode::FaxEncoder;
pub use error::{FaxError, FaxResult};
pub use params::{Coding, FaxParams, Photometric, ResolutionUnit, RowTag};
