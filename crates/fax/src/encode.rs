//! Strip encoder for Group 3 and Group 4 coded streams.

use std::mem;

use crate::bits::BitWriter;
use crate::codes::{self, HORIZONTAL, PASS, VERTICAL};
use crate::color::Color;
use crate::error::{FaxError, FaxResult};
use crate::params::{Coding, FaxParams, RowTag};
use crate::raster::{find_b1_b2, line_changes_into, next_changes};

/// Encoder for one strip of bi-level image data.
///
/// The encoder consumes raster rows top to bottom, either in a single call
/// to [`FaxEncoder::encode`] or in consecutive calls to
/// [`FaxEncoder::encode_subset`], and appends the coded bytes to a caller
/// provided buffer.
pub struct FaxEncoder {
    width: u32,
    height: u32,
    params: FaxParams,
    state: Option<EncodeState>,
}

/// Coding position carried between subsets
struct EncodeState {
    next_y: u32,
    tag: RowTag,
    k: u32,
    reference: Vec<u32>,
    current: Vec<u32>,
    acc: u8,
    bit: u8,
    total_bytes: usize,
}

impl FaxEncoder {
    /// Create an encoder for a strip of `width` by `height` pixels
    pub fn new(width: u32, height: u32, params: FaxParams) -> FaxResult<Self> {
        if width == 0 {
            return Err(FaxError::Config("width must be at least 1"));
        }
        if height == 0 {
            return Err(FaxError::Config("height must be at least 1"));
        }
        Ok(FaxEncoder {
            width,
            height,
            params,
            state: None,
        })
    }

    /// Width of the strip in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the strip in rows
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The parameters this encoder was created with
    pub fn params(&self) -> &FaxParams {
        &self.params
    }

    /// Encode the whole strip in one call.
    ///
    /// `rows` holds `height` packed scanlines of [`FaxParams::row_stride`]
    /// bytes each. Returns the number of bytes written to `dst`.
    pub fn encode(&mut self, rows: &[u8], dst: &mut [u8]) -> FaxResult<usize> {
        let height = self.height;
        self.encode_subset(rows, 0, height, dst)
    }

    /// Encode the next `nrows` scanlines, starting at row `y`.
    ///
    /// Subsets have to be fed in order, starting at row 0. The coded bytes
    /// returned by consecutive calls concatenate into one valid stream;
    /// sub-byte leftovers are carried over internally and the stream is
    /// only completed together with the last row of the strip.
    ///
    /// Passing row 0 restarts the encoder, any later out-of-order subset
    /// fails with [`FaxError::Sequence`] and leaves the position untouched.
    pub fn encode_subset(
        &mut self,
        rows: &[u8],
        y: u32,
        nrows: u32,
        dst: &mut [u8],
    ) -> FaxResult<usize> {
        let stride = self.params.row_stride(self.width);
        if rows.len() != stride * nrows as usize {
            return Err(FaxError::Config("rows buffer does not match stride and row count"));
        }
        if y.checked_add(nrows).map_or(true, |end| end > self.height) {
            return Err(FaxError::Config("subset extends past the strip height"));
        }
        if y == 0 {
            self.state = Some(EncodeState {
                next_y: 0,
                tag: RowTag::OneD,
                k: self.params.k_factor() - 1,
                reference: Vec::new(),
                current: Vec::new(),
                acc: 0,
                bit: 0,
                total_bytes: 0,
            });
        }
        let mut st = match self.state.take() {
            Some(st) if st.next_y == y => st,
            Some(st) => {
                let expected = st.next_y;
                self.state = Some(st);
                return Err(FaxError::Sequence { expected, got: y });
            }
            None => return Err(FaxError::Sequence { expected: 0, got: y }),
        };
        log::debug!("encoding rows {}..{} of {}", y, y + nrows, self.height);
        let mut writer = BitWriter::resume(dst, st.acc, st.bit, self.params.fill_order);
        let last = y + nrows == self.height;
        encode_rows(&self.params, self.width, &mut st, &mut writer, rows, stride, last)?;
        let (len, acc, bit) = writer.suspend();
        st.acc = acc;
        st.bit = bit;
        st.total_bytes += len;
        st.next_y = y + nrows;
        if !last {
            self.state = Some(st);
        }
        Ok(len)
    }
}

fn encode_rows(
    params: &FaxParams,
    width: u32,
    st: &mut EncodeState,
    w: &mut BitWriter<'_>,
    rows: &[u8],
    stride: usize,
    last: bool,
) -> FaxResult<()> {
    let white_bit = params.bit_of(Color::White);
    for row in rows.chunks_exact(stride) {
        let tag = match params.coding {
            Coding::OneDimensional => RowTag::OneD,
            Coding::TwoDimensional => st.tag,
            Coding::Group4 => RowTag::TwoD,
        };
        if params.has_eol() {
            // the tag bit after the EOL announces the scheme of this row
            let announce = match params.coding {
                Coding::TwoDimensional => Some(tag),
                _ => None,
            };
            w.put_eol(params.fill_bits, announce)?;
        }
        line_changes_into(&mut st.current, row, width, white_bit);
        match tag {
            RowTag::OneD => encode_row_1d(w, &st.current, width)?,
            RowTag::TwoD => encode_row_2d(w, &st.current, &st.reference, width)?,
        }
        if params.coding == Coding::TwoDimensional {
            match tag {
                RowTag::OneD => st.tag = RowTag::TwoD,
                RowTag::TwoD => {
                    st.k -= 1;
                    if st.k == 0 {
                        st.tag = RowTag::OneD;
                        st.k = params.k_factor() - 1;
                    }
                }
            }
        }
        if !params.has_eol() {
            pad_row(w, params, st.total_bytes)?;
        }
        mem::swap(&mut st.reference, &mut st.current);
    }
    if last {
        if params.coding == Coding::Group4 {
            // EOFB
            w.put_eol(false, None)?;
            w.put_eol(false, None)?;
        }
        w.flush()?;
    }
    Ok(())
}

/// Pad to the row boundary used by EOL-less streams
fn pad_row(w: &mut BitWriter<'_>, params: &FaxParams, base: usize) -> FaxResult<()> {
    if params.word_align {
        let bits = (base + w.bytes_written()) as u64 * 8 + u64::from(w.pending_bits());
        let pad = ((16 - bits % 16) % 16) as u8;
        if pad > 0 {
            w.put_bits(0, pad)?;
        }
    } else if params.byte_align {
        let pad = (8 - w.pending_bits()) % 8;
        if pad > 0 {
            w.put_bits(0, pad)?;
        }
    }
    Ok(())
}

/// Code one row as alternating white and black runs
fn encode_row_1d(w: &mut BitWriter<'_>, changes: &[u32], width: u32) -> FaxResult<()> {
    let mut color = Color::White;
    let mut pos = 0;
    for &at in changes {
        put_run(w, color, at - pos)?;
        pos = at;
        color.invert();
    }
    put_run(w, color, width - pos)
}

/// Code one row against the changing elements of the previous row
fn encode_row_2d(
    w: &mut BitWriter<'_>,
    current: &[u32],
    reference: &[u32],
    width: u32,
) -> FaxResult<()> {
    let mut a0: i64 = -1;
    let mut color = Color::White;
    while a0 < i64::from(width) {
        let (a1, a2) = next_changes(current, a0, width);
        let (b1, b2) = find_b1_b2(reference, a0, color, width);
        if i64::from(b2) < i64::from(a1) {
            w.put_code(&PASS)?;
            a0 = i64::from(b2);
        } else {
            let delta = i64::from(a1) - i64::from(b1);
            if (-3..=3).contains(&delta) {
                w.put_code(&VERTICAL[(delta + 3) as usize])?;
                a0 = i64::from(a1);
                color.invert();
            } else {
                let start = a0.max(0) as u32;
                w.put_code(&HORIZONTAL)?;
                put_run(w, color, a1 - start)?;
                put_run(w, color.opposite(), a2 - a1)?;
                a0 = i64::from(a2);
            }
        }
    }
    Ok(())
}

/// Code a single run of `n` pixels, chaining make-up codes as needed
fn put_run(w: &mut BitWriter<'_>, color: Color, n: u32) -> FaxResult<()> {
    let mut n = n;
    while n > 2560 {
        w.put_code(codes::make_up(color, 2560))?;
        n -= 2560;
    }
    if n >= 64 {
        let make = n - n % 64;
        w.put_code(codes::make_up(color, make as u16))?;
        n %= 64;
    }
    w.put_code(codes::terminating(color, n as u16))
}
