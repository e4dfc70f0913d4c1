//! Strip decoder for Group 3 and Group 4 coded streams.

use std::mem;

use crate::bits::BitReader;
use crate::codes::{Mode, RunSym, Uncomp};
use crate::color::Color;
use crate::error::{FaxError, FaxResult};
use crate::params::{Coding, FaxParams, RowTag};
use crate::raster::{fill_span, find_b1_b2, push_change};
use crate::tables::{decode_tables, DecodeTables, Table};

/// Decoder for one strip of coded image data.
///
/// The decoder produces raster rows top to bottom, either in a single call
/// to [`FaxDecoder::decode`] or in consecutive calls to
/// [`FaxDecoder::decode_subset`], painting into a caller provided buffer.
///
/// Damaged rows in streams with EOL framing are skipped up to the next
/// EOL code and keep whatever prefix was already painted; errors in
/// streams without EOLs end the strip.
pub struct FaxDecoder {
    width: u32,
    height: u32,
    params: FaxParams,
    state: Option<DecodeState>,
}

/// Coding position carried between subsets
struct DecodeState {
    next_y: u32,
    pos: usize,
    cur: u8,
    bit: u8,
    tag: RowTag,
    k: u32,
    pending_eol: bool,
    reference: Vec<u32>,
    current: Vec<u32>,
}

impl FaxDecoder {
    /// Create a decoder for a strip of `width` by `height` pixels
    pub fn new(width: u32, height: u32, params: FaxParams) -> FaxResult<Self> {
        if width == 0 {
            return Err(FaxError::Config("width must be at least 1"));
        }
        if height == 0 {
            return Err(FaxError::Config("height must be at least 1"));
        }
        Ok(FaxDecoder {
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

    /// The parameters this decoder was created with
    pub fn params(&self) -> &FaxParams {
        &self.params
    }

    /// Decode the whole strip in one call.
    ///
    /// `dst` receives `height` packed scanlines of
    /// [`FaxParams::row_stride`] bytes each and is zeroed first.
    pub fn decode(&mut self, src: &[u8], dst: &mut [u8]) -> FaxResult<()> {
        let height = self.height;
        self.decode_subset(src, 0, height, dst)
    }

    /// Decode the next `nrows` scanlines, starting at row `y`.
    ///
    /// `src` is the complete coded strip on every call; the decoder keeps
    /// its bit position between calls. Subsets have to be fed in order,
    /// starting at row 0, which also restarts a decoder mid-strip. An
    /// out-of-order subset fails with [`FaxError::Sequence`] and leaves
    /// the position untouched.
    pub fn decode_subset(
        &mut self,
        src: &[u8],
        y: u32,
        nrows: u32,
        dst: &mut [u8],
    ) -> FaxResult<()> {
        let stride = self.params.row_stride(self.width);
        if dst.len() != stride * nrows as usize {
            return Err(FaxError::Config("dst buffer does not match stride and row count"));
        }
        if y.checked_add(nrows).map_or(true, |end| end > self.height) {
            return Err(FaxError::Config("subset extends past the strip height"));
        }
        for b in dst.iter_mut() {
            *b = 0;
        }
        if y == 0 {
            self.state = Some(DecodeState {
                next_y: 0,
                pos: 0,
                cur: 0,
                bit: 0,
                tag: RowTag::OneD,
                k: self.params.k_factor() - 1,
                pending_eol: false,
                reference: Vec::new(),
                current: Vec::new(),
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
        log::debug!("decoding rows {}..{} of {}", y, y + nrows, self.height);
        let mut reader = BitReader::resume(src, st.pos, st.cur, st.bit, self.params.fill_order);
        decode_rows(&self.params, self.width, &mut st, &mut reader, dst, stride, y)?;
        let (pos, cur, bit) = reader.suspend();
        st.pos = pos;
        st.cur = cur;
        st.bit = bit;
        st.next_y = y + nrows;
        if st.next_y < self.height {
            self.state = Some(st);
        }
        Ok(())
    }
}

fn decode_rows(
    params: &FaxParams,
    width: u32,
    st: &mut DecodeState,
    r: &mut BitReader<'_>,
    dst: &mut [u8],
    stride: usize,
    y: u32,
) -> FaxResult<()> {
    let tables = decode_tables();
    let on = params.on_color();
    for (i, out) in dst.chunks_exact_mut(stride).enumerate() {
        let row_y = y + i as u32;
        let tag = if params.has_eol() {
            if st.pending_eol {
                st.pending_eol = false;
            } else if r.skip_to_eol(0).is_err() {
                return Err(FaxError::PrematureEof { row: row_y });
            }
            if params.coding == Coding::TwoDimensional {
                // the bit after the EOL announces the scheme of this row
                match r.next_bit() {
                    Ok(1) => RowTag::OneD,
                    Ok(_) => RowTag::TwoD,
                    Err(_) => return Err(FaxError::PrematureEof { row: row_y }),
                }
            } else {
                RowTag::OneD
            }
        } else {
            if params.word_align {
                r.align_word();
            } else if params.byte_align {
                r.align_byte();
            }
            match params.coding {
                Coding::OneDimensional => RowTag::OneD,
                Coding::TwoDimensional => st.tag,
                Coding::Group4 => RowTag::TwoD,
            }
        };
        let outcome = match tag {
            RowTag::OneD => decode_row_1d(r, tables, out, &mut st.current, width, on, row_y),
            RowTag::TwoD => decode_row_2d(
                r,
                tables,
                out,
                &mut st.current,
                &st.reference,
                width,
                on,
                row_y,
            ),
        };
        if let Err(err) = outcome {
            let recoverable = params.has_eol()
                && matches!(
                    err,
                    FaxError::InvalidCode { .. } | FaxError::PrematureEol { .. }
                );
            if !recoverable {
                return Err(err);
            }
            log::warn!("resynchronizing after damaged row {}: {}", row_y, err);
            // a mid-row EOL was already consumed by the row machine, a bad
            // code still needs the scan for the next EOL
            if matches!(err, FaxError::InvalidCode { .. }) {
                if r.skip_to_eol(0).is_err() {
                    return Err(FaxError::PrematureEof { row: row_y });
                }
            }
            st.pending_eol = true;
        }
        if !params.has_eol() && params.coding == Coding::TwoDimensional {
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
        // the decoded row, complete or not, is the reference for the next
        mem::swap(&mut st.reference, &mut st.current);
    }
    Ok(())
}

/// Read one full run, accumulating make-up codes until a terminating code
fn read_run(
    r: &mut BitReader<'_>,
    table: &Table<RunSym>,
    limit: u32,
    row: u32,
) -> FaxResult<u32> {
    let mut total: u32 = 0;
    loop {
        match table.drive(r) {
            Ok(RunSym::Run(n)) => {
                total += u32::from(n);
                if total > limit {
                    return Err(FaxError::InvalidCode { row });
                }
                if n < 64 {
                    return Ok(total);
                }
            }
            Ok(RunSym::Eol) => return Err(FaxError::PrematureEol { row }),
            Ok(RunSym::Invalid) => return Err(FaxError::InvalidCode { row }),
            Err(_) => return Err(FaxError::PrematureEof { row }),
        }
    }
}

fn decode_row_1d(
    r: &mut BitReader<'_>,
    tables: &DecodeTables,
    out: &mut [u8],
    changes: &mut Vec<u32>,
    width: u32,
    on: Color,
    row: u32,
) -> FaxResult<()> {
    changes.clear();
    let mut pos = 0;
    let mut color = Color::White;
    while pos < width {
        let run = read_run(r, tables.run(color), width - pos, row)?;
        if color == on && run > 0 {
            fill_span(out, pos, run);
        }
        pos += run;
        if pos < width {
            push_change(changes, pos);
        }
        color.invert();
    }
    Ok(())
}

fn decode_row_2d(
    r: &mut BitReader<'_>,
    tables: &DecodeTables,
    out: &mut [u8],
    changes: &mut Vec<u32>,
    reference: &[u32],
    width: u32,
    on: Color,
    row: u32,
) -> FaxResult<()> {
    changes.clear();
    let mut a0: i64 = -1;
    let mut color = Color::White;
    while a0 < i64::from(width) {
        let mode = match tables.mode.drive(r) {
            Ok(mode) => mode,
            Err(_) => return Err(FaxError::PrematureEof { row }),
        };
        match mode {
            Mode::Pass => {
                let (_, b2) = find_b1_b2(reference, a0, color, width);
                let start = a0.max(0) as u32;
                if color == on && b2 > start {
                    fill_span(out, start, b2 - start);
                }
                a0 = i64::from(b2);
            }
            Mode::Vertical(d) => {
                let (b1, _) = find_b1_b2(reference, a0, color, width);
                let a1 = i64::from(b1) + i64::from(d);
                if a1 <= a0 || a1 > i64::from(width) {
                    return Err(FaxError::InvalidCode { row });
                }
                let start = a0.max(0) as u32;
                let a1 = a1 as u32;
                if color == on && a1 > start {
                    fill_span(out, start, a1 - start);
                }
                if a1 < width {
                    push_change(changes, a1);
                }
                a0 = i64::from(a1);
                color.invert();
            }
            Mode::Horizontal => {
                let start = a0.max(0) as u32;
                let r1 = read_run(r, tables.run(color), width - start, row)?;
                let r2 = read_run(r, tables.run(color.opposite()), width - start - r1, row)?;
                if r1 == 0 && r2 == 0 {
                    return Err(FaxError::InvalidCode { row });
                }
                let mid = start + r1;
                let end = mid + r2;
                if color == on {
                    if r1 > 0 {
                        fill_span(out, start, r1);
                    }
                } else if r2 > 0 {
                    fill_span(out, mid, r2);
                }
                if mid < width {
                    push_change(changes, mid);
                }
                if end < width {
                    push_change(changes, end);
                }
                a0 = i64::from(end);
            }
            Mode::Uncompressed => {
                let (next_a0, next_color) =
                    decode_uncompressed(r, tables, out, changes, a0, width, on, row)?;
                a0 = next_a0;
                color = next_color;
            }
            Mode::Error => return Err(FaxError::InvalidCode { row }),
            Mode::ErrorAtEol => return Err(FaxError::PrematureEol { row }),
        }
    }
    Ok(())
}

/// Literal pixel spelling between an uncompressed entry code and its exit.
///
/// Returns the position and color the row machine continues with.
fn decode_uncompressed(
    r: &mut BitReader<'_>,
    tables: &DecodeTables,
    out: &mut [u8],
    changes: &mut Vec<u32>,
    a0: i64,
    width: u32,
    on: Color,
    row: u32,
) -> FaxResult<(i64, Color)> {
    let mut x = a0.max(0) as u32;
    loop {
        let sym = match tables.uncomp.drive(r) {
            Ok(sym) => sym,
            Err(_) => return Err(FaxError::PrematureEof { row }),
        };
        match sym {
            Uncomp::Run(n) => {
                // n - 1 white pixels and one black
                let n = u32::from(n);
                if x + n > width {
                    return Err(FaxError::InvalidCode { row });
                }
                if on == Color::White {
                    if n > 1 {
                        fill_span(out, x, n - 1);
                    }
                } else {
                    fill_span(out, x + n - 1, 1);
                }
                push_change(changes, x + n - 1);
                x += n;
                if x < width {
                    push_change(changes, x);
                }
            }
            Uncomp::Skip => {
                if x + 5 > width {
                    return Err(FaxError::InvalidCode { row });
                }
                if on == Color::White {
                    fill_span(out, x, 5);
                }
                x += 5;
            }
            Uncomp::Exit(k) => {
                let k = u32::from(k);
                if x + k > width {
                    return Err(FaxError::InvalidCode { row });
                }
                if on == Color::White && k > 0 {
                    fill_span(out, x, k);
                }
                x += k;
                let t = match r.next_bit() {
                    Ok(t) => t,
                    Err(_) => return Err(FaxError::PrematureEof { row }),
                };
                let color = Color::from(t == 1);
                if color == Color::Black && x < width {
                    push_change(changes, x);
                }
                return Ok((i64::from(x), color));
            }
            Uncomp::Eol => return Err(FaxError::PrematureEol { row }),
            Uncomp::Invalid => return Err(FaxError::InvalidCode { row }),
        }
    }
}
