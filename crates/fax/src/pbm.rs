//! Raw portable bitmap (PBM `P4`) reading and writing.
//!
//! `P4` rows are packed one bit per pixel, MSB first, padded to whole
//! bytes, with a set bit meaning black. That is exactly the min-is-white
//! scanline layout, so raster buffers move in and out without conversion.

use std::fmt;
use std::io::{self, Read, Write};

fn bad(msg: &'static str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}

fn read_byte<R: Read>(r: &mut R) -> io::Result<u8> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Read one whitespace separated header token, skipping `#` comments
fn read_token<R: Read>(r: &mut R) -> io::Result<Vec<u8>> {
    let mut byte = read_byte(r)?;
    loop {
        if byte == b'#' {
            while byte != b'\n' {
                byte = read_byte(r)?;
            }
        }
        if !byte.is_ascii_whitespace() {
            break;
        }
        byte = read_byte(r)?;
    }
    let mut token = Vec::new();
    while !byte.is_ascii_whitespace() {
        token.push(byte);
        byte = read_byte(r)?;
    }
    Ok(token)
}

fn read_number<R: Read>(r: &mut R) -> io::Result<u32> {
    let token = read_token(r)?;
    std::str::from_utf8(&token)
        .ok()
        .and_then(|text| text.parse().ok())
        .ok_or_else(|| bad("pbm header holds an invalid number"))
}

/// Read a raw `P4` bitmap, returning its width, height and packed rows
pub fn read_pbm<R: Read>(r: &mut R) -> io::Result<(u32, u32, Vec<u8>)> {
    let mut magic = [0u8; 2];
    r.read_exact(&mut magic)?;
    if &magic != b"P4" {
        return Err(bad("not a raw pbm (P4) file"));
    }
    let width = read_number(r)?;
    let height = read_number(r)?;
    if width == 0 || height == 0 {
        return Err(bad("pbm dimensions must not be zero"));
    }
    let stride = ((width + 7) / 8) as usize;
    let len = stride
        .checked_mul(height as usize)
        .ok_or_else(|| bad("pbm dimensions overflow"))?;
    let mut data = vec![0; len];
    r.read_exact(&mut data)?;
    Ok((width, height, data))
}

/// Write packed rows as a raw `P4` bitmap
pub fn write_pbm<W: Write>(w: &mut W, width: u32, height: u32, rows: &[u8]) -> io::Result<()> {
    let stride = ((width + 7) / 8) as usize;
    if rows.len() != stride * height as usize {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "row data does not match the pbm dimensions",
        ));
    }
    writeln!(w, "P4")?;
    writeln!(w, "{} {}", width, height)?;
    w.write_all(rows)
}

/// Draw packed rows as bordered ascii art, `#` for set bits.
///
/// `stride` is the size of one packed row in bytes and may be larger than
/// `width` needs; `invert` swaps ink and background.
pub fn ascii_art<W: fmt::Write>(
    out: &mut W,
    rows: &[u8],
    width: u32,
    stride: usize,
    invert: bool,
) -> fmt::Result {
    let border = |out: &mut W| -> fmt::Result {
        out.write_char('+')?;
        for _ in 0..width {
            out.write_char('-')?;
        }
        out.write_str("+\n")
    };
    border(out)?;
    for row in rows.chunks(stride) {
        out.write_char('|')?;
        for x in 0..width {
            let bit = row[(x / 8) as usize] >> (7 - x % 8) & 1;
            let ink = (bit == 1) ^ invert;
            out.write_char(if ink { '#' } else { ' ' })?;
        }
        out.write_str("|\n")?;
    }
    border(out)
}
