//! # Bit-level input and output
//!
//! Code words are packed most-significant-bit first. [`FillOrder::LsbToMsb`]
//! streams keep that packing but store every byte mirrored, so both sides of
//! this module normalize at the byte boundary and work MSB-first internally.

use crate::codes::{Code, EOL_CODE, EOL_LEN};
use crate::error::{FaxError, FaxResult};
use crate::params::RowTag;

/// The order in which coded bits fill the bytes of a stream
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FillOrder {
    /// Lower column values are stored in the higher-order bits (TIFF value 1)
    MsbToLsb,
    /// Lower column values are stored in the lower-order bits (TIFF value 2)
    LsbToMsb,
}

impl FillOrder {
    fn apply(self, byte: u8) -> u8 {
        match self {
            FillOrder::MsbToLsb => byte,
            FillOrder::LsbToMsb => byte.reverse_bits(),
        }
    }
}

/// Marker for a read past the end of the input buffer
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EndOfInput;

/// Writes code words into a caller-provided buffer.
///
/// Bits accumulate in an 8-bit cursor that is appended to the buffer whenever
/// it fills up. Running out of room surfaces as [`FaxError::OutputFull`]; the
/// cursor itself survives via [`BitWriter::suspend`] so a strip can continue
/// into a fresh buffer mid-byte.
pub struct BitWriter<'a> {
    dst: &'a mut [u8],
    len: usize,
    acc: u8,
    bit: u8,
    fill_order: FillOrder,
}

impl<'a> BitWriter<'a> {
    /// Start writing at the beginning of `dst`
    pub fn new(dst: &'a mut [u8], fill_order: FillOrder) -> Self {
        Self::resume(dst, 0, 0, fill_order)
    }

    /// Continue a suspended stream into a fresh buffer
    pub(crate) fn resume(dst: &'a mut [u8], acc: u8, bit: u8, fill_order: FillOrder) -> Self {
        BitWriter {
            dst,
            len: 0,
            acc,
            bit,
            fill_order,
        }
    }

    /// Hand back the cursor for a later [`BitWriter::resume`]
    pub(crate) fn suspend(self) -> (usize, u8, u8) {
        (self.len, self.acc, self.bit)
    }

    fn push_byte(&mut self, byte: u8) -> FaxResult<()> {
        if self.len == self.dst.len() {
            return Err(FaxError::OutputFull { written: self.len });
        }
        self.dst[self.len] = self.fill_order.apply(byte);
        self.len += 1;
        Ok(())
    }

    /// Append the `len` low bits of `bits`, most significant first
    pub fn put_bits(&mut self, bits: u16, len: u8) -> FaxResult<()> {
        debug_assert!(len <= 16);
        let mut todo = len;
        while todo > 0 {
            let take = todo.min(8 - self.bit);
            let chunk = (bits >> (todo - take)) & ((1u16 << take) - 1);
            self.acc = ((u16::from(self.acc) << take) | chunk) as u8;
            self.bit += take;
            todo -= take;
            if self.bit == 8 {
                let byte = self.acc;
                self.acc = 0;
                self.bit = 0;
                self.push_byte(byte)?;
            }
        }
        Ok(())
    }

    /// Append one table entry
    pub fn put_code<T>(&mut self, code: &Code<T>) -> FaxResult<()> {
        self.put_bits(code.bits, code.len)
    }

    /// Append an EOL code, optionally fill-padded so it ends on a byte
    /// boundary, optionally followed by the mixed-mode tag bit
    pub fn put_eol(&mut self, fill: bool, tag: Option<RowTag>) -> FaxResult<()> {
        if fill {
            let pad = (12 - self.bit) % 8;
            if pad > 0 {
                self.put_bits(0, pad)?;
            }
        }
        self.put_bits(EOL_CODE, EOL_LEN)?;
        if let Some(tag) = tag {
            self.put_bits(u16::from(tag == RowTag::OneD), 1)?;
        }
        Ok(())
    }

    /// Complete a trailing partial byte with zero bits
    pub fn flush(&mut self) -> FaxResult<()> {
        if self.bit > 0 {
            let byte = self.acc << (8 - self.bit);
            self.acc = 0;
            self.bit = 0;
            self.push_byte(byte)?;
        }
        Ok(())
    }

    /// Bytes appended to the buffer so far
    pub fn bytes_written(&self) -> usize {
        self.len
    }

    /// Bits sitting in the cursor, waiting for a full byte
    pub fn pending_bits(&self) -> u8 {
        self.bit
    }
}

/// Reads a coded stream bit by bit.
///
/// The cursor is a byte index plus a bit offset in `0..8`, where offset 0
/// means the next byte still has to be fetched. Decode tables drive the same
/// cursor through [`crate::tables::Table::drive`], so table look-ups and raw
/// bit reads can interleave freely.
pub struct BitReader<'a> {
    src: &'a [u8],
    pos: usize,
    cur: u8,
    bit: u8,
    fill_order: FillOrder,
}

impl<'a> BitReader<'a> {
    /// Start reading at the beginning of `src`
    pub fn new(src: &'a [u8], fill_order: FillOrder) -> Self {
        Self::resume(src, 0, 0, 0, fill_order)
    }

    /// Continue a suspended stream
    pub(crate) fn resume(src: &'a [u8], pos: usize, cur: u8, bit: u8, fill_order: FillOrder) -> Self {
        BitReader {
            src,
            pos,
            cur,
            bit,
            fill_order,
        }
    }

    /// Hand back the cursor for a later [`BitReader::resume`]
    pub(crate) fn suspend(&self) -> (usize, u8, u8) {
        (self.pos, self.cur, self.bit)
    }

    pub(crate) fn fetch(&mut self) -> Result<(), EndOfInput> {
        if self.pos >= self.src.len() {
            return Err(EndOfInput);
        }
        self.cur = self.fill_order.apply(self.src[self.pos]);
        self.pos += 1;
        Ok(())
    }

    pub(crate) fn current(&self) -> u8 {
        self.cur
    }

    pub(crate) fn bit_offset(&self) -> u8 {
        self.bit
    }

    pub(crate) fn seek_bit(&mut self, bit: u8) {
        debug_assert!(bit < 8);
        self.bit = bit;
    }

    /// Read a single bit
    pub fn next_bit(&mut self) -> Result<u8, EndOfInput> {
        if self.bit == 0 {
            self.fetch()?;
        }
        let bit = (self.cur >> (7 - self.bit)) & 1;
        self.bit = (self.bit + 1) % 8;
        Ok(bit)
    }

    /// Scan forward until an EOL code (at least eleven zero bits followed by
    /// a one bit) has been consumed.
    ///
    /// `seen_zeros` counts zero bits already consumed by the caller, so a
    /// decoder that ran into the middle of an EOL can finish it here.
    pub fn skip_to_eol(&mut self, seen_zeros: u32) -> Result<(), EndOfInput> {
        let mut zeros = seen_zeros;
        loop {
            if self.next_bit()? == 1 {
                if zeros >= 11 {
                    return Ok(());
                }
                zeros = 0;
            } else {
                zeros += 1;
            }
        }
    }

    /// Drop the rest of the current byte
    pub fn align_byte(&mut self) {
        self.bit = 0;
    }

    /// Drop input up to the next 16-bit boundary of the stream
    pub(crate) fn align_word(&mut self) {
        self.align_byte();
        if self.pos % 2 == 1 {
            self.pos += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_writer() {
        let mut buf = [0u8; 4];
        let mut w = BitWriter::new(&mut buf, FillOrder::MsbToLsb);
        w.put_bits(0b1, 1).unwrap();
        w.put_bits(0b0111, 4).unwrap();
        w.put_bits(0b1000, 4).unwrap();
        w.put_bits(0b110101, 6).unwrap();
        w.flush().unwrap();
        assert_eq!(w.bytes_written(), 2);
        assert_eq!(buf, [0b1011_1100, 0b0110_1010, 0, 0]);
    }

    #[test]
    fn test_bit_writer_full() {
        let mut buf = [0u8; 1];
        let mut w = BitWriter::new(&mut buf, FillOrder::MsbToLsb);
        w.put_bits(0xAB, 8).unwrap();
        assert_eq!(
            w.put_bits(0b1, 1).and_then(|_| w.put_bits(0xFF, 8)),
            Err(FaxError::OutputFull { written: 1 })
        );
    }

    #[test]
    fn test_bit_writer_reversed() {
        let mut buf = [0u8; 2];
        let mut w = BitWriter::new(&mut buf, FillOrder::LsbToMsb);
        w.put_bits(0b1011_0110, 8).unwrap();
        w.put_bits(0b11, 2).unwrap();
        w.flush().unwrap();
        assert_eq!(buf, [0b0110_1101, 0b0000_0011]);
    }

    #[test]
    fn test_put_eol_fill() {
        let mut buf = [0u8; 5];
        let mut w = BitWriter::new(&mut buf, FillOrder::MsbToLsb);
        w.put_bits(0b101, 3).unwrap();
        w.put_eol(true, None).unwrap();
        // 3 data bits, 1 fill bit, then the EOL ends on the byte boundary
        assert_eq!(w.bytes_written(), 2);
        assert_eq!(w.dst[..2], [0b1010_0000, 0b0000_0001]);
        w.put_eol(true, Some(RowTag::OneD)).unwrap();
        w.flush().unwrap();
        assert_eq!(
            buf,
            [
                0b1010_0000,
                0b0000_0001,
                0b0000_0000,
                0b0000_0001,
                0b1000_0000
            ]
        );
    }

    #[test]
    fn test_bit_reader() {
        let src = [0b1011_0110, 0b1100_0000];
        let mut r = BitReader::new(&src, FillOrder::MsbToLsb);
        let bits: Vec<u8> = (0..10).map(|_| r.next_bit().unwrap()).collect();
        assert_eq!(bits, [1, 0, 1, 1, 0, 1, 1, 0, 1, 1]);
        let mut rev = BitReader::new(&[0b0110_1101], FillOrder::LsbToMsb);
        let bits: Vec<u8> = (0..8).map(|_| rev.next_bit().unwrap()).collect();
        assert_eq!(bits, [1, 0, 1, 1, 0, 1, 1, 0]);
        assert_eq!(rev.next_bit(), Err(EndOfInput));
    }

    #[test]
    fn test_skip_to_eol() {
        // five fill zeros, an EOL, then a one bit
        let src = [0b0000_0000, 0b0000_0000, 0b0111_0000];
        let mut r = BitReader::new(&src, FillOrder::MsbToLsb);
        r.skip_to_eol(0).unwrap();
        assert_eq!(r.suspend().0, 3);
        assert_eq!(r.next_bit(), Ok(1));
        let mut short = BitReader::new(&[0x00, 0x00], FillOrder::MsbToLsb);
        assert_eq!(short.skip_to_eol(0), Err(EndOfInput));
    }

    #[test]
    fn test_align() {
        let src = [0xFF, 0x0F, 0xAA];
        let mut r = BitReader::new(&src, FillOrder::MsbToLsb);
        r.next_bit().unwrap();
        r.align_byte();
        assert_eq!(r.next_bit(), Ok(0));
        r.align_word();
        assert_eq!(r.next_bit(), Ok(1));
    }
}
