//! # Raster rows and changing elements
//!
//! Scanlines are packed bitmaps, most significant bit first. The coders
//! never look at single pixels: rows are scanned span-wise through a pair
//! of 256-entry run tables, and the two-dimensional modes work on a row's
//! *changing elements*, the sorted column positions where the color flips.
//!
//! A change list always starts from an imaginary white pixel before column
//! 0, so entries at even indices flip to black and entries at odd indices
//! flip back to white. A change at the row width is never recorded.

use crate::color::Color;

/// Leading zero bits per byte value
static ZERO_RUNS: [u8; 256] = build_runs(false);
/// Leading one bits per byte value
static ONE_RUNS: [u8; 256] = build_runs(true);

const fn build_runs(ones: bool) -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let byte = if ones { !(i as u8) } else { i as u8 };
        table[i] = byte.leading_zeros() as u8;
        i += 1;
    }
    table
}

/// Count how many consecutive bits equal to `bit` sit at `start`, looking
/// no further than `limit`
pub(crate) fn span_len(row: &[u8], start: u32, limit: u32, bit: u8) -> u32 {
    debug_assert!(start <= limit);
    let table = if bit == 0 { &ZERO_RUNS } else { &ONE_RUNS };
    let left = limit - start;
    if left == 0 {
        return 0;
    }
    let mut index = (start / 8) as usize;
    let offset = (start % 8) as u8;
    let mut span = 0u32;
    if offset > 0 {
        let head = u32::from(table[usize::from(row[index] << offset)]);
        let avail = u32::from(8 - offset);
        if head < avail {
            return head.min(left);
        }
        span = avail;
        index += 1;
    }
    while span < left {
        let run = u32::from(table[usize::from(row[index])]);
        if run < 8 {
            return (span + run).min(left);
        }
        span += 8;
        index += 1;
    }
    left
}

/// Set the bits of the half-open column range `[start, start + len)`
pub(crate) fn fill_span(row: &mut [u8], start: u32, len: u32) {
    if len == 0 {
        return;
    }
    let end = (start + len) as usize;
    let start = start as usize;
    let first = start / 8;
    let last = end / 8;
    let head = 0xFFu8 >> (start % 8);
    let tail = !(0xFFu8 >> (end % 8));
    if first == last {
        row[first] |= head & tail;
    } else {
        row[first] |= head;
        for byte in &mut row[first + 1..last] {
            *byte = 0xFF;
        }
        if end % 8 > 0 {
            row[last] |= tail;
        }
    }
}

/// Rebuild `changes` from a packed row. `white_bit` is the sample value
/// that paints white under the current photometric interpretation.
pub(crate) fn line_changes_into(changes: &mut Vec<u32>, row: &[u8], width: u32, white_bit: u8) {
    changes.clear();
    let mut pos = 0;
    let mut bit = white_bit;
    while pos < width {
        pos += span_len(row, pos, width, bit);
        if pos < width {
            changes.push(pos);
        }
        bit ^= 1;
    }
}

/// Record a color flip at column `at`.
///
/// Two flips at the same column cancel out, which keeps the list strictly
/// increasing when a zero-length run comes through.
pub(crate) fn push_change(changes: &mut Vec<u32>, at: u32) {
    if changes.last() == Some(&at) {
        changes.pop();
    } else {
        debug_assert!(changes.last().map_or(true, |&last| last < at));
        changes.push(at);
    }
}

/// The first change strictly right of `a0` and the one after it, both
/// clamped to `width`
pub(crate) fn next_changes(changes: &[u32], a0: i64, width: u32) -> (u32, u32) {
    let mut i = 0;
    while i < changes.len() && i64::from(changes[i]) <= a0 {
        i += 1;
    }
    let first = changes.get(i).copied().unwrap_or(width);
    let second = changes.get(i + 1).copied().unwrap_or(width);
    (first, second)
}

/// Locate `b1` and `b2` on the reference line: the first change strictly
/// right of `a0` that flips to the opposite of `color`, and the change
/// after it. Missing changes read as `width`.
pub(crate) fn find_b1_b2(changes: &[u32], a0: i64, color: Color, width: u32) -> (u32, u32) {
    let mut i = 0;
    while i < changes.len() && i64::from(changes[i]) <= a0 {
        i += 1;
    }
    // even indices flip to black; skip one change if its direction matches
    // the current color instead of opposing it
    let wants_even = color == Color::White;
    if (i % 2 == 0) != wants_even {
        i += 1;
    }
    let b1 = changes.get(i).copied().unwrap_or(width);
    let b2 = changes.get(i + 1).copied().unwrap_or(width);
    (b1, b2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_tables() {
        assert_eq!(ZERO_RUNS[0x00], 8);
        assert_eq!(ZERO_RUNS[0xFF], 0);
        assert_eq!(ZERO_RUNS[0b0001_0000], 3);
        assert_eq!(ONE_RUNS[0xFF], 8);
        assert_eq!(ONE_RUNS[0x00], 0);
        assert_eq!(ONE_RUNS[0b1110_0101], 3);
    }

    #[test]
    fn test_span_len() {
        let row = [0b0000_1111, 0b1111_0000, 0b0000_0000];
        assert_eq!(span_len(&row, 0, 24, 0), 4);
        assert_eq!(span_len(&row, 4, 24, 1), 8);
        assert_eq!(span_len(&row, 12, 24, 0), 12);
        // clamped at the limit
        assert_eq!(span_len(&row, 12, 20, 0), 8);
        assert_eq!(span_len(&row, 6, 24, 1), 6);
        assert_eq!(span_len(&row, 24, 24, 0), 0);
        let all = [0xFFu8; 4];
        assert_eq!(span_len(&all, 3, 32, 1), 29);
    }

    #[test]
    fn test_fill_span() {
        let mut row = [0u8; 3];
        fill_span(&mut row, 2, 3);
        assert_eq!(row, [0b0011_1000, 0, 0]);
        fill_span(&mut row, 7, 10);
        assert_eq!(row, [0b0011_1001, 0xFF, 0b1000_0000]);
        fill_span(&mut row, 0, 0);
        assert_eq!(row, [0b0011_1001, 0xFF, 0b1000_0000]);
        let mut row = [0u8; 2];
        fill_span(&mut row, 8, 8);
        assert_eq!(row, [0, 0xFF]);
    }

    #[test]
    fn test_line_changes() {
        let mut changes = Vec::new();
        // white 4, black 4, white 2, black 6
        let row = [0b0000_1111, 0b0011_1111];
        line_changes_into(&mut changes, &row, 16, 0);
        assert_eq!(changes, [4, 8, 10]);
        line_changes_into(&mut changes, &row, 12, 0);
        assert_eq!(changes, [4, 8, 10]);
        line_changes_into(&mut changes, &row, 10, 0);
        assert_eq!(changes, [4, 8]);
        // inverted polarity: the same bytes read as black 4, white 4, ...
        line_changes_into(&mut changes, &row, 16, 1);
        assert_eq!(changes, [0, 4, 8, 10]);
        line_changes_into(&mut changes, &[0u8; 2], 16, 0);
        assert_eq!(changes, Vec::<u32>::new());
    }

    #[test]
    fn test_push_change_cancels() {
        let mut changes = vec![3];
        push_change(&mut changes, 7);
        assert_eq!(changes, [3, 7]);
        push_change(&mut changes, 7);
        assert_eq!(changes, [3]);
        push_change(&mut changes, 3);
        assert_eq!(changes, Vec::<u32>::new());
    }

    #[test]
    fn test_find_b1_b2() {
        // black from 3 to 7
        let changes = [3, 7];
        assert_eq!(find_b1_b2(&changes, -1, Color::White, 10), (3, 7));
        assert_eq!(find_b1_b2(&changes, 3, Color::Black, 10), (7, 10));
        // a same-color change right of a0 is skipped
        assert_eq!(find_b1_b2(&changes, 3, Color::White, 10), (10, 10));
        assert_eq!(find_b1_b2(&changes, 0, Color::Black, 10), (7, 10));
        assert_eq!(find_b1_b2(&changes, 0, Color::White, 10), (3, 7));
        assert_eq!(find_b1_b2(&[], -1, Color::White, 10), (10, 10));
    }

    #[test]
    fn test_next_changes() {
        let changes = [3, 7, 9];
        assert_eq!(next_changes(&changes, -1, 12), (3, 7));
        assert_eq!(next_changes(&changes, 3, 12), (7, 9));
        assert_eq!(next_changes(&changes, 7, 12), (9, 12));
        assert_eq!(next_changes(&changes, 9, 12), (12, 12));
    }
}
