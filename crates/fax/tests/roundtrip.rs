//! End-to-end round trips over the coding flavors and framing options.

use fax_g3g4::{Coding, FaxDecoder, FaxEncoder, FaxParams, FillOrder, Photometric};

const WIDTHS: &[u32] = &[1, 7, 8, 9, 63, 64, 65, 177];

fn xorshift(state: &mut u32) -> u32 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    x
}

/// Deterministic test bitmap; `sparse` thins the black coverage so the
/// runs get longer
fn random_rows(width: u32, height: u32, stride: usize, seed: u32, sparse: bool) -> Vec<u8> {
    let mut rows = vec![0u8; stride * height as usize];
    let mut state = seed;
    for (i, byte) in rows.iter_mut().enumerate() {
        let first_bit = (i % stride) as u32 * 8;
        if first_bit >= width {
            continue;
        }
        let x = xorshift(&mut state);
        *byte = if sparse {
            (x >> 8) as u8 & (x >> 17) as u8
        } else {
            (x >> 13) as u8
        };
        let used = (width - first_bit).min(8);
        if used < 8 {
            *byte &= 0xFF << (8 - used);
        }
    }
    rows
}

fn paint(row: &mut [u8], start: u32, len: u32) {
    for x in start..start + len {
        row[(x / 8) as usize] |= 0x80 >> (x % 8);
    }
}

fn roundtrip(width: u32, height: u32, params: &FaxParams, rows: &[u8]) {
    let stride = params.row_stride(width);
    assert_eq!(rows.len(), stride * height as usize);
    let mut coded = vec![0u8; rows.len() * 8 + height as usize * 8 + 64];
    let mut enc = FaxEncoder::new(width, height, params.clone()).unwrap();
    let len = enc.encode(rows, &mut coded).unwrap();
    let mut back = vec![0u8; rows.len()];
    let mut dec = FaxDecoder::new(width, height, params.clone()).unwrap();
    dec.decode(&coded[..len], &mut back).unwrap();
    assert_eq!(back, rows, "width {}, {:?}", width, params);
}

fn roundtrip_all_widths(params: FaxParams) {
    for (i, &width) in WIDTHS.iter().enumerate() {
        let stride = params.row_stride(width);
        let rows = random_rows(width, 5, stride, 0x9E37_79B9 ^ ((i as u32) << 8), i % 2 == 0);
        roundtrip(width, 5, &params, &rows);
    }
}

#[test]
fn test_g3_1d() {
    roundtrip_all_widths(FaxParams {
        coding: Coding::OneDimensional,
        ..FaxParams::default()
    });
}

#[test]
fn test_g3_1d_no_eol() {
    roundtrip_all_widths(FaxParams {
        coding: Coding::OneDimensional,
        no_eol: true,
        ..FaxParams::default()
    });
}

#[test]
fn test_g3_mixed_standard_res() {
    roundtrip_all_widths(FaxParams {
        coding: Coding::TwoDimensional,
        ..FaxParams::default()
    });
}

#[test]
fn test_g3_mixed_fine_res() {
    roundtrip_all_widths(FaxParams {
        coding: Coding::TwoDimensional,
        y_resolution: 300,
        ..FaxParams::default()
    });
}

#[test]
fn test_g3_mixed_no_eol() {
    roundtrip_all_widths(FaxParams {
        coding: Coding::TwoDimensional,
        no_eol: true,
        ..FaxParams::default()
    });
}

#[test]
fn test_g4() {
    roundtrip_all_widths(FaxParams::default());
}

#[test]
fn test_g4_reversed_fill_order() {
    roundtrip_all_widths(FaxParams {
        fill_order: FillOrder::LsbToMsb,
        ..FaxParams::default()
    });
}

#[test]
fn test_g4_min_is_black() {
    roundtrip_all_widths(FaxParams {
        photometric: Photometric::MinIsBlack,
        ..FaxParams::default()
    });
}

#[test]
fn test_fill_bits() {
    for &coding in &[Coding::OneDimensional, Coding::TwoDimensional] {
        roundtrip_all_widths(FaxParams {
            coding,
            fill_bits: true,
            ..FaxParams::default()
        });
    }
}

#[test]
fn test_aligned_rows() {
    let base = FaxParams {
        coding: Coding::OneDimensional,
        no_eol: true,
        ..FaxParams::default()
    };
    roundtrip_all_widths(FaxParams {
        byte_align: true,
        ..base.clone()
    });
    roundtrip_all_widths(FaxParams {
        word_align: true,
        ..base.clone()
    });
    roundtrip_all_widths(FaxParams {
        coding: Coding::TwoDimensional,
        byte_align: true,
        ..base
    });
}

#[test]
fn test_row_padding() {
    roundtrip_all_widths(FaxParams {
        row_padding_bits: 12,
        ..FaxParams::default()
    });
    roundtrip_all_widths(FaxParams {
        coding: Coding::OneDimensional,
        row_padding_bits: 4,
        ..FaxParams::default()
    });
}

#[test]
fn test_blank_and_solid_pages() {
    for &coding in &[
        Coding::OneDimensional,
        Coding::TwoDimensional,
        Coding::Group4,
    ] {
        let params = FaxParams {
            coding,
            ..FaxParams::default()
        };
        let stride = params.row_stride(200);
        let white = vec![0u8; stride * 3];
        roundtrip(200, 3, &params, &white);
        let black = vec![0xFFu8; stride * 3];
        roundtrip(200, 3, &params, &black);
    }
}

#[test]
fn test_long_runs() {
    // runs long enough to chain several make-up codes
    let width = 5664;
    for &coding in &[Coding::OneDimensional, Coding::Group4] {
        let params = FaxParams {
            coding,
            ..FaxParams::default()
        };
        let stride = params.row_stride(width);
        let mut rows = vec![0u8; stride * 2];
        paint(&mut rows[..stride], 2600, 3000);
        paint(&mut rows[stride..], 0, width);
        roundtrip(width, 2, &params, &rows);
    }
}

#[test]
fn test_checkerboard() {
    // single pixel runs everywhere, the worst case for vertical coding
    let params = FaxParams::default();
    let width = 177;
    let stride = params.row_stride(width);
    let mut rows = vec![0u8; stride * 4];
    for (i, byte) in rows.iter_mut().enumerate() {
        let first_bit = (i % stride) as u32 * 8;
        if first_bit >= width {
            continue;
        }
        *byte = if (i / stride) % 2 == 0 { 0xAA } else { 0x55 };
        let used = (width - first_bit).min(8);
        if used < 8 {
            *byte &= 0xFF << (8 - used);
        }
    }
    roundtrip(width, 4, &params, &rows);
}

#[test]
fn test_single_row_strips() {
    for &coding in &[
        Coding::OneDimensional,
        Coding::TwoDimensional,
        Coding::Group4,
    ] {
        let params = FaxParams {
            coding,
            ..FaxParams::default()
        };
        let stride = params.row_stride(9);
        let rows = random_rows(9, 1, stride, 7, false);
        roundtrip(9, 1, &params, &rows);
    }
}

#[test]
fn test_encode_subsets_match_whole() {
    // the subset split lands inside a 2D row group
    let params = FaxParams {
        coding: Coding::TwoDimensional,
        y_resolution: 300,
        ..FaxParams::default()
    };
    let width = 64;
    let stride = params.row_stride(width);
    let rows = random_rows(width, 6, stride, 0xDECAF, false);
    let mut whole = vec![0u8; rows.len() * 8 + 6 * 8 + 64];
    let mut enc = FaxEncoder::new(width, 6, params.clone()).unwrap();
    let n = enc.encode(&rows, &mut whole).unwrap();

    let mut enc = FaxEncoder::new(width, 6, params).unwrap();
    let mut parts = Vec::new();
    let mut buf = vec![0u8; whole.len()];
    let n0 = enc
        .encode_subset(&rows[..3 * stride], 0, 3, &mut buf)
        .unwrap();
    parts.extend_from_slice(&buf[..n0]);
    let n1 = enc
        .encode_subset(&rows[3 * stride..], 3, 3, &mut buf)
        .unwrap();
    parts.extend_from_slice(&buf[..n1]);
    assert_eq!(parts[..], whole[..n]);
}

#[test]
fn test_decode_subsets_match_whole() {
    let params = FaxParams::default();
    let width = 65;
    let stride = params.row_stride(width);
    let rows = random_rows(width, 6, stride, 0xC0FFEE, true);
    let mut coded = vec![0u8; rows.len() * 8 + 6 * 8 + 64];
    let mut enc = FaxEncoder::new(width, 6, params.clone()).unwrap();
    let len = enc.encode(&rows, &mut coded).unwrap();

    let mut dec = FaxDecoder::new(width, 6, params).unwrap();
    let mut first = vec![0u8; 2 * stride];
    dec.decode_subset(&coded[..len], 0, 2, &mut first).unwrap();
    let mut rest = vec![0u8; 4 * stride];
    dec.decode_subset(&coded[..len], 2, 4, &mut rest).unwrap();
    assert_eq!(first[..], rows[..2 * stride]);
    assert_eq!(rest[..], rows[2 * stride..]);
}

#[test]
fn test_eofb_terminates_group4() {
    let mut enc = FaxEncoder::new(8, 1, FaxParams::default()).unwrap();
    let mut coded = [0u8; 8];
    let n = enc.encode(&[0x00], &mut coded).unwrap();
    // V0 for the all-white row, then the two EOL codes of the EOFB
    assert_eq!(&coded[..n], &[0x80, 0x08, 0x00, 0x80]);
}
