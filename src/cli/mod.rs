//! # The command line interface

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use color_eyre::eyre::{self, WrapErr};
use env_logger::Env;
use log::{info, LevelFilter};

use fax_g3g4::{pbm, FaxDecoder, FaxEncoder, FaxParams};

pub mod opt;

use opt::{CodingArg, DecodeOpts, EncodeOpts, ShowOpts};

/// Set up CLI
pub fn init<T: clap::Parser>() -> color_eyre::Result<T> {
    color_eyre::install()?;
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .format_timestamp(None)
        .parse_env(Env::new().filter("FAX_TOOL_LOG"))
        .init();
    let args = T::parse();
    Ok(args)
}

/// Move packed rows between two scanline strides
fn repack(rows: Vec<u8>, from: usize, to: usize, height: u32) -> Vec<u8> {
    if from == to {
        return rows;
    }
    let mut out = vec![0u8; to * height as usize];
    let keep = from.min(to);
    for y in 0..height as usize {
        out[y * to..y * to + keep].copy_from_slice(&rows[y * from..y * from + keep]);
    }
    out
}

fn raster_len(stride: usize, height: u32) -> eyre::Result<usize> {
    stride
        .checked_mul(height as usize)
        .ok_or_else(|| eyre::eyre!("Page dimensions overflow"))
}

/// Encode a portable bitmap into a coded fax stream
pub fn encode(opt: EncodeOpts) -> eyre::Result<()> {
    let EncodeOpts { file, out, coding } = opt;
    let params = coding.params();

    let input = File::open(&file)
        .wrap_err_with(|| format!("Failed to open file: `{}`", file.display()))?;
    let mut reader = BufReader::new(input);
    let (width, height, rows) = pbm::read_pbm(&mut reader)
        .wrap_err_with(|| format!("Failed to read bitmap: `{}`", file.display()))?;

    let stride = params.row_stride(width);
    raster_len(stride, height)?;
    let rows = repack(rows, ((width + 7) / 8) as usize, stride, height);

    let mut coded = vec![0u8; rows.len() * 8 + height as usize * 8 + 64];
    let mut encoder = FaxEncoder::new(width, height, params)?;
    let len = encoder.encode(&rows, &mut coded)?;

    let out = out.unwrap_or_else(|| match coding.coding {
        CodingArg::G3 | CodingArg::G3TwoD => file.with_extension("g3"),
        CodingArg::G4 => file.with_extension("g4"),
    });
    std::fs::write(&out, &coded[..len])
        .wrap_err_with(|| format!("Failed to write file: `{}`", out.display()))?;
    info!(
        "Encoded the {}x{} page into {} coded bytes ({}% of the raster)",
        width,
        height,
        len,
        len * 100 / rows.len()
    );
    Ok(())
}

fn decode_page(file: &Path, width: u32, height: u32, params: FaxParams) -> eyre::Result<Vec<u8>> {
    let coded =
        std::fs::read(file).wrap_err_with(|| format!("Failed to read file: `{}`", file.display()))?;
    let stride = params.row_stride(width);
    let mut rows = vec![0u8; raster_len(stride, height)?];
    let mut decoder = FaxDecoder::new(width, height, params)?;
    decoder.decode(&coded, &mut rows)?;
    Ok(rows)
}

/// Decode a coded fax stream into a portable bitmap
pub fn decode(opt: DecodeOpts) -> eyre::Result<()> {
    let DecodeOpts {
        file,
        out,
        width,
        height,
        coding,
    } = opt;
    let params = coding.params();
    let stride = params.row_stride(width);
    let rows = decode_page(&file, width, height, params)?;
    let rows = repack(rows, stride, ((width + 7) / 8) as usize, height);

    let out = out.unwrap_or_else(|| file.with_extension("pbm"));
    let output = File::create(&out)
        .wrap_err_with(|| format!("Failed to create file: `{}`", out.display()))?;
    let mut writer = BufWriter::new(output);
    pbm::write_pbm(&mut writer, width, height, &rows)?;
    writer.flush()?;
    info!("Decoded the {}x{} page to `{}`", width, height, out.display());
    Ok(())
}

/// Decode a coded fax stream and print it as ascii art
pub fn show(opt: ShowOpts) -> eyre::Result<()> {
    let ShowOpts {
        file,
        width,
        height,
        invert,
        coding,
    } = opt;
    let params = coding.params();
    let stride = params.row_stride(width);
    let rows = decode_page(&file, width, height, params)?;

    let mut art = String::new();
    pbm::ascii_art(&mut art, &rows, width, stride, invert)?;
    print!("{}", art);
    Ok(())
}
