use std::path::PathBuf;

use color_eyre::eyre;
use fax_g3g4::{pbm, FaxDecoder, FaxParams};

#[derive(argh::FromArgs)]
/// decode a raw Group 4 stream and print it as ascii art
struct Options {
    #[argh(positional)]
    /// path to the coded input file
    file: PathBuf,

    #[argh(option, short = 'w')]
    /// width of the image in pixels
    width: u32,

    #[argh(option, short = 'h')]
    /// height of the image in rows
    height: u32,

    /// invert black and white
    #[argh(switch, short = 'i')]
    invert: bool,
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let opt: Options = argh::from_env();
    let coded = std::fs::read(&opt.file)?;

    let params = FaxParams::default();
    let stride = params.row_stride(opt.width);
    let mut rows = vec![0u8; stride * opt.height as usize];
    let mut decoder = FaxDecoder::new(opt.width, opt.height, params)?;
    decoder.decode(&coded, &mut rows)?;

    let mut text = String::new();
    pbm::ascii_art(&mut text, &rows, opt.width, stride, opt.invert)?;
    print!("{}", text);
    Ok(())
}
