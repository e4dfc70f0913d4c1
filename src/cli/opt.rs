use std::{fmt, path::PathBuf, str::FromStr};

use clap::{Parser, Subcommand};
use fax_g3g4::{Coding, FaxParams, FillOrder, Photometric, ResolutionUnit};

/// The coding scheme of a fax stream
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CodingArg {
    /// Group 3 one-dimensional (T.4 MH)
    G3,
    /// Group 3 mixed one/two-dimensional (T.4 MR)
    G3TwoD,
    /// Group 4 two-dimensional (T.6 MMR)
    G4,
}

#[derive(Debug)]
/// Failed to parse a coding scheme name
pub struct CodingArgError {}

impl fmt::Display for CodingArgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Use one of `g3`, `g3-2d` or `g4`")?;
        Ok(())
    }
}

impl std::error::Error for CodingArgError {}

impl Default for CodingArg {
    fn default() -> Self {
        CodingArg::G4
    }
}

impl FromStr for CodingArg {
    type Err = CodingArgError;
    fn from_str(val: &str) -> Result<Self, Self::Err> {
        match val {
            "g3" | "t4" | "mh" => Ok(Self::G3),
            "g3-2d" | "mr" => Ok(Self::G3TwoD),
            "g4" | "t6" | "mmr" => Ok(Self::G4),
            _ => Err(CodingArgError {}),
        }
    }
}

impl fmt::Display for CodingArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::G3 => f.write_str("g3"),
            Self::G3TwoD => f.write_str("g3-2d"),
            Self::G4 => f.write_str("g4"),
        }
    }
}

/// Unit of the vertical resolution argument
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnitArg {
    /// Lines per inch
    Inch,
    /// Lines per centimeter
    Cm,
}

#[derive(Debug)]
/// Failed to parse a resolution unit name
pub struct UnitArgError {}

impl fmt::Display for UnitArgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Use one of `inch` or `cm`")?;
        Ok(())
    }
}

impl std::error::Error for UnitArgError {}

impl Default for UnitArg {
    fn default() -> Self {
        UnitArg::Inch
    }
}

impl FromStr for UnitArg {
    type Err = UnitArgError;
    fn from_str(val: &str) -> Result<Self, Self::Err> {
        match val {
            "inch" | "in" => Ok(Self::Inch),
            "cm" | "centimeter" => Ok(Self::Cm),
            _ => Err(UnitArgError {}),
        }
    }
}

impl fmt::Display for UnitArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inch => f.write_str("inch"),
            Self::Cm => f.write_str("cm"),
        }
    }
}

/// How a coded stream is framed and packed
#[derive(Debug, Default, Clone, Parser)]
pub struct CodingOpts {
    /// The coding scheme. Valid choices are:
    ///
    /// "g3", "g3-2d" and "g4"
    #[clap(default_value_t, long, short = 'c')]
    pub coding: CodingArg,
    /// Omit EOL codes (Group 3 only)
    #[clap(long = "no-eol")]
    pub no_eol: bool,
    /// Pad before each EOL code so that it ends on a byte boundary
    #[clap(long = "fill-bits")]
    pub fill_bits: bool,
    /// Pad each coded row to a byte boundary
    #[clap(long = "byte-align")]
    pub byte_align: bool,
    /// Pad each coded row to a 16-bit boundary
    #[clap(long = "word-align")]
    pub word_align: bool,
    /// Treat a zero sample as black
    #[clap(long = "min-is-black")]
    pub min_is_black: bool,
    /// Fill coded bytes least-significant bit first
    #[clap(long = "lsb-first")]
    pub lsb_first: bool,
    /// Vertical resolution, selects the mixed-mode row grouping
    #[clap(long = "y-resolution")]
    pub y_resolution: Option<u32>,
    /// Unit of the vertical resolution ("inch" or "cm")
    #[clap(long, default_value_t)]
    pub unit: UnitArg,
    /// Unused bits appended to every scanline of the raster
    #[clap(long, default_value_t = 0)]
    pub padding: u32,
}

impl CodingOpts {
    /// The stream parameters these flags select
    pub fn params(&self) -> FaxParams {
        let mut params = FaxParams {
            coding: match self.coding {
                CodingArg::G3 => Coding::OneDimensional,
                CodingArg::G3TwoD => Coding::TwoDimensional,
                CodingArg::G4 => Coding::Group4,
            },
            no_eol: self.no_eol,
            fill_bits: self.fill_bits,
            byte_align: self.byte_align,
            word_align: self.word_align,
            row_padding_bits: self.padding,
            ..FaxParams::default()
        };
        if self.min_is_black {
            params.photometric = Photometric::MinIsBlack;
        }
        if self.lsb_first {
            params.fill_order = FillOrder::LsbToMsb;
        }
        if let Some(y_resolution) = self.y_resolution {
            params.y_resolution = y_resolution;
        }
        params.resolution_unit = match self.unit {
            UnitArg::Inch => ResolutionUnit::Inch,
            UnitArg::Cm => ResolutionUnit::Centimeter,
        };
        params
    }
}

#[derive(Parser)]
/// Encode and decode bi-level fax pages (CCITT Group 3 / Group 4)
pub struct Options {
    /// The operation to run
    #[clap(subcommand)]
    pub command: Command,
}

/// The operations of the tool
#[derive(Subcommand)]
pub enum Command {
    /// Encode a portable bitmap into a coded fax stream
    Encode(EncodeOpts),
    /// Decode a coded fax stream into a portable bitmap
    Decode(DecodeOpts),
    /// Decode a coded fax stream and print it as ascii art
    Show(ShowOpts),
}

/// Options for encoding a bitmap
#[derive(Parser)]
pub struct EncodeOpts {
    /// The portable bitmap (P4) file to encode
    pub file: PathBuf,
    /// Where to store the coded stream
    pub out: Option<PathBuf>,
    /// How to code the stream
    #[clap(flatten)]
    pub coding: CodingOpts,
}

/// Options for decoding a coded stream
#[derive(Parser)]
pub struct DecodeOpts {
    /// The coded fax stream
    pub file: PathBuf,
    /// Where to store the portable bitmap output
    pub out: Option<PathBuf>,
    /// The pixel width of the page
    #[clap(long, short = 'w')]
    pub width: u32,
    /// The number of rows in the page
    #[clap(long, short = 'H')]
    pub height: u32,
    /// How the stream is coded
    #[clap(flatten)]
    pub coding: CodingOpts,
}

/// Options for previewing a coded stream
#[derive(Parser)]
pub struct ShowOpts {
    /// The coded fax stream
    pub file: PathBuf,
    /// The pixel width of the page
    #[clap(long, short = 'w')]
    pub width: u32,
    /// The number of rows in the page
    #[clap(long, short = 'H')]
    pub height: u32,
    /// Flip ink and paper in the output
    #[clap(long, short = 'i')]
    pub invert: bool,
    /// How the stream is coded
    #[clap(flatten)]
    pub coding: CodingOpts,
}
