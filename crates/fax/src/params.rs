//! # Strip coding parameters

use crate::bits::FillOrder;
use crate::color::Color;

/// Which flavor of fax coding a strip uses
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Coding {
    /// Group 3 one-dimensional (ITU-T T.4, MH)
    OneDimensional,
    /// Group 3 mixed one/two-dimensional (ITU-T T.4, MR)
    TwoDimensional,
    /// Group 4 pure two-dimensional (ITU-T T.6, MMR)
    Group4,
}

/// What a sample value of zero means
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Photometric {
    /// A zero bit is a white pixel
    MinIsWhite,
    /// A zero bit is a black pixel
    MinIsBlack,
}

/// Unit of the vertical resolution
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ResolutionUnit {
    /// Lines per inch
    Inch,
    /// Lines per centimeter
    Centimeter,
}

/// Whether a row is coded one- or two-dimensionally.
///
/// In mixed mode this doubles as the tag bit that follows each EOL code,
/// where a set bit announces a one-dimensional row.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RowTag {
    /// The row uses the one-dimensional (MH) scheme
    OneD,
    /// The row uses the two-dimensional (MR/MMR) scheme
    TwoD,
}

/// Everything a strip codec needs to know besides the pixel dimensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaxParams {
    /// Flavor of coding for this strip
    pub coding: Coding,
    /// Meaning of a zero sample
    pub photometric: Photometric,
    /// Suppress EOL codes in Group 3 streams (TIFF "classic" / RLE style)
    pub no_eol: bool,
    /// Pad before each EOL so the EOL code ends on a byte boundary
    pub fill_bits: bool,
    /// Pad each coded row to a byte boundary
    pub byte_align: bool,
    /// Pad each coded row to a 16-bit boundary
    pub word_align: bool,
    /// Vertical resolution, in [`FaxParams::resolution_unit`]s
    pub y_resolution: u32,
    /// Unit for [`FaxParams::y_resolution`]
    pub resolution_unit: ResolutionUnit,
    /// Bit order of the coded bytes
    pub fill_order: FillOrder,
    /// Unused bits appended to every scanline in the raster buffers
    pub row_padding_bits: u32,
}

impl Default for FaxParams {
    fn default() -> Self {
        FaxParams {
            coding: Coding::Group4,
            photometric: Photometric::MinIsWhite,
            no_eol: false,
            fill_bits: false,
            byte_align: false,
            word_align: false,
            y_resolution: 196,
            resolution_unit: ResolutionUnit::Inch,
            fill_order: FillOrder::MsbToLsb,
            row_padding_bits: 0,
        }
    }
}

impl FaxParams {
    /// Bytes per scanline in the raster buffers, padding included
    pub fn row_stride(&self, width: u32) -> usize {
        ((width + self.row_padding_bits + 7) / 8) as usize
    }

    /// The row-grouping constant `K` of T.4 mixed mode.
    ///
    /// Standard-resolution pages (at most 200 lines per inch) group one
    /// one-dimensional row with one two-dimensional row, fine-resolution
    /// pages with three.
    pub fn k_factor(&self) -> u32 {
        let lpi = match self.resolution_unit {
            ResolutionUnit::Inch => self.y_resolution,
            ResolutionUnit::Centimeter => self.y_resolution * 254 / 100,
        };
        if lpi <= 200 {
            2
        } else {
            4
        }
    }

    /// Whether the coded stream carries EOL codes
    pub fn has_eol(&self) -> bool {
        match self.coding {
            Coding::OneDimensional | Coding::TwoDimensional => !self.no_eol,
            Coding::Group4 => false,
        }
    }

    /// The sample bit that paints the given color
    pub(crate) fn bit_of(&self, color: Color) -> u8 {
        match (self.photometric, color) {
            (Photometric::MinIsWhite, Color::White) => 0,
            (Photometric::MinIsWhite, Color::Black) => 1,
            (Photometric::MinIsBlack, Color::White) => 1,
            (Photometric::MinIsBlack, Color::Black) => 0,
        }
    }

    /// The color stored as a set bit
    pub(crate) fn on_color(&self) -> Color {
        match self.photometric {
            Photometric::MinIsWhite => Color::Black,
            Photometric::MinIsBlack => Color::White,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_k_factor() {
        let mut p = FaxParams::default();
        p.y_resolution = 100;
        assert_eq!(p.k_factor(), 2);
        p.y_resolution = 200;
        assert_eq!(p.k_factor(), 2);
        p.y_resolution = 300;
        assert_eq!(p.k_factor(), 4);
        // 77 lines/cm is the T.4 fine vertical resolution
        p.y_resolution = 77;
        p.resolution_unit = ResolutionUnit::Centimeter;
        assert_eq!(p.k_factor(), 2);
        p.y_resolution = 154;
        assert_eq!(p.k_factor(), 4);
    }

    #[test]
    fn test_row_stride() {
        let mut p = FaxParams::default();
        assert_eq!(p.row_stride(1728), 216);
        assert_eq!(p.row_stride(20), 3);
        p.row_padding_bits = 4;
        assert_eq!(p.row_stride(20), 3);
        p.row_padding_bits = 12;
        assert_eq!(p.row_stride(20), 4);
    }

    #[test]
    fn test_polarity() {
        let p = FaxParams::default();
        assert_eq!(p.bit_of(Color::White), 0);
        assert_eq!(p.on_color(), Color::Black);
        let mut q = FaxParams::default();
        q.photometric = Photometric::MinIsBlack;
        assert_eq!(q.bit_of(Color::White), 1);
        assert_eq!(q.on_color(), Color::White);
    }
}
