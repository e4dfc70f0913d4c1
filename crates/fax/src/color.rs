//! # Pixel colors

/// The two possible colors on a bi-level fax page
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Color {
    /// A black pixel
    Black,
    /// A white pixel
    White,
}

impl From<bool> for Color {
    fn from(b: bool) -> Self {
        if b {
            Color::Black
        } else {
            Color::White
        }
    }
}

impl Color {
    /// Invert this color in place
    pub fn invert(&mut self) {
        *self = self.opposite();
    }

    /// The other color
    pub fn opposite(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}
