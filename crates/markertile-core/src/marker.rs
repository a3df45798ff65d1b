//! Marker rasterization
//!
//! A marker is an (N+2)x(N+2) cell grid: a one-cell black border around the
//! N x N data bits of its codeword. The grid is scaled to one pixel per
//! millimeter of physical size with nearest-neighbour sampling, so every
//! pixel is either pure black or pure white.

use image::{GrayImage, Luma};
use thiserror::Error;

use crate::dictionary::{is_black, Dictionary};

/// Border width in cells around the data bits
pub const BORDER_BITS: u32 = 1;

/// Output resolution: one pixel per millimeter
pub const PIXELS_PER_METER: f64 = 1000.0;

/// Largest image side we are willing to allocate
pub const MAX_SIDE_PIXELS: u32 = 16384;

#[derive(Error, Debug)]
pub enum MarkerError {
    #[error("Marker id {id} is out of range for {dictionary} (valid ids: 0..{capacity})")]
    IdOutOfRange {
        id: u32,
        dictionary: Dictionary,
        capacity: u32,
    },
    #[error("Marker size must be a positive length in meters, got {0}")]
    InvalidSize(f64),
    #[error("A {side}px image cannot hold a {cells}x{cells} marker grid")]
    ImageTooSmall { side: u32, cells: u32 },
    #[error("A {side}px image exceeds the {max}px limit")]
    ImageTooLarge { side: u32, max: u32 },
}

/// Convert a physical size in meters to whole millimeters (truncating)
pub fn size_in_millimeters(size_m: f64) -> i64 {
    (size_m * PIXELS_PER_METER) as i64
}

/// Side length in pixels of the image for a physical marker size
pub fn side_pixels(size_m: f64) -> Result<u32, MarkerError> {
    if !size_m.is_finite() || size_m <= 0.0 {
        return Err(MarkerError::InvalidSize(size_m));
    }
    let side = size_in_millimeters(size_m);
    if side > i64::from(MAX_SIDE_PIXELS) {
        return Err(MarkerError::ImageTooLarge {
            side: u32::try_from(side).unwrap_or(u32::MAX),
            max: MAX_SIDE_PIXELS,
        });
    }
    Ok(side as u32)
}

/// The cell grid of a marker, border included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerPattern {
    cells: u32,
    white: Vec<bool>,
}

impl MarkerPattern {
    /// Lay out a codeword (black = 1) inside its black border
    pub fn from_codeword(codeword: u64, marker_size: u32) -> Self {
        let cells = marker_size + 2 * BORDER_BITS;
        let mut white = vec![false; (cells * cells) as usize];
        for row in 0..marker_size {
            for col in 0..marker_size {
                let idx = (row + BORDER_BITS) * cells + col + BORDER_BITS;
                white[idx as usize] = !is_black(codeword, marker_size, row, col);
            }
        }
        Self { cells, white }
    }

    /// Number of cells per side
    pub fn cells(&self) -> u32 {
        self.cells
    }

    pub fn is_white(&self, x: u32, y: u32) -> bool {
        self.white[(y * self.cells + x) as usize]
    }

    /// Scale the grid to a square bitmap with nearest-neighbour sampling
    pub fn render(&self, side: u32) -> Result<GrayImage, MarkerError> {
        if side < self.cells {
            return Err(MarkerError::ImageTooSmall {
                side,
                cells: self.cells,
            });
        }
        let cells = u64::from(self.cells);
        let side64 = u64::from(side);
        Ok(GrayImage::from_fn(side, side, |x, y| {
            let cx = (u64::from(x) * cells / side64) as u32;
            let cy = (u64::from(y) * cells / side64) as u32;
            if self.is_white(cx, cy) {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        }))
    }
}

/// A rasterized marker: its cell grid and the scaled bitmap
#[derive(Debug, Clone)]
pub struct MarkerImage {
    pub pattern: MarkerPattern,
    pub bitmap: GrayImage,
}

/// Rasterize marker `id` of `dictionary` for a physical side of `size_m` meters
pub fn rasterize(dictionary: Dictionary, id: u32, size_m: f64) -> Result<MarkerImage, MarkerError> {
    let codeword = dictionary.codeword(id).ok_or(MarkerError::IdOutOfRange {
        id,
        dictionary,
        capacity: dictionary.capacity(),
    })?;
    let side = side_pixels(size_m)?;
    let pattern = MarkerPattern::from_codeword(codeword, dictionary.marker_size());
    let bitmap = pattern.render(side)?;

    tracing::debug!(%dictionary, id, side, "Rasterized marker");
    Ok(MarkerImage { pattern, bitmap })
}
