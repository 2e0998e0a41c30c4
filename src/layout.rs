//! Card geometry: square crop and the flush swatch grid underneath it.

use image::{RgbImage, imageops};

use crate::error::{CardError, Result};

const MIN_BORDER: u32 = 24;
const BORDER_DIVISOR: u32 = 25;
const MIN_CELL_GAP: u32 = 14;
const CELL_GAP_DIVISOR: u32 = 30;

/// Center-crop to a square using the shorter side.
///
/// Cropping an image that is already square returns an identical copy.
pub fn center_crop_to_square(img: &RgbImage) -> RgbImage {
    let (w, h) = img.dimensions();
    let side = w.min(h);
    let left = (w - side) / 2;
    let top = (h - side) / 2;
    imageops::crop_imm(img, left, top, side, side).to_image()
}

/// `(columns, rows)` of the swatch grid for a palette size.
pub fn grid_shape(count: usize) -> Result<(u32, u32)> {
    match count {
        5 => Ok((5, 1)),
        8 => Ok((4, 2)),
        10 => Ok((5, 2)),
        other => Err(CardError::UnsupportedGridShape(other)),
    }
}

/// Pixel geometry of a palette card, derived from the cropped image width
/// and swatch count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutSpec {
    pub columns: u32,
    pub rows: u32,
    pub cell_size: u32,
    /// Horizontal and vertical spacing between swatches.
    pub cell_gap: u32,
    /// Uniform margin around the whole card.
    pub border: u32,
    /// Vertical spacing between the image and the first swatch row.
    pub outer_gap: u32,
    /// Side of the square image the layout was computed for.
    pub image_size: u32,
}

impl LayoutSpec {
    /// Compute the layout for a square image of side `image_size`.
    ///
    /// The gap starts at `max(14, size / 30)` and is widened by at most
    /// `columns - 1` pixels until the swatches divide the remaining width
    /// evenly, so the grid always spans exactly `image_size`.
    pub fn compute(image_size: u32, count: usize) -> Result<Self> {
        let (columns, rows) = grid_shape(count)?;
        let degenerate = CardError::DegenerateImage { width: image_size, height: image_size };
        if image_size == 0 {
            return Err(degenerate);
        }

        let border = MIN_BORDER.max(image_size / BORDER_DIVISOR);
        let base_gap = MIN_CELL_GAP.max(image_size / CELL_GAP_DIVISOR);
        // (columns - 1) * gap ≡ -gap (mod columns), so the swatch span divides
        // evenly once size + gap is a multiple of columns.
        let cell_gap = base_gap + (columns - (image_size + base_gap) % columns) % columns;

        let gaps = (columns - 1) * cell_gap;
        if image_size < gaps + columns {
            return Err(degenerate);
        }
        let cell_size = (image_size - gaps) / columns;

        Ok(Self { columns, rows, cell_size, cell_gap, border, outer_gap: cell_gap, image_size })
    }

    pub fn grid_width(&self) -> u32 {
        self.columns * self.cell_size + (self.columns - 1) * self.cell_gap
    }

    pub fn grid_height(&self) -> u32 {
        self.rows * self.cell_size + (self.rows - 1) * self.cell_gap
    }

    pub fn capacity(&self) -> usize {
        (self.columns * self.rows) as usize
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        let width = self.image_size + 2 * self.border;
        let height = self.image_size + self.outer_gap + self.grid_height() + 2 * self.border;
        (width, height)
    }

    /// Top-left corner of swatch `index` in row-major order.
    pub fn cell_origin(&self, index: usize) -> (u32, u32) {
        let index = index as u32;
        let (col, row) = (index % self.columns, index / self.columns);
        let pitch = self.cell_size + self.cell_gap;
        let x = self.border + col * pitch;
        let y = self.border + self.image_size + self.outer_gap + row * pitch;
        (x, y)
    }
}
