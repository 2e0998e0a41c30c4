use image::{Rgb, RgbImage, imageops};
use tracing::debug;

use crate::color::{Color, to_pixel};
use crate::error::{CardError, Result};
use crate::layout::{LayoutSpec, center_crop_to_square};
use crate::quantize::Palette;

/// Outline used for each swatch cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SwatchShape {
    #[default]
    Rectangle,
    /// Inscribed in the swatch cell.
    Ellipse,
}

/// Render the palette card: the square-cropped image at `(border, border)`
/// with the swatch grid below it, everything else `background`.
///
/// `img` may be any size; it is center-cropped first.
pub fn compose(img: &RgbImage, palette: &Palette, background: Color, shape: SwatchShape) -> Result<RgbImage> {
    let square = center_crop_to_square(img);
    if square.width() == 0 {
        return Err(CardError::DegenerateImage { width: img.width(), height: img.height() });
    }
    let layout = LayoutSpec::compute(square.width(), palette.len())?;
    Ok(compose_with_layout(&square, &layout, palette, background, shape))
}

/// Draw onto a fresh canvas using a precomputed layout. `square` must be the
/// `layout.image_size` square image.
pub fn compose_with_layout(
    square: &RgbImage,
    layout: &LayoutSpec,
    palette: &Palette,
    background: Color,
    shape: SwatchShape,
) -> RgbImage {
    let (width, height) = layout.canvas_size();
    let mut canvas = RgbImage::from_pixel(width, height, to_pixel(background));
    imageops::replace(&mut canvas, square, layout.border as i64, layout.border as i64);

    // Stops early if the palette is shorter than the grid.
    for (i, color) in palette.colors().take(layout.capacity()).enumerate() {
        let (x, y) = layout.cell_origin(i);
        match shape {
            SwatchShape::Rectangle => fill_rect(&mut canvas, x, y, layout.cell_size, to_pixel(color)),
            SwatchShape::Ellipse => fill_ellipse(&mut canvas, x, y, layout.cell_size, to_pixel(color)),
        }
    }

    debug!(width, height, cell = layout.cell_size, gap = layout.cell_gap, ?shape, "composed card");
    canvas
}

/// Fill the half-open square `[x, x + size) × [y, y + size)`.
fn fill_rect(canvas: &mut RgbImage, x: u32, y: u32, size: u32, pixel: Rgb<u8>) {
    for py in y..(y + size).min(canvas.height()) {
        for px in x..(x + size).min(canvas.width()) {
            canvas.put_pixel(px, py, pixel);
        }
    }
}

/// Fill the ellipse inscribed in the same square as [`fill_rect`]; a pixel
/// is inside when its center is.
fn fill_ellipse(canvas: &mut RgbImage, x: u32, y: u32, size: u32, pixel: Rgb<u8>) {
    let radius = size as f64 / 2.0;
    let cx = x as f64 + radius;
    let cy = y as f64 + radius;
    for py in y..(y + size).min(canvas.height()) {
        let dy = (py as f64 + 0.5 - cy) / radius;
        for px in x..(x + size).min(canvas.width()) {
            let dx = (px as f64 + 0.5 - cx) / radius;
            if dx * dx + dy * dy <= 1.0 {
                canvas.put_pixel(px, py, pixel);
            }
        }
    }
}
