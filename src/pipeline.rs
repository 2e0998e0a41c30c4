//! One palette-card request, from decoded upload to encoded PNGs.
//!
//! Steps run in a fixed order (crop, quantize, compose, optionally pad) and
//! the first failure aborts the request; no partial card is ever returned.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbImage};
use tracing::debug;

use crate::color::{Color, WHITE_BORDER};
use crate::compose::{SwatchShape, compose_with_layout};
use crate::error::{CardError, Result};
use crate::layout::{LayoutSpec, center_crop_to_square};
use crate::quantize::{DEFAULT_SEED, Palette, Sampling, extract_colors, validate_count};
use crate::wallpaper::{AspectRatio, pad_to_ratio};

/// Wallpaper request: target ratio plus which palette entry fills the padding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallpaperOptions {
    pub ratio: AspectRatio,
    pub fill_index: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardOptions {
    /// 5, 8 or 10.
    pub swatch_count: usize,
    pub sampling: Sampling,
    pub shape: SwatchShape,
    pub background: Color,
    pub seed: u64,
    pub wallpaper: Option<WallpaperOptions>,
}

impl Default for CardOptions {
    fn default() -> Self {
        Self {
            swatch_count: 5,
            sampling: Sampling::Narrow,
            shape: SwatchShape::Rectangle,
            background: WHITE_BORDER,
            seed: DEFAULT_SEED,
            wallpaper: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Wallpaper {
    pub ratio: AspectRatio,
    pub fill: Color,
    pub image: RgbImage,
}

/// Everything a request produces.
#[derive(Clone, Debug)]
pub struct PaletteCard {
    pub palette: Palette,
    pub layout: LayoutSpec,
    pub canvas: RgbImage,
    pub wallpaper: Option<Wallpaper>,
}

/// Build a palette card (and optional wallpaper) from a decoded image.
pub fn make_card(img: &DynamicImage, options: &CardOptions) -> Result<PaletteCard> {
    validate_count(options.swatch_count)?;
    let rgb = img.to_rgb8();
    debug!(width = rgb.width(), height = rgb.height(), "loaded");

    let square = center_crop_to_square(&rgb);
    if square.width() == 0 {
        return Err(CardError::DegenerateImage { width: rgb.width(), height: rgb.height() });
    }
    let layout = LayoutSpec::compute(square.width(), options.swatch_count)?;
    debug!(side = square.width(), "cropped");

    let palette = extract_colors(&square, options.swatch_count, options.sampling, options.seed)?;
    debug!(colors = palette.len(), "quantized");

    let canvas = compose_with_layout(&square, &layout, &palette, options.background, options.shape);

    let wallpaper = match options.wallpaper {
        Some(wp) => {
            let fill = palette
                .get(wp.fill_index)
                .ok_or(CardError::FillIndexOutOfRange { index: wp.fill_index, len: palette.len() })?;
            let image = pad_to_ratio(&canvas, wp.ratio, fill)?;
            Some(Wallpaper { ratio: wp.ratio, fill, image })
        }
        None => None,
    };

    debug!(
        width = canvas.width(),
        height = canvas.height(),
        palette = ?palette.hex(),
        wallpaper = wallpaper.is_some(),
        "palette card ready"
    );
    Ok(PaletteCard { palette, layout, canvas, wallpaper })
}

/// Decode uploaded bytes in any format `image` recognises.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(CardError::DecodeFailure)
}

pub fn encode_png(img: &RgbImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(CardError::EncodeFailure)?;
    Ok(buf)
}

/// PNG-encoded request output.
#[derive(Clone, Debug)]
pub struct EncodedCard {
    pub card: Vec<u8>,
    pub wallpaper: Option<Vec<u8>>,
    /// Uppercase `RRGGBB`, most common first.
    pub palette: Vec<String>,
}

impl PaletteCard {
    pub fn encode(&self) -> Result<EncodedCard> {
        let card = encode_png(&self.canvas)?;
        let wallpaper = self.wallpaper.as_ref().map(|w| encode_png(&w.image)).transpose()?;
        Ok(EncodedCard { card, wallpaper, palette: self.palette.hex() })
    }
}

/// Which download a file name is for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OutputKind {
    Card,
    Wallpaper(AspectRatio),
}

/// `<stem>_palette.png`, or `<stem>_palette_landscape.png` /
/// `<stem>_palette_portrait.png` for wallpapers.
pub fn output_file_name(upload_name: &str, kind: OutputKind) -> String {
    let stem = Path::new(upload_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    match kind {
        OutputKind::Card => format!("{stem}_palette.png"),
        OutputKind::Wallpaper(ratio) if ratio.is_landscape() => format!("{stem}_palette_landscape.png"),
        OutputKind::Wallpaper(_) => format!("{stem}_palette_portrait.png"),
    }
}
