//! Palette cards: a photo's dominant colors laid out as swatches under a
//! square crop of the photo, optionally padded out to a wallpaper.
//!
//! [`palette_card`] is the JavaScript entry point; native callers use
//! [`palette_card_bytes`] or the typed API in [`pipeline`].

use js_sys::{Array, Object, Reflect, Uint8Array};
use wasm_bindgen::prelude::*;

pub mod color;
pub mod compose;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod quantize;
pub mod wallpaper;

pub use color::{BLACK_BORDER, Color, WHITE_BORDER, parse_hex, to_hex};
pub use compose::{SwatchShape, compose};
pub use error::{CardError, Result};
pub use layout::{LayoutSpec, center_crop_to_square, grid_shape};
pub use pipeline::{
    CardOptions, EncodedCard, OutputKind, PaletteCard, Wallpaper, WallpaperOptions, decode_image,
    encode_png, make_card, output_file_name,
};
pub use quantize::{DEFAULT_SEED, Palette, Sampling, Swatch, extract_colors};
pub use wallpaper::{AspectRatio, MAX_WALLPAPER_PIXELS, WallpaperLayout, pad_to_ratio};

/// Build a palette card from uploaded image bytes.
///
/// * `n_colors` – 5, 8 or 10 swatches.
/// * `wide` – spread the five swatches over a ten-color clustering.
/// * `ellipse` – round swatches instead of squares.
/// * `background` – card color as hex, e.g. `#F5F5F5`.
/// * `wallpaper` – `desktop`, `mobile` or `W:H`; requires `fill_index`,
///   the palette entry used for the padding (defaults to 0).
///
/// Returns `{ image: Uint8Array, palette: string[], wallpaper?: Uint8Array }`
/// with PNG-encoded images and `RRGGBB` palette strings.
#[wasm_bindgen]
pub fn palette_card(
    input: Vec<u8>,
    n_colors: usize,
    wide: bool,
    ellipse: bool,
    background: String,
    wallpaper: Option<String>,
    fill_index: Option<usize>,
) -> std::result::Result<Object, JsValue> {
    let js_err = |e: CardError| JsValue::from_str(&e.to_string());

    let wallpaper = wallpaper
        .map(|ratio| -> Result<WallpaperOptions> {
            Ok(WallpaperOptions { ratio: ratio.parse()?, fill_index: fill_index.unwrap_or(0) })
        })
        .transpose()
        .map_err(js_err)?;

    let options = CardOptions {
        swatch_count: n_colors,
        sampling: if wide { Sampling::Wide } else { Sampling::Narrow },
        shape: if ellipse { SwatchShape::Ellipse } else { SwatchShape::Rectangle },
        background: parse_hex(&background).map_err(js_err)?,
        seed: DEFAULT_SEED,
        wallpaper,
    };

    let img = decode_image(&input).map_err(js_err)?;
    let encoded = make_card(&img, &options).and_then(|card| card.encode()).map_err(js_err)?;

    let palette_js = Array::new();
    for hex in &encoded.palette {
        palette_js.push(&JsValue::from_str(hex));
    }

    let result = Object::new();
    Reflect::set(&result, &JsValue::from_str("image"), &Uint8Array::from(encoded.card.as_slice()))?;
    Reflect::set(&result, &JsValue::from_str("palette"), &palette_js)?;
    if let Some(png) = encoded.wallpaper {
        Reflect::set(&result, &JsValue::from_str("wallpaper"), &Uint8Array::from(png.as_slice()))?;
    }

    Ok(result)
}

/// Decode, build and PNG-encode a palette card in one call.
#[cfg(not(target_arch = "wasm32"))]
pub fn palette_card_bytes(input: &[u8], options: &CardOptions) -> Result<EncodedCard> {
    let img = decode_image(input)?;
    make_card(&img, options)?.encode()
}
