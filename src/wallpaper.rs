//! Padding a finished card out to a wallpaper aspect ratio.
//!
//! Content is never scaled or cropped: the card gets a uniform frame and is
//! then centered on a larger canvas, so the output is at least as large as
//! the input on both axes.

use std::fmt;
use std::str::FromStr;

use image::{RgbImage, imageops};
use tracing::debug;

use crate::color::{Color, to_pixel};
use crate::error::{CardError, Result};

/// A positive `width:height` ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AspectRatio {
    width: f64,
    height: f64,
}

impl AspectRatio {
    /// 16:9 desktop screens.
    pub const DESKTOP: Self = Self { width: 16.0, height: 9.0 };
    /// 9:19.5 phone screens.
    pub const MOBILE: Self = Self { width: 9.0, height: 19.5 };

    pub fn new(width: f64, height: f64) -> Result<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if valid(width) && valid(height) {
            Ok(Self { width, height })
        } else {
            Err(CardError::InvalidAspectRatio(format!("{width}:{height}")))
        }
    }

    /// Parse `W:H`, e.g. `16:9` or `9:19.5`.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || CardError::InvalidAspectRatio(input.to_string());
        let (w, h) = input.trim().split_once(':').ok_or_else(invalid)?;
        let w: f64 = w.trim().parse().map_err(|_| invalid())?;
        let h: f64 = h.trim().parse().map_err(|_| invalid())?;
        Self::new(w, h).map_err(|_| invalid())
    }

    pub fn value(&self) -> f64 {
        self.width / self.height
    }

    pub fn is_landscape(&self) -> bool {
        self.width >= self.height
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

/// Accepts `desktop`, `mobile`, or an explicit `W:H`.
impl FromStr for AspectRatio {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desktop" | "landscape" => Ok(Self::DESKTOP),
            "mobile" | "portrait" => Ok(Self::MOBILE),
            _ => Self::parse(s),
        }
    }
}

/// Largest wallpaper, in pixels, that will be allocated.
pub const MAX_WALLPAPER_PIXELS: u64 = 1 << 28;

/// Final size and card offset for a wallpaper, before any pixels are touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WallpaperLayout {
    pub width: u32,
    pub height: u32,
    /// Frame added on every side before the ratio padding.
    pub frame: u32,
    /// Top-left corner of the card on the wallpaper.
    pub offset: (u32, u32),
}

impl WallpaperLayout {
    /// Fails with [`CardError::WallpaperTooLarge`] when the ratio is so
    /// extreme that the padded side would exceed [`MAX_WALLPAPER_PIXELS`].
    pub fn compute(card_width: u32, card_height: u32, ratio: AspectRatio) -> Result<Self> {
        let frame = card_width.min(card_height) / 4;
        let framed_w = card_width + 2 * frame;
        let framed_h = card_height + 2 * frame;

        let target = ratio.value();
        let current = framed_w as f64 / framed_h as f64;
        let (width, height) = if target > current {
            ((framed_h as f64 * target).round().max(framed_w as f64), framed_h as f64)
        } else {
            (framed_w as f64, (framed_w as f64 / target).round().max(framed_h as f64))
        };
        if width * height > MAX_WALLPAPER_PIXELS as f64 {
            return Err(CardError::WallpaperTooLarge {
                width: width.min(u64::MAX as f64) as u64,
                height: height.min(u64::MAX as f64) as u64,
                max_pixels: MAX_WALLPAPER_PIXELS,
            });
        }
        // Both sides are within the pixel budget, hence below u32::MAX.
        let (width, height) = (width as u32, height as u32);

        // Odd remainders go to the right/bottom.
        let left = (width - framed_w) / 2;
        let top = (height - framed_h) / 2;

        Ok(Self { width, height, frame, offset: (frame + left, frame + top) })
    }
}

/// Frame `card` with `fill` and pad it symmetrically to `ratio`.
pub fn pad_to_ratio(card: &RgbImage, ratio: AspectRatio, fill: Color) -> Result<RgbImage> {
    let layout = WallpaperLayout::compute(card.width(), card.height(), ratio)?;
    let mut out = RgbImage::from_pixel(layout.width, layout.height, to_pixel(fill));
    imageops::replace(&mut out, card, layout.offset.0 as i64, layout.offset.1 as i64);
    debug!(%ratio, width = layout.width, height = layout.height, frame = layout.frame, "padded wallpaper");
    Ok(out)
}
