use thiserror::Error;

/// Everything that can abort a palette-card request.
///
/// All variants are fail-fast: the pipeline is pure, so retrying a failed
/// request with the same input reproduces the same error.
#[derive(Debug, Error)]
pub enum CardError {
    #[error("swatch count must be one of 5, 8 or 10, got {0}")]
    InvalidColorCount(usize),

    /// Grid lookup failed for a count that should have been validated.
    #[error("no swatch grid is defined for {0} swatches")]
    UnsupportedGridShape(usize),

    #[error("unable to decode image: {0}")]
    DecodeFailure(#[source] image::ImageError),

    #[error("unable to encode image: {0}")]
    EncodeFailure(#[source] image::ImageError),

    #[error("image of {width}x{height} is too small to lay out")]
    DegenerateImage { width: u32, height: u32 },

    #[error("invalid hex color {0:?}")]
    InvalidHexColor(String),

    #[error("aspect ratio must be two positive numbers, got {0:?}")]
    InvalidAspectRatio(String),

    #[error("wallpaper of {width}x{height} exceeds the {max_pixels}-pixel limit")]
    WallpaperTooLarge { width: u64, height: u64, max_pixels: u64 },

    #[error("fill color index {index} is outside the {len}-color palette")]
    FillIndexOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, CardError>;
