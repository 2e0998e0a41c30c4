use palette::Srgb;

use crate::error::{CardError, Result};

/// An 8-bit sRGB triple. Every color that enters or leaves the crate uses it.
pub type Color = Srgb<u8>;

/// Light card background offered by the upload form.
pub const WHITE_BORDER: Color = Srgb::new(0xF5, 0xF5, 0xF5);
/// Dark card background offered by the upload form.
pub const BLACK_BORDER: Color = Srgb::new(0x1C, 0x1C, 0x1C);

/// Parse `RRGGBB`, optionally prefixed with `#` and surrounded by whitespace.
pub fn parse_hex(input: &str) -> Result<Color> {
    let hex = input.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(CardError::InvalidHexColor(input.to_string()));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| CardError::InvalidHexColor(input.to_string()))
    };
    Ok(Srgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Uppercase `RRGGBB`, no leading `#`.
pub fn to_hex(color: Color) -> String {
    format!("{:02X}{:02X}{:02X}", color.red, color.green, color.blue)
}

#[inline(always)]
pub(crate) fn to_pixel(color: Color) -> image::Rgb<u8> {
    image::Rgb([color.red, color.green, color.blue])
}

/// Round a unit-range float color to the nearest 8-bit value per channel.
pub(crate) fn quantize_channels(color: Srgb<f32>) -> Color {
    let round = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Srgb::new(round(color.red), round(color.green), round(color.blue))
}
