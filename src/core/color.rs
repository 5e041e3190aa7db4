use crate::core::math::{Real, Vector};

/// Linear RGB color with channels nominally in [0, 1].
pub type Color = Vector;

pub fn black() -> Color {
    Color::zeros()
}

pub fn white() -> Color {
    Color::new(1.0, 1.0, 1.0)
}

pub fn red() -> Color {
    Color::new(1.0, 0.0, 0.0)
}

pub fn blue() -> Color {
    Color::new(0.0, 0.0, 1.0)
}

/// Clamps every channel to [0, 1].
#[inline]
pub fn confine(color: &Color) -> Color {
    color.map(|c| c.clamp(0.0, 1.0))
}

/// Converts a color to 8-bit channels, clamping out-of-range values.
#[inline]
pub fn to_rgb8(color: &Color) -> [u8; 3] {
    let to_byte = |c: Real| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    [to_byte(color.x), to_byte(color.y), to_byte(color.z)]
}
