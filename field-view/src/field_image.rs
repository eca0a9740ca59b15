//! Conversion of sampled force fields into displayable images.
//!
//! Each [`FieldSample`] becomes one RGB pixel: red carries `|fx|`, green is
//! always zero and blue carries `|fy|`, each scaled by 255 and clamped.

use egui::ColorImage;
use field_core::field::{FieldGrid, FieldSample};

/// Maps one raw force component onto a color channel.
///
/// Truncates like an integer cast; values at or above `1.0` in magnitude
/// saturate at 255 and NaN maps to 0.
#[inline]
pub fn channel_to_byte(c: f64) -> u8 {
    (c.abs() * 255.0) as u8
}

pub fn sample_to_rgb(sample: &FieldSample) -> [u8; 3] {
    sample.channels().map(channel_to_byte)
}

/// Builds a `resolution x resolution` image from a sampled grid, one pixel
/// per cell, rows top to bottom.
pub fn field_to_color_image(grid: &FieldGrid) -> ColorImage {
    let mut rgb = Vec::with_capacity(grid.samples().len() * 3);
    for sample in grid.samples() {
        rgb.extend_from_slice(&sample_to_rgb(sample));
    }
    let n = grid.resolution();
    ColorImage::from_rgb([n, n], &rgb)
}
