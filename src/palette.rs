//! Adaptive palette reduction applied to every finished frame.
//!
//! GIF frames carry an indexed colour table. Quantising each frame to a
//! small, layout-specific palette before encoding keeps output size bounded
//! and guarantees the encoder can use the colours verbatim.

use color_quant::NeuQuant;
use image::{Rgba, RgbaImage};

/// NeuQuant sampling factor: 1 is slowest/best, 30 fastest.
const SAMPLE_FACTOR: i32 = 10;

/// Smallest palette NeuQuant handles reliably.
pub const MIN_COLORS: u16 = 16;

/// Largest palette a GIF frame can carry.
pub const MAX_COLORS: u16 = 256;

/// Quantise `image` to at most `colors` colours. Alpha is forced opaque.
pub fn reduce_palette(image: &RgbaImage, colors: u16) -> RgbaImage {
    let colors = colors.clamp(MIN_COLORS, MAX_COLORS) as usize;
    let mut opaque = image.clone();
    for pixel in opaque.pixels_mut() {
        pixel.0[3] = 255;
    }
    if opaque.width() == 0 || opaque.height() == 0 {
        return opaque;
    }

    let quantizer = NeuQuant::new(SAMPLE_FACTOR, colors, opaque.as_raw());
    let table = quantizer.color_map_rgba();
    for pixel in opaque.pixels_mut() {
        let idx = quantizer.index_of(&pixel.0) * 4;
        *pixel = Rgba([table[idx], table[idx + 1], table[idx + 2], 255]);
    }
    opaque
}
