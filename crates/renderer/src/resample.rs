//! Resize the finished composite to the fixed square output size.
//!
//! Source grids are only roughly square (the provider extent is given in km
//! on each side), so forcing a square output distorts the aspect slightly.
//! That is accepted.
//!
//! Filtering runs on premultiplied alpha, so the colour stored under a
//! transparent pixel never bleeds into its visible neighbours.

use image::{imageops, ImageBuffer, Rgba, RgbaImage};

use crate::config::ResampleFilter;

/// 16-bit premultiplied working buffer.
type PremultipliedImage = ImageBuffer<Rgba<u16>, Vec<u16>>;

/// Full alpha in the working buffer. `255 * ALPHA_SCALE` stays well below
/// `u16::MAX` so filter overshoot clamps neither colour nor alpha.
const ALPHA_SCALE: f32 = 192.0;

/// Resample to `size x size` pixels.
pub fn resample(image: &RgbaImage, size: u32, filter: ResampleFilter) -> RgbaImage {
    if image.width() == size && image.height() == size {
        return image.clone();
    }
    let resized = imageops::resize(&premultiply(image), size, size, filter.into());
    unpremultiply(&resized)
}

fn premultiply(image: &RgbaImage) -> PremultipliedImage {
    ImageBuffer::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let weight = a as f32 * ALPHA_SCALE / 255.0;
        let scale = |c: u8| (c as f32 * weight).round() as u16;
        Rgba([scale(r), scale(g), scale(b), (a as f32 * ALPHA_SCALE).round() as u16])
    })
}

fn unpremultiply(image: &PremultipliedImage) -> RgbaImage {
    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let alpha = (a as f32 / ALPHA_SCALE).round().min(255.0) as u8;
        if alpha == 0 {
            return Rgba([0, 0, 0, 0]);
        }
        let unscale = |c: u16| (c as f32 * 255.0 / a as f32).round().min(255.0) as u8;
        Rgba([unscale(r), unscale(g), unscale(b), alpha])
    })
}
