// Grain: a per-pixel brightness jitter over the background.
// Visual: the flat brown fill looks like card stock instead of a solid swatch.
//
// The noise is a pure function of (x, y), so two runs paint the same grain.

use crate::types::Canvas;
use image::Rgb;

/// Integer mixing hash of a pixel coordinate (xorshift-multiply rounds).
/// Visual: neighbouring pixels get unrelated values, so there is no banding.
#[inline]
pub fn coord_hash(x: u32, y: u32) -> u32 {
    let mut h = x.wrapping_mul(0x9E37_79B1) ^ y.wrapping_mul(0x85EB_CA77).rotate_left(13);
    h ^= h >> 15;
    h = h.wrapping_mul(0x2C1B_3C6D);
    h ^= h >> 12;
    h = h.wrapping_mul(0x297A_2D39);
    h ^= h >> 15;
    h
}

/// Signed brightness offset for a pixel, in [-amplitude, +amplitude].
#[inline]
pub fn grain_offset(x: u32, y: u32, amplitude: u8) -> i16 {
    let span = 2 * amplitude as u32 + 1;
    (coord_hash(x, y) % span) as i16 - amplitude as i16
}

/// Add `offset` to one channel with saturation to [0,255].
#[inline]
fn add_saturating(v: u8, offset: i16) -> u8 {
    (v as i16 + offset).clamp(0, 255) as u8
}

/// Jitter every pixel of the canvas by its coordinate's offset (same offset
/// on R, G and B so the hue does not drift).
pub fn apply_grain(canvas: &mut Canvas, amplitude: u8) {
    if amplitude == 0 {
        return;
    }
    for (x, y, px) in canvas.enumerate_pixels_mut() {
        let n = grain_offset(x, y, amplitude);
        let Rgb([r, g, b]) = *px;
        *px = Rgb([add_saturating(r, n), add_saturating(g, n), add_saturating(b, n)]);
    }
}
