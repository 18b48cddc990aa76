// Core types shared by every drawing step.

use image::{Rgb, RgbImage, Rgba, RgbaImage};

/// The final card: 3-channel, no transparency, written out as JPEG.
pub type Canvas = RgbImage;

/// The polaroid buffer. Everything outside the frame stays alpha 0.
pub type Overlay = RgbaImage;

/// A color packed as 0xRRGGBB plus a separate alpha byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub rgb: u32,  // 0x00RRGGBB, same packing the window buffer uses
    pub alpha: u8, // 255 = opaque
}

impl Color {
    pub const WHITE: Color = Color::hex(0xFF_FF_FF);
    pub const BLACK: Color = Color::hex(0x00_00_00);

    /// Opaque color from a `0xRRGGBB` literal.
    pub const fn hex(rgb: u32) -> Self {
        Self { rgb: rgb & 0x00FF_FFFF, alpha: 255 }
    }

    #[inline] pub const fn r(self) -> u8 { ((self.rgb >> 16) & 0xFF) as u8 }
    #[inline] pub const fn g(self) -> u8 { ((self.rgb >> 8) & 0xFF) as u8 }
    #[inline] pub const fn b(self) -> u8 { (self.rgb & 0xFF) as u8 }

    pub fn to_rgb(self) -> Rgb<u8> {
        Rgb([self.r(), self.g(), self.b()])
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r(), self.g(), self.b(), self.alpha])
    }

    /// `#RRGGBB`, the form SVG fill attributes accept.
    pub fn to_hex_string(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r(), self.g(), self.b())
    }
}

/// Axis-aligned pixel rectangle. `x`/`y` is the top-left pixel; right/bottom are exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Build from two corners where both are painted (PIL-style boxes).
    pub fn from_inclusive(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        let width = (x1 - x0 + 1).max(0) as u32;
        let height = (y1 - y0 + 1).max(0) as u32;
        Self { x: x0, y: y0, width, height }
    }

    #[inline] pub fn right(&self) -> i32 { self.x + self.width as i32 }
    #[inline] pub fn bottom(&self) -> i32 { self.y + self.height as i32 }

    /// Geometric center, in continuous pixel coordinates.
    pub fn center(&self) -> (f32, f32) {
        (
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}
