// Static layout + palette for the card. Nothing here is computed at runtime;
// `Style::default()` is the card we ship.

use crate::error::{Error, Result};
use crate::polaroid::PolaroidStyle;
use crate::text::{FontFallback, FontSource};
use crate::types::{Color, Rect};
use std::path::PathBuf;

pub const CANVAS_WIDTH: u32 = 1200;
pub const CANVAS_HEIGHT: u32 = 630;
pub const JPEG_QUALITY: u8 = 95;
pub const OUTPUT_PATH: &str = "public/og-image.jpg";

/// One dark rounded box with a line of centered text.
#[derive(Clone, Debug, PartialEq)]
pub struct BannerStyle {
    pub rect: Rect, // both end rows and columns are painted
    pub text_center: (f32, f32),
    pub radius: u32,
    pub fill: Color,
    pub text: String,
    pub text_size: f32,
    pub text_color: Color,
}

/// Which faces to try for every piece of text, and what to do if none loads.
#[derive(Clone, Debug, PartialEq)]
pub struct FontStyle {
    pub sources: Vec<FontSource>,
    pub fallback: FontFallback,
}

impl Default for FontStyle {
    fn default() -> Self {
        Self {
            sources: vec![
                FontSource::Path(PathBuf::from("/System/Library/Fonts/Helvetica.ttc")),
                FontSource::Family(String::from("Helvetica")),
                FontSource::Family(String::from("Arial")),
                FontSource::Family(String::from("Liberation Sans")),
                FontSource::Family(String::from("DejaVu Sans")),
            ],
            fallback: FontFallback::Builtin,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    pub width: u32,
    pub height: u32,
    pub background: Color,
    pub grain_amplitude: u8, // offsets land in [-amplitude, +amplitude]
    pub polaroid: PolaroidStyle,
    pub title: BannerStyle,
    pub subtitle: BannerStyle,
    pub fonts: FontStyle,
    pub output: PathBuf,
    pub jpeg_quality: u8,
}

impl Default for Style {
    fn default() -> Self {
        let dark = Color::hex(0x333333);
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            background: Color::hex(0x8B6F47),
            grain_amplitude: 5,
            polaroid: PolaroidStyle::default(),
            title: BannerStyle {
                rect: Rect::from_inclusive(350, 200, 1050, 280),
                text_center: (700.0, 240.0),
                radius: 8,
                fill: dark,
                text: String::from("YANNICK DAILIES"),
                text_size: 42.0,
                text_color: Color::WHITE,
            },
            subtitle: BannerStyle {
                rect: Rect::from_inclusive(350, 310, 1050, 370),
                text_center: (700.0, 340.0),
                radius: 8,
                fill: dark,
                text: String::from("SMALL MOMENTS NO ONE NOTICES."),
                text_size: 20.0,
                text_color: Color::WHITE,
            },
            fonts: FontStyle::default(),
            output: PathBuf::from(OUTPUT_PATH),
            jpeg_quality: JPEG_QUALITY,
        }
    }
}

impl Style {
    pub fn canvas_rect(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Check that every box fits where it is supposed to. The defaults always
    /// pass; this catches edits that push something off the card.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Layout(format!("canvas is {}x{}", self.width, self.height)));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(Error::Layout(format!("jpeg quality {} not in 1..=100", self.jpeg_quality)));
        }

        let canvas = self.canvas_rect();
        for (name, banner) in [("title", &self.title), ("subtitle", &self.subtitle)] {
            if !canvas.contains_rect(&banner.rect) {
                return Err(Error::Layout(format!("{name} banner {:?} leaves the canvas", banner.rect)));
            }
        }
        if self.title.rect.intersects(&self.subtitle.rect) {
            return Err(Error::Layout(format!(
                "banners overlap: {:?} and {:?}",
                self.title.rect, self.subtitle.rect
            )));
        }

        let p = &self.polaroid;
        let overlay = Rect::new(0, 0, p.overlay_width, p.overlay_height);
        if !overlay.contains_rect(&p.frame) {
            return Err(Error::Layout(format!("polaroid frame {:?} leaves the overlay", p.frame)));
        }
        let window = p.window();
        if window.width == 0 || window.height == 0 || !p.frame.contains_rect(&window) {
            return Err(Error::Layout(format!("photo window {window:?} does not fit the frame")));
        }
        let (cx, cy) = p.caption_center;
        if cx < p.frame.x as f32
            || cy < p.frame.y as f32
            || cx >= p.frame.right() as f32
            || cy >= p.frame.bottom() as f32
        {
            return Err(Error::Layout(format!("caption center {:?} is off the frame", p.caption_center)));
        }
        let placed = p.placed_bounds();
        if !canvas.contains_rect(&placed) {
            return Err(Error::Layout(format!("rotated polaroid {placed:?} leaves the canvas")));
        }
        Ok(())
    }
}
