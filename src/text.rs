// Text on the card: finding a font, measuring a string, drawing it centered.
// Visual effects provided here:
// 1) Anti-aliased outline text when a real font resolves (banners, caption).
// 2) A chunky 5x7 bitmap face when nothing resolves and fallback is allowed.

use crate::draw::{Surface, blend_pixel, fill_rect};
use crate::error::{Error, Result};
use crate::types::{Color, Rect};
use ab_glyph::{Font, FontVec, GlyphId, PxScale, ScaleFont, point};
use log::{debug, warn};
use resvg::usvg::fontdb;
use std::collections::HashMap;
use std::path::PathBuf;

/// Where to look for a face.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FontSource {
    /// A font file on disk (TTF/OTF, or the first face of a TTC).
    Path(PathBuf),
    /// A family name looked up among the installed system fonts.
    /// `sans-serif`, `serif` and `monospace` map to the generic families.
    Family(String),
}

/// What to do when none of the requested sources resolves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FontFallback {
    /// Use the built-in bitmap face and keep going.
    #[default]
    Builtin,
    /// Stop with `Error::FontUnavailable`.
    Fail,
}

/// A renderable face.
pub enum ResolvedFont {
    Outline(FontVec),
    Builtin,
}

impl ResolvedFont {
    pub fn is_builtin(&self) -> bool {
        matches!(self, ResolvedFont::Builtin)
    }
}

/// Resolves font requests once and hands out the cached face afterwards.
pub struct FontResolver {
    fallback: FontFallback,
    system: Option<fontdb::Database>, // loaded on the first family lookup
    cache: HashMap<Vec<FontSource>, ResolvedFont>,
}

impl FontResolver {
    pub fn new(fallback: FontFallback) -> Self {
        Self { fallback, system: None, cache: HashMap::new() }
    }

    /// First source that loads wins; otherwise apply the fallback policy.
    pub fn resolve(&mut self, sources: &[FontSource]) -> Result<&ResolvedFont> {
        if !self.cache.contains_key(sources) {
            let font = self.load(sources)?;
            self.cache.insert(sources.to_vec(), font);
        }
        self.cache
            .get(sources)
            .ok_or_else(|| Error::FontUnavailable(format!("{sources:?} vanished from cache")))
    }

    fn load(&mut self, sources: &[FontSource]) -> Result<ResolvedFont> {
        for source in sources {
            let loaded = match source {
                FontSource::Path(path) => load_path(path),
                FontSource::Family(name) => self.load_family(name),
            };
            match loaded {
                Some(font) => {
                    debug!("font resolved from {source:?}");
                    return Ok(ResolvedFont::Outline(font));
                }
                None => debug!("font source {source:?} unavailable"),
            }
        }

        match self.fallback {
            FontFallback::Builtin => {
                warn!("none of {sources:?} could be loaded; using the built-in bitmap font");
                Ok(ResolvedFont::Builtin)
            }
            FontFallback::Fail => Err(Error::FontUnavailable(format!("tried {sources:?}"))),
        }
    }

    fn load_family(&mut self, name: &str) -> Option<FontVec> {
        let db = self.system.get_or_insert_with(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            debug!("loaded {} system font faces", db.len());
            db
        });

        let family = match name {
            "sans-serif" => fontdb::Family::SansSerif,
            "serif" => fontdb::Family::Serif,
            "monospace" => fontdb::Family::Monospace,
            other => fontdb::Family::Name(other),
        };
        let id = db.query(&fontdb::Query { families: &[family], ..fontdb::Query::default() })?;
        db.with_face_data(id, |data, index| FontVec::try_from_vec_and_index(data.to_vec(), index).ok())
            .flatten()
    }
}

fn load_path(path: &std::path::Path) -> Option<FontVec> {
    let data = std::fs::read(path).ok()?;
    FontVec::try_from_vec_and_index(data, 0).ok()
}

/// Pixel scale that makes the em square `size` pixels tall, matching how
/// `size` is meant for TrueType fonts elsewhere.
fn em_scale(font: &FontVec, size: f32) -> PxScale {
    let upem = font.units_per_em().unwrap_or(1000.0);
    PxScale::from(size * font.height_unscaled() / upem)
}

/// Horizontal advance of `text` at `size`, in pixels.
pub fn text_width(font: &ResolvedFont, size: f32, text: &str) -> f32 {
    match font {
        ResolvedFont::Outline(f) => advance_width(f, em_scale(f, size), text),
        ResolvedFont::Builtin => builtin_width(builtin_scale(size), text) as f32,
    }
}

/// Draw `text` so its middle lands on `center`: horizontally centered on the
/// advance width, vertically halfway between ascender and descender.
pub fn draw_text_centered<S: Surface + ?Sized>(
    s: &mut S,
    font: &ResolvedFont,
    size: f32,
    center: (f32, f32),
    text: &str,
    color: Color,
) {
    match font {
        ResolvedFont::Outline(f) => draw_outline(s, f, size, center, text, color),
        ResolvedFont::Builtin => {
            let k = builtin_scale(size);
            let w = builtin_width(k, text) as f32;
            let h = (GLYPH_H * k) as f32;
            let x = (center.0 - w / 2.0).round() as i32;
            let y = (center.1 - h / 2.0).round() as i32;
            draw_builtin(s, x, y, k, text, color);
        }
    }
}

fn draw_outline<S: Surface + ?Sized>(
    s: &mut S,
    font: &FontVec,
    size: f32,
    center: (f32, f32),
    text: &str,
    color: Color,
) {
    let scale = em_scale(font, size);
    let sf = font.as_scaled(scale);

    let width = advance_width(font, scale, text);
    // descent is negative, so this sits the ink box around center.1
    let baseline = center.1 + (sf.ascent() + sf.descent()) / 2.0;
    let mut caret = center.0 - width / 2.0;

    let mut prev: Option<GlyphId> = None;
    for ch in text.chars() {
        let id = sf.glyph_id(ch);
        if let Some(p) = prev {
            caret += sf.kern(p, id);
        }
        let glyph = id.with_scale_and_position(scale, point(caret, baseline));
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            let (ox, oy) = (bounds.min.x as i32, bounds.min.y as i32);
            outlined.draw(|gx, gy, coverage| {
                blend_pixel(s, ox + gx as i32, oy + gy as i32, color, coverage);
            });
        }
        caret += sf.h_advance(id);
        prev = Some(id);
    }
}

fn advance_width(font: &FontVec, scale: PxScale, text: &str) -> f32 {
    let sf = font.as_scaled(scale);
    let mut width = 0.0;
    let mut prev: Option<GlyphId> = None;
    for ch in text.chars() {
        let id = sf.glyph_id(ch);
        if let Some(p) = prev {
            width += sf.kern(p, id);
        }
        width += sf.h_advance(id);
        prev = Some(id);
    }
    width
}

/* ---------- Built-in 5x7 bitmap face ---------- */

const GLYPH_W: u32 = 5;
const GLYPH_H: u32 = 7;
const ADVANCE: u32 = GLYPH_W + 1; // 1 column of spacing

/// Integer pixel size of one bitmap cell. Caps come out at roughly 70% of
/// the requested em size, about what a sans-serif face gives.
fn builtin_scale(size: f32) -> u32 {
    ((size / 10.0).round() as u32).max(1)
}

fn builtin_width(k: u32, text: &str) -> u32 {
    let n = text.chars().count() as u32;
    if n == 0 { 0 } else { (n * ADVANCE - 1) * k }
}

/// Return a 5x7 glyph bitmap.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
/// Lowercase shares the uppercase shapes.
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    // Helper macro to define a glyph quickly
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        ',' => g!(0b00000,0b00000,0b00000,0b00000,0b00110,0b00100,0b01000),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '!' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00000,0b00100),
        '?' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b00000,0b00100),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '\'' => g!(0b00100,0b00100,0b01000,0b00000,0b00000,0b00000,0b00000),
        '/' => g!(0b00001,0b00010,0b00010,0b00100,0b01000,0b01000,0b10000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),

        _ => None,
    }
}

/// Draw a string of 5x7 glyphs, each cell a `k`x`k` square, top-left at (x,y).
/// Characters without a glyph still advance, so spacing stays even.
fn draw_builtin<S: Surface + ?Sized>(s: &mut S, mut x: i32, y: i32, k: u32, text: &str, color: Color) {
    let step = (ADVANCE * k) as i32;
    for ch in text.chars() {
        if let Some(rows) = glyph5x7(ch) {
            for (ry, rowbits) in rows.iter().enumerate() {
                for rx in 0..GLYPH_W {
                    if (rowbits & (1 << (GLYPH_W - 1 - rx))) != 0 {
                        let cell = Rect::new(
                            x + (rx * k) as i32,
                            y + ry as i32 * k as i32,
                            k,
                            k,
                        );
                        fill_rect(s, cell, color);
                    }
                }
            }
        }
        x += step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn missing_path_falls_back_to_builtin() {
        let mut fonts = FontResolver::new(FontFallback::Builtin);
        let sources = [FontSource::Path(PathBuf::from("/definitely/not/here.ttf"))];
        assert!(fonts.resolve(&sources).unwrap().is_builtin());
    }

    #[test]
    fn missing_path_is_an_error_when_fallback_is_off() {
        let mut fonts = FontResolver::new(FontFallback::Fail);
        let sources = [FontSource::Path(PathBuf::from("/definitely/not/here.ttf"))];
        assert!(matches!(fonts.resolve(&sources), Err(Error::FontUnavailable(_))));
    }

    #[test]
    fn garbage_font_file_is_treated_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"not a font").unwrap();

        let mut fonts = FontResolver::new(FontFallback::Builtin);
        assert!(fonts.resolve(&[FontSource::Path(path)]).unwrap().is_builtin());
    }

    #[test]
    fn builtin_width_counts_spacing_between_glyphs() {
        // 3 glyphs * 6 columns - trailing gap = 17 cells, at scale 1
        assert_eq!(builtin_width(1, "Y S"), 17);
        assert_eq!(builtin_width(4, "AB"), 44);
        assert_eq!(builtin_width(2, ""), 0);
        assert_eq!(text_width(&ResolvedFont::Builtin, 14.0, "Y S"), 17.0);
    }

    #[test]
    fn builtin_scale_tracks_requested_size() {
        assert_eq!(builtin_scale(42.0), 4);
        assert_eq!(builtin_scale(20.0), 2);
        assert_eq!(builtin_scale(14.0), 1);
        assert_eq!(builtin_scale(1.0), 1);
    }

    #[test]
    fn every_letter_of_the_card_has_a_glyph() {
        for ch in "YANNICK DAILIES SMALL MOMENTS NO ONE NOTICES. Y S".chars() {
            assert!(glyph5x7(ch).is_some(), "missing glyph for {ch:?}");
        }
        assert_eq!(glyph5x7('y'), glyph5x7('Y'));
    }

    #[test]
    fn builtin_text_is_centered_on_the_anchor() {
        let mut img = RgbImage::new(100, 40);
        draw_text_centered(&mut img, &ResolvedFont::Builtin, 20.0, (50.0, 20.0), "I", Color::WHITE);

        let lit: Vec<(u32, u32)> = img
            .enumerate_pixels()
            .filter(|(_, _, p)| **p == Rgb([255, 255, 255]))
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!lit.is_empty());

        let min_x = lit.iter().map(|p| p.0).min().unwrap();
        let max_x = lit.iter().map(|p| p.0).max().unwrap();
        let min_y = lit.iter().map(|p| p.1).min().unwrap();
        let max_y = lit.iter().map(|p| p.1).max().unwrap();
        // 'I' spans columns 1..=3 of the glyph; at k=2 that's 6 px around x=50.
        assert!(min_x >= 45 && max_x <= 54);
        // 7 rows * 2 = 14 px tall around y=20
        assert_eq!((min_y, max_y), (13, 26));
    }
}
