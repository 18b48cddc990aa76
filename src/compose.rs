// The composer: runs every drawing step in order on one canvas, then writes
// the JPEG. Nothing here retries; the first error ends the run.

use crate::draw::fill_rounded_rect;
use crate::error::{Error, Result};
use crate::grain::apply_grain;
use crate::polaroid::{composite_onto, render_polaroid, rotate_expand};
use crate::style::{BannerStyle, Style};
use crate::text::{FontResolver, ResolvedFont, draw_text_centered, text_width};
use crate::types::Canvas;
use image::codecs::jpeg::JpegEncoder;
use log::{debug, info, warn};
use std::path::Path;

pub struct Composer {
    style: Style,
    fonts: FontResolver,
    canvas: Canvas,
}

impl Composer {
    /// Validate the layout and allocate the canvas.
    pub fn new(style: Style) -> Result<Self> {
        style.validate()?;
        let fonts = FontResolver::new(style.fonts.fallback);
        let canvas = Canvas::new(style.width, style.height);
        Ok(Self { style, fonts, canvas })
    }

    /// Run steps 1-5 and hand back the finished canvas.
    pub fn compose(mut self) -> Result<Canvas> {
        info!("composing {}x{} card", self.style.width, self.style.height);

        self.fill_background();
        apply_grain(&mut self.canvas, self.style.grain_amplitude);
        debug!("grain applied (amplitude {})", self.style.grain_amplitude);

        self.draw_polaroid()?;
        self.draw_banners();
        self.draw_titles()?;

        Ok(self.canvas)
    }

    fn fill_background(&mut self) {
        let bg = self.style.background.to_rgb();
        for px in self.canvas.pixels_mut() {
            *px = bg;
        }
    }

    fn draw_polaroid(&mut self) -> Result<()> {
        let p = &self.style.polaroid;
        let flat = render_polaroid(p, &mut self.fonts, &self.style.fonts.sources)?;
        let tilted = rotate_expand(&flat, p.rotation_deg)?;
        debug!(
            "polaroid {}x{} -> {}x{} at {:?}",
            flat.width(),
            flat.height(),
            tilted.width(),
            tilted.height(),
            p.offset
        );
        composite_onto(&mut self.canvas, &tilted, p.offset);
        Ok(())
    }

    fn draw_banners(&mut self) {
        for banner in [&self.style.title, &self.style.subtitle] {
            fill_rounded_rect(&mut self.canvas, banner.rect, banner.radius, banner.fill);
        }
    }

    fn draw_titles(&mut self) -> Result<()> {
        let font = self.fonts.resolve(&self.style.fonts.sources)?;
        debug!("titles use the {} face", if font.is_builtin() { "built-in" } else { "outline" });
        for banner in [&self.style.title, &self.style.subtitle] {
            draw_banner_text(&mut self.canvas, font, banner);
        }
        Ok(())
    }
}

fn draw_banner_text(canvas: &mut Canvas, font: &ResolvedFont, banner: &BannerStyle) {
    let width = text_width(font, banner.text_size, &banner.text);
    if width > banner.rect.width as f32 {
        warn!("{:?} is {width:.0}px wide, wider than its {}px banner", banner.text, banner.rect.width);
    }
    draw_text_centered(
        canvas,
        font,
        banner.text_size,
        banner.text_center,
        &banner.text,
        banner.text_color,
    );
}

/// JPEG bytes for the canvas. Encoding happens fully in memory so a failure
/// never leaves a half-written file behind.
pub fn encode_jpeg(canvas: &Canvas, quality: u8) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality)
        .encode_image(canvas)
        .map_err(|e| Error::Encode(e.to_string()))?;
    Ok(bytes)
}

/// Encode and write, replacing whatever is at `path`.
pub fn write_jpeg(canvas: &Canvas, path: &Path, quality: u8) -> Result<()> {
    let bytes = encode_jpeg(canvas, quality)?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| Error::Write(format!("creating {}: {e}", dir.display())))?;
    }
    std::fs::write(path, &bytes).map_err(|e| Error::Write(format!("{}: {e}", path.display())))?;
    info!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

/// Compose with `style` and write the result to `style.output`.
pub fn generate(style: Style) -> Result<Canvas> {
    let output = style.output.clone();
    let quality = style.jpeg_quality;
    let canvas = Composer::new(style)?.compose()?;
    write_jpeg(&canvas, &output, quality)?;
    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{FontFallback, FontSource};
    use image::Rgb;

    fn offline_style() -> Style {
        let mut style = Style::default();
        style.fonts.sources = vec![FontSource::Path("/nope/missing.ttf".into())];
        style
    }

    #[test]
    fn composed_canvas_has_card_dimensions() {
        let canvas = Composer::new(offline_style()).unwrap().compose().unwrap();
        assert_eq!(canvas.dimensions(), (1200, 630));
    }

    #[test]
    fn background_shows_through_with_grain() {
        let canvas = Composer::new(offline_style()).unwrap().compose().unwrap();
        // Far right edge: only background + grain.
        let Rgb([r, g, b]) = *canvas.get_pixel(1190, 600);
        assert!((0x8B - 5..=0x8B + 5).contains(&(r as i32)));
        assert!((0x6F - 5..=0x6F + 5).contains(&(g as i32)));
        assert!((0x47 - 5..=0x47 + 5).contains(&(b as i32)));
    }

    #[test]
    fn banners_are_painted_dark() {
        let canvas = Composer::new(offline_style()).unwrap().compose().unwrap();
        // Inside the title banner but left of any text.
        assert_eq!(*canvas.get_pixel(360, 240), Rgb([0x33, 0x33, 0x33]));
        assert_eq!(*canvas.get_pixel(360, 340), Rgb([0x33, 0x33, 0x33]));
        // Closing row of the title banner, then the gap below it.
        assert_eq!(*canvas.get_pixel(700, 280), Rgb([0x33, 0x33, 0x33]));
        assert_ne!(*canvas.get_pixel(360, 295), Rgb([0x33, 0x33, 0x33]));
    }

    #[test]
    fn polaroid_frame_lands_on_the_left() {
        let canvas = Composer::new(offline_style()).unwrap().compose().unwrap();
        // Near the frame's left border, below the photo window.
        assert!(canvas.get_pixel(100, 385).0.iter().all(|&c| c >= 250));
    }

    #[test]
    fn strict_font_policy_fails_the_run() {
        let mut style = offline_style();
        style.fonts.fallback = FontFallback::Fail;
        let result = Composer::new(style).unwrap().compose();
        assert!(matches!(result, Err(Error::FontUnavailable(_))));
    }

    #[test]
    fn invalid_layout_fails_before_drawing() {
        let mut style = offline_style();
        style.subtitle.rect = style.title.rect;
        assert!(matches!(Composer::new(style), Err(Error::Layout(_))));
    }

    #[test]
    fn jpeg_bytes_start_with_soi_marker() {
        let canvas = Canvas::from_pixel(16, 16, Rgb([10, 20, 30]));
        let bytes = encode_jpeg(&canvas, 95).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn write_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("public").join("og-image.jpg");
        write_jpeg(&Canvas::new(8, 8), &path, 95).unwrap();
        assert!(path.is_file());
    }
}
