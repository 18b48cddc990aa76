// Logo art for the photo window: an SVG on disk, recolored and turned into pixels.
// Visual expectation: the logo shows up as a yellow mark with clean
// transparent edges, ready to paste over the gray photo area.

use crate::error::{Error, Result};
use crate::types::{Color, Overlay};
use image::Rgba;
use log::debug;
use resvg::{tiny_skia, usvg};
use std::path::PathBuf;

/// Where the logo lives and how it should be recolored/sized.
#[derive(Clone, Debug, PartialEq)]
pub struct LogoAsset {
    pub path: PathBuf,
    pub fill_pattern: String, // exact text to replace, e.g. `fill="currentColor"` or `fill:#000`
    pub fill_color: Color,    // replaces the pattern's value, keeping its own syntax
    pub size: u32,            // output is size x size pixels
}

impl Default for LogoAsset {
    fn default() -> Self {
        Self {
            path: PathBuf::from("public/logo.svg"),
            fill_pattern: String::from("fill=\"currentColor\""),
            fill_color: Color::hex(0xFACC15),
            size: 96,
        }
    }
}

/// Read, recolor and rasterize the logo.
/// A missing file is fatal for the run; there is no fallback art.
pub fn load_logo(asset: &LogoAsset) -> Result<Overlay> {
    let markup = std::fs::read_to_string(&asset.path)
        .map_err(|e| Error::AssetRead(format!("{}: {e}", asset.path.display())))?;

    let recolored = substitute_fill(&markup, &asset.fill_pattern, asset.fill_color)?;
    let raster = rasterize_svg(&recolored, asset.size)?;
    debug!("rasterized {} at {}x{}", asset.path.display(), asset.size, asset.size);
    Ok(raster)
}

/// Replace every occurrence of `pattern` with the same declaration carrying
/// `color`. Works for attributes (`fill="x"`) and CSS (`fill:x;`) alike.
pub fn substitute_fill(markup: &str, pattern: &str, color: Color) -> Result<String> {
    if pattern.is_empty() || !markup.contains(pattern) {
        return Err(Error::AssetParse(format!("fill pattern {pattern:?} not found in logo markup")));
    }
    let replacement = recolor_declaration(pattern, &color.to_hex_string())
        .ok_or_else(|| Error::AssetParse(format!("fill pattern {pattern:?} has no value to replace")))?;
    Ok(markup.replace(pattern, &replacement))
}

/// Swap the value after `fill=` / `fill:` for `hex`, leaving quotes, spacing
/// and anything after the value as written.
fn recolor_declaration(decl: &str, hex: &str) -> Option<String> {
    let search_from = decl.find("fill").unwrap_or(0);
    let delim = search_from + decl[search_from..].find(['=', ':'])?;

    let mut start = delim + 1;
    start += decl[start..].len() - decl[start..].trim_start().len();
    if decl[start..].starts_with(['"', '\'']) {
        start += 1;
    }
    let end = decl[start..]
        .find(|c: char| matches!(c, '"' | '\'' | ';') || c.is_whitespace())
        .map_or(decl.len(), |i| start + i);
    if end == start {
        return None;
    }
    Some(format!("{}{hex}{}", &decl[..start], &decl[end..]))
}

/// Render SVG markup into a `size` x `size` straight-alpha image.
/// The drawing is scaled uniformly to fit and centered.
pub fn rasterize_svg(markup: &str, size: u32) -> Result<Overlay> {
    let opt = usvg::Options::default();
    let tree = usvg::Tree::from_str(markup, &opt)
        .map_err(|e| Error::AssetParse(format!("parsing SVG: {e}")))?;

    let mut pixmap = tiny_skia::Pixmap::new(size, size)
        .ok_or_else(|| Error::AssetParse(format!("failed to allocate pixmap {size}x{size}")))?;

    let view = tree.size();
    let scale = (size as f32 / view.width()).min(size as f32 / view.height());
    let tx = (size as f32 - view.width() * scale) / 2.0;
    let ty = (size as f32 - view.height() * scale) / 2.0;
    let fit_to = tiny_skia::Transform::from_row(scale, 0.0, 0.0, scale, tx, ty);
    resvg::render(&tree, fit_to, &mut pixmap.as_mut());

    Ok(pixmap_to_overlay(&pixmap))
}

/// Premultiplied copy of an overlay, for handing to tiny-skia.
pub(crate) fn overlay_to_pixmap(overlay: &Overlay) -> Result<tiny_skia::Pixmap> {
    let (w, h) = overlay.dimensions();
    let mut pixmap = tiny_skia::Pixmap::new(w, h)
        .ok_or_else(|| Error::Layout(format!("failed to allocate pixmap {w}x{h}")))?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(overlay.pixels()) {
        let Rgba([r, g, b, a]) = *src;
        *dst = tiny_skia::ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}

/// tiny-skia stores premultiplied RGBA; the overlay wants straight alpha.
pub(crate) fn pixmap_to_overlay(pixmap: &tiny_skia::Pixmap) -> Overlay {
    let width = pixmap.width();
    let pixels = pixmap.pixels();
    Overlay::from_fn(width, pixmap.height(), |x, y| {
        let c = pixels[(y * width + x) as usize].demultiply();
        Rgba([c.red(), c.green(), c.blue(), c.alpha()])
    })
}
