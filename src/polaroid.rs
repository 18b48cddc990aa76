// The polaroid: a small transparent overlay with a white frame, a gray photo
// window, some art in the window and a caption underneath. It gets tilted and
// then pasted onto the card.
// Visual expectation: a slightly crooked instant photo on the left of the card.

use crate::draw::{Surface, draw_image, fill_ellipse, fill_rect, stroke_arc};
use crate::error::{Error, Result};
use crate::rasterize::{LogoAsset, load_logo, overlay_to_pixmap, pixmap_to_overlay};
use crate::text::{FontResolver, FontSource, draw_text_centered};
use crate::types::{Canvas, Color, Overlay, Rect};
use image::Rgba;
use log::debug;
use resvg::tiny_skia;

/// Geometry + palette of the polaroid. Defaults are the card's fixed values.
#[derive(Clone, Debug, PartialEq)]
pub struct PolaroidStyle {
    pub overlay_width: u32,
    pub overlay_height: u32,
    pub offset: (i32, i32),    // where the rotated overlay lands on the canvas
    pub frame: Rect,           // white card, in overlay coordinates
    pub frame_color: Color,
    pub padding: u32,          // frame border on top/left/right
    pub bottom_padding: u32,   // extra border under the photo (caption strip)
    pub window_color: Color,
    pub art: PhotoArt,
    pub caption: String,
    pub caption_size: f32,
    pub caption_color: Color,
    pub caption_center: (f32, f32),
    pub rotation_deg: f32,     // counter-clockwise; negative tilts clockwise
}

impl Default for PolaroidStyle {
    fn default() -> Self {
        Self {
            overlay_width: 250,
            overlay_height: 280,
            offset: (80, 200),
            frame: Rect::from_inclusive(0, 0, 180, 220),
            frame_color: Color::WHITE,
            padding: 12,
            bottom_padding: 40,
            window_color: Color::hex(0xD3D3D3),
            art: PhotoArt::Smiley(SmileyStyle::default()),
            caption: String::from("Y S"),
            caption_size: 14.0,
            caption_color: Color::hex(0x666666),
            caption_center: (90.0, 200.0),
            rotation_deg: -3.0,
        }
    }
}

impl PolaroidStyle {
    /// The gray photo area: inset by `padding`, with the caption strip left
    /// below it. Corners are painted on both ends, so widths come out odd.
    pub fn window(&self) -> Rect {
        let f = self.frame;
        let pad = self.padding as i32;
        let photo_h = (f.height as i32 - 1) - 2 * pad - self.bottom_padding as i32;
        Rect::from_inclusive(f.x + pad, f.y + pad, f.right() - 1 - pad, f.y + pad + photo_h)
    }

    /// Bounding box of the rotated overlay on the canvas.
    pub fn placed_bounds(&self) -> Rect {
        let (w, h) = rotated_size(self.overlay_width, self.overlay_height, self.rotation_deg);
        Rect::new(self.offset.0, self.offset.1, w, h)
    }
}

/// What goes inside the photo window.
#[derive(Clone, Debug, PartialEq)]
pub enum PhotoArt {
    /// A yellow smiley drawn with shape primitives.
    Smiley(SmileyStyle),
    /// An SVG logo, recolored and rasterized, centered in the window.
    Logo(LogoAsset),
}

impl PhotoArt {
    /// Paint the art into `overlay`, inside `window`.
    pub fn render(&self, overlay: &mut Overlay, window: Rect) -> Result<()> {
        match self {
            PhotoArt::Smiley(smiley) => {
                smiley.draw(overlay, window);
                Ok(())
            }
            PhotoArt::Logo(asset) => {
                let logo = load_logo(asset)?;
                let (cx, cy) = window.center();
                let x = (cx - logo.width() as f32 / 2.0).round() as i32;
                let y = (cy - logo.height() as f32 / 2.0).round() as i32;
                draw_image(overlay, &logo, x, y);
                Ok(())
            }
        }
    }
}

/// The hand-drawn face. All offsets are relative to the window center.
#[derive(Clone, Debug, PartialEq)]
pub struct SmileyStyle {
    pub face_radius: i32,
    pub face_color: Color,
    pub feature_color: Color, // eyes + mouth
    pub eye_size: i32,
    pub eye_inner: i32,       // horizontal gap from center to the near edge of each eye
    pub eye_rise: i32,        // eyes' top edge above center
    pub smile_half_width: i32,
    pub smile_drop: i32,      // top of the smile box below center
    pub smile_height: i32,
    pub smile_width: u32,
}

impl Default for SmileyStyle {
    fn default() -> Self {
        Self {
            face_radius: 45,
            face_color: Color::hex(0xFFD700),
            feature_color: Color::BLACK,
            eye_size: 10,
            eye_inner: 10,
            eye_rise: 15,
            smile_half_width: 25,
            smile_drop: 5,
            smile_height: 30,
            smile_width: 3,
        }
    }
}

impl SmileyStyle {
    /// Visual: yellow disc, two black oval eyes, a 3px grin on the lower half.
    pub fn draw<S: Surface + ?Sized>(&self, s: &mut S, window: Rect) {
        // Integer center, same rounding as a // 2 on the inclusive box
        let cx = window.x + (window.width as i32 - 1) / 2;
        let cy = window.y + (window.height as i32 - 1) / 2;
        let r = self.face_radius;

        fill_ellipse(s, Rect::from_inclusive(cx - r, cy - r, cx + r, cy + r), self.face_color);

        let eye_y = cy - self.eye_rise;
        let (inner, size) = (self.eye_inner, self.eye_size);
        fill_ellipse(
            s,
            Rect::from_inclusive(cx - inner - size, eye_y, cx - inner, eye_y + size),
            self.feature_color,
        );
        fill_ellipse(
            s,
            Rect::from_inclusive(cx + inner, eye_y, cx + inner + size, eye_y + size),
            self.feature_color,
        );

        let smile_y = cy + self.smile_drop;
        let hw = self.smile_half_width;
        stroke_arc(
            s,
            Rect::from_inclusive(cx - hw, smile_y, cx + hw, smile_y + self.smile_height),
            0.0,
            180.0,
            self.smile_width,
            self.feature_color,
        );
    }
}

/// Build the untilted overlay: frame, window, art, caption.
/// Everything outside `frame` stays fully transparent.
pub fn render_polaroid(
    style: &PolaroidStyle,
    fonts: &mut FontResolver,
    font_sources: &[FontSource],
) -> Result<Overlay> {
    let mut overlay = Overlay::from_pixel(style.overlay_width, style.overlay_height, Rgba([0, 0, 0, 0]));

    fill_rect(&mut overlay, style.frame, style.frame_color);

    let window = style.window();
    fill_rect(&mut overlay, window, style.window_color);
    style.art.render(&mut overlay, window)?;

    let font = fonts.resolve(font_sources)?;
    draw_text_centered(
        &mut overlay,
        font,
        style.caption_size,
        style.caption_center,
        &style.caption,
        style.caption_color,
    );

    debug!("polaroid window {window:?}, frame {:?}", style.frame);
    Ok(overlay)
}

/// Size of the box that holds a `w`x`h` image after rotating by `deg`.
pub fn rotated_size(w: u32, h: u32, deg: f32) -> (u32, u32) {
    let (sin, cos) = deg.to_radians().sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());
    let (w, h) = (w as f32, h as f32);
    // Trim float noise so a 0 or 90 degree turn keeps exact sizes.
    let nw = (w * cos + h * sin - 1e-3).ceil().max(1.0) as u32;
    let nh = (w * sin + h * cos - 1e-3).ceil().max(1.0) as u32;
    (nw, nh)
}

/// Rotate counter-clockwise by `deg` about the center, growing the canvas to
/// fit. Newly exposed area is transparent. tiny-skia resamples bilinearly on
/// premultiplied values.
pub fn rotate_expand(src: &Overlay, deg: f32) -> Result<Overlay> {
    let (w, h) = src.dimensions();
    let (nw, nh) = rotated_size(w, h, deg);
    let source = overlay_to_pixmap(src)?;
    let mut rotated = tiny_skia::Pixmap::new(nw, nh)
        .ok_or_else(|| Error::Layout(format!("failed to allocate pixmap {nw}x{nh}")))?;

    // tiny-skia angles turn clockwise on screen, hence the sign flip.
    let (scx, scy) = (w as f32 / 2.0, h as f32 / 2.0);
    let transform = tiny_skia::Transform::from_rotate_at(-deg, scx, scy)
        .post_translate(nw as f32 / 2.0 - scx, nh as f32 / 2.0 - scy);
    let paint = tiny_skia::PixmapPaint {
        quality: tiny_skia::FilterQuality::Bilinear,
        ..Default::default()
    };
    rotated.draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);

    Ok(pixmap_to_overlay(&rotated))
}

/// Alpha-composite the overlay onto the canvas with its top-left at `offset`.
pub fn composite_onto(canvas: &mut Canvas, overlay: &Overlay, offset: (i32, i32)) {
    draw_image(canvas, overlay, offset.0, offset.1);
}
