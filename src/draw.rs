// Software drawing primitives used to build the card.
// Visual effects provided here:
// 1) Solid and rounded rectangles (polaroid frame, photo window, banners).
// 2) Filled ellipses and arcs (the smiley).
// 3) Pasting one RGBA image over another (logo, rotated polaroid).
//
// Shapes get a one-pixel soft edge from an approximate signed distance.

use crate::types::{Color, Rect};
use image::{Rgb, RgbImage, Rgba, RgbaImage};

/// Anything we can paint coverage onto. Implemented for the RGB canvas and the
/// RGBA overlay so every primitive works on both.
pub trait Surface {
    fn size(&self) -> (u32, u32);

    /// Blend `color` over the pixel at (x,y). `coverage` in [0,1] scales the
    /// color's own alpha. Callers guarantee (x,y) is in bounds.
    fn blend(&mut self, x: u32, y: u32, color: Color, coverage: f32);
}

impl Surface for RgbImage {
    fn size(&self) -> (u32, u32) {
        self.dimensions()
    }

    fn blend(&mut self, x: u32, y: u32, color: Color, coverage: f32) {
        let a = (color.alpha as f32 / 255.0) * coverage.clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let Rgb([dr, dg, db]) = *self.get_pixel(x, y);
        let mix = |d: u8, s: u8| (d as f32 + (s as f32 - d as f32) * a).round().clamp(0.0, 255.0) as u8;
        self.put_pixel(x, y, Rgb([mix(dr, color.r()), mix(dg, color.g()), mix(db, color.b())]));
    }
}

impl Surface for RgbaImage {
    fn size(&self) -> (u32, u32) {
        self.dimensions()
    }

    // Straight-alpha source-over.
    fn blend(&mut self, x: u32, y: u32, color: Color, coverage: f32) {
        let sa = (color.alpha as f32 / 255.0) * coverage.clamp(0.0, 1.0);
        if sa <= 0.0 {
            return;
        }
        let Rgba([dr, dg, db, da]) = *self.get_pixel(x, y);
        let da = da as f32 / 255.0;
        let oa = sa + da * (1.0 - sa);
        if oa <= 0.0 {
            self.put_pixel(x, y, Rgba([0, 0, 0, 0]));
            return;
        }
        let mix = |d: u8, s: u8| {
            ((s as f32 * sa + d as f32 * da * (1.0 - sa)) / oa).round().clamp(0.0, 255.0) as u8
        };
        self.put_pixel(
            x,
            y,
            Rgba([
                mix(dr, color.r()),
                mix(dg, color.g()),
                mix(db, color.b()),
                (oa * 255.0).round().clamp(0.0, 255.0) as u8,
            ]),
        );
    }
}

/// Blend a pixel if (x,y) is inside bounds.
/// Visual: the exact pixel at (x,y) takes on `coverage` of the color.
#[inline]
pub fn blend_pixel<S: Surface + ?Sized>(s: &mut S, x: i32, y: i32, color: Color, coverage: f32) {
    if x < 0 || y < 0 {
        return;
    }
    let (w, h) = s.size();
    let (x, y) = (x as u32, y as u32);
    if x >= w || y >= h {
        return;
    }
    s.blend(x, y, color, coverage);
}

/// Intersect `rect` with the surface, as half-open pixel ranges.
fn clip<S: Surface + ?Sized>(s: &S, rect: &Rect) -> Option<(u32, u32, u32, u32)> {
    let (w, h) = s.size();
    let x0 = rect.x.max(0);
    let y0 = rect.y.max(0);
    let x1 = rect.right().min(w as i32);
    let y1 = rect.bottom().min(h as i32);
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
}

/// Coverage of a pixel whose center is `dist` pixels outside an edge
/// (negative = inside).
#[inline]
fn edge_coverage(dist: f32) -> f32 {
    (0.5 - dist).clamp(0.0, 1.0)
}

/// Fill an axis-aligned rectangle with a hard edge.
pub fn fill_rect<S: Surface + ?Sized>(s: &mut S, rect: Rect, color: Color) {
    let Some((x0, y0, x1, y1)) = clip(s, &rect) else { return };
    for y in y0..y1 {
        for x in x0..x1 {
            s.blend(x, y, color, 1.0);
        }
    }
}

/// Distance (in pixels, approximate) from a point to the ellipse inscribed in
/// a box with center (cx,cy) and radii (rx,ry). Negative inside.
#[inline]
fn ellipse_distance(px: f32, py: f32, cx: f32, cy: f32, rx: f32, ry: f32) -> f32 {
    if rx <= 0.0 || ry <= 0.0 {
        return f32::INFINITY;
    }
    let nx = (px - cx) / rx;
    let ny = (py - cy) / ry;
    let d = (nx * nx + ny * ny).sqrt();
    (d - 1.0) * rx.min(ry)
}

/// Fill the ellipse inscribed in `bbox`.
/// Visual: a round blob (a circle when `bbox` is square) with a soft rim.
pub fn fill_ellipse<S: Surface + ?Sized>(s: &mut S, bbox: Rect, color: Color) {
    let Some((x0, y0, x1, y1)) = clip(s, &bbox) else { return };
    let (cx, cy) = bbox.center();
    let rx = bbox.width as f32 / 2.0;
    let ry = bbox.height as f32 / 2.0;

    for y in y0..y1 {
        for x in x0..x1 {
            let dist = ellipse_distance(x as f32 + 0.5, y as f32 + 0.5, cx, cy, rx, ry);
            let c = edge_coverage(dist);
            if c > 0.0 {
                s.blend(x, y, color, c);
            }
        }
    }
}

/// Stroke part of the ellipse inscribed in `bbox`, from `start_deg` to
/// `end_deg`. Angles run clockwise from 3 o'clock (y points down), and the
/// stroke grows inward from the box edge, like PIL's `arc`.
pub fn stroke_arc<S: Surface + ?Sized>(
    s: &mut S,
    bbox: Rect,
    start_deg: f32,
    end_deg: f32,
    width: u32,
    color: Color,
) {
    let Some((x0, y0, x1, y1)) = clip(s, &bbox) else { return };
    let (cx, cy) = bbox.center();
    let rx = bbox.width as f32 / 2.0;
    let ry = bbox.height as f32 / 2.0;
    let w = width as f32;

    let start = start_deg.rem_euclid(360.0);
    let mut sweep = end_deg - start_deg;
    if sweep >= 360.0 {
        sweep = 360.0;
    } else {
        sweep = sweep.rem_euclid(360.0);
    }

    for y in y0..y1 {
        for x in x0..x1 {
            let px = x as f32 + 0.5;
            let py = y as f32 + 0.5;

            let outer = ellipse_distance(px, py, cx, cy, rx, ry);
            let inner = ellipse_distance(px, py, cx, cy, rx - w, ry - w);
            let ring = edge_coverage(outer) * (1.0 - edge_coverage(inner));
            if ring <= 0.0 {
                continue;
            }

            // Angle of the pixel on the unit circle the ellipse maps to.
            let angle = ((py - cy) / ry).atan2((px - cx) / rx).to_degrees();
            let offset = (angle - start).rem_euclid(360.0);
            if offset <= sweep {
                s.blend(x, y, color, ring);
            }
        }
    }
}

/// Fill a rectangle whose corners are rounded with `radius`.
/// Visual: a flat dark banner with soft corners.
pub fn fill_rounded_rect<S: Surface + ?Sized>(s: &mut S, rect: Rect, radius: u32, color: Color) {
    let Some((x0, y0, x1, y1)) = clip(s, &rect) else { return };
    let r = (radius as f32).min(rect.width as f32 / 2.0).min(rect.height as f32 / 2.0);

    // Corner circle centers live on this inner box.
    let left = rect.x as f32 + r;
    let right = rect.right() as f32 - r;
    let top = rect.y as f32 + r;
    let bottom = rect.bottom() as f32 - r;

    for y in y0..y1 {
        for x in x0..x1 {
            let px = x as f32 + 0.5;
            let py = y as f32 + 0.5;
            let dx = (left - px).max(px - right).max(0.0);
            let dy = (top - py).max(py - bottom).max(0.0);
            let dist = (dx * dx + dy * dy).sqrt() - r;
            let c = edge_coverage(dist);
            if c > 0.0 {
                s.blend(x, y, color, c);
            }
        }
    }
}

/// Paste `src` with its own alpha so its top-left lands at (x,y).
/// Parts that fall outside the destination are skipped.
pub fn draw_image<S: Surface + ?Sized>(s: &mut S, src: &RgbaImage, x: i32, y: i32) {
    let (w, h) = s.size();
    for (sx, sy, px) in src.enumerate_pixels() {
        let Rgba([r, g, b, a]) = *px;
        if a == 0 {
            continue;
        }
        let dx = x + sx as i32;
        let dy = y + sy as i32;
        if dx < 0 || dy < 0 || dx as u32 >= w || dy as u32 >= h {
            continue;
        }
        let color = Color::hex(((r as u32) << 16) | ((g as u32) << 8) | b as u32);
        s.blend(dx as u32, dy as u32, color, a as f32 / 255.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rect_is_clipped_to_surface() {
        let mut img = RgbImage::new(10, 10);
        fill_rect(&mut img, Rect::new(-5, 8, 20, 20), Color::WHITE);
        assert_eq!(*img.get_pixel(0, 9), Rgb([255, 255, 255]));
        assert_eq!(*img.get_pixel(0, 7), Rgb([0, 0, 0]));
    }

    #[test]
    fn opaque_fill_on_transparent_overlay_is_exact() {
        let mut img = RgbaImage::new(4, 4);
        fill_rect(&mut img, Rect::new(0, 0, 2, 2), Color::hex(0xD3D3D3));
        assert_eq!(*img.get_pixel(1, 1), Rgba([0xD3, 0xD3, 0xD3, 255]));
        assert_eq!(*img.get_pixel(3, 3), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn ellipse_fills_center_not_corners() {
        let mut img = RgbImage::new(20, 20);
        fill_ellipse(&mut img, Rect::new(0, 0, 20, 20), Color::WHITE);
        assert_eq!(*img.get_pixel(10, 10), Rgb([255, 255, 255]));
        assert_eq!(*img.get_pixel(0, 0), Rgb([0, 0, 0]));
        assert_eq!(*img.get_pixel(19, 19), Rgb([0, 0, 0]));
    }

    #[test]
    fn lower_half_arc_leaves_top_untouched() {
        let mut img = RgbImage::new(50, 30);
        stroke_arc(&mut img, Rect::new(0, 0, 50, 30), 0.0, 180.0, 3, Color::WHITE);
        // Bottom of the ellipse is painted, top is not.
        assert_eq!(*img.get_pixel(25, 28), Rgb([255, 255, 255]));
        assert_eq!(*img.get_pixel(25, 1), Rgb([0, 0, 0]));
        // Interior stays empty.
        assert_eq!(*img.get_pixel(25, 15), Rgb([0, 0, 0]));
    }

    #[test]
    fn rounded_rect_trims_corners_only() {
        let mut img = RgbImage::new(40, 20);
        fill_rounded_rect(&mut img, Rect::new(0, 0, 40, 20), 8, Color::WHITE);
        assert_eq!(*img.get_pixel(0, 0), Rgb([0, 0, 0]));
        assert_eq!(*img.get_pixel(20, 0), Rgb([255, 255, 255]));
        assert_eq!(*img.get_pixel(0, 10), Rgb([255, 255, 255]));
    }

    #[test]
    fn draw_image_respects_source_alpha() {
        let mut canvas = RgbImage::from_pixel(3, 1, Rgb([0, 0, 0]));
        let mut src = RgbaImage::new(3, 1);
        src.put_pixel(0, 0, Rgba([255, 255, 255, 255]));
        src.put_pixel(1, 0, Rgba([255, 255, 255, 0]));
        draw_image(&mut canvas, &src, 0, 0);
        assert_eq!(*canvas.get_pixel(0, 0), Rgb([255, 255, 255]));
        assert_eq!(*canvas.get_pixel(1, 0), Rgb([0, 0, 0]));
    }
}
