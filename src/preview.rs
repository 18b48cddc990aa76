// Optional window that shows the finished card (feature = "preview").
// Visual: a 1200x630 window with the card in it; ESC or closing it returns.

use crate::error::{Error, Result};
use crate::types::Canvas;
use minifb::{Key, Window, WindowOptions};

/// Pack the canvas into 0x00RRGGBB words, the layout minifb wants.
pub fn to_window_buffer(canvas: &Canvas) -> Vec<u32> {
    canvas
        .pixels()
        .map(|p| ((p.0[0] as u32) << 16) | ((p.0[1] as u32) << 8) | p.0[2] as u32)
        .collect()
}

/// Block until the user closes the window or presses ESC.
pub fn show(title: &str, canvas: &Canvas) -> Result<()> {
    let (w, h) = (canvas.width() as usize, canvas.height() as usize);
    let buffer = to_window_buffer(canvas);

    let mut window =
        Window::new(title, w, h, WindowOptions::default()).map_err(|e| Error::Preview(e.to_string()))?;
    // Static image; no need to spin faster than this.
    window.set_target_fps(30);

    while window.is_open() && !window.is_key_down(Key::Escape) {
        window
            .update_with_buffer(&buffer, w, h)
            .map_err(|e| Error::Preview(e.to_string()))?;
    }
    Ok(())
}
