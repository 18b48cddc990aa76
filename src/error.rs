// A tiny error type so we don't rely on anyhow/thiserror.
// Every variant states *where* things went wrong.
use std::fmt::{self, Display};

#[derive(Debug)]
pub enum Error {
    Layout(String),          // Style geometry does not fit the canvas/overlay
    FontUnavailable(String), // No preferred font and fallback is disabled
    AssetRead(String),       // Logo file missing or unreadable
    AssetParse(String),      // Logo markup rejected (pattern, SVG, pixmap)
    Encode(String),          // JPEG encoding failed
    Write(String),           // Output file could not be written
    Preview(String),         // Preview window failed (feature = "preview")
}

impl Display for Error {
    // This decides how the error is printed to your console.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Layout(s) => write!(f, "Layout error: {s}"),
            Error::FontUnavailable(s) => write!(f, "Font unavailable: {s}"),
            Error::AssetRead(s) => write!(f, "Asset read error: {s}"),
            Error::AssetParse(s) => write!(f, "Asset parse error: {s}"),
            Error::Encode(s) => write!(f, "Encode error: {s}"),
            Error::Write(s) => write!(f, "Write error: {s}"),
            Error::Preview(s) => write!(f, "Preview error: {s}"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
