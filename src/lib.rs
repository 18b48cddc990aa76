//! Draws the site's 1200x630 Open Graph card: grainy brown background, a
//! tilted polaroid on the left, and two dark banners with the title text.
//!
//! `compose::generate(Style::default())` is the whole program; every knob
//! lives on [`style::Style`].

pub mod compose;
pub mod draw;
pub mod error;
pub mod grain;
pub mod polaroid;
pub mod rasterize;
pub mod style;
pub mod text;
pub mod types;

#[cfg(feature = "preview")]
pub mod preview;

pub use compose::{Composer, encode_jpeg, generate, write_jpeg};
pub use error::{Error, Result};
pub use polaroid::{PhotoArt, PolaroidStyle, SmileyStyle};
pub use rasterize::LogoAsset;
pub use style::Style;
pub use text::{FontFallback, FontSource};
