// What you GET:
// • public/og-image.jpg, 1200x630, overwritten on every run.
// • No arguments, no flags. Set RUST_LOG=debug to watch each step.
// • Built with `--features preview`, a window shows the card afterwards.

use polaroid_og::{Error, Style, generate};

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let style = Style::default();
    let output = style.output.clone();

    /* Compose + write. Any failure ends the run with nothing written. */
    #[cfg(feature = "preview")]
    let canvas = generate(style)?;
    #[cfg(not(feature = "preview"))]
    generate(style)?;

    println!("OG image generated successfully!");
    println!("Saved to: {}", output.display());

    #[cfg(feature = "preview")]
    polaroid_og::preview::show("OG image preview", &canvas)?;

    Ok(())
}
