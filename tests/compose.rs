use polaroid_og::{
    Composer, Error, FontFallback, FontSource, LogoAsset, PhotoArt, Style, generate,
};
use std::path::{Path, PathBuf};
use std::process::Command;

fn style_writing_to(path: &Path) -> Style {
    Style { output: path.to_path_buf(), ..Style::default() }
}

fn without_fonts(mut style: Style) -> Style {
    style.fonts.sources = vec![FontSource::Path(PathBuf::from("/renamed/Helvetica.ttc"))];
    style
}

#[test_log::test]
fn binary_writes_the_card_into_public() {
    let dir = tempfile::tempdir().unwrap();
    let status = Command::new(env!("CARGO_BIN_EXE_polaroid-og"))
        .current_dir(dir.path())
        .status()
        .unwrap();
    assert!(status.success());

    let out = dir.path().join("public/og-image.jpg");
    assert!(std::fs::metadata(&out).unwrap().len() > 0);

    let img = image::open(&out).unwrap();
    assert_eq!((img.width(), img.height()), (1200, 630));
    assert_eq!(img.color(), image::ColorType::Rgb8);
}

#[test_log::test]
fn output_is_a_decodable_jpeg() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("card.jpg");
    generate(style_writing_to(&out)).unwrap();

    let format = image::ImageFormat::from_path(&out).unwrap();
    assert_eq!(format, image::ImageFormat::Jpeg);
    let img = image::ImageReader::open(&out)
        .unwrap()
        .with_guessed_format()
        .unwrap()
        .decode()
        .unwrap();
    assert_eq!((img.width(), img.height()), (1200, 630));
}

#[test_log::test]
fn two_runs_produce_identical_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.jpg");
    let b = dir.path().join("b.jpg");
    generate(style_writing_to(&a)).unwrap();
    generate(style_writing_to(&b)).unwrap();
    assert_eq!(std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap());
}

#[test_log::test]
fn rerun_overwrites_the_previous_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("og-image.jpg");
    std::fs::write(&out, b"stale").unwrap();
    generate(style_writing_to(&out)).unwrap();
    assert_ne!(std::fs::read(&out).unwrap(), b"stale");
}

#[test_log::test]
fn missing_font_falls_back_and_still_renders() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("fallback.jpg");
    let canvas = generate(without_fonts(style_writing_to(&out))).unwrap();
    assert_eq!(canvas.dimensions(), (1200, 630));
    assert_eq!(image::open(&out).unwrap().width(), 1200);
}

#[test_log::test]
fn missing_font_without_fallback_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("strict.jpg");
    let mut style = without_fonts(style_writing_to(&out));
    style.fonts.fallback = FontFallback::Fail;

    assert!(matches!(generate(style), Err(Error::FontUnavailable(_))));
    assert!(!out.exists());
}

#[test_log::test]
fn missing_logo_asset_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("logo.jpg");
    let mut style = without_fonts(style_writing_to(&out));
    style.polaroid.art = PhotoArt::Logo(LogoAsset {
        path: dir.path().join("public/logo.svg"),
        ..LogoAsset::default()
    });

    assert!(matches!(generate(style), Err(Error::AssetRead(_))));
    assert!(!out.exists());
}

#[test_log::test]
fn logo_variant_renders_yellow_into_the_photo() {
    let dir = tempfile::tempdir().unwrap();
    let logo = dir.path().join("logo.svg");
    std::fs::write(
        &logo,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><circle cx="12" cy="12" r="12" fill="currentColor"/></svg>"#,
    )
    .unwrap();

    let mut style = without_fonts(Style::default());
    style.polaroid.art = PhotoArt::Logo(LogoAsset { path: logo, ..LogoAsset::default() });
    let canvas = Composer::new(style).unwrap().compose().unwrap();

    // After the tilt the photo window center lands near (180, 295) on the card.
    let yellow = (275..315)
        .flat_map(|y| (160..200).map(move |x| (x, y)))
        .filter(|&(x, y)| {
            let p = canvas.get_pixel(x, y).0;
            p[0] > 0xF0 && p[1] > 0xC0 && p[1] < 0xD8 && p[2] < 0x30
        })
        .count();
    assert!(yellow > 100, "expected a yellow logo, found {yellow} pixels");
}

#[test_log::test]
fn unwritable_output_is_a_write_error() {
    let dir = tempfile::tempdir().unwrap();
    // A regular file where the parent directory should be.
    let blocker = dir.path().join("public");
    std::fs::write(&blocker, b"").unwrap();

    let style = without_fonts(style_writing_to(&blocker.join("og-image.jpg")));
    assert!(matches!(generate(style), Err(Error::Write(_))));
}
