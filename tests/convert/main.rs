use std::{ffi::OsStr, fs, path::Path, process::Command};

use favicon_converter::{convert, ConvertError, FAVICON_SIZES};
use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

fn write_rgb_source(path: &Path, width: u32, height: u32) {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    })
    .save_with_format(path, ImageFormat::Png)
    .unwrap();
}

fn assert_all_variants(dir: &Path) {
    for spec in &FAVICON_SIZES {
        let path = dir.join(spec.file_name);
        let bytes = fs::read(&path).unwrap();
        assert_eq!(
            image::guess_format(&bytes).unwrap(),
            ImageFormat::Png,
            "{} is not a PNG",
            spec.file_name
        );
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(
            (decoded.width(), decoded.height()),
            spec.dimensions(),
            "{} has the wrong size",
            spec.file_name
        );
    }
}

fn file_count(dir: &Path) -> usize {
    fs::read_dir(dir).unwrap().count()
}

#[test]
fn square_rgb_source_produces_all_five() {
    let scratch = tempfile::tempdir().unwrap();
    let source = scratch.path().join("favicon.png");
    write_rgb_source(&source, 256, 256);
    let out = scratch.path().join("out");

    let written = convert(&source, &out).unwrap();

    let names: Vec<_> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap().to_owned())
        .collect();
    assert_eq!(
        names,
        [
            "favicon-16x16.png",
            "favicon-32x32.png",
            "apple-touch-icon.png",
            "android-chrome-192x192.png",
            "android-chrome-512x512.png",
        ]
    );
    assert_all_variants(&out);
    assert_eq!(file_count(&out), 5);
}

#[test]
fn outputs_are_rgba_and_opaque_for_rgb_input() {
    let scratch = tempfile::tempdir().unwrap();
    let source = scratch.path().join("favicon.png");
    write_rgb_source(&source, 64, 64);

    convert(&source, scratch.path()).unwrap();

    let icon = image::open(scratch.path().join("favicon-32x32.png")).unwrap();
    assert_eq!(icon.color(), image::ColorType::Rgba8);
    assert!(icon.into_rgba8().pixels().all(|p| p[3] == 255));
}

#[test]
fn non_square_source_is_stretched() {
    let scratch = tempfile::tempdir().unwrap();
    let source = scratch.path().join("banner.png");
    write_rgb_source(&source, 300, 40);
    let out = scratch.path().join("out");

    convert(&source, &out).unwrap();

    assert_all_variants(&out);
}

#[test]
fn running_twice_overwrites_in_place() {
    let scratch = tempfile::tempdir().unwrap();
    let source = scratch.path().join("favicon.png");
    write_rgb_source(&source, 48, 48);
    let out = scratch.path().join("out");

    convert(&source, &out).unwrap();
    let first = fs::read(out.join("apple-touch-icon.png")).unwrap();
    convert(&source, &out).unwrap();
    let second = fs::read(out.join("apple-touch-icon.png")).unwrap();

    assert_eq!(first, second);
    assert_eq!(file_count(&out), 5);
}

#[test]
fn nested_output_directory_is_created() {
    let scratch = tempfile::tempdir().unwrap();
    let source = scratch.path().join("favicon.png");
    write_rgb_source(&source, 32, 32);
    let out = scratch.path().join("a").join("b").join("c");

    convert(&source, &out).unwrap();

    assert_all_variants(&out);
}

#[test]
fn transparent_source_keeps_alpha() {
    let scratch = tempfile::tempdir().unwrap();
    let source = scratch.path().join("clear.png");
    RgbaImage::from_pixel(20, 20, Rgba([0, 128, 255, 0]))
        .save_with_format(&source, ImageFormat::Png)
        .unwrap();

    convert(&source, scratch.path()).unwrap();

    let icon = image::open(scratch.path().join("favicon-16x16.png"))
        .unwrap()
        .into_rgba8();
    assert!(icon.pixels().all(|p| p[3] == 0));
}

#[test]
fn format_is_detected_from_contents() {
    let scratch = tempfile::tempdir().unwrap();
    let source = scratch.path().join("favicon.ico");
    RgbaImage::from_pixel(32, 32, Rgba([255, 0, 0, 255]))
        .save_with_format(&source, ImageFormat::Ico)
        .unwrap();
    let out = scratch.path().join("out");

    convert(&source, &out).unwrap();

    assert_all_variants(&out);
}

#[test]
fn missing_input_is_not_found() {
    let scratch = tempfile::tempdir().unwrap();
    let out = scratch.path().join("out");

    let err = convert(scratch.path().join("nope.png"), &out).unwrap_err();

    assert!(matches!(err, ConvertError::NotFound { .. }));
    assert!(err.to_string().contains("nope.png"));
    assert!(!out.exists());
}

#[test]
fn corrupt_input_is_a_decode_error() {
    let scratch = tempfile::tempdir().unwrap();
    let source = scratch.path().join("favicon.png");
    fs::write(&source, b"definitely not an image").unwrap();
    let out = scratch.path().join("out");

    let err = convert(&source, &out).unwrap_err();

    assert!(matches!(err, ConvertError::Decode { .. }));
    assert!(!out.exists());
}

#[test]
fn directory_as_input_is_a_read_error() {
    let scratch = tempfile::tempdir().unwrap();
    let out = scratch.path().join("out");

    let err = convert(scratch.path(), &out).unwrap_err();

    assert!(matches!(err, ConvertError::Read { .. }), "got {err:?}");
    assert!(!out.exists());
}

#[test]
fn file_as_output_directory_is_a_create_dir_error() {
    let scratch = tempfile::tempdir().unwrap();
    let source = scratch.path().join("favicon.png");
    write_rgb_source(&source, 32, 32);
    let out = scratch.path().join("taken");
    fs::write(&out, b"not a directory").unwrap();

    let err = convert(&source, &out).unwrap_err();

    assert!(matches!(err, ConvertError::CreateDir { .. }), "got {err:?}");
    assert_eq!(fs::read(&out).unwrap(), b"not a directory");
    for spec in &FAVICON_SIZES {
        assert!(!scratch.path().join(spec.file_name).exists());
    }
    assert_eq!(file_count(scratch.path()), 2);
}

#[test]
fn truncated_png_is_a_decode_error() {
    let scratch = tempfile::tempdir().unwrap();
    let source = scratch.path().join("favicon.png");
    write_rgb_source(&source, 64, 64);
    let bytes = fs::read(&source).unwrap();
    fs::write(&source, &bytes[..bytes.len() / 2]).unwrap();

    let err = convert(&source, scratch.path().join("out")).unwrap_err();

    assert!(matches!(err, ConvertError::Decode { .. }));
}

fn run_cli(args: &[&OsStr]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_favicon-converter"))
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn cli_without_arguments_prints_usage() {
    let output = run_cli(&[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage:"));
}

#[test]
fn cli_reports_missing_input() {
    let scratch = tempfile::tempdir().unwrap();
    let out = scratch.path().join("out");

    let missing = scratch.path().join("missing.ico");
    let output = run_cli(&[missing.as_os_str(), out.as_os_str()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing.ico"));
    assert!(!out.exists());
}

#[test]
fn cli_writes_one_line_per_variant() {
    let scratch = tempfile::tempdir().unwrap();
    let source = scratch.path().join("favicon.png");
    write_rgb_source(&source, 256, 256);
    let out = scratch.path().join("out");

    let output = run_cli(&[source.as_os_str(), out.as_os_str()]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("(256x256)"));
    for spec in &FAVICON_SIZES {
        let line = format!("{} ({}x{})", spec.file_name, spec.width, spec.height);
        assert_eq!(stdout.matches(&line).count(), 1, "missing line for {line}");
    }
    assert_all_variants(&out);
}

#[test]
fn cli_verbose_flag_enables_info_logging() {
    let scratch = tempfile::tempdir().unwrap();
    let source = scratch.path().join("favicon.png");
    write_rgb_source(&source, 64, 64);
    let out = scratch.path().join("out");

    let quiet = run_cli(&[source.as_os_str(), out.as_os_str()]);
    let verbose = run_cli(&[OsStr::new("-v"), source.as_os_str(), out.as_os_str()]);

    assert!(quiet.status.success());
    assert!(verbose.status.success());
    assert!(!String::from_utf8_lossy(&quiet.stderr).contains("Wrote"));
    let log = String::from_utf8_lossy(&verbose.stderr);
    assert!(log.contains("Decoded"), "stderr was: {log}");
    assert_eq!(log.matches("Wrote").count(), FAVICON_SIZES.len());
    assert_all_variants(&out);
}
