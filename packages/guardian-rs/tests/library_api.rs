//! Integration tests for the guardian-rs library API

use guardian_rs::prelude::*;
use guardian_rs::{OcrError, RedactError};
use image::{GrayImage, Rgb, RgbImage};
use std::path::PathBuf;
use tempfile::tempdir;

/// Engine that reports the same regions for every image.
struct FixedEngine(Vec<TextRegion>);

impl OcrEngine for FixedEngine {
    fn recognize(&self, _image: &GrayImage) -> Result<OcrOutput, OcrError> {
        Ok(OcrOutput::from_regions(self.0.clone()))
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

struct BrokenEngine;

impl OcrEngine for BrokenEngine {
    fn recognize(&self, _image: &GrayImage) -> Result<OcrOutput, OcrError> {
        Err(OcrError::EngineError("no language data".into()))
    }

    fn name(&self) -> &str {
        "broken"
    }
}

fn word(left: i32, top: i32, width: i32, height: i32, confidence: i32) -> TextRegion {
    TextRegion::word("secret", BoundingBox::new(left, top, width, height), confidence)
}

fn redactor(regions: Vec<TextRegion>) -> ImageRedactor<FixedEngine> {
    ImageRedactor::new(FixedEngine(regions), RedactionConfig::default()).unwrap()
}

/// Fine vertical stripes, so any blur visibly changes the pixels.
fn striped(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        if x % 2 == 0 {
            Rgb([240, 30, (y % 256) as u8])
        } else {
            Rgb([10, 220, 128])
        }
    })
}

fn write_png(dir: &std::path::Path, name: &str, img: &RgbImage) -> PathBuf {
    let path = dir.join(name);
    img.save(&path).unwrap();
    path
}

#[test]
fn test_prelude_imports() {
    // The free-standing helpers are reachable through the prelude
    assert_eq!(
        derive_output_path(Path::new("/a/b/photo.jpg"), "_blurred"),
        PathBuf::from("/a/b/photo_blurred.jpg")
    );
    assert_eq!(
        redact_audio_stub("/x/y.wav"),
        "[guardian] Redaction stub called on: /x/y.wav"
    );
    assert_eq!(RedactionConfig::default().confidence_threshold, 30);
}

#[test]
fn test_no_detections_copies_pixels() {
    let dir = tempdir().unwrap();
    let original = striped(80, 40);
    let input = write_png(dir.path(), "plain.png", &original);

    let output = redactor(Vec::new()).redact(&input).unwrap();

    assert_eq!(output, dir.path().join("plain_blurred.png"));
    assert_eq!(image::open(&output).unwrap().to_rgb8(), original);
    // The input is left untouched
    assert_eq!(image::open(&input).unwrap().to_rgb8(), original);
}

#[test]
fn test_only_confident_regions_are_blurred() {
    let dir = tempdir().unwrap();
    let original = striped(120, 60);
    let input = write_png(dir.path(), "card.png", &original);

    let outcome = redactor(vec![word(10, 10, 40, 20, 95), word(70, 30, 40, 20, 30)])
        .redact_with_summary(&input)
        .unwrap();
    assert_eq!(outcome.regions.detected, 2);
    assert_eq!(outcome.regions.blurred, 1);

    let result = image::open(&outcome.output_path).unwrap().to_rgb8();
    let mut blurred_changed = false;
    for (x, y, px) in result.enumerate_pixels() {
        let in_confident = (10..50).contains(&x) && (10..30).contains(&y);
        if in_confident {
            blurred_changed |= px != original.get_pixel(x, y);
        } else {
            assert_eq!(px, original.get_pixel(x, y), "pixel ({x},{y}) changed");
        }
    }
    assert!(blurred_changed, "confident region was not blurred");
}

#[test]
fn test_missing_input_is_a_load_error() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("nope.jpg");

    let err = redactor(Vec::new()).redact(&input).unwrap_err();

    assert!(matches!(err, RedactError::Load { ref path, .. } if path == &input));
    assert!(!dir.path().join("nope_blurred.jpg").exists());
}

#[test]
fn test_corrupt_input_is_a_load_error() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("broken.png");
    std::fs::write(&input, b"definitely not a png").unwrap();

    let err = redactor(Vec::new()).redact(&input).unwrap_err();

    assert!(matches!(err, RedactError::Load { .. }));
    assert!(!dir.path().join("broken_blurred.png").exists());
}

#[test]
fn test_unwritable_output_is_a_save_error() {
    let dir = tempdir().unwrap();
    let input = write_png(dir.path(), "photo.png", &striped(16, 16));
    let redactor = redactor(Vec::new());

    let unknown_format = dir.path().join("photo.unknownext");
    let err = redactor.redact_to(&input, &unknown_format).unwrap_err();
    assert!(matches!(err, RedactError::Save { .. }));
    assert!(!unknown_format.exists());

    let missing_dir = dir.path().join("missing").join("photo.png");
    let err = redactor.redact_to(&input, &missing_dir).unwrap_err();
    assert!(matches!(err, RedactError::Save { .. }));
    assert!(!missing_dir.exists());

    // Nothing but the input should be left in the directory
    let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(leftovers.len(), 1);
}

#[test]
fn test_detection_failure_surfaces() {
    let dir = tempdir().unwrap();
    let input = write_png(dir.path(), "photo.png", &striped(16, 16));
    let redactor = ImageRedactor::new(BrokenEngine, RedactionConfig::default()).unwrap();

    let err = redactor.redact(&input).unwrap_err();
    assert!(matches!(err, RedactError::Detection(_)));
    assert!(!dir.path().join("photo_blurred.png").exists());
}

#[test]
fn test_invalid_config_is_rejected_up_front() {
    let config = RedactionConfig {
        kernel_size: 4,
        ..Default::default()
    };
    let result = ImageRedactor::new(FixedEngine(Vec::new()), config);
    assert!(matches!(result, Err(RedactError::InvalidConfig(_))));
}

#[test]
fn test_output_format_follows_extension() {
    let dir = tempdir().unwrap();
    let input = write_png(dir.path(), "photo.png", &striped(32, 32));
    let output = dir.path().join("photo.jpg");

    redactor(vec![word(0, 0, 16, 16, 80)])
        .redact_to(&input, &output)
        .unwrap();

    let bytes = std::fs::read(&output).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8], "expected a JPEG header");
}

#[test]
fn test_redacting_an_output_again_terminates() {
    let dir = tempdir().unwrap();
    let input = write_png(dir.path(), "doc.png", &striped(64, 64));
    let redactor = redactor(vec![word(8, 8, 32, 32, 70)]);

    let first = redactor.redact(&input).unwrap();
    let second = redactor.redact(&first).unwrap();

    assert_eq!(second, dir.path().join("doc_blurred_blurred.png"));
    let img = image::open(&second).unwrap();
    assert_eq!((img.width(), img.height()), (64, 64));
}

#[test]
fn test_alpha_is_dropped() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("icon.png");
    image::RgbaImage::from_pixel(8, 8, image::Rgba([1, 2, 3, 100]))
        .save(&input)
        .unwrap();

    let output = redactor(Vec::new()).redact(&input).unwrap();

    let img = image::open(&output).unwrap();
    assert_eq!(img.color(), image::ColorType::Rgb8);
    assert_eq!(img.to_rgb8().get_pixel(0, 0), &Rgb([1, 2, 3]));
}

#[test]
fn test_format_is_sniffed_from_content() {
    let dir = tempdir().unwrap();
    let png = write_png(dir.path(), "source.png", &striped(24, 24));
    let input = dir.path().join("photo.jpg");
    std::fs::rename(&png, &input).unwrap();

    let output = redactor(vec![word(0, 0, 12, 12, 80)]).redact(&input).unwrap();

    assert_eq!(output, dir.path().join("photo_blurred.jpg"));
    let bytes = std::fs::read(&output).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8], "output still follows its extension");
}

#[test]
fn test_jpeg_output_uses_high_quality() {
    let dir = tempdir().unwrap();
    let img = striped(64, 64);
    let input = write_png(dir.path(), "scan.png", &img);
    let output = dir.path().join("scan.jpg");

    redactor(Vec::new()).redact_to(&input, &output).unwrap();

    let mut default_quality = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut default_quality, 75)
        .encode_image(&img)
        .unwrap();
    let written = std::fs::metadata(&output).unwrap().len();
    assert!(
        written > default_quality.len() as u64,
        "{written} bytes is no larger than a quality 75 encode ({})",
        default_quality.len()
    );
}

#[cfg(unix)]
#[test]
fn test_output_keeps_input_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let input = write_png(dir.path(), "shared.png", &striped(16, 16));
    std::fs::set_permissions(&input, std::fs::Permissions::from_mode(0o644)).unwrap();

    let output = redactor(vec![word(0, 0, 8, 8, 80)]).redact(&input).unwrap();

    let mode = std::fs::metadata(&output).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o644);
}
