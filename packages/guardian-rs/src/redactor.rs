//! Image redaction: find text with OCR, blur it, write a sibling file.
use std::fs::Permissions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use guardian_ocr::{default_engine, EngineOptions, OcrEngine, TextRegion};
use image::codecs::jpeg::JpegEncoder;
use image::{imageops, DynamicImage, ImageDecoder, ImageError, ImageFormat, ImageReader, RgbImage};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::blur::{gaussian_blur, gaussian_kernel};
use crate::config::RedactionConfig;
use crate::error::RedactError;
use crate::output_path::derive_output_path;

const JPEG_QUALITY: u8 = 95;

/// How the detected regions were handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegionTally {
  pub detected: usize,
  pub blurred: usize,
  /// Confident regions that were empty or fell outside the image
  pub skipped: usize,
}

/// Result of redacting one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactionOutcome {
  pub output_path: PathBuf,
  pub regions: RegionTally,
}

/// Blurs every region scoring above the threshold, in the order given.
///
/// Boxes partly outside the image are clipped to it; empty or fully
/// outside boxes are skipped.
pub fn redact_pixels(
  image: &mut RgbImage,
  regions: &[TextRegion],
  config: &RedactionConfig,
) -> RegionTally {
  let kernel = gaussian_kernel(config.kernel_size, config.sigma);
  let (width, height) = image.dimensions();
  let mut tally = RegionTally {
    detected: regions.len(),
    ..Default::default()
  };

  for region in regions {
    if region.confidence <= config.confidence_threshold {
      continue;
    }

    let Some((x, y, w, h)) = region.bounding_box.clip_to(width, height) else {
      debug!(bbox = ?region.bounding_box, "skipping empty or out-of-bounds region");
      tally.skipped += 1;
      continue;
    };

    let roi = imageops::crop_imm(&*image, x, y, w, h).to_image();
    let blurred = gaussian_blur(&roi, &kernel);
    imageops::replace(image, &blurred, i64::from(x), i64::from(y));

    debug!(
      x,
      y,
      w,
      h,
      confidence = region.confidence,
      "blurred region"
    );
    tally.blurred += 1;
  }

  tally
}

/// Redacts image files with a fixed engine and configuration.
pub struct ImageRedactor<E> {
  engine: E,
  config: RedactionConfig,
}

impl<E: OcrEngine> ImageRedactor<E> {
  pub fn new(engine: E, config: RedactionConfig) -> Result<Self, RedactError> {
    config.validate()?;
    Ok(Self { engine, config })
  }

  pub fn config(&self) -> &RedactionConfig {
    &self.config
  }

  pub fn engine(&self) -> &E {
    &self.engine
  }

  /// Writes `<stem>_blurred.<ext>` next to `input` and returns its path.
  pub fn redact(&self, input: &Path) -> Result<PathBuf, RedactError> {
    self.redact_with_summary(input).map(|outcome| outcome.output_path)
  }

  pub fn redact_with_summary(&self, input: &Path) -> Result<RedactionOutcome, RedactError> {
    let output = derive_output_path(input, &self.config.suffix);
    self.redact_to(input, &output)
  }

  /// Redacts `input` into an explicit `output` path.
  pub fn redact_to(&self, input: &Path, output: &Path) -> Result<RedactionOutcome, RedactError> {
    let decoded = load_image(input)?;
    self.redact_decoded(input, decoded, output)
  }

  /// Redacts an image already decoded from `input` (see [`load_image`]).
  pub fn redact_decoded(
    &self,
    input: &Path,
    decoded: DynamicImage,
    output: &Path,
  ) -> Result<RedactionOutcome, RedactError> {
    let permissions = std::fs::metadata(input).ok().map(|m| m.permissions());

    let gray = decoded.to_luma8();
    let mut color = decoded.into_rgb8();

    let detection = self.engine.recognize(&gray)?;
    let regions = redact_pixels(&mut color, &detection.regions, &self.config);

    write_atomically(&DynamicImage::ImageRgb8(color), output, permissions)?;

    info!(
      input = %input.display(),
      output = %output.display(),
      engine = self.engine.name(),
      detected = regions.detected,
      blurred = regions.blurred,
      "redacted image"
    );

    Ok(RedactionOutcome {
      output_path: output.to_path_buf(),
      regions,
    })
  }
}

/// Decodes `input`, sniffing the format from its bytes, and rotates it upright.
pub fn load_image(input: &Path) -> Result<DynamicImage, RedactError> {
  let load_error = |source: ImageError| RedactError::Load {
    path: input.to_path_buf(),
    source,
  };

  let reader = ImageReader::open(input)
    .and_then(|reader| reader.with_guessed_format())
    .map_err(|e| load_error(ImageError::IoError(e)))?;
  let mut decoder = reader.into_decoder().map_err(load_error)?;
  let orientation = decoder.orientation().map_err(load_error)?;

  let mut image = DynamicImage::from_decoder(decoder).map_err(load_error)?;
  image.apply_orientation(orientation);
  Ok(image)
}

/// Encodes into a temporary file beside `output`, then renames it into place.
///
/// The output takes `permissions` (the input's) rather than the temp file's 0600.
fn write_atomically(
  image: &DynamicImage,
  output: &Path,
  permissions: Option<Permissions>,
) -> Result<(), RedactError> {
  let format = ImageFormat::from_path(output).map_err(|e| RedactError::save(output, e))?;

  let dir = match output.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  };
  let mut tmp = NamedTempFile::new_in(dir).map_err(|e| RedactError::save(output, e))?;

  {
    let mut writer = BufWriter::new(tmp.as_file_mut());
    match format {
      ImageFormat::Jpeg => {
        let encoder = JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
        image.write_with_encoder(encoder)
      }
      _ => image.write_to(&mut writer, format),
    }
    .map_err(|e| RedactError::save(output, e))?;
    writer.flush().map_err(|e| RedactError::save(output, e))?;
  }

  if let Some(permissions) = permissions {
    tmp
      .as_file()
      .set_permissions(permissions)
      .map_err(|e| RedactError::save(output, e))?;
  }

  tmp
    .persist(output)
    .map_err(|e| RedactError::save(output, e.error))?;
  Ok(())
}

/// Redacts `input` with the default OCR backend and settings.
pub fn redact(input: impl AsRef<Path>) -> Result<PathBuf, RedactError> {
  let engine = default_engine(&EngineOptions::default())?;
  ImageRedactor::new(engine, RedactionConfig::default())?.redact(input.as_ref())
}
