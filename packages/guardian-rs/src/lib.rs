//! # guardian-rs
//!
//! A library for scrubbing readable text out of images before they are shared,
//! by locating text with OCR and blurring every confident detection.
//!
//! ## Features
//!
//! - **Image Redaction**: Decode an image, detect text regions, Gaussian-blur each region above a confidence threshold and write `<stem>_blurred.<ext>` next to it
//! - **Pluggable OCR**: Any [`guardian_ocr::OcrEngine`] can drive detection; Tesseract ships behind the `tesseract` feature
//! - **Batch Mode**: Redact a whole folder tree with bounded concurrency and an optional JSON report
//! - **Atomic Output**: Results are encoded to a temporary file and renamed into place, so a failed save leaves nothing behind
//! - **Audio Placeholder**: A no-op audio entry point that describes the call
//!
//! ## Quick Start
//!
//! ```ignore
//! use guardian_rs::prelude::*;
//!
//! // Redact with the default engine and settings
//! let output = redact("/photos/receipt.jpg")?;
//! assert!(output.ends_with("receipt_blurred.jpg"));
//!
//! // Or pick the engine and tuning yourself
//! let engine = default_engine(&EngineOptions::default())?;
//! let redactor = ImageRedactor::new(engine, RedactionConfig::default())?;
//! let outcome = redactor.redact_with_summary(Path::new("/photos/id_card.png"))?;
//! println!("blurred {} regions", outcome.regions.blurred);
//! ```

pub mod audio;
pub mod batch;
pub mod blur;
pub mod config;
pub mod error;
pub mod output_path;
pub mod redactor;

// Re-export commonly used types at the root level
pub use audio::redact_audio_stub;
pub use batch::{BatchEntry, BatchOptions, BatchRedactor, BatchReport};
pub use blur::{gaussian_blur, gaussian_kernel};
pub use config::RedactionConfig;
pub use error::{RedactError, SaveFailure};
pub use output_path::derive_output_path;
pub use redactor::{load_image, redact, redact_pixels, ImageRedactor, RedactionOutcome, RegionTally};

pub use guardian_ocr::{default_engine, BoundingBox, EngineOptions, OcrEngine, OcrError, OcrOutput, TextRegion};

/// Prelude module for convenient imports
///
/// Import everything you need with:
/// ```ignore
/// use guardian_rs::prelude::*;
/// ```
pub mod prelude {
  pub use crate::{
    default_engine, derive_output_path, redact, redact_audio_stub, redact_pixels, BatchOptions, BatchRedactor,
    BatchReport, BoundingBox, EngineOptions, ImageRedactor, OcrEngine, OcrOutput, RedactError, RedactionConfig,
    RedactionOutcome, RegionTally, TextRegion,
  };
  pub use std::path::Path;
}
