use std::path::PathBuf;

use guardian_ocr::OcrError;
use thiserror::Error;

/// Why an output image could not be written.
#[derive(Debug, Error)]
pub enum SaveFailure {
  #[error(transparent)]
  Encode(#[from] image::ImageError),
  #[error(transparent)]
  Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum RedactError {
  #[error("could not load image {}: {source}", .path.display())]
  Load {
    path: PathBuf,
    #[source]
    source: image::ImageError,
  },
  #[error("could not save image {}: {source}", .path.display())]
  Save {
    path: PathBuf,
    #[source]
    source: SaveFailure,
  },
  #[error("text detection failed: {0}")]
  Detection(#[from] OcrError),
  #[error("invalid configuration: {0}")]
  InvalidConfig(String),
}

impl RedactError {
  pub(crate) fn save(path: impl Into<PathBuf>, source: impl Into<SaveFailure>) -> Self {
    RedactError::Save {
      path: path.into(),
      source: source.into(),
    }
  }
}
