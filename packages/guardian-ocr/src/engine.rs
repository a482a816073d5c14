use std::path::PathBuf;

use image::GrayImage;
use thiserror::Error;

use crate::region::{LayoutLevel, TextRegion};

#[derive(Debug, Clone)]
pub struct OcrOutput {
    pub text: String,
    pub regions: Vec<TextRegion>,
}

impl OcrOutput {
    /// Builds the output from engine regions, joining word texts line by line.
    pub fn from_regions(regions: Vec<TextRegion>) -> Self {
        let mut lines: Vec<String> = Vec::new();
        let mut current = String::new();

        for region in &regions {
            match region.level {
                LayoutLevel::Word => {
                    if region.text.trim().is_empty() {
                        continue;
                    }
                    if !current.is_empty() {
                        current.push(' ');
                    }
                    current.push_str(region.text.trim());
                }
                LayoutLevel::Line | LayoutLevel::Paragraph | LayoutLevel::Block => {
                    if !current.is_empty() {
                        lines.push(std::mem::take(&mut current));
                    }
                }
                LayoutLevel::Page => {}
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }

        OcrOutput {
            text: lines.join("\n"),
            regions,
        }
    }
}

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("no OCR backend compiled in (enable the `tesseract` feature)")]
    Unsupported,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("engine error: {0}")]
    EngineError(String),
}

/// Backend settings shared by every engine.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Tesseract language code(s), e.g. `eng` or `eng+deu`.
    pub language: String,
    /// Directory holding `*.traineddata`; the engine default when `None`.
    pub tessdata_dir: Option<PathBuf>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            tessdata_dir: None,
        }
    }
}

/// Text detector over single-channel images.
///
/// Region order is whatever the backend produces and carries no meaning.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &GrayImage) -> Result<OcrOutput, OcrError>;

    fn name(&self) -> &str;
}

impl<E: OcrEngine + ?Sized> OcrEngine for Box<E> {
    fn recognize(&self, image: &GrayImage) -> Result<OcrOutput, OcrError> {
        (**self).recognize(image)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Returns the best engine compiled into this build.
#[cfg(feature = "tesseract")]
pub fn default_engine(options: &EngineOptions) -> Result<Box<dyn OcrEngine>, OcrError> {
    Ok(Box::new(crate::tesseract::TesseractEngine::new(options.clone())?))
}

/// Returns the best engine compiled into this build.
#[cfg(not(feature = "tesseract"))]
pub fn default_engine(_options: &EngineOptions) -> Result<Box<dyn OcrEngine>, OcrError> {
    Err(OcrError::Unsupported)
}
