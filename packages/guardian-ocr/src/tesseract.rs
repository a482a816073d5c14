//! Tesseract backend (via leptess).

use std::io::Cursor;

use image::{GrayImage, ImageFormat};
use leptess::LepTess;

use crate::engine::{EngineOptions, OcrEngine, OcrError, OcrOutput};
use crate::tsv::parse_tsv;

/// Tesseract handles are not thread safe, so one is created per call.
pub struct TesseractEngine {
    options: EngineOptions,
}

impl TesseractEngine {
    /// Creates the engine and checks that the language data can be loaded.
    pub fn new(options: EngineOptions) -> Result<Self, OcrError> {
        let engine = Self { options };
        engine.open()?;
        Ok(engine)
    }

    fn open(&self) -> Result<LepTess, OcrError> {
        let data_path = match &self.options.tessdata_dir {
            Some(dir) => Some(dir.to_str().ok_or_else(|| {
                OcrError::InvalidInput(format!("tessdata path is not UTF-8: {}", dir.display()))
            })?),
            None => None,
        };

        LepTess::new(data_path, &self.options.language).map_err(|e| {
            OcrError::EngineError(format!(
                "failed to initialize tesseract ({}): {}",
                self.options.language, e
            ))
        })
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &GrayImage) -> Result<OcrOutput, OcrError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(OcrError::InvalidInput("image has no pixels".into()));
        }

        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| OcrError::InvalidInput(format!("png encoding failed: {}", e)))?;

        let mut tess = self.open()?;
        tess.set_image_from_mem(&png)
            .map_err(|e| OcrError::EngineError(format!("failed to load image: {}", e)))?;

        let tsv = tess
            .get_tsv_text(0)
            .map_err(|e| OcrError::EngineError(format!("recognition failed: {}", e)))?;

        let regions = parse_tsv(&tsv)?;
        tracing::debug!(
            regions = regions.len(),
            width = image.width(),
            height = image.height(),
            "tesseract pass complete"
        );
        Ok(OcrOutput::from_regions(regions))
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}
