pub mod engine;
pub mod region;
pub mod tsv;

#[cfg(feature = "tesseract")]
pub mod tesseract;

pub use engine::{default_engine, EngineOptions, OcrEngine, OcrError, OcrOutput};
pub use region::{BoundingBox, LayoutLevel, TextRegion};
pub use tsv::parse_tsv;

#[cfg(feature = "tesseract")]
pub use tesseract::TesseractEngine;
