//! Parser for Tesseract's TSV word-data table.
//!
//! Each row is `level page block par line word left top width height conf text`.
//! Structural rows (page/block/paragraph/line) carry `conf = -1` and no text.

use crate::engine::OcrError;
use crate::region::{BoundingBox, LayoutLevel, TextRegion};

const COLUMNS: usize = 12;

/// Parses TSV output into regions, preserving row order.
///
/// A leading header row (as written by the `tesseract` CLI) is skipped.
pub fn parse_tsv(tsv: &str) -> Result<Vec<TextRegion>, OcrError> {
    let mut regions = Vec::new();

    for (line_no, line) in tsv.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() || line.starts_with("level") {
            continue;
        }

        let fields: Vec<&str> = line.splitn(COLUMNS, '\t').collect();
        if fields.len() < COLUMNS - 1 {
            return Err(OcrError::InvalidInput(format!(
                "tsv row {}: expected {} columns, found {}",
                line_no + 1,
                COLUMNS,
                fields.len()
            )));
        }

        let level_code = parse_int(fields[0], "level", line_no)?;
        let level = u8::try_from(level_code)
            .ok()
            .and_then(LayoutLevel::from_code)
            .ok_or_else(|| {
                OcrError::InvalidInput(format!(
                    "tsv row {}: unknown level {}",
                    line_no + 1,
                    level_code
                ))
            })?;

        let bounding_box = BoundingBox::new(
            parse_int(fields[6], "left", line_no)?,
            parse_int(fields[7], "top", line_no)?,
            parse_int(fields[8], "width", line_no)?,
            parse_int(fields[9], "height", line_no)?,
        );
        let confidence = parse_confidence(fields[10], line_no)?;
        let text = fields.get(11).copied().unwrap_or_default().to_string();

        regions.push(TextRegion {
            text,
            level,
            bounding_box,
            confidence,
        });
    }

    Ok(regions)
}

fn parse_int(field: &str, column: &str, line_no: usize) -> Result<i32, OcrError> {
    field.trim().parse::<i32>().map_err(|_| {
        OcrError::InvalidInput(format!(
            "tsv row {}: bad {} value {:?}",
            line_no + 1,
            column,
            field
        ))
    })
}

// Tesseract 4 writes integers, 5 writes decimals; both truncate toward zero.
fn parse_confidence(field: &str, line_no: usize) -> Result<i32, OcrError> {
    let value = field.trim().parse::<f64>().map_err(|_| {
        OcrError::InvalidInput(format!(
            "tsv row {}: bad conf value {:?}",
            line_no + 1,
            field
        ))
    })?;
    if !value.is_finite() {
        return Err(OcrError::InvalidInput(format!(
            "tsv row {}: non-finite conf value {:?}",
            line_no + 1,
            field
        )));
    }
    Ok(value.trunc() as i32)
}
