/// Axis-aligned box in image pixel coordinates, as reported by the engine.
///
/// Values are signed because engines occasionally report boxes that start
/// left of or above the image origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Intersects the box with a `image_width` x `image_height` image.
    ///
    /// Returns `(x, y, width, height)` of the visible part, or `None` when
    /// nothing of the box lies inside the image.
    pub fn clip_to(&self, image_width: u32, image_height: u32) -> Option<(u32, u32, u32, u32)> {
        if self.is_empty() {
            return None;
        }

        let x0 = i64::from(self.left).max(0);
        let y0 = i64::from(self.top).max(0);
        let x1 = (i64::from(self.left) + i64::from(self.width)).min(i64::from(image_width));
        let y1 = (i64::from(self.top) + i64::from(self.height)).min(i64::from(image_height));

        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        Some((x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32))
    }
}

/// Tesseract page iterator level a region was reported at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutLevel {
    Page,
    Block,
    Paragraph,
    Line,
    Word,
}

impl LayoutLevel {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Page),
            2 => Some(Self::Block),
            3 => Some(Self::Paragraph),
            4 => Some(Self::Line),
            5 => Some(Self::Word),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRegion {
    pub text: String,
    pub level: LayoutLevel,
    pub bounding_box: BoundingBox,
    /// Engine score; -1 for structural levels that carry no recognition.
    pub confidence: i32,
}

impl TextRegion {
    pub fn word(text: impl Into<String>, bounding_box: BoundingBox, confidence: i32) -> Self {
        Self {
            text: text.into(),
            level: LayoutLevel::Word,
            bounding_box,
            confidence,
        }
    }
}
