//! Input contract for the analysis pipeline.
//!
//! An extraction adapter (external to this crate) reads the binary page
//! format and supplies positioned words and vector graphics per page. No
//! ordering guarantee is assumed on either sequence; the pipeline sorts as
//! needed.

use serde::{Deserialize, Serialize};

use crate::geom::BBox;

/// A positioned word as delivered by the extraction adapter.
///
/// Immutable once extracted; downstream stages only read it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Word {
    /// UTF-8 text run
    pub text: String,
    /// Bounding box in page coordinates
    pub bbox: BBox,
    /// Font name as reported by the source (e.g. "Helvetica-Bold")
    pub font_name: String,
    /// Font size in page units
    pub font_size: f32,
}

impl Word {
    /// Create a new word.
    pub fn new(
        text: impl Into<String>,
        bbox: BBox,
        font_name: impl Into<String>,
        font_size: f32,
    ) -> Self {
        Self {
            text: text.into(),
            bbox,
            font_name: font_name.into(),
            font_size,
        }
    }

    /// Check the word satisfies the input contract: finite, non-inverted
    /// bbox and a positive font size.
    pub fn is_well_formed(&self) -> bool {
        self.bbox.is_valid() && self.font_size.is_finite() && self.font_size > 0.0
    }
}

/// Kind of a vector graphics primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    /// A horizontal line segment
    HorizontalSegment,
    /// A vertical line segment
    VerticalSegment,
    /// A stroked or filled rectangle
    Rectangle,
}

/// A vector graphics primitive extracted from the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphicsPrimitive {
    /// Primitive kind
    pub kind: PrimitiveKind,
    /// Extent of the primitive (a segment has zero height or width)
    pub bbox: BBox,
    /// Stroke width in page units
    pub stroke_width: f32,
}

impl GraphicsPrimitive {
    /// Create a horizontal segment from x0 to x1 at height y.
    pub fn horizontal(x0: f32, x1: f32, y: f32) -> Self {
        Self {
            kind: PrimitiveKind::HorizontalSegment,
            bbox: BBox::new(x0.min(x1), y, x0.max(x1), y),
            stroke_width: 1.0,
        }
    }

    /// Create a vertical segment from y0 to y1 at offset x.
    pub fn vertical(x: f32, y0: f32, y1: f32) -> Self {
        Self {
            kind: PrimitiveKind::VerticalSegment,
            bbox: BBox::new(x, y0.min(y1), x, y0.max(y1)),
            stroke_width: 1.0,
        }
    }

    /// Create a rectangle.
    pub fn rectangle(bbox: BBox) -> Self {
        Self {
            kind: PrimitiveKind::Rectangle,
            bbox,
            stroke_width: 1.0,
        }
    }

    /// Set the stroke width and return self.
    pub fn with_stroke_width(mut self, width: f32) -> Self {
        self.stroke_width = width;
        self
    }
}

/// Extracted content of a single page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageInput {
    /// Page number (1-indexed)
    pub number: u32,
    /// Page width in page units
    pub width: f32,
    /// Page height in page units
    pub height: f32,
    /// Positioned words, in no particular order
    pub words: Vec<Word>,
    /// Vector graphics primitives, in no particular order
    pub graphics: Vec<GraphicsPrimitive>,
}

impl PageInput {
    /// Create an empty page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            words: Vec::new(),
            graphics: Vec::new(),
        }
    }

    /// Add a word to the page.
    pub fn add_word(&mut self, word: Word) {
        self.words.push(word);
    }

    /// Add a graphics primitive to the page.
    pub fn add_graphics(&mut self, primitive: GraphicsPrimitive) {
        self.graphics.push(primitive);
    }
}

/// Extracted content of a whole document, in page order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentInput {
    /// Pages in document order
    pub pages: Vec<PageInput>,
}

impl DocumentInput {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from pages.
    pub fn from_pages(pages: Vec<PageInput>) -> Self {
        Self { pages }
    }

    /// Add a page.
    pub fn add_page(&mut self, page: PageInput) {
        self.pages.push(page);
    }

    /// Total number of words across all pages.
    pub fn word_count(&self) -> usize {
        self.pages.iter().map(|p| p.words.len()).sum()
    }
}
