//! # relayout
//!
//! Logical document structure recovery from positioned glyphs.
//!
//! Given words with bounding boxes and font information, plus vector
//! line/rectangle primitives, relayout infers the document's logical
//! structure (headings, paragraphs, lists, block quotes, and tables)
//! purely from geometry and font statistics. No markup exists in the
//! source and none of the analysis inspects text content for language or
//! meaning.
//!
//! ## Quick Start
//!
//! ```
//! use relayout::{analyze, render, AnalyzeOptions, BBox, DocumentInput, PageInput, Word};
//!
//! fn main() -> relayout::Result<()> {
//!     let mut page = PageInput::new(1, 612.0, 792.0);
//!     page.add_word(Word::new(
//!         "Title",
//!         BBox::new(72.0, 72.0, 140.0, 90.0),
//!         "Helvetica-Bold",
//!         18.0,
//!     ));
//!     page.add_word(Word::new(
//!         "Body text follows the heading on this page.",
//!         BBox::new(72.0, 110.0, 480.0, 122.0),
//!         "Helvetica",
//!         12.0,
//!     ));
//!     let input = DocumentInput::from_pages(vec![page]);
//!
//!     let result = analyze(&input, &AnalyzeOptions::default())?;
//!     let markdown = render::to_markdown(&result.document, &Default::default())?;
//!     println!("{markdown}");
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Font analysis** (pass 1): corpus-wide size statistics decide body
//!   text, heading levels, and bold/italic classification
//! - **Line assembly**: words group into visual lines by vertical overlap
//! - **Graphics analysis**: line/rectangle primitives cluster into table
//!   regions with row/column boundaries
//! - **Classification**: each line gets a structural role from geometry
//!   and font statistics alone
//! - **Table building**: full rectangular grids with empty cells
//!   preserved, trailing continuation paragraphs absorbed into cells
//! - **Assembly**: elements linearize into a per-page structural tree
//!
//! Pages are processed in parallel after pass 1 (rayon). Degradations
//! never abort a document; they are collected as [`Warning`]s.

pub mod analysis;
pub mod error;
pub mod fonts;
pub mod geom;
pub mod input;
pub mod model;
pub mod options;
pub mod render;

// Re-export commonly used types
pub use analysis::{analyze_page, AnalyzedDocument, PageAnalysis};
pub use error::{Error, Result, Warning, WarningKind};
pub use fonts::{FontStatistics, FontStyle};
pub use geom::BBox;
pub use input::{DocumentInput, GraphicsPrimitive, PageInput, PrimitiveKind, Word};
pub use model::{
    Alignment, Document, Element, Page, Paragraph, Table, TableCell, TableRow, TextRun, TextStyle,
};
pub use options::AnalyzeOptions;

/// Analyze a document: font statistics first, then per-page structure.
///
/// See [`analysis::analyze`] for details; this is the crate's main entry
/// point.
pub fn analyze(input: &DocumentInput, options: &AnalyzeOptions) -> Result<AnalyzedDocument> {
    analysis::analyze(input, options)
}

/// Analyze a document with default options.
pub fn analyze_default(input: &DocumentInput) -> Result<AnalyzedDocument> {
    analysis::analyze(input, &AnalyzeOptions::default())
}
