//! Structural output model.
//!
//! This is the format-agnostic tree the analysis pipeline produces:
//! per-page element sequences ready for syntactic serialization. The model
//! carries no geometry; positions only exist inside the pipeline.

mod element;
mod table;

pub use element::{Element, Page, Paragraph, TextRun, TextStyle};
pub use table::{Alignment, Table, TableCell, TableRow};

use serde::{Deserialize, Serialize};

/// The structural document produced by analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Pages in document order
    pub pages: Vec<Page>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Get a page by its 1-indexed number.
    pub fn page(&self, number: u32) -> crate::error::Result<&Page> {
        self.pages
            .iter()
            .find(|p| p.number == number)
            .ok_or(crate::error::Error::PageOutOfRange(
                number,
                self.pages.len() as u32,
            ))
    }

    /// Get plain text content of the whole document.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
