//! Page elements and text-level types.

use serde::{Deserialize, Serialize};

use super::Table;

/// A single page in the structural document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,
    /// Classified elements in reading order
    pub elements: Vec<Element>,
}

impl Page {
    /// Create an empty page.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            elements: Vec::new(),
        }
    }

    /// Add an element to the page.
    pub fn add_element(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Check if the page has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Get plain text content of the page.
    pub fn plain_text(&self) -> String {
        self.elements
            .iter()
            .map(|e| e.plain_text())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A classified structural element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    /// A heading with level 1-6
    Heading {
        /// Heading level (1 = largest)
        level: u8,
        /// Heading text
        content: Paragraph,
    },

    /// A body paragraph
    Paragraph(Paragraph),

    /// A list item
    ListItem {
        /// Nesting depth (0 = top level)
        depth: u8,
        /// Item number for ordered lists, None for bullets
        ordinal: Option<u32>,
        /// Item text (marker stripped)
        content: Paragraph,
    },

    /// A block quote
    BlockQuote {
        /// Nesting depth (1 = one indent unit)
        depth: u8,
        /// Quoted text
        content: Paragraph,
    },

    /// A table collapsed from one graphics region
    Table(Table),

    /// A horizontal rule / divider
    HorizontalRule,
}

impl Element {
    /// Create a heading element.
    pub fn heading(level: u8, content: Paragraph) -> Self {
        Element::Heading {
            level: level.clamp(1, 6),
            content,
        }
    }

    /// Check if this element is a table.
    pub fn is_table(&self) -> bool {
        matches!(self, Element::Table(_))
    }

    /// Check if this element is a heading.
    pub fn is_heading(&self) -> bool {
        matches!(self, Element::Heading { .. })
    }

    /// Get plain text content.
    pub fn plain_text(&self) -> String {
        match self {
            Element::Heading { content, .. }
            | Element::Paragraph(content)
            | Element::ListItem { content, .. }
            | Element::BlockQuote { content, .. } => content.plain_text(),
            Element::Table(table) => table.plain_text(),
            Element::HorizontalRule => String::new(),
        }
    }
}

/// A paragraph of styled text runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Paragraph {
    /// Text runs in reading order
    pub runs: Vec<TextRun>,
}

impl Paragraph {
    /// Create an empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph with a single unstyled run.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            runs: vec![TextRun::new(text)],
        }
    }

    /// Append a run.
    pub fn add_run(&mut self, run: TextRun) {
        self.runs.push(run);
    }

    /// Append another paragraph's runs, separated by a space.
    pub fn extend_with(&mut self, other: Paragraph) {
        if !self.runs.is_empty() && !other.runs.is_empty() {
            self.runs.push(TextRun::new(" "));
        }
        self.runs.extend(other.runs);
    }

    /// Get the concatenated plain text.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Check if the paragraph has no visible text.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty() || self.plain_text().trim().is_empty()
    }
}

/// A run of text with consistent styling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,
    /// Emphasis styling
    pub style: TextStyle,
}

impl TextRun {
    /// Create a new run with default style.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::default(),
        }
    }

    /// Create a run with the given style.
    pub fn styled(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Emphasis styling for a text run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Bold text
    pub bold: bool,
    /// Italic text
    pub italic: bool,
}
