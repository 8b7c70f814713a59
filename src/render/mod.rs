//! Serialization of the structural tree.
//!
//! These projections perform no inference; they map elements one-to-one
//! onto output syntax.

mod json;
mod markdown;

pub use json::to_json;
pub use markdown::{to_markdown, MarkdownRenderer};

/// Options for rendering the structural tree.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Deepest heading level to emit; deeper headings clamp to this
    pub max_heading_level: u8,
    /// Emit bold/italic emphasis markers
    pub emphasis: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_heading_level: 6,
            emphasis: true,
        }
    }
}
