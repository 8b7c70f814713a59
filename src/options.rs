//! Analysis options and configuration.
//!
//! All options are geometric multipliers or distances; none may reference
//! document content.

/// Options controlling the structure analysis pipeline.
///
/// Factors are multiples of the local font size unless noted otherwise.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Vertical-grouping tolerance: two words share a line when their
    /// vertical bbox overlap exceeds this fraction of the smaller word's
    /// font size.
    pub line_tolerance_factor: f32,

    /// Horizontal-merge tolerance: adjacent words closer than this fraction
    /// of the font size are joined without a separator.
    pub word_join_factor: f32,

    /// Gaps at or above this fraction of the font size are treated as
    /// probable column breaks inside a table-like row.
    pub column_break_factor: f32,

    /// Paragraph continuation: consecutive paragraph lines with a vertical
    /// gap below this fraction of the font size merge into one paragraph.
    pub paragraph_gap_factor: f32,

    /// Maximum text length (in characters) for a trailing paragraph to be
    /// absorbed into an adjacent table cell.
    pub absorption_length_cap: usize,

    /// Maximum vertical gap (as a fraction of the font size) between a
    /// table's last row and a paragraph for absorption.
    pub absorption_gap_factor: f32,

    /// Distance in page units within which graphics primitives cluster
    /// into one candidate table region.
    pub cluster_distance: f32,

    /// Process pages in parallel after font statistics are built.
    pub parallel: bool,
}

impl AnalyzeOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the vertical-grouping tolerance factor.
    pub fn with_line_tolerance(mut self, factor: f32) -> Self {
        self.line_tolerance_factor = factor;
        self
    }

    /// Set the horizontal-merge tolerance factor.
    pub fn with_word_join(mut self, factor: f32) -> Self {
        self.word_join_factor = factor;
        self
    }

    /// Set the column-break gap factor.
    pub fn with_column_break(mut self, factor: f32) -> Self {
        self.column_break_factor = factor;
        self
    }

    /// Set the paragraph continuation gap factor.
    pub fn with_paragraph_gap(mut self, factor: f32) -> Self {
        self.paragraph_gap_factor = factor;
        self
    }

    /// Set the absorption length cap in characters.
    pub fn with_absorption_length_cap(mut self, cap: usize) -> Self {
        self.absorption_length_cap = cap;
        self
    }

    /// Set the absorption vertical gap factor.
    pub fn with_absorption_gap(mut self, factor: f32) -> Self {
        self.absorption_gap_factor = factor;
        self
    }

    /// Set the graphics clustering distance in page units.
    pub fn with_cluster_distance(mut self, distance: f32) -> Self {
        self.cluster_distance = distance;
        self
    }

    /// Enable or disable parallel page processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel page processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            line_tolerance_factor: 0.3,
            word_join_factor: 0.15,
            column_break_factor: 2.0,
            paragraph_gap_factor: 1.5,
            absorption_length_cap: 50,
            absorption_gap_factor: 2.0,
            cluster_distance: 20.0,
            parallel: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_builder() {
        let options = AnalyzeOptions::new()
            .with_cluster_distance(30.0)
            .with_absorption_length_cap(80)
            .sequential();

        assert_eq!(options.cluster_distance, 30.0);
        assert_eq!(options.absorption_length_cap, 80);
        assert!(!options.parallel);
    }

    #[test]
    fn test_default_options() {
        let options = AnalyzeOptions::default();
        assert_eq!(options.line_tolerance_factor, 0.3);
        assert_eq!(options.column_break_factor, 2.0);
        assert_eq!(options.absorption_length_cap, 50);
        assert!(options.parallel);
    }
}
