//! Structure classification: assigning a role to each assembled line.
//!
//! The classifier is an explicit transition function over [`LineRole`],
//! evaluated as an ordered rule list so every tie-break stays auditable.
//! It never inspects word text for language or vocabulary; markers are
//! recognized purely by glyph category (digit, closing punctuation,
//! bullet symbol), everything else is geometry and font statistics.

use std::collections::HashMap;

use crate::fonts::FontStatistics;

use super::graphics::TableRegion;
use super::lines::Line;

/// A heading must stay narrower than this fraction of the body column.
const SHORT_RUN_RATIO: f32 = 0.75;

/// Margin positions bucket at this width when finding the dominant margin.
const MARGIN_BUCKET: f32 = 2.0;

/// Margin deltas below this do not count as indentation.
const MIN_INDENT_DELTA: f32 = 4.0;

/// Structural role assigned to one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole {
    /// Heading with level 1-6
    Heading(u8),
    /// Row of the table region with the given index
    TableRow {
        /// Index into the page's region list
        region: usize,
    },
    /// List item
    ListItem {
        /// Item number for ordered markers
        ordinal: Option<u32>,
        /// Nesting depth
        depth: u8,
    },
    /// Block quote
    BlockQuote {
        /// Nesting depth
        depth: u8,
    },
    /// Default role
    Paragraph,
}

/// A recognized structural list marker at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMarker {
    /// Parsed number for ordinal markers, None for bullets
    pub ordinal: Option<u32>,
    /// Byte length of the marker prefix in the line text
    pub prefix_len: usize,
}

/// Page-local layout metrics derived from the assembled lines.
#[derive(Debug, Clone)]
pub struct PageMetrics {
    /// The page's dominant left margin (mode over line left edges)
    pub dominant_margin: f32,
    /// One indentation step: smallest recurring nonzero margin delta
    pub indent_unit: f32,
    /// Width of the body text column
    pub content_width: f32,
}

impl PageMetrics {
    /// Compute metrics over a page's lines.
    pub fn from_lines(lines: &[Line], stats: &FontStatistics) -> Self {
        if lines.is_empty() {
            return Self {
                dominant_margin: 0.0,
                indent_unit: stats.body_size() * 2.0,
                content_width: 0.0,
            };
        }

        let mut margin_counts: HashMap<i32, usize> = HashMap::new();
        for line in lines {
            let bucket = (line.left() / MARGIN_BUCKET).round() as i32;
            *margin_counts.entry(bucket).or_insert(0) += 1;
        }
        let dominant_bucket = *margin_counts
            .iter()
            .max_by_key(|(bucket, count)| (**count, std::cmp::Reverse(**bucket)))
            .map(|(bucket, _)| bucket)
            .unwrap();
        let dominant_margin = dominant_bucket as f32 * MARGIN_BUCKET;

        // Indent unit: smallest nonzero delta between distinct margins.
        let mut margins: Vec<f32> = margin_counts
            .keys()
            .map(|b| *b as f32 * MARGIN_BUCKET)
            .collect();
        margins.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let mut indent_unit = f32::MAX;
        for w in margins.windows(2) {
            let delta = w[1] - w[0];
            if delta >= MIN_INDENT_DELTA && delta < indent_unit {
                indent_unit = delta;
            }
        }
        if indent_unit == f32::MAX {
            indent_unit = stats.body_size() * 2.0;
        }

        let right = lines
            .iter()
            .map(|l| l.bbox.x1)
            .fold(f32::MIN, f32::max);
        let content_width = (right - dominant_margin).max(0.0);

        Self {
            dominant_margin,
            indent_unit,
            content_width,
        }
    }

    /// Quantize a left-margin offset into an indent depth.
    pub fn depth_of(&self, left: f32) -> u8 {
        let offset = left - self.dominant_margin;
        if offset <= 0.0 || self.indent_unit <= 0.0 {
            return 0;
        }
        (offset / self.indent_unit).round().max(0.0) as u8
    }
}

/// Classify one line. Rules are evaluated in order; the first match wins.
pub fn classify_line(
    line: &Line,
    regions: &[TableRegion],
    stats: &FontStatistics,
    metrics: &PageMetrics,
) -> LineRole {
    // Rule 1: table row. Inside a valid region with a column-break gap
    // aligned to one of the region's column boundaries.
    for (i, region) in regions.iter().enumerate() {
        if region.contains_line(line) && line.gaps.iter().any(|g| region.gap_aligned(g)) {
            return LineRole::TableRow { region: i };
        }
    }

    // Rule 2: heading. Non-body font size and a short run.
    let level = stats.heading_level(line.font_size);
    if level > 0 && is_short_run(line, metrics) {
        return LineRole::Heading(level);
    }

    // Rule 3: list item. Structural marker at or beyond the dominant margin.
    if let Some(marker) = detect_marker(&line.text) {
        if line.left() >= metrics.dominant_margin - MARGIN_BUCKET {
            return LineRole::ListItem {
                ordinal: marker.ordinal,
                depth: metrics.depth_of(line.left()),
            };
        }
    }

    // Rule 4: block quote. Indented by at least one unit.
    if line.left() - metrics.dominant_margin >= metrics.indent_unit - MARGIN_BUCKET {
        return LineRole::BlockQuote {
            depth: metrics.depth_of(line.left()).max(1),
        };
    }

    // Rule 5: default.
    LineRole::Paragraph
}

fn is_short_run(line: &Line, metrics: &PageMetrics) -> bool {
    if metrics.content_width <= 0.0 {
        return true;
    }
    line.width() < metrics.content_width * SHORT_RUN_RATIO
}

/// Detect a structural list marker at the start of the text.
///
/// Recognized forms: a bullet glyph standing alone, or a run of digits
/// followed by `.` or `)`. The marker must be followed by whitespace or
/// end the text.
pub fn detect_marker(text: &str) -> Option<ListMarker> {
    let trimmed = text.trim_start();
    let lead_ws = text.len() - trimmed.len();
    let mut chars = trimmed.char_indices();

    let (_, first) = chars.next()?;
    if is_bullet_glyph(first) {
        let after = first.len_utf8();
        if trimmed[after..].is_empty() || trimmed[after..].starts_with(char::is_whitespace) {
            return Some(ListMarker {
                ordinal: None,
                prefix_len: lead_ws + after,
            });
        }
        return None;
    }

    if !first.is_ascii_digit() {
        return None;
    }
    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let rest = &trimmed[digits_end..];
    if let Some(punct) = rest.chars().next() {
        if punct == '.' || punct == ')' {
            let after = digits_end + punct.len_utf8();
            if trimmed[after..].is_empty() || trimmed[after..].starts_with(char::is_whitespace) {
                let ordinal = trimmed[..digits_end].parse::<u32>().ok();
                return Some(ListMarker {
                    ordinal,
                    prefix_len: lead_ws + after,
                });
            }
        }
    }
    None
}

/// Check if a character is a recognized bullet glyph.
fn is_bullet_glyph(c: char) -> bool {
    matches!(
        c,
        '-' | '–'
            | '—'
            | '•'
            | '·'
            | '*'
            | '○'
            | '▪'
            | '◦'
            | '▸'
            | '▹'
            | '►'
            | '■'
            | '●'
            | '※'
            | '□'
            | '◆'
            | '◇'
            | '▶'
            | '▷'
            | '➤'
            | '➜'
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::BBox;
    use crate::input::Word;
    use crate::options::AnalyzeOptions;

    fn make_line(text: &str, x0: f32, y0: f32, size: f32) -> Line {
        let options = AnalyzeOptions::default();
        let word = Word::new(
            text,
            BBox::new(x0, y0, x0 + text.len() as f32 * size * 0.5, y0 + size),
            "Helvetica",
            size,
        );
        let mut warnings = Vec::new();
        super::super::lines::LineAssembler::new(&options)
            .assemble(&[word], 1, &mut warnings)
            .pop()
            .unwrap()
    }

    fn body_stats() -> FontStatistics {
        let mut words = Vec::new();
        for _ in 0..50 {
            words.push(Word::new(
                "body text words here",
                BBox::new(0.0, 0.0, 100.0, 12.0),
                "Helvetica",
                12.0,
            ));
        }
        words.push(Word::new(
            "Heading",
            BBox::new(0.0, 0.0, 80.0, 18.0),
            "Helvetica",
            18.0,
        ));
        FontStatistics::from_words(&words)
    }

    fn classify(line: &Line, regions: &[TableRegion], metrics: &PageMetrics) -> LineRole {
        classify_line(line, regions, &body_stats(), metrics)
    }

    fn page_metrics() -> PageMetrics {
        PageMetrics {
            dominant_margin: 50.0,
            indent_unit: 20.0,
            content_width: 400.0,
        }
    }

    #[test]
    fn test_detect_marker_forms() {
        assert_eq!(
            detect_marker("1. item"),
            Some(ListMarker {
                ordinal: Some(1),
                prefix_len: 2
            })
        );
        assert_eq!(
            detect_marker("12) item"),
            Some(ListMarker {
                ordinal: Some(12),
                prefix_len: 3
            })
        );
        assert_eq!(
            detect_marker("• item"),
            Some(ListMarker {
                ordinal: None,
                prefix_len: 3 // bullet is 3 bytes in UTF-8
            })
        );
        assert_eq!(
            detect_marker("- item"),
            Some(ListMarker {
                ordinal: None,
                prefix_len: 1
            })
        );
        // Not markers: no trailing separator, non-digit prefix, plain text
        assert_eq!(detect_marker("1.5 units"), None);
        assert_eq!(detect_marker("version"), None);
        assert_eq!(detect_marker("-dash"), None);
    }

    #[test]
    fn test_heading_classification() {
        let metrics = page_metrics();
        let line = make_line("Title", 50.0, 40.0, 18.0);
        assert!(matches!(
            classify(&line, &[], &metrics),
            LineRole::Heading(_)
        ));
    }

    #[test]
    fn test_full_width_large_text_is_not_heading() {
        let metrics = page_metrics();
        // 40 chars * 9 units = 360 width, >= 0.75 * 400
        let line = make_line(&"x".repeat(40), 50.0, 40.0, 18.0);
        assert_eq!(classify(&line, &[], &metrics), LineRole::Paragraph);
    }

    #[test]
    fn test_list_item_depths() {
        let metrics = page_metrics();
        let top = make_line("1. first", 50.0, 100.0, 12.0);
        assert_eq!(
            classify(&top, &[], &metrics),
            LineRole::ListItem {
                ordinal: Some(1),
                depth: 0
            }
        );

        let nested = make_line("- sub", 90.0, 120.0, 12.0);
        assert_eq!(
            classify(&nested, &[], &metrics),
            LineRole::ListItem {
                ordinal: None,
                depth: 2
            }
        );
    }

    #[test]
    fn test_block_quote_depth() {
        let metrics = page_metrics();
        let quote = make_line("indented words", 70.0, 100.0, 12.0);
        assert_eq!(classify(&quote, &[], &metrics), LineRole::BlockQuote { depth: 1 });

        let deeper = make_line("more indented", 90.0, 120.0, 12.0);
        assert_eq!(classify(&deeper, &[], &metrics), LineRole::BlockQuote { depth: 2 });
    }

    #[test]
    fn test_table_row_needs_aligned_gap() {
        let metrics = page_metrics();
        let region = TableRegion {
            bbox: BBox::new(40.0, 90.0, 400.0, 200.0),
            row_boundaries: vec![90.0, 140.0, 200.0],
            column_boundaries: vec![40.0, 200.0, 400.0],
        };

        // Two words separated by a wide gap straddling x=200
        let options = AnalyzeOptions::default();
        let words = vec![
            Word::new("left", BBox::new(50.0, 100.0, 90.0, 112.0), "F", 12.0),
            Word::new("right", BBox::new(210.0, 100.0, 260.0, 112.0), "F", 12.0),
        ];
        let mut warnings = Vec::new();
        let line = super::super::lines::LineAssembler::new(&options)
            .assemble(&words, 1, &mut warnings)
            .pop()
            .unwrap();
        assert_eq!(
            classify(&line, &[region.clone()], &metrics),
            LineRole::TableRow { region: 0 }
        );

        // Same line outside the region is not a table row
        let outside = make_line("no gap here at all", 50.0, 300.0, 12.0);
        assert_eq!(classify(&outside, &[region], &metrics), LineRole::Paragraph);
    }

    #[test]
    fn test_default_is_paragraph() {
        let metrics = page_metrics();
        let line = make_line("ordinary body text line", 50.0, 100.0, 12.0);
        assert_eq!(classify(&line, &[], &metrics), LineRole::Paragraph);
    }

    #[test]
    fn test_metrics_from_lines() {
        let lines: Vec<Line> = vec![
            make_line("one", 50.0, 100.0, 12.0),
            make_line("two", 50.0, 120.0, 12.0),
            make_line("three", 50.0, 140.0, 12.0),
            make_line("indented", 70.0, 160.0, 12.0),
        ];
        let metrics = PageMetrics::from_lines(&lines, &body_stats());
        assert_eq!(metrics.dominant_margin, 50.0);
        assert_eq!(metrics.indent_unit, 20.0);
        assert_eq!(metrics.depth_of(70.0), 1);
        assert_eq!(metrics.depth_of(50.0), 0);
        assert_eq!(metrics.depth_of(30.0), 0); // floor at 0
    }
}
