//! The structure-analysis pipeline.
//!
//! Analysis runs in two passes. Pass 1 scans every word to build the
//! corpus-wide font statistics. Pass 2 is page-local: line assembly,
//! graphics clustering, role classification, and table reconstruction.
//! Pages are independent after pass 1 and run in parallel, sharing the
//! statistics read-only.

pub mod classify;
pub mod graphics;
pub mod lines;
pub mod table;

pub use classify::{classify_line, detect_marker, LineRole, ListMarker, PageMetrics};
pub use graphics::{GraphicsAnalyzer, RuleHint, TableRegion};
pub use lines::{ColumnGap, Line, LineAssembler};
pub use table::{absorption_check, AbsorptionRejection, BuiltTable, TableBuilder};

use std::collections::HashMap;

use rayon::prelude::*;

use crate::error::{Error, Result, Warning, WarningKind};
use crate::fonts::{FontStatistics, FontStyle};
use crate::geom::BBox;
use crate::input::{DocumentInput, PageInput};
use crate::model::{Document, Element, Page, Paragraph, TextRun};
use crate::options::AnalyzeOptions;

/// The outcome of analyzing a document: the structural tree plus every
/// degradation recorded along the way.
#[derive(Debug, Clone)]
pub struct AnalyzedDocument {
    /// The structural document
    pub document: Document,
    /// Warnings collected across all pages
    pub warnings: Vec<Warning>,
}

/// Analyze a whole document.
///
/// Builds font statistics over all pages first, then analyzes pages
/// independently (in parallel unless disabled in the options).
pub fn analyze(input: &DocumentInput, options: &AnalyzeOptions) -> Result<AnalyzedDocument> {
    if input.pages.is_empty() {
        return Err(Error::EmptyDocument);
    }

    let stats = FontStatistics::from_document(input);
    let mut warnings = Vec::new();
    if stats.is_empty() {
        warnings.push(Warning::new(
            0,
            WarningKind::StatisticsUnavailable,
            "no font size observations; all lines default to paragraphs",
        ));
    }
    log::debug!(
        "pass 1 complete: body size {}, {} heading sizes",
        stats.body_size(),
        stats.heading_sizes().len()
    );

    let results: Vec<PageAnalysis> = if options.parallel {
        input
            .pages
            .par_iter()
            .map(|page| analyze_page(page, &stats, options))
            .collect()
    } else {
        input
            .pages
            .iter()
            .map(|page| analyze_page(page, &stats, options))
            .collect()
    };

    let mut document = Document::new();
    for result in results {
        warnings.extend(result.warnings);
        document.pages.push(result.page);
    }

    Ok(AnalyzedDocument { document, warnings })
}

/// The outcome of analyzing a single page.
#[derive(Debug, Clone)]
pub struct PageAnalysis {
    /// The page's classified elements
    pub page: Page,
    /// Warnings recorded for this page
    pub warnings: Vec<Warning>,
}

/// Analyze a single page against prebuilt font statistics.
pub fn analyze_page(
    input: &PageInput,
    stats: &FontStatistics,
    options: &AnalyzeOptions,
) -> PageAnalysis {
    let mut warnings = Vec::new();

    let lines = LineAssembler::new(options).assemble(&input.words, input.number, &mut warnings);
    let (regions, hints) =
        GraphicsAnalyzer::new(options).analyze(&input.graphics, &lines, input.number, &mut warnings);
    let metrics = PageMetrics::from_lines(&lines, stats);

    let drafts = draft_elements(&lines, &regions, &hints, stats, &metrics, options);
    let elements = emit(drafts, &regions, options);

    let mut page = Page::new(input.number);
    page.elements = elements;
    PageAnalysis { page, warnings }
}

/// An element under construction, still carrying geometry.
#[derive(Debug)]
enum Draft {
    Heading {
        level: u8,
        content: Paragraph,
        bbox: BBox,
    },
    Para {
        content: Paragraph,
        bbox: BBox,
        font_size: f32,
    },
    List {
        depth: u8,
        ordinal: Option<u32>,
        content: Paragraph,
        bbox: BBox,
        font_size: f32,
    },
    Quote {
        depth: u8,
        content: Paragraph,
        bbox: BBox,
        font_size: f32,
    },
    TableSlot {
        region: usize,
        rows: Vec<Line>,
        y: f32,
    },
    Rule {
        y: f32,
    },
}

impl Draft {
    fn y(&self) -> f32 {
        match self {
            Draft::Heading { bbox, .. }
            | Draft::Para { bbox, .. }
            | Draft::List { bbox, .. }
            | Draft::Quote { bbox, .. } => bbox.y0,
            Draft::TableSlot { y, .. } | Draft::Rule { y } => *y,
        }
    }
}

/// Classify lines and fold them into drafts: soft-wrapped paragraphs
/// merge, list items swallow their continuation lines, table rows gather
/// under their region's slot, rule hints interleave by position.
fn draft_elements(
    lines: &[Line],
    regions: &[TableRegion],
    hints: &[RuleHint],
    stats: &FontStatistics,
    metrics: &PageMetrics,
    options: &AnalyzeOptions,
) -> Vec<Draft> {
    let mut drafts: Vec<Draft> = Vec::new();
    let mut slot_of_region: HashMap<usize, usize> = HashMap::new();

    for line in lines {
        let role = classify_line(line, regions, stats, metrics);
        match role {
            LineRole::TableRow { region } => match slot_of_region.get(&region).copied() {
                Some(slot) => {
                    if let Draft::TableSlot { rows, .. } = &mut drafts[slot] {
                        rows.push(line.clone());
                    }
                }
                None => {
                    slot_of_region.insert(region, drafts.len());
                    drafts.push(Draft::TableSlot {
                        region,
                        rows: vec![line.clone()],
                        y: line.bbox.y0,
                    });
                }
            },
            LineRole::Heading(level) => drafts.push(Draft::Heading {
                level,
                content: paragraph_from_text(&line.text, &line.font_name),
                bbox: line.bbox,
            }),
            LineRole::ListItem { ordinal, depth } => {
                let stripped = detect_marker(&line.text)
                    .map(|m| line.text[m.prefix_len..].trim_start().to_string())
                    .unwrap_or_else(|| line.text.clone());
                drafts.push(Draft::List {
                    depth,
                    ordinal,
                    content: paragraph_from_text(&stripped, &line.font_name),
                    bbox: line.bbox,
                    font_size: line.font_size,
                });
            }
            LineRole::BlockQuote { depth } => {
                if let Some(Draft::Quote {
                    depth: prev_depth,
                    content,
                    bbox,
                    font_size,
                }) = drafts.last_mut()
                {
                    let gap = line.bbox.y0 - bbox.y1;
                    if *prev_depth == depth && gap < line.font_size * options.paragraph_gap_factor {
                        content.extend_with(paragraph_from_text(&line.text, &line.font_name));
                        *bbox = bbox.union(&line.bbox);
                        *font_size = font_size.max(line.font_size);
                        continue;
                    }
                }
                drafts.push(Draft::Quote {
                    depth,
                    content: paragraph_from_text(&line.text, &line.font_name),
                    bbox: line.bbox,
                    font_size: line.font_size,
                });
            }
            LineRole::Paragraph => {
                match drafts.last_mut() {
                    // Soft-wrap continuation of the previous paragraph.
                    Some(Draft::Para {
                        content,
                        bbox,
                        font_size,
                    }) => {
                        let gap = line.bbox.y0 - bbox.y1;
                        if gap < line.font_size * options.paragraph_gap_factor {
                            content.extend_with(paragraph_from_text(&line.text, &line.font_name));
                            *bbox = bbox.union(&line.bbox);
                            *font_size = font_size.max(line.font_size);
                            continue;
                        }
                    }
                    // Wrapped continuation of a list item's text column.
                    Some(Draft::List {
                        content,
                        bbox,
                        font_size,
                        ..
                    }) => {
                        let gap = line.bbox.y0 - bbox.y1;
                        if gap < line.font_size * options.paragraph_gap_factor
                            && line.left() > bbox.x0 + 1.0
                        {
                            content.extend_with(paragraph_from_text(&line.text, &line.font_name));
                            *bbox = bbox.union(&line.bbox);
                            *font_size = font_size.max(line.font_size);
                            continue;
                        }
                    }
                    _ => {}
                }
                drafts.push(Draft::Para {
                    content: paragraph_from_text(&line.text, &line.font_name),
                    bbox: line.bbox,
                    font_size: line.font_size,
                });
            }
        }
    }

    // Interleave decorative rules by vertical position.
    for hint in hints {
        let pos = drafts
            .iter()
            .position(|d| d.y() > hint.y)
            .unwrap_or(drafts.len());
        drafts.insert(pos, Draft::Rule { y: hint.y });
    }

    drafts
}

/// Convert drafts into final elements, building each region's table at its
/// slot and absorbing qualifying trailing paragraphs into it.
fn emit(drafts: Vec<Draft>, regions: &[TableRegion], options: &AnalyzeOptions) -> Vec<Element> {
    let builder = TableBuilder::new(options);
    let mut elements = Vec::new();
    let mut iter = drafts.into_iter().peekable();

    while let Some(draft) = iter.next() {
        match draft {
            Draft::Heading { level, content, .. } => {
                elements.push(Element::heading(level, content));
            }
            Draft::Para { content, .. } => {
                elements.push(Element::Paragraph(content));
            }
            Draft::List {
                depth,
                ordinal,
                content,
                ..
            } => {
                elements.push(Element::ListItem {
                    depth,
                    ordinal,
                    content,
                });
            }
            Draft::Quote { depth, content, .. } => {
                elements.push(Element::BlockQuote { depth, content });
            }
            Draft::Rule { .. } => elements.push(Element::HorizontalRule),
            Draft::TableSlot { region, rows, .. } => {
                let region = &regions[region];
                let row_refs: Vec<&Line> = rows.iter().collect();
                let Some(mut built) = builder.build(region, &row_refs) else {
                    continue;
                };

                // Absorb trailing continuation paragraphs into the grid.
                while let Some(Draft::Para {
                    content,
                    bbox,
                    font_size,
                }) = iter.peek()
                {
                    let chars = content.plain_text().chars().count();
                    if absorption_check(region, built.bottom, bbox, chars, *font_size, options)
                        .is_err()
                    {
                        break;
                    }
                    let Some(Draft::Para { content, bbox, .. }) = iter.next() else {
                        unreachable!()
                    };
                    builder.absorb(&mut built, region, content, &bbox);
                }

                elements.push(Element::Table(built.table));
            }
        }
    }

    elements
}

/// Build a one-run paragraph with emphasis derived from the font name.
fn paragraph_from_text(text: &str, font_name: &str) -> Paragraph {
    let style = FontStyle::from_name(font_name);
    let mut paragraph = Paragraph::new();
    paragraph.add_run(TextRun::styled(
        text,
        crate::model::TextStyle {
            bold: style.bold,
            italic: style.italic,
        },
    ));
    paragraph
}
