//! Table reconstruction: building a rectangular grid from a region's
//! classified rows, absorbing trailing continuation paragraphs, and
//! classifying column alignment.

use crate::geom::BBox;
use crate::model::{Alignment, Paragraph, Table, TableCell, TableRow};
use crate::options::AnalyzeOptions;

use super::graphics::TableRegion;
use super::lines::Line;

/// Offset deviation below this counts as consistent alignment.
const ALIGNMENT_TOLERANCE: f32 = 3.0;

/// A cell's text must fill this much of its column to read as justified.
const JUSTIFY_FILL_RATIO: f32 = 0.9;

/// Why a trailing paragraph was not absorbed into a table.
///
/// Absorption is an ordered list of named predicates; the first failing
/// predicate is reported, which keeps the heuristic surface testable in
/// isolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsorptionRejection {
    /// The paragraph does not lie below the table's last known row.
    NotBelowTable,
    /// The paragraph does not horizontally overlap the table's column span.
    NoHorizontalOverlap,
    /// The paragraph text exceeds the configured length cap.
    TooLong,
    /// The vertical gap to the table exceeds the font-scaled threshold.
    GapTooLarge,
}

/// Evaluate the absorption predicates for a paragraph below a table.
///
/// `table_bottom` is the bottom edge of the table's last known content
/// (extended as paragraphs are absorbed). Returns `Ok(())` when every
/// predicate holds.
pub fn absorption_check(
    region: &TableRegion,
    table_bottom: f32,
    para_bbox: &BBox,
    para_chars: usize,
    font_size: f32,
    options: &AnalyzeOptions,
) -> Result<(), AbsorptionRejection> {
    // below_table
    if para_bbox.y0 < table_bottom - 1.0 {
        return Err(AbsorptionRejection::NotBelowTable);
    }
    // horizontal_overlap
    if para_bbox.horizontal_overlap(&region.bbox) <= 0.0 {
        return Err(AbsorptionRejection::NoHorizontalOverlap);
    }
    // length_cap
    if para_chars > options.absorption_length_cap {
        return Err(AbsorptionRejection::TooLong);
    }
    // vertical_gap
    let gap = para_bbox.y0 - table_bottom;
    if gap > font_size * options.absorption_gap_factor {
        return Err(AbsorptionRejection::GapTooLarge);
    }
    Ok(())
}

/// A reconstructed table plus the geometry needed for absorption.
#[derive(Debug, Clone)]
pub struct BuiltTable {
    /// The structural table
    pub table: Table,
    /// Bottom edge of the last known content (grows with absorption)
    pub bottom: f32,
}

/// Builds rectangular tables from classified row lines.
#[derive(Debug)]
pub struct TableBuilder<'a> {
    options: &'a AnalyzeOptions,
}

impl<'a> TableBuilder<'a> {
    /// Create a builder with the given options.
    pub fn new(options: &'a AnalyzeOptions) -> Self {
        Self { options }
    }

    /// Build a full rectangular grid from the region's row lines.
    ///
    /// Returns None when no rows were classified for the region; a region
    /// never emits a partially built table.
    pub fn build(&self, region: &TableRegion, rows: &[&Line]) -> Option<BuiltTable> {
        if rows.is_empty() || region.row_count() == 0 || region.column_count() == 0 {
            return None;
        }

        let n_rows = region.row_count();
        let n_cols = region.column_count();

        // Bucket every word by the grid interval containing its midpoint.
        let mut cells: Vec<Vec<CellDraft>> = vec![vec![CellDraft::default(); n_cols]; n_rows];
        for line in rows {
            for word in &line.words {
                let r = region.row_index(word.bbox.mid_y());
                let c = region.column_index(word.bbox.mid_x());
                cells[r][c].add(word.text.trim(), word.bbox);
            }
        }

        let alignments = self.classify_alignments(&cells, region);

        let mut table = Table::new();
        table.header_rows = if n_rows > 1 { 1 } else { 0 };
        table.column_alignments = alignments;
        for (r, row_cells) in cells.into_iter().enumerate() {
            let built: Vec<TableCell> = row_cells
                .into_iter()
                .map(|draft| draft.into_cell())
                .collect();
            let row = if r == 0 && table.header_rows > 0 {
                TableRow::header(built)
            } else {
                TableRow::new(built)
            };
            table.add_row(row);
        }

        log::debug!(
            "built {}x{} table from {} row lines",
            table.row_count(),
            table.column_count(),
            rows.len()
        );

        Some(BuiltTable {
            table,
            bottom: region.bbox.y1,
        })
    }

    /// Absorb a trailing paragraph into the nearest overlapping cell of the
    /// table's last row. The caller has already validated the predicates.
    pub fn absorb(
        &self,
        built: &mut BuiltTable,
        region: &TableRegion,
        text: Paragraph,
        bbox: &BBox,
    ) {
        let col = self.nearest_column(region, bbox);
        if let Some(last_row) = built.table.rows.last_mut() {
            if let Some(cell) = last_row.cells.get_mut(col) {
                cell.push_line(text);
            }
        }
        built.bottom = built.bottom.max(bbox.y1);
    }

    /// Column whose interval overlaps the paragraph the most.
    fn nearest_column(&self, region: &TableRegion, bbox: &BBox) -> usize {
        let mut best = 0;
        let mut best_overlap = f32::MIN;
        for c in 0..region.column_count() {
            let col_box = BBox::new(
                region.column_boundaries[c],
                region.bbox.y0,
                region.column_boundaries[c + 1],
                region.bbox.y1,
            );
            let overlap = bbox.horizontal_overlap(&col_box);
            if overlap > best_overlap {
                best_overlap = overlap;
                best = c;
            }
        }
        best
    }

    /// Classify per-column alignment from the variance of cell-content
    /// offsets relative to the column boundaries.
    fn classify_alignments(
        &self,
        cells: &[Vec<CellDraft>],
        region: &TableRegion,
    ) -> Vec<Alignment> {
        let n_cols = region.column_count();
        let mut alignments = Vec::with_capacity(n_cols);

        for c in 0..n_cols {
            let col_x0 = region.column_boundaries[c];
            let col_x1 = region.column_boundaries[c + 1];
            let col_mid = (col_x0 + col_x1) / 2.0;
            let col_width = col_x1 - col_x0;

            let extents: Vec<&BBox> = cells
                .iter()
                .filter_map(|row| row[c].bbox.as_ref())
                .collect();
            if extents.len() < 2 {
                alignments.push(Alignment::Left);
                continue;
            }

            let fill = mean(extents.iter().map(|b| b.width() / col_width));
            if fill >= JUSTIFY_FILL_RATIO {
                alignments.push(Alignment::Justify);
                continue;
            }

            let left_dev = max_deviation(extents.iter().map(|b| b.x0 - col_x0));
            let right_dev = max_deviation(extents.iter().map(|b| col_x1 - b.x1));
            let center_dev = max_deviation(extents.iter().map(|b| b.mid_x() - col_mid));

            let alignment = if left_dev <= ALIGNMENT_TOLERANCE {
                Alignment::Left
            } else if right_dev <= ALIGNMENT_TOLERANCE {
                Alignment::Right
            } else if center_dev <= ALIGNMENT_TOLERANCE {
                Alignment::Center
            } else {
                Alignment::Left
            };
            alignments.push(alignment);
        }

        alignments
    }
}

/// Accumulated content of one grid cell.
#[derive(Debug, Clone, Default)]
struct CellDraft {
    fragments: Vec<(String, BBox)>,
    bbox: Option<BBox>,
}

impl CellDraft {
    fn add(&mut self, text: &str, bbox: BBox) {
        if text.is_empty() {
            return;
        }
        self.fragments.push((text.to_string(), bbox));
        self.bbox = Some(match self.bbox {
            Some(b) => b.union(&bbox),
            None => bbox,
        });
    }

    fn into_cell(mut self) -> TableCell {
        if self.fragments.is_empty() {
            return TableCell::empty();
        }
        // Reading order inside the cell: top to bottom, left to right.
        self.fragments.sort_by(|a, b| {
            a.1.y0
                .partial_cmp(&b.1.y0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.1.x0.partial_cmp(&b.1.x0).unwrap_or(std::cmp::Ordering::Equal))
        });
        let text = self
            .fragments
            .iter()
            .map(|(t, _)| t.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        TableCell::text(text)
    }
}

fn mean(values: impl Iterator<Item = f32>) -> f32 {
    let collected: Vec<f32> = values.collect();
    if collected.is_empty() {
        return 0.0;
    }
    collected.iter().sum::<f32>() / collected.len() as f32
}

fn max_deviation(values: impl Iterator<Item = f32>) -> f32 {
    let collected: Vec<f32> = values.collect();
    if collected.len() < 2 {
        return f32::MAX;
    }
    let avg = collected.iter().sum::<f32>() / collected.len() as f32;
    collected
        .iter()
        .map(|v| (v - avg).abs())
        .fold(0.0, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Word;

    fn region_2x4() -> TableRegion {
        TableRegion {
            bbox: BBox::new(10.0, 100.0, 410.0, 160.0),
            row_boundaries: vec![100.0, 130.0, 160.0],
            column_boundaries: vec![10.0, 110.0, 210.0, 310.0, 410.0],
        }
    }

    fn make_row_line(words: &[(&str, f32)], y0: f32) -> Line {
        let options = AnalyzeOptions::default();
        let words: Vec<Word> = words
            .iter()
            .map(|(text, x0)| {
                Word::new(
                    *text,
                    BBox::new(*x0, y0, x0 + text.len() as f32 * 6.0, y0 + 12.0),
                    "Helvetica",
                    12.0,
                )
            })
            .collect();
        let mut warnings = Vec::new();
        super::super::lines::LineAssembler::new(&options)
            .assemble(&words, 1, &mut warnings)
            .pop()
            .unwrap()
    }

    #[test]
    fn test_grid_completeness_with_empty_row() {
        // Words only in the first row; second row must still exist, empty.
        let region = region_2x4();
        let line = make_row_line(
            &[("Revenue", 20.0), ("Q1", 120.0), ("Q2", 220.0), ("Q3", 320.0)],
            105.0,
        );
        let options = AnalyzeOptions::default();
        let builder = TableBuilder::new(&options);
        let built = builder.build(&region, &[&line]).unwrap();

        assert_eq!(built.table.row_count(), 2);
        assert_eq!(built.table.column_count(), 4);
        assert!(built.table.is_rectangular());
        assert_eq!(built.table.rows[0].cells[0].plain_text(), "Revenue");
        assert_eq!(built.table.rows[0].cells[3].plain_text(), "Q3");
        for cell in &built.table.rows[1].cells {
            assert!(cell.is_empty());
        }
    }

    #[test]
    fn test_no_rows_no_table() {
        let options = AnalyzeOptions::default();
        let builder = TableBuilder::new(&options);
        assert!(builder.build(&region_2x4(), &[]).is_none());
    }

    #[test]
    fn test_absorption_predicates_in_order() {
        let region = region_2x4();
        let options = AnalyzeOptions::default();
        let bottom = 160.0;

        // 1.2x font size below, overlapping, short: absorbed
        let close = BBox::new(20.0, 174.4, 120.0, 186.4);
        assert!(absorption_check(&region, bottom, &close, 10, 12.0, &options).is_ok());

        // 3x font size below: rejected by the gap predicate
        let far = BBox::new(20.0, 196.0, 120.0, 208.0);
        assert_eq!(
            absorption_check(&region, bottom, &far, 10, 12.0, &options),
            Err(AbsorptionRejection::GapTooLarge)
        );

        // Above the table bottom
        let above = BBox::new(20.0, 100.0, 120.0, 112.0);
        assert_eq!(
            absorption_check(&region, bottom, &above, 10, 12.0, &options),
            Err(AbsorptionRejection::NotBelowTable)
        );

        // No horizontal overlap with the column span
        let beside = BBox::new(500.0, 174.4, 600.0, 186.4);
        assert_eq!(
            absorption_check(&region, bottom, &beside, 10, 12.0, &options),
            Err(AbsorptionRejection::NoHorizontalOverlap)
        );

        // Over the length cap
        assert_eq!(
            absorption_check(&region, bottom, &close, 51, 12.0, &options),
            Err(AbsorptionRejection::TooLong)
        );
    }

    #[test]
    fn test_absorb_into_nearest_cell() {
        let region = region_2x4();
        let options = AnalyzeOptions::default();
        let builder = TableBuilder::new(&options);
        let line = make_row_line(
            &[("a", 20.0), ("b", 120.0), ("c", 220.0), ("d", 320.0)],
            135.0,
        );
        let mut built = builder.build(&region, &[&line]).unwrap();

        // Continuation under the second column
        let bbox = BBox::new(115.0, 170.0, 190.0, 182.0);
        builder.absorb(&mut built, &region, Paragraph::with_text("cont"), &bbox);

        let cell = &built.table.rows.last().unwrap().cells[1];
        assert_eq!(cell.plain_text(), "b\ncont");
        assert_eq!(built.bottom, 182.0);
    }

    #[test]
    fn test_column_alignment_classification() {
        let region = TableRegion {
            bbox: BBox::new(0.0, 0.0, 300.0, 90.0),
            row_boundaries: vec![0.0, 30.0, 60.0, 90.0],
            column_boundaries: vec![0.0, 100.0, 200.0, 300.0],
        };
        let options = AnalyzeOptions::default();
        let builder = TableBuilder::new(&options);

        // Column 0 left-aligned, column 1 right-aligned, column 2 centered.
        let rows: Vec<Line> = vec![
            make_row_line(&[("aa", 5.0), ("bbb", 177.0), ("cc", 243.0)], 5.0),
            make_row_line(&[("aaaa", 5.0), ("b", 189.0), ("cccc", 237.0)], 35.0),
            make_row_line(&[("aaa", 5.0), ("bb", 183.0), ("cc", 243.0)], 65.0),
        ];
        let row_refs: Vec<&Line> = rows.iter().collect();
        let built = builder.build(&region, &row_refs).unwrap();

        assert_eq!(built.table.column_alignments[0], Alignment::Left);
        assert_eq!(built.table.column_alignments[1], Alignment::Right);
        assert_eq!(built.table.column_alignments[2], Alignment::Center);
    }
}
