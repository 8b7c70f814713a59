//! Graphics analysis: clustering vector primitives into table regions.
//!
//! Horizontal segments become row boundaries, vertical segments become
//! column boundaries. A cluster is promoted to a table region only with at
//! least two boundaries on each axis and at least one enclosed line;
//! everything else is decorative and at most survives as a rule hint.

use crate::error::{Warning, WarningKind};
use crate::geom::BBox;
use crate::input::{GraphicsPrimitive, PrimitiveKind};
use crate::options::AnalyzeOptions;

use super::lines::{ColumnGap, Line};

/// Boundary positions closer than this merge into one boundary.
const BOUNDARY_MERGE_TOLERANCE: f32 = 2.0;

/// Cells narrower than this indicate an unresolvable grid.
const MIN_CELL_EXTENT: f32 = 2.0;

/// Segments shorter than this fraction of the cluster extent do not
/// contribute boundaries (partial rules, cell decorations).
const MIN_SPAN_RATIO: f32 = 0.5;

/// A candidate table area with inferred grid boundaries.
#[derive(Debug, Clone)]
pub struct TableRegion {
    /// Region extent
    pub bbox: BBox,
    /// Row boundary y-positions, strictly increasing
    pub row_boundaries: Vec<f32>,
    /// Column boundary x-positions, strictly increasing
    pub column_boundaries: Vec<f32>,
}

impl TableRegion {
    /// Number of grid rows (boundary intervals).
    pub fn row_count(&self) -> usize {
        self.row_boundaries.len().saturating_sub(1)
    }

    /// Number of grid columns (boundary intervals).
    pub fn column_count(&self) -> usize {
        self.column_boundaries.len().saturating_sub(1)
    }

    /// Index of the row interval containing y, clamped to the grid.
    pub fn row_index(&self, y: f32) -> usize {
        interval_index(&self.row_boundaries, y)
    }

    /// Index of the column interval containing x, clamped to the grid.
    pub fn column_index(&self, x: f32) -> usize {
        interval_index(&self.column_boundaries, x)
    }

    /// Check whether a line's center falls inside the region.
    pub fn contains_line(&self, line: &Line) -> bool {
        self.bbox
            .contains_point(line.bbox.mid_x(), line.bbox.mid_y())
    }

    /// Check whether a column-break gap straddles one of the region's
    /// interior column boundaries.
    pub fn gap_aligned(&self, gap: &ColumnGap) -> bool {
        let interior = &self.column_boundaries[1..self.column_boundaries.len().saturating_sub(1)];
        interior.iter().any(|&b| {
            b >= gap.x_start - BOUNDARY_MERGE_TOLERANCE && b <= gap.x_end + BOUNDARY_MERGE_TOLERANCE
        })
    }
}

/// A decorative graphics cluster retained as a divider hint.
#[derive(Debug, Clone)]
pub struct RuleHint {
    /// Vertical position of the rule
    pub y: f32,
    /// Extent of the rule
    pub bbox: BBox,
}

/// One directed segment extracted from a primitive.
#[derive(Debug, Clone, Copy)]
struct Segment {
    horizontal: bool,
    bbox: BBox,
}

/// Clusters graphics primitives into table regions and rule hints.
#[derive(Debug)]
pub struct GraphicsAnalyzer<'a> {
    options: &'a AnalyzeOptions,
}

impl<'a> GraphicsAnalyzer<'a> {
    /// Create an analyzer with the given options.
    pub fn new(options: &'a AnalyzeOptions) -> Self {
        Self { options }
    }

    /// Analyze a page's primitives against its assembled lines.
    ///
    /// Returns valid table regions plus rule hints for decorative
    /// horizontal separators. Unresolvable grids are demoted with an
    /// AmbiguousTable warning.
    pub fn analyze(
        &self,
        primitives: &[GraphicsPrimitive],
        lines: &[Line],
        page: u32,
        warnings: &mut Vec<Warning>,
    ) -> (Vec<TableRegion>, Vec<RuleHint>) {
        let segments = decompose(primitives);
        if segments.is_empty() {
            return (vec![], vec![]);
        }

        let clusters = cluster(&segments, self.options.cluster_distance);
        log::debug!(
            "page {page}: {} segments in {} clusters",
            segments.len(),
            clusters.len()
        );

        let mut regions = Vec::new();
        let mut hints = Vec::new();

        for cluster_segments in clusters {
            match self.resolve_cluster(&cluster_segments, lines, page, warnings) {
                ClusterOutcome::Region(region) => regions.push(region),
                ClusterOutcome::Rules(mut r) => hints.append(&mut r),
                ClusterOutcome::Discarded => {}
            }
        }

        log::debug!(
            "page {page}: {} table regions, {} rule hints",
            regions.len(),
            hints.len()
        );
        (regions, hints)
    }

    fn resolve_cluster(
        &self,
        segments: &[Segment],
        lines: &[Line],
        page: u32,
        warnings: &mut Vec<Warning>,
    ) -> ClusterOutcome {
        let bbox = segments
            .iter()
            .skip(1)
            .fold(segments[0].bbox, |acc, s| acc.union(&s.bbox));

        let horizontals: Vec<&Segment> = segments.iter().filter(|s| s.horizontal).collect();
        let verticals: Vec<&Segment> = segments.iter().filter(|s| !s.horizontal).collect();

        let row_boundaries = boundary_positions(
            horizontals.iter().map(|s| (s.bbox.mid_y(), s.bbox.width())),
            bbox.width(),
        );
        let column_boundaries = boundary_positions(
            verticals.iter().map(|s| (s.bbox.mid_x(), s.bbox.height())),
            bbox.height(),
        );

        if row_boundaries.len() >= 2 && column_boundaries.len() >= 2 {
            if !grid_resolvable(&row_boundaries) || !grid_resolvable(&column_boundaries) {
                warnings.push(Warning::new(
                    page,
                    WarningKind::AmbiguousTable,
                    "grid boundaries cannot be resolved; region demoted to paragraphs",
                ));
                return ClusterOutcome::Discarded;
            }

            let region = TableRegion {
                bbox,
                row_boundaries,
                column_boundaries,
            };
            if lines.iter().any(|l| region.contains_line(l)) {
                return ClusterOutcome::Region(region);
            }
            // No enclosed text: decorative frame, not a table.
            return ClusterOutcome::Discarded;
        }

        // Not a grid; horizontal rules survive as divider hints.
        if verticals.is_empty() && !horizontals.is_empty() {
            let hints = boundary_positions(
                horizontals.iter().map(|s| (s.bbox.mid_y(), s.bbox.width())),
                bbox.width(),
            )
            .into_iter()
            .map(|y| RuleHint { y, bbox })
            .collect();
            return ClusterOutcome::Rules(hints);
        }

        ClusterOutcome::Discarded
    }
}

enum ClusterOutcome {
    Region(TableRegion),
    Rules(Vec<RuleHint>),
    Discarded,
}

/// Break primitives into axis-aligned segments; rectangles contribute
/// their four edges.
fn decompose(primitives: &[GraphicsPrimitive]) -> Vec<Segment> {
    let mut segments = Vec::new();
    for p in primitives {
        if !p.bbox.is_valid() {
            continue;
        }
        match p.kind {
            PrimitiveKind::HorizontalSegment => segments.push(Segment {
                horizontal: true,
                bbox: p.bbox,
            }),
            PrimitiveKind::VerticalSegment => segments.push(Segment {
                horizontal: false,
                bbox: p.bbox,
            }),
            PrimitiveKind::Rectangle => {
                let b = p.bbox;
                segments.push(Segment {
                    horizontal: true,
                    bbox: BBox::new(b.x0, b.y0, b.x1, b.y0),
                });
                segments.push(Segment {
                    horizontal: true,
                    bbox: BBox::new(b.x0, b.y1, b.x1, b.y1),
                });
                segments.push(Segment {
                    horizontal: false,
                    bbox: BBox::new(b.x0, b.y0, b.x0, b.y1),
                });
                segments.push(Segment {
                    horizontal: false,
                    bbox: BBox::new(b.x1, b.y0, b.x1, b.y1),
                });
            }
        }
    }
    segments
}

/// Group segments whose boxes lie within `distance` of each other.
fn cluster(segments: &[Segment], distance: f32) -> Vec<Vec<Segment>> {
    let n = segments.len();
    let mut parent: Vec<usize> = (0..n).collect();

    fn find(parent: &mut Vec<usize>, i: usize) -> usize {
        if parent[i] != i {
            let root = find(parent, parent[i]);
            parent[i] = root;
        }
        parent[i]
    }

    for i in 0..n {
        for j in (i + 1)..n {
            if segments[i].bbox.gap_to(&segments[j].bbox) <= distance {
                let ri = find(&mut parent, i);
                let rj = find(&mut parent, j);
                if ri != rj {
                    parent[ri] = rj;
                }
            }
        }
    }

    let mut groups: std::collections::HashMap<usize, Vec<Segment>> =
        std::collections::HashMap::new();
    for i in 0..n {
        let root = find(&mut parent, i);
        groups.entry(root).or_default().push(segments[i]);
    }
    groups.into_values().collect()
}

/// Merge segment positions into boundary positions.
///
/// Positions within the merge tolerance collapse into their average;
/// segments spanning less than half the cluster extent are ignored.
fn boundary_positions(
    positions: impl Iterator<Item = (f32, f32)>,
    cluster_extent: f32,
) -> Vec<f32> {
    let min_span = cluster_extent * MIN_SPAN_RATIO;
    let mut kept: Vec<f32> = positions
        .filter(|(_, span)| *span >= min_span || cluster_extent == 0.0)
        .map(|(pos, _)| pos)
        .collect();
    kept.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut boundaries: Vec<f32> = Vec::new();
    let mut group: Vec<f32> = Vec::new();
    for pos in kept {
        match group.last() {
            Some(&last) if pos - last <= BOUNDARY_MERGE_TOLERANCE => group.push(pos),
            _ => {
                if !group.is_empty() {
                    boundaries.push(group.iter().sum::<f32>() / group.len() as f32);
                    group.clear();
                }
                group.push(pos);
            }
        }
    }
    if !group.is_empty() {
        boundaries.push(group.iter().sum::<f32>() / group.len() as f32);
    }
    boundaries
}

/// Boundaries must be strictly increasing with usable cell extents.
fn grid_resolvable(boundaries: &[f32]) -> bool {
    boundaries
        .windows(2)
        .all(|w| w[1] - w[0] >= MIN_CELL_EXTENT && w[0].is_finite() && w[1].is_finite())
}

/// Clamped interval lookup: index of the boundary interval containing v.
fn interval_index(boundaries: &[f32], v: f32) -> usize {
    if boundaries.len() < 2 {
        return 0;
    }
    let last = boundaries.len() - 2;
    for (i, w) in boundaries.windows(2).enumerate() {
        if v < w[1] {
            return i.min(last);
        }
    }
    last
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Word;

    fn make_line(text: &str, x0: f32, y0: f32) -> Line {
        let options = AnalyzeOptions::default();
        let word = Word::new(
            text,
            BBox::new(x0, y0, x0 + text.len() as f32 * 6.0, y0 + 12.0),
            "Helvetica",
            12.0,
        );
        let assembler = super::super::lines::LineAssembler::new(&options);
        let mut warnings = Vec::new();
        assembler
            .assemble(&[word], 1, &mut warnings)
            .pop()
            .unwrap()
    }

    fn grid_primitives() -> Vec<GraphicsPrimitive> {
        // 2 rows x 2 columns: 3 horizontal, 3 vertical boundaries
        let mut p = vec![];
        for y in [100.0, 130.0, 160.0] {
            p.push(GraphicsPrimitive::horizontal(10.0, 210.0, y));
        }
        for x in [10.0, 110.0, 210.0] {
            p.push(GraphicsPrimitive::vertical(x, 100.0, 160.0));
        }
        p
    }

    fn analyze(
        primitives: &[GraphicsPrimitive],
        lines: &[Line],
    ) -> (Vec<TableRegion>, Vec<RuleHint>, Vec<Warning>) {
        let options = AnalyzeOptions::default();
        let mut warnings = Vec::new();
        let (regions, hints) =
            GraphicsAnalyzer::new(&options).analyze(primitives, lines, 1, &mut warnings);
        (regions, hints, warnings)
    }

    #[test]
    fn test_grid_promoted_with_enclosed_text() {
        let lines = vec![make_line("cell", 20.0, 105.0)];
        let (regions, _, warnings) = analyze(&grid_primitives(), &lines);
        assert!(warnings.is_empty());
        assert_eq!(regions.len(), 1);
        let region = &regions[0];
        assert_eq!(region.row_count(), 2);
        assert_eq!(region.column_count(), 2);
    }

    #[test]
    fn test_grid_without_text_discarded() {
        let (regions, hints, _) = analyze(&grid_primitives(), &[]);
        assert!(regions.is_empty());
        assert!(hints.is_empty());
    }

    #[test]
    fn test_single_rule_becomes_hint() {
        let primitives = vec![GraphicsPrimitive::horizontal(10.0, 400.0, 250.0)];
        let (regions, hints, _) = analyze(&primitives, &[]);
        assert!(regions.is_empty());
        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].y, 250.0);
    }

    #[test]
    fn test_one_row_three_columns_rejected() {
        // 1 row boundary and 3 column boundaries never produce a table
        let primitives = vec![
            GraphicsPrimitive::horizontal(10.0, 210.0, 100.0),
            GraphicsPrimitive::vertical(10.0, 100.0, 160.0),
            GraphicsPrimitive::vertical(110.0, 100.0, 160.0),
            GraphicsPrimitive::vertical(210.0, 100.0, 160.0),
        ];
        let lines = vec![make_line("text", 20.0, 105.0)];
        let (regions, _, _) = analyze(&primitives, &lines);
        assert!(regions.is_empty());
    }

    #[test]
    fn test_rectangle_decomposes_to_grid() {
        // Four stacked rectangles in a 2x2 arrangement form a grid
        let mut primitives = vec![];
        for (x0, y0) in [(10.0, 100.0), (110.0, 100.0), (10.0, 130.0), (110.0, 130.0)] {
            primitives.push(GraphicsPrimitive::rectangle(BBox::new(
                x0,
                y0,
                x0 + 100.0,
                y0 + 30.0,
            )));
        }
        let lines = vec![make_line("cell", 20.0, 105.0)];
        let (regions, _, _) = analyze(&primitives, &lines);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].row_count(), 2);
        assert_eq!(regions[0].column_count(), 2);
    }

    #[test]
    fn test_distant_clusters_stay_separate() {
        let mut primitives = grid_primitives();
        // A second grid far below
        for y in [400.0, 430.0, 460.0] {
            primitives.push(GraphicsPrimitive::horizontal(10.0, 210.0, y));
        }
        for x in [10.0, 110.0, 210.0] {
            primitives.push(GraphicsPrimitive::vertical(x, 400.0, 460.0));
        }
        let lines = vec![make_line("a", 20.0, 105.0), make_line("b", 20.0, 405.0)];
        let (regions, _, _) = analyze(&primitives, &lines);
        assert_eq!(regions.len(), 2);
    }

    #[test]
    fn test_interval_index() {
        let boundaries = vec![0.0, 10.0, 20.0, 30.0];
        assert_eq!(interval_index(&boundaries, 5.0), 0);
        assert_eq!(interval_index(&boundaries, 15.0), 1);
        assert_eq!(interval_index(&boundaries, 25.0), 2);
        assert_eq!(interval_index(&boundaries, -5.0), 0); // clamped
        assert_eq!(interval_index(&boundaries, 35.0), 2); // clamped
    }

    #[test]
    fn test_gap_alignment() {
        let region = TableRegion {
            bbox: BBox::new(10.0, 100.0, 210.0, 160.0),
            row_boundaries: vec![100.0, 130.0, 160.0],
            column_boundaries: vec![10.0, 110.0, 210.0],
        };
        let aligned = ColumnGap {
            x_start: 90.0,
            x_end: 120.0,
        };
        assert!(region.gap_aligned(&aligned));

        let unaligned = ColumnGap {
            x_start: 30.0,
            x_end: 60.0,
        };
        assert!(!region.gap_aligned(&unaligned));
    }
}
