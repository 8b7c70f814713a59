//! Line assembly: grouping words into visual lines.
//!
//! Two words share a line when the vertical overlap of their bounding
//! boxes exceeds a tolerance proportional to the smaller word's font size.
//! Within a line, words are ordered left-to-right and joined by
//! horizontal-gap rules; gaps wide enough to signal a column break are
//! recorded on the line instead of being merged away.

use std::collections::HashMap;

use crate::error::{Warning, WarningKind};
use crate::geom::BBox;
use crate::input::Word;
use crate::options::AnalyzeOptions;

/// A gap inside a line wide enough to be a probable column break.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnGap {
    /// Right edge of the word before the gap
    pub x_start: f32,
    /// Left edge of the word after the gap
    pub x_end: f32,
}

impl ColumnGap {
    /// Horizontal center of the gap.
    pub fn mid_x(&self) -> f32 {
        (self.x_start + self.x_end) / 2.0
    }
}

/// An assembled visual line.
///
/// Owns its words; every input word lands in exactly one line. Lines are
/// never mutated after creation.
#[derive(Debug, Clone)]
pub struct Line {
    /// Constituent words, ordered left to right
    pub words: Vec<Word>,
    /// Union of word boxes
    pub bbox: BBox,
    /// Joined line text
    pub text: String,
    /// Dominant font size (char-weighted mode over words)
    pub font_size: f32,
    /// Dominant font name (char-weighted mode over words)
    pub font_name: String,
    /// Column-break gaps, left to right
    pub gaps: Vec<ColumnGap>,
}

impl Line {
    fn from_words(mut words: Vec<Word>, options: &AnalyzeOptions) -> Self {
        words.sort_by(|a, b| {
            a.bbox
                .x0
                .partial_cmp(&b.bbox.x0)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let bbox = words
            .iter()
            .skip(1)
            .fold(words[0].bbox, |acc, w| acc.union(&w.bbox));

        // Dominant size and name: the bucket carrying the most characters.
        let mut size_weight: HashMap<i32, usize> = HashMap::new();
        let mut name_weight: HashMap<&str, usize> = HashMap::new();
        for word in &words {
            let chars = word.text.chars().count().max(1);
            *size_weight
                .entry((word.font_size * 10.0).round() as i32)
                .or_insert(0) += chars;
            *name_weight.entry(word.font_name.as_str()).or_insert(0) += chars;
        }
        let font_size = size_weight
            .iter()
            .max_by_key(|(_, w)| **w)
            .map(|(k, _)| *k as f32 / 10.0)
            .unwrap_or(12.0);
        let font_name = name_weight
            .iter()
            .max_by_key(|(_, w)| **w)
            .map(|(name, _)| (*name).to_string())
            .unwrap_or_default();

        let mut text = String::new();
        let mut gaps = Vec::new();
        for (i, word) in words.iter().enumerate() {
            if i == 0 {
                text.push_str(&word.text);
                continue;
            }
            let prev = &words[i - 1];
            let gap = word.bbox.x0 - prev.bbox.x1;
            let ref_size = prev.font_size.min(word.font_size);

            if gap >= ref_size * options.column_break_factor {
                gaps.push(ColumnGap {
                    x_start: prev.bbox.x1,
                    x_end: word.bbox.x0,
                });
                text.push(' ');
            } else if gap >= ref_size * options.word_join_factor {
                text.push(' ');
            }
            text.push_str(&word.text);
        }

        Self {
            words,
            bbox,
            text,
            font_size,
            font_name,
            gaps,
        }
    }

    /// Left edge of the line.
    pub fn left(&self) -> f32 {
        self.bbox.x0
    }

    /// Width of the line.
    pub fn width(&self) -> f32 {
        self.bbox.width()
    }
}

/// Groups a page's words into ordered visual lines.
#[derive(Debug)]
pub struct LineAssembler<'a> {
    options: &'a AnalyzeOptions,
}

impl<'a> LineAssembler<'a> {
    /// Create an assembler with the given options.
    pub fn new(options: &'a AnalyzeOptions) -> Self {
        Self { options }
    }

    /// Assemble words into lines, top to bottom.
    ///
    /// Malformed words (non-finite or inverted bbox, non-positive size) are
    /// skipped with a warning; processing continues.
    pub fn assemble(
        &self,
        words: &[Word],
        page: u32,
        warnings: &mut Vec<Warning>,
    ) -> Vec<Line> {
        let mut valid: Vec<Word> = Vec::with_capacity(words.len());
        for word in words {
            if word.is_well_formed() {
                valid.push(word.clone());
            } else {
                warnings.push(Warning::new(
                    page,
                    WarningKind::MalformedInput,
                    format!("skipped word with invalid geometry: {:?}", word.text),
                ));
            }
        }

        if valid.is_empty() {
            return vec![];
        }

        valid.sort_by(|a, b| {
            a.bbox
                .y0
                .partial_cmp(&b.bbox.y0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(
                    a.bbox
                        .x0
                        .partial_cmp(&b.bbox.x0)
                        .unwrap_or(std::cmp::Ordering::Equal),
                )
        });

        let mut lines: Vec<Line> = Vec::new();
        let mut words = valid.into_iter();
        let Some(first) = words.next() else {
            return lines;
        };
        let mut current_band = first.bbox;
        let mut current_min_size = first.font_size;
        let mut current: Vec<Word> = vec![first];

        for word in words {
            let smaller = word.font_size.min(current_min_size);
            let tolerance = smaller * self.options.line_tolerance_factor;
            if word.bbox.vertical_overlap(&current_band) > tolerance {
                current_band = current_band.union(&word.bbox);
                current_min_size = current_min_size.min(word.font_size);
                current.push(word);
            } else {
                lines.push(Line::from_words(std::mem::take(&mut current), self.options));
                current_band = word.bbox;
                current_min_size = word.font_size;
                current.push(word);
            }
        }
        if !current.is_empty() {
            lines.push(Line::from_words(current, self.options));
        }

        lines.sort_by(|a, b| {
            a.bbox
                .y0
                .partial_cmp(&b.bbox.y0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(
                    a.bbox
                        .x0
                        .partial_cmp(&b.bbox.x0)
                        .unwrap_or(std::cmp::Ordering::Equal),
                )
        });

        log::debug!("page {page}: assembled {} lines", lines.len());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_word(text: &str, x0: f32, y0: f32) -> Word {
        // 12pt words, 6 units per character wide, 12 units tall
        Word::new(
            text,
            BBox::new(x0, y0, x0 + text.len() as f32 * 6.0, y0 + 12.0),
            "Helvetica",
            12.0,
        )
    }

    fn assemble(words: &[Word]) -> (Vec<Line>, Vec<Warning>) {
        let options = AnalyzeOptions::default();
        let mut warnings = Vec::new();
        let lines = LineAssembler::new(&options).assemble(words, 1, &mut warnings);
        (lines, warnings)
    }

    #[test]
    fn test_words_on_same_band_share_line() {
        let words = vec![
            make_word("hello", 10.0, 100.0),
            make_word("world", 42.0, 101.0),
        ];
        let (lines, warnings) = assemble(&words);
        assert!(warnings.is_empty());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "hello world");
    }

    #[test]
    fn test_distinct_bands_split_lines() {
        let words = vec![
            make_word("first", 10.0, 100.0),
            make_word("second", 10.0, 120.0),
        ];
        let (lines, _) = assemble(&words);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "first");
        assert_eq!(lines[1].text, "second");
    }

    #[test]
    fn test_tight_gap_joins_without_space() {
        // "he" ends at 22.0; next word starts 1 unit later (< 12 * 0.15)
        let words = vec![make_word("he", 10.0, 100.0), make_word("llo", 23.0, 100.0)];
        let (lines, _) = assemble(&words);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "hello");
    }

    #[test]
    fn test_wide_gap_records_column_break() {
        // Gap of 40 units >= 12 * 2.0
        let words = vec![
            make_word("cell", 10.0, 100.0),
            make_word("next", 74.0, 100.0),
        ];
        let (lines, _) = assemble(&words);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].gaps.len(), 1);
        assert_eq!(lines[0].gaps[0].x_start, 34.0);
        assert_eq!(lines[0].gaps[0].x_end, 74.0);
        // Still joined with a space in the plain text
        assert_eq!(lines[0].text, "cell next");
    }

    #[test]
    fn test_malformed_word_skipped_with_warning() {
        let mut bad = make_word("bad", 10.0, 100.0);
        bad.bbox = BBox::new(50.0, 100.0, 10.0, 112.0); // inverted
        let words = vec![make_word("good", 10.0, 100.0), bad];
        let (lines, warnings) = assemble(&words);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "good");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::MalformedInput);
    }

    #[test]
    fn test_every_word_in_exactly_one_line() {
        let words = vec![
            make_word("a", 10.0, 100.0),
            make_word("b", 30.0, 100.0),
            make_word("c", 10.0, 130.0),
            make_word("d", 50.0, 130.0),
            make_word("e", 10.0, 160.0),
        ];
        let (lines, _) = assemble(&words);
        let total: usize = lines.iter().map(|l| l.words.len()).sum();
        assert_eq!(total, words.len());
    }

    #[test]
    fn test_dominant_font_is_char_weighted_mode() {
        let mut big = make_word("x", 10.0, 100.0);
        big.font_size = 20.0;
        big.bbox = BBox::new(10.0, 98.0, 16.0, 112.0);
        let words = vec![big, make_word("longer run of text", 30.0, 100.0)];
        let (lines, _) = assemble(&words);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].font_size, 12.0);
    }
}
