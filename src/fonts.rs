//! Corpus-wide font statistics for heading and emphasis detection.
//!
//! Built once over the whole document (pass 1) and passed by shared
//! reference into per-page classification (pass 2). Immutable after
//! construction; pages never mutate it.

use std::collections::HashMap;

use crate::input::{DocumentInput, Word};

/// Size histogram bucket width: 0.1 page units.
const BUCKET_SCALE: f32 = 10.0;

/// Font statistics over a document's words.
///
/// The most frequent size, weighted by character count, is body text.
/// Sizes strictly larger than body, ordered descending, map to heading
/// levels 1..6 (levels beyond 6 collapse to 6). A document with a single
/// size classifies everything as body; no heading is ever inferred from
/// fewer than two distinct size clusters.
#[derive(Debug, Clone)]
pub struct FontStatistics {
    /// Body text font size (char-weighted mode)
    body_size: f32,
    /// Distinct sizes larger than body, descending
    heading_sizes: Vec<f32>,
    /// Char-count weight per size bucket
    weight_histogram: HashMap<i32, usize>,
    /// Word count per size bucket (tie-break only)
    count_histogram: HashMap<i32, usize>,
    /// No size observations were available
    empty: bool,
}

impl Default for FontStatistics {
    fn default() -> Self {
        Self {
            body_size: 12.0,
            heading_sizes: Vec::new(),
            weight_histogram: HashMap::new(),
            count_histogram: HashMap::new(),
            empty: true,
        }
    }
}

impl FontStatistics {
    /// Build statistics over every well-formed word of a document.
    pub fn from_document(input: &DocumentInput) -> Self {
        let mut stats = Self::default();
        for page in &input.pages {
            for word in &page.words {
                if word.is_well_formed() {
                    stats.add_word(word);
                }
            }
        }
        stats.analyze();
        stats
    }

    /// Build statistics from a flat word slice.
    pub fn from_words(words: &[Word]) -> Self {
        let mut stats = Self::default();
        for word in words {
            if word.is_well_formed() {
                stats.add_word(word);
            }
        }
        stats.analyze();
        stats
    }

    fn add_word(&mut self, word: &Word) {
        let chars = word.text.chars().count();
        if chars == 0 {
            return;
        }
        let key = bucket(word.font_size);
        *self.weight_histogram.entry(key).or_insert(0) += chars;
        *self.count_histogram.entry(key).or_insert(0) += 1;
        self.empty = false;
    }

    /// Derive body size and the heading size ladder from the histograms.
    fn analyze(&mut self) {
        if self.weight_histogram.is_empty() {
            self.body_size = 12.0;
            self.heading_sizes.clear();
            return;
        }

        // Weight ties are broken by word count: the more frequent size is
        // body, not heading.
        let body_key = *self
            .weight_histogram
            .iter()
            .max_by_key(|(key, weight)| {
                (**weight, self.count_histogram.get(*key).copied().unwrap_or(0))
            })
            .map(|(key, _)| key)
            .unwrap();
        self.body_size = body_key as f32 / BUCKET_SCALE;

        let mut larger: Vec<i32> = self
            .weight_histogram
            .keys()
            .copied()
            .filter(|k| *k > body_key)
            .collect();
        larger.sort_unstable_by(|a, b| b.cmp(a));
        self.heading_sizes = larger.iter().map(|k| *k as f32 / BUCKET_SCALE).collect();
    }

    /// Body text size.
    pub fn body_size(&self) -> f32 {
        self.body_size
    }

    /// Distinct heading sizes, largest first.
    pub fn heading_sizes(&self) -> &[f32] {
        &self.heading_sizes
    }

    /// Whether no size observations were available.
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Heading level for a font size: 1-6, or 0 for body text.
    pub fn heading_level(&self, font_size: f32) -> u8 {
        if self.heading_sizes.is_empty() || bucket(font_size) <= bucket(self.body_size) {
            return 0;
        }

        for (i, &size) in self.heading_sizes.iter().enumerate() {
            if font_size >= size - 0.05 {
                return (i + 1).min(6) as u8;
            }
        }

        // Larger than body but below every observed heading size: deepest level.
        self.heading_sizes.len().min(6) as u8
    }
}

fn bucket(size: f32) -> i32 {
    (size * BUCKET_SCALE).round() as i32
}

/// Emphasis classification derived from a font name.
///
/// Recognizes style tokens in the name string, case-insensitive,
/// independent of any text content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FontStyle {
    /// Font name contains a bold-style token
    pub bold: bool,
    /// Font name contains an italic-style token
    pub italic: bool,
}

impl FontStyle {
    /// Classify a font name.
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        let bold =
            lower.contains("bold") || lower.contains("black") || lower.contains("heavy");
        let italic = lower.contains("italic") || lower.contains("oblique");
        Self { bold, italic }
    }
}
