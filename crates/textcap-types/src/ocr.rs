use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::magic::Magic;

/// Pixel bounds of a recognized word inside the recognized image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WordBox {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

/// Word-level OCR record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Word {
    pub block_num: u32,
    pub par_num: u32,
    pub line_num: u32,
    pub word_num: u32,
    pub text: String,
    pub confidence: f64,
    pub bbox: WordBox,
}

impl Word {
    /// Confidence value for records where confidence does not apply.
    pub const NO_CONFIDENCE: f64 = -1.0;

    pub fn new(block_num: u32, par_num: u32, line_num: u32, text: impl Into<String>) -> Self {
        Self {
            block_num,
            par_num,
            line_num,
            word_num: 0,
            text: text.into(),
            confidence: Self::NO_CONFIDENCE,
            bbox: WordBox::default(),
        }
    }

    pub fn with_confidence(mut self, value: f64) -> Self {
        self.confidence = value;
        self
    }

    pub fn with_word_num(mut self, value: u32) -> Self {
        self.word_num = value;
        self
    }

    pub fn with_bbox(mut self, bbox: WordBox) -> Self {
        self.bbox = bbox;
        self
    }

    pub fn has_confidence(&self) -> bool {
        self.confidence >= 0.0
    }
}

/// Recognized words plus the magic scores computed from them.
///
/// Every aggregate is derived on demand from `words`, so replacing the word
/// list is always reflected in the statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OcrResult {
    pub words: Vec<Word>,
    pub magic_scores: BTreeMap<Magic, f64>,
    pub language_without_spaces: bool,
}

impl OcrResult {
    pub fn new(words: Vec<Word>, language_without_spaces: bool) -> Self {
        Self {
            words,
            magic_scores: BTreeMap::new(),
            language_without_spaces,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn word_separator(&self) -> &'static str {
        if self.language_without_spaces { "" } else { " " }
    }

    /// All words on a single line.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|word| word.text.as_str())
            .collect::<Vec<_>>()
            .join(self.word_separator())
    }

    /// Words grouped by `(block_num, line_num)` in first-seen order, one line
    /// per group.
    pub fn lines(&self) -> String {
        self.grouped(|word| (word.block_num, word.line_num)).join("\n")
    }

    /// Words grouped by `(block_num, par_num)` with line breaks removed.
    pub fn paragraphs(&self) -> Vec<String> {
        self.grouped(|word| (word.block_num, word.par_num))
    }

    pub fn num_blocks(&self) -> usize {
        self.words
            .iter()
            .map(|word| word.block_num)
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn num_pars(&self) -> usize {
        self.words
            .iter()
            .map(|word| (word.block_num, word.par_num))
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn num_lines(&self) -> usize {
        self.words
            .iter()
            .map(|word| (word.block_num, word.line_num))
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Mean confidence over words that carry one; `0.0` when none do.
    pub fn mean_conf(&self) -> f64 {
        let (sum, count) = self
            .words
            .iter()
            .filter(|word| word.has_confidence())
            .fold((0.0, 0usize), |(sum, count), word| {
                (sum + word.confidence, count + 1)
            });
        if count == 0 { 0.0 } else { sum / count as f64 }
    }

    /// Average number of characters per line.
    pub fn mean_line_length(&self) -> f64 {
        let lines = self.grouped(|word| (word.block_num, word.line_num));
        if lines.is_empty() {
            return 0.0;
        }
        let chars: usize = lines.iter().map(|line| line.chars().count()).sum();
        chars as f64 / lines.len() as f64
    }

    /// Magic with the highest score. Ties go to the magic with the higher
    /// priority.
    pub fn best_scored_magic(&self) -> Option<Magic> {
        let mut best: Option<(Magic, f64)> = None;
        for (&magic, &score) in &self.magic_scores {
            match best {
                Some((_, current)) if score.total_cmp(&current) != Ordering::Greater => {}
                _ => best = Some((magic, score)),
            }
        }
        best.map(|(magic, _)| magic)
    }

    fn grouped<K, F>(&self, key: F) -> Vec<String>
    where
        K: Eq + std::hash::Hash,
        F: Fn(&Word) -> K,
    {
        let mut slots: HashMap<K, usize> = HashMap::new();
        let mut groups: Vec<Vec<&str>> = Vec::new();
        for word in &self.words {
            let slot = *slots.entry(key(word)).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(word.text.as_str());
        }
        let separator = self.word_separator();
        groups.into_iter().map(|group| group.join(separator)).collect()
    }
}
