//! Heuristics that classify recognized text and shape the final output.
//!
//! Every [`Magic`] scores the recognition result in `[0, 1]`. The best score
//! wins, ties going to the magic listed first in [`Magic::ALL`], and the
//! winner's transform produces the text handed to the user.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use textcap_types::{Magic, OcrResult};

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}")
        .unwrap_or_else(|e| panic!("Failed to compile email pattern: {e}"))
});

static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:https?://|ftp://|www\.)[^\s<>"']+"#)
        .unwrap_or_else(|e| panic!("Failed to compile url pattern: {e}"))
});

const TRAILING_URL_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '}', '\'', '"'];

const SINGLE_LINE_SCORE: f64 = 0.5;
const MULTI_LINE_SCORE: f64 = 0.5;
const PARAGRAPH_BASE_SCORE: f64 = 0.5;
const PARAGRAPH_LENGTH_BONUS: f64 = 0.2;
/// Line length at which the paragraph bonus is fully applied.
const PARAGRAPH_FULL_LINE_LENGTH: f64 = 60.0;
const FALLBACK_SCORE: f64 = 0.01;

pub struct MagicScorer;

impl MagicScorer {
    /// Score every magic, in priority order.
    pub fn score_all(ocr: &OcrResult) -> BTreeMap<Magic, f64> {
        Magic::ALL
            .iter()
            .map(|&magic| (magic, Self::score(magic, ocr)))
            .collect()
    }

    pub fn score(magic: Magic, ocr: &OcrResult) -> f64 {
        let score = match magic {
            Magic::Email => match_ratio(&EMAIL_REGEX, &spaced_words(ocr)),
            Magic::Url => match_ratio(&URL_REGEX, &spaced_words(ocr)),
            Magic::SingleLine => {
                if ocr.num_lines() == 1 {
                    SINGLE_LINE_SCORE
                } else {
                    0.0
                }
            }
            Magic::MultiLine => {
                if ocr.num_lines() > 1 && ocr.num_blocks() == 1 && ocr.num_pars() == 1 {
                    MULTI_LINE_SCORE
                } else {
                    0.0
                }
            }
            Magic::Paragraph => {
                if ocr.num_blocks() > 1 || ocr.num_pars() > 1 {
                    let length = (ocr.mean_line_length() / PARAGRAPH_FULL_LINE_LENGTH).min(1.0);
                    PARAGRAPH_BASE_SCORE + PARAGRAPH_LENGTH_BONUS * length
                } else {
                    0.0
                }
            }
            Magic::Fallback => FALLBACK_SCORE,
        };
        score.clamp(0.0, 1.0)
    }

    pub fn transform(magic: Magic, ocr: &OcrResult) -> String {
        match magic {
            Magic::SingleLine => ocr.text(),
            Magic::MultiLine | Magic::Fallback => ocr.lines(),
            Magic::Paragraph => ocr.paragraphs().join("\n\n"),
            Magic::Email => {
                let text = spaced_words(ocr);
                EMAIL_REGEX
                    .find_iter(&text)
                    .map(|m| m.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
            Magic::Url => {
                let text = spaced_words(ocr);
                URL_REGEX
                    .find_iter(&text)
                    .map(|m| m.as_str().trim_end_matches(TRAILING_URL_PUNCTUATION))
                    .filter(|url| !url.is_empty())
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
    }
}

/// Words separated by a space regardless of the recognition language, so
/// patterns never run across word boundaries.
fn spaced_words(ocr: &OcrResult) -> String {
    ocr.words
        .iter()
        .map(|word| word.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Share of non-whitespace characters covered by matches of `pattern`.
fn match_ratio(pattern: &Regex, text: &str) -> f64 {
    let total = text.chars().filter(|c| !c.is_whitespace()).count();
    if total == 0 {
        return 0.0;
    }
    let matched: usize = pattern
        .find_iter(text)
        .map(|m| m.as_str().chars().count())
        .sum();
    (matched as f64 / total as f64).min(1.0)
}
