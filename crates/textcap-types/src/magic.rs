use std::fmt;

use serde::Serialize;

/// Semantic category detected in recognized text.
///
/// Variants are declared in priority order: when two magics score the same,
/// the one declared first wins. `Ord` follows the declaration order so maps
/// keyed by `Magic` iterate by priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Magic {
    Email,
    Url,
    SingleLine,
    MultiLine,
    Paragraph,
    Fallback,
}

impl Magic {
    pub const ALL: [Magic; 6] = [
        Magic::Email,
        Magic::Url,
        Magic::SingleLine,
        Magic::MultiLine,
        Magic::Paragraph,
        Magic::Fallback,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Magic::Email => "email",
            Magic::Url => "url",
            Magic::SingleLine => "single_line",
            Magic::MultiLine => "multi_line",
            Magic::Paragraph => "paragraph",
            Magic::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Magic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
