use textcap_types::Word;

/// Word records recognized in a single image.
#[derive(Debug, Clone, Default)]
pub struct OcrResponse {
    pub words: Vec<Word>,
}

impl OcrResponse {
    pub fn new(words: Vec<Word>) -> Self {
        Self { words }
    }

    pub fn empty() -> Self {
        Self { words: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Highest block number in the response, `0` when empty.
    pub fn max_block(&self) -> u32 {
        self.words
            .iter()
            .map(|word| word.block_num)
            .max()
            .unwrap_or(0)
    }
}
