//! Manual text preparation: cleaning and fixed-size chunking.

use liftdoc_core::DOCUMENT_MIN_PASSAGE_CHARS;

/// Characters per chunk window
pub const DEFAULT_CHUNK_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkerConfig {
    pub chunk_chars: usize,
    /// Chunks shorter than this after stripping are discarded
    pub min_passage_chars: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_chars: DEFAULT_CHUNK_CHARS,
            min_passage_chars: DOCUMENT_MIN_PASSAGE_CHARS,
        }
    }
}

/// Collapse whitespace runs to one space, drop NUL characters, trim
pub fn clean_text(raw: &str) -> String {
    raw.split(|c: char| c.is_whitespace())
        .map(|word| word.replace('\0', ""))
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split text into consecutive windows of `chunk_chars` characters.
///
/// Each window is stripped; windows below `min_passage_chars` are dropped.
pub fn chunk_text(text: &str, config: &ChunkerConfig) -> Vec<String> {
    let size = config.chunk_chars.max(1);
    let chars: Vec<char> = text.chars().collect();

    chars
        .chunks(size)
        .map(|window| window.iter().collect::<String>())
        .filter_map(|chunk| {
            let stripped = chunk.trim();
            (stripped.chars().count() >= config.min_passage_chars).then(|| stripped.to_string())
        })
        .collect()
}
