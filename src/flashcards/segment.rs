//! Sentence segmentation

use regex::Regex;

/// Splits text after sentence-terminal punctuation.
///
/// The punctuation stays attached to the sentence it ends; the whitespace run
/// that follows it is consumed as the separator.
pub struct Segmenter {
    boundary: Regex,
}

impl Segmenter {
    pub fn new() -> Self {
        Self {
            boundary: Regex::new(r"[.?!]\s+").expect("Invalid sentence boundary regex"),
        }
    }

    /// Segment `text` into ordered sentence-like units.
    ///
    /// Empty input yields a single empty segment; callers filter blanks.
    pub fn segment(&self, text: &str) -> Vec<String> {
        let mut segments = Vec::new();
        let mut start = 0;

        for boundary in self.boundary.find_iter(text) {
            // terminal punctuation is always one ASCII byte
            let end = boundary.start() + 1;
            segments.push(text[start..end].to_string());
            start = boundary.end();
        }
        segments.push(text[start..].to_string());

        segments
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new()
    }
}
