//! Text segmenter: raw text into independently spoken utterance segments.
//!
//! Each segment becomes one `speak()` call on the speech engine, with a short
//! pause in between.  Splitting happens on the raw text (so `"Hello,"` keeps
//! its comma until cleaning), then each piece is reduced to letters, digits
//! and single spaces.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{LipSyncError, Result};
use crate::normalize::expand_numbers;

/// Sentence and clause punctuation that ends a segment.
pub const SEGMENT_BREAKS: [char; 6] = ['.', '!', '?', ',', ';', ':'];

/// Apostrophes disappear without leaving a gap ("don't" → "dont").
static RE_APOSTROPHE: Lazy<Regex> = Lazy::new(|| Regex::new(r"['’‘`]").unwrap());

/// Everything that is not a letter, digit or whitespace becomes a space.
static RE_UNSPEAKABLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\p{L}\p{N}\s]").unwrap());

static RE_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Split `raw` after every segment break, keeping the punctuation on its piece.
///
/// `"Hello, world!"` → `["Hello,", " world!"]`.  Empty pieces are dropped.
pub fn split_at_punctuation(raw: &str) -> Vec<&str> {
    raw.split_inclusive(&SEGMENT_BREAKS[..])
        .filter(|piece| !piece.trim().is_empty())
        .collect()
}

/// Reduce one piece to speakable text.
pub fn clean_segment(piece: &str) -> String {
    let text = RE_APOSTROPHE.replace_all(piece, "");
    let text = RE_UNSPEAKABLE.replace_all(&text, " ");
    RE_SPACES.replace_all(text.trim(), " ").into_owned()
}

/// Full segmentation pipeline.
#[derive(Debug, Clone)]
pub struct Segmenter {
    /// Spell out numbers before splitting (see [`crate::normalize`]).
    pub expand_numbers: bool,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self { expand_numbers: true }
    }
}

impl Segmenter {
    pub fn new(expand_numbers: bool) -> Self {
        Self { expand_numbers }
    }

    /// Split `raw` into cleaned, non-empty segments.
    ///
    /// Returns [`LipSyncError::EmptyInput`] when nothing speakable remains.
    pub fn segment(&self, raw: &str) -> Result<Vec<String>> {
        let expanded;
        let text = if self.expand_numbers {
            expanded = expand_numbers(raw);
            expanded.as_str()
        } else {
            raw
        };

        let segments: Vec<String> = split_at_punctuation(text)
            .into_iter()
            .map(clean_segment)
            .filter(|s| !s.is_empty())
            .collect();

        if segments.is_empty() {
            return Err(LipSyncError::EmptyInput);
        }
        Ok(segments)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hello_world_pieces() {
        let pieces: Vec<&str> = split_at_punctuation("Hello, world!")
            .into_iter()
            .map(str::trim)
            .collect();
        assert_eq!(pieces, vec!["Hello,", "world!"]);
    }

    #[test]
    fn test_hello_world_segments() {
        let segs = Segmenter::default().segment("Hello, world!").expect("speakable");
        assert_eq!(segs, vec!["Hello", "world"]);
    }

    #[test]
    fn test_apostrophes_removed_without_space() {
        assert_eq!(clean_segment("Don't stop"), "Dont stop");
        assert_eq!(clean_segment("it’s fine"), "its fine");
    }

    #[test]
    fn test_symbols_become_spaces() {
        assert_eq!(clean_segment("  rock&roll -- (live)  "), "rock roll live");
        assert_eq!(clean_segment("snake_case"), "snake case");
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(Segmenter::default().segment(""), Err(LipSyncError::EmptyInput)));
        assert!(matches!(Segmenter::default().segment(" ... ?! ,"), Err(LipSyncError::EmptyInput)));
        assert!(matches!(Segmenter::default().segment("@#%^&*"), Err(LipSyncError::EmptyInput)));
    }

    #[test]
    fn test_empty_segments_dropped() {
        let segs = Segmenter::default().segment("Wait... what?! OK").expect("speakable");
        assert_eq!(segs, vec!["Wait", "what", "OK"]);
    }

    #[test]
    fn test_numbers_expanded_before_split() {
        let segs = Segmenter::new(true).segment("It is 3.5 meters.").expect("speakable");
        assert_eq!(segs, vec!["It is three point five meters"]);

        let raw = Segmenter::new(false).segment("It is 3.5 meters.").expect("speakable");
        assert_eq!(raw, vec!["It is 3", "5 meters"]);
    }
}
