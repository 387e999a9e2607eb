//! Word tokeniser: one cleaned segment into [`WordEvent`]s.
//!
//! A word is a maximal run of letters and apostrophes.  Offsets are counted
//! in characters, not bytes, because that is how speech engines report
//! boundary positions (`charIndex`, `charLength`).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::phonemize::{G2p, PhonemeSymbol};

// ─────────────────────────────────────────────────────────────────────────────
// Word spans
// ─────────────────────────────────────────────────────────────────────────────

static RE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}']+").unwrap());

/// One word of a segment with its character span `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordSpan<'a> {
    pub text: &'a str,
    pub char_start: usize,
    pub char_end: usize,
}

/// Split `segment` into words, with character offsets.
pub fn word_spans(segment: &str) -> Vec<WordSpan<'_>> {
    let mut spans = Vec::new();
    // Walk matches in order so the char count is accumulated, not recomputed.
    let mut chars_before = 0;
    let mut bytes_seen = 0;
    for m in RE_WORD.find_iter(segment) {
        chars_before += segment[bytes_seen..m.start()].chars().count();
        let len = m.as_str().chars().count();
        spans.push(WordSpan {
            text: m.as_str(),
            char_start: chars_before,
            char_end: chars_before + len,
        });
        chars_before += len;
        bytes_seen = m.end();
    }
    spans
}

// ─────────────────────────────────────────────────────────────────────────────
// WordEvent
// ─────────────────────────────────────────────────────────────────────────────

/// A word with its phonemes and its character span in the cleaned segment.
///
/// Created once per segment; boundary notifications are mapped back to a
/// word by containment in `[char_start, char_end)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordEvent {
    pub word: String,
    pub phonemes: Vec<PhonemeSymbol>,
    pub char_start: usize,
    pub char_end: usize,
}

impl WordEvent {
    /// Whether character offset `index` falls inside this word.
    pub fn contains(&self, index: usize) -> bool {
        (self.char_start..self.char_end).contains(&index)
    }
}

/// Tokenise `segment` and phonemise each word.
///
/// Words for which the G2P returns nothing (a lone apostrophe) are dropped.
pub fn word_events(segment: &str, g2p: &dyn G2p) -> Vec<WordEvent> {
    word_spans(segment)
        .into_iter()
        .filter_map(|span| {
            let phonemes = g2p.word_to_phonemes(span.text);
            (!phonemes.is_empty()).then(|| WordEvent {
                word: span.text.to_string(),
                phonemes,
                char_start: span.char_start,
                char_end: span.char_end,
            })
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
