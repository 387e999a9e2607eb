//! Timeline builder: words plus sparse boundary timestamps into keyframes.
//!
//! The whole timeline is rebuilt from scratch every time a boundary record
//! arrives; nothing is patched in place.  Consumers hold a [`Timeline`],
//! which is an immutable shared slice, and pick up a rebuilt one by swapping
//! the handle.
//!
//! Word placement:
//!
//! * a word with a boundary record starts exactly at its `elapsed_ms`;
//! * any other word is projected forward from the last known word (or from
//!   the segment start) by summing estimated word durations;
//! * a projected run that would overrun the next known start is compressed
//!   proportionally to end there.  Runs that fall short are never stretched;
//! * a word whose successor also has a record lasts exactly the measured gap.
//!
//! Inside a word, every phoneme gets a slice proportional to its nominal
//! class duration, floored at `min_phoneme_ms`.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::config::TimingConfig;
use crate::phonemize::PhonemeSymbol;
use crate::tokenize::WordEvent;
use crate::viseme::{class_for, PhonemeClassKey};

// ─────────────────────────────────────────────────────────────────────────────
// Records
// ─────────────────────────────────────────────────────────────────────────────

/// "Word `word_index` started playing at `elapsed_ms`" (segment-relative).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundaryRecord {
    pub word_index: usize,
    pub elapsed_ms: f64,
}

/// One entry of a timeline.  `time_ms` is relative to the segment start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VisemeKeyframe {
    pub time_ms: f64,
    pub shape: PhonemeClassKey,
    pub duration_ms: f64,
}

impl VisemeKeyframe {
    pub fn end_ms(&self) -> f64 {
        self.time_ms + self.duration_ms
    }
}

/// Resolved placement of one word.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WordWindow {
    pub start_ms: f64,
    pub duration_ms: f64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Timeline
// ─────────────────────────────────────────────────────────────────────────────

/// An immutable, time-ordered keyframe sequence.  Cloning is cheap.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline(Arc<[VisemeKeyframe]>);

impl Default for Timeline {
    fn default() -> Self {
        Self(Arc::from(Vec::new()))
    }
}

impl Timeline {
    pub fn keyframes(&self) -> &[VisemeKeyframe] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&VisemeKeyframe> {
        self.0.get(index)
    }

    /// Latest point covered by any keyframe, or 0 for an empty timeline.
    pub fn end_ms(&self) -> f64 {
        self.0.iter().map(VisemeKeyframe::end_ms).fold(0.0, f64::max)
    }
}

impl From<Vec<VisemeKeyframe>> for Timeline {
    fn from(keyframes: Vec<VisemeKeyframe>) -> Self {
        Self(Arc::from(keyframes))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Builder
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct TimelineBuilder {
    min_phoneme_ms: f64,
    speech_rate: f64,
}

impl Default for TimelineBuilder {
    fn default() -> Self {
        Self::new(&TimingConfig::default())
    }
}

impl TimelineBuilder {
    pub fn new(config: &TimingConfig) -> Self {
        Self { min_phoneme_ms: config.min_phoneme_ms, speech_rate: config.speech_rate }
    }

    fn class_ms(&self, class: PhonemeClassKey) -> f64 {
        class.nominal_ms() / self.speech_rate
    }

    /// Nominal duration of one phoneme at the configured speech rate.
    pub fn phoneme_ms(&self, phoneme: &PhonemeSymbol) -> f64 {
        self.class_ms(class_for(phoneme))
    }

    /// Estimated length of a word: its phoneme durations, each floored.
    pub fn estimate_word_ms(&self, word: &WordEvent) -> f64 {
        word.phonemes.iter().map(|p| self.phoneme_ms(p).max(self.min_phoneme_ms)).sum()
    }

    /// Place every word, honouring whatever boundary records exist.
    ///
    /// Records are taken in arrival order; a second record for the same word
    /// is ignored, as are records for words that do not exist.
    pub fn resolve_words(&self, words: &[WordEvent], boundaries: &[BoundaryRecord]) -> Vec<WordWindow> {
        let n = words.len();
        let mut known: Vec<Option<f64>> = vec![None; n];
        for b in boundaries {
            if b.word_index < n && b.elapsed_ms.is_finite() {
                known[b.word_index].get_or_insert(b.elapsed_ms.max(0.0));
            }
        }
        let estimates: Vec<f64> = words.iter().map(|w| self.estimate_word_ms(w)).collect();

        let mut windows = Vec::with_capacity(n);
        let mut i = 0;
        while i < n {
            // A run is an anchor (known word, or the segment start) followed
            // by every unknown word up to the next known one.
            let origin = known[i].unwrap_or(0.0);
            let next = (i + 1..n).find(|&j| known[j].is_some()).unwrap_or(n);
            let next_start = known.get(next).copied().flatten();

            match next_start {
                Some(end) if next == i + 1 && known[i].is_some() => {
                    windows.push(WordWindow { start_ms: origin, duration_ms: (end - origin).max(0.0) });
                }
                _ => {
                    let total: f64 = estimates[i..next].iter().sum();
                    let scale = match next_start {
                        Some(end) if origin + total > end && total > 0.0 => (end - origin).max(0.0) / total,
                        _ => 1.0,
                    };
                    let mut t = origin;
                    for &estimate in &estimates[i..next] {
                        let duration_ms = estimate * scale;
                        windows.push(WordWindow { start_ms: t, duration_ms });
                        t += duration_ms;
                    }
                }
            }
            i = next;
        }
        windows
    }

    /// Build a complete timeline for one segment.
    pub fn build(&self, words: &[WordEvent], boundaries: &[BoundaryRecord]) -> Timeline {
        let windows = self.resolve_words(words, boundaries);
        let mut keyframes = Vec::with_capacity(words.iter().map(|w| w.phonemes.len()).sum());

        for (word, window) in words.iter().zip(&windows) {
            let classes: Vec<(PhonemeClassKey, f64)> = word
                .phonemes
                .iter()
                .map(|p| {
                    let class = class_for(p);
                    (class, self.class_ms(class))
                })
                .collect();
            let total: f64 = classes.iter().map(|(_, ms)| ms).sum();

            let mut t = window.start_ms;
            for (shape, ms) in classes {
                let slice = if total > 0.0 { window.duration_ms * ms / total } else { 0.0 };
                keyframes.push(VisemeKeyframe {
                    time_ms: t,
                    shape,
                    duration_ms: slice.max(self.min_phoneme_ms),
                });
                t += slice;
            }
        }

        // Contradictory boundaries can place a later word before an earlier one.
        keyframes.sort_by(|a, b| a.time_ms.total_cmp(&b.time_ms));

        debug!(
            words = words.len(),
            boundaries = boundaries.len(),
            keyframes = keyframes.len(),
            "timeline rebuilt"
        );
        Timeline::from(keyframes)
    }
}

/// Map a boundary notification to a word index.
///
/// The word containing `char_index` wins; otherwise the first word that
/// starts inside `[char_index, char_index + char_length)`.
pub fn correlate_boundary(words: &[WordEvent], char_index: usize, char_length: usize) -> Option<usize> {
    words.iter().position(|w| w.contains(char_index)).or_else(|| {
        let end = char_index.saturating_add(char_length);
        words.iter().position(|w| (char_index..end).contains(&w.char_start))
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
