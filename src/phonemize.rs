//! Grapheme-to-phoneme conversion without a pronunciation service.
//!
//! [`RuleG2p`] resolves one word at a time, in priority order:
//!
//! 1. exact match in [`lexicon::EXCEPTIONS`](crate::lexicon::EXCEPTIONS);
//! 2. first matching suffix rule, with the stem resolved by exception or rules;
//! 3. letter rules scanned left to right (vowel clusters, consonant clusters,
//!    single consonants, longest pattern first at each position);
//! 4. a per-character table when the rules produce nothing at all.
//!
//! The result is deterministic and never empty for a word that contains a
//! letter.  Hosts that do have a real phonemizer can put it in front of the
//! rules with [`WithExternal`]; the rules remain the fallback.

use std::{borrow::Cow, collections::HashMap, fmt};

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::lexicon::{
    fallback_letter, Anchor, LetterRule, CONSONANT_CLUSTERS, EXCEPTIONS, SINGLE_CONSONANTS,
    SUFFIX_RULES, VOWEL_CLUSTERS,
};

// ─────────────────────────────────────────────────────────────────────────────
// PhonemeSymbol
// ─────────────────────────────────────────────────────────────────────────────

/// An ARPAbet-style phoneme tag such as `"AE"` or `"SH"`.
///
/// Stress digits are kept as given but ignored by [`PhonemeSymbol::base`],
/// which is what every table lookup uses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PhonemeSymbol(Cow<'static, str>);

impl PhonemeSymbol {
    /// Explicit silence.
    pub const SILENCE: PhonemeSymbol = PhonemeSymbol(Cow::Borrowed("_silence_"));

    pub const fn from_static(symbol: &'static str) -> Self {
        Self(Cow::Borrowed(symbol))
    }

    pub fn new(symbol: impl Into<String>) -> Self {
        Self(Cow::Owned(symbol.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The symbol with any trailing stress digits removed (`"AH0"` → `"AH"`).
    pub fn base(&self) -> &str {
        self.0.trim_end_matches(|c: char| c.is_ascii_digit())
    }
}

impl fmt::Display for PhonemeSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn symbols(phonemes: &'static [&'static str]) -> impl Iterator<Item = PhonemeSymbol> {
    phonemes.iter().copied().map(PhonemeSymbol::from_static)
}

// ─────────────────────────────────────────────────────────────────────────────
// Interfaces
// ─────────────────────────────────────────────────────────────────────────────

/// Word → phoneme conversion used by the timeline stage.
pub trait G2p {
    /// Phonemes for one word.  Empty only when `word` has no letters.
    fn word_to_phonemes(&self, word: &str) -> Vec<PhonemeSymbol>;
}

/// An optional outside phonemizer (dictionary, neural G2P, engine hook).
///
/// Returning `None` hands the word to the built-in rules.
pub trait ExternalPhonemizer {
    fn phonemize_word(&self, word: &str) -> Option<Vec<PhonemeSymbol>>;
}

impl<F> ExternalPhonemizer for F
where
    F: Fn(&str) -> Option<Vec<PhonemeSymbol>>,
{
    fn phonemize_word(&self, word: &str) -> Option<Vec<PhonemeSymbol>> {
        self(word)
    }
}

/// An external phonemizer with the rule-based G2P as fallback.
pub struct WithExternal<E> {
    external: E,
    builtin: RuleG2p,
}

impl<E: ExternalPhonemizer> WithExternal<E> {
    pub fn new(external: E) -> Self {
        Self { external, builtin: RuleG2p }
    }
}

impl<E: ExternalPhonemizer> G2p for WithExternal<E> {
    fn word_to_phonemes(&self, word: &str) -> Vec<PhonemeSymbol> {
        match self.external.phonemize_word(word) {
            Some(phonemes) if !phonemes.is_empty() => phonemes,
            _ => self.builtin.word_to_phonemes(word),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Longest-match rule sets
// ─────────────────────────────────────────────────────────────────────────────

/// Letter rules ordered longest pattern first, authored order within a length.
struct RuleSet {
    rules: Vec<&'static LetterRule>,
}

impl RuleSet {
    fn new(table: &'static [LetterRule]) -> Self {
        let mut rules: Vec<&'static LetterRule> = table.iter().collect();
        // Stable sort keeps the authored priority among equal lengths.
        rules.sort_by(|a, b| b.pattern.len().cmp(&a.pattern.len()));
        Self { rules }
    }

    /// First rule whose pattern and anchor match `word` at byte offset `pos`.
    fn find(&self, word: &str, pos: usize) -> Option<&'static LetterRule> {
        let rest = &word[pos..];
        self.rules
            .iter()
            .copied()
            .find(|r| rest.starts_with(r.pattern) && anchor_holds(r.anchor, word, pos, r.pattern.len()))
    }
}

fn is_vowel(c: u8) -> bool {
    matches!(c, b'a' | b'e' | b'i' | b'o' | b'u' | b'y')
}

fn anchor_holds(anchor: Anchor, word: &str, pos: usize, len: usize) -> bool {
    let bytes = word.as_bytes();
    let end = pos + len;
    match anchor {
        Anchor::Anywhere => true,
        Anchor::Start => pos == 0,
        Anchor::End => end == bytes.len() && pos > 0,
        Anchor::NotStart => pos > 0,
        Anchor::BeforeFrontVowel => matches!(bytes.get(end), Some(b'e' | b'i' | b'y')),
        Anchor::MagicE => {
            bytes.len() == end + 2
                && bytes[end].is_ascii_alphabetic()
                && !is_vowel(bytes[end])
                && bytes[end + 1] == b'e'
        }
    }
}

static VOWELS: Lazy<RuleSet> = Lazy::new(|| RuleSet::new(VOWEL_CLUSTERS));
static CLUSTERS: Lazy<RuleSet> = Lazy::new(|| RuleSet::new(CONSONANT_CLUSTERS));
static SINGLES: Lazy<RuleSet> = Lazy::new(|| RuleSet::new(SINGLE_CONSONANTS));

static EXCEPTION_MAP: Lazy<HashMap<&'static str, Vec<PhonemeSymbol>>> = Lazy::new(|| {
    EXCEPTIONS
        .iter()
        .map(|&(word, phonemes)| {
            (word, phonemes.split_whitespace().map(PhonemeSymbol::from_static).collect())
        })
        .collect()
});

// ─────────────────────────────────────────────────────────────────────────────
// RuleG2p
// ─────────────────────────────────────────────────────────────────────────────

/// Lower-case `word` and drop everything that is not a letter.
pub fn normalize_word(word: &str) -> String {
    word.chars().filter(|c| c.is_alphabetic()).flat_map(char::to_lowercase).collect()
}

/// Exception-table lookup on an already normalised word.
pub fn lookup_exception(word: &str) -> Option<&'static [PhonemeSymbol]> {
    EXCEPTION_MAP.get(word).map(Vec::as_slice)
}

/// Scan `word` left to right with the letter rules.
pub fn rule_convert(word: &str) -> Vec<PhonemeSymbol> {
    let mut out = Vec::new();
    let mut pos = 0;
    while pos < word.len() {
        let matched = VOWELS
            .find(word, pos)
            .or_else(|| CLUSTERS.find(word, pos))
            .or_else(|| SINGLES.find(word, pos));
        match matched {
            Some(rule) => {
                out.extend(symbols(rule.phonemes));
                pos += rule.pattern.len();
            }
            None => {
                // Unknown letter: skip it, whatever its UTF-8 width.
                let skip = word[pos..].chars().next().map_or(1, char::len_utf8);
                pos += skip;
            }
        }
    }
    out
}

/// Character-by-character fallback; never empty for a non-empty word.
pub fn fallback_convert(word: &str) -> Vec<PhonemeSymbol> {
    word.chars().flat_map(|c| symbols(fallback_letter(c))).collect()
}

fn resolve_stem(stem: &str) -> Vec<PhonemeSymbol> {
    match lookup_exception(stem) {
        Some(phonemes) => phonemes.to_vec(),
        None => rule_convert(stem),
    }
}

/// Apply the first matching suffix rule, if any.
pub fn apply_suffix(word: &str) -> Option<Vec<PhonemeSymbol>> {
    let rule = SUFFIX_RULES.iter().find(|rule| {
        word.strip_suffix(rule.suffix).is_some_and(|stem| {
            stem.len() >= rule.min_stem
                && !stem.ends_with(|c: char| rule.not_after.contains(c))
        })
    })?;
    let stem = &word[..word.len() - rule.suffix.len()];
    let mut phonemes = resolve_stem(stem);
    phonemes.extend(symbols(rule.tail));
    Some(phonemes)
}

/// The built-in heuristic G2P.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleG2p;

impl G2p for RuleG2p {
    fn word_to_phonemes(&self, word: &str) -> Vec<PhonemeSymbol> {
        let word = normalize_word(word);
        if word.is_empty() {
            return Vec::new();
        }
        if let Some(phonemes) = lookup_exception(&word) {
            return phonemes.to_vec();
        }
        if let Some(phonemes) = apply_suffix(&word) {
            if !phonemes.is_empty() {
                return phonemes;
            }
        }
        let phonemes = rule_convert(&word);
        if !phonemes.is_empty() {
            return phonemes;
        }
        fallback_convert(&word)
    }
}

/// Convenience: phonemes of every whitespace-separated word, space-joined.
pub fn phonemize(g2p: &dyn G2p, text: &str) -> String {
    text.split_whitespace()
        .map(|w| {
            g2p.word_to_phonemes(w)
                .iter()
                .map(PhonemeSymbol::as_str)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" | ")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn p(word: &str) -> Vec<String> {
        RuleG2p.word_to_phonemes(word).iter().map(|s| s.to_string()).collect()
    }

    fn v(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_every_exception_verbatim() {
        for (word, phonemes) in EXCEPTIONS {
            assert_eq!(p(word), v(phonemes), "exception {}", word);
        }
    }

    #[test]
    fn test_exception_ignores_case_and_punctuation() {
        assert_eq!(p("Hello!"), v("HH AH L OW"));
        assert_eq!(p("WORLD"), v("W ER L D"));
        assert_eq!(p("\"don't\""), v("D OW N T"));
    }

    #[test]
    fn test_suffix_rules() {
        // "walk" is an exception, the -ed tail is appended.
        assert_eq!(p("walked"), v("W AO K D"));
        assert_eq!(p("looking"), v("L UH K IH NG"));
        assert_eq!(p("nation"), v("N AE SH AH N"));
        assert_eq!(p("makes"), v("M EY K Z"));
        assert_eq!(p("kindness"), v("K AY N D N AH S"));
    }

    #[test]
    fn test_suffix_needs_long_enough_stem() {
        // "sing" would leave a one-letter stem.
        assert_eq!(p("sing"), v("S IH NG"));
        // "bus" ends in u before the s.
        assert_eq!(p("bus"), v("B AH S"));
    }

    #[test]
    fn test_rule_clusters() {
        assert_eq!(p("ship"), v("SH IH P"));
        assert_eq!(p("phone"), v("F OW N"));
        assert_eq!(p("catch"), v("K AE CH"));
        assert_eq!(p("high"), v("HH AY"));
        assert_eq!(p("knock"), v("N AA K"));
        assert_eq!(p("city"), v("S IH T IY"));
        assert_eq!(p("boat"), v("B OW T"));
    }

    #[test]
    fn test_magic_e() {
        assert_eq!(p("bike"), v("B AY K"));
        assert_eq!(p("tone"), v("T OW N"));
        assert_eq!(p("cute"), v("K UW T"));
    }

    #[test]
    fn test_unknown_letters_skipped() {
        assert_eq!(p("café"), v("K AE F"));
    }

    #[test]
    fn test_fallback_when_rules_yield_nothing() {
        // "ñ" matches no rule; the per-character table still speaks it.
        assert_eq!(p("ñ"), v("N Y"));
        assert_eq!(p("ø"), v("AH"));
    }

    #[test]
    fn test_empty_and_non_letters() {
        assert!(p("").is_empty());
        assert!(p("1234").is_empty());
        assert!(p("'").is_empty());
    }

    #[test]
    fn test_deterministic() {
        for w in ["extraordinary", "rhythm", "strengths", "zyzzyva", "queueing"] {
            assert_eq!(p(w), p(w));
            assert!(!p(w).is_empty(), "no phonemes for {}", w);
        }
    }

    #[test]
    fn test_base_strips_stress() {
        assert_eq!(PhonemeSymbol::new("AH0").base(), "AH");
        assert_eq!(PhonemeSymbol::from_static("EY1").base(), "EY");
        assert_eq!(PhonemeSymbol::SILENCE.base(), "_silence_");
    }

    #[test]
    fn test_external_first_then_rules() {
        let ext = |w: &str| {
            (w == "gif").then(|| ["JH", "IH", "F"].into_iter().map(PhonemeSymbol::new).collect())
        };
        let g2p = WithExternal::new(ext);
        assert_eq!(
            g2p.word_to_phonemes("gif").iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            vec!["JH", "IH", "F"]
        );
        assert_eq!(g2p.word_to_phonemes("hello"), RuleG2p.word_to_phonemes("hello"));
    }

    #[test]
    fn test_phonemize_text() {
        assert_eq!(phonemize(&RuleG2p, "hello world"), "HH AH L OW | W ER L D");
    }
}
