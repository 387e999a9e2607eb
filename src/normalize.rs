//! Spoken-form expansion of digits and number-like symbols.
//!
//! The segmenter keeps digits but the G2P only reads letters, so "42" would
//! otherwise produce a silent hole in the timeline while the speech engine
//! happily says "forty two".  This pass runs on the raw text, before
//! punctuation splitting, so that "3.5" is not cut in half at the dot.

use fancy_regex::{Captures, Regex};
use once_cell::sync::Lazy;

// ─────────────────────────────────────────────────────────────────────────────
// Integer spelling
// ─────────────────────────────────────────────────────────────────────────────

const SMALL: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];
const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];
const GROUPS: [&str; 7] = [
    "", "thousand", "million", "billion", "trillion", "quadrillion", "quintillion",
];

fn push_below_thousand(n: u64, out: &mut Vec<&'static str>) {
    let hundreds = (n / 100) as usize;
    let rest = (n % 100) as usize;
    if hundreds > 0 {
        out.push(SMALL[hundreds]);
        out.push("hundred");
    }
    match rest {
        0 => {}
        1..=19 => out.push(SMALL[rest]),
        _ => {
            out.push(TENS[rest / 10]);
            if rest % 10 > 0 {
                out.push(SMALL[rest % 10]);
            }
        }
    }
}

/// Spell an integer as space-separated English words.
pub fn spell_integer(n: i64) -> String {
    if n == 0 {
        return SMALL[0].to_string();
    }
    let mut words: Vec<&'static str> = Vec::new();
    if n < 0 {
        words.push("minus");
    }

    // Split into base-1000 groups, least significant first.
    let mut magnitude = n.unsigned_abs();
    let mut groups = Vec::new();
    while magnitude > 0 {
        groups.push(magnitude % 1000);
        magnitude /= 1000;
    }

    for (scale, &group) in groups.iter().enumerate().rev() {
        if group == 0 {
            continue;
        }
        push_below_thousand(group, &mut words);
        if scale > 0 {
            words.push(GROUPS[scale]);
        }
    }
    words.join(" ")
}

/// Read a digit string one digit at a time ("07" → "zero seven").
pub fn spell_digits(digits: &str) -> String {
    digits
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| SMALL[d as usize])
        .collect::<Vec<_>>()
        .join(" ")
}

/// Spell a run of digits that may carry thousands separators.
fn spell_grouped(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    match digits.parse::<i64>() {
        Ok(n) => spell_integer(n),
        // Longer than i64: read digit by digit.
        Err(_) => spell_digits(&digits),
    }
}

fn spell_decimal(int_part: &str, frac_part: &str) -> String {
    let whole = if int_part.is_empty() { SMALL[0].to_string() } else { spell_grouped(int_part) };
    format!("{} point {}", whole, spell_digits(frac_part))
}

/// Turn the cardinal spelling of `n` into its ordinal ("twenty one" → "twenty first").
pub fn spell_ordinal(n: i64) -> String {
    let cardinal = spell_integer(n);
    let (head, last) = match cardinal.rsplit_once(' ') {
        Some((head, last)) => (Some(head), last),
        None => (None, cardinal.as_str()),
    };
    let last = match last {
        "one" => "first".to_string(),
        "two" => "second".to_string(),
        "three" => "third".to_string(),
        "five" => "fifth".to_string(),
        "eight" => "eighth".to_string(),
        "nine" => "ninth".to_string(),
        "twelve" => "twelfth".to_string(),
        w if w.ends_with('y') => format!("{}ieth", &w[..w.len() - 1]),
        w => format!("{}th", w),
    };
    match head {
        Some(head) => format!("{} {}", head, last),
        None => last,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Patterns
// ─────────────────────────────────────────────────────────────────────────────

static RE_CURRENCY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([$€£])\s?(\d[\d,]*)(?:\.(\d{1,2}))?(?!\d|\.\d)").unwrap());
static RE_PERCENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d[\d,]*)(?:\.(\d+))?\s?%").unwrap());
static RE_ORDINAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,9})(st|nd|rd|th)\b").unwrap());
static RE_DECIMAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?<![\d.])(\d*)\.(\d+)(?!\d|\.\d)").unwrap());
static RE_INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?<![A-Za-z])\d+(?:,\d{3})*").unwrap());

fn currency_unit(symbol: &str) -> (&'static str, &'static str) {
    match symbol {
        "€" => ("euro", "cent"),
        "£" => ("pound", "penny"),
        _ => ("dollar", "cent"),
    }
}

fn plural(word: &str, count: i64) -> String {
    match (word, count) {
        (w, 1) => w.to_string(),
        ("penny", _) => "pence".to_string(),
        (w, _) => format!("{}s", w),
    }
}

fn expand_currency(text: &str) -> String {
    RE_CURRENCY
        .replace_all(text, |caps: &Captures| {
            let (major, minor) = currency_unit(&caps[1]);
            let whole_digits: String = caps[2].chars().filter(char::is_ascii_digit).collect();
            let whole: i64 = whole_digits.parse().unwrap_or(0);
            let mut spoken = format!("{} {}", spell_grouped(&caps[2]), plural(major, whole));
            if let Some(cents) = caps.get(3) {
                // ".5" means fifty cents, not five.
                let padded = format!("{:0<2}", cents.as_str());
                let cents: i64 = padded.parse().unwrap_or(0);
                if cents > 0 {
                    spoken.push_str(&format!(" and {} {}", spell_integer(cents), plural(minor, cents)));
                }
            }
            spoken
        })
        .into_owned()
}

fn expand_percentages(text: &str) -> String {
    RE_PERCENT
        .replace_all(text, |caps: &Captures| {
            let number = match caps.get(2) {
                Some(frac) => spell_decimal(&caps[1], frac.as_str()),
                None => spell_grouped(&caps[1]),
            };
            format!("{} percent", number)
        })
        .into_owned()
}

fn expand_ordinals(text: &str) -> String {
    RE_ORDINAL
        .replace_all(text, |caps: &Captures| {
            caps[1].parse::<i64>().map(spell_ordinal).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}

fn expand_decimals(text: &str) -> String {
    RE_DECIMAL
        .replace_all(text, |caps: &Captures| spell_decimal(&caps[1], &caps[2]))
        .into_owned()
}

fn expand_integers(text: &str) -> String {
    RE_INTEGER
        .replace_all(text, |caps: &Captures| format!(" {} ", spell_grouped(&caps[0])))
        .into_owned()
}

/// Expand every number-like token in `text` into words.
///
/// Order matters: currency and percentages consume their own decimals, and
/// decimals must be spelled before the dot is seen as a sentence break.
pub fn expand_numbers(text: &str) -> String {
    let text = expand_currency(text);
    let text = expand_percentages(&text);
    let text = expand_ordinals(&text);
    let text = expand_decimals(&text);
    expand_integers(&text)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn squash(s: &str) -> String {
        s.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_spell_integer() {
        assert_eq!(spell_integer(0), "zero");
        assert_eq!(spell_integer(13), "thirteen");
        assert_eq!(spell_integer(40), "forty");
        assert_eq!(spell_integer(42), "forty two");
        assert_eq!(spell_integer(105), "one hundred five");
        assert_eq!(spell_integer(1_000), "one thousand");
        assert_eq!(spell_integer(2_000_017), "two million seventeen");
        assert_eq!(spell_integer(-8), "minus eight");
    }

    #[test]
    fn test_spell_ordinal() {
        assert_eq!(spell_ordinal(1), "first");
        assert_eq!(spell_ordinal(3), "third");
        assert_eq!(spell_ordinal(12), "twelfth");
        assert_eq!(spell_ordinal(20), "twentieth");
        assert_eq!(spell_ordinal(21), "twenty first");
        assert_eq!(spell_ordinal(100), "one hundredth");
    }

    #[test]
    fn test_currency() {
        let out = squash(&expand_numbers("It costs $4.99 today"));
        assert_eq!(out, "It costs four dollars and ninety nine cents today");
        let out = squash(&expand_numbers("£1"));
        assert_eq!(out, "one pound");
        let out = squash(&expand_numbers("$2.5"));
        assert_eq!(out, "two dollars and fifty cents");
        let out = squash(&expand_numbers("That was $3.25."));
        assert_eq!(out, "That was three dollars and twenty five cents.");
    }

    #[test]
    fn test_percent_and_decimal() {
        assert_eq!(squash(&expand_numbers("50% off")), "fifty percent off");
        assert_eq!(squash(&expand_numbers("pi is 3.14")), "pi is three point one four");
        assert_eq!(squash(&expand_numbers("12.5%")), "twelve point five percent");
    }

    #[test]
    fn test_grouped_and_ordinal() {
        assert_eq!(squash(&expand_numbers("1,200 people")), "one thousand two hundred people");
        assert_eq!(squash(&expand_numbers("the 2nd try")), "the second try");
    }

    #[test]
    fn test_digits_inside_words_untouched() {
        // Letters directly before a digit run mean it is an identifier, not a count.
        assert_eq!(expand_numbers("mp3"), "mp3");
    }

    #[test]
    fn test_sentence_dot_survives() {
        let out = squash(&expand_numbers("I have 3. You have 4."));
        assert_eq!(out, "I have three . You have four .");
    }
}
