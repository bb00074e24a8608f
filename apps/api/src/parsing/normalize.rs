//! Text normalizer. Repairs glyph-spacing artifacts left by PDF text
//! extraction and canonicalizes a few compound terms.
//!
//! Each pass is a function `&str -> String` applied in sequence. The whole
//! pipeline is pure and idempotent: `normalize(normalize(t)) == normalize(t)`.

use std::sync::LazyLock;

use regex::Regex;

/// Canonical spellings for compound terms that PDF extraction tends to split.
/// Applied in order; each pattern is case-insensitive.
static COMPOUND_TERMS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)\bE\s*-?\s*n\s*-?\s*commerce\b", "E-commerce"),
        (r"(?i)\bE\s+commerce\b", "E-commerce"),
        (r"(?i)\bReal\s*-?\s*time\b", "Realtime"),
    ]
    .into_iter()
    .map(|(pattern, canonical)| (Regex::new(pattern).expect("valid regex"), canonical))
    .collect()
});

static MULTI_WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("valid regex"));

static SPACE_BEFORE_PUNCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([,.:;!?])").expect("valid regex"));

/// Run the full normalization pipeline. Empty in, empty out.
pub fn normalize(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let mut result = join_spaced_letters(raw);
    result = canonicalize_compound_terms(&result);
    result = MULTI_WHITESPACE_RE.replace_all(&result, " ").into_owned();
    result = SPACE_BEFORE_PUNCT_RE.replace_all(&result, "$1").into_owned();

    result.trim().to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Pass 1: spaced-out letters
// ────────────────────────────────────────────────────────────────────────────

/// Removes the gap after a single-letter word when it is followed by another
/// single-letter word and then a further letter, so `S o f t ware` becomes
/// `Soft ware`. Ordinary prose (`a big dog`) is left untouched.
fn join_spaced_letters(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        out.push(c);

        let starts_word = i == 0 || !is_word_char(chars[i - 1]);
        if c.is_ascii_alphabetic() && starts_word {
            let gap_end = skip_whitespace(&chars, i + 1);
            if gap_end > i + 1 && single_letter_then_letter(&chars, gap_end) {
                i = gap_end;
                continue;
            }
        }
        i += 1;
    }

    out
}

/// True when `chars[at..]` reads `<letter><whitespace+><letter>`.
fn single_letter_then_letter(chars: &[char], at: usize) -> bool {
    if !chars.get(at).is_some_and(|c| c.is_ascii_alphabetic()) {
        return false;
    }
    let next_word = skip_whitespace(chars, at + 1);
    next_word > at + 1 && chars.get(next_word).is_some_and(|c| c.is_ascii_alphabetic())
}

fn skip_whitespace(chars: &[char], mut at: usize) -> usize {
    while chars.get(at).is_some_and(|c| c.is_whitespace()) {
        at += 1;
    }
    at
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

// ────────────────────────────────────────────────────────────────────────────
// Pass 2: compound terms
// ────────────────────────────────────────────────────────────────────────────

fn canonicalize_compound_terms(text: &str) -> String {
    COMPOUND_TERMS
        .iter()
        .fold(text.to_string(), |acc, (re, canonical)| {
            re.replace_all(&acc, *canonical).into_owned()
        })
}
