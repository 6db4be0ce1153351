/// String-similarity metrics on a 0-100 scale, built on strsim.
///
/// Three complementary views of the same pair:
/// - `ratio`: whole-string edit similarity
/// - `partial_ratio`: best alignment of the shorter string inside the longer
/// - `token_set_ratio`: word-set overlap, insensitive to order and repeats
///
/// Each returns a whole number in [0, 100]; empty input scores 0.

use std::collections::BTreeSet;

use strsim::normalized_levenshtein;

/// Similarity capability used by the fuzzy matcher. Implementations must be
/// deterministic and return values in [0, 100].
pub trait StringSimilarity: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> f64;
}

/// Best of `ratio`, `partial_ratio` and `token_set_ratio`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrsimSimilarity;

impl StringSimilarity for StrsimSimilarity {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        ratio(a, b).max(partial_ratio(a, b)).max(token_set_ratio(a, b))
    }
}

fn to_percent(similarity: f64) -> f64 {
    (similarity * 100.0).round()
}

pub fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    to_percent(normalized_levenshtein(a, b))
}

pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let (shorter, longer) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    let short_len = shorter.chars().count();
    if short_len == 0 {
        return 0.0;
    }

    let long_chars: Vec<char> = longer.chars().collect();
    if long_chars.len() == short_len {
        return ratio(shorter, longer);
    }

    let mut best = 0.0f64;
    for window in long_chars.windows(short_len) {
        let candidate: String = window.iter().collect();
        let score = normalized_levenshtein(shorter, &candidate);
        if score > best {
            best = score;
            if best >= 1.0 {
                break;
            }
        }
    }
    to_percent(best)
}

/// Lower-case, replace anything non-alphanumeric with a space, split.
fn tokens(s: &str) -> BTreeSet<String> {
    s.chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn joined<'a>(words: impl Iterator<Item = &'a String>) -> String {
    words.map(String::as_str).collect::<Vec<_>>().join(" ")
}

pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let ta = tokens(a);
    let tb = tokens(b);
    if ta.is_empty() || tb.is_empty() {
        return 0.0;
    }

    let common = joined(ta.intersection(&tb));
    let only_a = joined(ta.difference(&tb));
    let only_b = joined(tb.difference(&ta));

    let with_a = format!("{} {}", common, only_a).trim().to_string();
    let with_b = format!("{} {}", common, only_b).trim().to_string();

    ratio(&common, &with_a)
        .max(ratio(&common, &with_b))
        .max(ratio(&with_a, &with_b))
}
