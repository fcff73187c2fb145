//! Reply tokenizer and text normalization.

/// Characters that split tokens in addition to whitespace.
const SPLIT_PUNCTUATION: &[char] = &[',', '.', '!', '?', ';', ':', '\'', '"'];

/// Split text into lowercase word tokens.
///
/// Splits on whitespace and `, . ! ? ; : ' "`; empty tokens are dropped.
/// Note that apostrophes split contractions (`don't` becomes `don`, `t`).
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| c.is_whitespace() || SPLIT_PUNCTUATION.contains(&c))
        .filter(|token| !token.is_empty())
        .map(|token| token.to_string())
        .collect()
}

/// Fold typographic quotes to ASCII, keeping case.
pub fn fold_quotes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' | '\u{02BC}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            _ => c,
        })
        .collect()
}

/// Lowercase, trim and fold typographic quotes to ASCII.
pub fn normalize(text: &str) -> String {
    fold_quotes(text.trim()).to_lowercase()
}

/// Byte offset of the first whole-word occurrence of `needle` in `haystack`.
///
/// Both arguments are expected to be lowercase already.
pub fn find_word(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    let mut from = 0;
    while let Some(rel) = haystack[from..].find(needle) {
        let start = from + rel;
        let end = start + needle.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return Some(start);
        }
        from = start + haystack[start..].chars().next().map_or(1, |c| c.len_utf8());
    }
    None
}

/// Count whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Keep at most `max_words` words, re-joined with single spaces.
pub fn truncate_words(text: &str, max_words: usize) -> String {
    text.split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}
