//! Canonical display names for doctors.

/// Word boundaries for ordinary names.
const DEFAULT_DELIMITERS: &[char] = &[' ', '\t', '\r', '\n', '\x0C', '\x0B'];

/// Word boundaries once the surname carries an `o'` prefix.
const PREFIXED_SURNAME_DELIMITERS: &[char] = &[' ', '\''];

/// Title-cases a free-text name.
///
/// Every character that starts a word is uppercased; the rest keep their
/// case. When the first space-separated token starts with `o'` (any case),
/// the apostrophe also starts a word, so `"o'connor smith"` becomes
/// `"O'Connor Smith"`.
pub fn normalize_name(full_name: &str) -> String {
    let surname = full_name.split(' ').next().unwrap_or_default();

    if has_prefixed_surname(surname) {
        title_case(full_name, PREFIXED_SURNAME_DELIMITERS)
    } else {
        title_case(full_name, DEFAULT_DELIMITERS)
    }
}

fn has_prefixed_surname(word: &str) -> bool {
    word.get(..2)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("o'"))
}

fn title_case(text: &str, delimiters: &[char]) -> String {
    let mut normalized = String::with_capacity(text.len());
    let mut at_word_start = true;

    for ch in text.chars() {
        if at_word_start {
            normalized.extend(ch.to_uppercase());
        } else {
            normalized.push(ch);
        }
        at_word_start = delimiters.contains(&ch);
    }

    normalized
}
