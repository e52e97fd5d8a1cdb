//! Search text normalization
//!
//! Both the query and the vehicle names go through [`normalize`] before the
//! substring comparison, so "Lowe" finds "Löwe" while Cyrillic names are only
//! case folded.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonicalize a string for search comparison
///
/// # Rules
/// 1. Lower-case the whole string
/// 2. Drop combining marks that sit on a Latin base letter
/// 3. Recompose everything else, so non-Latin letters keep their marks
///
/// # Examples
/// ```
/// # use armory_core::text::normalize;
/// assert_eq!(normalize("Löwe"), normalize("Lowe"));
/// assert_eq!(normalize("Bourrasque"), "bourrasque");
/// assert_eq!(normalize("Ёж"), "ёж");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(input: &str) -> String {
    let lowered = input.to_lowercase();
    let mut stripped = String::with_capacity(lowered.len());
    let mut base_is_latin = false;

    for ch in lowered.nfd() {
        if is_combining_mark(ch) {
            if base_is_latin {
                continue;
            }
        } else {
            base_is_latin = is_latin_letter(ch);
        }
        stripped.push(ch);
    }

    stripped.nfc().collect()
}

/// Latin letters, including the Latin-1 supplement and extended blocks
pub(crate) fn is_latin_letter(ch: char) -> bool {
    ch.is_ascii_alphabetic()
        || (matches!(ch, '\u{00C0}'..='\u{024F}' | '\u{1E00}'..='\u{1EFF}')
            && ch != '\u{00D7}'
            && ch != '\u{00F7}')
}
