//! Canonical vehicle order
//!
//! Vehicles sort by tier, then by display name under a Russian-locale,
//! base-strength collation: case and most diacritics are ignored ("Löwe" and
//! "lowe" are equal, so are "ё" and "е"), "й" stays a letter of its own after
//! "и", and Cyrillic sorts ahead of Latin.

use std::cmp::Ordering;
use unicode_normalization::char::{decompose_canonical, is_combining_mark};
use unicode_normalization::UnicodeNormalization;

use super::Vehicle;

/// Primary collation weight of a single character
///
/// The high bits carry the character group, the low bits the position inside
/// the group, so comparing weights orders by group first.
type Weight = u32;

const GROUP_SHIFT: u32 = 21;

/// Character groups in collation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Group {
    Whitespace = 1,
    Punctuation = 2,
    Symbol = 3,
    Digit = 4,
    Cyrillic = 5,
    Latin = 6,
    Greek = 7,
    Other = 8,
}

/// Punctuation and common symbols in root collation order
const PUNCTUATION_ORDER: &[char] = &[
    '_', '-', '\u{2010}', '\u{2011}', '\u{2012}', '\u{2013}', '\u{2014}', '\u{2015}', ',', ';',
    ':', '!', '?', '.', '\u{2026}', '\'', '\u{2018}', '\u{2019}', '\u{201A}', '"', '\u{201C}',
    '\u{201D}', '\u{201E}', '\u{00AB}', '\u{00BB}', '(', ')', '[', ']', '{', '}', '\u{00A7}',
    '\u{00B6}', '@', '*', '/', '\\', '&', '#', '%', '\u{2030}', '\u{2020}', '\u{2021}', '\u{2022}',
    '`', '\u{00B4}', '\u{02DC}', '^', '\u{00AF}', '+', '<', '=', '>', '\u{00AC}', '|', '~',
    '\u{00A4}', '\u{00A2}', '$', '\u{00A3}', '\u{00A5}', '\u{20AC}',
];

fn pack(group: Group, value: u32) -> Weight {
    ((group as u32) << GROUP_SHIFT) | value
}

fn weight(ch: char) -> Weight {
    if ch.is_whitespace() {
        return pack(Group::Whitespace, u32::from(ch));
    }
    if let Some(position) = PUNCTUATION_ORDER
        .iter()
        .zip(0u32..)
        .find_map(|(p, i)| (*p == ch).then_some(i))
    {
        return pack(Group::Punctuation, position);
    }

    let group = match ch {
        c if c.is_numeric() => Group::Digit,
        '\u{0400}'..='\u{052F}' => Group::Cyrillic,
        c if crate::text::is_latin_letter(c) => Group::Latin,
        '\u{0370}'..='\u{03FF}' => Group::Greek,
        c if !c.is_alphanumeric() => Group::Symbol,
        _ => Group::Other,
    };
    pack(group, u32::from(ch))
}

/// Primary-strength collation key for a name
///
/// Two names with equal keys compare equal under the collation.
pub fn collation_key(name: &str) -> Vec<Weight> {
    let mut key = Vec::with_capacity(name.len());

    for ch in name.nfc().flat_map(char::to_lowercase) {
        match ch {
            // Separate letter in Russian, not и with a breve
            'й' => key.push(weight(ch)),
            'ё' => key.push(weight('е')),
            'ß' => key.extend([weight('s'), weight('s')]),
            _ => decompose_canonical(ch, |part| {
                if !is_combining_mark(part) {
                    key.push(weight(fold_letter(part)));
                }
            }),
        }
    }

    key
}

/// Stroked letters share a primary weight with their base letter
fn fold_letter(ch: char) -> char {
    match ch {
        'ø' => 'o',
        'ł' => 'l',
        'đ' => 'd',
        other => other,
    }
}

/// Compare two names under the catalog collation
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b))
}

/// Total order over vehicles: tier ascending, then collated name
pub fn compare_vehicles(a: &Vehicle, b: &Vehicle) -> Ordering {
    a.tier
        .cmp(&b.tier)
        .then_with(|| compare_names(&a.name, &b.name))
}

/// Sort vehicles into canonical order
///
/// The sort is stable: vehicles that compare equal keep their input order.
pub fn sort_vehicles(vehicles: &mut [Vehicle]) {
    vehicles.sort_by_cached_key(|v| (v.tier, collation_key(&v.name)));
}
