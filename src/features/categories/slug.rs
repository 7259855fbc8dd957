use lazy_static::lazy_static;
use regex::Regex;

use crate::shared::constants::{SLUG_MAX_LENGTH, SLUG_MIN_LENGTH};
use crate::shared::validation::SLUG_REGEX;

lazy_static! {
    static ref DISALLOWED_CHARS: Regex = Regex::new(r"[^a-z0-9\s-]").unwrap();
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    static ref HYPHEN_RUN: Regex = Regex::new(r"-+").unwrap();
}

fn transliterate(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}

/// Derive a URL slug from a category name.
///
/// The result is not guaranteed to pass [`is_valid_slug`]: a name with no
/// ASCII-mappable characters yields an empty or one-character slug.
pub fn generate_slug(name: &str) -> String {
    let lowered: String = name.to_lowercase().trim().chars().map(transliterate).collect();
    let stripped = DISALLOWED_CHARS.replace_all(&lowered, "");
    let hyphenated = WHITESPACE_RUN.replace_all(&stripped, "-");
    let collapsed = HYPHEN_RUN.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_string()
}

pub fn is_valid_slug(slug: &str) -> bool {
    (SLUG_MIN_LENGTH..=SLUG_MAX_LENGTH).contains(&slug.len()) && SLUG_REGEX.is_match(slug)
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_generated_slug_is_valid_or_short(name in "\\PC{0,60}") {
            let slug = generate_slug(&name);
            prop_assert!(is_valid_slug(&slug) || slug.len() < SLUG_MIN_LENGTH || slug.len() > SLUG_MAX_LENGTH);
        }

        #[test]
        fn test_generated_slug_is_idempotent(name in "[a-zA-Z0-9áéíóúñç -]{0,40}") {
            let slug = generate_slug(&name);
            prop_assert_eq!(generate_slug(&slug), slug);
        }
    }
}
