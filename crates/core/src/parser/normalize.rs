//! Series name normalization.

/// Leading articles stripped from extracted names.
const LEADING_ARTICLES: &[&str] = &["the", "a", "an", "le", "la", "les"];

/// Names that are too generic to identify a series.
const GENERIC_WORDS: &[&str] = &[
    "book",
    "novel",
    "story",
    "tale",
    "the",
    "a",
    "an",
    "and",
    "or",
    "of",
    "in",
    "journal",
    "proceedings",
    "thesis",
    // Bare series markers left over when a title is only a marker.
    "series",
    "saga",
    "chronicles",
    "trilogy",
    "quartet",
    "cycle",
    "collection",
    "volume",
    "omnibus",
];

const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '-', '–', '—', '(', '[', '/'];

const QUOTES: &[char] = &['"', '“', '”', '«', '»'];

/// Normalize a captured series name.
///
/// Returns `None` when the result is generic, shorter than two characters,
/// or has no letters.
pub fn normalize_name(raw: &str) -> Option<String> {
    let mut name = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    loop {
        let before = name.len();

        name = name
            .trim_end_matches(|c: char| TRAILING_PUNCTUATION.contains(&c) || c.is_whitespace())
            .trim_matches(|c: char| QUOTES.contains(&c) || c.is_whitespace())
            .to_string();

        if let Some(rest) = strip_leading_article(&name) {
            name = rest.to_string();
        }

        if name.len() == before {
            break;
        }
    }

    if is_acceptable(&name) {
        Some(name)
    } else {
        None
    }
}

/// Whether a name passes the acceptance filter unchanged.
pub fn is_valid_name(name: &str) -> bool {
    normalize_name(name).as_deref() == Some(name)
}

fn strip_leading_article(name: &str) -> Option<&str> {
    let (first, rest) = name.split_once(' ')?;
    let first = first.to_lowercase();
    if LEADING_ARTICLES.contains(&first.as_str()) && !rest.trim().is_empty() {
        Some(rest.trim_start())
    } else {
        None
    }
}

fn is_acceptable(name: &str) -> bool {
    if name.chars().count() < 2 {
        return false;
    }
    if !name.chars().any(char::is_alphabetic) {
        return false;
    }
    let lower = name.to_lowercase();
    !GENERIC_WORDS.contains(&lower.as_str())
}
