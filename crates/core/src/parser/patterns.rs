//! Ordered title pattern table.
//!
//! Patterns are tried top to bottom and the first match wins, so the table
//! runs from the most specific shapes to the most permissive ones.

use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::{PatternTier, VolumeHint};

/// How a pattern's volume capture is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VolumeCapture {
    /// `vol` group holds decimal digits.
    Digits,
    /// `vol` group holds an ordinal or number word.
    Word,
    /// Pattern carries no volume.
    Absent,
}

#[derive(Debug)]
pub(crate) struct TitlePattern {
    pub id: u8,
    pub tier: PatternTier,
    pub volume: VolumeCapture,
    pub regex: Regex,
}

/// Volume markers accepted before a number (case-insensitive).
const MARKERS: &str = r"book|volume|vol\.?|tome|tomo|band|bd\.|teil|libro|livre|livro|deel|part|episode|chapter|no\.|nr\.";

/// Ordinal words, with localized variants.
const ORDINALS: &str = r"first|second|third|fourth|fifth|sixth|seventh|eighth|ninth|tenth|final|last|premier|premi[eè]re|deuxi[eè]me|troisi[eè]me|quatri[eè]me|cinqui[eè]me|derni[eè]re?|erste[rns]?|zweite[rns]?|dritte[rns]?|vierte[rns]?|f[uü]nfte[rns]?|letzte[rns]?|primer[oa]?|segund[oa]|tercer[oa]?|cuart[oa]|quint[oa]|[uúÚ]ltim[oa]|prequel";

/// Number words, only trusted after an explicit marker.
const NUMBER_WORDS: &str = r"one|two|three|four|five|six|seven|eight|nine|ten";

fn sources() -> Vec<(u8, PatternTier, VolumeCapture, String)> {
    use PatternTier::*;
    use VolumeCapture::*;

    vec![
        // "Title (Series Name, #3)", "Title (Series Name, Book 3)"
        (
            1,
            A,
            Digits,
            format!(
                r"(?i)^.+?\(\s*(?P<name>[^()#]+?)(?:\s*,?\s*#|[\s,]+(?:{}))\s*(?P<vol>\d{{1,4}})(?:\.\d+)?\s*\)\s*$",
                MARKERS
            ),
        ),
        // "Series Volume 3", "Series, Book 2: Subtitle", "Series (Tome 4)"
        (
            2,
            A,
            Digits,
            format!(
                r"(?i)^(?P<name>.+?)[\s,:;(\[\-–—]+(?:{})\s*(?P<vol>\d{{1,4}})(?:\D.*)?$",
                MARKERS
            ),
        ),
        // "Series #3"
        (
            3,
            A,
            Digits,
            r"^(?P<name>.+?)\s*#\s*(?P<vol>\d{1,4})(?:\D.*)?$".to_string(),
        ),
        // "シリーズ 第3巻", "シリーズ ３巻"
        (
            4,
            A,
            Digits,
            r"^(?P<name>.+?)\s*第?\s*(?P<vol>[0-9０-９]{1,4})\s*巻.*$".to_string(),
        ),
        // "Series (3)"
        (
            5,
            B,
            Digits,
            r"^(?P<name>.+?)\s*\(\s*(?P<vol>\d{1,3})\s*\)\s*$".to_string(),
        ),
        // "Series [3]"
        (
            6,
            B,
            Digits,
            r"^(?P<name>.+?)\s*\[\s*(?P<vol>\d{1,3})\s*\]\s*$".to_string(),
        ),
        // "Series - 3"
        (
            7,
            B,
            Digits,
            r"^(?P<name>.+?)\s+[\-–—]\s*(?P<vol>\d{1,3})\s*$".to_string(),
        ),
        // "Series: 3"
        (
            8,
            B,
            Digits,
            r"^(?P<name>.+?)\s*:\s*(?P<vol>\d{1,3})\s*$".to_string(),
        ),
        // "Series Book One", "Series, tome premier"
        (
            9,
            C,
            Word,
            format!(
                r"(?i)^(?P<name>.+?)[\s,:;(\[\-–—]+(?:book|volume|part|tome|band|teil|libro)\s+(?:the\s+)?(?P<vol>{}|{})\s*[)\]]?\s*$",
                ORDINALS, NUMBER_WORDS
            ),
        ),
        // "Series: The Final Volume", "Series Second Book", "Series: The Prequel"
        (
            10,
            C,
            Word,
            format!(
                r"(?i)^(?P<name>.+?)[\s,:;(\[\-–—]+(?:the\s+)?(?P<vol>{})(?:\s+(?:book|volume|part|tome|band|teil|libro|chapter))?\s*[)\]]?\s*$",
                ORDINALS
            ),
        ),
        // "Series Boxed Set", "Harry Potter Series"
        (
            11,
            D,
            Absent,
            r"(?i)^(?P<name>.+?)[\s,:;\-–—]+(?:the\s+)?(?:complete\s+)?(?:series|collection|box(?:ed)?\s+set|omnibus)\s*$".to_string(),
        ),
        // "The Foo Saga", "Belgariad Chronicles"
        (
            12,
            D,
            Absent,
            r"(?i)^(?P<name>.+?\s+(?:saga|chronicles|trilogy|quartet|cycle))\s*$".to_string(),
        ),
        // "Main Title: Subtitle"
        (
            13,
            E,
            Absent,
            r"^(?P<name>[^:]+?)\s*:\s+\S.*$".to_string(),
        ),
    ]
}

/// The compiled, ordered pattern table.
pub(crate) static PATTERNS: Lazy<Vec<TitlePattern>> = Lazy::new(|| {
    sources()
        .into_iter()
        .filter_map(|(id, tier, volume, source)| match Regex::new(&source) {
            Ok(regex) => Some(TitlePattern {
                id,
                tier,
                volume,
                regex,
            }),
            Err(e) => {
                tracing::error!(pattern_id = id, error = %e, "Invalid title pattern");
                None
            }
        })
        .collect()
});

/// Map an ordinal or number word to a volume hint.
///
/// `None` means the word marks a position with no usable number (prequel).
pub(crate) fn word_volume(word: &str) -> Option<VolumeHint> {
    let word = word.to_lowercase();
    let n = match word.as_str() {
        "first" | "one" | "premier" | "première" | "premiere" | "erste" | "erster"
        | "erstes" | "ersten" | "primer" | "primero" | "primera" => 1,
        "second" | "two" | "deuxième" | "deuxieme" | "zweite" | "zweiter" | "zweites"
        | "zweiten" | "segundo" | "segunda" => 2,
        "third" | "three" | "troisième" | "troisieme" | "dritte" | "dritter" | "drittes"
        | "dritten" | "tercer" | "tercero" | "tercera" => 3,
        "fourth" | "four" | "quatrième" | "quatrieme" | "vierte" | "vierter" | "viertes"
        | "vierten" | "cuarto" | "cuarta" => 4,
        "fifth" | "five" | "cinquième" | "cinquieme" | "fünfte" | "fünfter" | "fünftes"
        | "fünften" | "funfte" | "funfter" | "funftes" | "funften" | "quinto" | "quinta" => 5,
        "sixth" | "six" => 6,
        "seventh" | "seven" => 7,
        "eighth" | "eight" => 8,
        "ninth" | "nine" => 9,
        "tenth" | "ten" => 10,
        "final" | "last" | "dernier" | "dernière" | "derniere" | "letzte"
        | "letzter" | "letztes" | "letzten" | "último" | "última" | "ultimo" | "ultima" => {
            return Some(VolumeHint::Final)
        }
        _ => return None,
    };
    Some(VolumeHint::Number(n))
}
