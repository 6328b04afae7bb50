//! Title parsing.
//!
//! Extracts a `(series name, volume)` candidate from a catalog title by
//! trying an ordered pattern table, then normalizing the captured name.

mod normalize;
mod patterns;

pub use normalize::{is_valid_name, normalize_name};

use serde::{Deserialize, Serialize};

use patterns::{word_volume, VolumeCapture, PATTERNS};

/// Pattern specificity tier, most specific first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PatternTier {
    /// Explicit volume markers ("Volume 3", "#3", "第3巻").
    A,
    /// Bracketed or delimited numbers ("(3)", "- 3").
    B,
    /// Ordinal words ("Second", "Final").
    C,
    /// Series-keyword suffix ("Saga", "Series").
    D,
    /// Title-colon-subtitle.
    E,
}

/// Volume information carried by a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeHint {
    /// A positive volume number.
    Number(u32),
    /// The title announces the last volume.
    Final,
}

impl VolumeHint {
    pub fn number(&self) -> Option<u32> {
        match self {
            VolumeHint::Number(n) => Some(*n),
            VolumeHint::Final => None,
        }
    }
}

/// Parser output for one title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTitle {
    /// Normalized series name.
    pub name: String,
    /// Name as captured, before normalization.
    pub raw_name: String,
    /// Volume, when the pattern carries one. Volume 0 is elided.
    pub volume: Option<VolumeHint>,
    /// Id of the pattern that matched.
    pub pattern_id: u8,
    pub tier: PatternTier,
}

/// Parse a title into a series candidate.
///
/// The first matching pattern decides: if its captured name fails
/// normalization the title yields `None` rather than falling through.
pub fn parse_title(title: &str) -> Option<ParsedTitle> {
    let title = title.trim();
    if title.is_empty() {
        return None;
    }

    let (pattern, caps) = PATTERNS
        .iter()
        .find_map(|p| p.regex.captures(title).map(|caps| (p, caps)))?;

    let raw_name = caps.name("name")?.as_str().trim().to_string();
    let name = normalize_name(&raw_name)?;

    let volume = match pattern.volume {
        VolumeCapture::Digits => caps
            .name("vol")
            .and_then(|m| ascii_digits(m.as_str()).parse::<u32>().ok())
            .filter(|n| *n > 0)
            .map(VolumeHint::Number),
        VolumeCapture::Word => caps.name("vol").and_then(|m| word_volume(m.as_str())),
        VolumeCapture::Absent => None,
    };

    Some(ParsedTitle {
        name,
        raw_name,
        volume,
        pattern_id: pattern.id,
        tier: pattern.tier,
    })
}

/// Fold full-width digits (U+FF10..U+FF19) to ASCII.
fn ascii_digits(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '０'..='９' => char::from(b'0' + (c as u32 - '０' as u32) as u8),
            _ => c,
        })
        .collect()
}
