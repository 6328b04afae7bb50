//! Harvest strategies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named query-generation policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Keyword,
    Author,
    Franchise,
    Publisher,
    Language,
    Decade,
    Genre,
    Ordinal,
    Numeric,
}

impl Strategy {
    pub const ALL: [Strategy; 9] = [
        Strategy::Keyword,
        Strategy::Author,
        Strategy::Franchise,
        Strategy::Publisher,
        Strategy::Language,
        Strategy::Decade,
        Strategy::Genre,
        Strategy::Ordinal,
        Strategy::Numeric,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Keyword => "keyword",
            Strategy::Author => "author",
            Strategy::Franchise => "franchise",
            Strategy::Publisher => "publisher",
            Strategy::Language => "language",
            Strategy::Decade => "decade",
            Strategy::Genre => "genre",
            Strategy::Ordinal => "ordinal",
            Strategy::Numeric => "numeric",
        }
    }

    /// Maximum queries planned when no cap is configured.
    pub fn default_cap(&self) -> usize {
        match self {
            Strategy::Keyword => 60,
            Strategy::Author => 80,
            Strategy::Franchise => 120,
            Strategy::Publisher => 60,
            Strategy::Language => 60,
            Strategy::Decade => 75,
            Strategy::Genre => 60,
            Strategy::Ordinal => 150,
            Strategy::Numeric => 150,
        }
    }

    /// Starting confidence for groups found by this strategy.
    ///
    /// Targeted strategies (named franchises, prolific authors) start higher
    /// than broad sweeps whose hits are mostly noise.
    pub fn default_base_score(&self) -> u8 {
        match self {
            Strategy::Franchise => 70,
            Strategy::Author => 65,
            Strategy::Keyword => 60,
            Strategy::Publisher | Strategy::Language | Strategy::Genre | Strategy::Numeric => 55,
            Strategy::Decade | Strategy::Ordinal => 50,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == wanted)
            .ok_or_else(|| format!("unknown strategy: {}", s))
    }
}
