//! Catalog records, brackets and pool entries

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::rating::StarRating;

// ═══════════════════════════════════════════════════════════════════════════════
// ROLE
// ═══════════════════════════════════════════════════════════════════════════════

/// Role of a character within one media
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Main,
    Supporting,
    Background,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Main, Role::Supporting, Role::Background];

    /// Catalog enum name (`MAIN`, `SUPPORTING`, `BACKGROUND`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Main => "MAIN",
            Role::Supporting => "SUPPORTING",
            Role::Background => "BACKGROUND",
        }
    }

    pub fn is_background(&self) -> bool {
        matches!(self, Role::Background)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MAIN" => Ok(Role::Main),
            "SUPPORTING" => Ok(Role::Supporting),
            "BACKGROUND" => Ok(Role::Background),
            _ => Err(CoreError::UnknownRole(s.to_string())),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// POPULARITY BRACKET
// ═══════════════════════════════════════════════════════════════════════════════

/// Inclusive popularity range; `upper: None` is unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PopularityBracket {
    pub lower: u32,
    pub upper: Option<u32>,
}

impl PopularityBracket {
    pub const fn new(lower: u32, upper: u32) -> Self {
        Self {
            lower,
            upper: Some(upper),
        }
    }

    /// Bracket with no upper bound
    pub const fn unbounded(lower: u32) -> Self {
        Self { lower, upper: None }
    }

    pub fn contains(&self, popularity: u32) -> bool {
        popularity >= self.lower && self.upper.is_none_or(|upper| popularity <= upper)
    }

    /// Persistence key, the JSON rendering of `[lower, upper]`.
    ///
    /// An unbounded bracket renders its upper bound as `null`.
    pub fn key(&self) -> String {
        match self.upper {
            Some(upper) => format!("[{},{}]", self.lower, upper),
            None => format!("[{},null]", self.lower),
        }
    }
}

impl fmt::Display for PopularityBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upper {
            Some(upper) => write!(f, "{}..={}", self.lower, upper),
            None => write!(f, "{}..", self.lower),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// MEDIA
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaTitle {
    pub english: Option<String>,
    pub romaji: Option<String>,
    pub native: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverImage {
    pub large: Option<String>,
    pub color: Option<String>,
}

/// An anime/manga entry as referenced by a character appearance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub id: u64,
    /// `ANIME` or `MANGA`
    pub kind: Option<String>,
    /// `TV`, `MOVIE`, `MANGA`, ...
    pub format: Option<String>,
    /// Catalog popularity metric (0 when the catalog reports none)
    pub popularity: u32,
    pub is_adult: bool,
    pub title: MediaTitle,
    pub cover_image: Option<CoverImage>,
}

impl Media {
    /// Non-empty titles, english first, then romaji, then native
    pub fn titles(&self) -> Vec<&str> {
        [&self.title.english, &self.title.romaji, &self.title.native]
            .into_iter()
            .filter_map(|t| t.as_deref())
            .filter(|t| !t.is_empty())
            .collect()
    }

    pub fn display_title(&self) -> Option<&str> {
        self.titles().into_iter().next()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CHARACTER
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterName {
    pub full: Option<String>,
    pub native: Option<String>,
    pub alternative: Vec<String>,
}

impl CharacterName {
    pub fn display(&self) -> Option<&str> {
        self.full.as_deref().or(self.native.as_deref())
    }
}

/// One media a character appears in, with their role there
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appearance {
    pub role: Role,
    pub media: Media,
}

/// A character as returned by the catalog, before pool resolution.
///
/// `appearances` is ordered by descending media popularity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateCharacter {
    pub id: u64,
    pub name: CharacterName,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub appearances: Vec<Appearance>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// POOL ENTRY
// ═══════════════════════════════════════════════════════════════════════════════

/// A rated pull candidate: the character with its canonical media and role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolEntry {
    pub character: CandidateCharacter,
    pub media: Media,
    pub role: Role,
    pub rating: StarRating,
}
