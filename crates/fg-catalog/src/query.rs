//! Query shapes and GraphQL documents

use std::fmt;

use serde::{Deserialize, Serialize};

use fg_core::PopularityBracket;

/// Media sort keys understood by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaSort {
    Popularity,
    PopularityDesc,
    TrendingDesc,
    Id,
}

impl MediaSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaSort::Popularity => "POPULARITY",
            MediaSort::PopularityDesc => "POPULARITY_DESC",
            MediaSort::TrendingDesc => "TRENDING_DESC",
            MediaSort::Id => "ID",
        }
    }
}

/// Media formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaFormat {
    Tv,
    TvShort,
    Movie,
    Special,
    Ova,
    Ona,
    Music,
    Manga,
    Novel,
    OneShot,
}

impl MediaFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaFormat::Tv => "TV",
            MediaFormat::TvShort => "TV_SHORT",
            MediaFormat::Movie => "MOVIE",
            MediaFormat::Special => "SPECIAL",
            MediaFormat::Ova => "OVA",
            MediaFormat::Ona => "ONA",
            MediaFormat::Music => "MUSIC",
            MediaFormat::Manga => "MANGA",
            MediaFormat::Novel => "NOVEL",
            MediaFormat::OneShot => "ONE_SHOT",
        }
    }
}

/// Format predicate applied to the media list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "formats")]
pub enum FormatFilter {
    Any,
    In(Vec<MediaFormat>),
    NotIn(Vec<MediaFormat>),
}

/// Filter predicate + sort order for media pages.
///
/// The locator and the pool builder must share one spec: a boundary found
/// under one ordering says nothing about pages under another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySpec {
    pub sort: Vec<MediaSort>,
    pub formats: FormatFilter,
    /// Pass `isAdult: false` to the catalog
    pub exclude_adult: bool,
}

impl QuerySpec {
    /// Trending then popularity, excluding novels, music and specials
    pub fn trending() -> Self {
        Self {
            sort: vec![MediaSort::TrendingDesc, MediaSort::PopularityDesc],
            formats: FormatFilter::NotIn(vec![
                MediaFormat::Novel,
                MediaFormat::Music,
                MediaFormat::Special,
            ]),
            exclude_adult: true,
        }
    }

    /// Ascending popularity over TV, movies and manga only
    pub fn by_popularity() -> Self {
        Self {
            sort: vec![MediaSort::Popularity],
            formats: FormatFilter::In(vec![
                MediaFormat::Tv,
                MediaFormat::Movie,
                MediaFormat::Manga,
            ]),
            exclude_adult: true,
        }
    }

    /// GraphQL argument list for the `media(...)` field, without the
    /// popularity arguments
    pub fn arguments(&self) -> String {
        let mut args = Vec::new();

        if !self.sort.is_empty() {
            args.push(format!("sort: {}", enum_list(self.sort.iter().map(|s| s.as_str()))));
        }

        match &self.formats {
            FormatFilter::Any => {}
            FormatFilter::In(formats) => {
                args.push(format!(
                    "format_in: {}",
                    enum_list(formats.iter().map(|f| f.as_str()))
                ));
            }
            FormatFilter::NotIn(formats) => {
                args.push(format!(
                    "format_not_in: {}",
                    enum_list(formats.iter().map(|f| f.as_str()))
                ));
            }
        }

        if self.exclude_adult {
            args.push("isAdult: false".to_string());
        }

        args.join(", ")
    }
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self::trending()
    }
}

impl fmt::Display for QuerySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.arguments())
    }
}

fn enum_list<'a>(items: impl Iterator<Item = &'a str>) -> String {
    format!("[{}]", items.collect::<Vec<_>>().join(", "))
}

// ═══════════════════════════════════════════════════════════════════════════════
// DOCUMENTS
// ═══════════════════════════════════════════════════════════════════════════════

/// One page of media ids inside a popularity range
pub fn media_page_document(spec: &QuerySpec, per_page: u32) -> String {
    format!(
        r#"query ($page: Int!, $popularity_greater: Int!, $popularity_lesser: Int) {{
  Page(page: $page, perPage: {per_page}) {{
    pageInfo {{
      hasNextPage
    }}
    media(popularity_greater: $popularity_greater, popularity_lesser: $popularity_lesser, {args}) {{
      id
      popularity
    }}
  }}
}}"#,
        per_page = per_page,
        args = spec.arguments(),
    )
}

/// The first page of characters listed under one media.
///
/// Only one page is requested: the nested `hasNextPage` flag is unreliable
/// for this shape, so pools are built from each character's own media list
/// rather than by paging the parent.
pub fn media_characters_document(per_page: u32) -> String {
    format!(
        r#"query ($id: Int!, $role: CharacterRole) {{
  Media(id: $id) {{
    characters(role: $role, sort: [RELEVANCE], page: 1, perPage: {per_page}) {{
      nodes {{
        id
        age
        gender
        description
        name {{
          full
          native
          alternative
        }}
        image {{
          large
        }}
        media(sort: POPULARITY_DESC) {{
          edges {{
            characterRole
            node {{
              id
              type
              format
              popularity
              isAdult
              title {{
                romaji
                english
                native
              }}
              coverImage {{
                large
                color
              }}
            }}
          }}
        }}
      }}
    }}
  }}
}}"#,
        per_page = per_page,
    )
}

/// Variables for [`media_page_document`]
pub fn media_page_variables(bracket: &PopularityBracket, page: u32) -> serde_json::Value {
    serde_json::json!({
        "page": page,
        "popularity_greater": bracket.lower,
        "popularity_lesser": bracket.upper,
    })
}
