//! Catalog response payloads
//!
//! Mirrors the JSON the catalog returns. Nearly every field is nullable
//! upstream, so everything here is optional and collapses into the
//! [`fg_core`] model on conversion.

use serde::Deserialize;

use fg_core::{Appearance, CandidateCharacter, CharacterName, CoverImage, Media, MediaTitle, Role};

/// GraphQL response envelope
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default)]
    pub status: Option<u16>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// MEDIA PAGE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
pub struct PageData {
    #[serde(rename = "Page")]
    pub page: Option<PageBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageBody {
    pub page_info: Option<PageInfo>,
    #[serde(default)]
    pub media: Option<Vec<Option<MediaRefWire>>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub has_next_page: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct MediaRefWire {
    pub id: u64,
    pub popularity: Option<u32>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// MEDIA CHARACTERS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
pub struct MediaData {
    #[serde(rename = "Media")]
    pub media: Option<MediaCharactersWire>,
}

#[derive(Debug, Deserialize)]
pub struct MediaCharactersWire {
    pub characters: Option<CharacterConnection>,
}

#[derive(Debug, Deserialize)]
pub struct CharacterConnection {
    #[serde(default)]
    pub nodes: Option<Vec<Option<CharacterWire>>>,
}

#[derive(Debug, Deserialize)]
pub struct CharacterWire {
    pub id: u64,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub description: Option<String>,
    pub name: Option<NameWire>,
    pub image: Option<ImageWire>,
    pub media: Option<MediaConnection>,
}

#[derive(Debug, Deserialize)]
pub struct NameWire {
    pub full: Option<String>,
    pub native: Option<String>,
    #[serde(default)]
    pub alternative: Option<Vec<Option<String>>>,
}

#[derive(Debug, Deserialize)]
pub struct ImageWire {
    pub large: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MediaConnection {
    #[serde(default)]
    pub edges: Option<Vec<Option<MediaEdge>>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaEdge {
    pub character_role: Option<Role>,
    pub node: Option<MediaWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaWire {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub format: Option<String>,
    pub popularity: Option<u32>,
    pub is_adult: Option<bool>,
    pub title: Option<MediaTitle>,
    pub cover_image: Option<CoverImage>,
}

impl From<MediaWire> for Media {
    fn from(wire: MediaWire) -> Self {
        Media {
            id: wire.id,
            kind: wire.kind,
            format: wire.format,
            popularity: wire.popularity.unwrap_or(0),
            is_adult: wire.is_adult.unwrap_or(false),
            title: wire.title.unwrap_or_default(),
            cover_image: wire.cover_image,
        }
    }
}

impl From<CharacterWire> for CandidateCharacter {
    fn from(wire: CharacterWire) -> Self {
        let name = wire
            .name
            .map(|n| CharacterName {
                full: n.full,
                native: n.native,
                alternative: n.alternative.unwrap_or_default().into_iter().flatten().collect(),
            })
            .unwrap_or_default();

        // Edges without a role or a media node cannot be scored; drop them
        // while keeping the catalog's popularity order.
        let appearances = wire
            .media
            .and_then(|m| m.edges)
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .filter_map(|edge| {
                Some(Appearance {
                    role: edge.character_role?,
                    media: edge.node?.into(),
                })
            })
            .collect();

        CandidateCharacter {
            id: wire.id,
            name,
            age: wire.age,
            gender: wire.gender,
            description: wire.description,
            image: wire.image.and_then(|i| i.large),
            appearances,
        }
    }
}
