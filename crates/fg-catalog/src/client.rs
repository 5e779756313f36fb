//! Catalog trait and the AniList GraphQL client

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use fg_core::{CandidateCharacter, PopularityBracket, Role};

use crate::error::{CatalogError, CatalogResult};
use crate::query::{
    QuerySpec, media_characters_document, media_page_document, media_page_variables,
};
use crate::wire::{Envelope, MediaData, PageData};

/// Public AniList GraphQL endpoint
pub const ANILIST_ENDPOINT: &str = "https://graphql.anilist.co";

/// HTTP status the catalog uses for rate limiting
const TOO_MANY_REQUESTS: u16 = 429;

/// Longest response body kept in an error message
const MAX_ERROR_BODY: usize = 512;

// ═══════════════════════════════════════════════════════════════════════════════
// CATALOG TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// A media id on a catalog page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub id: u64,
    pub popularity: Option<u32>,
}

/// One page of the filtered media list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPage {
    pub has_next_page: bool,
    pub media: Vec<MediaRef>,
}

impl MediaPage {
    pub fn is_empty(&self) -> bool {
        self.media.is_empty()
    }
}

/// Read access to the external catalog
#[allow(async_fn_in_trait)]
pub trait Catalog {
    /// Page `page` (1-based) of media inside `bracket`, filtered and ordered by `spec`
    async fn media_page(
        &self,
        spec: &QuerySpec,
        bracket: &PopularityBracket,
        page: u32,
    ) -> CatalogResult<MediaPage>;

    /// First page of characters with `role` listed under one media
    async fn media_characters(
        &self,
        media_id: u64,
        role: Role,
    ) -> CatalogResult<Vec<CandidateCharacter>>;
}

impl<C: Catalog + ?Sized> Catalog for &C {
    async fn media_page(
        &self,
        spec: &QuerySpec,
        bracket: &PopularityBracket,
        page: u32,
    ) -> CatalogResult<MediaPage> {
        (**self).media_page(spec, bracket, page).await
    }

    async fn media_characters(
        &self,
        media_id: u64,
        role: Role,
    ) -> CatalogResult<Vec<CandidateCharacter>> {
        (**self).media_characters(media_id, role).await
    }
}

impl<C: Catalog + ?Sized> Catalog for Arc<C> {
    async fn media_page(
        &self,
        spec: &QuerySpec,
        bracket: &PopularityBracket,
        page: u32,
    ) -> CatalogResult<MediaPage> {
        (**self).media_page(spec, bracket, page).await
    }

    async fn media_characters(
        &self,
        media_id: u64,
        role: Role,
    ) -> CatalogResult<Vec<CandidateCharacter>> {
        (**self).media_characters(media_id, role).await
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIG
// ═══════════════════════════════════════════════════════════════════════════════

/// Catalog connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// GraphQL endpoint URL
    pub endpoint: String,
    /// Media per page (also the page size the locator measures)
    pub media_per_page: u32,
    /// Characters requested per media
    pub characters_per_page: u32,
    /// Sleep after a 429 before retrying (seconds)
    pub cooldown_secs: u64,
    /// Per-request timeout (seconds)
    pub timeout_secs: u64,
}

impl CatalogConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: ANILIST_ENDPOINT.to_string(),
            media_per_page: 50,
            characters_per_page: 25,
            cooldown_secs: 60,
            timeout_secs: 30,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ANILIST CLIENT
// ═══════════════════════════════════════════════════════════════════════════════

/// GraphQL client for AniList
#[derive(Debug, Clone)]
pub struct AniListClient {
    http: reqwest::Client,
    config: CatalogConfig,
}

impl AniListClient {
    pub fn new(config: CatalogConfig) -> CatalogResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("fable-gacha/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// POST a query document with its variables and decode `data`
    pub async fn request<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> CatalogResult<T> {
        let response = self
            .http
            .post(&self.config.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&serde_json::json!({
                "query": query,
                "variables": variables,
            }))
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        decode_response(status, &body)
    }
}

impl Catalog for AniListClient {
    async fn media_page(
        &self,
        spec: &QuerySpec,
        bracket: &PopularityBracket,
        page: u32,
    ) -> CatalogResult<MediaPage> {
        let query = media_page_document(spec, self.config.media_per_page);
        let data: PageData = self
            .request(&query, media_page_variables(bracket, page))
            .await?;

        let body = data.page.ok_or(CatalogError::MissingData)?;

        Ok(MediaPage {
            has_next_page: body
                .page_info
                .and_then(|info| info.has_next_page)
                .unwrap_or(false),
            media: body
                .media
                .unwrap_or_default()
                .into_iter()
                .flatten()
                .map(|m| MediaRef {
                    id: m.id,
                    popularity: m.popularity,
                })
                .collect(),
        })
    }

    async fn media_characters(
        &self,
        media_id: u64,
        role: Role,
    ) -> CatalogResult<Vec<CandidateCharacter>> {
        let query = media_characters_document(self.config.characters_per_page);
        let data: MediaData = self
            .request(
                &query,
                serde_json::json!({ "id": media_id, "role": role.as_str() }),
            )
            .await?;

        Ok(data
            .media
            .and_then(|m| m.characters)
            .and_then(|c| c.nodes)
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .map(CandidateCharacter::from)
            .collect())
    }
}

/// Classify a raw catalog response.
///
/// 429 (as an HTTP status or as a GraphQL error status) is rate limiting;
/// any other non-2xx status or a non-empty `errors` array is a failure.
pub fn decode_response<T: DeserializeOwned>(status: u16, body: &str) -> CatalogResult<T> {
    if status == TOO_MANY_REQUESTS {
        return Err(CatalogError::RateLimited);
    }

    let envelope: Result<Envelope<T>, _> = serde_json::from_str(body);

    if !(200..300).contains(&status) {
        if let Ok(Envelope {
            errors: Some(errors),
            ..
        }) = &envelope
        {
            if errors.iter().any(|e| e.status == Some(TOO_MANY_REQUESTS)) {
                return Err(CatalogError::RateLimited);
            }
        }

        return Err(CatalogError::Http {
            status,
            body: truncate(body, MAX_ERROR_BODY),
        });
    }

    let envelope = envelope?;

    if let Some(errors) = envelope.errors.filter(|e| !e.is_empty()) {
        if errors.iter().any(|e| e.status == Some(TOO_MANY_REQUESTS)) {
            return Err(CatalogError::RateLimited);
        }
        return Err(CatalogError::GraphQl(
            errors.into_iter().map(|e| e.message).collect(),
        ));
    }

    envelope.data.ok_or(CatalogError::MissingData)
}

fn truncate(body: &str, max: usize) -> String {
    match body.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &body[..idx]),
        None => body.to_string(),
    }
}
