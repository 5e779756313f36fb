//! Page boundary walk
//!
//! ```text
//!            ┌──────── hasNextPage ────────┐
//!            v                             │
//! start ─► Probe(page) ──► classify ───────┤
//!            ^                │            │
//!            │    empty, no next           │
//!            └──── page - 1 ◄─┘    non-empty, no next ──► Stop(page)
//! ```
//!
//! Rate limits never change state: the same page is retried after the
//! cooldown.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use fg_catalog::{Catalog, CatalogResult, MediaPage, QuerySpec, retry_rate_limited};
use fg_core::PopularityBracket;

use crate::error::LocatorResult;
use crate::store::{BoundaryMap, BoundaryStore, DEFAULT_BOUNDARY};

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIG
// ═══════════════════════════════════════════════════════════════════════════════

/// Locator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Probe budget per bracket before settling on the closest page seen
    pub max_probes: u32,
    /// Sleep after a 429 before retrying the same page (seconds)
    pub cooldown_secs: u64,
}

impl LocatorConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            max_probes: 10_000,
            cooldown_secs: 60,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PROBE RESULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// What a single page fetch says about the boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageProbe {
    /// The catalog reports more pages; move forward
    HasNext,
    /// Past the end; move back
    Overshot,
    /// Last page with media
    Boundary,
}

impl PageProbe {
    pub fn classify(page: &MediaPage) -> Self {
        if page.has_next_page {
            PageProbe::HasNext
        } else if page.is_empty() {
            PageProbe::Overshot
        } else {
            PageProbe::Boundary
        }
    }
}

/// Why a walk ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Found a non-empty page with no successor
    Boundary,
    /// Came back to a page already seen non-empty
    LoopDetected,
    /// Ran out of probes
    ProbeLimit,
    /// Backed off to page 1 and it was empty
    EmptyBracket,
}

/// Result of walking one bracket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocateOutcome {
    pub bracket: PopularityBracket,
    /// Stored page the walk started from, if any
    pub previous: Option<u32>,
    /// Boundary to persist
    pub page: u32,
    /// Pages fetched, not counting rate-limited retries
    pub probes: u32,
    pub reason: StopReason,
}

/// Result of a maintenance run over every bracket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocatorReport {
    pub outcomes: Vec<LocateOutcome>,
    pub boundaries: BoundaryMap,
    /// Whether `boundaries` differs from what was stored (and was written)
    pub changed: bool,
}

// ═══════════════════════════════════════════════════════════════════════════════
// PAGE LOCATOR
// ═══════════════════════════════════════════════════════════════════════════════

/// Finds the last non-empty catalog page for each popularity bracket
#[derive(Debug, Clone)]
pub struct PageLocator<C> {
    catalog: C,
    spec: QuerySpec,
    config: LocatorConfig,
}

impl<C: Catalog> PageLocator<C> {
    pub fn new(catalog: C, spec: QuerySpec, config: LocatorConfig) -> Self {
        Self {
            catalog,
            spec,
            config,
        }
    }

    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    async fn probe(&self, bracket: &PopularityBracket, page: u32) -> CatalogResult<MediaPage> {
        let catalog = &self.catalog;
        let spec = &self.spec;
        retry_rate_limited(self.config.cooldown(), move || {
            catalog.media_page(spec, bracket, page)
        })
        .await
    }

    /// Walk from `start` to the boundary of `bracket`
    pub async fn locate(
        &self,
        bracket: &PopularityBracket,
        start: u32,
    ) -> CatalogResult<LocateOutcome> {
        let key = bracket.key();
        let mut page = start.max(DEFAULT_BOUNDARY);
        // Last page seen holding media, and the last page fetched at all
        let mut best: Option<u32> = None;
        let mut last_probed: Option<u32> = None;
        let mut probes = 0u32;
        let mut visited = HashSet::new();

        let (page, reason) = loop {
            if probes >= self.config.max_probes {
                // A back-off that never saw media keeps the lowest page fetched
                let keep = best.or(last_probed).unwrap_or(page);
                log::warn!(
                    "[Locator] {key}: no boundary after {probes} probes, keeping page {keep}"
                );
                break (keep, StopReason::ProbeLimit);
            }

            let result = self.probe(bracket, page).await?;
            probes += 1;
            last_probed = Some(page);

            let probe = PageProbe::classify(&result);
            log::debug!(
                "[Locator] {key}: page {page} has {} media, next: {} ({probe:?})",
                result.media.len(),
                result.has_next_page
            );

            let revisited = !visited.insert(page);
            if revisited && !result.is_empty() {
                log::warn!(
                    "[Locator] {key}: page {page} claims a next page but the next page is empty"
                );
                break (page, StopReason::LoopDetected);
            }

            match probe {
                PageProbe::HasNext => {
                    if !result.is_empty() {
                        best = Some(page);
                    }
                    page += 1;
                }
                PageProbe::Overshot => {
                    if page <= DEFAULT_BOUNDARY {
                        log::warn!("[Locator] {key}: bracket is empty");
                        break (DEFAULT_BOUNDARY, StopReason::EmptyBracket);
                    }
                    page -= 1;
                }
                PageProbe::Boundary => break (page, StopReason::Boundary),
            }
        };

        Ok(LocateOutcome {
            bracket: *bracket,
            previous: None,
            page,
            probes,
            reason,
        })
    }

    /// Walk every bracket from its stored page and persist the new map if
    /// anything moved.
    ///
    /// Keys for brackets not walked this run are carried over untouched.
    pub async fn run<S, I>(&self, brackets: I, store: &S) -> LocatorResult<LocatorReport>
    where
        S: BoundaryStore + ?Sized,
        I: IntoIterator<Item = PopularityBracket>,
    {
        let stored = store.load()?;
        let mut boundaries = stored.clone();
        let mut outcomes = Vec::new();

        for bracket in brackets {
            let key = bracket.key();
            let previous = stored.get(&key).copied();

            log::info!(
                "[Locator] {key}: previous page is {}",
                previous.unwrap_or(DEFAULT_BOUNDARY)
            );

            let mut outcome = self
                .locate(&bracket, previous.unwrap_or(DEFAULT_BOUNDARY))
                .await?;
            outcome.previous = previous;

            log::info!(
                "[Locator] {key}: last page is {} ({} probes)",
                outcome.page,
                outcome.probes
            );

            boundaries.insert(key, outcome.page);
            outcomes.push(outcome);
        }

        let changed = boundaries != stored;
        if changed {
            log::info!("[Locator] Boundaries changed, writing {} entries", boundaries.len());
            store.save(&boundaries)?;
        } else {
            log::info!("[Locator] No changes");
        }

        Ok(LocatorReport {
            outcomes,
            boundaries,
            changed,
        })
    }
}
