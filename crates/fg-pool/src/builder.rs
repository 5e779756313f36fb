//! Pool acquisition

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use fg_catalog::{Catalog, QuerySpec, retry_rate_limited};
use fg_core::{CandidateCharacter, PoolEntry, PopularityBracket, Role, rate};
use fg_locator::{BoundaryCache, BoundaryStore};
use fg_rng::{RandomSource, uniform_page};

use crate::canonical::canonical_appearance;
use crate::error::{PoolError, PoolResult};

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIG
// ═══════════════════════════════════════════════════════════════════════════════

/// Pool builder settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Fetch cycles before giving up on a small pool
    pub max_attempts: u32,
    /// A pool must hold more than this many entries
    pub min_pool_size: usize,
    /// Sleep after a 429 before retrying (seconds)
    pub cooldown_secs: u64,
}

impl PoolConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            min_pool_size: 15,
            cooldown_secs: 60,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// POOL
// ═══════════════════════════════════════════════════════════════════════════════

/// Eligible, rated characters from one catalog page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pool {
    pub role: Role,
    pub bracket: PopularityBracket,
    /// Page the entries came from
    pub page: u32,
    /// Attempt that produced this pool (1-based)
    pub attempt: u32,
    /// Highest rating first, catalog order otherwise
    pub entries: Vec<PoolEntry>,
}

impl Pool {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Turn a catalog character into a pool entry for `bracket`.
///
/// `None` when the character has no appearances, or its canonical media is
/// adult or outside the bracket. The media page filter only constrains the
/// queried media, not the one the character resolves to.
pub fn resolve_entry(
    character: CandidateCharacter,
    bracket: &PopularityBracket,
) -> Option<PoolEntry> {
    let appearance = canonical_appearance(&character)?.clone();

    if appearance.media.is_adult || !bracket.contains(appearance.media.popularity) {
        return None;
    }

    Some(PoolEntry {
        rating: rate(appearance.role, appearance.media.popularity),
        role: appearance.role,
        media: appearance.media,
        character,
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// POOL BUILDER
// ═══════════════════════════════════════════════════════════════════════════════

/// Builds character pools from random catalog pages
pub struct PoolBuilder<C, S, R> {
    catalog: C,
    boundaries: Arc<BoundaryCache<S>>,
    spec: QuerySpec,
    config: PoolConfig,
    rng: Mutex<R>,
}

impl<C, S, R> PoolBuilder<C, S, R>
where
    C: Catalog,
    S: BoundaryStore,
    R: RandomSource,
{
    pub fn new(catalog: C, boundaries: Arc<BoundaryCache<S>>, rng: R) -> Self {
        Self {
            catalog,
            boundaries,
            spec: QuerySpec::default(),
            config: PoolConfig::default(),
            rng: Mutex::new(rng),
        }
    }

    /// Media filter and order; must match the one boundaries were located with
    pub fn with_spec(mut self, spec: QuerySpec) -> Self {
        self.spec = spec;
        self
    }

    pub fn with_config(mut self, config: PoolConfig) -> Self {
        self.config = config;
        self
    }

    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn boundaries(&self) -> &BoundaryCache<S> {
        &self.boundaries
    }

    /// Run `f` with exclusive access to the random source
    pub fn with_rng<T>(&self, f: impl FnOnce(&mut R) -> T) -> T {
        let mut rng = self.rng.lock();
        f(&mut rng)
    }

    /// Build a pool of `role` characters whose canonical media lies in
    /// `bracket`.
    ///
    /// Each attempt samples a fresh page; nothing carries over between
    /// attempts. Fails with [`PoolError::TooSmall`] when no attempt yields
    /// more than `min_pool_size` entries.
    pub async fn acquire_pool(&self, role: Role, bracket: &PopularityBracket) -> PoolResult<Pool> {
        let last_page = self.boundaries.boundary(bracket)?;
        let max_attempts = self.config.max_attempts.max(1);
        let mut last = (0, 0);

        for attempt in 1..=max_attempts {
            let page = self.with_rng(|rng| uniform_page(rng, last_page));
            let entries = self.collect_page(role, bracket, page).await?;

            log::debug!(
                "[Pool] {role} {bracket}: page {page}/{last_page} gave {} entries (attempt {attempt}/{max_attempts})",
                entries.len()
            );

            if entries.len() > self.config.min_pool_size {
                return Ok(Pool {
                    role,
                    bracket: *bracket,
                    page,
                    attempt,
                    entries,
                });
            }

            if attempt < max_attempts {
                log::warn!(
                    "[Pool] {role} {bracket}: {} entries on page {page} is too few, retrying",
                    entries.len()
                );
            }
            last = (page, entries.len());
        }

        Err(PoolError::TooSmall {
            bracket: *bracket,
            role,
            page: last.0,
            size: last.1,
            attempts: max_attempts,
        })
    }

    /// One fetch cycle: a media page, then the characters of each media in
    /// catalog order.
    async fn collect_page(
        &self,
        role: Role,
        bracket: &PopularityBracket,
        page: u32,
    ) -> PoolResult<Vec<PoolEntry>> {
        let cooldown = self.config.cooldown();
        let catalog = &self.catalog;
        let spec = &self.spec;

        let media_page =
            retry_rate_limited(cooldown, move || catalog.media_page(spec, bracket, page)).await?;

        let mut entries: Vec<PoolEntry> = Vec::new();
        let mut by_id: HashMap<u64, usize> = HashMap::new();

        for media in &media_page.media {
            let media_id = media.id;
            let characters =
                retry_rate_limited(cooldown, move || catalog.media_characters(media_id, role))
                    .await?;

            for entry in characters
                .into_iter()
                .filter_map(|c| resolve_entry(c, bracket))
            {
                match by_id.get(&entry.character.id) {
                    Some(&index) => {
                        if entry.media.popularity > entries[index].media.popularity {
                            entries[index] = entry;
                        }
                    }
                    None => {
                        by_id.insert(entry.character.id, entries.len());
                        entries.push(entry);
                    }
                }
            }
        }

        entries.sort_by(|a, b| b.rating.cmp(&a.rating));
        Ok(entries)
    }
}
