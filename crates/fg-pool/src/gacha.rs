//! Gacha roll
//!
//! Draws a role and a popularity bracket, builds the pool for them and
//! picks one entry uniformly.

use serde::{Deserialize, Serialize};

use fg_catalog::Catalog;
use fg_core::{PoolEntry, PopularityBracket, Role, default_bracket_table, default_role_table};
use fg_locator::BoundaryStore;
use fg_rng::{RandomSource, SelectorResult, WeightTable};

use crate::builder::PoolBuilder;
use crate::error::PoolResult;

fn default_main_only_floor() -> bool {
    true
}

/// Roll tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GachaConfig {
    pub roles: WeightTable<Role>,
    pub brackets: WeightTable<PopularityBracket>,
    /// Force the Main role when the drawn bracket starts at zero
    #[serde(default = "default_main_only_floor")]
    pub main_only_floor: bool,
}

impl GachaConfig {
    /// Production tables
    pub fn production() -> SelectorResult<Self> {
        Ok(Self {
            roles: default_role_table()?,
            brackets: default_bracket_table()?,
            main_only_floor: true,
        })
    }
}

/// Outcome of one roll
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pull {
    pub entry: PoolEntry,
    /// Role the pool was requested for
    pub role: Role,
    pub bracket: PopularityBracket,
    pub page: u32,
    pub pool_size: usize,
}

pub struct Gacha<C, S, R> {
    builder: PoolBuilder<C, S, R>,
    config: GachaConfig,
}

impl<C, S, R> Gacha<C, S, R>
where
    C: Catalog,
    S: BoundaryStore,
    R: RandomSource,
{
    pub fn new(builder: PoolBuilder<C, S, R>, config: GachaConfig) -> Self {
        Self { builder, config }
    }

    pub fn builder(&self) -> &PoolBuilder<C, S, R> {
        &self.builder
    }

    pub fn config(&self) -> &GachaConfig {
        &self.config
    }

    /// Draw the role and bracket for the next pool
    pub fn draw_request(&self) -> (Role, PopularityBracket) {
        let (role, bracket) = self.builder.with_rng(|rng| {
            let role = *self.config.roles.draw(rng).value;
            let bracket = *self.config.brackets.draw(rng).value;
            (role, bracket)
        });

        // Media in the lowest bracket rarely list anyone but main characters
        if self.config.main_only_floor && bracket.lower == 0 {
            return (Role::Main, bracket);
        }

        (role, bracket)
    }

    pub async fn roll(&self) -> PoolResult<Pull> {
        let (role, bracket) = self.draw_request();
        let mut pool = self.builder.acquire_pool(role, &bracket).await?;

        let pool_size = pool.len();
        let index = self.builder.with_rng(|rng| rng.below(pool_size));
        let entry = pool.entries.swap_remove(index);

        log::debug!(
            "[Pool] Rolled {} ({}) from {pool_size} {role} entries in {bracket}",
            entry.character.id,
            entry.rating
        );

        Ok(Pull {
            entry,
            role,
            bracket,
            page: pool.page,
            pool_size,
        })
    }
}
