//! Pool acquisition against a stub catalog

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use fg_catalog::{Catalog, CatalogError, CatalogResult, MediaPage, MediaRef, QuerySpec};
use fg_core::{Appearance, CandidateCharacter, Media, PopularityBracket, Role};
use fg_locator::{BoundaryCache, MemoryStore};
use fg_pool::{Gacha, GachaConfig, PoolBuilder, PoolConfig, PoolError};
use fg_rng::{FixedSequence, WeightTable};

const MID: PopularityBracket = PopularityBracket::new(50_000, 100_000);

#[derive(Default)]
struct StubCatalog {
    /// Media ids per page; pages not listed return `default_media`
    pages: HashMap<u32, Vec<u64>>,
    default_media: Vec<u64>,
    characters: HashMap<u64, Vec<CandidateCharacter>>,
    /// Leading character requests answered with 429
    rate_limited: Mutex<u32>,
    page_calls: Mutex<Vec<u32>>,
    character_calls: Mutex<Vec<(u64, Role)>>,
}

impl StubCatalog {
    fn page_calls(&self) -> Vec<u32> {
        self.page_calls.lock().clone()
    }
}

impl Catalog for StubCatalog {
    async fn media_page(
        &self,
        _spec: &QuerySpec,
        _bracket: &PopularityBracket,
        page: u32,
    ) -> CatalogResult<MediaPage> {
        self.page_calls.lock().push(page);
        let ids = self.pages.get(&page).unwrap_or(&self.default_media);

        Ok(MediaPage {
            has_next_page: false,
            media: ids
                .iter()
                .map(|&id| MediaRef {
                    id,
                    popularity: Some(75_000),
                })
                .collect(),
        })
    }

    async fn media_characters(
        &self,
        media_id: u64,
        role: Role,
    ) -> CatalogResult<Vec<CandidateCharacter>> {
        self.character_calls.lock().push((media_id, role));

        {
            let mut remaining = self.rate_limited.lock();
            if *remaining > 0 {
                *remaining -= 1;
                return Err(CatalogError::RateLimited);
            }
        }

        Ok(self.characters.get(&media_id).cloned().unwrap_or_default())
    }
}

fn appearance(role: Role, media_id: u64, popularity: u32) -> Appearance {
    Appearance {
        role,
        media: Media {
            id: media_id,
            popularity,
            ..Media::default()
        },
    }
}

fn character(id: u64, appearances: Vec<Appearance>) -> CandidateCharacter {
    CandidateCharacter {
        id,
        appearances,
        ..CandidateCharacter::default()
    }
}

/// `count` distinct characters, ids starting at `first`, each a Main in a
/// 75k-popularity media
fn cast(first: u64, count: u64) -> Vec<CandidateCharacter> {
    (first..first + count)
        .map(|id| character(id, vec![appearance(Role::Main, 10_000 + id, 75_000)]))
        .collect()
}

fn boundaries(last_page: u32) -> Arc<BoundaryCache<MemoryStore>> {
    Arc::new(BoundaryCache::new(MemoryStore::with_entries([(
        MID.key(),
        last_page,
    )])))
}

fn builder(
    catalog: &StubCatalog,
    last_page: u32,
    rolls: Vec<usize>,
) -> PoolBuilder<&StubCatalog, MemoryStore, FixedSequence> {
    PoolBuilder::new(catalog, boundaries(last_page), FixedSequence::new(rolls))
}

fn permissive() -> PoolConfig {
    PoolConfig {
        min_pool_size: 0,
        ..PoolConfig::default()
    }
}

#[tokio::test]
async fn test_small_pool_fails_after_three_cycles() {
    let catalog = StubCatalog {
        default_media: vec![1],
        characters: HashMap::from([(1, cast(1, 10))]),
        ..StubCatalog::default()
    };

    let err = builder(&catalog, 5, vec![0])
        .acquire_pool(Role::Main, &MID)
        .await
        .unwrap_err();

    match err {
        PoolError::TooSmall {
            size, attempts, role, ..
        } => {
            assert_eq!(size, 10);
            assert_eq!(attempts, 3);
            assert_eq!(role, Role::Main);
        }
        other => panic!("expected TooSmall, got {other:?}"),
    }
    assert_eq!(catalog.page_calls().len(), 3);
}

#[tokio::test]
async fn test_large_pool_succeeds_first_attempt() {
    let catalog = StubCatalog {
        default_media: vec![1, 2],
        characters: HashMap::from([(1, cast(1, 8)), (2, cast(100, 8))]),
        ..StubCatalog::default()
    };

    let pool = builder(&catalog, 5, vec![0])
        .acquire_pool(Role::Main, &MID)
        .await
        .unwrap();

    assert_eq!(pool.len(), 16);
    assert_eq!(pool.attempt, 1);
    assert_eq!(catalog.page_calls(), vec![1]);
    assert!(pool.entries.iter().all(|e| e.rating.stars() == 3));
    assert_eq!(
        *catalog.character_calls.lock(),
        vec![(1, Role::Main), (2, Role::Main)]
    );
}

#[tokio::test]
async fn test_retry_samples_a_new_page() {
    let catalog = StubCatalog {
        pages: HashMap::from([(1, vec![1]), (2, vec![1, 2])]),
        characters: HashMap::from([(1, cast(1, 10)), (2, cast(100, 10))]),
        ..StubCatalog::default()
    };

    let pool = builder(&catalog, 2, vec![0, 1])
        .acquire_pool(Role::Main, &MID)
        .await
        .unwrap();

    assert_eq!(catalog.page_calls(), vec![1, 2]);
    assert_eq!(pool.page, 2);
    assert_eq!(pool.attempt, 2);
    assert_eq!(pool.len(), 20);
}

#[tokio::test]
async fn test_page_is_drawn_within_stored_boundary() {
    let catalog = StubCatalog {
        default_media: vec![1],
        characters: HashMap::from([(1, cast(1, 1))]),
        ..StubCatalog::default()
    };

    builder(&catalog, 4, vec![2])
        .with_config(permissive())
        .acquire_pool(Role::Supporting, &MID)
        .await
        .unwrap();

    assert_eq!(catalog.page_calls(), vec![3]);
}

#[tokio::test]
async fn test_canonical_media_outside_bracket_is_dropped() {
    // Queried through a 75k media, but rated by a far more popular Main role
    let drifted = character(
        50,
        vec![
            appearance(Role::Main, 900, 500_000),
            appearance(Role::Supporting, 1, 75_000),
        ],
    );
    let kept = character(51, vec![appearance(Role::Supporting, 1, 75_000)]);

    let catalog = StubCatalog {
        default_media: vec![1],
        characters: HashMap::from([(1, vec![drifted, kept])]),
        ..StubCatalog::default()
    };

    let pool = builder(&catalog, 1, vec![0])
        .with_config(permissive())
        .acquire_pool(Role::Supporting, &MID)
        .await
        .unwrap();

    let ids: Vec<u64> = pool.entries.iter().map(|e| e.character.id).collect();
    assert_eq!(ids, vec![51]);
    assert_eq!(pool.entries[0].rating.stars(), 2);
}

#[tokio::test]
async fn test_duplicates_keep_more_popular_canonical_media() {
    let catalog = StubCatalog {
        default_media: vec![1, 2, 3],
        characters: HashMap::from([
            (1, vec![character(7, vec![appearance(Role::Main, 1, 60_000)])]),
            (2, vec![character(7, vec![appearance(Role::Main, 2, 90_000)])]),
            (3, vec![character(7, vec![appearance(Role::Main, 3, 90_000)])]),
        ]),
        ..StubCatalog::default()
    };

    let pool = builder(&catalog, 1, vec![0])
        .with_config(permissive())
        .acquire_pool(Role::Main, &MID)
        .await
        .unwrap();

    assert_eq!(pool.len(), 1);
    // 90k beats 60k; the equal 90k that follows does not overwrite
    assert_eq!(pool.entries[0].media.id, 2);
}

#[tokio::test]
async fn test_adult_canonical_media_is_dropped() {
    let mut adult = character(8, vec![appearance(Role::Main, 1, 75_000)]);
    adult.appearances[0].media.is_adult = true;

    let catalog = StubCatalog {
        default_media: vec![1],
        characters: HashMap::from([(1, vec![adult, cast(9, 1).remove(0)])]),
        ..StubCatalog::default()
    };

    let pool = builder(&catalog, 1, vec![0])
        .with_config(permissive())
        .acquire_pool(Role::Main, &MID)
        .await
        .unwrap();

    let ids: Vec<u64> = pool.entries.iter().map(|e| e.character.id).collect();
    assert_eq!(ids, vec![9]);
}

#[tokio::test]
async fn test_entries_ordered_by_rating() {
    let catalog = StubCatalog {
        default_media: vec![1],
        characters: HashMap::from([(
            1,
            vec![
                character(1, vec![appearance(Role::Background, 1, 75_000)]),
                character(2, vec![appearance(Role::Main, 1, 75_000)]),
                character(3, vec![appearance(Role::Supporting, 1, 75_000)]),
                character(4, vec![appearance(Role::Main, 1, 80_000)]),
            ],
        )]),
        ..StubCatalog::default()
    };

    let pool = builder(&catalog, 1, vec![0])
        .with_config(permissive())
        .acquire_pool(Role::Main, &MID)
        .await
        .unwrap();

    let ids: Vec<u64> = pool.entries.iter().map(|e| e.character.id).collect();
    assert_eq!(ids, vec![2, 4, 3, 1]);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limited_character_fetch_is_retried() {
    let catalog = StubCatalog {
        default_media: vec![1],
        characters: HashMap::from([(1, cast(1, 16))]),
        rate_limited: Mutex::new(1),
        ..StubCatalog::default()
    };
    let started = tokio::time::Instant::now();

    let pool = builder(&catalog, 1, vec![0])
        .acquire_pool(Role::Main, &MID)
        .await
        .unwrap();

    assert_eq!(pool.len(), 16);
    assert_eq!(catalog.character_calls.lock().len(), 2);
    assert_eq!(started.elapsed(), Duration::from_secs(60));
}

#[tokio::test]
async fn test_roll_forces_main_in_lowest_bracket() {
    let floor = PopularityBracket::new(0, 50_000);
    let catalog = StubCatalog {
        default_media: vec![1],
        characters: HashMap::from([(
            1,
            (1..=16)
                .map(|id| character(id, vec![appearance(Role::Main, 1, 20_000)]))
                .collect(),
        )]),
        ..StubCatalog::default()
    };

    let config = GachaConfig {
        roles: WeightTable::from_pairs([(100, Role::Background)]).unwrap(),
        brackets: WeightTable::from_pairs([(100, floor)]).unwrap(),
        main_only_floor: true,
    };
    let cache = Arc::new(BoundaryCache::new(MemoryStore::new()));
    let gacha = Gacha::new(
        PoolBuilder::new(&catalog, cache, FixedSequence::new([3])),
        config,
    );

    let pull = gacha.roll().await.unwrap();

    assert_eq!(pull.role, Role::Main);
    assert_eq!(pull.bracket, floor);
    assert_eq!(pull.pool_size, 16);
    assert_eq!(pull.page, 1);
    assert_eq!(pull.entry.rating.stars(), 1);
    assert!(
        catalog
            .character_calls
            .lock()
            .iter()
            .all(|&(_, role)| role == Role::Main)
    );
}

#[tokio::test]
async fn test_roll_keeps_drawn_role_above_floor() {
    let catalog = StubCatalog::default();
    let config = GachaConfig {
        roles: WeightTable::from_pairs([(100, Role::Background)]).unwrap(),
        brackets: WeightTable::from_pairs([(100, MID)]).unwrap(),
        main_only_floor: true,
    };
    let gacha = Gacha::new(builder(&catalog, 1, vec![0]), config);

    assert_eq!(gacha.draw_request(), (Role::Background, MID));
}
