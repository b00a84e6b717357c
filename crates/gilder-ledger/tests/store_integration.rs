//! End-to-end tests for the ledger core against an embedded SQLite store.
//!
//! Unlike a networked backend these need no external services, so nothing
//! here is `#[ignore]`d; every test builds its own in-memory database.

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(clippy::expect_used, clippy::unwrap_used)]

use rust_decimal::Decimal;
use sqlx::Row;
use tokio::task::JoinSet;

use gilder_db::{DatabaseConfig, LedgerPool, PlayerStore};
use gilder_ledger::Economy;
use gilder_types::{PlayerId, PlayerLedgerRecord};

async fn memory_economy() -> (Economy, LedgerPool) {
    // RUST_LOG controls test log output; repeat initialization is fine.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let pool = LedgerPool::connect_and_migrate(&DatabaseConfig::sqlite_in_memory())
        .await
        .expect("in-memory connect failed");
    (Economy::new(pool.clone()), pool)
}

async fn count_rows(pool: &LedgerPool) -> i64 {
    let row = sqlx::query("SELECT COUNT(*) AS n FROM player_ledger")
        .fetch_one(pool.pool())
        .await
        .expect("count query failed");
    row.try_get("n").expect("count column missing")
}

// ---------------------------------------------------------------------------
// Cache-populate protocol
// ---------------------------------------------------------------------------

#[tokio::test]
async fn first_access_returns_zero_and_creates_one_row() {
    let (eco, pool) = memory_economy().await;
    let id = PlayerId::new();

    assert_eq!(eco.balance.get(id).await, Decimal::ZERO);
    assert_eq!(count_rows(&pool).await, 1);

    // Later accesses stay in memory; still exactly one row.
    assert_eq!(eco.balance.get(id).await, Decimal::ZERO);
    assert_eq!(count_rows(&pool).await, 1);
}

#[tokio::test]
async fn populate_reads_existing_row_once() {
    let (eco, pool) = memory_economy().await;
    let id = PlayerId::new();

    // Seed a row directly, as a previous process run would have.
    let store = PlayerStore::new(pool.pool());
    store.insert_default(id).await.expect("seed insert failed");
    let seeded = PlayerLedgerRecord {
        tokens: 77,
        ..PlayerLedgerRecord::zeroed()
    };
    store.save(id, &seeded).await.expect("seed save failed");

    assert_eq!(eco.tokens.get(id).await, 77);
}

// ---------------------------------------------------------------------------
// Floor-at-zero and counter contracts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn set_get_and_negative_floor() {
    let (eco, _pool) = memory_economy().await;
    let id = PlayerId::new();

    eco.balance.set(id, Decimal::new(4_200, 1)).await;
    assert_eq!(eco.balance.get(id).await, Decimal::new(420, 0));

    eco.balance.set(id, Decimal::new(-420, 0)).await;
    assert_eq!(eco.balance.get(id).await, Decimal::ZERO);
}

#[tokio::test]
async fn remove_fails_without_mutating() {
    let (eco, _pool) = memory_economy().await;
    let id = PlayerId::new();

    eco.credits.set(id, 10).await;
    assert!(!eco.credits.remove(id, 11).await);
    assert_eq!(eco.credits.get(id).await, 10);
    assert!(eco.credits.remove(id, 4).await);
    assert_eq!(eco.credits.get(id).await, 6);
}

#[tokio::test]
async fn transfer_matches_remove_then_add() {
    let (eco, _pool) = memory_economy().await;
    let a = PlayerId::new();
    let b = PlayerId::new();

    eco.tokens.set(a, 100).await;
    assert!(eco.tokens.transfer(a, b, 60).await);
    assert_eq!(eco.tokens.get(a).await, 40);
    assert_eq!(eco.tokens.get(b).await, 60);

    assert!(!eco.tokens.transfer(a, b, 41).await);
    assert_eq!(eco.tokens.get(a).await, 40);
    assert_eq!(eco.tokens.get(b).await, 60);
}

// ---------------------------------------------------------------------------
// Progression
// ---------------------------------------------------------------------------

#[tokio::test]
async fn experience_raises_level_and_never_lowers_it() {
    let (eco, _pool) = memory_economy().await;
    let id = PlayerId::new();

    eco.progression.add_experience(id, Decimal::new(250, 0)).await;
    assert_eq!(eco.progression.level(id).await, 2);
    assert_eq!(eco.progression.experience(id).await, Decimal::new(250, 0));

    // Losing experience keeps the earned level floor.
    eco.progression.add_experience(id, Decimal::new(-50, 0)).await;
    assert_eq!(eco.progression.experience(id).await, Decimal::new(200, 0));
    assert_eq!(eco.progression.level(id).await, 2);
}

#[tokio::test]
async fn admin_level_ops_can_lower() {
    let (eco, _pool) = memory_economy().await;
    let id = PlayerId::new();

    eco.progression.add_levels(id, 10).await;
    assert!(eco.progression.remove_levels(id, 4).await);
    assert_eq!(eco.progression.level(id).await, 6);
    assert!(!eco.progression.remove_levels(id, 7).await);
    assert_eq!(eco.progression.level(id).await, 6);
    eco.progression.set_level(id, -5).await;
    assert_eq!(eco.progression.level(id).await, 0);
}

#[tokio::test]
async fn rebirth_gating_and_atomic_reset() {
    let (eco, _pool) = memory_economy().await;
    let id = PlayerId::new();

    assert_eq!(eco.progression.required_level_for(id).await, 50);
    assert_eq!(eco.progression.levels_until_rebirth(id).await, 50);

    eco.progression.set_level(id, 49).await;
    assert!(!eco.progression.can_rebirth(id).await);
    assert!(!eco.progression.rebirth(id).await);
    assert_eq!(eco.progression.level(id).await, 49);
    assert_eq!(eco.progression.rebirths(id).await, 0);

    eco.progression.set_level(id, 50).await;
    eco.progression.add_experience(id, Decimal::new(30, 0)).await;
    assert!(eco.progression.can_rebirth(id).await);
    assert!(eco.progression.rebirth(id).await);
    assert_eq!(eco.progression.rebirths(id).await, 1);
    assert_eq!(eco.progression.level(id).await, 0);
    assert_eq!(eco.progression.experience(id).await, Decimal::ZERO);

    // The schedule stepped up for the next rebirth.
    assert_eq!(eco.progression.required_level_for(id).await, 100);
    eco.progression.set_rebirths(id, 3).await;
    assert_eq!(eco.progression.required_level_for(id).await, 200);
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[tokio::test]
async fn concurrent_removes_succeed_exactly_once() {
    let (eco, _pool) = memory_economy().await;
    let id = PlayerId::new();

    eco.tokens.set(id, 500).await;

    let mut tasks = JoinSet::new();
    for _ in 0..16 {
        let tokens = eco.tokens.clone();
        tasks.spawn(async move { tokens.remove(id, 500).await });
    }

    let mut successes = 0;
    while let Some(result) = tasks.join_next().await {
        if result.expect("remove task panicked") {
            successes += 1;
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(eco.tokens.get(id).await, 0);
}

#[tokio::test]
async fn concurrent_rebirths_succeed_exactly_once() {
    let (eco, _pool) = memory_economy().await;
    let id = PlayerId::new();

    eco.progression.set_level(id, 50).await;

    let mut tasks = JoinSet::new();
    for _ in 0..8 {
        let progression = eco.progression.clone();
        tasks.spawn(async move { progression.rebirth(id).await });
    }

    let mut successes = 0;
    while let Some(result) = tasks.join_next().await {
        if result.expect("rebirth task panicked") {
            successes += 1;
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(eco.progression.rebirths(id).await, 1);
}

// ---------------------------------------------------------------------------
// Shutdown flush
// ---------------------------------------------------------------------------

#[tokio::test]
async fn flush_all_lands_cached_snapshots() {
    let (eco, pool) = memory_economy().await;
    let a = PlayerId::new();
    let b = PlayerId::new();

    eco.balance.set(a, Decimal::new(1_250, 1)).await;
    eco.tokens.set(a, 3).await;
    eco.progression.add_experience(b, Decimal::new(250, 0)).await;

    eco.store().flush_all().await;

    let store = PlayerStore::new(pool.pool());
    let row_a = store.fetch(a).await.expect("fetch failed").unwrap();
    assert_eq!(row_a.balance, Decimal::new(125, 0));
    assert_eq!(row_a.tokens, 3);

    let row_b = store.fetch(b).await.expect("fetch failed").unwrap();
    assert_eq!(row_b.level, 2);
    assert_eq!(row_b.experience, Decimal::new(250, 0));
}
