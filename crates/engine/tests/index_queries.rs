mod common;

use cache::{Cache, keys};
use common::*;
use engine::{CacheCoordinator, CompositionService, IndexError, PerformanceAggregator};

const TOL: f64 = 1e-9;

#[tokio::test]
async fn performance_query_returns_points_and_summary() {
    let repo = test_repo().await;
    seed_reconstitution_fixture(&repo).await;
    builder(&repo, test_cache(), 2)
        .build(d("2024-01-02"), Some(d("2024-01-03")))
        .await
        .unwrap();

    let aggregator = PerformanceAggregator::new(repo.clone(), test_cache());
    let response = aggregator
        .get_performance(d("2024-01-02"), d("2024-01-03"))
        .await
        .unwrap();

    assert_eq!(response.total_days, 2);
    assert_eq!(response.points.len(), 2);
    assert!((response.summary.total_return - 0.025).abs() < TOL);
    assert!((response.summary.average_daily_return - 0.0125).abs() < TOL);
    assert!((response.summary.max_daily_return - 0.025).abs() < TOL);
    assert_eq!(response.summary.min_daily_return, 0.0);
    assert!(response.summary.volatility > 0.0);
}

#[tokio::test]
async fn performance_query_fails_when_series_is_empty() {
    let repo = test_repo().await;
    let aggregator = PerformanceAggregator::new(repo, test_cache());
    let err = aggregator
        .get_performance(d("2024-01-02"), d("2024-01-03"))
        .await
        .unwrap_err();
    assert!(matches!(err, IndexError::NotFound("performance data", _)));
}

#[tokio::test]
async fn single_point_series_summarizes_to_zeros() {
    let repo = test_repo().await;
    seed_reconstitution_fixture(&repo).await;
    builder(&repo, test_cache(), 2)
        .build(d("2024-01-02"), Some(d("2024-01-03")))
        .await
        .unwrap();

    let aggregator = PerformanceAggregator::new(repo, test_cache());
    let response = aggregator
        .get_performance(d("2024-01-02"), d("2024-01-02"))
        .await
        .unwrap();

    assert_eq!(response.total_days, 1);
    assert_eq!(response.summary.average_daily_return, 0.0);
    assert_eq!(response.summary.volatility, 0.0);
    assert_eq!(response.summary.max_daily_return, 0.0);
    assert_eq!(response.summary.min_daily_return, 0.0);
    assert_eq!(response.summary.sharpe_ratio, 0.0);
}

#[tokio::test]
async fn performance_query_is_served_from_cache_on_repeat() {
    let repo = test_repo().await;
    seed_reconstitution_fixture(&repo).await;
    builder(&repo, test_cache(), 2)
        .build(d("2024-01-02"), Some(d("2024-01-03")))
        .await
        .unwrap();

    let cache = test_cache();
    let aggregator = PerformanceAggregator::new(repo.clone(), cache.clone());
    let first = aggregator
        .get_performance(d("2024-01-02"), d("2024-01-03"))
        .await
        .unwrap();
    assert!(
        cache
            .get(&keys::performance_key(d("2024-01-02"), d("2024-01-03")))
            .await
            .is_some()
    );

    // Wipe the store; the cached payload must still answer.
    repo.delete_index_range(d("2024-01-02"), d("2024-01-03"))
        .await
        .unwrap();
    let second = aggregator
        .get_performance(d("2024-01-02"), d("2024-01-03"))
        .await
        .unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn composition_query_orders_by_market_cap() {
    let repo = test_repo().await;
    seed_reconstitution_fixture(&repo).await;
    builder(&repo, test_cache(), 2)
        .build(d("2024-01-02"), Some(d("2024-01-03")))
        .await
        .unwrap();

    let service = CompositionService::new(repo, test_cache());
    let response = service.get_composition(d("2024-01-03")).await.unwrap();

    assert_eq!(response.total_stocks, 2);
    let tickers: Vec<&str> = response
        .constituents
        .iter()
        .map(|c| c.ticker.as_str())
        .collect();
    assert_eq!(tickers, vec!["AAA", "CCC"]);
    assert_eq!(response.constituents[0].name, "Alpha Corp");
    assert!((response.constituents[0].weight - 0.5).abs() < TOL);
}

#[tokio::test]
async fn composition_query_fails_for_unbuilt_date() {
    let repo = test_repo().await;
    let service = CompositionService::new(repo, test_cache());
    let err = service.get_composition(d("2024-01-02")).await.unwrap_err();
    assert!(matches!(err, IndexError::NotFound("composition data", _)));
}

#[tokio::test]
async fn changes_report_additions_and_removals() {
    let repo = test_repo().await;
    seed_reconstitution_fixture(&repo).await;
    builder(&repo, test_cache(), 2)
        .build(d("2024-01-02"), Some(d("2024-01-03")))
        .await
        .unwrap();

    let service = CompositionService::new(repo, test_cache());
    let response = service
        .get_composition_changes(d("2024-01-02"), d("2024-01-03"))
        .await
        .unwrap();

    assert_eq!(response.total_change_dates, 1);
    let change = &response.changes[0];
    assert_eq!(change.date, d("2024-01-03"));
    assert_eq!(change.added.len(), 1);
    assert_eq!(change.added[0].ticker, "CCC");
    assert_eq!(change.added[0].name, "Gamma Ltd");
    // Market cap of an addition comes from the date it joined on.
    assert_eq!(change.added[0].market_cap, 95e9);
    assert_eq!(change.removed.len(), 1);
    assert_eq!(change.removed[0].ticker, "BBB");
    // Market cap of a removal comes from the last date it was held on.
    assert_eq!(change.removed[0].market_cap, 90e9);
}

#[tokio::test]
async fn unchanged_compositions_produce_no_change_records() {
    let repo = test_repo().await;
    seed_stock(&repo, "AAA", "Alpha Corp").await;
    seed_stock(&repo, "BBB", "Beta Inc").await;
    for date in ["2024-01-02", "2024-01-03", "2024-01-04"] {
        seed_record(&repo, "AAA", date, 10.0, 100e9).await;
        seed_record(&repo, "BBB", date, 20.0, 90e9).await;
    }
    builder(&repo, test_cache(), 2)
        .build(d("2024-01-02"), Some(d("2024-01-04")))
        .await
        .unwrap();

    let service = CompositionService::new(repo, test_cache());
    let response = service
        .get_composition_changes(d("2024-01-02"), d("2024-01-04"))
        .await
        .unwrap();

    assert_eq!(response.total_change_dates, 0);
    assert!(response.changes.is_empty());
}

#[tokio::test]
async fn changes_query_fails_without_compositions() {
    let repo = test_repo().await;
    let service = CompositionService::new(repo, test_cache());
    let err = service
        .get_composition_changes(d("2024-01-02"), d("2024-01-03"))
        .await
        .unwrap_err();
    assert!(matches!(err, IndexError::NotFound("composition data", _)));
}

#[tokio::test]
async fn rebuild_invalidation_is_coarse_for_ranges_and_exact_for_dates() {
    let cache = test_cache();

    // Range-keyed entries from ranges that do NOT overlap the rebuild.
    cache
        .set(
            &keys::performance_key(d("2023-05-01"), d("2023-06-01")),
            "{}",
        )
        .await;
    cache
        .set(&keys::changes_key(d("2023-05-01"), d("2023-06-01")), "{}")
        .await;
    // Composition entries inside and outside the rebuilt range.
    cache.set(&keys::composition_key(d("2024-01-02")), "{}").await;
    cache.set(&keys::composition_key(d("2024-01-03")), "{}").await;
    cache.set(&keys::composition_key(d("2024-03-15")), "{}").await;

    CacheCoordinator::new(cache.clone())
        .invalidate_for_rebuild(d("2024-01-02"), d("2024-01-03"))
        .await;

    // Whole performance and changes namespaces are dropped regardless of range.
    assert!(
        cache
            .get(&keys::performance_key(d("2023-05-01"), d("2023-06-01")))
            .await
            .is_none()
    );
    assert!(
        cache
            .get(&keys::changes_key(d("2023-05-01"), d("2023-06-01")))
            .await
            .is_none()
    );
    // Composition entries are deleted per-day within the range only.
    assert!(cache.get(&keys::composition_key(d("2024-01-02"))).await.is_none());
    assert!(cache.get(&keys::composition_key(d("2024-01-03"))).await.is_none());
    assert!(cache.get(&keys::composition_key(d("2024-03-15"))).await.is_some());
}

#[tokio::test]
async fn build_invalidates_previously_cached_queries() {
    let repo = test_repo().await;
    seed_reconstitution_fixture(&repo).await;
    let cache = test_cache();
    let index_builder = builder(&repo, cache.clone(), 2);
    index_builder
        .build(d("2024-01-02"), Some(d("2024-01-03")))
        .await
        .unwrap();

    let aggregator = PerformanceAggregator::new(repo.clone(), cache.clone());
    aggregator
        .get_performance(d("2024-01-02"), d("2024-01-03"))
        .await
        .unwrap();
    let key = keys::performance_key(d("2024-01-02"), d("2024-01-03"));
    assert!(cache.get(&key).await.is_some());

    index_builder
        .build(d("2024-01-02"), Some(d("2024-01-03")))
        .await
        .unwrap();
    assert!(cache.get(&key).await.is_none());
}
