//! End-to-end planning scenarios over the public engine API.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use mrp_planning::{PlanningEngine, PlanningError, PlanningParameters, UrgencyLevel};

fn d(text: &str) -> NaiveDate {
    text.parse().unwrap()
}

fn demand(entries: &[(&str, f64)]) -> BTreeMap<NaiveDate, f64> {
    entries.iter().map(|&(date, q)| (d(date), q)).collect()
}

#[test]
fn jit_orders_on_demand_days() {
    let params = PlanningParameters::new(0.0, 0, d("2025-01-01"), d("2025-01-31"));
    let raw = demand(&[("2025-01-10", 100.0), ("2025-01-20", 150.0)]);
    let outcome = PlanningEngine::new().plan(&params, &raw).unwrap();

    assert_eq!(outcome.batches.len(), 2);
    let first = &outcome.batches[0];
    assert_eq!(first.order_date, d("2025-01-10"));
    assert_eq!(first.arrival_date, d("2025-01-10"));
    assert_eq!(first.quantity, 100.0);
    assert_eq!(first.analytics.urgency_level, UrgencyLevel::Jit);
    let second = &outcome.batches[1];
    assert_eq!(second.order_date, d("2025-01-20"));
    assert_eq!(second.quantity, 150.0);

    assert_eq!(outcome.analytics.summary.demand_fulfillment_rate, 100.0);
    assert_eq!(outcome.analytics.summary.strategy, "jit");
}

#[test]
fn short_leadtime_consolidates_close_demands() {
    let mut params = PlanningParameters::new(100.0, 5, d("2025-03-01"), d("2025-03-31"));
    params.setup_cost = 250.0;
    params.holding_cost_rate = 0.2;
    let raw = demand(&[("2025-03-10", 500.0), ("2025-03-14", 500.0)]);
    let outcome = PlanningEngine::new().plan(&params, &raw).unwrap();

    assert_eq!(outcome.batches.len(), 1);
    let batch = &outcome.batches[0];
    assert!(batch.arrival_date <= d("2025-03-10"));
    assert!(batch.quantity >= 900.0);
    assert!(batch.analytics.consolidated_group);
    assert_eq!(batch.analytics.group_size, 2);
    assert_eq!(batch.analytics.demands_covered.len(), 2);
}

#[test]
fn long_leadtime_covers_without_stockouts() {
    let mut params = PlanningParameters::new(1908.0, 70, d("2025-05-01"), d("2025-12-31"));
    params.start_cutoff = d("2025-04-01");
    let raw = demand(&[
        ("2025-07-07", 4000.0),
        ("2025-08-27", 4000.0),
        ("2025-10-17", 4000.0),
    ]);
    let outcome = PlanningEngine::new().plan(&params, &raw).unwrap();

    assert!(outcome.batches.len() >= 2);
    assert!(outcome
        .analytics
        .stock_evolution
        .values()
        .all(|&stock| stock >= 0.0));
    assert!(outcome
        .batches
        .iter()
        .any(|b| b.analytics.long_leadtime_optimization));
    for batch in &outcome.batches {
        assert!(batch.order_date >= params.start_cutoff);
        assert!(batch.arrival_date <= params.end_cutoff);
    }
    assert_eq!(outcome.analytics.summary.strategy, "long_hybrid");
}

#[test]
fn exact_quantity_match_balances_to_zero() {
    let mut params = PlanningParameters::new(0.0, 50, d("2025-05-01"), d("2025-12-31"));
    params.exact_quantity_match = true;
    params.ignore_safety_stock = true;
    let raw = demand(&[
        ("2025-07-01", 6500.0),
        ("2025-08-01", 4500.0),
        ("2025-09-01", 2555.0),
    ]);
    let outcome = PlanningEngine::new().plan(&params, &raw).unwrap();

    let produced: f64 = outcome.batches.iter().map(|b| b.quantity).sum();
    assert!((produced - 13555.0).abs() < 1e-6);
    assert!(outcome.analytics.summary.final_stock.abs() < 1e-6);
    assert!(outcome
        .analytics
        .stock_evolution
        .values()
        .all(|&stock| stock >= -1e-6));
}

#[test]
fn informative_batch_leaves_analytics_untouched() {
    let mut params = PlanningParameters::new(200.0, 20, d("2025-07-01"), d("2025-09-30"));
    params.force_informative_batches = true;
    let raw = demand(&[("2025-08-01", 50.0)]);
    let outcome = PlanningEngine::new().plan(&params, &raw).unwrap();

    assert_eq!(outcome.batches.len(), 1);
    assert!(outcome.batches[0].analytics.informative_batch);
    assert_eq!(
        outcome.batches[0].analytics.actual_need.as_deref(),
        Some("none")
    );
    assert_eq!(outcome.analytics.summary.total_batches, 0);
    assert_eq!(outcome.analytics.summary.total_produced, 0.0);
    assert_eq!(outcome.analytics.summary.final_stock, 150.0);
}

#[test]
fn informative_totals_match_a_plain_run() {
    let base = {
        let params = PlanningParameters::new(200.0, 20, d("2025-07-01"), d("2025-09-30"));
        let raw = demand(&[("2025-08-01", 50.0)]);
        PlanningEngine::new().plan(&params, &raw).unwrap()
    };
    assert!(base.batches.is_empty());

    let forced = {
        let mut params = PlanningParameters::new(200.0, 20, d("2025-07-01"), d("2025-09-30"));
        params.force_informative_batches = true;
        let raw = demand(&[("2025-08-01", 50.0)]);
        PlanningEngine::new().plan(&params, &raw).unwrap()
    };

    assert_eq!(
        base.analytics.summary.total_batches,
        forced.analytics.summary.total_batches
    );
    assert_eq!(
        base.analytics.summary.total_produced,
        forced.analytics.summary.total_produced
    );
    assert_eq!(
        base.analytics.summary.final_stock,
        forced.analytics.summary.final_stock
    );
    assert_eq!(
        serde_json::to_string(&base.analytics.stock_evolution).unwrap(),
        serde_json::to_string(&forced.analytics.stock_evolution).unwrap()
    );
}

#[test]
fn forced_excess_batch_is_counted() {
    let mut params = PlanningParameters::new(200.0, 20, d("2025-07-01"), d("2025-09-30"));
    params.force_excess_production = true;
    let raw = demand(&[("2025-08-01", 50.0)]);
    let outcome = PlanningEngine::new().plan(&params, &raw).unwrap();

    assert_eq!(outcome.batches.len(), 1);
    assert!(outcome.batches[0].analytics.excess_production);
    assert_eq!(outcome.analytics.summary.total_batches, 1);
    assert_eq!(outcome.analytics.summary.total_produced, 50.0);
    // 200 initial + 50 produced - 50 demanded.
    assert_eq!(outcome.analytics.summary.final_stock, 200.0);
}

#[test]
fn max_gap_override_collapses_to_one_order() {
    let mut params = PlanningParameters::new(0.0, 30, d("2025-01-01"), d("2025-12-31"));
    params.start_cutoff = d("2024-12-01");
    params.max_gap_days = 365;
    params.max_batch_size = Some(1000.0);
    let raw = demand(&[
        ("2025-01-15", 100.0),
        ("2025-02-20", 80.0),
        ("2025-03-25", 120.0),
        ("2025-05-05", 90.0),
        ("2025-06-28", 110.0),
    ]);
    let outcome = PlanningEngine::new().plan(&params, &raw).unwrap();

    assert_eq!(outcome.batches.len(), 1);
    let batch = &outcome.batches[0];
    assert_eq!(batch.analytics.group_size, 5);
    assert!(batch.analytics.consolidated_group);
    assert!(batch.quantity >= 500.0);
}

#[test]
fn stock_stays_bounded_in_exact_mode() {
    // With buffers off and exact matching on, stock above the largest
    // single demand can only persist within one coverage window.
    let mut params = PlanningParameters::new(0.0, 50, d("2025-05-01"), d("2025-12-31"));
    params.exact_quantity_match = true;
    params.ignore_safety_stock = true;
    let raw = demand(&[
        ("2025-07-01", 6500.0),
        ("2025-08-01", 4500.0),
        ("2025-09-01", 2555.0),
    ]);
    let outcome = PlanningEngine::new().plan(&params, &raw).unwrap();

    let bound = 6500.0_f64.max(params.initial_stock);
    let mut streak = 0i64;
    let mut longest = 0i64;
    for &stock in outcome.analytics.stock_evolution.values() {
        if stock > bound + 1e-6 {
            streak += 1;
            longest = longest.max(streak);
        } else {
            streak = 0;
        }
    }
    assert!(longest <= 45, "stock above bound for {} days", longest);
}

#[test]
fn disabled_consolidation_keeps_batches_apart() {
    let mut params = PlanningParameters::new(0.0, 10, d("2025-01-01"), d("2025-12-31"));
    params.enable_consolidation = false;
    params.max_gap_days = 12;
    let raw = demand(&[
        ("2025-02-01", 300.0),
        ("2025-03-01", 300.0),
        ("2025-04-01", 300.0),
    ]);
    let outcome = PlanningEngine::new().plan(&params, &raw).unwrap();

    assert_eq!(outcome.batches.len(), 3);
    for pair in outcome.batches.windows(2) {
        let gap = (pair[1].arrival_date - pair[0].arrival_date).num_days();
        let window = pair[0].analytics.coverage_days.max(0);
        if gap <= window {
            assert!(gap >= params.leadtime_days);
        }
    }
}

#[test]
fn infeasible_window_reports_analytics() {
    let params = PlanningParameters::new(50.0, 60, d("2025-01-01"), d("2025-01-31"));
    let raw = demand(&[("2025-01-20", 100.0)]);
    let err = PlanningEngine::new().plan(&params, &raw).unwrap_err();

    match err {
        PlanningError::InfeasibleWindow { analytics, .. } => {
            assert_eq!(analytics.summary.total_batches, 0);
            // The uncovered demand shows up as a stockout.
            assert!(analytics.summary.minimum_stock < 0.0);
            assert!(!analytics.critical_points.is_empty());
        }
        other => panic!("expected InfeasibleWindow, got {:?}", other),
    }
}

#[test]
fn empty_demand_is_rejected_without_force_flags() {
    let params = PlanningParameters::new(100.0, 5, d("2025-01-01"), d("2025-01-31"));
    let err = PlanningEngine::new()
        .plan(&params, &BTreeMap::new())
        .unwrap_err();
    assert!(matches!(err, PlanningError::EmptyDemand));
}

#[test]
fn covered_demand_yields_empty_plan() {
    let params = PlanningParameters::new(1000.0, 5, d("2025-01-01"), d("2025-03-31"));
    let raw = demand(&[("2025-02-01", 200.0), ("2025-03-01", 300.0)]);
    let outcome = PlanningEngine::new().plan(&params, &raw).unwrap();

    assert!(outcome.batches.is_empty());
    assert_eq!(outcome.analytics.summary.final_stock, 500.0);
    assert_eq!(outcome.analytics.summary.demand_fulfillment_rate, 100.0);
}

#[test]
fn plans_replay_byte_identically() {
    let mut params = PlanningParameters::new(1908.0, 70, d("2025-05-01"), d("2025-12-31"));
    params.start_cutoff = d("2025-04-01");
    let raw = demand(&[
        ("2025-07-07", 4000.0),
        ("2025-08-27", 4000.0),
        ("2025-10-17", 4000.0),
    ]);
    let engine = PlanningEngine::new();
    let first = engine.plan(&params, &raw).unwrap();
    let second = engine.plan(&params, &raw).unwrap();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
