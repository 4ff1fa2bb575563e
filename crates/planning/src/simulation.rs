//! # Stock Simulator
//!
//! Day-by-day stock evolution over the planning period. Within one day
//! arrivals are applied before demands, so a batch arriving on a demand
//! date can satisfy that demand.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{Batch, CriticalPoint, DemandEvent, StockEvolution, StockSeverity};
use mrp_core::calendar::{date_range, days_between, period_days};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub stock_evolution: StockEvolution,
    pub minimum_stock: f64,
    pub minimum_stock_date: NaiveDate,
    pub final_stock: f64,
    pub critical_points: Vec<CriticalPoint>,
    pub stockout_days: usize,
    /// Sum over days of `max(0, -stock)`; the tiebreak metric for
    /// distribution candidates.
    pub stockout_severity: f64,
}

/// Simulate stock over `[period_start, period_end]` for explicit
/// `(arrival_date, quantity)` pairs.
pub fn simulate(
    initial_stock: f64,
    period_start: NaiveDate,
    period_end: NaiveDate,
    arrivals: &[(NaiveDate, f64)],
    events: &[DemandEvent],
) -> SimulationResult {
    let mut arrivals_by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for &(date, quantity) in arrivals {
        *arrivals_by_date.entry(date).or_insert(0.0) += quantity;
    }
    let demand_by_date: BTreeMap<NaiveDate, f64> =
        events.iter().map(|e| (e.date, e.quantity)).collect();

    let total_demand: f64 = events.iter().map(|e| e.quantity).sum();
    let daily_mean = total_demand / period_days(period_start, period_end).max(1) as f64;

    let mut stock = initial_stock;
    let mut stock_evolution = StockEvolution::new();
    let mut minimum_stock = initial_stock;
    let mut minimum_stock_date = period_start;
    let mut critical_points = Vec::new();
    let mut stockout_days = 0;
    let mut stockout_severity = 0.0;

    for day in date_range(period_start, period_end) {
        if let Some(&arrived) = arrivals_by_date.get(&day) {
            stock += arrived;
        }
        if let Some(&demanded) = demand_by_date.get(&day) {
            stock -= demanded;
        }
        stock_evolution.insert(day, stock);

        if stock < minimum_stock {
            minimum_stock = stock;
            minimum_stock_date = day;
        }
        if stock < 0.0 {
            stockout_days += 1;
            stockout_severity += -stock;
        }

        if let Some(severity) = classify_day(stock, daily_mean, day, period_end, &demand_by_date) {
            critical_points.push(CriticalPoint {
                date: day,
                stock,
                days_of_coverage: days_of_coverage(stock, day, period_end, &demand_by_date),
                severity,
            });
        }
    }

    SimulationResult {
        final_stock: stock,
        stock_evolution,
        minimum_stock,
        minimum_stock_date,
        critical_points,
        stockout_days,
        stockout_severity,
    }
}

/// Simulate the real batches of a plan; informative batches never enter
/// the stock accounting.
pub fn simulate_batches(
    initial_stock: f64,
    period_start: NaiveDate,
    period_end: NaiveDate,
    batches: &[Batch],
    events: &[DemandEvent],
) -> SimulationResult {
    let arrivals: Vec<(NaiveDate, f64)> = batches
        .iter()
        .filter(|b| !b.analytics.informative_batch)
        .map(|b| (b.arrival_date, b.quantity))
        .collect();
    simulate(initial_stock, period_start, period_end, &arrivals, events)
}

fn classify_day(
    stock: f64,
    daily_mean: f64,
    day: NaiveDate,
    period_end: NaiveDate,
    demand_by_date: &BTreeMap<NaiveDate, f64>,
) -> Option<StockSeverity> {
    if stock < 0.0 {
        return Some(StockSeverity::Stockout);
    }
    if daily_mean <= 0.0 {
        return None;
    }
    if stock < daily_mean {
        return Some(StockSeverity::Critical);
    }
    if stock < 2.0 * daily_mean
        && days_of_coverage(stock, day, period_end, demand_by_date) < 5.0
    {
        return Some(StockSeverity::Warning);
    }
    None
}

/// Days until forward demand exhausts the given stock, capped at the end
/// of the period.
fn days_of_coverage(
    stock: f64,
    from: NaiveDate,
    period_end: NaiveDate,
    demand_by_date: &BTreeMap<NaiveDate, f64>,
) -> f64 {
    if stock <= 0.0 {
        return 0.0;
    }
    let mut remaining = stock;
    for (&date, &quantity) in demand_by_date.range(from..) {
        if date <= from {
            continue;
        }
        remaining -= quantity;
        if remaining < 0.0 {
            return days_between(from, date) as f64;
        }
    }
    days_between(from, period_end) as f64
}
