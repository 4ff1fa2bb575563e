//! # Demand Profiler
//!
//! Statistics over the normalized event list: dispersion, inter-arrival
//! intervals, concentration, peaks, ABC/XYZ classification, and the
//! seasonal/trend markers surfaced by the analytics bundle. Profiling
//! never fails; an empty event list produces a zeroed profile.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::DemandEvent;
use mrp_core::calendar::{days_between, month_key, period_days};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConcentrationLevel {
    Low,    // Demand on fewer than 10% of period days
    Medium, // 10% to 30%
    High,   // More than 30%
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Predictability {
    High,   // cv <= 0.3
    Medium, // cv <= 0.6
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbcClass {
    A, // Within the top 70% of total demand
    B, // Next 20%
    C, // Remaining tail
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum XyzClass {
    X, // cv <= 0.2, stable
    Y, // cv <= 0.5, moderate variability
    Z, // Erratic
}

/// Statistics over the day gaps between consecutive demand dates.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct IntervalStats {
    pub min_days: i64,
    pub max_days: i64,
    pub mean_days: f64,
    pub variance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandProfile {
    pub total_demand: f64,
    pub event_count: usize,
    pub mean: f64,
    pub stdev: f64,
    pub coefficient_of_variation: f64,
    pub max_single_demand: f64,
    /// Total demand spread over every day of the period, not only demand
    /// days. Drives safety-stock caps, reorder points and cost proxies.
    pub mean_daily_demand: f64,
    pub intervals: IntervalStats,
    pub concentration_index: f64,
    pub concentration_level: ConcentrationLevel,
    pub peak_threshold: f64,
    pub peak_dates: Vec<NaiveDate>,
    pub predictability: Predictability,
    pub abc_classes: BTreeMap<NaiveDate, AbcClass>,
    pub xyz_class: XyzClass,
    /// Month key (`YYYY-MM`) -> mean event size relative to the overall
    /// mean. Advisory seasonality marker.
    pub monthly_indices: BTreeMap<String, f64>,
    /// Least-squares slope of event quantities in event order.
    pub trend_slope: f64,
}

/// Profile the normalized demand over the planning period.
pub fn profile_demand(
    events: &[DemandEvent],
    period_start: NaiveDate,
    period_end: NaiveDate,
) -> DemandProfile {
    let event_count = events.len();
    let total_demand: f64 = events.iter().map(|e| e.quantity).sum();
    let mean = if event_count > 0 {
        total_demand / event_count as f64
    } else {
        0.0
    };
    let stdev = sample_stdev(events, mean);
    let coefficient_of_variation = if mean > 0.0 { stdev / mean } else { 0.0 };
    let max_single_demand = events.iter().map(|e| e.quantity).fold(0.0, f64::max);

    let period_len = period_days(period_start, period_end).max(1);
    let mean_daily_demand = total_demand / period_len as f64;

    let intervals = interval_stats(events);

    let concentration_index = event_count as f64 / period_len as f64;
    let concentration_level = if concentration_index < 0.1 {
        ConcentrationLevel::Low
    } else if concentration_index <= 0.3 {
        ConcentrationLevel::Medium
    } else {
        ConcentrationLevel::High
    };

    let peak_threshold = if stdev > 0.0 { mean + stdev } else { mean * 1.5 };
    let peak_dates: Vec<NaiveDate> = events
        .iter()
        .filter(|e| e.quantity > peak_threshold)
        .map(|e| e.date)
        .collect();

    let predictability = if coefficient_of_variation <= 0.3 {
        Predictability::High
    } else if coefficient_of_variation <= 0.6 {
        Predictability::Medium
    } else {
        Predictability::Low
    };

    let xyz_class = if coefficient_of_variation <= 0.2 {
        XyzClass::X
    } else if coefficient_of_variation <= 0.5 {
        XyzClass::Y
    } else {
        XyzClass::Z
    };

    DemandProfile {
        total_demand,
        event_count,
        mean,
        stdev,
        coefficient_of_variation,
        max_single_demand,
        mean_daily_demand,
        intervals,
        concentration_index,
        concentration_level,
        peak_threshold,
        peak_dates,
        predictability,
        abc_classes: classify_abc(events, total_demand),
        xyz_class,
        monthly_indices: monthly_indices(events, mean),
        trend_slope: trend_slope(events),
    }
}

fn sample_stdev(events: &[DemandEvent], mean: f64) -> f64 {
    if events.len() < 2 {
        return 0.0;
    }
    let variance = events
        .iter()
        .map(|e| (e.quantity - mean).powi(2))
        .sum::<f64>()
        / (events.len() - 1) as f64;
    variance.sqrt()
}

fn interval_stats(events: &[DemandEvent]) -> IntervalStats {
    if events.len() < 2 {
        return IntervalStats::default();
    }
    let gaps: Vec<i64> = events
        .windows(2)
        .map(|pair| days_between(pair[0].date, pair[1].date))
        .collect();
    let mean_days = gaps.iter().sum::<i64>() as f64 / gaps.len() as f64;
    let variance = if gaps.len() > 1 {
        gaps.iter()
            .map(|&g| (g as f64 - mean_days).powi(2))
            .sum::<f64>()
            / (gaps.len() - 1) as f64
    } else {
        0.0
    };
    IntervalStats {
        min_days: *gaps.iter().min().expect("non-empty gaps"),
        max_days: *gaps.iter().max().expect("non-empty gaps"),
        mean_days,
        variance,
    }
}

/// Per-event magnitude classes: events sorted by size descending, A while
/// the cumulative share of total demand stays under 70%, B under 90%,
/// C for the tail.
fn classify_abc(events: &[DemandEvent], total_demand: f64) -> BTreeMap<NaiveDate, AbcClass> {
    let mut classes = BTreeMap::new();
    if total_demand <= 0.0 {
        return classes;
    }
    let mut ranked: Vec<&DemandEvent> = events.iter().collect();
    ranked.sort_by(|a, b| {
        b.quantity
            .partial_cmp(&a.quantity)
            .expect("finite quantities")
            .then_with(|| a.date.cmp(&b.date))
    });

    let mut cumulative = 0.0;
    for event in ranked {
        let share_before = cumulative / total_demand;
        let class = if share_before < 0.7 {
            AbcClass::A
        } else if share_before < 0.9 {
            AbcClass::B
        } else {
            AbcClass::C
        };
        classes.insert(event.date, class);
        cumulative += event.quantity;
    }
    classes
}

fn monthly_indices(events: &[DemandEvent], overall_mean: f64) -> BTreeMap<String, f64> {
    let mut by_month: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for event in events {
        by_month
            .entry(month_key(event.date))
            .or_default()
            .push(event.quantity);
    }
    by_month
        .into_iter()
        .map(|(month, quantities)| {
            let month_mean = quantities.iter().sum::<f64>() / quantities.len() as f64;
            let index = if overall_mean > 0.0 {
                month_mean / overall_mean
            } else {
                1.0
            };
            (month, index)
        })
        .collect()
}

fn trend_slope(events: &[DemandEvent]) -> f64 {
    if events.len() < 2 {
        return 0.0;
    }
    let n = events.len() as f64;
    let sum_x: f64 = (0..events.len()).map(|i| i as f64).sum();
    let sum_y: f64 = events.iter().map(|e| e.quantity).sum();
    let sum_xy: f64 = events
        .iter()
        .enumerate()
        .map(|(i, e)| i as f64 * e.quantity)
        .sum();
    let sum_x_squared: f64 = (0..events.len()).map(|i| (i as f64).powi(2)).sum();

    let denominator = n * sum_x_squared - sum_x.powi(2);
    if denominator.abs() < f64::EPSILON {
        return 0.0;
    }
    (n * sum_xy - sum_x * sum_y) / denominator
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(text: &str) -> NaiveDate {
        text.parse().unwrap()
    }

    fn ev(date: &str, quantity: f64) -> DemandEvent {
        DemandEvent {
            date: d(date),
            quantity,
        }
    }

    #[test]
    fn test_empty_profile_is_zeroed() {
        let profile = profile_demand(&[], d("2025-01-01"), d("2025-12-31"));
        assert_eq!(profile.total_demand, 0.0);
        assert_eq!(profile.mean, 0.0);
        assert_eq!(profile.coefficient_of_variation, 0.0);
        assert_eq!(profile.event_count, 0);
        assert!(profile.peak_dates.is_empty());
        assert!(profile.abc_classes.is_empty());
    }

    #[test]
    fn test_basic_statistics() {
        let events = vec![ev("2025-01-10", 100.0), ev("2025-01-20", 300.0)];
        let profile = profile_demand(&events, d("2025-01-01"), d("2025-01-31"));
        assert_eq!(profile.total_demand, 400.0);
        assert_eq!(profile.mean, 200.0);
        assert!((profile.stdev - 141.4213562).abs() < 1e-6);
        assert_eq!(profile.max_single_demand, 300.0);
        assert_eq!(profile.intervals.min_days, 10);
        assert_eq!(profile.intervals.max_days, 10);
        assert!((profile.mean_daily_demand - 400.0 / 31.0).abs() < 1e-9);
    }

    #[test]
    fn test_concentration_levels() {
        let sparse = vec![ev("2025-01-10", 10.0)];
        let profile = profile_demand(&sparse, d("2025-01-01"), d("2025-03-31"));
        assert_eq!(profile.concentration_level, ConcentrationLevel::Low);

        let dense: Vec<DemandEvent> = (1..=20)
            .map(|day| ev(&format!("2025-01-{:02}", day), 10.0))
            .collect();
        let profile = profile_demand(&dense, d("2025-01-01"), d("2025-01-31"));
        assert_eq!(profile.concentration_level, ConcentrationLevel::High);
    }

    #[test]
    fn test_peak_threshold_without_spread_uses_mean_multiple() {
        let events = vec![ev("2025-01-10", 100.0), ev("2025-01-20", 100.0)];
        let profile = profile_demand(&events, d("2025-01-01"), d("2025-01-31"));
        assert_eq!(profile.peak_threshold, 150.0);
        assert!(profile.peak_dates.is_empty());
    }

    #[test]
    fn test_abc_classification() {
        let events = vec![
            ev("2025-01-05", 700.0),
            ev("2025-01-15", 200.0),
            ev("2025-01-25", 100.0),
        ];
        let profile = profile_demand(&events, d("2025-01-01"), d("2025-01-31"));
        assert_eq!(profile.abc_classes[&d("2025-01-05")], AbcClass::A);
        assert_eq!(profile.abc_classes[&d("2025-01-15")], AbcClass::B);
        assert_eq!(profile.abc_classes[&d("2025-01-25")], AbcClass::C);
    }

    #[test]
    fn test_xyz_follows_variation() {
        let steady = vec![ev("2025-01-05", 100.0), ev("2025-01-15", 100.0)];
        let profile = profile_demand(&steady, d("2025-01-01"), d("2025-01-31"));
        assert_eq!(profile.xyz_class, XyzClass::X);
        assert_eq!(profile.predictability, Predictability::High);

        let erratic = vec![
            ev("2025-01-05", 10.0),
            ev("2025-01-15", 500.0),
            ev("2025-01-25", 20.0),
        ];
        let profile = profile_demand(&erratic, d("2025-01-01"), d("2025-01-31"));
        assert_eq!(profile.xyz_class, XyzClass::Z);
        assert_eq!(profile.predictability, Predictability::Low);
    }

    #[test]
    fn test_monthly_indices() {
        let events = vec![
            ev("2025-01-05", 100.0),
            ev("2025-01-25", 100.0),
            ev("2025-02-10", 400.0),
        ];
        let profile = profile_demand(&events, d("2025-01-01"), d("2025-02-28"));
        assert!((profile.monthly_indices["2025-01"] - 0.5).abs() < 1e-9);
        assert!((profile.monthly_indices["2025-02"] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_trend_slope_detects_growth() {
        let events = vec![
            ev("2025-01-05", 100.0),
            ev("2025-01-15", 200.0),
            ev("2025-01-25", 300.0),
        ];
        let profile = profile_demand(&events, d("2025-01-01"), d("2025-01-31"));
        assert!((profile.trend_slope - 100.0).abs() < 1e-9);
    }
}
