//! Summary statistics over a performance series.
//!
//! Pure functions, no I/O. Every edge case (empty or single-point series,
//! zero dispersion) evaluates to 0 rather than dividing by zero.

use crate::report::PerformanceSummary;
use core_types::PerformancePoint;

/// Trading days per year used for annualization.
const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Fixed annual risk-free rate used by the Sharpe ratio.
const RISK_FREE_RATE: f64 = 0.02;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation with the unbiased (N-1) estimator.
/// Defined as 0 for fewer than 2 values.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Annualized Sharpe ratio of a daily-return series.
/// Defined as 0 for fewer than 2 values or zero dispersion.
pub fn sharpe_ratio(daily_returns: &[f64]) -> f64 {
    if daily_returns.len() < 2 {
        return 0.0;
    }
    let std = sample_std(daily_returns);
    if std == 0.0 {
        return 0.0;
    }
    let annual_return = mean(daily_returns) * TRADING_DAYS_PER_YEAR;
    let annual_std = std * TRADING_DAYS_PER_YEAR.sqrt();
    (annual_return - RISK_FREE_RATE) / annual_std
}

/// Derives the summary block for a retrieved performance series.
pub fn summarize(points: &[PerformancePoint]) -> PerformanceSummary {
    let total_return = points.last().map(|p| p.cumulative_return).unwrap_or(0.0);

    if points.len() < 2 {
        return PerformanceSummary {
            total_return,
            average_daily_return: 0.0,
            volatility: 0.0,
            max_daily_return: 0.0,
            min_daily_return: 0.0,
            sharpe_ratio: 0.0,
        };
    }

    let returns: Vec<f64> = points.iter().map(|p| p.daily_return).collect();
    PerformanceSummary {
        total_return,
        average_daily_return: mean(&returns),
        volatility: sample_std(&returns),
        max_daily_return: returns.iter().cloned().fold(f64::MIN, f64::max),
        min_daily_return: returns.iter().cloned().fold(f64::MAX, f64::min),
        sharpe_ratio: sharpe_ratio(&returns),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn point(day: u32, daily_return: f64, cumulative_return: f64) -> PerformancePoint {
        PerformancePoint {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            value: 1000.0 * (1.0 + cumulative_return),
            daily_return,
            cumulative_return,
        }
    }

    #[test]
    fn mean_and_std_of_known_series() {
        let values = [0.01, 0.03, -0.02, 0.02];
        assert!((mean(&values) - 0.01).abs() < 1e-12);
        // variance = (0 + 4 + 9 + 1) * 1e-4 / 3
        let expected_std = (14.0e-4_f64 / 3.0).sqrt();
        assert!((sample_std(&values) - expected_std).abs() < 1e-12);
    }

    #[test]
    fn dispersion_is_zero_below_two_values() {
        assert_eq!(sample_std(&[]), 0.0);
        assert_eq!(sample_std(&[0.05]), 0.0);
        assert_eq!(sharpe_ratio(&[0.05]), 0.0);
    }

    #[test]
    fn sharpe_is_zero_for_constant_returns() {
        assert_eq!(sharpe_ratio(&[0.01, 0.01, 0.01]), 0.0);
    }

    #[test]
    fn sharpe_annualizes_against_risk_free_rate() {
        let returns = [0.01, 0.02];
        let std = sample_std(&returns);
        let expected = (0.015 * 252.0 - 0.02) / (std * 252.0_f64.sqrt());
        assert!((sharpe_ratio(&returns) - expected).abs() < 1e-12);
    }

    #[test]
    fn single_point_summary_is_zeroed_except_total_return() {
        let summary = summarize(&[point(2, 0.0, 0.10)]);
        assert_eq!(summary.total_return, 0.10);
        assert_eq!(summary.average_daily_return, 0.0);
        assert_eq!(summary.volatility, 0.0);
        assert_eq!(summary.max_daily_return, 0.0);
        assert_eq!(summary.min_daily_return, 0.0);
        assert_eq!(summary.sharpe_ratio, 0.0);
    }

    #[test]
    fn summary_covers_only_the_given_series() {
        let points = [
            point(2, 0.0, 0.0),
            point(3, 0.02, 0.02),
            point(4, -0.01, 0.0098),
        ];
        let summary = summarize(&points);
        assert_eq!(summary.total_return, 0.0098);
        assert!((summary.average_daily_return - (0.01 / 3.0)).abs() < 1e-12);
        assert_eq!(summary.max_daily_return, 0.02);
        assert_eq!(summary.min_daily_return, -0.01);
    }
}
