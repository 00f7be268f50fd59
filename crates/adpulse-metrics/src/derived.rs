//! Derived advertising metrics
//!
//! All rate metrics collapse to 0.0 when their denominator is zero, so a
//! campaign with no delivery reads as zeros instead of NaN/Inf leaking into
//! stored rows and dashboard aggregates.

/// Rate metrics recomputed whenever a daily row's raw counters change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedMetrics {
    /// Click-through rate, percent
    pub ctr: f64,
    /// Cost per thousand impressions
    pub cpm: f64,
    /// Cost per click
    pub cpc: f64,
    /// Cost per lead
    pub cpl: f64,
    /// Return on ad spend
    pub roas: f64,
}

pub fn compute_derived(
    impressions: i64,
    clicks: i64,
    cost: f64,
    leads: i64,
    revenue: f64,
) -> DerivedMetrics {
    DerivedMetrics {
        ctr: ratio(clicks as f64, impressions as f64) * 100.0,
        cpm: ratio(cost, impressions as f64) * 1000.0,
        cpc: ratio(cost, clicks as f64),
        cpl: ratio(cost, leads as f64),
        roas: ratio(revenue, cost),
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_metrics() {
        let d = compute_derived(1000, 50, 100.0, 10, 500.0);
        assert_eq!(d.ctr, 5.0);
        assert_eq!(d.cpm, 100.0);
        assert_eq!(d.cpc, 2.0);
        assert_eq!(d.cpl, 10.0);
        assert_eq!(d.roas, 5.0);
    }

    #[test]
    fn test_zero_denominators_yield_zero() {
        let d = compute_derived(0, 0, 0.0, 0, 0.0);
        assert_eq!(d.ctr, 0.0);
        assert_eq!(d.cpm, 0.0);
        assert_eq!(d.cpc, 0.0);
        assert_eq!(d.cpl, 0.0);
        assert_eq!(d.roas, 0.0);
    }

    #[test]
    fn test_cost_without_clicks() {
        // Delivery with no clicks: cpm is defined, click-based rates are not
        let d = compute_derived(4000, 0, 12.0, 0, 0.0);
        assert_eq!(d.cpm, 3.0);
        assert_eq!(d.ctr, 0.0);
        assert_eq!(d.cpc, 0.0);
        assert_eq!(d.roas, 0.0);
    }
}
