//! Campaign and daily-metric persistence for sync runs

pub mod derived;
mod service;

pub use derived::{compute_derived, DerivedMetrics};
pub use service::DailyMetricsService;
