//! Mocked batch production shared by the reference connectors
//!
//! The reference connectors never call platform APIs; they fabricate a
//! plausible trailing-window batch and push it through the sink. A drop-in
//! replacement backed by a real API keeps the same shape: build campaigns,
//! then one metric row per campaign per day.

use chrono::{Duration, NaiveDate, Utc};
use rand::Rng;

use crate::types::{
    CampaignUpsert, ConnectorError, DailyMetricUpsert, MetricsSink, Platform,
};
use adpulse_entities::integration_configs;

/// Number of trailing days a sync run covers. Re-syncing the window is safe:
/// metric rows are upserted on their composite key.
pub const SYNC_WINDOW_DAYS: i64 = 7;

/// A fabricated platform campaign
pub(crate) struct MockCampaign {
    pub external_id: String,
    pub name: String,
    pub status: &'static str,
    pub daily_budget: f64,
}

/// Per-platform value ranges used to fabricate daily counters
pub(crate) struct MetricProfile {
    pub impressions: (i64, i64),
    /// Click-through rate bounds, percent
    pub ctr_pct: (f64, f64),
    /// Cost per click bounds
    pub cpc: (f64, f64),
    /// Share of clicks that convert to leads
    pub lead_rate: (f64, f64),
    /// Average revenue per closed deal
    pub deal_value: f64,
}

struct DayCounters {
    impressions: i64,
    clicks: i64,
    cost: f64,
    leads: i64,
    qualified_leads: i64,
    icp_leads: i64,
    revenue: f64,
    deals_closed: i64,
}

fn fabricate_day(profile: &MetricProfile) -> DayCounters {
    let mut rng = rand::thread_rng();

    let impressions = rng.gen_range(profile.impressions.0..=profile.impressions.1);
    let ctr = rng.gen_range(profile.ctr_pct.0..=profile.ctr_pct.1);
    let clicks = ((impressions as f64) * ctr / 100.0).round() as i64;
    let cost = (clicks as f64) * rng.gen_range(profile.cpc.0..=profile.cpc.1);
    let leads = ((clicks as f64) * rng.gen_range(profile.lead_rate.0..=profile.lead_rate.1))
        .round() as i64;
    let qualified_leads = (leads as f64 * 0.6).round() as i64;
    let icp_leads = (leads as f64 * 0.3).round() as i64;
    let deals_closed = (leads as f64 * 0.1).round() as i64;
    let revenue = (deals_closed as f64) * profile.deal_value;

    DayCounters {
        impressions,
        clicks,
        cost,
        leads,
        qualified_leads,
        icp_leads,
        revenue,
        deals_closed,
    }
}

fn trailing_window() -> Vec<NaiveDate> {
    let today = Utc::now().date_naive();
    (0..SYNC_WINDOW_DAYS)
        .rev()
        .map(|offset| today - Duration::days(offset))
        .collect()
}

/// Pushes a fabricated batch through the sink and returns the number of rows
/// written (campaigns plus metric rows).
///
/// Counter values are fabricated up front so no RNG handle is held across an
/// await point.
pub(crate) async fn sync_mock_batch(
    integration: &integration_configs::Model,
    platform: Platform,
    catalog: Vec<MockCampaign>,
    profile: &MetricProfile,
    sink: &dyn MetricsSink,
) -> Result<u64, ConnectorError> {
    let window = trailing_window();
    let batch: Vec<(MockCampaign, Vec<DayCounters>)> = catalog
        .into_iter()
        .map(|campaign| {
            let days = window.iter().map(|_| fabricate_day(profile)).collect();
            (campaign, days)
        })
        .collect();

    let mut records = 0u64;

    for (campaign, days) in batch {
        let campaign_id = sink
            .upsert_campaign(CampaignUpsert {
                company_id: integration.company_id,
                integration_id: Some(integration.id),
                external_id: campaign.external_id,
                name: campaign.name,
                status: campaign.status.to_string(),
                platform,
                metadata: serde_json::json!({
                    "daily_budget": campaign.daily_budget,
                    "window_days": SYNC_WINDOW_DAYS,
                }),
            })
            .await
            .map_err(|e| ConnectorError::Sync(e.to_string()))?;
        records += 1;

        for (date, counters) in window.iter().zip(days) {
            sink.upsert_daily_metric(DailyMetricUpsert {
                company_id: integration.company_id,
                campaign_id,
                creative_id: None,
                date: *date,
                impressions: counters.impressions,
                clicks: counters.clicks,
                cost: counters.cost,
                leads: counters.leads,
                qualified_leads: counters.qualified_leads,
                icp_leads: counters.icp_leads,
                revenue: counters.revenue,
                deals_closed: counters.deals_closed,
            })
            .await
            .map_err(|e| ConnectorError::Sync(e.to_string()))?;
            records += 1;
        }
    }

    Ok(records)
}
