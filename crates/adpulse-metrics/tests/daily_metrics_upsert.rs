use std::sync::Arc;

use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};

use adpulse_connectors::{CampaignUpsert, DailyMetricUpsert, MetricsSink, Platform};
use adpulse_database::test_utils::setup_test_db;
use adpulse_database::DbConnection;
use adpulse_entities::{campaigns, companies, daily_metrics};
use adpulse_metrics::DailyMetricsService;

async fn seed_company(db: &Arc<DbConnection>) -> anyhow::Result<companies::Model> {
    let company = companies::ActiveModel {
        name: Set("Acme Corp".to_string()),
        active: Set(true),
        settings: Set(serde_json::json!({})),
        ..Default::default()
    }
    .insert(db.as_ref())
    .await?;
    Ok(company)
}

fn campaign_upsert(company_id: i32) -> CampaignUpsert {
    CampaignUpsert {
        company_id,
        integration_id: None,
        external_id: "gads-1-search".to_string(),
        name: "Brand Search".to_string(),
        status: "active".to_string(),
        platform: Platform::GoogleAds,
        metadata: serde_json::json!({"daily_budget": 50.0}),
    }
}

fn metric_upsert(company_id: i32, campaign_id: i32) -> DailyMetricUpsert {
    DailyMetricUpsert {
        company_id,
        campaign_id,
        creative_id: None,
        date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        impressions: 1000,
        clicks: 50,
        cost: 100.0,
        leads: 10,
        qualified_leads: 6,
        icp_leads: 3,
        revenue: 500.0,
        deals_closed: 1,
    }
}

#[tokio::test]
async fn test_campaign_upsert_is_idempotent_on_external_id() -> anyhow::Result<()> {
    let db = setup_test_db().await?;
    let company = seed_company(&db).await?;
    let service = DailyMetricsService::new(db.clone());

    let first_id = service.upsert_campaign(campaign_upsert(company.id)).await?;

    let mut renamed = campaign_upsert(company.id);
    renamed.name = "Brand Search v2".to_string();
    let second_id = service.upsert_campaign(renamed).await?;

    assert_eq!(first_id, second_id);

    let rows = campaigns::Entity::find()
        .filter(campaigns::Column::CompanyId.eq(company.id))
        .all(db.as_ref())
        .await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Brand Search v2");

    Ok(())
}

#[tokio::test]
async fn test_daily_metric_resync_overwrites_instead_of_duplicating() -> anyhow::Result<()> {
    let db = setup_test_db().await?;
    let company = seed_company(&db).await?;
    let service = DailyMetricsService::new(db.clone());

    let campaign_id = service.upsert_campaign(campaign_upsert(company.id)).await?;

    service
        .upsert_daily_metric(metric_upsert(company.id, campaign_id))
        .await?;

    // Re-sync of the same day with corrected counters
    let mut corrected = metric_upsert(company.id, campaign_id);
    corrected.impressions = 2000;
    corrected.clicks = 100;
    corrected.cost = 150.0;
    service.upsert_daily_metric(corrected).await?;

    let count = daily_metrics::Entity::find()
        .filter(daily_metrics::Column::CampaignId.eq(campaign_id))
        .count(db.as_ref())
        .await?;
    assert_eq!(count, 1);

    let row = daily_metrics::Entity::find()
        .filter(daily_metrics::Column::CampaignId.eq(campaign_id))
        .one(db.as_ref())
        .await?
        .unwrap();
    assert_eq!(row.impressions, 2000);
    assert_eq!(row.ctr, 5.0);
    assert_eq!(row.cpm, 75.0);
    assert_eq!(row.cpc, 1.5);

    Ok(())
}

#[tokio::test]
async fn test_distinct_creatives_get_distinct_rows() -> anyhow::Result<()> {
    let db = setup_test_db().await?;
    let company = seed_company(&db).await?;
    let service = DailyMetricsService::new(db.clone());

    let campaign_id = service.upsert_campaign(campaign_upsert(company.id)).await?;

    service
        .upsert_daily_metric(metric_upsert(company.id, campaign_id))
        .await?;

    let mut creative_row = metric_upsert(company.id, campaign_id);
    creative_row.creative_id = Some("cr-42".to_string());
    service.upsert_daily_metric(creative_row.clone()).await?;
    // Same creative again must collapse into the existing row
    service.upsert_daily_metric(creative_row).await?;

    let count = daily_metrics::Entity::find()
        .filter(daily_metrics::Column::CampaignId.eq(campaign_id))
        .count(db.as_ref())
        .await?;
    assert_eq!(count, 2);

    Ok(())
}
