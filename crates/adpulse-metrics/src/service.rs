//! Daily-metric persistence behind the [`MetricsSink`] seam
//!
//! Campaigns upsert on (company, platform, external id); daily metrics upsert
//! on (company, campaign, creative-or-null, date). The daily-metric key is
//! enforced here with a select-then-write rather than a database unique index
//! because `creative_id` is nullable and SQL unique indexes treat NULLs as
//! distinct.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use tracing::debug;

use adpulse_connectors::{CampaignUpsert, DailyMetricUpsert, MetricsSink};
use adpulse_core::{ServiceError, ServiceResult};
use adpulse_database::DbConnection;
use adpulse_entities::{campaigns, daily_metrics};

use crate::derived::compute_derived;

#[derive(Clone)]
pub struct DailyMetricsService {
    db: Arc<DbConnection>,
}

impl DailyMetricsService {
    pub fn new(db: Arc<DbConnection>) -> Self {
        Self { db }
    }

    async fn find_campaign(
        &self,
        campaign: &CampaignUpsert,
    ) -> ServiceResult<Option<campaigns::Model>> {
        campaigns::Entity::find()
            .filter(campaigns::Column::CompanyId.eq(campaign.company_id))
            .filter(campaigns::Column::Platform.eq(campaign.platform.to_string()))
            .filter(campaigns::Column::ExternalId.eq(campaign.external_id.clone()))
            .one(self.db.as_ref())
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))
    }

    async fn find_daily_metric(
        &self,
        metric: &DailyMetricUpsert,
    ) -> ServiceResult<Option<daily_metrics::Model>> {
        let mut query = daily_metrics::Entity::find()
            .filter(daily_metrics::Column::CompanyId.eq(metric.company_id))
            .filter(daily_metrics::Column::CampaignId.eq(metric.campaign_id))
            .filter(daily_metrics::Column::Date.eq(metric.date));

        query = match &metric.creative_id {
            Some(creative) => query.filter(daily_metrics::Column::CreativeId.eq(creative.clone())),
            None => query.filter(daily_metrics::Column::CreativeId.is_null()),
        };

        query
            .one(self.db.as_ref())
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))
    }
}

#[async_trait]
impl MetricsSink for DailyMetricsService {
    async fn upsert_campaign(&self, campaign: CampaignUpsert) -> ServiceResult<i32> {
        if let Some(existing) = self.find_campaign(&campaign).await? {
            let mut model: campaigns::ActiveModel = existing.clone().into();
            model.integration_id = Set(campaign.integration_id);
            model.name = Set(campaign.name);
            model.status = Set(campaign.status);
            model.metadata = Set(campaign.metadata);

            let updated = model
                .update(self.db.as_ref())
                .await
                .map_err(|e| ServiceError::Database(e.to_string()))?;

            debug!(campaign_id = updated.id, "Updated campaign mirror");
            return Ok(updated.id);
        }

        let model = campaigns::ActiveModel {
            company_id: Set(campaign.company_id),
            integration_id: Set(campaign.integration_id),
            external_id: Set(campaign.external_id),
            name: Set(campaign.name),
            status: Set(campaign.status),
            platform: Set(campaign.platform.to_string()),
            metadata: Set(campaign.metadata),
            ..Default::default()
        };

        let inserted = model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?;

        debug!(campaign_id = inserted.id, "Created campaign mirror");
        Ok(inserted.id)
    }

    async fn upsert_daily_metric(&self, metric: DailyMetricUpsert) -> ServiceResult<()> {
        let derived = compute_derived(
            metric.impressions,
            metric.clicks,
            metric.cost,
            metric.leads,
            metric.revenue,
        );

        if let Some(existing) = self.find_daily_metric(&metric).await? {
            let mut model: daily_metrics::ActiveModel = existing.into();
            model.impressions = Set(metric.impressions);
            model.clicks = Set(metric.clicks);
            model.cost = Set(metric.cost);
            model.leads = Set(metric.leads);
            model.qualified_leads = Set(metric.qualified_leads);
            model.icp_leads = Set(metric.icp_leads);
            model.revenue = Set(metric.revenue);
            model.deals_closed = Set(metric.deals_closed);
            model.ctr = Set(derived.ctr);
            model.cpm = Set(derived.cpm);
            model.cpc = Set(derived.cpc);
            model.cpl = Set(derived.cpl);
            model.roas = Set(derived.roas);

            model
                .update(self.db.as_ref())
                .await
                .map_err(|e| ServiceError::Database(e.to_string()))?;

            return Ok(());
        }

        let model = daily_metrics::ActiveModel {
            company_id: Set(metric.company_id),
            campaign_id: Set(metric.campaign_id),
            creative_id: Set(metric.creative_id),
            date: Set(metric.date),
            impressions: Set(metric.impressions),
            clicks: Set(metric.clicks),
            cost: Set(metric.cost),
            leads: Set(metric.leads),
            qualified_leads: Set(metric.qualified_leads),
            icp_leads: Set(metric.icp_leads),
            revenue: Set(metric.revenue),
            deals_closed: Set(metric.deals_closed),
            ctr: Set(derived.ctr),
            cpm: Set(derived.cpm),
            cpc: Set(derived.cpc),
            cpl: Set(derived.cpl),
            roas: Set(derived.roas),
            ..Default::default()
        };

        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?;

        Ok(())
    }
}
