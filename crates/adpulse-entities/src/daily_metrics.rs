use adpulse_core::DBDateTime;
use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, ConnectionTrait, DbErr};
use serde::{Deserialize, Serialize};

/// One row per (company, campaign, creative-or-null, date). Sync runs upsert
/// on that composite key, so re-syncing a day overwrites instead of
/// duplicating. Derived fields (ctr/cpm/cpc/cpl/roas) are recomputed whenever
/// the raw counters change.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "daily_metrics")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub company_id: i32,
    pub campaign_id: i32,
    pub creative_id: Option<String>,
    pub date: Date,
    pub impressions: i64,
    pub clicks: i64,
    pub cost: f64,
    pub leads: i64,
    pub qualified_leads: i64,
    pub icp_leads: i64,
    pub revenue: f64,
    pub deals_closed: i64,
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
    pub created_at: DBDateTime,
    pub updated_at: DBDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyId",
        to = "super::companies::Column::Id"
    )]
    Company,
    #[sea_orm(
        belongs_to = "super::campaigns::Entity",
        from = "Column::CampaignId",
        to = "super::campaigns::Column::Id"
    )]
    Campaign,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::campaigns::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Campaign.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = chrono::Utc::now();

        if insert {
            if self.created_at.is_not_set() {
                self.created_at = Set(now);
            }
            if self.updated_at.is_not_set() {
                self.updated_at = Set(now);
            }
        } else {
            self.updated_at = Set(now);
        }

        Ok(self)
    }
}
