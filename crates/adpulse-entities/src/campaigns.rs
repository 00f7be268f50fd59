use adpulse_core::DBDateTime;
use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, ConnectionTrait, DbErr};
use serde::{Deserialize, Serialize};

/// A platform campaign mirrored locally. Written by sync runs and also
/// creatable through campaign management CRUD. Keyed by company, not by
/// integration: deleting an integration leaves its campaigns in place.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "campaigns")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub company_id: i32,
    pub integration_id: Option<i32>,
    /// Campaign id on the external platform
    pub external_id: String,
    pub name: String,
    pub status: String,
    pub platform: String,
    /// Free-form campaign metadata: budget, date range
    pub metadata: Json,
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
        belongs_to = "super::integration_configs::Entity",
        from = "Column::IntegrationId",
        to = "super::integration_configs::Column::Id"
    )]
    Integration,
    #[sea_orm(has_many = "super::daily_metrics::Entity")]
    DailyMetrics,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::integration_configs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Integration.def()
    }
}

impl Related<super::daily_metrics::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DailyMetrics.def()
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
