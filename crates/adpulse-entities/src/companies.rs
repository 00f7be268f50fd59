use adpulse_core::DBDateTime;
use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, ConnectionTrait, DbErr};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// URL-safe unique name, derived from `name` when not provided
    #[sea_orm(unique)]
    pub slug: String,
    /// Inactive companies are excluded from scheduled sync sweeps
    pub active: bool,
    pub settings: Json,
    pub created_at: DBDateTime,
    pub updated_at: DBDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::integration_configs::Entity")]
    IntegrationConfigs,
    #[sea_orm(has_many = "super::campaigns::Entity")]
    Campaigns,
    #[sea_orm(has_many = "super::daily_metrics::Entity")]
    DailyMetrics,
}

impl Related<super::integration_configs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IntegrationConfigs.def()
    }
}

impl Related<super::campaigns::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Campaigns.def()
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
            // Derive the slug from the display name when the caller didn't pick one
            if self.slug.is_not_set() {
                if let Set(ref name) = self.name {
                    self.slug = Set(slug::slugify(name));
                }
            }
        } else {
            self.updated_at = Set(now);
        }

        Ok(self)
    }
}
