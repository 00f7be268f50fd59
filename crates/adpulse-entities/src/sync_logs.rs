use adpulse_core::DBDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One record per sync attempt. Created as `started` when the orchestrator
/// begins a run and finalized exactly once as `completed` or `failed`.
/// A process crash mid-run can leave a row orphaned in `started`; there is
/// no reconciliation sweep.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "sync_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub integration_id: i32,
    /// started | completed | failed
    pub status: String,
    pub started_at: DBDateTime,
    pub completed_at: Option<DBDateTime>,
    pub records_processed: Option<i64>,
    pub error_message: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::integration_configs::Entity",
        from = "Column::IntegrationId",
        to = "super::integration_configs::Column::Id"
    )]
    Integration,
}

impl Related<super::integration_configs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Integration.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
