use clap::Args;
use sea_orm::Database;
use tracing::info;

use adpulse_migrations::{Migrator, MigratorTrait};

#[derive(Args)]
pub struct MigrateCommand {
    /// Database connection URL
    #[arg(long, env = "ADPULSE_DATABASE_URL")]
    pub database_url: String,
}

impl MigrateCommand {
    pub async fn execute(self) -> anyhow::Result<()> {
        let db = Database::connect(&self.database_url).await?;

        info!("Applying pending migrations");
        Migrator::up(&db, None).await?;
        info!("Migrations applied");

        Ok(())
    }
}
