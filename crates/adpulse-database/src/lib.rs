//! Database connection and query utilities

pub use sea_orm;
mod connection;

pub use connection::{establish_connection, DbConnection};

// Export test utilities for use by other crates in their tests
pub mod test_utils;

#[cfg(test)]
mod tests {
    #[tokio::test]
    async fn test_setup_test_db_applies_schema() -> anyhow::Result<()> {
        let db = crate::test_utils::setup_test_db().await?;

        use sea_orm::{ConnectionTrait, Statement};
        let result = db
            .query_one(Statement::from_string(
                db.get_database_backend(),
                "SELECT COUNT(*) AS n FROM companies".to_owned(),
            ))
            .await?;
        assert!(result.is_some());

        Ok(())
    }
}
