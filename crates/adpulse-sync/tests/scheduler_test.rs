use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, Set};

use adpulse_core::{ServiceError, ServiceResult};
use adpulse_database::test_utils::setup_test_db;
use adpulse_database::DbConnection;
use adpulse_entities::companies;
use adpulse_sync::{BatchScheduler, CompanySyncSummary, CompanySyncer};

/// Syncer that records calls and concurrency instead of touching connectors
struct MockSyncer {
    fail_company: Option<i32>,
    calls: Mutex<Vec<i32>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockSyncer {
    fn new(fail_company: Option<i32>) -> Self {
        Self {
            fail_company,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> Vec<i32> {
        self.calls.lock().unwrap().clone()
    }

    fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompanySyncer for MockSyncer {
    async fn sync_company(&self, company_id: i32) -> ServiceResult<CompanySyncSummary> {
        self.calls.lock().unwrap().push(company_id);

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        // Hold the slot long enough for batch-mates to overlap
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_company == Some(company_id) {
            return Err(ServiceError::Database("connection reset".to_string()));
        }

        Ok(CompanySyncSummary {
            company_id,
            total: 1,
            succeeded: 1,
            failed: 0,
            records_processed: 10,
        })
    }
}

async fn seed_companies(
    db: &Arc<DbConnection>,
    count: usize,
    active: bool,
) -> anyhow::Result<Vec<i32>> {
    let mut ids = Vec::with_capacity(count);
    for n in 0..count {
        let company = companies::ActiveModel {
            name: Set(format!("Company {}", n)),
            slug: Set(format!("company-{}-{}", active, n)),
            active: Set(active),
            settings: Set(serde_json::json!({})),
            ..Default::default()
        }
        .insert(db.as_ref())
        .await?;
        ids.push(company.id);
    }
    Ok(ids)
}

#[tokio::test]
async fn test_one_failing_company_does_not_stop_the_sweep() -> anyhow::Result<()> {
    let db = setup_test_db().await?;
    let ids = seed_companies(&db, 3, true).await?;

    let syncer = Arc::new(MockSyncer::new(Some(ids[1])));
    let scheduler = BatchScheduler::new(db, syncer.clone(), 10);

    let summary = scheduler.run_sweep().await?;

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].company_id, ids[1]);
    assert!(summary.errors[0].error.contains("connection reset"));

    // Every company was attempted regardless of the failure
    assert_eq!(syncer.calls().len(), 3);

    Ok(())
}

#[tokio::test]
async fn test_sweep_respects_batch_size() -> anyhow::Result<()> {
    let db = setup_test_db().await?;
    seed_companies(&db, 25, true).await?;

    let syncer = Arc::new(MockSyncer::new(None));
    let scheduler = BatchScheduler::new(db, syncer.clone(), 10);

    let summary = scheduler.run_sweep().await?;

    assert_eq!(summary.processed, 25);
    assert!(summary.errors.is_empty());
    assert_eq!(syncer.calls().len(), 25);
    assert!(
        syncer.max_in_flight() <= 10,
        "batch overlap: {} in flight",
        syncer.max_in_flight()
    );

    Ok(())
}

#[tokio::test]
async fn test_inactive_companies_are_skipped() -> anyhow::Result<()> {
    let db = setup_test_db().await?;
    let active = seed_companies(&db, 2, true).await?;
    let inactive = seed_companies(&db, 1, false).await?;

    let syncer = Arc::new(MockSyncer::new(None));
    let scheduler = BatchScheduler::new(db, syncer.clone(), 10);

    let summary = scheduler.run_sweep().await?;

    assert_eq!(summary.processed, 2);
    let calls = syncer.calls();
    assert!(calls.contains(&active[0]) && calls.contains(&active[1]));
    assert!(!calls.contains(&inactive[0]));

    Ok(())
}
