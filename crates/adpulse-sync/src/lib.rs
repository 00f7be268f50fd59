//! Sync orchestration: per-integration runs, company fan-out, scheduled
//! batch sweeps and the HTTP trigger surface

pub mod handlers;
mod orchestrator;
mod plugin;
mod scheduler;

pub use orchestrator::{CompanySyncSummary, CompanySyncer, SyncOrchestrator};
pub use plugin::SyncPlugin;
pub use scheduler::{BatchScheduler, SweepError, SweepSummary};
