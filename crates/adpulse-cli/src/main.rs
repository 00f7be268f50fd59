//! Adpulse CLI - single entrypoint for the API server and operational tasks

mod commands;

use clap::{Parser, Subcommand};
use commands::{GenerateKeyCommand, MigrateCommand, ServeCommand};
use tracing_subscriber::{layer::SubscriberExt, Layer};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "ADPULSE_LOG_LEVEL", global = true)]
    log_level: String,

    /// Log format: compact, full
    #[arg(
        long,
        default_value = "compact",
        env = "ADPULSE_LOG_FORMAT",
        global = true
    )]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server and sync scheduler
    Serve(ServeCommand),
    /// Apply pending database migrations and exit
    Migrate(MigrateCommand),
    /// Generate a fresh credential encryption key
    GenerateKey(GenerateKeyCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let log_level = cli.log_level.clone();

    // If RUST_LOG is set, use it directly; otherwise default all adpulse
    // crates to the requested level and quiet noisy dependencies
    let filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .expect("Invalid RUST_LOG environment variable")
    } else {
        tracing_subscriber::EnvFilter::new(format!(
            "adpulse_cli={level},\
             adpulse_core={level},\
             adpulse_entities={level},\
             adpulse_migrations={level},\
             adpulse_database={level},\
             adpulse_connectors={level},\
             adpulse_metrics={level},\
             adpulse_integrations={level},\
             adpulse_sync={level},\
             sqlx=warn,\
             sea_orm=warn,\
             tower=warn,\
             hyper=warn",
            level = log_level
        ))
    };

    let fmt_layer = match cli.log_format.as_str() {
        "full" => tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .boxed(),
        _ => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .boxed(),
    };

    let subscriber = tracing_subscriber::registry().with(filter).with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default subscriber");

    match cli.command {
        Commands::Serve(serve_cmd) => serve_cmd.execute().await,
        Commands::Migrate(migrate_cmd) => migrate_cmd.execute().await,
        Commands::GenerateKey(generate_cmd) => generate_cmd.execute(),
    }
}
