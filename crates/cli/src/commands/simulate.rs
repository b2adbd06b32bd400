//! `simulate` command implementation.

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::info;

use batcher::{ActivityBatcher, BatcherConfig, MetricsSnapshot};
use dispatcher::{LogStreamClient, MemoryStreamClient, NetworkStreamClient};
use interceptor::TranscriptLogger;

use crate::cli::{SimulateArgs, SinkKind};
use crate::error::CliError;
use crate::simulation::{run_simulation, SimulationConfig, SimulationStats, MIN_USERS};

/// Execute the `simulate` command
pub async fn run_simulate(args: &SimulateArgs) -> Result<()> {
    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    if args.users < MIN_USERS {
        return Err(CliError::simulation(format!(
            "at least {MIN_USERS} simulated users required, got {}",
            args.users
        ))
        .into());
    }

    let config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
        info!("Metrics endpoint available on port {}", args.metrics_port);
    }

    let batcher_config = BatcherConfig::from(&config.batching);
    let sim_config = SimulationConfig {
        users: args.users,
        seed: args.seed,
        ..Default::default()
    };

    info!(
        users = args.users,
        sink = ?args.sink,
        batch_size = batcher_config.batch_size,
        partitions = config.stream.partition_count,
        "Starting simulation"
    );

    match args.sink {
        SinkKind::Memory => {
            let client = MemoryStreamClient::new(config.stream.partition_count);
            let logger = TranscriptLogger::from_client(client.clone(), batcher_config);
            let stats = run_simulation(&logger, &sim_config).await?;

            wait_for_memory_drain(&client, logger.batcher()).await;
            print_summary(&stats, &logger.batcher().metrics().snapshot());
            print_partition_summary(&client);
        }
        SinkKind::Log => {
            let client = LogStreamClient::new("log", config.stream.partition_count);
            let logger = TranscriptLogger::from_client(client, batcher_config);
            let stats = run_simulation(&logger, &sim_config).await?;

            grace_for_detached_flushes().await;
            print_summary(&stats, &logger.batcher().metrics().snapshot());
        }
        SinkKind::Network => {
            let client = NetworkStreamClient::from_relay("network", &config).await?;
            let logger = TranscriptLogger::from_client(client, batcher_config);
            let stats = run_simulation(&logger, &sim_config).await?;

            grace_for_detached_flushes().await;
            print_summary(&stats, &logger.batcher().metrics().snapshot());
        }
    }

    Ok(())
}

/// Size-triggered flushes are detached tasks; poll until every
/// accepted record has landed in the in-memory backend
async fn wait_for_memory_drain(
    client: &MemoryStreamClient,
    batcher: &ActivityBatcher<MemoryStreamClient>,
) {
    for _ in 0..100 {
        if client.delivered_events() as u64 == batcher.metrics().enqueued_count() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Backends we cannot poll get a short grace period instead
async fn grace_for_detached_flushes() {
    tokio::time::sleep(Duration::from_millis(250)).await;
}

fn print_summary(stats: &SimulationStats, metrics: &MetricsSnapshot) {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                    Simulation Summary                        ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("💬 Traffic");
    println!("   ├─ Users: {}", stats.users);
    println!("   ├─ Conversations: {}", stats.conversations);
    println!("   ├─ User turns: {}", stats.user_turns);
    println!("   ├─ Bot replies: {}", stats.bot_replies);
    println!("   ├─ Updates: {}", stats.updates);
    println!("   ├─ Deletes: {}", stats.deletes);
    println!("   ├─ Abandoned dialogs: {}", stats.abandoned_dialogs);
    println!("   └─ Untracked events: {}", stats.untracked_events);

    println!("\n📦 Relay");
    println!("   ├─ Records captured: {}", metrics.enqueued_count);
    println!("   ├─ Records skipped (no conversation): {}", metrics.skipped_count);
    println!("   ├─ Batches sent: {}", metrics.batches_sent);
    println!("   │    ├─ size-triggered: {}", metrics.size_flushes);
    println!("   │    ├─ timer-triggered: {}", metrics.timer_flushes);
    println!("   │    └─ forced: {}", metrics.forced_flushes);
    println!("   ├─ Events delivered: {}", metrics.events_sent);
    println!("   ├─ Send failures: {}", metrics.send_failures);
    println!("   └─ Discovery failures: {}", metrics.discovery_failures);
}

fn print_partition_summary(client: &MemoryStreamClient) {
    println!("\n🧩 Partitions");
    let counts = client.per_partition_counts();
    for (i, (partition, batches)) in counts.iter().enumerate() {
        let prefix = if i == counts.len() - 1 {
            "└─"
        } else {
            "├─"
        };
        println!("   {} partition {}: {} batches", prefix, partition, batches);
    }
    println!();
}
