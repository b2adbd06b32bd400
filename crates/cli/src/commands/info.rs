//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    connection: ConnectionInfo,
    batching: BatchingInfo,
    stream: StreamInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    portal: Option<PortalInfo>,
}

#[derive(Serialize)]
struct ConnectionInfo {
    endpoint: String,
    entity_path: String,
}

#[derive(Serialize)]
struct BatchingInfo {
    batch_size: usize,
    batch_interval_ms: u64,
}

#[derive(Serialize)]
struct StreamInfo {
    partition_count: usize,
    wire_format: String,
}

#[derive(Serialize)]
struct PortalInfo {
    tenant_id: String,
    subscription_id: String,
    resource_group: String,
    component_name: String,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = build_config_info(&config);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&config);
    }

    Ok(())
}

fn build_config_info(config: &contracts::RelayConfig) -> ConfigInfo {
    ConfigInfo {
        connection: ConnectionInfo {
            endpoint: config.connection.endpoint.clone(),
            entity_path: config.connection.entity_path.clone(),
        },
        batching: BatchingInfo {
            batch_size: config.batching.batch_size,
            batch_interval_ms: config.batching.batch_interval_ms,
        },
        stream: StreamInfo {
            partition_count: config.stream.partition_count,
            wire_format: format!("{:?}", config.stream.wire_format),
        },
        portal: config.portal.as_ref().map(|p| PortalInfo {
            tenant_id: p.tenant_id.clone(),
            subscription_id: p.subscription_id.clone(),
            resource_group: p.resource_group.clone(),
            component_name: p.component_name.clone(),
        }),
    }
}

fn print_config_info(config: &contracts::RelayConfig) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║              Transcript Relay Configuration                  ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("🔌 Connection");
    println!("   ├─ Endpoint: {}", config.connection.endpoint);
    println!("   └─ Entity: {}", config.connection.entity_path);

    println!("\n📦 Batching");
    println!("   ├─ Batch size: {}", config.batching.batch_size);
    println!(
        "   └─ Batch interval: {} ms",
        config.batching.batch_interval_ms
    );

    println!("\n🧩 Stream");
    println!("   ├─ Partitions: {}", config.stream.partition_count);
    println!("   └─ Wire format: {:?}", config.stream.wire_format);

    match &config.portal {
        Some(portal) => {
            println!("\n🔗 Portal");
            println!("   ├─ Tenant: {}", portal.tenant_id);
            println!("   ├─ Subscription: {}", portal.subscription_id);
            println!("   ├─ Resource group: {}", portal.resource_group);
            println!("   └─ Component: {}", portal.component_name);
        }
        None => {
            println!("\n🔗 Portal: not configured");
        }
    }

    println!();
}
