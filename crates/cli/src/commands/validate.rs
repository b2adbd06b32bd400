//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    endpoint: String,
    entity_path: String,
    batch_size: usize,
    batch_interval_ms: u64,
    partition_count: usize,
    wire_format: String,
    portal_configured: bool,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    // Check file exists
    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    // Try to load and validate
    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);

            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    endpoint: config.connection.endpoint.clone(),
                    entity_path: config.connection.entity_path.clone(),
                    batch_size: config.batching.batch_size,
                    batch_interval_ms: config.batching.batch_interval_ms,
                    partition_count: config.stream.partition_count,
                    wire_format: format!("{:?}", config.stream.wire_format),
                    portal_configured: config.portal.is_some(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &contracts::RelayConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.batching.batch_interval_ms < 1000 {
        warnings.push(format!(
            "batch_interval_ms = {} will flush very frequently",
            config.batching.batch_interval_ms
        ));
    }

    if config.batching.batch_size == 1 {
        warnings.push("batch_size = 1 disables batching entirely".to_string());
    }

    if config.stream.partition_count == 1 {
        warnings.push(
            "partition_count = 1 - every batch lands on the same partition".to_string(),
        );
    }

    if config.portal.is_none() {
        warnings.push("no [portal] section - the portal-url command is unavailable".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Endpoint: {}", summary.endpoint);
            println!("  Entity: {}", summary.entity_path);
            println!("  Batch size: {}", summary.batch_size);
            println!("  Batch interval: {} ms", summary.batch_interval_ms);
            println!("  Partitions: {}", summary.partition_count);
            println!("  Wire format: {}", summary.wire_format);
            println!("  Portal configured: {}", summary.portal_configured);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
