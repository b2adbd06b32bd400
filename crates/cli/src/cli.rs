//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Transcript Relay - batching activity relay for bot transcripts
#[derive(Parser, Debug)]
#[command(
    name = "transcript-relay",
    author,
    version,
    about = "Bot transcript relay pipeline",
    long_about = "Relays conversational activities from a bot runtime to an \n\
                  event-streaming backend. Buffers activities, flushes them in \n\
                  batches on size or timer triggers, and spreads batches across \n\
                  stream partitions in round-robin order."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "RELAY_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "RELAY_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drive simulated dialog traffic through the relay pipeline
    Simulate(SimulateArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),

    /// Build an analytics portal deep link with a pre-populated query
    PortalUrl(PortalUrlArgs),
}

/// Arguments for the `simulate` command
#[derive(Parser, Debug, Clone)]
pub struct SimulateArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "relay.toml", env = "RELAY_CONFIG")]
    pub config: PathBuf,

    /// Number of simulated users (minimum 100)
    #[arg(long, default_value = "200", env = "RELAY_SIM_USERS")]
    pub users: usize,

    /// Where simulated batches are delivered
    #[arg(long, value_enum, default_value = "memory")]
    pub sink: SinkKind,

    /// Deterministic RNG seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "RELAY_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Backend used by the `simulate` command
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SinkKind {
    /// Capture batches in memory and print a delivery summary
    Memory,
    /// Log batch summaries via tracing
    Log,
    /// Transmit to the configured network endpoint
    Network,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "relay.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "relay.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `portal-url` command
#[derive(Parser, Debug)]
pub struct PortalUrlArgs {
    /// Path to configuration file (needs a [portal] section)
    #[arg(short, long, default_value = "relay.toml")]
    pub config: PathBuf,

    /// Analytics query to pre-populate in the portal
    pub query: String,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
