//! `portal-url` command implementation.

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::PortalUrlArgs;
use crate::error::CliError;
use crate::portal::PortalUrlBuilder;

/// Execute the `portal-url` command
pub fn run_portal_url(args: &PortalUrlArgs) -> Result<()> {
    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    let config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let portal = config
        .portal
        .ok_or_else(|| CliError::portal("no [portal] section in configuration"))?;

    info!(component = %portal.component_name, "Building portal URL");

    let builder = PortalUrlBuilder::new(portal);
    let url = builder.build_navigation_url(&args.query)?;

    println!("{url}");
    Ok(())
}
