//! Command implementations.

mod emit;
mod info;
mod pipe;
mod validate;

pub use emit::run_emit;
pub use info::run_info;
pub use pipe::run_pipe;
pub use validate::run_validate;

use std::path::Path;

use anyhow::{Context, Result};
use contracts::RouterBlueprint;
use router::MultiTargetRouter;
use tracing::info;

use crate::error::CliError;

/// Load and validate a configuration file
pub fn load_config(path: &Path) -> Result<RouterBlueprint> {
    if !path.exists() {
        return Err(CliError::config_not_found(path.display().to_string()).into());
    }
    config_loader::ConfigLoader::load_from_path(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Load a configuration file and build its router
pub fn build_router(path: &Path) -> Result<MultiTargetRouter> {
    let blueprint = load_config(path)?;
    let router = router::create_router(&blueprint)
        .map_err(|e| CliError::router_build(e.to_string()))?;

    info!(
        router = %blueprint.name,
        standard = router.standard_sinks().len(),
        error = router.error_sinks().len(),
        "Router ready"
    );
    Ok(router)
}
