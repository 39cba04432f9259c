//! `emit` command implementation.

use anyhow::Result;
use contracts::{Attr, LogRecord};
use tracing::{debug, info};

use super::build_router;
use crate::cli::EmitArgs;
use crate::error::CliError;

/// Execute the `emit` command
pub fn run_emit(args: &EmitArgs) -> Result<()> {
    let mut router = build_router(&args.config)?;
    if let Some(ref scope) = args.scope {
        router = router.with_scope(scope);
    }

    if !router.enabled(args.level) {
        debug!(level = %args.level, "No sink accepts this level, nothing emitted");
        return Ok(());
    }

    let record = build_record(args);
    router
        .handle(&record)
        .map_err(CliError::dispatch)?;

    info!(level = %args.level, "Record routed");
    Ok(())
}

fn build_record(args: &EmitArgs) -> LogRecord {
    LogRecord::new(args.level, args.message.clone()).with_attrs(
        args.attrs
            .iter()
            .map(|(key, value)| Attr::new(key.clone(), value.clone())),
    )
}
