//! Config Routing Example
//!
//! Builds a router from `demos/router.toml` (or the path given as the first
//! argument) and logs a few records through a `Logger`.
//!
//! Run with: cargo run --bin config_routing [-- path/to/router.toml]

use std::path::PathBuf;

use config_loader::ConfigLoader;
use contracts::Attr;
use router::Logger;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // `tracing` sinks in the config are rendered by this subscriber
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::INFO)
        .init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/router.toml")));

    tracing::info!(path = %path.display(), "Loading router config");
    let blueprint = ConfigLoader::load_from_path(&path)?;
    let router = router::create_router(&blueprint)?;
    let metrics = router.metrics().clone();

    let logger = Logger::from_router(router);
    logger.debug("cart loaded", &[Attr::new("items", 3)]);
    logger.info("payment started", &[Attr::new("amount", 129.5)]);

    let request = logger.with_scope("request").with_attrs(&[Attr::new("id", "r-42")]);
    request.warn("slow upstream", &[Attr::new("latency_ms", 870)]);
    request.error("payment declined", &[Attr::new("reason", "insufficient funds")]);

    if let Err(e) = request.try_log(contracts::Level::Fatal, "ledger unreachable", &[]) {
        eprintln!("delivery failed: {e}");
    }

    let snapshot = metrics.snapshot();
    tracing::info!(
        handled = snapshot.handled_count,
        delivered = snapshot.delivered_count,
        skipped = snapshot.skipped_count,
        "Demo finished"
    );

    Ok(())
}
