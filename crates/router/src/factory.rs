//! Build routers and sinks from a RouterBlueprint

use std::collections::HashMap;

use contracts::{Attr, RouteClass, RouterBlueprint, SharedSink, SinkConfig, SinkType};
use tracing::{info, instrument};

use crate::builder::RouterBuilder;
use crate::error::RouterError;
use crate::router::MultiTargetRouter;
use crate::sinks::{JsonSink, TracingSink, UdpSink};

/// Create a sink from configuration
#[instrument(
    name = "router_create_sink",
    skip(config),
    fields(sink = %config.name, sink_type = ?config.sink_type)
)]
pub fn create_sink(config: &SinkConfig) -> Result<SharedSink, RouterError> {
    let sink = match config.sink_type {
        SinkType::Stdout => JsonSink::stdout(&config.name, config.level).shared(),
        SinkType::Stderr => JsonSink::stderr(&config.name, config.level).shared(),
        SinkType::File => JsonSink::from_params(&config.name, &config.params, config.level)
            .map_err(|e| RouterError::sink_creation(&config.name, e.to_string()))?
            .shared(),
        SinkType::Network => UdpSink::from_params(&config.name, &config.params, config.level)
            .map_err(|e| RouterError::sink_creation(&config.name, e.to_string()))?
            .shared(),
        SinkType::Tracing => TracingSink::new(&config.name, config.level).shared(),
    };
    Ok(sink)
}

/// Build a router from a blueprint
///
/// Only routed sinks are instantiated, each exactly once: a sink listed in
/// both route tables is the same instance in both groups. Blueprint `attrs`
/// and `scope` are applied after construction.
#[instrument(name = "router_create", skip(blueprint), fields(router = %blueprint.name))]
pub fn create_router(blueprint: &RouterBlueprint) -> Result<MultiTargetRouter, RouterError> {
    let mut built: HashMap<String, SharedSink> = HashMap::new();
    let mut groups = Vec::with_capacity(2);

    for class in [RouteClass::Standard, RouteClass::Error] {
        let mut group = Vec::new();
        for name in blueprint.routes.for_class(class) {
            if let Some(sink) = built.get(name) {
                group.push(SharedSink::clone(sink));
                continue;
            }
            let config = blueprint
                .sink(name)
                .ok_or_else(|| RouterError::UnknownSink {
                    route: class.to_string(),
                    name: name.clone(),
                })?;
            let sink = create_sink(config)?;
            built.insert(name.clone(), SharedSink::clone(&sink));
            group.push(sink);
        }
        groups.push(group);
    }

    let error_sinks = groups.pop().unwrap_or_default();
    let standard_sinks = groups.pop().unwrap_or_default();

    let mut router = RouterBuilder::new()
        .name(&blueprint.name)
        .standard_sinks(standard_sinks)
        .error_sinks(error_sinks)
        .build();

    if !blueprint.attrs.is_empty() {
        let attrs: Vec<Attr> = blueprint
            .attrs
            .iter()
            .map(|(key, value)| Attr::new(key.as_str(), value.as_str()))
            .collect();
        router = router.with_attrs(&attrs);
    }
    if let Some(scope) = blueprint.scope.as_deref() {
        router = router.with_scope(scope);
    }

    info!(
        standard = router.standard_sinks().len(),
        error = router.error_sinks().len(),
        instantiated = built.len(),
        "Router created"
    );

    Ok(router)
}
