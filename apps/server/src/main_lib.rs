use std::sync::Arc;

use crate::{api::app_router, config::Config};
use eventgen_lookup::{HttpTransport, LookupOrchestrator, RepositoryClient};
use eventgen_protocol::ServiceRegistry;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub lookup: LookupOrchestrator,
    pub services: ServiceRegistry,
}

pub fn init_tracing() {
    let log_format = std::env::var("EG_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state(config: &Config, services: ServiceRegistry) -> Arc<AppState> {
    let transport = Arc::new(HttpTransport::new(config.er_timeout));
    let client = RepositoryClient::new(transport, config.er_retry.clone());
    let lookup = LookupOrchestrator::new(config.lookup_settings(), client);

    if config.er_enabled {
        tracing::info!(
            "Event repository lookup enabled against {} ({} attempt(s), timeout {:?})",
            config.er_url,
            config.er_retry.attempts(),
            config.er_timeout
        );
    } else {
        tracing::info!("Event repository lookup disabled");
    }
    if services.is_empty() {
        tracing::warn!("No message services registered; generate requests will be refused");
    } else {
        tracing::info!("Message services: {}", services.names().join(", "));
    }

    Arc::new(AppState { lookup, services })
}

/// Run the gateway with the given message services until the listener fails.
pub async fn serve(config: Config, services: ServiceRegistry) -> anyhow::Result<()> {
    let state = build_state(&config, services);
    let router = app_router(state, &config);
    tracing::info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
