//! Backend entry-point: loads settings, wires adapters and serves the API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig as _;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use server::{AppSettings, ServerConfig, build_http_state, create_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        AppSettings::load().map_err(|err| std::io::Error::other(format!("settings: {err}")))?;
    let http_state = build_http_state(&settings).await?;
    let config = ServerConfig::new(settings.bind_addr()?);
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(server::prometheus_metrics());

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, http_state, config)?.await
}
