//! HR assistant server entry-point.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Context, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use hr_assistant::domain::ports::AssistantCapability;
use hr_assistant::inbound::http::health::HealthState;
use hr_assistant::inbound::http::session_config::{BuildMode, session_settings_from_env};
use hr_assistant::outbound::assistant::HttpAssistantGateway;
use hr_assistant::outbound::persistence::{DbPool, run_pending_migrations};
use hr_assistant::settings::AppSettings;
use server::{ServerConfig, create_server};

fn assistant_capability(settings: &AppSettings) -> color_eyre::Result<AssistantCapability> {
    let Some(endpoint) = settings.assistant_endpoint()? else {
        info!("assistant not configured; replies come from the built-in responder");
        return Ok(AssistantCapability::Unconfigured);
    };
    info!(agent_id = %endpoint.agent_id, "assistant configured");
    let gateway = HttpAssistantGateway::new(endpoint).wrap_err("build assistant client")?;
    Ok(AssistantCapability::Configured(Arc::new(gateway)))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| eyre!("load settings: {err}"))?;
    let session =
        session_settings_from_env(&mockable::DefaultEnv::new(), BuildMode::from_debug_assertions())
            .wrap_err("session settings")?;
    let pool_config = settings.pool_config()?;

    run_pending_migrations(pool_config.database_url())
        .await
        .wrap_err("run migrations")?;
    let pool = DbPool::new(pool_config).await.wrap_err("build database pool")?;

    let bind_addr = settings.bind_addr()?;
    let config = ServerConfig::new(session, bind_addr, pool)
        .with_assistant(assistant_capability(&settings)?);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "listening");

    let handle = server.handle();
    actix_web::rt::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested; draining");
            health_state.mark_unhealthy();
            handle.stop(true).await;
        }
    });

    server.await?;
    Ok(())
}
