mod api;
mod middleware;

use std::{net::SocketAddr, sync::Arc};

use placefinder_core::Environment;
use placefinder_pipeline::HttpPipeline;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, build_cors, rate_limit_from_config, AppState},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(placefinder_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    if config.llm_api_key.is_none() {
        tracing::warn!("DEEPSEEK_API_KEY not set; searches will fail until it is configured");
    }
    if config.geocode_api_key.is_none() {
        tracing::warn!("GOOGLE_MAPS_API_KEY not set; missing coordinates will not be geocoded");
    }

    let pipeline = HttpPipeline::from_app_config(&config)?;
    let auth = AuthState::from_keys(
        &config.api_keys,
        matches!(config.env, Environment::Development),
    )?;
    let app = build_app(
        AppState {
            pipeline: Arc::new(pipeline),
        },
        auth,
        rate_limit_from_config(&config),
        build_cors(&config.cors_origins),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "placefinder server listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
