use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use checkin_backend::{
    config::Config,
    db::connection::{create_pool, run_migrations},
    routes::app_router,
    state::AppState,
    utils::time::SystemClock,
};

fn mask_secret(s: &str) -> String {
    if s.is_empty() {
        return "<empty>".into();
    }
    let prefix = s.chars().take(4).collect::<String>();
    format!("{}*** (len={})", prefix, s.len())
}

fn mask_database_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "checkin_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load()?;
    tracing::info!(
        database_url = %config.database_url.as_deref().map(mask_database_url).unwrap_or_else(|| "<in-memory>".into()),
        jwt_secret = %mask_secret(&config.jwt_secret),
        time_zone = %config.time_zone,
        port = config.port,
        "Loaded configuration from environment/.env"
    );

    let state = match config.database_url.as_deref() {
        Some(url) => {
            let pool = create_pool(url).await?;
            run_migrations(&pool).await?;
            tracing::info!("Connected to database and applied migrations");
            AppState::with_pool(pool, config.clone())
        }
        None => {
            tracing::warn!("DATABASE_URL not set; check-ins are kept in memory and lost on restart");
            AppState::in_memory(config.clone(), std::sync::Arc::new(SystemClock))
        }
    };

    let app = app_router(state);

    let addr = SocketAddr::new(config.bind_address, config.port);
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
