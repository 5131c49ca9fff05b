use anyhow::Result;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use classroom_api::{
    config::Config,
    db,
    notify::{HttpMailer, LogNotifier, Notifier},
    routes,
    state::AppState,
    store::{PgLessonStore, PgProvisioningStore, PgUserStore},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing/logging
    init_tracing();

    tracing::info!("Starting Classroom API server...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        "Loaded configuration: server={}:{}",
        config.server.host,
        config.server.port
    );

    // Create database connection pool
    let pool = db::create_pool(&config.database.url, config.database.max_connections).await?;

    // Initialize the mail notifier if credentials are available
    let notifier: Arc<dyn Notifier> = match (
        config.mailer.api_url.clone(),
        config.mailer.api_token.clone(),
    ) {
        (Some(api_url), Some(api_token)) => {
            tracing::info!("Initializing HTTP mailer");
            Arc::new(HttpMailer::new(
                api_url,
                api_token,
                config.mailer.from_address.clone(),
                config.mailer.setup_link_base.clone(),
            ))
        }
        _ => {
            tracing::warn!(
                "Mailer credentials not found - provisioning emails will not be delivered"
            );
            Arc::new(LogNotifier)
        }
    };

    // Create app state
    let state = AppState::new(
        config.clone(),
        Some(pool.clone()),
        Arc::new(PgUserStore::new(pool.clone())),
        Arc::new(PgLessonStore::new(pool.clone())),
        Arc::new(PgProvisioningStore::new(pool)),
        notifier,
    );

    // Build router with middleware
    let app = routes::create_router(state).layer(
        ServiceBuilder::new()
            // Logging layer
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            // CORS layer
            .layer(CorsLayer::permissive()),
    );

    // Start server
    let addr = config.server_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Health check available at http://{}/api/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "classroom_api=debug,tower_http=debug,axum=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
