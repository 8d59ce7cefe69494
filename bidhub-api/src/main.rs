//! # BidHub API Server
//!
//! REST backend for the BidHub sourcing portal: admins create time-boxed
//! reverse-auction events, invited vendors submit price/delivery bids,
//! and admins select a winner from the ranked result.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/bidhub \
//! JWT_SECRET=$(openssl rand -hex 32) \
//! cargo run -p bidhub-api
//! ```

use std::net::SocketAddr;

use bidhub_api::{
    app::{build_router, AppState},
    config::Config,
};
use bidhub_shared::db::{migrations, pool};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bidhub_api=debug,bidhub_shared=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("BidHub API Server v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    migrations::run_migrations(&db).await?;

    bootstrap_product_owner(&db).await?;

    let bind_address = config.bind_address();
    let state = AppState::new(db, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Shutdown complete");

    Ok(())
}

/// Seeds the initial product owner account
///
/// Self-registration only creates internal users, and privileged roles can
/// only be granted by an existing product owner, so the first one has to
/// come from the environment: `BOOTSTRAP_ADMIN_EMAIL` and
/// `BOOTSTRAP_ADMIN_PASSWORD`. A no-op if the variables are unset or the
/// account already exists.
async fn bootstrap_product_owner(db: &sqlx::PgPool) -> anyhow::Result<()> {
    use bidhub_shared::auth::password;
    use bidhub_shared::models::admin::{Admin, AdminRole, CreateAdmin};

    let (email, plaintext) = match (
        std::env::var("BOOTSTRAP_ADMIN_EMAIL"),
        std::env::var("BOOTSTRAP_ADMIN_PASSWORD"),
    ) {
        (Ok(email), Ok(password)) => (email, password),
        _ => return Ok(()),
    };

    if Admin::find_by_email(db, &email).await?.is_some() {
        return Ok(());
    }

    let password_hash = password::hash_password(&plaintext)
        .map_err(|e| anyhow::anyhow!("Failed to hash bootstrap password: {}", e))?;

    let admin = Admin::create(
        db,
        CreateAdmin {
            email,
            company_name: "BidHub".to_string(),
            role: AdminRole::ProductOwner,
            password_hash,
        },
    )
    .await?;

    tracing::info!(admin_id = %admin.id, "Bootstrapped product owner account");

    Ok(())
}

/// Resolves when SIGINT is received
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    } else {
        tracing::info!("Shutdown signal received, draining connections...");
    }
}
