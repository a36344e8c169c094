//! Pet Rescue API - animal adoption site backend
//!
//! Serves the public catalog, the admin catalog editor, adoption
//! applications, visitor feedback and user accounts, plus the static client
//! pages and uploaded photos.
//!
//! Records live in PostgreSQL when `DATABASE_URL` is set and in memory
//! otherwise.

mod auth;
mod config;
mod error;
mod models;
mod routes;
mod state;
mod store;
mod upload;

use crate::config::{LogFormat, Settings};
use crate::routes::create_router;
use crate::state::AppState;
use crate::store::{MemoryStore, PgStore, SharedStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let settings = Settings::load()?;

    // Initialize tracing subscriber for structured logging
    init_tracing(settings.log_format);

    info!("🚀 Starting Pet Rescue API...");
    info!("📋 Configuration loaded successfully");

    if settings.uses_default_admin_secret() {
        warn!("⚠️  ADMIN_SECRET not set, using default (INSECURE - set in production!)");
    }

    let store: SharedStore = match &settings.database {
        Some(db) => {
            let store = PgStore::connect(db).await.map_err(|e| {
                error!("❌ FATAL: Failed to initialize database: {}", e);
                anyhow::anyhow!("Cannot start server without database connection: {}", e)
            })?;
            info!("✅ Database ready (TLS: {})", db.require_tls);
            Arc::new(store)
        }
        None => {
            warn!("⚠️  DATABASE_URL not set, using in-memory store (data is lost on restart)");
            Arc::new(MemoryStore::new())
        }
    };

    let state = Arc::new(AppState::new(store, &settings));

    // Build the router
    let app = create_router(state, &settings);

    // Create socket address
    let addr = SocketAddr::from((settings.server.host, settings.server.port));

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📚 API Endpoints:");
    info!("   ─── Catalog ───");
    info!("   GET  /api/animals                  - List animals (?type=dog|cat|other)");
    info!("   GET  /api/animals/{{id}}             - Get one animal");
    info!("");
    info!("   ─── Admin (x-admin-secret) ───");
    info!("   POST /api/admin/animals            - Create animal (multipart photo)");
    info!("   PUT  /api/admin/animals/{{id}}       - Update animal");
    info!("   POST /api/admin/animals/{{id}}/adopt - Toggle adopted flag");
    info!("");
    info!("   ─── Visitors ───");
    info!("   POST /api/apply                    - Submit adoption application");
    info!("   POST /api/feedback                 - Send feedback");
    info!("   POST /api/newsletter               - Newsletter signup");
    info!("");
    info!("   ─── Accounts ───");
    info!("   POST /api/auth/signup              - Register new account");
    info!("   POST /api/auth/login               - Login with email/password");
    info!("   GET  /api/users/{{id}}/applications  - List a user's applications");
    info!("   PUT  /api/users/{{id}}               - Update profile");
    info!("");
    info!(
        "📁 Static files from {}, uploads in {}",
        settings.assets.public_dir.display(),
        settings.assets.upload_dir.display()
    );

    // Create TCP listener and serve
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pet_rescue_api=debug,tower_http=debug"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Json => registry.with(fmt::layer().json().with_target(true)).init(),
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .compact(),
            )
            .init(),
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("📴 Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("📴 Received terminate signal, initiating graceful shutdown...");
        },
    }
}
