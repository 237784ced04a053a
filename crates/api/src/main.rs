use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use passage_core::clock::{Clock, SystemClock};
use passage_db::repositories::{CodeRepo, SessionRepo, UserRepo};
use passage_db::store::SessionStore;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use passage_api::auth::password::PasswordHasher;
use passage_api::background::session_cleanup;
use passage_api::config::ServerConfig;
use passage_api::notifications::{LogMailer, Mailer, SmtpMailer};
use passage_api::router::build_app_router;
use passage_api::services::{AuthDeps, AuthService, EmailVerificationService};
use passage_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "passage_api=debug,passage_db=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let pool = passage_db::create_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    passage_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    passage_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Redis ---
    let redis = passage_db::connect_redis(&config.redis_url)
        .await
        .expect("Failed to connect to Redis");
    tracing::info!("Redis connection established");

    // --- Mailer ---
    let mailer: Arc<dyn Mailer> = match config.email.clone() {
        Some(email) => Arc::new(SmtpMailer::new(email).expect("Invalid SMTP configuration")),
        None => {
            tracing::warn!("SMTP not configured, outbound email is logged only");
            Arc::new(LogMailer)
        }
    };

    // --- Services ---
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let sessions: Arc<dyn SessionStore> = Arc::new(SessionRepo::new(pool.clone()));

    let verification = Arc::new(EmailVerificationService::new(
        Arc::new(CodeRepo::new(redis)),
        Arc::clone(&mailer),
        config.auth.code.clone(),
    ));

    let hasher =
        PasswordHasher::new(&config.auth.password).expect("Invalid password hashing parameters");

    let auth = Arc::new(AuthService::new(
        AuthDeps {
            users: Arc::new(UserRepo::new(pool)),
            sessions: Arc::clone(&sessions),
            verification: Arc::clone(&verification),
            mailer,
            clock: Arc::clone(&clock),
        },
        hasher,
        config.auth.jwt.clone(),
        config.auth.session.clone(),
    ));

    // --- Background jobs ---
    let cleanup_cancel = CancellationToken::new();
    let cleanup_handle = tokio::spawn(session_cleanup::run(
        sessions,
        clock,
        Duration::from_secs(config.session_cleanup_interval_secs),
        cleanup_cancel.clone(),
    ));

    // --- Router ---
    let state = AppState {
        config: Arc::new(config.clone()),
        auth,
        verification,
    };
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    // Connect info feeds the client-ip extractor.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    cleanup_cancel.cancel();
    match tokio::time::timeout(Duration::from_secs(5), cleanup_handle).await {
        Ok(Ok(())) => tracing::info!("Session cleanup job stopped"),
        Ok(Err(e)) => tracing::error!(error = %e, "Session cleanup job failed"),
        Err(_) => tracing::warn!("Session cleanup job did not stop within 5s"),
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
